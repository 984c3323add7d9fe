//! Raw upstream record -> flat output record.
//!
//! Every function here is pure: it reads the raw record and returns either the
//! normalized row or `None` when the record is not kept.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::models::{Game, Overtime, Player, PlayerStat, Team};
use crate::raw::{RawGame, RawPlayer, RawPlayerStat, RawTeam};
use crate::sentinel::{self, text};

/// Franchise teams only; all-star rosters and non-franchise entries are dropped.
pub fn team(raw: &RawTeam) -> Option<Team> {
    if raw.nba_franchise != Some(true) || raw.all_star != Some(false) {
        return None;
    }

    let standard = raw.leagues.as_ref().and_then(|l| l.standard.as_ref());
    let mut team = Team {
        team_id: raw.id,
        name: text(raw.name.as_deref()),
        mascot: text(raw.nickname.as_deref()),
        abv: text(raw.code.as_deref()),
        city: text(raw.city.as_deref()),
        conference: standard.and_then(|s| text(s.conference.as_deref())),
        division: standard.and_then(|s| text(s.division.as_deref())),
    };

    if let Some(fix) = sentinel::team_override(raw.id) {
        team.name = Some(fix.name.to_string());
        team.city = Some(fix.city.to_string());
    }

    Some(team)
}

/// Games without both final scores (postponed, not yet played) are dropped.
/// `season` is the season the game was requested under, used when the payload
/// does not carry its own.
pub fn game(raw: &RawGame, season: i64) -> Option<Game> {
    let home_points = raw.scores.home.points?;
    let visitor_points = raw.scores.visitors.points?;

    let home_team = text(raw.teams.home.name.as_deref());
    let visitor_team = text(raw.teams.visitors.name.as_deref());
    let winning_team = match home_points.cmp(&visitor_points) {
        Ordering::Greater => home_team.clone(),
        Ordering::Less => visitor_team.clone(),
        Ordering::Equal => None,
    };

    let periods = raw.periods.as_ref().and_then(|p| p.current);
    let overtime = match periods {
        Some(p) if p > sentinel::REGULATION_PERIODS => Overtime::Yes,
        _ => Overtime::No,
    };

    let date = raw.date.as_ref();
    let arena = raw.arena.as_ref();

    Some(Game {
        game_id: raw.id,
        season: raw.season.unwrap_or(season),
        date: date.and_then(|d| d.start.as_deref()).and_then(calendar_date),
        duration: date.and_then(|d| d.duration.as_deref()).and_then(duration),
        arena_name: arena.and_then(|a| text(a.name.as_deref())),
        arena_location: arena.and_then(|a| location(a.city.as_deref(), a.state.as_deref())),
        home_team_id: raw.teams.home.id,
        home_team,
        visitor_team_id: raw.teams.visitors.id,
        visitor_team,
        winning_team,
        overtime,
        home_quarters: join_periods(&raw.scores.home.linescore),
        visitor_quarters: join_periods(&raw.scores.visitors.linescore),
        home_points,
        visitor_points,
        times_tied: raw.times_tied,
        lead_changes: raw.lead_changes,
    })
}

pub fn player(raw: &RawPlayer) -> Player {
    let career = raw.nba.as_ref();
    let height = raw.height.as_ref();
    Player {
        player_id: raw.id,
        firstname: text(raw.firstname.as_deref()),
        lastname: text(raw.lastname.as_deref()),
        school: text(raw.college.as_deref()),
        birthdate: raw
            .birth
            .as_ref()
            .and_then(|b| text(b.date.as_deref()))
            .and_then(|d| iso_date(&d)),
        rookie_year: sentinel::known_positive(career.and_then(|c| c.start)),
        years_pro: sentinel::known_positive(career.and_then(|c| c.pro)),
        height: height.and_then(|h| total_inches(h.feets, h.inches)),
        weight: sentinel::known_positive(raw.weight.as_ref().and_then(|w| w.pounds)),
        jersey_number: raw
            .leagues
            .as_ref()
            .and_then(|l| l.standard.as_ref())
            .and_then(|s| s.jersey),
    }
}

/// Box-score line for one player in one game. Dropped when the player did not
/// play. Membership of the game in the extracted game set is checked by
/// [`crate::filter::StatFilter`], not here.
pub fn player_stat(raw: &RawPlayerStat, season: i64) -> Option<PlayerStat> {
    let minutes = raw.min.as_deref();
    if sentinel::did_not_play(minutes) {
        return None;
    }

    Some(PlayerStat {
        player_id: raw.player.id,
        game_id: raw.game.id,
        team_id: raw.team.id,
        season,
        points: raw.points,
        position: text(raw.pos.as_deref()),
        minutes_played: minutes?.trim().to_string(),
        fgm: raw.fgm,
        fga: raw.fga,
        fgp: raw.fgp,
        ftm: raw.ftm,
        fta: raw.fta,
        ftp: raw.ftp,
        tpm: raw.tpm,
        tpa: raw.tpa,
        tpp: raw.tpp,
        off_reb: raw.off_reb,
        def_reb: raw.def_reb,
        tot_reb: raw.tot_reb,
        assists: raw.assists,
        p_fouls: raw.p_fouls,
        steals: raw.steals,
        turnovers: raw.turnovers,
        blocks: raw.blocks,
        plus_minus: sentinel::signed_int(raw.plus_minus.as_deref()),
    })
}

/// `feet * 12 + inches`. Unknown feet means unknown height; missing inches
/// count as zero.
pub fn total_inches(feet: Option<i64>, inches: Option<i64>) -> Option<i64> {
    let feet = sentinel::known_positive(feet)?;
    let inches = inches.filter(|i| *i > 0).unwrap_or(0);
    Some(feet * 12 + inches)
}

/// `2023-10-24T23:30:00.000Z` -> `10/24/2023`.
fn calendar_date(start: &str) -> Option<String> {
    let day = start.trim().get(..10)?;
    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
    Some(date.format("%m/%d/%Y").to_string())
}

fn iso_date(value: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    Some(date.format("%Y-%m-%d").to_string())
}

/// `2:07` -> `2h 07m`.
fn duration(raw: &str) -> Option<String> {
    let (hours, minutes) = raw.trim().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    Some(format!("{hours}h {minutes:02}m"))
}

fn location(city: Option<&str>, state: Option<&str>) -> Option<String> {
    match (text(city), text(state)) {
        (Some(city), Some(state)) => Some(format!("{city}, {state}")),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

/// Unknown periods render as empty slots so later periods keep their position.
fn join_periods(points: &[Option<i64>]) -> String {
    points
        .iter()
        .map(|p| p.map(|p| p.to_string()).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",")
}
