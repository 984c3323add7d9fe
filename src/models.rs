//! Flat output records, one per table. Field names are the column names.

use serde::Serialize;

use crate::table::{Column, Record};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    pub team_id: i64,
    pub name: Option<String>,
    pub mascot: Option<String>,
    pub abv: Option<String>,
    pub city: Option<String>,
    pub conference: Option<String>,
    pub division: Option<String>,
}

impl Record for Team {
    const TABLE: &'static str = "teams";
    const COLUMNS: &'static [Column] = &[
        Column::int("team_id"),
        Column::text("name"),
        Column::text("mascot"),
        Column::text("abv"),
        Column::text("city"),
        Column::text("conference"),
        Column::text("division"),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Overtime {
    Yes,
    No,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    pub game_id: i64,
    pub season: i64,
    pub date: Option<String>,
    pub duration: Option<String>,
    pub arena_name: Option<String>,
    pub arena_location: Option<String>,
    pub home_team_id: i64,
    pub home_team: Option<String>,
    pub visitor_team_id: i64,
    pub visitor_team: Option<String>,
    pub winning_team: Option<String>,
    pub overtime: Overtime,
    /// Per-period points joined with `,`.
    pub home_quarters: String,
    pub visitor_quarters: String,
    pub home_points: i64,
    pub visitor_points: i64,
    pub times_tied: Option<i64>,
    pub lead_changes: Option<i64>,
}

impl Record for Game {
    const TABLE: &'static str = "games";
    const COLUMNS: &'static [Column] = &[
        Column::int("game_id"),
        Column::int("season"),
        Column::text("date"),
        Column::text("duration"),
        Column::text("arena_name"),
        Column::text("arena_location"),
        Column::int("home_team_id"),
        Column::text("home_team"),
        Column::int("visitor_team_id"),
        Column::text("visitor_team"),
        Column::text("winning_team"),
        Column::text("overtime"),
        Column::text("home_quarters"),
        Column::text("visitor_quarters"),
        Column::int("home_points"),
        Column::int("visitor_points"),
        Column::int("times_tied"),
        Column::int("lead_changes"),
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub player_id: i64,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub school: Option<String>,
    /// `YYYY-MM-DD`.
    pub birthdate: Option<String>,
    pub rookie_year: Option<i64>,
    pub years_pro: Option<i64>,
    /// Total inches.
    pub height: Option<i64>,
    /// Pounds.
    pub weight: Option<i64>,
    pub jersey_number: Option<i64>,
}

impl Record for Player {
    const TABLE: &'static str = "players";
    const COLUMNS: &'static [Column] = &[
        Column::int("player_id"),
        Column::text("firstname"),
        Column::text("lastname"),
        Column::text("school"),
        Column::text("birthdate"),
        Column::int("rookie_year"),
        Column::int("years_pro"),
        Column::int("height"),
        Column::int("weight"),
        Column::int("jersey_number"),
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStat {
    pub player_id: i64,
    pub game_id: i64,
    pub team_id: i64,
    pub season: i64,
    pub points: Option<i64>,
    pub position: Option<String>,
    pub minutes_played: String,
    pub fgm: Option<i64>,
    pub fga: Option<i64>,
    pub fgp: Option<f64>,
    pub ftm: Option<i64>,
    pub fta: Option<i64>,
    pub ftp: Option<f64>,
    pub tpm: Option<i64>,
    pub tpa: Option<i64>,
    pub tpp: Option<f64>,
    pub off_reb: Option<i64>,
    pub def_reb: Option<i64>,
    pub tot_reb: Option<i64>,
    pub assists: Option<i64>,
    pub p_fouls: Option<i64>,
    pub steals: Option<i64>,
    pub turnovers: Option<i64>,
    pub blocks: Option<i64>,
    pub plus_minus: Option<i64>,
}

impl Record for PlayerStat {
    const TABLE: &'static str = "playerstats";
    const COLUMNS: &'static [Column] = &[
        Column::int("player_id"),
        Column::int("game_id"),
        Column::int("team_id"),
        Column::int("season"),
        Column::int("points"),
        Column::text("position"),
        Column::text("minutes_played"),
        Column::int("fgm"),
        Column::int("fga"),
        Column::float("fgp"),
        Column::int("ftm"),
        Column::int("fta"),
        Column::float("ftp"),
        Column::int("tpm"),
        Column::int("tpa"),
        Column::float("tpp"),
        Column::int("off_reb"),
        Column::int("def_reb"),
        Column::int("tot_reb"),
        Column::int("assists"),
        Column::int("p_fouls"),
        Column::int("steals"),
        Column::int("turnovers"),
        Column::int("blocks"),
        Column::int("plus_minus"),
    ];
}
