//! Extraction passes in dependency order, then one load of all four tables.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info};

use crate::config::RunConfig;
use crate::error::PipelineError;
use crate::fetch::{Endpoint, Fetcher, Transport};
use crate::filter::{Admission, GameKeys, SeenKeys, StatFilter};
use crate::models::{Game, Player, PlayerStat, Team};
use crate::normalize;
use crate::raw::{RawGame, RawPlayer, RawPlayerStat, RawTeam};
use crate::sink::Sink;
use crate::table::Table;

/// What one extraction pass fetched, kept and dropped (by reason).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub entity: &'static str,
    pub requests: u64,
    pub fetched: usize,
    pub kept: usize,
    pub dropped: BTreeMap<&'static str, usize>,
}

impl PassReport {
    fn new(entity: &'static str) -> Self {
        Self {
            entity,
            ..Self::default()
        }
    }

    fn record_drop(&mut self, reason: &'static str) {
        *self.dropped.entry(reason).or_default() += 1;
    }

    pub fn dropped_for(&self, reason: &str) -> usize {
        self.dropped.get(reason).copied().unwrap_or(0)
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} requests, {} fetched, {} kept",
            self.entity, self.requests, self.fetched, self.kept
        )?;
        for (reason, count) in &self.dropped {
            write!(f, ", {count} dropped ({reason})")?;
        }
        Ok(())
    }
}

/// The four normalized collections of one run.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub teams: Vec<Team>,
    pub games: Vec<Game>,
    pub players: Vec<Player>,
    pub player_stats: Vec<PlayerStat>,
    pub reports: Vec<PassReport>,
}

impl Dataset {
    /// Tables in load order: teams, games, players, playerstats.
    pub fn tables(&self) -> Result<Vec<Table>, PipelineError> {
        Ok(vec![
            Table::assemble(&self.teams)?,
            Table::assemble(&self.games)?,
            Table::assemble(&self.players)?,
            Table::assemble(&self.player_stats)?,
        ])
    }
}

pub struct Extractor<T> {
    fetcher: Fetcher<T>,
    config: RunConfig,
}

impl<T: Transport> Extractor<T> {
    pub fn new(fetcher: Fetcher<T>, config: RunConfig) -> Self {
        Self { fetcher, config }
    }

    /// Teams -> games -> players -> player stats. The first fetch or parse
    /// failure aborts the whole extraction.
    pub async fn extract(&mut self) -> Result<Dataset, PipelineError> {
        let (teams, teams_report) = self.extract_teams().await?;
        let (games, games_report) = self.extract_games().await?;

        let team_ids: Vec<i64> = teams.iter().map(|t| t.team_id).collect();
        let (players, players_report) = self.extract_players(&team_ids).await?;

        let game_keys = GameKeys::from_games(&games);
        let (player_stats, stats_report) = self.extract_player_stats(&team_ids, game_keys).await?;

        Ok(Dataset {
            teams,
            games,
            players,
            player_stats,
            reports: vec![teams_report, games_report, players_report, stats_report],
        })
    }

    pub async fn extract_teams(&mut self) -> Result<(Vec<Team>, PassReport), PipelineError> {
        let mut report = PassReport::new("teams");
        let mut seen = SeenKeys::new();
        let mut teams = Vec::new();

        let raw: Vec<RawTeam> = self.fetch(&Endpoint::teams(), &mut report).await?;
        report.fetched = raw.len();
        for record in &raw {
            match normalize::team(record) {
                None => report.record_drop("not a franchise"),
                Some(_) if !seen.first_sighting(record.id) => report.record_drop("duplicate"),
                Some(team) => teams.push(team),
            }
        }

        report.kept = teams.len();
        info!("{report}");
        Ok((teams, report))
    }

    pub async fn extract_games(&mut self) -> Result<(Vec<Game>, PassReport), PipelineError> {
        let mut report = PassReport::new("games");
        let mut seen = SeenKeys::new();
        let mut games = Vec::new();

        for season in self.config.seasons.clone() {
            let raw: Vec<RawGame> = self.fetch(&Endpoint::games(season), &mut report).await?;
            report.fetched += raw.len();

            for record in &raw {
                if self.config.exhibitions.contains(season, record.teams.visitors.id) {
                    debug!("Skipping exhibition game {} in {season}", record.id);
                    report.record_drop("exhibition");
                    continue;
                }
                if !seen.first_sighting(record.id) {
                    report.record_drop("duplicate");
                    continue;
                }
                match normalize::game(record, season) {
                    Some(game) => games.push(game),
                    None => {
                        debug!("Dropping unscored game {}", record.id);
                        report.record_drop("no score");
                    }
                }
            }
        }

        report.kept = games.len();
        info!("{report}");
        Ok((games, report))
    }

    /// Every (season, team) roster; a player keeps the fields from the first
    /// page they appear on.
    pub async fn extract_players(
        &mut self,
        team_ids: &[i64],
    ) -> Result<(Vec<Player>, PassReport), PipelineError> {
        let mut report = PassReport::new("players");
        let mut seen = SeenKeys::new();
        let mut players = Vec::new();
        let total = self.config.seasons.clone().count() * team_ids.len();

        for season in self.config.seasons.clone() {
            for &team_id in team_ids {
                let endpoint = Endpoint::players(season, team_id);
                let raw: Vec<RawPlayer> = self.fetch(&endpoint, &mut report).await?;
                report.fetched += raw.len();

                for record in &raw {
                    if seen.first_sighting(record.id) {
                        players.push(normalize::player(record));
                    } else {
                        report.record_drop("already seen");
                    }
                }
                self.progress(&report, total);
            }
        }

        report.kept = players.len();
        info!("{report}");
        Ok((players, report))
    }

    pub async fn extract_player_stats(
        &mut self,
        team_ids: &[i64],
        game_keys: GameKeys,
    ) -> Result<(Vec<PlayerStat>, PassReport), PipelineError> {
        let mut report = PassReport::new("playerstats");
        let mut filter = StatFilter::new(game_keys);
        let mut stats = Vec::new();
        let total = self.config.seasons.clone().count() * team_ids.len();

        for season in self.config.seasons.clone() {
            for &team_id in team_ids {
                let endpoint = Endpoint::player_stats(season, team_id);
                let raw: Vec<RawPlayerStat> = self.fetch(&endpoint, &mut report).await?;
                report.fetched += raw.len();

                for record in &raw {
                    let Some(stat) = normalize::player_stat(record, season) else {
                        report.record_drop("did not play");
                        continue;
                    };
                    match filter.admit(&stat) {
                        Admission::Keep => stats.push(stat),
                        rejected => report.record_drop(rejected.reason()),
                    }
                }
                self.progress(&report, total);
            }
        }

        report.kept = stats.len();
        info!("{report}");
        Ok((stats, report))
    }

    async fn fetch<R: serde::de::DeserializeOwned>(
        &mut self,
        endpoint: &Endpoint,
        report: &mut PassReport,
    ) -> Result<Vec<R>, PipelineError> {
        report.requests += 1;
        Ok(self.fetcher.fetch(endpoint).await?)
    }

    fn progress(&self, report: &PassReport, total: usize) {
        let every = self.config.progress_every.max(1);
        if report.requests % every == 0 {
            info!(
                "Progress: {}/{} {} requests completed ({:.1}%)",
                report.requests,
                total,
                report.entity,
                (report.requests as f64 / total.max(1) as f64) * 100.0
            );
        }
    }

    pub fn requests(&self) -> u64 {
        self.fetcher.requests()
    }
}

/// Row counts of a completed run, in load order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub requests: u64,
    pub loaded: Vec<(&'static str, usize)>,
    pub reports: Vec<PassReport>,
}

/// Extracts everything, assembles the tables, then hands them to the sink.
/// Nothing reaches the sink unless all four passes and the assembly succeed.
pub async fn run<T: Transport, S: Sink>(
    extractor: &mut Extractor<T>,
    sink: &mut S,
) -> Result<RunSummary, PipelineError> {
    let dataset = extractor.extract().await?;
    let tables = dataset.tables()?;

    sink.load(&tables).await?;

    Ok(RunSummary {
        requests: extractor.requests(),
        loaded: tables.iter().map(|t| (t.name, t.len())).collect(),
        reports: dataset.reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_drop_reasons() {
        let mut report = PassReport::new("games");
        report.requests = 2;
        report.fetched = 5;
        report.kept = 2;
        report.record_drop("no score");
        report.record_drop("exhibition");
        report.record_drop("no score");

        assert_eq!(report.dropped_for("no score"), 2);
        assert_eq!(report.dropped_for("duplicate"), 0);
        assert_eq!(
            report.to_string(),
            "games: 2 requests, 5 fetched, 2 kept, 1 dropped (exhibition), 2 dropped (no score)"
        );
    }
}
