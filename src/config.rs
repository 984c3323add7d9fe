//! Credentials from the environment and run-level settings.

use std::collections::{HashMap, HashSet};
use std::env;
use std::ops::RangeInclusive;

use crate::error::ConfigError;
use crate::rate_limit::RateLimiterConfig;

pub const DEFAULT_DB_PORT: u16 = 5432;

/// Visitor team ids that are non-league exhibition opponents, per season.
/// Games against them are skipped before normalization. Further entries come
/// from `--exclude-visitor SEASON:TEAM_ID`.
const EXHIBITION_VISITORS: &[(i64, &[i64])] = &[
    (2015, &[3, 12, 18]),
    (2016, &[3, 12, 18]),
    (2017, &[12, 18]),
    (2018, &[12, 18]),
    (2019, &[12]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub host: String,
    pub key: String,
}

impl ApiCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: required(&lookup, "API_URL")?,
            key: required(&lookup, "API_KEY")?,
        })
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct DbCredentials {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl std::fmt::Debug for DbCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbCredentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl DbCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("DB_PORT").filter(|v| !v.trim().is_empty()) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "DB_PORT",
                value,
            })?,
            None => DEFAULT_DB_PORT,
        };

        Ok(Self {
            host: required(&lookup, "DB_HOST")?,
            port,
            user: required(&lookup, "DB_USER")?,
            password: required(&lookup, "DB_PASS")?,
            name: required(&lookup, "DB_NAME")?,
        })
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(name))
}

#[derive(Debug, Clone, Default)]
pub struct ExhibitionList {
    by_season: HashMap<i64, HashSet<i64>>,
}

impl ExhibitionList {
    pub fn new(entries: &[(i64, &[i64])]) -> Self {
        let by_season = entries
            .iter()
            .map(|(season, ids)| (*season, ids.iter().copied().collect()))
            .collect();
        Self { by_season }
    }

    pub fn contains(&self, season: i64, visitor_team_id: i64) -> bool {
        self.by_season
            .get(&season)
            .is_some_and(|ids| ids.contains(&visitor_team_id))
    }

    pub fn builtin() -> Self {
        Self::new(EXHIBITION_VISITORS)
    }

    /// Adds one `SEASON:TEAM_ID` entry.
    pub fn add_entry(&mut self, entry: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::Invalid {
            name: "--exclude-visitor",
            value: entry.to_string(),
        };
        let (season, team_id) = entry.split_once(':').ok_or_else(invalid)?;
        let season: i64 = season.trim().parse().map_err(|_| invalid())?;
        let team_id: i64 = team_id.trim().parse().map_err(|_| invalid())?;
        self.by_season.entry(season).or_default().insert(team_id);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub seasons: RangeInclusive<i64>,
    pub rate_limit: RateLimiterConfig,
    pub exhibitions: ExhibitionList,
    /// Log progress every this many requests within a pass.
    pub progress_every: u64,
}

impl RunConfig {
    pub fn new(start: u16, end: u16, rate_limit: RateLimiterConfig) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::EmptySeasonRange { start, end });
        }
        if rate_limit.quota == 0 {
            return Err(ConfigError::ZeroQuota);
        }
        Ok(Self {
            seasons: i64::from(start)..=i64::from(end),
            rate_limit,
            exhibitions: ExhibitionList::builtin(),
            progress_every: 20,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn vars(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn api_credentials_are_required() {
        let err =
            ApiCredentials::from_lookup(vars(&[("API_URL", "v2.nba.api-sports.io")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("API_KEY")));

        let err = ApiCredentials::from_lookup(vars(&[("API_URL", "  "), ("API_KEY", "k")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("API_URL")));

        let creds = ApiCredentials::from_lookup(vars(&[
            ("API_URL", "v2.nba.api-sports.io"),
            ("API_KEY", " k "),
        ]))
        .unwrap();
        assert_eq!(creds.key, "k");
    }

    #[test]
    fn db_credentials_default_port() {
        let creds = DbCredentials::from_lookup(vars(&[
            ("DB_HOST", "localhost"),
            ("DB_USER", "nba"),
            ("DB_PASS", "secret"),
            ("DB_NAME", "nba"),
        ]))
        .unwrap();
        assert_eq!(creds.port, DEFAULT_DB_PORT);
        assert!(!format!("{creds:?}").contains("secret"));
    }

    #[test]
    fn db_credentials_reject_bad_port_and_missing_name() {
        let err = DbCredentials::from_lookup(vars(&[
            ("DB_HOST", "localhost"),
            ("DB_PORT", "abc"),
            ("DB_USER", "nba"),
            ("DB_PASS", "secret"),
            ("DB_NAME", "nba"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "DB_PORT", .. }));

        let err = DbCredentials::from_lookup(vars(&[
            ("DB_HOST", "localhost"),
            ("DB_USER", "nba"),
            ("DB_PASS", "secret"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DB_NAME")));
    }

    #[test]
    fn exhibitions_are_per_season() {
        let list = ExhibitionList::new(&[(2019, &[46])]);
        assert!(list.contains(2019, 46));
        assert!(!list.contains(2020, 46));
        assert!(!list.contains(2019, 1));
    }

    #[test]
    fn exhibition_entries_extend_the_list() {
        let mut list = ExhibitionList::builtin();
        assert!(!list.contains(2023, 52));

        list.add_entry("2023:52").unwrap();
        list.add_entry(" 2023 : 53 ").unwrap();
        assert!(list.contains(2023, 52));
        assert!(list.contains(2023, 53));
        assert!(list.contains(2015, 3));

        for bad in ["2023", "2023:", "abc:5", "2023:x"] {
            let err = list.add_entry(bad).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { name: "--exclude-visitor", .. }));
        }
    }

    #[test]
    fn season_range_must_not_be_empty() {
        let rate = RateLimiterConfig {
            quota: 10,
            window: Duration::from_secs(60),
        };
        assert!(matches!(
            RunConfig::new(2024, 2015, rate),
            Err(ConfigError::EmptySeasonRange { start: 2024, end: 2015 })
        ));
        let config = RunConfig::new(2015, 2024, rate).unwrap();
        assert_eq!(config.seasons.clone().count(), 10);
    }
}
