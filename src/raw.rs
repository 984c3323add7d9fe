//! Upstream payload shapes, one struct per entity.
//!
//! Numeric fields arrive as numbers, numeric strings, `"None"`, `""` or null
//! depending on the endpoint and the season, so they go through the lenient
//! helpers in [`flex`]. Required keys (`id`, the `teams`/`scores` blocks) are
//! plain fields and fail deserialization when absent.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub response: Option<Vec<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTeam {
    pub id: i64,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub code: Option<String>,
    pub city: Option<String>,
    #[serde(rename = "nbaFranchise")]
    pub nba_franchise: Option<bool>,
    #[serde(rename = "allStar")]
    pub all_star: Option<bool>,
    pub leagues: Option<RawTeamLeagues>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTeamLeagues {
    pub standard: Option<RawStandardLeague>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStandardLeague {
    pub conference: Option<String>,
    pub division: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGame {
    pub id: i64,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub season: Option<i64>,
    pub date: Option<RawGameDate>,
    pub periods: Option<RawPeriods>,
    pub arena: Option<RawArena>,
    pub teams: RawGameTeams,
    pub scores: RawGameScores,
    #[serde(rename = "timesTied", default, deserialize_with = "flex::opt_i64")]
    pub times_tied: Option<i64>,
    #[serde(rename = "leadChanges", default, deserialize_with = "flex::opt_i64")]
    pub lead_changes: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGameDate {
    pub start: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPeriods {
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub current: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArena {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGameTeams {
    pub home: RawGameTeam,
    pub visitors: RawGameTeam,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGameTeam {
    pub id: i64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGameScores {
    pub home: RawScore,
    pub visitors: RawScore,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawScore {
    #[serde(default, deserialize_with = "flex::int_seq")]
    pub linescore: Vec<Option<i64>>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub points: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayer {
    pub id: i64,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub birth: Option<RawBirth>,
    pub nba: Option<RawCareer>,
    pub height: Option<RawHeight>,
    pub weight: Option<RawWeight>,
    #[serde(default, deserialize_with = "flex::opt_string")]
    pub college: Option<String>,
    pub leagues: Option<RawPlayerLeagues>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBirth {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCareer {
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub start: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub pro: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHeight {
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub feets: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub inches: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWeight {
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub pounds: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayerLeagues {
    pub standard: Option<RawPlayerLeague>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayerLeague {
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub jersey: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRef {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayerStat {
    pub player: RawRef,
    pub team: RawRef,
    pub game: RawRef,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub points: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_string")]
    pub pos: Option<String>,
    #[serde(default, deserialize_with = "flex::opt_string")]
    pub min: Option<String>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub fgm: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub fga: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_f64")]
    pub fgp: Option<f64>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub ftm: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub fta: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_f64")]
    pub ftp: Option<f64>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub tpm: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub tpa: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_f64")]
    pub tpp: Option<f64>,
    #[serde(rename = "offReb", default, deserialize_with = "flex::opt_i64")]
    pub off_reb: Option<i64>,
    #[serde(rename = "defReb", default, deserialize_with = "flex::opt_i64")]
    pub def_reb: Option<i64>,
    #[serde(rename = "totReb", default, deserialize_with = "flex::opt_i64")]
    pub tot_reb: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub assists: Option<i64>,
    #[serde(rename = "pFouls", default, deserialize_with = "flex::opt_i64")]
    pub p_fouls: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub steals: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub turnovers: Option<i64>,
    #[serde(default, deserialize_with = "flex::opt_i64")]
    pub blocks: Option<i64>,
    #[serde(rename = "plusMinus", default, deserialize_with = "flex::opt_string")]
    pub plus_minus: Option<String>,
}

/// Lenient deserializers for fields whose JSON type varies upstream.
pub mod flex {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn number_from(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok().filter(|f: &f64| f.is_finite()),
            _ => None,
        }
    }

    /// Integers, or whole-valued floats in either JSON type (`21.0`, `"21.0"`).
    fn int_from(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
            Value::String(s) => {
                let s = s.trim();
                s.parse().ok().or_else(|| s.parse().ok().and_then(whole))
            }
            _ => None,
        }
    }

    fn whole(f: f64) -> Option<i64> {
        (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
    }

    pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(int_from))
    }

    pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(number_from))
    }

    /// Strings stay as-is (sentinel handling happens in the normalizer);
    /// numbers are rendered as text.
    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    /// A per-period score list. Position is the period, so an entry that is
    /// not an integer stays in place as `None`.
    pub fn int_seq<'de, D>(deserializer: D) -> Result<Vec<Option<i64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = Option::<Vec<Value>>::deserialize(deserializer)?;
        Ok(values.unwrap_or_default().iter().map(int_from).collect())
    }
}
