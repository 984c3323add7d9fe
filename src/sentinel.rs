//! Upstream placeholder values and the policies that map them to `None`.
//!
//! The API is inconsistent about how it says "unknown": JSON null, the string
//! `"None"`, an empty string, or a zero in a field where zero is not a real
//! value. Every sentinel lives here as data so normalizers never compare
//! against inline literals.

/// Strings that mean "no value" in any free-text field.
pub const TEXT_NULLS: &[&str] = &["", "None", "none", "null", "N/A"];

/// `min` values the API reports for a player who did not take the floor.
/// A JSON null in `min` is treated the same way.
pub const DID_NOT_PLAY_MINUTES: &[&str] = &["", "--", "-", "0:00"];

/// Zero is used as "unknown" for rookie year, years pro, height and weight.
pub const UNKNOWN_ZERO: i64 = 0;

/// Periods in regulation; any game that reached a later period went to overtime.
pub const REGULATION_PERIODS: i64 = 4;

/// Known defects in the franchise listing, corrected by team id.
pub const TEAM_OVERRIDES: &[TeamOverride] = &[TeamOverride {
    team_id: 16,
    name: "Los Angeles Clippers",
    city: "Los Angeles",
}];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamOverride {
    pub team_id: i64,
    pub name: &'static str,
    pub city: &'static str,
}

pub fn team_override(team_id: i64) -> Option<&'static TeamOverride> {
    TEAM_OVERRIDES.iter().find(|o| o.team_id == team_id)
}

/// Free text: trims, then maps every entry of [`TEXT_NULLS`] to `None`.
pub fn text(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if TEXT_NULLS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Counts where zero (or anything below it) means "not known".
pub fn known_positive(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v > UNKNOWN_ZERO)
}

pub fn did_not_play(minutes: Option<&str>) -> bool {
    match minutes {
        None => true,
        Some(m) => DID_NOT_PLAY_MINUTES.contains(&m.trim()),
    }
}

/// Parses a signed integer such as `"+7"`, `"-3"` or `"0"`. Anything
/// non-numeric (`"--"`, `""`) is unknown rather than zero.
pub fn signed_int(value: Option<&str>) -> Option<i64> {
    let trimmed = value?.trim();
    trimmed.strip_prefix('+').unwrap_or(trimmed).parse().ok()
}
