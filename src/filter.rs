//! First-seen-wins deduplication and the game-membership gate for stat lines.

use std::collections::HashSet;
use std::hash::Hash;

use crate::models::{Game, PlayerStat};

/// Keys already emitted during one extraction pass.
#[derive(Debug)]
pub struct SeenKeys<K> {
    seen: HashSet<K>,
}

impl<K: Eq + Hash> SeenKeys<K> {
    pub fn new() -> Self {
        Self { seen: HashSet::new() }
    }

    /// True the first time `key` is offered, false on every later sighting.
    pub fn first_sighting(&mut self, key: K) -> bool {
        self.seen.insert(key)
    }
}

impl<K: Eq + Hash> Default for SeenKeys<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Ids of the games that made it into the game table.
#[derive(Debug, Clone, Default)]
pub struct GameKeys(HashSet<i64>);

impl GameKeys {
    pub fn from_games(games: &[Game]) -> Self {
        Self(games.iter().map(|g| g.game_id).collect())
    }

    pub fn contains(&self, game_id: i64) -> bool {
        self.0.contains(&game_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Keep,
    UnknownGame,
    Duplicate,
}

impl Admission {
    pub fn reason(self) -> &'static str {
        match self {
            Admission::Keep => "kept",
            Admission::UnknownGame => "unknown game",
            Admission::Duplicate => "duplicate (player, game)",
        }
    }
}

/// Admits a stat line only if its game was extracted and its
/// (player, game) pair has not been admitted before.
#[derive(Debug)]
pub struct StatFilter {
    games: GameKeys,
    seen: SeenKeys<(i64, i64)>,
}

impl StatFilter {
    pub fn new(games: GameKeys) -> Self {
        Self {
            games,
            seen: SeenKeys::new(),
        }
    }

    pub fn admit(&mut self, stat: &PlayerStat) -> Admission {
        if !self.games.contains(stat.game_id) {
            Admission::UnknownGame
        } else if !self.seen.first_sighting((stat.player_id, stat.game_id)) {
            Admission::Duplicate
        } else {
            Admission::Keep
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Overtime;

    fn game(game_id: i64) -> Game {
        Game {
            game_id,
            season: 2023,
            date: None,
            duration: None,
            arena_name: None,
            arena_location: None,
            home_team_id: 1,
            home_team: None,
            visitor_team_id: 2,
            visitor_team: None,
            winning_team: None,
            overtime: Overtime::No,
            home_quarters: String::new(),
            visitor_quarters: String::new(),
            home_points: 100,
            visitor_points: 90,
            times_tied: None,
            lead_changes: None,
        }
    }

    fn stat(player_id: i64, game_id: i64) -> PlayerStat {
        PlayerStat {
            player_id,
            game_id,
            team_id: 1,
            season: 2023,
            points: Some(10),
            position: None,
            minutes_played: "20".to_string(),
            fgm: None,
            fga: None,
            fgp: None,
            ftm: None,
            fta: None,
            ftp: None,
            tpm: None,
            tpa: None,
            tpp: None,
            off_reb: None,
            def_reb: None,
            tot_reb: None,
            assists: None,
            p_fouls: None,
            steals: None,
            turnovers: None,
            blocks: None,
            plus_minus: None,
        }
    }

    #[test]
    fn first_sighting_wins() {
        let mut seen = SeenKeys::new();
        assert!(seen.first_sighting(265));
        assert!(!seen.first_sighting(265));
        assert!(seen.first_sighting(266));
        assert!(!seen.first_sighting(266));
    }

    #[test]
    fn stat_for_unknown_game_is_rejected() {
        let mut filter = StatFilter::new(GameKeys::from_games(&[game(1), game(2)]));
        assert_eq!(filter.admit(&stat(10, 1)), Admission::Keep);
        assert_eq!(filter.admit(&stat(10, 3)), Admission::UnknownGame);
    }

    #[test]
    fn repeated_player_game_pair_is_rejected() {
        let mut filter = StatFilter::new(GameKeys::from_games(&[game(1)]));
        assert_eq!(filter.admit(&stat(10, 1)), Admission::Keep);
        assert_eq!(filter.admit(&stat(11, 1)), Admission::Keep);
        assert_eq!(filter.admit(&stat(10, 1)), Admission::Duplicate);
    }

    #[test]
    fn empty_game_set_rejects_everything() {
        let mut filter = StatFilter::new(GameKeys::default());
        assert_eq!(filter.admit(&stat(10, 1)), Admission::UnknownGame);
    }
}
