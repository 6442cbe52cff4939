//! Configuration types for arena play
//!
//! Level 4 - Utilities and configuration

use abalone_core::{Heuristics, Layout, SearchConfig};
use serde::{Deserialize, Serialize};

/// Default ply cap for arena games
pub const DEFAULT_MAX_MOVES: usize = 200;

/// One game between two search configurations
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub black: SearchConfig,
    pub white: SearchConfig,
    pub layout: Layout,
    /// Plies before the game is adjudicated on captures
    pub max_moves: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new(SearchConfig::default(), SearchConfig::default())
    }
}

impl MatchConfig {
    pub fn new(black: SearchConfig, white: SearchConfig) -> Self {
        Self {
            black,
            white,
            layout: Layout::Standard,
            max_moves: DEFAULT_MAX_MOVES,
        }
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_max_moves(mut self, max_moves: usize) -> Self {
        self.max_moves = max_moves;
        self
    }
}

/// Named participant in a round robin
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub config: SearchConfig,
}

impl Entry {
    pub fn new(name: impl Into<String>, config: SearchConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Entry using a named heuristic preset at `depth`
    pub fn preset(name: &str, depth: u32) -> Option<Self> {
        let heuristics = Heuristics::preset(name)?;
        Some(Self::new(format!("{name}@{depth}"), SearchConfig::new(depth, heuristics)))
    }
}

/// Round-robin settings shared by every game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub layout: Layout,
    pub max_moves: usize,
    /// Whether to run games in parallel
    pub parallel: bool,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Standard,
            max_moves: DEFAULT_MAX_MOVES,
            parallel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_config_builders() {
        let config = MatchConfig::default()
            .with_layout(Layout::GermanDaisy)
            .with_max_moves(10);
        assert_eq!(config.layout, Layout::GermanDaisy);
        assert_eq!(config.max_moves, 10);
        assert_eq!(config.black, SearchConfig::default());
    }

    #[test]
    fn test_entry_preset() {
        let entry = Entry::preset("material", 1).unwrap();
        assert_eq!(entry.name, "material@1");
        assert_eq!(entry.config.heuristics, Heuristics::material());
        assert!(Entry::preset("unknown", 1).is_none());
    }
}
