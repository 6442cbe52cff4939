//! Match play - one full game between two search configurations
//!
//! Level 2 - Phase-level implementation

use abalone_core::{Game, GameError, GameStatus, Player, SearchConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::MatchConfig;

/// Result of one arena game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub status: GameStatus,
    pub plies: usize,
    /// Notation of every move in order
    pub notation: Vec<String>,
    /// Search nodes summed over both sides
    pub nodes: u64,
    /// Marbles pushed off by black and by white
    pub captured: [u8; 2],
}

impl MatchOutcome {
    pub fn winner(&self) -> Option<Player> {
        self.status.winner()
    }

    /// Points for `player`: 1 for a win, 0.5 for a draw
    pub fn score_for(&self, player: Player) -> f32 {
        match self.status {
            GameStatus::Drawn => 0.5,
            GameStatus::Won { winner, .. } if winner == player => 1.0,
            _ => 0.0,
        }
    }
}

/// Play a full game with each side searched by its own config
pub fn play_match(config: &MatchConfig) -> Result<MatchOutcome, GameError> {
    let mut game = Game::new(config.layout).with_max_moves(config.max_moves);
    let mut nodes = 0u64;

    while !game.is_over() {
        let side = side_config(config, game.to_move());
        let entry = game.play_ai(side)?;
        if let Some(search) = &entry.search {
            nodes += search.nodes;
            debug!(notation = %entry.notation, score = search.score, depth = search.depth, "arena move");
        }
    }

    let position = game.position();
    let outcome = MatchOutcome {
        status: game.status(),
        plies: game.plies(),
        notation: game.notation_log(),
        nodes,
        captured: [position.captured(Player::Black), position.captured(Player::White)],
    };
    info!(
        layout = config.layout.name(),
        status = %outcome.status,
        plies = outcome.plies,
        nodes,
        "match finished"
    );
    Ok(outcome)
}

fn side_config(config: &MatchConfig, player: Player) -> &SearchConfig {
    match player {
        Player::Black => &config.black,
        Player::White => &config.white,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abalone_core::Heuristics;

    fn quick() -> SearchConfig {
        SearchConfig::new(1, Heuristics::material())
    }

    #[test]
    fn test_play_match_respects_move_cap() {
        let config = MatchConfig::new(quick(), quick()).with_max_moves(6);
        let outcome = play_match(&config).unwrap();
        assert!(outcome.status.is_over());
        assert!(outcome.plies <= 6);
        assert_eq!(outcome.notation.len(), outcome.plies);
        assert!(outcome.nodes > 0);
    }

    #[test]
    fn test_play_match_deterministic() {
        let config = MatchConfig::new(quick(), quick()).with_max_moves(8);
        assert_eq!(play_match(&config).unwrap(), play_match(&config).unwrap());
    }

    #[test]
    fn test_zero_cap_is_a_draw() {
        let config = MatchConfig::new(quick(), quick()).with_max_moves(0);
        let outcome = play_match(&config).unwrap();
        assert_eq!(outcome.status, GameStatus::Drawn);
        assert_eq!(outcome.plies, 0);
        assert_eq!(outcome.score_for(Player::Black), 0.5);
        assert_eq!(outcome.score_for(Player::White), 0.5);
    }
}
