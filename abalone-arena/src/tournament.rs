//! Round-robin tournament between named search configurations
//!
//! Level 1 - Orchestration and Level 3 - Steps

use abalone_core::{GameError, Player};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{Entry, MatchConfig, TournamentConfig};
use crate::match_play::{play_match, MatchOutcome};

/// Standing of a participant in the tournament
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// Index of the entry in the original array
    pub index: usize,
    pub name: String,
    /// Total score (wins + 0.5 * draws)
    pub score: f32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_played: u32,
}

impl Standing {
    pub fn win_rate(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.wins as f32 / self.games_played as f32
        }
    }
}

/// One played game: `black` and `white` index into the entries
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub black: usize,
    pub white: usize,
    pub outcome: MatchOutcome,
}

/// Result of a tournament
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentResult {
    /// Final standings sorted by score (descending)
    pub standings: Vec<Standing>,
    /// Every game in pairing order
    pub games: Vec<Pairing>,
}

impl TournamentResult {
    /// Get winner (top standing)
    pub fn winner(&self) -> Option<&Standing> {
        self.standings.first()
    }

    /// Get standing for a specific entry index
    pub fn standing_for(&self, index: usize) -> Option<&Standing> {
        self.standings.iter().find(|s| s.index == index)
    }
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Play every ordered pair of entries once, so each pair meets with both
/// colors.
pub fn round_robin(entries: &[Entry], config: &TournamentConfig) -> Result<TournamentResult, GameError> {
    let pairings = generate_pairings(entries.len());
    info!(entries = entries.len(), games = pairings.len(), "round robin started");

    let play = |&(black, white): &(usize, usize)| -> Result<Pairing, GameError> {
        let match_config = MatchConfig::new(entries[black].config.clone(), entries[white].config.clone())
            .with_layout(config.layout)
            .with_max_moves(config.max_moves);
        let outcome = play_match(&match_config)?;
        Ok(Pairing { black, white, outcome })
    };

    let games = if config.parallel {
        pairings.par_iter().map(play).collect::<Result<Vec<_>, _>>()?
    } else {
        pairings.iter().map(play).collect::<Result<Vec<_>, _>>()?
    };

    let standings = compute_standings(entries, &games);
    if let Some(top) = standings.first() {
        info!(winner = %top.name, score = top.score, "round robin finished");
    }
    Ok(TournamentResult { standings, games })
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Every ordered (black, white) pair of distinct entries
fn generate_pairings(n: usize) -> Vec<(usize, usize)> {
    let mut pairings = Vec::with_capacity(n * n.saturating_sub(1));
    for i in 0..n {
        for j in 0..n {
            if i != j {
                pairings.push((i, j));
            }
        }
    }
    pairings
}

/// Tally wins, losses and draws; sort by score, ties by entry order
fn compute_standings(entries: &[Entry], games: &[Pairing]) -> Vec<Standing> {
    let mut standings: Vec<Standing> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| Standing {
            index,
            name: entry.name.clone(),
            score: 0.0,
            wins: 0,
            losses: 0,
            draws: 0,
            games_played: 0,
        })
        .collect();

    for game in games {
        for (index, color) in [(game.black, Player::Black), (game.white, Player::White)] {
            let standing = &mut standings[index];
            standing.games_played += 1;
            match game.outcome.winner() {
                Some(winner) if winner == color => standing.wins += 1,
                Some(_) => standing.losses += 1,
                None => standing.draws += 1,
            }
            standing.score += game.outcome.score_for(color);
        }
    }

    standings.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.index.cmp(&b.index))
    });
    standings
}

#[cfg(test)]
mod tests {
    use super::*;
    use abalone_core::{GameStatus, WinReason};

    fn outcome(status: GameStatus) -> MatchOutcome {
        MatchOutcome {
            status,
            plies: 10,
            notation: Vec::new(),
            nodes: 0,
            captured: [0, 0],
        }
    }

    fn won(winner: Player) -> GameStatus {
        GameStatus::Won {
            winner,
            reason: WinReason::Captures,
        }
    }

    #[test]
    fn test_generate_pairings() {
        let pairings = generate_pairings(3);
        assert_eq!(pairings.len(), 6);
        assert!(pairings.contains(&(0, 1)));
        assert!(pairings.contains(&(1, 0)));
        assert!(!pairings.contains(&(2, 2)));
        assert!(generate_pairings(1).is_empty());
    }

    #[test]
    fn test_compute_standings() {
        let entries = vec![
            Entry::preset("balanced", 1).unwrap(),
            Entry::preset("material", 1).unwrap(),
        ];
        let games = vec![
            Pairing {
                black: 0,
                white: 1,
                outcome: outcome(won(Player::White)),
            },
            Pairing {
                black: 1,
                white: 0,
                outcome: outcome(GameStatus::Drawn),
            },
        ];

        let standings = compute_standings(&entries, &games);
        assert_eq!(standings[0].name, "material@1");
        assert_eq!(standings[0].wins, 1);
        assert_eq!(standings[0].draws, 1);
        assert_eq!(standings[0].score, 1.5);
        assert_eq!(standings[1].losses, 1);
        assert_eq!(standings[1].score, 0.5);
        assert_eq!(standings[1].win_rate(), 0.0);
    }

    #[test]
    fn test_ties_keep_entry_order() {
        let entries = vec![
            Entry::preset("material", 1).unwrap(),
            Entry::preset("balanced", 1).unwrap(),
        ];
        let standings = compute_standings(&entries, &[]);
        assert_eq!(standings[0].index, 0);
        assert_eq!(standings[1].index, 1);
    }
}
