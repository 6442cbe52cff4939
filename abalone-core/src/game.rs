//! Game record: side to move, history, undo and end-of-game status

use crate::ai::{choose_move, AlphaBetaAI, Diagnostics, SearchConfig, SearchError};
use crate::board::Player;
use crate::eval::Evaluator;
use crate::movegen::legal_moves;
use crate::moves::{resolve, Move, NotationError};
use crate::position::{Layout, Position};
use crate::rules::{apply, MoveError, Outcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

// ============================================================================
// STATUS
// ============================================================================

/// Why a game was won
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinReason {
    /// Six opponent marbles pushed off
    Captures,
    /// The loser had no legal move on their turn
    NoLegalMoves,
    Resigned,
    /// Move cap reached with more captures
    MoveLimit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    Won { winner: Player, reason: WinReason },
    Drawn,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameStatus::Won { winner, .. } => Some(winner),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "ongoing"),
            GameStatus::Won { winner, reason } => write!(f, "{winner} wins ({reason:?})"),
            GameStatus::Drawn => write!(f, "drawn"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("game is over: {0}")]
    GameOver(GameStatus),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

// ============================================================================
// GAME
// ============================================================================

/// One played move
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub player: Player,
    pub mv: Move,
    pub outcome: Outcome,
    /// Notation with the push marker when the move displaced a marble
    pub notation: String,
    /// Position before the move
    pub before: Position,
    /// Present when the search agent chose the move
    pub search: Option<Diagnostics>,
}

/// A game in progress
#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    to_move: Player,
    history: Vec<HistoryEntry>,
    max_moves: Option<usize>,
    resigned: Option<Player>,
}

impl Game {
    /// Fresh game; black moves first
    pub fn new(layout: Layout) -> Self {
        Self::from_position(Position::from_layout(layout), Player::Black)
    }

    pub fn from_position(position: Position, to_move: Player) -> Self {
        Self {
            position,
            to_move,
            history: Vec::new(),
            max_moves: None,
            resigned: None,
        }
    }

    /// End the game after `limit` plies
    pub fn with_max_moves(mut self, limit: usize) -> Self {
        self.max_moves = Some(limit);
        self
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn plies(&self) -> usize {
        self.history.len()
    }

    pub fn notation_log(&self) -> Vec<String> {
        self.history.iter().map(|entry| entry.notation.clone()).collect()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.position, self.to_move)
    }

    pub fn status(&self) -> GameStatus {
        if let Some(loser) = self.resigned {
            return GameStatus::Won {
                winner: loser.opponent(),
                reason: WinReason::Resigned,
            };
        }
        if let Some(winner) = self.position.winner() {
            return GameStatus::Won {
                winner,
                reason: WinReason::Captures,
            };
        }
        if self.legal_moves().is_empty() {
            return GameStatus::Won {
                winner: self.to_move.opponent(),
                reason: WinReason::NoLegalMoves,
            };
        }
        if self.max_moves.is_some_and(|limit| self.history.len() >= limit) {
            let black = self.position.captured(Player::Black);
            let white = self.position.captured(Player::White);
            return match black.cmp(&white) {
                std::cmp::Ordering::Equal => GameStatus::Drawn,
                std::cmp::Ordering::Greater => GameStatus::Won {
                    winner: Player::Black,
                    reason: WinReason::MoveLimit,
                },
                std::cmp::Ordering::Less => GameStatus::Won {
                    winner: Player::White,
                    reason: WinReason::MoveLimit,
                },
            };
        }
        GameStatus::Ongoing
    }

    pub fn is_over(&self) -> bool {
        self.status().is_over()
    }

    // ========================================================================
    // PLAYING
    // ========================================================================

    /// Play `mv` for the side to move
    pub fn play(&mut self, mv: Move) -> Result<&HistoryEntry, GameError> {
        self.ensure_ongoing()?;
        self.record(mv, None)
    }

    /// Play the legal move described by `notation`
    pub fn play_notation(&mut self, notation: &str) -> Result<&HistoryEntry, GameError> {
        self.ensure_ongoing()?;
        let mv = resolve(&self.position, self.to_move, notation)?;
        self.record(mv, None)
    }

    /// Let the search agent move for the side to move
    pub fn play_ai(&mut self, config: &SearchConfig) -> Result<&HistoryEntry, GameError> {
        self.ensure_ongoing()?;
        let (mv, diagnostics) = choose_move(&self.position, self.to_move, config)?;
        self.record(mv, Some(diagnostics))
    }

    pub fn play_agent<E: Evaluator>(&mut self, ai: &AlphaBetaAI<E>) -> Result<&HistoryEntry, GameError> {
        self.ensure_ongoing()?;
        let (mv, diagnostics) = ai.choose_move(&self.position, self.to_move)?;
        self.record(mv, Some(diagnostics))
    }

    /// The side to move gives up
    pub fn resign(&mut self) -> Result<GameStatus, GameError> {
        self.ensure_ongoing()?;
        self.resigned = Some(self.to_move);
        Ok(self.status())
    }

    /// Take back the last move, or a resignation.
    ///
    /// Returns the removed entry; `None` if nothing was undone or only a
    /// resignation was withdrawn.
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        if self.resigned.take().is_some() {
            return None;
        }
        let entry = self.history.pop()?;
        self.position = entry.before;
        self.to_move = entry.player;
        Some(entry)
    }

    fn ensure_ongoing(&self) -> Result<(), GameError> {
        match self.status() {
            GameStatus::Ongoing => Ok(()),
            status => Err(GameError::GameOver(status)),
        }
    }

    fn record(&mut self, mv: Move, search: Option<Diagnostics>) -> Result<&HistoryEntry, GameError> {
        let (next, outcome) = apply(&self.position, mv, self.to_move)?;
        let notation = mv.notation(outcome.is_push());
        debug!(ply = self.history.len() + 1, player = %self.to_move, %notation, "move played");

        self.history.push(HistoryEntry {
            player: self.to_move,
            mv,
            outcome,
            notation,
            before: self.position,
            search,
        });
        self.position = next;
        self.to_move = self.to_move.opponent();
        Ok(self.history.last().expect("history entry was just recorded"))
    }
}
