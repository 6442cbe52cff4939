//! Abalone Core - Rules engine and AI
//!
//! This crate provides the core game logic for Abalone:
//! - Board geometry (61-cell hexagon, six directions)
//! - Positions and starting layouts
//! - Move legality, sumito pushes and application
//! - Legal move enumeration without duplicates
//! - Position evaluation with pluggable heuristics
//! - Negamax alpha-beta search with an optional time budget
//! - Game record with history and undo

pub mod board;
pub mod position;
pub mod moves;
pub mod rules;
pub mod movegen;
pub mod eval;
pub mod ai;
pub mod game;

// Re-exports for convenient access
pub use board::{Axis, Cell, CellParseError, Direction, DirectionParseError, Player, DIRECTIONS, BOARD_RADIUS};
pub use position::{Layout, Position, UnknownLayout, CAPTURES_TO_WIN, MARBLES_PER_SIDE};
pub use moves::{resolve, Move, MoveKind, NotationError};
pub use rules::{apply, check, BlockReason, GroupError, MoveError, Outcome, Sumito};
pub use movegen::{legal_moves, mobility, summarize, StateSpace};
pub use eval::{evaluate, Evaluator, Heuristics, LinearEvaluator, WIN_VALUE};
pub use ai::{choose_move, choose_move_with, AlphaBetaAI, Diagnostics, SearchConfig, SearchError, TieBreak};
pub use game::{Game, GameError, GameStatus, HistoryEntry, WinReason};
