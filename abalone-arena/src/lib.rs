//! Abalone Arena - Engine-vs-engine games and tournaments
//!
//! This crate drives the core search agent through full games:
//! - Single matches between two search configurations
//! - Round-robin tournaments over named entries
//!
//! ## Architecture
//!
//! - Level 1: round_robin (orchestration)
//! - Level 2: play_match (phases)
//! - Level 3: pairing and standings (steps)
//! - Level 4: configuration

mod config;
mod match_play;
mod tournament;

pub use config::{Entry, MatchConfig, TournamentConfig, DEFAULT_MAX_MOVES};
pub use match_play::{play_match, MatchOutcome};
pub use tournament::{round_robin, Pairing, Standing, TournamentResult};
