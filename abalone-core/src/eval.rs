//! Position evaluation

use crate::board::{Cell, Direction, Player};
use crate::movegen::mobility;
use crate::position::Position;
use serde::{Deserialize, Serialize};

/// Win value (effectively infinite)
pub const WIN_VALUE: f32 = 100000.0;

/// Heuristic scores are clamped below this so they never look decisive
const HEURISTIC_LIMIT: f32 = WIN_VALUE / 2.0;

/// Directions that visit each adjacent pair once
const HALF_DIRECTIONS: [Direction; 3] = [Direction::E, Direction::NW, Direction::NE];

/// Heuristic weights for position evaluation.
///
/// Every feature is measured as (player - opponent), so positive weights
/// reward the player for having more of it, except `edge` which is
/// subtracted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Opponent marbles pushed off
    pub captured: f32,
    /// Marbles still on the board
    pub material: f32,
    /// Closeness of marbles to e5
    pub center: f32,
    /// Adjacent same-color pairs
    pub cohesion: f32,
    /// Legal move count
    pub mobility: f32,
    /// Marbles on the outer ring (penalty)
    pub edge: f32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self::balanced()
    }
}

impl Heuristics {
    pub const PRESETS: [&'static str; 2] = ["balanced", "material"];

    pub fn balanced() -> Self {
        Self {
            captured: 1400.0,
            material: 40.0,
            center: 4.0,
            cohesion: 2.0,
            mobility: 1.0,
            edge: 3.0,
        }
    }

    /// Material only: ignores shape and mobility
    pub fn material() -> Self {
        Self {
            captured: 1800.0,
            material: 50.0,
            center: 0.0,
            cohesion: 0.0,
            mobility: 0.0,
            edge: 0.0,
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "balanced" => Some(Self::balanced()),
            "material" => Some(Self::material()),
            _ => None,
        }
    }

    /// Parse a weight set; missing fields fall back to the balanced preset
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Scores a position from one player's perspective; higher is better.
///
/// Implementations must be pure: identical inputs give identical output.
pub trait Evaluator {
    fn score(&self, position: &Position, player: Player, weights: &Heuristics) -> f32;
}

/// Weighted sum of the [`Heuristics`] features
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearEvaluator;

impl Evaluator for LinearEvaluator {
    fn score(&self, position: &Position, player: Player, weights: &Heuristics) -> f32 {
        evaluate(position, player, weights)
    }
}

/// Evaluate position from `player`'s perspective
pub fn evaluate(position: &Position, player: Player, weights: &Heuristics) -> f32 {
    let mut score = weights.captured * differential(position, player, |p, side| p.captured(side) as f32)
        + weights.material * differential(position, player, |p, side| p.marble_count(side) as f32)
        + weights.center * differential(position, player, centrality)
        + weights.cohesion * differential(position, player, cohesion)
        - weights.edge * differential(position, player, edge_exposure);

    // Mobility runs full move generation for both sides
    if weights.mobility.abs() > 0.001 {
        score += weights.mobility * differential(position, player, |p, side| mobility(p, side) as f32);
    }

    score.clamp(-HEURISTIC_LIMIT, HEURISTIC_LIMIT)
}

fn differential(position: &Position, player: Player, feature: impl Fn(&Position, Player) -> f32) -> f32 {
    feature(position, player) - feature(position, player.opponent())
}

/// Higher when marbles sit nearer the center
fn centrality(position: &Position, player: Player) -> f32 {
    position
        .marbles(player)
        .map(|c| -(c.distance_to_center() as f32))
        .sum()
}

fn cohesion(position: &Position, player: Player) -> f32 {
    position
        .marbles(player)
        .map(|c| {
            HALF_DIRECTIONS
                .iter()
                .filter(|&&d| c.step(d).is_some_and(|n| position.occupant(n) == Some(player)))
                .count() as f32
        })
        .sum()
}

fn edge_exposure(position: &Position, player: Player) -> f32 {
    position.marbles(player).filter(Cell::is_edge).count() as f32
}
