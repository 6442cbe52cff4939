//! Alpha-beta search agent

use crate::board::Player;
use crate::eval::{Evaluator, Heuristics, LinearEvaluator, WIN_VALUE};
use crate::movegen::legal_moves_with_sumito;
use crate::moves::Move;
use crate::position::Position;
use crate::rules::{apply_checked, Sumito};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default search depth in plies
pub const DEFAULT_DEPTH: u32 = 2;

/// Nodes visited between deadline checks. Each node can cost two move
/// generations under mobility weights, so this stays small.
const DEADLINE_CHECK_INTERVAL: u64 = 64;

// ============================================================================
// CONFIGURATION AND RESULTS
// ============================================================================

/// Search parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies to search; 0 is treated as 1
    pub depth: u32,
    pub heuristics: Heuristics,
    /// Wall-clock budget. When set, iterative deepening runs up to `depth`
    /// and the last completed iteration is returned. The clock is read every
    /// few dozen nodes, so a call may overrun by that many evaluations.
    pub time_budget: Option<Duration>,
    pub tie_break: TieBreak,
}

/// Which root move wins among equal scores
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// First in move-ordering order
    #[default]
    Ordering,
    /// Smallest notation string
    Lexicographic,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            heuristics: Heuristics::balanced(),
            time_budget: None,
            tie_break: TieBreak::Ordering,
        }
    }
}

impl SearchConfig {
    pub fn new(depth: u32, heuristics: Heuristics) -> Self {
        Self {
            depth,
            heuristics,
            time_budget: None,
            tie_break: TieBreak::Ordering,
        }
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    fn effective_depth(&self) -> u32 {
        self.depth.max(1)
    }
}

/// Counters and timing from one `choose_move` call
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Nodes visited across all iterations, interrupted ones included
    pub nodes: u64,
    /// Beta cutoffs
    pub cutoffs: u64,
    /// Score of the chosen move from the mover's perspective
    pub score: f32,
    /// Deepest completed iteration
    pub depth: u32,
    pub elapsed: Duration,
    /// The deadline interrupted an iteration
    pub stopped: bool,
}

impl Diagnostics {
    /// Score at or beyond the win threshold, either sign
    pub fn is_decisive(&self) -> bool {
        self.score.abs() >= WIN_VALUE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("no legal moves")]
    NoLegalMoves,

    #[error("time budget expired before any iteration completed ({nodes} nodes)")]
    SearchExhausted { nodes: u64 },
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Alpha-beta player over any evaluator
#[derive(Clone, Debug, Default)]
pub struct AlphaBetaAI<E = LinearEvaluator> {
    pub config: SearchConfig,
    evaluator: E,
}

impl AlphaBetaAI<LinearEvaluator> {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            evaluator: LinearEvaluator,
        }
    }
}

impl<E: Evaluator> AlphaBetaAI<E> {
    pub fn with_evaluator(config: SearchConfig, evaluator: E) -> Self {
        Self { config, evaluator }
    }

    /// Best move for `player` with search diagnostics
    pub fn choose_move(&self, position: &Position, player: Player) -> Result<(Move, Diagnostics), SearchError> {
        choose_move_with(position, player, &self.config, &self.evaluator)
    }

    /// Static evaluation of a position
    pub fn evaluate(&self, position: &Position, player: Player) -> f32 {
        self.evaluator.score(position, player, &self.config.heuristics)
    }
}

/// Best move for `player` using the linear evaluator
pub fn choose_move(
    position: &Position,
    player: Player,
    config: &SearchConfig,
) -> Result<(Move, Diagnostics), SearchError> {
    choose_move_with(position, player, config, &LinearEvaluator)
}

/// Best move for `player` using a caller-supplied evaluator
pub fn choose_move_with<E: Evaluator + ?Sized>(
    position: &Position,
    player: Player,
    config: &SearchConfig,
    evaluator: &E,
) -> Result<(Move, Diagnostics), SearchError> {
    let started = Instant::now();
    let root_moves = ordered_moves(position, player);
    if root_moves.is_empty() {
        return Err(SearchError::NoLegalMoves);
    }

    let target = config.effective_depth();
    let deadline = config.time_budget.map(|budget| started + budget);
    let first_depth = if deadline.is_some() { 1 } else { target };

    let mut search = Search {
        evaluator,
        heuristics: &config.heuristics,
        tie_break: config.tie_break,
        deadline,
        nodes: 0,
        cutoffs: 0,
    };
    let mut best: Option<(Move, f32, u32)> = None;
    let mut stopped = false;

    for depth in first_depth..=target {
        if search.deadline_passed() {
            stopped = true;
            break;
        }
        match search.root(position, player, &root_moves, depth) {
            Ok((mv, score)) => {
                debug!(depth, nodes = search.nodes, score, best = %mv, "search iteration complete");
                best = Some((mv, score, depth));
            }
            Err(Timeout) => {
                trace!(depth, nodes = search.nodes, "deadline reached, iteration discarded");
                stopped = true;
                break;
            }
        }
    }

    let (mv, score, depth) = best.ok_or(SearchError::SearchExhausted { nodes: search.nodes })?;
    let diagnostics = Diagnostics {
        nodes: search.nodes,
        cutoffs: search.cutoffs,
        score,
        depth,
        elapsed: started.elapsed(),
        stopped,
    };
    Ok((mv, diagnostics))
}

// ============================================================================
// MOVE ORDERING
// ============================================================================

/// Legal moves, most promising first: pushoffs, pushes, centrality gain, then
/// group size. The sort is stable, so ties keep generation order.
fn ordered_moves(position: &Position, player: Player) -> Vec<(Move, Sumito)> {
    let mut moves = legal_moves_with_sumito(position, player);
    moves.sort_by_key(|(mv, sumito)| {
        Reverse((sumito.pushoff, sumito.pushed > 0, centrality_gain(mv), mv.count()))
    });
    moves
}

/// Total decrease in distance to e5 over the moving marbles
fn centrality_gain(mv: &Move) -> i32 {
    let d = mv.direction();
    mv.marbles()
        .iter()
        .map(|c| c.distance_to_center() as i32 - c.offset(d).distance_to_center() as i32)
        .sum()
}

// ============================================================================
// NEGAMAX WITH ALPHA-BETA
// ============================================================================

/// Raised when the deadline passes mid-iteration
struct Timeout;

struct Search<'a, E: ?Sized> {
    evaluator: &'a E,
    heuristics: &'a Heuristics,
    tie_break: TieBreak,
    deadline: Option<Instant>,
    nodes: u64,
    cutoffs: u64,
}

impl<E: Evaluator + ?Sized> Search<'_, E> {
    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn visit(&mut self) -> Result<(), Timeout> {
        self.nodes += 1;
        if self.nodes % DEADLINE_CHECK_INTERVAL == 0 && self.deadline_passed() {
            return Err(Timeout);
        }
        Ok(())
    }

    /// Search every root move and pick the best score, settling ties per
    /// `tie_break`. Lexicographic ties need exact scores, so each root child
    /// then gets a full window.
    fn root(
        &mut self,
        position: &Position,
        player: Player,
        moves: &[(Move, Sumito)],
        depth: u32,
    ) -> Result<(Move, f32), Timeout> {
        self.visit()?;
        let mut alpha = f32::NEG_INFINITY;
        let mut best_move = moves[0].0;
        let mut best_score = f32::NEG_INFINITY;

        let lexicographic = self.tie_break == TieBreak::Lexicographic;
        let mut best_notation = lexicographic.then(|| best_move.to_string());

        for &(mv, sumito) in moves {
            let (child, _) = apply_checked(position, mv, player, sumito);
            let score = -self.negamax(&child, player.opponent(), depth - 1, f32::NEG_INFINITY, -alpha)?;
            if score > best_score {
                best_score = score;
                best_move = mv;
                best_notation = lexicographic.then(|| mv.to_string());
            } else if let Some(current) = best_notation.as_mut().filter(|_| score == best_score) {
                let notation = mv.to_string();
                if notation < *current {
                    best_move = mv;
                    *current = notation;
                }
            }
            if !lexicographic {
                alpha = alpha.max(score);
            }
        }

        Ok((best_move, best_score))
    }

    fn negamax(
        &mut self,
        position: &Position,
        player: Player,
        depth: u32,
        mut alpha: f32,
        beta: f32,
    ) -> Result<f32, Timeout> {
        self.visit()?;

        // Terminal check with depth bonus so faster wins score higher
        if let Some(winner) = position.winner() {
            let value = WIN_VALUE + depth as f32;
            return Ok(if winner == player { value } else { -value });
        }

        if depth == 0 {
            return Ok(self.evaluator.score(position, player, self.heuristics));
        }

        let moves = ordered_moves(position, player);
        if moves.is_empty() {
            // No pass rule: a side that cannot move has lost
            return Ok(-(WIN_VALUE + depth as f32));
        }

        let mut best = f32::NEG_INFINITY;
        for (mv, sumito) in moves {
            let (child, _) = apply_checked(position, mv, player, sumito);
            let score = -self.negamax(&child, player.opponent(), depth - 1, -beta, -alpha)?;

            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                self.cutoffs += 1;
                break;
            }
        }

        Ok(best)
    }
}
