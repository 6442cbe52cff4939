//! Legal move enumeration and state-space summary

use crate::board::{Cell, Player, DIRECTIONS};
use crate::moves::{Move, MoveKind, MAX_GROUP};
use crate::position::Position;
use crate::rules::{check, Sumito};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Raw candidates per marble: 6 singles + 6x6 pairs + 3x6 triples
pub const RAW_MOVES_PER_MARBLE: usize = 60;

/// Every legal move for `player`, without duplicates.
///
/// Order is deterministic: marble scan order, then the direction a group is
/// extended in, then move direction.
pub fn legal_moves(position: &Position, player: Player) -> Vec<Move> {
    legal_moves_with_sumito(position, player)
        .into_iter()
        .map(|(mv, _)| mv)
        .collect()
}

/// Legal moves paired with their push summary
pub(crate) fn legal_moves_with_sumito(position: &Position, player: Player) -> Vec<(Move, Sumito)> {
    let mut moves = Vec::with_capacity(64);
    let mut seen: FxHashSet<Move> = FxHashSet::default();

    for origin in position.marbles(player) {
        for group in groups_from(position, player, origin) {
            for direction in DIRECTIONS {
                let Ok(mv) = Move::new(group.as_slice(), direction) else {
                    continue;
                };
                if !seen.insert(mv) {
                    continue;
                }
                if let Ok(sumito) = check(position, mv, player) {
                    moves.push((mv, sumito));
                }
            }
        }
    }

    moves
}

/// Number of legal moves, used by the mobility feature
pub fn mobility(position: &Position, player: Player) -> usize {
    legal_moves_with_sumito(position, player).len()
}

/// Runs of own marbles starting at `origin`: the single marble, then 2- and
/// 3-long runs extended along each direction.
fn groups_from(position: &Position, player: Player, origin: Cell) -> Vec<Group> {
    let mut groups = vec![Group::single(origin)];
    for direction in DIRECTIONS {
        let mut group = Group::single(origin);
        let mut cursor = origin;
        while group.len < MAX_GROUP {
            match cursor.step(direction) {
                Some(next) if position.occupant(next) == Some(player) => {
                    group.push(next);
                    groups.push(group);
                    cursor = next;
                }
                _ => break,
            }
        }
    }
    groups
}

#[derive(Clone, Copy)]
struct Group {
    cells: [Cell; MAX_GROUP],
    len: usize,
}

impl Group {
    fn single(cell: Cell) -> Self {
        Self {
            cells: [cell; MAX_GROUP],
            len: 1,
        }
    }

    fn push(&mut self, cell: Cell) {
        self.cells[self.len] = cell;
        self.len += 1;
    }

    fn as_slice(&self) -> &[Cell] {
        &self.cells[..self.len]
    }
}

// ============================================================================
// STATE SPACE SUMMARY
// ============================================================================

/// Move counts for one side of a position
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSpace {
    pub player: Player,
    pub marbles: usize,
    /// Geometric candidates before legality filtering and deduplication
    pub raw: usize,
    pub legal: usize,
    /// Legal move count per [`MoveKind`], in `MoveKind::ALL` order
    pub by_kind: Vec<(MoveKind, usize)>,
    /// Notation of every sumito, push marker included
    pub pushes: Vec<String>,
}

impl StateSpace {
    pub fn count(&self, kind: MoveKind) -> usize {
        self.by_kind
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, n)| *n)
    }
}

/// Summarize the move space available to `player`
pub fn summarize(position: &Position, player: Player) -> StateSpace {
    let moves = legal_moves_with_sumito(position, player);
    let marbles = position.marble_count(player);

    let by_kind = MoveKind::ALL
        .into_iter()
        .map(|kind| (kind, moves.iter().filter(|(mv, _)| mv.kind() == kind).count()))
        .collect();

    let pushes = moves
        .iter()
        .filter(|(_, sumito)| sumito.pushed > 0)
        .map(|(mv, _)| mv.notation(true))
        .collect();

    StateSpace {
        player,
        marbles,
        raw: marbles * RAW_MOVES_PER_MARBLE,
        legal: moves.len(),
        by_kind,
        pushes,
    }
}
