//! Move legality and application, including sumito pushes

use crate::board::{Cell, Player};
use crate::moves::Move;
use crate::position::Position;
use serde::{Deserialize, Serialize};

// ============================================================================
// ERRORS
// ============================================================================

/// Why a move was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("malformed group: {0}")]
    MalformedGroup(GroupError),

    #[error("direction {0:?} is not one of the six hex directions")]
    IllegalDirection((i8, i8)),

    #[error("blocked: {0}")]
    Blocked(BlockReason),

    #[error("cell {0} is off the board")]
    OutOfBounds(Cell),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GroupError {
    #[error("a group holds 1 to 3 marbles, got {0}")]
    Size(usize),

    #[error("the same cell appears twice")]
    Duplicate,

    #[error("marbles are not contiguous along one line")]
    NotInLine,

    #[error("{0} does not hold one of the mover's marbles")]
    NotOwned(Cell),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BlockReason {
    #[error("a marble would leave the board")]
    BoardEdge,

    #[error("own marble in the way")]
    OwnMarble,

    #[error("destination occupied")]
    Occupied,

    #[error("opposing line is not outnumbered")]
    Outnumbered,

    #[error("no room behind the pushed marbles")]
    Obstructed,
}

// ============================================================================
// OUTCOME
// ============================================================================

/// Push summary computed by [`check`] without building a position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sumito {
    /// Opponent marbles displaced (0-2)
    pub pushed: u8,
    /// Whether the farthest one leaves the board
    pub pushoff: bool,
}

/// What a move did to the opponent
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Displaced opponent marbles, nearest to the moving group first
    pub pushed: Vec<Cell>,
    /// A displaced marble left the board
    pub pushoff: bool,
}

impl Outcome {
    pub fn is_push(&self) -> bool {
        !self.pushed.is_empty()
    }
}

// ============================================================================
// LEGALITY
// ============================================================================

/// Decide whether `player` may play `mv` in `position`
pub fn check(position: &Position, mv: Move, player: Player) -> Result<Sumito, MoveError> {
    for &cell in mv.marbles() {
        if position.get(cell)? != Some(player) {
            return Err(MoveError::MalformedGroup(GroupError::NotOwned(cell)));
        }
    }

    if mv.is_inline() {
        check_inline(position, mv, player)
    } else {
        check_broadside(position, mv)
    }
}

fn check_inline(position: &Position, mv: Move, player: Player) -> Result<Sumito, MoveError> {
    let d = mv.direction();
    let ahead = mv
        .leading()
        .step(d)
        .ok_or(MoveError::Blocked(BlockReason::BoardEdge))?;

    match position.occupant(ahead) {
        None => return Ok(Sumito::default()),
        Some(p) if p == player => return Err(MoveError::Blocked(BlockReason::OwnMarble)),
        Some(_) => {}
    }

    let opponent = player.opponent();
    let mut pushed = 0u8;
    let mut next = Some(ahead);
    while let Some(cell) = next {
        if position.occupant(cell) != Some(opponent) {
            break;
        }
        pushed += 1;
        if pushed as usize >= mv.count() {
            return Err(MoveError::Blocked(BlockReason::Outnumbered));
        }
        next = cell.step(d);
    }

    match next {
        None => Ok(Sumito { pushed, pushoff: true }),
        Some(cell) if position.occupant(cell).is_none() => Ok(Sumito { pushed, pushoff: false }),
        Some(_) => Err(MoveError::Blocked(BlockReason::Obstructed)),
    }
}

fn check_broadside(position: &Position, mv: Move) -> Result<Sumito, MoveError> {
    let d = mv.direction();
    for cell in mv.marbles() {
        let dest = cell.step(d).ok_or(MoveError::Blocked(BlockReason::BoardEdge))?;
        if position.occupant(dest).is_some() {
            return Err(MoveError::Blocked(BlockReason::Occupied));
        }
    }
    Ok(Sumito::default())
}

// ============================================================================
// APPLICATION
// ============================================================================

/// Play `mv` for `player`, returning the new position and push report.
/// `position` is left untouched.
pub fn apply(position: &Position, mv: Move, player: Player) -> Result<(Position, Outcome), MoveError> {
    let sumito = check(position, mv, player)?;
    Ok(apply_checked(position, mv, player, sumito))
}

/// Apply a move already validated by [`check`]
pub(crate) fn apply_checked(
    position: &Position,
    mv: Move,
    player: Player,
    sumito: Sumito,
) -> (Position, Outcome) {
    let d = mv.direction();
    let opponent = player.opponent();
    let mut next = *position;
    let mut outcome = Outcome {
        pushed: Vec::with_capacity(sumito.pushed as usize),
        pushoff: sumito.pushoff,
    };

    // Opponent run, nearest first
    let mut cursor = mv.leading().offset(d);
    for _ in 0..sumito.pushed {
        outcome.pushed.push(cursor);
        cursor = cursor.offset(d);
    }

    // Farthest first so no marble is overwritten
    for &cell in outcome.pushed.iter().rev() {
        next.set(cell, None);
        if let Some(dest) = cell.step(d) {
            next.set(dest, Some(opponent));
        }
    }
    if sumito.pushoff {
        next.record_capture(player);
    }

    for &cell in mv.marbles() {
        next.set(cell, None);
    }
    for &cell in mv.marbles() {
        next.set(cell.offset(d), Some(player));
    }

    debug_assert_eq!(next.marble_count(player), position.marble_count(player));
    debug_assert_eq!(
        next.marble_count(opponent) + usize::from(sumito.pushoff),
        position.marble_count(opponent)
    );

    (next, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Direction;

    fn cell(s: &str) -> Cell {
        s.parse().unwrap()
    }

    fn cells(list: &[&str]) -> Vec<Cell> {
        list.iter().map(|s| cell(s)).collect()
    }

    fn mv(list: &[&str], d: Direction) -> Move {
        Move::new(&cells(list), d).unwrap()
    }

    #[test]
    fn test_simple_step() {
        let pos = Position::standard();
        let (next, outcome) = apply(&pos, mv(&["c3"], Direction::NW), Player::Black).unwrap();
        assert!(outcome.pushed.is_empty());
        assert!(!outcome.pushoff);
        assert_eq!(next.occupant(cell("c3")), None);
        assert_eq!(next.occupant(cell("d3")), Some(Player::Black));
        // Input is untouched
        assert_eq!(pos.occupant(cell("c3")), Some(Player::Black));
    }

    #[test]
    fn test_e4_to_e5() {
        let pos = Position::from_marbles(&cells(&["e4"]), &cells(&["i9"]));
        let (next, outcome) = apply(&pos, mv(&["e4"], Direction::E), Player::Black).unwrap();
        assert_eq!(outcome, Outcome::default());
        assert_eq!(next.occupant(cell("e5")), Some(Player::Black));
        assert_eq!(next.occupant(cell("e4")), None);
    }

    #[test]
    fn test_three_push_two() {
        let pos = Position::from_marbles(&cells(&["e1", "e2", "e3"]), &cells(&["e4", "e5"]));
        let (next, outcome) = apply(&pos, mv(&["e1", "e2", "e3"], Direction::E), Player::Black).unwrap();
        assert_eq!(outcome.pushed, cells(&["e4", "e5"]));
        assert!(!outcome.pushoff);
        assert_eq!(next.occupant(cell("e1")), None);
        for c in ["e2", "e3", "e4"] {
            assert_eq!(next.occupant(cell(c)), Some(Player::Black), "{c}");
        }
        for c in ["e5", "e6"] {
            assert_eq!(next.occupant(cell(c)), Some(Player::White), "{c}");
        }
    }

    #[test]
    fn test_pushoff_captures() {
        let pos = Position::from_marbles(&cells(&["e6", "e7", "e8"]), &cells(&["e9"]));
        let (next, outcome) = apply(&pos, mv(&["e6", "e7", "e8"], Direction::E), Player::Black).unwrap();
        assert_eq!(outcome.pushed, cells(&["e9"]));
        assert!(outcome.pushoff);
        assert_eq!(next.captured(Player::Black), 1);
        assert_eq!(next.captured(Player::White), 0);
        assert_eq!(next.marble_count(Player::White), 0);
        assert_eq!(next.occupant(cell("e9")), Some(Player::Black));
    }

    #[test]
    fn test_sumito_needs_majority() {
        let pos = Position::from_marbles(&cells(&["e1", "e2"]), &cells(&["e3", "e4"]));
        assert_eq!(
            apply(&pos, mv(&["e1", "e2"], Direction::E), Player::Black),
            Err(MoveError::Blocked(BlockReason::Outnumbered))
        );

        let pos = Position::from_marbles(&cells(&["e1", "e2", "e3"]), &cells(&["e4", "e5", "e6"]));
        assert_eq!(
            check(&pos, mv(&["e1", "e2", "e3"], Direction::E), Player::Black),
            Err(MoveError::Blocked(BlockReason::Outnumbered))
        );

        let pos = Position::from_marbles(&cells(&["e1"]), &cells(&["e2"]));
        assert_eq!(
            check(&pos, mv(&["e1"], Direction::E), Player::Black),
            Err(MoveError::Blocked(BlockReason::Outnumbered))
        );
    }

    #[test]
    fn test_push_obstructed() {
        // Own marble behind the opponent
        let pos = Position::from_marbles(&cells(&["e1", "e2", "e4"]), &cells(&["e3"]));
        assert_eq!(
            check(&pos, mv(&["e1", "e2"], Direction::E), Player::Black),
            Err(MoveError::Blocked(BlockReason::Obstructed))
        );
        // Opponent sandwich: B B W B W
        let pos = Position::from_marbles(&cells(&["e1", "e2", "e3", "e6"]), &cells(&["e4", "e5"]));
        assert_eq!(
            check(&pos, mv(&["e1", "e2", "e3"], Direction::E), Player::Black),
            Err(MoveError::Blocked(BlockReason::Obstructed))
        );
    }

    #[test]
    fn test_blocked_by_own_and_edge() {
        let pos = Position::standard();
        assert_eq!(
            check(&pos, mv(&["a1"], Direction::E), Player::Black),
            Err(MoveError::Blocked(BlockReason::OwnMarble))
        );
        assert_eq!(
            check(&pos, mv(&["a1"], Direction::SE), Player::Black),
            Err(MoveError::Blocked(BlockReason::BoardEdge))
        );
        assert_eq!(
            check(&pos, mv(&["a1", "a2"], Direction::SE), Player::Black),
            Err(MoveError::Blocked(BlockReason::BoardEdge))
        );
    }

    #[test]
    fn test_broadside() {
        let pos = Position::standard();
        let (next, outcome) = apply(&pos, mv(&["c3", "c4", "c5"], Direction::NW), Player::Black).unwrap();
        assert!(!outcome.is_push());
        for c in ["d3", "d4", "d5"] {
            assert_eq!(next.occupant(cell(c)), Some(Player::Black));
        }
        for c in ["c3", "c4", "c5"] {
            assert_eq!(next.occupant(cell(c)), None);
        }

        // Broadside never pushes
        let pos = Position::from_marbles(&cells(&["e2", "e3"]), &cells(&["f2"]));
        assert_eq!(
            check(&pos, mv(&["e2", "e3"], Direction::NW), Player::Black),
            Err(MoveError::Blocked(BlockReason::Occupied))
        );
    }

    #[test]
    fn test_ownership() {
        let pos = Position::standard();
        assert_eq!(
            check(&pos, mv(&["c3"], Direction::NW), Player::White),
            Err(MoveError::MalformedGroup(GroupError::NotOwned(cell("c3"))))
        );
        assert_eq!(
            check(&pos, mv(&["e5"], Direction::E), Player::Black),
            Err(MoveError::MalformedGroup(GroupError::NotOwned(cell("e5"))))
        );
    }

    #[test]
    fn test_push_toward_lower_cells() {
        // White pushes black downward (SE) with 2v1
        let pos = Position::from_marbles(&cells(&["d5"]), &cells(&["e5", "f5"]));
        let (next, outcome) = apply(&pos, mv(&["f5", "e5"], Direction::SE), Player::White).unwrap();
        assert_eq!(outcome.pushed, cells(&["d5"]));
        assert_eq!(next.occupant(cell("c5")), Some(Player::Black));
        assert_eq!(next.occupant(cell("d5")), Some(Player::White));
        assert_eq!(next.occupant(cell("f5")), None);
    }
}
