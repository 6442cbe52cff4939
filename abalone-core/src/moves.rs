//! Moves, group shape validation and move notation
//!
//! Notation forms:
//! - inline `{n}:{trailing}{goal}`, e.g. `3:a1d4`; a single marble is `1:e4e5`
//! - broadside `{n}:{first}-{last}>{DIR}`, e.g. `2:c3-c4>NW`
//!
//! `trailing` is the marble furthest from the direction of travel, `goal` the
//! cell the leading marble lands on. A `*` suffix marks a move that displaced
//! an opponent marble.

use crate::board::{Axis, Cell, CellParseError, Direction, DirectionParseError, Player};
use crate::position::Position;
use crate::rules::{check, GroupError, MoveError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest group that may move together
pub const MAX_GROUP: usize = 3;

/// Group of 1-3 marbles plus a direction.
///
/// Cells are stored sorted, so two descriptions of the same physical group
/// compare and hash equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "MoveRepr", try_from = "MoveRepr")]
pub struct Move {
    cells: [Cell; MAX_GROUP],
    len: u8,
    direction: Direction,
}

/// Shape category, as reported by the state-space summary
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MoveKind {
    SingleInline,
    DoubleInline,
    DoubleBroadside,
    TripleInline,
    TripleBroadside,
}

impl MoveKind {
    pub const ALL: [MoveKind; 5] = [
        MoveKind::SingleInline,
        MoveKind::DoubleInline,
        MoveKind::DoubleBroadside,
        MoveKind::TripleInline,
        MoveKind::TripleBroadside,
    ];
}

impl Move {
    /// Validate group shape: 1-3 distinct on-board cells, collinear and
    /// contiguous. Ownership is checked when the move is applied.
    pub fn new(marbles: &[Cell], direction: Direction) -> Result<Self, MoveError> {
        if marbles.is_empty() || marbles.len() > MAX_GROUP {
            return Err(MoveError::MalformedGroup(GroupError::Size(marbles.len())));
        }
        if let Some(&off) = marbles.iter().find(|c| !c.is_valid()) {
            return Err(MoveError::OutOfBounds(off));
        }

        let mut cells = [marbles[0]; MAX_GROUP];
        cells[..marbles.len()].copy_from_slice(marbles);
        let sorted = &mut cells[..marbles.len()];
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(MoveError::MalformedGroup(GroupError::Duplicate));
        }

        if sorted.len() > 1 {
            let first = sorted[0];
            let line = Direction::from_delta((sorted[1].row - first.row, sorted[1].col - first.col))
                .ok_or(MoveError::MalformedGroup(GroupError::NotInLine))?;
            for (i, cell) in sorted.iter().enumerate().skip(2) {
                let (dr, dc) = line.delta();
                let expected = Cell::new(first.row + dr * i as i8, first.col + dc * i as i8);
                if *cell != expected {
                    return Err(MoveError::MalformedGroup(GroupError::NotInLine));
                }
            }
        }

        // Unused slots repeat the last cell so equality only sees the set
        let last = cells[marbles.len() - 1];
        for slot in cells.iter_mut().skip(marbles.len()) {
            *slot = last;
        }

        Ok(Self {
            cells,
            len: marbles.len() as u8,
            direction,
        })
    }

    /// Build from a raw (row, column) direction vector
    pub fn from_delta(marbles: &[Cell], delta: (i8, i8)) -> Result<Self, MoveError> {
        let direction = Direction::from_delta(delta).ok_or(MoveError::IllegalDirection(delta))?;
        Self::new(marbles, direction)
    }

    /// Marbles in (row, column) order
    pub fn marbles(&self) -> &[Cell] {
        &self.cells[..self.len as usize]
    }

    pub fn count(&self) -> usize {
        self.len as usize
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Line the group lies on; `None` for a single marble
    pub fn axis(&self) -> Option<Axis> {
        if self.len < 2 {
            return None;
        }
        let (a, b) = (self.cells[0], self.cells[1]);
        Direction::from_delta((b.row - a.row, b.col - a.col)).map(Direction::axis)
    }

    pub fn is_inline(&self) -> bool {
        self.axis().map_or(true, |axis| axis == self.direction.axis())
    }

    pub fn kind(&self) -> MoveKind {
        match (self.len, self.is_inline()) {
            (1, _) => MoveKind::SingleInline,
            (2, true) => MoveKind::DoubleInline,
            (2, false) => MoveKind::DoubleBroadside,
            (_, true) => MoveKind::TripleInline,
            (_, false) => MoveKind::TripleBroadside,
        }
    }

    /// Marble furthest along the direction of travel
    pub fn leading(&self) -> Cell {
        let d = self.direction;
        self.marbles()
            .iter()
            .copied()
            .max_by_key(|c| c.projection(d))
            .unwrap_or(self.cells[0])
    }

    /// Marble furthest behind the direction of travel
    pub fn trailing(&self) -> Cell {
        let d = self.direction;
        self.marbles()
            .iter()
            .copied()
            .min_by_key(|c| c.projection(d))
            .unwrap_or(self.cells[0])
    }

    /// Text form, with `*` appended when the move pushed an opponent marble
    pub fn notation(&self, pushed: bool) -> String {
        let marker = if pushed { "*" } else { "" };
        format!("{self}{marker}")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_inline() {
            let goal = self.leading().offset(self.direction);
            write!(f, "{}:{}{}", self.len, self.trailing(), goal)
        } else {
            let marbles = self.marbles();
            write!(
                f,
                "{}:{}-{}>{}",
                self.len,
                marbles[0],
                marbles[marbles.len() - 1],
                self.direction
            )
        }
    }
}

// ============================================================================
// NOTATION PARSING
// ============================================================================

/// Error parsing or resolving move notation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("malformed notation '{0}'")]
    Syntax(String),

    #[error(transparent)]
    Cell(#[from] CellParseError),

    #[error("unknown direction '{0}'")]
    Direction(String),

    #[error("'{0}' does not describe a group and direction")]
    Shape(String),

    #[error("'{notation}' is not legal here: {source}")]
    Illegal {
        notation: String,
        #[source]
        source: MoveError,
    },
}

impl FromStr for Move {
    type Err = NotationError;

    /// Parse notation back into a move. The push marker is accepted and ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().trim_end_matches('*');
        let syntax = || NotationError::Syntax(s.to_string());
        let shape = || NotationError::Shape(s.to_string());

        let (count, body) = text.split_once(':').ok_or_else(syntax)?;
        let count: i8 = count.parse().map_err(|_| syntax())?;
        if !(1..=MAX_GROUP as i8).contains(&count) {
            return Err(shape());
        }

        if let Some((ends, dir)) = body.split_once('>') {
            // Broadside: first-last>DIR
            let direction: Direction = dir.parse().map_err(|e: DirectionParseError| NotationError::Direction(e.0))?;
            let (first, last) = ends.split_once('-').ok_or_else(syntax)?;
            let first: Cell = first.parse()?;
            let last: Cell = last.parse()?;
            let marbles = line_between(first, last, count).ok_or_else(shape)?;
            let mv = Move::new(&marbles, direction).map_err(|_| shape())?;
            if mv.is_inline() {
                return Err(shape());
            }
            Ok(mv)
        } else {
            // Inline: trailing cell then goal cell, two characters each
            if body.len() != 4 || !body.is_ascii() {
                return Err(syntax());
            }
            let trailing: Cell = body[..2].parse()?;
            let goal = parse_any_cell(&body[2..]).ok_or_else(syntax)?;
            let (dr, dc) = (goal.row - trailing.row, goal.col - trailing.col);
            if dr % count != 0 || dc % count != 0 {
                return Err(shape());
            }
            let direction = Direction::from_delta((dr / count, dc / count)).ok_or_else(shape)?;
            let (sr, sc) = direction.delta();
            let marbles: Vec<Cell> = (0..count)
                .map(|i| Cell::new(trailing.row + sr * i, trailing.col + sc * i))
                .collect();
            Move::new(&marbles, direction).map_err(|_| shape())
        }
    }
}

/// Goal cell of an inline move. It may lie off the hexagon, so only the
/// letter/digit syntax is checked here.
fn parse_any_cell(s: &str) -> Option<Cell> {
    let bytes = s.as_bytes();
    let letter = bytes.first()?.to_ascii_lowercase();
    let row = crate::board::ROW_LETTERS.iter().position(|&l| l == letter)?;
    let col = (*bytes.get(1)? as char).to_digit(10)?;
    Some(Cell::new(row as i8, col as i8))
}

fn line_between(first: Cell, last: Cell, count: i8) -> Option<Vec<Cell>> {
    if count == 1 {
        return (first == last).then(|| vec![first]);
    }
    let steps = count - 1;
    let (dr, dc) = (last.row - first.row, last.col - first.col);
    if dr % steps != 0 || dc % steps != 0 {
        return None;
    }
    let (sr, sc) = Direction::from_delta((dr / steps, dc / steps))?.delta();
    Some((0..count).map(|i| Cell::new(first.row + sr * i, first.col + sc * i)).collect())
}

/// Identify the legal move `notation` describes in `position`
pub fn resolve(position: &Position, player: Player, notation: &str) -> Result<Move, NotationError> {
    let mv: Move = notation.parse()?;
    check(position, mv, player).map_err(|source| NotationError::Illegal {
        notation: notation.to_string(),
        source,
    })?;
    Ok(mv)
}

// ============================================================================
// SERDE
// ============================================================================

/// Wire form: `{"marbles": ["a1", "a2"], "direction": "NE"}`
#[derive(Serialize, Deserialize)]
struct MoveRepr {
    marbles: Vec<Cell>,
    direction: Direction,
}

impl From<Move> for MoveRepr {
    fn from(mv: Move) -> Self {
        Self {
            marbles: mv.marbles().to_vec(),
            direction: mv.direction,
        }
    }
}

impl TryFrom<MoveRepr> for Move {
    type Error = MoveError;

    fn try_from(repr: MoveRepr) -> Result<Self, Self::Error> {
        Move::new(&repr.marbles, repr.direction)
    }
}
