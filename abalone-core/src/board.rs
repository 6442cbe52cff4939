//! Hex board geometry with lettered rows and numbered columns

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Board radius (distance from center to edge)
pub const BOARD_RADIUS: i8 = 4;

/// Number of addressable cells on the board
pub const CELL_COUNT: usize = 61;

/// Row letters from bottom (a) to top (i)
pub const ROW_LETTERS: &[u8; 9] = b"abcdefghi";

/// Board center, e5
pub const CENTER: Cell = Cell::new(4, 5);

/// Index of the first cell of each row in the packed cell array
const ROW_OFFSETS: [usize; 9] = [0, 5, 11, 18, 26, 35, 43, 50, 56];

// ============================================================================
// PLAYER
// ============================================================================

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    Black = 0,
    White = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => f.write_str("Black"),
            Player::White => f.write_str("White"),
        }
    }
}

// ============================================================================
// DIRECTIONS
// ============================================================================

/// The six unit directions a group may move along
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    E,
    W,
    NW,
    SE,
    NE,
    SW,
}

/// Canonical direction order, used for generation and tie-breaks
pub const DIRECTIONS: [Direction; 6] = [
    Direction::E,
    Direction::W,
    Direction::NW,
    Direction::SE,
    Direction::NE,
    Direction::SW,
];

/// The three lines a group can lie on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    EastWest,
    NorthWestSouthEast,
    NorthEastSouthWest,
}

impl Direction {
    /// (row delta, column delta)
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::E => (0, 1),
            Direction::W => (0, -1),
            Direction::NW => (1, 0),
            Direction::SE => (-1, 0),
            Direction::NE => (1, 1),
            Direction::SW => (-1, -1),
        }
    }

    pub fn from_delta(delta: (i8, i8)) -> Option<Direction> {
        DIRECTIONS.into_iter().find(|d| d.delta() == delta)
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::E => Direction::W,
            Direction::W => Direction::E,
            Direction::NW => Direction::SE,
            Direction::SE => Direction::NW,
            Direction::NE => Direction::SW,
            Direction::SW => Direction::NE,
        }
    }

    pub const fn axis(self) -> Axis {
        match self {
            Direction::E | Direction::W => Axis::EastWest,
            Direction::NW | Direction::SE => Axis::NorthWestSouthEast,
            Direction::NE | Direction::SW => Axis::NorthEastSouthWest,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Direction::E => "E",
            Direction::W => "W",
            Direction::NW => "NW",
            Direction::SE => "SE",
            Direction::NE => "NE",
            Direction::SW => "SW",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error parsing a direction name such as `NW`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction '{0}'")]
pub struct DirectionParseError(pub String);

impl FromStr for Direction {
    type Err = DirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DIRECTIONS
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DirectionParseError(s.to_string()))
    }
}

// ============================================================================
// CELL
// ============================================================================

/// Board coordinate: row 0 (a) at the bottom to 8 (i), columns 1 to 9.
///
/// Ordering is row-major, which is also the scan order of a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Cell {
    pub row: i8,
    pub col: i8,
}

impl Cell {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if this cell is on the board
    pub const fn is_valid(&self) -> bool {
        let diagonal = self.col as i16 - self.row as i16;
        self.row >= 0
            && self.row <= 8
            && self.col >= 1
            && self.col <= 9
            && diagonal >= -3
            && diagonal <= 5
    }

    /// Position in the packed 61-cell array, `None` if off the board
    pub(crate) fn index(&self) -> Option<usize> {
        if !self.is_valid() {
            return None;
        }
        let first_col = if self.row <= 4 { 1 } else { self.row - 3 };
        Some(ROW_OFFSETS[self.row as usize] + (self.col - first_col) as usize)
    }

    /// Inverse of [`Cell::index`]
    pub(crate) fn from_index(index: usize) -> Cell {
        let row = ROW_OFFSETS.iter().rposition(|&offset| offset <= index).unwrap_or(0);
        let first_col = if row <= 4 { 1 } else { row as i8 - 3 };
        Cell::new(row as i8, first_col + (index - ROW_OFFSETS[row]) as i8)
    }

    /// Every cell of the board in scan order
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..CELL_COUNT).map(Cell::from_index)
    }

    /// Raw unit step, which may leave the board
    pub const fn offset(&self, direction: Direction) -> Cell {
        let (dr, dc) = direction.delta();
        Cell::new(self.row + dr, self.col + dc)
    }

    /// Neighbor in `direction`, or `None` past the edge
    pub fn step(&self, direction: Direction) -> Option<Cell> {
        let next = self.offset(direction);
        next.is_valid().then_some(next)
    }

    /// Hex distance between two cells
    pub fn distance_to(&self, other: Cell) -> i8 {
        let dr = self.row - other.row;
        let dc = self.col - other.col;
        dr.abs().max(dc.abs()).max((dr - dc).abs())
    }

    /// Distance from e5
    pub fn distance_to_center(&self) -> i8 {
        self.distance_to(CENTER)
    }

    /// Outer ring: a marble here can be pushed off in one step
    pub fn is_edge(&self) -> bool {
        self.distance_to_center() == BOARD_RADIUS
    }

    /// Projection onto a direction; larger values lie further along it
    pub(crate) fn projection(&self, direction: Direction) -> i16 {
        let (dr, dc) = direction.delta();
        self.row as i16 * dr as i16 + self.col as i16 * dc as i16
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match ROW_LETTERS.get(self.row as usize) {
            Some(&letter) if self.row >= 0 => write!(f, "{}{}", letter as char, self.col),
            _ => write!(f, "({},{})", self.row, self.col),
        }
    }
}

/// Error parsing a cell name such as `e5`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid cell '{0}'")]
pub struct CellParseError(pub String);

impl FromStr for Cell {
    type Err = CellParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let err = || CellParseError(s.to_string());
        if bytes.len() != 2 {
            return Err(err());
        }
        let row = ROW_LETTERS
            .iter()
            .position(|&l| l == bytes[0].to_ascii_lowercase())
            .ok_or_else(err)?;
        let col = (bytes[1] as char).to_digit(10).ok_or_else(err)?;
        let cell = Cell::new(row as i8, col as i8);
        if cell.is_valid() {
            Ok(cell)
        } else {
            Err(err())
        }
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        cell.to_string()
    }
}

impl TryFrom<String> for Cell {
    type Error = CellParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
