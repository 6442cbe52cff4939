//! Board snapshot and starting layouts

use crate::board::{Cell, Player, CELL_COUNT, ROW_LETTERS};
use crate::rules::MoveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marbles each side starts with
pub const MARBLES_PER_SIDE: u8 = 14;

/// Captures needed to win
pub const CAPTURES_TO_WIN: u8 = 6;

// ============================================================================
// LAYOUTS
// ============================================================================

/// Named starting layout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Standard,
    BelgianDaisy,
    GermanDaisy,
}

type Setup = [(i8, i8); 14];

const STANDARD_BLACK: Setup = [
    (0, 1), (0, 2), (0, 3), (0, 4), (0, 5),
    (1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (1, 6),
    (2, 3), (2, 4), (2, 5),
];

const STANDARD_WHITE: Setup = [
    (6, 5), (6, 6), (6, 7),
    (7, 4), (7, 5), (7, 6), (7, 7), (7, 8), (7, 9),
    (8, 5), (8, 6), (8, 7), (8, 8), (8, 9),
];

const BELGIAN_DAISY_BLACK: Setup = [
    (0, 1), (0, 2), (1, 1), (1, 2), (1, 3), (2, 1), (2, 2),
    (6, 8), (6, 9), (7, 7), (7, 8), (7, 9), (8, 8), (8, 9),
];

const BELGIAN_DAISY_WHITE: Setup = [
    (0, 4), (0, 5), (1, 4), (1, 5), (1, 6), (2, 6), (2, 7),
    (6, 3), (6, 4), (7, 4), (7, 5), (7, 6), (8, 5), (8, 6),
];

const GERMAN_DAISY_BLACK: Setup = [
    (1, 1), (1, 2), (2, 1), (2, 2), (2, 3), (3, 1), (3, 2),
    (5, 8), (5, 9), (6, 7), (6, 8), (6, 9), (7, 8), (7, 9),
];

const GERMAN_DAISY_WHITE: Setup = [
    (1, 5), (1, 6), (2, 5), (2, 6), (2, 7), (3, 7), (3, 8),
    (5, 2), (5, 3), (6, 3), (6, 4), (6, 5), (7, 4), (7, 5),
];

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::Standard, Layout::BelgianDaisy, Layout::GermanDaisy];

    pub fn name(self) -> &'static str {
        match self {
            Layout::Standard => "standard",
            Layout::BelgianDaisy => "belgian_daisy",
            Layout::GermanDaisy => "german_daisy",
        }
    }

    fn setup(self) -> (&'static Setup, &'static Setup) {
        match self {
            Layout::Standard => (&STANDARD_BLACK, &STANDARD_WHITE),
            Layout::BelgianDaisy => (&BELGIAN_DAISY_BLACK, &BELGIAN_DAISY_WHITE),
            Layout::GermanDaisy => (&GERMAN_DAISY_BLACK, &GERMAN_DAISY_WHITE),
        }
    }
}

/// Unknown layout name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown layout: {0}")]
pub struct UnknownLayout(pub String);

impl FromStr for Layout {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Layout::ALL
            .into_iter()
            .find(|layout| layout.name() == wanted)
            .ok_or_else(|| UnknownLayout(s.to_string()))
    }
}

// ============================================================================
// POSITION
// ============================================================================

/// Board snapshot: occupant of each of the 61 cells plus capture counts.
///
/// `Copy`, so search branches get independent values for free.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    cells: [Option<Player>; CELL_COUNT],
    /// Opponent marbles pushed off by each side, indexed by `Player`
    captured: [u8; 2],
}

impl Default for Position {
    fn default() -> Self {
        Self::empty()
    }
}

impl Position {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    pub const fn empty() -> Self {
        Self {
            cells: [None; CELL_COUNT],
            captured: [0, 0],
        }
    }

    pub fn standard() -> Self {
        Self::from_layout(Layout::Standard)
    }

    pub fn from_layout(layout: Layout) -> Self {
        let (black, white) = layout.setup();
        let to_cells = |setup: &Setup| setup.map(|(r, c)| Cell::new(r, c));
        Self::from_marbles(&to_cells(black), &to_cells(white))
    }

    /// Build a position from explicit marble lists.
    ///
    /// Panics on an off-board cell or more than 14 marbles per side.
    pub fn from_marbles(black: &[Cell], white: &[Cell]) -> Self {
        let mut position = Self::empty();
        for &cell in black {
            position.set(cell, Some(Player::Black));
        }
        for &cell in white {
            position.set(cell, Some(Player::White));
        }
        position.assert_invariants();
        position
    }

    /// Same marbles, with capture counts set
    pub fn with_captured(mut self, black: u8, white: u8) -> Self {
        self.captured = [black, white];
        self.assert_invariants();
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Occupant of an on-board cell
    pub fn get(&self, cell: Cell) -> Result<Option<Player>, MoveError> {
        cell.index()
            .map(|i| self.cells[i])
            .ok_or(MoveError::OutOfBounds(cell))
    }

    /// Occupant, treating off-board cells as empty
    pub fn occupant(&self, cell: Cell) -> Option<Player> {
        cell.index().and_then(|i| self.cells[i])
    }

    pub fn is_empty(&self, cell: Cell) -> bool {
        cell.is_valid() && self.occupant(cell).is_none()
    }

    /// Place or clear a marble. Panics if `cell` is off the board.
    pub fn set(&mut self, cell: Cell, occupant: Option<Player>) {
        let index = cell
            .index()
            .unwrap_or_else(|| panic!("write to off-board cell {cell}"));
        self.cells[index] = occupant;
    }

    /// Marbles of `player` in scan order (row, then column)
    pub fn marbles(&self, player: Player) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, occupant)| **occupant == Some(player))
            .map(|(i, _)| Cell::from_index(i))
    }

    pub fn marble_count(&self, player: Player) -> usize {
        self.cells.iter().filter(|o| **o == Some(player)).count()
    }

    /// Opponent marbles `player` has pushed off
    pub fn captured(&self, player: Player) -> u8 {
        self.captured[player.index()]
    }

    pub(crate) fn record_capture(&mut self, player: Player) {
        self.captured[player.index()] += 1;
        self.assert_invariants();
    }

    /// First side to reach six captures
    pub fn winner(&self) -> Option<Player> {
        [Player::Black, Player::White]
            .into_iter()
            .find(|&p| self.captured(p) >= CAPTURES_TO_WIN)
    }

    /// Panics when the position has left the legal data model
    fn assert_invariants(&self) {
        for player in [Player::Black, Player::White] {
            let on_board = self.marble_count(player);
            assert!(
                on_board <= MARBLES_PER_SIDE as usize,
                "{player} has {on_board} marbles on the board"
            );
            assert!(
                self.captured(player) <= MARBLES_PER_SIDE,
                "{player} capture count {} out of range",
                self.captured(player)
            );
        }
    }
}

impl fmt::Display for Position {
    /// Hexagonal ASCII rendering, `@` black and `O` white, top row first
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..9i8).rev() {
            let indent = (row - 4).unsigned_abs() as usize;
            write!(f, "{}{} ", " ".repeat(indent), ROW_LETTERS[row as usize] as char)?;
            let cols = if row <= 4 { 1..=5 + row } else { row - 3..=9 };
            for col in cols {
                let symbol = match self.occupant(Cell::new(row, col)) {
                    Some(Player::Black) => '@',
                    Some(Player::White) => 'O',
                    None => '.',
                };
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "captured: black {} white {}",
            self.captured(Player::Black),
            self.captured(Player::White)
        )
    }
}
