// src/board.rs
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ConstructionError, ConstructionResult};
use crate::tile::Tile;

/// Side length of the standard board
pub const STANDARD_BOARD_SIZE: usize = 15;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The cell `offset` steps from `origin` along this axis, if it stays within `size`
    pub fn step(self, origin: Position, offset: usize, size: usize) -> Option<Position> {
        let pos = match self {
            Orientation::Horizontal => Position::new(origin.row, origin.col.checked_add(offset)?),
            Orientation::Vertical => Position::new(origin.row.checked_add(offset)?, origin.col),
        };
        (pos.row < size && pos.col < size).then_some(pos)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
        }
    }
}

/// Bonus carried by a board cell until a tile is committed on it
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoardCell {
    #[default]
    None,
    DoubleLetter,
    TripleLetter,
    DoubleWord,
    TripleWord,
}

impl BoardCell {
    pub fn letter_multiplier(self) -> u32 {
        match self {
            BoardCell::DoubleLetter => 2,
            BoardCell::TripleLetter => 3,
            BoardCell::None | BoardCell::DoubleWord | BoardCell::TripleWord => 1,
        }
    }

    pub fn word_multiplier(self) -> u32 {
        match self {
            BoardCell::DoubleWord => 2,
            BoardCell::TripleWord => 3,
            BoardCell::None | BoardCell::DoubleLetter | BoardCell::TripleLetter => 1,
        }
    }
}

// Top-left quadrant of the standard layout; mirrored into the other three.
const STANDARD_QUADRANT: [(usize, usize, BoardCell); 18] = [
    (0, 0, BoardCell::TripleWord),
    (0, 3, BoardCell::DoubleLetter),
    (0, 7, BoardCell::TripleWord),
    (1, 1, BoardCell::DoubleWord),
    (1, 5, BoardCell::TripleLetter),
    (2, 2, BoardCell::DoubleWord),
    (2, 6, BoardCell::DoubleLetter),
    (3, 0, BoardCell::DoubleLetter),
    (3, 3, BoardCell::DoubleWord),
    (3, 7, BoardCell::DoubleLetter),
    (4, 4, BoardCell::DoubleWord),
    (5, 1, BoardCell::TripleLetter),
    (5, 5, BoardCell::TripleLetter),
    (6, 2, BoardCell::DoubleLetter),
    (6, 6, BoardCell::DoubleLetter),
    (7, 0, BoardCell::TripleWord),
    (7, 3, BoardCell::DoubleLetter),
    (7, 7, BoardCell::DoubleWord),
];

/// Mirror top-left quadrant cells across both axes of a board of side `size`.
///
/// Cells on a centre line map onto themselves and appear once. Quadrant cells
/// that do not fit on the board are skipped.
fn mirror_quadrants(
    quadrant: &[(usize, usize, BoardCell)],
    size: usize,
) -> HashMap<Position, BoardCell> {
    let mut cells = HashMap::new();
    for &(row, col, cell) in quadrant {
        if row >= size || col >= size {
            continue;
        }
        let (far_row, far_col) = (size - 1 - row, size - 1 - col);
        for pos in [
            Position::new(row, col),
            Position::new(far_row, col),
            Position::new(row, far_col),
            Position::new(far_row, far_col),
        ] {
            cells.insert(pos, cell);
        }
    }
    cells
}

/// Square grid of tiles plus the bonuses that have not been consumed yet
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    cells: Vec<Tile>,
    bonuses: HashMap<Position, BoardCell>,
}

impl Board {
    /// An unclaimed board of side `size` with the given bonus cells
    pub fn empty(size: usize, bonuses: HashMap<Position, BoardCell>) -> ConstructionResult<Self> {
        Self::from_rows(vec![vec![Tile::empty(); size]; size], bonuses)
    }

    /// The 15x15 board with the standard bonus layout
    pub fn standard() -> Self {
        let size = STANDARD_BOARD_SIZE;
        Self {
            size,
            cells: vec![Tile::empty(); size * size],
            bonuses: mirror_quadrants(&STANDARD_QUADRANT, size),
        }
    }

    /// Build a board from explicit rows.
    ///
    /// Fails if any row's length differs from the number of rows or a bonus
    /// key lies off the board. `BoardCell::None` entries and bonuses under
    /// occupied cells are dropped: they can never apply again.
    pub fn from_rows(
        rows: Vec<Vec<Tile>>,
        bonuses: HashMap<Position, BoardCell>,
    ) -> ConstructionResult<Self> {
        let size = rows.len();
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(ConstructionError::BoardNotSquare {
                row,
                len: cells.len(),
                size,
            });
        }
        if let Some(&position) = bonuses
            .keys()
            .find(|p| p.row >= size || p.col >= size)
        {
            return Err(ConstructionError::BonusOutOfBounds { position, size });
        }

        let cells: Vec<Tile> = rows.into_iter().flatten().collect();
        let bonuses = bonuses
            .into_iter()
            .filter(|(pos, cell)| {
                *cell != BoardCell::None && cells[pos.row * size + pos.col].is_empty()
            })
            .collect();
        Ok(Self {
            size,
            cells,
            bonuses,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Tile at `pos`; `None` off the board
    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.contains(pos)
            .then(|| &self.cells[pos.row * self.size + pos.col])
    }

    /// Whether `pos` still holds the empty sentinel
    pub fn is_unclaimed(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(Tile::is_empty)
    }

    /// Cells covered by `len` tiles laid from `origin`, or `None` if any falls off the board
    pub fn footprint(
        &self,
        origin: Position,
        orientation: Orientation,
        len: usize,
    ) -> Option<Vec<Position>> {
        (0..len)
            .map(|offset| orientation.step(origin, offset, self.size))
            .collect()
    }

    /// Live bonus at `pos`; consumed or plain cells report `BoardCell::None`
    pub fn bonus_at(&self, pos: Position) -> BoardCell {
        self.bonuses.get(&pos).copied().unwrap_or_default()
    }

    /// Remove the bonus at `pos`. Consuming an already-consumed cell is a no-op.
    pub fn consume_bonus(&mut self, pos: Position) -> Option<BoardCell> {
        self.bonuses.remove(&pos)
    }

    pub(crate) fn place(&mut self, pos: Position, tile: Tile) {
        if self.contains(pos) {
            self.cells[pos.row * self.size + pos.col] = tile;
        }
    }

    /// Live bonus cells in row-major order
    pub fn bonus_cells(&self) -> BTreeMap<Position, BoardCell> {
        self.bonuses.iter().map(|(p, c)| (*p, *c)).collect()
    }

    /// Board contents as rows
    pub fn rows(&self) -> Vec<Vec<Tile>> {
        self.cells.chunks(self.size.max(1)).map(<[Tile]>::to_vec).collect()
    }
}
