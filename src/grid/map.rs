//! Map and cell types.

use serde::{Deserialize, Serialize};

use crate::error::{FlowError, FlowResult};
use crate::grid::Direction;

/// Identifier the game server assigns to a player (1-based).
pub type PlayerId = u8;

/// Strength never exceeds this value.
pub const STRENGTH_CAP: u8 = 255;

/// A coordinate on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// State of a single cell for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Owner of this cell (None = unowned).
    #[serde(default)]
    pub owner: Option<PlayerId>,
    /// Strength stationed on this cell.
    #[serde(default)]
    pub strength: u8,
    /// Strength gained per turn when the cell stays still.
    #[serde(default)]
    pub production: u8,
}

impl Cell {
    /// Create an unowned cell.
    #[must_use]
    pub const fn unowned(strength: u8, production: u8) -> Self {
        Self {
            owner: None,
            strength,
            production,
        }
    }

    /// Create a cell owned by `player`.
    #[must_use]
    pub const fn owned(player: PlayerId, strength: u8, production: u8) -> Self {
        Self {
            owner: Some(player),
            strength,
            production,
        }
    }

    /// Check whether `player` owns this cell.
    #[must_use]
    #[inline]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }
}

/// Snapshot of the whole toroidal board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMap {
    /// Width of the map in cells.
    width: u16,
    /// Height of the map in cells.
    height: u16,
    /// Cells stored in row-major order.
    cells: Vec<Cell>,
}

impl GameMap {
    /// Build a map from row-major cells.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::MalformedSnapshot`] if either dimension is zero
    /// or `cells.len() != width * height`.
    pub fn new(width: u16, height: u16, cells: Vec<Cell>) -> FlowResult<Self> {
        if width == 0 || height == 0 || cells.len() != usize::from(width) * usize::from(height) {
            return Err(FlowError::MalformedSnapshot {
                width,
                height,
                cells: cells.len(),
            });
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a map where every cell is `cell`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::MalformedSnapshot`] if either dimension is zero.
    pub fn filled(width: u16, height: u16, cell: Cell) -> FlowResult<Self> {
        let size = usize::from(width) * usize::from(height);
        Self::new(width, height, vec![cell; size])
    }

    /// Get the width of the map.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the height of the map.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a valid map has at least one cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Raw cells in row-major order.
    #[must_use]
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Check if a coordinate is within the map bounds.
    #[must_use]
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Row-major index of an in-bounds coordinate.
    #[must_use]
    pub fn index_of(&self, coord: Coord) -> Option<usize> {
        if self.contains(coord) {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Coordinate for a row-major index.
    ///
    /// The index must be below [`GameMap::len`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn coord_at(&self, idx: usize) -> Coord {
        let width = usize::from(self.width);
        // Both quotients fit in u16 because idx < width * height.
        Coord::new((idx % width) as u16, (idx / width) as u16)
    }

    /// Get a reference to the cell at the given coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.index_of(coord).map(|idx| &self.cells[idx])
    }

    /// The coordinate one step from `coord` in `direction`, wrapping at edges.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Coord {
        let (w, h) = (u32::from(self.width), u32::from(self.height));
        let (x, y) = (u32::from(coord.x) % w, u32::from(coord.y) % h);
        let (nx, ny) = match direction {
            Direction::Still => (x, y),
            Direction::North => (x, (y + h - 1) % h),
            Direction::East => ((x + 1) % w, y),
            Direction::South => (x, (y + 1) % h),
            Direction::West => ((x + w - 1) % w, y),
        };
        Coord::new(nx as u16, ny as u16)
    }

    /// Like [`GameMap::neighbor`] but from a raw wire code.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidDirection`] for codes outside `0..=4`.
    pub fn neighbor_code(&self, coord: Coord, code: u8) -> FlowResult<Coord> {
        Ok(self.neighbor(coord, Direction::from_code(code)?))
    }

    /// Iterate over all coordinates in scan order (row by row).
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Coord::new(x, y)))
    }

    /// Iterate over all coordinates and cells in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (self.coord_at(idx), cell))
    }

    /// Get all cells owned by a specific player.
    pub fn owned_by(&self, player: PlayerId) -> impl Iterator<Item = (Coord, &Cell)> {
        self.iter().filter(move |(_, cell)| cell.is_owned_by(player))
    }

    /// Count cells owned by a player.
    #[must_use]
    pub fn count_owned(&self, player: PlayerId) -> usize {
        self.cells.iter().filter(|cell| cell.is_owned_by(player)).count()
    }

    /// Sum strength across all cells owned by a player.
    #[must_use]
    pub fn total_strength(&self, player: PlayerId) -> u64 {
        self.cells
            .iter()
            .filter(|cell| cell.is_owned_by(player))
            .map(|cell| u64::from(cell.strength))
            .sum()
    }
}
