//! Deterministic snapshot generation for demos, benches and tests.

// Map generation uses intentional casts for coordinate/RNG operations
#![allow(clippy::cast_possible_truncation)]

use thiserror::Error;

use crate::grid::{Cell, Coord, GameMap, PlayerId, STRENGTH_CAP};
use crate::snapshot::Snapshot;

/// Largest production a generated cell can have.
pub const MAX_PRODUCTION: u8 = 15;

/// Most players a generated map supports.
pub const MAX_PLAYERS: usize = 8;

/// Deterministic PRNG using xorshift64.
#[derive(Debug, Clone, Copy)]
struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed.
    const fn new(seed: u64) -> Self {
        // Ensure non-zero state
        let state = if seed == 0 { 0x5555_5555_5555_5555 } else { seed };
        Self { state }
    }

    /// Generate next random u64.
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate random u32 in [0, max).
    fn next_u32(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % u64::from(max)) as u32
    }
}

/// Error type for map generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapGenError {
    /// Player count outside `1..=8`.
    #[error("player count {0} out of range (1-{MAX_PLAYERS})")]
    PlayerCount(usize),
    /// Zero-sized map.
    #[error("invalid map dimensions {width}x{height} (must be > 0)")]
    Dimensions {
        /// Requested width.
        width: u16,
        /// Requested height.
        height: u16,
    },
    /// More players than cells.
    #[error("{players} players do not fit on a {cells}-cell map")]
    TooSmall {
        /// Requested player count.
        players: usize,
        /// Cells available.
        cells: usize,
    },
}

/// Generate a map with one starting cell per player.
///
/// Productions are smoothed noise in `1..=MAX_PRODUCTION`; unowned strength
/// grows with production. Each player starts with a single cell at the
/// strength cap, spread along the grid's diagonal. The snapshot is taken from
/// player 1's point of view.
///
/// # Errors
///
/// Returns an error if dimensions are zero or the player count is invalid.
pub fn generate_snapshot(
    seed: u64,
    width: u16,
    height: u16,
    num_players: usize,
) -> Result<Snapshot, MapGenError> {
    if num_players == 0 || num_players > MAX_PLAYERS {
        return Err(MapGenError::PlayerCount(num_players));
    }
    if width == 0 || height == 0 {
        return Err(MapGenError::Dimensions { width, height });
    }
    let total = usize::from(width) * usize::from(height);
    if num_players > total {
        return Err(MapGenError::TooSmall {
            players: num_players,
            cells: total,
        });
    }

    let mut rng = Rng::new(seed);
    let productions = generate_productions(width, height, &mut rng);

    let mut cells: Vec<Cell> = productions
        .iter()
        .map(|&production| {
            let strength = u32::from(production) * 8 + rng.next_u32(40);
            Cell::unowned(strength.min(u32::from(STRENGTH_CAP)) as u8, production)
        })
        .collect();

    for (idx, coord) in starting_positions(width, height, num_players, &mut rng)
        .into_iter()
        .enumerate()
    {
        let slot = usize::from(coord.y) * usize::from(width) + usize::from(coord.x);
        let player = (idx + 1) as PlayerId;
        cells[slot] = Cell::owned(player, STRENGTH_CAP, cells[slot].production);
    }

    Ok(Snapshot {
        width,
        height,
        player: 1,
        cells,
    })
}

/// Generate a map directly.
///
/// # Errors
///
/// Same as [`generate_snapshot`].
pub fn generate_map(
    seed: u64,
    width: u16,
    height: u16,
    num_players: usize,
) -> Result<GameMap, MapGenError> {
    let snapshot = generate_snapshot(seed, width, height, num_players)?;
    // Dimensions were checked above, so the cell count always matches.
    snapshot
        .to_map()
        .map_err(|_| MapGenError::Dimensions { width, height })
}

/// Noise averaged over each cell and its four wrapped neighbors.
fn generate_productions(width: u16, height: u16, rng: &mut Rng) -> Vec<u8> {
    let (w, h) = (usize::from(width), usize::from(height));
    let raw: Vec<u32> = (0..w * h)
        .map(|_| 1 + rng.next_u32(u32::from(MAX_PRODUCTION)))
        .collect();

    (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .map(|(x, y)| {
            let sum = raw[y * w + x]
                + raw[y * w + (x + 1) % w]
                + raw[y * w + (x + w - 1) % w]
                + raw[((y + 1) % h) * w + x]
                + raw[((y + h - 1) % h) * w + x];
            (sum / 5).clamp(1, u32::from(MAX_PRODUCTION)) as u8
        })
        .collect()
}

/// Evenly spaced cells along the diagonal with a random rotation.
fn starting_positions(width: u16, height: u16, num_players: usize, rng: &mut Rng) -> Vec<Coord> {
    let total = usize::from(width) * usize::from(height);
    let offset = rng.next_u32(total as u32) as usize;
    let mut positions: Vec<Coord> = Vec::with_capacity(num_players);

    for i in 0..num_players {
        let mut x = ((offset + i * usize::from(width) / num_players) % usize::from(width)) as u16;
        let mut y = ((offset / usize::from(width) + i * usize::from(height) / num_players)
            % usize::from(height)) as u16;

        // Walk forward in scan order until a free cell turns up.
        while positions.contains(&Coord::new(x, y)) {
            x += 1;
            if x == width {
                x = 0;
                y = (y + 1) % height;
            }
        }
        positions.push(Coord::new(x, y));
    }

    positions
}
