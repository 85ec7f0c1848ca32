//! Movement directions.

use serde::{Deserialize, Serialize};

use crate::error::{FlowError, FlowResult};

/// One of the five legal moves for a cell.
///
/// Discriminants are the wire codes used by the game server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Direction {
    /// Stay in place and accumulate production.
    Still = 0,
    /// Toward `y - 1`.
    North = 1,
    /// Toward `x + 1`.
    East = 2,
    /// Toward `y + 1`.
    South = 3,
    /// Toward `x - 1`.
    West = 4,
}

impl Direction {
    /// The four cardinals in the order the flow field tries them.
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Decode a wire code.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidDirection`] for codes outside `0..=4`.
    pub const fn from_code(code: u8) -> FlowResult<Self> {
        match code {
            0 => Ok(Direction::Still),
            1 => Ok(Direction::North),
            2 => Ok(Direction::East),
            3 => Ok(Direction::South),
            4 => Ok(Direction::West),
            other => Err(FlowError::InvalidDirection(other)),
        }
    }

    /// Wire code for this direction.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// The direction pointing back the way this one came.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Still => Direction::Still,
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Whether this is a movement rather than [`Direction::Still`].
    #[must_use]
    pub const fn is_cardinal(self) -> bool {
        !matches!(self, Direction::Still)
    }
}

impl TryFrom<u8> for Direction {
    type Error = FlowError;

    fn try_from(code: u8) -> FlowResult<Self> {
        Self::from_code(code)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Still => "still",
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite() {
        assert_eq!(Direction::Still.opposite(), Direction::Still);
        assert_eq!(Direction::North.opposite(), Direction::South);
        assert_eq!(Direction::South.opposite(), Direction::North);
        assert_eq!(Direction::East.opposite(), Direction::West);
        assert_eq!(Direction::West.opposite(), Direction::East);
        for d in Direction::CARDINALS {
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn test_codes() {
        for code in 0..=4u8 {
            let d = Direction::from_code(code).unwrap();
            assert_eq!(d.code(), code);
        }
        assert_eq!(Direction::from_code(5), Err(FlowError::InvalidDirection(5)));
        assert_eq!(
            Direction::try_from(255u8),
            Err(FlowError::InvalidDirection(255))
        );
    }

    #[test]
    fn test_cardinal_order() {
        assert_eq!(
            Direction::CARDINALS,
            [
                Direction::North,
                Direction::East,
                Direction::South,
                Direction::West
            ]
        );
        assert!(!Direction::Still.is_cardinal());
        assert!(Direction::CARDINALS.iter().all(|d| d.is_cardinal()));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Direction::North).unwrap();
        assert_eq!(json, "\"north\"");
        let back: Direction = serde_json::from_str("\"west\"").unwrap();
        assert_eq!(back, Direction::West);
    }
}
