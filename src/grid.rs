//! Grid map model.
//!
//! One immutable snapshot of the toroidal board per turn:
//! - [`Direction`] with wire codes and opposites
//! - [`Coord`] and [`Cell`]
//! - [`GameMap`] with wrap-around neighbor lookup

mod direction;
mod map;

pub use direction::Direction;
pub use map::{Cell, Coord, GameMap, PlayerId, STRENGTH_CAP};
