//! Grid value types.
//!
//! Coordinates, range bounds, tiles, players and the dense ownership
//! view the evaluation pass works on. Nothing in here takes a lock.

mod coord;
mod player;
mod range;
mod tile;
mod view;

pub use coord::{Coord, NEIGHBOR_OFFSETS, parse_number};
pub use player::{Player, PlayerId, Role};
pub use range::{Range, RangeRecord};
pub use tile::Tile;
pub use view::OwnershipGrid;
