//! Domain types: bars and directional intent.

pub mod bar;
pub mod direction;

pub use bar::Bar;
pub use direction::Direction;
