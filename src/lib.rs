//! bumpworld: persistent 2D AABB world with swept moves and collision responses

pub mod types;
pub mod api;
pub mod table;
pub mod narrowphase;
pub mod grid;
pub mod query;
pub mod response;
pub mod world;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::world::World;
