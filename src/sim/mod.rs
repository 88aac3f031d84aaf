//! Deterministic game core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time is an input, never read from a clock
//! - Stable iteration order (tiles, cameras and holes in load order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod direction;
pub mod level;
pub mod math;
pub mod player;
pub mod shape;
pub mod state;
pub mod tick;

pub use camera::{Camera, ViewCone};
pub use collision::{circle_hits_polygon, point_in_circle, polygons_overlap};
pub use direction::{Direction, DirectionKeys};
pub use level::{CameraDef, Hole, Level, LevelDef, LevelError, Tile};
pub use math::{Circle, Polygon, lerp, normalize, rotate};
pub use player::{ANIMATE_WALK, Avatar};
pub use shape::{EntityId, IdAllocator, Positioned, Projection, Renderable};
pub use state::{GameEvent, GameStatus, PlayerState};
pub use tick::{GameLogic, InputEvent, TickInput};
