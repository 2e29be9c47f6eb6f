//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display refresh callback, constants are per-tick deltas
//! - Seeded RNG only
//! - Stable obstacle order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::hit_any;
pub use rect::Rect;
pub use snapshot::{RenderSnapshot, SpriteKey, SpriteRect};
pub use state::{Character, GameEvent, GamePhase, GameState, Ground, Obstacle, Viewport};
pub use tick::{Steer, TickInput, step, tick};
