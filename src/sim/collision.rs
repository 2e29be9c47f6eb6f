//! Character-vs-obstacle collision detection
//!
//! Plain AABB overlap: the character and every obstacle are axis-aligned
//! rects, so a hit is four strict inequalities. No sweep, no sub-stepping;
//! the per-tick velocities are far smaller than any obstacle.

use super::rect::Rect;
use super::state::{Character, Obstacle};

/// Pure overlap test between the character and a single obstacle rect.
#[inline]
pub fn character_hits(character: &Character, obstacle: &Rect) -> bool {
    character.rect.overlaps(obstacle)
}

/// Scan the active obstacles in spawn order and return the ID of the first
/// one the character overlaps, if any.
pub fn hit_any(character: &Character, obstacles: &[Obstacle]) -> Option<u32> {
    obstacles
        .iter()
        .find(|o| character_hits(character, &o.rect))
        .map(|o| o.id)
}
