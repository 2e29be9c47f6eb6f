//! Read-only per-frame view for the presentation layer
//!
//! The core never draws. Each frame the shell asks the world for a
//! [`RenderSnapshot`] and blits it however it likes; nothing in here can
//! mutate the simulation.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{GamePhase, GameState};

/// Which image the shell should blit for a given rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKey {
    Airplane,
    Obstacle,
    /// Shown in place of the airplane on the death frame
    Explosion,
}

/// A rect tagged with the sprite to draw in it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpriteRect {
    pub rect: Rect,
    pub sprite: SpriteKey,
}

/// Everything the shell needs to draw one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    /// Score as shown in the HUD
    pub score: u64,
    pub ground: Rect,
    pub character: SpriteRect,
    pub obstacles: Vec<SpriteRect>,
}

impl GameState {
    /// Build the current frame's read-only view.
    pub fn snapshot(&self) -> RenderSnapshot {
        let sprite = if self.character.alive {
            SpriteKey::Airplane
        } else {
            SpriteKey::Explosion
        };
        RenderSnapshot {
            phase: self.phase,
            score: self.display_score(),
            ground: self.ground.rect,
            character: SpriteRect {
                rect: self.character.rect,
                sprite,
            },
            obstacles: self
                .obstacles
                .iter()
                .map(|o| SpriteRect {
                    rect: o.rect,
                    sprite: SpriteKey::Obstacle,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;

    #[test]
    fn test_snapshot_mirrors_state() {
        let tuning = Tuning::default();
        let state = GameState::new(5, Viewport::new(1280.0, 720.0), &tuning);
        let snap = state.snapshot();

        assert_eq!(snap.phase, GamePhase::Running);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.character.sprite, SpriteKey::Airplane);
        assert_eq!(snap.character.rect, state.character.rect);
        assert_eq!(snap.ground, state.ground.rect);
        assert!(snap.obstacles.is_empty());
    }

    #[test]
    fn test_dead_character_renders_explosion() {
        let tuning = Tuning::default();
        let mut state = GameState::new(5, Viewport::new(1280.0, 720.0), &tuning);
        state.character.alive = false;
        state.phase = GamePhase::GameOver;

        let snap = state.snapshot();
        assert_eq!(snap.character.sprite, SpriteKey::Explosion);
        assert_eq!(snap.phase, GamePhase::GameOver);
    }
}
