//! Game state and core simulation types
//!
//! All state needed to reproduce a run lives here: the full world is a
//! function of (seed, viewport, input sequence).

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Character hit an obstacle; simulation is frozen until reset
    GameOver,
}

/// One-shot notifications for the presentation layer, drained per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Emitted exactly once per death, with the final display score.
    GameOver { score: u64 },
    /// Scroll speed went up a stage (every `speed_up_every` points).
    SpeedUp { stage: u32 },
}

/// The player's airplane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub rect: Rect,
    /// Velocity in px/tick; y grows downward
    pub vel: glam::Vec2,
    /// Set on jump, cleared when the character lands
    pub jumping: bool,
    pub alive: bool,
}

impl Character {
    /// Spawn at the start column, resting on the ground.
    pub fn spawn(ground: &Ground, tuning: &Tuning) -> Self {
        Self {
            rect: Rect::new(
                tuning.char_start_x,
                ground.rect.top() - tuning.char_height,
                tuning.char_width,
                tuning.char_height,
            ),
            vel: glam::Vec2::ZERO,
            jumping: false,
            alive: true,
        }
    }
}

/// A scrolling obstacle. No velocity of its own: every obstacle moves left
/// at the shared scroll speed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub rect: Rect,
}

/// Fixed strip at the bottom of the viewport. Reference line only, never
/// moves during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ground {
    pub rect: Rect,
}

impl Ground {
    pub fn for_viewport(viewport: Viewport, tuning: &Tuning) -> Self {
        let top = (viewport.height - tuning.ground_thickness).max(0.0);
        Self {
            rect: Rect::new(0.0, top, viewport.width, tuning.ground_thickness),
        }
    }
}

/// World dimensions as reported by the host. Degenerate sizes are clamped
/// so resize events can never produce invalid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }
}

/// Complete world state (deterministic, serializable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation RNG; advanced only by the obstacle spawner
    pub rng: Pcg32,
    /// Tick counter
    pub frame: u64,
    /// Raw score; the display score is its floor
    pub score: f64,
    /// Scroll speed stages gained so far (scroll speed = base + bonus)
    pub speed_bonus: u32,
    /// Tick index after which the next obstacle spawns
    pub next_obstacle_frame: u64,
    pub phase: GamePhase,
    pub character: Character,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub ground: Ground,
    pub viewport: Viewport,
    /// Pending notifications for the shell (not part of the replayable state)
    #[serde(skip)]
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create the initial world for the given seed and viewport.
    pub fn new(seed: u64, viewport: Viewport, tuning: &Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let (min_gap, max_gap) = tuning.obstacle_gap_bounds();
        // First obstacle gets an extra delay so the run never opens with an
        // immediate wall.
        let next_obstacle_frame = rng.random_range(min_gap..=max_gap) + tuning.first_spawn_delay;
        let ground = Ground::for_viewport(viewport, tuning);
        let character = Character::spawn(&ground, tuning);

        Self {
            seed,
            rng,
            frame: 0,
            score: 0.0,
            speed_bonus: 0,
            next_obstacle_frame,
            phase: GamePhase::Running,
            character,
            obstacles: Vec::new(),
            ground,
            viewport,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Reinitialize to the documented initial values (GameOver -> Running).
    /// Re-derives the same run from the stored seed and current viewport,
    /// so harnesses can replay a run exactly.
    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(self.seed, self.viewport, tuning);
    }

    /// Start a fresh run with a new seed (GameOver -> Running). Same initial
    /// values as [`reset`](Self::reset), but a new obstacle sequence.
    pub fn restart(&mut self, seed: u64, tuning: &Tuning) {
        *self = Self::new(seed, self.viewport, tuning);
    }

    /// Recompute ground and character geometry for a new viewport size.
    /// The character is snapped back onto the new ground line, even
    /// mid-jump, and re-clamped horizontally.
    pub fn resize(&mut self, viewport: Viewport, tuning: &Tuning) {
        self.viewport = viewport;
        self.ground = Ground::for_viewport(viewport, tuning);
        self.character.rect.pos.y = self.ground.rect.top() - self.character.rect.size.y;
        let max_x = (viewport.width - self.character.rect.size.x).max(0.0);
        self.character.rect.pos.x = self.character.rect.pos.x.clamp(0.0, max_x);
    }

    /// Current obstacle scroll speed in px/tick.
    pub fn scroll_speed(&self, tuning: &Tuning) -> f32 {
        tuning.speed + self.speed_bonus as f32
    }

    /// Score as shown to the player.
    pub fn display_score(&self) -> u64 {
        self.score.floor() as u64
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Allocate a new obstacle ID.
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain pending events. The shell calls this once per frame.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
