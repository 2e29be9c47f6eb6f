//! Data-driven game balance
//!
//! Every gameplay constant lives here so the simulation itself carries no
//! magic numbers. All motion values are per-tick deltas tuned for a ~60 Hz
//! refresh callback, not per-second rates.

use serde::{Deserialize, Serialize};

/// Gameplay balance values.
///
/// `speed` doubles as the character's horizontal speed and the base
/// obstacle scroll speed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Character horizontal speed and base scroll speed (px/tick)
    pub speed: f32,
    /// Downward acceleration while airborne (px/tick², y grows downward)
    pub gravity: f32,
    /// Vertical velocity applied on jump (negative = up)
    pub jump_power: f32,

    /// Character sprite size
    pub char_width: f32,
    pub char_height: f32,
    /// Character spawn x
    pub char_start_x: f32,

    /// Height of the ground strip at the bottom of the viewport
    pub ground_thickness: f32,

    /// Obstacle width range (closed interval)
    pub min_obstacle_width: f32,
    pub max_obstacle_width: f32,
    /// Obstacle height range (closed interval; see `obstacle_height_bounds`)
    pub min_obstacle_height: f32,
    pub max_obstacle_height: f32,

    /// Spawn gap range in ticks (closed interval)
    pub min_obstacle_gap: u64,
    pub max_obstacle_gap: u64,
    /// Extra ticks added to the very first spawn gap
    pub first_spawn_delay: u64,

    /// Score gained per tick while alive
    pub score_per_tick: f64,
    /// Scroll speed rises by one every this many display-score points
    pub speed_up_every: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            speed: 5.0,
            gravity: 0.5,
            jump_power: -22.0,

            char_width: 200.0,
            char_height: 100.0,
            char_start_x: 50.0,

            ground_thickness: 10.0,

            min_obstacle_width: 100.0,
            max_obstacle_width: 200.0,
            min_obstacle_height: 250.0,
            max_obstacle_height: 350.0,

            min_obstacle_gap: 200,
            max_obstacle_gap: 400,
            first_spawn_delay: 50,

            score_per_tick: 0.01,
            speed_up_every: 50,
        }
    }
}

impl Tuning {
    /// Obstacle width bounds as an ordered closed interval.
    pub fn obstacle_width_bounds(&self) -> (f32, f32) {
        ordered(self.min_obstacle_width, self.max_obstacle_width)
    }

    /// Obstacle height bounds as an ordered closed interval. A config that
    /// declares min and max swapped samples the same interval.
    pub fn obstacle_height_bounds(&self) -> (f32, f32) {
        ordered(self.min_obstacle_height, self.max_obstacle_height)
    }

    /// Spawn gap bounds in ticks as an ordered closed interval.
    pub fn obstacle_gap_bounds(&self) -> (u64, u64) {
        if self.min_obstacle_gap <= self.max_obstacle_gap {
            (self.min_obstacle_gap, self.max_obstacle_gap)
        } else {
            (self.max_obstacle_gap, self.min_obstacle_gap)
        }
    }

    /// Clamp degenerate values to something the simulation can run with.
    /// Zero or negative sizes would produce geometry that can never collide
    /// or never leave the screen.
    pub fn validated(mut self) -> Self {
        const MIN_SIZE: f32 = 1.0;
        self.char_width = self.char_width.max(MIN_SIZE);
        self.char_height = self.char_height.max(MIN_SIZE);
        self.ground_thickness = self.ground_thickness.max(0.0);
        self.min_obstacle_width = self.min_obstacle_width.max(MIN_SIZE);
        self.max_obstacle_width = self.max_obstacle_width.max(MIN_SIZE);
        self.min_obstacle_height = self.min_obstacle_height.max(MIN_SIZE);
        self.max_obstacle_height = self.max_obstacle_height.max(MIN_SIZE);
        self.speed = self.speed.max(0.0);
        self.gravity = self.gravity.max(0.0);
        self.score_per_tick = self.score_per_tick.max(0.0);
        self.speed_up_every = self.speed_up_every.max(1);
        self
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b { (a, b) } else { (b, a) }
}
