//! Aero Dash - an endless side-scrolling obstacle dodger
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, spawning, collision, scoring)
//! - `tuning`: Data-driven game balance
//!
//! The simulation is a pure state machine: given a seed and a sequence of
//! per-tick inputs it produces the same world every time. Rendering, input
//! and the DOM modal live in the shell binary and only ever see the
//! read-only [`sim::RenderSnapshot`].

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Shell-level constants shared between the wasm and native entry points.
pub mod consts {
    /// Assumed tick cadence. All tuning values are per-tick deltas; the
    /// shell calls `tick` once per display refresh and must not change that
    /// cadence without rescaling the tuning.
    pub const ASSUMED_TICK_HZ: u32 = 60;

    /// Fallback viewport used when the host cannot report a size.
    pub const FALLBACK_VIEWPORT: (f32, f32) = (1280.0, 720.0);
}
