//! Per-tick simulation step
//!
//! One tick runs to completion in a fixed order: input, motion, spawner,
//! collision, scoring. The shell invokes it once per display refresh; all
//! tuning values are per-tick deltas.

use rand::Rng;

use super::collision::hit_any;
use super::rect::Rect;
use super::state::{GameEvent, GamePhase, GameState, Obstacle};
use crate::tuning::Tuning;

/// Steering direction currently held by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
}

/// Input for a single tick (deterministic).
///
/// The shell owns one of these and mutates it from key/touch events; the
/// simulation only ever sees the value at tick time. `steer` reflects the
/// currently held direction, `jump` is a one-shot request the shell clears
/// after the tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub steer: Option<Steer>,
    pub jump: bool,
}

/// Advance the world by one tick. No-op once the phase is `GameOver`; the
/// world stays frozen until an external reset.
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning) {
    if !state.is_running() {
        return;
    }

    apply_input(state, input, tuning);
    move_character(state, tuning);
    update_obstacles(state, tuning);

    // First overlap kills. The phase guard above makes this a one-shot:
    // dead worlds never reach the collision scan again.
    if hit_any(&state.character, &state.obstacles).is_some() {
        state.character.alive = false;
        state.phase = GamePhase::GameOver;
        let score = state.display_score();
        state.push_event(GameEvent::GameOver { score });
        log::info!("game over at frame {} with score {}", state.frame, score);
        return;
    }

    update_score(state, tuning);
}

/// Drive `tick` a fixed number of frames with the same input. Test harness
/// and catch-up entry point; stops early once the run ends.
pub fn step(state: &mut GameState, input: &TickInput, tuning: &Tuning, frames: u32) {
    for _ in 0..frames {
        if !state.is_running() {
            break;
        }
        tick(state, input, tuning);
    }
}

/// Translate held input into the three permitted character mutations:
/// horizontal velocity of `±speed` or 0, and a jump impulse when grounded.
fn apply_input(state: &mut GameState, input: &TickInput, tuning: &Tuning) {
    let ch = &mut state.character;
    ch.vel.x = match input.steer {
        Some(Steer::Left) => -tuning.speed,
        Some(Steer::Right) => tuning.speed,
        None => 0.0,
    };
    if input.jump && !ch.jumping {
        ch.vel.y = tuning.jump_power;
        ch.jumping = true;
    }
}

/// Euler motion step: integrate velocity, apply gravity or snap to the
/// ground, clamp to the horizontal world bounds.
fn move_character(state: &mut GameState, tuning: &Tuning) {
    let ground_top = state.ground.rect.top();
    let ch = &mut state.character;
    if !ch.alive {
        return;
    }

    ch.rect.pos += ch.vel;

    if ch.rect.bottom() < ground_top {
        // Airborne: accelerate downward (y grows down)
        ch.vel.y += tuning.gravity;
    } else {
        // Landed (or overshot): rest exactly on the ground line
        ch.rect.pos.y = ground_top - ch.rect.size.y;
        ch.vel.y = 0.0;
        ch.jumping = false;
    }

    // Clamp after the position update; a truncated dx never affects dy.
    let max_x = (state.viewport.width - ch.rect.size.x).max(0.0);
    ch.rect.pos.x = ch.rect.pos.x.clamp(0.0, max_x);
}

/// Spawner: advance the frame counter, spawn on schedule, scroll and prune.
fn update_obstacles(state: &mut GameState, tuning: &Tuning) {
    state.frame += 1;

    if state.frame > state.next_obstacle_frame {
        spawn_obstacle(state, tuning);
    }

    // Scrolling and pruning happen every tick regardless of spawns.
    let scroll = state.scroll_speed(tuning);
    for obstacle in &mut state.obstacles {
        obstacle.rect.pos.x -= scroll;
    }
    state.obstacles.retain(|o| o.rect.right() > 0.0);
}

/// Spawn one obstacle at the right world edge, base on the ground, with
/// uniformly sampled dimensions, then schedule the next spawn.
fn spawn_obstacle(state: &mut GameState, tuning: &Tuning) {
    let (min_w, max_w) = tuning.obstacle_width_bounds();
    let (min_h, max_h) = tuning.obstacle_height_bounds();
    let width = state.rng.random_range(min_w..=max_w);
    let height = state.rng.random_range(min_h..=max_h);

    let id = state.next_entity_id();
    let rect = Rect::new(
        state.viewport.width,
        state.ground.rect.top() - height,
        width,
        height,
    );
    state.obstacles.push(Obstacle { id, rect });

    let (min_gap, max_gap) = tuning.obstacle_gap_bounds();
    state.next_obstacle_frame = state.frame + state.rng.random_range(min_gap..=max_gap);
}

/// Accumulate score and ratchet the scroll speed once per threshold.
///
/// The guard re-derives the expected stage from the score, so holding
/// `floor(score)` at a multiple of the threshold across many ticks raises
/// the speed exactly once.
fn update_score(state: &mut GameState, tuning: &Tuning) {
    state.score += tuning.score_per_tick;

    let points = state.display_score();
    let every = tuning.speed_up_every;
    if points.is_multiple_of(every) && points / every == state.speed_bonus as u64 + 1 {
        state.speed_bonus += 1;
        state.push_event(GameEvent::SpeedUp {
            stage: state.speed_bonus,
        });
        log::debug!(
            "speed up: stage {} at {} points",
            state.speed_bonus,
            points
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;

    const W: f32 = 1920.0;
    const H: f32 = 1080.0;

    fn world() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        let state = GameState::new(42, Viewport::new(W, H), &tuning);
        (state, tuning)
    }

    /// World with the spawner disabled, for tests that need an empty field.
    fn quiet_world() -> (GameState, Tuning) {
        let (mut state, tuning) = world();
        state.next_obstacle_frame = u64::MAX;
        (state, tuning)
    }

    #[test]
    fn test_jump_arc_returns_to_rest() {
        let (mut state, tuning) = quiet_world();
        let rest_y = state.character.rect.pos.y;

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, &tuning);
        assert!(state.character.jumping);
        assert!(state.character.rect.pos.y < rest_y);

        // dy = -22, gravity 0.5: back on the ground after ~2*22/0.5 ticks.
        // Never below the ground line at any point.
        let mut landed_at = None;
        for n in 2..=120u32 {
            tick(&mut state, &TickInput::default(), &tuning);
            assert!(state.character.rect.bottom() <= state.ground.rect.top());
            if !state.character.jumping {
                landed_at = Some(n);
                break;
            }
        }
        let landed_at = landed_at.expect("character never landed");
        assert!((80..=92).contains(&landed_at), "landed at {landed_at}");
        assert_eq!(state.character.rect.pos.y, rest_y);
        assert_eq!(state.character.vel.y, 0.0);
    }

    #[test]
    fn test_no_double_jump_while_airborne() {
        let (mut state, tuning) = quiet_world();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, &tuning);
        let rising_vel = state.character.vel.y;

        // Jump request mid-air must not re-apply the impulse
        tick(&mut state, &jump, &tuning);
        assert!(state.character.vel.y > rising_vel);
    }

    #[test]
    fn test_horizontal_clamp() {
        let (mut state, tuning) = quiet_world();
        let right = TickInput {
            steer: Some(Steer::Right),
            ..Default::default()
        };
        step(&mut state, &right, &tuning, 2000);
        assert_eq!(state.character.rect.right(), W);

        let left = TickInput {
            steer: Some(Steer::Left),
            ..Default::default()
        };
        step(&mut state, &left, &tuning, 2000);
        assert_eq!(state.character.rect.left(), 0.0);
    }

    #[test]
    fn test_spawner_spacing_and_prune() {
        let (mut state, mut tuning) = world();
        // Hoist the character out of harm's way so the run never ends.
        tuning.gravity = 0.0;
        state.character.rect.pos.y = -10_000.0;

        let (min_gap, max_gap) = tuning.obstacle_gap_bounds();
        let mut seen = 0u32;
        let mut last_spawn_frame = None;
        let mut max_live = 0usize;
        let mut pruned = false;

        for _ in 0..20_000 {
            let before: Vec<u32> = state.obstacles.iter().map(|o| o.id).collect();
            tick(&mut state, &TickInput::default(), &tuning);

            // Nothing fully off-screen survives the prune step
            assert!(state.obstacles.iter().all(|o| o.rect.right() > 0.0));
            if state.obstacles.len() < before.len() + usize::from(spawned(&before, &state)) {
                pruned = true;
            }

            if spawned(&before, &state) {
                let o = state.obstacles.last().unwrap();
                // Fresh obstacle: at the right edge, base on the ground,
                // dimensions inside the tuned closed intervals
                // (spawn happens before the same tick's scroll step).
                let (min_w, max_w) = tuning.obstacle_width_bounds();
                let (min_h, max_h) = tuning.obstacle_height_bounds();
                assert!(o.rect.size.x >= min_w && o.rect.size.x <= max_w);
                assert!(o.rect.size.y >= min_h && o.rect.size.y <= max_h);
                assert!((o.rect.bottom() - state.ground.rect.top()).abs() < 1e-3);
                // Spawned at the right edge, then scrolled once
                assert!(o.rect.left() < W);
                assert!(o.rect.left() >= W - state.scroll_speed(&tuning) - 1.0);

                if let Some(prev) = last_spawn_frame {
                    let gap = state.frame - prev;
                    assert!(
                        gap >= min_gap && gap <= max_gap + 1,
                        "spawn gap {gap} outside [{min_gap}, {max_gap}]"
                    );
                }
                last_spawn_frame = Some(state.frame);
                seen += 1;
            }
            max_live = max_live.max(state.obstacles.len());
        }

        assert!(seen >= 10, "spawner too quiet: {seen} spawns");
        assert!(pruned, "no obstacle was ever pruned");
        assert!(max_live >= 2, "gap range should allow overlapping lifetimes");
    }

    fn spawned(before: &[u32], state: &GameState) -> bool {
        state
            .obstacles
            .last()
            .is_some_and(|o| !before.contains(&o.id))
    }

    #[test]
    fn test_score_accumulates_while_alive() {
        let (mut state, tuning) = quiet_world();
        step(&mut state, &TickInput::default(), &tuning, 100);
        assert!((state.score - 1.0).abs() < 1e-9);
        assert_eq!(state.display_score(), 1);
    }

    #[test]
    fn test_speed_increment_fires_once_per_threshold() {
        let (mut state, mut tuning) = quiet_world();
        // Slow accumulation keeps floor(score) pinned at 50 for the whole run
        tuning.score_per_tick = 0.001;
        state.score = 49.9995;

        step(&mut state, &TickInput::default(), &tuning, 200);

        assert_eq!(state.display_score(), 50);
        assert_eq!(state.speed_bonus, 1);
        let speed_ups = state
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::SpeedUp { .. }))
            .count();
        assert_eq!(speed_ups, 1);
    }

    #[test]
    fn test_speed_stages_accumulate_over_a_long_run() {
        let (mut state, tuning) = quiet_world();
        // 0.01/tick: 50 points per 5000 ticks
        step(&mut state, &TickInput::default(), &tuning, 15_000);
        assert_eq!(state.display_score(), 150);
        assert_eq!(state.speed_bonus, 3);
        assert_eq!(state.scroll_speed(&tuning), tuning.speed + 3.0);
    }

    #[test]
    fn test_collision_kills_once_and_freezes() {
        let (mut state, tuning) = quiet_world();
        // Obstacle dropped right on top of the character
        let rect = state.character.rect;
        state.obstacles.push(Obstacle { id: 99, rect });

        tick(&mut state, &TickInput::default(), &tuning);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.character.alive);
        let events = state.take_events();
        assert_eq!(events, vec![GameEvent::GameOver { score: 0 }]);

        // Frozen: further ticks change nothing and emit nothing
        let frame = state.frame;
        let score = state.score;
        let obstacle_x = state.obstacles[0].rect.left();
        step(&mut state, &TickInput::default(), &tuning, 50);
        assert_eq!(state.frame, frame);
        assert_eq!(state.score, score);
        assert_eq!(state.obstacles[0].rect.left(), obstacle_x);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_death_skips_score_on_the_fatal_tick() {
        let (mut state, tuning) = quiet_world();
        state.score = 7.0;
        let rect = state.character.rect;
        state.obstacles.push(Obstacle { id: 99, rect });
        tick(&mut state, &TickInput::default(), &tuning);
        assert_eq!(state.score, 7.0);
    }

    #[test]
    fn test_head_on_collision_window() {
        let (mut state, tuning) = quiet_world();
        // Grounded obstacle entering from the right edge at base speed 5
        let h = 300.0;
        state.obstacles.push(Obstacle {
            id: 1,
            rect: Rect::new(W, state.ground.rect.top() - h, 100.0, h),
        });

        // Expected contact after (W - char_x - char_w) / speed ticks
        let expected = ((W - tuning.char_start_x - tuning.char_width) / tuning.speed) as u32;

        let mut ticks = 0u32;
        while state.is_running() {
            tick(&mut state, &TickInput::default(), &tuning);
            ticks += 1;
            assert!(ticks < expected + 10, "collision never fired");
        }
        assert!(
            (expected..=expected + 2).contains(&ticks),
            "died at tick {ticks}, expected about {expected}"
        );
    }

    #[test]
    fn test_reset_after_death_resumes_running() {
        let (mut state, tuning) = quiet_world();
        let rect = state.character.rect;
        state.obstacles.push(Obstacle { id: 1, rect });
        tick(&mut state, &TickInput::default(), &tuning);
        assert!(!state.is_running());

        state.reset(&tuning);
        assert!(state.is_running());
        assert!(state.character.alive);
        assert!(state.obstacles.is_empty());

        // And the world ticks again
        step(&mut state, &TickInput::default(), &tuning, 10);
        assert_eq!(state.frame, 10);
    }

    #[test]
    fn test_determinism_same_seed_same_world() {
        let tuning = Tuning::default();
        let vp = Viewport::new(W, H);
        let mut a = GameState::new(1234, vp, &tuning);
        let mut b = GameState::new(1234, vp, &tuning);

        let inputs = [
            TickInput {
                steer: Some(Steer::Right),
                ..Default::default()
            },
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for _ in 0..1000 {
            for input in &inputs {
                tick(&mut a, input, &tuning);
                tick(&mut b, input, &tuning);
            }
        }

        assert_eq!(a.frame, b.frame);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        for (oa, ob) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(oa.id, ob.id);
            assert_eq!(oa.rect, ob.rect);
        }
        assert_eq!(a.character.rect, b.character.rect);
        assert_eq!(a.score, b.score);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn arb_input() -> impl Strategy<Value = TickInput> {
            (0u8..3, any::<bool>()).prop_map(|(steer, jump)| TickInput {
                steer: match steer {
                    0 => None,
                    1 => Some(Steer::Left),
                    _ => Some(Steer::Right),
                },
                jump,
            })
        }

        proptest! {
            #[test]
            fn prop_core_invariants_hold(
                seed in any::<u64>(),
                inputs in prop::collection::vec(arb_input(), 1..400),
            ) {
                let tuning = Tuning::default();
                let mut state = GameState::new(seed, Viewport::new(W, H), &tuning);

                let mut last_score = state.score;
                let mut last_bonus = state.speed_bonus;
                for input in &inputs {
                    tick(&mut state, input, &tuning);

                    // Monotone progression
                    prop_assert!(state.score >= last_score);
                    prop_assert!(state.speed_bonus >= last_bonus);
                    last_score = state.score;
                    last_bonus = state.speed_bonus;

                    // Geometry invariants while alive
                    if state.character.alive {
                        prop_assert!(
                            state.character.rect.bottom() <= state.ground.rect.top()
                        );
                        prop_assert!(state.character.rect.left() >= 0.0);
                        prop_assert!(state.character.rect.right() <= W);
                    }

                    // Prune invariant
                    prop_assert!(state.obstacles.iter().all(|o| o.rect.right() > 0.0));
                }
            }
        }
    }
}
