//! Per-frame simulation tick
//!
//! Advances menu transitions, player rotation and the active shot. The
//! beam is re-traced from the player every tick up to its current length;
//! bounce effects fire only for impacts the beam front reached this tick.

use super::state::{GameEvent, GamePhase, GameState};
use super::trace::Trace;
use crate::consts::PLAYER_POS;
use crate::normalize_angle;

/// State of one on-screen button for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonInput {
    /// Went down this tick
    pub pressed: bool,
    /// Is down this tick (also true on the press tick)
    pub held: bool,
}

impl ButtonInput {
    /// First tick of a click
    pub fn tap() -> Self {
        Self {
            pressed: true,
            held: true,
        }
    }

    /// Held down from an earlier tick
    pub fn hold() -> Self {
        Self {
            pressed: false,
            held: true,
        }
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Menu start button clicked
    pub start: bool,
    pub rotate_left: ButtonInput,
    pub rotate_right: ButtonInput,
    pub fire: ButtonInput,
}

/// Advance the session by `dt` seconds, returning events for audio/UI
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match state.phase {
        GamePhase::Menu => {
            if input.start {
                events.push(GameEvent::Click);
                state.phase = GamePhase::FadeOut;
                state.transition_alpha = 0.0;
                state.goal_cleared = false;
                state.invalidate_stage();
            }
        }
        GamePhase::FadeOut => {
            state.transition_alpha += dt / state.tuning.transition_duration;
            if state.transition_alpha >= 1.0 {
                state.transition_alpha = 1.0;
                state.phase = GamePhase::FadeIn;
            }
        }
        GamePhase::FadeIn => {
            state.transition_alpha -= dt / state.tuning.transition_duration;
            if state.transition_alpha <= 0.0 {
                state.transition_alpha = 0.0;
                state.phase = GamePhase::Playing;
            }
        }
        GamePhase::Playing => {}
    }

    if state.phase.in_game() {
        update_player(state, input, dt, &mut events);
    }

    let spawn_stars = !state.phase.in_game() && state.settings.effective_starfield();
    state.effects.update(dt, spawn_stars);

    events
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32, events: &mut Vec<GameEvent>) {
    let tuning = &state.tuning;

    if input.rotate_left.pressed {
        state.facing -= tuning.rotation_step;
    }
    if input.rotate_right.pressed {
        state.facing += tuning.rotation_step;
    }
    if input.rotate_left.held {
        state.facing -= tuning.rotation_speed * dt;
    }
    if input.rotate_right.held {
        state.facing += tuning.rotation_speed * dt;
    }
    state.facing = normalize_angle(state.facing);

    // Whether the goal was already announced for this shot
    let mut announced = state.goal_cleared;
    if input.fire.pressed {
        state.shot.timer = tuning.beam_duration;
        state.shot.progress = 0.0;
        state.shot.dir = state.facing_dir();
        state.goal_cleared = false;
        announced = false;
    }
    if input.fire.held {
        if !state.shot.is_active() {
            state.shot.progress = 0.0;
            announced = false;
        }
        state.shot.timer = tuning.beam_duration;
        state.shot.dir = state.facing_dir();
        state.goal_cleared = false;
    }

    if !state.shot.is_active() {
        state.trace = Trace::default();
        return;
    }

    state.shot.timer -= dt;
    let prev_progress = state.shot.progress;
    state.shot.progress =
        (prev_progress + state.tuning.beam_speed * dt).min(state.tuning.beam_length);

    let trace = state
        .tracer
        .trace(&state.stage, PLAYER_POS, state.shot.dir, state.shot.progress);

    let ripple = state.settings.ripples;
    let burst = state
        .settings
        .effective_particle_burst(state.tuning.particles_per_impact);
    for impact in trace.impacts_between(prev_progress, state.shot.progress) {
        state.effects.on_impact(impact.pos, ripple, burst);
        events.push(GameEvent::WallHit {
            pos: impact.pos,
            kind: impact.kind,
        });
    }

    if trace.goal_captured {
        state.goal_cleared = true;
        if !announced {
            log::info!("Goal cleared after {} bounces", trace.bounces);
            events.push(GameEvent::GoalCleared);
        }
    }

    state.trace = trace;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Circle;
    use crate::sim::obstacle::ObstacleKind;
    use crate::sim::stage::Stage;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    /// A session already in play with the given stage
    fn playing(stage: Stage) -> GameState {
        let mut state = GameState::new(99);
        state.phase = GamePhase::Playing;
        state.install_stage(stage);
        state
    }

    fn fire_tap() -> TickInput {
        TickInput {
            fire: ButtonInput::tap(),
            ..Default::default()
        }
    }

    fn fire_hold() -> TickInput {
        TickInput {
            fire: ButtonInput::hold(),
            ..Default::default()
        }
    }

    fn wall_hits(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::WallHit { .. }))
            .count()
    }

    #[test]
    fn test_menu_start_transitions_into_play() {
        let mut state = GameState::new(1);

        let events = tick(&mut state, &TickInput::default(), DT);
        assert!(events.is_empty());
        assert_eq!(state.phase, GamePhase::Menu);

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        let events = tick(&mut state, &start, DT);
        assert_eq!(events, vec![GameEvent::Click]);
        assert_eq!(state.phase, GamePhase::FadeOut);

        // 0.6s fade out, then 0.6s fade in
        for _ in 0..40 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.phase, GamePhase::FadeIn);
        assert!(state.needs_stage());

        for _ in 0..40 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.transition_alpha, 0.0);
    }

    #[test]
    fn test_rotation_step_and_hold() {
        let mut state = playing(Stage::new());
        let start = state.facing;

        let input = TickInput {
            rotate_right: ButtonInput::tap(),
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        let expected = start + state.tuning.rotation_step + state.tuning.rotation_speed * DT;
        assert!((state.facing - expected).abs() < 1e-5);

        let input = TickInput {
            rotate_left: ButtonInput::hold(),
            ..Default::default()
        };
        tick(&mut state, &input, 1.0);
        let expected = expected - state.tuning.rotation_speed;
        assert!((state.facing - expected).abs() < 1e-5);
    }

    #[test]
    fn test_facing_wraps() {
        let mut state = playing(Stage::new());
        state.facing = std::f32::consts::PI - 0.01;

        let input = TickInput {
            rotate_right: ButtonInput::tap(),
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert!(state.facing < 0.0);
        assert!(state.facing >= -std::f32::consts::PI);
    }

    #[test]
    fn test_beam_grows_and_expires() {
        let mut state = playing(Stage::new());

        tick(&mut state, &fire_tap(), DT);
        assert!(state.beam_active());
        assert!((state.shot.progress - 20.0).abs() < 1e-3);
        assert_eq!(state.trace.segments.len(), 1);

        // Beam lives for 0.4s after release
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(!state.beam_active());
        assert!(state.trace.segments.is_empty());
    }

    #[test]
    fn test_expired_shot_clears_whole_trace() {
        let mut stage = Stage::new();
        stage.set_goal(Circle::new(Vec2::new(600.0, 400.0), 30.0));
        let mut state = playing(stage);

        tick(&mut state, &fire_tap(), 2.0 * DT);
        assert!(state.trace.goal_captured);

        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(!state.beam_active());
        assert_eq!(state.trace, Trace::default());
    }

    #[test]
    fn test_bounce_on_frame_boundary_fires_once() {
        let mut state = playing(Stage::new());
        state.facing = 0.0;
        state.tuning.beam_speed = 1120.0;

        // Progress 280, 560, 840: the right wall sits exactly at 560
        let mut hits = wall_hits(&tick(&mut state, &fire_tap(), 0.25));
        for _ in 0..2 {
            hits += wall_hits(&tick(&mut state, &fire_hold(), 0.25));
        }

        assert!((state.shot.progress - 840.0).abs() < 1e-3);
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_wall_hit_fires_once_per_bounce() {
        let mut state = playing(Stage::new());
        // Facing up: the ceiling is 410 away, reached on the 21st tick
        let mut hits = Vec::new();

        let mut events = tick(&mut state, &fire_tap(), DT);
        for _ in 0..30 {
            hits.extend(
                events
                    .drain(..)
                    .filter(|e| matches!(e, GameEvent::WallHit { .. })),
            );
            events = tick(&mut state, &fire_hold(), DT);
        }
        hits.extend(
            events
                .into_iter()
                .filter(|e| matches!(e, GameEvent::WallHit { .. })),
        );

        // 31 ticks * 20px = 620px: ceiling at 410 only (floor is at 1230)
        assert_eq!(hits.len(), 1);
        match hits[0] {
            GameEvent::WallHit { pos, kind } => {
                assert_eq!(kind, ObstacleKind::Wall);
                assert!((pos - Vec2::new(600.0, 40.0)).length() < 1e-2);
            }
            _ => unreachable!(),
        }
        assert_eq!(state.effects.ripples.len(), 1);
        assert_eq!(state.effects.particles.len(), 8);
    }

    #[test]
    fn test_goal_cleared_announced_once() {
        let mut stage = Stage::new();
        // Straight above the player, 200px away
        stage.set_goal(Circle::new(Vec2::new(600.0, 250.0), 30.0));
        let mut state = playing(stage);

        let mut cleared = 0;
        let mut events = tick(&mut state, &fire_tap(), DT);
        for _ in 0..30 {
            cleared += events.iter().filter(|e| **e == GameEvent::GoalCleared).count();
            events = tick(&mut state, &fire_hold(), DT);
        }
        cleared += events.iter().filter(|e| **e == GameEvent::GoalCleared).count();

        assert_eq!(cleared, 1);
        assert!(state.goal_cleared);
        assert!(state.trace.goal_captured);
        assert!((state.trace.traveled - 170.0).abs() < 1e-2);
    }

    #[test]
    fn test_new_shot_resets_goal_cleared() {
        let mut stage = Stage::new();
        stage.set_goal(Circle::new(Vec2::new(600.0, 400.0), 30.0));
        let mut state = playing(stage);

        let events = tick(&mut state, &fire_tap(), 2.0 / 60.0);
        assert!(events.contains(&GameEvent::GoalCleared));

        // Turn away and fire again: the goal is no longer cleared
        state.facing = 0.0;
        let events = tick(&mut state, &fire_tap(), DT);
        assert!(!events.contains(&GameEvent::GoalCleared));
        assert!(!state.goal_cleared);
    }

    #[test]
    fn test_no_effects_when_disabled() {
        let mut state = playing(Stage::new());
        state.settings.ripples = false;
        state.settings.particles = false;
        state.shot.progress = 400.0;
        state.shot.timer = 0.4;
        state.shot.dir = Vec2::NEG_Y;

        let events = tick(&mut state, &TickInput::default(), DT);
        assert_eq!(events.len(), 1);
        assert!(state.effects.ripples.is_empty());
        assert!(state.effects.particles.is_empty());
    }
}
