//! Ray Puzzle entry point
//!
//! Headless native driver: loads a stage, plays one shot through the full
//! session tick and reports which facing angles would clear the goal.
//!
//! Usage: `ray-puzzle [stage.json] [facing-degrees] [low|medium|high]`

use std::time::{SystemTime, UNIX_EPOCH};

use ray_puzzle::consts::*;
use ray_puzzle::sim::{ButtonInput, GameEvent, GamePhase, GameState, TickInput, tick};
use ray_puzzle::{QualityPreset, Settings, Tuning, direction_from_angle};

const FRAME_DT: f32 = 1.0 / 60.0;
/// Facing angles tried by the aim sweep
const SWEEP_STEPS: u32 = 48;

fn main() {
    env_logger::init();
    log::info!("Ray Puzzle (native) starting...");

    let mut args = std::env::args().skip(1);
    let stage_path = args.next().unwrap_or_else(|| DEFAULT_STAGE_PATH.to_string());
    let facing_deg: Option<f32> = args.next().and_then(|a| a.parse().ok());
    let quality = args.next();

    let mut settings = Settings::load_from("settings.json");
    if let Some(name) = quality {
        match QualityPreset::from_str(&name) {
            Some(preset) => settings.apply_preset(preset),
            None => log::warn!("Unknown quality preset '{}', keeping settings", name),
        }
    }
    log::info!("Quality preset: {}", settings.quality.as_str());
    let tuning = Tuning::load_from("tuning.json");
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut state = GameState::with_config(seed, tuning, settings);

    // Title screen -> fade -> play
    tick(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
        FRAME_DT,
    );
    while state.phase != GamePhase::Playing {
        if state.needs_stage() && !state.load_stage(&stage_path) {
            log::warn!("Playing {} as an empty stage", stage_path);
        }
        tick(&mut state, &TickInput::default(), FRAME_DT);
    }

    if let Some(deg) = facing_deg {
        state.facing = ray_puzzle::normalize_angle(deg.to_radians());
    }

    play_shot(&mut state);
    sweep(&state);
}

/// Fire and hold for the beam's full flight, logging every event
fn play_shot(state: &mut GameState) {
    println!(
        "\nFiring at {:.1}° from ({:.0}, {:.0})",
        state.facing.to_degrees(),
        PLAYER_POS.x,
        PLAYER_POS.y
    );

    let frames = (state.tuning.beam_length / (state.tuning.beam_speed * FRAME_DT)).ceil() as u32;
    for frame in 0..frames {
        let fire = if frame == 0 {
            ButtonInput::tap()
        } else {
            ButtonInput::hold()
        };
        let input = TickInput {
            fire,
            ..Default::default()
        };
        for event in tick(state, &input, FRAME_DT) {
            match event {
                GameEvent::WallHit { pos, kind } => println!(
                    "  frame {:4}: bounce off {:?} at ({:.1}, {:.1})",
                    frame, kind, pos.x, pos.y
                ),
                GameEvent::GoalCleared => println!("  frame {:4}: CLEAR!", frame),
                GameEvent::Click => {}
            }
        }
        if state.trace.goal_captured || state.trace.bounces >= state.tracer.max_bounces {
            break;
        }
    }

    let trace = &state.trace;
    println!(
        "Beam: {} segments, {} bounces, {:.1}px, goal {}",
        trace.segments.len(),
        trace.bounces,
        trace.traveled,
        if trace.goal_captured { "cleared" } else { "missed" }
    );
}

/// Trace a full-length beam at evenly spaced angles and list the winners
fn sweep(state: &GameState) {
    let winners: Vec<f32> = (0..SWEEP_STEPS)
        .map(|i| i as f32 * std::f32::consts::TAU / SWEEP_STEPS as f32)
        .filter(|&theta| {
            state
                .tracer
                .trace(
                    &state.stage,
                    PLAYER_POS,
                    direction_from_angle(theta),
                    state.tuning.beam_length,
                )
                .goal_captured
        })
        .map(|theta| ray_puzzle::normalize_angle(theta).to_degrees())
        .collect();

    if winners.is_empty() {
        println!("\nNo clearing angle in a {}-step sweep", SWEEP_STEPS);
    } else {
        let list: Vec<String> = winners.iter().map(|d| format!("{:.1}°", d)).collect();
        println!("\nClearing angles: {}", list.join(", "));
    }
}
