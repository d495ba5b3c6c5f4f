//! Headless driver: builds a dungeon, walks the player around with scripted
//! input for a fixed number of frames and logs what happened.
//!
//! Usage: `dungeon-core [config.json] [seed]`

use dungeon_core::constants::{FRAME_TIME, HEADLESS_FRAME_COUNT};
use dungeon_core::player::Player;
use dungeon_core::sound::{SoundEffect, SoundPlayer};
use dungeon_core::{Dungeon, GameConfig};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use winit::keyboard::KeyCode;

/// Keys held for each second of the run, cycled
const SCRIPT: &[&[KeyCode]] = &[
    &[KeyCode::ArrowLeft],
    &[KeyCode::ArrowLeft, KeyCode::ArrowUp],
    &[KeyCode::ArrowDown],
    &[],
    &[KeyCode::ArrowRight, KeyCode::ArrowDown],
    &[KeyCode::ArrowUp],
];

/// Stands in for an audio backend by logging each request
struct LoggingSoundPlayer {
    listener: Vec2,
    played: usize,
}

impl SoundPlayer for LoggingSoundPlayer {
    fn play(&mut self, effect: SoundEffect, position: Vec2) {
        self.played += 1;
        let distance = position.distance(self.listener);
        debug!(?effect, x = position.x, y = position.y, distance, "sound_played");
    }

    fn set_listener_position(&mut self, position: Vec2) {
        self.listener = position;
    }

    fn remove_stopped_sounds(&mut self) {}
}

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "run_failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) => GameConfig::load(&path)?,
        None => GameConfig::default(),
    };
    let mut rng = match args.next() {
        Some(seed) => StdRng::seed_from_u64(seed.parse()?),
        None => StdRng::from_entropy(),
    };

    let mut dungeon = Dungeon::new(&config, &mut rng)?;
    let player = Player::new();
    let mut sounds = LoggingSoundPlayer {
        listener: Vec2::ZERO,
        played: 0,
    };

    let frames_per_step = (1.0 / FRAME_TIME).round() as u32;
    let mut frame = 0;
    while frame < HEADLESS_FRAME_COUNT && dungeon.has_alive_player() {
        let step = (frame / frames_per_step) as usize % SCRIPT.len();
        let held: HashSet<KeyCode> = SCRIPT[step].iter().copied().collect();

        player.handle_realtime_input(&held, dungeon.command_queue());
        dungeon.update(FRAME_TIME);
        dungeon.update_sounds(&mut sounds);

        if frame % frames_per_step == 0 {
            if let Some(position) = dungeon.player_position() {
                debug!(frame, x = position.x, y = position.y, "player_position");
            }
        }
        frame += 1;
    }

    let hitpoints = dungeon.player().map(|p| p.hitpoints()).unwrap_or(0);
    let position = dungeon.player_position().unwrap_or(dungeon.spawn_position());
    info!(
        frames = frame,
        alive = dungeon.has_alive_player(),
        hitpoints,
        x = position.x,
        y = position.y,
        sounds = sounds.played,
        "session_finished"
    );
    Ok(())
}
