/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;

use config::GameConfig;
use domain::entity::{FrameInput, HorizontalIntent};
use sim::level::Level;
use sim::loader::load_level_def;
use sim::step;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::RenderContext;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const DEFAULT_LOG_FILE: &str = "jumper.log";

fn main() -> ExitCode {
    init_logging();

    let config = GameConfig::load();
    let def = load_level_def(&config);

    let mut level = match Level::new(&def.name, &config.level, &config.physics, &def.rows) {
        Ok(level) => level,
        Err(e) => {
            tracing::error!("level {:?} rejected: {e}", def.name);
            eprintln!("Invalid level {:?}: {e}", def.name);
            return ExitCode::FAILURE;
        }
    };

    let mut ctx = RenderContext::stdout(
        config.level.display_width,
        config.level.display_height,
        config.level.tile_size,
    );

    let enhanced = match ctx.init(&config.title) {
        Ok(enhanced) => enhanced,
        Err(e) => {
            // Raw mode may already be on.
            let _ = ctx.cleanup();
            eprintln!("Terminal init failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let sound = SoundEngine::new();

    let result = game_loop(&mut level, &mut ctx, sound.as_ref(), &config, enhanced);

    if let Err(e) = ctx.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(()) => {
            tracing::info!("exited after {} frames", level.frame);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("game stopped: {e}");
            eprintln!("Game error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to a file so output never lands on the game screen.
/// `JUMPER_LOG` picks the path, `RUST_LOG` the filter.
fn init_logging() {
    let path = std::env::var_os("JUMPER_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    let file = match File::create(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Logging disabled, cannot create {}: {e}", path.display());
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn game_loop(
    level: &mut Level,
    ctx: &mut RenderContext,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
    enhanced: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.honor_release = enhanced;
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let tick_rate = Duration::from_millis(config.level.frame_ms());
    let mut last_tick = Instant::now();
    // Jump presses seen between ticks are held for the next step.
    let mut pending_jump = false;
    let mut events = Vec::new();

    tracing::info!(
        fps = config.level.fps,
        enhanced_keys = enhanced,
        gamepad = gp.connected,
        "game loop started"
    );

    ctx.render(level)?;

    loop {
        kb.drain_events();
        gp.update();

        if kb.quit_requested() || gp.quit_pressed() {
            break;
        }

        if kb.restart_pressed() || gp.restart_pressed() {
            let ev = step::restart_level(level);
            pending_jump = false;
            if let Some(sfx) = sound {
                sfx.play_events(&[ev]);
            }
        }

        if kb.jump_pressed() || gp.jump_pressed() {
            pending_jump = true;
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();

            let input = FrameInput {
                horizontal: detect_horizontal(&kb, &gp),
                jump: std::mem::take(&mut pending_jump),
            };

            events.clear();
            let result = step::step(level, input, &mut events);

            for ev in &events {
                tracing::trace!(frame = level.frame, ?ev);
            }
            if let Some(sfx) = sound {
                sfx.play_events(&events);
            }

            match result {
                Ok(()) => {}
                Err(violation) if cfg!(debug_assertions) => return Err(violation.into()),
                Err(violation) => tracing::error!("{violation}"),
            }

            ctx.render(level)?;
        }

        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Keyboard wins over the gamepad when both steer.
fn detect_horizontal(kb: &InputState, gp: &GamepadState) -> HorizontalIntent {
    match kb.horizontal() {
        HorizontalIntent::None => gp.horizontal(),
        dir => dir,
    }
}
