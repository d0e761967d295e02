/// The step function: advances the level by one frame.
///
/// Processing order:
///   1. Horizontal intent from input
///   2. Shift tiles by the camera shift decided LAST frame
///   3. Camera decision for this frame (shift for next frame, speed for now)
///   4. Character update (ground speed, jump)
///   5. Horizontal collision pass
///   6. Vertical collision pass (gravity, floor clamp, tiles, ground decay)
///   7. Bounds check
///
/// Drawing happens after `step` returns, so every update for frame N is
/// complete before frame N is drawn.

use crate::domain::entity::FrameInput;
use crate::domain::physics;
use crate::error::InvariantViolation;
use super::event::GameEvent;
use super::level::Level;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

/// Events for the frame are appended to `events` before the bounds check
/// runs, so a frame that reports a violation still delivers them.
pub fn step(
    level: &mut Level,
    input: FrameInput,
    events: &mut Vec<GameEvent>,
) -> Result<(), InvariantViolation> {
    level.frame += 1;

    if let Some(c) = level.character.as_mut() {
        c.set_horizontal_intent(input.horizontal);
    }

    level.apply_camera_shift();
    resolve_camera(level, events);

    let Some(c) = level.character.as_mut() else {
        return Ok(());
    };

    if input.jump && c.jump(level.jump_velocity) {
        events.push(GameEvent::Jumped { x: c.rect.x, y: c.rect.y });
    }

    physics::horizontal_pass(c, &level.tiles);

    let out = physics::vertical_pass(c, &level.tiles, level.gravity);
    if out.landed {
        events.push(GameEvent::Landed { x: c.rect.x, y: c.rect.y });
    }
    if out.bumped_head {
        events.push(GameEvent::HitCeiling);
    }
    if out.floor_clamped {
        tracing::debug!(frame = level.frame, "floor clamp caught the character");
        events.push(GameEvent::FloorClamped);
    }

    physics::check_bounds(c, level.display_width, level.gravity.floor, level.frame)
}

// ══════════════════════════════════════════════════════════════
// Camera
// ══════════════════════════════════════════════════════════════

/// Decide next frame's shift and this frame's ground speed.
/// A characterless level never scrolls.
fn resolve_camera(level: &mut Level, events: &mut Vec<GameEvent>) {
    let was_panning = level.camera_shift != 0.0;

    let decision = level.character.as_mut().map(|c| {
        let decision = level.camera.decide(c.rect.center_x(), c.intent);
        c.speed = decision.character_speed;
        decision
    });
    let panning = decision.map_or(false, |d| d.is_panning());
    level.camera_shift = decision.map_or(0.0, |d| d.shift);

    match (was_panning, panning) {
        (false, true) => events.push(GameEvent::PanStarted { shift: level.camera_shift }),
        (true, false) => events.push(GameEvent::PanStopped),
        _ => {}
    }
}

// ══════════════════════════════════════════════════════════════
// Restart
// ══════════════════════════════════════════════════════════════

pub fn restart_level(level: &mut Level) -> GameEvent {
    level.restart();
    tracing::info!("level {:?} restarted", level.name);
    GameEvent::LevelRestarted
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
