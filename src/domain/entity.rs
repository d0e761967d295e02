/// The character entity and the per-frame input it consumes.

use std::io::Write;

use super::geom::Rect;
use crate::ui::renderer::{Fill, RenderContext};

/// Horizontal movement intent (continuous while a key is held).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum HorizontalIntent {
    Left,
    #[default]
    None,
    Right,
}

impl HorizontalIntent {
    /// -1, 0 or +1.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            HorizontalIntent::Left => -1.0,
            HorizontalIntent::None => 0.0,
            HorizontalIntent::Right => 1.0,
        }
    }
}

/// Frame input: movement is held, jump is edge-triggered (fresh press).
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub horizontal: HorizontalIntent,
    pub jump: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Character {
    pub rect: Rect,
    pub intent: HorizontalIntent,
    /// Ground speed magnitude. Set each frame from the camera decision.
    pub speed: f32,
    /// Vertical velocity: up = negative, down = positive.
    pub vy: f32,
    pub on_ground: bool,
}

impl Character {
    pub fn new(x: f32, y: f32, size: f32, speed: f32) -> Self {
        Character {
            rect: Rect::new(x, y, size, size),
            intent: HorizontalIntent::None,
            speed,
            vy: 0.0,
            on_ground: true,
        }
    }

    pub fn set_horizontal_intent(&mut self, dir: HorizontalIntent) {
        self.intent = dir;
    }

    /// Move by `intent * speed`. Returns the displacement applied.
    pub fn apply_horizontal_intent(&mut self) -> f32 {
        let dx = self.intent.sign() * self.speed;
        self.rect.x += dx;
        dx
    }

    /// Accelerate downward, capped at `terminal_fall`, then move.
    pub fn apply_gravity(&mut self, gravity: f32, terminal_fall: f32) {
        self.vy = (self.vy + gravity).min(terminal_fall);
        self.rect.y += self.vy;
    }

    /// Start a jump if grounded. Returns whether the jump happened.
    pub fn jump(&mut self, initial_velocity: f32) -> bool {
        if !self.on_ground {
            return false;
        }
        self.vy = initial_velocity;
        self.on_ground = false;
        true
    }

    /// Keep the bottom edge at or above `floor`. Returns true if clamped.
    pub fn clamp_to_floor(&mut self, floor: f32) -> bool {
        if self.rect.bottom() > floor {
            self.rect.set_bottom(floor);
            return true;
        }
        false
    }

    pub fn draw<W: Write>(&self, ctx: &mut RenderContext<W>) {
        ctx.fill_box(&self.rect, Fill::Character);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_is_stored_without_moving() {
        let mut c = Character::new(100.0, 50.0, 32.0, 5.0);
        c.set_horizontal_intent(HorizontalIntent::Left);
        assert_eq!(c.intent, HorizontalIntent::Left);
        assert_eq!(c.rect.x, 100.0);
    }

    #[test]
    fn horizontal_move_scales_by_speed() {
        let mut c = Character::new(100.0, 50.0, 32.0, 5.0);
        c.set_horizontal_intent(HorizontalIntent::Right);
        assert_eq!(c.apply_horizontal_intent(), 5.0);
        assert_eq!(c.rect.x, 105.0);

        c.speed = 0.0;
        assert_eq!(c.apply_horizontal_intent(), 0.0);
        assert_eq!(c.rect.x, 105.0);
    }

    #[test]
    fn gravity_accumulates_and_moves() {
        let mut c = Character::new(0.0, 0.0, 32.0, 5.0);
        c.apply_gravity(0.8, 10.0);
        c.apply_gravity(0.8, 10.0);
        assert!((c.vy - 1.6).abs() < 1e-5);
        assert!((c.rect.y - 2.4).abs() < 1e-5);
    }

    #[test]
    fn gravity_never_exceeds_terminal_fall() {
        let mut c = Character::new(0.0, 0.0, 32.0, 5.0);
        for _ in 0..1000 {
            c.apply_gravity(0.8, 10.0);
            assert!(c.vy <= 10.0);
        }
        assert_eq!(c.vy, 10.0);
    }

    #[test]
    fn jump_from_ground_clears_flag_immediately() {
        let mut c = Character::new(0.0, 0.0, 32.0, 5.0);
        assert!(c.on_ground);
        assert!(c.jump(-12.0));
        assert_eq!(c.vy, -12.0);
        assert!(!c.on_ground);
    }

    #[test]
    fn jump_in_air_is_ignored() {
        let mut c = Character::new(0.0, 0.0, 32.0, 5.0);
        c.on_ground = false;
        c.vy = 3.0;
        assert!(!c.jump(-12.0));
        assert_eq!(c.vy, 3.0);
    }

    #[test]
    fn floor_clamp_only_when_below() {
        let mut c = Character::new(0.0, 400.0, 32.0, 5.0);
        assert!(c.clamp_to_floor(416.0));
        assert_eq!(c.rect.bottom(), 416.0);
        assert!(!c.clamp_to_floor(416.0));
        assert!(!c.clamp_to_floor(500.0));
        assert_eq!(c.rect.bottom(), 416.0);
    }
}
