/// Side-scrolling camera.
///
/// The character lives in screen coordinates. When it pushes past the
/// central band, the world scrolls instead: every tile shifts by `pan_speed`
/// toward the character and the character's own ground speed drops to 0.
///
///   |<- left_edge ->|          band          |<- left_edge ->|
///   0          display_width / 4      display_width - left_edge      display_width

use super::entity::HorizontalIntent;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub left_edge: f32,
    pub right_edge: f32,
    pub pan_speed: f32,
    pub run_speed: f32,
}

/// What the orchestrator should do this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraDecision {
    /// Horizontal shift applied to every tile next frame.
    pub shift: f32,
    /// Ground speed the character moves with this frame.
    pub character_speed: f32,
}

impl CameraDecision {
    pub fn is_panning(&self) -> bool {
        self.shift != 0.0
    }
}

impl Camera {
    pub fn new(display_width: u32, pan_speed: f32, run_speed: f32) -> Self {
        let left_edge = display_width / 4;
        let right_edge = display_width - left_edge;
        Camera {
            left_edge: left_edge as f32,
            right_edge: right_edge as f32,
            pan_speed,
            run_speed,
        }
    }

    pub fn decide(&self, center_x: f32, intent: HorizontalIntent) -> CameraDecision {
        match intent {
            HorizontalIntent::Left if center_x < self.left_edge => CameraDecision {
                shift: self.pan_speed,
                character_speed: 0.0,
            },
            HorizontalIntent::Right if center_x > self.right_edge => CameraDecision {
                shift: -self.pan_speed,
                character_speed: 0.0,
            },
            _ => CameraDecision {
                shift: 0.0,
                character_speed: self.run_speed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(800, 5.0, 5.0)
    }

    #[test]
    fn band_is_central_half() {
        let cam = camera();
        assert_eq!(cam.left_edge, 200.0);
        assert_eq!(cam.right_edge, 600.0);
    }

    #[test]
    fn odd_width_uses_integer_quarter() {
        let cam = Camera::new(801, 5.0, 5.0);
        assert_eq!(cam.left_edge, 200.0);
        assert_eq!(cam.right_edge, 601.0);
    }

    #[test]
    fn pans_right_when_pushing_left_edge() {
        let d = camera().decide(150.0, HorizontalIntent::Left);
        assert_eq!(d, CameraDecision { shift: 5.0, character_speed: 0.0 });
        assert!(d.is_panning());
    }

    #[test]
    fn pans_left_when_pushing_right_edge() {
        let d = camera().decide(650.0, HorizontalIntent::Right);
        assert_eq!(d, CameraDecision { shift: -5.0, character_speed: 0.0 });
    }

    #[test]
    fn inside_band_restores_speed() {
        let d = camera().decide(400.0, HorizontalIntent::Right);
        assert_eq!(d, CameraDecision { shift: 0.0, character_speed: 5.0 });
        assert!(!d.is_panning());
    }

    #[test]
    fn outside_band_moving_inward_does_not_pan() {
        let cam = camera();
        assert_eq!(cam.decide(150.0, HorizontalIntent::Right).shift, 0.0);
        assert_eq!(cam.decide(650.0, HorizontalIntent::Left).shift, 0.0);
        assert_eq!(cam.decide(150.0, HorizontalIntent::None).shift, 0.0);
    }

    #[test]
    fn band_edges_are_exclusive() {
        let cam = camera();
        assert_eq!(cam.decide(200.0, HorizontalIntent::Left).shift, 0.0);
        assert_eq!(cam.decide(600.0, HorizontalIntent::Right).shift, 0.0);
    }
}
