/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and logging.

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Jumped { x: f32, y: f32 },
    Landed { x: f32, y: f32 },
    HitCeiling,
    /// The safety floor caught the character (no tile beneath it).
    FloorClamped,
    PanStarted { shift: f32 },
    PanStopped,
    LevelRestarted,
}
