/// Keyboard input tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Continuous horizontal movement while a key is held
///   - Edge-triggered jump (only fires on initial press)
///   - Movement + jump in the same frame
///
/// Honors crossterm Release events when keyboard enhancement is active.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::HorizontalIntent;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_JUMP: &[KeyCode] = &[KeyCode::Char(' '), KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that transitioned from "not held" → "held" during the
    /// most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Ctrl+C seen during the most recent drain.
    interrupt: bool,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            interrupt: false,
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the simulation step.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.interrupt = false;

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.apply_key(key, Instant::now());
            }
        }

        // Expire keys that have timed out (fallback for terminals without Release)
        if !self.honor_release {
            let now = Instant::now();
            self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
        }
    }

    fn apply_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            self.interrupt = true;
            return;
        }

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {
                // Not trusted without enhancement; rely on the timeout.
            }
            _ => {
                let was_held = self.is_held(key.code, now);
                self.last_active.insert(key.code, now);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    // ── Logical inputs ──

    /// Left wins ties, matching a single-direction pad.
    pub fn horizontal(&self) -> HorizontalIntent {
        let now = Instant::now();
        if self.any_held(KEYS_LEFT, now) {
            HorizontalIntent::Left
        } else if self.any_held(KEYS_RIGHT, now) {
            HorizontalIntent::Right
        } else {
            HorizontalIntent::None
        }
    }

    pub fn jump_pressed(&self) -> bool {
        self.any_pressed(KEYS_JUMP)
    }

    pub fn restart_pressed(&self) -> bool {
        self.any_pressed(KEYS_RESTART)
    }

    pub fn quit_requested(&self) -> bool {
        self.interrupt || self.any_pressed(KEYS_QUIT)
    }

    // ── Internal ──

    fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh_presses.contains(c))
    }

    fn any_held(&self, codes: &[KeyCode], now: Instant) -> bool {
        codes.iter().any(|c| self.is_held(*c, now))
    }

    fn is_held(&self, code: KeyCode, now: Instant) -> bool {
        if self.honor_release {
            return self.last_active.contains_key(&code);
        }
        self.last_active.get(&code)
            .map(|t| now.duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn press_is_fresh_once_then_held() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.apply_key(key(KeyCode::Char(' '), KeyEventKind::Press), t0);
        assert!(input.jump_pressed());

        // Next frame: key repeat, not a fresh press.
        input.fresh_presses.clear();
        input.apply_key(key(KeyCode::Char(' '), KeyEventKind::Repeat), t0);
        assert!(!input.jump_pressed());
    }

    #[test]
    fn held_direction_maps_to_intent() {
        let mut input = InputState::new();
        input.apply_key(key(KeyCode::Right, KeyEventKind::Press), Instant::now());
        assert_eq!(input.horizontal(), HorizontalIntent::Right);

        input.apply_key(key(KeyCode::Char('a'), KeyEventKind::Press), Instant::now());
        assert_eq!(input.horizontal(), HorizontalIntent::Left);
    }

    #[test]
    fn release_honored_only_with_enhancement() {
        let mut input = InputState::new();
        input.apply_key(key(KeyCode::Left, KeyEventKind::Press), Instant::now());
        input.apply_key(key(KeyCode::Left, KeyEventKind::Release), Instant::now());
        assert_eq!(input.horizontal(), HorizontalIntent::Left);

        input.honor_release = true;
        input.apply_key(key(KeyCode::Left, KeyEventKind::Release), Instant::now());
        assert_eq!(input.horizontal(), HorizontalIntent::None);
    }

    #[test]
    fn stale_keys_expire_without_enhancement() {
        let mut input = InputState::new();
        let past = Instant::now() - Duration::from_millis(500);
        input.apply_key(key(KeyCode::Right, KeyEventKind::Press), past);
        assert_eq!(input.horizontal(), HorizontalIntent::None);
    }

    #[test]
    fn ctrl_c_and_esc_quit() {
        let mut input = InputState::new();
        let mut ctrl_c = key(KeyCode::Char('c'), KeyEventKind::Press);
        ctrl_c.modifiers = KeyModifiers::CONTROL;
        input.apply_key(ctrl_c, Instant::now());
        assert!(input.quit_requested());

        let mut input = InputState::new();
        input.apply_key(key(KeyCode::Esc, KeyEventKind::Press), Instant::now());
        assert!(input.quit_requested());
        assert!(!input.restart_pressed());
    }
}
