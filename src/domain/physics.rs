/// Collision resolver: axis-separated AABB resolution against solid tiles.
///
/// ## Passes (run in this order every frame)
///
///   1. HORIZONTAL: move by `intent * speed`, then push out of every
///      overlapping tile on the side the character came from.
///      Intent 0 means no move and no push: a character resting against a
///      wall is never repositioned by it.
///   2. VERTICAL: gravity, floor clamp, then push out of every overlapping
///      tile based on the sign of `vy`. Landing on a tile zeroes `vy` and
///      sets `on_ground`.
///   3. GROUND DECAY: a grounded flag is dropped when moving up, or when
///      falling faster than `GROUND_FALL_THRESHOLD`.
///
/// Each overlapping tile is resolved in tile order; the last one wins.
/// Falls are capped below one tile per frame (see `LevelConfig::validate`),
/// so a single pass can never skip through a tile.

use super::entity::{Character, HorizontalIntent};
use super::tile::Tile;
use crate::error::InvariantViolation;

/// Downward speed above which a grounded character counts as falling.
pub const GROUND_FALL_THRESHOLD: f32 = 1.0;

/// Vertical physics parameters.
#[derive(Clone, Copy, Debug)]
pub struct Gravity {
    pub accel: f32,
    pub terminal_fall: f32,
    /// Lowest allowed bottom edge (safety net independent of tiles).
    pub floor: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerticalOutcome {
    /// `on_ground` went from false to true this pass.
    pub landed: bool,
    /// The floor clamp had to catch the character.
    pub floor_clamped: bool,
    /// A ceiling stopped an upward move.
    pub bumped_head: bool,
}

// ══════════════════════════════════════════════════════════════
// Horizontal
// ══════════════════════════════════════════════════════════════

/// Returns the number of tiles the character was pushed out of.
pub fn horizontal_pass(c: &mut Character, tiles: &[Tile]) -> usize {
    if c.intent == HorizontalIntent::None {
        return 0;
    }

    c.apply_horizontal_intent();

    let mut pushes = 0;
    for tile in tiles {
        if !tile.rect.overlaps(&c.rect) {
            continue;
        }
        match c.intent {
            HorizontalIntent::Left => c.rect.set_left(tile.rect.right()),
            HorizontalIntent::Right => c.rect.set_right(tile.rect.left()),
            HorizontalIntent::None => {}
        }
        pushes += 1;
    }
    pushes
}

// ══════════════════════════════════════════════════════════════
// Vertical
// ══════════════════════════════════════════════════════════════

pub fn vertical_pass(c: &mut Character, tiles: &[Tile], g: Gravity) -> VerticalOutcome {
    let was_grounded = c.on_ground;
    let mut out = VerticalOutcome::default();

    c.apply_gravity(g.accel, g.terminal_fall);
    out.floor_clamped = c.clamp_to_floor(g.floor);

    for tile in tiles {
        if !tile.rect.overlaps(&c.rect) {
            continue;
        }
        if c.vy < 0.0 {
            c.rect.set_top(tile.rect.bottom());
            c.vy = 0.0;
            out.bumped_head = true;
        } else if c.vy > 0.0 {
            c.rect.set_bottom(tile.rect.top());
            c.vy = 0.0;
            c.on_ground = true;
        }
    }

    decay_ground_state(c);

    out.landed = !was_grounded && c.on_ground;
    out
}

/// Drop a stale grounded flag after a jump or a walk off a ledge.
pub fn decay_ground_state(c: &mut Character) {
    if c.on_ground && (c.vy < 0.0 || c.vy > GROUND_FALL_THRESHOLD) {
        c.on_ground = false;
    }
}

// ══════════════════════════════════════════════════════════════
// Invariant check
// ══════════════════════════════════════════════════════════════

/// The character must stay inside the display horizontally and above the
/// safety floor. Leaving through the top edge (a high jump) is allowed.
pub fn check_bounds(
    c: &Character,
    display_width: f32,
    floor: f32,
    frame: u64,
) -> Result<(), InvariantViolation> {
    let r = &c.rect;
    let detail = if r.left() < 0.0 {
        Some(format!("left edge {:.1} < 0", r.left()))
    } else if r.right() > display_width {
        Some(format!("right edge {:.1} > {display_width}", r.right()))
    } else if r.bottom() > floor {
        Some(format!("bottom edge {:.1} below floor {floor}", r.bottom()))
    } else {
        None
    };
    match detail {
        Some(detail) => Err(InvariantViolation { frame, detail }),
        None => Ok(()),
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geom::Rect;

    const T: f32 = 32.0;

    fn gravity() -> Gravity {
        Gravity { accel: 0.8, terminal_fall: 10.0, floor: 10_000.0 }
    }

    fn character_at(x: f32, y: f32) -> Character {
        Character::new(x, y, T, 5.0)
    }

    fn tile_at(col: usize, row: usize) -> Tile {
        Tile::new(col as f32 * T, row as f32 * T, T)
    }

    // ── Horizontal ──

    #[test]
    fn walking_right_into_wall_snaps_to_its_left_edge() {
        let tiles = [tile_at(3, 0)];
        let mut c = character_at(62.0, 0.0); // right edge 94, wall at 96
        c.set_horizontal_intent(HorizontalIntent::Right);
        assert_eq!(horizontal_pass(&mut c, &tiles), 1);
        assert_eq!(c.rect.right(), 96.0);
    }

    #[test]
    fn walking_left_into_wall_snaps_to_its_right_edge() {
        let tiles = [tile_at(1, 0)];
        let mut c = character_at(66.0, 0.0); // left edge 66, wall ends at 64
        c.set_horizontal_intent(HorizontalIntent::Left);
        assert_eq!(horizontal_pass(&mut c, &tiles), 1);
        assert_eq!(c.rect.left(), 64.0);
    }

    #[test]
    fn free_walk_moves_by_speed() {
        let mut c = character_at(100.0, 0.0);
        c.set_horizontal_intent(HorizontalIntent::Left);
        assert_eq!(horizontal_pass(&mut c, &[]), 0);
        assert_eq!(c.rect.left(), 95.0);
    }

    #[test]
    fn zero_intent_never_repositions() {
        // Right edge exactly touching the wall.
        let tiles = [tile_at(3, 0)];
        let mut c = character_at(64.0, 0.0);
        let before = c.clone();
        for _ in 0..10 {
            assert_eq!(horizontal_pass(&mut c, &tiles), 0);
        }
        assert_eq!(c, before);
    }

    #[test]
    fn zero_intent_ignores_overlap_too() {
        // Even an overlapping tile is left alone when not moving.
        let tiles = [Tile::new(90.0, 0.0, T)];
        let mut c = character_at(64.0, 0.0);
        horizontal_pass(&mut c, &tiles);
        assert_eq!(c.rect.left(), 64.0);
    }

    #[test]
    fn zero_speed_still_pushes_out_of_shifted_tile() {
        // Camera pan: speed 0, but a tile shifted into the character.
        let tiles = [Tile::new(90.0, 0.0, T)];
        let mut c = character_at(64.0, 0.0);
        c.speed = 0.0;
        c.set_horizontal_intent(HorizontalIntent::Right);
        horizontal_pass(&mut c, &tiles);
        assert_eq!(c.rect.right(), 90.0);
    }

    // ── Vertical ──

    #[test]
    fn drop_onto_single_tile_settles() {
        let tiles = [tile_at(2, 5)];
        let mut c = character_at(64.0, 0.0);
        c.on_ground = false;

        let mut landed_frames = 0;
        for _ in 0..200 {
            horizontal_pass(&mut c, &tiles);
            if vertical_pass(&mut c, &tiles, gravity()).landed {
                landed_frames += 1;
            }
        }
        assert!(c.on_ground);
        assert_eq!(c.vy, 0.0);
        assert_eq!(c.rect.bottom(), 5.0 * T);
        assert_eq!(landed_frames, 1);
    }

    #[test]
    fn resting_character_stays_grounded() {
        let tiles = [tile_at(0, 1)];
        let mut c = character_at(0.0, 0.0);
        for _ in 0..30 {
            let out = vertical_pass(&mut c, &tiles, gravity());
            assert!(!out.landed);
            assert!(c.on_ground);
            assert_eq!(c.rect.bottom(), T);
        }
    }

    #[test]
    fn rising_into_ceiling_stops_upward_motion() {
        let tiles = [tile_at(0, 0)];
        let mut c = character_at(0.0, T + 2.0);
        c.on_ground = false;
        c.vy = -6.0;
        let out = vertical_pass(&mut c, &tiles, gravity());
        assert!(out.bumped_head);
        assert_eq!(c.rect.top(), T);
        assert_eq!(c.vy, 0.0);
        assert!(!c.on_ground);
    }

    #[test]
    fn walking_off_ledge_clears_ground_within_two_frames() {
        let mut c = character_at(0.0, 0.0);
        assert!(c.on_ground);
        vertical_pass(&mut c, &[], gravity()); // vy 0.8, still under threshold
        assert!(c.on_ground);
        vertical_pass(&mut c, &[], gravity()); // vy 1.6
        assert!(!c.on_ground);
    }

    #[test]
    fn jump_then_vertical_pass_keeps_flag_cleared() {
        let tiles = [tile_at(0, 1)];
        let mut c = character_at(0.0, 0.0);
        assert!(c.jump(-12.0));
        vertical_pass(&mut c, &tiles, gravity());
        assert!(!c.on_ground);
        assert!(c.vy < 0.0);
    }

    #[test]
    fn floor_clamp_catches_fall_without_tiles() {
        let mut c = character_at(0.0, 400.0);
        c.on_ground = false;
        c.vy = 9.0;
        let g = Gravity { floor: 416.0, ..gravity() };
        let out = vertical_pass(&mut c, &[], g);
        assert!(out.floor_clamped);
        assert_eq!(c.rect.bottom(), 416.0);
    }

    #[test]
    fn decay_rules() {
        let mut c = character_at(0.0, 0.0);
        c.vy = 1.0;
        decay_ground_state(&mut c);
        assert!(c.on_ground, "exactly 1.0 is not falling");

        c.vy = -0.1;
        decay_ground_state(&mut c);
        assert!(!c.on_ground);
    }

    // ── Bounds ──

    #[test]
    fn bounds_ok_inside_display() {
        let c = character_at(100.0, 100.0);
        assert!(check_bounds(&c, 800.0, 416.0, 1).is_ok());
    }

    #[test]
    fn bounds_allow_top_out() {
        let c = character_at(100.0, -80.0);
        assert!(check_bounds(&c, 800.0, 416.0, 1).is_ok());
    }

    #[test]
    fn bounds_flag_horizontal_escape() {
        let c = character_at(-1.0, 100.0);
        let err = check_bounds(&c, 800.0, 416.0, 7).unwrap_err();
        assert_eq!(err.frame, 7);
        assert!(err.detail.contains("left"));

        let c = character_at(790.0, 100.0);
        assert!(check_bounds(&c, 800.0, 416.0, 7).is_err());
    }

    #[test]
    fn bounds_flag_below_floor() {
        let mut c = character_at(0.0, 0.0);
        c.rect = Rect::new(0.0, 390.0, T, T);
        assert!(check_bounds(&c, 800.0, 416.0, 3).is_err());
    }

    // ── Property-based tests (proptest) ──

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        const COLS: usize = 8;
        const ROWS: usize = 6;

        fn tiles_from_mask(mask: &[bool]) -> Vec<Tile> {
            mask.iter()
                .enumerate()
                .filter(|(_, solid)| **solid)
                .map(|(i, _)| tile_at(i % COLS, i / COLS))
                .collect()
        }

        proptest! {
            #[test]
            fn vertical_pass_leaves_no_overlap(
                mask in proptest::collection::vec(proptest::bool::weighted(0.3), COLS * ROWS),
                x in 0.0f32..(COLS as f32 * T),
                y in -T..(ROWS as f32 * T),
                vy in -31.0f32..10.0,
                grounded in any::<bool>(),
            ) {
                let tiles = tiles_from_mask(&mask);
                let mut c = character_at(x, y);
                c.vy = vy;
                c.on_ground = grounded;
                prop_assume!(!tiles.iter().any(|t| t.rect.overlaps(&c.rect)));

                vertical_pass(&mut c, &tiles, gravity());

                for t in &tiles {
                    prop_assert!(!t.rect.overlaps(&c.rect), "{:?} overlaps {:?}", c.rect, t.rect);
                }
            }

            #[test]
            fn gravity_clamp_holds(frames in 1usize..500, start_vy in -20.0f32..10.0) {
                let mut c = character_at(0.0, 0.0);
                c.vy = start_vy;
                for _ in 0..frames {
                    c.apply_gravity(0.8, 10.0);
                    prop_assert!(c.vy <= 10.0);
                }
            }
        }
    }
}
