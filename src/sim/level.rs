/// Level: the complete state of a running level.
///
/// ## Ownership
///
///   - `map`: the parsed tile map. **Never mutated** after load;
///     `restart` rebuilds tiles and character from it.
///   - `tiles`: solid boxes in screen space (map + accumulated camera shift).
///   - `character`: `None` when the map has no spawn symbol.
///   - `camera_shift`: decided during frame N, applied to `tiles` in frame N+1.
///
/// The frame update lives in `sim::step`; drawing lives here.

use std::io::Write;

use crate::config::{LevelConfig, PhysicsConfig};
use crate::domain::camera::Camera;
use crate::domain::entity::Character;
use crate::domain::physics::Gravity;
use crate::domain::tile::Tile;
use crate::domain::tilemap::TileMap;
use crate::error::ConfigError;
use crate::ui::renderer::RenderContext;

pub struct Level {
    pub name: String,
    pub map: TileMap,
    pub tiles: Vec<Tile>,
    pub character: Option<Character>,
    pub camera: Camera,
    pub camera_shift: f32,
    pub gravity: Gravity,
    pub jump_velocity: f32,
    pub display_width: f32,
    /// Total camera shift applied since load (for the HUD).
    pub scroll: f32,
    pub frame: u64,
}

impl Level {
    /// Validate settings, parse the map, and place tiles and character.
    pub fn new(
        name: &str,
        level: &LevelConfig,
        physics: &PhysicsConfig,
        rows: &[String],
    ) -> Result<Self, ConfigError> {
        level.validate(physics)?;
        let map = TileMap::parse(rows, level.tile_size)?;

        let tile_size = level.tile_size as f32;
        let display_width = level.display_width as f32;
        // One tile above the display's bottom edge.
        let floor = level.display_height as f32 - tile_size;

        if let Some((row, col)) = map.spawn {
            let (x, y) = map.cell_to_world(row, col);
            if x + tile_size > display_width || y + tile_size > floor {
                return Err(ConfigError::SpawnOffscreen { row, col });
            }
        }

        let mut lvl = Level {
            name: name.to_string(),
            tiles: vec![],
            character: None,
            camera: Camera::new(level.display_width, physics.pan_speed, physics.run_speed),
            camera_shift: 0.0,
            gravity: Gravity {
                accel: physics.gravity,
                terminal_fall: physics.terminal_fall,
                floor,
            },
            jump_velocity: physics.jump_velocity,
            display_width,
            scroll: 0.0,
            frame: 0,
            map,
        };
        lvl.restart();

        match lvl.map.spawn {
            Some((r, c)) => tracing::info!(
                "level {:?}: {}x{} cells, {} solids, spawn at row {r} col {c}",
                lvl.name, lvl.map.width, lvl.map.height, lvl.map.solids.len(),
            ),
            None => tracing::warn!(
                "level {:?} has no spawn symbol; running without a character",
                lvl.name,
            ),
        }

        Ok(lvl)
    }

    /// Put tiles and character back where the map placed them.
    pub fn restart(&mut self) {
        self.tiles = self.map.build_tiles();
        let size = self.map.tile_size as f32;
        let speed = self.camera.run_speed;
        self.character = self.map.spawn_position()
            .map(|(x, y)| Character::new(x, y, size, speed));
        self.camera_shift = 0.0;
        self.scroll = 0.0;
        self.frame = 0;
    }

    /// Translate every tile by the pending camera shift.
    pub fn apply_camera_shift(&mut self) {
        if self.camera_shift == 0.0 {
            return;
        }
        for tile in &mut self.tiles {
            tile.shift(self.camera_shift);
        }
        self.scroll += self.camera_shift;
    }

    /// Tiles first, character on top.
    pub fn draw<W: Write>(&self, ctx: &mut RenderContext<W>) {
        for tile in &self.tiles {
            tile.draw(ctx);
        }
        if let Some(c) = &self.character {
            c.draw(ctx);
        }
    }
}
