/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub level: LevelConfig,
    pub physics: PhysicsConfig,
    pub gamepad: GamepadConfig,
    pub title: String,
    /// Map file resolved against the search directories. `None` if not found.
    pub map_file: Option<PathBuf>,
}

/// Level definition: everything needed to lay out and pace one level.
#[derive(Clone, Debug)]
pub struct LevelConfig {
    pub tile_size: u32,
    /// Inline map rows. Empty = use the map file or the built-in map.
    pub rows: Vec<String>,
    pub display_width: u32,
    pub display_height: u32,
    pub fps: u32,
}

#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub terminal_fall: f32,
    pub jump_velocity: f32,
    pub run_speed: f32,
    pub pan_speed: f32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    level: TomlLevel,
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
    #[serde(default = "default_fps")]
    fps: u32,
    #[serde(default = "default_title")]
    title: String,
}

#[derive(Deserialize, Debug)]
struct TomlLevel {
    #[serde(default = "default_tile_size")]
    tile_size: u32,
    #[serde(default)]
    rows: Vec<String>,
    #[serde(default = "default_map_file")]
    map_file: String,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_gravity")]
    gravity: f32,
    #[serde(default = "default_terminal_fall")]
    terminal_fall: f32,
    #[serde(default = "default_jump_velocity")]
    jump_velocity: f32,
    #[serde(default = "default_run_speed")]
    run_speed: f32,
    #[serde(default = "default_pan_speed")]
    pan_speed: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_jump")]
    jump: Vec<String>,
    #[serde(default = "default_pad_restart")]
    restart: Vec<String>,
    #[serde(default = "default_pad_quit")]
    quit: Vec<String>,
}

// ── Defaults ──

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 448 }   // 14 rows of 32px
fn default_fps() -> u32 { 60 }
fn default_title() -> String { "Jumper".into() }

fn default_tile_size() -> u32 { 32 }
fn default_map_file() -> String { "level.txt".into() }

fn default_gravity() -> f32 { 0.8 }
fn default_terminal_fall() -> f32 { 10.0 }
fn default_jump_velocity() -> f32 { -12.0 }  // ~90px apex at 0.8 gravity
fn default_run_speed() -> f32 { 5.0 }
fn default_pan_speed() -> f32 { 5.0 }

fn default_pad_jump() -> Vec<String> { vec!["A".into(), "B".into()] }
fn default_pad_restart() -> Vec<String> { vec!["Start".into()] }
fn default_pad_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            title: default_title(),
        }
    }
}

impl Default for TomlLevel {
    fn default() -> Self {
        TomlLevel {
            tile_size: default_tile_size(),
            rows: vec![],
            map_file: default_map_file(),
        }
    }
}

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            gravity: default_gravity(),
            terminal_fall: default_terminal_fall(),
            jump_velocity: default_jump_velocity(),
            run_speed: default_run_speed(),
            pan_speed: default_pan_speed(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_pad_jump(),
            restart: default_pad_restart(),
            quit: default_pad_quit(),
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        LevelConfig {
            tile_size: default_tile_size(),
            rows: vec![],
            display_width: default_width(),
            display_height: default_height(),
            fps: default_fps(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: default_gravity(),
            terminal_fall: default_terminal_fall(),
            jump_velocity: default_jump_velocity(),
            run_speed: default_run_speed(),
            pan_speed: default_pan_speed(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);

        let map_file_str = &toml_cfg.level.map_file;
        let map_file = if PathBuf::from(map_file_str).is_absolute() {
            Some(PathBuf::from(map_file_str)).filter(|p| p.is_file())
        } else {
            search_dirs.iter()
                .map(|d| d.join(map_file_str))
                .find(|p| p.is_file())
        };

        Self::from_toml(toml_cfg, map_file)
    }

    /// Parse config text directly (no file search, no map file).
    #[cfg(test)]
    pub fn from_str(text: &str) -> Result<Self, toml::de::Error> {
        let cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::from_toml(cfg, None))
    }

    fn from_toml(toml_cfg: TomlConfig, map_file: Option<PathBuf>) -> Self {
        GameConfig {
            level: LevelConfig {
                tile_size: toml_cfg.level.tile_size,
                rows: toml_cfg.level.rows,
                display_width: toml_cfg.display.width,
                display_height: toml_cfg.display.height,
                fps: toml_cfg.display.fps,
            },
            physics: PhysicsConfig {
                gravity: toml_cfg.physics.gravity,
                terminal_fall: toml_cfg.physics.terminal_fall,
                jump_velocity: toml_cfg.physics.jump_velocity,
                run_speed: toml_cfg.physics.run_speed,
                pan_speed: toml_cfg.physics.pan_speed,
            },
            gamepad: GamepadConfig {
                jump: toml_cfg.gamepad.jump,
                restart: toml_cfg.gamepad.restart,
                quit: toml_cfg.gamepad.quit,
            },
            title: toml_cfg.display.title,
            map_file,
        }
    }
}

impl LevelConfig {
    /// Milliseconds per frame at the configured rate.
    pub fn frame_ms(&self) -> u64 {
        1000 / self.fps.max(1) as u64
    }

    /// Reject settings the simulation cannot run with.
    pub fn validate(&self, physics: &PhysicsConfig) -> Result<(), ConfigError> {
        if self.tile_size == 0 {
            return Err(invalid("tile_size", "must be greater than 0"));
        }
        if self.fps == 0 {
            return Err(invalid("fps", "must be greater than 0"));
        }
        if self.display_width == 0 || self.display_height == 0 {
            return Err(invalid("display", "width and height must be greater than 0"));
        }
        if self.display_height < self.tile_size {
            return Err(invalid("display.height", "must be at least one tile"));
        }
        if physics.gravity <= 0.0 {
            return Err(invalid("gravity", "must be positive"));
        }
        if physics.terminal_fall <= 0.0 || physics.terminal_fall >= self.tile_size as f32 {
            // A fall faster than one tile per frame could skip through a floor.
            return Err(invalid(
                "terminal_fall",
                format!("must be in (0, {})", self.tile_size),
            ));
        }
        let tile = self.tile_size as f32;
        if physics.jump_velocity >= 0.0 || -physics.jump_velocity >= tile {
            // Rising a full tile per frame could skip through a ceiling.
            return Err(invalid(
                "jump_velocity",
                format!("must be in (-{tile}, 0)"),
            ));
        }
        if physics.run_speed < 0.0 || physics.pan_speed < 0.0 {
            return Err(invalid("speed", "must not be negative"));
        }
        // The frame after a pan stops applies the last shift while the
        // character already runs, so tiles and character close in by both.
        if physics.run_speed + physics.pan_speed >= tile {
            return Err(invalid(
                "speed",
                format!("run_speed + pan_speed must be below {tile}"),
            ));
        }
        Ok(())
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue { key, reason: reason.into() }
}

/// Candidate directories to search: exe dir + CWD + XDG data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/jumper)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/jumper");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => {
                        tracing::info!("loaded {}", path.display());
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!("config.toml parse error: {e}, using defaults");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    tracing::warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
