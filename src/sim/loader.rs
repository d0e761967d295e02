/// Level source resolution.
///
/// ## Sources (priority order):
///   1. Inline `[level].rows` in config.toml
///   2. Map file (`[level].map_file`, default `level.txt`)
///   3. Built-in embedded map
///
/// ## Map file format:
///   Optional first line: `# Level Name`
///   Lines: map rows, all the same length
///   Trailing blank lines are ignored.
///
/// ## Tile legend:
///   '0' = Empty    '1' = Solid    'P' = Character spawn

use std::path::Path;

use crate::config::GameConfig;

/// Runtime level data (owned strings, loaded from config, file, or embedded).
#[derive(Clone, Debug, PartialEq)]
pub struct LevelDef {
    pub name: String,
    pub rows: Vec<String>,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

pub fn load_level_def(config: &GameConfig) -> LevelDef {
    if !config.level.rows.is_empty() {
        tracing::info!("using {} inline map rows from config", config.level.rows.len());
        return LevelDef {
            name: "Inline Level".to_string(),
            rows: config.level.rows.clone(),
        };
    }

    if let Some(path) = &config.map_file {
        match load_from_file(path) {
            Some(def) => {
                tracing::info!("loaded map {}", path.display());
                return def;
            }
            None => tracing::warn!("map {} is empty or unreadable, using built-in map", path.display()),
        }
    }

    embedded_level()
}

// ══════════════════════════════════════════════════════════════
// File parsing
// ══════════════════════════════════════════════════════════════

fn load_from_file(path: &Path) -> Option<LevelDef> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_level_file(&content),
        Err(e) => {
            tracing::warn!("could not read {}: {e}", path.display());
            None
        }
    }
}

/// Parse a single level from text content.
/// Rows are kept verbatim (apart from line endings) so that
/// `TileMap::parse` sees and reports any malformed row.
pub fn parse_level_file(content: &str) -> Option<LevelDef> {
    let mut name = String::new();
    let mut rows = vec![];

    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        if rows.is_empty() && name.is_empty() && line.starts_with('#') {
            name = line[1..].trim().to_string();
        } else if rows.is_empty() && line.trim().is_empty() {
            continue; // leading blank lines
        } else {
            rows.push(line.to_string());
        }
    }

    while rows.last().map_or(false, |r| r.trim().is_empty()) {
        rows.pop();
    }

    if rows.is_empty() {
        return None;
    }

    if name.is_empty() {
        name = "Unnamed Level".to_string();
    }

    Some(LevelDef { name, rows })
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback level
// ══════════════════════════════════════════════════════════════

pub fn embedded_level() -> LevelDef {
    make_embedded("Level 1 - First Steps", &[
        "000000000000000000000000000000000000000000000000000000000000",
        "000000000000000000000000000000000000000000000000000000000000",
        "000000000000000000000000000000000000000000000000000000000000",
        "000000000000000000000000000000000000000000000000000000000000",
        "000000000000000000000000000000000000000000000000000000000000",
        "000000000000000000000000000000000000000000000000000000000000",
        "000000000000000000000000000000000000000000000000000000000000",
        "000000000000000000000000000000000111000000000000000000000000",
        "000000000000001111000000000000000000000000000000000000000001",
        "000000000000000000000000001111100000000000000000000000000001",
        "100000001111000000000000000000000000000000000000111110000001",
        "100000000000000000001000000000000000000000000000000000000001",
        "1000P0000000000000001000000000000000000000000100000000000001",
        "111111111111111111111100111111111111111100111111111111111111",
    ])
}

fn make_embedded(name: &str, map: &[&str]) -> LevelDef {
    LevelDef {
        name: name.to_string(),
        rows: map.iter().map(|s| s.to_string()).collect(),
    }
}
