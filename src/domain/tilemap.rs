/// Tile map parsing: text rows → solid cells + spawn cell.
///
/// ## Legend
///   '0' = empty    '1' = solid    'P' = character spawn
///
/// Grid cell (row i, col j) sits at world (j * tile_size, i * tile_size).
///
/// ## Rejected maps
///   - no rows, or zero-width rows
///   - rows of differing length (no padding)
///   - more than one 'P'
///   - any other symbol
///
/// A map with no 'P' is accepted; the level then runs without a character.

use super::tile::{Symbol, Tile};
use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    pub tile_size: u32,
    pub width: usize,
    pub height: usize,
    /// Solid cells as (row, col), in row-major order.
    pub solids: Vec<(usize, usize)>,
    /// Spawn cell as (row, col).
    pub spawn: Option<(usize, usize)>,
}

impl TileMap {
    pub fn parse<S: AsRef<str>>(rows: &[S], tile_size: u32) -> Result<Self, ConfigError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().chars().count());
        if height == 0 || width == 0 {
            return Err(ConfigError::EmptyMap);
        }

        let mut solids = vec![];
        let mut spawn: Option<(usize, usize)> = None;

        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let len = row.chars().count();
            if len != width {
                return Err(ConfigError::RaggedRow { row: i, expected: width, found: len });
            }
            for (j, ch) in row.chars().enumerate() {
                let symbol = Symbol::from_char(ch)
                    .ok_or(ConfigError::UnknownSymbol { row: i, col: j, symbol: ch })?;
                if symbol.is_solid() {
                    solids.push((i, j));
                } else if symbol == Symbol::Spawn {
                    if let Some(first) = spawn {
                        return Err(ConfigError::MultipleSpawns { first, second: (i, j) });
                    }
                    spawn = Some((i, j));
                }
            }
        }

        Ok(TileMap { tile_size, width, height, solids, spawn })
    }

    /// World position (x, y) of a grid cell.
    #[inline]
    pub fn cell_to_world(&self, row: usize, col: usize) -> (f32, f32) {
        let s = self.tile_size as f32;
        (col as f32 * s, row as f32 * s)
    }

    pub fn spawn_position(&self) -> Option<(f32, f32)> {
        self.spawn.map(|(r, c)| self.cell_to_world(r, c))
    }

    /// Fresh (unshifted) tile boxes, one per solid cell.
    pub fn build_tiles(&self) -> Vec<Tile> {
        self.solids.iter()
            .map(|&(r, c)| {
                let (x, y) = self.cell_to_world(r, c);
                Tile::new(x, y, self.tile_size as f32)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_maps_to_world_position() {
        let map = TileMap::parse(&["0000", "00P0", "1111"], 32).unwrap();
        assert_eq!(map.spawn, Some((1, 2)));
        assert_eq!(map.spawn_position(), Some((64.0, 32.0)));
    }

    #[test]
    fn solids_in_row_major_order() {
        let map = TileMap::parse(&["100", "011"], 10).unwrap();
        assert_eq!(map.solids, vec![(0, 0), (1, 1), (1, 2)]);
        let tiles = map.build_tiles();
        assert_eq!(tiles.len(), 3);
        assert_eq!(tiles[2].rect.left(), 20.0);
        assert_eq!(tiles[2].rect.top(), 10.0);
        assert_eq!(tiles[2].rect.w, 10.0);
    }

    #[test]
    fn spawn_is_not_solid() {
        let map = TileMap::parse(&["P1"], 32).unwrap();
        assert_eq!(map.solids, vec![(0, 1)]);
    }

    #[test]
    fn two_spawns_rejected() {
        let err = TileMap::parse(&["P00", "00P"], 32).unwrap_err();
        assert_eq!(err, ConfigError::MultipleSpawns { first: (0, 0), second: (1, 2) });
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = TileMap::parse(&["000", "00", "111"], 32).unwrap_err();
        assert_eq!(err, ConfigError::RaggedRow { row: 1, expected: 3, found: 2 });
    }

    #[test]
    fn unknown_symbol_rejected() {
        let err = TileMap::parse(&["0#0"], 32).unwrap_err();
        assert_eq!(err, ConfigError::UnknownSymbol { row: 0, col: 1, symbol: '#' });
    }

    #[test]
    fn empty_map_rejected() {
        let none: [&str; 0] = [];
        assert_eq!(TileMap::parse(&none, 32), Err(ConfigError::EmptyMap));
        assert_eq!(TileMap::parse(&[""], 32), Err(ConfigError::EmptyMap));
    }

    #[test]
    fn map_without_spawn_is_accepted() {
        let map = TileMap::parse(&["000", "111"], 32).unwrap();
        assert_eq!(map.spawn, None);
        assert_eq!(map.spawn_position(), None);
        assert_eq!(map.solids.len(), 3);
    }
}
