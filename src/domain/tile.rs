/// Map symbols and the solid tile entity.
/// Symbol semantics are centralized here, queried via methods.

use std::io::Write;

use super::geom::Rect;
use crate::ui::renderer::{Fill, RenderContext};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Symbol {
    #[default]
    Empty,   // '0'
    Solid,   // '1'
    Spawn,   // 'P'
}

impl Symbol {
    pub fn from_char(c: char) -> Option<Symbol> {
        match c {
            '0' => Some(Symbol::Empty),
            '1' => Some(Symbol::Solid),
            'P' => Some(Symbol::Spawn),
            _ => None,
        }
    }

    /// Does this symbol block the character?
    pub fn is_solid(self) -> bool {
        matches!(self, Symbol::Solid)
    }
}

/// A static solid box. Only the camera shift ever moves it.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Tile {
    pub rect: Rect,
}

impl Tile {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Tile { rect: Rect::new(x, y, size, size) }
    }

    /// Translate horizontally by the camera shift.
    #[inline]
    pub fn shift(&mut self, dx: f32) {
        self.rect.x += dx;
    }

    pub fn draw<W: Write>(&self, ctx: &mut RenderContext<W>) {
        ctx.fill_box(&self.rect, Fill::Tile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_parse() {
        assert_eq!(Symbol::from_char('0'), Some(Symbol::Empty));
        assert_eq!(Symbol::from_char('1'), Some(Symbol::Solid));
        assert_eq!(Symbol::from_char('P'), Some(Symbol::Spawn));
        assert_eq!(Symbol::from_char('p'), None);
        assert_eq!(Symbol::from_char(' '), None);
    }

    #[test]
    fn only_solid_blocks() {
        assert!(Symbol::Solid.is_solid());
        assert!(!Symbol::Empty.is_solid());
        assert!(!Symbol::Spawn.is_solid());
    }

    #[test]
    fn shift_moves_only_x() {
        let mut t = Tile::new(64.0, 96.0, 32.0);
        t.shift(-5.0);
        t.shift(-5.0);
        assert_eq!(t.rect, Rect::new(54.0, 96.0, 32.0, 32.0));
    }
}
