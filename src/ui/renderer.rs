/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Entities rasterize their boxes into a sub-pixel `Canvas`
///   2. The canvas is folded into `front` cells, two sub-pixels per cell
///      using the upper half block: fg = top half, bg = bottom half
///   3. Compare each cell with `back` buffer (previous frame)
///   4. Only emit terminal commands for cells that changed
///   5. All commands are batched with `queue!`, flushed once at the end
///   6. Swap front/back
///
/// ## Scale
///   One tile = 2 terminal columns × 1 terminal row, so one sub-pixel is
///   `tile_size / 2` world pixels square.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, SetTitle},
};

use crate::domain::geom::Rect;
use crate::sim::level::Level;

/// What a box is filled with.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Fill {
    Sky,
    Tile,
    Character,
}

impl Fill {
    fn color(self) -> Color {
        match self {
            Fill::Sky => Color::Rgb { r: 135, g: 206, b: 235 },
            Fill::Tile => Color::Rgb { r: 92, g: 64, b: 51 },
            Fill::Character => Color::Rgb { r: 255, g: 0, b: 0 },
        }
    }
}

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn half_blocks(top: Fill, bottom: Fill) -> Self {
        Cell { ch: '▀', fg: top.color(), bg: bottom.color() }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell { ch, fg, bg });
        }
    }
}

// ── Canvas: sub-pixel fill grid ──

struct Canvas {
    cols: usize,
    rows: usize,
    /// World pixels per sub-pixel, both axes.
    scale: f32,
    pixels: Vec<Fill>,
}

impl Canvas {
    fn new(display_w: u32, display_h: u32, tile_size: u32) -> Self {
        let scale = (tile_size as f32 / 2.0).max(1.0);
        let cols = (display_w as f32 / scale).ceil() as usize;
        let mut rows = (display_h as f32 / scale).ceil() as usize;
        rows += rows % 2; // whole terminal rows
        Canvas { cols, rows, scale, pixels: vec![Fill::Sky; cols * rows] }
    }

    fn clear(&mut self) {
        self.pixels.fill(Fill::Sky);
    }

    /// Index range of sub-pixels whose centers fall inside [lo, hi).
    fn span(&self, lo: f32, hi: f32, len: usize) -> (usize, usize) {
        let start = (lo / self.scale - 0.5).ceil().max(0.0) as usize;
        let end = (hi / self.scale - 0.5).ceil().max(0.0) as usize;
        (start.min(len), end.min(len))
    }

    fn fill(&mut self, rect: &Rect, fill: Fill) {
        let (c0, c1) = self.span(rect.left(), rect.right(), self.cols);
        let (r0, r1) = self.span(rect.top(), rect.bottom(), self.rows);
        for r in r0..r1 {
            let row = &mut self.pixels[r * self.cols..(r + 1) * self.cols];
            row[c0..c1].fill(fill);
        }
    }

    fn at(&self, col: usize, row: usize) -> Fill {
        self.pixels[row * self.cols + col]
    }
}

// ── RenderContext ──

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const HELP: &str = " ←/→ A/D:Move  Space/↑:Jump  R:Restart  Esc/Q:Quit";

/// Owns the terminal (or any writer) and everything drawn to it.
pub struct RenderContext<W: Write = io::Stdout> {
    writer: BufWriter<W>,
    canvas: Canvas,
    front: FrameBuffer,
    back: FrameBuffer,
    map_rows: usize,
    /// Set by `init`: the writer is a real terminal.
    interactive: bool,
    term_size: (u16, u16),
    enhanced_keys: bool,
}

impl RenderContext<io::Stdout> {
    pub fn stdout(display_w: u32, display_h: u32, tile_size: u32) -> Self {
        RenderContext::new(io::stdout(), display_w, display_h, tile_size)
    }
}

impl<W: Write> RenderContext<W> {
    pub fn new(writer: W, display_w: u32, display_h: u32, tile_size: u32) -> Self {
        let canvas = Canvas::new(display_w, display_h, tile_size);
        let map_rows = canvas.rows / 2;
        let width = canvas.cols.max(HELP.chars().count());
        let height = MAP_ROW + map_rows + 2;
        let mut back = FrameBuffer::new(width, height);
        // Force full repaint on first frame: back ≠ front for every cell.
        back.cells.fill(Cell::INVALID);
        RenderContext {
            writer: BufWriter::with_capacity(16384, writer),
            canvas,
            front: FrameBuffer::new(width, height),
            back,
            map_rows,
            interactive: false,
            term_size: (0, 0),
            enhanced_keys: false,
        }
    }

    /// Enter raw mode + alternate screen. Returns whether the terminal
    /// reports key releases (keyboard enhancement).
    pub fn init(&mut self, title: &str) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetTitle(title),
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced_keys = true;
        }

        self.interactive = true;
        self.term_size = terminal::size().unwrap_or((80, 24));
        self.back.cells.fill(Cell::INVALID);
        Ok(self.enhanced_keys)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.enhanced_keys {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Rasterize a world box. Parts outside the display are clipped.
    pub fn fill_box(&mut self, rect: &Rect, fill: Fill) {
        self.canvas.fill(rect, fill);
    }

    pub fn render(&mut self, level: &Level) -> io::Result<()> {
        // Detect terminal resize
        if self.interactive {
            let size = terminal::size().unwrap_or((80, 24));
            if size != self.term_size {
                self.term_size = size;
                // Force full repaint after resize.
                self.back.cells.fill(Cell::INVALID);
                queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            }
        }

        self.canvas.clear();
        level.draw(self);

        self.front.clear();
        self.compose_hud(level);
        self.compose_map();
        self.compose_help();

        // Diff and emit
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, level: &Level) {
        let hud = match &level.character {
            Some(c) => format!(
                " {}  x:{:<6.1} y:{:<6.1} vy:{:<5.1} {}  scroll:{:<6.0}",
                level.name, c.rect.x, c.rect.y, c.vy,
                if c.on_ground { "GROUND" } else { "AIR   " },
                -level.scroll,
            ),
            None => format!(" {}  (no spawn)", level.name),
        };
        for x in 0..self.front.width {
            self.front.set(x, HUD_ROW, Cell { ch: ' ', fg: Color::White, bg: HUD_BG });
        }
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
    }

    fn compose_map(&mut self) {
        for row in 0..self.map_rows {
            for col in 0..self.canvas.cols {
                let top = self.canvas.at(col, row * 2);
                let bottom = self.canvas.at(col, row * 2 + 1);
                self.front.set(col, MAP_ROW + row, Cell::half_blocks(top, bottom));
            }
        }
    }

    fn compose_help(&mut self) {
        let help_row = MAP_ROW + self.map_rows + 1;
        self.front.put_str(0, help_row, HELP, Color::DarkGrey, Cell::BASE_BG);
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                // Position cursor unless we just wrote the cell to the left
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}
