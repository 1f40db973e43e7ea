/// Presentation layer: a 1-bit framebuffer shown on the terminal.
///
/// How it works:
///   1. The simulation draws into `pixels` (one bool per display pixel)
///   2. `present()` folds each pair of pixel rows into one terminal row of
///      half-block glyphs (▀ ▄ █ or space)
///   3. Each glyph is compared with the previous frame's glyph; only
///      changed cells emit terminal commands
///   4. All commands are batched with `queue!`, flushed once at the end
///
/// This eliminates flicker caused by full-screen redraws.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::sprite::xbm_pixel;
use crate::sim::ports::DisplaySurface;

const INK: Color = Color::Rgb { r: 120, g: 230, b: 255 };
const PAPER: Color = Color::Rgb { r: 10, g: 12, b: 20 };

/// Sentinel glyph used to invalidate the back buffer.
const INVALID: char = '\0';

// ── Framebuffer (terminal-independent, testable) ──

pub struct Framebuffer {
    width: i32,
    height: i32,
    pixels: Vec<bool>,
}

impl Framebuffer {
    pub fn new(width: i32, height: i32) -> Self {
        let len = (width.max(0) * height.max(0)) as usize;
        Framebuffer { width, height, pixels: vec![false; len] }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set a pixel; writes outside the buffer are clipped.
    pub fn set(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        self.pixels[(y * self.width + x) as usize] = true;
    }

    pub fn clear(&mut self) {
        self.pixels.fill(false);
    }

    pub fn blit_xbm(&mut self, x: i32, y: i32, w: i32, h: i32, data: &[u8]) {
        for by in 0..h {
            for bx in 0..w {
                if xbm_pixel(data, w, bx, by) {
                    self.set(x + bx, y + by);
                }
            }
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        for py in y.max(0)..(y + h).min(self.height) {
            for px in x.max(0)..(x + w).min(self.width) {
                self.set(px, py);
            }
        }
    }

    /// Number of terminal rows needed (two pixel rows per terminal row).
    pub fn text_rows(&self) -> i32 {
        (self.height + 1) / 2
    }

    /// Half-block glyph for terminal cell `(col, row)`.
    pub fn glyph(&self, col: i32, row: i32) -> char {
        let top = self.get(col, row * 2);
        let bottom = self.get(col, row * 2 + 1);
        match (top, bottom) {
            (false, false) => ' ',
            (true, false) => '▀',
            (false, true) => '▄',
            (true, true) => '█',
        }
    }
}

// ── Terminal surface ──

pub struct TerminalDisplay {
    writer: BufWriter<Stdout>,
    frame: Framebuffer,
    back: Vec<char>,
    term_w: u16,
    term_h: u16,
    enhanced_keys: bool,
}

impl TerminalDisplay {
    pub fn new(width: i32, height: i32) -> Self {
        let frame = Framebuffer::new(width, height);
        let cells = (frame.width().max(0) * frame.text_rows().max(0)) as usize;
        TerminalDisplay {
            writer: BufWriter::with_capacity(16 * 1024, io::stdout()),
            frame,
            back: vec![INVALID; cells],
            term_w: 0,
            term_h: 0,
            enhanced_keys: false,
        }
    }

    /// Did the terminal accept key release reporting?
    pub fn enhanced_keys(&self) -> bool {
        self.enhanced_keys
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(PAPER),
            Clear(ClearType::All)
        )?;

        // Release events let held buttons end exactly when the key is let go.
        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                        | KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                )
            )?;
            self.enhanced_keys = true;
        }

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw;
        self.term_h = th;
        self.back.fill(INVALID);
        Ok(())
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

    /// Top-left terminal cell of the display, centered when it fits.
    fn origin(&self) -> (u16, u16) {
        let w = self.frame.width().max(0) as u16;
        let h = self.frame.text_rows().max(0) as u16;
        (self.term_w.saturating_sub(w) / 2, self.term_h.saturating_sub(h) / 2)
    }
}

impl DisplaySurface for TerminalDisplay {
    fn clear(&mut self) {
        self.frame.clear();
    }

    fn draw_bitmap(&mut self, x: i32, y: i32, w: i32, h: i32, data: &[u8]) {
        self.frame.blit_xbm(x, y, w, h, data);
    }

    fn draw_filled_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.frame.fill_rect(x, y, w, h);
    }

    fn present(&mut self) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw != self.term_w || th != self.term_h {
            self.term_w = tw;
            self.term_h = th;
            self.back.fill(INVALID);
            queue!(self.writer, SetBackgroundColor(PAPER), Clear(ClearType::All))?;
        }

        let (ox, oy) = self.origin();
        let cols = self.frame.width();
        queue!(self.writer, SetForegroundColor(INK), SetBackgroundColor(PAPER))?;

        for row in 0..self.frame.text_rows() {
            let ty = oy as i32 + row;
            if ty >= self.term_h as i32 {
                break;
            }
            for col in 0..cols {
                let tx = ox as i32 + col;
                if tx >= self.term_w as i32 {
                    break;
                }
                let idx = (row * cols + col) as usize;
                let glyph = self.frame.glyph(col, row);
                if self.back[idx] == glyph {
                    continue;
                }
                self.back[idx] = glyph;
                queue!(self.writer, MoveTo(tx as u16, ty as u16), Print(glyph))?;
            }
        }

        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_clips_to_buffer() {
        let mut fb = Framebuffer::new(8, 4);
        fb.fill_rect(-1, -1, 3, 3);
        assert!(fb.get(0, 0) && fb.get(1, 1));
        assert!(!fb.get(2, 0) && !fb.get(0, 2));
        fb.fill_rect(6, 2, 16, 16);
        assert!(fb.get(7, 3));
    }

    #[test]
    fn half_blocks_pair_rows() {
        let mut fb = Framebuffer::new(4, 4);
        fb.set(0, 0);
        fb.set(1, 1);
        fb.set(2, 0);
        fb.set(2, 1);
        assert_eq!(fb.glyph(0, 0), '▀');
        assert_eq!(fb.glyph(1, 0), '▄');
        assert_eq!(fb.glyph(2, 0), '█');
        assert_eq!(fb.glyph(3, 0), ' ');
        assert_eq!(fb.text_rows(), 2);
    }

    #[test]
    fn odd_height_rounds_rows_up() {
        let fb = Framebuffer::new(4, 9);
        assert_eq!(fb.text_rows(), 5);
    }

    #[test]
    fn blit_draws_only_ink() {
        let mut fb = Framebuffer::new(16, 4);
        // Row 0: pixels 0 and 9; row 1 empty.
        fb.blit_xbm(2, 1, 10, 2, &[0b0000_0001, 0b0000_0010, 0, 0]);
        assert!(fb.get(2, 1));
        assert!(fb.get(11, 1));
        assert!(!fb.get(3, 1));
        assert!(!fb.get(2, 2));
    }

    #[test]
    fn clear_erases_everything() {
        let mut fb = Framebuffer::new(8, 8);
        fb.fill_rect(0, 0, 8, 8);
        fb.clear();
        assert!((0..8).all(|y| (0..8).all(|x| !fb.get(x, y))));
    }
}
