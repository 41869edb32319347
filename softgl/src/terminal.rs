//! The terminal stands in for the window: alternate screen, raw mode, and a
//! braille presenter that shows the framebuffer 2×4 pixels per cell. The
//! bottom row is kept for a status line.

use crate::framebuffer::Framebuffer;
use anyhow::Result;
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use std::io::{self, Write};

pub const STATUS_ROWS: u16 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub struct CellBuffer {
    pub w: u16,
    pub h: u16,
    pub cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }

    pub fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        if x < self.w && y < self.h {
            Some(self.cells[self.idx(x, y)])
        } else {
            None
        }
    }

    pub fn clear(&mut self, bg: Color) {
        self.cells.fill(Cell {
            bg,
            ..Cell::default()
        });
    }

    pub fn write_str(&mut self, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            let xi = x as usize + i;
            if xi >= self.w as usize {
                break;
            }
            self.set(xi as u16, y, Cell { ch, fg, bg });
        }
    }
}

/// Framebuffer pixels per cell, horizontally and vertically.
pub const CELL_PX: (u32, u32) = (2, 4);

/// Framebuffer size that fills a `cols`×`rows` terminal minus the status line.
pub fn framebuffer_size(cols: u16, rows: u16) -> (u32, u32) {
    let canvas_rows = rows.saturating_sub(STATUS_ROWS);
    (cols as u32 * CELL_PX.0, canvas_rows as u32 * CELL_PX.1)
}

pub struct Window {
    out: io::Stdout,
    cols: u16,
    rows: u16,
    prev: CellBuffer,
    cur: CellBuffer,
    enable_color: bool,
}

impl Window {
    pub fn open(title: &str, enable_color: bool) -> Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            SetTitle(title),
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            enable_color,
        })
    }

    pub fn close(&mut self) -> Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn framebuffer_size(&self) -> (u32, u32) {
        framebuffer_size(self.cols, self.rows)
    }

    /// Returns true when the terminal changed size since the last call.
    pub fn resize_if_needed(&mut self) -> Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    /// Shows `fb` plus a status line and flushes only the cells that changed.
    pub fn present(&mut self, fb: &Framebuffer, status: &str) -> Result<()> {
        let bg = if self.enable_color {
            let p = fb.background();
            Color::Rgb {
                r: p.r,
                g: p.g,
                b: p.b,
            }
        } else {
            Color::Black
        };
        self.cur.clear(bg);
        framebuffer_to_cells(fb, &mut self.cur, self.enable_color, bg);
        let status_row = self.rows.saturating_sub(STATUS_ROWS);
        for x in 0..self.cols {
            self.cur.set(x, status_row, Cell::default());
        }
        self.cur.write_str(0, status_row, status, Color::Grey, Color::Black);

        queue!(self.out, BeginSynchronizedUpdate)?;
        let mut last_fg = None;
        let mut last_bg = None;
        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }
                queue!(self.out, cursor::MoveTo(x, y))?;
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                queue!(self.out, Print(c.ch))?;
            }
        }
        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

fn braille_bit(dx: u32, dy: u32) -> u8 {
    // (0,0)=1 (0,1)=2 (0,2)=4 (0,3)=64
    // (1,0)=8 (1,1)=16 (1,2)=32 (1,3)=128
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

/// Packs drawn (non-background) pixels into braille dots. The framebuffer's
/// row 0 is the bottom, so rows are flipped on the way out.
pub fn framebuffer_to_cells(fb: &Framebuffer, out: &mut CellBuffer, enable_color: bool, bg: Color) {
    let (cw, ch) = CELL_PX;
    let cols = (fb.width() / cw).min(out.w as u32);
    let rows = (fb.height() / ch).min(out.h as u32);

    for cy in 0..rows {
        for cx in 0..cols {
            let mut mask: u8 = 0;
            let mut sum = [0u32; 3];
            let mut ink: u32 = 0;

            for dy in 0..ch {
                for dx in 0..cw {
                    let x = cx * cw + dx;
                    let y = fb.height() - 1 - (cy * ch + dy);
                    let Some(p) = fb.pixel(x, y) else { continue };
                    if p.a < 32 {
                        continue;
                    }
                    mask |= braille_bit(dx, dy);
                    sum[0] += p.r as u32;
                    sum[1] += p.g as u32;
                    sum[2] += p.b as u32;
                    ink += 1;
                }
            }

            if ink == 0 {
                continue;
            }
            let fg = if enable_color {
                Color::Rgb {
                    r: (sum[0] / ink) as u8,
                    g: (sum[1] / ink) as u8,
                    b: (sum[2] / ink) as u8,
                }
            } else {
                Color::White
            };
            let glyph = char::from_u32(0x2800 + mask as u32).unwrap_or(' ');
            out.set(cx as u16, cy as u16, Cell { ch: glyph, fg, bg });
        }
    }
}
