//! A [`Surface`] over a terminal, one cell per pixel.

use std::io;
use std::io::Stdout;

use bevel::render::Bitmap;
use bevel::render::Color;
use bevel::render::Surface;

use tui::backend::CrosstermBackend;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style;
use tui::widgets::Widget;
use tui::Terminal;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Cell {
  symbol: char,
  fg: Color,
  bg: Color,
}

impl Default for Cell {
  fn default() -> Self {
    Self {
      symbol: ' ',
      fg: Color::WHITE,
      bg: Color::BLACK,
    }
  }
}

/// A cell grid that holds whatever was last drawn on it and copies itself
/// into the terminal on [`Surface::present()`].
///
/// Filled rectangles become background color; strings and bevels are drawn
/// with characters over whatever background is already there.
pub struct TermSurface {
  terminal: Terminal<CrosstermBackend<Stdout>>,
  canvas: Canvas,
}

impl TermSurface {
  pub fn new(stdout: Stdout) -> io::Result<Self> {
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let size = terminal.size()?;
    Ok(Self {
      terminal,
      canvas: Canvas::new(size.width as i32, size.height as i32),
    })
  }
}

impl Surface for TermSurface {
  fn size(&self) -> (i32, i32) {
    (self.canvas.width, self.canvas.height)
  }

  fn draw_centered_string(&mut self, x: i32, y: i32, text: &str, color: Color) {
    let len = text.chars().count() as i32;
    self.canvas.string(x - len / 2, y, text, color);
  }

  fn draw_string(&mut self, x: i32, y: i32, text: &str, color: Color) {
    self.canvas.string(x, y, text, color);
  }

  fn draw_bevel(
    &mut self,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color1: Color,
    color2: Color,
  ) {
    self.canvas.bevel(x0, y0, x1, y1, color1, color2);
  }

  fn draw_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
    for y in y0..y1 {
      for x in x0..x1 {
        if let Some(cell) = self.canvas.get_mut(x, y) {
          *cell = Cell {
            bg: color,
            ..Cell::default()
          };
        }
      }
    }
  }

  fn draw_bitmap(&mut self, x: i32, y: i32, bitmap: &Bitmap) {
    for by in 0..bitmap.height {
      for bx in 0..bitmap.width {
        let color = match bitmap.pixel(bx, by) {
          Some(c) if Some(c) != bitmap.transparent => c,
          _ => continue,
        };
        if let Some(cell) = self.canvas.get_mut(x + bx, y + by) {
          cell.bg = color;
        }
      }
    }
  }

  fn present(&mut self) -> io::Result<()> {
    let canvas = &self.canvas;
    self.terminal.draw(|f| {
      let size = f.size();
      f.render_widget(canvas, size);
    })?;
    Ok(())
  }
}

struct Canvas {
  width: i32,
  height: i32,
  cells: Vec<Cell>,
}

impl Canvas {
  fn new(width: i32, height: i32) -> Self {
    Self {
      width,
      height,
      cells: vec![Cell::default(); (width * height) as usize],
    }
  }

  fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
    if x < 0 || y < 0 || x >= self.width || y >= self.height {
      return None;
    }
    self.cells.get_mut((y * self.width + x) as usize)
  }

  fn put(&mut self, x: i32, y: i32, symbol: char, fg: Color) {
    if let Some(cell) = self.get_mut(x, y) {
      cell.symbol = symbol;
      cell.fg = fg;
    }
  }

  fn string(&mut self, x: i32, y: i32, text: &str, color: Color) {
    for (i, c) in text.chars().enumerate() {
      self.put(x + i as i32, y, c, color);
    }
  }

  /// Draws a bevel ring with box drawing characters. Rings one cell high,
  /// like buttons, get bracket ends instead.
  fn bevel(
    &mut self,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    light: Color,
    dark: Color,
  ) {
    let (right, bottom) = (x1 - 1, y1 - 1);
    if right < x0 || bottom < y0 {
      return;
    }
    if bottom == y0 {
      self.put(x0, y0, '[', light);
      if right > x0 {
        self.put(right, y0, ']', dark);
      }
      return;
    }

    for x in x0 + 1..right {
      self.put(x, y0, '─', light);
      self.put(x, bottom, '─', dark);
    }
    for y in y0 + 1..bottom {
      self.put(x0, y, '│', light);
      self.put(right, y, '│', dark);
    }
    self.put(x0, y0, '┌', light);
    self.put(right, y0, '┐', light);
    self.put(x0, bottom, '└', dark);
    self.put(right, bottom, '┘', dark);
  }
}

impl Widget for &Canvas {
  fn render(self, rect: Rect, buf: &mut Buffer) {
    let width = (rect.width as i32).min(self.width);
    let height = (rect.height as i32).min(self.height);
    for y in 0..height {
      for x in 0..width {
        let cell = self.cells[(y * self.width + x) as usize];
        buf
          .get_mut(rect.x + x as u16, rect.y + y as u16)
          .set_char(cell.symbol)
          .set_fg(style::Color::Indexed(cell.fg.0))
          .set_bg(style::Color::Indexed(cell.bg.0));
      }
    }
  }
}
