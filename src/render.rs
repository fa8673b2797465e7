//! Rendering services the toolkit draws through.
//!
//! The core never touches a device directly. Everything it paints goes through
//! a [`Surface`], and bitmaps are resolved from opaque [`ResHandle`]s by a
//! [`BitmapStore`]. All coordinates are absolute; rectangles are half-open,
//! with `(x0, y0)` inclusive and `(x1, y1)` exclusive.

use std::collections::HashMap;
use std::io;

/// A palette index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub u8);

impl Color {
  pub const BLACK: Self = Self(0);
  pub const BLUE: Self = Self(1);
  pub const DARK_GRAY: Self = Self(8);
  pub const GRAY: Self = Self(7);
  pub const LIGHT_GRAY: Self = Self(15);
  pub const WHITE: Self = Self(255);
  pub const YELLOW: Self = Self(11);
  pub const DARK_BLUE: Self = Self(17);
}

/// A device the toolkit can draw on.
pub trait Surface {
  /// Returns the drawable size in pixels.
  fn size(&self) -> (i32, i32);

  /// Draws `text` horizontally centered on `x`, with its top edge at `y`.
  fn draw_centered_string(&mut self, x: i32, y: i32, text: &str, color: Color);

  /// Draws `text` with its top-left corner at `(x, y)`.
  fn draw_string(&mut self, x: i32, y: i32, text: &str, color: Color);

  /// Draws a one-pixel bevel ring: top and left edges in `color1`, bottom and
  /// right edges in `color2`.
  fn draw_bevel(
    &mut self,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color1: Color,
    color2: Color,
  );

  /// Fills a rectangle.
  fn draw_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color);

  fn draw_bitmap(&mut self, x: i32, y: i32, bitmap: &Bitmap);

  /// Draws `depth.abs()` nested bevel rings working inward from the edge of
  /// the rectangle: raised when `depth` is positive, sunken when negative.
  ///
  /// Returns the number of rings drawn.
  fn draw_frame(
    &mut self,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    depth: i32,
    light: Color,
    dark: Color,
  ) -> i32 {
    let (color1, color2) = if depth < 0 {
      (dark, light)
    } else {
      (light, dark)
    };
    let rings = depth.abs();
    for i in 0..rings {
      self.draw_bevel(x0 + i, y0 + i, x1 - i, y1 - i, color1, color2);
    }
    rings
  }

  /// Makes everything drawn since the last call visible.
  fn present(&mut self) -> io::Result<()> {
    Ok(())
  }
}

/// An opaque handle to a bitmap resource.
///
/// The toolkit never interprets a handle; it only hands it back to a
/// [`BitmapStore`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResHandle(pub u32);

impl ResHandle {
  /// The icon drawn on a scroll bar's up button.
  pub const ARROW_UP: Self = Self(1);
  /// The icon drawn on a scroll bar's down button.
  pub const ARROW_DOWN: Self = Self(2);
}

/// A palettized bitmap, stored row-major. Pixels equal to `transparent` are
/// not drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
  pub width: i32,
  pub height: i32,
  pub pixels: Vec<Color>,
  pub transparent: Option<Color>,
}

impl Bitmap {
  pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
    if x < 0 || y < 0 || x >= self.width || y >= self.height {
      return None;
    }
    self.pixels.get((y * self.width + x) as usize).copied()
  }
}

/// Resolves handles to drawable bitmaps.
pub trait BitmapStore {
  fn bitmap(&self, handle: ResHandle) -> Option<&Bitmap>;
}

/// A [`BitmapStore`] backed by a map.
#[derive(Clone, Debug, Default)]
pub struct MemoryBitmaps(HashMap<ResHandle, Bitmap>);

impl MemoryBitmaps {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, handle: ResHandle, bitmap: Bitmap) -> &mut Self {
    self.0.insert(handle, bitmap);
    self
  }
}

impl BitmapStore for MemoryBitmaps {
  fn bitmap(&self, handle: ResHandle) -> Option<&Bitmap> {
    self.0.get(&handle)
  }
}
