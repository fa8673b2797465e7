//! The bundle of external services a widget tree runs against.

use std::io;

use crate::blink::BlinkClock;
use crate::config::Metrics;
use crate::config::Options;
use crate::event::GEvent;
use crate::modal::Error;
use crate::modal::InputSource;
use crate::render::BitmapStore;
use crate::render::MemoryBitmaps;
use crate::render::Surface;
use crate::widget::PaintCtx;
use crate::widget::Widget;

/// The services a widget tree needs: somewhere to draw, something to pull
/// events from, bitmaps, and the blink clock.
///
/// A `Gui` is threaded through every modal run, including nested ones, so
/// only one exists per widget tree.
pub struct Gui {
  input: Box<dyn InputSource>,
  surface: Box<dyn Surface>,
  bitmaps: Box<dyn BitmapStore>,
  blink: BlinkClock,
  metrics: Metrics,
  last_time: Option<u32>,
}

impl Gui {
  /// Creates a new `Gui` with default options and no bitmaps.
  pub fn new(
    input: impl InputSource + 'static,
    surface: impl Surface + 'static,
  ) -> Self {
    Self::with_options(input, surface, Options::default())
  }

  pub fn with_options(
    input: impl InputSource + 'static,
    surface: impl Surface + 'static,
    opts: Options,
  ) -> Self {
    Self {
      input: Box::new(input),
      surface: Box::new(surface),
      bitmaps: Box::new(MemoryBitmaps::new()),
      blink: BlinkClock::new(opts.blink_period),
      metrics: opts.metrics,
      last_time: None,
    }
  }

  /// Replaces the bitmap store.
  pub fn bitmaps(mut self, bitmaps: impl BitmapStore + 'static) -> Self {
    self.bitmaps = Box::new(bitmaps);
    self
  }

  pub fn metrics(&self) -> &Metrics {
    &self.metrics
  }

  pub fn blink(&self) -> &BlinkClock {
    &self.blink
  }

  pub fn blink_mut(&mut self) -> &mut BlinkClock {
    &mut self.blink
  }

  pub fn screen_size(&self) -> (i32, i32) {
    self.surface.size()
  }

  pub fn paint_ctx(&mut self) -> PaintCtx<'_> {
    PaintCtx {
      surface: &mut *self.surface,
      bitmaps: &*self.bitmaps,
      blink: &self.blink,
      metrics: &self.metrics,
    }
  }

  /// Paints `root` at its own origin, as the focused tree, and presents the
  /// result.
  pub fn paint(&mut self, root: &dyn Widget) -> io::Result<()> {
    let rect = root.base().rect;
    root.paint(rect.left, rect.top, true, &mut self.paint_ctx());
    self.surface.present()
  }

  /// Pulls the next event from the input source, advancing the blink clock
  /// by the time elapsed since the previous one.
  pub fn next_event(&mut self) -> Result<GEvent, Error> {
    let event = self.input.next_event()?;
    if let Some(last) = self.last_time {
      self.blink.update(event.time.wrapping_sub(last));
    }
    self.last_time = Some(event.time);
    Ok(event)
  }
}
