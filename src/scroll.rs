//! Vertical scroll bars.

use std::fmt;

use tracing::trace;

use crate::button::BitButton;
use crate::button::Button;
use crate::config::Metrics;
use crate::container::Container;
use crate::event::scan;
use crate::event::EventKind;
use crate::event::GEvent;
use crate::event::KeyEvent;
use crate::event::MouseAction;
use crate::event::MouseEvent;
use crate::modal::ModalResult;
use crate::render::Color;
use crate::render::ResHandle;
use crate::widget::EventCtx;
use crate::widget::PaintCtx;
use crate::widget::Rect;
use crate::widget::Widget;
use crate::widget::WidgetBase;
use crate::widget::WidgetId;

/// A scroll bar change callback, run with the new value whenever the user
/// moves the bar.
pub type ChangeProc = Box<dyn FnMut(i32, &mut EventCtx)>;

/// One of the arrow buttons at either end of a [`ScrollBar`].
///
/// A scroll button fires as soon as it is pressed, and again on every repeat
/// event that arrives while it is held down with the pointer over it.
#[derive(Debug)]
pub struct ScrollButton {
  bit: BitButton,
  fired: bool,
}

impl ScrollButton {
  pub fn new(
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    bitmap: ResHandle,
  ) -> Self {
    Self {
      bit: BitButton::with_result(
        left,
        top,
        width,
        height,
        bitmap,
        ModalResult::None,
      ),
      fired: false,
    }
  }

  pub fn is_pressed(&self) -> bool {
    self.bit.button().is_pressed()
  }

  /// Returns whether the button fired since the last call.
  pub fn take_fired(&mut self) -> bool {
    std::mem::replace(&mut self.fired, false)
  }
}

impl Widget for ScrollButton {
  fn base(&self) -> &WidgetBase {
    self.bit.base()
  }

  fn base_mut(&mut self) -> &mut WidgetBase {
    self.bit.base_mut()
  }

  fn paint(&self, x: i32, y: i32, has_focus: bool, ctx: &mut PaintCtx) {
    self.bit.paint(x, y, has_focus, ctx)
  }

  fn handle_event(&mut self, event: &GEvent, _: &mut EventCtx) {
    let m = match event.as_mouse() {
      Some(m) => m,
      None => return,
    };
    let inside = self.contains(m.x, m.y);
    let button = self.bit.button_mut();
    match m.action {
      MouseAction::Down => {
        button.set_pressed(inside);
        self.fired |= inside;
      }
      MouseAction::Repeat => self.fired |= button.is_pressed() && inside,
      MouseAction::Up => button.set_pressed(false),
      MouseAction::Drag => {}
    }
  }
}

/// The draggable thumb of a [`ScrollBar`].
///
/// The thumb never moves itself; it reports how far the pointer has travelled
/// since it was grabbed, and the scroll bar repositions it from the resulting
/// value.
#[derive(Debug)]
pub struct ThumbButton {
  button: Button,
  grab: Option<i32>,
  offset: Option<i32>,
}

impl ThumbButton {
  pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
    Self {
      button: Button::with_result(left, top, width, height, ModalResult::None),
      grab: None,
      offset: None,
    }
  }

  pub fn is_grabbed(&self) -> bool {
    self.grab.is_some()
  }

  /// Returns the vertical distance the pointer moved since the thumb was
  /// grabbed, if it moved since the last call.
  pub fn take_offset(&mut self) -> Option<i32> {
    self.offset.take()
  }
}

impl Widget for ThumbButton {
  fn base(&self) -> &WidgetBase {
    self.button.base()
  }

  fn base_mut(&mut self) -> &mut WidgetBase {
    self.button.base_mut()
  }

  fn paint(&self, x: i32, y: i32, _: bool, ctx: &mut PaintCtx) {
    self.button.paint_face(x, y, ctx);
  }

  fn handle_event(&mut self, event: &GEvent, _: &mut EventCtx) {
    let m = match event.as_mouse() {
      Some(m) => m,
      None => return,
    };
    match m.action {
      MouseAction::Down if self.contains(m.x, m.y) => {
        self.button.set_pressed(true);
        self.grab = Some(m.y);
      }
      MouseAction::Drag => {
        if let Some(y) = self.grab {
          self.offset = Some(m.y - y);
        }
      }
      MouseAction::Up => {
        self.button.set_pressed(false);
        self.grab = None;
      }
      _ => {}
    }
  }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Part {
  Up,
  Down,
  Thumb,
  Track,
}

/// A vertical scroll bar over the integer range `[min, max]`.
///
/// `size` is the length of the visible part of the range, so `value` always
/// lies in `[min, max - size]` (or is `min`, if that interval is empty). The
/// arrow buttons step the value by one, clicking the track pages it by `size`,
/// and dragging the thumb maps pointer travel along the track onto the range.
pub struct ScrollBar {
  base: WidgetBase,
  min: i32,
  max: i32,
  size: i32,
  value: i32,
  up: ScrollButton,
  down: ScrollButton,
  track: Container,
  thumb: WidgetId,
  min_thumb: i32,
  active: Option<Part>,
  grab_value: i32,
  page_dir: i32,
  on_change: Option<ChangeProc>,
}

impl fmt::Debug for ScrollBar {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("ScrollBar")
      .field("base", &self.base)
      .field("min", &self.min)
      .field("max", &self.max)
      .field("size", &self.size)
      .field("value", &self.value)
      .field("active", &self.active)
      .finish()
  }
}

impl ScrollBar {
  /// Creates a new scroll bar laid out with the default [`Metrics`].
  pub fn new(
    left: i32,
    top: i32,
    height: i32,
    min: i32,
    max: i32,
    value: i32,
  ) -> Self {
    Self::with_metrics(left, top, height, min, max, value, &Metrics::default())
  }

  pub fn with_metrics(
    left: i32,
    top: i32,
    height: i32,
    min: i32,
    max: i32,
    value: i32,
    metrics: &Metrics,
  ) -> Self {
    let width = metrics.scroll_width;
    let button_height = metrics.scroll_button_height;
    let track_height = (height - 2 * button_height).max(0);

    let mut base = WidgetBase::new(left, top, width, height);
    base.can_focus = true;

    let mut track = Container::new(0, button_height, width, track_height);
    track.base_mut().can_focus = false;
    let thumb = track.insert(ThumbButton::new(0, 0, width, track_height));

    let mut bar = Self {
      base,
      min,
      max: max.max(min),
      size: 0,
      value,
      up: ScrollButton::new(0, 0, width, button_height, ResHandle::ARROW_UP),
      down: ScrollButton::new(
        0,
        height - button_height,
        width,
        button_height,
        ResHandle::ARROW_DOWN,
      ),
      track,
      thumb,
      min_thumb: metrics.min_thumb,
      active: None,
      grab_value: value,
      page_dir: 0,
      on_change: None,
    };
    bar.value = bar.clamp(value);
    bar.layout_thumb();
    bar
  }

  /// Sets a callback to run whenever the user changes the value.
  pub fn on_change(
    mut self,
    on_change: impl FnMut(i32, &mut EventCtx) + 'static,
  ) -> Self {
    self.on_change = Some(Box::new(on_change));
    self
  }

  pub fn value(&self) -> i32 {
    self.value
  }

  pub fn size(&self) -> i32 {
    self.size
  }

  pub fn min(&self) -> i32 {
    self.min
  }

  pub fn max(&self) -> i32 {
    self.max
  }

  /// Moves the value by `offset`, clamped to the valid interval.
  pub fn scroll_relative(&mut self, offset: i32) {
    self.value = self.clamp(self.value.saturating_add(offset));
    self.layout_thumb();
  }

  /// Sets the value and the visible size; a negative size counts as zero.
  pub fn set_value(&mut self, value: i32, size: i32) {
    self.size = size.max(0);
    self.value = self.clamp(value);
    self.layout_thumb();
  }

  /// Sets the range, re-clamping the value into it. If `min > max`, the range
  /// collapses to `min`.
  pub fn set_range(&mut self, min: i32, max: i32) {
    if min > max {
      trace!(bar = ?self.base.id, min, max, "inverted range collapsed");
    }
    self.min = min;
    self.max = max.max(min);
    self.value = self.clamp(self.value);
    self.layout_thumb();
  }

  /// Returns the track's rectangle, relative to the bar.
  pub fn track_rect(&self) -> Rect {
    self.track.base().rect
  }

  /// Returns the thumb's rectangle, relative to the bar.
  pub fn thumb_rect(&self) -> Rect {
    let mut rect = self.thumb().base().rect;
    let track = self.track_rect();
    rect.translate(track.left, track.top);
    rect
  }

  fn thumb(&self) -> &ThumbButton {
    self
      .track
      .find(self.thumb)
      .expect("scroll bar lost its thumb")
  }

  fn thumb_mut(&mut self) -> &mut ThumbButton {
    let thumb = self.thumb;
    self
      .track
      .find_mut(thumb)
      .expect("scroll bar lost its thumb")
  }

  fn clamp(&self, value: i32) -> i32 {
    let hi = (self.max as i64 - self.size as i64).max(self.min as i64);
    (value as i64).max(self.min as i64).min(hi) as i32
  }

  /// Returns `max - min`, which may not fit an `i32`.
  fn range(&self) -> i64 {
    self.max as i64 - self.min as i64
  }

  fn page(&self) -> i32 {
    self.size.max(1)
  }

  fn track_len(&self) -> i32 {
    self.track.base().rect.height
  }

  fn can_drag(&self) -> bool {
    self.max > self.min
  }

  fn thumb_len(&self) -> i32 {
    let track_len = self.track_len();
    if !self.can_drag() {
      return track_len;
    }
    let len = track_len as i64 * self.size as i64 / self.range();
    len.max(self.min_thumb as i64).min(track_len as i64) as i32
  }

  fn layout_thumb(&mut self) {
    let len = self.thumb_len();
    let travel = (self.track_len() - len) as i128;
    let range = (self.range() - self.size as i64) as i128;
    let top = if range > 0 && travel > 0 {
      (self.value as i128 - self.min as i128) * travel / range
    } else {
      0
    };

    let rect = &mut self.thumb_mut().base_mut().rect;
    rect.top = top as i32;
    rect.height = len;
  }

  /// Puts a user-requested value into effect, notifying the change callback
  /// if it actually moved.
  fn user_set(&mut self, value: i32, ctx: &mut EventCtx) {
    let value = self.clamp(value);
    if value == self.value {
      return;
    }
    self.value = value;
    self.layout_thumb();

    if let Some(mut f) = self.on_change.take() {
      f(value, ctx);
      self.on_change = Some(f);
    }
  }

  fn user_scroll(&mut self, offset: i32, ctx: &mut EventCtx) {
    self.user_set(self.value.saturating_add(offset), ctx)
  }

  /// Maps the thumb's travel since it was grabbed onto a value.
  fn drag_value(&self, offset: i32) -> i32 {
    let track_len = self.track_len() as i128;
    if track_len == 0 {
      return self.grab_value;
    }
    let span = (self.range() - self.size as i64) as i128;
    let delta = div_round(offset as i128 * span, track_len);
    (self.grab_value as i128 + delta)
      .max(i32::min_value() as i128)
      .min(i32::max_value() as i128) as i32
  }

  /// Pages toward the pointer if it is still beyond the thumb on the side the
  /// paging started from.
  fn page_toward(&mut self, y: i32, ctx: &mut EventCtx) {
    let thumb = self.thumb_rect();
    let beyond = match self.page_dir {
      d if d < 0 => y < thumb.top,
      d if d > 0 => y >= thumb.bottom(),
      _ => false,
    };
    if beyond {
      self.user_scroll(self.page_dir * self.page(), ctx);
    }
  }

  fn press(&mut self, local: &GEvent, m: &MouseEvent, ctx: &mut EventCtx) {
    if self.up.contains(m.x, m.y) {
      self.active = Some(Part::Up);
      self.up.handle_event(local, ctx);
      if self.up.take_fired() {
        self.user_scroll(-1, ctx);
      }
    } else if self.down.contains(m.x, m.y) {
      self.active = Some(Part::Down);
      self.down.handle_event(local, ctx);
      if self.down.take_fired() {
        self.user_scroll(1, ctx);
      }
    } else if self.track.contains(m.x, m.y) {
      self.track.handle_event(local, ctx);
      if self.thumb().is_grabbed() {
        self.active = Some(Part::Thumb);
        self.grab_value = self.value;
      } else {
        self.active = Some(Part::Track);
        self.page_dir = if m.y < self.thumb_rect().top { -1 } else { 1 };
        self.page_toward(m.y, ctx);
      }
    } else {
      self.active = None;
    }
  }

  fn route_mouse(&mut self, m: &MouseEvent, time: u32, ctx: &mut EventCtx) {
    let m = m.translated(-self.base.rect.left, -self.base.rect.top);
    let local = GEvent::mouse(time, m);

    if m.action == MouseAction::Down {
      self.press(&local, &m, ctx);
      return;
    }

    match self.active {
      Some(Part::Up) => {
        self.up.handle_event(&local, ctx);
        if self.up.take_fired() {
          self.user_scroll(-1, ctx);
        }
      }
      Some(Part::Down) => {
        self.down.handle_event(&local, ctx);
        if self.down.take_fired() {
          self.user_scroll(1, ctx);
        }
      }
      Some(Part::Thumb) => {
        self.track.handle_event(&local, ctx);
        let offset = self.thumb_mut().take_offset();
        if let (Some(offset), true) = (offset, self.can_drag()) {
          let value = self.drag_value(offset);
          self.user_set(value, ctx);
        }
      }
      Some(Part::Track) => {
        self.track.handle_event(&local, ctx);
        if m.action == MouseAction::Repeat {
          self.page_toward(m.y, ctx);
        }
      }
      None => {}
    }

    if m.action == MouseAction::Up {
      self.active = None;
    }
  }

  fn route_key(&mut self, k: &KeyEvent, ctx: &mut EventCtx) {
    if !k.is_down() {
      return;
    }
    let value = match k.make {
      scan::UP => self.value.saturating_sub(1),
      scan::DOWN => self.value.saturating_add(1),
      scan::PGUP => self.value.saturating_sub(self.page()),
      scan::PGDN => self.value.saturating_add(self.page()),
      scan::HOME => self.min,
      scan::END => self.max,
      _ => return,
    };
    ctx.claim();
    self.user_set(value, ctx);
  }
}

/// Divides, rounding halves away from zero.
fn div_round(n: i128, d: i128) -> i128 {
  let q = (n.abs() * 2 + d.abs()) / (2 * d.abs());
  if (n < 0) != (d < 0) {
    -q
  } else {
    q
  }
}

impl Widget for ScrollBar {
  fn base(&self) -> &WidgetBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut WidgetBase {
    &mut self.base
  }

  fn paint(&self, x: i32, y: i32, has_focus: bool, ctx: &mut PaintCtx) {
    let track = self.track_rect();
    let (tx, ty) = (x + track.left, y + track.top);
    ctx.surface.draw_rect(
      tx,
      ty,
      tx + track.width,
      ty + track.height,
      Color::DARK_GRAY,
    );
    self.track.paint_children(tx, ty, ctx);

    for button in [&self.up, &self.down].iter() {
      let rect = button.base().rect;
      button.paint(x + rect.left, y + rect.top, false, ctx);
    }

    if has_focus {
      let rect = self.base.rect;
      ctx.surface.draw_bevel(
        x,
        y,
        x + rect.width,
        y + rect.height,
        Color::YELLOW,
        Color::YELLOW,
      );
    }
  }

  fn handle_event(&mut self, event: &GEvent, ctx: &mut EventCtx) {
    match &event.kind {
      EventKind::Mouse(m) => self.route_mouse(m, event.time, ctx),
      EventKind::Key(k) => self.route_key(k, ctx),
      _ => {}
    }
  }
}
