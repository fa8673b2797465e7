//! Push buttons.
//!
//! Every button runs the same press state machine: a mouse-down inside the
//! button presses it, and the matching mouse-up clicks it if the pointer is
//! still inside. Releasing outside, or dragging out while pressed, abandons
//! the press. A click either ends the surrounding modal run with a fixed
//! [`ModalResult`] or invokes a callback.

use std::fmt;
use std::mem;

use tracing::debug;
use tracing::trace;

use crate::event::scan;
use crate::event::EventKind;
use crate::event::GEvent;
use crate::event::MouseAction;
use crate::event::MouseEvent;
use crate::modal::ModalResult;
use crate::render::Color;
use crate::render::ResHandle;
use crate::widget::EventCtx;
use crate::widget::PaintCtx;
use crate::widget::Widget;
use crate::widget::WidgetBase;

/// A button click callback.
///
/// The callback receives the clicked button and the context of the event that
/// clicked it, through which it may open nested dialogs or end the current
/// run.
pub type ClickProc = Box<dyn FnMut(&Button, &mut EventCtx)>;

enum Action {
  Result(ModalResult),
  Click(ClickProc),
}

impl fmt::Debug for Action {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Action::Result(r) => f.debug_tuple("Result").field(r).finish(),
      Action::Click(_) => f.write_str("Click(..)"),
    }
  }
}

/// A plain button with no label.
#[derive(Debug)]
pub struct Button {
  base: WidgetBase,
  action: Action,
  pressed: bool,
}

impl Button {
  /// Creates a button that ends the surrounding modal run with `result` when
  /// clicked.
  pub fn with_result(
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    result: ModalResult,
  ) -> Self {
    Self {
      base: WidgetBase::new(left, top, width, height),
      action: Action::Result(result),
      pressed: false,
    }
  }

  /// Creates a button that calls `on_click` when clicked.
  pub fn with_callback(
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    on_click: impl FnMut(&Button, &mut EventCtx) + 'static,
  ) -> Self {
    Self {
      base: WidgetBase::new(left, top, width, height),
      action: Action::Click(Box::new(on_click)),
      pressed: false,
    }
  }

  pub fn is_pressed(&self) -> bool {
    self.pressed
  }

  pub(crate) fn set_pressed(&mut self, pressed: bool) {
    self.pressed = pressed;
  }

  /// Returns the result this button ends a run with, if it has no callback.
  pub fn result(&self) -> Option<ModalResult> {
    match self.action {
      Action::Result(r) => Some(r),
      Action::Click(_) => None,
    }
  }

  /// Advances the press state machine by one mouse event, given in the
  /// owner's coordinates.
  ///
  /// Returns whether this event completed a click.
  pub fn track(&mut self, m: &MouseEvent) -> bool {
    let inside = self.contains(m.x, m.y);
    match m.action {
      MouseAction::Down => {
        self.pressed = inside;
        false
      }
      MouseAction::Drag => {
        if self.pressed && !inside {
          trace!(button = ?self.base.id, "press abandoned");
          self.pressed = false;
        }
        false
      }
      MouseAction::Up => mem::replace(&mut self.pressed, false) && inside,
      MouseAction::Repeat => false,
    }
  }

  /// Performs this button's click action.
  pub fn trigger(&mut self, ctx: &mut EventCtx) {
    debug!(button = ?self.base.id, "clicked");
    let placeholder = Action::Result(ModalResult::None);
    match mem::replace(&mut self.action, placeholder) {
      Action::Result(r) => {
        self.action = Action::Result(r);
        ctx.end_modal(r);
      }
      Action::Click(mut f) => {
        f(self, ctx);
        self.action = Action::Click(f);
      }
    }
  }

  /// Draws the button's face: raised when idle, sunken while pressed.
  ///
  /// Returns the offset at which the face's contents should be drawn, which
  /// shifts by a pixel while pressed.
  pub fn paint_face(&self, x: i32, y: i32, ctx: &mut PaintCtx) -> i32 {
    let rect = self.base.rect;
    let (x1, y1) = (x + rect.width, y + rect.height);
    ctx.surface.draw_rect(x, y, x1, y1, Color::GRAY);

    let mut inset = 0;
    if self.base.can_default {
      ctx.surface.draw_bevel(x, y, x1, y1, Color::BLACK, Color::BLACK);
      inset = 1;
    }
    let depth = if self.pressed { -1 } else { 2 };
    ctx.surface.draw_frame(
      x + inset,
      y + inset,
      x1 - inset,
      y1 - inset,
      depth,
      Color::WHITE,
      Color::DARK_GRAY,
    );

    if self.pressed {
      1
    } else {
      0
    }
  }
}

impl Widget for Button {
  fn base(&self) -> &WidgetBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut WidgetBase {
    &mut self.base
  }

  fn paint(&self, x: i32, y: i32, _: bool, ctx: &mut PaintCtx) {
    self.paint_face(x, y, ctx);
  }

  fn handle_event(&mut self, event: &GEvent, ctx: &mut EventCtx) {
    if let EventKind::Mouse(m) = &event.kind {
      if self.track(m) {
        self.trigger(ctx);
      }
    }
  }
}

/// A focusable button with a text label.
///
/// Besides clicking, a focused text button is activated by the space bar, and
/// a default button is also activated by the accept key.
#[derive(Debug)]
pub struct TextButton {
  button: Button,
  text: String,
}

impl TextButton {
  pub fn new(
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    text: &str,
    result: ModalResult,
  ) -> Self {
    Self::from_button(Button::with_result(left, top, width, height, result), text)
  }

  pub fn with_callback(
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    text: &str,
    on_click: impl FnMut(&Button, &mut EventCtx) + 'static,
  ) -> Self {
    Self::from_button(
      Button::with_callback(left, top, width, height, on_click),
      text,
    )
  }

  fn from_button(mut button: Button, text: &str) -> Self {
    button.base.can_focus = true;
    Self {
      button,
      text: text.to_string(),
    }
  }

  /// Sets whether this is a default button, activated by the accept key even
  /// when another widget holds focus.
  pub fn default_button(mut self, is_default: bool) -> Self {
    self.button.base.can_default = is_default;
    self
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn button(&self) -> &Button {
    &self.button
  }
}

impl Widget for TextButton {
  fn base(&self) -> &WidgetBase {
    &self.button.base
  }

  fn base_mut(&mut self) -> &mut WidgetBase {
    &mut self.button.base
  }

  fn paint(&self, x: i32, y: i32, has_focus: bool, ctx: &mut PaintCtx) {
    let shift = self.button.paint_face(x, y, ctx);
    let rect = self.button.base.rect;
    let color = if has_focus { Color::YELLOW } else { Color::BLACK };
    ctx.surface.draw_centered_string(
      x + rect.width / 2 + shift,
      y + (rect.height - ctx.metrics.line_height) / 2 + shift,
      &self.text,
      color,
    );
  }

  fn handle_event(&mut self, event: &GEvent, ctx: &mut EventCtx) {
    match &event.kind {
      EventKind::Mouse(_) => self.button.handle_event(event, ctx),
      EventKind::Key(k) if k.is_down() => {
        let activates = k.make == scan::SPACE
          || (k.is_accept() && self.button.base.can_default);
        if activates {
          ctx.claim();
          self.button.trigger(ctx);
        }
      }
      _ => {}
    }
  }
}

/// A button labeled with a bitmap instead of text.
#[derive(Debug)]
pub struct BitButton {
  button: Button,
  bitmap: ResHandle,
}

impl BitButton {
  pub fn new(
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    bitmap: ResHandle,
    on_click: impl FnMut(&Button, &mut EventCtx) + 'static,
  ) -> Self {
    Self {
      button: Button::with_callback(left, top, width, height, on_click),
      bitmap,
    }
  }

  pub fn with_result(
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    bitmap: ResHandle,
    result: ModalResult,
  ) -> Self {
    Self {
      button: Button::with_result(left, top, width, height, result),
      bitmap,
    }
  }

  pub fn bitmap(&self) -> ResHandle {
    self.bitmap
  }

  pub fn button(&self) -> &Button {
    &self.button
  }

  pub(crate) fn button_mut(&mut self) -> &mut Button {
    &mut self.button
  }
}

impl Widget for BitButton {
  fn base(&self) -> &WidgetBase {
    &self.button.base
  }

  fn base_mut(&mut self) -> &mut WidgetBase {
    &mut self.button.base
  }

  fn paint(&self, x: i32, y: i32, _: bool, ctx: &mut PaintCtx) {
    let shift = self.button.paint_face(x, y, ctx);
    let rect = self.button.base.rect;
    match ctx.bitmaps.bitmap(self.bitmap) {
      Some(bitmap) => ctx.surface.draw_bitmap(
        x + (rect.width - bitmap.width) / 2 + shift,
        y + (rect.height - bitmap.height) / 2 + shift,
        bitmap,
      ),
      None => trace!(handle = ?self.bitmap, "missing bitmap"),
    }
  }

  fn handle_event(&mut self, event: &GEvent, ctx: &mut EventCtx) {
    self.button.handle_event(event, ctx)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use std::cell::Cell;
  use std::rc::Rc;

  use crate::container::Container;
  use crate::render::Bitmap;
  use crate::render::MemoryBitmaps;
  use crate::testing;
  use crate::testing::ev;
  use crate::testing::DrawCall;
  use crate::testing::Probe;

  fn run(c: &mut Container, events: &[GEvent]) {
    let mut gui = testing::gui_with(vec![]);
    c.begin_modal();
    for event in events {
      let mut ctx = EventCtx::new(&mut gui);
      c.handle_event(event, &mut ctx);
    }
  }

  fn dialog_with(button: impl Widget + 'static) -> Container {
    let mut c = Container::new(0, 0, 100, 100);
    c.insert(button);
    c
  }

  #[test]
  fn click_inside_ends_run() {
    let mut c = dialog_with(TextButton::new(10, 10, 30, 10, "Ok", ModalResult::Ok));
    run(&mut c, &[ev::down(15, 15), ev::up(20, 18)]);
    assert_eq!(c.end_state(), ModalResult::Ok);
  }

  #[test]
  fn release_outside_does_nothing() {
    let mut c = dialog_with(TextButton::new(10, 10, 30, 10, "Ok", ModalResult::Ok));
    run(&mut c, &[ev::down(15, 15), ev::up(80, 80)]);
    assert!(c.is_modal());
    assert_eq!(c.end_state(), ModalResult::None);
  }

  #[test]
  fn drag_out_abandons_press() {
    let mut c = dialog_with(TextButton::new(10, 10, 30, 10, "Ok", ModalResult::Ok));
    run(
      &mut c,
      &[
        ev::down(15, 15),
        ev::drag(80, 80, 65, 65),
        ev::drag(15, 15, -65, -65),
        ev::up(15, 15),
      ],
    );
    assert!(c.is_modal());
  }

  #[test]
  fn press_state_follows_pointer() {
    let mut b = Button::with_result(0, 0, 10, 10, ModalResult::Ok);
    let m = |e: GEvent| e.as_mouse().copied().unwrap();

    assert!(!b.track(&m(ev::down(20, 20))));
    assert!(!b.is_pressed());
    assert!(!b.track(&m(ev::down(5, 5))));
    assert!(b.is_pressed());
    assert!(!b.track(&m(ev::drag(6, 6, 1, 1))));
    assert!(b.is_pressed());
    assert!(b.track(&m(ev::up(6, 6))));
    assert!(!b.is_pressed());
    assert!(!b.track(&m(ev::up(6, 6))));
  }

  #[test]
  fn callback_runs_instead_of_ending() {
    let clicks = Rc::new(Cell::new(0));
    let counter = Rc::clone(&clicks);
    let mut c = dialog_with(TextButton::with_callback(
      0,
      0,
      10,
      10,
      "Go",
      move |button, _| {
        assert!(!button.is_pressed());
        counter.set(counter.get() + 1);
      },
    ));

    run(&mut c, &[ev::down(1, 1), ev::up(1, 1), ev::down(1, 1), ev::up(1, 1)]);
    assert_eq!(clicks.get(), 2);
    assert!(c.is_modal());
  }

  #[test]
  fn callback_can_end_run() {
    let mut c = dialog_with(TextButton::with_callback(
      0,
      0,
      10,
      10,
      "Go",
      |_, ctx| ctx.end_modal(ModalResult::Abort),
    ));
    run(&mut c, &[ev::down(1, 1), ev::up(1, 1)]);
    assert_eq!(c.end_state(), ModalResult::Abort);
  }

  #[test]
  fn space_activates_focused_button() {
    let mut c = dialog_with(TextButton::new(0, 0, 10, 10, "No", ModalResult::No));
    run(&mut c, &[ev::key(scan::SPACE)]);
    assert_eq!(c.end_state(), ModalResult::No);
  }

  #[test]
  fn accept_needs_default_button() {
    let mut c = dialog_with(TextButton::new(0, 0, 10, 10, "No", ModalResult::No));
    run(&mut c, &[ev::enter()]);
    assert!(c.is_modal());

    let mut c = Container::new(0, 0, 100, 100);
    c.insert(Probe::new(0, 0, 10, 10));
    c.insert(
      TextButton::new(20, 0, 10, 10, "Yes", ModalResult::Yes).default_button(true),
    );
    run(&mut c, &[ev::enter()]);
    assert_eq!(c.end_state(), ModalResult::Yes);
  }

  #[test]
  fn pressed_face_is_sunken() {
    let (mut gui, log) = testing::gui_recording(vec![]);
    let mut b = Button::with_result(0, 0, 10, 10, ModalResult::Ok);
    b.set_pressed(true);
    b.paint(0, 0, false, &mut gui.paint_ctx());

    assert_eq!(
      log.borrow()[1],
      DrawCall::Bevel {
        x0: 0,
        y0: 0,
        x1: 10,
        y1: 10,
        color1: Color::DARK_GRAY,
        color2: Color::WHITE,
      }
    );
    assert_eq!(log.borrow().len(), 2);
  }

  #[test]
  fn bit_button_draws_centered_bitmap() {
    let (gui, log) = testing::gui_recording(vec![]);
    let mut store = MemoryBitmaps::new();
    store.insert(
      ResHandle(7),
      Bitmap {
        width: 4,
        height: 2,
        pixels: vec![Color::BLACK; 8],
        transparent: None,
      },
    );
    let mut gui = gui.bitmaps(store);

    let b = BitButton::with_result(0, 0, 10, 10, ResHandle(7), ModalResult::Ok);
    b.paint(100, 50, false, &mut gui.paint_ctx());
    assert_eq!(
      log.borrow().last(),
      Some(&DrawCall::Bitmap {
        x: 103,
        y: 54,
        width: 4,
        height: 2,
      })
    );

    // A missing bitmap leaves just the face.
    log.borrow_mut().clear();
    let b = BitButton::with_result(0, 0, 10, 10, ResHandle(8), ModalResult::Ok);
    b.paint(0, 0, false, &mut gui.paint_ctx());
    assert!(log
      .borrow()
      .iter()
      .all(|c| !matches!(c, DrawCall::Bitmap { .. })));
  }
}
