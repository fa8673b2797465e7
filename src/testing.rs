//! Scaffolding intended for testing widget trees without a real device.
//!
//! [`ScriptedInput`] replays a fixed list of events and then reports the input
//! as closed, [`Recorder`] logs every draw call, and [`Probe`] is a widget that
//! remembers every event it was handed.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use crate::event::GEvent;
use crate::event::MouseAction;
use crate::gui::Gui;
use crate::modal::Error;
use crate::modal::InputSource;
use crate::modal::ModalResult;
use crate::render::Bitmap;
use crate::render::Color;
use crate::render::Surface;
use crate::widget::EventCtx;
use crate::widget::PaintCtx;
use crate::widget::Widget;
use crate::widget::WidgetBase;

/// An [`InputSource`] that yields a fixed script of events.
///
/// Once the script runs out, every further call fails with
/// [`Error::InputClosed`].
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
  events: VecDeque<GEvent>,
}

impl ScriptedInput {
  pub fn new(events: impl IntoIterator<Item = GEvent>) -> Self {
    Self {
      events: events.into_iter().collect(),
    }
  }

  pub fn remaining(&self) -> usize {
    self.events.len()
  }
}

impl InputSource for ScriptedInput {
  fn next_event(&mut self) -> Result<GEvent, Error> {
    self.events.pop_front().ok_or(Error::InputClosed)
  }
}

/// A draw call, as logged by a [`Recorder`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum DrawCall {
  CenteredString {
    x: i32,
    y: i32,
    text: String,
    color: Color,
  },
  String {
    x: i32,
    y: i32,
    text: String,
    color: Color,
  },
  Bevel {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color1: Color,
    color2: Color,
  },
  Rect {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: Color,
  },
  Bitmap {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
  },
  Present,
}

/// A shared log of draw calls.
pub type DrawLog = Rc<RefCell<Vec<DrawCall>>>;

/// A [`Surface`] that records what is drawn on it instead of drawing.
#[derive(Clone, Debug)]
pub struct Recorder {
  size: (i32, i32),
  log: DrawLog,
}

impl Recorder {
  /// Creates a new recorder of the given size, along with a handle to its log.
  pub fn new(width: i32, height: i32) -> (Self, DrawLog) {
    let log = DrawLog::default();
    let recorder = Self {
      size: (width, height),
      log: Rc::clone(&log),
    };
    (recorder, log)
  }

  fn push(&mut self, call: DrawCall) {
    self.log.borrow_mut().push(call);
  }
}

impl Surface for Recorder {
  fn size(&self) -> (i32, i32) {
    self.size
  }

  fn draw_centered_string(&mut self, x: i32, y: i32, text: &str, color: Color) {
    self.push(DrawCall::CenteredString {
      x,
      y,
      text: text.to_string(),
      color,
    })
  }

  fn draw_string(&mut self, x: i32, y: i32, text: &str, color: Color) {
    self.push(DrawCall::String {
      x,
      y,
      text: text.to_string(),
      color,
    })
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
    self.push(DrawCall::Bevel {
      x0,
      y0,
      x1,
      y1,
      color1,
      color2,
    })
  }

  fn draw_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
    self.push(DrawCall::Rect {
      x0,
      y0,
      x1,
      y1,
      color,
    })
  }

  fn draw_bitmap(&mut self, x: i32, y: i32, bitmap: &Bitmap) {
    self.push(DrawCall::Bitmap {
      x,
      y,
      width: bitmap.width,
      height: bitmap.height,
    })
  }

  fn present(&mut self) -> io::Result<()> {
    self.push(DrawCall::Present);
    Ok(())
  }
}

/// Creates a [`Gui`] that replays `events` onto a 320x200 [`Recorder`].
pub fn gui_with(events: Vec<GEvent>) -> Gui {
  gui_recording(events).0
}

/// Like [`gui_with()`], but also hands back the draw log.
pub fn gui_recording(events: Vec<GEvent>) -> (Gui, DrawLog) {
  let (surface, log) = Recorder::new(320, 200);
  (Gui::new(ScriptedInput::new(events), surface), log)
}

/// A testing [`Widget`] that fills its rectangle in a color depending on
/// whether it's focused, and remembers every event it sees.
#[derive(Clone, Debug)]
pub struct Probe {
  base: WidgetBase,
  events: Vec<GEvent>,
  claim_keys: bool,
  ends_with: Option<ModalResult>,
}

impl Probe {
  pub const FOCUSED: Color = Color::YELLOW;
  pub const UNFOCUSED: Color = Color::BLUE;

  /// Creates a new focusable [`Probe`].
  pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
    let mut base = WidgetBase::new(left, top, width, height);
    base.can_focus = true;
    Self {
      base,
      events: Vec::new(),
      claim_keys: false,
      ends_with: None,
    }
  }

  /// Creates a new [`Probe`] that refuses to be focused.
  pub fn unfocusable(left: i32, top: i32, width: i32, height: i32) -> Self {
    let mut probe = Self::new(left, top, width, height);
    probe.base.can_focus = false;
    probe
  }

  /// Marks this probe as a default child.
  pub fn default_child(mut self) -> Self {
    self.base.can_default = true;
    self
  }

  /// Makes this probe end the surrounding modal run with `result` whenever a
  /// mouse button is released over it.
  pub fn ends_with(mut self, result: ModalResult) -> Self {
    self.ends_with = Some(result);
    self
  }

  pub fn claim_keys(&mut self, claim: bool) {
    self.claim_keys = claim;
  }

  pub fn events(&self) -> &[GEvent] {
    &self.events
  }
}

impl Widget for Probe {
  fn base(&self) -> &WidgetBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut WidgetBase {
    &mut self.base
  }

  fn paint(&self, x: i32, y: i32, has_focus: bool, ctx: &mut PaintCtx) {
    let color = if has_focus {
      Self::FOCUSED
    } else {
      Self::UNFOCUSED
    };
    let rect = self.base.rect;
    ctx
      .surface
      .draw_rect(x, y, x + rect.width, y + rect.height, color);
  }

  fn handle_event(&mut self, event: &GEvent, ctx: &mut EventCtx) {
    self.events.push(*event);

    if event.as_key().is_some() && self.claim_keys {
      ctx.claim();
    }
    if let (Some(m), Some(result)) = (event.as_mouse(), self.ends_with) {
      if m.action == MouseAction::Up && self.contains(m.x, m.y) {
        self.end_modal(result, ctx);
      }
    }
  }
}

/// Constructors for common events.
///
/// Everything here is stamped with time zero, except [`ev::idle()`], which
/// exists to let time pass.
pub mod ev {
  use crate::event::scan;
  use crate::event::GEvent;
  use crate::event::KeyAction;
  use crate::event::KeyEvent;
  use crate::event::MouseAction;
  use crate::event::MouseEvent;
  use crate::event::ShiftFlags;

  pub fn mouse(action: MouseAction, x: i32, y: i32, dx: i32, dy: i32) -> GEvent {
    GEvent::mouse(
      0,
      MouseEvent {
        action,
        button: 1,
        x,
        y,
        dx,
        dy,
        double_click: false,
      },
    )
  }

  pub fn down(x: i32, y: i32) -> GEvent {
    mouse(MouseAction::Down, x, y, 0, 0)
  }

  pub fn up(x: i32, y: i32) -> GEvent {
    mouse(MouseAction::Up, x, y, 0, 0)
  }

  pub fn repeat(x: i32, y: i32) -> GEvent {
    mouse(MouseAction::Repeat, x, y, 0, 0)
  }

  /// A drag to `(x, y)` that moved by `(dx, dy)` since the last mouse event.
  pub fn drag(x: i32, y: i32, dx: i32, dy: i32) -> GEvent {
    mouse(MouseAction::Drag, x, y, dx, dy)
  }

  /// A press and release at the same spot.
  pub fn click(x: i32, y: i32) -> [GEvent; 2] {
    [down(x, y), up(x, y)]
  }

  pub fn key_with(make: u8, ascii: u8, shift: ShiftFlags) -> GEvent {
    GEvent::key(
      0,
      KeyEvent {
        action: KeyAction::Down,
        ascii,
        make,
        shift,
      },
    )
  }

  /// A press of the key with make code `make`, with the character it would
  /// usually type.
  pub fn key(make: u8) -> GEvent {
    let ascii = match make {
      scan::ESC => 0x1B,
      scan::BACKSPACE => 0x08,
      scan::TAB => b'\t',
      scan::ENTER => b'\r',
      scan::SPACE => b' ',
      _ => 0,
    };
    key_with(make, ascii, ShiftFlags::empty())
  }

  pub fn key_up(make: u8) -> GEvent {
    let mut event = key(make);
    if let crate::event::EventKind::Key(k) = &mut event.kind {
      k.action = KeyAction::Up;
    }
    event
  }

  /// A press of a key typing `c`, which must be ASCII.
  pub fn char(c: char) -> GEvent {
    let make = if c == ' ' { scan::SPACE } else { 0 };
    key_with(make, c as u8, ShiftFlags::empty())
  }

  /// Presses of the keys typing out `text`.
  pub fn text(text: &str) -> Vec<GEvent> {
    text.chars().map(char).collect()
  }

  pub fn tab() -> GEvent {
    key(scan::TAB)
  }

  pub fn back_tab() -> GEvent {
    key_with(scan::TAB, b'\t', ShiftFlags::SHIFT | ShiftFlags::LSHIFT)
  }

  pub fn enter() -> GEvent {
    key(scan::ENTER)
  }

  pub fn command(command: i32) -> GEvent {
    GEvent::command(0, command)
  }

  pub fn broadcast(command: i32) -> GEvent {
    GEvent::broadcast(0, command)
  }

  pub fn idle(time: u32) -> GEvent {
    GEvent::none(time)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn script_runs_dry() {
    let mut input = ScriptedInput::new(vec![ev::idle(1)]);
    assert_eq!(input.next_event().unwrap(), ev::idle(1));
    assert!(matches!(input.next_event(), Err(Error::InputClosed)));
    assert!(matches!(input.next_event(), Err(Error::InputClosed)));
  }

  #[test]
  fn recorder_logs_in_order() {
    let (mut surface, log) = Recorder::new(10, 10);
    surface.draw_rect(0, 0, 1, 1, Color::BLACK);
    surface.draw_string(2, 3, "hi", Color::WHITE);
    surface.present().unwrap();
    assert_eq!(
      *log.borrow(),
      vec![
        DrawCall::Rect {
          x0: 0,
          y0: 0,
          x1: 1,
          y1: 1,
          color: Color::BLACK,
        },
        DrawCall::String {
          x: 2,
          y: 3,
          text: "hi".to_string(),
          color: Color::WHITE,
        },
        DrawCall::Present,
      ]
    );
  }
}
