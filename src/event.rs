//! The event model.
//!
//! Every input the toolkit reacts to arrives as a [`GEvent`]: a timestamp plus
//! exactly one payload. The payload's category can be tested either by
//! matching on [`EventKind`] or, for code that only cares about "any mouse
//! event", by masking the [`EventType`] returned from [`GEvent::event_type()`].

use std::ops::BitOr;

use bitflags::bitflags;

/// The exact type tag of an event.
///
/// The values form bitmask-comparable categories: every mouse tag lies under
/// [`EventType::MOUSE`], every key tag under [`EventType::KEY`], and every
/// message tag under [`EventType::MESSAGE`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventType(pub u16);

impl EventType {
  pub const NONE: Self = Self(0x00);
  pub const MOUSE_DOWN: Self = Self(0x01);
  pub const MOUSE_UP: Self = Self(0x02);
  pub const MOUSE_REPEAT: Self = Self(0x04);
  pub const MOUSE_DRAG: Self = Self(0x08);
  pub const MOUSE: Self = Self(0xFF);

  pub const KEY_DOWN: Self = Self(0x100);
  pub const KEY_UP: Self = Self(0x200);
  pub const KEY: Self = Self(0xF00);

  pub const COMMAND: Self = Self(0x1000);
  pub const BROADCAST: Self = Self(0x2000);
  pub const MESSAGE: Self = Self(0xF000);

  /// Returns whether this tag falls under `mask`.
  pub fn is(self, mask: EventType) -> bool {
    self.0 & mask.0 != 0
  }
}

impl BitOr for EventType {
  type Output = Self;
  fn bitor(self, rhs: Self) -> Self {
    Self(self.0 | rhs.0)
  }
}

/// PC set-1 make codes for the keys the toolkit interprets.
pub mod scan {
  pub const ESC: u8 = 0x01;
  pub const BACKSPACE: u8 = 0x0E;
  pub const TAB: u8 = 0x0F;
  pub const ENTER: u8 = 0x1C;
  pub const SPACE: u8 = 0x39;
  pub const HOME: u8 = 0x47;
  pub const UP: u8 = 0x48;
  pub const PGUP: u8 = 0x49;
  pub const LEFT: u8 = 0x4B;
  pub const RIGHT: u8 = 0x4D;
  pub const END: u8 = 0x4F;
  pub const DOWN: u8 = 0x50;
  pub const PGDN: u8 = 0x51;
  pub const DELETE: u8 = 0x53;
}

bitflags! {
  /// Modifier state accompanying a key event.
  #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
  pub struct ShiftFlags: u16 {
    const SHIFT = 1 << 0;
    const CONTROL = 1 << 1;
    const ALT = 1 << 2;
    const LSHIFT = 1 << 3;
    const RSHIFT = 1 << 4;
    const LCONTROL = 1 << 5;
    const RCONTROL = 1 << 6;
    const LALT = 1 << 7;
    const RALT = 1 << 8;
  }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseAction {
  Down,
  Up,
  /// Emitted periodically by the input source while a button is held.
  Repeat,
  Drag,
}

/// A mouse payload.
///
/// `x` and `y` are absolute when produced by an input source; containers
/// translate them into the coordinate space of the child they forward to.
/// `dx` and `dy` are the movement since the previous mouse event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MouseEvent {
  pub action: MouseAction,
  pub button: u8,
  pub x: i32,
  pub y: i32,
  pub dx: i32,
  pub dy: i32,
  pub double_click: bool,
}

impl MouseEvent {
  /// Returns a copy of this event with its position shifted by `(dx, dy)`.
  pub fn translated(mut self, dx: i32, dy: i32) -> Self {
    self.x += dx;
    self.y += dy;
    self
  }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
  Down,
  Up,
}

/// A keyboard payload: the translated character (0 when there is none), the
/// raw make code, and the modifier state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
  pub action: KeyAction,
  pub ascii: u8,
  pub make: u8,
  pub shift: ShiftFlags,
}

impl KeyEvent {
  pub fn is_down(&self) -> bool {
    self.action == KeyAction::Down
  }

  /// Returns whether this key types a printable ASCII character.
  pub fn is_printable(&self) -> bool {
    (0x20..=0x7E).contains(&self.ascii)
  }

  /// Returns the focus direction requested by a tab key press, if this is
  /// one.
  pub fn tab_direction(&self) -> Option<i32> {
    if !self.is_down() || self.make != scan::TAB {
      return None;
    }
    let shifted = ShiftFlags::SHIFT | ShiftFlags::LSHIFT | ShiftFlags::RSHIFT;
    if self.shift.intersects(shifted) {
      Some(-1)
    } else {
      Some(1)
    }
  }

  /// Returns whether this is a press of the accept key.
  pub fn is_accept(&self) -> bool {
    self.is_down() && self.make == scan::ENTER
  }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
  Command,
  Broadcast,
}

/// A message payload; commands and broadcasts are routed identically.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Message {
  pub kind: MessageKind,
  pub command: i32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
  None,
  Mouse(MouseEvent),
  Key(KeyEvent),
  Message(Message),
}

/// An input event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GEvent {
  pub time: u32,
  pub kind: EventKind,
}

impl GEvent {
  /// An event with no payload. Input sources emit these to let time pass.
  pub fn none(time: u32) -> Self {
    Self {
      time,
      kind: EventKind::None,
    }
  }

  pub fn mouse(time: u32, mouse: MouseEvent) -> Self {
    Self {
      time,
      kind: EventKind::Mouse(mouse),
    }
  }

  pub fn key(time: u32, key: KeyEvent) -> Self {
    Self {
      time,
      kind: EventKind::Key(key),
    }
  }

  pub fn command(time: u32, command: i32) -> Self {
    Self {
      time,
      kind: EventKind::Message(Message {
        kind: MessageKind::Command,
        command,
      }),
    }
  }

  pub fn broadcast(time: u32, command: i32) -> Self {
    Self {
      time,
      kind: EventKind::Message(Message {
        kind: MessageKind::Broadcast,
        command,
      }),
    }
  }

  /// Returns the exact type tag of this event.
  pub fn event_type(&self) -> EventType {
    match &self.kind {
      EventKind::None => EventType::NONE,
      EventKind::Mouse(m) => match m.action {
        MouseAction::Down => EventType::MOUSE_DOWN,
        MouseAction::Up => EventType::MOUSE_UP,
        MouseAction::Repeat => EventType::MOUSE_REPEAT,
        MouseAction::Drag => EventType::MOUSE_DRAG,
      },
      EventKind::Key(k) => match k.action {
        KeyAction::Down => EventType::KEY_DOWN,
        KeyAction::Up => EventType::KEY_UP,
      },
      EventKind::Message(m) => match m.kind {
        MessageKind::Command => EventType::COMMAND,
        MessageKind::Broadcast => EventType::BROADCAST,
      },
    }
  }

  /// Turns this event into a payload-less one, keeping its timestamp.
  pub fn clear(&mut self) {
    self.kind = EventKind::None;
  }

  pub fn as_mouse(&self) -> Option<&MouseEvent> {
    match &self.kind {
      EventKind::Mouse(m) => Some(m),
      _ => None,
    }
  }

  pub fn as_key(&self) -> Option<&KeyEvent> {
    match &self.kind {
      EventKind::Key(k) => Some(k),
      _ => None,
    }
  }
}
