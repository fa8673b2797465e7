//! An [`InputSource`] reading the terminal through crossterm.
//!
//! Terminals only report presses, releases and motion, so the rest of the
//! event model is synthesized here: idle events when nothing happens for a
//! poll interval, mouse repeats while a button is held, and double clicks.

use std::io;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use bevel::event::scan;
use bevel::event::KeyAction;
use bevel::event::KeyEvent;
use bevel::event::MouseAction;
use bevel::event::MouseEvent;
use bevel::event::ShiftFlags;
use bevel::modal::Error;
use bevel::modal::InputSource;
use bevel::GEvent;

use crossbeam::channel;
use crossbeam::channel::Receiver;
use crossbeam::channel::RecvTimeoutError;

use crossterm::event;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseButton;
use crossterm::event::MouseEventKind;

use tracing::debug;
use tracing::info;

use crate::config::Config;

/// Terminal input, read on a background thread.
pub struct TermInput {
  events: Receiver<crossterm::Result<Event>>,
  mapper: Mapper,
  closed: bool,
}

impl TermInput {
  pub fn spawn(config: &Config) -> Self {
    let (sink, events) = channel::unbounded();
    thread::spawn(move || loop {
      let event = event::read();
      let failed = event.is_err();
      if sink.send(event).is_err() || failed {
        break;
      }
    });

    Self {
      events,
      mapper: Mapper::new(Timing::from(config), Instant::now()),
      closed: false,
    }
  }
}

impl InputSource for TermInput {
  fn next_event(&mut self) -> Result<GEvent, Error> {
    if self.closed {
      return Err(Error::InputClosed);
    }

    let result = loop {
      let now = Instant::now();
      match self.events.recv_timeout(self.mapper.timeout(now)) {
        Ok(Ok(event)) => match self.mapper.translate(event, Instant::now()) {
          Ok(Some(event)) => break Ok(event),
          Ok(None) => continue,
          Err(e) => break Err(e),
        },
        Ok(Err(e)) => {
          break Err(Error::Io(io::Error::new(io::ErrorKind::Other, e)))
        }
        Err(RecvTimeoutError::Timeout) => {
          break Ok(self.mapper.idle(Instant::now()))
        }
        Err(RecvTimeoutError::Disconnected) => break Err(Error::InputClosed),
      }
    };

    if result.is_err() {
      info!("terminal input closed");
      self.closed = true;
    }
    result
  }
}

#[derive(Copy, Clone, Debug)]
struct Timing {
  repeat_delay: Duration,
  repeat_interval: Duration,
  double_click: Duration,
  poll: Duration,
}

impl From<&Config> for Timing {
  fn from(config: &Config) -> Self {
    Self {
      repeat_delay: config.repeat_delay(),
      repeat_interval: config.repeat_interval(),
      double_click: config.double_click(),
      poll: config.poll_interval(),
    }
  }
}

#[derive(Copy, Clone, Debug)]
struct Press {
  button: u8,
  at: Instant,
  x: i32,
  y: i32,
}

/// Turns crossterm events into [`GEvent`]s, keeping the pointer state that
/// takes.
struct Mapper {
  timing: Timing,
  start: Instant,
  pos: (i32, i32),
  held: Option<(u8, Instant)>,
  last_press: Option<Press>,
}

impl Mapper {
  fn new(timing: Timing, start: Instant) -> Self {
    Self {
      timing,
      start,
      pos: (0, 0),
      held: None,
      last_press: None,
    }
  }

  /// Milliseconds since the mapper was created.
  fn stamp(&self, now: Instant) -> u32 {
    now.saturating_duration_since(self.start).as_millis() as u32
  }

  /// Returns how long to wait for terminal input before synthesizing an
  /// event.
  fn timeout(&self, now: Instant) -> Duration {
    let poll = self.timing.poll;
    match self.held {
      Some((_, next)) => next.saturating_duration_since(now).min(poll),
      None => poll,
    }
  }

  /// Produces the event for a wait that timed out: a repeat if one is due,
  /// and an empty event otherwise.
  fn idle(&mut self, now: Instant) -> GEvent {
    match self.held {
      Some((button, next)) if now >= next => {
        self.held = Some((button, now + self.timing.repeat_interval));
        self.mouse(now, MouseAction::Repeat, button, self.pos, false)
      }
      _ => GEvent::none(self.stamp(now)),
    }
  }

  fn translate(
    &mut self,
    event: Event,
    now: Instant,
  ) -> Result<Option<GEvent>, Error> {
    match event {
      Event::Key(key) => {
        if key.code == KeyCode::Char('c')
          && key.modifiers.contains(KeyModifiers::CONTROL)
        {
          return Err(Error::InputClosed);
        }
        Ok(self.key(now, key.code, key.modifiers))
      }
      Event::Mouse(m) => {
        let pos = (m.column as i32, m.row as i32);
        Ok(match m.kind {
          MouseEventKind::Down(b) => {
            let button = button_id(b);
            let double_click = self.is_double_click(button, pos, now);
            self.last_press = Some(Press {
              button,
              at: now,
              x: pos.0,
              y: pos.1,
            });
            self.held = Some((button, now + self.timing.repeat_delay));
            Some(self.mouse(now, MouseAction::Down, button, pos, double_click))
          }
          MouseEventKind::Up(b) => {
            self.held = None;
            Some(self.mouse(now, MouseAction::Up, button_id(b), pos, false))
          }
          MouseEventKind::Drag(b) => {
            Some(self.mouse(now, MouseAction::Drag, button_id(b), pos, false))
          }
          MouseEventKind::Moved => {
            self.pos = pos;
            None
          }
          MouseEventKind::ScrollUp => self.key(now, KeyCode::Up, m.modifiers),
          MouseEventKind::ScrollDown => {
            self.key(now, KeyCode::Down, m.modifiers)
          }
        })
      }
      Event::Resize(w, h) => {
        debug!(w, h, "ignoring terminal resize");
        Ok(None)
      }
    }
  }

  fn is_double_click(&self, button: u8, pos: (i32, i32), now: Instant) -> bool {
    match self.last_press {
      Some(p) => {
        p.button == button
          && (p.x, p.y) == pos
          && now.saturating_duration_since(p.at) <= self.timing.double_click
      }
      None => false,
    }
  }

  fn mouse(
    &mut self,
    now: Instant,
    action: MouseAction,
    button: u8,
    pos: (i32, i32),
    double_click: bool,
  ) -> GEvent {
    let (dx, dy) = (pos.0 - self.pos.0, pos.1 - self.pos.1);
    self.pos = pos;
    GEvent::mouse(
      self.stamp(now),
      MouseEvent {
        action,
        button,
        x: pos.0,
        y: pos.1,
        dx,
        dy,
        double_click,
      },
    )
  }

  fn key(
    &self,
    now: Instant,
    code: KeyCode,
    modifiers: KeyModifiers,
  ) -> Option<GEvent> {
    let (make, mut ascii) = key_codes(code)?;
    let mut shift = shift_flags(modifiers);
    if code == KeyCode::BackTab {
      shift |= ShiftFlags::SHIFT | ShiftFlags::LSHIFT;
    }
    if shift.contains(ShiftFlags::CONTROL) {
      ascii = 0;
    }

    Some(GEvent::key(
      self.stamp(now),
      KeyEvent {
        action: KeyAction::Down,
        ascii,
        make,
        shift,
      },
    ))
  }
}

fn button_id(button: MouseButton) -> u8 {
  match button {
    MouseButton::Left => 1,
    MouseButton::Right => 2,
    MouseButton::Middle => 3,
  }
}

/// Returns the make code and character for a key.
fn key_codes(code: KeyCode) -> Option<(u8, u8)> {
  Some(match code {
    KeyCode::Char(' ') => (scan::SPACE, b' '),
    KeyCode::Char(c) if c.is_ascii() => (0, c as u8),
    KeyCode::Enter => (scan::ENTER, b'\r'),
    KeyCode::Tab | KeyCode::BackTab => (scan::TAB, b'\t'),
    KeyCode::Backspace => (scan::BACKSPACE, 0x08),
    KeyCode::Delete => (scan::DELETE, 0),
    KeyCode::Esc => (scan::ESC, 0x1B),
    KeyCode::Left => (scan::LEFT, 0),
    KeyCode::Right => (scan::RIGHT, 0),
    KeyCode::Up => (scan::UP, 0),
    KeyCode::Down => (scan::DOWN, 0),
    KeyCode::Home => (scan::HOME, 0),
    KeyCode::End => (scan::END, 0),
    KeyCode::PageUp => (scan::PGUP, 0),
    KeyCode::PageDown => (scan::PGDN, 0),
    _ => return None,
  })
}

/// Terminals cannot tell left from right modifiers, so every modifier reads
/// as the left one.
fn shift_flags(modifiers: KeyModifiers) -> ShiftFlags {
  let mut shift = ShiftFlags::empty();
  if modifiers.contains(KeyModifiers::SHIFT) {
    shift |= ShiftFlags::SHIFT | ShiftFlags::LSHIFT;
  }
  if modifiers.contains(KeyModifiers::CONTROL) {
    shift |= ShiftFlags::CONTROL | ShiftFlags::LCONTROL;
  }
  if modifiers.contains(KeyModifiers::ALT) {
    shift |= ShiftFlags::ALT | ShiftFlags::LALT;
  }
  shift
}

#[cfg(test)]
mod tests {
  use super::*;

  use bevel::event::EventKind;

  use crossterm::event::KeyEvent as TermKey;
  use crossterm::event::MouseEvent as TermMouse;

  const MS: Duration = Duration::from_millis(1);

  fn mapper(start: Instant) -> Mapper {
    Mapper::new(
      Timing {
        repeat_delay: 400 * MS,
        repeat_interval: 80 * MS,
        double_click: 300 * MS,
        poll: 100 * MS,
      },
      start,
    )
  }

  fn mouse(kind: MouseEventKind, x: u16, y: u16) -> Event {
    Event::Mouse(TermMouse {
      kind,
      column: x,
      row: y,
      modifiers: KeyModifiers::NONE,
    })
  }

  fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
    Event::Key(TermKey { code, modifiers })
  }

  fn as_mouse(event: Option<GEvent>) -> MouseEvent {
    *event.unwrap().as_mouse().unwrap()
  }

  #[test]
  fn drags_carry_deltas() {
    let t = Instant::now();
    let mut m = mapper(t);
    m.translate(mouse(MouseEventKind::Moved, 5, 5), t).unwrap();
    let drag = m
      .translate(mouse(MouseEventKind::Drag(MouseButton::Left), 8, 4), t)
      .unwrap();
    let drag = as_mouse(drag);
    assert_eq!(drag.action, MouseAction::Drag);
    assert_eq!((drag.x, drag.y, drag.dx, drag.dy), (8, 4, 3, -1));
  }

  #[test]
  fn held_button_repeats_after_delay() {
    let t = Instant::now();
    let mut m = mapper(t);
    m.translate(mouse(MouseEventKind::Down(MouseButton::Left), 2, 3), t)
      .unwrap();

    assert_eq!(m.idle(t + 100 * MS).kind, EventKind::None);
    let repeat = m.idle(t + 400 * MS);
    assert_eq!(repeat.time, 400);
    assert_eq!(repeat.as_mouse().unwrap().action, MouseAction::Repeat);
    assert_eq!(m.timeout(t + 400 * MS), 80 * MS);

    m.translate(mouse(MouseEventKind::Up(MouseButton::Left), 2, 3), t)
      .unwrap();
    assert_eq!(m.idle(t + 1000 * MS).kind, EventKind::None);
  }

  #[test]
  fn quick_second_press_is_a_double_click() {
    let t = Instant::now();
    let mut m = mapper(t);
    let down = mouse(MouseEventKind::Down(MouseButton::Left), 1, 1);
    let up = mouse(MouseEventKind::Up(MouseButton::Left), 1, 1);

    assert!(!as_mouse(m.translate(down.clone(), t).unwrap()).double_click);
    m.translate(up.clone(), t).unwrap();
    assert!(as_mouse(m.translate(down.clone(), t + 200 * MS).unwrap())
      .double_click);
    m.translate(up, t).unwrap();
    assert!(!as_mouse(m.translate(down, t + 1000 * MS).unwrap()).double_click);
  }

  #[test]
  fn keys_map_to_make_codes() {
    let t = Instant::now();
    let mut m = mapper(t);

    let k = m.translate(key(KeyCode::Char('x'), KeyModifiers::NONE), t);
    let k = *k.unwrap().unwrap().as_key().unwrap();
    assert_eq!((k.make, k.ascii), (0, b'x'));

    let k = m.translate(key(KeyCode::BackTab, KeyModifiers::NONE), t);
    let k = *k.unwrap().unwrap().as_key().unwrap();
    assert_eq!(k.tab_direction(), Some(-1));

    let k = m.translate(key(KeyCode::Char('a'), KeyModifiers::CONTROL), t);
    let k = *k.unwrap().unwrap().as_key().unwrap();
    assert!(!k.is_printable());

    assert!(m
      .translate(key(KeyCode::F(1), KeyModifiers::NONE), t)
      .unwrap()
      .is_none());
  }

  #[test]
  fn ctrl_c_closes_input() {
    let t = Instant::now();
    let mut m = mapper(t);
    assert!(matches!(
      m.translate(key(KeyCode::Char('c'), KeyModifiers::CONTROL), t),
      Err(Error::InputClosed)
    ));
  }
}
