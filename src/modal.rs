//! Modal runs.
//!
//! [`show_modal()`] turns a container into a dialog: it pumps events into the
//! container until something inside it asks to end the run, then returns the
//! requested [`ModalResult`]. Runs nest through the call stack; a callback
//! that opens another dialog simply calls [`show_modal()`] again.

use std::io;

use tracing::debug;
use tracing::error;
use tracing::trace;

use crate::event::GEvent;
use crate::gui::Gui;
use crate::widget::EventCtx;
use crate::widget::Widget;
use crate::widget::WidgetId;

/// The outcome of a modal run.
///
/// `None` is both the initial state and the "still running" sentinel; any
/// other value ends a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModalResult {
  None,
  Ok,
  Cancel,
  Abort,
  Retry,
  Ignore,
  Yes,
  No,
  /// An application-defined result, numbered from the first user code.
  User(u16),
}

impl Default for ModalResult {
  fn default() -> Self {
    ModalResult::None
  }
}

impl ModalResult {
  /// Returns the numeric code of this result.
  pub fn code(self) -> u32 {
    match self {
      ModalResult::None => 0,
      ModalResult::Ok => 1,
      ModalResult::Cancel => 2,
      ModalResult::Abort => 3,
      ModalResult::Retry => 4,
      ModalResult::Ignore => 5,
      ModalResult::Yes => 6,
      ModalResult::No => 7,
      ModalResult::User(n) => 8 + n as u32,
    }
  }
}

/// A modal run error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
  #[error("input source closed")]
  InputClosed,

  #[error(transparent)]
  Io(#[from] io::Error),

  #[error("widget {0:?} is not a container and cannot run modally")]
  NotAContainer(WidgetId),
}

/// A synchronous stream of events.
pub trait InputSource {
  /// Blocks until the next event is available.
  ///
  /// Once a source returns an error it is expected to keep doing so.
  fn next_event(&mut self) -> Result<GEvent, Error>;
}

/// Runs `dialog` modally and returns the result it ended with.
///
/// `dialog` must be (or wrap) a [`Container`][crate::Container]. Each pass
/// paints the dialog, pulls one event and dispatches it; the loop stops as
/// soon as the run has been ended. If the input source or the surface fails,
/// the run is abandoned and the error returned.
pub fn show_modal(
  gui: &mut Gui,
  dialog: &mut dyn Widget,
) -> Result<ModalResult, Error> {
  let id = dialog.base().id;
  match dialog.as_container_mut() {
    Some(c) => c.begin_modal(),
    None => return Err(Error::NotAContainer(id)),
  }
  debug!(?id, "modal run started");

  let result = run(gui, dialog);
  if let Some(c) = dialog.as_container_mut() {
    c.abandon_modal();
  }

  match &result {
    Ok(r) => debug!(?id, result = ?r, "modal run ended"),
    Err(e) => debug!(?id, error = %e, "modal run abandoned"),
  }
  result
}

fn run(gui: &mut Gui, dialog: &mut dyn Widget) -> Result<ModalResult, Error> {
  loop {
    gui.paint(dialog)?;
    let event = gui.next_event()?;

    let mut ctx = EventCtx::new(gui);
    dialog.handle_event(&event, &mut ctx);
    if let Some(result) = ctx.take_end_modal() {
      unclaimed_end_modal(result);
    }

    match dialog.as_container() {
      Some(c) if c.is_modal() => continue,
      Some(c) => return Ok(c.end_state()),
      None => return Err(Error::NotAContainer(dialog.base().id)),
    }
  }
}

/// Delivers a single event to a root widget outside of any modal run.
///
/// This is for applications with their own top-level loop. Since nothing is
/// running modally, any end-of-modal request that reaches the root is an
/// error.
pub fn dispatch(gui: &mut Gui, root: &mut dyn Widget, event: &GEvent) {
  let mut ctx = EventCtx::new(gui);
  root.handle_event(event, &mut ctx);
  if let Some(result) = ctx.take_end_modal() {
    unclaimed_end_modal(result);
  }
  if ctx.take_owner_move().is_some() {
    trace!("owner move reached the root; dropped");
  }
}

fn unclaimed_end_modal(result: ModalResult) {
  error!(?result, "end_modal reached the root without a modal container");
  debug_assert!(
    false,
    "end_modal({:?}) reached the root without a modal container",
    result
  );
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::button::TextButton;
  use crate::container::Container;
  use crate::testing;
  use crate::testing::ev;
  use crate::widget::WidgetBase;

  #[test]
  fn codes_match_numbering() {
    assert_eq!(ModalResult::None.code(), 0);
    assert_eq!(ModalResult::No.code(), 7);
    assert_eq!(ModalResult::User(0).code(), 8);
    assert_eq!(ModalResult::User(3).code(), 11);
  }

  #[test]
  fn returns_result_of_ending_call() {
    let mut dialog = Container::new(0, 0, 100, 100);
    dialog.insert(TextButton::new(10, 10, 30, 10, "Yes", ModalResult::Yes));

    // The first click misses; the run must keep going until the second.
    let mut gui = testing::gui_with(vec![
      ev::down(80, 80),
      ev::up(80, 80),
      ev::down(15, 15),
      ev::up(15, 15),
      ev::down(80, 80),
    ]);
    let result = show_modal(&mut gui, &mut dialog).unwrap();
    assert_eq!(result, ModalResult::Yes);
    assert!(!dialog.is_modal());
    assert_eq!(dialog.end_state(), ModalResult::Yes);

    // The trailing event was never pulled.
    assert!(gui.next_event().is_ok());
  }

  #[test]
  fn closed_input_abandons_run() {
    let mut dialog = Container::new(0, 0, 100, 100);
    let mut gui = testing::gui_with(vec![ev::down(1, 1)]);
    assert!(matches!(
      show_modal(&mut gui, &mut dialog),
      Err(Error::InputClosed)
    ));
    assert!(!dialog.is_modal());
  }

  #[test]
  fn leaf_widget_cannot_run_modally() {
    #[derive(Debug)]
    struct Leaf(WidgetBase);
    impl Widget for Leaf {
      fn base(&self) -> &WidgetBase {
        &self.0
      }
      fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.0
      }
      fn paint(&self, _: i32, _: i32, _: bool, _: &mut crate::PaintCtx) {}
      fn handle_event(&mut self, _: &GEvent, _: &mut EventCtx) {}
    }

    let mut gui = testing::gui_with(vec![]);
    let mut leaf = Leaf(WidgetBase::new(0, 0, 1, 1));
    assert!(matches!(
      show_modal(&mut gui, &mut leaf),
      Err(Error::NotAContainer(_))
    ));
  }

  #[test]
  #[cfg(debug_assertions)]
  #[should_panic(expected = "without a modal container")]
  fn end_modal_without_modal_ancestor_is_fatal_in_debug() {
    let mut root = Container::new(0, 0, 100, 100);
    root.insert(TextButton::new(0, 0, 10, 10, "Ok", ModalResult::Ok));
    let mut gui = testing::gui_with(vec![]);
    dispatch(&mut gui, &mut root, &ev::down(1, 1));
    dispatch(&mut gui, &mut root, &ev::up(1, 1));
  }
}
