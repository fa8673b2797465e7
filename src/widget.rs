//! The widget abstraction.
//!
//! A widget is a positioned, paintable, event-handling unit. Widgets live in
//! a tree of [`Container`]s; each container exclusively owns its children and
//! every child remembers the id of the container holding it.
//!
//! Events flow down the tree by plain method calls. Requests that have to
//! travel *up* the tree, like ending a modal run or moving a window, are
//! recorded in the [`EventCtx`] that accompanies each event; every container
//! inspects the context after a child returns and either acts on the request
//! or leaves it for its own owner.

use std::fmt::Debug;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use tracing::trace;

use crate::blink::BlinkClock;
use crate::config::Metrics;
use crate::container::Container;
use crate::event::GEvent;
use crate::gui::Gui;
use crate::modal;
use crate::modal::ModalResult;
use crate::render::BitmapStore;
use crate::render::Surface;

/// A process-unique widget identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
  fn fresh() -> Self {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    Self(NEXT.fetch_add(1, Ordering::Relaxed))
  }
}

/// A rectangle in some container's coordinate space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
  pub left: i32,
  pub top: i32,
  pub width: i32,
  pub height: i32,
}

impl Rect {
  pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
    Self {
      left,
      top,
      width,
      height,
    }
  }

  pub fn right(&self) -> i32 {
    self.left + self.width
  }

  pub fn bottom(&self) -> i32 {
    self.top + self.height
  }

  /// Returns true if the point lies in `[left, right) x [top, bottom)`.
  pub fn contains(&self, x: i32, y: i32) -> bool {
    x >= self.left && y >= self.top && x < self.right() && y < self.bottom()
  }

  pub fn translate(&mut self, dx: i32, dy: i32) {
    self.left += dx;
    self.top += dy;
  }
}

/// State every widget carries.
#[derive(Clone, Debug)]
pub struct WidgetBase {
  pub id: WidgetId,
  pub rect: Rect,
  pub can_focus: bool,
  pub can_default: bool,
  pub is_container: bool,
  /// The container holding this widget. This is only ever used for routing;
  /// the owner's lifetime is not tied to it.
  pub owner: Option<WidgetId>,
}

impl WidgetBase {
  pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
    Self {
      id: WidgetId::fresh(),
      rect: Rect::new(left, top, width, height),
      can_focus: false,
      can_default: false,
      is_container: false,
      owner: None,
    }
  }
}

mod as_any {
  use std::any::Any;

  pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
  }

  impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
      self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
      self
    }
  }
}

/// A positioned, paintable, event-handling UI unit.
///
/// The `AsAny` supertrait lets a `dyn Widget` be downcast back to its
/// concrete type; `Sized` implementations get it for free.
pub trait Widget: as_any::AsAny + Debug {
  fn base(&self) -> &WidgetBase;
  fn base_mut(&mut self) -> &mut WidgetBase;

  /// Returns whether `(x, y)`, in the owner's coordinate space, lies within
  /// this widget.
  fn contains(&self, x: i32, y: i32) -> bool {
    self.base().rect.contains(x, y)
  }

  /// Draws this widget with its top-left corner at the absolute position
  /// `(x, y)`.
  fn paint(&self, x: i32, y: i32, has_focus: bool, ctx: &mut PaintCtx);

  /// Processes an event, either mutating own state or posting a request to
  /// `ctx`. Widgets are free to ignore any event.
  fn handle_event(&mut self, event: &GEvent, ctx: &mut EventCtx);

  /// Asks for the nearest modal ancestor to finish with `result`.
  fn end_modal(&mut self, result: ModalResult, ctx: &mut EventCtx) {
    ctx.end_modal(result)
  }

  fn as_container(&self) -> Option<&Container> {
    None
  }

  fn as_container_mut(&mut self) -> Option<&mut Container> {
    None
  }
}

impl<'a> dyn Widget + 'a {
  pub fn id(&self) -> WidgetId {
    self.base().id
  }

  pub fn rect(&self) -> Rect {
    self.base().rect
  }

  pub fn owner(&self) -> Option<WidgetId> {
    self.base().owner
  }

  pub fn downcast_ref<T: Widget + 'static>(&self) -> Option<&T> {
    self.as_any().downcast_ref()
  }

  pub fn downcast_mut<T: Widget + 'static>(&mut self) -> Option<&mut T> {
    self.as_any_mut().downcast_mut()
  }
}

/// Arguments for [`Widget::paint()`].
pub struct PaintCtx<'gui> {
  pub surface: &'gui mut dyn Surface,
  pub bitmaps: &'gui dyn BitmapStore,
  pub blink: &'gui BlinkClock,
  pub metrics: &'gui Metrics,
}

/// Context accompanying a single dispatched event.
///
/// Requests posted here do not take effect until the container that is meant
/// to act on them regains control.
pub struct EventCtx<'gui> {
  gui: &'gui mut Gui,
  end: Option<ModalResult>,
  owner_move: Option<(i32, i32)>,
  claimed: bool,
}

impl<'gui> EventCtx<'gui> {
  pub fn new(gui: &'gui mut Gui) -> Self {
    Self {
      gui,
      end: None,
      owner_move: None,
      claimed: false,
    }
  }

  /// Requests that the nearest modal ancestor end its run with `result`.
  ///
  /// The first request wins; later ones before it is claimed are dropped, as
  /// are requests for [`ModalResult::None`].
  pub fn end_modal(&mut self, result: ModalResult) {
    if result == ModalResult::None {
      return;
    }
    match self.end {
      Some(pending) => {
        trace!(?pending, ?result, "end_modal already pending; dropped")
      }
      None => self.end = Some(result),
    }
  }

  /// Takes the pending end-of-modal request, if any.
  pub fn take_end_modal(&mut self) -> Option<ModalResult> {
    self.end.take()
  }

  /// Asks the sender's owner to translate itself by `(dx, dy)`.
  pub fn move_owner(&mut self, dx: i32, dy: i32) {
    let (x, y) = self.owner_move.unwrap_or((0, 0));
    self.owner_move = Some((x + dx, y + dy));
  }

  pub fn take_owner_move(&mut self) -> Option<(i32, i32)> {
    self.owner_move.take()
  }

  /// Claims the event being processed, so containers will not offer it to
  /// anyone else.
  pub fn claim(&mut self) {
    self.claimed = true
  }

  pub fn is_claimed(&self) -> bool {
    self.claimed
  }

  pub fn gui(&mut self) -> &mut Gui {
    self.gui
  }

  /// Runs `dialog` modally on top of whatever run is currently dispatching
  /// this event.
  pub fn show_modal(
    &mut self,
    dialog: &mut dyn Widget,
  ) -> Result<ModalResult, modal::Error> {
    modal::show_modal(self.gui, dialog)
  }
}
