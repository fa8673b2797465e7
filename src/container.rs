//! Containers: widgets that own other widgets.

use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::event::EventKind;
use crate::event::GEvent;
use crate::event::KeyEvent;
use crate::event::MouseAction;
use crate::event::MouseEvent;
use crate::modal::ModalResult;
use crate::widget::EventCtx;
use crate::widget::PaintCtx;
use crate::widget::Widget;
use crate::widget::WidgetBase;
use crate::widget::WidgetId;

/// An ordered collection of child widgets.
///
/// Children are painted in insertion order, so later children appear on top
/// of earlier ones, and mouse presses are hit-tested in the reverse order. A
/// container tracks which child has keyboard focus and which child has
/// captured the mouse since the last press, and can be run modally with
/// [`show_modal()`][crate::show_modal].
///
/// Children are positioned relative to the container's top-left corner.
#[derive(Debug)]
pub struct Container {
  base: WidgetBase,
  children: Vec<Box<dyn Widget>>,
  focus: Option<WidgetId>,
  drag: Option<WidgetId>,
  is_modal: bool,
  end_state: ModalResult,
}

impl Container {
  pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
    let mut base = WidgetBase::new(left, top, width, height);
    base.can_focus = true;
    base.is_container = true;
    Self {
      base,
      children: Vec::new(),
      focus: None,
      drag: None,
      is_modal: false,
      end_state: ModalResult::None,
    }
  }

  /// Appends `widget` to the end of the child list and returns its id.
  ///
  /// The first focusable child inserted becomes the focus.
  pub fn insert(&mut self, widget: impl Widget + 'static) -> WidgetId {
    self.insert_boxed(Box::new(widget))
  }

  pub fn insert_boxed(&mut self, mut widget: Box<dyn Widget>) -> WidgetId {
    let base = widget.base_mut();
    base.owner = Some(self.base.id);
    let id = base.id;
    if base.can_focus && self.focus.is_none() {
      self.focus = Some(id);
    }
    self.children.push(widget);
    trace!(container = ?self.base.id, child = ?id, "inserted");
    id
  }

  /// Unlinks the child with the given id and hands it back.
  ///
  /// Removing a widget that is not a child of this container does nothing.
  pub fn remove(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
    let idx = match self.index_of(id) {
      Some(idx) => idx,
      None => {
        warn!(container = ?self.base.id, child = ?id, "remove of a non-child");
        return None;
      }
    };

    let mut widget = self.children.remove(idx);
    widget.base_mut().owner = None;
    if self.focus == Some(id) {
      self.focus = None;
    }
    if self.drag == Some(id) {
      self.drag = None;
    }
    Some(widget)
  }

  pub fn len(&self) -> usize {
    self.children.len()
  }

  pub fn is_empty(&self) -> bool {
    self.children.is_empty()
  }

  /// Iterates over the children in paint order.
  pub fn children(&self) -> impl Iterator<Item = &dyn Widget> + '_ {
    self.children.iter().map(|c| &**c as &dyn Widget)
  }

  pub fn child(&self, id: WidgetId) -> Option<&dyn Widget> {
    self
      .children
      .iter()
      .find(|c| c.base().id == id)
      .map(|c| &**c as &dyn Widget)
  }

  pub fn child_mut(&mut self, id: WidgetId) -> Option<&mut dyn Widget> {
    self
      .children
      .iter_mut()
      .find(|c| c.base().id == id)
      .map(|c| &mut **c as &mut dyn Widget)
  }

  /// Looks up a descendant by id, searching nested containers, and downcasts
  /// it to `T`.
  pub fn find<T: Widget + 'static>(&self, id: WidgetId) -> Option<&T> {
    for child in &self.children {
      if child.base().id == id {
        return (**child).downcast_ref();
      }
      if let Some(found) = child.as_container().and_then(|c| c.find(id)) {
        return Some(found);
      }
    }
    None
  }

  pub fn find_mut<T: Widget + 'static>(
    &mut self,
    id: WidgetId,
  ) -> Option<&mut T> {
    for child in &mut self.children {
      if child.base().id == id {
        return (**child).downcast_mut();
      }
      if let Some(c) = child.as_container_mut() {
        if let Some(found) = c.find_mut(id) {
          return Some(found);
        }
      }
    }
    None
  }

  pub fn focus(&self) -> Option<WidgetId> {
    self.focus
  }

  pub fn drag(&self) -> Option<WidgetId> {
    self.drag
  }

  pub fn is_modal(&self) -> bool {
    self.is_modal
  }

  pub fn end_state(&self) -> ModalResult {
    self.end_state
  }

  /// Moves focus to the next (`dir > 0`) or previous (`dir < 0`) focusable
  /// child, wrapping around either end.
  ///
  /// Returns whether any child can take focus at all; if the current focus is
  /// the only one, it stays put.
  pub fn set_focus(&mut self, dir: i32) -> bool {
    let len = self.children.len() as isize;
    if len == 0 {
      return false;
    }
    if dir == 0 {
      return self.children.iter().any(|c| c.base().can_focus);
    }

    let step = dir.signum() as isize;
    let mut idx = match self.focus.and_then(|id| self.index_of(id)) {
      Some(idx) => idx as isize,
      None if step > 0 => len - 1,
      None => 0,
    };
    for _ in 0..len {
      idx = (idx + step).rem_euclid(len);
      let base = self.children[idx as usize].base();
      if base.can_focus {
        if self.focus != Some(base.id) {
          debug!(container = ?self.base.id, focus = ?base.id, "focus moved");
        }
        self.focus = Some(base.id);
        return true;
      }
    }
    false
  }

  /// Gives focus directly to the child `id`, if it can take it.
  pub fn set_focus_to(&mut self, id: WidgetId) -> bool {
    match self.child(id) {
      Some(child) if child.base().can_focus => {
        self.focus = Some(id);
        true
      }
      _ => false,
    }
  }

  /// Paints every child, offset by `(x, y)`.
  pub fn paint_children(&self, x: i32, y: i32, ctx: &mut PaintCtx) {
    for child in &self.children {
      let base = child.base();
      child.paint(
        x + base.rect.left,
        y + base.rect.top,
        self.focus == Some(base.id),
        ctx,
      );
    }
  }

  pub(crate) fn begin_modal(&mut self) {
    self.is_modal = true;
    self.end_state = ModalResult::None;
  }

  pub(crate) fn abandon_modal(&mut self) {
    self.is_modal = false;
  }

  fn finish_modal(&mut self, result: ModalResult) {
    if !self.is_modal {
      trace!(container = ?self.base.id, ?result, "run already ended");
      return;
    }
    self.end_state = result;
    self.is_modal = false;
  }

  fn index_of(&self, id: WidgetId) -> Option<usize> {
    self.children.iter().position(|c| c.base().id == id)
  }

  /// Forwards `event` to the child at `idx` and then acts on whatever the
  /// child asked its owner to do.
  fn forward(&mut self, idx: usize, event: &GEvent, ctx: &mut EventCtx) {
    self.children[idx].handle_event(event, ctx);

    if let Some((dx, dy)) = ctx.take_owner_move() {
      self.base.rect.translate(dx, dy);
    }
    if self.is_modal || self.end_state != ModalResult::None {
      if let Some(result) = ctx.take_end_modal() {
        self.finish_modal(result);
      }
    }
  }

  fn route_mouse(&mut self, mouse: &MouseEvent, time: u32, ctx: &mut EventCtx) {
    let local = mouse.translated(-self.base.rect.left, -self.base.rect.top);
    let event = GEvent::mouse(time, local);

    if mouse.action == MouseAction::Down {
      let hit = self
        .children
        .iter()
        .rposition(|c| c.contains(local.x, local.y));
      let idx = match hit {
        Some(idx) => idx,
        None => {
          self.drag = None;
          trace!(container = ?self.base.id, "mouse down hit nothing");
          return;
        }
      };

      let base = self.children[idx].base();
      if base.can_focus {
        self.focus = Some(base.id);
      }
      self.drag = Some(base.id);
      self.forward(idx, &event, ctx);
      return;
    }

    match self.drag.and_then(|id| self.index_of(id)) {
      Some(idx) => self.forward(idx, &event, ctx),
      None => trace!(container = ?self.base.id, "no drag target"),
    }
    if mouse.action == MouseAction::Up {
      self.drag = None;
    }
  }

  fn route_key(&mut self, key: &KeyEvent, event: &GEvent, ctx: &mut EventCtx) {
    let focus = self.focus.and_then(|id| self.index_of(id));

    if let Some(dir) = key.tab_direction() {
      // Inside a focused sub-container, the innermost one cycles first.
      if let Some(idx) = focus {
        if self.children[idx].base().is_container {
          self.forward(idx, event, ctx);
          if ctx.is_claimed() {
            return;
          }
        }
      }
      if self.set_focus(dir) {
        ctx.claim();
      }
      return;
    }

    match focus {
      Some(idx) => self.forward(idx, event, ctx),
      None => trace!(container = ?self.base.id, "key with no focus"),
    }

    if key.is_accept() && !ctx.is_claimed() {
      let default = self
        .children
        .iter()
        .enumerate()
        .find(|(i, c)| c.base().can_default && Some(*i) != focus)
        .map(|(i, _)| i);
      if let Some(idx) = default {
        self.forward(idx, event, ctx);
      }
    }
  }
}

impl Widget for Container {
  fn base(&self) -> &WidgetBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut WidgetBase {
    &mut self.base
  }

  fn paint(&self, x: i32, y: i32, _: bool, ctx: &mut PaintCtx) {
    self.paint_children(x, y, ctx);
  }

  fn handle_event(&mut self, event: &GEvent, ctx: &mut EventCtx) {
    match &event.kind {
      EventKind::Mouse(mouse) => self.route_mouse(mouse, event.time, ctx),
      EventKind::Key(key) => self.route_key(key, event, ctx),
      EventKind::Message(_) => {
        for idx in 0..self.children.len() {
          self.forward(idx, event, ctx);
        }
      }
      EventKind::None => {}
    }
  }

  fn end_modal(&mut self, result: ModalResult, ctx: &mut EventCtx) {
    if self.is_modal || self.end_state != ModalResult::None {
      self.finish_modal(result);
    } else {
      ctx.end_modal(result);
    }
  }

  fn as_container(&self) -> Option<&Container> {
    Some(self)
  }

  fn as_container_mut(&mut self) -> Option<&mut Container> {
    Some(self)
  }
}
