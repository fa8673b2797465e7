//! Framed containers: panels, title bars and windows.

use tracing::trace;

use crate::config::Metrics;
use crate::container::Container;
use crate::event::EventKind;
use crate::event::GEvent;
use crate::event::MouseAction;
use crate::modal::ModalResult;
use crate::render::Color;
use crate::widget::EventCtx;
use crate::widget::PaintCtx;
use crate::widget::Widget;
use crate::widget::WidgetBase;
use crate::widget::WidgetId;

/// The longest title a [`TitleBar`] holds, in bytes.
pub const MAX_TITLE_LEN: usize = 255;

/// A container drawn with a beveled border.
///
/// `sizes` holds the outer bevel, inner bevel and content inset, in that
/// order. A negative bevel size draws that bevel sunken instead of raised.
/// Panels never take focus themselves.
#[derive(Debug)]
pub struct Panel {
  container: Container,
  sizes: [i32; 3],
}

impl Panel {
  pub fn new(
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    sizes: [i32; 3],
  ) -> Self {
    let mut container = Container::new(left, top, width, height);
    container.base_mut().can_focus = false;
    Self { container, sizes }
  }

  pub fn insert(&mut self, widget: impl Widget + 'static) -> WidgetId {
    self.container.insert(widget)
  }

  pub fn container(&self) -> &Container {
    &self.container
  }

  pub fn container_mut(&mut self) -> &mut Container {
    &mut self.container
  }

  pub fn sizes(&self) -> [i32; 3] {
    self.sizes
  }

  fn paint_frame(&self, x: i32, y: i32, ctx: &mut PaintCtx) {
    let [outer, inner, inset] = self.sizes;
    let rect = self.container.base().rect;
    let (x1, y1) = (x + rect.width, y + rect.height);

    ctx.surface.draw_rect(x, y, x1, y1, Color::GRAY);
    let i = ctx.surface.draw_frame(
      x,
      y,
      x1,
      y1,
      outer,
      Color::LIGHT_GRAY,
      Color::DARK_GRAY,
    );
    let i = i + ctx.surface.draw_frame(
      x + i,
      y + i,
      x1 - i,
      y1 - i,
      inner,
      Color::LIGHT_GRAY,
      Color::DARK_GRAY,
    );
    // The inset is a flat ring in the plate color.
    ctx.surface.draw_frame(
      x + i,
      y + i,
      x1 - i,
      y1 - i,
      inset.max(0),
      Color::GRAY,
      Color::GRAY,
    );
  }
}

impl Widget for Panel {
  fn base(&self) -> &WidgetBase {
    self.container.base()
  }

  fn base_mut(&mut self) -> &mut WidgetBase {
    self.container.base_mut()
  }

  fn paint(&self, x: i32, y: i32, _: bool, ctx: &mut PaintCtx) {
    self.paint_frame(x, y, ctx);
    self.container.paint_children(x, y, ctx);
  }

  fn handle_event(&mut self, event: &GEvent, ctx: &mut EventCtx) {
    self.container.handle_event(event, ctx)
  }

  fn end_modal(&mut self, result: ModalResult, ctx: &mut EventCtx) {
    self.container.end_modal(result, ctx)
  }

  fn as_container(&self) -> Option<&Container> {
    Some(&self.container)
  }

  fn as_container_mut(&mut self) -> Option<&mut Container> {
    Some(&mut self.container)
  }
}

/// A strip showing a centered caption. Dragging it drags whatever holds it.
#[derive(Clone, Debug)]
pub struct TitleBar {
  base: WidgetBase,
  text: String,
}

impl TitleBar {
  /// Creates a new title bar; `text` is cut down to [`MAX_TITLE_LEN`] bytes.
  pub fn new(left: i32, top: i32, width: i32, height: i32, text: &str) -> Self {
    Self {
      base: WidgetBase::new(left, top, width, height),
      text: truncate(text, MAX_TITLE_LEN).to_string(),
    }
  }

  pub fn text(&self) -> &str {
    &self.text
  }
}

impl Widget for TitleBar {
  fn base(&self) -> &WidgetBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut WidgetBase {
    &mut self.base
  }

  fn paint(&self, x: i32, y: i32, _: bool, ctx: &mut PaintCtx) {
    let rect = self.base.rect;
    ctx.surface.draw_rect(
      x,
      y,
      x + rect.width,
      y + rect.height,
      Color::DARK_BLUE,
    );
    let text_y = y + (rect.height - ctx.metrics.line_height) / 2;
    ctx.surface.draw_centered_string(
      x + rect.width / 2,
      text_y,
      &self.text,
      Color::WHITE,
    );
  }

  fn handle_event(&mut self, event: &GEvent, ctx: &mut EventCtx) {
    if let EventKind::Mouse(m) = &event.kind {
      if m.action == MouseAction::Drag && (m.dx != 0 || m.dy != 0) {
        trace!(title = ?self.base.id, dx = m.dx, dy = m.dy, "dragging owner");
        ctx.move_owner(m.dx, m.dy);
      }
    }
  }
}

/// A framed panel with a [`TitleBar`] across the top and a client container
/// filling the rest.
///
/// Widgets inserted into a window land in its client container, so they are
/// positioned relative to the client area and can never overlap the title.
#[derive(Debug)]
pub struct Window {
  panel: Panel,
  title: WidgetId,
  client: WidgetId,
}

impl Window {
  /// Creates a new window laid out with the default [`Metrics`].
  pub fn new(left: i32, top: i32, width: i32, height: i32, title: &str) -> Self {
    Self::with_metrics(left, top, width, height, title, &Metrics::default())
  }

  pub fn with_metrics(
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    title: &str,
    metrics: &Metrics,
  ) -> Self {
    let inset = metrics.frame_inset();
    let title_height = metrics.title_height;
    let inner_width = width - 2 * inset;

    let mut panel = Panel::new(left, top, width, height, metrics.window_frame);
    let title = panel.insert(TitleBar::new(
      inset,
      inset,
      inner_width,
      title_height,
      title,
    ));
    let client = panel.insert(Container::new(
      inset,
      inset + title_height,
      inner_width,
      height - 2 * inset - title_height,
    ));

    Self {
      panel,
      title,
      client,
    }
  }

  /// Inserts `widget` into the client area.
  pub fn insert(&mut self, widget: impl Widget + 'static) -> WidgetId {
    self.client_mut().insert(widget)
  }

  pub fn client(&self) -> &Container {
    self
      .panel
      .container()
      .find(self.client)
      .expect("window lost its client container")
  }

  pub fn client_mut(&mut self) -> &mut Container {
    let client = self.client;
    self
      .panel
      .container_mut()
      .find_mut(client)
      .expect("window lost its client container")
  }

  pub fn title_bar(&self) -> &TitleBar {
    self
      .panel
      .container()
      .find(self.title)
      .expect("window lost its title bar")
  }

  pub fn panel(&self) -> &Panel {
    &self.panel
  }
}

impl Widget for Window {
  fn base(&self) -> &WidgetBase {
    self.panel.base()
  }

  fn base_mut(&mut self) -> &mut WidgetBase {
    self.panel.base_mut()
  }

  fn paint(&self, x: i32, y: i32, has_focus: bool, ctx: &mut PaintCtx) {
    self.panel.paint(x, y, has_focus, ctx)
  }

  fn handle_event(&mut self, event: &GEvent, ctx: &mut EventCtx) {
    self.panel.handle_event(event, ctx)
  }

  fn end_modal(&mut self, result: ModalResult, ctx: &mut EventCtx) {
    self.client_mut().end_modal(result, ctx)
  }

  /// A window runs modally through its client, so the frame's own children
  /// are never reachable from outside.
  fn as_container(&self) -> Option<&Container> {
    Some(self.client())
  }

  fn as_container_mut(&mut self) -> Option<&mut Container> {
    Some(self.client_mut())
  }
}

/// Cuts `s` down to at most `max` bytes without splitting a character.
pub(crate) fn truncate(s: &str, max: usize) -> &str {
  if s.len() <= max {
    return s;
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  &s[..end]
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::testing;
  use crate::testing::ev;
  use crate::testing::DrawCall;
  use crate::testing::Probe;

  #[test]
  fn panel_paints_frame_then_children() {
    let (mut gui, log) = testing::gui_recording(vec![]);
    let mut panel = Panel::new(0, 0, 10, 10, [1, -1, 0]);
    panel.insert(Probe::unfocusable(2, 2, 2, 2));

    panel.paint(0, 0, false, &mut gui.paint_ctx());
    assert_eq!(
      *log.borrow(),
      vec![
        DrawCall::Rect {
          x0: 0,
          y0: 0,
          x1: 10,
          y1: 10,
          color: Color::GRAY,
        },
        DrawCall::Bevel {
          x0: 0,
          y0: 0,
          x1: 10,
          y1: 10,
          color1: Color::LIGHT_GRAY,
          color2: Color::DARK_GRAY,
        },
        DrawCall::Bevel {
          x0: 1,
          y0: 1,
          x1: 9,
          y1: 9,
          color1: Color::DARK_GRAY,
          color2: Color::LIGHT_GRAY,
        },
        DrawCall::Rect {
          x0: 2,
          y0: 2,
          x1: 4,
          y1: 4,
          color: Probe::UNFOCUSED,
        },
      ]
    );
  }

  #[test]
  fn panels_do_not_take_focus() {
    let panel = Panel::new(0, 0, 10, 10, [1, 1, 1]);
    assert!(!panel.base().can_focus);
    assert!(panel.base().is_container);
  }

  #[test]
  fn window_insert_goes_to_client() {
    let mut window = Window::new(0, 0, 100, 80, "Test");
    let id = window.insert(Probe::new(0, 0, 10, 10));

    assert!(window.client().child(id).is_some());
    assert!(window.panel().container().child(id).is_none());
    assert_eq!(window.panel().container().len(), 2);
    assert_eq!(window.panel().container().focus(), Some(window.client));
  }

  #[test]
  fn window_exposes_only_its_client() {
    let mut window = Window::new(0, 0, 100, 80, "Test");
    let id = window.insert(Probe::new(0, 0, 10, 10));
    let (title, client) = (window.title, window.client);

    let c = window.as_container_mut().unwrap();
    assert_eq!(c.base().id, client);
    assert!(c.remove(client).is_none());
    assert!(c.remove(title).is_none());
    assert!(c.remove(id).is_some());

    window.insert(Probe::new(0, 0, 10, 10));
    assert_eq!(window.client().len(), 1);
    assert_eq!(window.title_bar().text(), "Test");
  }

  #[test]
  fn window_runs_modally_through_its_client() {
    let mut window = Window::new(0, 0, 100, 80, "Test");
    window.as_container_mut().unwrap().begin_modal();
    let mut gui = testing::gui_with(vec![]);
    let mut ctx = EventCtx::new(&mut gui);

    window.end_modal(ModalResult::Retry, &mut ctx);
    window.end_modal(ModalResult::No, &mut ctx);
    assert_eq!(ctx.take_end_modal(), None);
    let client = window.as_container().unwrap();
    assert!(!client.is_modal());
    assert_eq!(client.end_state(), ModalResult::Retry);
  }

  #[test]
  fn panel_inset_is_a_flat_ring() {
    let (mut gui, log) = testing::gui_recording(vec![]);
    let panel = Panel::new(0, 0, 10, 10, [1, 1, 1]);

    panel.paint(0, 0, false, &mut gui.paint_ctx());
    assert_eq!(
      log.borrow().last(),
      Some(&DrawCall::Bevel {
        x0: 2,
        y0: 2,
        x1: 8,
        y1: 8,
        color1: Color::GRAY,
        color2: Color::GRAY,
      })
    );
    assert_eq!(log.borrow().len(), 4);
  }

  #[test]
  fn client_sits_below_title() {
    let m = Metrics::default();
    let window = Window::new(0, 0, 100, 80, "Test");
    let inset = m.frame_inset();

    let title = window.title_bar().base().rect;
    let client = window.client().base().rect;
    assert_eq!(title.top, inset);
    assert_eq!(client.top, title.bottom());
    assert_eq!(client.bottom(), 80 - inset);
    assert_eq!(client.width, 100 - 2 * inset);
  }

  #[test]
  fn client_coordinates_are_relative() {
    let mut gui = testing::gui_with(vec![]);
    let mut window = Window::new(20, 10, 100, 80, "Test");
    let id = window.insert(Probe::new(0, 0, 10, 10));

    let client = window.client().base().rect;
    let (x, y) = (20 + client.left + 5, 10 + client.top + 5);
    let mut ctx = EventCtx::new(&mut gui);
    window.handle_event(&ev::down(x, y), &mut ctx);

    let probe = window.client().find::<Probe>(id).unwrap();
    let seen = probe.events()[0].as_mouse().copied().unwrap();
    assert_eq!((seen.x, seen.y), (5, 5));
  }

  #[test]
  fn title_drag_moves_window() {
    let mut gui = testing::gui_with(vec![]);
    let mut window = Window::new(10, 10, 100, 80, "Test");

    for event in &[ev::down(50, 15), ev::drag(60, 20, 10, 5), ev::up(60, 20)] {
      let mut ctx = EventCtx::new(&mut gui);
      window.handle_event(event, &mut ctx);
    }
    assert_eq!(window.base().rect.left, 20);
    assert_eq!(window.base().rect.top, 15);
    assert_eq!(window.base().rect.width, 100);
  }

  #[test]
  fn title_is_truncated() {
    let long = "a".repeat(300);
    assert_eq!(TitleBar::new(0, 0, 1, 1, &long).text().len(), MAX_TITLE_LEN);

    let wide = "é".repeat(200);
    let title = TitleBar::new(0, 0, 1, 1, &wide);
    assert_eq!(title.text().len(), 254);
  }
}
