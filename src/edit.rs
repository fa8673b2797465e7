//! Single-line text and number fields.

use tracing::trace;

use crate::event::scan;
use crate::event::EventKind;
use crate::event::GEvent;
use crate::event::KeyEvent;
use crate::event::MouseAction;
use crate::event::MouseEvent;
use crate::render::Color;
use crate::widget::EventCtx;
use crate::widget::PaintCtx;
use crate::widget::Widget;
use crate::widget::WidgetBase;

/// The default capacity of an [`EditText`].
pub const DEFAULT_MAX_LEN: usize = 255;

/// The capacity of an [`EditNumber`]; enough for any `i32` with its sign.
pub const NUMBER_MAX_LEN: usize = 11;

/// Space between a field's frame and its text.
const PAD: i32 = 2;

/// An editable line of ASCII text with a cursor.
///
/// The buffer never grows past its maximum length. Keys the field acts on are
/// claimed; anything else, like the accept key, is left for the container.
#[derive(Clone, Debug)]
pub struct EditText {
  base: WidgetBase,
  text: String,
  pos: usize,
  max_len: usize,
}

impl EditText {
  /// Creates a new field holding `text`, with the cursor at its end.
  ///
  /// Non-ASCII characters are dropped.
  pub fn new(left: i32, top: i32, width: i32, height: i32, text: &str) -> Self {
    let mut base = WidgetBase::new(left, top, width, height);
    base.can_focus = true;
    let mut edit = Self {
      base,
      text: String::new(),
      pos: 0,
      max_len: DEFAULT_MAX_LEN,
    };
    edit.set_text(text);
    edit
  }

  /// Sets the maximum length, truncating the current text to fit.
  pub fn max_len(mut self, max_len: usize) -> Self {
    self.max_len = max_len;
    self.text.truncate(max_len);
    self.pos = self.pos.min(self.text.len());
    self
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn len(&self) -> usize {
    self.text.len()
  }

  pub fn is_empty(&self) -> bool {
    self.text.is_empty()
  }

  pub fn pos(&self) -> usize {
    self.pos
  }

  pub fn capacity(&self) -> usize {
    self.max_len
  }

  /// Replaces the contents and moves the cursor to the end.
  pub fn set_text(&mut self, text: &str) {
    self.text = text.chars().filter(char::is_ascii).take(self.max_len).collect();
    self.pos = self.text.len();
  }

  /// Applies an editing key, keeping the result only if `accept` allows it.
  ///
  /// Returns `None` if the key is not an editing key, and otherwise whether
  /// the text changed.
  pub fn edit(
    &mut self,
    key: &KeyEvent,
    accept: impl Fn(&str) -> bool,
  ) -> Option<bool> {
    if !key.is_down() {
      return None;
    }

    let mut text = self.text.clone();
    let mut pos = self.pos;
    if key.is_printable() {
      if text.len() >= self.max_len {
        trace!(field = ?self.base.id, "field is full");
        return Some(false);
      }
      text.insert(pos, key.ascii as char);
      pos += 1;
    } else {
      match key.make {
        scan::BACKSPACE if pos > 0 => {
          pos -= 1;
          text.remove(pos);
        }
        scan::DELETE if pos < text.len() => {
          text.remove(pos);
        }
        scan::BACKSPACE | scan::DELETE => {}
        scan::LEFT => pos = pos.saturating_sub(1),
        scan::RIGHT => pos = (pos + 1).min(text.len()),
        scan::HOME => pos = 0,
        scan::END => pos = text.len(),
        _ => return None,
      }
    }

    if text == self.text {
      self.pos = pos;
      return Some(false);
    }
    if !accept(&text) {
      trace!(field = ?self.base.id, rejected = %text, "edit rejected");
      return Some(false);
    }
    self.text = text;
    self.pos = pos;
    Some(true)
  }

  /// Returns the index of the first character shown, chosen so that the
  /// cursor stays visible.
  fn scroll(&self, char_width: i32) -> usize {
    let visible = ((self.base.rect.width - 2 * PAD) / char_width.max(1)).max(1);
    self.pos.saturating_sub(visible as usize)
  }

  fn place_cursor(&mut self, m: &MouseEvent, char_width: i32) {
    let char_width = char_width.max(1);
    let dx = m.x - self.base.rect.left - PAD + char_width / 2;
    let col = self.scroll(char_width) as i32 + dx.max(0) / char_width;
    self.pos = (col as usize).min(self.text.len());
  }

  /// Runs one event through the field, with `accept` vetting every change
  /// to the text. Returns whether the text changed.
  fn handle(
    &mut self,
    event: &GEvent,
    ctx: &mut EventCtx,
    accept: impl Fn(&str) -> bool,
  ) -> bool {
    match &event.kind {
      EventKind::Mouse(m) if m.action == MouseAction::Down => {
        if self.contains(m.x, m.y) {
          let char_width = ctx.gui().metrics().char_width;
          self.place_cursor(m, char_width);
          ctx.gui().blink_mut().set_on();
        }
        false
      }
      EventKind::Key(k) => match self.edit(k, accept) {
        Some(changed) => {
          ctx.claim();
          ctx.gui().blink_mut().set_on();
          changed
        }
        None => false,
      },
      _ => false,
    }
  }
}

impl Widget for EditText {
  fn base(&self) -> &WidgetBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut WidgetBase {
    &mut self.base
  }

  fn paint(&self, x: i32, y: i32, has_focus: bool, ctx: &mut PaintCtx) {
    let rect = self.base.rect;
    let (x1, y1) = (x + rect.width, y + rect.height);
    ctx.surface.draw_rect(x, y, x1, y1, Color::WHITE);
    ctx.surface.draw_frame(
      x,
      y,
      x1,
      y1,
      -1,
      Color::LIGHT_GRAY,
      Color::DARK_GRAY,
    );

    let char_width = ctx.metrics.char_width.max(1);
    let line_height = ctx.metrics.line_height;
    let first = self.scroll(char_width);
    let visible = ((rect.width - 2 * PAD) / char_width).max(0) as usize;
    let last = (first + visible).min(self.text.len());
    let text_y = y + (rect.height - line_height) / 2;
    ctx.surface.draw_string(
      x + PAD,
      text_y,
      &self.text[first..last],
      Color::BLACK,
    );

    if has_focus && ctx.blink.is_on() {
      let cx = x + PAD + (self.pos - first) as i32 * char_width;
      ctx
        .surface
        .draw_rect(cx, text_y, cx + 1, text_y + line_height, Color::BLACK);
    }
  }

  fn handle_event(&mut self, event: &GEvent, ctx: &mut EventCtx) {
    self.handle(event, ctx, |_| true);
  }
}

/// An [`EditText`] restricted to integer literals.
///
/// The buffer is always either empty or a decimal `i32`, optionally preceded
/// by `-`; any edit that would make it anything else is refused. `value()`
/// tracks the buffer and is zero while it is empty.
#[derive(Clone, Debug)]
pub struct EditNumber {
  edit: EditText,
  value: i32,
}

impl EditNumber {
  pub fn new(left: i32, top: i32, width: i32, height: i32, value: i32) -> Self {
    Self {
      edit: EditText::new(left, top, width, height, &value.to_string())
        .max_len(NUMBER_MAX_LEN),
      value,
    }
  }

  pub fn value(&self) -> i32 {
    self.value
  }

  pub fn set_value(&mut self, value: i32) {
    self.value = value;
    self.edit.set_text(&value.to_string());
  }

  pub fn edit(&self) -> &EditText {
    &self.edit
  }
}

/// Returns whether `text` may sit in an [`EditNumber`].
fn is_number_text(text: &str) -> bool {
  text.is_empty() || (!text.starts_with('+') && text.parse::<i32>().is_ok())
}

impl Widget for EditNumber {
  fn base(&self) -> &WidgetBase {
    &self.edit.base
  }

  fn base_mut(&mut self) -> &mut WidgetBase {
    &mut self.edit.base
  }

  fn paint(&self, x: i32, y: i32, has_focus: bool, ctx: &mut PaintCtx) {
    self.edit.paint(x, y, has_focus, ctx)
  }

  fn handle_event(&mut self, event: &GEvent, ctx: &mut EventCtx) {
    if self.edit.handle(event, ctx, is_number_text) {
      self.value = self.edit.text.parse().unwrap_or(0);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::testing;
  use crate::testing::ev;
  use crate::testing::DrawCall;

  fn type_into(w: &mut dyn Widget, events: &[GEvent]) -> Vec<bool> {
    let mut gui = testing::gui_with(vec![]);
    events
      .iter()
      .map(|event| {
        let mut ctx = EventCtx::new(&mut gui);
        w.handle_event(event, &mut ctx);
        ctx.is_claimed()
      })
      .collect()
  }

  #[test]
  fn insertion_stops_at_max_len() {
    let mut field = EditText::new(0, 0, 50, 10, "").max_len(5);
    type_into(&mut field, &ev::text("123456"));
    assert_eq!(field.text(), "12345");
    assert_eq!(field.pos(), 5);
  }

  #[test]
  fn initial_text_is_truncated() {
    let field = EditText::new(0, 0, 50, 10, "abcdef").max_len(3);
    assert_eq!(field.text(), "abc");
    assert_eq!(field.pos(), 3);

    let field = EditText::new(0, 0, 50, 10, "a\u{e9}b");
    assert_eq!(field.text(), "ab");
  }

  #[test]
  fn inserts_at_cursor() {
    let mut field = EditText::new(0, 0, 50, 10, "ac");
    type_into(&mut field, &[ev::key(scan::LEFT), ev::char('b')]);
    assert_eq!(field.text(), "abc");
    assert_eq!(field.pos(), 2);
  }

  #[test]
  fn deletion_at_boundaries_is_a_no_op() {
    let mut field = EditText::new(0, 0, 50, 10, "abc");
    type_into(&mut field, &[ev::key(scan::DELETE)]);
    assert_eq!(field.text(), "abc");

    type_into(&mut field, &[ev::key(scan::HOME), ev::key(scan::BACKSPACE)]);
    assert_eq!(field.text(), "abc");
    assert_eq!(field.pos(), 0);

    type_into(&mut field, &[ev::key(scan::DELETE)]);
    assert_eq!(field.text(), "bc");
    type_into(&mut field, &[ev::key(scan::END), ev::key(scan::BACKSPACE)]);
    assert_eq!(field.text(), "b");
    assert_eq!(field.pos(), 1);
  }

  #[test]
  fn cursor_stays_in_bounds() {
    let mut field = EditText::new(0, 0, 50, 10, "ab");
    type_into(&mut field, &[ev::key(scan::RIGHT)]);
    assert_eq!(field.pos(), 2);
    type_into(&mut field, &vec![ev::key(scan::LEFT); 5]);
    assert_eq!(field.pos(), 0);
  }

  #[test]
  fn unhandled_keys_are_not_claimed() {
    let mut field = EditText::new(0, 0, 50, 10, "ab");
    let claimed = type_into(
      &mut field,
      &[ev::char('x'), ev::enter(), ev::tab(), ev::key_up(scan::LEFT)],
    );
    assert_eq!(claimed, vec![true, false, false, false]);
  }

  #[test]
  fn click_places_cursor() {
    let mut field = EditText::new(10, 0, 60, 10, "abcdef");
    let cw = crate::config::Metrics::default().char_width;
    type_into(&mut field, &[ev::down(10 + PAD + 2 * cw + 1, 5)]);
    assert_eq!(field.pos(), 2);

    // Past the text but still inside the field.
    type_into(&mut field, &[ev::down(10 + 58, 5)]);
    assert_eq!(field.pos(), 6);

    // Outside the field, nothing moves.
    type_into(&mut field, &[ev::down(10 + PAD + 1, 5), ev::down(200, 5)]);
    assert_eq!(field.pos(), 0);
  }

  #[test]
  fn cursor_blinks_only_with_focus() {
    let (mut gui, log) = testing::gui_recording(vec![]);
    let field = EditText::new(0, 0, 50, 12, "hi");

    field.paint(0, 0, false, &mut gui.paint_ctx());
    let unfocused = log.borrow().len();
    log.borrow_mut().clear();

    field.paint(0, 0, true, &mut gui.paint_ctx());
    assert_eq!(log.borrow().len(), unfocused + 1);
    assert!(matches!(
      log.borrow().last(),
      Some(DrawCall::Rect { color: Color::BLACK, .. })
    ));
    log.borrow_mut().clear();

    gui.blink_mut().set_off();
    field.paint(0, 0, true, &mut gui.paint_ctx());
    assert_eq!(log.borrow().len(), unfocused);
  }

  #[test]
  fn number_rejects_non_digits() {
    let mut field = EditNumber::new(0, 0, 50, 10, 12);
    type_into(&mut field, &ev::text("3x4"));
    assert_eq!(field.edit().text(), "1234");
    assert_eq!(field.value(), 1234);
  }

  #[test]
  fn number_sign_only_in_front() {
    let mut field = EditNumber::new(0, 0, 50, 10, 0);
    type_into(&mut field, &[ev::key(scan::BACKSPACE)]);
    assert_eq!(field.edit().text(), "");
    assert_eq!(field.value(), 0);

    // A lone sign is not a number.
    type_into(&mut field, &[ev::char('-')]);
    assert_eq!(field.edit().text(), "");

    type_into(&mut field, &[ev::char('7'), ev::key(scan::HOME), ev::char('-')]);
    assert_eq!(field.value(), -7);
    type_into(&mut field, &[ev::key(scan::END), ev::char('-')]);
    assert_eq!(field.edit().text(), "-7");

    // Deleting the digit would leave the sign alone.
    type_into(&mut field, &[ev::key(scan::BACKSPACE)]);
    assert_eq!(field.value(), -7);
  }

  #[test]
  fn number_refuses_overflow() {
    let mut field = EditNumber::new(0, 0, 50, 10, 214748364);
    type_into(&mut field, &[ev::char('8')]);
    assert_eq!(field.value(), 214748364);

    type_into(&mut field, &[ev::char('7')]);
    assert_eq!(field.value(), i32::max_value());
    assert_eq!(field.edit().len(), 10);

    field.set_value(i32::min_value());
    assert_eq!(field.edit().len(), NUMBER_MAX_LEN);
    type_into(&mut field, &[ev::char('1')]);
    assert_eq!(field.value(), i32::min_value());
  }
}
