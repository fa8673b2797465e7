//! Ready-made entry dialogs.
//!
//! Each of these builds a throwaway [`Window`] centered on the screen, holding
//! one entry field above an OK and a Cancel button, runs it modally and
//! reports what was entered if the user pressed OK. OK is the default button,
//! so the accept key confirms from within the field.

use tracing::debug;

use crate::button::TextButton;
use crate::config::Metrics;
use crate::edit::EditNumber;
use crate::edit::EditText;
use crate::gui::Gui;
use crate::modal;
use crate::modal::Error;
use crate::modal::ModalResult;
use crate::widget::Widget;
use crate::widget::WidgetId;
use crate::window::Window;

/// Dialog and button widths, in characters.
const DIALOG_COLUMNS: i32 = 30;
const BUTTON_COLUMNS: i32 = 8;

/// Spacing derived from the metrics, so dialogs scale with the font.
#[derive(Copy, Clone, Debug)]
struct Layout {
  width: i32,
  height: i32,
  margin: i32,
  field_height: i32,
  button_width: i32,
  button_height: i32,
}

impl Layout {
  fn new(metrics: &Metrics) -> Self {
    let margin = (metrics.line_height / 2).max(1);
    let field_height = metrics.line_height + 2 * (metrics.line_height / 4);
    let client_h =
      margin + field_height + 2 * margin + metrics.button_height + margin;
    Self {
      width: DIALOG_COLUMNS * metrics.char_width,
      height: 2 * metrics.frame_inset() + metrics.title_height + client_h,
      margin,
      field_height,
      button_width: BUTTON_COLUMNS * metrics.char_width + 2,
      button_height: metrics.button_height,
    }
  }
}

/// Asks for a line of text, starting from `initial`.
///
/// Returns `None` if the dialog was cancelled.
pub fn get_string_box(
  gui: &mut Gui,
  title: &str,
  initial: &str,
) -> Result<Option<String>, Error> {
  let (mut window, field) = entry_dialog(gui, title, |rect| {
    EditText::new(rect.0, rect.1, rect.2, rect.3, initial)
  });

  let result = modal::show_modal(gui, &mut window)?;
  debug!(?result, "string box closed");
  if result != ModalResult::Ok {
    return Ok(None);
  }
  Ok(
    window
      .client()
      .find::<EditText>(field)
      .map(|f| f.text().to_string()),
  )
}

/// Asks for an integer, starting from `n`.
///
/// Returns `default` if the dialog was cancelled.
pub fn get_number_box(
  gui: &mut Gui,
  title: &str,
  n: i32,
  default: i32,
) -> Result<i32, Error> {
  let (mut window, field) = entry_dialog(gui, title, |rect| {
    EditNumber::new(rect.0, rect.1, rect.2, rect.3, n)
  });

  let result = modal::show_modal(gui, &mut window)?;
  debug!(?result, "number box closed");
  if result != ModalResult::Ok {
    return Ok(default);
  }
  Ok(
    window
      .client()
      .find::<EditNumber>(field)
      .map(EditNumber::value)
      .unwrap_or(default),
  )
}

/// Builds an entry dialog around the field `make_field` creates for the
/// rectangle it's handed, returning the window and the field's id.
fn entry_dialog<W: Widget + 'static>(
  gui: &Gui,
  title: &str,
  make_field: impl FnOnce((i32, i32, i32, i32)) -> W,
) -> (Window, WidgetId) {
  let metrics = *gui.metrics();
  let layout = Layout::new(&metrics);
  let (screen_w, screen_h) = gui.screen_size();

  let mut window = Window::with_metrics(
    (screen_w - layout.width) / 2,
    (screen_h - layout.height) / 2,
    layout.width,
    layout.height,
    title,
    &metrics,
  );
  let client_w = window.client().base().rect.width;
  let margin = layout.margin;

  let field = window.insert(make_field((
    margin,
    margin,
    client_w - 2 * margin,
    layout.field_height,
  )));

  let buttons_y = margin + layout.field_height + 2 * margin;
  window.insert(
    TextButton::new(
      client_w / 2 - margin - layout.button_width,
      buttons_y,
      layout.button_width,
      layout.button_height,
      "OK",
      ModalResult::Ok,
    )
    .default_button(true),
  );
  window.insert(TextButton::new(
    client_w / 2 + margin,
    buttons_y,
    layout.button_width,
    layout.button_height,
    "Cancel",
    ModalResult::Cancel,
  ));

  (window, field)
}
