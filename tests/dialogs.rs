//! End-to-end runs of windows and dialogs against scripted input.

use std::cell::Cell;
use std::rc::Rc;

use bevel::dialogs;
use bevel::event::scan;
use bevel::modal::Error;
use bevel::testing;
use bevel::testing::ev;
use bevel::GEvent;
use bevel::ModalResult;
use bevel::TextButton;
use bevel::Widget;
use bevel::WidgetId;
use bevel::Window;

/// Returns the absolute center of the client widget `id`.
fn center_of(window: &Window, id: WidgetId) -> (i32, i32) {
  let w = window.base().rect;
  let c = window.client().base().rect;
  let b = window.client().child(id).unwrap().rect();
  (
    w.left + c.left + b.left + b.width / 2,
    w.top + c.top + b.top + b.height / 2,
  )
}

fn confirm_window() -> (Window, WidgetId, WidgetId) {
  let mut window = Window::new(20, 20, 200, 100, "Confirm");
  let ok = window.insert(TextButton::new(10, 10, 40, 16, "OK", ModalResult::Ok));
  let cancel = window.insert(TextButton::new(
    60,
    10,
    40,
    16,
    "Cancel",
    ModalResult::Cancel,
  ));
  (window, ok, cancel)
}

fn click(at: (i32, i32)) -> Vec<GEvent> {
  ev::click(at.0, at.1).to_vec()
}

#[test]
fn ok_click_returns_ok() {
  let (mut window, ok, _) = confirm_window();
  let mut gui = testing::gui_with(click(center_of(&window, ok)));
  assert_eq!(
    bevel::show_modal(&mut gui, &mut window).unwrap(),
    ModalResult::Ok
  );
}

#[test]
fn cancel_click_returns_cancel() {
  let (mut window, _, cancel) = confirm_window();
  let mut gui = testing::gui_with(click(center_of(&window, cancel)));
  assert_eq!(
    bevel::show_modal(&mut gui, &mut window).unwrap(),
    ModalResult::Cancel
  );
}

#[test]
fn dragging_off_the_button_cancels_the_click() {
  let (mut window, ok, _) = confirm_window();
  let (x, y) = center_of(&window, ok);
  let mut gui = testing::gui_with(vec![
    ev::down(x, y),
    ev::drag(x + 100, y + 50, 100, 50),
    ev::drag(x, y, -100, -50),
    ev::up(x, y),
  ]);

  // The run only stops because the script runs out.
  assert!(matches!(
    bevel::show_modal(&mut gui, &mut window),
    Err(Error::InputClosed)
  ));
  let dialog = window.as_container().unwrap();
  assert!(!dialog.is_modal());
  assert_eq!(dialog.end_state(), ModalResult::None);
}

#[test]
fn nested_dialog_returns_independently() {
  let inner_result = Rc::new(Cell::new(None));
  let inner_ok_at = Rc::new(Cell::new((0, 0)));

  let mut outer = Window::new(0, 0, 200, 100, "Outer");
  let open = outer.insert(TextButton::with_callback(10, 10, 40, 16, "Open", {
    let inner_result = Rc::clone(&inner_result);
    let inner_ok_at = Rc::clone(&inner_ok_at);
    move |_, ctx| {
      let mut inner = Window::new(100, 80, 120, 60, "Inner");
      let ok = inner.insert(TextButton::new(5, 5, 30, 16, "OK", ModalResult::Ok));
      inner_ok_at.set(center_of(&inner, ok));
      inner_result.set(ctx.show_modal(&mut inner).ok());
    }
  }));
  let done = outer.insert(TextButton::new(60, 10, 40, 16, "Done", ModalResult::Yes));

  // The inner window's OK button sits at (100 + 3 + 5 + 15, 80 + 14 + 5 + 8).
  let inner_ok = (123, 107);
  let mut script = click(center_of(&outer, open));
  script.extend(click(inner_ok));
  // Clicking where the inner OK was must not end the outer run.
  script.extend(click(inner_ok));
  script.extend(click(center_of(&outer, done)));

  let mut gui = testing::gui_with(script);
  let result = bevel::show_modal(&mut gui, &mut outer).unwrap();

  assert_eq!(inner_ok_at.get(), inner_ok);
  assert_eq!(inner_result.get(), Some(ModalResult::Ok));
  assert_eq!(result, ModalResult::Yes);
}

#[test]
fn tab_cycles_window_buttons() {
  let (mut window, _, _) = confirm_window();
  let mut gui = testing::gui_with(vec![
    ev::tab(),
    ev::tab(),
    ev::tab(),
    ev::key(scan::SPACE),
  ]);
  assert_eq!(
    bevel::show_modal(&mut gui, &mut window).unwrap(),
    ModalResult::Cancel
  );

  let (mut window, _, _) = confirm_window();
  let mut gui = testing::gui_with(vec![
    ev::back_tab(),
    ev::back_tab(),
    ev::key(scan::SPACE),
  ]);
  assert_eq!(
    bevel::show_modal(&mut gui, &mut window).unwrap(),
    ModalResult::Ok
  );
}

#[test]
fn title_drag_moves_the_window() {
  let (mut window, ok, _) = confirm_window();
  let title = window.title_bar().base().rect;
  let (tx, ty) = (20 + title.left + 30, 20 + title.top + 2);
  let (x, y) = center_of(&window, ok);

  let mut script = vec![
    ev::down(tx, ty),
    ev::drag(tx + 40, ty + 10, 40, 10),
    ev::drag(tx + 50, ty + 30, 10, 20),
    ev::up(tx + 50, ty + 30),
  ];
  // The old position now misses; the new one hits.
  script.extend(click((x, y)));
  script.extend(click((x + 50, y + 30)));

  let mut gui = testing::gui_with(script);
  assert_eq!(
    bevel::show_modal(&mut gui, &mut window).unwrap(),
    ModalResult::Ok
  );
  assert_eq!(window.base().rect.left, 70);
  assert_eq!(window.base().rect.top, 50);
}

#[test]
fn idle_events_advance_blink() {
  let (mut window, _, _) = confirm_window();
  let mut gui = testing::gui_with(vec![ev::idle(1000), ev::idle(1250)]);
  assert!(bevel::show_modal(&mut gui, &mut window).is_err());
  assert!(!gui.blink().is_on());
}

#[test]
fn string_box_accepts_with_enter() {
  let mut script = ev::text("bc");
  script.push(ev::enter());
  let mut gui = testing::gui_with(script);

  let text = dialogs::get_string_box(&mut gui, "Name", "a").unwrap();
  assert_eq!(text.as_deref(), Some("abc"));
}

#[test]
fn string_box_cancel_gives_nothing() {
  let mut script = ev::text("zzz");
  script.extend(vec![ev::tab(), ev::tab(), ev::key(scan::SPACE)]);
  let mut gui = testing::gui_with(script);

  let text = dialogs::get_string_box(&mut gui, "Name", "a").unwrap();
  assert_eq!(text, None);
}

#[test]
fn number_box_returns_edited_value() {
  let mut script = vec![ev::key(scan::BACKSPACE)];
  script.extend(ev::text("4x2"));
  script.push(ev::enter());
  let mut gui = testing::gui_with(script);

  assert_eq!(dialogs::get_number_box(&mut gui, "Count", 5, 7).unwrap(), 42);
}

#[test]
fn number_box_cancel_gives_default() {
  let mut script = ev::text("99");
  script.extend(vec![ev::tab(), ev::tab(), ev::key(scan::SPACE)]);
  let mut gui = testing::gui_with(script);

  assert_eq!(dialogs::get_number_box(&mut gui, "Count", 5, 7).unwrap(), 7);
}

#[test]
fn number_box_reports_closed_input() {
  let mut gui = testing::gui_with(ev::text("12"));
  assert!(matches!(
    dialogs::get_number_box(&mut gui, "Count", 5, 7),
    Err(Error::InputClosed)
  ));
}

#[test]
fn dialogs_open_from_callbacks() {
  let entered = Rc::new(Cell::new(0));
  let mut window = Window::new(0, 0, 200, 100, "Main");
  let ask = window.insert(TextButton::with_callback(10, 10, 40, 16, "Ask", {
    let entered = Rc::clone(&entered);
    move |_, ctx| {
      if let Ok(n) = dialogs::get_number_box(ctx.gui(), "N", 1, -1) {
        entered.set(n);
        ctx.end_modal(ModalResult::Ok);
      }
    }
  }));

  let mut script = click(center_of(&window, ask));
  script.extend(ev::text("3"));
  script.push(ev::enter());
  let mut gui = testing::gui_with(script);

  assert_eq!(
    bevel::show_modal(&mut gui, &mut window).unwrap(),
    ModalResult::Ok
  );
  assert_eq!(entered.get(), 13);
}
