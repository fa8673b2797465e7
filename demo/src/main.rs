//! A terminal playground for `bevel`.
//!
//! Every terminal cell is one pixel. The desktop window opens the entry
//! dialogs, shows a scroll bar, and quits on its Quit button or Ctrl-C.

#![warn(unused)]

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use bevel::config::Metrics;
use bevel::dialogs;
use bevel::modal;
use bevel::render::Bitmap;
use bevel::render::Color;
use bevel::render::MemoryBitmaps;
use bevel::render::ResHandle;
use bevel::EventCtx;
use bevel::GEvent;
use bevel::Gui;
use bevel::ModalResult;
use bevel::PaintCtx;
use bevel::ScrollBar;
use bevel::TextButton;
use bevel::Widget;
use bevel::WidgetBase;
use bevel::Window;

use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::execute;
use crossterm::terminal;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;

use tracing::info;
use tracing::warn;

mod config;
mod input;
mod logging;
mod term;

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
enum Error {
  #[error(transparent)]
  Io(#[from] io::Error),

  #[error(transparent)]
  Term(#[from] crossterm::ErrorKind),

  #[error(transparent)]
  Config(#[from] bevel::config::Error),

  #[error(transparent)]
  Logging(#[from] logging::Error),

  #[error(transparent)]
  Modal(#[from] modal::Error),
}

fn main() -> Result<(), Error> {
  let config = Config::load()?;
  logging::init(&config)?;

  let _raw = RawTerminal::enter()?;
  let surface = term::TermSurface::new(io::stdout())?;
  let input = input::TermInput::spawn(&config);
  let opts = config.options();
  let mut gui = Gui::with_options(input, surface, opts.clone())
    .bitmaps(arrow_bitmaps(&opts.metrics));

  let (width, height) = gui.screen_size();
  let mut desktop = desktop(width, height, &opts.metrics);
  match bevel::show_modal(&mut gui, &mut desktop) {
    Ok(result) => info!(?result, "desktop closed"),
    Err(modal::Error::InputClosed) => info!("input closed"),
    Err(e) => return Err(e.into()),
  }
  Ok(())
}

/// Puts the terminal into raw mode on the alternate screen for as long as it
/// lives.
struct RawTerminal;

impl RawTerminal {
  fn enter() -> Result<Self, Error> {
    terminal::enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Self)
  }
}

impl Drop for RawTerminal {
  fn drop(&mut self) {
    let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
  }
}

#[derive(Clone, Debug, Default)]
struct State {
  name: String,
  number: i32,
  scroll: i32,
}

fn desktop(width: i32, height: i32, metrics: &Metrics) -> Window {
  let state = Rc::new(RefCell::new(State::default()));
  let mut window =
    Window::with_metrics(0, 0, width, height, "bevel demo", metrics);
  let client = window.client().base().rect;
  let row = metrics.button_height + metrics.line_height;
  let button_w = 12 * metrics.char_width;

  window.insert(Status {
    base: WidgetBase::new(2, 1, client.width - 6, 3 * metrics.line_height),
    state: Rc::clone(&state),
  });

  window.insert(TextButton::with_callback(
    2,
    1 + 4 * metrics.line_height,
    button_w,
    metrics.button_height,
    "Name...",
    {
      let state = Rc::clone(&state);
      move |_, ctx| {
        let current = state.borrow().name.clone();
        match dialogs::get_string_box(ctx.gui(), "Your name", &current) {
          Ok(Some(name)) => state.borrow_mut().name = name,
          Ok(None) => {}
          Err(e) => warn!(%e, "name dialog failed"),
        }
      }
    },
  ));

  window.insert(TextButton::with_callback(
    2,
    1 + 4 * metrics.line_height + row,
    button_w,
    metrics.button_height,
    "Number...",
    {
      let state = Rc::clone(&state);
      move |_, ctx| {
        let n = state.borrow().number;
        match dialogs::get_number_box(ctx.gui(), "A number", n, n) {
          Ok(n) => state.borrow_mut().number = n,
          Err(e) => warn!(%e, "number dialog failed"),
        }
      }
    },
  ));

  window.insert(TextButton::new(
    2,
    1 + 4 * metrics.line_height + 2 * row,
    button_w,
    metrics.button_height,
    "Quit",
    ModalResult::Ok,
  ));

  let mut bar = ScrollBar::with_metrics(
    client.width - metrics.scroll_width - 1,
    0,
    client.height,
    0,
    100,
    0,
    metrics,
  )
  .on_change(move |value, _| state.borrow_mut().scroll = value);
  bar.set_value(0, 10);
  window.insert(bar);

  window
}

/// Plain bitmaps for the scroll bar buttons, one per cell.
fn arrow_bitmaps(metrics: &Metrics) -> MemoryBitmaps {
  let (w, h) = (metrics.scroll_width, metrics.scroll_button_height);
  let arrow = Bitmap {
    width: w,
    height: h,
    pixels: vec![Color::LIGHT_GRAY; (w * h).max(0) as usize],
    transparent: None,
  };

  let mut bitmaps = MemoryBitmaps::new();
  bitmaps
    .insert(ResHandle::ARROW_UP, arrow.clone())
    .insert(ResHandle::ARROW_DOWN, arrow);
  bitmaps
}

/// Shows what the dialogs and the scroll bar last produced.
#[derive(Debug)]
struct Status {
  base: WidgetBase,
  state: Rc<RefCell<State>>,
}

impl Widget for Status {
  fn base(&self) -> &WidgetBase {
    &self.base
  }

  fn base_mut(&mut self) -> &mut WidgetBase {
    &mut self.base
  }

  fn paint(&self, x: i32, y: i32, _: bool, ctx: &mut PaintCtx) {
    let state = self.state.borrow();
    let lines = [
      format!("name:   {}", state.name),
      format!("number: {}", state.number),
      format!("scroll: {}", state.scroll),
    ];
    for (i, line) in lines.iter().enumerate() {
      let line_y = y + i as i32 * ctx.metrics.line_height;
      ctx.surface.draw_string(x, line_y, line, Color::BLACK);
    }
  }

  fn handle_event(&mut self, _: &GEvent, _: &mut EventCtx) {}
}
