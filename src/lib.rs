//! `bevel` is a small retained-mode widget toolkit.
//!
//! A UI is a tree of [`Widget`]s rooted in a [`Container`]. Containers route
//! mouse events to the topmost child under the pointer (and keep routing to it
//! until the button is released), keyboard events to the focused child, and
//! messages to every child. Any container can be run as a modal dialog with
//! [`show_modal()`], which pumps events into it until a widget inside ends the
//! run with a [`ModalResult`].
//!
//! The toolkit never talks to a device. Drawing goes through a
//! [`render::Surface`], bitmaps come from a [`render::BitmapStore`], and
//! events come from a [`modal::InputSource`]; a [`Gui`] bundles the three
//! together with the cursor [`blink::BlinkClock`].

#![warn(unused)]

pub mod blink;
pub mod button;
pub mod config;
pub mod container;
pub mod dialogs;
pub mod edit;
pub mod event;
pub mod gui;
pub mod modal;
pub mod render;
pub mod scroll;
pub mod testing;
pub mod widget;
pub mod window;

pub use button::BitButton;
pub use button::Button;
pub use button::TextButton;
pub use container::Container;
pub use edit::EditNumber;
pub use edit::EditText;
pub use event::GEvent;
pub use gui::Gui;
pub use modal::dispatch;
pub use modal::show_modal;
pub use modal::ModalResult;
pub use scroll::ScrollBar;
pub use widget::EventCtx;
pub use widget::PaintCtx;
pub use widget::Widget;
pub use widget::WidgetBase;
pub use widget::WidgetId;
pub use window::Panel;
pub use window::TitleBar;
pub use window::Window;
