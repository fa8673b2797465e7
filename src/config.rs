//! Toolkit configuration.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

/// A configuration loading error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
  #[error(transparent)]
  Io(#[from] io::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),
}

/// Pixel metrics used when the toolkit itself has to pick a size.
///
/// Creators assign every widget's geometry; these only cover the parts of a
/// composite widget that the creator does not spell out, like the height of a
/// window's title strip or a scroll bar's button size.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
  pub scroll_width: i32,
  pub scroll_button_height: i32,
  pub min_thumb: i32,
  pub title_height: i32,
  pub char_width: i32,
  pub line_height: i32,
  pub button_height: i32,
  /// Outer bevel, inner bevel and content inset of a window's frame. Negative
  /// bevel sizes are drawn sunken.
  pub window_frame: [i32; 3],
}

impl Default for Metrics {
  fn default() -> Self {
    Self {
      scroll_width: 11,
      scroll_button_height: 10,
      min_thumb: 4,
      title_height: 11,
      char_width: 6,
      line_height: 8,
      button_height: 16,
      window_frame: [1, 1, 1],
    }
  }
}

impl Metrics {
  /// Returns the total border width of a window frame.
  pub fn frame_inset(&self) -> i32 {
    let [outer, inner, inset] = self.window_frame;
    outer.abs() + inner.abs() + inset.max(0)
  }
}

/// Options for constructing a [`Gui`][crate::Gui].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
  pub metrics: Metrics,
  /// Ticks between cursor blink toggles, in the unit the input source stamps
  /// events with.
  pub blink_period: u32,
}

impl Default for Options {
  fn default() -> Self {
    Self {
      metrics: Metrics::default(),
      blink_period: 250,
    }
  }
}

impl Options {
  /// Parses options from JSON. Missing fields take their defaults.
  pub fn from_json(json: &str) -> Result<Self, Error> {
    Ok(serde_json::from_str(json)?)
  }

  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
    let text = fs::read_to_string(path)?;
    Self::from_json(&text)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_json_keeps_defaults() {
    let opts =
      Options::from_json(r#"{ "metrics": { "scroll_width": 1 } }"#).unwrap();
    assert_eq!(opts.metrics.scroll_width, 1);
    assert_eq!(opts.metrics.scroll_button_height, 10);
    assert_eq!(opts.blink_period, 250);
  }

  #[test]
  fn bad_json_is_an_error() {
    assert!(matches!(Options::from_json("{"), Err(Error::Json(_))));
  }

  #[test]
  fn frame_inset_ignores_bevel_direction() {
    let m = Metrics {
      window_frame: [2, -1, 3],
      ..Metrics::default()
    };
    assert_eq!(m.frame_inset(), 6);
  }
}
