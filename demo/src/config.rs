//! Demo configuration, read from the user's config directory.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use bevel::config::Error;
use bevel::config::Metrics;
use bevel::config::Options;

use serde::Deserialize;
use serde::Serialize;

/// Everything the demo can be configured with.
///
/// All times are in milliseconds. A `metrics` table that is present but
/// partial takes the toolkit's pixel defaults for what it leaves out, so it
/// should be spelled out in full.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  pub metrics: Metrics,
  /// Milliseconds between cursor blink toggles.
  pub blink_period: u32,
  /// Delay before a held mouse button starts repeating.
  pub repeat_delay: u64,
  /// Interval between repeats once they start.
  pub repeat_interval: u64,
  /// Longest gap between two presses that still counts as a double click.
  pub double_click: u64,
  /// How long to wait for input before emitting an idle event.
  pub poll_interval: u64,
  /// Extra `tracing` filter directives.
  pub log_filter: Option<String>,
  pub log_file: PathBuf,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      metrics: cell_metrics(),
      blink_period: 500,
      repeat_delay: 400,
      repeat_interval: 80,
      double_click: 400,
      poll_interval: 100,
      log_filter: None,
      log_file: PathBuf::from("bevel-demo.log"),
    }
  }
}

/// Metrics for a surface whose pixels are terminal cells.
fn cell_metrics() -> Metrics {
  Metrics {
    scroll_width: 1,
    scroll_button_height: 1,
    min_thumb: 1,
    title_height: 1,
    char_width: 1,
    line_height: 1,
    button_height: 1,
    window_frame: [1, 0, 0],
  }
}

impl Config {
  /// Loads the config from `<config dir>/bevel/config.json`, falling back to
  /// the defaults if there is no such file.
  pub fn load() -> Result<Self, Error> {
    match default_path() {
      Some(path) if path.exists() => Self::from_path(path),
      _ => Ok(Self::default()),
    }
  }

  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
  }

  /// Returns the options to build the [`bevel::Gui`] with.
  pub fn options(&self) -> Options {
    Options {
      metrics: self.metrics,
      blink_period: self.blink_period,
    }
  }

  pub fn repeat_delay(&self) -> Duration {
    Duration::from_millis(self.repeat_delay)
  }

  pub fn repeat_interval(&self) -> Duration {
    Duration::from_millis(self.repeat_interval)
  }

  pub fn double_click(&self) -> Duration {
    Duration::from_millis(self.double_click)
  }

  pub fn poll_interval(&self) -> Duration {
    Duration::from_millis(self.poll_interval)
  }
}

fn default_path() -> Option<PathBuf> {
  let mut path = dirs::config_dir()?;
  path.push("bevel");
  path.push("config.json");
  Some(path)
}
