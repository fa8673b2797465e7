//! Logging to a file, since the terminal belongs to the UI.

use std::env;
use std::fs::File;
use std::io;
use std::panic;
use std::sync::Arc;

use backtrace::Backtrace;

use tracing::error;
use tracing::info;
use tracing::subscriber::SetGlobalDefaultError;
use tracing::trace;

use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::uptime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::config::Config;

/// Our crates are debug, everything else is warn.
const DEFAULT_FILTER: &str = "warn,bevel=debug,bevel_demo=debug";

#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
  #[error("could not create log file: {0}")]
  File(#[from] io::Error),

  #[error(transparent)]
  Install(#[from] SetGlobalDefaultError),
}

/// Installs a `tracing` subscriber writing to the configured log file and
/// routes panics through it.
///
/// Filters are layered: the defaults, then the config's `log_filter`, then
/// `RUST_LOG`.
pub fn init(config: &Config) -> Result<(), Error> {
  let log_file = File::create(&config.log_file)?;
  let file_log = fmt::layer()
    .with_ansi(false)
    .with_timer(uptime())
    .with_line_number(true)
    .with_writer(Arc::new(log_file));

  let mut filter = DEFAULT_FILTER.to_owned();
  for extra in config
    .log_filter
    .iter()
    .cloned()
    .chain(env::var(EnvFilter::DEFAULT_ENV).ok())
  {
    filter.push(',');
    filter.push_str(&extra);
  }

  let subscriber = Registry::default()
    .with(EnvFilter::new(filter))
    .with(file_log);
  tracing::subscriber::set_global_default(subscriber)?;
  info!(file = ?config.log_file, "starting demo");

  panic::set_hook(Box::new(|info| {
    error!("{}", info);
    if env::var("RUST_BACKTRACE").map(|val| val == "1").unwrap_or(true) {
      error!("{:?}", Backtrace::new());
    }
  }));
  trace!("installed custom panic hook");
  Ok(())
}
