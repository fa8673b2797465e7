//! Cursor blink phase.

/// A blink phase advanced by an external tick source.
///
/// Widgets only ever read the phase while painting; the driver owning the
/// clock advances it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlinkClock {
  period: u32,
  elapsed: u32,
  on: bool,
}

impl BlinkClock {
  /// Creates a clock that toggles every `period` ticks, starting in the "on"
  /// phase. A zero period never toggles.
  pub fn new(period: u32) -> Self {
    Self {
      period,
      elapsed: 0,
      on: true,
    }
  }

  pub fn set_on(&mut self) {
    self.on = true;
    self.elapsed = 0;
  }

  pub fn set_off(&mut self) {
    self.on = false;
    self.elapsed = 0;
  }

  pub fn is_on(&self) -> bool {
    self.on
  }

  /// Advances the clock by `ticks`, toggling once per elapsed period.
  pub fn update(&mut self, ticks: u32) {
    if self.period == 0 {
      return;
    }

    self.elapsed = self.elapsed.saturating_add(ticks);
    let flips = self.elapsed / self.period;
    self.elapsed %= self.period;
    if flips % 2 == 1 {
      self.on = !self.on;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn toggles_once_per_period() {
    let mut clock = BlinkClock::new(10);
    assert!(clock.is_on());
    clock.update(9);
    assert!(clock.is_on());
    clock.update(1);
    assert!(!clock.is_on());
    clock.update(25);
    // 25 ticks is two whole periods plus a remainder.
    assert!(!clock.is_on());
    clock.update(5);
    assert!(clock.is_on());
  }

  #[test]
  fn zero_period_is_steady() {
    let mut clock = BlinkClock::new(0);
    clock.update(1000);
    assert!(clock.is_on());
    clock.set_off();
    clock.update(1000);
    assert!(!clock.is_on());
  }
}
