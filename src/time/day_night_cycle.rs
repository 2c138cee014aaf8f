use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::constants::time::{DEFAULT_DAY_LENGTH, WAKE_FRACTION};

/// Half of the day/night cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPhase {
    Day,
    Night,
}

/// Fraction of the current cycle that has elapsed, in `[0, 1)`
pub fn cycle_fraction(elapsed: f64, day_length: f64) -> f64 {
    if day_length <= 0.0 || !elapsed.is_finite() {
        return 0.0;
    }
    elapsed.rem_euclid(day_length) / day_length
}

/// Phase of day for `elapsed` seconds of game time. The first half of every
/// cycle is day, the second half night.
pub fn phase(elapsed: f64, day_length: f64) -> DayPhase {
    if cycle_fraction(elapsed, day_length) < 0.5 {
        DayPhase::Day
    } else {
        DayPhase::Night
    }
}

/// Game clock. Holds only the elapsed time; everything else is derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayNightCycle {
    elapsed: f64,
    day_length: f64,
}

impl DayNightCycle {
    pub fn new(day_length: f64) -> Self {
        Self::starting_at(0.0, day_length)
    }

    /// Restart the clock from a saved elapsed time
    pub fn starting_at(elapsed: f64, day_length: f64) -> Self {
        let day_length = if day_length > 0.0 { day_length } else { DEFAULT_DAY_LENGTH };
        Self {
            elapsed: elapsed.max(0.0),
            day_length,
        }
    }

    pub fn advance(&mut self, dt: f64) {
        if dt > 0.0 {
            self.elapsed += dt;
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn day_length(&self) -> f64 {
        self.day_length
    }

    pub fn phase(&self) -> DayPhase {
        phase(self.elapsed, self.day_length)
    }

    pub fn cycle_fraction(&self) -> f64 {
        cycle_fraction(self.elapsed, self.day_length)
    }

    /// Number of completed cycles
    pub fn day_count(&self) -> u64 {
        (self.elapsed / self.day_length).floor() as u64
    }

    /// Ambient brightness: peaks at midday, flat at night
    pub fn sun_brightness(&self) -> f32 {
        let fraction = self.cycle_fraction();
        match phase(self.elapsed, self.day_length) {
            DayPhase::Day => (0.8 + (fraction * 2.0 * PI).sin() * 0.2) as f32,
            DayPhase::Night => 0.3,
        }
    }

    /// Sleep through to shortly after the next sunrise
    pub fn skip_to_morning(&mut self) {
        let next_day = (self.day_count() + 1) as f64 * self.day_length;
        self.elapsed = next_day + WAKE_FRACTION * self.day_length;
        log::info!("[Time] Slept until day {}", self.day_count());
    }
}

impl Default for DayNightCycle {
    fn default() -> Self {
        Self::new(DEFAULT_DAY_LENGTH)
    }
}
