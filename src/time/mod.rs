pub mod day_night_cycle;

pub use day_night_cycle::{cycle_fraction, phase, DayNightCycle, DayPhase};
