//! The explicit game context: one session object owns the world, player,
//! projectiles, clock and save slots, and runs the fixed tick order.

pub mod command;
pub mod session;

pub use command::{CommandOutcome, GameCommand};
pub use session::{BreakOutcome, GameSession, TickReport};
