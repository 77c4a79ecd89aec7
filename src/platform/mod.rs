//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time/ticks (wall clock for live runs, fixed step for headless capture)

pub mod time;

pub use time::{FixedClock, FrameClock, WallClock};
