//! Refresh-cycle orchestration, clocks, and filesystem locations.

pub mod time;
pub mod tracker;
pub mod utils;

pub use time::{Clock, FixedClock, SystemClock};
pub use tracker::{ExpenseTracker, RefreshReport};
