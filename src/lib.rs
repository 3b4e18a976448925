#![doc(test(attr(deny(warnings))))]

//! Kakeibo Core is the projection and aggregation engine behind a household
//! expense tracker: one-off charges, fixed-term installments, and open-ended
//! recurring charges projected across calendar months.

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use errors::{ExpenseError, ExpenseResult};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Kakeibo Core tracing initialized.");
    });
}
