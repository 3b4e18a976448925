//! Persistence contract: an opaque key-value store holding JSON blobs.

pub mod json_backend;
pub mod memory;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::errors::ExpenseResult;
use crate::ledger::{Expense, ExpenseBook, RecurringTemplate};

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;

/// Key under which the expense array is persisted.
pub const EXPENSES_KEY: &str = "expenses";
/// Key under which the recurring template array is persisted.
pub const RECURRING_KEY: &str = "recurringExpenses";

/// Synchronous key-value storage of JSON documents.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored document, or `None` when the key was never written.
    fn load(&self, key: &str) -> ExpenseResult<Option<Value>>;
    /// Replaces the document stored under `key`.
    fn save(&self, key: &str, value: &Value) -> ExpenseResult<()>;
}

/// Reads both record arrays and validates every record.
pub fn load_book(store: &dyn KeyValueStore) -> ExpenseResult<ExpenseBook> {
    let expenses: Vec<Expense> = read_records(store, EXPENSES_KEY)?;
    let templates: Vec<RecurringTemplate> = read_records(store, RECURRING_KEY)?;
    debug!(
        expenses = expenses.len(),
        templates = templates.len(),
        "expense book loaded"
    );
    ExpenseBook::from_records(expenses, templates)
}

/// Writes both record arrays.
pub fn save_book(store: &dyn KeyValueStore, book: &ExpenseBook) -> ExpenseResult<()> {
    store.save(EXPENSES_KEY, &serde_json::to_value(&book.expenses)?)?;
    store.save(RECURRING_KEY, &serde_json::to_value(&book.recurring_expenses)?)?;
    debug!(
        expenses = book.expenses.len(),
        templates = book.recurring_expenses.len(),
        "expense book saved"
    );
    Ok(())
}

/// Writes only the record arrays that differ between `previous` and `next`.
///
/// Every single book mutation touches one array, so its persistence is a single
/// write. When both arrays differ, expenses are written before templates.
/// Returns whether anything was written.
pub fn save_changes(
    store: &dyn KeyValueStore,
    previous: &ExpenseBook,
    next: &ExpenseBook,
) -> ExpenseResult<bool> {
    let expenses_changed = previous.expenses != next.expenses;
    let templates_changed = previous.recurring_expenses != next.recurring_expenses;
    if expenses_changed {
        store.save(EXPENSES_KEY, &serde_json::to_value(&next.expenses)?)?;
    }
    if templates_changed {
        store.save(RECURRING_KEY, &serde_json::to_value(&next.recurring_expenses)?)?;
    }
    debug!(expenses_changed, templates_changed, "expense book changes saved");
    Ok(expenses_changed || templates_changed)
}

fn read_records<T>(store: &dyn KeyValueStore, key: &str) -> ExpenseResult<Vec<T>>
where
    T: DeserializeOwned,
{
    match store.load(key)? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}
