use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use super::KeyValueStore;
use crate::errors::{ExpenseError, ExpenseResult};

/// In-process store, used by tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ExpenseResult<std::sync::MutexGuard<'_, HashMap<String, Value>>> {
        self.entries
            .lock()
            .map_err(|_| ExpenseError::Storage("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> ExpenseResult<Option<Value>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> ExpenseResult<()> {
        self.lock()?.insert(key.to_string(), value.clone());
        Ok(())
    }
}
