//! Refresh-cycle facade coordinating the store, the clock and the engine.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::{ConfigManager, TrackerConfig};
use crate::core::time::{Clock, SystemClock};
use crate::errors::ExpenseResult;
use crate::ledger::{
    Expense, ExpenseBook, ExpenseBucket, ExpenseDraft, ExpenseId, MonthBucket, MonthKey,
    RecurringTemplate, TemplateDraft,
};
use crate::storage::{load_book, save_changes, JsonFileStore, KeyValueStore};

/// Outcome of one refresh cycle.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub today: NaiveDate,
    /// Installments removed because nothing was left to charge.
    pub pruned: Vec<Expense>,
    /// Whether the store was rewritten during the cycle.
    pub saved: bool,
}

/// Owns the current [`ExpenseBook`] and keeps it in sync with a [`KeyValueStore`].
///
/// Every mutation is applied to a copy of the book, persisted, and only then made
/// current, so a failed write leaves the in-memory state untouched.
pub struct ExpenseTracker {
    storage: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    config: TrackerConfig,
    book: ExpenseBook,
}

impl ExpenseTracker {
    /// Creates a tracker and performs the initial read of the store.
    pub fn new(
        storage: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
        config: TrackerConfig,
    ) -> ExpenseResult<Self> {
        config.validate()?;
        let book = load_book(storage.as_ref())?;
        Ok(Self {
            storage,
            clock,
            config,
            book,
        })
    }

    /// Tracker over the file store described by the on-disk configuration.
    pub fn open_default() -> ExpenseResult<Self> {
        let config = ConfigManager::new().load()?;
        let storage = JsonFileStore::new(config.resolved_data_dir())?;
        info!(root = %storage.root().display(), "opening expense store");
        Self::new(Box::new(storage), Box::new(SystemClock), config)
    }

    pub fn book(&self) -> &ExpenseBook {
        &self.book
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Runs a refresh cycle for the clock's current date.
    pub fn refresh(&mut self) -> ExpenseResult<RefreshReport> {
        let today = self.clock.today();
        self.refresh_on(today)
    }

    /// Reads the store, prunes finished installments, and writes back the expense
    /// array only when something was pruned.
    pub fn refresh_on(&mut self, today: NaiveDate) -> ExpenseResult<RefreshReport> {
        let loaded = load_book(self.storage.as_ref())?;
        let mut book = loaded.clone();
        let pruned = book.prune_expired(today);
        let saved = save_changes(self.storage.as_ref(), &loaded, &book)?;
        debug!(%today, pruned = pruned.len(), saved, "refresh cycle complete");
        self.book = book;
        Ok(RefreshReport {
            today,
            pruned,
            saved,
        })
    }

    /// By-month buckets of the current book.
    pub fn month_view(&self, today: NaiveDate) -> Vec<MonthBucket<'_>> {
        self.book.group_by_month(today, self.config.projection())
    }

    /// Per-installment timelines of the current book.
    pub fn installment_view(&self, today: NaiveDate) -> Vec<ExpenseBucket<'_>> {
        self.book.group_by_expense(today)
    }

    pub fn add_expense(&mut self, draft: ExpenseDraft) -> ExpenseResult<ExpenseId> {
        let now = self.clock.now();
        self.commit(|book| book.add_expense(draft, now))
    }

    pub fn update_expense(&mut self, id: ExpenseId, draft: ExpenseDraft) -> ExpenseResult<()> {
        self.commit(|book| book.update_expense(id, draft))
    }

    pub fn hide_month(&mut self, id: ExpenseId, month: MonthKey) -> ExpenseResult<bool> {
        self.commit(|book| book.hide_month(id, month))
    }

    pub fn remove_expense(&mut self, id: ExpenseId) -> ExpenseResult<Expense> {
        self.commit(|book| book.remove_expense(id))
    }

    pub fn add_template(&mut self, draft: TemplateDraft) -> ExpenseResult<ExpenseId> {
        let now = self.clock.now();
        self.commit(|book| book.add_template(draft, now))
    }

    pub fn update_template(&mut self, id: ExpenseId, draft: TemplateDraft) -> ExpenseResult<()> {
        self.commit(|book| book.update_template(id, draft))
    }

    pub fn set_adjustment(
        &mut self,
        id: ExpenseId,
        month: MonthKey,
        amount: u64,
    ) -> ExpenseResult<Option<u64>> {
        self.commit(|book| book.set_adjustment(id, month, amount))
    }

    pub fn clear_adjustment(&mut self, id: ExpenseId, month: MonthKey) -> ExpenseResult<bool> {
        self.commit(|book| book.clear_adjustment(id, month))
    }

    pub fn remove_template(&mut self, id: ExpenseId) -> ExpenseResult<RecurringTemplate> {
        self.commit(|book| book.remove_template(id))
    }

    pub fn materialize_template(
        &mut self,
        template_id: ExpenseId,
        month: MonthKey,
        amount: Option<u64>,
    ) -> ExpenseResult<ExpenseId> {
        self.commit(|book| book.materialize_template(template_id, month, amount))
    }

    fn commit<T, F>(&mut self, mutator: F) -> ExpenseResult<T>
    where
        F: FnOnce(&mut ExpenseBook) -> ExpenseResult<T>,
    {
        let mut next = self.book.clone();
        let outcome = mutator(&mut next)?;
        save_changes(self.storage.as_ref(), &self.book, &next)?;
        self.book = next;
        Ok(outcome)
    }
}
