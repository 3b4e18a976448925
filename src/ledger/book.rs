//! The owned record store: every expense and recurring template of a household.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ExpenseError, ExpenseResult};
use crate::ledger::expense::{Expense, ExpenseDraft, ExpenseId};
use crate::ledger::grouping::{
    group_by_expense, group_by_month, ExpenseBucket, MonthBucket, ProjectionSettings,
};
use crate::ledger::lifecycle::prune_expired;
use crate::ledger::month::MonthKey;
use crate::ledger::recurring::{validate_adjustment, RecurringTemplate, TemplateDraft};

/// Expenses and recurring templates, read and written as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseBook {
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub recurring_expenses: Vec<RecurringTemplate>,
}

impl ExpenseBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from loaded records, rejecting any malformed entry.
    pub fn from_records(
        expenses: Vec<Expense>,
        recurring_expenses: Vec<RecurringTemplate>,
    ) -> ExpenseResult<Self> {
        let book = Self {
            expenses,
            recurring_expenses,
        };
        book.validate()?;
        Ok(book)
    }

    pub fn validate(&self) -> ExpenseResult<()> {
        self.expenses.iter().try_for_each(Expense::validate)?;
        self.recurring_expenses
            .iter()
            .try_for_each(RecurringTemplate::validate)
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.recurring_expenses.is_empty()
    }

    /// Creation-time identity in milliseconds, bumped past every id already in use
    /// so ids stay unique and increasing.
    pub fn allocate_id(&self, now: DateTime<Utc>) -> ExpenseId {
        let highest = self
            .expenses
            .iter()
            .map(|expense| expense.id)
            .chain(self.recurring_expenses.iter().map(|template| template.id))
            .max();
        let stamp = now.timestamp_millis();
        match highest {
            Some(highest) if highest >= stamp => highest + 1,
            _ => stamp,
        }
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub fn expense_mut(&mut self, id: ExpenseId) -> Option<&mut Expense> {
        self.expenses.iter_mut().find(|expense| expense.id == id)
    }

    pub fn template(&self, id: ExpenseId) -> Option<&RecurringTemplate> {
        self.recurring_expenses
            .iter()
            .find(|template| template.id == id)
    }

    pub fn template_mut(&mut self, id: ExpenseId) -> Option<&mut RecurringTemplate> {
        self.recurring_expenses
            .iter_mut()
            .find(|template| template.id == id)
    }

    /// Concrete expenses materialized from the template `template_id`.
    pub fn linked_expenses(&self, template_id: ExpenseId) -> Vec<&Expense> {
        self.expenses
            .iter()
            .filter(|expense| expense.id == template_id)
            .collect()
    }

    pub fn add_expense(
        &mut self,
        draft: ExpenseDraft,
        now: DateTime<Utc>,
    ) -> ExpenseResult<ExpenseId> {
        let id = self.allocate_id(now);
        let expense = Expense::new(id, draft)?;
        debug!(id, name = %expense.name, kind = %expense.kind(), "expense added");
        self.expenses.push(expense);
        Ok(id)
    }

    /// Inserts a concrete record for an existing template, sharing its id so the
    /// record takes precedence over the template's projection. A month that already
    /// has a linked record is rejected.
    pub fn materialize_template(
        &mut self,
        template_id: ExpenseId,
        month: MonthKey,
        amount: Option<u64>,
    ) -> ExpenseResult<ExpenseId> {
        let template = self
            .template(template_id)
            .ok_or(ExpenseError::TemplateNotFound(template_id))?;
        if self
            .linked_expenses(template_id)
            .iter()
            .any(|expense| expense.spans(month))
        {
            return Err(ExpenseError::InvalidRecord(format!(
                "template {template_id} already has a record for {month}"
            )));
        }
        let first_date = billing_date_in(month, template.first_date);
        let draft = ExpenseDraft::one_time(
            template.name.clone(),
            amount.unwrap_or_else(|| template.amount_for(month)),
            first_date,
        );
        let expense = Expense::new(template_id, draft)?;
        debug!(id = template_id, month = %month, "template materialized");
        self.expenses.push(expense);
        Ok(template_id)
    }

    /// Replaces the editable fields of an expense; hidden months are kept.
    pub fn update_expense(&mut self, id: ExpenseId, draft: ExpenseDraft) -> ExpenseResult<()> {
        let expense = self.expense_mut(id).ok_or(ExpenseError::ExpenseNotFound(id))?;
        expense.apply(draft)?;
        debug!(id, "expense updated");
        Ok(())
    }

    /// Suppresses one month of an expense ("delete this month only").
    pub fn hide_month(&mut self, id: ExpenseId, month: MonthKey) -> ExpenseResult<bool> {
        let expense = self.expense_mut(id).ok_or(ExpenseError::ExpenseNotFound(id))?;
        let added = expense.hide_month(month);
        debug!(id, month = %month, added, "expense month hidden");
        Ok(added)
    }

    /// Removes an expense entirely, returning the removed record.
    pub fn remove_expense(&mut self, id: ExpenseId) -> ExpenseResult<Expense> {
        let index = self
            .expenses
            .iter()
            .position(|expense| expense.id == id)
            .ok_or(ExpenseError::ExpenseNotFound(id))?;
        debug!(id, "expense removed");
        Ok(self.expenses.remove(index))
    }

    pub fn add_template(
        &mut self,
        draft: TemplateDraft,
        now: DateTime<Utc>,
    ) -> ExpenseResult<ExpenseId> {
        let id = self.allocate_id(now);
        let template = RecurringTemplate::new(id, draft)?;
        debug!(id, name = %template.name, "recurring template added");
        self.recurring_expenses.push(template);
        Ok(id)
    }

    /// Replaces the editable fields of a template; adjustments are kept.
    pub fn update_template(&mut self, id: ExpenseId, draft: TemplateDraft) -> ExpenseResult<()> {
        let template = self.template_mut(id).ok_or(ExpenseError::TemplateNotFound(id))?;
        template.apply(draft)?;
        debug!(id, "recurring template updated");
        Ok(())
    }

    /// Overrides the template amount for a single month. Zero skips that month's
    /// charge while keeping the row visible.
    pub fn set_adjustment(
        &mut self,
        id: ExpenseId,
        month: MonthKey,
        amount: u64,
    ) -> ExpenseResult<Option<u64>> {
        validate_adjustment(month, amount)?;
        let template = self.template_mut(id).ok_or(ExpenseError::TemplateNotFound(id))?;
        let previous = template.monthly_adjustments.insert(month, amount);
        debug!(id, month = %month, amount, "monthly adjustment set");
        Ok(previous)
    }

    pub fn clear_adjustment(&mut self, id: ExpenseId, month: MonthKey) -> ExpenseResult<bool> {
        let template = self.template_mut(id).ok_or(ExpenseError::TemplateNotFound(id))?;
        Ok(template.monthly_adjustments.remove(&month).is_some())
    }

    pub fn remove_template(&mut self, id: ExpenseId) -> ExpenseResult<RecurringTemplate> {
        let index = self
            .recurring_expenses
            .iter()
            .position(|template| template.id == id)
            .ok_or(ExpenseError::TemplateNotFound(id))?;
        debug!(id, "recurring template removed");
        Ok(self.recurring_expenses.remove(index))
    }

    /// Runs the lifecycle pruner over the stored expenses.
    pub fn prune_expired(&mut self, today: NaiveDate) -> Vec<Expense> {
        prune_expired(&mut self.expenses, today)
    }

    pub fn group_by_month(
        &self,
        today: NaiveDate,
        settings: ProjectionSettings,
    ) -> Vec<MonthBucket<'_>> {
        group_by_month(&self.expenses, &self.recurring_expenses, today, settings)
    }

    pub fn group_by_expense(&self, today: NaiveDate) -> Vec<ExpenseBucket<'_>> {
        group_by_expense(&self.expenses, today)
    }
}

/// The template's billing day placed in `month`, clamped to the month's last day.
fn billing_date_in(month: MonthKey, anchor: NaiveDate) -> NaiveDate {
    let first = month.first_day();
    let last = month.next().first_day().pred_opt().unwrap_or(first);
    first.with_day(anchor.day().min(last.day())).unwrap_or(first)
}
