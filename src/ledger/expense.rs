//! Domain model for one-time and fixed-term installment expenses.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{ExpenseError, ExpenseResult};
use crate::ledger::month::MonthKey;

/// Largest accepted charge amount. Keeps every derived total well inside `u64`.
pub const MAX_AMOUNT: u64 = 1_000_000_000_000;

/// Integer identity shared by expenses and recurring templates (creation time in ms).
pub type ExpenseId = i64;

/// User-editable fields of an expense, as captured by an input form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub name: String,
    pub amount: u64,
    pub first_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl ExpenseDraft {
    pub fn one_time(name: impl Into<String>, amount: u64, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            amount,
            first_date: date,
            end_date: None,
        }
    }

    pub fn installment(
        name: impl Into<String>,
        amount: u64,
        first_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
            first_date,
            end_date: Some(end_date),
        }
    }

    pub fn validate(&self) -> ExpenseResult<()> {
        validate_fields(&self.name, self.amount, self.first_date, self.end_date)
    }
}

/// How an expense is charged across months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExpenseKind {
    OneTime,
    Installment,
}

impl fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExpenseKind::OneTime => "One-time",
            ExpenseKind::Installment => "Installment",
        };
        f.write_str(label)
    }
}

/// Persisted expense record. An absent `end_date`, or one equal to `first_date`,
/// marks a one-time charge; otherwise the amount is charged once per month from
/// `first_date` through `end_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub name: String,
    pub amount: u64,
    pub first_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub hidden_months: BTreeSet<MonthKey>,
}

impl Expense {
    /// Builds a validated expense with no hidden months.
    pub fn new(id: ExpenseId, draft: ExpenseDraft) -> ExpenseResult<Self> {
        draft.validate()?;
        Ok(Self {
            id,
            name: draft.name.trim().to_string(),
            amount: draft.amount,
            first_date: draft.first_date,
            end_date: draft.end_date,
            hidden_months: BTreeSet::new(),
        })
    }

    /// Replaces the editable fields, keeping identity and hidden months.
    pub fn apply(&mut self, draft: ExpenseDraft) -> ExpenseResult<()> {
        draft.validate()?;
        self.name = draft.name.trim().to_string();
        self.amount = draft.amount;
        self.first_date = draft.first_date;
        self.end_date = draft.end_date;
        Ok(())
    }

    pub fn validate(&self) -> ExpenseResult<()> {
        validate_fields(&self.name, self.amount, self.first_date, self.end_date)
            .map_err(|err| match err {
                ExpenseError::InvalidRecord(reason) => {
                    ExpenseError::InvalidRecord(format!("expense {}: {}", self.id, reason))
                }
                other => other,
            })
    }

    pub fn is_installment(&self) -> bool {
        matches!(self.end_date, Some(end) if end != self.first_date)
    }

    pub fn kind(&self) -> ExpenseKind {
        if self.is_installment() {
            ExpenseKind::Installment
        } else {
            ExpenseKind::OneTime
        }
    }

    pub fn first_month(&self) -> MonthKey {
        MonthKey::of(self.first_date)
    }

    /// Month of `end_date`, or of `first_date` for a one-time expense.
    pub fn last_month(&self) -> MonthKey {
        MonthKey::of(self.end_date.unwrap_or(self.first_date))
    }

    /// Whether `month` falls inside the charge range, hidden or not.
    pub fn spans(&self, month: MonthKey) -> bool {
        self.first_month() <= month && month <= self.last_month()
    }

    pub fn is_hidden(&self, month: MonthKey) -> bool {
        self.hidden_months.contains(&month)
    }

    /// Suppresses a single month. Returns `false` if it was already hidden.
    pub fn hide_month(&mut self, month: MonthKey) -> bool {
        self.hidden_months.insert(month)
    }

    /// Day of month the charge is billed on.
    pub fn billing_day(&self) -> u32 {
        self.first_date.day()
    }
}

fn validate_fields(
    name: &str,
    amount: u64,
    first_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> ExpenseResult<()> {
    if name.trim().is_empty() {
        return Err(ExpenseError::InvalidRecord("name must not be empty".into()));
    }
    if amount == 0 {
        return Err(ExpenseError::InvalidRecord("amount must be positive".into()));
    }
    if amount > MAX_AMOUNT {
        return Err(ExpenseError::InvalidRecord(format!(
            "amount {amount} exceeds the maximum of {MAX_AMOUNT}"
        )));
    }
    if let Some(end) = end_date {
        if end < first_date {
            return Err(ExpenseError::InvalidRecord(format!(
                "end date {end} is before first date {first_date}"
            )));
        }
    }
    Ok(())
}

pub(crate) fn validate_template_fields(
    name: &str,
    amount: u64,
    first_date: NaiveDate,
) -> ExpenseResult<()> {
    validate_fields(name, amount, first_date, None)
}
