//! Active-month enumeration and remaining-count arithmetic for expenses.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::ledger::expense::Expense;
use crate::ledger::month::MonthKey;

/// Months in which `expense` is charged, oldest first, skipping hidden months.
///
/// One-time expenses yield exactly the month of `first_date`.
pub fn active_months(expense: &Expense) -> Vec<MonthKey> {
    expense
        .first_month()
        .range_to(expense.last_month())
        .filter(|month| !expense.is_hidden(*month))
        .collect()
}

/// Charges still outstanding as of `today`, counting the current month.
///
/// Months before `today` never count, hidden months inside the counted range are
/// subtracted, and an expense that ended in the past yields zero.
pub fn remaining_count(expense: &Expense, today: NaiveDate) -> u32 {
    let first = expense.first_month().max(MonthKey::of(today));
    let last = expense.last_month();
    let span = first.months_through(last);
    if span == 0 {
        return 0;
    }
    let hidden = expense.hidden_months.range(first..=last).count() as u32;
    span.saturating_sub(hidden)
}

/// Outstanding total shown for an installment: `amount * remaining_count`.
pub fn remaining_total(expense: &Expense, today: NaiveDate) -> u64 {
    expense
        .amount
        .saturating_mul(u64::from(remaining_count(expense, today)))
}

/// Registered start and end months of an installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InstallmentPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl InstallmentPeriod {
    pub fn of(expense: &Expense) -> Self {
        Self {
            start: expense.first_date,
            end: expense.end_date.unwrap_or(expense.first_date),
        }
    }

    /// Number of monthly charges in the full registered period.
    pub fn months(&self) -> u32 {
        MonthKey::of(self.start).months_through(MonthKey::of(self.end))
    }

    /// Human-readable range such as `2024/1 〜 2024/3`.
    pub fn label(&self) -> String {
        format!(
            "{}/{} 〜 {}/{}",
            self.start.year(),
            self.start.month(),
            self.end.year(),
            self.end.month()
        )
    }
}
