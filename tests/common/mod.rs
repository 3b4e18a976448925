#![allow(dead_code)]

use chrono::NaiveDate;
use kakeibo_core::ledger::{
    Expense, ExpenseDraft, ExpenseId, MonthKey, RecurringTemplate, TemplateDraft,
};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

pub fn month(year: i32, month: u32) -> MonthKey {
    MonthKey::new(year, month).expect("valid month key")
}

pub fn one_time(id: ExpenseId, amount: u64, on: NaiveDate) -> Expense {
    Expense::new(id, ExpenseDraft::one_time(format!("one-time {id}"), amount, on))
        .expect("valid one-time expense")
}

pub fn installment(id: ExpenseId, amount: u64, first: NaiveDate, end: NaiveDate) -> Expense {
    Expense::new(
        id,
        ExpenseDraft::installment(format!("installment {id}"), amount, first, end),
    )
    .expect("valid installment")
}

pub fn template(id: ExpenseId, amount: u64, first: NaiveDate) -> RecurringTemplate {
    RecurringTemplate::new(id, TemplateDraft::new(format!("recurring {id}"), amount, first))
        .expect("valid recurring template")
}

/// Iterates the first day of each month from `from` through `to`, inclusive.
pub fn each_month(from: MonthKey, to: MonthKey) -> impl Iterator<Item = NaiveDate> {
    from.range_to(to).map(|month| month.first_day())
}
