//! Removal of installments that have no charges left.

use chrono::NaiveDate;
use tracing::info;

use crate::ledger::expense::Expense;
use crate::ledger::installment::remaining_count;

/// Whether `expense` is an installment with nothing left to charge as of `today`.
pub fn is_expired(expense: &Expense, today: NaiveDate) -> bool {
    expense.is_installment() && remaining_count(expense, today) == 0
}

/// Drops expired installments from `expenses`, returning the removed records in
/// their original order. One-time expenses are never pruned.
pub fn prune_expired(expenses: &mut Vec<Expense>, today: NaiveDate) -> Vec<Expense> {
    let (expired, kept): (Vec<Expense>, Vec<Expense>) = std::mem::take(expenses)
        .into_iter()
        .partition(|expense| is_expired(expense, today));
    *expenses = kept;

    for expense in &expired {
        info!(
            id = expense.id,
            name = %expense.name,
            ended = %expense.last_month(),
            "pruned completed installment"
        );
    }
    expired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::expense::ExpenseDraft;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Expense> {
        vec![
            Expense::new(
                1,
                ExpenseDraft::installment("Finished", 1000, date(2023, 10, 1), date(2023, 12, 1)),
            )
            .unwrap(),
            Expense::new(2, ExpenseDraft::one_time("Old dinner", 5000, date(2023, 1, 1))).unwrap(),
            Expense::new(
                3,
                ExpenseDraft::installment("Running", 2000, date(2023, 12, 1), date(2024, 3, 1)),
            )
            .unwrap(),
        ]
    }

    #[test]
    fn removes_only_finished_installments() {
        let mut expenses = sample();
        let removed = prune_expired(&mut expenses, date(2024, 1, 15));
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, 1);
        let ids: Vec<i64> = expenses.iter().map(|expense| expense.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn pruning_is_idempotent() {
        let mut expenses = sample();
        prune_expired(&mut expenses, date(2024, 1, 15));
        let once = expenses.clone();
        let removed = prune_expired(&mut expenses, date(2024, 1, 15));
        assert!(removed.is_empty());
        assert_eq!(expenses, once);
    }
}
