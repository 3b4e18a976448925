mod common;

use common::{date, each_month, installment, month, one_time, template};
use kakeibo_core::ledger::{
    active_months, group_by_expense, group_by_month, month_key, prune_expired, remaining_count,
    LineItem, ProjectionSettings,
};

#[test]
fn one_time_expense_is_active_in_exactly_its_month() {
    for (day, expected) in [
        (date(2024, 1, 1), month(2024, 1)),
        (date(2024, 2, 29), month(2024, 2)),
        (date(2023, 12, 31), month(2023, 12)),
    ] {
        let expense = one_time(1, 100, day);
        assert_eq!(active_months(&expense), vec![expected]);
        assert_eq!(active_months(&expense)[0], month_key(day));
    }
}

#[test]
fn installment_length_matches_span_minus_hidden() {
    let mut expense = installment(1, 1000, date(2023, 10, 15), date(2024, 5, 15));
    let span = month(2023, 10).months_through(month(2024, 5)) as usize;
    assert_eq!(active_months(&expense).len(), span);

    expense.hide_month(month(2023, 12));
    expense.hide_month(month(2024, 4));
    // Outside the range: must not shorten the timeline.
    expense.hide_month(month(2024, 9));
    assert_eq!(active_months(&expense).len(), span - 2);
}

#[test]
fn remaining_count_never_increases_and_ends_at_zero() {
    let mut expense = installment(1, 1000, date(2024, 1, 10), date(2024, 12, 10));
    expense.hide_month(month(2024, 6));

    let mut previous = u32::MAX;
    for today in each_month(month(2023, 10), month(2025, 6)) {
        let remaining = remaining_count(&expense, today);
        assert!(remaining <= previous, "remaining grew on {today}");
        if month_key(today) > month(2024, 12) {
            assert_eq!(remaining, 0, "expense ended but {today} reports {remaining}");
        }
        previous = remaining;
    }
}

#[test]
fn hand_built_installment_buckets() {
    let expenses = vec![installment(1, 3000, date(2024, 1, 1), date(2024, 3, 1))];
    let today = date(2024, 2, 1);

    let buckets = group_by_month(&expenses, &[], today, ProjectionSettings::default());
    let summary: Vec<(String, Vec<u64>, u64)> = buckets
        .iter()
        .map(|bucket| {
            (
                bucket.month.to_string(),
                bucket.items.iter().map(LineItem::amount).collect(),
                bucket.total,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("2024-02".to_string(), vec![3000], 3000),
            ("2024-03".to_string(), vec![3000], 3000),
        ]
    );
    assert_eq!(remaining_count(&expenses[0], today), 2);
}

#[test]
fn bucket_total_equals_sum_of_line_items() {
    let expenses = vec![
        installment(1, 3000, date(2024, 1, 1), date(2024, 8, 1)),
        installment(2, 1250, date(2024, 5, 20), date(2024, 7, 20)),
        one_time(3, 980, date(2024, 6, 2)),
    ];
    let mut rent = template(4, 65000, date(2023, 4, 25));
    rent.monthly_adjustments.insert(month(2024, 6), 66000);
    let templates = vec![rent];

    let buckets = group_by_month(
        &expenses,
        &templates,
        date(2024, 6, 1),
        ProjectionSettings::default(),
    );
    for bucket in &buckets {
        let sum: u64 = bucket.items.iter().map(LineItem::amount).sum();
        assert_eq!(bucket.total, sum, "bucket {}", bucket.month);
    }
    assert_eq!(buckets[0].month, month(2024, 6));
    assert_eq!(buckets[0].total, 3000 + 1250 + 980 + 66000);
}

#[test]
fn adjusted_projection_is_superseded_by_concrete_record() {
    let mut charge = template(77, 1000, date(2024, 5, 1));
    charge.monthly_adjustments.insert(month(2024, 5), 1500);
    let templates = vec![charge];
    let today = date(2024, 5, 20);

    let projected = group_by_month(&[], &templates, today, ProjectionSettings::default());
    let may = projected.iter().find(|b| b.month == month(2024, 5)).unwrap();
    assert_eq!(may.total, 1500);
    assert!(may.items.iter().all(LineItem::is_projected));

    let concrete = vec![one_time(77, 2000, date(2024, 5, 1))];
    let merged = group_by_month(&concrete, &templates, today, ProjectionSettings::default());
    let may = merged.iter().find(|b| b.month == month(2024, 5)).unwrap();
    assert_eq!(may.items.len(), 1);
    assert_eq!(may.total, 2000);
    assert!(matches!(may.items[0], LineItem::Concrete(expense) if expense.id == 77));
}

#[test]
fn recurring_template_guarantees_three_month_window() {
    let templates = vec![template(9, 4000, date(2024, 1, 3))];
    let buckets = group_by_month(&[], &templates, date(2024, 6, 15), ProjectionSettings::default());
    let keys: Vec<String> = buckets.iter().map(|b| b.month.to_string()).collect();
    assert_eq!(keys, vec!["2024-06", "2024-07", "2024-08"]);
}

#[test]
fn minimum_window_follows_configuration() {
    let templates = vec![template(9, 4000, date(2024, 1, 3))];
    let settings = ProjectionSettings {
        min_lookahead_months: 5,
        max_lookahead_months: 12,
    };
    let buckets = group_by_month(&[], &templates, date(2024, 11, 2), settings);
    let keys: Vec<String> = buckets.iter().map(|b| b.month.to_string()).collect();
    assert_eq!(
        keys,
        vec!["2024-11", "2024-12", "2025-01", "2025-02", "2025-03"]
    );
}

#[test]
fn hiding_a_month_removes_it_from_bucket_and_remaining_count() {
    let mut expense = installment(1, 3000, date(2024, 1, 1), date(2024, 3, 1));
    let today = date(2024, 1, 5);
    assert_eq!(remaining_count(&expense, today), 3);

    expense.hide_month(month(2024, 2));
    assert_eq!(remaining_count(&expense, today), 2);

    let expenses = vec![expense];
    let buckets = group_by_month(&expenses, &[], today, ProjectionSettings::default());
    let keys: Vec<String> = buckets.iter().map(|b| b.month.to_string()).collect();
    assert_eq!(keys, vec!["2024-01", "2024-03"]);
}

#[test]
fn pruner_is_idempotent_and_spares_one_time_expenses() {
    let mut expenses = vec![
        installment(1, 3000, date(2023, 1, 1), date(2023, 3, 1)),
        one_time(2, 500, date(2023, 2, 1)),
        installment(3, 3000, date(2024, 1, 1), date(2024, 3, 1)),
    ];
    let today = date(2024, 2, 1);

    let first = prune_expired(&mut expenses, today);
    let after_once = expenses.clone();
    let second = prune_expired(&mut expenses, today);

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(expenses, after_once);
    assert!(expenses.iter().any(|expense| expense.id == 2));
}

#[test]
fn installment_view_reports_outstanding_totals() {
    let expenses = vec![
        installment(5, 3000, date(2024, 1, 1), date(2024, 3, 1)),
        one_time(6, 800, date(2024, 2, 1)),
    ];
    let buckets = group_by_expense(&expenses, date(2024, 2, 1));
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].remaining, 2);
    assert_eq!(buckets[0].total, 6000);
    assert_eq!(buckets[0].period.label(), "2024/1 〜 2024/3");
}
