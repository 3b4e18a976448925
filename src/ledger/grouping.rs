//! Merges concrete expenses and projected recurring charges into month buckets and
//! per-installment timelines.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, trace};

use crate::ledger::expense::{Expense, ExpenseId};
use crate::ledger::installment::{active_months, remaining_count, InstallmentPeriod};
use crate::ledger::month::MonthKey;
use crate::ledger::recurring::{
    lookahead_count, project, skeleton_months, ProjectedOccurrence, RecurringTemplate,
    MAX_LOOKAHEAD_MONTHS, MIN_LOOKAHEAD_MONTHS,
};

/// Bounds for the recurring projection window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionSettings {
    /// Floor of the lookahead and size of the always-visible month window.
    pub min_lookahead_months: u32,
    pub max_lookahead_months: u32,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            min_lookahead_months: MIN_LOOKAHEAD_MONTHS,
            max_lookahead_months: MAX_LOOKAHEAD_MONTHS,
        }
    }
}

/// One row of a month bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LineItem<'a> {
    Concrete(&'a Expense),
    Projected(ProjectedOccurrence<'a>),
}

impl<'a> LineItem<'a> {
    pub fn id(&self) -> ExpenseId {
        match self {
            LineItem::Concrete(expense) => expense.id,
            LineItem::Projected(occurrence) => occurrence.id(),
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            LineItem::Concrete(expense) => &expense.name,
            LineItem::Projected(occurrence) => occurrence.name(),
        }
    }

    /// Amount charged for this row in its bucket's month.
    pub fn amount(&self) -> u64 {
        match self {
            LineItem::Concrete(expense) => expense.amount,
            LineItem::Projected(occurrence) => occurrence.amount,
        }
    }

    pub fn billing_day(&self) -> u32 {
        match self {
            LineItem::Concrete(expense) => expense.billing_day(),
            LineItem::Projected(occurrence) => occurrence.billing_day(),
        }
    }

    pub fn is_projected(&self) -> bool {
        matches!(self, LineItem::Projected(_))
    }
}

/// All charges falling in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket<'a> {
    pub month: MonthKey,
    pub items: Vec<LineItem<'a>>,
    pub total: u64,
}

impl<'a> MonthBucket<'a> {
    pub fn new(month: MonthKey) -> Self {
        Self {
            month,
            items: Vec::new(),
            total: 0,
        }
    }

    pub fn push(&mut self, item: LineItem<'a>) {
        self.total = self.total.saturating_add(item.amount());
        self.items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Timeline summary for a single installment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseBucket<'a> {
    pub expense: &'a Expense,
    pub period: InstallmentPeriod,
    pub remaining: u32,
    /// `amount * remaining`, not a sum over individual months.
    pub total: u64,
}

/// Groups every visible charge by month, from the current month onward.
///
/// Concrete expenses contribute each of their active months. Each template
/// contributes its projected occurrences unless a concrete expense carrying the
/// template's id spans that month, in which case the concrete record wins. Whenever
/// templates exist, the current month and the following window are always present,
/// possibly empty.
pub fn group_by_month<'a>(
    expenses: &'a [Expense],
    templates: &'a [RecurringTemplate],
    today: NaiveDate,
    settings: ProjectionSettings,
) -> Vec<MonthBucket<'a>> {
    let current = MonthKey::of(today);
    let mut buckets: BTreeMap<MonthKey, MonthBucket<'a>> = BTreeMap::new();

    for expense in expenses {
        for month in active_months(expense) {
            if month < current {
                continue;
            }
            buckets
                .entry(month)
                .or_insert_with(|| MonthBucket::new(month))
                .push(LineItem::Concrete(expense));
        }
    }

    if templates.is_empty() {
        return buckets.into_values().collect();
    }

    let mut linked: HashMap<ExpenseId, Vec<&Expense>> = HashMap::new();
    for template in templates {
        linked.entry(template.id).or_default();
    }
    let mut real_rows = 0usize;
    for expense in expenses {
        match linked.get_mut(&expense.id) {
            Some(records) => records.push(expense),
            None => real_rows += 1,
        }
    }
    let lookahead = lookahead_count(
        real_rows,
        settings.min_lookahead_months,
        settings.max_lookahead_months,
    );
    trace!(lookahead, real_rows, "projecting recurring templates");

    for template in templates {
        let concrete = linked.get(&template.id).map(Vec::as_slice).unwrap_or(&[]);
        for occurrence in project(template, current, lookahead) {
            if occurrence.month < current {
                continue;
            }
            if concrete.iter().any(|expense| expense.spans(occurrence.month)) {
                debug!(
                    template = template.id,
                    month = %occurrence.month,
                    "concrete expense supersedes projected occurrence"
                );
                continue;
            }
            buckets
                .entry(occurrence.month)
                .or_insert_with(|| MonthBucket::new(occurrence.month))
                .push(LineItem::Projected(occurrence));
        }
    }

    if buckets.is_empty() {
        for template in templates {
            for month in skeleton_months(template, current, lookahead) {
                buckets.entry(month).or_insert_with(|| MonthBucket::new(month));
            }
        }
    }

    for offset in 0..settings.min_lookahead_months as i32 {
        let month = current.add_months(offset);
        buckets.entry(month).or_insert_with(|| MonthBucket::new(month));
    }

    buckets.into_values().collect()
}

/// One bucket per installment identity, ordered by id. One-time expenses are left
/// out; a repeated id keeps its first record.
pub fn group_by_expense(expenses: &[Expense], today: NaiveDate) -> Vec<ExpenseBucket<'_>> {
    let mut by_id: BTreeMap<ExpenseId, &Expense> = BTreeMap::new();
    for expense in expenses.iter().filter(|expense| expense.is_installment()) {
        by_id.entry(expense.id).or_insert(expense);
    }

    by_id
        .into_values()
        .map(|expense| {
            let remaining = remaining_count(expense, today);
            ExpenseBucket {
                expense,
                period: InstallmentPeriod::of(expense),
                remaining,
                total: expense.amount.saturating_mul(u64::from(remaining)),
            }
        })
        .collect()
}
