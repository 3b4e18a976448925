//! Open-ended monthly charges and their projection onto calendar months.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{ExpenseError, ExpenseResult};
use crate::ledger::expense::{validate_template_fields, ExpenseId, MAX_AMOUNT};
use crate::ledger::month::MonthKey;

/// Lower bound on the projection window and on the always-visible month window.
pub const MIN_LOOKAHEAD_MONTHS: u32 = 3;
/// Hard cap on projected months per template.
pub const MAX_LOOKAHEAD_MONTHS: u32 = 120;

/// User-editable fields of a recurring template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDraft {
    pub name: String,
    pub amount: u64,
    pub first_date: NaiveDate,
}

impl TemplateDraft {
    pub fn new(name: impl Into<String>, amount: u64, first_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            amount,
            first_date,
        }
    }
}

/// Persisted definition of a charge that repeats every month from `first_date` on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTemplate {
    pub id: ExpenseId,
    pub name: String,
    pub amount: u64,
    pub first_date: NaiveDate,
    #[serde(default)]
    pub monthly_adjustments: BTreeMap<MonthKey, u64>,
}

impl RecurringTemplate {
    pub fn new(id: ExpenseId, draft: TemplateDraft) -> ExpenseResult<Self> {
        validate_template_fields(&draft.name, draft.amount, draft.first_date)?;
        Ok(Self {
            id,
            name: draft.name.trim().to_string(),
            amount: draft.amount,
            first_date: draft.first_date,
            monthly_adjustments: BTreeMap::new(),
        })
    }

    /// Replaces the editable fields, keeping identity and adjustments.
    pub fn apply(&mut self, draft: TemplateDraft) -> ExpenseResult<()> {
        validate_template_fields(&draft.name, draft.amount, draft.first_date)?;
        self.name = draft.name.trim().to_string();
        self.amount = draft.amount;
        self.first_date = draft.first_date;
        Ok(())
    }

    pub fn validate(&self) -> ExpenseResult<()> {
        validate_template_fields(&self.name, self.amount, self.first_date)
            .and_then(|()| {
                self.monthly_adjustments
                    .iter()
                    .try_for_each(|(month, amount)| validate_adjustment(*month, *amount))
            })
            .map_err(|err| match err {
                ExpenseError::InvalidRecord(reason) => ExpenseError::InvalidRecord(format!(
                    "recurring template {}: {}",
                    self.id, reason
                )),
                other => other,
            })
    }

    pub fn first_month(&self) -> MonthKey {
        MonthKey::of(self.first_date)
    }

    pub fn billing_day(&self) -> u32 {
        self.first_date.day()
    }

    /// Override for `month` when present, otherwise the default amount.
    pub fn amount_for(&self, month: MonthKey) -> u64 {
        self.monthly_adjustments
            .get(&month)
            .copied()
            .unwrap_or(self.amount)
    }
}

/// Rejects per-month overrides above [`MAX_AMOUNT`]. Zero is allowed.
pub(crate) fn validate_adjustment(month: MonthKey, amount: u64) -> ExpenseResult<()> {
    if amount > MAX_AMOUNT {
        return Err(ExpenseError::InvalidRecord(format!(
            "adjustment for {month} exceeds the maximum of {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

/// A template's charge for one month. Derived on every pass and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectedOccurrence<'a> {
    pub template: &'a RecurringTemplate,
    pub month: MonthKey,
    pub amount: u64,
}

impl<'a> ProjectedOccurrence<'a> {
    pub fn id(&self) -> ExpenseId {
        self.template.id
    }

    pub fn name(&self) -> &'a str {
        &self.template.name
    }

    pub fn billing_day(&self) -> u32 {
        self.template.billing_day()
    }

    pub fn is_adjusted(&self) -> bool {
        self.template.monthly_adjustments.contains_key(&self.month)
    }
}

/// Projection window size: at least `min`, grown to the number of real expense rows,
/// and never more than `max`.
pub fn lookahead_count(real_expense_count: usize, min: u32, max: u32) -> u32 {
    let rows = u32::try_from(real_expense_count).unwrap_or(u32::MAX);
    rows.max(min).min(max.max(min))
}

/// Synthesizes the monthly occurrences of `template` up to the current month.
///
/// The window holds at most `lookahead` months, ends at `current` and never starts
/// before the template's first month. Months beyond `current` are never emitted, so
/// a template that starts in the future yields nothing yet.
pub fn project(
    template: &RecurringTemplate,
    current: MonthKey,
    lookahead: u32,
) -> Vec<ProjectedOccurrence<'_>> {
    let lookahead = lookahead.min(MAX_LOOKAHEAD_MONTHS) as i32;
    if lookahead == 0 {
        return Vec::new();
    }
    let start = template
        .first_month()
        .index()
        .max(current.index() - lookahead + 1);
    let end = (start + lookahead - 1).min(current.index());

    (start..=end)
        .map(MonthKey::from_index)
        .map(|month| ProjectedOccurrence {
            template,
            month,
            amount: template.amount_for(month),
        })
        .collect()
}

/// Months a template would occupy from `current` onward, ignoring the not-beyond-now
/// cutoff. Used to lay out an empty timeline when nothing else is visible.
pub fn skeleton_months(
    template: &RecurringTemplate,
    current: MonthKey,
    lookahead: u32,
) -> Vec<MonthKey> {
    let count = lookahead.min(MAX_LOOKAHEAD_MONTHS) as i32;
    let start = template.first_month().max(current);
    (0..count).map(|offset| start.add_months(offset)).collect()
}
