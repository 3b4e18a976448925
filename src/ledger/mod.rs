//! Expense domain models and the projection/grouping engine.

pub mod book;
pub mod expense;
pub mod grouping;
pub mod installment;
pub mod lifecycle;
pub mod month;
pub mod recurring;

pub use book::ExpenseBook;
pub use expense::{Expense, ExpenseDraft, ExpenseId, ExpenseKind, MAX_AMOUNT};
pub use grouping::{
    group_by_expense, group_by_month, ExpenseBucket, LineItem, MonthBucket, ProjectionSettings,
};
pub use installment::{active_months, remaining_count, remaining_total, InstallmentPeriod};
pub use lifecycle::{is_expired, prune_expired};
pub use month::{add_months, month_index, month_key, MonthKey};
pub use recurring::{
    lookahead_count, project, skeleton_months, ProjectedOccurrence, RecurringTemplate,
    TemplateDraft, MAX_LOOKAHEAD_MONTHS, MIN_LOOKAHEAD_MONTHS,
};
