use thiserror::Error;

/// Result alias used throughout the expense engine.
pub type ExpenseResult<T> = Result<T, ExpenseError>;

/// Error type that captures expense book and storage failures.
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(i64),
    #[error("Recurring template not found: {0}")]
    TemplateNotFound(i64),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Storage error: {0}")]
    Storage(String),
}
