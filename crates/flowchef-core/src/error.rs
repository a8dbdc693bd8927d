use thiserror::Error;

use crate::validate::ValidationIssue;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("recipe failed validation: {}", summarize(.0))]
    Invalid(Vec<ValidationIssue>),
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
