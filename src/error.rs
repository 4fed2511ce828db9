use crate::field::FieldKind;
use thiserror::Error;

/// Represents all possible errors reported by the crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Schedule string doesn't consist of exactly five whitespace-separated fields.
    #[error("invalid schedule '{0}': expected five whitespace-separated fields")]
    InvalidFieldCount(String),
    /// A single field value failed validation.
    #[error("invalid {kind} value: {reason}")]
    InvalidValue {
        /// Field the faulty value belongs to.
        kind: FieldKind,
        /// Human-readable explanation of the failure.
        reason: String,
    },
    /// One or more fields of a schedule failed validation.
    #[error("invalid schedule: {}", join(.0))]
    InvalidSchedule(Vec<Error>),
}

impl Error {
    /// Flat list of per-field failures, one element for anything else.
    pub fn details(&self) -> Vec<&Error> {
        match self {
            Error::InvalidSchedule(errors) => errors.iter().collect(),
            other => vec![other],
        }
    }
}

fn join(errors: &[Error]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}
