//! Error types for records entering the match engine
//!
//! Error taxonomy using thiserror

use thiserror::Error;

/// Invariant violations found while reading a collaborator record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("{record} is missing required identifier `{field}`")]
    MissingIdentifier {
        record: &'static str,
        field: &'static str,
    },

    #[error("invalid {record}: {reason}")]
    Invalid { record: &'static str, reason: String },
}
