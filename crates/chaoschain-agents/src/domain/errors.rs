//! Validator agent error kinds.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("relationship score {0} out of bounds [-1.0, 1.0]")]
    RelationshipOutOfBounds(f64),

    #[error("validator {0} is already deliberating on block {1}")]
    AlreadyDeliberating(String, String),
}
