//! Errors raised by the booking domain rules.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced row does not exist.
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: DbId },

    /// Input that breaks a domain rule: an unparsable date, an empty stay,
    /// a malformed calendar field.
    #[error("Invalid input: {0}")]
    Validation(String),
}
