//! Error types for the contact manager.

use thiserror::Error;

/// Errors surfaced by the contact operations.
#[derive(Error, Debug)]
pub enum ContactError {
    /// No contact with the requested id exists
    #[error("Contact not found: {id}")]
    NotFound { id: String },

    /// Payload did not match the expected shape
    #[error("Invalid contact payload: {message}")]
    Validation { message: String },

    /// The store rejected a query or commit
    #[error("Database error: {message}")]
    Persistence { message: String },

    /// Mail or broadcast delivery failed
    #[error("Delivery failed: {message}")]
    Transport { message: String },
}

impl ContactError {
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<rusqlite::Error> for ContactError {
    fn from(e: rusqlite::Error) -> Self {
        Self::persistence(e.to_string())
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    /// No default location for the database could be determined
    #[error("Could not determine a database location; set CONTACTMANAGER_DB")]
    NoDatabasePath,
}

impl ConfigError {
    pub fn invalid(var: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            var: var.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_id() {
        let err = ContactError::not_found("abc");
        assert_eq!(err.to_string(), "Contact not found: abc");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_rusqlite_error_becomes_persistence() {
        let err: ContactError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, ContactError::Persistence { .. }));
        assert!(!err.is_not_found());
    }
}
