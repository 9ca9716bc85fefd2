//! Unified error type for `LedgerBuddy`.
//!
//! Errors fall into two groups. Validation errors describe something the caller
//! can fix (a bad amount, an unknown category) and are safe to show to users.
//! Infrastructure errors (database, configuration, Discord) are logged and
//! surfaced to users only as a generic failure.

use thiserror::Error;

/// Message shown to users when an infrastructure error occurs.
pub const OPERATION_FAILED_MESSAGE: &str = "Operation failed. Please try again later.";

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Amount is zero, negative, or not a representable number
    #[error("Invalid amount: {amount} (must be a positive number)")]
    InvalidAmount {
        /// The rejected amount as entered
        amount: String,
    },

    /// Date string is not a valid `YYYY-MM-DD` calendar date
    #[error("Invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input
        input: String,
    },

    /// Month string is not a valid `YYYY-MM` month
    #[error("Invalid month '{input}': expected YYYY-MM")]
    InvalidMonth {
        /// The rejected input
        input: String,
    },

    /// A required field was missing or blank
    #[error("{field} is required")]
    MissingField {
        /// Human-readable field name
        field: &'static str,
    },

    /// Color is not a `#rrggbb` hex string
    #[error("Invalid color '{input}': expected #rrggbb")]
    InvalidColor {
        /// The rejected input
        input: String,
    },

    /// A category with this name already exists for the user
    #[error("Category '{name}' already exists")]
    DuplicateCategory {
        /// Category name
        name: String,
    },

    /// No category with this name exists for the user
    #[error("Category '{name}' not found")]
    CategoryNotFound {
        /// Category name
        name: String,
    },

    /// No transaction with this id exists for the user
    #[error("Transaction {id} not found")]
    TransactionNotFound {
        /// Transaction id
        id: i64,
    },

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Writing to a string buffer failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Serenity/Poise framework failure
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Returns true for errors caused by caller input rather than infrastructure.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount { .. }
                | Self::InvalidDate { .. }
                | Self::InvalidMonth { .. }
                | Self::MissingField { .. }
                | Self::InvalidColor { .. }
                | Self::DuplicateCategory { .. }
                | Self::CategoryNotFound { .. }
                | Self::TransactionNotFound { .. }
        )
    }

    /// Text that is safe to send back to an untrusted caller.
    #[must_use]
    pub fn user_message(&self) -> String {
        if self.is_user_error() {
            self.to_string()
        } else {
            OPERATION_FAILED_MESSAGE.to_string()
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_shown_verbatim() {
        let err = Error::MissingField { field: "Category" };
        assert!(err.is_user_error());
        assert_eq!(err.user_message(), "Category is required");

        let err = Error::TransactionNotFound { id: 42 };
        assert_eq!(err.user_message(), "Transaction 42 not found");
    }

    #[test]
    fn test_infrastructure_errors_are_masked() {
        let err = Error::Database(sea_orm::DbErr::Custom("disk I/O error at page 7".to_string()));
        assert!(!err.is_user_error());
        assert_eq!(err.user_message(), OPERATION_FAILED_MESSAGE);
        assert!(!err.user_message().contains("page 7"));

        let err = Error::Config {
            message: "bad toml".to_string(),
        };
        assert_eq!(err.user_message(), OPERATION_FAILED_MESSAGE);
    }
}
