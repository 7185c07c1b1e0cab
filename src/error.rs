//! Error handling for Influ
//!
//! Defines custom error types and establishes a unified Result type
//! using anyhow for context chaining and error propagation.

use thiserror::Error;

/// Core error types for panel operations
#[derive(Error, Debug)]
pub enum PanelError {
    #[error("database error: {0}")]
    DbError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("unknown billing type '{0}' (expected one of: umowa_50, umowa_20, useme_50, useme_20, umowa_praca, gotowka)")]
    UnknownBillingType(String),

    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Result type alias for panel operations
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting_is_readable() {
        let err = PanelError::DbError("connection failed".to_string());
        assert_eq!(err.to_string(), "database error: connection failed");
    }

    #[test]
    fn test_anyhow_context_chains_errors() {
        use anyhow::Context;
        let result: Result<()> =
            Err(anyhow::anyhow!("original error")).context("failed to save collaboration");
        match result {
            Err(e) => {
                let msg = e.to_string();
                assert!(msg.contains("failed to save collaboration"));
                let debug_msg = format!("{:?}", e);
                assert!(debug_msg.contains("original error") || msg.contains("original error"));
            }
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn test_panel_error_variants() {
        let not_found = PanelError::NotFound {
            entity: "purchase",
            id: 7,
        };
        assert_eq!(not_found.to_string(), "purchase #7 not found");

        let unknown = PanelError::UnknownBillingType("b2b".to_string());
        assert!(unknown.to_string().starts_with("unknown billing type 'b2b'"));

        let amount = PanelError::InvalidAmount("-5".to_string());
        assert!(amount.to_string().starts_with("invalid amount"));
    }

    #[test]
    fn test_panel_error_downcasts_through_anyhow() {
        let err: anyhow::Error = PanelError::InvalidAmount("-1".to_string()).into();
        assert!(matches!(
            err.downcast_ref::<PanelError>(),
            Some(PanelError::InvalidAmount(_))
        ));
    }
}
