//! The module contains the errors the engine can throw.
//!
//! The classes are:
//!
//! - [`NotFound`] thrown when a referenced row does not exist for the tenant.
//! - [`Validation`] thrown for caller-correctable input (inactive metal,
//!   non-positive amounts, over-transfer).
//! - [`Duplicate`] thrown when a unique key (metal code) is already taken.
//! - [`Conflict`] thrown when a concurrent write could not be retried.
//!
//!  [`NotFound`]: EngineError::NotFound
//!  [`Validation`]: EngineError::Validation
//!  [`Duplicate`]: EngineError::Duplicate
//!  [`Conflict`]: EngineError::Conflict
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("\"{0}\" already present!")]
    Duplicate(String),
    #[error("conflicting concurrent write: {0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Duplicate(a), Self::Duplicate(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
