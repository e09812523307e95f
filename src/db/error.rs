use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::domain::ConstraintViolation;

/// Failures surfaced by the store. A failed write never leaves partial rows
/// behind: every multi-statement write runs in one transaction.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Constraint(#[from] ConstraintViolation),

    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },

    #[error("Database error: {0}")]
    Database(DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                Self::Constraint(ConstraintViolation::Duplicate(detail))
            }
            _ => Self::Database(err),
        }
    }
}

impl From<anyhow::Error> for StoreError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
