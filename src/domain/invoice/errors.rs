use super::value_objects::{InvoiceId, ValueObjectError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Invoice not found: {0}")]
  InvoiceNotFound(InvoiceId),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}
