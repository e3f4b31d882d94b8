use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::auth::errors::{AuthError, RepositoryError};
use crate::domain::invoice::InvoiceError;

/// Body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
  pub error: String,
  pub message: String,
}

/// Error type returned by handlers, mapped to an HTTP status
#[derive(Debug)]
pub enum ApiError {
  /// Malformed request (400)
  BadRequest(String),

  /// No usable session (401)
  Unauthorized,

  /// Referenced record does not exist (404)
  NotFound(String),

  /// Anything else (500). The detail is logged, never sent.
  Internal(String),
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
      ApiError::Unauthorized => write!(f, "Unauthorized"),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let (error, message) = match self {
      ApiError::BadRequest(msg) => ("bad_request", msg.clone()),
      ApiError::Unauthorized => ("unauthorized", "Invalid or expired session".to_string()),
      ApiError::NotFound(msg) => ("not_found", msg.clone()),
      ApiError::Internal(msg) => {
        tracing::error!("Internal error: {}", msg);
        ("internal_error", "Something went wrong.".to_string())
      }
    };

    HttpResponse::build(self.status_code())
      .content_type(ContentType::json())
      .json(ErrorResponse {
        error: error.to_string(),
        message,
      })
  }
}

impl From<InvoiceError> for ApiError {
  fn from(error: InvoiceError) -> Self {
    match error {
      InvoiceError::InvoiceNotFound(id) => ApiError::NotFound(format!("Invoice {} not found", id)),
      InvoiceError::Validation(err) => ApiError::BadRequest(err.to_string()),
      other => ApiError::Internal(other.to_string()),
    }
  }
}

impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::InvalidSession | AuthError::UserNotFound => ApiError::Unauthorized,
      AuthError::ValueObject(_) => ApiError::Unauthorized,
      AuthError::Repository(RepositoryError::NotFound) => ApiError::Unauthorized,
      other => ApiError::Internal(other.to_string()),
    }
  }
}

impl From<anyhow::Error> for ApiError {
  fn from(error: anyhow::Error) -> Self {
    ApiError::Internal(format!("{:#}", error))
  }
}

impl From<tera::Error> for ApiError {
  fn from(error: tera::Error) -> Self {
    ApiError::Internal(format!("Template error: {:?}", error))
  }
}
