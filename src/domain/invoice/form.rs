//! Validation schema for the invoice create/edit form.
//!
//! The form arrives as untyped string fields. Validation coerces them into
//! [`InvoiceFields`] or reports, per field, the messages shown next to the
//! offending input. Identifier and date are never read from the form.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::str::FromStr;
use validator::{Validate, ValidationError, ValidationErrors};

use super::value_objects::{AmountInCents, CustomerId, InvoiceStatus};

pub const CUSTOMER_MESSAGE: &str = "Please select a customer";
pub const AMOUNT_MESSAGE: &str = "Please enter an amount greater than $0.";
pub const STATUS_MESSAGE: &str = "Please select an invoice status";

/// Raw invoice form as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct InvoiceForm {
  #[serde(rename = "customerId", default)]
  #[validate(custom(function = "validate_customer_id"))]
  pub customer_id: String,

  #[serde(default)]
  #[validate(custom(function = "validate_amount"))]
  pub amount: String,

  #[serde(default)]
  #[validate(custom(function = "validate_status"))]
  pub status: String,
}

/// Validated, coerced invoice fields shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFields {
  pub customer_id: CustomerId,
  pub amount: AmountInCents,
  pub status: InvoiceStatus,
}

/// Field name to violation messages, keyed by the form's field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.entry(field.into()).or_default().push(message.into());
  }

  pub fn get(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }
}

impl From<ValidationErrors> for FieldErrors {
  fn from(errors: ValidationErrors) -> Self {
    let mut fields = FieldErrors::new();
    for (field, errors) in errors.field_errors() {
      let name = form_field_name(&field);
      for error in errors {
        let message = error
          .message
          .as_ref()
          .map(|m| m.to_string())
          .unwrap_or_else(|| format!("Invalid field: {}", name));
        fields.add(name, message);
      }
    }
    fields
  }
}

/// Maps a struct field name to the name the browser posts.
fn form_field_name(field: &str) -> &str {
  match field {
    "customer_id" => "customerId",
    other => other,
  }
}

impl InvoiceForm {
  /// Runs the schema and returns coerced fields, or every violation found.
  pub fn parse(&self) -> Result<InvoiceFields, FieldErrors> {
    self.validate()?;

    let mut errors = FieldErrors::new();

    let customer_id = CustomerId::new(self.customer_id.as_str())
      .map_err(|_| errors.add("customerId", CUSTOMER_MESSAGE))
      .ok();
    let amount = coerce_amount(&self.amount)
      .and_then(|amount| AmountInCents::from_major(amount).ok())
      .or_else(|| {
        errors.add("amount", AMOUNT_MESSAGE);
        None
      });
    let status = InvoiceStatus::from_str(&self.status)
      .map_err(|_| errors.add("status", STATUS_MESSAGE))
      .ok();

    match (customer_id, amount, status) {
      (Some(customer_id), Some(amount), Some(status)) => Ok(InvoiceFields {
        customer_id,
        amount,
        status,
      }),
      _ => Err(errors),
    }
  }
}

/// Coerces a raw amount string to a number. Blank input coerces to zero,
/// anything unparseable yields `None`.
pub fn coerce_amount(raw: &str) -> Option<Decimal> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Some(Decimal::ZERO);
  }
  Decimal::from_str(trimmed)
    .or_else(|_| Decimal::from_scientific(trimmed))
    .ok()
}

fn violation(code: &'static str, message: &'static str) -> ValidationError {
  ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_customer_id(value: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    return Err(violation("customer_required", CUSTOMER_MESSAGE));
  }
  Ok(())
}

fn validate_amount(value: &str) -> Result<(), ValidationError> {
  match coerce_amount(value).map(AmountInCents::from_major) {
    Some(Ok(_)) => Ok(()),
    _ => Err(violation("amount_positive", AMOUNT_MESSAGE)),
  }
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
  InvoiceStatus::from_str(value)
    .map(|_| ())
    .map_err(|_| violation("status_invalid", STATUS_MESSAGE))
}
