use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid customer id: {0}")]
  InvalidCustomerId(String),
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
  #[error("Invalid invoice status: {0}")]
  InvalidStatus(String),
}

// Invoice Id - opaque, assigned by storage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(String);

impl InvoiceId {
  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl From<String> for InvoiceId {
  fn from(value: String) -> Self {
    Self(value)
  }
}

impl From<&str> for InvoiceId {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

impl fmt::Display for InvoiceId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Customer Id - opaque reference, existence is enforced by the foreign key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
  pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
    let value = value.into();
    if value.trim().is_empty() {
      return Err(ValueObjectError::InvalidCustomerId(
        "Customer id cannot be empty".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for CustomerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Invoice Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
  Pending,
  Paid,
}

impl InvoiceStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      InvoiceStatus::Pending => "pending",
      InvoiceStatus::Paid => "paid",
    }
  }
}

impl FromStr for InvoiceStatus {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(InvoiceStatus::Pending),
      "paid" => Ok(InvoiceStatus::Paid),
      _ => Err(ValueObjectError::InvalidStatus(format!(
        "Unknown status: {}",
        s
      ))),
    }
  }
}

impl fmt::Display for InvoiceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Amount in minor currency units (cents). Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmountInCents(i64);

impl AmountInCents {
  /// Converts an amount in major units (dollars) to cents, rounding half away
  /// from zero at the second decimal place.
  pub fn from_major(amount: Decimal) -> Result<Self, ValueObjectError> {
    if amount <= Decimal::ZERO {
      return Err(ValueObjectError::InvalidAmount(
        "Amount must be greater than zero".to_string(),
      ));
    }

    let cents = amount
      .checked_mul(Decimal::ONE_HUNDRED)
      .map(|c| c.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
      .and_then(|c| c.to_i64())
      .ok_or_else(|| ValueObjectError::InvalidAmount("Amount is too large".to_string()))?;

    Self::from_cents(cents)
  }

  pub fn from_cents(cents: i64) -> Result<Self, ValueObjectError> {
    if cents <= 0 {
      return Err(ValueObjectError::InvalidAmount(format!(
        "Amount must be at least one cent, got {} cents",
        cents
      )));
    }
    Ok(Self(cents))
  }

  pub fn cents(&self) -> i64 {
    self.0
  }

  pub fn to_major(&self) -> Decimal {
    Decimal::new(self.0, 2)
  }

  /// Formats as US dollars with thousands separators, e.g. `$1,234.56`.
  pub fn format_usd(&self) -> String {
    let dollars = self.0 / 100;
    let cents = self.0 % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
      if i > 0 && (digits.len() - i) % 3 == 0 {
        grouped.push(',');
      }
      grouped.push(ch);
    }

    format!("${}.{:02}", grouped, cents)
  }
}

impl fmt::Display for AmountInCents {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
