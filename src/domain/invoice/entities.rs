use chrono::{NaiveDate, Utc};
use serde::Serialize;

use super::form::InvoiceFields;
use super::value_objects::{AmountInCents, CustomerId, InvoiceId, InvoiceStatus};

/// Invoice entity as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
  pub id: InvoiceId,
  pub customer_id: CustomerId,
  /// Amount in cents
  pub amount: AmountInCents,
  pub status: InvoiceStatus,
  /// Creation day, never changed afterwards
  pub date: NaiveDate,
}

/// An invoice that storage has not assigned an id to yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
  pub customer_id: CustomerId,
  pub amount: AmountInCents,
  pub status: InvoiceStatus,
  pub date: NaiveDate,
}

impl NewInvoice {
  /// Builds a new invoice dated today (UTC).
  pub fn new(fields: InvoiceFields) -> Self {
    Self::dated(fields, Utc::now().date_naive())
  }

  pub fn dated(fields: InvoiceFields, date: NaiveDate) -> Self {
    Self {
      customer_id: fields.customer_id,
      amount: fields.amount,
      status: fields.status,
      date,
    }
  }
}

/// Customer entity, read-only from the dashboard's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
  pub id: CustomerId,
  pub name: String,
  pub email: String,
  pub image_url: Option<String>,
}

/// One row of the invoice listing, joined with its customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceListItem {
  pub id: InvoiceId,
  pub customer_name: String,
  pub customer_email: String,
  pub customer_image_url: Option<String>,
  pub amount: AmountInCents,
  pub status: InvoiceStatus,
  pub date: NaiveDate,
}
