use serde::Serialize;
use std::sync::Arc;

use crate::domain::invoice::{InvoiceError, InvoiceId, InvoiceService};

#[derive(Debug, Clone)]
pub struct GetInvoiceFormCommand {
  /// `None` for the create form
  pub invoice_id: Option<InvoiceId>,
}

#[derive(Debug, Serialize)]
pub struct CustomerOptionDto {
  pub id: String,
  pub name: String,
}

/// Current values of an invoice, as the edit form displays them.
#[derive(Debug, Serialize)]
pub struct InvoiceFormValuesDto {
  pub id: String,
  pub customer_id: String,
  pub amount: String,
  pub status: String,
}

#[derive(Debug, Serialize)]
pub struct InvoiceFormResponse {
  pub customers: Vec<CustomerOptionDto>,
  pub invoice: Option<InvoiceFormValuesDto>,
}

pub struct GetInvoiceFormUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetInvoiceFormUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: GetInvoiceFormCommand,
  ) -> Result<InvoiceFormResponse, InvoiceError> {
    let customers = self
      .invoice_service
      .list_customers()
      .await?
      .into_iter()
      .map(|c| CustomerOptionDto {
        id: c.id.into_inner(),
        name: c.name,
      })
      .collect();

    let invoice = match command.invoice_id {
      Some(id) => {
        let invoice = self.invoice_service.find_invoice(&id).await?;
        Some(InvoiceFormValuesDto {
          id: invoice.id.into_inner(),
          customer_id: invoice.customer_id.into_inner(),
          amount: invoice.amount.to_major().to_string(),
          status: invoice.status.as_str().to_string(),
        })
      }
      None => None,
    };

    Ok(InvoiceFormResponse { customers, invoice })
  }
}
