use std::sync::Arc;

use crate::domain::invoice::{InvoiceError, InvoiceId, InvoiceService};

#[derive(Debug, Clone)]
pub struct DeleteInvoiceCommand {
  pub invoice_id: InvoiceId,
}

pub struct DeleteInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl DeleteInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  /// Unlike create and update, storage failures are returned to the caller
  /// instead of being folded into a form state.
  pub async fn execute(&self, command: DeleteInvoiceCommand) -> Result<(), InvoiceError> {
    self
      .invoice_service
      .delete_invoice(&command.invoice_id)
      .await
  }
}
