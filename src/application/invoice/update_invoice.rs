use std::sync::Arc;

use super::outcome::ActionOutcome;
use crate::domain::invoice::{INVOICES_PATH, InvoiceForm, InvoiceId, InvoiceService};

pub const UPDATE_VALIDATION_MESSAGE: &str = "Missing Fields. Failed to update invoice.";
pub const UPDATE_DATABASE_MESSAGE: &str = "Database Error: Failed to update database";

#[derive(Debug, Clone)]
pub struct UpdateInvoiceCommand {
  pub invoice_id: InvoiceId,
  pub form: InvoiceForm,
}

pub struct UpdateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl UpdateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  /// Overwrites customer, amount and status of an existing invoice. The
  /// creation date is left as stored.
  pub async fn execute(&self, command: UpdateInvoiceCommand) -> ActionOutcome {
    let fields = match command.form.parse() {
      Ok(fields) => fields,
      Err(errors) => {
        tracing::debug!(
          "Invoice form for {} rejected: {:?}",
          command.invoice_id,
          errors
        );
        return ActionOutcome::validation_failed(errors, UPDATE_VALIDATION_MESSAGE);
      }
    };

    if let Err(e) = self
      .invoice_service
      .update_invoice(&command.invoice_id, &fields)
      .await
    {
      tracing::error!("Failed to update invoice {}: {}", command.invoice_id, e);
      return ActionOutcome::PersistenceFailed(UPDATE_DATABASE_MESSAGE.to_string());
    }

    self.invoice_service.invalidate_listing().await;
    ActionOutcome::PersistedAndRedirect(INVOICES_PATH.to_string())
  }
}
