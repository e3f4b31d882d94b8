use std::sync::Arc;

use super::outcome::ActionOutcome;
use crate::domain::invoice::{INVOICES_PATH, InvoiceForm, InvoiceService};

pub const CREATE_VALIDATION_MESSAGE: &str = "Missing Fields. Failed to create invoices.";
pub const CREATE_DATABASE_MESSAGE: &str = "Database Error: Failed to create invoice";

#[derive(Debug, Clone)]
pub struct CreateInvoiceCommand {
  pub form: InvoiceForm,
}

pub struct CreateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CreateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  /// Validates the form, inserts an invoice dated today and invalidates the
  /// listing. Every failure is folded into the returned outcome.
  pub async fn execute(&self, command: CreateInvoiceCommand) -> ActionOutcome {
    let fields = match command.form.parse() {
      Ok(fields) => fields,
      Err(errors) => {
        tracing::debug!("Invoice form rejected: {:?}", errors);
        return ActionOutcome::validation_failed(errors, CREATE_VALIDATION_MESSAGE);
      }
    };

    if let Err(e) = self.invoice_service.create_invoice(fields).await {
      tracing::error!("Failed to create invoice: {}", e);
      return ActionOutcome::PersistenceFailed(CREATE_DATABASE_MESSAGE.to_string());
    }

    self.invoice_service.invalidate_listing().await;
    ActionOutcome::PersistedAndRedirect(INVOICES_PATH.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::invoice::outcome::FormState;
  use crate::application::invoice::test_support::{
    RecordingCache, RecordingInvoiceRepository, RepoCall, service,
  };
  use crate::domain::invoice::form::AMOUNT_MESSAGE;
  use crate::domain::invoice::{FieldErrors, InvoiceStatus};
  use chrono::Utc;

  fn command(query: &str) -> CreateInvoiceCommand {
    CreateInvoiceCommand {
      form: serde_urlencoded::from_str(query).unwrap(),
    }
  }

  #[tokio::test]
  async fn test_create_persists_and_redirects() {
    let repo = Arc::new(RecordingInvoiceRepository::default());
    let cache = Arc::new(RecordingCache::default());
    let use_case = CreateInvoiceUseCase::new(service(&repo, &cache));

    let before = Utc::now().date_naive();
    let outcome = use_case
      .execute(command("customerId=c1&amount=250.00&status=pending"))
      .await;
    let after = Utc::now().date_naive();

    assert_eq!(
      outcome,
      ActionOutcome::PersistedAndRedirect("/dashboard/invoices".to_string())
    );

    let calls = repo.calls();
    assert_eq!(calls.len(), 1);
    let RepoCall::Create(invoice) = &calls[0] else {
      panic!("expected a create call, got {:?}", calls[0]);
    };
    assert_eq!(invoice.customer_id.value(), "c1");
    assert_eq!(invoice.amount.cents(), 25000);
    assert_eq!(invoice.status, InvoiceStatus::Pending);
    assert!(invoice.date == before || invoice.date == after);

    assert_eq!(cache.invalidations(), vec!["/dashboard/invoices".to_string()]);
  }

  #[tokio::test]
  async fn test_create_ignores_posted_date() {
    let repo = Arc::new(RecordingInvoiceRepository::default());
    let cache = Arc::new(RecordingCache::default());
    let use_case = CreateInvoiceUseCase::new(service(&repo, &cache));

    use_case
      .execute(command(
        "customerId=c1&amount=1&status=paid&date=2001-01-01&id=chosen",
      ))
      .await;

    let RepoCall::Create(invoice) = &repo.calls()[0] else {
      panic!("expected a create call");
    };
    assert_ne!(invoice.date.to_string(), "2001-01-01");
    assert!(repo.rows.lock().unwrap().get("chosen").is_none());
  }

  #[tokio::test]
  async fn test_create_rejects_zero_amount_without_persisting() {
    let repo = Arc::new(RecordingInvoiceRepository::default());
    let cache = Arc::new(RecordingCache::default());
    let use_case = CreateInvoiceUseCase::new(service(&repo, &cache));

    let outcome = use_case
      .execute(command("customerId=c1&amount=0&status=pending"))
      .await;

    let mut errors = FieldErrors::new();
    errors.add("amount", AMOUNT_MESSAGE);
    assert_eq!(
      outcome,
      ActionOutcome::ValidationFailed(FormState {
        errors,
        message: Some("Missing Fields. Failed to create invoices.".to_string()),
      })
    );
    assert!(repo.calls().is_empty());
    assert!(cache.invalidations().is_empty());
  }

  #[tokio::test]
  async fn test_create_database_failure_is_generic() {
    let repo = Arc::new(RecordingInvoiceRepository::failing());
    let cache = Arc::new(RecordingCache::default());
    let use_case = CreateInvoiceUseCase::new(service(&repo, &cache));

    let outcome = use_case
      .execute(command("customerId=missing&amount=12.34&status=paid"))
      .await;

    assert_eq!(
      outcome,
      ActionOutcome::PersistenceFailed("Database Error: Failed to create invoice".to_string())
    );
    assert_eq!(repo.calls().len(), 1);
    assert!(cache.invalidations().is_empty());
  }
}
