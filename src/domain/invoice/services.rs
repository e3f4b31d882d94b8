use std::sync::Arc;

use super::entities::{Customer, Invoice, InvoiceListItem, NewInvoice};
use super::errors::InvoiceError;
use super::form::InvoiceFields;
use super::ports::{CustomerRepository, InvoiceRepository, ListingCache};
use super::value_objects::InvoiceId;

/// Logical path of the invoice listing view.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// Rows per listing page.
pub const ITEMS_PER_PAGE: i64 = 6;

const MAX_PAGE: i64 = i64::MAX / ITEMS_PER_PAGE;

/// One page of the invoice listing.
#[derive(Debug, Clone)]
pub struct InvoicePage {
  pub invoices: Vec<InvoiceListItem>,
  pub current_page: i64,
  pub total_pages: i64,
}

pub struct InvoiceService {
  invoice_repo: Arc<dyn InvoiceRepository>,
  customer_repo: Arc<dyn CustomerRepository>,
  listing_cache: Arc<dyn ListingCache>,
}

impl InvoiceService {
  pub fn new(
    invoice_repo: Arc<dyn InvoiceRepository>,
    customer_repo: Arc<dyn CustomerRepository>,
    listing_cache: Arc<dyn ListingCache>,
  ) -> Self {
    Self {
      invoice_repo,
      customer_repo,
      listing_cache,
    }
  }

  /// Persists a new invoice dated today. Does not touch the listing cache.
  pub async fn create_invoice(&self, fields: InvoiceFields) -> Result<Invoice, InvoiceError> {
    let invoice = self.invoice_repo.create(NewInvoice::new(fields)).await?;
    tracing::info!(
      "Created invoice {} for customer {}",
      invoice.id,
      invoice.customer_id
    );
    Ok(invoice)
  }

  /// Writes customer, amount and status. Zero matched rows is not an error.
  pub async fn update_invoice(
    &self,
    id: &InvoiceId,
    fields: &InvoiceFields,
  ) -> Result<(), InvoiceError> {
    let affected = self.invoice_repo.update(id, fields).await?;
    if affected == 0 {
      tracing::warn!("Update of invoice {} matched no rows", id);
    } else {
      tracing::info!("Updated invoice {}", id);
    }
    Ok(())
  }

  /// Deletes the invoice, then invalidates the listing. A failed delete
  /// returns before the invalidation.
  pub async fn delete_invoice(&self, id: &InvoiceId) -> Result<(), InvoiceError> {
    let affected = self.invoice_repo.delete(id).await?;
    tracing::info!("Deleted invoice {} ({} rows)", id, affected);
    self.invalidate_listing().await;
    Ok(())
  }

  pub async fn invalidate_listing(&self) {
    self.listing_cache.invalidate(INVOICES_PATH).await;
  }

  pub async fn find_invoice(&self, id: &InvoiceId) -> Result<Invoice, InvoiceError> {
    self
      .invoice_repo
      .find_by_id(id)
      .await?
      .ok_or_else(|| InvoiceError::InvoiceNotFound(id.clone()))
  }

  pub async fn list_customers(&self) -> Result<Vec<Customer>, InvoiceError> {
    self.customer_repo.find_all().await
  }

  /// Returns the requested page of invoices matching `query`. Pages are
  /// 1-based; anything below 1 is treated as the first page, and pages whose
  /// offset would overflow are clamped to the last representable one.
  pub async fn search_invoices(&self, query: &str, page: i64) -> Result<InvoicePage, InvoiceError> {
    let current_page = page.clamp(1, MAX_PAGE);
    let offset = (current_page - 1) * ITEMS_PER_PAGE;

    let invoices = self
      .invoice_repo
      .search(query, ITEMS_PER_PAGE, offset)
      .await?;
    let total = self.invoice_repo.count_matching(query).await?;

    Ok(InvoicePage {
      invoices,
      current_page,
      total_pages: total_pages(total),
    })
  }
}

fn total_pages(total: i64) -> i64 {
  (total + ITEMS_PER_PAGE - 1) / ITEMS_PER_PAGE
}
