use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListInvoicesCommand {
  #[serde(default)]
  pub query: String,
  pub page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceListItemDto {
  pub id: String,
  pub customer_name: String,
  pub customer_email: String,
  pub customer_image_url: Option<String>,
  pub amount: String,
  pub status: String,
  pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ListInvoicesResponse {
  pub invoices: Vec<InvoiceListItemDto>,
  pub query: String,
  pub current_page: i64,
  pub total_pages: i64,
}

pub struct ListInvoicesUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListInvoicesUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: ListInvoicesCommand,
  ) -> Result<ListInvoicesResponse, InvoiceError> {
    let query = command.query.trim().to_string();
    let page = self
      .invoice_service
      .search_invoices(&query, command.page.unwrap_or(1))
      .await?;

    let invoices = page
      .invoices
      .into_iter()
      .map(|i| InvoiceListItemDto {
        id: i.id.into_inner(),
        customer_name: i.customer_name,
        customer_email: i.customer_email,
        customer_image_url: i.customer_image_url,
        amount: i.amount.format_usd(),
        status: i.status.as_str().to_string(),
        date: i.date,
      })
      .collect();

    Ok(ListInvoicesResponse {
      invoices,
      query,
      current_page: page.current_page,
      total_pages: page.total_pages,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::invoice::test_support::{
    RecordingCache, RecordingInvoiceRepository, service,
  };
  use crate::domain::invoice::{AmountInCents, CustomerId, Invoice, InvoiceId, InvoiceStatus};

  fn invoice(n: u32, customer: &str, status: InvoiceStatus) -> Invoice {
    Invoice {
      id: InvoiceId::from(format!("inv-{:02}", n)),
      customer_id: CustomerId::new(customer).unwrap(),
      amount: AmountInCents::from_cents(123456).unwrap(),
      status,
      date: NaiveDate::from_ymd_opt(2024, 1, n).unwrap(),
    }
  }

  #[tokio::test]
  async fn test_list_paginates_newest_first() {
    let rows = (1..=8)
      .map(|n| invoice(n, "c1", InvoiceStatus::Pending))
      .collect();
    let repo = Arc::new(RecordingInvoiceRepository::with_rows(rows));
    let cache = Arc::new(RecordingCache::default());
    let use_case = ListInvoicesUseCase::new(service(&repo, &cache));

    let first = use_case
      .execute(ListInvoicesCommand::default())
      .await
      .unwrap();
    assert_eq!(first.invoices.len(), 6);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.current_page, 1);
    assert_eq!(first.invoices[0].id, "inv-08");
    assert_eq!(first.invoices[0].amount, "$1,234.56");

    let second = use_case
      .execute(ListInvoicesCommand {
        query: String::new(),
        page: Some(2),
      })
      .await
      .unwrap();
    assert_eq!(second.invoices.len(), 2);
    assert_eq!(second.invoices[1].id, "inv-01");
  }

  #[tokio::test]
  async fn test_list_filters_by_query() {
    let repo = Arc::new(RecordingInvoiceRepository::with_rows(vec![
      invoice(1, "c1", InvoiceStatus::Pending),
      invoice(2, "c2", InvoiceStatus::Paid),
    ]));
    let cache = Arc::new(RecordingCache::default());
    let use_case = ListInvoicesUseCase::new(service(&repo, &cache));

    let response = use_case
      .execute(ListInvoicesCommand {
        query: " paid ".to_string(),
        page: Some(0),
      })
      .await
      .unwrap();

    assert_eq!(response.query, "paid");
    assert_eq!(response.current_page, 1);
    assert_eq!(response.invoices.len(), 1);
    assert_eq!(response.invoices[0].status, "paid");
  }

  #[tokio::test]
  async fn test_huge_page_is_an_empty_page() {
    let repo = Arc::new(RecordingInvoiceRepository::with_rows(vec![invoice(
      1,
      "c1",
      InvoiceStatus::Pending,
    )]));
    let cache = Arc::new(RecordingCache::default());
    let use_case = ListInvoicesUseCase::new(service(&repo, &cache));

    let response = use_case
      .execute(ListInvoicesCommand {
        query: String::new(),
        page: Some(i64::MAX),
      })
      .await
      .unwrap();

    assert!(response.invoices.is_empty());
    assert_eq!(response.total_pages, 1);
    assert_eq!(response.current_page, i64::MAX / 6);
  }
}
