use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

use crate::domain::invoice::{
  AmountInCents, CustomerId, Invoice, InvoiceError, InvoiceFields, InvoiceId, InvoiceListItem,
  InvoiceRepository, InvoiceStatus, NewInvoice,
};

#[derive(Debug, FromRow)]
struct InvoiceRow {
  id: String,
  customer_id: String,
  amount: i64,
  status: String,
  date: NaiveDate,
}

impl TryFrom<InvoiceRow> for Invoice {
  type Error = InvoiceError;

  fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
    Ok(Invoice {
      id: InvoiceId::from(row.id),
      customer_id: CustomerId::new(row.customer_id)?,
      amount: AmountInCents::from_cents(row.amount)?,
      status: InvoiceStatus::from_str(&row.status)?,
      date: row.date,
    })
  }
}

#[derive(Debug, FromRow)]
struct InvoiceListRow {
  id: String,
  name: String,
  email: String,
  image_url: Option<String>,
  amount: i64,
  status: String,
  date: NaiveDate,
}

impl TryFrom<InvoiceListRow> for InvoiceListItem {
  type Error = InvoiceError;

  fn try_from(row: InvoiceListRow) -> Result<Self, Self::Error> {
    Ok(InvoiceListItem {
      id: InvoiceId::from(row.id),
      customer_name: row.name,
      customer_email: row.email,
      customer_image_url: row.image_url,
      amount: AmountInCents::from_cents(row.amount)?,
      status: InvoiceStatus::from_str(&row.status)?,
      date: row.date,
    })
  }
}

/// Pattern for a case-insensitive substring match
fn like_pattern(query: &str) -> String {
  let escaped = query
    .replace('\\', "\\\\")
    .replace('%', "\\%")
    .replace('_', "\\_");
  format!("%{}%", escaped)
}

pub struct PostgresInvoiceRepository {
  pool: PgPool,
}

impl PostgresInvoiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
  async fn create(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
            INSERT INTO invoices (customer_id, amount, status, date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, customer_id, amount, status, date
            "#,
    )
    .bind(invoice.customer_id.value())
    .bind(invoice.amount.cents())
    .bind(invoice.status.as_str())
    .bind(invoice.date)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn update(&self, id: &InvoiceId, fields: &InvoiceFields) -> Result<u64, InvoiceError> {
    let result = sqlx::query(
      r#"
            UPDATE invoices
            SET customer_id = $1, amount = $2, status = $3
            WHERE id = $4
            "#,
    )
    .bind(fields.customer_id.value())
    .bind(fields.amount.cents())
    .bind(fields.status.as_str())
    .bind(id.value())
    .execute(&self.pool)
    .await?;

    Ok(result.rows_affected())
  }

  async fn delete(&self, id: &InvoiceId) -> Result<u64, InvoiceError> {
    let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
      .bind(id.value())
      .execute(&self.pool)
      .await?;

    Ok(result.rows_affected())
  }

  async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT id, customer_id, amount, status, date
            FROM invoices
            WHERE id = $1
            "#,
    )
    .bind(id.value())
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn search(
    &self,
    query: &str,
    limit: i64,
    offset: i64,
  ) -> Result<Vec<InvoiceListItem>, InvoiceError> {
    let rows = sqlx::query_as::<_, InvoiceListRow>(
      r#"
            SELECT invoices.id, customers.name, customers.email, customers.image_url,
                   invoices.amount, invoices.status, invoices.date
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE customers.name ILIKE $1
               OR customers.email ILIKE $1
               OR invoices.amount::text ILIKE $1
               OR invoices.date::text ILIKE $1
               OR invoices.status ILIKE $1
            ORDER BY invoices.date DESC, invoices.id
            LIMIT $2 OFFSET $3
            "#,
    )
    .bind(like_pattern(query))
    .bind(limit)
    .bind(offset)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn count_matching(&self, query: &str) -> Result<i64, InvoiceError> {
    let count = sqlx::query_scalar::<_, i64>(
      r#"
            SELECT COUNT(*)
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE customers.name ILIKE $1
               OR customers.email ILIKE $1
               OR invoices.amount::text ILIKE $1
               OR invoices.date::text ILIKE $1
               OR invoices.status ILIKE $1
            "#,
    )
    .bind(like_pattern(query))
    .fetch_one(&self.pool)
    .await?;

    Ok(count)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::postgres::test_db::{insert_customer, setup_test_db};

  fn fields(customer: &str, cents: i64, status: InvoiceStatus) -> InvoiceFields {
    InvoiceFields {
      customer_id: CustomerId::new(customer).unwrap(),
      amount: AmountInCents::from_cents(cents).unwrap(),
      status,
    }
  }

  #[test]
  fn test_like_pattern_escapes_wildcards() {
    assert_eq!(like_pattern(""), "%%");
    assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
  }

  #[tokio::test]
  async fn test_create_assigns_id() {
    let (pool, _container) = setup_test_db().await;
    insert_customer(&pool, "c1", "Amy Burns").await;
    let repo = PostgresInvoiceRepository::new(pool);

    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let created = repo
      .create(NewInvoice::dated(
        fields("c1", 25000, InvoiceStatus::Pending),
        date,
      ))
      .await
      .unwrap();

    assert!(!created.id.value().is_empty());
    assert_eq!(created.amount.cents(), 25000);
    assert_eq!(created.date, date);

    let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(found, created);
  }

  #[tokio::test]
  async fn test_create_with_unknown_customer_fails() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresInvoiceRepository::new(pool);

    let result = repo
      .create(NewInvoice::new(fields("nobody", 100, InvoiceStatus::Paid)))
      .await;

    assert!(matches!(result, Err(InvoiceError::Database(_))));
  }

  #[tokio::test]
  async fn test_update_leaves_date_alone() {
    let (pool, _container) = setup_test_db().await;
    insert_customer(&pool, "c1", "Amy Burns").await;
    insert_customer(&pool, "c2", "Balazs Orban").await;
    let repo = PostgresInvoiceRepository::new(pool);

    let date = NaiveDate::from_ymd_opt(2023, 12, 24).unwrap();
    let created = repo
      .create(NewInvoice::dated(
        fields("c1", 1000, InvoiceStatus::Pending),
        date,
      ))
      .await
      .unwrap();

    let affected = repo
      .update(&created.id, &fields("c2", 9950, InvoiceStatus::Paid))
      .await
      .unwrap();
    assert_eq!(affected, 1);

    let updated = repo.find_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(updated.customer_id.value(), "c2");
    assert_eq!(updated.amount.cents(), 9950);
    assert_eq!(updated.status, InvoiceStatus::Paid);
    assert_eq!(updated.date, date);
    assert_eq!(updated.id, created.id);
  }

  #[tokio::test]
  async fn test_missing_rows_affect_nothing() {
    let (pool, _container) = setup_test_db().await;
    insert_customer(&pool, "c1", "Amy Burns").await;
    let repo = PostgresInvoiceRepository::new(pool);
    let missing = InvoiceId::from("inv-99");

    let updated = repo
      .update(&missing, &fields("c1", 100, InvoiceStatus::Paid))
      .await
      .unwrap();
    let deleted = repo.delete(&missing).await.unwrap();

    assert_eq!(updated, 0);
    assert_eq!(deleted, 0);
  }

  #[tokio::test]
  async fn test_delete_removes_row() {
    let (pool, _container) = setup_test_db().await;
    insert_customer(&pool, "c1", "Amy Burns").await;
    let repo = PostgresInvoiceRepository::new(pool);

    let created = repo
      .create(NewInvoice::new(fields("c1", 100, InvoiceStatus::Paid)))
      .await
      .unwrap();

    assert_eq!(repo.delete(&created.id).await.unwrap(), 1);
    assert!(repo.find_by_id(&created.id).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_search_matches_customer_and_status() {
    let (pool, _container) = setup_test_db().await;
    insert_customer(&pool, "c1", "Amy Burns").await;
    insert_customer(&pool, "c2", "Balazs Orban").await;
    let repo = PostgresInvoiceRepository::new(pool);

    for (day, customer, status) in [
      (1, "c1", InvoiceStatus::Pending),
      (2, "c2", InvoiceStatus::Paid),
      (3, "c2", InvoiceStatus::Pending),
    ] {
      repo
        .create(NewInvoice::dated(
          fields(customer, 500, status),
          NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
        ))
        .await
        .unwrap();
    }

    let all = repo.search("", 6, 0).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].date, NaiveDate::from_ymd_opt(2024, 2, 3).unwrap());

    let balazs = repo.search("orban", 6, 0).await.unwrap();
    assert_eq!(balazs.len(), 2);
    assert!(balazs.iter().all(|i| i.customer_name == "Balazs Orban"));

    assert_eq!(repo.count_matching("PAID").await.unwrap(), 1);
    assert_eq!(repo.search("", 2, 2).await.unwrap().len(), 1);
  }
}
