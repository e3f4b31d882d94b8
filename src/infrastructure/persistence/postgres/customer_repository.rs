use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::domain::invoice::{Customer, CustomerId, CustomerRepository, InvoiceError};

#[derive(Debug, FromRow)]
struct CustomerRow {
  id: String,
  name: String,
  email: String,
  image_url: Option<String>,
}

impl TryFrom<CustomerRow> for Customer {
  type Error = InvoiceError;

  fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
    Ok(Customer {
      id: CustomerId::new(row.id)?,
      name: row.name,
      email: row.email,
      image_url: row.image_url,
    })
  }
}

pub struct PostgresCustomerRepository {
  pool: PgPool,
}

impl PostgresCustomerRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
  async fn find_all(&self) -> Result<Vec<Customer>, InvoiceError> {
    let rows = sqlx::query_as::<_, CustomerRow>(
      r#"
            SELECT id, name, email, image_url
            FROM customers
            ORDER BY name ASC
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }
}
