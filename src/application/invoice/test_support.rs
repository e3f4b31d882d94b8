//! In-memory fakes of the invoice ports that record every call.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::domain::invoice::{
  CacheLookup, CacheStamp, Customer, CustomerId, CustomerRepository, Invoice, InvoiceError,
  InvoiceFields, InvoiceId, InvoiceListItem, InvoiceRepository, InvoiceService, ListingCache,
  NewInvoice,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoCall {
  Create(NewInvoice),
  Update(InvoiceId, InvoiceFields),
  Delete(InvoiceId),
}

#[derive(Default)]
pub struct RecordingInvoiceRepository {
  pub calls: Mutex<Vec<RepoCall>>,
  pub rows: Mutex<BTreeMap<String, Invoice>>,
  /// When set, every write fails with a database error
  pub fail_writes: bool,
}

impl RecordingInvoiceRepository {
  pub fn failing() -> Self {
    Self {
      fail_writes: true,
      ..Self::default()
    }
  }

  pub fn with_rows(rows: Vec<Invoice>) -> Self {
    let repo = Self::default();
    {
      let mut stored = repo.rows.lock().unwrap();
      for row in rows {
        stored.insert(row.id.value().to_string(), row);
      }
    }
    repo
  }

  pub fn calls(&self) -> Vec<RepoCall> {
    self.calls.lock().unwrap().clone()
  }

  fn check_writable(&self) -> Result<(), InvoiceError> {
    if self.fail_writes {
      return Err(InvoiceError::Database(sqlx::Error::PoolTimedOut));
    }
    Ok(())
  }
}

#[async_trait]
impl InvoiceRepository for RecordingInvoiceRepository {
  async fn create(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceError> {
    self
      .calls
      .lock()
      .unwrap()
      .push(RepoCall::Create(invoice.clone()));
    self.check_writable()?;

    let mut rows = self.rows.lock().unwrap();
    let id = InvoiceId::from(format!("inv-{}", rows.len() + 1));
    let created = Invoice {
      id: id.clone(),
      customer_id: invoice.customer_id,
      amount: invoice.amount,
      status: invoice.status,
      date: invoice.date,
    };
    rows.insert(id.into_inner(), created.clone());
    Ok(created)
  }

  async fn update(&self, id: &InvoiceId, fields: &InvoiceFields) -> Result<u64, InvoiceError> {
    self
      .calls
      .lock()
      .unwrap()
      .push(RepoCall::Update(id.clone(), fields.clone()));
    self.check_writable()?;

    match self.rows.lock().unwrap().get_mut(id.value()) {
      Some(row) => {
        row.customer_id = fields.customer_id.clone();
        row.amount = fields.amount;
        row.status = fields.status;
        Ok(1)
      }
      None => Ok(0),
    }
  }

  async fn delete(&self, id: &InvoiceId) -> Result<u64, InvoiceError> {
    self
      .calls
      .lock()
      .unwrap()
      .push(RepoCall::Delete(id.clone()));
    self.check_writable()?;

    Ok(
      self
        .rows
        .lock()
        .unwrap()
        .remove(id.value())
        .map_or(0, |_| 1),
    )
  }

  async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceError> {
    Ok(self.rows.lock().unwrap().get(id.value()).cloned())
  }

  async fn search(
    &self,
    query: &str,
    limit: i64,
    offset: i64,
  ) -> Result<Vec<InvoiceListItem>, InvoiceError> {
    let rows = self.rows.lock().unwrap();
    let mut items: Vec<InvoiceListItem> = rows
      .values()
      .filter(|row| matches_query(row, query))
      .map(|row| InvoiceListItem {
        id: row.id.clone(),
        customer_name: row.customer_id.value().to_string(),
        customer_email: format!("{}@example.com", row.customer_id),
        customer_image_url: None,
        amount: row.amount,
        status: row.status,
        date: row.date,
      })
      .collect();
    items.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(
      items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect(),
    )
  }

  async fn count_matching(&self, query: &str) -> Result<i64, InvoiceError> {
    let rows = self.rows.lock().unwrap();
    Ok(rows.values().filter(|row| matches_query(row, query)).count() as i64)
  }
}

fn matches_query(row: &Invoice, query: &str) -> bool {
  query.is_empty()
    || row.customer_id.value().contains(query)
    || row.status.as_str().contains(query)
}

pub struct StaticCustomerRepository(pub Vec<Customer>);

#[async_trait]
impl CustomerRepository for StaticCustomerRepository {
  async fn find_all(&self) -> Result<Vec<Customer>, InvoiceError> {
    Ok(self.0.clone())
  }
}

#[derive(Default)]
pub struct RecordingCache {
  pub invalidations: Mutex<Vec<String>>,
}

impl RecordingCache {
  pub fn invalidations(&self) -> Vec<String> {
    self.invalidations.lock().unwrap().clone()
  }
}

#[async_trait]
impl ListingCache for RecordingCache {
  async fn get(&self, _path: &str, _variant: &str) -> CacheLookup {
    CacheLookup::Miss(Some(CacheStamp(0)))
  }

  async fn put(&self, _path: &str, _variant: &str, _stamp: CacheStamp, _html: String) {}

  async fn invalidate(&self, path: &str) {
    self.invalidations.lock().unwrap().push(path.to_string());
  }
}

pub fn customer(id: &str, name: &str) -> Customer {
  Customer {
    id: CustomerId::new(id).unwrap(),
    name: name.to_string(),
    email: format!("{}@example.com", id),
    image_url: None,
  }
}

pub fn service(
  repo: &Arc<RecordingInvoiceRepository>,
  cache: &Arc<RecordingCache>,
) -> Arc<InvoiceService> {
  Arc::new(InvoiceService::new(
    repo.clone(),
    Arc::new(StaticCustomerRepository(vec![
      customer("c1", "Amy Burns"),
      customer("c2", "Balazs Orban"),
    ])),
    cache.clone(),
  ))
}
