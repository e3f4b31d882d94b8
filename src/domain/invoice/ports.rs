use async_trait::async_trait;

use super::entities::{Customer, Invoice, InvoiceListItem, NewInvoice};
use super::errors::InvoiceError;
use super::form::InvoiceFields;
use super::value_objects::InvoiceId;

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  /// Inserts one row; storage assigns the id.
  async fn create(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceError>;

  /// Writes customer, amount and status of the row with `id`. Returns the
  /// number of rows affected, which is zero when no row matches.
  async fn update(&self, id: &InvoiceId, fields: &InvoiceFields) -> Result<u64, InvoiceError>;

  /// Hard-deletes the row with `id`. Returns the number of rows affected.
  async fn delete(&self, id: &InvoiceId) -> Result<u64, InvoiceError>;

  async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceError>;

  /// Listing rows matching `query`, newest first.
  async fn search(
    &self,
    query: &str,
    limit: i64,
    offset: i64,
  ) -> Result<Vec<InvoiceListItem>, InvoiceError>;

  async fn count_matching(&self, query: &str) -> Result<i64, InvoiceError>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
  /// All customers ordered by name.
  async fn find_all(&self) -> Result<Vec<Customer>, InvoiceError>;
}

/// Generation of a path's cached renders, read before the data behind a
/// render is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStamp(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
  Hit(String),
  /// Carries the stamp to hand back to `put`. `None` when the cache could
  /// not be read; the render is then not stored.
  Miss(Option<CacheStamp>),
}

/// Cache of rendered views, addressed by logical path.
///
/// Every method is best effort: a cache that cannot be reached behaves like an
/// empty one and logs the failure.
#[async_trait]
pub trait ListingCache: Send + Sync {
  /// Looks up the cached render of `path` for the given variant (query string).
  async fn get(&self, path: &str, variant: &str) -> CacheLookup;

  /// Stores a render built after the lookup that produced `stamp`. Nothing
  /// is stored if `path` was invalidated since.
  async fn put(&self, path: &str, variant: &str, stamp: CacheStamp, html: String);

  /// Drops every cached render of `path`.
  async fn invalidate(&self, path: &str);
}
