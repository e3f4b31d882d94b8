use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::domain::invoice::{CacheLookup, CacheStamp, ListingCache};

/// Listing cache in Redis.
///
/// Each path has a generation counter; entries are stored under the
/// generation read at lookup time and expire after the TTL. Invalidation bumps
/// the counter, which orphans every entry of the previous generation at once,
/// including renders still being built from data read before the bump.
#[derive(Clone)]
pub struct RedisListingCache {
  conn: ConnectionManager,
  ttl_seconds: u64,
}

impl RedisListingCache {
  pub fn new(conn: ConnectionManager, ttl_seconds: u64) -> Self {
    Self { conn, ttl_seconds }
  }

  async fn generation(&self, path: &str) -> redis::RedisResult<u64> {
    let mut conn = self.conn.clone();
    let generation: Option<u64> = conn.get(generation_key(path)).await?;
    Ok(generation.unwrap_or(0))
  }

  async fn read(&self, path: &str, variant: &str) -> redis::RedisResult<CacheLookup> {
    let generation = self.generation(path).await?;
    let mut conn = self.conn.clone();
    let html: Option<String> = conn.get(entry_key(path, generation, variant)).await?;

    Ok(match html {
      Some(html) => CacheLookup::Hit(html),
      None => CacheLookup::Miss(Some(CacheStamp(generation))),
    })
  }

  async fn write(
    &self,
    path: &str,
    variant: &str,
    stamp: CacheStamp,
    html: String,
  ) -> redis::RedisResult<()> {
    let mut conn = self.conn.clone();
    conn
      .set_ex(entry_key(path, stamp.0, variant), html, self.ttl_seconds)
      .await
  }
}

fn generation_key(path: &str) -> String {
  format!("listing:{}:generation", path)
}

fn entry_key(path: &str, generation: u64, variant: &str) -> String {
  format!("listing:{}:{}:{}", path, generation, variant)
}

#[async_trait]
impl ListingCache for RedisListingCache {
  async fn get(&self, path: &str, variant: &str) -> CacheLookup {
    match self.read(path, variant).await {
      Ok(lookup) => lookup,
      Err(e) => {
        tracing::warn!("Listing cache read failed for {}: {}", path, e);
        CacheLookup::Miss(None)
      }
    }
  }

  async fn put(&self, path: &str, variant: &str, stamp: CacheStamp, html: String) {
    if let Err(e) = self.write(path, variant, stamp, html).await {
      tracing::warn!("Listing cache write failed for {}: {}", path, e);
    }
  }

  async fn invalidate(&self, path: &str) {
    let mut conn = self.conn.clone();
    let result: redis::RedisResult<u64> = conn.incr(generation_key(path), 1).await;

    match result {
      Ok(generation) => tracing::debug!("Listing {} now at generation {}", path, generation),
      Err(e) => tracing::warn!("Listing cache invalidation failed for {}: {}", path, e),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_keys_are_scoped_by_generation() {
    assert_eq!(
      generation_key("/dashboard/invoices"),
      "listing:/dashboard/invoices:generation"
    );
    assert_eq!(
      entry_key("/dashboard/invoices", 3, "query=&page=1"),
      "listing:/dashboard/invoices:3:query=&page=1"
    );
    assert_ne!(
      entry_key("/dashboard/invoices", 3, ""),
      entry_key("/dashboard/invoices", 4, "")
    );
  }
}
