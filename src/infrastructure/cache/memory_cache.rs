//! In-process listing cache, used when no Redis is configured.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::domain::invoice::{CacheLookup, CacheStamp, ListingCache};

struct Entry {
  html: String,
  expires_at: Instant,
}

/// Renders of one path. The generation survives invalidation so stamps
/// taken before it can be told apart.
#[derive(Default)]
struct PathEntries {
  generation: u64,
  variants: HashMap<String, Entry>,
}

/// Rendered views keyed by path, then by variant
#[derive(Clone)]
pub struct InMemoryListingCache {
  entries: Arc<RwLock<HashMap<String, PathEntries>>>,
  ttl: Duration,
}

impl InMemoryListingCache {
  pub fn new(ttl: Duration) -> Self {
    Self {
      entries: Arc::new(RwLock::new(HashMap::new())),
      ttl,
    }
  }

  #[cfg(test)]
  fn len(&self, path: &str) -> usize {
    self
      .entries
      .read()
      .unwrap()
      .get(path)
      .map_or(0, |entries| entries.variants.len())
  }
}

#[async_trait]
impl ListingCache for InMemoryListingCache {
  async fn get(&self, path: &str, variant: &str) -> CacheLookup {
    let entries = match self.entries.read() {
      Ok(entries) => entries,
      Err(e) => {
        tracing::warn!("Listing cache lock poisoned: {}", e);
        return CacheLookup::Miss(None);
      }
    };

    let Some(path_entries) = entries.get(path) else {
      return CacheLookup::Miss(Some(CacheStamp(0)));
    };

    match path_entries
      .variants
      .get(variant)
      .filter(|entry| entry.expires_at > Instant::now())
    {
      Some(entry) => CacheLookup::Hit(entry.html.clone()),
      None => CacheLookup::Miss(Some(CacheStamp(path_entries.generation))),
    }
  }

  async fn put(&self, path: &str, variant: &str, stamp: CacheStamp, html: String) {
    let mut entries = match self.entries.write() {
      Ok(entries) => entries,
      Err(e) => {
        tracing::warn!("Listing cache lock poisoned: {}", e);
        return;
      }
    };

    let path_entries = entries.entry(path.to_string()).or_default();
    if path_entries.generation != stamp.0 {
      tracing::debug!("Skipping render of {} from an invalidated generation", path);
      return;
    }

    let now = Instant::now();
    path_entries.variants.retain(|_, entry| entry.expires_at > now);
    path_entries.variants.insert(
      variant.to_string(),
      Entry {
        html,
        expires_at: now + self.ttl,
      },
    );
  }

  async fn invalidate(&self, path: &str) {
    match self.entries.write() {
      Ok(mut entries) => {
        let path_entries = entries.entry(path.to_string()).or_default();
        path_entries.generation += 1;
        let dropped = path_entries.variants.len();
        path_entries.variants.clear();
        tracing::debug!("Invalidated {} cached renders of {}", dropped, path);
      }
      Err(e) => tracing::warn!("Listing cache lock poisoned: {}", e),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  async fn stamp(cache: &InMemoryListingCache, path: &str, variant: &str) -> CacheStamp {
    match cache.get(path, variant).await {
      CacheLookup::Miss(Some(stamp)) => stamp,
      other => panic!("expected a miss with a stamp, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_put_get_invalidate() {
    let cache = InMemoryListingCache::new(Duration::from_secs(60));

    let s = stamp(&cache, "/dashboard/invoices", "page=1").await;
    cache
      .put("/dashboard/invoices", "page=1", s, "<table/>".to_string())
      .await;
    cache
      .put("/dashboard/invoices", "page=2", s, "<p/>".to_string())
      .await;
    let s = stamp(&cache, "/other", "").await;
    cache.put("/other", "", s, "kept".to_string()).await;

    assert_eq!(
      cache.get("/dashboard/invoices", "page=1").await,
      CacheLookup::Hit("<table/>".to_string())
    );
    assert!(matches!(
      cache.get("/dashboard/invoices", "page=3").await,
      CacheLookup::Miss(Some(_))
    ));

    cache.invalidate("/dashboard/invoices").await;

    assert!(matches!(
      cache.get("/dashboard/invoices", "page=1").await,
      CacheLookup::Miss(_)
    ));
    assert!(matches!(
      cache.get("/dashboard/invoices", "page=2").await,
      CacheLookup::Miss(_)
    ));
    assert_eq!(
      cache.get("/other", "").await,
      CacheLookup::Hit("kept".to_string())
    );
  }

  #[tokio::test]
  async fn test_render_from_before_invalidation_is_not_stored() {
    let cache = InMemoryListingCache::new(Duration::from_secs(60));

    let before = stamp(&cache, "/dashboard/invoices", "page=1").await;
    cache.invalidate("/dashboard/invoices").await;
    cache
      .put("/dashboard/invoices", "page=1", before, "<old rows>".to_string())
      .await;

    let after = stamp(&cache, "/dashboard/invoices", "page=1").await;
    assert_ne!(before, after);

    cache
      .put("/dashboard/invoices", "page=1", after, "<new rows>".to_string())
      .await;
    assert_eq!(
      cache.get("/dashboard/invoices", "page=1").await,
      CacheLookup::Hit("<new rows>".to_string())
    );
  }

  #[tokio::test]
  async fn test_expired_entries_are_misses() {
    let cache = InMemoryListingCache::new(Duration::ZERO);

    let s = stamp(&cache, "/dashboard/invoices", "").await;
    cache
      .put("/dashboard/invoices", "", s, "stale".to_string())
      .await;

    assert!(matches!(
      cache.get("/dashboard/invoices", "").await,
      CacheLookup::Miss(Some(_))
    ));
  }

  #[tokio::test]
  async fn test_expired_entries_are_pruned_on_put() {
    let cache = InMemoryListingCache::new(Duration::ZERO);

    for i in 0..100 {
      let variant = format!("query={}&page=1", i);
      let s = stamp(&cache, "/dashboard/invoices", &variant).await;
      cache
        .put("/dashboard/invoices", &variant, s, "<table/>".to_string())
        .await;
    }

    assert!(cache.len("/dashboard/invoices") <= 1);
  }

  #[tokio::test]
  async fn test_invalidating_unknown_path() {
    let cache = InMemoryListingCache::new(Duration::from_secs(60));
    cache.invalidate("/dashboard/invoices").await;
    assert!(matches!(
      cache.get("/dashboard/invoices", "").await,
      CacheLookup::Miss(Some(CacheStamp(1)))
    ));
  }
}
