//! Pricing catalog snapshot caching using Moka.
//!
//! Resolution reads the catalog on every request; the snapshot is reloaded
//! from the store when its TTL expires or after a write through this cache.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use super::catalog::PricingCatalog;
use super::types::{MembershipFeeRecord, PricingConfigRecord};
use crate::store::{PricingCatalogStore, StoreError};

/// Default time-to-live for the snapshot (1 minute).
pub const DEFAULT_TTL_SECS: u64 = 60;

/// Caches the current catalog snapshot in front of a store.
#[derive(Clone)]
pub struct CatalogCache {
    source: Arc<dyn PricingCatalogStore>,
    cache: Cache<(), Arc<PricingCatalog>>,
}

impl CatalogCache {
    /// Creates a cache with the given TTL.
    #[must_use]
    pub fn new(source: Arc<dyn PricingCatalogStore>, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { source, cache }
    }

    /// Creates a cache with the default TTL.
    #[must_use]
    pub fn with_default_ttl(source: Arc<dyn PricingCatalogStore>) -> Self {
        Self::new(source, Duration::from_secs(DEFAULT_TTL_SECS))
    }

    /// Returns the current snapshot, loading it on a miss.
    ///
    /// Concurrent misses share a single load.
    pub async fn snapshot(&self) -> Result<Arc<PricingCatalog>, StoreError> {
        let source = Arc::clone(&self.source);
        self.cache
            .try_get_with((), async move { source.load_catalog().await.map(Arc::new) })
            .await
            .map_err(|e| (*e).clone())
    }

    /// Writes a pricing record against the catalog version it was checked
    /// against and drops the cached snapshot.
    pub async fn insert_pricing_config(
        &self,
        record: &PricingConfigRecord,
        expected_version: u64,
    ) -> Result<(), StoreError> {
        let result = self.source.insert_pricing_config(record, expected_version).await;
        self.invalidate().await;
        result
    }

    /// Writes a membership fee record and drops the cached snapshot.
    pub async fn insert_membership_fee(
        &self,
        record: &MembershipFeeRecord,
        expected_version: u64,
    ) -> Result<(), StoreError> {
        let result = self.source.insert_membership_fee(record, expected_version).await;
        self.invalidate().await;
        result
    }

    /// Drops the cached snapshot.
    pub async fn invalidate(&self) {
        self.cache.invalidate(&()).await;
    }
}
