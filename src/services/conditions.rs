//! Weather condition catalog.
//!
//! A read-only table of `{code, day, night}` descriptions, fetched once per
//! process and shared by every request through `ConditionStore`.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::services::weather_api::WeatherApiClient;

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherCondition {
    pub code: i64,
    pub day: String,
    pub night: String,
}

/// Lookup table keyed by condition code.
#[derive(Debug, Clone, Default)]
pub struct ConditionCatalog {
    by_code: HashMap<i64, WeatherCondition>,
}

impl ConditionCatalog {
    /// Build a catalog. On duplicate codes the first entry wins.
    pub fn new(conditions: Vec<WeatherCondition>) -> Self {
        let mut by_code = HashMap::with_capacity(conditions.len());
        for condition in conditions {
            by_code.entry(condition.code).or_insert(condition);
        }
        Self { by_code }
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// Look up a code. A miss is logged and returns `None`.
    pub fn lookup(&self, code: i64) -> Option<&WeatherCondition> {
        let found = self.by_code.get(&code);
        if found.is_none() {
            tracing::debug!("No weather condition found with code: {}", code);
        }
        found
    }

    /// "It will be <day> during the day and <night> at night."
    pub fn describe(&self, code: i64) -> Option<String> {
        self.lookup(code).map(|c| {
            format!(
                "It will be {} during the day and {} at night.",
                c.day, c.night
            )
        })
    }
}

/// Process-wide, lazily loaded catalog.
#[derive(Debug, Clone, Default)]
pub struct ConditionStore {
    inner: Arc<RwLock<Option<Arc<ConditionCatalog>>>>,
    warming: Arc<AtomicBool>,
}

impl ConditionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_loaded(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Start loading the catalog in the background and return immediately.
    /// At most one background load runs at a time.
    pub fn warm(&self, client: &WeatherApiClient) {
        if self.warming.swap(true, Ordering::AcqRel) {
            return;
        }
        let store = self.clone();
        let client = client.clone();
        tokio::spawn(async move {
            store.get_or_load(&client).await;
            store.warming.store(false, Ordering::Release);
        });
    }

    /// Return the cached catalog, fetching it on first use.
    ///
    /// The fetch runs without holding the lock. A failed fetch is logged and
    /// yields an empty catalog that is not cached, so the next caller tries
    /// again.
    pub async fn get_or_load(&self, client: &WeatherApiClient) -> Arc<ConditionCatalog> {
        if let Some(catalog) = self.inner.read().await.as_ref() {
            return catalog.clone();
        }

        match client.fetch_condition_catalog().await {
            Ok(conditions) => {
                let catalog = Arc::new(ConditionCatalog::new(conditions));
                let mut slot = self.inner.write().await;
                // A concurrent load may have landed first; keep that one
                if let Some(existing) = slot.as_ref() {
                    return existing.clone();
                }
                tracing::info!("Loaded {} weather conditions", catalog.len());
                *slot = Some(catalog.clone());
                catalog
            }
            Err(e) => {
                tracing::warn!("Failed to load weather condition catalog: {}", e);
                Arc::new(ConditionCatalog::default())
            }
        }
    }
}
