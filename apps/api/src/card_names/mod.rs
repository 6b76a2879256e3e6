//! Card-name dictionary with an explicit TTL cache.
//!
//! The dictionary maps card ids to localized name values (see `i18n`). It is held
//! in `AppState` as a `CardNameCache` rather than module-level state so tests can
//! build isolated caches over fake sources.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::i18n::{resolve_localized, Language};

pub mod handlers;

pub type CardNames = HashMap<String, Value>;

#[derive(Debug, Error)]
pub enum CardNameError {
    #[error("failed to read card names from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("card names file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("card names source did not return a JSON object")]
    NotAnObject,
}

/// Where the dictionary is loaded from.
#[async_trait]
pub trait CardNameSource: Send + Sync {
    async fn load(&self) -> Result<CardNames, CardNameError>;
}

/// Reads `{ "<card_id>": <localized name>, ... }` from a JSON file.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CardNameSource for JsonFileSource {
    async fn load(&self) -> Result<CardNames, CardNameError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CardNameError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map.into_iter().collect()),
            _ => Err(CardNameError::NotAnObject),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cache
// ────────────────────────────────────────────────────────────────────────────

/// One loaded snapshot of the dictionary.
#[derive(Debug, Clone)]
pub struct CachedNames {
    pub value: Arc<CardNames>,
    pub loaded_at: DateTime<Utc>,
}

pub struct CardNameCache {
    source: Arc<dyn CardNameSource>,
    ttl: Duration,
    entry: RwLock<Option<CachedNames>>,
}

impl CardNameCache {
    pub fn new(source: Arc<dyn CardNameSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Returns the dictionary, reloading it when missing or older than the TTL.
    ///
    /// If a reload fails but an older snapshot exists, the stale snapshot is served.
    pub async fn names(&self) -> Result<Arc<CardNames>, CardNameError> {
        if let Some(cached) = self.entry.read().await.as_ref() {
            if !self.is_stale(cached) {
                return Ok(Arc::clone(&cached.value));
            }
        }

        let mut entry = self.entry.write().await;

        // Another task may have refreshed while we waited for the write lock.
        if let Some(cached) = entry.as_ref() {
            if !self.is_stale(cached) {
                return Ok(Arc::clone(&cached.value));
            }
        }

        match self.source.load().await {
            Ok(names) => {
                info!(count = names.len(), "card names loaded");
                let value = Arc::new(names);
                *entry = Some(CachedNames {
                    value: Arc::clone(&value),
                    loaded_at: Utc::now(),
                });
                Ok(value)
            }
            Err(e) => match entry.as_ref() {
                Some(stale) => {
                    warn!(
                        error = %e,
                        loaded_at = %stale.loaded_at,
                        "card name reload failed, serving stale names"
                    );
                    Ok(Arc::clone(&stale.value))
                }
                None => Err(e),
            },
        }
    }

    /// Resolves the display name of `card_id` in `lang`.
    pub async fn lookup(
        &self,
        card_id: &str,
        lang: Language,
    ) -> Result<Option<String>, CardNameError> {
        let names = self.names().await?;
        Ok(names
            .get(card_id)
            .and_then(|value| resolve_localized(value, lang)))
    }

    /// Drops the cached snapshot so the next call reloads.
    pub async fn invalidate(&self) {
        *self.entry.write().await = None;
    }

    fn is_stale(&self, cached: &CachedNames) -> bool {
        Utc::now() - cached.loaded_at >= self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a fixed dictionary and counts loads. Fails every load after `fail_after`.
    struct FakeSource {
        loads: AtomicUsize,
        fail_after: usize,
    }

    impl FakeSource {
        fn new(fail_after: usize) -> Arc<Self> {
            Arc::new(Self {
                loads: AtomicUsize::new(0),
                fail_after,
            })
        }

        fn load_count(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CardNameSource for FakeSource {
        async fn load(&self) -> Result<CardNames, CardNameError> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst);
            if n >= self.fail_after {
                return Err(CardNameError::NotAnObject);
            }
            let mut names = CardNames::new();
            names.insert(
                "A1-094".to_string(),
                json!({"ja": "ピカチュウ", "en": "Pikachu"}),
            );
            Ok(names)
        }
    }

    #[tokio::test]
    async fn test_fresh_cache_loads_once() {
        let source = FakeSource::new(usize::MAX);
        let cache = CardNameCache::new(source.clone(), Duration::hours(1));

        cache.names().await.unwrap();
        cache.names().await.unwrap();
        assert_eq!(source.load_count(), 1);
    }

    #[tokio::test]
    async fn test_expired_cache_reloads() {
        let source = FakeSource::new(usize::MAX);
        let cache = CardNameCache::new(source.clone(), Duration::zero());

        cache.names().await.unwrap();
        cache.names().await.unwrap();
        assert_eq!(source.load_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_reload_serves_stale_names() {
        let source = FakeSource::new(1);
        let cache = CardNameCache::new(source.clone(), Duration::zero());

        cache.names().await.unwrap();
        let names = cache.names().await.unwrap();
        assert!(names.contains_key("A1-094"));
        assert_eq!(source.load_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_first_load_is_an_error() {
        let source = FakeSource::new(0);
        let cache = CardNameCache::new(source, Duration::hours(1));
        assert!(cache.names().await.is_err());
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let source = FakeSource::new(usize::MAX);
        let cache = CardNameCache::new(source.clone(), Duration::hours(1));

        cache.names().await.unwrap();
        cache.invalidate().await;
        cache.names().await.unwrap();
        assert_eq!(source.load_count(), 2);
    }

    #[tokio::test]
    async fn test_lookup_resolves_language() {
        let cache = CardNameCache::new(FakeSource::new(usize::MAX), Duration::hours(1));
        assert_eq!(
            cache.lookup("A1-094", Language::En).await.unwrap(),
            Some("Pikachu".to_string())
        );
        assert_eq!(
            cache.lookup("A1-094", Language::Ko).await.unwrap(),
            Some("Pikachu".to_string())
        );
        assert_eq!(cache.lookup("missing", Language::En).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_json_file_source_reads_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"A1-001": {{"en": "Bulbasaur"}}, "P-A-001": "Potion"}}"#).unwrap();

        let names = JsonFileSource::new(file.path()).load().await.unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names["P-A-001"], json!("Potion"));
    }

    #[tokio::test]
    async fn test_json_file_source_rejects_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();

        let result = JsonFileSource::new(file.path()).load().await;
        assert!(matches!(result, Err(CardNameError::NotAnObject)));
    }

    #[tokio::test]
    async fn test_json_file_source_missing_file() {
        let result = JsonFileSource::new("/nonexistent/card_names.json").load().await;
        assert!(matches!(result, Err(CardNameError::Io { .. })));
    }
}
