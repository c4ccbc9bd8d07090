use std::{sync::Arc, time::Instant};

use log::{debug, error};

use crate::{
    CacheKey, CatalogEntry, CatalogIndex, CatalogRepository, CatalogSnapshot, CatalogVersion,
    ConfigError, EngineConfig, MatchContent, MatchHints, MatchResult, Matcher, Metrics,
    MetricsSnapshot, Placeholder, ResultCache, classification::classify,
};

/// Resolution engine: catalog index, matcher, result cache and telemetry behind one facade.
///
/// `R` supplies the catalog, `V` confirms that matched assets are reachable during batch
/// preloads.
pub struct Engine<R, V> {
    repository: R,
    pub(crate) validator: V,
    pub(crate) config: EngineConfig,
    pub(crate) matcher: Matcher,
    index: CatalogIndex,
    pub(crate) cache: ResultCache,
    pub(crate) metrics: Metrics,
}

impl<R, V> Engine<R, V> {
    pub fn new(repository: R, validator: V, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            repository,
            validator,
            matcher: Matcher::new(config.matcher),
            cache: ResultCache::new(config.cache_capacity, config.cache_shards),
            index: CatalogIndex::new(),
            metrics: Metrics::new(),
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogSnapshot> {
        self.index.snapshot()
    }

    #[must_use]
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Resolves a single name synchronously, consulting and filling the cache.
    #[must_use]
    pub fn resolve_one(&self, name: &str, hints: &MatchHints) -> MatchResult {
        let started = Instant::now();
        let key = CacheKey::new(name, hints);

        let result = if let Some(result) = self.cached(&key, name) {
            result
        } else {
            let result = self.compute(&key, name);
            self.cache.put(key, result.clone());
            result
        }
        .with_processing_time(started.elapsed());

        self.metrics.record(&result);
        result
    }

    /// Publishes `entries` as a new catalog version and drops every cached result.
    pub fn rebuild_from(&self, entries: Vec<CatalogEntry>) -> CatalogVersion {
        let version = self.publish(entries);
        self.metrics.record_rebuild(true);
        version
    }

    fn publish(&self, entries: Vec<CatalogEntry>) -> CatalogVersion {
        let version = self.index.rebuild(entries);
        self.cache.invalidate_all(version);
        version
    }

    pub(crate) fn cached(&self, key: &CacheKey, name: &str) -> Option<MatchResult> {
        match self.cache.get(key) {
            Some(result) if result.catalog_version == self.index.version() => {
                debug!("cache hit for \"{}\"", key.query);
                self.metrics.record_cache_hit();
                Some(retitle(result, name))
            }
            _ => {
                self.metrics.record_cache_miss();
                None
            }
        }
    }

    pub(crate) fn compute(&self, key: &CacheKey, name: &str) -> MatchResult {
        let snapshot = self.index.snapshot();
        self.matcher
            .resolve_normalized(&snapshot, &key.query, name, &key.hints)
    }

    /// Placeholder for a resolution that was abandoned or whose asset was rejected.
    pub(crate) fn fallback(&self, key: &CacheKey, name: &str) -> MatchResult {
        self.matcher
            .generated(name, classify(&key.query), self.index.version())
    }
}

impl<R: CatalogRepository, V> Engine<R, V> {
    /// Reloads the catalog from the repository.
    ///
    /// A failed load is logged and publishes an empty catalog, so every query resolves to a
    /// generated placeholder until a later rebuild succeeds.
    pub async fn rebuild(&self) -> CatalogVersion {
        match self.repository.read_catalog().await {
            Ok(entries) => self.rebuild_from(entries),
            Err(err) => {
                error!("failed to load catalog, continuing with an empty catalog: {err}");
                self.metrics.record_rebuild(false);
                self.publish(Vec::new())
            }
        }
    }
}

/// Cached placeholders carry the title of whichever raw name populated the cache.
pub(crate) fn retitle(mut result: MatchResult, name: &str) -> MatchResult {
    if let MatchContent::Placeholder(placeholder) = &result.content {
        result.content = MatchContent::Placeholder(Placeholder::new(name, placeholder.category));
    }
    result
}
