use std::{
    collections::{BTreeMap, HashMap},
    hash::{BuildHasher, RandomState},
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Instant,
};

use log::debug;

use crate::{
    CatalogVersion, MatchHints, MatchResult, NormalizedHints, NormalizedQuery, normalize,
};

/// Cache key: the normalized name plus the normalized hints, since hints can change the
/// semantic and classification tiers.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct CacheKey {
    pub query: NormalizedQuery,
    pub hints: NormalizedHints,
}

impl CacheKey {
    #[must_use]
    pub fn new(raw_name: &str, hints: &MatchHints) -> Self {
        Self {
            query: normalize(raw_name),
            hints: hints.normalized(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub result: MatchResult,
    pub inserted_at: Instant,
}

#[derive(Default)]
struct Shard {
    entries: HashMap<CacheKey, (CacheEntry, u64)>,
    recency: BTreeMap<u64, CacheKey>,
    tick: u64,
}

impl Shard {
    fn touch(&mut self, key: &CacheKey) -> Option<&CacheEntry> {
        self.tick += 1;
        let tick = self.tick;
        let (entry, last_used) = self.entries.get_mut(key)?;
        self.recency.remove(&*last_used);
        self.recency.insert(tick, key.clone());
        *last_used = tick;
        Some(entry)
    }

    fn remove(&mut self, key: &CacheKey) {
        if let Some((_, last_used)) = self.entries.remove(key) {
            self.recency.remove(&last_used);
        }
    }

    fn insert(&mut self, entry: CacheEntry, capacity: usize) {
        self.remove(&entry.key);
        self.tick += 1;
        self.recency.insert(self.tick, entry.key.clone());
        self.entries.insert(entry.key.clone(), (entry, self.tick));

        while self.entries.len() > capacity {
            let Some((_, oldest)) = self.recency.pop_first() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }
}

/// Bounded LRU of match results, split into independently locked shards.
///
/// Every entry is stamped with the catalog version of its result. Lookups only return entries
/// of the current version, so a result computed against a replaced catalog is never served,
/// even if it was stored after `invalidate_all`.
pub struct ResultCache {
    shards: Vec<Mutex<Shard>>,
    shard_capacity: usize,
    version: AtomicU64,
    hasher: RandomState,
}

impl ResultCache {
    #[must_use]
    pub fn new(capacity: usize, shards: usize) -> Self {
        let shards = shards.clamp(1, capacity.max(1));
        Self {
            shards: (0..shards).map(|_| Mutex::new(Shard::default())).collect(),
            shard_capacity: capacity.max(1).div_ceil(shards),
            version: AtomicU64::new(CatalogVersion::default().value()),
            hasher: RandomState::new(),
        }
    }

    #[must_use]
    pub fn version(&self) -> CatalogVersion {
        self.version.load(Ordering::Acquire).into()
    }

    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<MatchResult> {
        let version = self.version();
        let mut shard = self.shard(key);
        let entry = shard.touch(key)?;

        if entry.result.catalog_version == version {
            return Some(entry.result.clone());
        }

        shard.remove(key);
        None
    }

    /// Stores `result` unless it was computed against an older catalog than the current one.
    pub fn put(&self, key: CacheKey, result: MatchResult) {
        if result.catalog_version < self.version() {
            debug!(
                "dropping stale result for \"{}\" (version {} < {})",
                key.query,
                result.catalog_version,
                self.version()
            );
            return;
        }

        let capacity = self.shard_capacity;
        self.shard(&key).insert(
            CacheEntry {
                key,
                result,
                inserted_at: Instant::now(),
            },
            capacity,
        );
    }

    /// Drops all entries and only accepts results of `version` or newer from now on.
    pub fn invalidate_all(&self, version: CatalogVersion) {
        self.version.fetch_max(version.value(), Ordering::AcqRel);
        for shard in &self.shards {
            shard.lock().unwrap_or_else(PoisonError::into_inner).clear();
        }
        debug!("invalidated result cache for catalog version {version}");
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.lock().unwrap_or_else(PoisonError::into_inner).entries.len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shard_capacity * self.shards.len()
    }

    /// Entry including its insertion time, without affecting recency.
    #[must_use]
    pub fn peek(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.shard(key).entries.get(key).map(|(e, _)| e.clone())
    }

    fn shard(&self, key: &CacheKey) -> std::sync::MutexGuard<'_, Shard> {
        #[allow(clippy::cast_possible_truncation)]
        let index = (self.hasher.hash_one(key) % self.shards.len() as u64) as usize;
        self.shards[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
