use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    sync::{Arc, PoisonError, RwLock},
};

use derive_more::{AsRef, Display};
use log::{info, warn};

use crate::{
    CatalogLoadError, EntryError, MovementCategory, NormalizedQuery, classification::classify,
    normalize,
};

#[allow(async_fn_in_trait)]
pub trait CatalogRepository {
    async fn read_catalog(&self) -> Result<Vec<CatalogEntry>, CatalogLoadError>;
}

#[derive(AsRef, Debug, Display, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryID(String);

impl From<&str> for EntryID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntryID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl EntryID {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// Reference to an animated demonstration, either a URL or a path relative to an asset root.
#[derive(AsRef, Debug, Display, Clone, Hash, PartialEq, Eq)]
pub struct AssetRef(String);

impl AssetRef {
    pub const PLACEHOLDER: &'static str = "placeholder:exercise";

    #[must_use]
    pub fn placeholder() -> Self {
        Self(Self::PLACEHOLDER.to_string())
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.0 == Self::PLACEHOLDER
    }

    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.0.starts_with("http://") || self.0.starts_with("https://")
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AssetRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: EntryID,
    pub name: String,
    pub aliases: BTreeSet<String>,
    pub muscles: BTreeSet<String>,
    pub equipment: BTreeSet<String>,
    pub asset: AssetRef,
    pub instructions: Vec<String>,
}

impl CatalogEntry {
    pub fn validate(&self) -> Result<(), EntryError> {
        if self.id.is_empty() {
            return Err(EntryError::EmptyID);
        }
        if normalize(&self.name).is_empty() {
            return Err(EntryError::EmptyName(self.id.clone()));
        }
        if self.asset.as_str().trim().is_empty() {
            return Err(EntryError::EmptyAsset(self.id.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Display, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct CatalogVersion(u64);

impl CatalogVersion {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for CatalogVersion {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

pub(crate) struct IndexedEntry {
    pub entry: Arc<CatalogEntry>,
    pub name: NormalizedQuery,
    pub aliases: Vec<NormalizedQuery>,
    pub muscles: BTreeSet<NormalizedQuery>,
    pub equipment: BTreeSet<NormalizedQuery>,
}

impl IndexedEntry {
    fn new(entry: CatalogEntry) -> Self {
        let name = normalize(&entry.name);
        let aliases = entry
            .aliases
            .iter()
            .map(|a| normalize(a))
            .filter(|a| !a.is_empty() && *a != name)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let muscles = entry
            .muscles
            .iter()
            .map(|m| normalize(m))
            .filter(|m| !m.is_empty())
            .collect();
        let equipment = entry
            .equipment
            .iter()
            .map(|e| normalize(e))
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            entry: Arc::new(entry),
            name,
            aliases,
            muscles,
            equipment,
        }
    }
}

/// Immutable, fully indexed view of one catalog version.
pub struct CatalogSnapshot {
    version: CatalogVersion,
    entries: Vec<IndexedEntry>,
    exact: HashMap<NormalizedQuery, usize>,
    representatives: BTreeMap<MovementCategory, usize>,
}

impl CatalogSnapshot {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            version: CatalogVersion::default(),
            entries: Vec::new(),
            exact: HashMap::new(),
            representatives: BTreeMap::new(),
        }
    }

    /// Builds the index. Invalid entries and duplicate IDs are skipped, entries are ordered by
    /// ID, canonical names take precedence over aliases and earlier IDs over later ones.
    #[must_use]
    pub fn build(version: CatalogVersion, entries: Vec<CatalogEntry>) -> Self {
        let mut ids = HashSet::new();
        let mut valid = Vec::with_capacity(entries.len());

        for entry in entries {
            if let Err(err) = entry.validate() {
                warn!("skipping catalog entry: {err}");
                continue;
            }
            if !ids.insert(entry.id.clone()) {
                warn!("skipping catalog entry: duplicate ID \"{}\"", entry.id);
                continue;
            }
            valid.push(entry);
        }

        valid.sort_by(|a, b| a.id.cmp(&b.id));

        let entries = valid.into_iter().map(IndexedEntry::new).collect::<Vec<_>>();
        let mut exact = HashMap::new();
        let mut representatives = BTreeMap::new();

        for (i, entry) in entries.iter().enumerate() {
            exact.entry(entry.name.clone()).or_insert(i);
            if let Some(category) = classify(&entry.name) {
                representatives.entry(category).or_insert(i);
            }
        }
        for (i, entry) in entries.iter().enumerate() {
            for alias in &entry.aliases {
                exact.entry(alias.clone()).or_insert(i);
            }
        }

        Self {
            version,
            entries,
            exact,
            representatives,
        }
    }

    #[must_use]
    pub fn version(&self) -> CatalogVersion {
        self.version
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn lookup_exact(&self, query: &NormalizedQuery) -> Option<&Arc<CatalogEntry>> {
        self.exact.get(query).map(|i| &self.entries[*i].entry)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Arc<CatalogEntry>> {
        self.entries.iter().map(|e| &e.entry)
    }

    /// Stand-in entry for a movement category: the first entry by ID whose name classifies into
    /// it.
    #[must_use]
    pub fn representative(&self, category: MovementCategory) -> Option<&Arc<CatalogEntry>> {
        self.representatives
            .get(&category)
            .map(|i| &self.entries[*i].entry)
    }

    pub(crate) fn indexed(&self) -> &[IndexedEntry] {
        &self.entries
    }
}

/// Shared catalog. Rebuilds publish a new snapshot atomically; readers keep the snapshot they
/// obtained until they drop it.
pub struct CatalogIndex {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogIndex {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(CatalogSnapshot::empty())),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn version(&self) -> CatalogVersion {
        self.snapshot().version()
    }

    #[must_use]
    pub fn lookup_exact(&self, query: &NormalizedQuery) -> Option<Arc<CatalogEntry>> {
        self.snapshot().lookup_exact(query).cloned()
    }

    #[must_use]
    pub fn all_entries(&self) -> Vec<Arc<CatalogEntry>> {
        self.snapshot().entries().cloned().collect()
    }

    /// Indexes `entries` off to the side and publishes them as the next version.
    pub fn rebuild(&self, entries: Vec<CatalogEntry>) -> CatalogVersion {
        let mut snapshot = CatalogSnapshot::build(CatalogVersion::default(), entries);
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        snapshot.version = current.version().next();
        let version = snapshot.version;
        info!(
            "published catalog version {version} with {} entries",
            snapshot.len()
        );
        *current = Arc::new(snapshot);
        version
    }
}

impl Default for CatalogIndex {
    fn default() -> Self {
        Self::new()
    }
}
