use std::{
    cmp::Ordering,
    collections::BTreeSet,
    sync::Arc,
    time::{Duration, Instant},
};

use log::{debug, trace};
use strum::{AsRefStr, Display, EnumIter};

use crate::{
    AssetRef, CatalogEntry, CatalogSnapshot, CatalogVersion, MatcherConfig, MovementCategory,
    NormalizedQuery,
    catalog::IndexedEntry,
    classification::{classify, classify_muscle_group},
    normalize,
};

/// Fallback strategies in the order they are tried.
#[derive(
    AsRefStr, Clone, Copy, Debug, Display, EnumIter, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
    Exact,
    Fuzzy,
    Semantic,
    Classification,
    Generated,
}

impl Tier {
    #[must_use]
    pub fn is_catalog_backed(self) -> bool {
        self != Tier::Generated
    }
}

#[derive(Debug, Default, Clone, Hash, PartialEq, Eq)]
pub struct MatchHints {
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
}

impl MatchHints {
    #[must_use]
    pub fn muscle_group(muscle_group: &str) -> Self {
        Self {
            muscle_group: Some(muscle_group.to_string()),
            equipment: None,
        }
    }

    #[must_use]
    pub fn equipment(equipment: &str) -> Self {
        Self {
            muscle_group: None,
            equipment: Some(equipment.to_string()),
        }
    }

    /// Fields missing here are taken from `fallback`.
    #[must_use]
    pub fn or(&self, fallback: &MatchHints) -> MatchHints {
        MatchHints {
            muscle_group: self
                .muscle_group
                .clone()
                .or_else(|| fallback.muscle_group.clone()),
            equipment: self.equipment.clone().or_else(|| fallback.equipment.clone()),
        }
    }

    #[must_use]
    pub fn normalized(&self) -> NormalizedHints {
        let normalize_hint = |hint: &Option<String>| {
            hint.as_deref()
                .map(normalize)
                .filter(|h| !h.is_empty())
        };
        NormalizedHints {
            muscle_group: normalize_hint(&self.muscle_group),
            equipment: normalize_hint(&self.equipment),
        }
    }
}

#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NormalizedHints {
    pub muscle_group: Option<NormalizedQuery>,
    pub equipment: Option<NormalizedQuery>,
}

impl NormalizedHints {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.muscle_group.is_none() && self.equipment.is_none()
    }

    fn admits(&self, entry: &IndexedEntry) -> bool {
        self.muscle_group
            .as_ref()
            .is_some_and(|m| entry.muscles.contains(m))
            || self
                .equipment
                .as_ref()
                .is_some_and(|e| entry.equipment.contains(e))
    }
}

/// Synthesized content for a query no catalog entry covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub title: String,
    pub asset: AssetRef,
    pub category: Option<MovementCategory>,
    pub instructions: Vec<String>,
}

impl Placeholder {
    #[must_use]
    pub fn new(raw_name: &str, category: Option<MovementCategory>) -> Self {
        let title = raw_name.split_whitespace().collect::<Vec<_>>().join(" ");
        let title = if title.is_empty() {
            "Exercise".to_string()
        } else {
            title
        };
        Self {
            instructions: vec![
                format!("Set up for {title} in a stable, balanced position."),
                "Brace your core and keep a neutral spine throughout the movement.".to_string(),
                "Move through a controlled, pain-free range of motion.".to_string(),
                "Breathe out during the effort and in during the return.".to_string(),
                "Stop if you feel sharp pain and ask a trainer for guidance.".to_string(),
            ],
            title,
            asset: AssetRef::placeholder(),
            category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchContent {
    Catalog(Arc<CatalogEntry>),
    Placeholder(Placeholder),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub tier: Tier,
    pub confidence: f64,
    pub content: MatchContent,
    pub processing_time_ms: u64,
    pub catalog_version: CatalogVersion,
}

impl MatchResult {
    #[must_use]
    pub fn entry(&self) -> Option<&Arc<CatalogEntry>> {
        match &self.content {
            MatchContent::Catalog(entry) => Some(entry),
            MatchContent::Placeholder(_) => None,
        }
    }

    #[must_use]
    pub fn placeholder(&self) -> Option<&Placeholder> {
        match &self.content {
            MatchContent::Catalog(_) => None,
            MatchContent::Placeholder(placeholder) => Some(placeholder),
        }
    }

    #[must_use]
    pub fn asset(&self) -> &AssetRef {
        match &self.content {
            MatchContent::Catalog(entry) => &entry.asset,
            MatchContent::Placeholder(placeholder) => &placeholder.asset,
        }
    }

    /// Tier, confidence and content, ignoring timing.
    #[must_use]
    pub fn same_match(&self, other: &MatchResult) -> bool {
        self.tier == other.tier
            && self.confidence.to_bits() == other.confidence.to_bits()
            && self.content == other.content
    }

    #[must_use]
    pub fn with_processing_time(mut self, elapsed: Duration) -> Self {
        self.processing_time_ms = millis(elapsed);
        self
    }
}

pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Similarity in [0, 1]: the better of the normalized Levenshtein ratio over the whole
/// string and the Dice coefficient over the token sets.
#[must_use]
pub fn similarity(a: &NormalizedQuery, b: &NormalizedQuery) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let characters = strsim::normalized_levenshtein(a.as_str(), b.as_str());

    let a_tokens = a.tokens().collect::<BTreeSet<_>>();
    let b_tokens = b.tokens().collect::<BTreeSet<_>>();
    let shared = a_tokens.intersection(&b_tokens).count();
    #[allow(clippy::cast_precision_loss)]
    let tokens = (2 * shared) as f64 / (a_tokens.len() + b_tokens.len()) as f64;

    characters.max(tokens)
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    score: f64,
    canonical: bool,
}

impl Candidate {
    fn score(index: usize, entry: &IndexedEntry, query: &NormalizedQuery) -> Self {
        let canonical = similarity(query, &entry.name);
        let alias = entry
            .aliases
            .iter()
            .map(|a| similarity(query, a))
            .fold(0.0, f64::max);

        if canonical >= alias {
            Self {
                index,
                score: canonical,
                canonical: true,
            }
        } else {
            Self {
                index,
                score: alias,
                canonical: false,
            }
        }
    }

    /// Higher score wins, then a canonical-name hit, then the smaller entry ID (entries are
    /// indexed in ID order).
    fn precedence(&self, other: &Candidate) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then(self.canonical.cmp(&other.canonical))
            .then(other.index.cmp(&self.index))
    }
}

fn best_candidate<'a>(
    entries: impl Iterator<Item = (usize, &'a IndexedEntry)>,
    query: &NormalizedQuery,
) -> Option<Candidate> {
    entries
        .map(|(i, entry)| Candidate::score(i, entry, query))
        .max_by(Candidate::precedence)
}

/// Resolves free-text names against a catalog snapshot. Pure and synchronous; never fails.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatcherConfig,
}

impl Matcher {
    #[must_use]
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    #[must_use]
    pub fn resolve(
        &self,
        snapshot: &CatalogSnapshot,
        raw_name: &str,
        hints: &MatchHints,
    ) -> MatchResult {
        let started = Instant::now();
        let query = normalize(raw_name);
        let result = self.resolve_normalized(snapshot, &query, raw_name, &hints.normalized());
        result.with_processing_time(started.elapsed())
    }

    #[must_use]
    pub fn resolve_normalized(
        &self,
        snapshot: &CatalogSnapshot,
        query: &NormalizedQuery,
        raw_name: &str,
        hints: &NormalizedHints,
    ) -> MatchResult {
        let version = snapshot.version();

        if query.is_empty() {
            debug!("empty query for {raw_name:?}");
            return self.generated(raw_name, None, version);
        }

        if let Some(entry) = snapshot.lookup_exact(query) {
            trace!("exact match for \"{query}\": {}", entry.id);
            return catalog_result(Tier::Exact, 1.0, entry, version);
        }

        if let Some(result) = self.fuzzy(snapshot, query) {
            return result;
        }

        if let Some(result) = self.semantic(snapshot, query, hints) {
            return result;
        }

        let category = classify(query).or_else(|| {
            hints
                .muscle_group
                .as_ref()
                .and_then(classify_muscle_group)
        });

        if let Some(entry) = category.and_then(|c| snapshot.representative(c)) {
            debug!(
                "classified \"{query}\" as {}, substituting {}",
                category.map_or_else(String::new, |c| c.to_string()),
                entry.id
            );
            return catalog_result(
                Tier::Classification,
                self.config.classification_confidence,
                entry,
                version,
            );
        }

        debug!("no catalog match for \"{query}\"");
        self.generated(raw_name, category, version)
    }

    fn fuzzy(&self, snapshot: &CatalogSnapshot, query: &NormalizedQuery) -> Option<MatchResult> {
        let candidate = best_candidate(snapshot.indexed().iter().enumerate(), query)?;
        if candidate.score < self.config.fuzzy_threshold {
            return None;
        }

        let entry = &snapshot.indexed()[candidate.index].entry;
        trace!(
            "fuzzy match for \"{query}\": {} ({:.3})",
            entry.id, candidate.score
        );
        Some(catalog_result(Tier::Fuzzy, candidate.score, entry, snapshot.version()))
    }

    fn semantic(
        &self,
        snapshot: &CatalogSnapshot,
        query: &NormalizedQuery,
        hints: &NormalizedHints,
    ) -> Option<MatchResult> {
        if hints.is_empty() {
            return None;
        }

        let candidate = best_candidate(
            snapshot
                .indexed()
                .iter()
                .enumerate()
                .filter(|(_, entry)| hints.admits(entry)),
            query,
        )?;
        if candidate.score < self.config.semantic_threshold {
            return None;
        }

        let entry = &snapshot.indexed()[candidate.index].entry;
        trace!(
            "semantic match for \"{query}\": {} ({:.3})",
            entry.id, candidate.score
        );
        Some(catalog_result(
            Tier::Semantic,
            candidate.score * self.config.semantic_penalty,
            entry,
            snapshot.version(),
        ))
    }

    /// Placeholder result; also used by callers for abandoned or rejected resolutions.
    #[must_use]
    pub fn generated(
        &self,
        raw_name: &str,
        category: Option<MovementCategory>,
        version: CatalogVersion,
    ) -> MatchResult {
        MatchResult {
            tier: Tier::Generated,
            confidence: self.config.generated_confidence,
            content: MatchContent::Placeholder(Placeholder::new(raw_name, category)),
            processing_time_ms: 0,
            catalog_version: version,
        }
    }
}

fn catalog_result(
    tier: Tier,
    confidence: f64,
    entry: &Arc<CatalogEntry>,
    version: CatalogVersion,
) -> MatchResult {
    MatchResult {
        tier,
        confidence: confidence.clamp(0.0, 1.0),
        content: MatchContent::Catalog(Arc::clone(entry)),
        processing_time_ms: 0,
        catalog_version: version,
    }
}
