use std::{collections::HashMap, time::Instant};

use futures_util::future::join_all;
use log::{info, warn};
use tokio::{
    sync::Semaphore,
    time::{self, timeout, timeout_at},
};

use crate::{
    AssetRef, CacheKey, Engine, MatchHints, MatchResult, Tier, matcher::millis, service::retitle,
};

#[allow(async_fn_in_trait)]
pub trait AssetValidator {
    async fn asset_exists(&self, asset: &AssetRef) -> bool;
}

/// One exercise of a workout as it arrives from a plan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkoutExercise {
    pub name: String,
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
}

impl WorkoutExercise {
    #[must_use]
    pub fn hints(&self) -> MatchHints {
        MatchHints {
            muscle_group: self.muscle_group.clone(),
            equipment: self.equipment.clone(),
        }
    }
}

impl From<&str> for WorkoutExercise {
    fn from(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    /// One result per input exercise, in input order.
    pub results: Vec<MatchResult>,
    pub elapsed_ms: u64,
    pub generated: usize,
    pub timed_out: usize,
}

impl BatchResult {
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

enum Outcome {
    Resolved(MatchResult),
    TimedOut,
}

impl<R, V: AssetValidator> Engine<R, V> {
    /// Resolves all exercises of a workout concurrently.
    ///
    /// At most `max_concurrency` resolutions run at once and exercises sharing a cache key are
    /// resolved once. An exercise that does not finish within `item_timeout` or before the
    /// batch deadline is answered with a generated placeholder, so the batch always completes
    /// within `batch_timeout` (plus scheduling slack). Per-exercise hints take precedence over
    /// `workout_hints`.
    pub async fn preload_workout(
        &self,
        exercises: &[WorkoutExercise],
        workout_hints: &MatchHints,
    ) -> BatchResult {
        let started = Instant::now();
        let deadline = time::Instant::now() + self.config.batch_timeout;
        let permits = Semaphore::new(self.config.max_concurrency);

        let mut unique: Vec<(CacheKey, &str)> = vec![];
        let mut slots = Vec::with_capacity(exercises.len());
        let mut positions = HashMap::new();
        for exercise in exercises {
            let key = CacheKey::new(&exercise.name, &exercise.hints().or(workout_hints));
            let slot = *positions.entry(key.clone()).or_insert_with(|| {
                unique.push((key, exercise.name.as_str()));
                unique.len() - 1
            });
            slots.push(slot);
        }

        let outcomes = join_all(
            unique
                .iter()
                .map(|(key, name)| self.preload_one(key, name, &permits, deadline)),
        )
        .await;

        let mut timed_out = 0;
        let results = slots
            .into_iter()
            .zip(exercises)
            .map(|(slot, exercise)| {
                let result = match &outcomes[slot] {
                    Outcome::Resolved(result) => retitle(result.clone(), &exercise.name),
                    Outcome::TimedOut => {
                        timed_out += 1;
                        self.metrics.record_timeout();
                        self.fallback(&unique[slot].0, &exercise.name)
                            .with_processing_time(started.elapsed())
                    }
                };
                self.metrics.record(&result);
                result
            })
            .collect::<Vec<_>>();

        let batch = BatchResult {
            generated: results.iter().filter(|r| r.tier == Tier::Generated).count(),
            elapsed_ms: millis(started.elapsed()),
            timed_out,
            results,
        };

        info!(
            "preloaded {} exercises ({} distinct) in {} ms, {} generated, {} timed out",
            batch.len(),
            unique.len(),
            batch.elapsed_ms,
            batch.generated,
            batch.timed_out
        );

        batch
    }

    async fn preload_one(
        &self,
        key: &CacheKey,
        name: &str,
        permits: &Semaphore,
        deadline: time::Instant,
    ) -> Outcome {
        let started = Instant::now();

        let resolution = async {
            let Ok(_permit) = permits.acquire().await else {
                return Outcome::TimedOut;
            };

            if let Some(result) = self.cached(key, name) {
                return Outcome::Resolved(result.with_processing_time(started.elapsed()));
            }

            let result = self.compute(key, name);

            if !self.config.validate_assets || !result.tier.is_catalog_backed() {
                self.cache.put(key.clone(), result.clone());
                return Outcome::Resolved(result.with_processing_time(started.elapsed()));
            }

            match timeout(
                self.config.item_timeout,
                self.validator.asset_exists(result.asset()),
            )
            .await
            {
                Ok(true) => {
                    self.cache.put(key.clone(), result.clone());
                    Outcome::Resolved(result.with_processing_time(started.elapsed()))
                }
                Ok(false) => {
                    warn!(
                        "asset {} for \"{name}\" is unavailable, using placeholder",
                        result.asset()
                    );
                    self.metrics.record_validation_failure();
                    Outcome::Resolved(
                        self.fallback(key, name)
                            .with_processing_time(started.elapsed()),
                    )
                }
                Err(_) => {
                    warn!(
                        "validating asset {} for \"{name}\" exceeded {} ms",
                        result.asset(),
                        millis(self.config.item_timeout)
                    );
                    Outcome::TimedOut
                }
            }
        };

        timeout_at(deadline, resolution).await.unwrap_or_else(|_| {
            warn!("resolution of \"{name}\" missed the batch deadline");
            Outcome::TimedOut
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        CatalogEntry, CatalogLoadError, CatalogRepository, EngineConfig, EntryID, tests::data,
    };

    struct Catalog(Vec<CatalogEntry>);

    impl CatalogRepository for Catalog {
        async fn read_catalog(&self) -> Result<Vec<CatalogEntry>, CatalogLoadError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct Assets {
        missing: HashSet<&'static str>,
        stuck: HashSet<&'static str>,
        delay: Duration,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        calls: AtomicUsize,
    }

    impl AssetValidator for Assets {
        async fn asset_exists(&self, asset: &AssetRef) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

            if self.stuck.contains(asset.as_str()) {
                time::sleep(Duration::from_secs(60)).await;
            } else if !self.delay.is_zero() {
                time::sleep(self.delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            !self.missing.contains(asset.as_str())
        }
    }

    async fn engine(assets: Assets, config: EngineConfig) -> Engine<Catalog, Assets> {
        let engine = Engine::new(Catalog(data::catalog()), assets, config).unwrap();
        engine.rebuild().await;
        engine
    }

    fn workout(names: &[&str]) -> Vec<WorkoutExercise> {
        names.iter().map(|name| WorkoutExercise::from(*name)).collect()
    }

    fn ids(batch: &BatchResult) -> Vec<Option<String>> {
        batch
            .results
            .iter()
            .map(|r| r.entry().map(|e| e.id.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_preload_workout_preserves_order() {
        let engine = engine(
            Assets {
                delay: Duration::from_millis(10),
                ..Assets::default()
            },
            EngineConfig::default(),
        )
        .await;

        let batch = engine
            .preload_workout(
                &workout(&["Plank", "Bench Press", "Dumbell Curls", "asdkjasdkj", "Squat"]),
                &MatchHints::default(),
            )
            .await;

        assert_eq!(
            ids(&batch),
            vec![
                Some("plank".to_string()),
                Some("barbell-bench-press".to_string()),
                Some("dumbbell-curl".to_string()),
                None,
                Some("barbell-back-squat".to_string()),
            ]
        );
        assert_eq!(
            batch.results.iter().map(|r| r.tier).collect::<Vec<_>>(),
            vec![Tier::Exact, Tier::Exact, Tier::Fuzzy, Tier::Generated, Tier::Exact]
        );
        assert_eq!(batch.generated, 1);
        assert_eq!(batch.timed_out, 0);
        assert_eq!(engine.cache().len(), 5);
    }

    #[tokio::test]
    async fn test_preload_workout_empty() {
        let engine = engine(Assets::default(), EngineConfig::default()).await;

        let batch = engine.preload_workout(&[], &MatchHints::default()).await;

        assert!(batch.is_empty());
        assert_eq!(batch.generated, 0);
    }

    #[tokio::test]
    async fn test_preload_workout_batch_deadline() {
        let engine = engine(
            Assets {
                stuck: HashSet::from(["exercises/plank.gif"]),
                ..Assets::default()
            },
            EngineConfig {
                batch_timeout: Duration::from_millis(200),
                item_timeout: Duration::from_secs(30),
                ..EngineConfig::default()
            },
        )
        .await;

        let started = Instant::now();
        let batch = engine
            .preload_workout(&workout(&["Squat", "Plank", "Bench Press"]), &MatchHints::default())
            .await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.results[0].tier, Tier::Exact);
        assert_eq!(batch.results[1].tier, Tier::Generated);
        assert_eq!(batch.results[1].placeholder().unwrap().title, "Plank");
        assert_eq!(batch.results[2].tier, Tier::Exact);
        assert_eq!(batch.timed_out, 1);
        assert_eq!(engine.metrics().timed_out, 1);
    }

    #[tokio::test]
    async fn test_preload_workout_item_timeout() {
        let engine = engine(
            Assets {
                stuck: HashSet::from(["exercises/plank.gif"]),
                ..Assets::default()
            },
            EngineConfig {
                batch_timeout: Duration::from_secs(10),
                item_timeout: Duration::from_millis(50),
                ..EngineConfig::default()
            },
        )
        .await;

        let started = Instant::now();
        let batch = engine
            .preload_workout(&workout(&["Plank", "Squat"]), &MatchHints::default())
            .await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(batch.results[0].tier, Tier::Generated);
        assert_eq!(batch.results[1].tier, Tier::Exact);
        assert_eq!(batch.timed_out, 1);

        // the abandoned placeholder is not cached
        assert_eq!(
            engine.resolve_one("Plank", &MatchHints::default()).tier,
            Tier::Exact
        );
    }

    #[tokio::test]
    async fn test_preload_workout_missing_asset() {
        let engine = engine(
            Assets {
                missing: HashSet::from(["exercises/dumbbell-curl.gif"]),
                ..Assets::default()
            },
            EngineConfig::default(),
        )
        .await;

        let batch = engine
            .preload_workout(&workout(&["Dumbbell Curl", "Plank"]), &MatchHints::default())
            .await;

        assert_eq!(batch.results[0].tier, Tier::Generated);
        assert_eq!(batch.results[0].placeholder().unwrap().title, "Dumbbell Curl");
        assert_eq!(batch.results[1].tier, Tier::Exact);
        assert_eq!(batch.generated, 1);
        assert_eq!(batch.timed_out, 0);
        assert_eq!(engine.metrics().validation_failures, 1);
        assert_eq!(engine.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_preload_workout_without_validation() {
        let engine = engine(
            Assets {
                missing: HashSet::from(["exercises/dumbbell-curl.gif"]),
                ..Assets::default()
            },
            EngineConfig {
                validate_assets: false,
                ..EngineConfig::default()
            },
        )
        .await;

        let batch = engine
            .preload_workout(&workout(&["Dumbbell Curl"]), &MatchHints::default())
            .await;

        assert_eq!(batch.results[0].tier, Tier::Exact);
        assert_eq!(engine.validator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_preload_workout_bounded_concurrency() {
        let engine = engine(
            Assets {
                delay: Duration::from_millis(20),
                ..Assets::default()
            },
            EngineConfig {
                max_concurrency: 2,
                ..EngineConfig::default()
            },
        )
        .await;

        let batch = engine
            .preload_workout(
                &workout(&[
                    "Squat",
                    "Plank",
                    "Bench Press",
                    "Pull-Up",
                    "Farmer Carry",
                    "RDL",
                ]),
                &MatchHints::default(),
            )
            .await;

        assert_eq!(batch.timed_out, 0);
        assert_eq!(engine.validator.calls.load(Ordering::SeqCst), 6);
        assert!(engine.validator.max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_preload_workout_collapses_duplicates() {
        let engine = engine(Assets::default(), EngineConfig::default()).await;

        let batch = engine
            .preload_workout(
                &workout(&["Squat", "squats", "SQUAT (Beginner)", "Plank"]),
                &MatchHints::default(),
            )
            .await;

        assert_eq!(batch.len(), 4);
        assert_eq!(engine.validator.calls.load(Ordering::SeqCst), 2);
        assert!(batch.results[0].same_match(&batch.results[1]));
        assert!(batch.results[0].same_match(&batch.results[2]));
        assert_eq!(engine.metrics().tier_count(Tier::Exact), 4);
    }

    #[tokio::test]
    async fn test_preload_workout_uses_cache() {
        let engine = engine(Assets::default(), EngineConfig::default()).await;
        let _ = engine.resolve_one("Squat", &MatchHints::default());

        let batch = engine
            .preload_workout(&workout(&["Squat"]), &MatchHints::default())
            .await;

        assert_eq!(
            batch.results[0].entry().map(|e| e.id.clone()),
            Some(EntryID::from("barbell-back-squat"))
        );
        assert_eq!(engine.validator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(engine.metrics().cache_hits, 1);
    }

    #[tokio::test]
    async fn test_preload_workout_hints() {
        let engine = engine(Assets::default(), EngineConfig::default()).await;

        let batch = engine
            .preload_workout(
                &[
                    WorkoutExercise {
                        name: "Zercher Thing".to_string(),
                        muscle_group: Some("Hamstrings".to_string()),
                        equipment: None,
                    },
                    WorkoutExercise::from("Zercher Thing"),
                ],
                &MatchHints::muscle_group("legs"),
            )
            .await;

        assert_eq!(
            ids(&batch),
            vec![
                Some("romanian-deadlift".to_string()),
                Some("barbell-back-squat".to_string())
            ]
        );
        assert_eq!(batch.results[0].tier, Tier::Classification);
    }
}
