use std::time::Duration;

use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherConfig {
    pub fuzzy_threshold: f64,
    pub semantic_threshold: f64,
    pub semantic_penalty: f64,
    pub classification_confidence: f64,
    pub generated_confidence: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.8,
            semantic_threshold: 0.6,
            semantic_penalty: 0.75,
            classification_confidence: 0.4,
            generated_confidence: 0.1,
        }
    }
}

impl MatcherConfig {
    /// Ensures confidence never increases from one tier to the next and that the generated
    /// tier stays below every acceptance threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("fuzzy threshold", self.fuzzy_threshold),
            ("semantic threshold", self.semantic_threshold),
            ("semantic penalty", self.semantic_penalty),
            ("classification confidence", self.classification_confidence),
            ("generated confidence", self.generated_confidence),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::OutOfRange { name, value });
            }
        }

        if self.semantic_threshold > self.fuzzy_threshold {
            return Err(ConfigError::SemanticAboveFuzzy {
                semantic: self.semantic_threshold,
                fuzzy: self.fuzzy_threshold,
            });
        }

        // best possible semantic confidence is `semantic_penalty` (similarity 1.0)
        if self.semantic_penalty > self.fuzzy_threshold {
            return Err(ConfigError::IncreasingConfidence {
                upper: "fuzzy",
                lower: "semantic",
            });
        }

        if self.semantic_threshold * self.semantic_penalty < self.classification_confidence {
            return Err(ConfigError::IncreasingConfidence {
                upper: "semantic",
                lower: "classification",
            });
        }

        if self.generated_confidence >= self.classification_confidence
            || self.generated_confidence >= self.semantic_threshold
        {
            return Err(ConfigError::IncreasingConfidence {
                upper: "classification",
                lower: "generated",
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub matcher: MatcherConfig,
    pub cache_capacity: usize,
    pub cache_shards: usize,
    pub max_concurrency: usize,
    pub batch_timeout: Duration,
    pub item_timeout: Duration,
    pub validate_assets: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            matcher: MatcherConfig::default(),
            cache_capacity: 512,
            cache_shards: 8,
            max_concurrency: 4,
            batch_timeout: Duration::from_secs(3),
            item_timeout: Duration::from_secs(1),
            validate_assets: true,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.matcher.validate()?;

        for (name, value) in [
            ("cache capacity", self.cache_capacity),
            ("cache shards", self.cache_shards),
            ("max concurrency", self.max_concurrency),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero(name));
            }
        }

        if self.batch_timeout.is_zero() {
            return Err(ConfigError::Zero("batch timeout"));
        }
        if self.item_timeout.is_zero() {
            return Err(ConfigError::Zero("item timeout"));
        }

        Ok(())
    }
}
