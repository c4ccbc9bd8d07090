use std::{path::Path, time::Duration};

use formcue_domain::{EngineConfig, MatcherConfig};
use log::info;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration file layout. Missing keys keep their defaults, timeouts are in milliseconds.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct File {
    fuzzy_threshold: f64,
    semantic_threshold: f64,
    semantic_penalty: f64,
    classification_confidence: f64,
    generated_confidence: f64,
    cache_capacity: usize,
    cache_shards: usize,
    max_concurrency: usize,
    batch_timeout_ms: u64,
    item_timeout_ms: u64,
    validate_assets: bool,
}

impl Default for File {
    fn default() -> Self {
        EngineConfig::default().into()
    }
}

impl From<EngineConfig> for File {
    fn from(value: EngineConfig) -> Self {
        Self {
            fuzzy_threshold: value.matcher.fuzzy_threshold,
            semantic_threshold: value.matcher.semantic_threshold,
            semantic_penalty: value.matcher.semantic_penalty,
            classification_confidence: value.matcher.classification_confidence,
            generated_confidence: value.matcher.generated_confidence,
            cache_capacity: value.cache_capacity,
            cache_shards: value.cache_shards,
            max_concurrency: value.max_concurrency,
            batch_timeout_ms: u64::try_from(value.batch_timeout.as_millis()).unwrap_or(u64::MAX),
            item_timeout_ms: u64::try_from(value.item_timeout.as_millis()).unwrap_or(u64::MAX),
            validate_assets: value.validate_assets,
        }
    }
}

impl From<File> for EngineConfig {
    fn from(value: File) -> Self {
        Self {
            matcher: MatcherConfig {
                fuzzy_threshold: value.fuzzy_threshold,
                semantic_threshold: value.semantic_threshold,
                semantic_penalty: value.semantic_penalty,
                classification_confidence: value.classification_confidence,
                generated_confidence: value.generated_confidence,
            },
            cache_capacity: value.cache_capacity,
            cache_shards: value.cache_shards,
            max_concurrency: value.max_concurrency,
            batch_timeout: Duration::from_millis(value.batch_timeout_ms),
            item_timeout: Duration::from_millis(value.item_timeout_ms),
            validate_assets: value.validate_assets,
        }
    }
}

pub fn parse(content: &str) -> Result<EngineConfig, Error> {
    Ok(toml::from_str::<File>(content)?.into())
}

pub async fn load(path: Option<&Path>) -> Result<EngineConfig, Error> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| Error::Read {
            path: path.display().to_string(),
            source,
        })?;
    let config = parse(&content)?;
    info!("loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_parse() {
        let config = parse(
            r"
            fuzzy_threshold = 0.85
            max_concurrency = 8
            batch_timeout_ms = 1500
            item_timeout_ms = 250
            validate_assets = false
            ",
        )
        .unwrap();

        assert_approx_eq!(config.matcher.fuzzy_threshold, 0.85);
        assert_approx_eq!(config.matcher.semantic_threshold, 0.6);
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.cache_capacity, 512);
        assert_eq!(config.batch_timeout, Duration::from_millis(1500));
        assert_eq!(config.item_timeout, Duration::from_millis(250));
        assert!(!config.validate_assets);
    }

    #[test]
    fn test_parse_unknown_key() {
        assert!(matches!(parse("fuzzy = 0.9"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_wrong_type() {
        assert!(matches!(
            parse("max_concurrency = \"many\""),
            Err(Error::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_load_without_path() {
        assert_eq!(load(None).await.unwrap(), EngineConfig::default());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        assert!(matches!(
            load(Some(Path::new("/nonexistent/formcue.toml"))).await,
            Err(Error::Read { .. })
        ));
    }
}
