use std::collections::BTreeMap;

use formcue_domain as domain;
use log::warn;

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct Resolution {
    pub name: String,
    pub tier: String,
    pub confidence: f64,
    pub processing_time_ms: u64,
    pub catalog_version: u64,
    pub content: Content,
}

impl Resolution {
    pub fn new(name: &str, result: &domain::MatchResult) -> Self {
        Self {
            name: name.to_string(),
            tier: result.tier.to_string(),
            confidence: result.confidence,
            processing_time_ms: result.processing_time_ms,
            catalog_version: result.catalog_version.value(),
            content: (&result.content).into(),
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Content {
    Catalog {
        id: String,
        name: String,
        asset: String,
        muscles: Vec<String>,
        equipment: Vec<String>,
        instructions: Vec<String>,
    },
    Placeholder {
        title: String,
        asset: String,
        category: Option<String>,
        instructions: Vec<String>,
    },
}

impl From<&domain::MatchContent> for Content {
    fn from(value: &domain::MatchContent) -> Self {
        match value {
            domain::MatchContent::Catalog(entry) => Content::Catalog {
                id: entry.id.to_string(),
                name: entry.name.clone(),
                asset: entry.asset.to_string(),
                muscles: entry.muscles.iter().cloned().collect(),
                equipment: entry.equipment.iter().cloned().collect(),
                instructions: entry.instructions.clone(),
            },
            domain::MatchContent::Placeholder(placeholder) => Content::Placeholder {
                title: placeholder.title.clone(),
                asset: placeholder.asset.to_string(),
                category: placeholder.category.map(|c| c.to_string()),
                instructions: placeholder.instructions.clone(),
            },
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct Batch {
    pub elapsed_ms: u64,
    pub generated: usize,
    pub timed_out: usize,
    pub results: Vec<Resolution>,
}

impl Batch {
    pub fn new(exercises: &[domain::WorkoutExercise], batch: &domain::BatchResult) -> Self {
        Self {
            elapsed_ms: batch.elapsed_ms,
            generated: batch.generated,
            timed_out: batch.timed_out,
            results: exercises
                .iter()
                .zip(&batch.results)
                .map(|(exercise, result)| Resolution::new(&exercise.name, result))
                .collect(),
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct Metrics {
    pub resolutions: u64,
    pub tiers: BTreeMap<String, u64>,
    pub average_processing_ms: f64,
    pub cache_hit_rate: f64,
    pub timed_out: u64,
    pub validation_failures: u64,
    pub rebuilds: u64,
    pub failed_rebuilds: u64,
}

impl From<&domain::MetricsSnapshot> for Metrics {
    fn from(value: &domain::MetricsSnapshot) -> Self {
        Self {
            resolutions: value.resolutions(),
            tiers: value
                .tiers
                .iter()
                .map(|(tier, count)| (tier.to_string(), *count))
                .collect(),
            average_processing_ms: value.average_processing_ms(),
            cache_hit_rate: value.cache_hit_rate(),
            timed_out: value.timed_out,
            validation_failures: value.validation_failures,
            rebuilds: value.rebuilds,
            failed_rebuilds: value.failed_rebuilds,
        }
    }
}

/// Workout item as accepted on input: either a bare name or an object with hints.
///
/// Anything else, such as `null` or a number, still occupies its slot and resolves to a
/// generated placeholder.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum WorkoutItem {
    Name(String),
    Exercise {
        name: String,
        #[serde(default, alias = "muscleGroup")]
        muscle_group: Option<String>,
        #[serde(default)]
        equipment: Option<String>,
    },
    Malformed(serde_json::Value),
}

impl From<WorkoutItem> for domain::WorkoutExercise {
    fn from(value: WorkoutItem) -> Self {
        match value {
            WorkoutItem::Name(name) => Self {
                name,
                ..Self::default()
            },
            WorkoutItem::Exercise {
                name,
                muscle_group,
                equipment,
            } => Self {
                name,
                muscle_group,
                equipment,
            },
            WorkoutItem::Malformed(value) => {
                warn!("ignoring malformed workout item {value}");
                Self::default()
            }
        }
    }
}

pub fn parse_workout(json: &str) -> Result<Vec<domain::WorkoutExercise>, serde_json::Error> {
    Ok(serde_json::from_str::<Vec<WorkoutItem>>(json)?
        .into_iter()
        .map(Into::into)
        .collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn plank() -> domain::CatalogEntry {
        domain::CatalogEntry {
            id: "plank".into(),
            name: "Plank".to_string(),
            aliases: ["front plank".to_string()].into(),
            muscles: ["abs".to_string(), "core".to_string()].into(),
            equipment: [].into(),
            asset: "exercises/plank.gif".into(),
            instructions: vec!["Hold a straight line.".to_string()],
        }
    }

    #[test]
    fn test_resolution_catalog() {
        let result = domain::MatchResult {
            tier: domain::Tier::Fuzzy,
            confidence: 0.875,
            content: domain::MatchContent::Catalog(Arc::new(plank())),
            processing_time_ms: 2,
            catalog_version: 3.into(),
        };

        assert_eq!(
            serde_json::to_value(Resolution::new("Plnk", &result)).unwrap(),
            json!({
                "name": "Plnk",
                "tier": "fuzzy",
                "confidence": 0.875,
                "processing_time_ms": 2,
                "catalog_version": 3,
                "content": {
                    "kind": "catalog",
                    "id": "plank",
                    "name": "Plank",
                    "asset": "exercises/plank.gif",
                    "muscles": ["abs", "core"],
                    "equipment": [],
                    "instructions": ["Hold a straight line."]
                }
            })
        );
    }

    #[test]
    fn test_resolution_placeholder() {
        let result = domain::Matcher::default().generated(
            "Zottman Curl",
            Some(domain::MovementCategory::Pull),
            1.into(),
        );

        let value = serde_json::to_value(Resolution::new("Zottman Curl", &result)).unwrap();

        assert_eq!(value["tier"], "generated");
        assert_eq!(value["content"]["kind"], "placeholder");
        assert_eq!(value["content"]["title"], "Zottman Curl");
        assert_eq!(value["content"]["category"], "pull");
        assert_eq!(value["content"]["asset"], domain::AssetRef::PLACEHOLDER);
    }

    #[test]
    fn test_parse_workout() {
        assert_eq!(
            parse_workout(
                r#"["Squat", {"name": "Cossack Squat", "muscle_group": "legs"}, {"name": "Row"}]"#
            )
            .unwrap(),
            vec![
                domain::WorkoutExercise::from("Squat"),
                domain::WorkoutExercise {
                    name: "Cossack Squat".to_string(),
                    muscle_group: Some("legs".to_string()),
                    equipment: None,
                },
                domain::WorkoutExercise::from("Row"),
            ]
        );
        assert!(parse_workout(r#"{"name": "Squat"}"#).is_err());
    }

    #[test]
    fn test_parse_workout_camel_case_hints() {
        assert_eq!(
            parse_workout(
                r#"[{"name": "Cossack Squat", "muscleGroup": "legs", "equipment": "none"}]"#
            )
            .unwrap(),
            vec![domain::WorkoutExercise {
                name: "Cossack Squat".to_string(),
                muscle_group: Some("legs".to_string()),
                equipment: Some("none".to_string()),
            }]
        );
    }

    #[test]
    fn test_parse_workout_malformed_items() {
        assert_eq!(
            parse_workout(r#"["Squat", null, 42, {"title": "Row"}, {"name": 7}]"#).unwrap(),
            vec![
                domain::WorkoutExercise::from("Squat"),
                domain::WorkoutExercise::default(),
                domain::WorkoutExercise::default(),
                domain::WorkoutExercise::default(),
                domain::WorkoutExercise::default(),
            ]
        );
    }
}
