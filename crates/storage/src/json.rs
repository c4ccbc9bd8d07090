use std::{io, path::PathBuf};

use formcue_domain as domain;
use log::debug;

/// Catalog read from a JSON document of the form `{"exercises": [...]}`.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl domain::CatalogRepository for JsonCatalog {
    async fn read_catalog(&self) -> Result<Vec<domain::CatalogEntry>, domain::CatalogLoadError> {
        debug!("reading catalog from {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => domain::CatalogLoadError::Unavailable,
                _ => err.into(),
            })?;
        parse(&content)
    }
}

pub fn parse(json: &str) -> Result<Vec<domain::CatalogEntry>, domain::CatalogLoadError> {
    let catalog = serde_json::from_str::<Catalog>(json)
        .map_err(|err| domain::CatalogLoadError::Malformed(err.to_string()))?;
    Ok(catalog.exercises.into_iter().map(Into::into).collect())
}

pub fn to_json(entries: &[domain::CatalogEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Catalog {
        exercises: entries.iter().map(Into::into).collect(),
    })
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
struct Catalog {
    exercises: Vec<Exercise>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
struct Exercise {
    id: String,
    name: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    muscles: Vec<String>,
    #[serde(default)]
    equipment: Vec<String>,
    asset: String,
    #[serde(default)]
    instructions: Vec<String>,
}

impl From<&domain::CatalogEntry> for Exercise {
    fn from(value: &domain::CatalogEntry) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.clone(),
            aliases: value.aliases.iter().cloned().collect(),
            muscles: value.muscles.iter().cloned().collect(),
            equipment: value.equipment.iter().cloned().collect(),
            asset: value.asset.to_string(),
            instructions: value.instructions.clone(),
        }
    }
}

impl From<Exercise> for domain::CatalogEntry {
    fn from(value: Exercise) -> Self {
        Self {
            id: value.id.into(),
            name: value.name,
            aliases: value.aliases.into_iter().collect(),
            muscles: value.muscles.into_iter().collect(),
            equipment: value.equipment.into_iter().collect(),
            asset: value.asset.into(),
            instructions: value.instructions,
        }
    }
}
