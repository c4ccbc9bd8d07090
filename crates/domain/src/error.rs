use crate::EntryID;

#[derive(thiserror::Error, Debug)]
pub enum CatalogLoadError {
    #[error("catalog source unavailable")]
    Unavailable,
    #[error("malformed catalog: {0}")]
    Malformed(String),
    #[error(transparent)]
    Entry(#[from] EntryError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("entry ID must not be empty")]
    EmptyID,
    #[error("name of entry \"{0}\" must not be empty")]
    EmptyName(EntryID),
    #[error("asset of entry \"{0}\" must not be empty")]
    EmptyAsset(EntryID),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be in (0, 1] ({value})")]
    OutOfRange { name: &'static str, value: f64 },
    #[error("semantic threshold must not exceed fuzzy threshold ({semantic} > {fuzzy})")]
    SemanticAboveFuzzy { semantic: f64, fuzzy: f64 },
    #[error("confidence must not increase from {upper} tier to {lower} tier")]
    IncreasingConfidence {
        upper: &'static str,
        lower: &'static str,
    },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}
