use thiserror::Error;

/// Errors at the configuration boundary. Battle resolution itself never
/// fails: degenerate inputs (empty forces, zero weights, overlarge kill
/// requests) all have defined degenerate outcomes.
#[derive(Error, Debug)]
pub enum WarhostError {
    #[error("Unknown unit type: {0}")]
    UnknownUnitType(String),

    #[error("Unknown terrain: {0}")]
    UnknownTerrain(String),

    #[error("Unknown fortification: {0}")]
    UnknownFortification(String),

    #[error("Invalid catalog entry for {unit}: {reason}")]
    InvalidCatalog { unit: String, reason: String },

    #[error("Invalid composition spec '{0}': expected 'unit:count,unit:count'")]
    InvalidCompositionSpec(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Catalog parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WarhostError>;
