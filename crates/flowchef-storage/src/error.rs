use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("invalid value {value:?} for preference {name}: {reason}")]
    InvalidPreference {
        name: String,
        value: String,
        reason: String,
    },

    #[error("unknown preference: {0}")]
    UnknownPreference(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
