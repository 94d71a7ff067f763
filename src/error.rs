use thiserror::Error;

pub type Result<T> = std::result::Result<T, HistoryError>;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to build title index: {0}")]
    IndexBuild(#[source] tantivy::TantivyError),

    #[error("{strategy} lookup failed: {source}")]
    Lookup {
        strategy: &'static str,
        #[source]
        source: tantivy::TantivyError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
