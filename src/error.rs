//! Error types for the rating pipeline

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, RankingError>;

#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not serialize rankings: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid configuration: {message}")]
    Config { message: String },

    #[error("no K-factor for tournament {tournament_id} in season {season}")]
    MissingKFactor { season: i32, tournament_id: String },
}

impl RankingError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
