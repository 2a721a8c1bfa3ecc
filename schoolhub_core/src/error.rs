use sea_orm::DbErr;
use thiserror::Error;

/// Failures while bringing up the core runtime.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to find a data directory on this platform")]
    NoDataDir,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("data store error: {0}")]
    Database(#[from] DbErr),
}
