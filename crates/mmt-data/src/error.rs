//! Loader error type.

use thiserror::Error;

use mmt_model::ModelError;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type LoadResult<T> = Result<T, LoadError>;
