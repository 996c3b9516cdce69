//! Crate-wide error type.

use std::string::FromUtf8Error;

/// Errors raised while starting up or while exporting metrics.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration could not be loaded or did not match the schema.
    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// A collector could not be created, registered or encoded.
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// The text encoder produced bytes that are not valid UTF-8.
    #[error("metrics exposition is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),

    #[error("failed to initialize logging: {0}")]
    Logging(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
