use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error(transparent)]
    Runtime(#[from] core_async::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
