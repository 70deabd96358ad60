use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The submitted callable returned an error. The original error can be
    /// recovered with [`anyhow::Error::downcast_ref`].
    #[error("Background task failed: {0}")]
    Task(anyhow::Error),

    #[error("Background task panicked: {0}")]
    Panicked(String),

    #[error("Background task was cancelled before completion")]
    Cancelled,

    #[error("{operation} cannot be called from within a running async runtime")]
    NestedRuntime { operation: &'static str },

    #[error("A task scope cannot be drained from one of its own tasks")]
    SelfDrain,

    #[error("Failed to build async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("Worker pool size must be greater than 0 (got {0})")]
    InvalidPoolSize(usize),
}

impl Error {
    /// Returns the callable's own error if this is a [`Error::Task`].
    pub fn task_error(&self) -> Option<&anyhow::Error> {
        match self {
            Error::Task(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
