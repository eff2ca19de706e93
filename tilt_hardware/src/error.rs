use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("device unavailable: {path}: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("short read: got {got} of {expected} bytes")]
    ShortRead { got: usize, expected: usize },
    #[error("channel write failed: {0}")]
    Write(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
