use thiserror::Error;
use tilt_traits::MotorId;

#[derive(Debug, Error, Clone)]
pub enum CoreError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("device unavailable: {0}")]
    Unavailable(String),
    #[error("short sensor read: got {got} of {expected} bytes")]
    ShortRead { got: usize, expected: usize },
    #[error("actuation failed on motor {motor}: {reason}")]
    Actuation { motor: MotorId, reason: String },
    #[error("both motors of the pair failed: {first}; {second}")]
    PairActuation {
        first: Box<CoreError>,
        second: Box<CoreError>,
    },
    #[error("io error: {0}")]
    Io(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing output channels")]
    MissingChannels,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
