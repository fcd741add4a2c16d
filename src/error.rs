use std::error::Error;
use std::fmt;

/// Errors surfaced by [`crate::explore`].
///
/// Transient backend failures never reach this type: the [`crate::Backend`]
/// trait requires them to be swallowed into an empty edge table by the
/// backend itself (see `Backend::get_neighbors`).
#[derive(Debug)]
pub enum SpikyBallError {
    /// An invalid configuration value, an empty seed list, or an unknown
    /// policy/mode string. Raised synchronously, never after a hop has run.
    Config(String),
    /// A backend-reported unrecoverable failure (e.g. authentication).
    /// Propagated to the caller unchanged; any graph built so far is
    /// discarded.
    Backend(Box<dyn Error + Send + Sync>),
}

impl SpikyBallError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        SpikyBallError::Config(message.into())
    }
}

impl fmt::Display for SpikyBallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpikyBallError::Config(message) => write!(f, "invalid configuration: {}", message),
            SpikyBallError::Backend(source) => write!(f, "backend failure: {}", source),
        }
    }
}

impl Error for SpikyBallError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SpikyBallError::Config(_) => None,
            SpikyBallError::Backend(source) => Some(source.as_ref()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SpikyBallError>;
