//! Error types for link-rank

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Empty corpus, damping outside (0,1), zero samples, unknown page, ...
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The iterative solver hit its sweep cap before settling.
    #[error("Did not converge after {iterations} iterations (delta={delta})")]
    NonConvergence { iterations: usize, delta: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),
}
