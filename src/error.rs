//! Error types for palette extraction.

use thiserror::Error;

/// Errors raised by the clustering core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// A clustering run was asked for zero centroids.
    #[error("k must be >= 1, got 0")]
    ZeroClusters,

    /// A clustering run was handed no samples to seed from.
    #[error("the sample set must be non-empty")]
    EmptySamples,

    /// The iteration cap was hit while samples were still moving.
    #[error("clustering did not converge after {passes} passes")]
    DidNotConverge { passes: usize },

    /// Rendering needs at least one palette entry.
    #[error("cannot render an empty palette")]
    EmptyPalette,
}

pub type Result<T> = std::result::Result<T, PaletteError>;
