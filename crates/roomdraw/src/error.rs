//! Unified error type for roomdraw.

use roomdraw_core::EntryError;
use roomdraw_session::DrawError;

/// Top-level error wrapping the per-crate errors.
///
/// `#[from]` lets `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RoomdrawError {
    /// A dataset row failed validation. `row` is 1-based.
    #[error("invalid record at row {row}: {source}")]
    InvalidRecord {
        row: usize,
        #[source]
        source: EntryError,
    },

    /// A draw session could not be reached.
    #[error(transparent)]
    Draw(#[from] DrawError),

    /// The dataset or config was not valid JSON of the expected shape.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Reading the dataset failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
