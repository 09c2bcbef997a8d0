// ── Core error types ──
//
// Everything here is recoverable. Persistence and per-record failures are
// recorded in the engine's bounded logs rather than surfaced as errors;
// this type covers the operations that do report synchronously.

use thiserror::Error;

use crate::feed::FeedError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A rejected operation (e.g. a manual watchlist add with no
    /// identifier). No partial mutation has occurred.
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// The upstream feed could not be reached or returned garbage.
    #[error("upstream feed error: {0}")]
    Feed(#[from] FeedError),

    /// Filesystem failure during a batch export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
