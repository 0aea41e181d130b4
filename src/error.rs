//! Error taxonomy for the search layer.
//!
//! Search is advisory for its callers, so most failures are recovered
//! locally (logged, empty results). The variants here exist for the few
//! places a caller must tell conditions apart; `InvalidExportFormat` is the
//! only one surfaced as a hard failure.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// The backing store cannot be reached or lacks the expected tables.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A constructed query failed against the store (e.g. the full-text
    /// index is absent or a match token is malformed).
    #[error("query execution failed: {0}")]
    QueryExecution(#[from] rusqlite::Error),

    /// Network error, timeout, or non-success status from a remote engine.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Requested export format outside the supported set.
    #[error("unsupported export format: {0}")]
    InvalidExportFormat(String),
}
