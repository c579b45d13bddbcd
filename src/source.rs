//! Collaborator contracts for content retrieval.
//!
//! The core never talks to a wiki itself. Whoever drives an analysis run
//! supplies these two capabilities; tests use in-memory implementations.

/// Supplies the added text of a single diff.
pub trait DiffSource {
    /// Returns the raw added text of the edit with the given id.
    fn added_text(&self, diff_id: u64) -> Result<String, FetchError>;
}

/// Supplies raw listing text, e.g. from a CCI page or a local file.
/// [`crate::analyzer::Analyzer::load_str`] bypasses this entirely.
pub trait ListingSource {
    fn listing_text(&self) -> Result<String, FetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("diff {0} not found")]
    NotFound(u64),
    #[error("network failure: {0}")]
    Network(String),
}
