//! The classification orchestrator.
//!
//! An [`Analyzer`] owns one loaded listing, one active filtering function
//! and one active culling function. `analyze_diffs` walks every diff in
//! listing order, filters its added text and asks the predicate whether the
//! diff is minor; the raw markup tokens of culled diffs accumulate into the
//! result, ready to be struck from the review queue by a reporting
//! collaborator.

use crate::cull::CullFn;
use crate::listing::{parse_listing, Listing, ParseError};
use crate::source::{DiffSource, FetchError, ListingSource};
use crate::wikitext::FilterFn;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to parse listing")]
    Parse(#[from] ParseError),
    #[error("failed to retrieve listing text")]
    Source(#[from] FetchError),
}

pub struct Analyzer {
    filter: FilterFn,
    cull: Option<CullFn>,
    listing: Option<Listing>,
    /// Resolved added text per diff, parallel to `listing.diffs()` order.
    /// `None` marks a failed fetch; those diffs stay undetermined.
    texts: Vec<Option<String>>,
    failed: Vec<u64>,
    minor: Vec<String>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            // identity until the caller installs a real filter
            filter: Box::new(str::to_string),
            cull: None,
            listing: None,
            texts: Vec::new(),
            failed: Vec::new(),
            minor: Vec::new(),
        }
    }

    /// Installs the active filtering function, replacing the previous one.
    pub fn set_filtering_function(&mut self, filter: impl Fn(&str) -> String + 'static) {
        self.filter = Box::new(filter);
    }

    /// Installs the active culling function, replacing the previous one.
    /// Until one is set, analysis culls nothing.
    pub fn set_culling_function(&mut self, cull: impl Fn(&str) -> bool + 'static) {
        self.cull = Some(Box::new(cull));
    }

    /// Loads a listing from a collaborator-supplied source and resolves
    /// every diff's added text once up front.
    pub fn load(
        &mut self,
        listing: &impl ListingSource,
        diffs: &impl DiffSource,
    ) -> Result<(), LoadError> {
        let text = listing.listing_text()?;
        self.load_str(&text, diffs)
    }

    /// Like [`Analyzer::load`], but takes the listing text directly.
    pub fn load_str(&mut self, text: &str, diffs: &impl DiffSource) -> Result<(), LoadError> {
        let listing = parse_listing(text)?;
        self.resolve(listing, diffs);
        Ok(())
    }

    fn resolve(&mut self, listing: Listing, source: &impl DiffSource) {
        self.texts.clear();
        self.failed.clear();
        self.minor.clear();

        for diff in listing.diffs() {
            match source.added_text(diff.id) {
                Ok(text) => self.texts.push(Some(text)),
                Err(error) => {
                    // a diff we couldn't fetch must fail toward manual
                    // review, not count as minor
                    tracing::warn!(id = diff.id, %error, "failed to resolve diff text");
                    self.failed.push(diff.id);
                    self.texts.push(None);
                }
            }
        }

        self.listing = Some(listing);
    }

    /// Classifies every loaded diff with the active filter and predicate.
    ///
    /// The result is recomputed from scratch on every call, so swapping the
    /// filter or predicate and re-running yields a clean classification of
    /// the same listing.
    pub fn analyze_diffs(&mut self) {
        self.minor.clear();

        let listing = match &self.listing {
            Some(listing) => listing,
            None => return,
        };
        let cull = match &self.cull {
            Some(cull) => cull,
            None => {
                tracing::warn!("no culling function set, nothing culled");
                return;
            }
        };

        for (diff, text) in listing.diffs().zip(&self.texts) {
            let Some(raw) = text else {
                continue;
            };
            let filtered = (self.filter)(raw);
            if cull(&filtered) {
                self.minor.push(diff.token.clone());
            }
        }

        tracing::debug!(
            minor = self.minor.len(),
            total = self.texts.len(),
            failed = self.failed.len(),
            "classified diffs"
        );
    }

    /// Raw markup tokens of the diffs the most recent analysis judged
    /// minor, in original listing order.
    pub fn minor_edits(&self) -> &[String] {
        &self.minor
    }

    /// Ids whose added text could not be resolved at load time. These diffs
    /// are undetermined: absent from [`Analyzer::minor_edits`], still in
    /// need of review.
    pub fn failed_fetches(&self) -> &[u64] {
        &self.failed
    }

    pub fn listing(&self) -> Option<&Listing> {
        self.listing.as_ref()
    }
}
