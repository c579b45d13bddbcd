// SPDX-License-Identifier: MPL-2.0
//! # cci-triage
//!
//! Triage for Contributor Copyright Investigation (CCI) listings on
//! MediaWiki-style wikis.
//!
//! A CCI listing enumerates, per article, the diffs a contributor under
//! investigation made there. Each diff's added text has to be inspected by a
//! human for copied prose, which is slow when a listing runs to hundreds of
//! diffs. This crate automates the easy negatives: diffs that provably
//! cannot contain substantive copyrighted prose (a bare reference tag, a
//! navigation list entry, an empty edit) are classified as minor and struck
//! from the review queue. The final infringement call always stays with the
//! reviewer; every ambiguous case fails toward manual review.
//!
//! ## Overview
//!
//! - [`listing`] parses raw CCI listing wikitext into pages and diff
//!   references.
//! - [`wikitext`] strips structural noise (references, external links,
//!   comments) from added text before classification.
//! - [`cull`] holds the predicates that decide "is this diff minor?" from
//!   filtered text.
//! - [`analyzer`] wires it together: one active filter, one active
//!   predicate, one loaded listing, and a classification loop over every
//!   diff.
//! - [`source`] defines the collaborator traits through which listing text
//!   and diff text reach the core; this crate contains no network code.
//!
//! ## Basic usage
//!
//! ```rust,no_run
//! use cci_triage::analyzer::Analyzer;
//! use cci_triage::{cull, wikitext};
//! # struct MyWiki;
//! # impl cci_triage::source::DiffSource for MyWiki {
//! #     fn added_text(&self, _: u64) -> Result<String, cci_triage::source::FetchError> {
//! #         unimplemented!()
//! #     }
//! # }
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let wiki = MyWiki;
//! let cci = "*[[:Some article]] (1 edit): [[Special:Diff/123456|(+205)]]";
//!
//! let mut analyzer = Analyzer::new();
//! analyzer.set_filtering_function(wikitext::remove_references);
//! analyzer.set_culling_function(cull::word_count_threshold(9));
//! analyzer.load_str(cci, &wiki)?;
//! analyzer.analyze_diffs();
//!
//! for token in analyzer.minor_edits() {
//!     println!("safe to skip: {token}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Filters and predicates are plain `Fn` values and can be swapped between
//! runs; `analyze_diffs` always reclassifies from scratch. Several base
//! transforms compose into one filter via [`wikitext::chain`].
//!
//! ## Error handling
//!
//! Listing text with no recognizable entries fails the load. A single
//! malformed entry is skipped with a `tracing` warning (or made fatal with
//! the `strict` cargo feature). A diff whose text cannot be fetched is
//! excluded from the minor result and surfaced through
//! [`analyzer::Analyzer::failed_fetches`]; it never counts as minor.

pub mod analyzer;
pub mod cull;
pub mod listing;
pub mod source;
#[cfg(test)]
mod test_support;
pub mod wikitext;
