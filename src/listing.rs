//! CCI listing parsing.
//!
//! A Contributor Copyright Investigation page lists, per article, the diffs a
//! contributor under investigation made there. An entry looks like
//!
//! ```text
//! *[[:Smiley (1956 film)]] (2 edits): [[Special:Diff/476809081|(+460)]][[Special:Diff/446793589|(+205)]]
//! ```
//!
//! Parsing is best-effort extraction, not validation: entries that do not
//! match the expected shape are skipped with a warning (or rejected outright
//! with the `strict` feature enabled). Only a listing with no recognizable
//! entries at all fails the parse.

use std::sync::LazyLock;

use compact_str::CompactString;
use regex::Regex;
use rustc_hash::FxHashSet;

/// One historical edit from the listing. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRef {
    /// The edit's stable identifier, from `Special:Diff/<id>`.
    pub id: u64,
    /// The raw wikilink token as it appeared in the listing, echoed back
    /// unchanged in reports.
    pub token: String,
    /// Title of the page the edit belongs to.
    pub page: CompactString,
    /// Signed byte delta from the `(±N)` annotation, when present.
    pub size_delta: Option<i64>,
}

/// A page title with its diffs in listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    pub title: CompactString,
    /// The `(N edits)` annotation, when present.
    pub edit_count: Option<usize>,
    pub diffs: Vec<DiffRef>,
}

/// A parsed listing: pages in source order, diffs in source order within
/// each page, no diff id appearing twice.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub pages: Vec<PageEntry>,
}

impl Listing {
    /// All diffs in listing order.
    pub fn diffs(&self) -> impl Iterator<Item = &DiffRef> {
        self.pages.iter().flat_map(|page| page.diffs.iter())
    }

    pub fn diff_count(&self) -> usize {
        self.pages.iter().map(|page| page.diffs.len()).sum()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("no recognizable CCI entries in listing text")]
    NoPages,
    #[error("malformed listing entry for page `{0}`")]
    MalformedEntry(String),
}

static PAGE_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[:([^\]|]+)\]\]").unwrap());
static EDIT_COUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((\d+) edits?\)").unwrap());
static DIFF_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[Special:Diff/(\d+)\|\(([+-]?\d+)\)\]\]").unwrap());

/// Parses raw CCI listing text into a [`Listing`].
///
/// Page links (`[[:Title]]`) anchor the entries; everything up to the next
/// page link belongs to the current entry. Entries are routinely run
/// together on one line, so the scan is anchor-oriented rather than
/// line-oriented.
pub fn parse_listing(text: &str) -> Result<Listing, ParseError> {
    let anchors: Vec<_> = PAGE_LINK.captures_iter(text).collect();

    let mut pages = Vec::new();
    let mut seen_ids = FxHashSet::default();

    for (i, caps) in anchors.iter().enumerate() {
        let whole = caps.get(0).unwrap();
        let title = caps[1].trim();

        let segment_end = anchors
            .get(i + 1)
            .map_or(text.len(), |next| next.get(0).unwrap().start());
        let segment = &text[whole.end()..segment_end];

        let edit_count = EDIT_COUNT
            .captures(segment)
            .and_then(|c| c[1].parse().ok());

        let mut diffs = Vec::new();
        for diff_caps in DIFF_LINK.captures_iter(segment) {
            let token = diff_caps.get(0).unwrap().as_str();
            let id: u64 = match diff_caps[1].parse() {
                Ok(id) => id,
                Err(_) => {
                    tracing::warn!(token, "diff id out of range, skipping");
                    continue;
                }
            };
            if !seen_ids.insert(id) {
                tracing::warn!(id, "duplicate diff id in listing, keeping first occurrence");
                continue;
            }
            diffs.push(DiffRef {
                id,
                token: token.to_string(),
                page: CompactString::from(title),
                size_delta: diff_caps[2].parse().ok(),
            });
        }

        if diffs.is_empty() {
            if cfg!(feature = "strict") {
                return Err(ParseError::MalformedEntry(title.to_string()));
            }
            tracing::warn!(page = title, "listing entry without diff links, skipping");
            continue;
        }

        pages.push(PageEntry {
            title: CompactString::from(title),
            edit_count,
            diffs,
        });
    }

    if pages.is_empty() {
        return Err(ParseError::NoPages);
    }

    tracing::debug!(
        pages = pages.len(),
        diffs = pages.iter().map(|p| p.diffs.len()).sum::<usize>(),
        "parsed listing"
    );
    Ok(Listing { pages })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_entry() {
        let listing = parse_listing(
            "*[[:Smiley (1956 film)]] (2 edits): [[Special:Diff/476809081|(+460)]][[Special:Diff/446793589|(+205)]]",
        )
        .unwrap();

        assert_eq!(1, listing.pages.len());
        let page = &listing.pages[0];
        assert_eq!("Smiley (1956 film)", page.title);
        assert_eq!(Some(2), page.edit_count);
        assert_eq!(2, page.diffs.len());
        assert_eq!(476809081, page.diffs[0].id);
        assert_eq!("[[Special:Diff/476809081|(+460)]]", page.diffs[0].token);
        assert_eq!(Some(460), page.diffs[0].size_delta);
        assert_eq!(Some(205), page.diffs[1].size_delta);
    }

    #[test]
    fn entries_run_together_on_one_line() {
        let listing = parse_listing(
            "*'''N''' [[:Urmitz]] (1 edit): [[Special:Diff/154400451|(+283)]]\
             *'''N''' [[:SP-354]] (1 edit): [[Special:Diff/255072765|(+286)]]",
        )
        .unwrap();

        assert_eq!(2, listing.pages.len());
        assert_eq!("Urmitz", listing.pages[0].title);
        assert_eq!("SP-354", listing.pages[1].title);
        assert_eq!(2, listing.diff_count());
    }

    #[test]
    fn order_is_preserved() {
        let listing = parse_listing(
            "*[[:B page]] (1 edit): [[Special:Diff/2|(+20)]]\n\
             *[[:A page]] (2 edits): [[Special:Diff/3|(-30)]][[Special:Diff/1|(+10)]]",
        )
        .unwrap();

        let ids: Vec<u64> = listing.diffs().map(|d| d.id).collect();
        assert_eq!(vec![2, 3, 1], ids);
        assert_eq!(Some(-30), listing.pages[1].diffs[0].size_delta);
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let listing = parse_listing(
            "*[[:One]] (1 edit): [[Special:Diff/7|(+100)]]\n\
             *[[:Two]] (1 edit): [[Special:Diff/7|(+100)]][[Special:Diff/8|(+5)]]",
        )
        .unwrap();

        let ids: Vec<u64> = listing.diffs().map(|d| d.id).collect();
        assert_eq!(vec![7, 8], ids);
    }

    #[test]
    fn zero_pages_is_a_parse_error() {
        assert!(matches!(parse_listing(""), Err(ParseError::NoPages)));
        assert!(matches!(
            parse_listing("== Section heading ==\njust some prose\n"),
            Err(ParseError::NoPages)
        ));
    }

    #[cfg(not(feature = "strict"))]
    #[test]
    fn entry_without_diffs_is_skipped() {
        let listing = parse_listing(
            "*[[:No diffs here]] (1 edit): nothing\n\
             *[[:Has one]] (1 edit): [[Special:Diff/5|(+50)]]",
        )
        .unwrap();

        assert_eq!(1, listing.pages.len());
        assert_eq!("Has one", listing.pages[0].title);
    }

    #[cfg(feature = "strict")]
    #[test]
    fn entry_without_diffs_is_fatal_under_strict() {
        let result = parse_listing("*[[:No diffs here]] (1 edit): nothing");
        assert!(matches!(result, Err(ParseError::MalformedEntry(_))));
    }
}
