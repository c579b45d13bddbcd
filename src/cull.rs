//! Cull predicates.
//!
//! Each predicate answers one question about a diff's (already filtered)
//! added text: can a human reviewer safely skip it? Every predicate is a
//! total, pure function and fails toward manual review, never toward
//! automatic exclusion.

use crate::wikitext;

/// A culling function as installed into the [`crate::analyzer::Analyzer`]:
/// filtered text in, "is minor" out.
pub type CullFn = Box<dyn Fn(&str) -> bool>;

/// Binds a word-count threshold into a predicate with the uniform
/// text-to-bool shape the analyzer stores.
pub fn word_count_threshold(threshold: usize) -> impl Fn(&str) -> bool {
    move |text| word_count_cull(text, threshold)
}

/// True iff the filtered text contains strictly fewer than `threshold`
/// words. Tokens that are nothing but leftover wikitext punctuation (stray
/// quotes, brackets, pipes) do not count as words.
pub fn word_count_cull(text: &str, threshold: usize) -> bool {
    word_count(text) < threshold
}

fn word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| !is_markup_remnant(token))
        .count()
}

// residual markup after filtering, e.g. the "''" left over from bold/italic
// or the "|" of a dismembered table row
fn is_markup_remnant(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| matches!(c, '\'' | '"' | '[' | ']' | '{' | '}' | '|' | '*' | '#' | '=' | ':' | ';'))
}

/// The strictest predicate: true only when nothing substantive remains
/// after the standard normalizer chain has run. Whitelisted residues are
/// the empty string, a bare list-item marker and pure punctuation.
pub fn whitelist_cull(text: &str) -> bool {
    let residue = wikitext::remove_external_links(&wikitext::remove_references(
        &wikitext::remove_comments(text),
    ));
    residue
        .trim()
        .chars()
        .all(|c| c.is_ascii_punctuation() || c.is_whitespace())
}

/// True iff the entire text is a list-item marker wrapping exactly one
/// wikilink or one external link, the shape of a "see also" or navigation
/// addition. A bare link without the marker is ambiguous and is not culled.
pub fn list_item_cull(text: &str) -> bool {
    let line = text.trim();
    let rest = line.trim_start_matches(['*', '#', ':']);
    if rest.len() == line.len() {
        // no list marker, could be a fragment of anything
        return false;
    }
    let rest = rest.trim_start();
    is_sole_wikilink(rest) || is_sole_external_link(rest)
}

fn is_sole_wikilink(text: &str) -> bool {
    match text.strip_prefix("[[").and_then(|t| t.strip_suffix("]]")) {
        Some(inner) => !inner.is_empty() && !inner.contains('[') && !inner.contains(']'),
        None => false,
    }
}

fn is_sole_external_link(text: &str) -> bool {
    match text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        Some(inner) => {
            (inner.starts_with("http://") || inner.starts_with("https://"))
                && !inner.contains('[')
                && !inner.contains(']')
        }
        None => false,
    }
}

// image formatting parameters that carry no prose
const FORMAT_PARAMS: &[&str] = &[
    "thumb",
    "thumbnail",
    "frame",
    "framed",
    "frameless",
    "border",
    "left",
    "right",
    "center",
    "none",
    "upright",
    "baseline",
    "middle",
    "sub",
    "super",
    "top",
    "bottom",
    "text-top",
    "text-bottom",
];

/// True only for a file or image embedding whose parts are all formatting
/// parameters. Any free-form part is a caption, and captions are prose that
/// may itself infringe, so their presence forces manual review.
pub fn file_addition_cull(text: &str) -> bool {
    let line = text.trim();
    let inner = match line.strip_prefix("[[").and_then(|t| t.strip_suffix("]]")) {
        Some(inner) => inner,
        None => return false,
    };

    let mut parts = inner.split('|');
    let target = parts.next().unwrap_or("").trim().to_ascii_lowercase();
    if !target.starts_with("file:") && !target.starts_with("image:") {
        return false;
    }

    for part in parts {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let lower = part.to_ascii_lowercase();
        if FORMAT_PARAMS.contains(&lower.as_str()) {
            continue;
        }
        if is_size_param(&lower) || is_upright_param(&lower) {
            continue;
        }
        // caption prose (alt= and link= included, both are reviewer territory)
        return false;
    }

    true
}

fn is_size_param(part: &str) -> bool {
    part.strip_suffix("px")
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit() || c == 'x'))
}

fn is_upright_param(part: &str) -> bool {
    part.strip_prefix("upright=")
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit() || c == '.'))
}
