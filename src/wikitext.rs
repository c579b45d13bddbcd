//! Wikitext normalization.
//!
//! Stateless transforms that strip structural markup (reference tags, external
//! links, comments) from a diff's added text so that the predicates in
//! [`crate::cull`] only ever see substantive prose, or the absence of it.
//!
//! All transforms are total over arbitrary input and idempotent: applying one
//! to its own output is a no-op. Removal is exact-span, adjacent whitespace
//! and punctuation are never touched.

use std::sync::LazyLock;

use regex::Regex;

/// A filtering function as installed into the [`crate::analyzer::Analyzer`]:
/// raw added text in, filtered text out.
pub type FilterFn = Box<dyn Fn(&str) -> String>;

/// Compose an ordered sequence of transforms into a single filtering
/// function, applied left to right.
pub fn chain(transforms: Vec<FilterFn>) -> FilterFn {
    Box::new(move |text| {
        let mut text = text.to_string();
        for transform in &transforms {
            text = transform(&text);
        }
        text
    })
}

/// The standard normalizer chain: comments, then references, then external
/// links.
pub fn default_chain() -> FilterFn {
    chain(vec![
        Box::new(remove_comments),
        Box::new(remove_references),
        Box::new(remove_external_links),
    ])
}

fn remove_comments_(text: &str) -> String {
    static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

    COMMENT.replace_all(text, "").into_owned()
}

/// Removes every `<!-- ... -->` span, including multi-line spans.
pub fn remove_comments(text: &str) -> String {
    fixpoint(text, remove_comments_)
}

fn remove_external_links_(text: &str) -> String {
    static EXTERNAL_LINK: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[https?://[^\]]*\]").unwrap());

    EXTERNAL_LINK.replace_all(text, "").into_owned()
}

/// Removes every `[http(s)://... label]` construct in its entirety, brackets
/// and label included. A list-item marker in front of the link survives.
pub fn remove_external_links(text: &str) -> String {
    fixpoint(text, remove_external_links_)
}

/// Removes every balanced `<ref>...</ref>` span and every self-closing
/// reference tag, attributes and all. An opening tag with no matching close
/// is left untouched so that truncated diff text is never corrupted.
pub fn remove_references(text: &str) -> String {
    fixpoint(text, remove_references_)
}

// removal can splice a new instance together out of the surrounding text,
// so each transform is iterated until the output stops changing
fn fixpoint(text: &str, transform: fn(&str) -> String) -> String {
    let mut current = transform(text);
    loop {
        let next = transform(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

enum RefTag {
    /// `<ref>` or `<ref name="...">`, span length of the opening tag.
    Open(usize),
    /// `<ref ... />`, span length of the whole tag.
    SelfClosing(usize),
}

/// Scans the opening tag at the start of `text` (which begins with `<ref`).
///
/// Explicit scan instead of a regex so that `>` inside quoted attribute
/// values does not terminate the tag. Returns `None` if the tag itself is
/// never closed by a `>`.
fn scan_opening_tag(text: &str) -> Option<RefTag> {
    let mut quote: Option<char> = None;
    let mut last_nonspace = ' ';

    for (i, c) in text.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '>' => {
                    let len = i + c.len_utf8();
                    return Some(if last_nonspace == '/' {
                        RefTag::SelfClosing(len)
                    } else {
                        RefTag::Open(len)
                    });
                }
                _ => {}
            },
        }
        if !c.is_whitespace() {
            last_nonspace = c;
        }
    }

    None
}

fn remove_references_(text: &str) -> String {
    const CLOSE: &str = "</ref>";

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("<ref") {
        // don't mistake tags like <references /> for a reference
        let boundary = rest[start + 4..].chars().next();
        let is_ref_tag =
            matches!(boundary, Some('>') | Some('/') | None) || boundary.is_some_and(char::is_whitespace);
        if !is_ref_tag {
            out.push_str(&rest[..start + 4]);
            rest = &rest[start + 4..];
            continue;
        }

        match scan_opening_tag(&rest[start..]) {
            Some(RefTag::SelfClosing(len)) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + len..];
            }
            Some(RefTag::Open(len)) => match rest[start + len..].find(CLOSE) {
                Some(close) => {
                    out.push_str(&rest[..start]);
                    rest = &rest[start + len + close + CLOSE.len()..];
                }
                None => {
                    // unbalanced opening tag, keep it as-is
                    out.push_str(&rest[..start + len]);
                    rest = &rest[start + len..];
                }
            },
            None => {
                // `<ref` that is not even a complete tag, keep it as-is
                out.push_str(&rest[..start + 4]);
                rest = &rest[start + 4..];
            }
        }
    }

    out.push_str(rest);
    out
}
