use rustc_hash::FxHashMap;

use crate::source::{DiffSource, FetchError};

/// In-memory stand-in for the wiki: a fixed map from diff id to added text.
pub struct MapDiffSource {
    texts: FxHashMap<u64, String>,
}

impl MapDiffSource {
    pub fn new(entries: &[(u64, &str)]) -> Self {
        Self {
            texts: entries
                .iter()
                .map(|(id, text)| (*id, text.to_string()))
                .collect(),
        }
    }
}

impl DiffSource for MapDiffSource {
    fn added_text(&self, diff_id: u64) -> Result<String, FetchError> {
        self.texts
            .get(&diff_id)
            .cloned()
            .ok_or(FetchError::NotFound(diff_id))
    }
}
