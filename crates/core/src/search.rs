//! Cross-source search over instruments and content items.
//!
//! Matching is case-insensitive substring containment. Results interleave
//! the two sources starting with instruments; once one source runs out the
//! remainder comes from the other. At most [`MAX_RESULTS`] hits are
//! produced, and queries shorter than [`MIN_QUERY_LEN`] characters yield
//! nothing at all.

use serde::Serialize;

use coindash_market_data::{ContentItem, Instrument};

/// Queries shorter than this (after trimming) return no results.
pub const MIN_QUERY_LEN: usize = 2;

/// Upper bound on hits per query.
pub const MAX_RESULTS: usize = 8;

/// Which source a hit came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Instrument,
    Content,
}

/// One search result, normalized for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub kind: SearchKind,
    pub id: String,
    pub title: String,
    pub subtitle: String,
}

/// Lazy result stream for one query.
pub struct SearchResults<'a> {
    needle: Option<String>,
    instruments: std::slice::Iter<'a, Instrument>,
    content: std::slice::Iter<'a, ContentItem>,
    take_content_next: bool,
    emitted: usize,
}

/// Search `instruments` and `content` for `query`.
pub fn search<'a>(
    query: &str,
    instruments: &'a [Instrument],
    content: &'a [ContentItem],
) -> SearchResults<'a> {
    let trimmed = query.trim();
    let needle = if trimmed.chars().count() < MIN_QUERY_LEN {
        None
    } else {
        Some(trimmed.to_lowercase())
    };

    SearchResults {
        needle,
        instruments: instruments.iter(),
        content: content.iter(),
        take_content_next: false,
        emitted: 0,
    }
}

impl SearchResults<'_> {
    fn instrument_hit(&mut self, needle: &str) -> Option<SearchHit> {
        self.instruments
            .by_ref()
            .find(|instrument| {
                instrument.name.to_lowercase().contains(needle)
                    || instrument.symbol.to_lowercase().contains(needle)
            })
            .map(|instrument| SearchHit {
                kind: SearchKind::Instrument,
                id: instrument.id.clone(),
                title: instrument.name.clone(),
                subtitle: instrument.symbol.to_uppercase(),
            })
    }

    fn content_hit(&mut self, needle: &str) -> Option<SearchHit> {
        self.content
            .by_ref()
            .find(|item| {
                item.title().to_lowercase().contains(needle)
                    || item.description().to_lowercase().contains(needle)
            })
            .map(|item| SearchHit {
                kind: SearchKind::Content,
                id: item.id().to_string(),
                title: item.title().to_string(),
                subtitle: item.channel(),
            })
    }
}

impl Iterator for SearchResults<'_> {
    type Item = SearchHit;

    fn next(&mut self) -> Option<SearchHit> {
        if self.emitted >= MAX_RESULTS {
            return None;
        }
        let needle = self.needle.clone()?;
        let hit = if self.take_content_next {
            self.content_hit(&needle)
                .or_else(|| self.instrument_hit(&needle))
        } else {
            self.instrument_hit(&needle)
                .or_else(|| self.content_hit(&needle))
        }?;
        self.take_content_next = !self.take_content_next;
        self.emitted += 1;
        Some(hit)
    }
}
