//! JSON catalog search.
//!
//! Loads a catalog file (`[{id, title, genres, year, overview}]`) once and
//! ranks entries against a space-separated search term by token overlap:
//! a term token found in the title scores 3, in a genre or matching the year
//! scores 2, in the overview scores 1. Entries that score zero are dropped;
//! the rest are ordered by score, then title.

use std::collections::HashSet;
use std::path::Path;

use cinechat_core::search::SearchBackend;
use cinechat_types::error::SearchError;
use cinechat_types::item::ItemRef;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const TITLE_WEIGHT: u32 = 3;
const GENRE_WEIGHT: u32 = 2;
const YEAR_WEIGHT: u32 = 2;
const OVERVIEW_WEIGHT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub overview: String,
}

/// Pre-tokenised entry.
struct Indexed {
    entry: CatalogEntry,
    title: HashSet<String>,
    genres: HashSet<String>,
    overview: HashSet<String>,
}

impl Indexed {
    fn new(entry: CatalogEntry) -> Self {
        Self {
            title: tokens(&entry.title),
            genres: entry.genres.iter().flat_map(|g| tokens(g)).collect(),
            overview: tokens(&entry.overview),
            entry,
        }
    }

    fn score(&self, term_tokens: &[String]) -> u32 {
        term_tokens
            .iter()
            .map(|token| {
                let mut score = 0;
                if self.title.contains(token) {
                    score += TITLE_WEIGHT;
                }
                if self.genres.contains(token) {
                    score += GENRE_WEIGHT;
                }
                if self.entry.year.is_some_and(|y| y.to_string() == *token) {
                    score += YEAR_WEIGHT;
                }
                if self.overview.contains(token) {
                    score += OVERVIEW_WEIGHT;
                }
                score
            })
            .sum()
    }
}

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\'').to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

pub struct CatalogSearch {
    entries: Vec<Indexed>,
}

impl CatalogSearch {
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(Indexed::new).collect(),
        }
    }

    /// Load and index a catalog file.
    pub async fn load(path: &Path) -> Result<Self, SearchError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SearchError::Catalog(format!("cannot read {}: {e}", path.display())))?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&content)
            .map_err(|e| SearchError::Catalog(format!("invalid catalog {}: {e}", path.display())))?;
        info!(path = %path.display(), entries = entries.len(), "catalog loaded");
        Ok(Self::from_entries(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SearchBackend for CatalogSearch {
    fn name(&self) -> &str {
        "catalog"
    }

    async fn search(&self, term: &str) -> Result<Vec<ItemRef>, SearchError> {
        let mut term_tokens: Vec<String> = tokens(term).into_iter().collect();
        term_tokens.sort();
        if term_tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(u32, &CatalogEntry)> = self
            .entries
            .iter()
            .map(|indexed| (indexed.score(&term_tokens), &indexed.entry))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|(a_score, a), (b_score, b)| {
            b_score.cmp(a_score).then_with(|| a.title.cmp(&b.title))
        });

        debug!(term, hits = scored.len(), "catalog search");
        Ok(scored
            .into_iter()
            .map(|(_, entry)| ItemRef::new(entry.id.clone(), entry.title.clone()))
            .collect())
    }
}
