//! Query resolution: turns a query and a mode into an ordered, deduplicated
//! list of catalog records.
//!
//! Literal mode is for people who already know the command name. An exact
//! name match returns that record alone; otherwise prefix matches are
//! returned alphabetically; otherwise the strict fuzzy index is consulted.
//!
//! Natural-language mode is for question-shaped queries. Candidates come from
//! the lenient fuzzy index over enriched records plus every command suggested
//! by the phrase dictionary, and all of them are ranked by [`relevance_score`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::catalog::{Catalog, CommandRecord};
use crate::services::enrich::{enrich_all, searchable_text};
use crate::services::fuzzy::{FuzzyIndex, FuzzyOptions};
use crate::services::keywords::extract_keywords;
use crate::services::patterns::PatternDictionary;

/// Literal fuzzy hits scoring below this are kept even without a name match.
pub const DEFAULT_EXCELLENT_SCORE: f64 = 0.2;

/// Natural-language fuzzy hits scoring above this are dropped.
pub const DEFAULT_GOOD_ENOUGH_SCORE: f64 = 0.5;

const PATTERN_BONUS: f64 = 100.0;
const NAME_EXACT_BONUS: f64 = 80.0;
const NAME_CONTAINS_BONUS: f64 = 50.0;
const DESCRIPTION_BONUS: f64 = 20.0;
const TAG_BONUS: f64 = 15.0;
const TEXT_BONUS: f64 = 10.0;
const POPULARITY_WEIGHT: f64 = 0.1;

/// How a query should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    #[default]
    Literal,
    NaturalLanguage,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Literal => f.write_str("literal"),
            SearchMode::NaturalLanguage => f.write_str("natural-language"),
        }
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "literal" | "lit" => Ok(SearchMode::Literal),
            "natural-language" | "natural" | "nl" => Ok(SearchMode::NaturalLanguage),
            other => Err(format!("unknown search mode '{}'", other)),
        }
    }
}

/// Score cut-offs applied to fuzzy hits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub excellent_score: f64,
    pub good_enough_score: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            excellent_score: DEFAULT_EXCELLENT_SCORE,
            good_enough_score: DEFAULT_GOOD_ENOUGH_SCORE,
        }
    }
}

/// A record with its relevance for one query. Scores only compare within
/// the query that produced them.
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'c> {
    pub record: &'c CommandRecord,
    pub score: f64,
}

/// Relevance of a record to extracted keywords and dictionary suggestions.
///
/// Returns 0 when nothing matched at all, so popularity alone never lifts a
/// record into the results.
pub fn relevance_score(
    record: &CommandRecord,
    keywords: &[String],
    pattern_matches: &[String],
) -> f64 {
    let name = record.name.to_lowercase();
    let description = record.description.to_lowercase();
    let text = searchable_text(record);
    let tags: Vec<String> = record.tags.iter().map(|t| t.to_lowercase()).collect();

    let mut score = 0.0;
    let mut has_match = false;

    let pattern_hit = pattern_matches.iter().any(|m| {
        let m = m.to_lowercase();
        name == m || name.contains(&m)
    });
    if pattern_hit {
        score += PATTERN_BONUS;
        has_match = true;
    }

    for keyword in keywords {
        let keyword = keyword.to_lowercase();

        if name == keyword {
            score += NAME_EXACT_BONUS;
            has_match = true;
        } else if name.contains(&keyword) {
            score += NAME_CONTAINS_BONUS;
            has_match = true;
        }

        if description.contains(&keyword) {
            score += DESCRIPTION_BONUS;
            has_match = true;
        }

        if text.contains(&keyword) {
            score += TEXT_BONUS;
            has_match = true;
        }

        if tags.iter().any(|t| t.contains(&keyword)) {
            score += TAG_BONUS;
            has_match = true;
        }
    }

    if !has_match {
        return 0.0;
    }

    score + record.popularity * POPULARITY_WEIGHT
}

/// Keep the first record seen for every id.
fn dedup_by_id<'c>(records: impl IntoIterator<Item = &'c CommandRecord>) -> Vec<&'c CommandRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.id.as_str()))
        .collect()
}

/// Resolves queries against one catalog.
///
/// The literal index borrows the catalog and is built once; natural-language
/// resolution enriches and indexes the catalog afresh on every call.
pub struct Ranker<'c> {
    catalog: &'c Catalog,
    literal_index: FuzzyIndex<'c, CommandRecord>,
    patterns: PatternDictionary,
    thresholds: Thresholds,
}

impl<'c> Ranker<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self::with_settings(
            catalog,
            PatternDictionary::builtin().clone(),
            Thresholds::default(),
        )
    }

    pub fn with_settings(
        catalog: &'c Catalog,
        patterns: PatternDictionary,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            catalog,
            literal_index: FuzzyIndex::new(catalog.commands(), FuzzyOptions::literal()),
            patterns,
            thresholds,
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Resolve `query` in `mode`.
    pub fn resolve(&self, query: &str, mode: SearchMode) -> Vec<&'c CommandRecord> {
        let results = match mode {
            SearchMode::Literal => self.resolve_literal(query),
            SearchMode::NaturalLanguage => self.resolve_natural(query),
        };
        tracing::debug!(%mode, query, results = results.len(), "resolved query");
        results
    }

    fn resolve_literal(&self, query: &str) -> Vec<&'c CommandRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.catalog.iter().collect();
        }

        if let Some(exact) = self
            .catalog
            .iter()
            .find(|c| c.name.to_lowercase() == needle)
        {
            return vec![exact];
        }

        let mut prefixed: Vec<&'c CommandRecord> = self
            .catalog
            .iter()
            .filter(|c| c.name.to_lowercase().starts_with(&needle))
            .collect();
        if !prefixed.is_empty() {
            prefixed.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name))
            });
            return prefixed;
        }

        let mut hits: Vec<(bool, f64, &'c CommandRecord)> = self
            .literal_index
            .search(query)
            .into_iter()
            .filter_map(|hit| {
                let in_name = hit.item.name.to_lowercase().contains(&needle);
                (in_name || hit.score < self.thresholds.excellent_score)
                    .then_some((in_name, hit.score, hit.item))
            })
            .collect();

        hits.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.total_cmp(&b.1)));
        dedup_by_id(hits.into_iter().map(|(_, _, record)| record))
    }

    fn resolve_natural(&self, query: &str) -> Vec<&'c CommandRecord> {
        let keywords = extract_keywords(query);
        let pattern_matches = self.patterns.find_matching_patterns(&keywords);
        tracing::debug!(?keywords, ?pattern_matches, "natural-language signals");

        let enriched = enrich_all(self.catalog.commands());
        let index = FuzzyIndex::new(&enriched, FuzzyOptions::natural_language());

        let mut scored: Vec<ScoredCandidate<'c>> = index
            .search(query)
            .into_iter()
            .filter(|hit| hit.score <= self.thresholds.good_enough_score)
            .map(|hit| hit.item.record)
            .map(|record| ScoredCandidate {
                record,
                score: relevance_score(record, &keywords, &pattern_matches),
            })
            .filter(|c| c.score > 0.0)
            .collect();

        let mut present: HashSet<&'c str> = scored.iter().map(|c| c.record.id.as_str()).collect();
        for pattern in &pattern_matches {
            let pattern = pattern.to_lowercase();
            for record in self.catalog.iter() {
                if !record.name.to_lowercase().contains(&pattern) {
                    continue;
                }
                if !present.insert(record.id.as_str()) {
                    continue;
                }
                let score = relevance_score(record, &keywords, &pattern_matches);
                if score > 0.0 {
                    scored.push(ScoredCandidate { record, score });
                }
            }
        }

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        dedup_by_id(scored.into_iter().map(|c| c.record))
    }
}

/// Resolve a query against a catalog with default settings.
pub fn resolve_query<'c>(
    query: &str,
    mode: SearchMode,
    catalog: &'c Catalog,
) -> Vec<&'c CommandRecord> {
    Ranker::new(catalog).resolve(query, mode)
}
