//! Search orchestration: resolve a query, then filter and sort the results
//! the way the caller asked for.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::catalog::{Catalog, Category, CommandRecord, Difficulty};
use crate::config::SearchConfig;
use crate::ranking::{Ranker, SearchMode};

/// Result ordering applied after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Keep the order produced by the ranker.
    #[default]
    Relevance,
    Name,
    Category,
    Difficulty,
    /// Most popular first.
    Popularity,
    /// Most recently updated first.
    Recent,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::Name => "name",
            SortBy::Category => "category",
            SortBy::Difficulty => "difficulty",
            SortBy::Popularity => "popularity",
            SortBy::Recent => "recent",
        }
    }

    /// Stable sort of `results` in place.
    pub fn apply(&self, results: &mut [&CommandRecord]) {
        match self {
            SortBy::Relevance => {}
            SortBy::Name => results.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name))
            }),
            SortBy::Category => results.sort_by(|a, b| a.category.as_str().cmp(b.category.as_str())),
            SortBy::Difficulty => results.sort_by_key(|r| r.difficulty),
            SortBy::Popularity => results.sort_by(|a, b| b.popularity.total_cmp(&a.popularity)),
            SortBy::Recent => results.sort_by(|a, b| b.last_updated.cmp(&a.last_updated)),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" => Ok(SortBy::Relevance),
            "name" => Ok(SortBy::Name),
            "category" => Ok(SortBy::Category),
            "difficulty" => Ok(SortBy::Difficulty),
            "popularity" => Ok(SortBy::Popularity),
            "recent" => Ok(SortBy::Recent),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// Either no filtering or a single accepted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T: FromStr + PartialEq> Filter<T> {
    /// Lenient parse: blank, `all` and unrecognized values mean no filter.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            return Filter::All;
        }
        match value.parse() {
            Ok(v) => Filter::Only(v),
            Err(_) => {
                tracing::debug!(value, "ignoring unknown filter value");
                Filter::All
            }
        }
    }

    pub fn matches(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == value,
        }
    }
}

/// Everything the caller selects for one search.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: String,
    pub mode: SearchMode,
    pub category: Filter<Category>,
    pub difficulty: Filter<Difficulty>,
    pub favorites_only: bool,
    pub sort_by: SortBy,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            query: query.into(),
            mode,
            ..Default::default()
        }
    }

    pub fn category(mut self, value: &str) -> Self {
        self.category = Filter::parse(value);
        self
    }

    pub fn difficulty(mut self, value: &str) -> Self {
        self.difficulty = Filter::parse(value);
        self
    }

    pub fn favorites_only(mut self, yes: bool) -> Self {
        self.favorites_only = yes;
        self
    }

    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }
}

/// Public entry point for searching a catalog.
pub struct SearchEngine<'c> {
    ranker: Ranker<'c>,
    max_results: usize,
}

impl<'c> SearchEngine<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            ranker: Ranker::new(catalog),
            max_results: 0,
        }
    }

    /// Engine tuned by user configuration: thresholds, extra phrases and
    /// the result cap.
    pub fn with_config(catalog: &'c Catalog, config: &SearchConfig) -> Self {
        Self {
            ranker: Ranker::with_settings(catalog, config.pattern_dictionary(), config.thresholds()),
            max_results: config.search.max_results,
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.ranker.catalog()
    }

    /// Resolve, filter and sort. `favorites` is only consulted when the
    /// request asks for favorites.
    pub fn search<S: AsRef<str>>(
        &self,
        request: &SearchRequest,
        favorites: &[S],
    ) -> Vec<&'c CommandRecord> {
        let favorites: HashSet<&str> = favorites.iter().map(|f| f.as_ref()).collect();

        let mut results: Vec<&'c CommandRecord> = self
            .ranker
            .resolve(&request.query, request.mode)
            .into_iter()
            .filter(|r| request.category.matches(&r.category))
            .filter(|r| request.difficulty.matches(&r.difficulty))
            .filter(|r| !request.favorites_only || favorites.contains(r.id.as_str()))
            .collect();

        request.sort_by.apply(&mut results);

        if self.max_results > 0 {
            results.truncate(self.max_results);
        }

        tracing::debug!(
            query = %request.query,
            sort = %request.sort_by,
            results = results.len(),
            "search finished"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::{catalog, record};
    use chrono::NaiveDate;

    const NO_FAVORITES: &[&str] = &[];

    fn names(results: &[&CommandRecord]) -> Vec<String> {
        results.iter().map(|r| r.name.clone()).collect()
    }

    /// 50 records cycling through categories, difficulties and popularity.
    fn synthesized() -> Catalog {
        let categories = [
            Category::Network,
            Category::Files,
            Category::System,
            Category::Network,
            Category::Text,
        ];
        let difficulties = [
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
        ];
        let records = (0..50)
            .map(|i| {
                let mut r = record(&format!("cmd-{i:02}"), &format!("tool{i:02}"));
                r.category = categories[i % categories.len()];
                r.difficulty = difficulties[i % difficulties.len()];
                r.popularity = ((i * 37) % 100) as f64;
                r.last_updated = NaiveDate::from_ymd_opt(2024, 1 + (i % 12) as u32, 1).unwrap();
                r
            })
            .collect();
        catalog(records)
    }

    #[test]
    fn test_filter_parse_is_lenient() {
        assert_eq!(Filter::<Category>::parse("network"), Filter::Only(Category::Network));
        assert_eq!(Filter::<Category>::parse(" Network "), Filter::Only(Category::Network));
        assert_eq!(Filter::<Category>::parse("all"), Filter::All);
        assert_eq!(Filter::<Category>::parse(""), Filter::All);
        assert_eq!(Filter::<Category>::parse("nonsense"), Filter::All);
        assert_eq!(Filter::<Difficulty>::parse("expert"), Filter::All);
        assert_eq!(Filter::<Difficulty>::parse("advanced"), Filter::Only(Difficulty::Advanced));
    }

    #[test]
    fn test_empty_query_passthrough() {
        let cat = synthesized();
        let engine = SearchEngine::new(&cat);
        let results = engine.search(&SearchRequest::default(), NO_FAVORITES);
        assert_eq!(results.len(), 50);
        // relevance keeps catalog order
        assert_eq!(results[0].id, "cmd-00");
        assert_eq!(results[49].id, "cmd-49");
    }

    #[test]
    fn test_filter_composition() {
        let cat = synthesized();
        let engine = SearchEngine::new(&cat);

        let request = SearchRequest::new("", SearchMode::Literal)
            .category("network")
            .difficulty("beginner")
            .sort_by(SortBy::Popularity);
        let results = engine.search(&request, NO_FAVORITES);

        let expected = cat
            .iter()
            .filter(|r| r.category == Category::Network && r.difficulty == Difficulty::Beginner)
            .count();
        assert!(expected > 0);
        assert_eq!(results.len(), expected);
        assert!(results
            .iter()
            .all(|r| r.category == Category::Network && r.difficulty == Difficulty::Beginner));
        for pair in results.windows(2) {
            assert!(pair[0].popularity >= pair[1].popularity);
        }
    }

    #[test]
    fn test_unknown_filters_apply_nothing() {
        let cat = synthesized();
        let engine = SearchEngine::new(&cat);
        let request = SearchRequest::new("", SearchMode::Literal)
            .category("stale-category")
            .difficulty("wizard");
        assert_eq!(engine.search(&request, NO_FAVORITES).len(), 50);
    }

    #[test]
    fn test_favorites_filter() {
        let cat = synthesized();
        let engine = SearchEngine::new(&cat);
        let favorites = vec!["cmd-03".to_string(), "cmd-07".to_string(), "missing".to_string()];

        let request = SearchRequest::new("", SearchMode::Literal).favorites_only(true);
        let results = engine.search(&request, favorites.as_slice());
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["cmd-03", "cmd-07"]);

        // ignored unless asked for
        let request = SearchRequest::new("", SearchMode::Literal);
        assert_eq!(engine.search(&request, favorites.as_slice()).len(), 50);
    }

    #[test]
    fn test_sort_orders() {
        let cat = synthesized();
        let engine = SearchEngine::new(&cat);
        let run = |sort: SortBy| engine.search(&SearchRequest::default().sort_by(sort), NO_FAVORITES);

        let by_name = run(SortBy::Name);
        for pair in by_name.windows(2) {
            assert!(pair[0].name <= pair[1].name);
        }

        let by_category = run(SortBy::Category);
        for pair in by_category.windows(2) {
            assert!(pair[0].category.as_str() <= pair[1].category.as_str());
        }

        let by_difficulty = run(SortBy::Difficulty);
        for pair in by_difficulty.windows(2) {
            assert!(pair[0].difficulty <= pair[1].difficulty);
        }

        let by_recent = run(SortBy::Recent);
        for pair in by_recent.windows(2) {
            assert!(pair[0].last_updated >= pair[1].last_updated);
        }
    }

    #[test]
    fn test_sorts_are_stable() {
        let cat = synthesized();
        let engine = SearchEngine::new(&cat);
        let results = engine.search(&SearchRequest::default().sort_by(SortBy::Difficulty), NO_FAVORITES);

        // equal difficulty keeps catalog order
        let beginners: Vec<&str> = results
            .iter()
            .filter(|r| r.difficulty == Difficulty::Beginner)
            .map(|r| r.id.as_str())
            .collect();
        let mut sorted = beginners.clone();
        sorted.sort();
        assert_eq!(beginners, sorted);
    }

    #[test]
    fn test_sort_applies_after_ranking() {
        let cat = catalog(vec![record("chown", "chown"), record("chmod", "chmod"), record("chgrp", "chgrp")]);
        let engine = SearchEngine::new(&cat);
        let request = SearchRequest::new("ch", SearchMode::Literal).sort_by(SortBy::Name);
        assert_eq!(names(&engine.search(&request, NO_FAVORITES)), vec!["chgrp", "chmod", "chown"]);
    }

    #[test]
    fn test_exact_literal_match_survives_orchestration() {
        let cat = catalog(vec![record("lsblk", "lsblk"), record("ls", "ls")]);
        let engine = SearchEngine::new(&cat);
        let request = SearchRequest::new("ls", SearchMode::Literal);
        assert_eq!(names(&engine.search(&request, NO_FAVORITES)), vec!["ls"]);
    }

    #[test]
    fn test_max_results_cap() {
        let cat = synthesized();
        let mut config = SearchConfig::default();
        config.search.max_results = 5;
        let engine = SearchEngine::with_config(&cat, &config);
        assert_eq!(engine.search(&SearchRequest::default(), NO_FAVORITES).len(), 5);
    }

    #[test]
    fn test_natural_language_bundled_catalog() {
        let cat = Catalog::bundled().unwrap();
        let engine = SearchEngine::new(&cat);

        let request = SearchRequest::new("how do i delete a user", SearchMode::NaturalLanguage);
        let results = engine.search(&request, NO_FAVORITES);
        assert!(names(&results).contains(&"userdel".to_string()));

        let request = SearchRequest::new("how to kill a process", SearchMode::NaturalLanguage);
        let found = names(&engine.search(&request, NO_FAVORITES));
        let kill = found.iter().position(|n| n == "kill").unwrap();
        if let Some(pkill) = found.iter().position(|n| n == "pkill") {
            assert!(kill < pkill);
        }
    }

    #[test]
    fn test_sort_by_parse() {
        assert_eq!("Recent".parse::<SortBy>().unwrap(), SortBy::Recent);
        assert!("random".parse::<SortBy>().is_err());
    }
}
