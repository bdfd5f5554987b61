//! Weighted multi-field fuzzy index.
//!
//! Every indexed field value gets a score in `[0, 1]` where 0 is a perfect
//! match. Two scorers run on each value and the better one wins:
//!
//! - approximate substring matching: the fewest edits that turn the query
//!   into some substring of the value, divided by the query length;
//! - skim subsequence matching (`fuzzy-matcher`), normalized against the
//!   query's score on itself, which catches abbreviations like `chmd`.
//!   Characters skipped between the first and last matched position add
//!   `gaps / query length`, so scattered hits never look near-exact.
//!
//! When location matters, the match offset divided by `distance` is added.
//! A field matches when its score is at most `threshold`. Matched fields are
//! combined as `prod(score ^ (weight * norm))`, where weights are normalized
//! to sum to 1 and `norm = 1 / sqrt(words)` damps long fields.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::catalog::CommandRecord;
use crate::services::enrich::EnrichedRecord;

/// Fields a fuzzy index can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Description,
    Tags,
    Category,
    SearchableText,
}

/// Something whose fields can be indexed.
pub trait Searchable {
    /// Values stored under `field`. Missing fields return no values.
    fn field_values(&self, field: Field) -> Vec<&str>;
}

impl Searchable for CommandRecord {
    fn field_values(&self, field: Field) -> Vec<&str> {
        match field {
            Field::Name => vec![self.name.as_str()],
            Field::Description => vec![self.description.as_str()],
            Field::Tags => self.tags.iter().map(String::as_str).collect(),
            Field::Category => vec![self.category.as_str()],
            Field::SearchableText => Vec::new(),
        }
    }
}

impl Searchable for EnrichedRecord<'_> {
    fn field_values(&self, field: Field) -> Vec<&str> {
        match field {
            Field::SearchableText => vec![self.searchable_text.as_str()],
            other => self.record.field_values(other),
        }
    }
}

/// Tuning for one fuzzy index.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyOptions {
    /// Indexed fields and their relative weights.
    pub keys: Vec<(Field, f64)>,
    /// Highest per-field score that still counts as a match.
    pub threshold: f64,
    /// Score matches the same wherever they occur in the value.
    pub ignore_location: bool,
    /// Where matches are expected to start when location matters.
    pub location: usize,
    /// How far from `location` a match may drift before it costs a full point.
    pub distance: usize,
    /// Minimum query length in characters; shorter queries return nothing.
    pub min_match_len: usize,
}

impl FuzzyOptions {
    /// Strict lookup dominated by the command name.
    pub fn literal() -> Self {
        Self {
            keys: vec![
                (Field::Name, 10.0),
                (Field::Description, 0.1),
                (Field::Tags, 0.05),
            ],
            threshold: 0.3,
            ignore_location: false,
            location: 0,
            distance: 100,
            min_match_len: 2,
        }
    }

    /// Lenient full-text lookup over enriched records.
    pub fn natural_language() -> Self {
        Self {
            keys: vec![
                (Field::Name, 0.3),
                (Field::Description, 0.4),
                (Field::SearchableText, 0.5),
                (Field::Tags, 0.2),
                (Field::Category, 0.1),
            ],
            threshold: 0.4,
            ignore_location: true,
            location: 0,
            distance: 100,
            min_match_len: 2,
        }
    }
}

/// One scored hit. Lower `score` is better.
#[derive(Debug, Clone)]
pub struct FuzzyMatch<'a, T> {
    pub item: &'a T,
    pub score: f64,
}

struct IndexedValue {
    text: String,
    chars: Vec<char>,
    norm: f64,
}

/// Fuzzy index over a borrowed slice. Building lowercases every field once;
/// searching never mutates the index.
pub struct FuzzyIndex<'a, T> {
    items: &'a [T],
    // item -> key -> values
    values: Vec<Vec<Vec<IndexedValue>>>,
    weights: Vec<f64>,
    options: FuzzyOptions,
    matcher: SkimMatcherV2,
}

impl<'a, T: Searchable> FuzzyIndex<'a, T> {
    pub fn new(items: &'a [T], options: FuzzyOptions) -> Self {
        let total: f64 = options.keys.iter().map(|(_, w)| *w).sum();
        let weights: Vec<f64> = options
            .keys
            .iter()
            .map(|(_, w)| if total > 0.0 { w / total } else { 0.0 })
            .collect();

        let values: Vec<Vec<Vec<IndexedValue>>> = items
            .iter()
            .map(|item| {
                options
                    .keys
                    .iter()
                    .map(|(field, _)| {
                        item.field_values(*field)
                            .into_iter()
                            .filter(|v| !v.trim().is_empty())
                            .map(|v| {
                                let text = v.to_lowercase();
                                IndexedValue {
                                    chars: text.chars().collect(),
                                    norm: field_norm(&text),
                                    text,
                                }
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect();

        Self {
            items,
            values,
            weights,
            options,
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Matching items, best first. Ties keep slice order.
    pub fn search(&self, query: &str) -> Vec<FuzzyMatch<'a, T>> {
        let pattern = query.trim().to_lowercase();
        let pattern_chars: Vec<char> = pattern.chars().collect();
        if pattern_chars.is_empty() || pattern_chars.len() < self.options.min_match_len {
            return Vec::new();
        }

        let self_score = self
            .matcher
            .fuzzy_match(&pattern, &pattern)
            .filter(|s| *s > 0);

        let mut results: Vec<FuzzyMatch<'a, T>> = self
            .values
            .iter()
            .enumerate()
            .filter_map(|(index, keys)| {
                let mut total = 1.0f64;
                let mut matched = false;

                for (values, weight) in keys.iter().zip(&self.weights) {
                    let best = values
                        .iter()
                        .filter_map(|v| {
                            self.value_score(v, &pattern, &pattern_chars, self_score)
                                .map(|s| (s, v.norm))
                        })
                        .min_by(|a, b| a.0.total_cmp(&b.0));

                    if let Some((score, norm)) = best {
                        matched = true;
                        let base = if score == 0.0 { f64::EPSILON } else { score };
                        total *= base.powf(weight * norm);
                    }
                }

                matched.then(|| FuzzyMatch {
                    item: &self.items[index],
                    score: total.clamp(0.0, 1.0),
                })
            })
            .collect();

        results.sort_by(|a, b| a.score.total_cmp(&b.score));
        results
    }

    /// Score one lowercase value, or `None` when it misses the threshold.
    fn value_score(
        &self,
        value: &IndexedValue,
        pattern: &str,
        pattern_chars: &[char],
        self_score: Option<i64>,
    ) -> Option<f64> {
        let m = pattern_chars.len() as f64;

        let edit_score = match value.text.find(pattern) {
            Some(byte_pos) => {
                let start = value.text[..byte_pos].chars().count();
                self.proximity(start)
            }
            None => {
                let (errors, end) = approximate_substring(&value.chars, pattern_chars);
                let start = (end + 1).saturating_sub(pattern_chars.len());
                errors as f64 / m + self.proximity(start)
            }
        };

        // unmatched characters inside the matched span count like edits
        let subsequence_score = self_score.and_then(|best| {
            let (score, indices) = self.matcher.fuzzy_indices(&value.text, pattern)?;
            let ratio = (score as f64 / best as f64).clamp(0.0, 1.0);
            let start = *indices.first()?;
            let end = *indices.last()?;
            let gaps = (end + 1 - start).saturating_sub(pattern_chars.len()) as f64 / m;
            Some(1.0 - ratio + gaps + self.proximity(start))
        });

        let score = match subsequence_score {
            Some(s) => edit_score.min(s),
            None => edit_score,
        };

        (score <= self.options.threshold).then_some(score)
    }

    fn proximity(&self, start: usize) -> f64 {
        if self.options.ignore_location {
            return 0.0;
        }
        let offset = start.abs_diff(self.options.location) as f64;
        if self.options.distance == 0 {
            return if offset == 0.0 { 0.0 } else { 1.0 };
        }
        offset / self.options.distance as f64
    }
}

/// `1 / sqrt(word count)`, rounded to three places.
fn field_norm(text: &str) -> f64 {
    let words = text.split_whitespace().count().max(1) as f64;
    (1000.0 / words.sqrt()).round() / 1000.0
}

/// Fewest edits turning `pattern` into any substring of `text`, and the
/// character index where that substring ends.
fn approximate_substring(text: &[char], pattern: &[char]) -> (usize, usize) {
    let m = pattern.len();
    let mut prev: Vec<usize> = (0..=m).collect();
    let mut curr = vec![0usize; m + 1];
    let mut best = (m, 0usize);

    for (j, &tc) in text.iter().enumerate() {
        curr[0] = 0;
        for i in 1..=m {
            let substitute = prev[i - 1] + usize::from(pattern[i - 1] != tc);
            curr[i] = substitute.min(prev[i] + 1).min(curr[i - 1] + 1);
        }
        if curr[m] < best.0 {
            best = (curr[m], j);
            if best.0 == 0 {
                break;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    best
}
