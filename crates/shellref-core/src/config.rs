use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ShellrefResult;
use crate::ranking::{SearchMode, Thresholds, DEFAULT_EXCELLENT_SCORE, DEFAULT_GOOD_ENOUGH_SCORE};
use crate::search::SortBy;
use crate::services::keywords::looks_like_question;
use crate::services::patterns::{PatternDictionary, DEFAULT_PREFIX_MIN_LEN};

const MAX_RESULTS_LIMIT: usize = 500;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Favorite command ids.
    pub favorites: Vec<String>,
    pub search: SearchSettings,
    pub display: DisplaySettings,
    /// Extra phrase -> command names merged into the built-in dictionary.
    pub patterns: BTreeMap<String, Vec<String>>,
}

/// Which mode to use when the caller doesn't pick one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModePreference {
    Literal,
    NaturalLanguage,
    /// Natural language for question-shaped queries, literal otherwise.
    #[default]
    Auto,
}

impl ModePreference {
    pub fn resolve(&self, query: &str) -> SearchMode {
        match self {
            ModePreference::Literal => SearchMode::Literal,
            ModePreference::NaturalLanguage => SearchMode::NaturalLanguage,
            ModePreference::Auto if looks_like_question(query) => SearchMode::NaturalLanguage,
            ModePreference::Auto => SearchMode::Literal,
        }
    }
}

impl std::str::FromStr for ModePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ModePreference::Auto),
            other => match other.parse::<SearchMode>()? {
                SearchMode::Literal => Ok(ModePreference::Literal),
                SearchMode::NaturalLanguage => Ok(ModePreference::NaturalLanguage),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub default_mode: ModePreference,
    /// 0 means unlimited.
    pub max_results: usize,
    pub excellent_score: f64,
    pub good_enough_score: f64,
    pub prefix_min_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub default_sort: SortBy,
    pub show_examples: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_mode: ModePreference::Auto,
            max_results: 0,
            excellent_score: DEFAULT_EXCELLENT_SCORE,
            good_enough_score: DEFAULT_GOOD_ENOUGH_SCORE,
            prefix_min_len: DEFAULT_PREFIX_MIN_LEN,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            default_sort: SortBy::Relevance,
            show_examples: true,
        }
    }
}

impl SearchConfig {
    /// Get the config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config"))
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
            })
            .join("shellref")
            .join("config.toml")
    }

    /// Load config from the default path, or return defaults if not found
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`. Unreadable or malformed files fall back to
    /// defaults.
    pub fn load_from(path: &Path) -> Self {
        let mut config = if path.exists() {
            match Self::read(path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        config.validate();
        config
    }

    fn read(path: &Path) -> ShellrefResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate and clamp config values to acceptable ranges
    pub fn validate(&mut self) {
        let search = &mut self.search;
        search.max_results = search.max_results.min(MAX_RESULTS_LIMIT);
        search.excellent_score = clamp_score(search.excellent_score, DEFAULT_EXCELLENT_SCORE);
        search.good_enough_score = clamp_score(search.good_enough_score, DEFAULT_GOOD_ENOUGH_SCORE);
        search.prefix_min_len = search.prefix_min_len.clamp(2, 16);

        let mut seen = HashSet::new();
        self.favorites.retain(|id| seen.insert(id.clone()));
    }

    /// Save config to the default path
    pub fn save(&self) -> ShellrefResult<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> ShellrefResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            excellent_score: self.search.excellent_score,
            good_enough_score: self.search.good_enough_score,
        }
    }

    /// Built-in phrases plus the `[patterns]` table.
    pub fn pattern_dictionary(&self) -> PatternDictionary {
        let mut dict = PatternDictionary::builtin()
            .clone()
            .with_prefix_min_len(self.search.prefix_min_len);
        dict.extend(&self.patterns);
        dict
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|f| f == id)
    }

    /// Add or remove `id` from favorites. Returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        if let Some(pos) = self.favorites.iter().position(|f| f == id) {
            self.favorites.remove(pos);
            false
        } else {
            self.favorites.push(id.to_string());
            true
        }
    }
}

fn clamp_score(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        return fallback;
    }
    value.clamp(0.0, 1.0)
}
