pub mod catalog;
pub mod config;
pub mod error;
pub mod ranking;
pub mod search;
pub mod services;

pub use catalog::{Catalog, Category, CommandExample, CommandFlag, CommandRecord, Difficulty};
pub use config::{ModePreference, SearchConfig};
pub use error::{CatalogError, ShellrefError, ShellrefResult};
pub use ranking::{relevance_score, resolve_query, Ranker, SearchMode};
pub use search::{Filter, SearchEngine, SearchRequest, SortBy};
