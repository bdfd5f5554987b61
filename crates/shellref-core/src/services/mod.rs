pub mod enrich;
pub mod fuzzy;
pub mod keywords;
pub mod patterns;

pub use enrich::{enrich_all, searchable_text, EnrichedRecord};
pub use fuzzy::{Field, FuzzyIndex, FuzzyMatch, FuzzyOptions, Searchable};
pub use keywords::{extract_keywords, looks_like_question};
pub use patterns::PatternDictionary;
