/// Leading phrases that mark a query as a question rather than a command name.
pub const QUESTION_PREFIXES: &[&str] = &[
    "how to",
    "how do i",
    "how do you",
    "how can i",
    "how can you",
    "what command",
    "which command",
    "show me",
    "help me",
    "i want to",
    "i need to",
];

fn is_stop_word(w: &str) -> bool {
    matches!(
        w,
        "a" | "an" | "the" | "is" | "are" | "was" | "were" | "be" | "been"
        | "being" | "have" | "has" | "had" | "do" | "does" | "did" | "will"
        | "would" | "should" | "could" | "may" | "might" | "must" | "can"
        | "this" | "that" | "these" | "those" | "i" | "you" | "he" | "she"
        | "it" | "we" | "they" | "me" | "him" | "her" | "us" | "them"
    )
}

/// True when the query opens with one of the question phrases.
pub fn looks_like_question(query: &str) -> bool {
    let query = query.trim().to_lowercase();
    QUESTION_PREFIXES.iter().any(|p| query.starts_with(p))
}

/// Remove the first question phrase that is followed by whitespace.
fn strip_question_prefix(query: &str) -> &str {
    for prefix in QUESTION_PREFIXES {
        if let Some(rest) = query.strip_prefix(prefix) {
            if rest.starts_with(char::is_whitespace) {
                return rest.trim_start();
            }
        }
    }
    query
}

/// Turn a free-text query into the words worth matching on.
///
/// Order is preserved and duplicates are kept.
pub fn extract_keywords(query: &str) -> Vec<String> {
    let lower = query.trim().to_lowercase();
    let cleaned = strip_question_prefix(&lower).replace('?', "");

    cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() > 2 && !is_stop_word(w))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_question_prefix() {
        assert_eq!(extract_keywords("How to kill a process?"), vec!["kill", "process"]);
        assert_eq!(extract_keywords("how do i delete a user"), vec!["delete", "user"]);
        assert_eq!(extract_keywords("which command shows disk usage"), vec!["shows", "disk", "usage"]);
    }

    #[test]
    fn test_prefix_needs_whitespace() {
        // a phrase only counts when whitespace follows it
        assert_eq!(extract_keywords("show menus"), vec!["show", "menus"]);
    }

    #[test]
    fn test_only_first_prefix_stripped() {
        assert_eq!(
            extract_keywords("help me show me files"),
            vec!["show", "files"]
        );
    }

    #[test]
    fn test_drops_short_and_stop_words() {
        assert_eq!(extract_keywords("the of it"), Vec::<String>::new());
        assert_eq!(extract_keywords("list these files in /tmp"), vec!["list", "files", "/tmp"]);
        assert_eq!(extract_keywords("cd ls ps"), Vec::<String>::new());
    }

    #[test]
    fn test_keeps_duplicates_and_order() {
        assert_eq!(
            extract_keywords("copy file copy"),
            vec!["copy", "file", "copy"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("   ???  ").is_empty());
    }

    #[test]
    fn test_looks_like_question() {
        assert!(looks_like_question("  How can I compress a file"));
        assert!(looks_like_question("i need to find text"));
        assert!(!looks_like_question("grep"));
        assert!(!looks_like_question("tar -xzf"));
    }
}
