//! Phrase dictionary that maps common task descriptions to command names.
//!
//! The table is plain data: matching logic never special-cases a phrase, so
//! phrases can be added from configuration without touching this module.

use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashSet};

/// Minimum keyword length for the first-word prefix rule.
pub const DEFAULT_PREFIX_MIN_LEN: usize = 4;

/// Built-in phrase table.
const DEFAULT_PATTERNS: &[(&str, &[&str])] = &[
    // Processes
    ("kill", &["kill", "pkill", "killall"]),
    ("process", &["kill", "ps", "top", "htop"]),
    ("kill process", &["kill", "pkill", "killall"]),
    ("stop process", &["kill", "pkill", "killall"]),
    ("terminate process", &["kill", "pkill", "killall"]),
    ("end process", &["kill", "pkill", "killall"]),
    // Users
    ("user", &["useradd", "userdel", "usermod", "passwd"]),
    ("delete user", &["userdel"]),
    ("remove user", &["userdel"]),
    ("create user", &["useradd"]),
    ("add user", &["useradd"]),
    ("change password", &["passwd"]),
    ("list users", &["getent", "cat"]),
    // Files
    ("file", &["ls", "rm", "cp", "mv", "cat", "touch"]),
    ("delete file", &["rm"]),
    ("remove file", &["rm"]),
    ("copy file", &["cp"]),
    ("move file", &["mv"]),
    ("rename file", &["mv"]),
    ("directory", &["mkdir", "rmdir", "cd", "ls"]),
    ("create directory", &["mkdir"]),
    ("make directory", &["mkdir"]),
    ("remove directory", &["rmdir", "rm"]),
    ("delete directory", &["rmdir", "rm"]),
    ("list files", &["ls"]),
    ("find file", &["find", "locate"]),
    ("search file", &["find", "grep", "locate"]),
    // Permissions
    ("change permissions", &["chmod"]),
    ("change owner", &["chown"]),
    ("make executable", &["chmod +x"]),
    // System info
    ("disk space", &["df", "du"]),
    ("disk usage", &["df", "du"]),
    ("system info", &["uname", "hostnamectl"]),
    ("memory usage", &["free", "top", "htop"]),
    ("cpu usage", &["top", "htop", "mpstat"]),
    // Network
    ("check connection", &["ping", "curl"]),
    ("download file", &["wget", "curl"]),
    ("network status", &["netstat", "ss", "ip"]),
    // Text
    ("search text", &["grep", "awk", "sed"]),
    ("find text", &["grep"]),
    ("replace text", &["sed"]),
    ("count lines", &["wc -l"]),
    // Compression
    ("compress file", &["gzip", "zip", "tar"]),
    ("extract archive", &["tar", "unzip", "gunzip"]),
    ("unzip file", &["unzip"]),
    // Packages
    ("install package", &["apt install", "yum install", "dnf install"]),
    ("update packages", &["apt update", "yum update"]),
    ("remove package", &["apt remove", "yum remove"]),
];

static BUILTIN: Lazy<PatternDictionary> = Lazy::new(PatternDictionary::default);

#[derive(Debug, Clone)]
struct PatternEntry {
    phrase: String,
    words: Vec<String>,
    commands: Vec<String>,
}

impl PatternEntry {
    fn new(phrase: &str, commands: Vec<String>) -> Self {
        let phrase = phrase.trim().to_lowercase();
        let words = phrase.split(' ').map(str::to_string).collect();
        Self {
            phrase,
            words,
            commands,
        }
    }
}

/// Ordered phrase -> command names mapping.
#[derive(Debug, Clone)]
pub struct PatternDictionary {
    entries: Vec<PatternEntry>,
    prefix_min_len: usize,
}

impl Default for PatternDictionary {
    fn default() -> Self {
        let entries = DEFAULT_PATTERNS
            .iter()
            .map(|(phrase, cmds)| {
                PatternEntry::new(phrase, cmds.iter().map(|c| c.to_string()).collect())
            })
            .collect();
        Self {
            entries,
            prefix_min_len: DEFAULT_PREFIX_MIN_LEN,
        }
    }
}

impl PatternDictionary {
    /// Shared copy of the built-in table.
    pub fn builtin() -> &'static PatternDictionary {
        &BUILTIN
    }

    pub fn with_prefix_min_len(mut self, len: usize) -> Self {
        self.prefix_min_len = len;
        self
    }

    pub fn prefix_min_len(&self) -> usize {
        self.prefix_min_len
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Command names mapped to an exact phrase.
    pub fn commands_for(&self, phrase: &str) -> Option<&[String]> {
        let phrase = phrase.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.phrase == phrase)
            .map(|e| e.commands.as_slice())
    }

    /// Merge extra phrases. Names for an existing phrase are appended.
    pub fn extend(&mut self, extra: &BTreeMap<String, Vec<String>>) {
        for (phrase, commands) in extra {
            let key = phrase.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            match self.entries.iter_mut().find(|e| e.phrase == key) {
                Some(entry) => {
                    for cmd in commands {
                        if !entry.commands.contains(cmd) {
                            entry.commands.push(cmd.clone());
                        }
                    }
                }
                None => self.entries.push(PatternEntry::new(&key, commands.clone())),
            }
        }
    }

    /// Command names suggested by the keywords, without duplicates.
    pub fn find_matching_patterns(&self, keywords: &[String]) -> Vec<String> {
        if keywords.is_empty() || keywords.iter().any(|k| k.chars().count() < 2) {
            return Vec::new();
        }

        let joined = keywords.join(" ");
        let mut found = MatchSet::default();

        for entry in &self.entries {
            // whole phrase in either direction
            if joined.contains(&entry.phrase) || entry.phrase.contains(&joined) {
                found.add_all(&entry.commands);
                continue;
            }

            // every meaningful word of a multi-word phrase appears somewhere
            let long_words: Vec<&String> = entry
                .words
                .iter()
                .filter(|w| w.chars().count() > 2)
                .collect();
            if long_words.len() > 1 && long_words.iter().all(|w| joined.contains(w.as_str())) {
                found.add_all(&entry.commands);
            }
        }

        for keyword in keywords {
            let len = keyword.chars().count();
            if len < 3 {
                continue;
            }
            for entry in &self.entries {
                let whole_word = entry.words.iter().any(|w| w == keyword);
                let first_word_prefix = len >= self.prefix_min_len
                    && entry
                        .words
                        .first()
                        .is_some_and(|w| w.starts_with(keyword.as_str()));

                if whole_word || first_word_prefix {
                    found.add_all(&entry.commands);
                }
            }
        }

        found.into_vec()
    }
}

/// Insertion-ordered set of command names.
#[derive(Default)]
struct MatchSet {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl MatchSet {
    fn add_all(&mut self, commands: &[String]) {
        for cmd in commands {
            if self.seen.insert(cmd.clone()) {
                self.order.push(cmd.clone());
            }
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.order
    }
}
