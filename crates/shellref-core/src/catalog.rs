//! The command catalog: an immutable list of command records loaded once.
//!
//! Catalogs are read from JSON (a top-level array of commands) or TOML (a
//! `[[commands]]` array of tables). The bundled dataset ships inside the
//! binary and goes through the same parser and validation as user files.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{CatalogError, ShellrefResult};

const BUNDLED_CATALOG: &str = include_str!("../data/commands.json");

/// Command category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    All,
    Files,
    Search,
    System,
    Processes,
    Disk,
    Network,
    Packages,
    Compression,
    Archive,
    Text,
    Users,
    Permissions,
    Services,
    Shell,
    Git,
    Advanced,
}

impl Category {
    pub const ALL: [Category; 17] = [
        Category::All,
        Category::Files,
        Category::Search,
        Category::System,
        Category::Processes,
        Category::Disk,
        Category::Network,
        Category::Packages,
        Category::Compression,
        Category::Archive,
        Category::Text,
        Category::Users,
        Category::Permissions,
        Category::Services,
        Category::Shell,
        Category::Git,
        Category::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Files => "files",
            Category::Search => "search",
            Category::System => "system",
            Category::Processes => "processes",
            Category::Disk => "disk",
            Category::Network => "network",
            Category::Packages => "packages",
            Category::Compression => "compression",
            Category::Archive => "archive",
            Category::Text => "text",
            Category::Users => "users",
            Category::Permissions => "permissions",
            Category::Services => "services",
            Category::Shell => "shell",
            Category::Git => "git",
            Category::Advanced => "advanced",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "All Commands",
            Category::Files => "Files & Directories",
            Category::Search => "Search & Find",
            Category::System => "System Info",
            Category::Processes => "Process Management",
            Category::Disk => "Disk & Storage",
            Category::Network => "Network",
            Category::Packages => "Package Management",
            Category::Compression => "Compression",
            Category::Archive => "Archives",
            Category::Text => "Text Processing",
            Category::Users => "User Management",
            Category::Permissions => "Permissions",
            Category::Services => "System Services",
            Category::Shell => "Shell & Environment",
            Category::Git => "Git Version Control",
            Category::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Difficulty level, ordered beginner < intermediate < advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// A worked example of a command invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandExample {
    #[serde(rename = "cmd")]
    pub invocation: String,
    #[serde(rename = "desc")]
    pub short_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(rename = "output", default, skip_serializing_if = "Option::is_none")]
    pub sample_output: Option<String>,
}

/// A command-line flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandFlag {
    #[serde(rename = "flag")]
    pub token: String,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
}

/// A single command in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRecord {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub description: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub examples: Vec<CommandExample>,
    #[serde(default)]
    pub flags: Vec<CommandFlag>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub last_updated: NaiveDate,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub related_commands: Vec<String>,
}

#[derive(Deserialize)]
struct CatalogFile {
    commands: Vec<CommandRecord>,
}

/// Immutable, validated list of commands.
#[derive(Debug, Clone)]
pub struct Catalog {
    commands: Vec<CommandRecord>,
}

impl Catalog {
    /// Build a catalog, rejecting empty input, blank ids/names and duplicate ids.
    pub fn new(commands: Vec<CommandRecord>) -> Result<Self, CatalogError> {
        if commands.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(commands.len());
        for (pos, cmd) in commands.iter().enumerate() {
            if cmd.id.trim().is_empty() {
                return Err(CatalogError::MissingId(pos));
            }
            if cmd.name.trim().is_empty() {
                return Err(CatalogError::MissingName(cmd.id.clone()));
            }
            if !seen.insert(cmd.id.as_str()) {
                return Err(CatalogError::DuplicateId(cmd.id.clone()));
            }
        }

        Ok(Self { commands })
    }

    pub fn from_json_str(content: &str) -> ShellrefResult<Self> {
        let commands: Vec<CommandRecord> = serde_json::from_str(content)?;
        Ok(Self::new(commands)?)
    }

    pub fn from_toml_str(content: &str) -> ShellrefResult<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Ok(Self::new(file.commands)?)
    }

    /// Load a catalog file, choosing the parser by extension.
    pub fn from_path(path: &Path) -> ShellrefResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        let content = fs::read_to_string(path)?;

        let catalog = match ext.as_str() {
            "json" => Self::from_json_str(&content)?,
            "toml" => Self::from_toml_str(&content)?,
            _ => return Err(CatalogError::UnsupportedFormat(ext).into()),
        };

        tracing::info!(
            path = %path.display(),
            commands = catalog.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// The dataset compiled into the binary.
    pub fn bundled() -> ShellrefResult<Self> {
        let catalog = Self::from_json_str(BUNDLED_CATALOG)?;
        tracing::info!(commands = catalog.len(), "loaded bundled catalog");
        Ok(catalog)
    }

    pub fn commands(&self) -> &[CommandRecord] {
        &self.commands
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CommandRecord> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CommandRecord> {
        self.commands.iter().find(|c| c.id == id)
    }

    /// Case-insensitive exact name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&CommandRecord> {
        let name = name.trim().to_lowercase();
        self.commands
            .iter()
            .find(|c| c.name.to_lowercase() == name)
    }

    /// Resolve a command's related ids, skipping ones the catalog doesn't have.
    pub fn related(&self, id: &str) -> Vec<&CommandRecord> {
        let Some(cmd) = self.get(id) else {
            return Vec::new();
        };
        cmd.related_commands
            .iter()
            .filter_map(|rel| self.get(rel).or_else(|| self.find_by_name(rel)))
            .collect()
    }

    /// Number of commands per category. `All` counts every command.
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .into_iter()
            .map(|cat| {
                let count = match cat {
                    Category::All => self.commands.len(),
                    _ => self.commands.iter().filter(|c| c.category == cat).count(),
                };
                (cat, count)
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CommandRecord;
    type IntoIter = std::slice::Iter<'a, CommandRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;
    use crate::error::ShellrefError;
    use std::io::Write;

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = Catalog::bundled().unwrap();
        assert!(catalog.len() >= 50);
        assert!(catalog.find_by_name("grep").is_some());
        assert!(catalog.find_by_name("LS").is_some());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(Catalog::new(Vec::new()), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = Catalog::new(vec![record("ls", "ls"), record("ls", "ls2")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "ls"));
    }

    #[test]
    fn test_blank_fields_rejected() {
        assert!(matches!(
            Catalog::new(vec![record("ls", "ls"), record(" ", "x")]),
            Err(CatalogError::MissingId(1))
        ));
        assert!(matches!(
            Catalog::new(vec![record("ls", "")]),
            Err(CatalogError::MissingName(_))
        ));
    }

    #[test]
    fn test_json_shape() {
        let json = r#"[{
            "id": "kill",
            "name": "kill",
            "category": "processes",
            "difficulty": "intermediate",
            "description": "Send a signal to a process",
            "examples": [{"cmd": "kill -9 1234", "desc": "Force kill", "output": ""}],
            "flags": [{"flag": "-9", "desc": "SIGKILL"}],
            "tags": ["terminate"],
            "lastUpdated": "2024-11-15",
            "popularity": 80,
            "relatedCommands": ["pkill"]
        }]"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        let kill = catalog.get("kill").unwrap();
        assert_eq!(kill.category, Category::Processes);
        assert_eq!(kill.difficulty, Difficulty::Intermediate);
        assert_eq!(kill.examples[0].invocation, "kill -9 1234");
        assert_eq!(kill.flags[0].token, "-9");
        assert_eq!(kill.popularity, 80.0);
        assert_eq!(kill.usage, "");
        assert_eq!(kill.last_updated, NaiveDate::from_ymd_opt(2024, 11, 15).unwrap());
    }

    #[test]
    fn test_malformed_json_is_error() {
        let err = Catalog::from_json_str("[{\"id\": 1}]").unwrap_err();
        assert!(matches!(err, ShellrefError::Json(_)));
    }

    #[test]
    fn test_from_path_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[[commands]]
id = "df"
name = "df"
category = "disk"
difficulty = "beginner"
description = "Report file system disk space usage"
tags = ["disk", "space"]
lastUpdated = "2024-05-01"
popularity = 70
"#
        )
        .unwrap();

        let catalog = Catalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("df").unwrap().category, Category::Disk);
    }

    #[test]
    fn test_from_path_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = Catalog::from_path(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ShellrefError::Catalog(CatalogError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_related_skips_unknown() {
        let mut ls = record("ls", "ls");
        ls.related_commands = vec!["cd".into(), "tree".into()];
        let catalog = Catalog::new(vec![ls, record("cd", "cd")]).unwrap();
        let related: Vec<&str> = catalog.related("ls").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(related, vec!["cd"]);
        assert!(catalog.related("missing").is_empty());
    }

    #[test]
    fn test_category_counts() {
        let mut ping = record("ping", "ping");
        ping.category = Category::Network;
        let catalog = Catalog::new(vec![record("ls", "ls"), record("cp", "cp"), ping]).unwrap();
        let counts = catalog.category_counts();
        let get = |cat| counts.iter().find(|(c, _)| *c == cat).map(|(_, n)| *n);
        assert_eq!(get(Category::All), Some(3));
        assert_eq!(get(Category::Files), Some(2));
        assert_eq!(get(Category::Network), Some(1));
        assert_eq!(get(Category::Git), Some(0));
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("Network".parse::<Category>().unwrap(), Category::Network);
        assert!("bogus".parse::<Category>().is_err());
        assert_eq!(" advanced ".parse::<Difficulty>().unwrap(), Difficulty::Advanced);
        assert!(Difficulty::Beginner < Difficulty::Intermediate);
        assert!(Difficulty::Intermediate < Difficulty::Advanced);
    }
}
