//! Command-line front end for shellref.
//!
//! Loads the catalog and config once, then searches, shows a single command,
//! lists categories, or runs an interactive prompt.

pub mod favorite;
pub mod output;
pub mod search;
pub mod show;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shellref_core::{Catalog, ModePreference, SearchConfig, SortBy};

#[derive(Parser)]
#[command(name = "shellref")]
#[command(about = "Searchable Linux command reference", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Catalog file to use instead of the bundled one (.json or .toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the catalog
    Search(SearchArgs),

    /// Show one command in full
    Show {
        /// Command id or name
        id: String,
    },

    /// List categories with command counts
    Categories,

    /// Add a command to favorites, or remove it if already there
    Favorite {
        /// Command id or name
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query; words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// literal, natural or auto (default from config)
    #[arg(long, short)]
    pub mode: Option<ModePreference>,

    /// Only commands in this category
    #[arg(long, short, default_value = "all")]
    pub category: String,

    /// Only commands of this difficulty
    #[arg(long, short, default_value = "all")]
    pub difficulty: String,

    /// Only favorite commands
    #[arg(long)]
    pub favorites: bool,

    /// relevance, name, category, difficulty, popularity or recent
    #[arg(long, short)]
    pub sort: Option<SortBy>,

    /// Print at most N results
    #[arg(long, short = 'n', value_name = "N")]
    pub limit: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::from_path(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display())),
        None => Catalog::bundled().context("Bundled catalog is invalid"),
    }
}

fn load_config(path: Option<&PathBuf>) -> SearchConfig {
    match path {
        Some(path) => SearchConfig::load_from(path),
        None => SearchConfig::load(),
    }
}

/// Parse arguments and run the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let catalog = load_catalog(cli.catalog.as_ref())?;
    let mut config = load_config(cli.config.as_ref());
    tracing::debug!(
        commands = catalog.len(),
        favorites = config.favorites.len(),
        "catalog and config ready"
    );

    match cli.command {
        Some(Commands::Search(args)) => search::run_search(&catalog, &config, &args),
        Some(Commands::Show { id }) => show::run_show(&catalog, &config, &id),
        Some(Commands::Categories) => {
            show::run_categories(&catalog);
            Ok(())
        }
        Some(Commands::Favorite { id }) => {
            favorite::run_favorite(&catalog, &mut config, &id, cli.config.as_deref())
        }
        None => search::run_interactive(&catalog, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "shellref", "search", "how", "to", "kill", "--mode", "natural", "--sort", "popularity", "-n", "3",
        ])
        .unwrap();
        let Some(Commands::Search(args)) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.query, vec!["how", "to", "kill"]);
        assert_eq!(args.mode, Some(ModePreference::NaturalLanguage));
        assert_eq!(args.sort, Some(SortBy::Popularity));
        assert_eq!(args.limit, Some(3));
        assert_eq!(args.category, "all");
    }

    #[test]
    fn test_parse_global_paths() {
        let cli = Cli::try_parse_from(["shellref", "show", "grep", "--catalog", "/tmp/c.toml"]).unwrap();
        assert_eq!(cli.catalog, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(cli.command, Some(Commands::Show { ref id }) if id == "grep"));
    }

    #[test]
    fn test_parse_favorite() {
        let cli = Cli::try_parse_from(["shellref", "favorite", "tar", "--config", "/tmp/s.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Favorite { ref id }) if id == "tar"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/s.toml")));
    }

    #[test]
    fn test_parse_rejects_bad_mode() {
        assert!(Cli::try_parse_from(["shellref", "search", "ls", "--mode", "fuzzy"]).is_err());
    }

    #[test]
    fn test_no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["shellref"]).unwrap();
        assert!(cli.command.is_none());
    }
}
