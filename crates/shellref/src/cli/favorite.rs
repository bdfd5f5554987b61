//! `shellref favorite`: mark or unmark a command and persist the choice.

use std::path::Path;

use anyhow::{bail, Context, Result};
use shellref_core::{Catalog, SearchConfig};

/// Toggle the favorite state of a command given by id or name and save the
/// config. Returns the command id and whether it is now a favorite.
pub fn toggle_favorite(
    catalog: &Catalog,
    config: &mut SearchConfig,
    id: &str,
    path: Option<&Path>,
) -> Result<(String, bool)> {
    let Some(record) = catalog.get(id).or_else(|| catalog.find_by_name(id)) else {
        bail!("No command with id or name '{}'", id);
    };

    let now_favorite = config.toggle_favorite(&record.id);
    let saved = match path {
        Some(path) => config.save_to(path),
        None => config.save(),
    };
    saved.context("Failed to save config")?;

    tracing::info!(id = %record.id, favorite = now_favorite, "updated favorites");
    Ok((record.id.clone(), now_favorite))
}

pub fn run_favorite(
    catalog: &Catalog,
    config: &mut SearchConfig,
    id: &str,
    path: Option<&Path>,
) -> Result<()> {
    let (id, now_favorite) = toggle_favorite(catalog, config, id, path)?;
    if now_favorite {
        println!("Added {} to favorites", id);
    } else {
        println!("Removed {} from favorites", id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_persists() {
        let catalog = Catalog::bundled().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = SearchConfig::default();

        let grep_id = catalog.find_by_name("grep").unwrap().id.clone();
        let (id, on) = toggle_favorite(&catalog, &mut config, "GREP", Some(&path)).unwrap();
        assert_eq!(id, grep_id);
        assert!(on);
        assert!(SearchConfig::load_from(&path).is_favorite(&grep_id));

        let (_, on) = toggle_favorite(&catalog, &mut config, &grep_id, Some(&path)).unwrap();
        assert!(!on);
        assert!(!SearchConfig::load_from(&path).is_favorite(&grep_id));
    }

    #[test]
    fn test_unknown_command_leaves_config_alone() {
        let catalog = Catalog::bundled().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = SearchConfig::default();

        assert!(toggle_favorite(&catalog, &mut config, "no-such-command", Some(&path)).is_err());
        assert!(config.favorites.is_empty());
        assert!(!path.exists());
    }
}
