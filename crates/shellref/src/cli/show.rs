//! `shellref show` and `shellref categories`.

use std::io;

use anyhow::{bail, Result};
use shellref_core::{Catalog, SearchConfig};

use super::output;

pub fn run_show(catalog: &Catalog, config: &SearchConfig, id: &str) -> Result<()> {
    let Some(record) = catalog.get(id).or_else(|| catalog.find_by_name(id)) else {
        bail!("No command with id or name '{}'", id);
    };

    let related = catalog.related(&record.id);
    let stdout = io::stdout();
    output::write_record(&mut stdout.lock(), record, &related)?;
    if config.is_favorite(&record.id) {
        println!("Favorite: yes");
    }
    Ok(())
}

pub fn run_categories(catalog: &Catalog) {
    for (category, count) in catalog.category_counts() {
        if count > 0 {
            println!("{:<14} {:<22} {}", category.as_str(), category.label(), count);
        }
    }
}
