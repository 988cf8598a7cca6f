use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

use super::open_existing;

pub(crate) fn run_stats(db_path: &Path) -> Result<(), CliError> {
    let conn = open_existing(db_path)?;
    let stats = auphorg_db::catalog_stats(&conn)
        .map_err(|e| CliError::database(format!("Failed to query catalog stats: {}", e)))?;

    println!(
        "{}",
        "Catalog Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    println!("  Database: {}", db_path.display());
    println!();
    println!("  Files:              {:>8}", stats.files);
    println!("  Rich files:         {:>8}", stats.rich_files);
    println!("  Tags:               {:>8}", stats.tags);
    println!("  Items:              {:>8}", stats.items);
    println!("  Items with content: {:>8}", stats.items_with_content);
    println!("  Items with tags:    {:>8}", stats.items_with_tags);
    println!("  Extra file links:   {:>8}", stats.extra_links);

    Ok(())
}
