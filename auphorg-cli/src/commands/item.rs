use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use auphorg_catalog::ItemSummary;

use crate::CliError;

use super::open_existing;

/// Print the summary of one item.
pub(crate) fn run_item(db_path: &Path, name: &str, json: bool) -> Result<(), CliError> {
    let conn = open_existing(db_path)?;
    let item = auphorg_db::get_item(&conn, name)
        .map_err(|e| CliError::database(format!("Failed to read item '{}': {}", name, e)))?
        .ok_or_else(|| CliError::not_found(format!("No item named '{}'", name)))?;

    if json {
        let text = serde_json::to_string_pretty(&item)
            .map_err(|e| CliError::runtime(format!("Failed to serialize item: {}", e)))?;
        println!("{}", text);
    } else {
        print_item(&item);
    }
    Ok(())
}

fn print_item(item: &ItemSummary) {
    let none = || "-".to_string();

    println!("{}", item.name.if_supports_color(Stdout, |t| t.bold()));
    println!(
        "  Content: {}",
        item.content_path
            .clone()
            .unwrap_or_else(none)
            .if_supports_color(Stdout, |t| t.cyan()),
    );
    println!(
        "  Tags:    {}",
        item.tags_path
            .clone()
            .unwrap_or_else(none)
            .if_supports_color(Stdout, |t| t.cyan()),
    );

    if let Some(tags) = &item.tags {
        for (name, value) in tags.to_tag_map() {
            println!("    {:<20} {}", name, value);
        }
    }

    if !item.extra_files.is_empty() {
        println!("  Extra files:");
        for path in &item.extra_files {
            println!("    {}", path.if_supports_color(Stdout, |t| t.dimmed()));
        }
    }
}
