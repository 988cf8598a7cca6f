use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use auphorg_core::util::format_bytes_approx;

use crate::CliError;

use super::open_existing;

/// Print one catalogued file, plus its tags when it is a rich file.
pub(crate) fn run_file(db_path: &Path, path: &Path, json: bool) -> Result<(), CliError> {
    let conn = open_existing(db_path)?;
    let key = path.to_string_lossy();

    let file = auphorg_db::get_file(&conn, &key)
        .map_err(|e| CliError::database(format!("Failed to read file '{}': {}", key, e)))?
        .ok_or_else(|| CliError::not_found(format!("File '{}' is not catalogued", key)))?;

    let tags = if file.is_rich() {
        Some(
            auphorg_db::get_rich_file_tags(&conn, &key)
                .map_err(|e| CliError::database(e.to_string()))?,
        )
    } else {
        None
    };

    if json {
        let value = serde_json::json!({ "file": file, "tags": tags });
        let text = serde_json::to_string_pretty(&value)
            .map_err(|e| CliError::runtime(format!("Failed to serialize file: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    println!("{}", file.path.if_supports_color(Stdout, |t| t.bold()));
    println!("  Modified:       {}", file.modified_time);
    println!(
        "  Size:           {} ({} bytes)",
        format_bytes_approx(file.size_bytes.max(0) as u64),
        file.size_bytes
    );
    println!("  File digest:    {}", file.file_digest);
    println!(
        "  Content digest: {}",
        file.content_digest.as_deref().unwrap_or("-")
    );
    if let Some(tags) = tags {
        println!("  Tags:");
        for (name, value) in tags {
            println!("    {:<20} {}", name, value);
        }
    }
    Ok(())
}
