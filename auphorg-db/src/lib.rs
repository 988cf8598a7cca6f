//! SQLite persistence layer for the media catalog.
//!
//! Provides schema creation, typed insert/update builders, the catalog's
//! mutating operations and its query APIs, backed by SQLite (via rusqlite
//! with the bundled feature).

pub mod columns;
pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    OperationError, attach_content, attach_tags, create_item, insert_file, insert_rich_file,
    insert_tags, link_extra_file,
};
pub use queries::{
    catalog_stats, extra_file_paths, find_file_id, find_item, get_file, get_item,
    get_rich_file_tags, get_tags,
};
pub use rusqlite::Connection;
pub use schema::{SchemaError, open_database, open_memory};
