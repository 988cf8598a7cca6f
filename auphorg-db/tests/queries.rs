use auphorg_catalog::types::*;
use auphorg_db::*;

fn new_file(path: &str) -> NewFile {
    NewFile {
        path: path.to_string(),
        modified_time: "2009-07-14T10:00:00+00:00".to_string(),
        size_bytes: 2048,
        file_digest: "ab".repeat(64),
        content_digest: Some("cd".repeat(64)),
    }
}

#[test]
fn lookups_return_none_when_absent() {
    let conn = open_memory().unwrap();
    assert_eq!(find_file_id(&conn, "/p/none.jpg").unwrap(), None);
    assert_eq!(find_item(&conn, "/p/none").unwrap(), None);
    assert_eq!(get_file(&conn, "/p/none.jpg").unwrap(), None);
    assert_eq!(get_item(&conn, "unknown").unwrap(), None);
}

#[test]
fn get_file_returns_full_record() {
    let conn = open_memory().unwrap();
    let id = insert_file(&conn, &new_file("/p/a.tif")).unwrap();

    let file = get_file(&conn, "/p/a.tif").unwrap().unwrap();
    assert_eq!(file.id, id);
    assert_eq!(file.size_bytes, 2048);
    assert_eq!(file.content_digest, Some("cd".repeat(64)));
    assert!(!file.is_rich());
}

#[test]
fn item_without_files_has_empty_summary() {
    let conn = open_memory().unwrap();
    create_item(&conn, "/p/trip", false).unwrap();

    let item = get_item(&conn, "/p/trip").unwrap().unwrap();
    assert_eq!(item.name, "/p/trip");
    assert_eq!(item.content_path, None);
    assert_eq!(item.tags_path, None);
    assert_eq!(item.tags, None);
    assert!(item.extra_files.is_empty());
}

#[test]
fn content_path_defaults_to_tags_path() {
    let conn = open_memory().unwrap();
    let tags = TagsRecord {
        model: Some("Canon X".into()),
        ..Default::default()
    };
    insert_rich_file(&conn, &new_file("/p/trip.jpg"), &tags).unwrap();
    create_item(&conn, "/p/trip", false).unwrap();
    attach_tags(&conn, "/p/trip", "/p/trip.jpg").unwrap();

    let item = get_item(&conn, "/p/trip").unwrap().unwrap();
    assert_eq!(item.tags_path.as_deref(), Some("/p/trip.jpg"));
    assert_eq!(item.content_path, item.tags_path);
    assert_eq!(item.tags, Some(tags));

    // A defaulted content path is not an assignment.
    insert_file(&conn, &new_file("/p/trip.raw")).unwrap();
    attach_content(&conn, "/p/trip", "/p/trip.raw").unwrap();
}

#[test]
fn tags_file_without_tags_is_missing_metadata() {
    let conn = open_memory().unwrap();
    insert_file(&conn, &new_file("/p/poor.tif")).unwrap();
    create_item(&conn, "/p/poor", false).unwrap();
    attach_tags(&conn, "/p/poor", "/p/poor.tif").unwrap();

    let err = get_item(&conn, "/p/poor").unwrap_err();
    assert!(matches!(err, OperationError::MissingMetadata { ref path } if path == "/p/poor.tif"));
}

#[test]
fn rich_file_tags_by_name() {
    let conn = open_memory().unwrap();
    let tags = TagsRecord {
        model: Some("Canon X".into()),
        image_width: Some("4000".into()),
        ..Default::default()
    };
    insert_rich_file(&conn, &new_file("/p/trip.jpg"), &tags).unwrap();

    let map = get_rich_file_tags(&conn, "/p/trip.jpg").unwrap();
    assert_eq!(map.get("Model").map(String::as_str), Some("Canon X"));
    assert_eq!(map.get("ImageWidth").map(String::as_str), Some("4000"));
    assert_eq!(map.len(), 2);
}

#[test]
fn rich_file_tags_errors() {
    let conn = open_memory().unwrap();
    let err = get_rich_file_tags(&conn, "/p/none.jpg").unwrap_err();
    assert!(matches!(err, OperationError::UnknownFile { .. }));

    insert_file(&conn, &new_file("/p/poor.tif")).unwrap();
    let err = get_rich_file_tags(&conn, "/p/poor.tif").unwrap_err();
    assert!(matches!(err, OperationError::MissingMetadata { .. }));
}

#[test]
fn stats_count_every_table() {
    let conn = open_memory().unwrap();
    insert_rich_file(&conn, &new_file("/p/trip.jpg"), &TagsRecord::default()).unwrap();
    insert_file(&conn, &new_file("/p/trip.raw")).unwrap();
    insert_file(&conn, &new_file("/p/trip.wav")).unwrap();
    create_item(&conn, "/p/trip", false).unwrap();
    create_item(&conn, "/p/empty", false).unwrap();
    attach_tags(&conn, "/p/trip", "/p/trip.jpg").unwrap();
    attach_content(&conn, "/p/trip", "/p/trip.raw").unwrap();
    link_extra_file(&conn, "/p/trip.wav", "/p/trip").unwrap();

    let stats = catalog_stats(&conn).unwrap();
    assert_eq!(
        stats,
        CatalogStats {
            files: 3,
            rich_files: 1,
            tags: 1,
            items: 2,
            items_with_content: 1,
            items_with_tags: 1,
            extra_links: 1,
        }
    );
}
