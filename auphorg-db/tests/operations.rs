use auphorg_catalog::types::*;
use auphorg_db::*;
use rusqlite::Connection;

fn new_file(path: &str) -> NewFile {
    NewFile {
        path: path.to_string(),
        modified_time: "2009-07-14T10:00:00+00:00".to_string(),
        size_bytes: 1024,
        file_digest: format!("digest-of-{}", path),
        content_digest: None,
    }
}

fn canon_tags() -> TagsRecord {
    TagsRecord {
        model: Some("Canon X".to_string()),
        ..Default::default()
    }
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}

// ── Files ───────────────────────────────────────────────────────────────────

#[test]
fn distinct_paths_insert() {
    let conn = open_memory().unwrap();
    let a = insert_file(&conn, &new_file("/p/a.raw")).unwrap();
    let b = insert_file(&conn, &new_file("/p/b.raw")).unwrap();
    assert_ne!(a, b);
    assert_eq!(count(&conn, "files"), 2);
}

#[test]
fn reinserting_a_path_is_a_duplicate_key() {
    let conn = open_memory().unwrap();
    insert_file(&conn, &new_file("/p/a.raw")).unwrap();

    let err = insert_file(&conn, &new_file("/p/a.raw")).unwrap_err();
    match err {
        OperationError::DuplicateKey {
            entity,
            field,
            value,
        } => {
            assert_eq!(entity, "file");
            assert_eq!(field, "path");
            assert_eq!(value, "/p/a.raw");
        }
        other => panic!("expected DuplicateKey, got {:?}", other),
    }
    assert_eq!(count(&conn, "files"), 1);
}

#[test]
fn rich_file_references_its_tags() {
    let conn = open_memory().unwrap();
    insert_rich_file(&conn, &new_file("/p/trip.jpg"), &canon_tags()).unwrap();

    let file = get_file(&conn, "/p/trip.jpg").unwrap().unwrap();
    let tags_id = file.tags_id.expect("rich file should reference tags");
    let tags = get_tags(&conn, tags_id).unwrap().unwrap();
    assert_eq!(tags.model.as_deref(), Some("Canon X"));
}

#[test]
fn duplicate_rich_file_leaves_no_orphan_tags() {
    let conn = open_memory().unwrap();
    insert_rich_file(&conn, &new_file("/p/trip.jpg"), &canon_tags()).unwrap();

    let err = insert_rich_file(&conn, &new_file("/p/trip.jpg"), &canon_tags()).unwrap_err();
    assert!(matches!(err, OperationError::DuplicateKey { entity: "file", .. }));
    assert_eq!(count(&conn, "tags"), 1);
}

#[test]
fn insert_tags_never_conflicts() {
    let conn = open_memory().unwrap();
    let a = insert_tags(&conn, &canon_tags()).unwrap();
    let b = insert_tags(&conn, &canon_tags()).unwrap();
    assert_ne!(a, b);
}

// ── Items ───────────────────────────────────────────────────────────────────

#[test]
fn create_item_twice_gives_one_row() {
    let conn = open_memory().unwrap();
    assert!(create_item(&conn, "/p/trip", false).unwrap());
    assert!(!create_item(&conn, "/p/trip", false).unwrap());
    assert_eq!(count(&conn, "item_entries"), 1);

    let item = find_item(&conn, "/p/trip").unwrap().unwrap();
    assert_eq!(item.content_file, None);
    assert_eq!(item.tags_file, None);
}

#[test]
fn forced_create_of_existing_item_fails() {
    let conn = open_memory().unwrap();
    create_item(&conn, "/p/trip", true).unwrap();
    let err = create_item(&conn, "/p/trip", true).unwrap_err();
    assert!(matches!(err, OperationError::ItemAlreadyExists { ref name } if name == "/p/trip"));
}

#[test]
fn attach_content_then_reassign_is_rejected() {
    let conn = open_memory().unwrap();
    insert_file(&conn, &new_file("/p/trip.raw")).unwrap();
    insert_file(&conn, &new_file("/p/trip.avi")).unwrap();
    create_item(&conn, "/p/trip", false).unwrap();

    attach_content(&conn, "/p/trip", "/p/trip.raw").unwrap();
    // Same file again is a no-op.
    attach_content(&conn, "/p/trip", "/p/trip.raw").unwrap();

    let err = attach_content(&conn, "/p/trip", "/p/trip.avi").unwrap_err();
    match err {
        OperationError::ContentAlreadyAssigned { path, item } => {
            assert_eq!(path, "/p/trip.avi");
            assert_eq!(item, "/p/trip");
        }
        other => panic!("expected ContentAlreadyAssigned, got {:?}", other),
    }
}

#[test]
fn attach_reports_missing_file_before_missing_item() {
    let conn = open_memory().unwrap();
    let err = attach_content(&conn, "/p/none", "/p/none.raw").unwrap_err();
    assert!(matches!(err, OperationError::MissingFile { .. }));

    insert_file(&conn, &new_file("/p/none.raw")).unwrap();
    let err = attach_content(&conn, "/p/none", "/p/none.raw").unwrap_err();
    match err {
        OperationError::MissingItem { name, path } => {
            assert_eq!(name, "/p/none");
            assert_eq!(path, "/p/none.raw");
        }
        other => panic!("expected MissingItem, got {:?}", other),
    }
}

#[test]
fn content_file_belongs_to_one_item() {
    let conn = open_memory().unwrap();
    insert_file(&conn, &new_file("/p/shared.raw")).unwrap();
    create_item(&conn, "/p/one", false).unwrap();
    create_item(&conn, "/p/two", false).unwrap();
    attach_content(&conn, "/p/one", "/p/shared.raw").unwrap();

    let err = attach_content(&conn, "/p/two", "/p/shared.raw").unwrap_err();
    assert!(matches!(
        err,
        OperationError::DuplicateKey {
            entity: "item",
            field: "content_file",
            ..
        }
    ));
}

#[test]
fn attach_tags_rejects_any_existing_tags_file() {
    let conn = open_memory().unwrap();
    insert_rich_file(&conn, &new_file("/p/trip.jpg"), &canon_tags()).unwrap();
    insert_rich_file(&conn, &new_file("/p/trip.thm"), &canon_tags()).unwrap();
    create_item(&conn, "/p/trip", false).unwrap();

    attach_tags(&conn, "/p/trip", "/p/trip.jpg").unwrap();
    let again = attach_tags(&conn, "/p/trip", "/p/trip.jpg").unwrap_err();
    assert!(matches!(again, OperationError::TagsAlreadyAssigned { .. }));
    let other = attach_tags(&conn, "/p/trip", "/p/trip.thm").unwrap_err();
    assert!(other.is_role_taken());
}

#[test]
fn tags_default_does_not_block_content() {
    let conn = open_memory().unwrap();
    insert_rich_file(&conn, &new_file("/p/trip.jpg"), &canon_tags()).unwrap();
    insert_file(&conn, &new_file("/p/trip.raw")).unwrap();
    create_item(&conn, "/p/trip", false).unwrap();

    attach_tags(&conn, "/p/trip", "/p/trip.jpg").unwrap();
    attach_content(&conn, "/p/trip", "/p/trip.raw").unwrap();

    let item = get_item(&conn, "/p/trip").unwrap().unwrap();
    assert_eq!(item.content_path.as_deref(), Some("/p/trip.raw"));
    assert_eq!(item.tags_path.as_deref(), Some("/p/trip.jpg"));
}

// ── Extra Files ─────────────────────────────────────────────────────────────

#[test]
fn extra_files_keep_link_order() {
    let conn = open_memory().unwrap();
    create_item(&conn, "/p/trip", false).unwrap();
    for path in ["/p/trip.wav", "/p/trip.thm", "/p/trip.avi"] {
        insert_file(&conn, &new_file(path)).unwrap();
        link_extra_file(&conn, path, "/p/trip").unwrap();
    }

    let item = get_item(&conn, "/p/trip").unwrap().unwrap();
    assert_eq!(
        item.extra_files,
        vec!["/p/trip.wav", "/p/trip.thm", "/p/trip.avi"]
    );

    let joined: String = conn
        .query_row(
            "SELECT extra_paths FROM items_extra_files WHERE name = ?1",
            ["/p/trip"],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(joined, "/p/trip.wav|/p/trip.thm|/p/trip.avi");
}

#[test]
fn extra_file_links_to_one_item_only() {
    let conn = open_memory().unwrap();
    insert_file(&conn, &new_file("/p/x.wav")).unwrap();
    create_item(&conn, "/p/one", false).unwrap();
    create_item(&conn, "/p/two", false).unwrap();
    link_extra_file(&conn, "/p/x.wav", "/p/one").unwrap();

    let err = link_extra_file(&conn, "/p/x.wav", "/p/two").unwrap_err();
    assert!(matches!(
        err,
        OperationError::DuplicateKey {
            entity: "other_file",
            field: "file",
            ..
        }
    ));
}

#[test]
fn link_extra_file_resolves_references() {
    let conn = open_memory().unwrap();
    let err = link_extra_file(&conn, "/p/x.wav", "/p/x").unwrap_err();
    assert!(matches!(err, OperationError::MissingFile { .. }));

    insert_file(&conn, &new_file("/p/x.wav")).unwrap();
    let err = link_extra_file(&conn, "/p/x.wav", "/p/x").unwrap_err();
    assert!(matches!(err, OperationError::MissingItem { .. }));
}
