use rusqlite::Connection;
use transync_core::db::open_db_in_memory;
use transync_core::{
    ContentItem, ContentRepository, JobRecord, LocaleState, RevisionMarker, RowState,
    SqliteContentRepository, SqliteGroupResolver, SqliteJobLedger, StatusError, StatusService,
};

/// Parent P (id 1, en, revision 5) with child C (id 2, fr) produced at revision 3.
fn seed(conn: &Connection) {
    let repo = SqliteContentRepository::new(conn);
    repo.upsert_item(&ContentItem::new(1, "en", RevisionMarker(5)))
        .unwrap();
    repo.upsert_item(
        &ContentItem::new(2, "fr", RevisionMarker(8)).produced_from(RevisionMarker(3), "po-1"),
    )
    .unwrap();
    repo.link_item(1, "post-1", true).unwrap();
    repo.link_item(2, "post-1", false).unwrap();
}

fn service(conn: &Connection) -> StatusService<SqliteGroupResolver<'_>, SqliteJobLedger<'_>> {
    StatusService::new(SqliteGroupResolver::new(conn), SqliteJobLedger::new(conn))
}

#[test]
fn stale_child_column_and_row() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = service(&conn);

    assert_eq!(
        service.locale_status(2, "fr").unwrap(),
        LocaleState::OutOfDate {
            target: 2,
            is_self: true
        }
    );

    let row = service.row_status(2).unwrap();
    let RowState::UpdateSingle(request) = &row else {
        panic!("expected update single, got {row:?}");
    };
    assert_eq!(request.source_id, 1);
    assert_eq!(request.source_locale, "en");
    assert_eq!(request.target_locale, "fr");
    assert_eq!(request.project_options_id.as_deref(), Some("po-1"));

    let route = row.route().unwrap();
    assert_eq!(route.action, "sdl_update_single");
    assert_eq!(route.param("src_id"), Some("1"));
    assert_eq!(route.param("target_lang"), Some("fr"));
    assert_eq!(route.param("project_options"), Some("po-1"));
}

#[test]
fn active_locale_masks_staleness_and_busies_parent() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    SqliteJobLedger::new(&conn)
        .record_job(&JobRecord::in_progress("post-1", "fr"))
        .unwrap();
    let service = service(&conn);

    assert_eq!(
        service.locale_status(2, "fr").unwrap(),
        LocaleState::InProgress
    );
    assert_eq!(service.row_status(1).unwrap(), RowState::Busy);
    assert_eq!(service.row_status(2).unwrap(), RowState::Busy);
}

#[test]
fn parent_row_offers_update_all() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let row = service(&conn).row_status(1).unwrap();

    let route = row.route().unwrap();
    assert_eq!(route.action, "sdl_update_all");
    assert_eq!(route.param("src_lang"), Some("en"));
}

#[test]
fn refreshed_child_is_translated_and_up_to_date() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    SqliteContentRepository::new(&conn)
        .upsert_item(
            &ContentItem::new(2, "fr", RevisionMarker(9)).produced_from(RevisionMarker(5), "po-1"),
        )
        .unwrap();
    let service = service(&conn);

    assert_eq!(
        service.locale_status(1, "fr").unwrap(),
        LocaleState::Translated {
            target: 2,
            is_self: true
        }
    );
    assert_eq!(service.row_status(1).unwrap(), RowState::UpToDateParent);
    assert_eq!(service.row_status(2).unwrap(), RowState::UpToDateChild);
}

#[test]
fn overview_reads_columns_from_one_snapshot() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let locales = vec!["fr".to_string(), "de".to_string()];

    let overview = service(&conn).row_overview(1, &locales).unwrap();
    assert_eq!(overview.item_id, 1);
    assert!(matches!(overview.row, RowState::UpdateAll(_)));
    assert_eq!(overview.columns[1], ("de".to_string(), LocaleState::None));
}

#[test]
fn unknown_item_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let err = service(&conn).row_status(77).unwrap_err();
    assert!(matches!(err, StatusError::NotFound(77)));
}
