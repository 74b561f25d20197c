//! Database integration tests with real DuckDB files
//!
//! Each test creates its own database in a temporary directory.

use pagewise::database::{DatabaseEngine, Row};
use pagewise::{
    Count, CountCapability, OrderedCollection, PageRequest, PaginationMode, Paginator,
    PaginatorConfig, SortDirection,
};
use tempfile::TempDir;

/// Create a database file holding `comments` with ids `1..=rows`
fn comments_db(rows: u64) -> (TempDir, DatabaseEngine) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    let db = DatabaseEngine::open(path.to_str().unwrap()).unwrap();
    db.execute_batch(&format!(
        "CREATE TABLE comments (id BIGINT PRIMARY KEY, author VARCHAR, body VARCHAR);
         INSERT INTO comments
             SELECT i, 'user' || (i % 7), 'comment ' || i FROM range(1, {}) t(i);",
        rows + 1
    ))
    .unwrap();
    (dir, db)
}

fn ids(rows: &[Row]) -> Vec<i64> {
    rows.iter().map(|row| row.key).collect()
}

#[test]
fn test_keyset_page_stable_after_insert() {
    let (_dir, db) = comments_db(50);
    let paginator = Paginator::new(PaginatorConfig::default().with_keyset(true)).unwrap();
    let comments = db.table("comments", "id", true).unwrap();

    let request: PageRequest<i64> = paginator.request("page=2&pk=11");
    let before = paginator.paginate(&comments, &request).unwrap();
    assert_eq!(ids(&before.items), (11..=20).collect::<Vec<_>>());

    db.execute_batch("INSERT INTO comments VALUES (0, 'user0', 'first!'), (-1, 'user1', 'zeroth');")
        .unwrap();

    let after = paginator.paginate(&comments, &request).unwrap();
    assert_eq!(ids(&after.items), ids(&before.items));
    // Counted from the anchor, so rows inserted before it don't renumber pages
    assert_eq!(after.count, Count::Exact(50));
    assert_eq!(after.pages, 5);
    assert_eq!(after.page, 2);
}

#[test]
fn test_deleted_anchor_row() {
    let (_dir, db) = comments_db(50);
    let paginator = Paginator::new(PaginatorConfig::default().with_keyset(true)).unwrap();
    let comments = db.table("comments", "id", true).unwrap();

    db.execute_batch("DELETE FROM comments WHERE id = 21;").unwrap();

    let page = paginator
        .paginate(&comments, &paginator.request("page=3&pk=21"))
        .unwrap();
    assert_eq!(page.anchor, Some(22));
    assert_eq!(page.items[0].get("body").unwrap(), "comment 22");
}

#[test]
fn test_capped_count_on_large_table() {
    let (_dir, db) = comments_db(5_000);
    let paginator = Paginator::new(
        PaginatorConfig::default()
            .with_per_page(50)
            .with_max_count(1_000),
    )
    .unwrap();
    let comments = db.table("comments", "id", true).unwrap();

    let page = paginator
        .paginate(&comments, &paginator.request("page=4"))
        .unwrap();

    assert_eq!(page.count, Count::AtLeast(1_000));
    assert_eq!(page.pages, 20);
    assert_eq!(page.items.len(), 50);
    assert_eq!(page.items[0].key, 151);
}

#[test]
fn test_descending_keyset_navigation() {
    let (_dir, db) = comments_db(50);
    let paginator = Paginator::new(PaginatorConfig::default().with_keyset(true)).unwrap();
    let newest_first = db
        .table("comments", "id", true)
        .unwrap()
        .order_by("id", SortDirection::Desc)
        .unwrap();

    let first = paginator
        .paginate(&newest_first, &paginator.request(""))
        .unwrap();
    assert_eq!(ids(&first.items), (41..=50).rev().collect::<Vec<_>>());

    let next = first.href(first.window.next.as_ref().unwrap());
    assert_eq!(next, "?page=2&pk=40");

    let second = paginator
        .paginate(&newest_first, &paginator.request(&next))
        .unwrap();
    assert_eq!(ids(&second.items), (31..=40).rev().collect::<Vec<_>>());
    assert_eq!(second.window.previous.as_ref().unwrap().page, 1);
}

#[test]
fn test_unsupported_count_uses_lower_bound() {
    let (_dir, db) = comments_db(1_000);
    let paginator = Paginator::new(PaginatorConfig::default().with_keyset(true)).unwrap();
    let comments = db
        .table("comments", "id", true)
        .unwrap()
        .with_count_capability(CountCapability::Unsupported);

    let page = paginator
        .paginate(&comments, &paginator.request("page=2&pk=11"))
        .unwrap();

    assert!(page.count.is_lower_bound());
    assert!(page.pages > 2 && page.pages < 100);
    assert_eq!(page.items[0].key, 11);
}

#[test]
fn test_non_unique_key() {
    let (_dir, db) = comments_db(30);
    db.execute_batch("CREATE TABLE scored AS SELECT id, CAST(id % 3 AS BIGINT) AS score FROM comments;")
        .unwrap();
    let by_score = db.table("scored", "score", false).unwrap();

    let strict = Paginator::new(PaginatorConfig::default().with_keyset(true)).unwrap();
    let err = strict
        .paginate(&by_score, &strict.request(""))
        .unwrap_err();
    assert!(err.is_fatal_config());

    let degraded = Paginator::new(
        PaginatorConfig::default()
            .with_keyset(true)
            .with_max_count(100),
    )
    .unwrap();
    let page = degraded
        .paginate(&by_score, &degraded.request("page=2"))
        .unwrap();
    assert_eq!(page.mode, PaginationMode::Degraded);
    assert_eq!(page.items.len(), 10);
}

#[test]
fn test_attached_database() {
    let (dir, db) = comments_db(25);
    drop(db);

    let main = DatabaseEngine::open_in_memory().unwrap();
    let path = dir.path().join("app.duckdb");
    main.attach(path.to_str().unwrap(), "app").unwrap();

    let paginator = Paginator::default();
    let comments = main.table("app.comments", "id", true).unwrap();
    let page = paginator
        .paginate(&comments, &paginator.request("page=3"))
        .unwrap();

    assert_eq!(ids(&page.items), (21..=25).collect::<Vec<_>>());
    assert_eq!(page.count, Count::Exact(25));
}

#[test]
fn test_missing_table_and_key() {
    let (_dir, db) = comments_db(5);

    assert!(db.table("nope", "id", true).unwrap_err().is_fatal_config());
    assert!(db.table("comments", "nope", true).unwrap_err().is_fatal_config());
    assert!(db.table("comments; DROP TABLE comments", "id", true).is_err());
    assert_eq!(db.list_tables().unwrap(), vec!["comments".to_string()]);
}
