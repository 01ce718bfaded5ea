use super::*;
use crate::DuckDbBackend;

/// Create the ledger table and insert `(id, filename, epoch seconds)` rows.
async fn seeded(rows: &[(i64, &str, i64)]) -> DuckDbBackend {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(&ledger_table_ddl("about_changelog").unwrap())
        .await
        .unwrap();
    for (id, name, ts) in rows {
        db.execute_batch(&format!(
            "INSERT INTO about_changelog (id, filename, update_time) VALUES ({id}, '{name}', to_timestamp({ts}))"
        ))
        .await
        .unwrap();
    }
    db
}

#[tokio::test]
async fn test_load_empty_table() {
    let db = seeded(&[]).await;
    let ledger = load_ledger(&db, "about_changelog").await.unwrap();
    assert!(ledger.is_empty());
}

#[tokio::test]
async fn test_load_takes_max_update_time() {
    let db = seeded(&[
        (1, "a.sql", 100),
        (2, "a.sql", 300),
        (3, "a.sql", 200),
        (4, "b.sql", 50),
    ])
    .await;

    let ledger = load_ledger(&db, "about_changelog").await.unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.applied_at("a.sql"), Some(300));
    assert_eq!(ledger.applied_at("b.sql"), Some(50));
}

#[tokio::test]
async fn test_load_duplicate_timestamps_single_entry() {
    let db = seeded(&[(1, "a.sql", 100), (2, "a.sql", 100)]).await;

    let ledger = load_ledger(&db, "about_changelog").await.unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.applied_at("a.sql"), Some(100));
}

#[tokio::test]
async fn test_load_missing_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = load_ledger(&db, "about_changelog").await.unwrap_err();
    assert!(err.is_table_not_found(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_load_wrong_shape_is_fatal() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE about_changelog (name VARCHAR)")
        .await
        .unwrap();

    let err = load_ledger(&db, "about_changelog").await.unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn test_load_schema_qualified_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(&ledger_table_ddl("meta.applied").unwrap())
        .await
        .unwrap();
    db.execute_batch("INSERT INTO meta.applied (filename, update_time) VALUES ('x.sql', to_timestamp(42))")
        .await
        .unwrap();

    let ledger = load_ledger(&db, "meta.applied").await.unwrap();
    assert_eq!(ledger.applied_at("x.sql"), Some(42));
}

#[tokio::test]
async fn test_load_rejects_invalid_table_name() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = load_ledger(&db, "meta.").await.unwrap_err();
    assert!(matches!(err, DbError::InvalidIdentifier(_)));
}

#[tokio::test]
async fn test_hostile_table_name_is_rejected() {
    let db = seeded(&[]).await;
    let err = load_ledger(&db, "about_changelog\"; DROP TABLE about_changelog; --")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::InvalidIdentifier(_)), "unexpected error: {err}");
    assert!(db
        .query_rows("SELECT COUNT(*) FROM about_changelog", &[])
        .await
        .is_ok());
}

#[test]
fn test_ledger_query_quotes_table() {
    let sql = ledger_query("meta.about_changelog").unwrap();
    assert!(sql.contains(r#"FROM "meta"."about_changelog""#));
    assert!(sql.contains("GROUP BY filename"));
    assert!(sql.contains("ORDER BY filename, MAX(id)"));
}

#[test]
fn test_ddl_unqualified() {
    let ddl = ledger_table_ddl("about_changelog").unwrap();
    assert!(!ddl.contains("CREATE SCHEMA"));
    assert!(ddl.contains(r#"CREATE SEQUENCE IF NOT EXISTS "about_changelog_id_seq";"#));
    assert!(ddl.contains(r#"CREATE TABLE IF NOT EXISTS "about_changelog" ("#));
    assert!(ddl.contains(r#"nextval('"about_changelog_id_seq"')"#));
}

#[test]
fn test_ddl_qualified_creates_schema() {
    let ddl = ledger_table_ddl("meta.applied").unwrap();
    assert!(ddl.starts_with(r#"CREATE SCHEMA IF NOT EXISTS "meta";"#));
    assert!(ddl.contains(r#"CREATE SEQUENCE IF NOT EXISTS "meta"."applied_id_seq";"#));
    assert!(ddl.contains(r#"nextval('"meta"."applied_id_seq"')"#));
}

#[test]
fn test_ddl_rejects_quoted_table() {
    let err = ledger_table_ddl(r#"meta.change"log"#).unwrap_err();
    assert!(matches!(err, DbError::InvalidIdentifier(_)));
}

#[tokio::test]
async fn test_ddl_sequence_fills_ids() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(&ledger_table_ddl("with space.about changelog").unwrap())
        .await
        .unwrap();
    db.execute_batch(
        r#"INSERT INTO "with space"."about changelog" (filename) VALUES ('a.sql'), ('b.sql')"#,
    )
    .await
    .unwrap();

    let rows = db
        .query_rows(
            r#"SELECT id FROM "with space"."about changelog" ORDER BY id"#,
            &[],
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_ne!(rows[0][0], rows[1][0]);
}
