use super::*;
use crate::version_probe::StaticProbe;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, sql: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, sql).unwrap();
    path
}

#[test]
fn test_changelog_file_name_rules() {
    assert!(is_changelog_file_name("2020-01-a.sql"));
    assert!(is_changelog_file_name("a.sql"));
    assert!(is_changelog_file_name("a.b.sql"));
    assert!(!is_changelog_file_name(".sql"));
    assert!(!is_changelog_file_name(".hidden.sql"));
    assert!(!is_changelog_file_name("notes.txt"));
    assert!(!is_changelog_file_name("a.sql.bak"));
    assert!(!is_changelog_file_name("a.SQL"));
}

#[test]
fn test_load_filters_and_sorts() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "2020-02-b.sql", "ALTER TABLE t ADD c INT;");
    write(dir.path(), "2020-01-a.sql", "CREATE TABLE t (id INT);");
    write(dir.path(), ".swap.sql", "junk");
    write(dir.path(), "README.md", "docs");
    std::fs::create_dir(dir.path().join("init")).unwrap();
    std::fs::create_dir(dir.path().join("dir.sql")).unwrap();

    let set = ScriptSet::load(dir.path(), None).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.names(), vec!["2020-01-a.sql", "2020-02-b.sql"]);
    assert_eq!(
        set.content("2020-01-a.sql").unwrap(),
        "CREATE TABLE t (id INT);"
    );
}

#[test]
fn test_load_without_probe_zeroes_timestamps() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.sql", "SELECT 1;");
    write(dir.path(), "b.sql", "SELECT 2;");

    let set = ScriptSet::load(dir.path(), None).unwrap();
    assert!(set.iter().all(|s| s.modified_at == 0));
}

#[test]
fn test_load_with_probe() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.sql", "SELECT 1;");
    write(dir.path(), "b.sql", "SELECT 2;");
    let probe = StaticProbe::new().with(a, 1234);

    let set = ScriptSet::load(dir.path(), Some(&probe)).unwrap();
    assert_eq!(set.get("a.sql").unwrap().modified_at, 1234);
    // The probe had no answer for b.sql
    assert_eq!(set.get("b.sql").unwrap().modified_at, 0);
}

#[test]
fn test_load_records_paths() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.sql", "SELECT 1;");

    let set = ScriptSet::load(dir.path(), None).unwrap();
    assert_eq!(set.get("a.sql").unwrap().path, a);
}

#[test]
fn test_load_missing_directory() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let err = ScriptSet::load(&missing, None).unwrap_err();
    assert!(matches!(err, CoreError::DirectoryAccess { .. }));
    assert!(err.to_string().contains("[C001]"));
}

#[test]
fn test_load_empty_directory() {
    let dir = TempDir::new().unwrap();
    let set = ScriptSet::load(dir.path(), None).unwrap();
    assert!(set.is_empty());
}

#[test]
fn test_load_non_utf8_content() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("latin1.sql"), b"SELECT '\xe9';").unwrap();

    let set = ScriptSet::load(dir.path(), None).unwrap();
    assert!(set.content("latin1.sql").unwrap().starts_with("SELECT '"));
}

#[test]
fn test_content_unknown_script() {
    let set = ScriptSet::default();
    let err = set.content("ghost.sql").unwrap_err();
    assert!(matches!(err, CoreError::UnknownScript { ref name } if name == "ghost.sql"));
}

#[test]
fn test_from_entries_orders_by_name() {
    let entry = |name: &str| ScriptEntry {
        name: name.to_string(),
        path: PathBuf::from(name),
        modified_at: 0,
        content: String::new(),
    };
    let set = ScriptSet::from_entries(vec![entry("c.sql"), entry("a.sql"), entry("b.sql")]);
    assert_eq!(set.names(), vec!["a.sql", "b.sql", "c.sql"]);
}

#[test]
fn test_init_scripts_load() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "02-data.sql", "INSERT INTO t VALUES (1);");
    write(dir.path(), "01-schema.sql", "CREATE TABLE t (id INT);");
    write(dir.path(), ".ignored.sql", "junk");

    let init = InitScripts::load(dir.path()).unwrap();
    assert_eq!(init.len(), 2);
    assert_eq!(init.names(), vec!["01-schema.sql", "02-data.sql"]);
    assert_eq!(
        init.content("02-data.sql").unwrap(),
        "INSERT INTO t VALUES (1);"
    );
    assert!(init.content("03-missing.sql").is_err());
}

#[test]
fn test_init_scripts_missing_directory() {
    let dir = TempDir::new().unwrap();
    let err = InitScripts::load(&dir.path().join("init")).unwrap_err();
    assert!(matches!(err, CoreError::DirectoryAccess { .. }));
}
