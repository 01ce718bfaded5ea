use super::*;
use tempfile::TempDir;

#[test]
fn test_parse_empty_config_uses_defaults() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.changelog_dir, "database/changelog.sql");
    assert_eq!(config.table, "about_changelog");
    assert_eq!(config.database.path, ":memory:");
    assert_eq!(config.init_dir, "init");
    assert_eq!(config.git, GitMode::Auto);
    assert_eq!(config.git_binary, "git");
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
changelog_dir: sql/changelog
table: meta.applied_scripts
database:
  path: ./app.duckdb
init_dir: bootstrap
git: never
git_binary: /usr/local/bin/git
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.changelog_dir, "sql/changelog");
    assert_eq!(config.table, "meta.applied_scripts");
    assert_eq!(config.database.path, "./app.duckdb");
    assert_eq!(config.init_dir, "bootstrap");
    assert_eq!(config.git, GitMode::Never);
    assert_eq!(config.git_binary, "/usr/local/bin/git");
    config.validate().unwrap();
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("tabel: about_changelog");
    assert!(result.is_err());
}

#[test]
fn test_invalid_git_mode_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("git: sometimes");
    assert!(result.is_err());
}

#[test]
fn test_validate_rejects_bad_table() {
    let config = Config {
        table: "meta.".to_string(),
        ..Default::default()
    };
    let err = config.validate().unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_validate_rejects_quoted_table() {
    let config = Config {
        table: r#"meta.change"log"#.to_string(),
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_empty_changelog_dir() {
    let config = Config {
        changelog_dir: "  ".to_string(),
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_load_from_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("changelog.yml"), "table: ledger\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.table, "ledger");
}

#[test]
fn test_load_from_dir_yaml_extension() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("changelog.yaml"), "git: always\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.git, GitMode::Always);
}

#[test]
fn test_load_from_dir_missing() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_or_default_without_file() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(dir.path()).unwrap();
    assert_eq!(config.table, "about_changelog");
}

#[test]
fn test_load_invalid_yaml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("changelog.yml"), "table: [unclosed\n").unwrap();

    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError(_)));
}

#[test]
fn test_path_resolution() {
    let root = Path::new("/srv/app");
    let config = Config::default();
    assert_eq!(
        config.changelog_dir_absolute(root),
        PathBuf::from("/srv/app/database/changelog.sql")
    );
    assert_eq!(
        config.init_dir_absolute(root),
        PathBuf::from("/srv/app/database/changelog.sql/init")
    );
    assert_eq!(config.database_path_absolute(root), ":memory:");

    let config = Config {
        database: DatabaseConfig {
            path: "data/app.duckdb".to_string(),
        },
        ..Default::default()
    };
    assert_eq!(config.database_path_absolute(root), "/srv/app/data/app.duckdb");
}

#[test]
fn test_git_mode_display() {
    assert_eq!(GitMode::Auto.to_string(), "auto");
    assert_eq!(GitMode::Always.to_string(), "always");
    assert_eq!(GitMode::Never.to_string(), "never");
}
