//! SQL quoting helpers for generated statement text
//!
//! Nothing in this crate executes SQL. These helpers exist so that the
//! statements printed for an operator to copy are safe to paste, whatever
//! characters a script file name or ledger table name contains.

/// Quote a SQL identifier, doubling any embedded double quotes.
///
/// # Examples
/// ```
/// use csd_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("about_changelog"), r#""about_changelog""#);
/// assert_eq!(quote_ident(r#"odd"name"#), r#""odd""name""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a possibly schema-qualified table name part by part.
///
/// # Examples
/// ```
/// use csd_core::sql_utils::quote_qualified;
/// assert_eq!(quote_qualified("about_changelog"), r#""about_changelog""#);
/// assert_eq!(quote_qualified("meta.about_changelog"), r#""meta"."about_changelog""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a possibly schema-qualified table name into `(schema, table)`.
///
/// Splits on the last `.`; an unqualified name lands in DuckDB's default
/// `main` schema.
///
/// # Examples
/// ```
/// use csd_core::sql_utils::split_qualified_name;
/// assert_eq!(split_qualified_name("about_changelog"), ("main", "about_changelog"));
/// assert_eq!(split_qualified_name("meta.about_changelog"), ("meta", "about_changelog"));
/// ```
pub fn split_qualified_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("main", name),
    }
}

/// Check that a table name can be quoted with [`quote_qualified`].
///
/// Every dot-separated part must be non-empty and free of double quotes,
/// NUL bytes and line breaks. DuckDB reads `nextval('...')` arguments
/// without `""` escapes, so a quote in a part could not be referenced from a
/// column default.
pub fn is_valid_qualified_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .split('.')
            .all(|part| !part.is_empty() && !part.contains(['"', '\0', '\n', '\r']))
}

/// Escape a value for use inside a single-quoted SQL string literal.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Render a value as a complete single-quoted SQL string literal.
///
/// # Examples
/// ```
/// use csd_core::sql_utils::quote_literal;
/// assert_eq!(quote_literal("2020-01-a.sql"), "'2020-01-a.sql'");
/// assert_eq!(quote_literal("it's.sql"), "'it''s.sql'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_sql_string(value))
}
