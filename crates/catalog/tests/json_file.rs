//! Loading the catalog from a JSON file on disk.

use std::io::Write;

use catalog::{Catalog, CatalogError};

#[test]
fn builtin_roundtrips_through_a_file() {
    let builtin = Catalog::builtin();
    let json = serde_json::to_string_pretty(builtin.records()).unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let loaded = Catalog::from_json_file(file.path()).expect("catalog should load");
    assert_eq!(loaded, builtin);
}

#[test]
fn missing_file_reports_path() {
    let err = Catalog::from_json_file("/definitely/not/here/catalog.json").unwrap_err();
    match err {
        CatalogError::Io { path, .. } => assert!(path.ends_with("catalog.json")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn record_missing_field_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"[{"name": "only a name"}]"#).unwrap();

    assert!(matches!(
        Catalog::from_json_file(file.path()),
        Err(CatalogError::Parse(_))
    ));
}
