use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{load_catalog, GameId, ModifierKind, ServiceTypeId};

fn workspace_path(relative: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root");
    root.join(relative)
}

#[test]
fn loads_wow_leveling_catalog() {
    let path = workspace_path("assets/catalogs/wow_leveling.toml");
    let catalog = load_catalog(path.to_str().expect("utf-8 path")).expect("load catalog");
    assert_eq!(catalog.modifiers.len(), 3);

    let express = &catalog.modifiers[0];
    assert_eq!(express.code, "EXPRESS");
    assert_eq!(express.kind, ModifierKind::Percentage);
    assert_eq!(express.value, 1_500);
    assert_eq!(express.scope.game, GameId(1));
    assert_eq!(express.scope.service_type, Some(ServiceTypeId(2)));

    assert_eq!(catalog.modifiers[1].scope.service_type, None);
    assert!(!catalog.modifiers[2].active);
}

#[test]
fn rejects_unknown_keys() {
    let mut tmp = NamedTempFile::new().expect("tmp file");
    write!(
        tmp,
        "[[modifiers]]\ncode = \"X\"\nkind = \"fixed\"\nvalue = 1\nactive = true\nsort_order = 1\nmystery = 2\n\n[modifiers.scope]\ngame = 1\n"
    )
    .expect("write tmp");

    let err = load_catalog(tmp.path().to_str().unwrap()).expect_err("should fail");
    assert!(err.to_string().contains("unknown"), "unexpected error: {err}");
}

#[test]
fn rejects_missing_fields() {
    let mut tmp = NamedTempFile::new().expect("tmp file");
    write!(tmp, "[[modifiers]]\ncode = \"X\"\nkind = \"fixed\"\n").expect("write tmp");

    let err = load_catalog(tmp.path().to_str().unwrap()).expect_err("missing keys");
    assert!(
        err.to_string().contains("missing field"),
        "unexpected error: {err}"
    );
}

#[test]
fn fixture_round_trips_through_the_resolver() {
    let path = workspace_path("assets/catalogs/wow_leveling.toml");
    let catalog = load_catalog(path.to_str().expect("utf-8 path")).expect("load catalog");

    // EXPRESS is scoped to service type 2; STREAM is game-wide;
    // WINTER_SALE is inactive.
    let resolved = catalog.resolve(GameId(1), ServiceTypeId(2), &[]).unwrap();
    let codes: Vec<_> = resolved.iter().map(|m| m.code.as_str()).collect();
    assert_eq!(codes, ["EXPRESS", "STREAM"]);

    let resolved = catalog.resolve(GameId(1), ServiceTypeId(9), &[]).unwrap();
    let codes: Vec<_> = resolved.iter().map(|m| m.code.as_str()).collect();
    assert_eq!(codes, ["STREAM"]);
}

#[test]
fn missing_file_is_a_read_error() {
    let path = workspace_path("assets/catalogs/does_not_exist.toml");
    let err = load_catalog(path.to_str().unwrap()).expect_err("missing file");
    assert!(err.to_string().contains("failed to read"), "got: {err}");
}
