#![cfg(feature = "binary-cache")]

use rule_ast::{Record, RuleCatalog, SnapshotError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sample_catalog() -> RuleCatalog {
    let mut catalog = RuleCatalog::new();
    catalog
        .create_rule(
            "sales_or_marketing",
            "(age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')",
        )
        .unwrap();
    catalog
        .create_rule("well_paid", "salary > 50000 OR experience > 5")
        .unwrap();
    catalog
        .combine_named("target", &["sales_or_marketing", "well_paid"])
        .unwrap();
    catalog
}

fn sample_record() -> Record {
    Record::new()
        .set("age", 35_i64)
        .set("department", "Sales")
        .set("salary", 60000_i64)
}

// ---------------------------------------------------------------------------
// Round-trip
// ---------------------------------------------------------------------------

#[test]
fn round_trip_keeps_rules_and_results() {
    let original = sample_catalog();
    let restored = RuleCatalog::from_bytes(&original.to_bytes().unwrap()).unwrap();

    assert_eq!(restored.len(), original.len());
    for (a, b) in original.rules().zip(restored.rules()) {
        assert_eq!(a, b);
        assert_eq!(
            original.evaluate_rule(a.id(), &sample_record()).unwrap(),
            restored.evaluate_rule(b.id(), &sample_record()).unwrap()
        );
    }
}

#[test]
fn restored_catalog_keeps_name_index_and_ids() {
    let original = sample_catalog();
    let mut restored = RuleCatalog::from_bytes(&original.to_bytes().unwrap()).unwrap();

    assert_eq!(restored.get_by_name("target").unwrap().id().get(), 3);
    assert!(restored.create_rule("well_paid", "salary > 1").is_err());
    assert_eq!(restored.create_rule("fresh", "age < 18").unwrap().get(), 4);
}

#[test]
fn empty_catalog_round_trip() {
    let bytes = RuleCatalog::new().to_bytes().unwrap();
    let mut restored = RuleCatalog::from_bytes(&bytes).unwrap();
    assert!(restored.is_empty());
    assert_eq!(restored.create_rule("first", "x = 1").unwrap().get(), 1);
}

#[test]
fn encoding_is_deterministic() {
    let catalog = sample_catalog();
    assert_eq!(catalog.to_bytes().unwrap(), catalog.to_bytes().unwrap());
}

// ---------------------------------------------------------------------------
// Corruption
// ---------------------------------------------------------------------------

#[test]
fn bad_magic() {
    let mut bytes = sample_catalog().to_bytes().unwrap();
    bytes[0..4].copy_from_slice(b"NOPE");
    assert!(matches!(
        RuleCatalog::from_bytes(&bytes),
        Err(SnapshotError::BadMagic)
    ));
}

#[test]
fn flipped_payload_byte_fails_checksum() {
    let mut bytes = sample_catalog().to_bytes().unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    assert!(matches!(
        RuleCatalog::from_bytes(&bytes),
        Err(SnapshotError::ChecksumMismatch)
    ));
}

#[test]
fn truncated_payload() {
    let bytes = sample_catalog().to_bytes().unwrap();
    let truncated = &bytes[..bytes.len() - 4];
    assert!(matches!(
        RuleCatalog::from_bytes(truncated),
        Err(SnapshotError::LengthMismatch { .. })
    ));
    assert!(matches!(
        RuleCatalog::from_bytes(&bytes[..16]),
        Err(SnapshotError::LengthMismatch { expected: 32, actual: 16 })
    ));
}

#[test]
fn wrong_format_version() {
    let mut bytes = sample_catalog().to_bytes().unwrap();
    bytes[4] = 99;
    bytes[5] = 0;

    let err = RuleCatalog::from_bytes(&bytes).unwrap_err();
    assert!(
        matches!(
            err,
            SnapshotError::IncompatibleVersion {
                found: 99,
                supported: 1
            }
        ),
        "expected IncompatibleVersion, got: {err}"
    );
}

// ---------------------------------------------------------------------------
// File round-trip
// ---------------------------------------------------------------------------

#[test]
fn file_round_trip() {
    let dir = std::env::temp_dir().join("rule_ast_test_snapshot");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("catalog.rast");

    let original = sample_catalog();
    original.to_binary_file(&path).unwrap();
    let restored = RuleCatalog::from_binary_file(&path).unwrap();
    assert_eq!(
        restored.rules().collect::<Vec<_>>(),
        original.rules().collect::<Vec<_>>()
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("rule_ast_missing_snapshot.rast");
    assert!(matches!(
        RuleCatalog::from_binary_file(&path),
        Err(SnapshotError::Io(_))
    ));
}
