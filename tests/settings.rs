use sharad_chargen::catalog::AttributeBounds;
use sharad_chargen::state::PriorityLetter;
use sharad_chargen::*;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_default_options() {
    let options = ChargenOptions::new();
    assert_eq!(options.debounce_ms, 300);
    assert_eq!(options.debounce(), Duration::from_millis(300));
    assert_eq!(options.max_history, 50);
    assert!(options.enable_keyboard_shortcuts);
}

#[test]
fn test_options_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("chargen.json");
    let options = ChargenOptions {
        debounce_ms: 120,
        max_history: 10,
        enable_keyboard_shortcuts: false,
    };

    options.save_to_file(&path).unwrap();
    let loaded = ChargenOptions::load_from_file(&path).unwrap();
    assert_eq!(loaded, options);
}

#[test]
fn test_partial_options_fill_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chargen.json");
    fs::write(&path, r#"{ "max_history": 5 }"#).unwrap();

    let loaded = ChargenOptions::load_from_file(&path).unwrap();
    assert_eq!(loaded.max_history, 5);
    assert_eq!(loaded.debounce_ms, 300);
    assert!(loaded.enable_keyboard_shortcuts);
}

#[test]
fn test_options_load_errors() {
    let dir = tempdir().unwrap();
    let missing = ChargenOptions::load_from_file(dir.path().join("missing.json"));
    assert!(matches!(missing, Err(ChargenError::Io(_))));

    let broken_path = dir.path().join("broken.json");
    fs::write(&broken_path, "{ not json").unwrap();
    let broken = ChargenOptions::load_from_file(&broken_path);
    assert!(matches!(broken, Err(ChargenError::Serialization(_))));
}

#[test]
fn test_catalog_load_keeps_builtin_tables() {
    let catalog = ChargenConstData::load_from_file("tests/dummy_chargen_catalog.json").unwrap();
    assert_eq!(catalog.augments.len(), 3);
    assert_eq!(catalog.attributes.len(), 8);
    assert_eq!(catalog.cyberlimb_upgrade_cost, 5000.0);

    let row = catalog.priority_row(PriorityLetter::A).unwrap();
    assert_eq!(row.attributes, 24);
    assert_eq!(row.skills, 46);
    assert_eq!(row.special.get("human"), Some(&9));
    assert_eq!(catalog.priority_row(PriorityLetter::E).unwrap().resources, 6000.0);
}

#[test]
fn test_attribute_bounds_lookup() {
    let catalog = ChargenConstData::default();
    assert_eq!(
        catalog.attribute_bounds("elf", "agility"),
        AttributeBounds::new(2, 7)
    );
    assert_eq!(
        catalog.attribute_bounds("Troll", "body"),
        AttributeBounds::new(5, 10)
    );
    assert_eq!(
        catalog.attribute_bounds("human", "agility"),
        AttributeBounds::new(1, 6)
    );
    assert_eq!(
        catalog.attribute_bounds("changeling", "magic"),
        AttributeBounds::default()
    );

    assert_eq!(AttributeBounds::new(2, 7).clamp(9), 7);
    assert_eq!(AttributeBounds::new(2, 7).clamp(0), 2);
}

#[test]
fn test_file_logger_writes_entries() {
    let dir = tempdir().unwrap();
    logging::init_at(dir.path()).unwrap();
    log::warn!("Troll body out of range");

    let contents = fs::read_to_string(dir.path().join("chargen_log.txt")).unwrap();
    assert!(contents.contains("Chargen logging started"));
    assert!(contents.contains("WARN"));
    assert!(contents.contains("Troll body out of range"));

    // Only one logger per process.
    let again = logging::init_at(dir.path());
    assert!(matches!(again, Err(ChargenError::Logger(_))));
}
