use super::*;

#[test]
fn test_defaults() {
    let s = Settings::default();
    assert_eq!(s.storage_root, PathBuf::from("../ASB_dino_submissions"));
    assert_eq!(s.fallback_root, PathBuf::from("submissions_temp"));
    assert_eq!(s.timeouts.choice(), Duration::from_secs(60));
    assert_eq!(s.timeouts.file(), Duration::from_secs(300));
    assert!(s.rules.dino_ini.keep_blocks.contains("Dino Data"));
    assert!(s.rules.game_ini.keep_blocks.contains(GAME_MODE_SECTION));
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let s = Settings::from_toml(
        r#"
storage_root = "/srv/submissions"

[mods]
"Gacha" = "1234"

[timeouts]
choice_secs = 5
"#,
    )
    .unwrap();
    assert_eq!(s.storage_root, PathBuf::from("/srv/submissions"));
    assert_eq!(s.fallback_root, PathBuf::from("submissions_temp"));
    assert_eq!(s.mods.get("Gacha").map(String::as_str), Some("1234"));
    assert_eq!(s.timeouts.choice_secs, 5);
    assert_eq!(s.timeouts.file_secs, 300);
    assert_eq!(s.rules, FileRules::default());
}

#[test]
fn test_rules_from_file() {
    let s = Settings::from_toml(
        r#"
[rules.dino_ini]
ignore_strings = ["ColorSetNames"]
keep_blocks = ["Dino Data"]
"#,
    )
    .unwrap();
    assert_eq!(s.rules.dino_ini.ignore_strings, ["ColorSetNames"]);
    assert_eq!(s.rules.dino_ini.keep_blocks.len(), 1);
    assert_eq!(s.rules.game_ini, FileRules::default().game_ini);
}

#[test]
fn test_invalid_toml_is_settings_error() {
    let err = Settings::from_toml("storage_root = [").unwrap_err();
    assert!(matches!(err, SubmitError::Settings(_)));
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let s = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(s, Settings::default());
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");
    let mut s = Settings::default();
    s.archive_dir = Some(PathBuf::from("/tmp/archives"));
    s.mods.insert("Mega".into(), "5678".into());
    s.save(&path).unwrap();

    assert!(!path.with_extension("toml.tmp").exists());
    assert_eq!(Settings::load(&path).unwrap(), s);
}

#[test]
fn test_overrides() {
    let s = Settings::default().with_overrides(Some(PathBuf::from("repo")), None);
    assert_eq!(s.storage_root, PathBuf::from("repo"));
    assert_eq!(s.fallback_root, PathBuf::from("submissions_temp"));
}
