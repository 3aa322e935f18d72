use super::*;

fn dino_rules() -> NormalizerRules {
    NormalizerRules::new(
        ["DinoNameTag=None", "bIsFemale=Unused"],
        [
            "Dino Data",
            "Colorization",
            "Max Character Status Values",
            "Dino Ancestry",
            "DinoAncestors",
            "DinoAncestorsMale",
        ],
    )
}

#[test]
fn test_strip_noise_is_case_insensitive_and_ordered() {
    let text = "keep one\nDROP this\nkeep two\nalso Drop\nkeep three";
    let kept = strip_noise(text, &["drop"]);
    assert_eq!(kept, vec!["keep one", "keep two", "keep three"]);
}

#[test]
fn test_strip_noise_multiple_needles() {
    let text = "a=1\nSessionName=Foo\nb=2\nServerPassword=hunter2\n";
    let kept = strip_noise(text, &["sessionname", "PASSWORD"]);
    assert_eq!(kept, vec!["a=1", "b=2"]);
}

#[test]
fn test_strip_noise_without_rules_keeps_everything() {
    let text = "a\nb\n\nc";
    let none: [&str; 0] = [];
    assert_eq!(strip_noise(text, &none), vec!["a", "b", "", "c"]);
}

#[test]
fn test_strip_noise_ignores_empty_needle() {
    assert_eq!(strip_noise("a\nb", &[""]), vec!["a", "b"]);
}

#[test]
fn test_title_case() {
    assert_eq!(title_case("dino data"), "Dino Data");
    assert_eq!(
        title_case("MAX CHARACTER STATUS VALUES"),
        "Max Character Status Values"
    );
    assert_eq!(title_case("dinoancestors"), "Dinoancestors");
    assert_eq!(title_case("a1b"), "A1B");
}

#[test]
fn test_reclassify_exact_lower_title_and_drop() {
    let doc = parse([
        "[Dino Data]",
        "a=1",
        "[COLORIZATION]",
        "b=2",
        "[max character status values]",
        "c=3",
        "[Unknown Block]",
        "d=4",
    ]);
    let keep = ["Dino Data", "colorization", "Max Character Status Values"]
        .into_iter()
        .map(String::from)
        .collect();
    let out = reclassify(doc, &keep);
    assert_eq!(
        out.section_names(),
        vec!["Dino Data", "colorization", "Max Character Status Values"]
    );
    assert_eq!(out.get("colorization", "b"), Some("2"));
    assert_eq!(out.get("Max Character Status Values", "c"), Some("3"));
}

#[test]
fn test_reclassify_is_idempotent() {
    let doc = parse([
        "[dino data]",
        "a=1",
        "[Junk]",
        "x=1",
        "[DinoAncestors]",
        "DinoAncestors=MaleName=a",
    ]);
    let rules = dino_rules();
    let once = reclassify(doc, &rules.keep_blocks);
    let twice = reclassify(once.clone(), &rules.keep_blocks);
    assert_eq!(once, twice);
    assert_eq!(once.section_names(), vec!["Dino Data", "DinoAncestors"]);
}

#[test]
fn test_reclassify_merges_casing_variants() {
    let doc = parse(["[Dino Data]", "a=1", "[DINO DATA]", "a=2", "b=3"]);
    let rules = dino_rules();
    let out = reclassify(doc, &rules.keep_blocks);
    assert_eq!(out.len(), 1);
    assert_eq!(out.get("Dino Data", "a"), Some("2"));
    assert_eq!(out.get("Dino Data", "b"), Some("3"));
}

#[test]
fn test_scan_mod_ids() {
    let text = "[/script/shootergame.shootergamemode]\nModIDS=731604991, 889745138,731604991\nModIDS=1\n";
    assert_eq!(
        scan_mod_ids(text),
        Some(vec![
            "731604991".to_string(),
            "889745138".to_string(),
            "1".to_string()
        ])
    );
    assert_eq!(scan_mod_ids("a=1\n"), None);
    assert_eq!(scan_mod_ids("ModIDS=\n"), Some(vec![]));
}

#[test]
fn test_normalize_pipeline() {
    let raw = "[dino data]\nDinoID1=1\nDinoNameTag=None\n[Useless]\nx=1\n";
    let normalized = normalize(raw.as_bytes(), &dino_rules()).unwrap();
    assert_eq!(normalized.document.section_names(), vec!["Dino Data"]);
    assert_eq!(normalized.document.get("Dino Data", "DinoID1"), Some("1"));
    assert_eq!(normalized.document.get("Dino Data", "DinoNameTag"), None);
    assert_eq!(normalized.text, raw);
    assert_eq!(normalized.mod_ids, None);
}

#[test]
fn test_normalize_captures_mods_before_stripping() {
    let rules = NormalizerRules::new(["ModIDS"], ["/script/shootergame.shootergamemode"]);
    let raw = "[/Script/ShooterGame.ShooterGameMode]\nModIDS=42,43\nbAllowX=True\n";
    let normalized = normalize(raw.as_bytes(), &rules).unwrap();
    assert_eq!(
        normalized.mod_ids,
        Some(vec!["42".to_string(), "43".to_string()])
    );
    let section = normalized
        .document
        .section("/script/shootergame.shootergamemode")
        .unwrap();
    assert_eq!(section.get("ModIDS"), None);
    assert_eq!(section.get("bAllowX"), Some("True"));
}

#[test]
fn test_normalize_propagates_decode_error() {
    assert!(normalize(&[0xFF, 0xFE, 0x00], &dino_rules()).is_err());
}
