use super::*;

const DINO_EXPORT: &str = "[Dino Data]
DinoID1=123
DinoID2=456
DinoClass=/Game/PrimalEarth/Dinos/Rex/Rex_Character_BP.Rex_Character_BP_C
TamedName=Big Red

[Colorization]
ColorSet[0]=(R=0.479000,G=0.356000,B=0.225000,A=0.000000)

[DinoAncestors]
DinoAncestors=MaleName=Dad;MaleDinoID1=1;MaleDinoID2=2;FemaleName=Mum;FemaleDinoID1=3;FemaleDinoID2=4
";

#[test]
fn test_parse_sections_in_order() {
    let doc = parse(DINO_EXPORT.lines());
    assert_eq!(
        doc.section_names(),
        vec!["Dino Data", "Colorization", "DinoAncestors"]
    );
    assert_eq!(doc.get("Dino Data", "DinoID1"), Some("123"));
    assert_eq!(doc.get("Dino Data", "TamedName"), Some("Big Red"));
}

#[test]
fn test_parse_splits_on_first_delimiter_only() {
    let doc = parse(DINO_EXPORT.lines());
    assert_eq!(
        doc.get("Colorization", "ColorSet[0]"),
        Some("(R=0.479000,G=0.356000,B=0.225000,A=0.000000)")
    );
    assert_eq!(
        doc.get("DinoAncestors", "DinoAncestors"),
        Some("MaleName=Dad;MaleDinoID1=1;MaleDinoID2=2;FemaleName=Mum;FemaleDinoID1=3;FemaleDinoID2=4")
    );
}

#[test]
fn test_parse_colon_delimiter_and_trimming() {
    let doc = parse(["[S]", "  key : value  ", "other=  spaced = value "]);
    assert_eq!(doc.get("S", "key"), Some("value"));
    assert_eq!(doc.get("S", "other"), Some("spaced = value"));
}

#[test]
fn test_parse_duplicate_key_last_wins_keeps_position() {
    let doc = parse(["[S]", "a=1", "b=2", "a=3"]);
    let section = doc.section("S").unwrap();
    assert_eq!(section.get("a"), Some("3"));
    assert_eq!(section.keys().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn test_parse_repeated_header_continues_section() {
    let doc = parse(["[S]", "a=1", "[T]", "x=1", "[S]", "b=2"]);
    assert_eq!(doc.len(), 2);
    assert_eq!(doc.section("S").unwrap().len(), 2);
}

#[test]
fn test_parse_skips_comments_orphans_and_bare_lines() {
    let doc = parse([
        "orphan=1",
        "; comment",
        "# comment",
        "[S]",
        "no delimiter here",
        "=no key",
        "k=v",
    ]);
    assert_eq!(doc.len(), 1);
    let section = doc.section("S").unwrap();
    assert_eq!(section.entries().collect::<Vec<_>>(), vec![("k", "v")]);
}

#[test]
fn test_parse_header_uses_last_bracket() {
    let doc = parse(["[/script/shootergame.shootergamemode]", "a=1"]);
    assert!(doc.contains_section("/script/shootergame.shootergamemode"));
}

#[test]
fn test_parse_empty_value() {
    let doc = parse(["[S]", "ImprinterName="]);
    assert_eq!(doc.get("S", "ImprinterName"), Some(""));
}

#[test]
fn test_write_without_spaces() {
    let mut doc = IniDocument::new();
    doc.set("Dino Data", "DinoID1", "1");
    doc.set("Dino Data", "Guid", "00000000-0000-0000-0000-000000000000");
    doc.set("Other", "k", "v");
    assert_eq!(
        doc.to_string(),
        "[Dino Data]\nDinoID1=1\nGuid=00000000-0000-0000-0000-000000000000\n\n[Other]\nk=v\n\n"
    );
}

#[test]
fn test_write_then_parse_is_stable() {
    let doc = parse(DINO_EXPORT.lines());
    let reparsed = parse(doc.to_string().lines());
    assert_eq!(reparsed, doc);
}

#[test]
fn test_insert_section_merges() {
    let mut doc = parse(["[S]", "a=1", "b=2"]);
    let mut extra = Section::new("S");
    extra.set("b", "3");
    extra.set("c", "4");
    doc.insert_section(extra);
    let section = doc.section("S").unwrap();
    assert_eq!(
        section.entries().collect::<Vec<_>>(),
        vec![("a", "1"), ("b", "3"), ("c", "4")]
    );
}

#[test]
fn test_remove_section_and_key() {
    let mut doc = parse(["[S]", "a=1", "[T]", "b=2"]);
    assert_eq!(doc.section_mut("S").unwrap().remove("a"), Some("1".to_string()));
    assert!(doc.remove_section("T").is_some());
    assert!(doc.remove_section("T").is_none());
    assert_eq!(doc.section_names(), vec!["S"]);
}
