use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use menu_core::writer::MenuWriter;
use menu_core::{MenuItem, Slot, SlotCatalog};

fn test_catalog() -> SlotCatalog {
    let mut catalog = SlotCatalog::new();
    catalog.set_default_item(Slot::Wear, "wear_del_i_.menu");
    catalog.set_default_item(Slot::Bra, "bra_del_i_.menu");
    catalog.set_default_item(Slot::Skirt, "skirt_del_i_.menu");
    catalog
}

fn put_record(section: &mut MenuWriter, strings: &[&str]) {
    section.put_u8(strings.len() as u8);
    for s in strings {
        section.put_string(s);
    }
}

fn menu_bytes(category: &str, records: &[&[&str]]) -> Vec<u8> {
    let mut section = MenuWriter::new();
    for strings in records {
        put_record(&mut section, strings);
    }
    section.put_u8(0);
    let section = section.into_bytes();

    let mut w = MenuWriter::new();
    w.put_string("CM3D2_MENU");
    w.put_i32(1000);
    w.put_string("assets/dress/dress_i_.menu");
    w.put_string("Dress");
    w.put_string(category);
    w.put_string("desc");
    w.put_i32(0);
    w.put_i32(section.len() as i32);
    w.extend(&section);
    w.into_bytes()
}

fn record_strings(item: &MenuItem) -> Vec<(String, Vec<String>)> {
    item.properties()
        .records()
        .iter()
        .map(|r| (r.key.clone(), r.values.clone()))
        .collect()
}

fn reencode(item: &mut MenuItem, catalog: &SlotCatalog) -> MenuItem {
    let bytes = item.encode(catalog);
    MenuItem::decode(&bytes, catalog).expect("re-encoded menu should decode")
}

fn rec(key: &str, values: &[&str]) -> (String, Vec<String>) {
    (
        key.to_string(),
        values.iter().map(|v| v.to_string()).collect(),
    )
}

fn temp_menu_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "menu_edit_{}_{}_{}.menu",
        prefix,
        std::process::id(),
        nanos
    ))
}

#[test]
fn mask_insertion_into_empty_table_lands_at_front() {
    let catalog = test_catalog();
    let mut item = MenuItem::decode(&menu_bytes("wear", &[]), &catalog).expect("decode");
    item.set_masked("mayuge", true);

    let reparsed = reencode(&mut item, &catalog);
    assert_eq!(
        record_strings(&reparsed),
        vec![rec("maskitem", &["mayuge"])]
    );
}

#[test]
fn mask_insertion_follows_the_last_existing_mask_record() {
    let catalog = test_catalog();
    let bytes = menu_bytes(
        "wear",
        &[
            &["tex", "a.tex"],
            &["maskitem", "hairf"],
            &["color", "1"],
            &["maskitem", "hairr"],
            &["shader", "toony"],
        ],
    );
    let mut item = MenuItem::decode(&bytes, &catalog).expect("decode");
    item.set_masked("mayuge", true);

    let reparsed = reencode(&mut item, &catalog);
    assert_eq!(
        record_strings(&reparsed),
        vec![
            rec("tex", &["a.tex"]),
            rec("maskitem", &["hairf"]),
            rec("color", &["1"]),
            rec("maskitem", &["hairr"]),
            rec("maskitem", &["mayuge"]),
            rec("shader", &["toony"]),
        ]
    );
}

#[test]
fn chikubi_expands_to_exactly_two_subpart_records() {
    let catalog = test_catalog();
    let mut item = MenuItem::decode(&menu_bytes("wear", &[]), &catalog).expect("decode");
    item.set_masked("chikubi", true);

    let reparsed = reencode(&mut item, &catalog);
    assert_eq!(
        record_strings(&reparsed),
        vec![rec("maskitem", &["accNipL"]), rec("maskitem", &["accNipR"])]
    );
}

#[test]
fn chikubi_subparts_are_dropped_when_aggregate_is_not_masked() {
    let catalog = test_catalog();
    let bytes = menu_bytes(
        "wear",
        &[&["maskitem", "accNipL"], &["maskitem", "accNipR"]],
    );
    let mut item = MenuItem::decode(&bytes, &catalog).expect("decode");
    assert_eq!(item.masked_slots.get("accNipL"), Some(&true));

    let reparsed = reencode(&mut item, &catalog);
    assert!(reparsed.properties().is_empty());
}

#[test]
fn chikubi_subparts_survive_while_aggregate_stays_masked() {
    let catalog = test_catalog();
    let bytes = menu_bytes(
        "wear",
        &[&["maskitem", "accNipL"], &["maskitem", "accNipR"]],
    );
    let mut item = MenuItem::decode(&bytes, &catalog).expect("decode");
    item.set_masked("chikubi", true);

    let reparsed = reencode(&mut item, &catalog);
    assert_eq!(
        record_strings(&reparsed),
        vec![rec("maskitem", &["accNipL"]), rec("maskitem", &["accNipR"])]
    );
}

#[test]
fn mask_record_is_dropped_when_slot_is_toggled_off() {
    let catalog = test_catalog();
    let bytes = menu_bytes("wear", &[&["maskitem", "mayuge"], &["tex", "a.tex"]]);
    let mut item = MenuItem::decode(&bytes, &catalog).expect("decode");
    item.set_masked("mayuge", false);

    let reparsed = reencode(&mut item, &catalog);
    assert_eq!(record_strings(&reparsed), vec![rec("tex", &["a.tex"])]);
}

#[test]
fn undress_insertion_follows_the_last_existing_item_record() {
    let catalog = test_catalog();
    let bytes = menu_bytes(
        "onepiece",
        &[&["アイテム", "bra_del_i_.menu"], &["tex", "a.tex"]],
    );
    let mut item = MenuItem::decode(&bytes, &catalog).expect("decode");
    assert_eq!(item.undressed_slots.get(&Slot::Bra), Some(&true));
    item.set_undressed(Slot::Skirt, true);

    let reparsed = reencode(&mut item, &catalog);
    assert_eq!(
        record_strings(&reparsed),
        vec![
            rec("アイテム", &["bra_del_i_.menu"]),
            rec("アイテム", &["skirt_del_i_.menu"]),
            rec("tex", &["a.tex"]),
        ]
    );
}

#[test]
fn undress_insertion_without_item_records_appends_at_the_end() {
    let catalog = test_catalog();
    let bytes = menu_bytes("onepiece", &[&["tex", "a.tex"]]);
    let mut item = MenuItem::decode(&bytes, &catalog).expect("decode");
    item.set_undressed(Slot::Bra, true);

    let reparsed = reencode(&mut item, &catalog);
    assert_eq!(
        record_strings(&reparsed),
        vec![rec("tex", &["a.tex"]), rec("アイテム", &["bra_del_i_.menu"])]
    );
}

#[test]
fn undress_record_is_dropped_when_slot_is_dressed_again() {
    let catalog = test_catalog();
    let bytes = menu_bytes("onepiece", &[&["アイテム", "bra_del_i_.menu"]]);
    let mut item = MenuItem::decode(&bytes, &catalog).expect("decode");
    item.set_undressed(Slot::Bra, false);

    let reparsed = reencode(&mut item, &catalog);
    assert!(reparsed.properties().is_empty());
}

#[test]
fn slots_without_default_filename_have_no_undress_behavior() {
    let catalog = test_catalog();
    let mut item = MenuItem::decode(&menu_bytes("wear", &[]), &catalog).expect("decode");
    // megane has no entry in either catalog tier
    item.set_undressed(Slot::Megane, true);

    let reparsed = reencode(&mut item, &catalog);
    assert!(reparsed.properties().is_empty());
}

#[test]
fn stale_remove_marker_for_the_new_category_is_dropped() {
    let catalog = test_catalog();
    let bytes = menu_bytes("skirt", &[&["アイテム", "wear_del_i_.menu"]]);
    let mut item = MenuItem::decode(&bytes, &catalog).expect("decode");
    assert_eq!(item.undressed_slots.get(&Slot::Wear), Some(&true));
    item.category = Slot::Wear;

    let reparsed = reencode(&mut item, &catalog);
    assert!(reparsed.properties().is_empty());
}

#[test]
fn category_rename_propagates_into_unknown_records_once() {
    let catalog = test_catalog();
    let bytes = menu_bytes(
        "wear",
        &[
            &["category", "wear"],
            &["attachpoint", "Wear", "Bip01 Spine"],
        ],
    );
    let mut item = MenuItem::decode(&bytes, &catalog).expect("decode");
    item.category = Slot::Skirt;

    let reparsed = reencode(&mut item, &catalog);
    assert_eq!(
        record_strings(&reparsed),
        vec![
            rec("category", &["skirt"]),
            rec("attachpoint", &["skirt", "Bip01 Spine"]),
        ]
    );

    // a second encode with no further category change must not touch it
    let again = reencode(&mut item, &catalog);
    assert_eq!(record_strings(&again), record_strings(&reparsed));
}

#[test]
fn rename_cache_moves_forward_with_each_write() {
    let catalog = test_catalog();
    let bytes = menu_bytes("wear", &[&["attachpoint", "wear"]]);
    let mut item = MenuItem::decode(&bytes, &catalog).expect("decode");

    item.category = Slot::Skirt;
    item.encode(&catalog);
    item.category = Slot::Panz;
    let reparsed = reencode(&mut item, &catalog);

    // substitution chained wear -> skirt -> panz; a stale cache would
    // have left "skirt" behind on the second write
    assert_eq!(
        record_strings(&reparsed),
        vec![rec("attachpoint", &["panz"])]
    );
}

#[test]
fn display_name_spaces_persist_as_placeholder_codepoint() {
    let catalog = test_catalog();
    let bytes = menu_bytes("wear", &[&["name", "Plain"]]);
    let mut item = MenuItem::decode(&bytes, &catalog).expect("decode");
    item.name = "Cute Dress".to_string();

    let reparsed = reencode(&mut item, &catalog);
    assert_eq!(
        record_strings(&reparsed),
        vec![rec("name", &["Cute\u{2008}Dress"])]
    );
}

#[test]
fn description_record_tracks_the_edited_description() {
    let catalog = test_catalog();
    let bytes = menu_bytes("wear", &[&["setumei", "old text"]]);
    let mut item = MenuItem::decode(&bytes, &catalog).expect("decode");
    item.description = "new text".to_string();

    let reparsed = reencode(&mut item, &catalog);
    assert_eq!(record_strings(&reparsed), vec![rec("setumei", &["new text"])]);
    assert_eq!(reparsed.description, "new text");
}

#[test]
fn load_edit_write_round_trips_through_the_filesystem() {
    let catalog = test_catalog();
    let source = temp_menu_path("source");
    let dest = temp_menu_path("dest");
    fs::write(&source, menu_bytes("wear", &[&["tex", "a.tex"]]))
        .expect("failed to write fixture");

    let mut item = MenuItem::load(&source, &catalog).expect("load should succeed");
    assert!(item.file_name.starts_with("menu_edit_source"));
    item.set_masked("mayuge", true);
    item.write_to_path(&dest, &catalog).expect("write should succeed");

    let written = MenuItem::load(&dest, &catalog).expect("written file should load");
    assert_eq!(
        record_strings(&written),
        vec![rec("maskitem", &["mayuge"]), rec("tex", &["a.tex"])]
    );

    let _ = fs::remove_file(&source);
    let _ = fs::remove_file(&dest);
}
