use std::path::PathBuf;
use std::process;

use clap::Parser;
use menu_core::{MenuItem, Slot, SlotCatalog};
use serde_json::{Map as JsonMap, Value as JsonValue};

#[derive(Debug, Parser)]
#[command(version, about = "Inspect and edit CM3D2/COM3D2 .menu item descriptors")]
struct Cli {
    #[arg(value_name = "FILE.menu", required_unless_present = "list_slots")]
    path: Option<PathBuf>,
    #[arg(long)]
    name: bool,
    #[arg(long)]
    category: bool,
    #[arg(long)]
    description: bool,
    #[arg(long)]
    masked: bool,
    #[arg(long)]
    undressed: bool,
    #[arg(long)]
    properties: bool,
    #[arg(long)]
    json: bool,
    #[arg(long = "list-slots")]
    list_slots: bool,
    /// Host default-"remove" table entry, repeatable: SLOT=FILENAME
    #[arg(long = "default-item", value_name = "SLOT=FILENAME")]
    default_item: Vec<String>,
    /// Display label override, repeatable: SLOT=LABEL
    #[arg(long, value_name = "SLOT=LABEL")]
    label: Vec<String>,
    #[arg(long = "set-name", value_name = "NAME")]
    set_name: Option<String>,
    #[arg(long = "set-category", value_name = "SLOT", value_parser = parse_slot_arg)]
    set_category: Option<Slot>,
    #[arg(long = "set-description", value_name = "TEXT")]
    set_description: Option<String>,
    /// Mask a body slot, repeatable (body-slot name, e.g. "mayuge")
    #[arg(long, value_name = "SLOT")]
    mask: Vec<String>,
    #[arg(long, value_name = "SLOT")]
    unmask: Vec<String>,
    /// Undress a wear slot, repeatable
    #[arg(long, value_name = "SLOT", value_parser = parse_slot_arg)]
    undress: Vec<Slot>,
    #[arg(long, value_name = "SLOT", value_parser = parse_slot_arg)]
    dress: Vec<Slot>,
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Copy)]
struct FieldSelection {
    name: bool,
    category: bool,
    description: bool,
    masked: bool,
    undressed: bool,
    properties: bool,
}

impl FieldSelection {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            name: cli.name,
            category: cli.category,
            description: cli.description,
            masked: cli.masked,
            undressed: cli.undressed,
            properties: cli.properties,
        }
    }

    fn is_field_mode(&self) -> bool {
        self.name
            || self.category
            || self.description
            || self.masked
            || self.undressed
            || self.properties
    }

    fn all() -> Self {
        Self {
            name: true,
            category: true,
            description: true,
            masked: true,
            undressed: true,
            properties: true,
        }
    }

    fn selected_pairs(&self, item: &MenuItem, catalog: &SlotCatalog) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();

        if self.name {
            out.push(("name", item.name.clone()));
        }
        if self.category {
            out.push(("category", item.category.to_string()));
        }
        if self.description {
            out.push(("description", item.description.clone()));
        }
        if self.masked {
            for (slot_name, &masked) in &item.masked_slots {
                if masked {
                    out.push(("masked", slot_name.clone()));
                }
            }
        }
        if self.undressed {
            for (&slot, &undressed) in &item.undressed_slots {
                if undressed {
                    out.push(("undressed", format!("{slot} ({})", catalog.label(slot))));
                }
            }
        }
        if self.properties {
            for record in item.properties().records() {
                out.push(("record", format!("{} {}", record.key, record.values.join(" "))));
            }
        }

        out
    }

    fn selected_json(&self, item: &MenuItem, catalog: &SlotCatalog) -> JsonMap<String, JsonValue> {
        let mut out = JsonMap::new();

        if self.name {
            out.insert("name".to_string(), JsonValue::String(item.name.clone()));
        }
        if self.category {
            out.insert(
                "category".to_string(),
                JsonValue::String(item.category.to_string()),
            );
            out.insert(
                "category_label".to_string(),
                JsonValue::String(catalog.label(item.category).to_string()),
            );
        }
        if self.description {
            out.insert(
                "description".to_string(),
                JsonValue::String(item.description.clone()),
            );
        }
        if self.masked {
            out.insert(
                "masked".to_string(),
                JsonValue::Array(
                    item.masked_slots
                        .iter()
                        .filter(|&(_, &masked)| masked)
                        .map(|(slot_name, _)| JsonValue::String(slot_name.clone()))
                        .collect(),
                ),
            );
        }
        if self.undressed {
            out.insert(
                "undressed".to_string(),
                JsonValue::Array(
                    item.undressed_slots
                        .iter()
                        .filter(|&(_, &undressed)| undressed)
                        .map(|(&slot, _)| JsonValue::String(slot.to_string()))
                        .collect(),
                ),
            );
        }
        if self.properties {
            out.insert(
                "properties".to_string(),
                JsonValue::Array(
                    item.properties()
                        .records()
                        .iter()
                        .map(|record| {
                            serde_json::to_value(record).unwrap_or(JsonValue::Null)
                        })
                        .collect(),
                ),
            );
        }

        out
    }
}

fn main() {
    let cli = Cli::parse();

    let catalog = build_catalog(&cli);

    if cli.list_slots {
        print_slot_list(&catalog);
        return;
    }

    let Some(path) = cli.path.clone() else {
        eprintln!("a menu file path is required");
        process::exit(2);
    };

    let has_edits = cli.set_name.is_some()
        || cli.set_category.is_some()
        || cli.set_description.is_some()
        || !cli.mask.is_empty()
        || !cli.unmask.is_empty()
        || !cli.undress.is_empty()
        || !cli.dress.is_empty();

    if has_edits && cli.output.is_none() {
        eprintln!("edit flags require --output <PATH>");
        process::exit(2);
    }
    if !has_edits && cli.output.is_some() {
        eprintln!("--output requires at least one edit flag");
        process::exit(2);
    }

    let mut item = MenuItem::load(&path, &catalog).unwrap_or_else(|e| {
        eprintln!("Error loading {}: {e}", path.display());
        process::exit(1);
    });

    if let Some(name) = cli.set_name.clone() {
        item.name = name;
    }
    if let Some(slot) = cli.set_category {
        item.category = slot;
    }
    if let Some(description) = cli.set_description.clone() {
        item.description = description;
    }
    for slot_name in &cli.mask {
        item.set_masked(slot_name.clone(), true);
    }
    for slot_name in &cli.unmask {
        item.set_masked(slot_name.clone(), false);
    }
    for &slot in &cli.undress {
        item.set_undressed(slot, true);
    }
    for &slot in &cli.dress {
        item.set_undressed(slot, false);
    }

    if let Some(output) = cli.output.as_ref() {
        item.write_to_path(output, &catalog).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", output.display());
            process::exit(1);
        });
    }

    let fields = FieldSelection::from_cli(&cli);
    if cli.json {
        let selection = if fields.is_field_mode() {
            fields
        } else {
            FieldSelection::all()
        };
        let map = selection.selected_json(&item, &catalog);
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonValue::Object(map))
                .unwrap_or_else(|_| "{}".to_string())
        );
    } else if fields.is_field_mode() {
        for (key, value) in fields.selected_pairs(&item, &catalog) {
            println!("{key}={value}");
        }
    } else if !has_edits {
        for (key, value) in FieldSelection::all().selected_pairs(&item, &catalog) {
            println!("{key}={value}");
        }
    }
}

fn build_catalog(cli: &Cli) -> SlotCatalog {
    let mut catalog = SlotCatalog::new();
    for entry in &cli.default_item {
        let (slot, filename) = parse_catalog_entry(entry, "--default-item");
        catalog.set_default_item(slot, filename);
    }
    for entry in &cli.label {
        let (slot, label) = parse_catalog_entry(entry, "--label");
        catalog.set_label(slot, label);
    }
    catalog
}

fn parse_catalog_entry(entry: &str, flag: &str) -> (Slot, String) {
    let Some((slot_name, value)) = entry.split_once('=') else {
        eprintln!("{flag} expects SLOT=VALUE, got '{entry}'");
        process::exit(2);
    };
    let slot = Slot::parse(slot_name).unwrap_or_else(|e| {
        eprintln!("{flag}: {e}");
        process::exit(2);
    });
    (slot, value.to_string())
}

fn parse_slot_arg(value: &str) -> Result<Slot, String> {
    Slot::parse(value).map_err(|e| e.to_string())
}

fn print_slot_list(catalog: &SlotCatalog) {
    for slot in Slot::ALL {
        let kind = if slot.is_wear_slot() { "wear" } else { "body" };
        match catalog.default_filename(slot) {
            Some(filename) => {
                println!("{slot}\t{kind}\t{}\t{filename}", catalog.label(slot));
            }
            None => println!("{slot}\t{kind}\t{}", catalog.label(slot)),
        }
    }
}
