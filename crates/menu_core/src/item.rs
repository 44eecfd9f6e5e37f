use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::catalog::SlotCatalog;
use crate::error::MenuError;
use crate::properties::{
    KEY_END, KEY_ITEM, KEY_MASK_ITEM, PropertyKey, PropertyTable, Record,
};
use crate::reader::MenuReader;
use crate::slot::Slot;
use crate::writer::MenuWriter;

pub const FILE_HEADER: &str = "CM3D2_MENU";

// The on-disk format is whitespace-sensitive elsewhere, so display names
// persist with U+2008 standing in for ASCII spaces.
const NAME_SPACE_PLACEHOLDER: &str = "\u{2008}";

/// One clothing/accessory item descriptor: the decoded header fields, the
/// property-table snapshot, and the editable views derived from it.
///
/// The snapshot and the views are independent after load. Toggling
/// `masked_slots`/`undressed_slots` does not touch the table; the two are
/// merged only while encoding, against a working copy.
#[derive(Debug, Clone)]
pub struct MenuItem {
    version: i32,
    path: String,
    reserved: i32,
    /// Name of the source menu file; presentation/export only.
    pub file_name: String,
    pub name: String,
    /// Category name as last persisted, lower-case. Rename propagation
    /// substitutes this value in unknown records, then moves it forward,
    /// so repeated encodes never re-substitute.
    category_name: String,
    pub category: Slot,
    pub description: String,
    properties: PropertyTable,
    /// Body-slot name -> masked. Keys are body-slot names, not `Slot`s.
    pub masked_slots: BTreeMap<String, bool>,
    pub undressed_slots: BTreeMap<Slot, bool>,
}

impl MenuItem {
    /// Parse a complete menu buffer. Fails with `MenuError::Format` when
    /// the header tag is wrong; an unrecognized category name is not
    /// fatal and leaves the default slot.
    pub fn decode(bytes: &[u8], catalog: &SlotCatalog) -> Result<Self, MenuError> {
        let mut r = MenuReader::new(bytes);

        let header = r.read_string()?;
        if header != FILE_HEADER {
            return Err(MenuError::Format { header });
        }

        let version = r.read_i32()?;
        let path = r.read_string()?;
        let mut name = r.read_string()?;
        let mut category_name = r.read_string()?.to_lowercase();
        let mut description = r.read_string()?;
        let reserved = r.read_i32()?;
        // Section length is framing only; the records are self-delimiting.
        let _section_len = r.read_i32()?;

        let mut properties = PropertyTable::new();
        loop {
            // Tolerate a source that ends without a terminator record;
            // encode will synthesize one.
            if r.remaining() == 0 {
                break;
            }
            let count = r.read_u8()?;
            if count == 0 {
                break;
            }
            let mut strings = Vec::with_capacity(usize::from(count));
            for _ in 0..count {
                strings.push(r.read_string()?);
            }
            let key = strings.remove(0);
            if key == KEY_END {
                break;
            }
            properties.push(Record::new(key, strings));
        }

        let mut masked_slots = BTreeMap::new();
        let mut undressed_slots = BTreeMap::new();
        for record in properties.records() {
            // A key-only record populates nothing.
            let Some(value) = record.first_value() else {
                continue;
            };
            match PropertyKey::of(&record.key) {
                PropertyKey::Name => name = value.to_string(),
                PropertyKey::Description => description = value.to_string(),
                PropertyKey::Category => category_name = value.to_lowercase(),
                PropertyKey::MaskItem => {
                    masked_slots.insert(value.to_string(), true);
                }
                PropertyKey::Item => {
                    if let Some(slot) = catalog.slot_for_filename(value) {
                        undressed_slots.insert(slot, true);
                    }
                }
                PropertyKey::End | PropertyKey::Other => {}
            }
        }

        let category = Slot::parse(&category_name).unwrap_or_default();

        Ok(Self {
            version,
            path,
            reserved,
            file_name: String::new(),
            name,
            category_name,
            category,
            description,
            properties,
            masked_slots,
            undressed_slots,
        })
    }

    /// Read and decode a menu file in one shot.
    pub fn load(path: impl AsRef<Path>, catalog: &SlotCatalog) -> Result<Self, MenuError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let mut item = Self::decode(&bytes, catalog)?;
        item.file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(item)
    }

    /// Serialize the current state. Deterministic for a fixed state: the
    /// edit views are ordered maps and the original record order is kept.
    ///
    /// Takes `&mut self` because encoding is the synchronization point:
    /// the merged table (insertions, filters, substitutions applied)
    /// replaces the snapshot and the cached previous category name moves
    /// forward, so a repeated write changes nothing further.
    pub fn encode(&mut self, catalog: &SlotCatalog) -> Vec<u8> {
        let new_category = self.category.as_str();

        let mut out = MenuWriter::new();
        out.put_string(FILE_HEADER);
        out.put_i32(self.version);
        out.put_string(&self.path);
        out.put_string(&self.name);
        out.put_string(new_category);
        out.put_string(&self.description);
        out.put_i32(self.reserved);

        let mut table = self.properties.clone();
        self.insert_missing_masks(&mut table);
        self.insert_missing_undress(&mut table, catalog);

        let mut emitted = PropertyTable::new();
        for record in table.records() {
            let mut values = record.values.clone();
            if let Some(first) = record.first_value() {
                match PropertyKey::of(&record.key) {
                    PropertyKey::Name => {
                        values[0] = self.name.replace(' ', NAME_SPACE_PLACEHOLDER);
                    }
                    PropertyKey::Description => {
                        values[0] = self.description.clone();
                    }
                    PropertyKey::Category => {
                        values[0] = new_category.to_string();
                    }
                    PropertyKey::MaskItem => {
                        if !self.mask_survives(first) {
                            continue;
                        }
                    }
                    PropertyKey::Item => {
                        if let Some(slot) = catalog.slot_for_filename(first)
                            && !self.is_undressed(slot)
                        {
                            continue;
                        }
                        // A "removed" marker pointing at the very slot now
                        // being edited would undress the item itself.
                        if catalog.is_default_filename(self.category, first) {
                            continue;
                        }
                    }
                    PropertyKey::End => {}
                    PropertyKey::Other => {
                        for value in values.iter_mut() {
                            if value.eq_ignore_ascii_case(&self.category_name) {
                                *value = new_category.to_string();
                            }
                        }
                    }
                }
            }

            emitted.push(Record::new(record.key.clone(), values));
        }

        let mut section = MenuWriter::new();
        for record in emitted.records() {
            // Record counts are u8 on disk; decode can never yield more
            // than 254 values and editor inserts carry exactly one.
            section.put_u8((record.values.len() + 1) as u8);
            section.put_string(&record.key);
            for value in &record.values {
                section.put_string(value);
            }
        }
        if !emitted.has_key(KEY_END) {
            section.put_u8(0);
        }

        let section = section.into_bytes();
        out.put_i32(section.len() as i32);
        out.extend(&section);

        self.properties = emitted;
        self.category_name = new_category.to_string();
        out.into_bytes()
    }

    /// Encode and write to `path`. Not atomic: a failed write may leave a
    /// truncated destination, which the caller can simply retry.
    pub fn write_to_path(
        &mut self,
        path: impl AsRef<Path>,
        catalog: &SlotCatalog,
    ) -> Result<(), MenuError> {
        let bytes = self.encode(catalog);
        fs::write(path, bytes)?;
        Ok(())
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// Internal resource path stored in the header; never edited.
    pub fn internal_path(&self) -> &str {
        &self.path
    }

    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    pub fn set_masked(&mut self, slot_name: impl Into<String>, masked: bool) {
        self.masked_slots.insert(slot_name.into(), masked);
    }

    pub fn set_undressed(&mut self, slot: Slot, undressed: bool) {
        self.undressed_slots.insert(slot, undressed);
    }

    fn is_masked(&self, slot_name: &str) -> bool {
        self.masked_slots.get(slot_name).copied().unwrap_or(false)
    }

    fn is_undressed(&self, slot: Slot) -> bool {
        self.undressed_slots.get(&slot).copied().unwrap_or(false)
    }

    fn mask_survives(&self, slot_name: &str) -> bool {
        // The aggregate's sub-part records are gated on the aggregate
        // flag alone; they never carry view entries of their own.
        if Slot::CHIKUBI_MASK_PARTS.contains(&slot_name) {
            return self.is_masked(Slot::Chikubi.as_str());
        }
        self.is_masked(slot_name)
    }

    /// Insert one `maskitem` record for every masked slot the table does
    /// not cover yet, right after the last existing `maskitem` record
    /// (front of the table when there is none). The aggregate slot
    /// expands to its two sub-part records, inserted together.
    fn insert_missing_masks(&self, table: &mut PropertyTable) {
        let mut at = table
            .insertion_point_after_last(KEY_MASK_ITEM)
            .unwrap_or(0);

        for slot_name in self
            .masked_slots
            .iter()
            .filter(|&(_, &masked)| masked)
            .map(|(name, _)| name)
        {
            if slot_name.eq_ignore_ascii_case(Slot::Chikubi.as_str()) {
                let covered = Slot::CHIKUBI_MASK_PARTS
                    .iter()
                    .any(|part| table.contains(KEY_MASK_ITEM, part));
                if covered {
                    continue;
                }
                for part in Slot::CHIKUBI_MASK_PARTS {
                    table.insert(at, Record::single(KEY_MASK_ITEM, part));
                    at += 1;
                }
            } else if !table.contains(KEY_MASK_ITEM, slot_name) {
                table.insert(at, Record::single(KEY_MASK_ITEM, slot_name.clone()));
                at += 1;
            }
        }
    }

    /// Insert one item record pointing at the default "remove" filename
    /// for every undressed slot the table does not cover yet, right after
    /// the last existing item record (end of the table when there is
    /// none). Slots without a default filename have no undress behavior.
    fn insert_missing_undress(&self, table: &mut PropertyTable, catalog: &SlotCatalog) {
        let mut at = table
            .insertion_point_after_last(KEY_ITEM)
            .unwrap_or(table.len());

        for slot in self
            .undressed_slots
            .iter()
            .filter(|&(_, &undressed)| undressed)
            .map(|(&slot, _)| slot)
        {
            let Some(filename) = catalog.default_filename(slot) else {
                continue;
            };
            if table.contains(KEY_ITEM, filename) {
                continue;
            }
            let filename = filename.to_string();
            table.insert(at, Record::single(KEY_ITEM, filename));
            at += 1;
        }
    }
}
