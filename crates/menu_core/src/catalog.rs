use std::collections::BTreeMap;

use crate::slot::Slot;

struct FallbackItem {
    slot: Slot,
    filename: &'static str,
}

// Default "remove" menus the host table is known to miss.
#[rustfmt::skip]
const FALLBACK_DEFAULT_ITEMS: &[FallbackItem] = &[
    FallbackItem { slot: Slot::Nose,      filename: "nose_del_i_.menu" },
    FallbackItem { slot: Slot::Facegloss, filename: "facegloss_del_i_.menu" },
];

/// Per-slot lookup data supplied by the host environment: the default
/// "remove" menu filename for each undressable slot and optional display
/// labels. Filename lookups are two-tier: the host table wins, then the
/// static fallback table, and a miss means the slot has no undress
/// behavior at all.
#[derive(Debug, Default, Clone)]
pub struct SlotCatalog {
    default_items: BTreeMap<Slot, String>,
    labels: BTreeMap<Slot, String>,
}

impl SlotCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_default_item(&mut self, slot: Slot, filename: impl Into<String>) {
        self.default_items.insert(slot, filename.into());
    }

    pub fn set_label(&mut self, slot: Slot, label: impl Into<String>) {
        self.labels.insert(slot, label.into());
    }

    pub fn default_filename(&self, slot: Slot) -> Option<&str> {
        if let Some(filename) = self.default_items.get(&slot) {
            return Some(filename);
        }
        FALLBACK_DEFAULT_ITEMS
            .iter()
            .find(|item| item.slot == slot)
            .map(|item| item.filename)
    }

    /// Reverse lookup: which slot does this menu filename undress?
    /// Host table first, filenames compared case-insensitively.
    pub fn slot_for_filename(&self, filename: &str) -> Option<Slot> {
        self.default_items
            .iter()
            .find(|(_, f)| f.eq_ignore_ascii_case(filename))
            .map(|(&slot, _)| slot)
            .or_else(|| {
                FALLBACK_DEFAULT_ITEMS
                    .iter()
                    .find(|item| item.filename.eq_ignore_ascii_case(filename))
                    .map(|item| item.slot)
            })
    }

    pub fn is_default_filename(&self, slot: Slot, filename: &str) -> bool {
        self.default_filename(slot)
            .is_some_and(|f| f.eq_ignore_ascii_case(filename))
    }

    /// Display label for presentation only; never persisted.
    pub fn label(&self, slot: Slot) -> &str {
        self.labels
            .get(&slot)
            .map(String::as_str)
            .unwrap_or_else(|| slot.as_str())
    }
}
