use serde::Serialize;

pub const KEY_NAME: &str = "name";
pub const KEY_DESCRIPTION: &str = "setumei";
pub const KEY_CATEGORY: &str = "category";
pub const KEY_MASK_ITEM: &str = "maskitem";
pub const KEY_ITEM: &str = "アイテム";
pub const KEY_END: &str = "end";

/// One entry of the menu file's trailing section: a key plus its ordered
/// values. Keys are not unique; duplicates are legal and meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub key: String,
    pub values: Vec<String>,
}

impl Record {
    pub fn new(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    pub fn single(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, vec![value.into()])
    }

    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// Closed dispatch over the record keys the editor interprets. Everything
/// the encoder does per record branches on this, so the filter and
/// substitution rules stay in one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKey {
    Name,
    Description,
    Category,
    MaskItem,
    Item,
    End,
    Other,
}

impl PropertyKey {
    pub fn of(key: &str) -> Self {
        match key {
            KEY_NAME => Self::Name,
            KEY_DESCRIPTION => Self::Description,
            KEY_CATEGORY => Self::Category,
            KEY_MASK_ITEM => Self::MaskItem,
            KEY_ITEM => Self::Item,
            KEY_END => Self::End,
            _ => Self::Other,
        }
    }
}

/// Ordered record sequence. Order is semantically significant on write:
/// unknown records must re-serialize in their original relative positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyTable {
    records: Vec<Record>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn insert(&mut self, index: usize, record: Record) {
        self.records.insert(index, record);
    }

    /// Index just past the last record with `key`, or `None` if the key
    /// does not occur. Used to place editor-inserted records after the
    /// existing run of their kind.
    pub fn insertion_point_after_last(&self, key: &str) -> Option<usize> {
        self.records
            .iter()
            .rposition(|record| record.key == key)
            .map(|index| index + 1)
    }

    pub fn contains(&self, key: &str, first_value: &str) -> bool {
        self.records
            .iter()
            .any(|record| record.key == key && record.first_value() == Some(first_value))
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.records.iter().any(|record| record.key == key)
    }
}
