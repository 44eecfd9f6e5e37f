pub mod catalog;
pub mod error;
pub mod item;
pub mod properties;
pub mod reader;
pub mod slot;
pub mod writer;

pub use catalog::SlotCatalog;
pub use error::MenuError;
pub use item::{FILE_HEADER, MenuItem};
pub use properties::{PropertyKey, PropertyTable, Record};
pub use slot::Slot;
