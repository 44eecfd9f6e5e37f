use std::error::Error;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum MenuError {
    /// The source buffer does not start with the expected menu header tag.
    Format { header: String },
    /// A slot name could not be resolved against the slot catalog.
    UnknownSlot(String),
    /// The source could not be read or the destination could not be written.
    Io(io::Error),
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format { header } => write!(
                f,
                "invalid menu header {header:?}, expected {:?}",
                crate::item::FILE_HEADER
            ),
            Self::UnknownSlot(name) => write!(f, "unknown slot name {name:?}"),
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl Error for MenuError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MenuError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
