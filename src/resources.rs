//! The rom image container and the validated file loading.
use std::{fs, path::Path};

use crate::{definitions::rom, LoadError};

/// Represents a single rom with it's information.
///
/// A rom is a raw binary of big-endian two byte instructions that the
/// chipset copies to address `0x200` before execution starts. Construction
/// validates the size bounds up front, a rom that does not fit into memory
/// is refused as a whole instead of partially loaded.
#[derive(Debug, Clone)]
pub struct Rom {
    /// The rom name
    name: String,
    /// The raw content data stored as a u8 slice on the heap
    data: Box<[u8]>,
}

impl Rom {
    /// Will generate a new rom based of the given data.
    pub fn new(name: &str, data: Vec<u8>) -> Result<Self, LoadError> {
        if data.is_empty() {
            return Err(LoadError::Empty);
        }
        if data.len() > rom::MAX_SIZE {
            return Err(LoadError::TooLarge {
                size: data.len(),
                max: rom::MAX_SIZE,
            });
        }

        Ok(Rom {
            name: name.to_string(),
            data: data.into_boxed_slice(),
        })
    }

    /// Will read a rom image from the given file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(&name, data)
    }

    /// Will return a slice of the rom content.
    pub fn get_data(&self) -> &[u8] {
        &self.data
    }

    /// Will return the name of the rom.
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// The size of the rom content in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
