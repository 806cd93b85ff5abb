//! Input abstraction and low-level decoding for signature database buffers.
//!
//! This module abstracts over the two ways a signature database reaches this
//! library - a file on disk and an in-memory buffer - and provides the
//! bounds-checked primitives the decoder is built on.
//!
//! # Architecture
//!
//! - **Backend system** - Pluggable data sources behind the [`crate::file::Backend`]
//!   trait: [`crate::file::physical::Physical`] (memory-mapped files) and
//!   [`crate::file::memory::Memory`] (owned buffers)
//! - **File facade** - [`crate::file::File`] wraps a backend and is what the
//!   higher-level [`crate::SignatureDatabase`] owns
//! - **Decoding primitives** - [`crate::file::parser::Parser`] and
//!   [`crate::file::io`] perform every actual read, each one bounds-checked
//!
//! # Examples
//!
//! ```rust,no_run
//! use sigscope::File;
//!
//! let file = File::from_file("db.esl".as_ref())?;
//! println!("Loaded {} bytes", file.len());
//! # Ok::<(), sigscope::Error>(())
//! ```

pub(crate) mod io;
pub(crate) mod memory;
pub(crate) mod parser;
pub(crate) mod physical;

use std::path::Path;

use crate::Result;
use memory::Memory;
use physical::Physical;

/// Trait abstracting over the data sources a signature database can be read from.
///
/// Implementations provide bounds-checked access to an immutable byte region.
/// The decoder never mutates, re-encodes, or frees the data it is given.
pub trait Backend: Send + Sync {
    /// Returns a slice of the data at the given offset and length.
    ///
    /// # Arguments
    ///
    /// * `offset` - The starting offset within the data.
    /// * `len` - The length of the slice in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data in bytes.
    fn len(&self) -> usize;

    /// Returns `true` if the backend holds no data.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An input signature database, loaded from disk or from memory.
///
/// `File` owns the raw bytes (directly or through a mapping) and hands out
/// borrowed views for iteration. Dropping it releases only the backing
/// storage the library created itself.
pub struct File {
    backend: Box<dyn Backend>,
}

impl File {
    /// Load a signature database from a file on disk using memory-mapped I/O.
    ///
    /// # Arguments
    /// * `path` - Path of the database file (e.g. an `.esl` dump of `db` or `dbx`)
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or
    /// [`crate::Error::Empty`] for a zero-length file.
    pub fn from_file(path: &Path) -> Result<File> {
        Ok(File {
            backend: Box::new(Physical::new(path)?),
        })
    }

    /// Load a signature database from a buffer already in memory.
    ///
    /// # Arguments
    /// * `data` - The raw database bytes; ownership is taken
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] if the buffer is empty.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        if data.is_empty() {
            return Err(crate::Error::Empty);
        }

        Ok(File {
            backend: Box::new(Memory::new(data)),
        })
    }

    /// Returns the complete database contents.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.backend.data()
    }

    /// Returns a bounds-checked slice of the database contents.
    ///
    /// # Arguments
    /// * `offset` - The starting offset within the data
    /// * `len` - The length of the slice in bytes
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the requested range is out of bounds.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.backend.data_slice(offset, len)
    }

    /// Returns the total length of the database in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.backend.len()
    }

    /// Returns `true` if the database holds no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backend.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_mem_rejects_empty_input() {
        assert!(matches!(File::from_mem(Vec::new()), Err(crate::Error::Empty)));
    }

    #[test]
    fn from_mem_roundtrip() {
        let file = File::from_mem(vec![0x01, 0x02, 0x03]).unwrap();
        assert_eq!(file.len(), 3);
        assert!(!file.is_empty());
        assert_eq!(file.data(), &[0x01, 0x02, 0x03]);
        assert_eq!(file.data_slice(1, 2).unwrap(), &[0x02, 0x03]);
    }
}
