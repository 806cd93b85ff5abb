//! Physical file backend for memory-mapped I/O.
//!
//! This module provides the [`crate::file::physical::Physical`] backend that implements
//! the [`crate::file::Backend`] trait for accessing signature database files from disk
//! using memory-mapped I/O. Secure Boot variable dumps are usually small, but revocation
//! databases (`dbx`) can grow to hundreds of kilobytes; mapping avoids copying them and
//! lets the operating system page data in on demand.
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use sigscope::file::{Backend, Physical};
//!
//! let physical = Physical::new("dbx.esl")?;
//! println!("Database size: {} bytes", physical.len());
//! # Ok::<(), sigscope::Error>(())
//! ```

use super::Backend;
use crate::{
    Error::{Empty, Error},
    Result,
};

use memmap2::Mmap;
use std::{fs, path::Path};

/// A file backend that uses memory-mapped I/O for efficient access to files on disk.
///
/// The mapping is read-only and shared. All access operations include bounds checking,
/// so a database whose headers claim more data than the file holds cannot cause a read
/// outside the mapping.
#[derive(Debug)]
pub struct Physical {
    /// Memory-mapped file data
    data: Mmap,
}

impl Physical {
    /// Create a new physical file backend by memory-mapping the specified file.
    ///
    /// # Arguments
    /// * `path` - Path of the file to map
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened,
    /// [`crate::Error::Error`] if the mapping fails, or [`crate::Error::Empty`]
    /// for a zero-length file.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = fs::File::open(path)?;

        let data = unsafe { Mmap::map(&file) }.map_err(|error| Error(error.to_string()))?;
        if data.is_empty() {
            return Err(Empty);
        }

        Ok(Physical { data })
    }
}

impl Backend for Physical {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let Some(offset_end) = offset.checked_add(len) else {
            return Err(crate::Error::OutOfBounds);
        };

        if offset_end > self.data.len() {
            return Err(crate::Error::OutOfBounds);
        }

        Ok(&self.data[offset..offset_end])
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn maps_file_contents() {
        let tmp = tempfile_path("sigscope_physical_test");
        {
            let mut file = fs::File::create(&tmp).unwrap();
            file.write_all(&[0xAA, 0xBB, 0xCC, 0xDD]).unwrap();
        }

        let physical = Physical::new(&tmp).unwrap();
        assert_eq!(physical.len(), 4);
        assert_eq!(physical.data(), &[0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(physical.data_slice(1, 2).unwrap(), &[0xBB, 0xCC]);
        assert!(physical.data_slice(3, 2).is_err());

        fs::remove_file(&tmp).unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = Physical::new("/nonexistent/sigscope/database.esl");
        assert!(matches!(result, Err(crate::Error::FileError(_))));
    }

    fn tempfile_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("{}_{}", name, std::process::id()));
        path
    }
}
