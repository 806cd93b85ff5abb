//! Decoding of UEFI Secure Boot signature databases.
//!
//! The Secure Boot authorized (`db`), forbidden (`dbx`), key exchange (`KEK`)
//! and platform key (`PK`) variables all share one container format: a packed
//! sequence of `EFI_SIGNATURE_LIST` structures, each holding equally-sized
//! `EFI_SIGNATURE_DATA` records. This module decodes that container lazily
//! and without copying payload bytes.
//!
//! # Architecture
//!
//! Two nested state machines do the work:
//!
//! - [`ListIter`] walks list headers, validating every size field against the
//!   bytes actually present before exposing a [`SignatureList`] view
//! - [`EntryIter`] owns a `ListIter` and flattens the lists into a stream of
//!   [`SignatureEntry`] records, checking per list that the entries region
//!   divides evenly into records
//!
//! [`SignatureDatabase`] bundles a loaded buffer with a shared
//! [`Diagnostics`] collection and is the usual entry point. Advisory
//! findings (certificate length mismatches) go to diagnostics; structural
//! violations surface as [`crate::Error`] values from the iterators.
//!
//! # Examples
//!
//! ```rust,no_run
//! use sigscope::SignatureDatabase;
//!
//! let db = SignatureDatabase::from_file("dbx.esl".as_ref())?;
//! for entry in db.entries()? {
//!     let entry = entry?;
//!     println!("{} byte payload owned by {}", entry.data().len(), entry.owner());
//! }
//! for finding in db.diagnostics().iter() {
//!     eprintln!("{finding}");
//! }
//! # Ok::<(), sigscope::Error>(())
//! ```

mod asn1;
mod diagnostics;
mod entry;
mod list;
mod types;

pub use diagnostics::{Category, Diagnostic, Diagnostics, Severity};
pub use entry::{EntryIter, SignatureEntry};
pub use list::{ListIter, SignatureList, LIST_HEADER_SIZE, MIN_DATABASE_SIZE, OWNER_SIZE};
pub use types::{
    SignatureKind, EFI_CERT_RSA2048, EFI_CERT_RSA2048_SHA256, EFI_CERT_SHA1, EFI_CERT_SHA224,
    EFI_CERT_SHA256, EFI_CERT_SHA384, EFI_CERT_SHA512, EFI_CERT_X509, EFI_CERT_X509_SHA256,
    EFI_CERT_X509_SHA384, EFI_CERT_X509_SHA512,
};

use std::{path::Path, sync::Arc};

use crate::{file::File, Error, Result};

/// A loaded signature database ready for iteration.
///
/// Owns the raw bytes (directly or through a file mapping) and a shared
/// [`Diagnostics`] collection that every [`EntryIter`] created from it
/// records into.
pub struct SignatureDatabase {
    file: File,
    diagnostics: Arc<Diagnostics>,
}

impl SignatureDatabase {
    /// Load a signature database from a file on disk.
    ///
    /// # Arguments
    /// * `path` - Path of the database file, e.g. an `.esl` dump of `db` or `dbx`
    ///
    /// # Errors
    /// Returns [`Error::FileError`] if the file cannot be opened,
    /// [`Error::Empty`] for an empty file, or [`Error::BufferTooSmall`] if
    /// the contents cannot hold even one list header and one owner GUID.
    pub fn from_file(path: &Path) -> Result<SignatureDatabase> {
        Self::from_loaded(File::from_file(path)?)
    }

    /// Load a signature database from a buffer already in memory.
    ///
    /// The buffer must be the raw variable payload, without the 4-byte
    /// attribute prefix `efivarfs` prepends.
    ///
    /// # Errors
    /// Returns [`Error::Empty`] for an empty buffer or
    /// [`Error::BufferTooSmall`] if it cannot hold even one list header and
    /// one owner GUID.
    pub fn from_mem(data: Vec<u8>) -> Result<SignatureDatabase> {
        Self::from_loaded(File::from_mem(data)?)
    }

    fn from_loaded(file: File) -> Result<SignatureDatabase> {
        if file.len() < MIN_DATABASE_SIZE {
            return Err(Error::BufferTooSmall {
                actual: file.len(),
                required: MIN_DATABASE_SIZE,
            });
        }

        Ok(SignatureDatabase {
            file,
            diagnostics: Arc::new(Diagnostics::new()),
        })
    }

    /// The complete raw database contents.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.file.data()
    }

    /// Iterate over the signature lists of the database.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooSmall`] if the buffer is below the minimum
    /// decodable size.
    pub fn lists(&self) -> Result<ListIter<'_>> {
        ListIter::new(self.file.data())
    }

    /// Iterate over every signature entry of the database, across lists.
    ///
    /// Advisory findings made during iteration are recorded into this
    /// database's shared [`Diagnostics`] collection.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooSmall`] if the buffer is below the minimum
    /// decodable size.
    pub fn entries(&self) -> Result<EntryIter<'_>> {
        EntryIter::with_diagnostics(self.file.data(), Arc::clone(&self.diagnostics))
    }

    /// Advisory findings recorded by entry iterators created from this
    /// database.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_undersized_buffer() {
        let result = SignatureDatabase::from_mem(vec![0_u8; 20]);
        assert!(matches!(
            result,
            Err(Error::BufferTooSmall { actual: 20, required: 44 })
        ));
    }

    #[test]
    fn shares_diagnostics_across_iterations() {
        // X.509 list whose payload is not DER; warns once per entries() pass
        let mut db = Vec::new();
        db.extend_from_slice(&EFI_CERT_X509.to_bytes());
        db.extend_from_slice(&50_u32.to_le_bytes());
        db.extend_from_slice(&0_u32.to_le_bytes());
        db.extend_from_slice(&22_u32.to_le_bytes());
        db.extend_from_slice(&[0x01; 16]);
        db.extend_from_slice(&[0xAB; 6]);

        let database = SignatureDatabase::from_mem(db).unwrap();

        let mut entries = database.entries().unwrap();
        assert!(entries.advance().unwrap().is_some());
        assert_eq!(database.diagnostics().count(), 1);

        let mut entries = database.entries().unwrap();
        assert!(entries.advance().unwrap().is_some());
        assert_eq!(database.diagnostics().count(), 2);
    }
}
