//! Outer walk over the `EFI_SIGNATURE_LIST` sequence of a database.
//!
//! A signature database is a packed run of variable-sized lists, each opened
//! by a 28-byte fixed header: a 16-byte type GUID followed by three
//! little-endian `u32` fields (`SignatureListSize`, `SignatureHeaderSize`,
//! `SignatureSize`). [`ListIter`] decodes one header per step, validates its
//! size fields against the bytes actually present, and yields a borrowed
//! [`SignatureList`] view. Nothing past the current list is touched, so a
//! malformed tail only surfaces when the walk reaches it.
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use sigscope::SignatureDatabase;
//!
//! let db = SignatureDatabase::from_file("db.esl".as_ref())?;
//! for list in db.lists()? {
//!     let list = list?;
//!     println!("{}: {} entries", list.signature_type(), list.signature_count());
//! }
//! # Ok::<(), sigscope::Error>(())
//! ```

use uguid::Guid;

use crate::{file::parser::Parser, Error, Result};

/// Size of the fixed `EFI_SIGNATURE_LIST` header in bytes.
pub const LIST_HEADER_SIZE: usize = 28;

/// Size of the `SignatureOwner` GUID that opens every entry.
pub const OWNER_SIZE: usize = 16;

/// Smallest buffer that can hold any useful content: one list header plus
/// one owner GUID.
pub const MIN_DATABASE_SIZE: usize = LIST_HEADER_SIZE + OWNER_SIZE;

/// A decoded view of a single `EFI_SIGNATURE_LIST`.
///
/// Borrowed from the database buffer; holds the header fields by value and
/// the entries region (everything after the header and the optional
/// list-specific header blob) as a slice.
#[derive(Debug, Clone, Copy)]
pub struct SignatureList<'a> {
    signature_type: Guid,
    list_size: u32,
    header_size: u32,
    signature_size: u32,
    data: &'a [u8],
}

impl<'a> SignatureList<'a> {
    /// The GUID identifying what kind of signatures the list holds.
    #[must_use]
    pub fn signature_type(&self) -> Guid {
        self.signature_type
    }

    /// Total size of the list in bytes, header included.
    #[must_use]
    pub fn list_size(&self) -> u32 {
        self.list_size
    }

    /// Size of the list-specific header blob between the fixed header and
    /// the first entry. Zero for every signature type UEFI defines today.
    #[must_use]
    pub fn header_size(&self) -> u32 {
        self.header_size
    }

    /// Size of each entry record, owner GUID included.
    #[must_use]
    pub fn signature_size(&self) -> u32 {
        self.signature_size
    }

    /// The packed entry records, after the fixed header and header blob.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Number of whole entries the entries region holds.
    ///
    /// A region whose length is not a multiple of [`Self::signature_size`]
    /// still reports the whole-entry count here; entry iteration rejects
    /// such lists as malformed.
    #[must_use]
    pub fn signature_count(&self) -> usize {
        self.data.len() / self.signature_size as usize
    }
}

/// Position of the list most recently yielded by [`ListIter::advance`].
struct CurrentList {
    offset: usize,
    list_size: u32,
    header_size: u32,
    signature_size: u32,
    signature_type: Guid,
}

/// Lazy iterator over the signature lists of a database buffer.
///
/// Each call to [`ListIter::advance`] decodes and validates exactly one list
/// header. Iteration ends cleanly at the buffer end or at a 28-zero-byte
/// sentinel header; any header whose size fields contradict the remaining
/// buffer ends iteration with [`Error::Malformed`].
pub struct ListIter<'a> {
    data: &'a [u8],
    offset: usize,
    current: Option<CurrentList>,
    done: bool,
}

impl<'a> ListIter<'a> {
    /// Create a list iterator over a database buffer.
    ///
    /// # Errors
    /// Returns [`Error::BufferTooSmall`] if `data` cannot hold even one list
    /// header and one owner GUID ([`MIN_DATABASE_SIZE`] bytes).
    pub fn new(data: &'a [u8]) -> Result<ListIter<'a>> {
        if data.len() < MIN_DATABASE_SIZE {
            return Err(Error::BufferTooSmall {
                actual: data.len(),
                required: MIN_DATABASE_SIZE,
            });
        }

        Ok(ListIter {
            data,
            offset: 0,
            current: None,
            done: false,
        })
    }

    /// Decode the next signature list.
    ///
    /// Returns `Ok(Some(list))` with a borrowed view of the next list,
    /// `Ok(None)` once the buffer is exhausted or a sentinel header is
    /// reached, or an error. After `Ok(None)` or an error the iterator stays
    /// finished.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if a header's size fields contradict the
    /// bytes actually present.
    pub fn advance(&mut self) -> Result<Option<SignatureList<'a>>> {
        if self.done {
            return Ok(None);
        }

        match self.advance_inner() {
            Ok(Some(list)) => Ok(Some(list)),
            Ok(None) => {
                self.done = true;
                Ok(None)
            }
            Err(error) => {
                self.done = true;
                Err(error)
            }
        }
    }

    fn advance_inner(&mut self) -> Result<Option<SignatureList<'a>>> {
        // Step past the list yielded last time, re-checking its extent so a
        // buffer swapped out from under us cannot cause a bad offset.
        if let Some(current) = self.current.take() {
            let remaining = self.data.len() - current.offset;
            if current.list_size as usize > remaining {
                return Err(malformed_error!(
                    "signature list at offset {} claims {} bytes but only {} remain",
                    current.offset,
                    current.list_size,
                    remaining
                ));
            }
            self.offset = current.offset + current.list_size as usize;
        }

        if self.offset >= self.data.len() {
            return Ok(None);
        }

        let remaining = self.data.len() - self.offset;
        if remaining < LIST_HEADER_SIZE {
            return Err(malformed_error!(
                "{} trailing bytes at offset {} cannot hold a signature list header",
                remaining,
                self.offset
            ));
        }

        let header = &self.data[self.offset..self.offset + LIST_HEADER_SIZE];
        if header.iter().all(|&byte| byte == 0) {
            // All-zero header is the conventional terminator.
            return Ok(None);
        }

        let mut parser = Parser::new(header);
        let signature_type = parser.read_guid()?;
        let list_size = parser.read_le::<u32>()?;
        let header_size = parser.read_le::<u32>()?;
        let signature_size = parser.read_le::<u32>()?;

        if (list_size as usize) < LIST_HEADER_SIZE {
            return Err(malformed_error!(
                "signature list at offset {} claims {} bytes, less than its own header",
                self.offset,
                list_size
            ));
        }
        if list_size as usize > remaining {
            return Err(malformed_error!(
                "signature list at offset {} claims {} bytes but only {} remain",
                self.offset,
                list_size,
                remaining
            ));
        }
        if signature_size == 0 {
            return Err(malformed_error!(
                "signature list at offset {} declares zero-sized entries",
                self.offset
            ));
        }

        let Some(entries_start) = LIST_HEADER_SIZE.checked_add(header_size as usize) else {
            return Err(Error::OutOfBounds);
        };
        if entries_start > list_size as usize {
            return Err(malformed_error!(
                "signature list at offset {} has a {} byte header blob that exceeds its {} byte extent",
                self.offset,
                header_size,
                list_size
            ));
        }

        let list = &self.data[self.offset..self.offset + list_size as usize];
        let entries = &list[entries_start..];

        self.current = Some(CurrentList {
            offset: self.offset,
            list_size,
            header_size,
            signature_size,
            signature_type,
        });

        Ok(Some(SignatureList {
            signature_type,
            list_size,
            header_size,
            signature_size,
            data: entries,
        }))
    }

    /// `SignatureListSize` of the list most recently yielded.
    ///
    /// # Errors
    /// Returns [`Error::NoCurrentList`] before the first successful
    /// [`ListIter::advance`] or after iteration has finished.
    pub fn list_size(&self) -> Result<u32> {
        self.current
            .as_ref()
            .map(|current| current.list_size)
            .ok_or(Error::NoCurrentList)
    }

    /// `SignatureHeaderSize` of the list most recently yielded.
    ///
    /// # Errors
    /// Returns [`Error::NoCurrentList`] if no list is current.
    pub fn header_size(&self) -> Result<u32> {
        self.current
            .as_ref()
            .map(|current| current.header_size)
            .ok_or(Error::NoCurrentList)
    }

    /// `SignatureSize` of the list most recently yielded.
    ///
    /// # Errors
    /// Returns [`Error::NoCurrentList`] if no list is current.
    pub fn signature_size(&self) -> Result<u32> {
        self.current
            .as_ref()
            .map(|current| current.signature_size)
            .ok_or(Error::NoCurrentList)
    }

    /// Type GUID of the list most recently yielded.
    ///
    /// # Errors
    /// Returns [`Error::NoCurrentList`] if no list is current.
    pub fn signature_type(&self) -> Result<Guid> {
        self.current
            .as_ref()
            .map(|current| current.signature_type)
            .ok_or(Error::NoCurrentList)
    }

    /// Byte offset of the list most recently yielded, for diagnostics.
    pub(crate) fn current_offset(&self) -> Option<usize> {
        self.current.as_ref().map(|current| current.offset)
    }
}

impl<'a> Iterator for ListIter<'a> {
    type Item = Result<SignatureList<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::types::EFI_CERT_SHA256;

    fn encode_list(signature_type: Guid, header_blob: &[u8], signature_size: u32, entries: &[u8]) -> Vec<u8> {
        let list_size = (LIST_HEADER_SIZE + header_blob.len() + entries.len()) as u32;
        let mut out = Vec::new();
        out.extend_from_slice(&signature_type.to_bytes());
        out.extend_from_slice(&list_size.to_le_bytes());
        out.extend_from_slice(&(header_blob.len() as u32).to_le_bytes());
        out.extend_from_slice(&signature_size.to_le_bytes());
        out.extend_from_slice(header_blob);
        out.extend_from_slice(entries);
        out
    }

    fn sha256_entry(owner_byte: u8, payload_byte: u8) -> Vec<u8> {
        let mut entry = vec![owner_byte; OWNER_SIZE];
        entry.extend(std::iter::repeat(payload_byte).take(32));
        entry
    }

    #[test]
    fn rejects_short_buffer() {
        let data = [0_u8; MIN_DATABASE_SIZE - 1];
        assert!(matches!(
            ListIter::new(&data),
            Err(Error::BufferTooSmall { actual: 43, required: 44 })
        ));
    }

    #[test]
    fn walks_two_lists() {
        let mut db = encode_list(EFI_CERT_SHA256, &[], 48, &sha256_entry(0xAA, 0x11));
        db.extend(encode_list(EFI_CERT_SHA256, &[], 48, &sha256_entry(0xBB, 0x22)));

        let mut iter = ListIter::new(&db).unwrap();

        let first = iter.advance().unwrap().unwrap();
        assert_eq!(first.signature_type(), EFI_CERT_SHA256);
        assert_eq!(first.list_size(), 76);
        assert_eq!(first.signature_size(), 48);
        assert_eq!(first.signature_count(), 1);
        assert_eq!(first.data()[0], 0xAA);
        assert_eq!(iter.list_size().unwrap(), 76);

        let second = iter.advance().unwrap().unwrap();
        assert_eq!(second.data()[0], 0xBB);

        assert!(iter.advance().unwrap().is_none());
        // Finished iterators stay finished
        assert!(iter.advance().unwrap().is_none());
        assert!(matches!(iter.list_size(), Err(Error::NoCurrentList)));
    }

    #[test]
    fn accessors_require_an_advance() {
        let db = encode_list(EFI_CERT_SHA256, &[], 48, &sha256_entry(0x01, 0x02));
        let iter = ListIter::new(&db).unwrap();
        assert!(matches!(iter.list_size(), Err(Error::NoCurrentList)));
        assert!(matches!(iter.signature_type(), Err(Error::NoCurrentList)));
    }

    #[test]
    fn zero_sentinel_terminates() {
        let mut db = encode_list(EFI_CERT_SHA256, &[], 48, &sha256_entry(0x01, 0x02));
        db.extend([0_u8; LIST_HEADER_SIZE]);
        db.extend([0xFF_u8; 8]); // garbage past the sentinel is never read

        let mut iter = ListIter::new(&db).unwrap();
        assert!(iter.advance().unwrap().is_some());
        assert!(iter.advance().unwrap().is_none());
    }

    #[test]
    fn oversized_list_is_malformed() {
        let mut db = encode_list(EFI_CERT_SHA256, &[], 48, &sha256_entry(0x01, 0x02));
        // Inflate SignatureListSize past the buffer end
        db[16..20].copy_from_slice(&1000_u32.to_le_bytes());

        let mut iter = ListIter::new(&db).unwrap();
        assert!(matches!(iter.advance(), Err(Error::Malformed { .. })));
        // Errors are terminal
        assert!(iter.advance().unwrap().is_none());
    }

    #[test]
    fn undersized_list_is_malformed() {
        let mut db = encode_list(EFI_CERT_SHA256, &[], 48, &sha256_entry(0x01, 0x02));
        db[16..20].copy_from_slice(&12_u32.to_le_bytes());

        let mut iter = ListIter::new(&db).unwrap();
        assert!(matches!(iter.advance(), Err(Error::Malformed { .. })));
    }

    #[test]
    fn header_blob_exceeding_list_is_malformed() {
        let mut db = encode_list(EFI_CERT_SHA256, &[], 48, &sha256_entry(0x01, 0x02));
        db[20..24].copy_from_slice(&64_u32.to_le_bytes());

        let mut iter = ListIter::new(&db).unwrap();
        assert!(matches!(iter.advance(), Err(Error::Malformed { .. })));
    }

    #[test]
    fn trailing_garbage_is_malformed() {
        let mut db = encode_list(EFI_CERT_SHA256, &[], 48, &sha256_entry(0x01, 0x02));
        db.extend([0x5A_u8; 10]); // too short for a header, not a sentinel

        let mut iter = ListIter::new(&db).unwrap();
        assert!(iter.advance().unwrap().is_some());
        assert!(matches!(iter.advance(), Err(Error::Malformed { .. })));
    }

    #[test]
    fn header_blob_is_skipped() {
        let blob = [0xEE_u8; 12];
        let db = encode_list(EFI_CERT_SHA256, &blob, 48, &sha256_entry(0x0C, 0x0D));

        let mut iter = ListIter::new(&db).unwrap();
        let list = iter.advance().unwrap().unwrap();
        assert_eq!(list.header_size(), 12);
        assert_eq!(list.data().len(), 48);
        assert_eq!(list.data()[0], 0x0C);
    }

    #[test]
    fn iterator_adapter() {
        let mut db = encode_list(EFI_CERT_SHA256, &[], 48, &sha256_entry(0x01, 0x02));
        db.extend(encode_list(EFI_CERT_SHA256, &[], 48, &sha256_entry(0x03, 0x04)));

        let lists: Vec<_> = ListIter::new(&db).unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(lists.len(), 2);
    }
}
