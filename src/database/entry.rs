//! Inner walk over the individual `EFI_SIGNATURE_DATA` records of a database.
//!
//! [`EntryIter`] drives a [`ListIter`] internally and flattens the two-level
//! structure into a single stream of [`SignatureEntry`] values. When it
//! crosses into a new list it validates that the list's entries region
//! divides evenly into `SignatureSize` records; within a list, yielding an
//! entry is just pointer arithmetic over bytes already proven in bounds.
//!
//! X.509 certificate lists get one extra, advisory check: the DER SEQUENCE
//! length of the first entry is compared against the space the list reserves
//! per entry, and disagreements are recorded as [`Diagnostics`] warnings
//! without interrupting the walk.
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use sigscope::SignatureDatabase;
//!
//! let db = SignatureDatabase::from_file("db.esl".as_ref())?;
//! for entry in db.entries()? {
//!     let entry = entry?;
//!     println!("{} owned by {}", entry.data().len(), entry.owner());
//! }
//! # Ok::<(), sigscope::Error>(())
//! ```

use std::sync::Arc;

use uguid::Guid;

use crate::{
    database::{
        asn1::der_sequence_length,
        diagnostics::{Category, Diagnostic, Diagnostics, Severity},
        list::{ListIter, OWNER_SIZE},
        types::{SignatureKind, EFI_CERT_X509},
    },
    Result,
};

/// A decoded view of a single `EFI_SIGNATURE_DATA` record.
///
/// Borrowed from the database buffer. The payload excludes the leading
/// 16-byte `SignatureOwner` GUID.
#[derive(Debug, Clone, Copy)]
pub struct SignatureEntry<'a> {
    signature_type: Guid,
    owner: Guid,
    data: &'a [u8],
}

impl<'a> SignatureEntry<'a> {
    /// Type GUID of the list this entry came from.
    #[must_use]
    pub fn signature_type(&self) -> Guid {
        self.signature_type
    }

    /// Classification of the enclosing list, if its GUID is a known one.
    #[must_use]
    pub fn kind(&self) -> Option<SignatureKind> {
        SignatureKind::from_guid(&self.signature_type)
    }

    /// GUID of the agent that installed this entry.
    #[must_use]
    pub fn owner(&self) -> Guid {
        self.owner
    }

    /// The signature payload: a digest, modulus or DER certificate depending
    /// on the list type.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

/// Position within the entries region of the list currently being drained.
struct EntryCursor<'a> {
    signature_type: Guid,
    region: &'a [u8],
    signature_size: usize,
    count: usize,
    index: usize,
}

impl<'a> EntryCursor<'a> {
    fn entry_at(&self, index: usize) -> SignatureEntry<'a> {
        let start = index * self.signature_size;
        let record = &self.region[start..start + self.signature_size];

        let mut owner = [0_u8; OWNER_SIZE];
        owner.copy_from_slice(&record[..OWNER_SIZE]);

        SignatureEntry {
            signature_type: self.signature_type,
            owner: Guid::from_bytes(owner),
            data: &record[OWNER_SIZE..],
        }
    }
}

/// Lazy iterator over every signature entry of a database, across lists.
///
/// Owns its [`ListIter`] exclusively; the two state machines advance in
/// lockstep and cannot drift apart.
pub struct EntryIter<'a> {
    lists: ListIter<'a>,
    diagnostics: Arc<Diagnostics>,
    current: Option<EntryCursor<'a>>,
    line: usize,
}

impl<'a> EntryIter<'a> {
    /// Create an entry iterator over a database buffer.
    ///
    /// # Errors
    /// Returns [`crate::Error::BufferTooSmall`] if the buffer cannot hold
    /// one list header and one owner GUID.
    pub fn new(data: &'a [u8]) -> Result<EntryIter<'a>> {
        Self::with_diagnostics(data, Arc::new(Diagnostics::new()))
    }

    /// Create an entry iterator that records advisory findings into an
    /// existing [`Diagnostics`] collection.
    ///
    /// # Errors
    /// Returns [`crate::Error::BufferTooSmall`] if the buffer cannot hold
    /// one list header and one owner GUID.
    pub fn with_diagnostics(data: &'a [u8], diagnostics: Arc<Diagnostics>) -> Result<EntryIter<'a>> {
        Ok(EntryIter {
            lists: ListIter::new(data)?,
            diagnostics,
            current: None,
            line: 0,
        })
    }

    /// Decode the next signature entry.
    ///
    /// Returns `Ok(Some(entry))`, `Ok(None)` once every list is exhausted,
    /// or an error if the enclosing list is structurally broken. Lists that
    /// hold no entries are skipped transparently.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a list's entries region does
    /// not divide evenly into its declared `SignatureSize`, or if that size
    /// cannot even hold the owner GUID.
    pub fn advance(&mut self) -> Result<Option<SignatureEntry<'a>>> {
        self.line += 1;

        if let Some(cursor) = self.current.as_mut() {
            if cursor.index + 1 < cursor.count {
                cursor.index += 1;
                return Ok(Some(cursor.entry_at(cursor.index)));
            }
            self.current = None;
        }

        loop {
            let Some(list) = self.lists.advance()? else {
                return Ok(None);
            };

            let signature_size = list.signature_size() as usize;
            let region = list.data();

            if signature_size < OWNER_SIZE {
                return Err(malformed_error!(
                    "signature size {} cannot hold a {} byte owner identifier",
                    signature_size,
                    OWNER_SIZE
                ));
            }
            if region.len() % signature_size != 0 {
                return Err(malformed_error!(
                    "entries region of {} bytes does not divide into {} byte signatures",
                    region.len(),
                    signature_size
                ));
            }

            if list.signature_type() == EFI_CERT_X509 && !region.is_empty() {
                self.check_certificate_length(region, signature_size);
            }

            let count = region.len() / signature_size;
            if count == 0 {
                // Header-only list; nothing to yield, move on.
                continue;
            }

            let cursor = EntryCursor {
                signature_type: list.signature_type(),
                region,
                signature_size,
                count,
                index: 0,
            };
            let entry = cursor.entry_at(0);
            self.current = Some(cursor);
            return Ok(Some(entry));
        }
    }

    /// Compare the DER SEQUENCE length of the first certificate against the
    /// payload space the list reserves per entry. Advisory only.
    fn check_certificate_length(&self, region: &[u8], signature_size: usize) {
        let payload = &region[OWNER_SIZE..signature_size];
        let expected = signature_size - OWNER_SIZE;

        let diagnostic = |message: String| {
            let mut finding = Diagnostic::new(Severity::Warning, Category::Certificate, message)
                .with_entry(self.line);
            if let Some(offset) = self.lists.current_offset() {
                finding = finding.with_offset(offset as u64);
            }
            self.diagnostics.push(finding);
        };

        match der_sequence_length(payload, expected) {
            Some(measured) if measured == expected => {}
            Some(measured) => diagnostic(format!(
                "certificate claims {measured} bytes but the list reserves {expected} per entry"
            )),
            None => diagnostic(String::from(
                "certificate payload is not a well-formed DER sequence",
            )),
        }
    }

    /// Number of times [`EntryIter::advance`] has been called, usable as a
    /// one-based position for reporting.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line
    }

    /// The diagnostics collection this iterator records into.
    #[must_use]
    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }
}

impl<'a> Iterator for EntryIter<'a> {
    type Item = Result<SignatureEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().transpose()
    }
}
