//! # sigscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types
//! of the library. Import it to get quick access to everything needed for
//! walking a signature database.
//!
//! ```rust,no_run
//! use sigscope::prelude::*;
//!
//! let db = SignatureDatabase::from_mem(std::fs::read("db.esl")?)?;
//! for list in db.lists()? {
//!     let list = list?;
//!     println!("{}: {} entries", list.signature_type(), list.signature_count());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// The main error type for all sigscope operations
pub use crate::Error;

/// The result type used throughout sigscope
pub use crate::Result;

/// Main entry point for signature database decoding
pub use crate::SignatureDatabase;

/// Low-level input and parsing utilities
pub use crate::{File, Parser};

/// Iterators and borrowed views over lists and entries
pub use crate::database::{EntryIter, ListIter, SignatureEntry, SignatureList};

/// Signature type classification
pub use crate::database::SignatureKind;

/// Advisory findings recorded while decoding
pub use crate::database::{Category, Diagnostic, Diagnostics, Severity};

/// Format constants for the fixed header and entry layout
pub use crate::database::{LIST_HEADER_SIZE, MIN_DATABASE_SIZE, OWNER_SIZE};
