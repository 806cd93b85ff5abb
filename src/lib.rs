// Copyright 2025 The sigscope authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # sigscope
//!
//! A lazy, zero-copy decoder for UEFI Secure Boot signature databases.
//!
//! The Secure Boot variables `db`, `dbx`, `KEK` and `PK` all share one binary
//! container format: a packed sequence of `EFI_SIGNATURE_LIST` structures,
//! each holding equally-sized `EFI_SIGNATURE_DATA` records. `sigscope`
//! decodes that container from a file or an in-memory buffer without copying
//! payload bytes, validating every size field before trusting it - the input
//! comes from firmware and may be corrupted or hostile.
//!
//! ## Features
//!
//! - **Lazy iteration** - Lists and entries decode one step at a time; a
//!   malformed tail only surfaces when the walk reaches it
//! - **Zero-copy** - Entry payloads are borrowed slices of the input buffer
//! - **Bounds-checked** - Size fields are attacker-controlled and are
//!   validated against the real buffer before any read
//! - **Advisory certificate checks** - X.509 entries get their DER length
//!   cross-checked, with mismatches reported as warnings instead of errors
//! - **Memory-mapped input** - Files load through `mmap` so large revocation
//!   databases are paged in on demand
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sigscope::prelude::*;
//!
//! let db = SignatureDatabase::from_file("dbx.esl".as_ref())?;
//!
//! for entry in db.entries()? {
//!     let entry = entry?;
//!     println!("{} byte payload owned by {}", entry.data().len(), entry.owner());
//! }
//!
//! for finding in db.diagnostics().iter() {
//!     eprintln!("{finding}");
//! }
//! # Ok::<(), sigscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! Decoding is two nested state machines. [`database::ListIter`] walks the
//! outer sequence of list headers; [`database::EntryIter`] owns a `ListIter`
//! and flattens the lists into a single stream of entries. Both advance one
//! record per call and end either cleanly (`Ok(None)`) or with a hard
//! [`Error`] that describes the structural violation.

#[macro_use]
pub(crate) mod error;

pub mod database;
pub(crate) mod file;
pub mod prelude;

pub use database::SignatureDatabase;
pub use error::Error;
pub use file::{parser::Parser, File};

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
