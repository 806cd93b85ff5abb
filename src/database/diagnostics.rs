//! Advisory diagnostics collected while decoding a signature database.
//!
//! Structural violations stop iteration with a hard [`crate::Error`], but the
//! decoder also notices conditions that are suspicious without being fatal -
//! most prominently X.509 entries whose DER length disagrees with the space
//! the list reserves for them. Those observations land here instead of
//! aborting the walk, mirroring how firmware itself tolerates such databases.
//!
//! [`Diagnostics`] is an append-only, lock-free collection so a decoder can
//! record findings through a shared reference while iterators borrow the
//! underlying buffer.

use std::fmt;

/// Severity of a decoding diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
pub enum Severity {
    /// Informational observation, no action needed.
    Info,
    /// Suspicious but tolerated, e.g. a certificate length mismatch.
    Warning,
    /// A problem that also surfaced as a hard error.
    Error,
}

/// Subsystem a diagnostic originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Category {
    /// Signature list header handling.
    List,
    /// X.509 certificate payload checks.
    Certificate,
    /// Anything else.
    General,
}

/// A single decoding observation.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// How serious the observation is.
    pub severity: Severity,
    /// Which subsystem raised it.
    pub category: Category,
    /// Human-readable description.
    pub message: String,
    /// Byte offset into the database, when one is known.
    pub offset: Option<u64>,
    /// One-based entry counter at the time of the observation, when iterating.
    pub entry: Option<usize>,
}

impl Diagnostic {
    /// Create a new diagnostic with the given severity, category and message.
    pub fn new(severity: Severity, category: Category, message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            severity,
            category,
            message: message.into(),
            offset: None,
            entry: None,
        }
    }

    /// Attach the byte offset the observation refers to.
    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Diagnostic {
        self.offset = Some(offset);
        self
    }

    /// Attach the running entry counter the observation refers to.
    #[must_use]
    pub fn with_entry(mut self, entry: usize) -> Diagnostic {
        self.entry = Some(entry);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;
        if let Some(offset) = self.offset {
            write!(f, " (offset {offset:#x})")?;
        }
        if let Some(entry) = self.entry {
            write!(f, " (entry {entry})")?;
        }
        Ok(())
    }
}

/// Append-only collection of decoding diagnostics.
///
/// Backed by a lock-free vector, so diagnostics can be recorded through a
/// shared reference. Entries are kept in insertion order.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Diagnostics {
        Diagnostics {
            entries: boxcar::Vec::new(),
        }
    }

    /// Record a pre-built diagnostic.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Record an informational observation.
    pub fn info(&self, category: Category, message: impl Into<String>) {
        self.push(Diagnostic::new(Severity::Info, category, message));
    }

    /// Record a warning.
    pub fn warning(&self, category: Category, message: impl Into<String>) {
        self.push(Diagnostic::new(Severity::Warning, category, message));
    }

    /// Record an error-level observation.
    pub fn error(&self, category: Category, message: impl Into<String>) {
        self.push(Diagnostic::new(Severity::Error, category, message));
    }

    /// Number of recorded diagnostics.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns `true` if any diagnostic of at least the given severity exists.
    #[must_use]
    pub fn has_severity(&self, severity: Severity) -> bool {
        self.iter().any(|d| d.severity >= severity)
    }

    /// Returns `true` if any warnings (or worse) were recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.has_severity(Severity::Warning)
    }

    /// Iterate over the recorded diagnostics in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, diagnostic)| diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_in_order() {
        let diagnostics = Diagnostics::new();
        diagnostics.info(Category::General, "first");
        diagnostics.warning(Category::Certificate, "second");

        assert_eq!(diagnostics.count(), 2);
        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, ["first", "second"]);
    }

    #[test]
    fn severity_queries() {
        let diagnostics = Diagnostics::new();
        assert!(!diagnostics.has_warnings());

        diagnostics.info(Category::List, "fine");
        assert!(!diagnostics.has_warnings());

        diagnostics.warning(Category::Certificate, "suspicious");
        assert!(diagnostics.has_warnings());
        assert!(!diagnostics.has_severity(Severity::Error));
    }

    #[test]
    fn display_includes_context() {
        let diagnostic = Diagnostic::new(Severity::Warning, Category::Certificate, "length mismatch")
            .with_offset(0x2C)
            .with_entry(3);
        let rendered = diagnostic.to_string();
        assert!(rendered.contains("Warning"));
        assert!(rendered.contains("Certificate"));
        assert!(rendered.contains("0x2c"));
        assert!(rendered.contains("entry 3"));
    }
}
