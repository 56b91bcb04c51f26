//! Diagnostic accumulation for the emission pipeline.
//!
//! Emission work is short-circuited as soon as failure is already known, so
//! the accumulator caches an error flag to keep that check O(1).

use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;

/// A single diagnostic produced while emitting an artifact.
///
/// Unlike front-end diagnostics, emission diagnostics point at files rather
/// than source locations: the path names the artifact (or temp file) the
/// problem relates to, when one is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub kind: DiagnosticKind,
    /// The diagnostic message text.
    pub message: String,
    /// The file this diagnostic relates to, if any.
    pub path: Option<PathBuf>,
}

impl Diagnostic {
    /// Create an error diagnostic with no associated file.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Error,
            message: message.into(),
            path: None,
        }
    }

    /// Create an error diagnostic associated with a file.
    pub fn error_at(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Error,
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a warning diagnostic with no associated file.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Warning,
            message: message.into(),
            path: None,
        }
    }
}

/// The severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A failure that prevents a usable artifact from being produced.
    Error,
    /// A potential problem that does not invalidate the artifact.
    Warning,
    /// Additional context about the emission.
    Info,
}

/// An append-only collection of emission diagnostics.
///
/// `Diagnostics` accumulates every message produced while turning a compiled
/// result into a physical artifact. The emission manager consults
/// [`has_errors`](Diagnostics::has_errors) before touching any stream, and
/// again when deciding whether signing can proceed.
///
/// # Examples
///
/// ```
/// use peridot_core::{Diagnostic, Diagnostics};
///
/// let mut diagnostics = Diagnostics::new();
/// assert!(!diagnostics.has_errors());
///
/// diagnostics.add(Diagnostic::error("strong-name signing is not supported"));
/// assert!(diagnostics.has_errors());
/// assert_eq!(diagnostics.error_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Diagnostics {
    diagnostics: VecDeque<Diagnostic>,
    has_errors: bool,
}

impl Diagnostics {
    /// Creates a new, empty diagnostics collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a diagnostic to the collection.
    ///
    /// If the diagnostic is an error, the internal error flag is set so that
    /// later [`has_errors`](Diagnostics::has_errors) queries stay cheap.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        if diagnostic.kind == DiagnosticKind::Error {
            self.has_errors = true;
        }
        self.diagnostics.push_back(diagnostic);
    }

    /// Returns `true` if the collection contains any error diagnostics.
    ///
    /// This consults the cached flag rather than scanning the collection.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Returns `true` if the collection contains any warning diagnostics.
    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::Warning)
    }

    /// Returns `true` if the collection contains no diagnostics.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns the total number of diagnostics in the collection.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Removes all diagnostics and resets the error flag.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.has_errors = false;
    }

    /// Returns an iterator over all diagnostics, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Returns an iterator over only the error diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Error)
    }

    /// Returns an iterator over only the warning diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Warning)
    }

    /// Returns the number of error diagnostics in the collection.
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Writes all diagnostics to the provided writer, one per line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the writer fails.
    pub fn emit<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for diagnostic in &self.diagnostics {
            writeln!(writer, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Diagnostic {
    /// Formats a diagnostic as `path: kind: message`, or `kind: message`
    /// when no file is associated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind_str = match self.kind {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Info => "info",
        };

        if let Some(path) = &self.path {
            write!(f, "{}: {}: {}", path.display(), kind_str, self.message)
        } else {
            write!(f, "{}: {}", kind_str, self.message)
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_errors() {
        let diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        assert!(!diagnostics.has_errors());
        assert!(!diagnostics.has_warnings());
    }

    #[test]
    fn add_error_sets_flag() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add(Diagnostic::warning("unused output option"));
        assert!(!diagnostics.has_errors());

        diagnostics.add(Diagnostic::error("could not sign artifact"));
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.error_count(), 1);
    }

    #[test]
    fn clear_resets_flag() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add(Diagnostic::error("boom"));
        diagnostics.clear();
        assert!(diagnostics.is_empty());
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn display_with_path() {
        let diagnostic = Diagnostic::error_at("/tmp/out.dll", "access denied");
        assert_eq!(diagnostic.to_string(), "/tmp/out.dll: error: access denied");
    }

    #[test]
    fn display_without_path() {
        let diagnostic = Diagnostic::warning("artifact is unsigned");
        assert_eq!(diagnostic.to_string(), "warning: artifact is unsigned");
    }

    #[test]
    fn severity_iterators() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add(Diagnostic::error("first"));
        diagnostics.add(Diagnostic::warning("second"));
        diagnostics.add(Diagnostic::error("third"));

        let errors: Vec<_> = diagnostics.errors().map(|d| d.message.as_str()).collect();
        assert_eq!(errors, ["first", "third"]);
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[test]
    fn emit_writes_one_line_per_diagnostic() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add(Diagnostic::error("one"));
        diagnostics.add(Diagnostic::warning("two"));

        let mut out = Vec::new();
        diagnostics.emit(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "error: one\nwarning: two\n");
    }
}
