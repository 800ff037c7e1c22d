//! Collection of the diagnostics produced while decoding.
//!
//! Decoding problems contained to a single file (unknown encodings,
//! suspicious lengths, skipped files) never abort a volume read. They are
//! recorded here so that callers can present them, and are emitted as
//! `tracing` events at the same time.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// The severity of a diagnostic.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum Severity {
    /// Informative, nothing was lost.
    Info,
    /// Something unexpected was found and worked around.
    Warning,
    /// A file or part of a file could not be used.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// A single diagnostic message.
#[derive(Debug, PartialEq, Clone)]
pub struct Diagnostic {
    /// How serious the issue is.
    pub severity: Severity,
    /// The file that the message concerns, if any.
    pub path: Option<PathBuf>,
    /// Human readable description.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "[{}] {}: {}", self.severity, path.display(), self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// An ordered sink of diagnostics.
///
/// A sink may be bound to a file path, in which case every message
/// recorded through it refers to that file.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct Diagnostics {
    path: Option<PathBuf>,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty sink, not bound to any file.
    pub fn new() -> Self {
        Diagnostics::default()
    }

    /// Create an empty sink for messages about the given file.
    pub fn for_file<P: AsRef<Path>>(path: P) -> Self {
        Diagnostics {
            path: Some(path.as_ref().to_path_buf()),
            entries: Vec::new(),
        }
    }

    /// Record a message with the given severity.
    pub fn push<M: Into<String>>(&mut self, severity: Severity, message: M) {
        let message = message.into();
        let path = self.path.as_ref().map(|p| p.display());
        match (severity, path) {
            (Severity::Info, Some(path)) => info!(file = %path, "{}", message),
            (Severity::Info, None) => info!("{}", message),
            (Severity::Warning, Some(path)) => warn!(file = %path, "{}", message),
            (Severity::Warning, None) => warn!("{}", message),
            (Severity::Error, Some(path)) => error!(file = %path, "{}", message),
            (Severity::Error, None) => error!("{}", message),
        }
        self.entries.push(Diagnostic {
            severity,
            path: self.path.clone(),
            message,
        });
    }

    /// Record an informative message.
    pub fn info<M: Into<String>>(&mut self, message: M) {
        self.push(Severity::Info, message)
    }

    /// Record a warning.
    pub fn warning<M: Into<String>>(&mut self, message: M) {
        self.push(Severity::Warning, message)
    }

    /// Record an error.
    pub fn error<M: Into<String>>(&mut self, message: M) {
        self.push(Severity::Error, message)
    }

    /// Move all messages of `other` to the end of this sink.
    pub fn append(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Iterate over the messages as `(severity, message)` pairs.
    pub fn messages(&self) -> impl Iterator<Item = (Severity, &str)> {
        self.entries.iter().map(|d| (d.severity, d.message.as_str()))
    }

    /// Whether any message has at least the given severity.
    pub fn has_severity(&self, severity: Severity) -> bool {
        self.entries.iter().any(|d| d.severity >= severity)
    }

    /// Obtain an iterator to the recorded diagnostics.
    pub fn iter(&self) -> ::std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Whether no message was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The number of recorded messages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = ::std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = ::std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
