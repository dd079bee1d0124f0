//! Diagnostic Infrastructure
//!
//! Collecting and formatting errors produced while loading source files.
//! Diagnostics carry a [`Span`] rather than raw line numbers; formatting
//! resolves line/column lazily against the source text.
//!
//! - `Diagnostic` - a single message with location and severity
//! - `DiagnosticBag` - the collection a parse pass accumulates into
//! - `Severity` - error or warning

use crate::span::{Span, line_col};
use std::fmt;

/// The severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single diagnostic message with source location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub span: Span,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    /// Format as `file:line:col: severity: message`.
    pub fn format(&self, file_name: &str, source: &str) -> String {
        let (line, col) = line_col(source, self.span.start);
        format!(
            "{}:{}:{}: {}: {}",
            file_name, line, col, self.severity, self.message
        )
    }
}

/// A collection of diagnostics for one parse pass.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, span: Span, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            span,
            message: message.into(),
            severity: Severity::Error,
        });
    }

    pub fn warning(&mut self, span: Span, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            span,
            message: message.into(),
            severity: Severity::Warning,
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Format every diagnostic, one per line, against the given source.
    pub fn format_all(&self, file_name: &str, source: &str) -> String {
        self.diagnostics
            .iter()
            .map(|d| d.format(file_name, source))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bag_tracks_error_presence() {
        let mut bag = DiagnosticBag::new();
        assert!(!bag.has_errors());
        bag.warning(Span::new(0, 1), "odd but fine");
        assert!(!bag.has_errors());
        bag.error(Span::new(2, 3), "broken");
        assert!(bag.has_errors());
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn format_resolves_line_and_column() {
        let source = "class A {\n  !\n}";
        let mut bag = DiagnosticBag::new();
        bag.error(Span::new(12, 13), "unexpected token");
        let rendered = bag.format_all("a.ts", source);
        assert_eq!(rendered, "a.ts:2:3: error: unexpected token");
    }
}
