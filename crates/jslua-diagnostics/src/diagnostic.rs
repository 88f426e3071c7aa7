//! Diagnostic values and their codes.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational; output is faithful
    Hint,
    /// Output was produced but some construct was degraded or dropped
    Warning,
    /// No usable output for this input
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Hint => "hint",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic codes, grouped by letter:
/// `P` parsing, `U` unsupported constructs, `S` partially emulated semantics,
/// `I` internal errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// Syntax error reported by the parser
    ParseError,

    /// Statement kind with no Lua lowering
    UnsupportedStatement,
    /// Expression kind with no Lua lowering
    UnsupportedExpression,
    /// Destructuring or other non-identifier binding pattern
    UnsupportedPattern,
    /// Object literal member that is not a plain key/value pair
    UnsupportedProperty,
    /// More than one catch clause on a single `try`
    MultipleCatchClauses,
    /// `continue` with no enclosing loop
    StrayContinue,

    /// `with` body names are not resolved through the scope object
    PartialWithScope,
    /// Direct `eval` cannot see the caller's locals
    DynamicEval,

    /// Broken invariant inside the translator
    InternalError,
}

impl DiagnosticCode {
    /// Every code, in explanation order.
    pub const ALL: &'static [DiagnosticCode] = &[
        Self::ParseError,
        Self::UnsupportedStatement,
        Self::UnsupportedExpression,
        Self::UnsupportedPattern,
        Self::UnsupportedProperty,
        Self::MultipleCatchClauses,
        Self::StrayContinue,
        Self::PartialWithScope,
        Self::DynamicEval,
        Self::InternalError,
    ];

    /// The stable code string, e.g. `"U002"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseError => "P001",

            Self::UnsupportedStatement => "U001",
            Self::UnsupportedExpression => "U002",
            Self::UnsupportedPattern => "U003",
            Self::UnsupportedProperty => "U004",
            Self::MultipleCatchClauses => "U005",
            Self::StrayContinue => "U006",

            Self::PartialWithScope => "S001",
            Self::DynamicEval => "S002",

            Self::InternalError => "I001",
        }
    }

    /// Look up a code by its string form, case-insensitively.
    pub fn from_code(code: &str) -> Option<DiagnosticCode> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            Self::ParseError | Self::InternalError => Severity::Error,

            Self::UnsupportedStatement
            | Self::UnsupportedExpression
            | Self::UnsupportedPattern
            | Self::UnsupportedProperty
            | Self::MultipleCatchClauses
            | Self::StrayContinue => Severity::Warning,

            Self::PartialWithScope | Self::DynamicEval => Severity::Hint,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported problem.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    /// One-line message
    pub message: String,
    /// Optional help line shown under the snippet
    pub help: Option<String>,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, Severity::Error, message)
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, Severity::Warning, message)
    }

    pub fn hint(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, Severity::Hint, message)
    }

    /// Start a diagnostic with the code's default severity.
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, code.default_severity(), message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    pub fn is_hint(&self) -> bool {
        self.severity == Severity::Hint
    }
}

/// Fluent builder returned by the [`Diagnostic`] constructors.
pub struct DiagnosticBuilder {
    inner: Diagnostic,
}

impl DiagnosticBuilder {
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            inner: Diagnostic {
                code,
                severity,
                message: message.into(),
                help: None,
                span: Span::DUMMY,
            },
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.inner.span = span;
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.help = Some(help.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        self.inner
    }
}

/// Ordered collection of diagnostics from one or more translation runs.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(diagnostics);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_warning()).count()
    }

    pub fn hint_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_hint()).count()
    }

    /// Whether any diagnostic carries `code`.
    pub fn contains(&self, code: DiagnosticCode) -> bool {
        self.items.iter().any(|d| d.code == code)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::FileId;

    #[test]
    fn test_codes_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for code in DiagnosticCode::ALL {
            assert!(seen.insert(code.as_str()), "duplicate code {}", code);
        }
    }

    #[test]
    fn test_from_code_ignores_case() {
        assert_eq!(
            DiagnosticCode::from_code("u005"),
            Some(DiagnosticCode::MultipleCatchClauses)
        );
        assert_eq!(DiagnosticCode::from_code("X999"), None);
    }

    #[test]
    fn test_builder_defaults() {
        let diag = Diagnostic::new(DiagnosticCode::UnsupportedExpression, "ClassExpression")
            .with_span(Span::new(FileId(0), 2, 9))
            .with_help("rewrite as a constructor function")
            .build();
        assert!(diag.is_warning());
        assert_eq!(diag.span.start, 2);
        assert_eq!(diag.help.as_deref(), Some("rewrite as a constructor function"));
    }

    #[test]
    fn test_counts() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::new(DiagnosticCode::ParseError, "unexpected token").build());
        diags.push(Diagnostic::new(DiagnosticCode::StrayContinue, "continue").build());
        diags.push(Diagnostic::new(DiagnosticCode::PartialWithScope, "with").build());
        assert!(diags.has_errors());
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.warning_count(), 1);
        assert_eq!(diags.hint_count(), 1);
        assert!(diags.contains(DiagnosticCode::StrayContinue));
        assert!(!diags.contains(DiagnosticCode::DynamicEval));
    }
}
