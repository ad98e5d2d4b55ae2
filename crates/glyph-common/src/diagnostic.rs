//! Diagnostic sink: the boundary the core reports user-facing errors across.

use crate::span::Span;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Error,
    Warning,
}

/// Stable error codes, one per distinct message template named in §6.2.
pub mod codes {
    pub const DUPLICATE_IDENTIFIER: &str = "duplicate_identifier";
    pub const CANNOT_FIND_NAME: &str = "cannot_find_name";
    pub const NO_EXPORTED_MEMBER: &str = "no_exported_member";
    pub const EXPORT_CONFLICTS: &str = "export_conflicts";
    pub const EXTENDS_NON_CLASS: &str = "extends_non_class";
    pub const SEALED_CLASS_EXTENDED: &str = "sealed_class_extended";
    pub const UNMANAGED_IMPLEMENTS_INTERFACE: &str = "unmanaged_implements_interface";
    pub const UNMANAGED_MANAGED_MIX: &str = "unmanaged_managed_mix";
    pub const PROPERTY_NOT_FOUND: &str = "property_not_found";
    pub const INDEX_SIGNATURE_MISSING: &str = "index_signature_missing";
    pub const DUPLICATE_CONSTRUCTOR: &str = "duplicate_constructor";
    pub const DUPLICATE_FUNCTION_IMPLEMENTATION: &str = "duplicate_function_implementation";
    pub const INVALID_DECORATOR: &str = "invalid_decorator";
    pub const DUPLICATE_DECORATOR: &str = "duplicate_decorator";
    pub const OPERATION_NOT_SUPPORTED: &str = "operation_not_supported";
    pub const ARGUMENT_COUNT_MISMATCH: &str = "argument_count_mismatch";
    pub const STRING_LITERAL_EXPECTED: &str = "string_literal_expected";
    pub const NOT_CALLABLE: &str = "not_callable";
    pub const THIS_NOT_ALLOWED: &str = "this_not_allowed";
    pub const MERGED_DECLARATION_EXPORT_MISMATCH: &str = "merged_declaration_export_mismatch";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRelatedInformation {
    pub span: Span,
    pub message: String,
}

/// A single user-facing finding: a category, a stable code, a rendered message, and
/// the span it points at. Construction is infallible and cheap; `Program` decides
/// whether to report it (bounded by `max_diagnostics`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: &'static str,
    pub span: Span,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub related: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    pub fn error(span: Span, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            span,
            message: message.into(),
            related: Vec::new(),
        }
    }

    pub fn warning(span: Span, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            code,
            span,
            message: message.into(),
            related: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related.push(DiagnosticRelatedInformation { span, message: message.into() });
        self
    }
}

/// A collector for diagnostics raised during initialization and resolution.
///
/// Mirrors the external "sink accepting `(code, range, ...messageArgs)` emissions"
/// contract: the core never owns where diagnostics end up, it only reports them.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);

    fn has_errors(&self) -> bool;
}

/// The default in-memory sink: just a growable list, capped at `max_diagnostics`.
#[derive(Debug, Default)]
pub struct VecSink {
    diagnostics: Vec<Diagnostic>,
    max_diagnostics: usize,
    error_count: usize,
}

impl VecSink {
    pub fn new(max_diagnostics: usize) -> Self {
        Self { diagnostics: Vec::new(), max_diagnostics, error_count: 0 }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for VecSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.category == DiagnosticCategory::Error {
            self.error_count += 1;
        }
        if self.max_diagnostics == 0 || self.diagnostics.len() < self.max_diagnostics {
            self.diagnostics.push(diagnostic);
        }
    }

    fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_caps_stored_diagnostics_but_keeps_counting_errors() {
        let mut sink = VecSink::new(1);
        sink.report(Diagnostic::error(Span::dummy(), codes::CANNOT_FIND_NAME, "a"));
        sink.report(Diagnostic::error(Span::dummy(), codes::CANNOT_FIND_NAME, "b"));
        assert_eq!(sink.diagnostics().len(), 1);
        assert!(sink.has_errors());
    }
}
