//! Shared foundations for the glyph semantic-analysis core.
//!
//! This crate sits at the base of the dependency chain:
//!
//! ```text
//! glyph-common (base layer)
//!   ↓
//! glyph-ast → glyph-types → glyph-graph → glyph-flow → glyph-init → glyph-resolve → glyph-program
//! ```
//!
//! No module here depends on anything above it. It provides:
//! - string interning (`Atom`, `Interner`)
//! - source spans (`Span`, `Spanned`)
//! - line/column lookup (`position`)
//! - diagnostics (`diagnostic`)
//! - program-wide options and limits

pub mod diagnostic;
pub mod flags;
pub mod handles;
pub mod interner;
pub mod limits;
pub mod position;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticCategory, DiagnosticSink, VecSink};
pub use flags::{CommonFlags, DecoratorFlags, DecoratorTarget};
pub use handles::{ElementId, FlowNodeId};
pub use interner::{Atom, Interner};
pub use position::{LineMap, Position};
pub use span::{Span, Spanned};

/// An internal error indicating a broken invariant rather than a user mistake.
///
/// Unlike `Diagnostic`, these are not meant to be shown to the end user in normal
/// operation; reaching one means the core's own bookkeeping is inconsistent.
#[derive(Debug, thiserror::Error)]
pub enum InternalError {
    #[error("type argument arity mismatch: expected {expected}, got {actual}")]
    TypeArgumentArityMismatch { expected: usize, actual: usize },

    #[error("attempted to resolve a prototype that was never inserted into the graph")]
    DanglingPrototype,

    #[error("flow scope was left without a matching enter")]
    UnbalancedFlowScope,

    #[error("{0}")]
    Other(String),
}
