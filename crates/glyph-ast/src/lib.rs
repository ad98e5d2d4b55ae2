//! Plain data AST consumed by the semantic-analysis core.
//!
//! This is a contract, not a parser: it exists so the Initializer and Resolver
//! have concrete node shapes to traverse and so tests can hand-build fixtures
//! without a real lexer. Every node carries a [`glyph_common::Span`] for
//! diagnostics; nodes are otherwise plain, cheaply-cloned data (no cycles, no
//! back-references — those live in the element graph, not the AST).

pub mod decl;
pub mod expr;
pub mod source;
pub mod ty;

pub use decl::*;
pub use expr::*;
pub use source::*;
pub use ty::*;
