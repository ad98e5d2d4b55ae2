//! The Initializer (§4.1): one pass over a program's sources that populates
//! an [`glyph_graph::ElementGraph`] with every declared prototype, plus a
//! drain phase that resolves forward references (imports, re-exports,
//! `extends`/`implements`).

pub mod initializer;
pub mod queue;

pub use initializer::Initializer;
pub use queue::{QueuedExport, QueuedExtend, QueuedImport};
