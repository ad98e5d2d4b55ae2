//! The Program aggregate (§2, §5, §6.3): the single long-lived owner tying
//! the type table, element graph, initializer, resolver, and flow tracker
//! together into one runnable core.

pub mod options;
pub mod overload;
pub mod program;

pub use options::ProgramOptions;
pub use overload::{is_assignable_to, lookup_overload};
pub use program::Program;

pub use glyph_resolve::{ResolveContext, Resolved};
