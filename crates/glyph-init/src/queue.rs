//! Deferred work queued during the pass and resolved during the drain phase
//! (§4.1 steps 7-9).

use glyph_common::{ElementId, Span};

/// A forward-referencing import, resolved against `fileLevelExports` during
/// the drain phase. The `/index` equivalence rule (§6.3) is applied to
/// `import_path` at resolution time, not stored here.
#[derive(Clone, Debug)]
pub struct QueuedImport {
    pub importing_name: String,
    pub import_path: String,
    pub external_name: String,
    pub span: Span,
}

/// A forward-referencing export. `source_path` is set for re-exports
/// (`export { X } from "./other"`); `local_name` is set when the export
/// names a binding declared in this file that hadn't been seen yet when the
/// export statement was processed.
#[derive(Clone, Debug)]
pub struct QueuedExport {
    pub exporting_file: String,
    pub local_name: Option<String>,
    pub exported_name: String,
    pub external_name: String,
    pub source_path: Option<String>,
    pub span: Span,
    pub is_entry: bool,
}

/// A class/interface prototype whose `extends`/`implements` clauses must be
/// resolved once every prototype has been declared.
#[derive(Clone, Debug)]
pub struct QueuedExtend {
    pub derived: ElementId,
    pub path: String,
}
