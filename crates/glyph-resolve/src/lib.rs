//! The Resolver (§4.2): types, identifiers, expressions, property/element
//! access, and prototype monomorphization.

mod class;
mod expression;
mod function;
mod identifier;
mod types;

pub use expression::Resolved;

use glyph_common::{Atom, Diagnostic, DiagnosticSink, ElementId, Interner, Span};
use glyph_flow::FlowTracker;
use glyph_graph::ElementGraph;
use glyph_types::TypeId;
use glyph_types::TypeTable;
use rustc_hash::FxHashMap;

/// Ambient state threaded through a single resolution call: the enclosing
/// source, the contextual type-argument map built from enclosing class/
/// function generics, and the enclosing function/enum/flow, when present
/// (§4.2.2, §4.2.6 "contextual type arguments").
pub struct ResolveContext<'ctx> {
    pub source_path: &'ctx str,
    pub contextual_type_arguments: &'ctx FxHashMap<String, TypeId>,
    pub contextual_function: Option<ElementId>,
    pub contextual_enum: Option<ElementId>,
    pub flow: Option<glyph_common::FlowNodeId>,
}

impl<'ctx> ResolveContext<'ctx> {
    pub fn new(source_path: &'ctx str, contextual_type_arguments: &'ctx FxHashMap<String, TypeId>) -> Self {
        Self { source_path, contextual_type_arguments, contextual_function: None, contextual_enum: None, flow: None }
    }

    pub fn with_function(mut self, function: ElementId, flow: glyph_common::FlowNodeId) -> Self {
        self.contextual_function = Some(function);
        self.flow = Some(flow);
        self
    }

    pub fn with_enum(mut self, en: ElementId) -> Self {
        self.contextual_enum = Some(en);
        self
    }
}

/// The resolver itself: borrows every other component for the duration of a
/// resolution pass. Owns nothing; `Program` is the aggregate that owns the
/// graph, type table, and flow tracker across the whole run (§5).
pub struct Resolver<'a> {
    pub(crate) graph: &'a mut ElementGraph,
    pub(crate) types: &'a mut TypeTable,
    pub(crate) flow: &'a mut FlowTracker,
    pub(crate) interner: &'a Interner,
    pub(crate) sink: &'a mut dyn DiagnosticSink,
}

impl<'a> Resolver<'a> {
    pub fn new(
        graph: &'a mut ElementGraph,
        types: &'a mut TypeTable,
        flow: &'a mut FlowTracker,
        interner: &'a Interner,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self { graph, types, flow, interner, sink }
    }

    pub(crate) fn resolve_atom(&self, atom: Atom) -> String {
        self.interner.resolve(atom).to_string()
    }

    pub(crate) fn report(&mut self, span: Span, code: &'static str, message: impl Into<String>) {
        self.sink.report(Diagnostic::error(span, code, message));
    }
}
