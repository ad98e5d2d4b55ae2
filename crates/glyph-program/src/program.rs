//! The `Program` aggregate (§5, §6.3): the single long-lived owner of the
//! graph, type table, and flow tracker across a run. Every other crate's
//! pieces borrow from here for the duration of a single call; nothing below
//! `Program` keeps its own copy of shared state.

use crate::options::ProgramOptions;
use crate::overload;
use glyph_ast::{Expr, SourceFile, TypeNode};
use glyph_common::{CommonFlags, ElementId, FlowNodeId, Interner, Span, VecSink};
use glyph_flow::{FlowTracker, NativeType};
use glyph_graph::{Element, ElementGraph, ElementHeader, LocalElement, OperatorKind};
use glyph_init::Initializer;
use glyph_resolve::{ResolveContext, Resolved, Resolver};
use glyph_types::{TypeId, TypeTable};
use rustc_hash::FxHashMap;

/// Owns every sub-component for one compilation run (§2, §5 "single Program
/// instance is the unit of isolation").
pub struct Program {
    pub graph: ElementGraph,
    pub types: TypeTable,
    pub flow: FlowTracker,
    pub interner: Interner,
    pub sink: VecSink,
    options: ProgramOptions,
}

impl Program {
    pub fn new(options: ProgramOptions) -> Self {
        let types = TypeTable::new(options.isize_type, options.usize_type);
        Self {
            graph: ElementGraph::new(),
            types,
            flow: FlowTracker::new(),
            interner: Interner::new(),
            sink: VecSink::new(options.max_diagnostics),
            options,
        }
    }

    pub fn options(&self) -> &ProgramOptions {
        &self.options
    }

    /// `Program.initialize(options)` (§6.3): runs the Initializer's full pass
    /// plus drain phase over `sources`, then completes the one step the
    /// Initializer explicitly defers — resolving the well-known `String`
    /// prototype into a concrete instance and registering it on the type
    /// table, which requires a component downstream of both the graph and
    /// the type table simultaneously.
    pub fn initialize(&mut self, sources: &[SourceFile]) {
        let span = tracing::info_span!("program.initialize", sources = sources.len());
        let _enter = span.enter();

        let mut initializer =
            Initializer::new(&mut self.graph, &self.interner, &mut self.sink, self.options.global_aliases.clone());
        initializer.run(sources);

        self.register_well_known_string();
    }

    fn register_well_known_string(&mut self) {
        let Some(string_prototype) = self.graph.well_known.string else {
            tracing::debug!("no ~lib/string String prototype found; skipping well-known registration");
            return;
        };
        let display_name = self.graph.get(string_prototype).header().map(|h| h.internal_name.clone()).unwrap_or_default();
        let empty = FxHashMap::default();
        let class_id = {
            let mut resolver = self.resolver();
            resolver.resolve_class(string_prototype, &[], &empty, Span::dummy())
        };
        if let Some(class_id) = class_id {
            self.types.register_string_class(class_id, display_name);
        } else {
            tracing::debug!("String prototype found but failed to resolve; leaving `string` type unregistered");
        }
    }

    /// Borrows every component a `Resolver` needs for the duration of one call.
    fn resolver(&mut self) -> Resolver<'_> {
        Resolver::new(&mut self.graph, &mut self.types, &mut self.flow, &self.interner, &mut self.sink)
    }

    /// `Program.resolveType(node, ctx?) → Type?`.
    pub fn resolve_type(&mut self, node: &TypeNode, ctx: &ResolveContext, report_not_found: bool) -> Option<TypeId> {
        self.resolver().resolve_type(node, ctx, report_not_found)
    }

    /// `Program.resolveExpression(expr, fn) → Element?`; the
    /// `resolvedThisExpression`/`resolvedElementExpression` out-parameters
    /// live on the returned `Resolved` record (see `glyph-resolve`'s
    /// `DESIGN.md` entry for why this crate keeps them explicit rather than
    /// threading mutable scratch state).
    pub fn resolve_expression(&mut self, expr: &Expr, ctx: &ResolveContext) -> Option<Resolved> {
        self.resolver().resolve_expression(expr, ctx)
    }

    /// `ClassPrototype.resolve`/`resolveUsingTypeArguments`.
    pub fn resolve_class(
        &mut self,
        prototype_id: ElementId,
        type_arguments: &[TypeId],
        contextual_type_arguments: &FxHashMap<String, TypeId>,
        span: Span,
    ) -> Option<ElementId> {
        self.resolver().resolve_class(prototype_id, type_arguments, contextual_type_arguments, span)
    }

    /// `FunctionPrototype.resolve`/`resolveUsingTypeArguments`.
    pub fn resolve_function(
        &mut self,
        prototype_id: ElementId,
        function_type_arguments: &[TypeId],
        contextual_type_arguments: &FxHashMap<String, TypeId>,
        owning_instance: Option<ElementId>,
        span: Span,
    ) -> Option<ElementId> {
        self.resolver().resolve_function(prototype_id, function_type_arguments, contextual_type_arguments, owning_instance, span)
    }

    /// `Class.lookupOverload(k)` (P7).
    pub fn lookup_overload(&self, class_id: ElementId, kind: OperatorKind) -> Option<ElementId> {
        overload::lookup_overload(&self.graph, class_id, kind)
    }

    /// `Class.isAssignableTo(other)`.
    pub fn is_assignable_to(&self, from: TypeId, to: TypeId) -> bool {
        overload::is_assignable_to(&self.graph, &self.types, from, to)
    }

    /// `Function.addLocal(name, type)`: appends a new, non-recyclable Local
    /// to `function`'s locals, at the next free slot.
    pub fn add_local(&mut self, function: ElementId, simple_name: impl Into<String>, ty: TypeId) -> ElementId {
        let simple_name = simple_name.into();
        let f = self.graph.get(function).as_function().expect("add_local called on a non-Function element");
        let internal_name = glyph_graph::names::nested_in_function(&f.header.internal_name, &simple_name);
        let span = f.header.span;
        let slot = f.locals.len() as u32;

        let header = ElementHeader::new(internal_name, simple_name, span);
        let local_id = self.graph.arena.insert(Element::Local(LocalElement { header, ty, slot }));
        if let Element::Function(f) = self.graph.get_mut(function) {
            f.locals.push(local_id);
        }
        local_id
    }

    /// `Function.getTempLocal(type)`: recycles a free temp of the matching
    /// native type, or allocates a fresh one (§4.3 "four free-lists").
    pub fn get_temp_local(&mut self, function: ElementId, native_type: NativeType, ty: TypeId) -> ElementId {
        if let Some(existing) = self.flow.get_temp_local(function, native_type) {
            return existing;
        }
        self.add_local(function, "temp", ty)
    }

    /// `Function.freeTempLocal(local)`: returns `local` to its native-type
    /// free-list. Callers must not pass an `INLINED` local (§4.3 "Inlined
    /// locals are not recycled").
    pub fn free_temp_local(&mut self, function: ElementId, native_type: NativeType, local: ElementId) {
        self.flow.free_temp_local(function, native_type, local);
    }

    /// `Function.enterBreakContext()`: opens a scope whose break and
    /// continue labels share one freshly allocated id (§9 "labels are
    /// decimal strings of the IDs").
    pub fn enter_break_context(&mut self, function: ElementId, parent_flow: FlowNodeId) -> FlowNodeId {
        let label = self.flow.next_label(function);
        let child = self.flow.enter_branch_or_scope(parent_flow);
        let node = self.flow.get_mut(child);
        node.break_label = Some(label);
        node.continue_label = Some(label);
        child
    }

    /// `Function.leaveBreakContext()`: mirrors `leaveBranchOrScope`, folding
    /// the loop body's flow facts into its parent.
    pub fn leave_break_context(&mut self, flow: FlowNodeId) -> Result<FlowNodeId, glyph_common::InternalError> {
        self.flow.leave_branch_or_scope(flow)
    }

    /// `Function.finalize()`: marks a function as fully resolved. There is no
    /// emitter in this repository to hand the function off to (§1
    /// non-goals); this only flips the `COMPILED` bookkeeping flag an emitter
    /// would otherwise gate on.
    pub fn finalize_function(&mut self, function: ElementId) {
        if let Element::Function(f) = self.graph.get_mut(function) {
            f.header.flags |= CommonFlags::COMPILED;
        }
    }

    pub fn has_errors(&self) -> bool {
        self.sink.has_errors()
    }
}
