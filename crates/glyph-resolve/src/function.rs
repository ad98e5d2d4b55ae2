//! `FunctionPrototype.resolve` (§4.2.7).

use crate::Resolver;
use glyph_common::{diagnostic::codes, CommonFlags, ElementId, FlowNodeId, Span};
use glyph_graph::{Element, ElementHeader, FunctionElement, LocalElement};
use glyph_types::{self as types, TypeId};
use rustc_hash::FxHashMap;

impl<'a> Resolver<'a> {
    /// Creates a fresh, never-cached `FunctionPrototype` that has the owning
    /// class's type arguments baked in but its own (method-level) type
    /// arguments still free. Each call to this produces a new element, so
    /// callers must only invoke it once per class instance being built
    /// (`ClassPrototype.resolve` never revisits a cached class instance).
    pub(crate) fn partial_resolve_method(&mut self, prototype_id: ElementId, class_type_arguments: &[TypeId]) -> ElementId {
        let source = self.graph.get(prototype_id).as_function_prototype().cloned().expect("partial-resolving a non-function prototype");
        let suffix = types::canonicalize_type_arguments(self.types, class_type_arguments);
        let mut header = source.header.clone();
        header.internal_name = glyph_graph::names::with_type_arguments(&header.internal_name, &suffix);
        let partial = glyph_graph::FunctionPrototypeElement {
            header,
            declaration: source.declaration,
            owning_class: source.owning_class,
            operator_kind: source.operator_kind,
            instances: FxHashMap::default(),
            class_type_arguments: Some(class_type_arguments.to_vec()),
            source_path: source.source_path,
        };
        self.graph.arena.insert(Element::FunctionPrototype(partial))
    }

    /// `FunctionPrototype.resolve(functionTypeArguments?, contextualTypeArguments?)`.
    ///
    /// `owning_instance`, when present, is the already-constructed `Class`
    /// this is an instance method of; its type binds `this`, and constructors
    /// return it.
    pub fn resolve_function(
        &mut self,
        prototype_id: ElementId,
        function_type_arguments: &[TypeId],
        outer_contextual: &FxHashMap<String, TypeId>,
        owning_instance: Option<ElementId>,
        span: Span,
    ) -> Option<ElementId> {
        let key = types::canonicalize_type_arguments(self.types, function_type_arguments);
        if let Some(cached) = self.graph.get(prototype_id).as_function_prototype().and_then(|p| p.instances.get(&key).copied()) {
            return Some(cached);
        }

        let proto = self.graph.get(prototype_id).as_function_prototype().cloned()?;
        let signature_node = proto.declaration.signature();

        // Layering is inherited <- class <- function (§4.2.7 step 2): start
        // from the caller's inherited contextual arguments, let the owning
        // class instance's own substitutions (e.g. `Box<i32>`'s `T -> i32`)
        // override on collision, then the method's own type parameters
        // override both below.
        let mut contextual = outer_contextual.clone();
        if let Some(class_args) = owning_instance.and_then(|id| self.graph.get(id).as_class()).map(|c| c.contextual_type_arguments.clone()) {
            contextual.extend(class_args);
        }
        if signature_node.type_parameters.len() != function_type_arguments.len() {
            tracing::error!(
                expected = signature_node.type_parameters.len(),
                actual = function_type_arguments.len(),
                "function type-argument arity mismatch"
            );
            return None;
        }
        for (param, arg) in signature_node.type_parameters.iter().zip(function_type_arguments) {
            contextual.insert(self.resolve_atom(*param), *arg);
        }

        let this_type = owning_instance.and_then(|id| self.graph.get(id).as_class().map(|c| c.ty));

        let ctx = crate::ResolveContext { source_path: &proto.source_path, contextual_type_arguments: &contextual, contextual_function: None, contextual_enum: None, flow: None };

        let mut parameter_types = Vec::with_capacity(signature_node.parameters.len());
        let mut parameter_names = Vec::with_capacity(signature_node.parameters.len());
        let mut required_count = 0;
        for (index, parameter) in signature_node.parameters.iter().enumerate() {
            if parameter.is_rest {
                self.report(parameter.span, codes::OPERATION_NOT_SUPPORTED, "Rest parameters are not supported on functions.");
                return None;
            }
            let ty = self.resolve_type(&parameter.ty, &ctx, true)?;
            parameter_types.push(ty);
            parameter_names.push(parameter.name);
            if !parameter.has_default {
                required_count = index + 1;
            }
        }

        let is_setter = proto.header.flags.contains(CommonFlags::SET);
        let is_constructor = proto.header.flags.contains(CommonFlags::CONSTRUCTOR);
        let return_type = if is_setter {
            self.types.void
        } else if is_constructor {
            match this_type {
                Some(ty) => ty,
                None => {
                    tracing::error!("constructor resolved without an owning class instance");
                    return None;
                }
            }
        } else {
            match &signature_node.return_type {
                Some(node) => self.resolve_type(node, &ctx, true)?,
                None => self.types.void,
            }
        };

        let internal_name = proto.header.internal_name.clone();
        let mut header = ElementHeader::new(internal_name.clone(), proto.header.simple_name.clone(), proto.header.span);
        header.flags = proto.header.flags;
        header.decorator_flags = proto.header.decorator_flags;
        header.namespace = proto.header.namespace;

        let mut locals = Vec::new();
        if let Some(this_ty) = this_type {
            let this_header = ElementHeader::new(glyph_graph::names::nested_in_function(&internal_name, "this"), "this".to_string(), span);
            locals.push(self.graph.arena.insert(Element::Local(LocalElement { header: this_header, ty: this_ty, slot: 0 })));
        }
        for (name, ty) in parameter_names.iter().zip(&parameter_types) {
            let simple = self.resolve_atom(*name);
            let slot = locals.len() as u32;
            let local_header = ElementHeader::new(glyph_graph::names::nested_in_function(&internal_name, &simple), simple.clone(), span);
            locals.push(self.graph.arena.insert(Element::Local(LocalElement { header: local_header, ty: *ty, slot })));
        }

        let signature = types::Signature { parameter_types, parameter_names, required_count, has_rest: false, return_type, this_type };

        let function_element = FunctionElement {
            header,
            prototype: prototype_id,
            signature,
            owning_element: owning_instance,
            locals,
            flow: FlowNodeId::INVALID,
        };
        let function_id = self.graph.arena.insert(Element::Function(function_element));
        let flow_id = self.flow.create_function_flow(function_id, Some(return_type));
        if let Element::Function(f) = self.graph.get_mut(function_id) {
            f.flow = flow_id;
        }

        if let Element::FunctionPrototype(p) = self.graph.get_mut(prototype_id) {
            p.instances.insert(key, function_id);
        }

        Some(function_id)
    }
}
