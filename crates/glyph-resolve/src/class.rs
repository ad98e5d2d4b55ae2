//! `ClassPrototype.resolve` (§4.2.6): monomorphization and field layout.

use crate::Resolver;
use glyph_common::{limits::VALID_FIELD_ALIGNMENTS, CommonFlags, ElementId, Span};
use glyph_graph::{ClassElement, Element, ElementHeader, FieldElement};
use glyph_types::{self as types, TypeId};
use rustc_hash::FxHashMap;

impl<'a> Resolver<'a> {
    /// `ClassPrototype.resolve(typeArguments?, contextualTypeArguments?) → Class`.
    pub fn resolve_class(
        &mut self,
        prototype_id: ElementId,
        type_arguments: &[TypeId],
        outer_contextual: &FxHashMap<String, TypeId>,
        span: Span,
    ) -> Option<ElementId> {
        let key = types::canonicalize_type_arguments(self.types, type_arguments);
        if let Some(cached) = self.graph.get(prototype_id).as_class_prototype().and_then(|p| p.instances.get(&key).copied()) {
            return Some(cached);
        }

        let proto = self.graph.get(prototype_id).as_class_prototype().cloned()?;
        let mut contextual = outer_contextual.clone();

        let ctx_for_base = crate::ResolveContext {
            source_path: &proto.source_path,
            contextual_type_arguments: &contextual,
            contextual_function: None,
            contextual_enum: None,
            flow: None,
        };
        let base_class = match (proto.base_prototype, &proto.declaration.extends_type) {
            (Some(base_proto_id), Some(extends_node)) => {
                let base_args = match extends_node {
                    glyph_ast::TypeNode::Named(named) => self.resolve_type_node_arguments(&named.type_arguments, &ctx_for_base)?,
                    glyph_ast::TypeNode::Function(_) => Vec::new(),
                };
                Some(self.resolve_class(base_proto_id, &base_args, &contextual, span)?)
            }
            _ => None,
        };

        if proto.declaration.type_parameters.len() != type_arguments.len() {
            tracing::error!(
                expected = proto.declaration.type_parameters.len(),
                actual = type_arguments.len(),
                "class type-argument arity mismatch"
            );
            return None;
        }
        for (param, arg) in proto.declaration.type_parameters.iter().zip(type_arguments) {
            contextual.insert(self.resolve_atom(*param), *arg);
        }

        let suffix = types::canonicalize_type_arguments(self.types, type_arguments);
        let internal_name = glyph_graph::names::with_type_arguments(&proto.header.internal_name, &suffix);
        let mut header = ElementHeader::new(internal_name.clone(), proto.header.simple_name.clone(), proto.header.span);
        header.flags = proto.header.flags;
        header.decorator_flags = proto.header.decorator_flags;
        header.namespace = proto.header.namespace;

        let (members, current_memory_offset) = match base_class {
            Some(base_id) => {
                let base = self.graph.get(base_id).as_class().expect("base_class resolves to a Class");
                (base.members.clone(), base.current_memory_offset)
            }
            None => (Default::default(), 0),
        };

        let class_element = ClassElement {
            header,
            prototype: prototype_id,
            is_interface: proto.is_interface,
            type_arguments: type_arguments.to_vec(),
            ty: TypeId(0),
            base_class,
            contextual_type_arguments: contextual.clone(),
            constructor_instance: None,
            operator_overloads: FxHashMap::default(),
            members,
            current_memory_offset,
        };
        let class_id = self.graph.arena.insert(Element::Class(class_element));
        let class_ty = self.types.class_type(class_id, internal_name);
        if let Element::Class(c) = self.graph.get_mut(class_id) {
            c.ty = class_ty;
        }

        // Cache before resolving members: recursive generic shapes (a node
        // referencing its own instantiated type) must see this instance.
        if let Element::ClassPrototype(p) | Element::InterfacePrototype(p) = self.graph.get_mut(prototype_id) {
            p.instances.insert(key, class_id);
        }

        if let Some(ctor_proto_id) = proto.constructor_prototype {
            let partial = self.partial_resolve_method(ctor_proto_id, type_arguments);
            let resolved = self.resolve_function(partial, &[], &contextual, Some(class_id), span);
            if let (Some(ctor_id), Element::Class(c)) = (resolved, self.graph.get_mut(class_id)) {
                c.constructor_instance = Some(ctor_id);
            }
        }

        for (simple_name, member_id) in proto.instance_member_prototypes.iter() {
            let resolved = match self.graph.get(*member_id) {
                Element::FieldPrototype(_) => self.resolve_field_member(*member_id, class_id, &contextual),
                Element::FunctionPrototype(_) => {
                    let partial = self.partial_resolve_method(*member_id, type_arguments);
                    Some(partial)
                }
                Element::Property(_) => Some(self.resolve_property_member(*member_id, class_id, type_arguments)),
                _ => None,
            };
            if let Some(resolved_id) = resolved {
                if let Element::Class(c) = self.graph.get_mut(class_id) {
                    c.members.insert(simple_name.clone(), resolved_id);
                }
            }
        }

        for (&kind, &op_proto_id) in proto.operator_overload_prototypes.iter() {
            let is_static = self.graph.get(op_proto_id).header().is_some_and(|h| h.flags.contains(CommonFlags::STATIC));
            let resolved = if is_static {
                self.resolve_function(op_proto_id, &[], &contextual, None, span)
            } else {
                let partial = self.partial_resolve_method(op_proto_id, type_arguments);
                self.resolve_function(partial, &[], &contextual, Some(class_id), span)
            };
            if let (Some(function_id), Element::Class(c)) = (resolved, self.graph.get_mut(class_id)) {
                c.operator_overloads.insert(kind, function_id);
            }
        }

        Some(class_id)
    }

    /// Field layout (I4/I5): align `current_memory_offset` up to the field's
    /// byte size (sizes in [`VALID_FIELD_ALIGNMENTS`]), place the field there,
    /// advance by its size.
    fn resolve_field_member(&mut self, prototype_id: ElementId, class_id: ElementId, contextual: &FxHashMap<String, TypeId>) -> Option<ElementId> {
        let proto = self.graph.get(prototype_id).as_field_prototype().cloned()?;
        let Some(ty_node) = &proto.declaration.ty else {
            tracing::error!("field declared without a type annotation");
            return None;
        };
        let source_path = self.source_path_of_class(class_id);
        let ctx = crate::ResolveContext { source_path: &source_path, contextual_type_arguments: contextual, contextual_function: None, contextual_enum: None, flow: None };
        let ty = self.resolve_type(ty_node, &ctx, true)?;
        let byte_size = self.types.get(ty).byte_size().unwrap_or(0).max(1);
        let alignment = VALID_FIELD_ALIGNMENTS.into_iter().find(|&a| a >= byte_size).unwrap_or(*VALID_FIELD_ALIGNMENTS.last().unwrap());

        let Element::Class(c) = self.graph.get_mut(class_id) else { return None };
        let aligned_offset = (c.current_memory_offset + alignment - 1) & !(alignment - 1);
        c.current_memory_offset = aligned_offset + byte_size;

        let header = ElementHeader::new(
            glyph_graph::names::instance_member(&self.graph.get(class_id).header().unwrap().internal_name.clone(), &proto.header.simple_name),
            proto.header.simple_name.clone(),
            proto.header.span,
        );
        let field_element = FieldElement { header, prototype: prototype_id, ty, memory_offset: aligned_offset };
        Some(self.graph.arena.insert(Element::Field(field_element)))
    }

    fn resolve_property_member(&mut self, prototype_id: ElementId, class_id: ElementId, type_arguments: &[TypeId]) -> ElementId {
        let proto = self.graph.get(prototype_id).as_property().cloned().unwrap_or_default();
        let getter_prototype = proto.getter_prototype.map(|id| self.partial_resolve_method(id, type_arguments));
        let setter_prototype = proto.setter_prototype.map(|id| self.partial_resolve_method(id, type_arguments));
        let instance_property = glyph_graph::PropertyElement { header: proto.header.clone(), parent: Some(class_id), getter_prototype, setter_prototype };
        self.graph.arena.insert(Element::Property(instance_property))
    }

    fn source_path_of_class(&self, class_id: ElementId) -> String {
        let prototype = self.graph.get(class_id).as_class().expect("class id resolves to a Class").prototype;
        self.graph.get(prototype).as_class_prototype().expect("class prototype").source_path.clone()
    }
}
