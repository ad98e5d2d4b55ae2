//! `resolveType`/`resolveSignature` (§4.2.1).

use crate::{ResolveContext, Resolver};
use glyph_ast::{Signature as SignatureNode, TypeNode};
use glyph_common::diagnostic::codes;
use glyph_types::{self as types, PointerWidth, TypeId};

impl<'a> Resolver<'a> {
    /// `resolveType(node, contextualTypeArguments?, reportNotFound=true)`.
    pub fn resolve_type(&mut self, node: &TypeNode, ctx: &ResolveContext, report_not_found: bool) -> Option<TypeId> {
        let named = match node {
            TypeNode::Function(signature) => {
                let resolved = self.resolve_signature(signature, ctx)?;
                return Some(self.types.function_type(resolved));
            }
            TypeNode::Named(named) => named,
        };

        let simple_name = self.resolve_atom(named.name);
        let local_name = format!("{}/{simple_name}", ctx.source_path);
        let global_name = simple_name.clone();

        if let Some(element_id) = self.graph.lookup(&local_name).or_else(|| self.graph.lookup(&global_name)) {
            if self.graph.get(element_id).is_class_like() {
                let type_args = self.resolve_type_node_arguments(&named.type_arguments, ctx)?;
                let class_id = self.resolve_class(element_id, &type_args, ctx.contextual_type_arguments, node.span())?;
                return self.graph.get(class_id).as_class().map(|c| c.ty);
            }
        }

        if let Some(alias) = self.graph.type_alias(&simple_name).cloned() {
            let mut nested_map = ctx.contextual_type_arguments.clone();
            if !alias.type_parameters.is_empty() {
                let args = self.resolve_type_node_arguments(&named.type_arguments, ctx)?;
                if args.len() != alias.type_parameters.len() {
                    self.report(
                        node.span(),
                        codes::ARGUMENT_COUNT_MISMATCH,
                        format!("Expected {} type arguments but got {}.", alias.type_parameters.len(), args.len()),
                    );
                    return None;
                }
                for (param, arg) in alias.type_parameters.iter().zip(args) {
                    nested_map.insert(self.resolve_atom(*param), arg);
                }
            }
            let nested_ctx = ResolveContext {
                source_path: ctx.source_path,
                contextual_type_arguments: &nested_map,
                contextual_function: ctx.contextual_function,
                contextual_enum: ctx.contextual_enum,
                flow: ctx.flow,
            };
            return self.resolve_type(&alias.ty, &nested_ctx, report_not_found);
        }

        if !named.type_arguments.is_empty() {
            let args = self.resolve_type_node_arguments(&named.type_arguments, ctx)?;
            let suffix = types::canonicalize_type_arguments(self.types, &args);
            let local_suffixed = glyph_graph::names::with_type_arguments(&local_name, &suffix);
            let global_suffixed = glyph_graph::names::with_type_arguments(&global_name, &suffix);
            if let Some(id) = self.types.lookup_by_name(&local_suffixed).or_else(|| self.types.lookup_by_name(&global_suffixed)) {
                return Some(id);
            }
        } else if let Some(id) = ctx.contextual_type_arguments.get(&simple_name) {
            return Some(*id);
        }

        if let Some(id) = self.types.lookup_by_name(&local_name).or_else(|| self.types.lookup_by_name(&global_name)) {
            return Some(id);
        }

        if report_not_found {
            self.report(node.span(), codes::CANNOT_FIND_NAME, format!("Cannot find name '{simple_name}'."));
        }
        None
    }

    /// Resolves each node in `nodes` to a `TypeId`, short-circuiting on the
    /// first unresolved one (the miss has already been reported by the
    /// recursive `resolve_type` call).
    pub(crate) fn resolve_type_node_arguments(&mut self, nodes: &[TypeNode], ctx: &ResolveContext) -> Option<Vec<TypeId>> {
        nodes.iter().map(|node| self.resolve_type(node, ctx, true)).collect()
    }

    /// `resolveSignature`: `this`-type, parameters, `required` count, rest
    /// flag (terminal-only), return type (defaults to `void`).
    pub(crate) fn resolve_signature(&mut self, node: &SignatureNode, ctx: &ResolveContext) -> Option<types::Signature> {
        let this_type = match &node.this_type {
            Some(ty) => Some(self.resolve_type(ty, ctx, true)?),
            None => None,
        };

        let mut parameter_types = Vec::with_capacity(node.parameters.len());
        let mut parameter_names = Vec::with_capacity(node.parameters.len());
        let mut required_count = 0;
        for (index, parameter) in node.parameters.iter().enumerate() {
            let ty = self.resolve_type(&parameter.ty, ctx, true)?;
            parameter_types.push(ty);
            parameter_names.push(parameter.name);
            if !parameter.has_default {
                required_count = index + 1;
            }
            if parameter.is_rest && index + 1 != node.parameters.len() {
                self.report(parameter.span, codes::OPERATION_NOT_SUPPORTED, "A rest parameter must be the last parameter.");
                return None;
            }
        }
        let has_rest = node.parameters.last().is_some_and(|p| p.is_rest);

        let return_type = match &node.return_type {
            Some(ty) => self.resolve_type(ty, ctx, true)?,
            None => self.types.void,
        };

        Some(types::Signature { parameter_types, parameter_names, required_count, has_rest, return_type, this_type })
    }

    pub(crate) fn isize_pointer_width(&self) -> PointerWidth {
        self.types.isize_width()
    }
}
