//! `resolveExpression`/`resolvePropertyAccess`/`resolveElementAccess`
//! (§4.2.3–§4.2.5).
//!
//! The "resolvedThisExpression"/"resolvedElementExpression" out-parameters
//! the source material threads through a mutable resolver are modeled here
//! as an explicit return value instead (see DESIGN.md, Open Question
//! decisions): every entry point returns a [`Resolved`] record rather than
//! writing through scratch fields on `Resolver`.

use crate::{ResolveContext, Resolver};
use glyph_ast::{CallExpr, ElementAccessExpr, Expr, PropertyAccessExpr};
use glyph_common::{diagnostic::codes, ElementId, Span};
use glyph_flow::FlowFlags;
use glyph_graph::{Element, OperatorKind};
use glyph_types::TypeId;
use rustc_hash::FxHashMap;

/// What an expression resolved to, plus the two out-parameters the property/
/// element access algorithms produce for their caller to consume (typically
/// the emitter, synthesizing a receiver-qualified access or an indexed call).
#[derive(Clone, Debug)]
pub struct Resolved {
    pub element: ElementId,
    pub this_expr: Option<Expr>,
    pub element_expr: Option<Expr>,
}

impl Resolved {
    fn just(element: ElementId) -> Self {
        Self { element, this_expr: None, element_expr: None }
    }
}

impl<'a> Resolver<'a> {
    /// The type a variable-like element (Global/Local/Field) or FunctionTarget
    /// carries, for property-access normalization (§4.2.4 step 2).
    fn element_type(&self, id: ElementId) -> Option<TypeId> {
        match self.graph.get(id) {
            Element::Global(g) => g.ty,
            Element::Local(l) => Some(l.ty),
            Element::Field(f) => Some(f.ty),
            Element::FunctionTarget(f) => Some(f.function_type),
            _ => None,
        }
    }

    /// Either a class reference or a cached `FunctionTarget`, for whatever a
    /// type resolves to when something of that type is used as a value
    /// (§4.2.3 "Call", §4.2.4 step 2).
    fn class_or_function_target(&mut self, ty: TypeId) -> Option<ElementId> {
        let t = self.types.get(ty);
        if let Some(class_ref) = t.class_reference() {
            return Some(class_ref);
        }
        if let Some(sig) = t.signature() {
            let name = sig.display_name(self.types);
            return Some(self.graph.function_target(ty, name));
        }
        None
    }

    /// `resolveExpression(expr, contextualFunction) → Element | ⊥` (§4.2.3).
    pub fn resolve_expression(&mut self, expr: &Expr, ctx: &ResolveContext) -> Option<Resolved> {
        match expr.strip_parens() {
            Expr::Paren(_) => unreachable!("strip_parens removes every Paren layer"),

            Expr::Identifier(ident) => {
                let name = self.resolve_atom(ident.name);
                let element = self.resolve_identifier(&name, ident.span, ctx)?;
                Some(Resolved::just(element))
            }

            Expr::Assertion(a) => {
                let ty = self.resolve_type(&a.ty, ctx, true)?;
                match self.types.get(ty).class_reference() {
                    Some(class_ref) => Some(Resolved::just(class_ref)),
                    None => {
                        self.report(a.span, codes::OPERATION_NOT_SUPPORTED, "Cannot reference a primitive-typed expression as a value.");
                        None
                    }
                }
            }

            Expr::This(span) => self.resolve_this(*span, ctx),
            Expr::Super(span) => self.resolve_super(*span, ctx),

            Expr::StringLiteral(lit) => {
                let Some(string_prototype) = self.graph.well_known.string else {
                    self.report(lit.span, codes::CANNOT_FIND_NAME, "Cannot find name 'String'.");
                    return None;
                };
                let empty = FxHashMap::default();
                let class_id = self.resolve_class(string_prototype, &[], &empty, lit.span)?;
                Some(Resolved { element: class_id, this_expr: Some(expr.clone()), element_expr: None })
            }

            Expr::PropertyAccess(p) => self.resolve_property_access(p, ctx),
            Expr::ElementAccess(e) => self.resolve_element_access(e, ctx),
            Expr::Call(c) => self.resolve_call(c, ctx),

            Expr::NumericLiteral(_) | Expr::Binary(_) => {
                self.report(expr.span(), codes::OPERATION_NOT_SUPPORTED, "Operation not supported.");
                None
            }
        }
    }

    fn resolve_this(&mut self, span: Span, ctx: &ResolveContext) -> Option<Resolved> {
        if let Some(flow) = ctx.flow {
            if self.flow.get(flow).flags.contains(FlowFlags::INLINE_CONTEXT) {
                if let Some((local_id, _)) = self.flow.get_scoped_local(flow, "this") {
                    return Some(Resolved::just(local_id));
                }
            }
        }
        let owning = ctx.contextual_function.and_then(|f| self.graph.get(f).as_function().and_then(|fe| fe.owning_element));
        match owning {
            Some(class_id) => Some(Resolved::just(class_id)),
            None => {
                self.report(span, codes::THIS_NOT_ALLOWED, "'this' cannot be referenced here.");
                None
            }
        }
    }

    fn resolve_super(&mut self, span: Span, ctx: &ResolveContext) -> Option<Resolved> {
        let owning = ctx.contextual_function.and_then(|f| self.graph.get(f).as_function().and_then(|fe| fe.owning_element));
        let base = owning.and_then(|c| self.graph.get(c).as_class().and_then(|ce| ce.base_class));
        match base {
            Some(base_id) => Some(Resolved::just(base_id)),
            None => {
                self.report(span, codes::THIS_NOT_ALLOWED, "'super' requires a derived class.");
                None
            }
        }
    }

    /// Normalizes a resolved target to the element whose `members` map the
    /// lookup walk should search (§4.2.4 step 2). Variable-likes and function
    /// calls (including indexed reads, which resolve to the `IndexedGet`
    /// function itself) are reduced through their value type; class-like
    /// elements pass through unchanged.
    fn normalize_target(&mut self, resolved: &Resolved, span: Span) -> Option<ElementId> {
        let value_type = match self.graph.get(resolved.element) {
            Element::Global(_) | Element::Local(_) | Element::Field(_) => self.element_type(resolved.element),
            Element::Function(f) => Some(f.signature.return_type),
            Element::Property(_) => {
                let property = self.graph.get(resolved.element).as_property().cloned()?;
                let getter_id = property.getter_prototype?;
                let function_id = self.resolve_function(getter_id, &[], &FxHashMap::default(), None, span)?;
                self.graph.get(function_id).as_function().map(|f| f.signature.return_type)
            }
            Element::ClassPrototype(_) | Element::Class(_) | Element::InterfacePrototype(_) | Element::Interface(_) => {
                return Some(resolved.element);
            }
            _ => return Some(resolved.element),
        };

        match value_type.and_then(|ty| self.class_or_function_target(ty)) {
            Some(class_ref) => Some(class_ref),
            None => {
                self.report(span, codes::PROPERTY_NOT_FOUND, "Property does not exist on this type.");
                None
            }
        }
    }

    /// `resolvePropertyAccess(expr, ctx)` (§4.2.4).
    pub fn resolve_property_access(&mut self, expr: &PropertyAccessExpr, ctx: &ResolveContext) -> Option<Resolved> {
        let target = self.resolve_expression(&expr.target, ctx)?;
        let property_name = self.resolve_atom(expr.property);
        let container = self.normalize_target(&target, expr.span)?;

        let member = self.lookup_member(container, &property_name);
        match member {
            Some(member_id) => Some(Resolved { element: member_id, this_expr: Some((*expr.target).clone()), element_expr: None }),
            None => {
                self.report(expr.span, codes::PROPERTY_NOT_FOUND, format!("Property '{property_name}' does not exist on this type."));
                None
            }
        }
    }

    /// `resolveElementAccess(expr, ctx)` (§4.2.5): mirrors property access but
    /// always routes through `IndexedGet`.
    pub fn resolve_element_access(&mut self, expr: &ElementAccessExpr, ctx: &ResolveContext) -> Option<Resolved> {
        let target = self.resolve_expression(&expr.target, ctx)?;
        let container = self.normalize_target(&target, expr.span)?;

        let member = match self.graph.get(container) {
            Element::Class(c) | Element::Interface(c) => c.operator_overloads.get(&OperatorKind::IndexedGet).copied(),
            _ => None,
        };
        match member {
            Some(member_id) => Some(Resolved {
                element: member_id,
                this_expr: Some((*expr.target).clone()),
                element_expr: Some((*expr.index).clone()),
            }),
            None => {
                self.report(expr.span, codes::INDEX_SIGNATURE_MISSING, "This type has no index signature.");
                None
            }
        }
    }

    /// Walks the inheritance chain for class-like containers (base prototype
    /// or base class, first hit wins); looks up `members`/instance prototype
    /// maps directly for everything else.
    fn lookup_member(&self, container: ElementId, name: &str) -> Option<ElementId> {
        match self.graph.get(container) {
            Element::ClassPrototype(c) | Element::InterfacePrototype(c) => {
                if let Some(id) = c.instance_member_prototypes.get(name).or_else(|| c.static_members.get(name)) {
                    return Some(*id);
                }
                self.lookup_member(c.base_prototype?, name)
            }
            Element::Class(c) | Element::Interface(c) => {
                if let Some(id) = c.members.get(name) {
                    return Some(*id);
                }
                self.lookup_member(c.base_class?, name)
            }
            Element::Namespace(n) => n.members.get(name).copied(),
            Element::Enum(e) => e.values.get(name).copied(),
            _ => None,
        }
    }

    /// `Call` dispatch (§4.2.3).
    fn resolve_call(&mut self, call: &CallExpr, ctx: &ResolveContext) -> Option<Resolved> {
        let target = self.resolve_expression(&call.callee, ctx)?;

        if let Element::FunctionPrototype(proto) = self.graph.get(target.element) {
            let proto = proto.clone();
            let call_type_arguments = self.resolve_type_node_arguments(&call.type_arguments, ctx)?;
            let owning_instance = match (proto.owning_class, &proto.class_type_arguments) {
                (Some(owner_proto), Some(class_args)) => {
                    self.resolve_class(owner_proto, class_args, ctx.contextual_type_arguments, call.span)
                }
                _ => None,
            };
            let function_id =
                self.resolve_function(target.element, &call_type_arguments, ctx.contextual_type_arguments, owning_instance, call.span)?;
            let return_type = self.graph.get(function_id).as_function()?.signature.return_type;
            let result = self.class_or_function_target(return_type);
            return result.map(Resolved::just).or_else(|| {
                self.report(call.span, codes::NOT_CALLABLE, "Cannot invoke an expression whose type lacks a call signature.");
                None
            });
        }

        let callee_type = self.element_type(target.element);
        match callee_type.and_then(|ty| self.types.get(ty).signature().cloned()) {
            Some(sig) => {
                let result = self.class_or_function_target(sig.return_type);
                result.map(Resolved::just)
            }
            None => {
                self.report(call.span, codes::NOT_CALLABLE, "Cannot invoke an expression whose type lacks a call signature.");
                None
            }
        }
    }
}
