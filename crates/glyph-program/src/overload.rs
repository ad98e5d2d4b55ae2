//! `Class.isAssignableTo` / `Class.lookupOverload` (§6.3, P7): queries over an
//! already-resolved graph, not part of monomorphization itself. Elements
//! carry no virtual methods (§9 "Tagged unions vs class hierarchy"), so these
//! live as free functions rather than inherent methods on `ClassElement`.

use glyph_graph::{ElementGraph, OperatorKind};
use glyph_common::ElementId;
use glyph_types::{TypeId, TypeTable};

/// `C.lookupOverload(k)` (P7): walks `C`'s base chain and returns the
/// lowest-depth (closest) definition, or `None`. Overloads are *not* copied
/// into a derived class's own `operator_overloads` map at resolve time (see
/// `glyph-resolve`'s `resolve_class`), so a derived class without its own
/// override must fall through to its base here.
pub fn lookup_overload(graph: &ElementGraph, class_id: ElementId, kind: OperatorKind) -> Option<ElementId> {
    let mut current = Some(class_id);
    while let Some(id) = current {
        let class = graph.get(id).as_class()?;
        if let Some(&function_id) = class.operator_overloads.get(&kind) {
            return Some(function_id);
        }
        current = class.base_class;
    }
    None
}

/// `Class.isAssignableTo(other)`: identical types are always assignable;
/// otherwise two class types are assignable when `other` appears in `self`'s
/// base chain. Primitives never implicitly convert (no numeric widening —
/// out of scope per §1's non-goals on type inference).
pub fn is_assignable_to(graph: &ElementGraph, types: &TypeTable, from: TypeId, to: TypeId) -> bool {
    if from == to {
        return true;
    }
    let Some(from_class) = types.get(from).class_reference() else { return false };
    let Some(to_class) = types.get(to).class_reference() else { return false };

    let mut current = Some(from_class);
    while let Some(id) = current {
        if id == to_class {
            return true;
        }
        current = graph.get(id).as_class().and_then(|c| c.base_class);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_common::Span;
    use glyph_graph::{ClassElement, Element, ElementHeader};
    use rustc_hash::FxHashMap;

    fn class(graph: &mut ElementGraph, types: &mut TypeTable, name: &str, base: Option<ElementId>) -> ElementId {
        let id = graph.arena.insert(Element::Class(ClassElement {
            header: ElementHeader::new(name.to_string(), name.to_string(), Span::dummy()),
            prototype: ElementId(0),
            is_interface: false,
            type_arguments: Vec::new(),
            ty: TypeId(0),
            base_class: base,
            contextual_type_arguments: FxHashMap::default(),
            constructor_instance: None,
            operator_overloads: FxHashMap::default(),
            members: Default::default(),
            current_memory_offset: 0,
        }));
        let ty = types.class_type(id, name.to_string());
        if let Element::Class(c) = graph.get_mut(id) {
            c.ty = ty;
        }
        id
    }

    #[test]
    fn overload_lookup_walks_the_base_chain() {
        let mut graph = ElementGraph::new();
        let mut types = TypeTable::new(glyph_types::PointerWidth::Bits32, glyph_types::PointerWidth::Bits32);
        let base = class(&mut graph, &mut types, "a/Base", None);
        let add_fn = ElementId(99);
        if let Element::Class(c) = graph.get_mut(base) {
            c.operator_overloads.insert(OperatorKind::Add, add_fn);
        }
        let derived = class(&mut graph, &mut types, "a/Derived", Some(base));

        assert_eq!(lookup_overload(&graph, derived, OperatorKind::Add), Some(add_fn));
        assert_eq!(lookup_overload(&graph, derived, OperatorKind::Sub), None);
    }

    #[test]
    fn assignability_holds_across_the_base_chain_only() {
        let mut graph = ElementGraph::new();
        let mut types = TypeTable::new(glyph_types::PointerWidth::Bits32, glyph_types::PointerWidth::Bits32);
        let base = class(&mut graph, &mut types, "a/Base", None);
        let derived = class(&mut graph, &mut types, "a/Derived", Some(base));
        let unrelated = class(&mut graph, &mut types, "a/Other", None);

        let base_ty = graph.get(base).as_class().unwrap().ty;
        let derived_ty = graph.get(derived).as_class().unwrap().ty;
        let unrelated_ty = graph.get(unrelated).as_class().unwrap().ty;

        assert!(is_assignable_to(&graph, &types, derived_ty, base_ty));
        assert!(!is_assignable_to(&graph, &types, base_ty, derived_ty));
        assert!(!is_assignable_to(&graph, &types, derived_ty, unrelated_ty));
        assert!(is_assignable_to(&graph, &types, derived_ty, derived_ty));
    }
}
