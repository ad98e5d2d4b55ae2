//! The element graph proper: lookup tables, export tables, and type aliases
//! (§2 item 2, §3.4 I1/I2).

use crate::arena::ElementArena;
use crate::element::{Element, ElementHeader, FunctionTargetElement};
use glyph_ast::TypeNode;
use glyph_common::{diagnostic::codes, Atom, Diagnostic, DiagnosticSink, ElementId, Span};
use glyph_types::TypeId;
use rustc_hash::FxHashMap;

/// A program-global type alias, expanded at the point of lookup rather than
/// eagerly (§3.3).
#[derive(Clone, Debug)]
pub struct TypeAliasInfo {
    pub type_parameters: Vec<Atom>,
    pub ty: TypeNode,
    pub span: Span,
}

#[derive(Default)]
pub struct WellKnownPrototypes {
    pub array: Option<ElementId>,
    pub array_buffer_view: Option<ElementId>,
    pub string: Option<ElementId>,
}

pub struct ElementGraph {
    pub arena: ElementArena,
    /// Primary key for every declared/resolved element (I1).
    elements_lookup: FxHashMap<String, ElementId>,
    /// Per-file export table: `file path -> (exported name -> element)` (I2).
    file_level_exports: FxHashMap<String, FxHashMap<String, ElementId>>,
    /// Program-wide export table, populated from entry sources only (I2, P6).
    module_level_exports: FxHashMap<String, ElementId>,
    type_aliases: FxHashMap<String, TypeAliasInfo>,
    pub well_known: WellKnownPrototypes,
    /// One `FunctionTarget` per distinct function-pointer `TypeId` (§4.2.3
    /// "a FunctionTarget cached on the signature").
    function_targets: FxHashMap<TypeId, ElementId>,
}

impl ElementGraph {
    pub fn new() -> Self {
        Self {
            arena: ElementArena::new(),
            elements_lookup: FxHashMap::default(),
            file_level_exports: FxHashMap::default(),
            module_level_exports: FxHashMap::default(),
            type_aliases: FxHashMap::default(),
            well_known: WellKnownPrototypes::default(),
            function_targets: FxHashMap::default(),
        }
    }

    /// Returns the cached `FunctionTarget` for `function_type`, creating one
    /// on first use (§4.2.3).
    pub fn function_target(&mut self, function_type: TypeId, display_name: String) -> ElementId {
        if let Some(&existing) = self.function_targets.get(&function_type) {
            return existing;
        }
        let header = ElementHeader::new(display_name.clone(), display_name, Span::dummy());
        let id = self.arena.insert(Element::FunctionTarget(FunctionTargetElement { header, function_type }));
        self.function_targets.insert(function_type, id);
        id
    }

    /// Inserts `element` under `internal_name`, enforcing I1. On collision the
    /// new declaration is skipped and the first element wins (§7 recovery rule).
    pub fn declare(
        &mut self,
        internal_name: String,
        element: Element,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<ElementId> {
        if let Some(&existing) = self.elements_lookup.get(&internal_name) {
            let span = element.header().map(|h| h.span).unwrap_or(Span::dummy());
            sink.report(Diagnostic::error(
                span,
                codes::DUPLICATE_IDENTIFIER,
                format!("Duplicate identifier '{internal_name}'."),
            ));
            return Some(existing);
        }
        let id = self.arena.insert(element);
        self.elements_lookup.insert(internal_name, id);
        Some(id)
    }

    /// Binds an additional name to an already-inserted element (global
    /// promotion, import aliasing, global aliases). Does not re-check I1
    /// against the element's own internal name, but does check the alias slot.
    pub fn bind_alias(&mut self, alias_name: String, target: ElementId, sink: &mut dyn DiagnosticSink, span: Span) {
        if let Some(&existing) = self.elements_lookup.get(&alias_name) {
            if existing != target {
                sink.report(Diagnostic::error(
                    span,
                    codes::DUPLICATE_IDENTIFIER,
                    format!("Duplicate identifier '{alias_name}'."),
                ));
                return;
            }
        }
        self.elements_lookup.insert(alias_name, target);
    }

    pub fn lookup(&self, internal_name: &str) -> Option<ElementId> {
        self.elements_lookup.get(internal_name).copied()
    }

    pub fn get(&self, id: ElementId) -> &Element {
        self.arena.get(id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> &mut Element {
        self.arena.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.arena.iter()
    }

    pub fn lookup_entries(&self) -> impl Iterator<Item = (&String, &ElementId)> {
        self.elements_lookup.iter()
    }

    /// Adds `name -> element` to `file`'s export table (I2). Returns `false`
    /// and reports *Export declaration conflicts* on collision.
    pub fn add_file_level_export(
        &mut self,
        file: &str,
        name: String,
        element: ElementId,
        sink: &mut dyn DiagnosticSink,
        span: Span,
    ) -> bool {
        let table = self.file_level_exports.entry(file.to_string()).or_default();
        if let Some(&existing) = table.get(&name) {
            if existing != element {
                sink.report(Diagnostic::error(
                    span,
                    codes::EXPORT_CONFLICTS,
                    format!("Export declaration conflicts with exported declaration of '{name}'."),
                ));
                return false;
            }
            return true;
        }
        table.insert(name, element);
        true
    }

    pub fn file_level_export(&self, file: &str, name: &str) -> Option<ElementId> {
        self.file_level_exports.get(file).and_then(|table| table.get(name)).copied()
    }

    pub fn file_level_exports_of(&self, file: &str) -> Option<&FxHashMap<String, ElementId>> {
        self.file_level_exports.get(file)
    }

    /// Adds `name -> element` to the module-level export table (I2, P6).
    pub fn add_module_level_export(
        &mut self,
        name: String,
        element: ElementId,
        sink: &mut dyn DiagnosticSink,
        span: Span,
    ) -> bool {
        if let Some(&existing) = self.module_level_exports.get(&name) {
            if existing != element {
                sink.report(Diagnostic::error(
                    span,
                    codes::EXPORT_CONFLICTS,
                    format!("Export declaration conflicts with exported declaration of '{name}'."),
                ));
                return false;
            }
            return true;
        }
        self.module_level_exports.insert(name, element);
        true
    }

    pub fn module_level_export(&self, name: &str) -> Option<ElementId> {
        self.module_level_exports.get(name).copied()
    }

    pub fn module_level_exports(&self) -> &FxHashMap<String, ElementId> {
        &self.module_level_exports
    }

    pub fn declare_type_alias(&mut self, simple_name: String, info: TypeAliasInfo, sink: &mut dyn DiagnosticSink) {
        if self.type_aliases.contains_key(&simple_name) {
            let span = info.span;
            sink.report(Diagnostic::error(
                span,
                codes::DUPLICATE_IDENTIFIER,
                format!("Duplicate identifier '{simple_name}'."),
            ));
            return;
        }
        self.type_aliases.insert(simple_name, info);
    }

    pub fn type_alias(&self, simple_name: &str) -> Option<&TypeAliasInfo> {
        self.type_aliases.get(simple_name)
    }
}

impl Default for ElementGraph {
    fn default() -> Self {
        Self::new()
    }
}
