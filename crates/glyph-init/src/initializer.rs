//! The one-pass AST walk plus drain phase (§4.1).

use crate::queue::{QueuedExport, QueuedExtend, QueuedImport};
use glyph_ast::{
    ClassDecl, Decorator, DecoratorKind, EnumDecl, Expr, ExportDecl, FieldDecl, FunctionDecl, ImportDecl,
    InterfaceDecl, MethodDecl, MethodKind, NamespaceDecl, Statement, TypeAliasDecl, TypeNode, VariableDecl,
};
use glyph_common::diagnostic::codes;
use glyph_common::{Atom, CommonFlags, DecoratorFlags, DecoratorTarget, Diagnostic, DiagnosticSink, ElementId, Interner, Span};
use glyph_graph::{
    ClassPrototypeElement, Element, ElementGraph, ElementHeader, EnumElement, EnumValueElement, FieldPrototypeElement,
    FunctionDeclRef, FunctionPrototypeElement, GlobalElement, NamespaceElement, OperatorKind, PropertyElement,
    TypeAliasInfo,
};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Where a declaration is being initialized: either directly under a source
/// file, or nested inside a namespace (§4.1 steps 1, 6).
#[derive(Clone)]
enum Scope {
    File(String),
    Namespace { id: ElementId, internal_name: String },
}

impl Scope {
    fn internal_name_for(&self, simple_name: &str) -> String {
        match self {
            Scope::File(path) => glyph_graph::names::file_level(path, simple_name),
            Scope::Namespace { internal_name, .. } => glyph_graph::names::static_member(internal_name, simple_name),
        }
    }

    fn namespace_id(&self) -> Option<ElementId> {
        match self {
            Scope::File(_) => None,
            Scope::Namespace { id, .. } => Some(*id),
        }
    }
}

pub struct Initializer<'a> {
    graph: &'a mut ElementGraph,
    interner: &'a Interner,
    sink: &'a mut dyn DiagnosticSink,
    global_aliases: FxHashMap<String, String>,
    queued_imports: Vec<QueuedImport>,
    queued_exports: Vec<QueuedExport>,
    queued_extends: Vec<QueuedExtend>,
}

impl<'a> Initializer<'a> {
    pub fn new(
        graph: &'a mut ElementGraph,
        interner: &'a Interner,
        sink: &'a mut dyn DiagnosticSink,
        global_aliases: FxHashMap<String, String>,
    ) -> Self {
        Self {
            graph,
            interner,
            sink,
            global_aliases,
            queued_imports: Vec::new(),
            queued_exports: Vec::new(),
            queued_extends: Vec::new(),
        }
    }

    /// Runs the full pass over `sources` followed by the drain phase.
    pub fn run(&mut self, sources: &[glyph_ast::SourceFile]) {
        for source in sources {
            let scope = Scope::File(source.path.clone());
            for stmt in &source.statements {
                self.init_statement(&source.path, source.is_entry, source.is_library, &scope, stmt);
            }
        }
        self.drain_exports();
        self.drain_imports();
        self.drain_extends();
        self.drain_global_aliases();
        self.stash_well_known_prototypes();
    }

    fn resolve(&self, atom: Atom) -> String {
        self.interner.resolve(atom).to_string()
    }

    fn report(&mut self, span: Span, code: &'static str, message: impl Into<String>) {
        self.sink.report(Diagnostic::error(span, code, message));
    }

    fn report_warning(&mut self, span: Span, code: &'static str, message: impl Into<String>) {
        self.sink.report(Diagnostic::warning(span, code, message));
    }

    /// Declares `element` under `internal_name`, reporting I1 collisions.
    /// Returns whether this is a genuinely new element (vs. the first one,
    /// returned again on collision).
    fn declare(&mut self, internal_name: String, element: Element) -> (ElementId, bool) {
        let is_new = self.graph.lookup(&internal_name).is_none();
        let id = self.graph.declare(internal_name, element, self.sink).expect("declare always returns an id");
        (id, is_new)
    }

    fn base_header(&self, scope: &Scope, internal_name: String, simple_name: String, span: Span) -> ElementHeader {
        let mut header = ElementHeader::new(internal_name, simple_name, span);
        header.namespace = scope.namespace_id();
        header
    }

    /// Filters `decorators` against the allowed set for `target` (§4.1 step
    /// 2): unknown or misplaced decorators warn/error, duplicates error.
    /// `@operator` decorators are handled separately by the caller.
    fn classify_decorators(&mut self, decorators: &[Decorator], target: DecoratorTarget) -> DecoratorFlags {
        let allowed = target.allowed();
        let mut flags = DecoratorFlags::empty();
        for deco in decorators {
            if deco.kind == DecoratorKind::Operator {
                continue;
            }
            let bit = match deco.kind {
                DecoratorKind::Global => DecoratorFlags::GLOBAL,
                DecoratorKind::Sealed => DecoratorFlags::SEALED,
                DecoratorKind::Unmanaged => DecoratorFlags::UNMANAGED,
                DecoratorKind::Inline => DecoratorFlags::INLINE,
                DecoratorKind::Unknown | DecoratorKind::Operator => DecoratorFlags::empty(),
            };
            if bit.is_empty() {
                let name = self.resolve(deco.name);
                self.report_warning(deco.span, codes::INVALID_DECORATOR, format!("Decorator '{name}' is not valid here."));
                continue;
            }
            if !allowed.contains(bit) {
                let name = self.resolve(deco.name);
                self.report(deco.span, codes::INVALID_DECORATOR, format!("Decorator '{name}' is not valid here."));
                continue;
            }
            if flags.contains(bit) {
                self.report(deco.span, codes::DUPLICATE_DECORATOR, "Duplicate decorator.");
                continue;
            }
            flags |= bit;
        }
        flags
    }

    /// Dispatches one top-level (or namespace-member) statement (§4.1 step 1).
    /// Returns the `(simple_name, id)` pairs of elements it declared, for the
    /// caller to fold into a namespace's member map when nested.
    fn init_statement(
        &mut self,
        path: &str,
        is_entry: bool,
        is_library: bool,
        scope: &Scope,
        stmt: &Statement,
    ) -> Vec<(String, ElementId)> {
        match stmt {
            Statement::Class(decl) => vec![self.declare_class(path, is_entry, is_library, scope, decl)],
            Statement::Interface(decl) => vec![self.declare_interface(path, is_entry, is_library, scope, decl)],
            Statement::Function(decl) => vec![self.declare_function(path, is_entry, is_library, scope, decl)],
            Statement::Enum(decl) => vec![self.declare_enum(path, is_entry, is_library, scope, decl)],
            Statement::Namespace(decl) => vec![self.declare_namespace(path, is_entry, is_library, scope, decl)],
            Statement::TypeAlias(decl) => {
                self.declare_type_alias(scope, decl);
                Vec::new()
            }
            Statement::Variable(decl) => self.declare_variables(path, is_entry, is_library, scope, decl),
            Statement::Import(decl) => {
                self.queue_import(path, scope, decl);
                Vec::new()
            }
            Statement::Export(decl) => {
                self.handle_export(path, is_entry, decl);
                Vec::new()
            }
            Statement::Expression(_) => Vec::new(),
        }
    }

    fn promote(
        &mut self,
        scope: &Scope,
        is_entry: bool,
        is_library: bool,
        simple_name: &str,
        id: ElementId,
        common_flags: CommonFlags,
        decorator_flags: DecoratorFlags,
        span: Span,
    ) {
        let Scope::File(path) = scope else { return };
        let exported = common_flags.contains(CommonFlags::EXPORT);
        if exported {
            self.promote_export(path, simple_name, id, is_entry, span);
        }
        if decorator_flags.contains(DecoratorFlags::GLOBAL) || (exported && is_library) {
            self.graph.bind_alias(simple_name.to_string(), id, self.sink, span);
        }
    }

    /// File-level export, and (if the source is an entry) module-level
    /// export plus the `MODULE_EXPORT` flag (§4.1 step 10, P6).
    fn promote_export(&mut self, path: &str, external_name: &str, id: ElementId, is_entry: bool, span: Span) {
        let added = self.graph.add_file_level_export(path, external_name.to_string(), id, self.sink, span);
        if added && is_entry {
            let added_module = self.graph.add_module_level_export(external_name.to_string(), id, self.sink, span);
            if added_module {
                if let Some(header) = self.graph.get_mut(id).header_mut() {
                    header.flags |= CommonFlags::MODULE_EXPORT;
                }
            }
        }
    }

    fn declare_class(
        &mut self,
        path: &str,
        is_entry: bool,
        is_library: bool,
        scope: &Scope,
        decl: &ClassDecl,
    ) -> (String, ElementId) {
        let simple = self.resolve(decl.name);
        let internal = scope.internal_name_for(&simple);
        let decorator_flags = self.classify_decorators(&decl.decorators, DecoratorTarget::Class);
        let mut header = self.base_header(scope, internal.clone(), simple.clone(), decl.span);
        header.flags = decl.flags;
        if !decl.type_parameters.is_empty() {
            header.flags |= CommonFlags::GENERIC;
        }
        header.decorator_flags = decorator_flags;
        let element = ClassPrototypeElement {
            header,
            declaration: Rc::new(decl.clone()),
            is_interface: false,
            instance_member_prototypes: Default::default(),
            static_members: Default::default(),
            base_prototype: None,
            constructor_prototype: None,
            operator_overload_prototypes: Default::default(),
            instances: Default::default(),
            source_path: path.to_string(),
        };
        let (id, _) = self.declare(internal, Element::ClassPrototype(element));
        let owner_name = internal_name(self.graph.get(id));
        for member in &decl.members {
            self.declare_member(&owner_name, id, member);
        }
        if decl.extends_type.is_some() || !decl.implements_types.is_empty() {
            self.queued_extends.push(QueuedExtend { derived: id, path: path.to_string() });
        }
        self.promote(scope, is_entry, is_library, &simple, id, decl.flags, decorator_flags, decl.span);
        (simple, id)
    }

    fn declare_interface(
        &mut self,
        path: &str,
        is_entry: bool,
        is_library: bool,
        scope: &Scope,
        decl: &InterfaceDecl,
    ) -> (String, ElementId) {
        let simple = self.resolve(decl.name);
        let internal = scope.internal_name_for(&simple);
        let decorator_flags = self.classify_decorators(&decl.decorators, DecoratorTarget::Interface);
        let mut header = self.base_header(scope, internal.clone(), simple.clone(), decl.span);
        header.flags = decl.flags;
        header.decorator_flags = decorator_flags;
        let element = ClassPrototypeElement {
            header,
            declaration: Rc::new(ClassDecl {
                span: decl.span,
                name: decl.name,
                type_parameters: decl.type_parameters.clone(),
                extends_type: decl.extends_type.clone(),
                implements_types: Vec::new(),
                members: decl.members.clone(),
                flags: decl.flags,
                decorators: decl.decorators.clone(),
            }),
            is_interface: true,
            instance_member_prototypes: Default::default(),
            static_members: Default::default(),
            base_prototype: None,
            constructor_prototype: None,
            operator_overload_prototypes: Default::default(),
            instances: Default::default(),
            source_path: path.to_string(),
        };
        let (id, _) = self.declare(internal, Element::InterfacePrototype(element));
        let owner_name = internal_name(self.graph.get(id));
        for member in &decl.members {
            self.declare_member(&owner_name, id, member);
        }
        if decl.extends_type.is_some() {
            self.queued_extends.push(QueuedExtend { derived: id, path: path.to_string() });
        }
        self.promote(scope, is_entry, is_library, &simple, id, decl.flags, decorator_flags, decl.span);
        (simple, id)
    }

    fn declare_member(&mut self, owner_internal_name: &str, owner: ElementId, member: &glyph_ast::ClassMember) {
        match member {
            glyph_ast::ClassMember::Field(field) => self.declare_field(owner_internal_name, owner, field),
            glyph_ast::ClassMember::Method(method) => self.declare_method(owner_internal_name, owner, method),
        }
    }

    fn declare_field(&mut self, owner_internal_name: &str, owner: ElementId, field: &FieldDecl) {
        let simple = self.resolve(field.name);
        let internal = glyph_graph::names::instance_member(owner_internal_name, &simple);
        let mut header = ElementHeader::new(internal.clone(), simple.clone(), field.span);
        header.flags = field.flags;
        header.namespace = Some(owner);
        let element = FieldPrototypeElement { header, declaration: Rc::new(field.clone()), parent: owner };
        let (id, is_new) = self.declare(internal, Element::FieldPrototype(element));
        if is_new {
            if let Some(proto) = self.graph.get_mut(owner).as_class_prototype_mut() {
                proto.instance_member_prototypes.insert(simple, id);
            }
        }
    }

    fn declare_method(&mut self, owner_internal_name: &str, owner: ElementId, method: &MethodDecl) {
        let simple = self.resolve(method.name);
        match method.kind {
            MethodKind::Get => self.declare_accessor(owner_internal_name, owner, method, &simple, true),
            MethodKind::Set => self.declare_accessor(owner_internal_name, owner, method, &simple, false),
            MethodKind::Constructor => {
                let internal = glyph_graph::names::instance_member(owner_internal_name, "constructor");
                let decorator_flags = self.classify_decorators(&method.decorators, DecoratorTarget::Method);
                let mut header = ElementHeader::new(internal.clone(), "constructor".to_string(), method.span);
                header.flags = method.flags | CommonFlags::CONSTRUCTOR;
                header.decorator_flags = decorator_flags;
                header.namespace = Some(owner);
                let source_path = self.graph.get(owner).as_class_prototype().unwrap().source_path.clone();
                let element = FunctionPrototypeElement {
                    header,
                    declaration: FunctionDeclRef::Method(Rc::new(method.clone())),
                    owning_class: Some(owner),
                    operator_kind: None,
                    instances: Default::default(),
                    class_type_arguments: None,
                    source_path,
                };
                let (id, _) = self.declare(internal, Element::FunctionPrototype(element));
                let already_has_one = self.graph.get(owner).as_class_prototype().unwrap().constructor_prototype.is_some();
                if already_has_one {
                    self.report(method.span, codes::DUPLICATE_CONSTRUCTOR, "A class may only have one constructor implementation.");
                } else if let Some(proto) = self.graph.get_mut(owner).as_class_prototype_mut() {
                    proto.constructor_prototype = Some(id);
                }
            }
            MethodKind::Normal => {
                let internal = if method.is_static {
                    glyph_graph::names::static_member(owner_internal_name, &simple)
                } else {
                    glyph_graph::names::instance_member(owner_internal_name, &simple)
                };
                let decorator_flags = self.classify_decorators(&method.decorators, DecoratorTarget::Method);
                let mut header = ElementHeader::new(internal.clone(), simple.clone(), method.span);
                header.flags = method.flags;
                if method.is_static {
                    header.flags |= CommonFlags::STATIC;
                }
                header.decorator_flags = decorator_flags;
                header.namespace = Some(owner);
                let source_path = self.graph.get(owner).as_class_prototype().unwrap().source_path.clone();
                let element = FunctionPrototypeElement {
                    header,
                    declaration: FunctionDeclRef::Method(Rc::new(method.clone())),
                    owning_class: Some(owner),
                    operator_kind: None,
                    instances: Default::default(),
                    class_type_arguments: None,
                    source_path,
                };
                let (id, is_new) = self.declare(internal, Element::FunctionPrototype(element));
                if is_new {
                    if let Some(proto) = self.graph.get_mut(owner).as_class_prototype_mut() {
                        if method.is_static {
                            proto.static_members.insert(simple, id);
                        } else {
                            proto.instance_member_prototypes.insert(simple, id);
                        }
                    }
                }
                for deco in &method.decorators {
                    if deco.kind == DecoratorKind::Operator {
                        self.handle_operator(owner, id, deco);
                    }
                }
            }
        }
    }

    /// Joins a getter/setter under one Property keyed by the plain property
    /// name (§4.1 step 4, I9).
    fn declare_accessor(&mut self, owner_internal_name: &str, owner: ElementId, method: &MethodDecl, simple: &str, is_getter: bool) {
        let base = if is_getter { glyph_graph::names::getter_base(simple) } else { glyph_graph::names::setter_base(simple) };
        let accessor_internal = glyph_graph::names::instance_member(owner_internal_name, &base);
        let decorator_flags = self.classify_decorators(&method.decorators, DecoratorTarget::Method);
        let mut header = ElementHeader::new(accessor_internal.clone(), base, method.span);
        header.flags = method.flags | if is_getter { CommonFlags::GET } else { CommonFlags::SET };
        header.decorator_flags = decorator_flags;
        header.namespace = Some(owner);
        let source_path = self.graph.get(owner).as_class_prototype().unwrap().source_path.clone();
        let element = FunctionPrototypeElement {
            header,
            declaration: FunctionDeclRef::Method(Rc::new(method.clone())),
            owning_class: Some(owner),
            operator_kind: None,
            instances: Default::default(),
            class_type_arguments: None,
            source_path,
        };
        let (function_id, _) = self.declare(accessor_internal, Element::FunctionPrototype(element));

        let existing = self.graph.get(owner).as_class_prototype().unwrap().instance_member_prototypes.get(simple).copied();
        let member_id = match existing {
            Some(id) => id,
            None => {
                let id = self.graph.arena.insert(Element::Property(PropertyElement::default()));
                if let Some(proto) = self.graph.get_mut(owner).as_class_prototype_mut() {
                    proto.instance_member_prototypes.insert(simple.to_string(), id);
                }
                id
            }
        };
        match self.graph.get_mut(member_id) {
            Element::Property(property) => {
                if property.header.is_none() {
                    property.header = Some(ElementHeader::new(
                        glyph_graph::names::instance_member(owner_internal_name, simple),
                        simple.to_string(),
                        method.span,
                    ));
                    property.parent = Some(owner);
                }
                let slot = if is_getter { &mut property.getter_prototype } else { &mut property.setter_prototype };
                if slot.is_some() {
                    self.report(method.span, codes::DUPLICATE_IDENTIFIER, format!("Duplicate identifier '{simple}'."));
                } else {
                    *slot = Some(function_id);
                }
            }
            _ => {
                self.report(method.span, codes::DUPLICATE_IDENTIFIER, format!("Duplicate identifier '{simple}'."));
            }
        }
    }

    /// `@operator("<symbol>")` (§4.1 step 5).
    fn handle_operator(&mut self, owner: ElementId, function_id: ElementId, deco: &Decorator) {
        let Some(arg) = deco.arguments.first() else {
            self.report(deco.span, codes::STRING_LITERAL_EXPECTED, "Operator decorator requires a string literal argument.");
            return;
        };
        let Expr::StringLiteral(literal) = arg.strip_parens() else {
            self.report(deco.span, codes::STRING_LITERAL_EXPECTED, "Operator decorator requires a string literal argument.");
            return;
        };
        let Some(kind) = OperatorKind::from_symbol(&literal.value) else {
            self.report(deco.span, codes::OPERATION_NOT_SUPPORTED, format!("Operator '{}' is not supported.", literal.value));
            return;
        };
        let collides = self
            .graph
            .get(owner)
            .as_class_prototype()
            .map(|proto| proto.operator_overload_prototypes.contains_key(&kind))
            .unwrap_or(false);
        if collides {
            self.report(deco.span, codes::DUPLICATE_FUNCTION_IMPLEMENTATION, "Duplicate function implementation.");
            return;
        }
        if let Some(proto) = self.graph.get_mut(owner).as_class_prototype_mut() {
            proto.operator_overload_prototypes.insert(kind, function_id);
        }
        if let Element::FunctionPrototype(f) = self.graph.get_mut(function_id) {
            f.operator_kind = Some(kind);
        }
    }

    fn declare_function(
        &mut self,
        path: &str,
        is_entry: bool,
        is_library: bool,
        scope: &Scope,
        decl: &FunctionDecl,
    ) -> (String, ElementId) {
        let simple = self.resolve(decl.name);
        let internal = scope.internal_name_for(&simple);
        let decorator_flags = self.classify_decorators(&decl.decorators, DecoratorTarget::Function);
        let mut header = self.base_header(scope, internal.clone(), simple.clone(), decl.span);
        header.flags = decl.flags;
        header.decorator_flags = decorator_flags;
        let element = FunctionPrototypeElement {
            header,
            declaration: FunctionDeclRef::Function(Rc::new(decl.clone())),
            owning_class: None,
            operator_kind: None,
            instances: Default::default(),
            class_type_arguments: None,
            source_path: path.to_string(),
        };
        let (id, _) = self.declare(internal, Element::FunctionPrototype(element));
        self.promote(scope, is_entry, is_library, &simple, id, decl.flags, decorator_flags, decl.span);
        (simple, id)
    }

    fn declare_enum(
        &mut self,
        _path: &str,
        is_entry: bool,
        is_library: bool,
        scope: &Scope,
        decl: &EnumDecl,
    ) -> (String, ElementId) {
        let simple = self.resolve(decl.name);
        let internal = scope.internal_name_for(&simple);
        let header = self.base_header(scope, internal.clone(), simple.clone(), decl.span);
        let element = EnumElement { header, declaration: Rc::new(decl.clone()), values: Default::default() };
        let (id, _) = self.declare(internal.clone(), Element::Enum(element));

        let mut next_value = 0i64;
        for value_decl in &decl.values {
            let value_simple = self.resolve(value_decl.name);
            let value_internal = glyph_graph::names::static_member(&internal, &value_simple);
            let value = match &value_decl.initializer {
                Some(Expr::NumericLiteral(n)) => {
                    let v = n.value as i64;
                    next_value = v + 1;
                    Some(v)
                }
                Some(_) => None,
                None => {
                    let v = next_value;
                    next_value += 1;
                    Some(v)
                }
            };
            let value_header = ElementHeader::new(value_internal.clone(), value_simple.clone(), value_decl.span);
            let value_element = EnumValueElement { header: value_header, parent_enum: id, value };
            let (value_id, _) = self.declare(value_internal, Element::EnumValue(value_element));
            if let Element::Enum(en) = self.graph.get_mut(id) {
                en.values.insert(value_simple, value_id);
            }
        }
        self.promote(scope, is_entry, is_library, &simple, id, decl.flags, DecoratorFlags::empty(), decl.span);
        (simple, id)
    }

    /// Namespace merging (§4.1 step 6).
    fn declare_namespace(
        &mut self,
        path: &str,
        is_entry: bool,
        is_library: bool,
        scope: &Scope,
        decl: &NamespaceDecl,
    ) -> (String, ElementId) {
        let simple = self.resolve(decl.name);
        let internal = scope.internal_name_for(&simple);
        let id = match self.graph.lookup(&internal) {
            Some(existing) => {
                let previously_exported = self.graph.get(existing).header().unwrap().flags.contains(CommonFlags::EXPORT);
                let now_exported = decl.flags.contains(CommonFlags::EXPORT);
                if previously_exported != now_exported {
                    self.report(
                        decl.span,
                        codes::MERGED_DECLARATION_EXPORT_MISMATCH,
                        "Individual declarations in merged declaration must be all exported or all local.",
                    );
                }
                existing
            }
            None => {
                let header = self.base_header(scope, internal.clone(), simple.clone(), decl.span);
                let element = NamespaceElement { header, members: Default::default() };
                self.declare(internal.clone(), Element::Namespace(element)).0
            }
        };

        let child_scope = Scope::Namespace { id, internal_name: internal.clone() };
        for stmt in &decl.statements {
            let declared = self.init_statement(path, is_entry, is_library, &child_scope, stmt);
            if let Element::Namespace(ns) = self.graph.get_mut(id) {
                for (member_simple, member_id) in declared {
                    ns.members.insert(member_simple, member_id);
                }
            }
        }
        self.promote(scope, is_entry, is_library, &simple, id, decl.flags, DecoratorFlags::empty(), decl.span);
        (simple, id)
    }

    fn declare_type_alias(&mut self, scope: &Scope, decl: &TypeAliasDecl) {
        if matches!(scope, Scope::Namespace { .. }) {
            // Namespaced type aliases: undecided whether to support (§9 Open
            // Questions); rejected rather than silently resolved.
            self.report(decl.span, codes::OPERATION_NOT_SUPPORTED, "Type aliases nested in a namespace are not supported.");
            return;
        }
        let simple = self.resolve(decl.name);
        let info = TypeAliasInfo {
            type_parameters: decl.type_parameters.clone(),
            ty: decl.ty.clone(),
            span: decl.span,
        };
        self.graph.declare_type_alias(simple, info, self.sink);
    }

    fn declare_variables(
        &mut self,
        _path: &str,
        is_entry: bool,
        is_library: bool,
        scope: &Scope,
        decl: &VariableDecl,
    ) -> Vec<(String, ElementId)> {
        let mut declared = Vec::new();
        for declarator in &decl.declarations {
            let simple = self.resolve(declarator.name);
            let internal = scope.internal_name_for(&simple);
            let header = self.base_header(scope, internal.clone(), simple.clone(), declarator.span);
            let constant_value = if decl.flags.contains(CommonFlags::CONST) {
                match &declarator.initializer {
                    Some(Expr::NumericLiteral(n)) => Some(n.value),
                    _ => None,
                }
            } else {
                None
            };
            let element = GlobalElement { header, ty: None, constant_value };
            let (id, _) = self.declare(internal, Element::Global(element));
            self.promote(scope, is_entry, is_library, &simple, id, decl.flags, DecoratorFlags::empty(), declarator.span);
            declared.push((simple, id));
        }
        declared
    }

    fn queue_import(&mut self, _path: &str, scope: &Scope, decl: &ImportDecl) {
        if decl.namespace_name.is_some() {
            // `import * as N`: unimplemented (§9 Open Questions).
            self.report(decl.span, codes::OPERATION_NOT_SUPPORTED, "Namespace-style imports are not supported.");
            return;
        }
        let import_path = self.resolve(decl.internal_path);
        for binding in &decl.declarations {
            let name = self.resolve(binding.name);
            let external_name = self.resolve(binding.external_name);
            let importing_name = scope.internal_name_for(&name);
            self.queued_imports.push(QueuedImport {
                importing_name,
                import_path: import_path.clone(),
                external_name,
                span: binding.span,
            });
        }
    }

    fn handle_export(&mut self, path: &str, is_entry: bool, decl: &ExportDecl) {
        for member in &decl.members {
            let name = self.resolve(member.name);
            let external_name = self.resolve(member.external_name);
            match &decl.internal_path {
                Some(source_path_atom) => {
                    let source_path = self.resolve(*source_path_atom);
                    self.queued_exports.push(QueuedExport {
                        exporting_file: path.to_string(),
                        local_name: None,
                        exported_name: name,
                        external_name,
                        source_path: Some(source_path),
                        span: member.span,
                        is_entry,
                    });
                }
                None => {
                    let local_internal = glyph_graph::names::file_level(path, &name);
                    match self.graph.lookup(&local_internal) {
                        Some(id) => self.promote_export(path, &external_name, id, is_entry, member.span),
                        None => self.queued_exports.push(QueuedExport {
                            exporting_file: path.to_string(),
                            local_name: Some(name.clone()),
                            exported_name: name,
                            external_name,
                            source_path: None,
                            span: member.span,
                            is_entry,
                        }),
                    }
                }
            }
        }
    }

    fn drain_exports(&mut self) {
        let mut remaining = std::mem::take(&mut self.queued_exports);
        loop {
            let mut next_remaining = Vec::new();
            let mut progressed = false;
            for export in remaining {
                let target = match &export.source_path {
                    Some(source_path) => self
                        .graph
                        .file_level_export(source_path, &export.exported_name)
                        .or_else(|| {
                            let alt = glyph_ast::SourceFile::index_alternative(source_path);
                            self.graph.file_level_export(&alt, &export.exported_name)
                        }),
                    None => {
                        let local_internal = glyph_graph::names::file_level(&export.exporting_file, export.local_name.as_ref().unwrap());
                        self.graph.lookup(&local_internal)
                    }
                };
                match target {
                    Some(id) => {
                        self.promote_export(&export.exporting_file, &export.external_name, id, export.is_entry, export.span);
                        progressed = true;
                    }
                    None => next_remaining.push(export),
                }
            }
            if next_remaining.is_empty() || !progressed {
                for export in &next_remaining {
                    if export.source_path.is_some() {
                        self.report(
                            export.span,
                            codes::NO_EXPORTED_MEMBER,
                            format!("Module has no exported member '{}'.", export.exported_name),
                        );
                    } else {
                        self.report(export.span, codes::CANNOT_FIND_NAME, format!("Cannot find name '{}'.", export.exported_name));
                    }
                }
                break;
            }
            remaining = next_remaining;
        }
    }

    fn drain_imports(&mut self) {
        let imports = std::mem::take(&mut self.queued_imports);
        for import in imports {
            let target = self.graph.file_level_export(&import.import_path, &import.external_name).or_else(|| {
                let alt = glyph_ast::SourceFile::index_alternative(&import.import_path);
                self.graph.file_level_export(&alt, &import.external_name)
            });
            match target {
                Some(id) => self.graph.bind_alias(import.importing_name, id, self.sink, import.span),
                None => self.report(
                    import.span,
                    codes::NO_EXPORTED_MEMBER,
                    format!("Module '{}' has no exported member '{}'.", import.import_path, import.external_name),
                ),
            }
        }
    }

    /// Resolves `extends`/`implements` for every queued prototype (§4.1 step
    /// 9, drain "Extends").
    fn drain_extends(&mut self) {
        let queued = std::mem::take(&mut self.queued_extends);
        for entry in queued {
            let (extends_type, implements_types, derived_unmanaged) = {
                let proto = self.graph.get(entry.derived).as_class_prototype().unwrap();
                (proto.declaration.extends_type.clone(), proto.declaration.implements_types.clone(), proto.header.decorator_flags.contains(DecoratorFlags::UNMANAGED))
            };

            if let Some(extends) = &extends_type {
                if let Some(name_atom) = named_type_name_atom(extends) {
                    let simple = self.resolve(name_atom);
                    match self.resolve_simple_type_name(&entry.path, &simple) {
                        Some(base_id) if self.graph.get(base_id).is_class_like() => {
                            let base_sealed = self.graph.get(base_id).header().unwrap().decorator_flags.contains(DecoratorFlags::SEALED);
                            let base_unmanaged = self.graph.get(base_id).header().unwrap().decorator_flags.contains(DecoratorFlags::UNMANAGED);
                            if base_sealed {
                                self.report(extends.span(), codes::SEALED_CLASS_EXTENDED, format!("Class '{simple}' is sealed and cannot be extended."));
                            } else if base_unmanaged != derived_unmanaged {
                                self.report(
                                    extends.span(),
                                    codes::UNMANAGED_MANAGED_MIX,
                                    "Unmanaged classes cannot extend managed classes and vice versa.",
                                );
                            } else if let Some(proto) = self.graph.get_mut(entry.derived).as_class_prototype_mut() {
                                proto.base_prototype = Some(base_id);
                            }
                        }
                        Some(_) => {
                            self.report(extends.span(), codes::EXTENDS_NON_CLASS, "A class may only extend another class.");
                        }
                        None => {
                            self.report(extends.span(), codes::CANNOT_FIND_NAME, format!("Cannot find name '{simple}'."));
                        }
                    }
                }
            }

            if !implements_types.is_empty() && derived_unmanaged {
                self.report(
                    implements_types[0].span(),
                    codes::UNMANAGED_IMPLEMENTS_INTERFACE,
                    "Unmanaged classes cannot implement interfaces.",
                );
            }
        }
    }

    fn resolve_simple_type_name(&self, path: &str, simple: &str) -> Option<ElementId> {
        let local = glyph_graph::names::file_level(path, simple);
        self.graph.lookup(&local).or_else(|| self.graph.lookup(simple))
    }

    fn drain_global_aliases(&mut self) {
        for (alias, name) in self.global_aliases.clone() {
            if let Some(id) = self.graph.lookup(&name) {
                self.graph.bind_alias(alias, id, self.sink, Span::dummy());
            }
        }
    }

    /// Stashes `Array`/`ArrayBufferView`/`String` prototype handles (§4.1
    /// drain "Well-known prototypes"). Actually resolving `String` into an
    /// instance is deferred to the resolver, which is the only component
    /// downstream of both this graph and the type table.
    fn stash_well_known_prototypes(&mut self) {
        let mut array = None;
        let mut array_buffer_view = None;
        let mut string = None;
        for (id, element) in self.graph.iter() {
            if let Element::ClassPrototype(c) = element {
                match c.header.simple_name.as_str() {
                    "Array" => array = Some(id),
                    "ArrayBufferView" => array_buffer_view = Some(id),
                    "String" => string = Some(id),
                    _ => {}
                }
            }
        }
        self.graph.well_known.array = array;
        self.graph.well_known.array_buffer_view = array_buffer_view;
        self.graph.well_known.string = string;
    }
}

fn internal_name(element: &Element) -> String {
    element.internal_name().unwrap_or_default().to_string()
}

fn named_type_name_atom(node: &TypeNode) -> Option<Atom> {
    match node {
        TypeNode::Named(n) => Some(n.name),
        TypeNode::Function(_) => None,
    }
}
