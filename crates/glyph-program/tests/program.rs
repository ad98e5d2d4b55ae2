//! Integration tests: real AST fixtures run end-to-end through `Program`,
//! exercising the Initializer/Resolver pipeline plus the aggregate's own
//! overload/assignability queries.

use glyph_ast::{
    ClassDecl, ClassMember, Decorator, DecoratorKind, ExportDecl, ExportMember, FieldDecl, ImportDecl, ImportDeclaration,
    MethodDecl, MethodKind, NamedTypeNode, NamespaceDecl, SourceFile, Statement, StringLiteralExpr, TypeNode,
};
use glyph_common::{diagnostic::codes, CommonFlags, Interner, Span};
use glyph_program::{Program, ProgramOptions, ResolveContext};
use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;

fn signature(parameters: Vec<glyph_ast::ParameterNode>, return_type: Option<TypeNode>) -> glyph_ast::Signature {
    glyph_ast::Signature { span: Span::dummy(), type_parameters: Vec::new(), this_type: None, parameters, return_type }
}

fn empty_class(interner: &Interner, name: &str, decorators: Vec<Decorator>) -> ClassDecl {
    ClassDecl {
        span: Span::dummy(),
        name: interner.intern(name),
        type_parameters: Vec::new(),
        extends_type: None,
        implements_types: Vec::new(),
        members: Vec::new(),
        flags: CommonFlags::empty(),
        decorators,
    }
}

#[test]
fn well_known_string_prototype_registers_the_string_type() {
    let mut program = Program::new(ProgramOptions::new());
    let string_decl = empty_class(&program.interner, "String", Vec::new());
    let mut source = SourceFile::new("~lib/string", true, false);
    source.statements = vec![Statement::Class(string_decl)];

    program.initialize(&[source]);

    assert!(!program.has_errors());
    let string_ty = program.types.string.expect("String prototype resolves into the well-known string type");
    assert!(program.types.get(string_ty).is_class());
    assert_eq!(program.types.lookup_by_name("string"), Some(string_ty));
}

#[test]
fn cross_file_import_binds_to_the_exporting_class_and_promotes_module_export() {
    let mut program = Program::new(ProgramOptions::new());
    let greeter_name = program.interner.intern("Greeter");

    let greeter_decl = empty_class(&program.interner, "Greeter", Vec::new());
    let export_decl = ExportDecl {
        span: Span::dummy(),
        members: vec![ExportMember { span: Span::dummy(), name: greeter_name, external_name: greeter_name }],
        internal_path: None,
    };
    let mut exporting_file = SourceFile::new("a", false, true);
    exporting_file.statements = vec![Statement::Class(greeter_decl), Statement::Export(export_decl)];

    let import_decl = ImportDecl {
        span: Span::dummy(),
        declarations: vec![ImportDeclaration { span: Span::dummy(), name: greeter_name, external_name: greeter_name }],
        namespace_name: None,
        internal_path: program.interner.intern("a"),
    };
    let mut importing_file = SourceFile::new("b", false, false);
    importing_file.statements = vec![Statement::Import(import_decl)];

    program.initialize(&[exporting_file, importing_file]);

    assert!(!program.has_errors());
    let original = program.graph.lookup("a/Greeter").expect("Greeter prototype declared in a");
    let imported = program.graph.lookup("b/Greeter").expect("import binds an alias in b");
    assert_eq!(original, imported);

    // P6: the exporting file is an entry, so the export is also promoted to
    // module scope and flagged as such.
    assert_eq!(program.graph.module_level_export("Greeter"), Some(original));
    let flags = program.graph.get(original).header().unwrap().flags;
    assert!(flags.contains(CommonFlags::MODULE_EXPORT));
}

#[test]
fn sealed_class_cannot_be_extended() {
    let mut program = Program::new(ProgramOptions::new());
    let sealed_deco =
        Decorator { span: Span::dummy(), name: program.interner.intern("sealed"), kind: DecoratorKind::Sealed, arguments: Vec::new() };
    let base_decl = empty_class(&program.interner, "Base", vec![sealed_deco]);

    let mut derived_decl = empty_class(&program.interner, "Derived", Vec::new());
    derived_decl.extends_type =
        Some(TypeNode::Named(NamedTypeNode { span: Span::dummy(), name: program.interner.intern("Base"), type_arguments: Vec::new() }));

    let mut source = SourceFile::new("a", false, true);
    source.statements = vec![Statement::Class(base_decl), Statement::Class(derived_decl)];

    program.initialize(&[source]);

    assert!(program.has_errors());
    assert!(program.sink.diagnostics().iter().any(|d| d.code == codes::SEALED_CLASS_EXTENDED));

    let derived = program.graph.lookup("a/Derived").expect("Derived prototype declared");
    assert_eq!(program.graph.get(derived).as_class_prototype().unwrap().base_prototype, None);
}

#[test]
fn duplicate_operator_overload_keeps_the_first_and_reports_a_duplicate() {
    let mut program = Program::new(ProgramOptions::new());
    let op_deco = |interner: &Interner| Decorator {
        span: Span::dummy(),
        name: interner.intern("operator"),
        kind: DecoratorKind::Operator,
        arguments: vec![glyph_ast::Expr::StringLiteral(StringLiteralExpr { span: Span::dummy(), value: "+".to_string() })],
    };
    let add_one = MethodDecl {
        span: Span::dummy(),
        name: program.interner.intern("opAddA"),
        signature: signature(Vec::new(), None),
        body: None,
        flags: CommonFlags::empty(),
        decorators: vec![op_deco(&program.interner)],
        kind: MethodKind::Normal,
        is_static: false,
    };
    let add_two = MethodDecl {
        span: Span::dummy(),
        name: program.interner.intern("opAddB"),
        signature: signature(Vec::new(), None),
        body: None,
        flags: CommonFlags::empty(),
        decorators: vec![op_deco(&program.interner)],
        kind: MethodKind::Normal,
        is_static: false,
    };
    let mut class_decl = empty_class(&program.interner, "Vector", Vec::new());
    class_decl.members = vec![ClassMember::Method(add_one), ClassMember::Method(add_two)];

    let mut source = SourceFile::new("a", false, true);
    source.statements = vec![Statement::Class(class_decl)];

    program.initialize(&[source]);

    assert!(program.sink.diagnostics().iter().any(|d| d.code == codes::DUPLICATE_FUNCTION_IMPLEMENTATION));

    let proto = program.graph.lookup("a/Vector").expect("Vector prototype declared");
    let overload = *program.graph.get(proto).as_class_prototype().unwrap().operator_overload_prototypes.get(&glyph_graph::OperatorKind::Add).unwrap();
    let first = program.graph.lookup("a/Vector#opAddA").expect("first overload declared");
    assert_eq!(overload, first);
}

#[test]
fn merged_namespace_declarations_combine_members_and_flag_export_mismatch() {
    let mut program = Program::new(ProgramOptions::new());
    let first_ns = NamespaceDecl {
        span: Span::dummy(),
        name: program.interner.intern("Ns"),
        statements: vec![Statement::Class(empty_class(&program.interner, "First", Vec::new()))],
        flags: CommonFlags::EXPORT,
    };
    let second_ns = NamespaceDecl {
        span: Span::dummy(),
        name: program.interner.intern("Ns"),
        statements: vec![Statement::Class(empty_class(&program.interner, "Second", Vec::new()))],
        flags: CommonFlags::empty(),
    };
    let mut source = SourceFile::new("a", false, true);
    source.statements = vec![Statement::Namespace(first_ns), Statement::Namespace(second_ns)];

    program.initialize(&[source]);

    assert!(program.sink.diagnostics().iter().any(|d| d.code == codes::MERGED_DECLARATION_EXPORT_MISMATCH));

    let ns_id = program.graph.lookup("a/Ns").expect("Ns merges into a single namespace element");
    let ns = program.graph.get(ns_id).as_namespace().unwrap();
    assert_eq!(ns.members.len(), 2);
    assert!(ns.members.contains_key("First"));
    assert!(ns.members.contains_key("Second"));
}

#[test]
fn resolve_type_reports_cannot_find_name_for_an_unknown_type() {
    let mut program = Program::new(ProgramOptions::new());
    program.initialize(&[SourceFile::new("a", false, true)]);

    let missing = TypeNode::Named(NamedTypeNode { span: Span::dummy(), name: program.interner.intern("Missing"), type_arguments: Vec::new() });
    let contextual = FxHashMap::default();
    let ctx = ResolveContext::new("a", &contextual);

    let result = program.resolve_type(&missing, &ctx, true);

    assert!(result.is_none());
    assert_eq!(program.sink.diagnostics().last().unwrap().code, codes::CANNOT_FIND_NAME);
}

#[test]
fn lookup_overload_and_assignability_follow_a_resolved_base_chain() {
    let mut program = Program::new(ProgramOptions::new());
    let op_deco = Decorator {
        span: Span::dummy(),
        name: program.interner.intern("operator"),
        kind: DecoratorKind::Operator,
        arguments: vec![glyph_ast::Expr::StringLiteral(StringLiteralExpr { span: Span::dummy(), value: "+".to_string() })],
    };
    let add_method = MethodDecl {
        span: Span::dummy(),
        name: program.interner.intern("opAdd"),
        signature: signature(Vec::new(), None),
        body: None,
        flags: CommonFlags::empty(),
        decorators: vec![op_deco],
        kind: MethodKind::Normal,
        is_static: false,
    };
    let mut base_decl = empty_class(&program.interner, "Base", Vec::new());
    base_decl.members = vec![ClassMember::Method(add_method)];

    let mut derived_decl = empty_class(&program.interner, "Derived", Vec::new());
    derived_decl.extends_type =
        Some(TypeNode::Named(NamedTypeNode { span: Span::dummy(), name: program.interner.intern("Base"), type_arguments: Vec::new() }));

    let mut source = SourceFile::new("a", false, true);
    source.statements = vec![Statement::Class(base_decl), Statement::Class(derived_decl)];
    program.initialize(&[source]);
    assert!(!program.has_errors());

    let base_proto = program.graph.lookup("a/Base").unwrap();
    let derived_proto = program.graph.lookup("a/Derived").unwrap();
    let empty = FxHashMap::default();
    let base_id = program.resolve_class(base_proto, &[], &empty, Span::dummy()).unwrap();
    let derived_id = program.resolve_class(derived_proto, &[], &empty, Span::dummy()).unwrap();

    let add_fn = program.graph.lookup("a/Base#opAdd").unwrap();
    // The derived class never copies the base's overload into its own map
    // (see `glyph-resolve`'s class resolution), so the lookup must walk up.
    assert_eq!(program.lookup_overload(derived_id, glyph_graph::OperatorKind::Add), Some(add_fn));

    let base_ty = program.graph.get(base_id).as_class().unwrap().ty;
    let derived_ty = program.graph.get(derived_id).as_class().unwrap().ty;
    assert!(program.is_assignable_to(derived_ty, base_ty));
    assert!(!program.is_assignable_to(base_ty, derived_ty));
}
