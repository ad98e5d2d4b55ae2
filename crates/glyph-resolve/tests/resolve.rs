//! Integration tests: real AST fixtures through `Initializer`, then exercised
//! through `Resolver`'s public entry points.

use glyph_ast::{
    ClassDecl, ClassMember, Expr, FieldDecl, FunctionDecl, MethodDecl, MethodKind, NamedTypeNode, ParameterNode,
    PropertyAccessExpr, SourceFile, Statement, TypeNode,
};
use glyph_common::{Atom, CommonFlags, DiagnosticSink, Interner, Span, VecSink};
use glyph_flow::FlowTracker;
use glyph_graph::ElementGraph;
use glyph_init::Initializer;
use glyph_resolve::{ResolveContext, Resolver};
use glyph_types::{PointerWidth, TypeTable};
use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;

fn named(interner: &Interner, name: &str) -> TypeNode {
    named_with_args(interner, name, Vec::new())
}

fn named_with_args(interner: &Interner, name: &str, type_arguments: Vec<TypeNode>) -> TypeNode {
    TypeNode::Named(NamedTypeNode { span: Span::dummy(), name: interner.intern(name), type_arguments })
}

fn param(interner: &Interner, name: &str, ty: TypeNode) -> ParameterNode {
    ParameterNode { span: Span::dummy(), name: interner.intern(name), ty, has_default: false, is_rest: false }
}

fn signature(
    type_parameters: Vec<Atom>,
    parameters: Vec<ParameterNode>,
    return_type: Option<TypeNode>,
) -> glyph_ast::Signature {
    glyph_ast::Signature { span: Span::dummy(), type_parameters, this_type: None, parameters, return_type }
}

/// Owns every piece `Resolver::new` borrows, so tests can build one and
/// reborrow a fresh `Resolver` per call.
struct Harness {
    interner: Interner,
    graph: ElementGraph,
    types: TypeTable,
    flow: FlowTracker,
    sink: VecSink,
}

impl Harness {
    fn new() -> Self {
        Self {
            interner: Interner::new(),
            graph: ElementGraph::new(),
            types: TypeTable::new(PointerWidth::Bits32, PointerWidth::Bits32),
            flow: FlowTracker::new(),
            sink: VecSink::new(100),
        }
    }

    fn init(&mut self, sources: &[SourceFile]) {
        let mut initializer = Initializer::new(&mut self.graph, &self.interner, &mut self.sink, FxHashMap::default());
        initializer.run(sources);
    }

    fn resolver(&mut self) -> Resolver<'_> {
        Resolver::new(&mut self.graph, &mut self.types, &mut self.flow, &self.interner, &mut self.sink)
    }
}

/// A generic `Box<T>` with a `value: T` field, a one-argument constructor,
/// and a `get(): T` accessor method, plus a non-generic `Pair` with fields of
/// different byte sizes to exercise field-layout alignment.
fn class_fixture_source(interner: &Interner) -> SourceFile {
    let value_field = FieldDecl {
        span: Span::dummy(),
        name: interner.intern("value"),
        ty: Some(named(interner, "T")),
        initializer: None,
        flags: CommonFlags::empty(),
    };
    let constructor = MethodDecl {
        span: Span::dummy(),
        name: interner.intern("constructor"),
        signature: signature(Vec::new(), vec![param(interner, "v", named(interner, "T"))], None),
        body: None,
        flags: CommonFlags::empty(),
        decorators: Vec::new(),
        kind: MethodKind::Constructor,
        is_static: false,
    };
    let get_method = MethodDecl {
        span: Span::dummy(),
        name: interner.intern("get"),
        signature: signature(Vec::new(), Vec::new(), Some(named(interner, "T"))),
        body: None,
        flags: CommonFlags::empty(),
        decorators: Vec::new(),
        kind: MethodKind::Normal,
        is_static: false,
    };
    let box_decl = ClassDecl {
        span: Span::dummy(),
        name: interner.intern("Box"),
        type_parameters: vec![interner.intern("T")],
        extends_type: None,
        implements_types: Vec::new(),
        members: vec![ClassMember::Field(value_field), ClassMember::Method(constructor), ClassMember::Method(get_method)],
        flags: CommonFlags::empty(),
        decorators: Vec::new(),
    };

    let field_a = FieldDecl {
        span: Span::dummy(),
        name: interner.intern("a"),
        ty: Some(named(interner, "i8")),
        initializer: None,
        flags: CommonFlags::empty(),
    };
    let field_b = FieldDecl {
        span: Span::dummy(),
        name: interner.intern("b"),
        ty: Some(named(interner, "i32")),
        initializer: None,
        flags: CommonFlags::empty(),
    };
    let pair_decl = ClassDecl {
        span: Span::dummy(),
        name: interner.intern("Pair"),
        type_parameters: Vec::new(),
        extends_type: None,
        implements_types: Vec::new(),
        members: vec![ClassMember::Field(field_a), ClassMember::Field(field_b)],
        flags: CommonFlags::empty(),
        decorators: Vec::new(),
    };

    let mut source = SourceFile::new("a", false, true);
    source.statements = vec![Statement::Class(box_decl), Statement::Class(pair_decl)];
    source
}

#[test]
fn field_layout_aligns_each_field_to_its_own_size() {
    let mut harness = Harness::new();
    let source = class_fixture_source(&harness.interner);
    harness.init(&[source]);
    assert!(!harness.sink.has_errors());

    let pair_proto = harness.graph.lookup("a/Pair").expect("Pair prototype declared");
    let empty = FxHashMap::default();
    let class_id = {
        let mut resolver = harness.resolver();
        resolver.resolve_class(pair_proto, &[], &empty, Span::dummy()).expect("Pair resolves")
    };

    let class = harness.graph.get(class_id).as_class().unwrap();
    let a_id = *class.members.get("a").unwrap();
    let b_id = *class.members.get("b").unwrap();
    let a = harness.graph.get(a_id).as_field().unwrap();
    let b = harness.graph.get(b_id).as_field().unwrap();

    assert_eq!(a.memory_offset, 0);
    // b is 4-byte aligned: padded from offset 1 up to 4, not packed at 1.
    assert_eq!(b.memory_offset, 4);
    assert_eq!(class.current_memory_offset, 8);
}

#[test]
fn generic_class_monomorphizes_once_per_type_argument_list() {
    let mut harness = Harness::new();
    let source = class_fixture_source(&harness.interner);
    harness.init(&[source]);
    assert!(!harness.sink.has_errors());

    let box_proto = harness.graph.lookup("a/Box").expect("Box prototype declared");
    let i32_ty = harness.types.i32;
    let empty = FxHashMap::default();

    let (first, second) = {
        let mut resolver = harness.resolver();
        let first = resolver.resolve_class(box_proto, &[i32_ty], &empty, Span::dummy()).unwrap();
        let second = resolver.resolve_class(box_proto, &[i32_ty], &empty, Span::dummy()).unwrap();
        (first, second)
    };

    // I3/P3: same prototype + same type arguments => the same instance.
    assert_eq!(first, second);

    let class = harness.graph.get(first).as_class().unwrap();
    let field_id = *class.members.get("value").unwrap();
    let field = harness.graph.get(field_id).as_field().unwrap();
    assert_eq!(field.ty, i32_ty, "T must substitute to i32 inside the instantiated field");

    // P8: resolving the class type for the same element twice is pointer-equal.
    assert_eq!(class.ty, harness.types.class_type(first, "a/Box<i32>".to_string()));
}

#[test]
fn resolve_type_instantiates_generic_named_type_nodes() {
    let mut harness = Harness::new();
    let source = class_fixture_source(&harness.interner);
    harness.init(&[source]);

    let i32_node = named(&harness.interner, "i32");
    let box_of_i32 = named_with_args(&harness.interner, "Box", vec![i32_node]);
    let contextual = FxHashMap::default();
    let ctx = ResolveContext::new("a", &contextual);

    let ty = {
        let mut resolver = harness.resolver();
        resolver.resolve_type(&box_of_i32, &ctx, true).expect("Box<i32> resolves to a class type")
    };
    assert!(harness.types.get(ty).is_class());
}

#[test]
fn resolve_identifier_falls_back_to_function_locals_when_not_flow_scoped() {
    let mut harness = Harness::new();
    let identity_decl = FunctionDecl {
        span: Span::dummy(),
        name: harness.interner.intern("identity"),
        signature: signature(Vec::new(), vec![param(&harness.interner, "x", named(&harness.interner, "i32"))], Some(named(&harness.interner, "i32"))),
        body: None,
        flags: CommonFlags::empty(),
        decorators: Vec::new(),
    };
    let mut source = SourceFile::new("a", false, true);
    source.statements = vec![Statement::Function(identity_decl)];
    harness.init(&[source]);
    assert!(!harness.sink.has_errors());

    let prototype_id = harness.graph.lookup("a/identity").expect("identity prototype declared");
    let empty = FxHashMap::default();
    let function_id = {
        let mut resolver = harness.resolver();
        resolver.resolve_function(prototype_id, &[], &empty, None, Span::dummy()).expect("identity resolves")
    };
    let flow = harness.graph.get(function_id).as_function().unwrap().flow;
    let expected_local = harness.graph.get(function_id).as_function().unwrap().locals[0];

    let ctx = ResolveContext::new("a", &empty).with_function(function_id, flow);
    let resolved = {
        let mut resolver = harness.resolver();
        resolver.resolve_identifier("x", Span::dummy(), &ctx).expect("x resolves to the parameter local")
    };
    assert_eq!(resolved, expected_local);
}

#[test]
fn property_access_on_this_finds_the_instance_field() {
    let mut harness = Harness::new();
    let source = class_fixture_source(&harness.interner);
    harness.init(&[source]);
    assert!(!harness.sink.has_errors());

    let box_proto = harness.graph.lookup("a/Box").expect("Box prototype declared");
    let i32_ty = harness.types.i32;
    let empty = FxHashMap::default();

    let (class_id, get_function_id) = {
        let mut resolver = harness.resolver();
        let class_id = resolver.resolve_class(box_proto, &[i32_ty], &empty, Span::dummy()).unwrap();
        let get_partial = *harness.graph.get(class_id).as_class().unwrap().members.get("get").unwrap();
        let get_function_id =
            resolver.resolve_function(get_partial, &[], &empty, Some(class_id), Span::dummy()).expect("get() resolves");
        (class_id, get_function_id)
    };

    let flow = harness.graph.get(get_function_id).as_function().unwrap().flow;
    let ctx = ResolveContext::new("a", &empty).with_function(get_function_id, flow);

    let property_access = Expr::PropertyAccess(PropertyAccessExpr {
        span: Span::dummy(),
        target: Box::new(Expr::This(Span::dummy())),
        property: harness.interner.intern("value"),
    });

    let resolved = {
        let mut resolver = harness.resolver();
        resolver.resolve_expression(&property_access, &ctx).expect("this.value resolves")
    };

    let expected_field = *harness.graph.get(class_id).as_class().unwrap().members.get("value").unwrap();
    assert_eq!(resolved.element, expected_field);
    assert!(matches!(resolved.this_expr, Some(Expr::This(_))));
}

#[test]
fn unresolvable_identifier_reports_cannot_find_name() {
    let mut harness = Harness::new();
    let empty = FxHashMap::default();
    let ctx = ResolveContext::new("a", &empty);
    let result = {
        let mut resolver = harness.resolver();
        resolver.resolve_identifier("missing", Span::dummy(), &ctx)
    };
    assert!(result.is_none());
    assert!(harness.sink.has_errors());
    assert_eq!(harness.sink.diagnostics()[0].code, glyph_common::diagnostic::codes::CANNOT_FIND_NAME);
}

#[test]
fn binary_expressions_are_rejected_as_unsupported() {
    let mut harness = Harness::new();
    let empty = FxHashMap::default();
    let ctx = ResolveContext::new("a", &empty);
    let binary = Expr::Binary(glyph_ast::BinaryExpr {
        span: Span::dummy(),
        operator: glyph_ast::BinaryOperator::Add,
        left: Box::new(Expr::NumericLiteral(glyph_ast::NumericLiteralExpr { span: Span::dummy(), value: 1.0 })),
        right: Box::new(Expr::NumericLiteral(glyph_ast::NumericLiteralExpr { span: Span::dummy(), value: 2.0 })),
    });
    let result = {
        let mut resolver = harness.resolver();
        resolver.resolve_expression(&binary, &ctx)
    };
    assert!(result.is_none());
    assert_eq!(
        harness.sink.diagnostics().last().unwrap().code,
        glyph_common::diagnostic::codes::OPERATION_NOT_SUPPORTED
    );
}

#[test]
fn rest_parameters_are_rejected_on_standalone_functions() {
    let mut harness = Harness::new();
    let mut rest_param = param(&harness.interner, "args", named(&harness.interner, "i32"));
    rest_param.is_rest = true;
    let variadic_decl = FunctionDecl {
        span: Span::dummy(),
        name: harness.interner.intern("variadic"),
        signature: signature(Vec::new(), vec![rest_param], None),
        body: None,
        flags: CommonFlags::empty(),
        decorators: Vec::new(),
    };
    let mut source = SourceFile::new("a", false, true);
    source.statements = vec![Statement::Function(variadic_decl)];
    harness.init(&[source]);

    let prototype_id = harness.graph.lookup("a/variadic").expect("variadic prototype declared");
    let empty = FxHashMap::default();
    let result = {
        let mut resolver = harness.resolver();
        resolver.resolve_function(prototype_id, &[], &empty, None, Span::dummy())
    };
    assert!(result.is_none());
    assert_eq!(
        harness.sink.diagnostics().last().unwrap().code,
        glyph_common::diagnostic::codes::OPERATION_NOT_SUPPORTED
    );
}
