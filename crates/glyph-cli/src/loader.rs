//! A line-oriented toy syntax for `glyph` source files (§6.4): enough to
//! build real `glyph_ast::SourceFile` values without a real lexer/parser.
//! Function and method bodies are never parsed (always `None`) — this core
//! never inspects statement bodies, only declaration shapes.
//!
//! Grammar, one statement per line unless noted:
//!
//! ```text
//! # comment
//! @sealed / @unmanaged / @global / @inline
//! @operator("+")
//! [export] class Name [extends Base]      <block, closed by `end`>
//! [export] namespace Name                 <block, closed by `end`>
//!   field name: Type
//!   constructor(params)
//!   [static] method name(params)[: Return]
//!   get name(): Type
//!   set name(value: Type)
//! [export] function name(params)[: Return]
//! [export] const name: Type [= literal]
//! [export] let name: Type [= literal]
//! export Name [as External]
//! export Name from "path"
//! import Name [as Local] from "path"
//! import * from "path"                    <namespace-style, unsupported>
//! ```
//!
//! Parameters: `name: Type`, `name?: Type` (has a default), `...name: Type`
//! (rest). Types are plain names; the toy syntax has no generic-argument
//! notation.

use glyph_ast::{
    ClassDecl, ClassMember, Decorator, DecoratorKind, Expr, ExportDecl, ExportMember, FieldDecl, FunctionDecl, ImportDecl,
    ImportDeclaration, MethodDecl, MethodKind, NamedTypeNode, NamespaceDecl, ParameterNode, Signature, SourceFile, Statement,
    StringLiteralExpr, TypeNode, VariableDecl, VariableDeclarator,
};
use glyph_common::{CommonFlags, Interner, Span};

pub fn parse_source_file(path: &str, is_library: bool, is_entry: bool, text: &str, interner: &Interner) -> SourceFile {
    let mut lines = Lines::new(text).collect::<Vec<_>>();
    lines.reverse();
    let mut source = SourceFile::new(path, is_library, is_entry);
    source.statements = parse_block(&mut lines, interner);
    source
}

struct Lines<'a> {
    raw: &'a str,
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self { raw: text, pos: 0 }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (u32, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.raw.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.raw[self.pos..];
        let (line, consumed) = match rest.find('\n') {
            Some(idx) => (&rest[..idx], idx + 1),
            None => (rest, rest.len()),
        };
        self.pos += consumed;
        Some((start as u32, line))
    }
}

/// Reads statements from `lines` (a reversed stack, so `pop()` yields them in
/// source order) until an `end` line or exhaustion.
fn parse_block<'a>(lines: &mut Vec<(u32, &'a str)>, interner: &Interner) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut pending_decorators: Vec<Decorator> = Vec::new();

    while let Some((offset, raw_line)) = lines.pop() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        if line == "end" {
            break;
        }
        let span = Span::from_len(offset, line.len() as u32);

        if let Some(deco) = parse_decorator(line, span, interner) {
            pending_decorators.push(deco);
            continue;
        }

        let decorators = std::mem::take(&mut pending_decorators);
        if let Some(stmt) = parse_statement(line, span, decorators, lines, interner) {
            statements.push(stmt);
        }
    }
    statements
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn parse_decorator(line: &str, span: Span, interner: &Interner) -> Option<Decorator> {
    let rest = line.strip_prefix('@')?;
    let (name, arguments) = match rest.find('(') {
        Some(open) => {
            let name = &rest[..open];
            let close = rest.rfind(')').unwrap_or(rest.len());
            let inner = rest[open + 1..close].trim();
            let arg = inner.trim_matches('"');
            (name, vec![Expr::StringLiteral(StringLiteralExpr { span, value: arg.to_string() })])
        }
        None => (rest, Vec::new()),
    };
    let name = name.trim();
    Some(Decorator { span, name: interner.intern(name), kind: DecoratorKind::classify(name), arguments })
}

fn parse_statement<'a>(
    line: &str,
    span: Span,
    decorators: Vec<Decorator>,
    lines: &mut Vec<(u32, &'a str)>,
    interner: &Interner,
) -> Option<Statement> {
    let (is_exported, rest) = match line.strip_prefix("export ") {
        Some(rest) => (true, rest),
        None => (false, line),
    };
    let flags = if is_exported { CommonFlags::EXPORT } else { CommonFlags::empty() };

    if let Some(rest) = rest.strip_prefix("class ") {
        return Some(Statement::Class(parse_class(rest, span, flags, decorators, lines, interner)));
    }
    if let Some(rest) = rest.strip_prefix("namespace ") {
        let name = interner.intern(rest.trim());
        let statements = parse_block(lines, interner);
        return Some(Statement::Namespace(NamespaceDecl { span, name, statements, flags }));
    }
    if let Some(rest) = rest.strip_prefix("function ") {
        let (name_part, params_str, return_str) = split_signature(rest);
        let parameters = parse_params(params_str, interner);
        return Some(Statement::Function(FunctionDecl {
            span,
            name: interner.intern(name_part),
            signature: Signature {
                span,
                type_parameters: Vec::new(),
                this_type: None,
                parameters,
                return_type: return_str.map(|r| parse_type(r, span, interner)),
            },
            body: None,
            flags,
            decorators,
        }));
    }
    if let Some(rest) = rest.strip_prefix("const ") {
        return Some(Statement::Variable(parse_variable(rest, span, flags | CommonFlags::CONST, interner)));
    }
    if let Some(rest) = rest.strip_prefix("let ") {
        return Some(Statement::Variable(parse_variable(rest, span, flags | CommonFlags::LET, interner)));
    }
    if !is_exported {
        if let Some(rest) = line.strip_prefix("import ") {
            return Some(Statement::Import(parse_import(rest, span, interner)));
        }
    }
    if is_exported {
        return Some(Statement::Export(parse_export(rest, span, interner)));
    }

    tracing::warn!(line, "skipping unrecognized statement");
    None
}

fn parse_class<'a>(
    rest: &str,
    span: Span,
    flags: CommonFlags,
    decorators: Vec<Decorator>,
    lines: &mut Vec<(u32, &'a str)>,
    interner: &Interner,
) -> ClassDecl {
    let (name, extends) = match rest.split_once(" extends ") {
        Some((name, base)) => (name.trim(), Some(base.trim())),
        None => (rest.trim(), None),
    };
    let extends_type = extends.map(|base| TypeNode::Named(NamedTypeNode { span, name: interner.intern(base), type_arguments: Vec::new() }));

    let mut members = Vec::new();
    let mut pending_decorators: Vec<Decorator> = Vec::new();
    while let Some((offset, raw_line)) = lines.pop() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        if line == "end" {
            break;
        }
        let member_span = Span::from_len(offset, line.len() as u32);
        if let Some(deco) = parse_decorator(line, member_span, interner) {
            pending_decorators.push(deco);
            continue;
        }
        let member_decorators = std::mem::take(&mut pending_decorators);
        if let Some(member) = parse_member(line, member_span, member_decorators, interner) {
            members.push(member);
        }
    }

    ClassDecl { span, name: interner.intern(name), type_parameters: Vec::new(), extends_type, implements_types: Vec::new(), members, flags, decorators }
}

fn parse_member(line: &str, span: Span, decorators: Vec<Decorator>, interner: &Interner) -> Option<ClassMember> {
    if let Some(rest) = line.strip_prefix("field ") {
        let (name, ty) = rest.split_once(':')?;
        return Some(ClassMember::Field(FieldDecl {
            span,
            name: interner.intern(name.trim()),
            ty: Some(parse_type(ty.trim(), span, interner)),
            initializer: None,
            flags: CommonFlags::empty(),
        }));
    }
    if let Some(rest) = line.strip_prefix("constructor") {
        let (_, params_str, _) = split_signature(&format!("constructor{rest}"));
        return Some(ClassMember::Method(MethodDecl {
            span,
            name: interner.intern("constructor"),
            signature: Signature { span, type_parameters: Vec::new(), this_type: None, parameters: parse_params(params_str, interner), return_type: None },
            body: None,
            flags: CommonFlags::empty(),
            decorators,
            kind: MethodKind::Constructor,
            is_static: false,
        }));
    }
    if let Some(rest) = line.strip_prefix("static method ") {
        return Some(ClassMember::Method(parse_method(rest, span, decorators, MethodKind::Normal, true, interner)));
    }
    if let Some(rest) = line.strip_prefix("method ") {
        return Some(ClassMember::Method(parse_method(rest, span, decorators, MethodKind::Normal, false, interner)));
    }
    if let Some(rest) = line.strip_prefix("get ") {
        return Some(ClassMember::Method(parse_method(rest, span, decorators, MethodKind::Get, false, interner)));
    }
    if let Some(rest) = line.strip_prefix("set ") {
        return Some(ClassMember::Method(parse_method(rest, span, decorators, MethodKind::Set, false, interner)));
    }
    tracing::warn!(line, "skipping unrecognized class member");
    None
}

fn parse_method(rest: &str, span: Span, decorators: Vec<Decorator>, kind: MethodKind, is_static: bool, interner: &Interner) -> MethodDecl {
    let (name_part, params_str, return_str) = split_signature(rest);
    MethodDecl {
        span,
        name: interner.intern(name_part),
        signature: Signature {
            span,
            type_parameters: Vec::new(),
            this_type: None,
            parameters: parse_params(params_str, interner),
            return_type: return_str.map(|r| parse_type(r, span, interner)),
        },
        body: None,
        flags: CommonFlags::empty(),
        decorators,
        kind,
        is_static,
    }
}

fn parse_variable(rest: &str, span: Span, flags: CommonFlags, interner: &Interner) -> VariableDecl {
    let (name_and_type, initializer) = match rest.split_once('=') {
        Some((lhs, value)) => (lhs, Some(value.trim())),
        None => (rest, None),
    };
    let (name, ty) = name_and_type.split_once(':').map(|(n, t)| (n.trim(), Some(t.trim()))).unwrap_or((name_and_type.trim(), None));
    let declarator = VariableDeclarator {
        span,
        name: interner.intern(name),
        ty: ty.map(|t| parse_type(t, span, interner)),
        initializer: initializer.and_then(|v| parse_literal(v, span)),
    };
    VariableDecl { span, declarations: vec![declarator], flags }
}

fn parse_literal(value: &str, span: Span) -> Option<Expr> {
    value.parse::<f64>().ok().map(|v| Expr::NumericLiteral(glyph_ast::NumericLiteralExpr { span, value: v }))
}

fn parse_export(rest: &str, span: Span, interner: &Interner) -> ExportDecl {
    if let Some((name, path)) = rest.split_once(" from ") {
        let name = interner.intern(name.trim());
        return ExportDecl {
            span,
            members: vec![ExportMember { span, name, external_name: name }],
            internal_path: Some(interner.intern(path.trim().trim_matches('"'))),
        };
    }
    let (name, external) = match rest.split_once(" as ") {
        Some((name, external)) => (name.trim(), external.trim()),
        None => (rest.trim(), rest.trim()),
    };
    ExportDecl {
        span,
        members: vec![ExportMember { span, name: interner.intern(name), external_name: interner.intern(external) }],
        internal_path: None,
    }
}

fn parse_import(rest: &str, span: Span, interner: &Interner) -> ImportDecl {
    let (head, path) = rest.split_once(" from ").unwrap_or((rest, "\"\""));
    let path = path.trim().trim_matches('"');
    let head = head.trim();
    if head == "*" {
        return ImportDecl { span, declarations: Vec::new(), namespace_name: Some(interner.intern("*")), internal_path: interner.intern(path) };
    }
    let (name, external) = match head.split_once(" as ") {
        Some((name, external)) => (name.trim(), external.trim()),
        None => (head, head),
    };
    ImportDecl {
        span,
        declarations: vec![ImportDeclaration { span, name: interner.intern(name), external_name: interner.intern(external) }],
        namespace_name: None,
        internal_path: interner.intern(path),
    }
}

/// Splits `name(params)[: Return]` into its three parts. Assumes no nested
/// parens in parameter types, matching the toy syntax's plain-name types.
fn split_signature(text: &str) -> (&str, &str, Option<&str>) {
    let open = text.find('(').unwrap_or(text.len());
    let name = text[..open].trim();
    let close = text[open.min(text.len())..].find(')').map(|i| open + i).unwrap_or(text.len());
    let params_str = if open < close && open < text.len() { &text[open + 1..close] } else { "" };
    let remainder = if close < text.len() { text[close + 1..].trim() } else { "" };
    let return_str = remainder.strip_prefix(':').map(|r| r.trim()).filter(|r| !r.is_empty());
    (name, params_str, return_str)
}

fn parse_params(params_str: &str, interner: &Interner) -> Vec<ParameterNode> {
    if params_str.trim().is_empty() {
        return Vec::new();
    }
    params_str
        .split(',')
        .map(|part| {
            let part = part.trim();
            let (is_rest, part) = match part.strip_prefix("...") {
                Some(rest) => (true, rest),
                None => (false, part),
            };
            let (name_part, ty_part) = part.split_once(':').unwrap_or((part, "i32"));
            let (name, has_default) = match name_part.trim().strip_suffix('?') {
                Some(stripped) => (stripped, true),
                None => (name_part.trim(), false),
            };
            let span = Span::dummy();
            ParameterNode { span, name: interner.intern(name), ty: parse_type(ty_part.trim(), span, interner), has_default, is_rest }
        })
        .collect()
}

fn parse_type(text: &str, span: Span, interner: &Interner) -> TypeNode {
    TypeNode::Named(NamedTypeNode { span, name: interner.intern(text.trim()), type_arguments: Vec::new() })
}
