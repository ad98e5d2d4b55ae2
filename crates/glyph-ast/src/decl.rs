//! Declaration nodes — the shapes named in §6.1.

use crate::expr::Expr;
use crate::ty::{Signature, TypeNode};
use glyph_common::{Atom, CommonFlags, Span};

/// A decorator as written (`@global`, `@sealed`, `@unmanaged`, `@inline`,
/// `@operator("+")`). `kind` is classified from the decorator's name at parse
/// time so the Initializer doesn't need to re-parse the name repeatedly.
#[derive(Clone, Debug)]
pub struct Decorator {
    pub span: Span,
    pub name: Atom,
    pub kind: DecoratorKind,
    pub arguments: Vec<Expr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecoratorKind {
    Global,
    Sealed,
    Unmanaged,
    Inline,
    Operator,
    Unknown,
}

impl DecoratorKind {
    pub fn classify(name: &str) -> DecoratorKind {
        match name {
            "global" => DecoratorKind::Global,
            "sealed" => DecoratorKind::Sealed,
            "unmanaged" => DecoratorKind::Unmanaged,
            "inline" => DecoratorKind::Inline,
            "operator" => DecoratorKind::Operator,
            _ => DecoratorKind::Unknown,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub span: Span,
    pub name: Atom,
    pub ty: Option<TypeNode>,
    pub initializer: Option<Expr>,
    pub flags: CommonFlags,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodKind {
    Normal,
    Get,
    Set,
    Constructor,
}

#[derive(Clone, Debug)]
pub struct MethodDecl {
    pub span: Span,
    pub name: Atom,
    pub signature: Signature,
    pub body: Option<Vec<Statement>>,
    pub flags: CommonFlags,
    pub decorators: Vec<Decorator>,
    pub kind: MethodKind,
    pub is_static: bool,
}

#[derive(Clone, Debug)]
pub struct FunctionDecl {
    pub span: Span,
    pub name: Atom,
    pub signature: Signature,
    pub body: Option<Vec<Statement>>,
    pub flags: CommonFlags,
    pub decorators: Vec<Decorator>,
}

#[derive(Clone, Debug)]
pub enum ClassMember {
    Field(FieldDecl),
    Method(MethodDecl),
}

#[derive(Clone, Debug)]
pub struct ClassDecl {
    pub span: Span,
    pub name: Atom,
    pub type_parameters: Vec<Atom>,
    pub extends_type: Option<TypeNode>,
    pub implements_types: Vec<TypeNode>,
    pub members: Vec<ClassMember>,
    pub flags: CommonFlags,
    pub decorators: Vec<Decorator>,
}

#[derive(Clone, Debug)]
pub struct InterfaceDecl {
    pub span: Span,
    pub name: Atom,
    pub type_parameters: Vec<Atom>,
    pub extends_type: Option<TypeNode>,
    pub members: Vec<ClassMember>,
    pub flags: CommonFlags,
    pub decorators: Vec<Decorator>,
}

#[derive(Clone, Debug)]
pub struct EnumValueDecl {
    pub span: Span,
    pub name: Atom,
    pub initializer: Option<Expr>,
}

#[derive(Clone, Debug)]
pub struct EnumDecl {
    pub span: Span,
    pub name: Atom,
    pub values: Vec<EnumValueDecl>,
    pub flags: CommonFlags,
}

#[derive(Clone, Debug)]
pub struct NamespaceDecl {
    pub span: Span,
    pub name: Atom,
    pub statements: Vec<Statement>,
    pub flags: CommonFlags,
}

#[derive(Clone, Debug)]
pub struct TypeAliasDecl {
    pub span: Span,
    pub name: Atom,
    pub type_parameters: Vec<Atom>,
    pub ty: TypeNode,
    pub flags: CommonFlags,
}

#[derive(Clone, Debug)]
pub struct VariableDeclarator {
    pub span: Span,
    pub name: Atom,
    pub ty: Option<TypeNode>,
    pub initializer: Option<Expr>,
}

#[derive(Clone, Debug)]
pub struct VariableDecl {
    pub span: Span,
    pub declarations: Vec<VariableDeclarator>,
    pub flags: CommonFlags,
}

/// One imported binding: `import { externalName as name } from "...";`
#[derive(Clone, Debug)]
pub struct ImportDeclaration {
    pub span: Span,
    pub name: Atom,
    pub external_name: Atom,
}

#[derive(Clone, Debug)]
pub struct ImportDecl {
    pub span: Span,
    pub declarations: Vec<ImportDeclaration>,
    /// `import * as N from "..."` — present only for namespace-style imports,
    /// which are unimplemented (see DESIGN.md, Open Question decisions).
    pub namespace_name: Option<Atom>,
    pub internal_path: Atom,
}

#[derive(Clone, Debug)]
pub struct ExportMember {
    pub span: Span,
    pub name: Atom,
    pub external_name: Atom,
}

#[derive(Clone, Debug)]
pub struct ExportDecl {
    pub span: Span,
    pub members: Vec<ExportMember>,
    /// Present for re-exports (`export { X } from "./other"`).
    pub internal_path: Option<Atom>,
}

#[derive(Clone, Debug)]
pub enum Statement {
    Class(ClassDecl),
    Interface(InterfaceDecl),
    Function(FunctionDecl),
    Enum(EnumDecl),
    Namespace(NamespaceDecl),
    TypeAlias(TypeAliasDecl),
    Variable(VariableDecl),
    Import(ImportDecl),
    Export(ExportDecl),
    /// Anything the core does not give top-level semantic meaning to (loose
    /// expression statements inside function bodies, etc).
    Expression(Expr),
}
