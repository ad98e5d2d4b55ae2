//! Expression nodes (§4.2.3–§4.2.5 operate over this shape).

use crate::ty::TypeNode;
use glyph_common::{Atom, Span};

#[derive(Clone, Debug)]
pub enum Expr {
    Identifier(IdentifierExpr),
    This(Span),
    Super(Span),
    StringLiteral(StringLiteralExpr),
    NumericLiteral(NumericLiteralExpr),
    /// `x as T`
    Assertion(AssertionExpr),
    /// `x.name`
    PropertyAccess(PropertyAccessExpr),
    /// `x[index]`
    ElementAccess(ElementAccessExpr),
    /// `callee(args)` with optional explicit type arguments `callee<T>(args)`.
    Call(CallExpr),
    /// `(x)` — stripped before dispatch, kept as a node so spans point at the
    /// parenthesized form when useful.
    Paren(Box<Expr>),
    /// Binary operator expressions. The resolver's handling of this arm is
    /// intentionally stubbed (see Open Question decisions in DESIGN.md).
    Binary(BinaryExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Identifier(e) => e.span,
            Expr::This(s) | Expr::Super(s) => *s,
            Expr::StringLiteral(e) => e.span,
            Expr::NumericLiteral(e) => e.span,
            Expr::Assertion(e) => e.span,
            Expr::PropertyAccess(e) => e.span,
            Expr::ElementAccess(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::Paren(inner) => inner.span(),
            Expr::Binary(e) => e.span,
        }
    }

    /// Strip any number of enclosing parens, per §4.2.3.
    pub fn strip_parens(&self) -> &Expr {
        let mut current = self;
        while let Expr::Paren(inner) = current {
            current = inner;
        }
        current
    }
}

#[derive(Clone, Debug)]
pub struct IdentifierExpr {
    pub span: Span,
    pub name: Atom,
}

#[derive(Clone, Debug)]
pub struct StringLiteralExpr {
    pub span: Span,
    pub value: String,
}

#[derive(Clone, Debug)]
pub struct NumericLiteralExpr {
    pub span: Span,
    pub value: f64,
}

#[derive(Clone, Debug)]
pub struct AssertionExpr {
    pub span: Span,
    pub expr: Box<Expr>,
    pub ty: TypeNode,
}

#[derive(Clone, Debug)]
pub struct PropertyAccessExpr {
    pub span: Span,
    pub target: Box<Expr>,
    pub property: Atom,
}

#[derive(Clone, Debug)]
pub struct ElementAccessExpr {
    pub span: Span,
    pub target: Box<Expr>,
    pub index: Box<Expr>,
}

#[derive(Clone, Debug)]
pub struct CallExpr {
    pub span: Span,
    pub callee: Box<Expr>,
    pub type_arguments: Vec<TypeNode>,
    pub arguments: Vec<Expr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    BitAnd,
    BitOr,
    BitXor,
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Clone, Debug)]
pub struct BinaryExpr {
    pub span: Span,
    pub operator: BinaryOperator,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}
