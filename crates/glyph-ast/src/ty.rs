//! Type and signature nodes.

use glyph_common::{Atom, Span};

/// A type as written in source: `Foo`, `Foo<T1, T2>`, or a function signature type.
#[derive(Clone, Debug)]
pub enum TypeNode {
    Named(NamedTypeNode),
    Function(Box<Signature>),
}

#[derive(Clone, Debug)]
pub struct NamedTypeNode {
    pub span: Span,
    pub name: Atom,
    pub type_arguments: Vec<TypeNode>,
}

impl TypeNode {
    pub fn span(&self) -> Span {
        match self {
            TypeNode::Named(n) => n.span,
            TypeNode::Function(sig) => sig.span,
        }
    }
}

/// A single parameter in a signature node.
#[derive(Clone, Debug)]
pub struct ParameterNode {
    pub span: Span,
    pub name: Atom,
    pub ty: TypeNode,
    /// Has a default value, so it doesn't count toward `required` (§4.2.1).
    pub has_default: bool,
    /// Only the last parameter may set this.
    pub is_rest: bool,
}

/// An unresolved function/method signature as written.
#[derive(Clone, Debug)]
pub struct Signature {
    pub span: Span,
    pub type_parameters: Vec<Atom>,
    pub this_type: Option<TypeNode>,
    pub parameters: Vec<ParameterNode>,
    pub return_type: Option<TypeNode>,
}
