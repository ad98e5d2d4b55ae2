//! The tagged-union element model (§3.2). Polymorphism is entirely by `kind`
//! dispatch at lookup sites; no virtual methods (§9 "Tagged unions vs class
//! hierarchy"). Cross-references the spec calls "weak" are plain `ElementId`
//! copies, never ownership (§9 "Weak back-references").

use crate::operator::OperatorKind;
use glyph_ast::{ClassDecl, EnumDecl, FieldDecl, FunctionDecl, InterfaceDecl, MethodDecl, NamespaceDecl};
use glyph_common::{CommonFlags, DecoratorFlags, ElementId, FlowNodeId, Span};
use glyph_types::TypeId;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Global,
    Local,
    Enum,
    EnumValue,
    FunctionPrototype,
    Function,
    FunctionTarget,
    ClassPrototype,
    Class,
    InterfacePrototype,
    Interface,
    FieldPrototype,
    Field,
    Property,
    Namespace,
}

/// Fields every element kind carries (§3.2 "All elements carry...").
#[derive(Clone, Debug)]
pub struct ElementHeader {
    pub internal_name: String,
    pub simple_name: String,
    pub span: Span,
    pub flags: CommonFlags,
    pub decorator_flags: DecoratorFlags,
    /// Enclosing namespace, if any; used to walk the namespace chain during
    /// identifier resolution (§4.2.2 step 2b).
    pub namespace: Option<ElementId>,
}

impl ElementHeader {
    pub fn new(internal_name: String, simple_name: String, span: Span) -> Self {
        Self {
            internal_name,
            simple_name,
            span,
            flags: CommonFlags::empty(),
            decorator_flags: DecoratorFlags::empty(),
            namespace: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GlobalElement {
    pub header: ElementHeader,
    pub ty: Option<TypeId>,
    pub constant_value: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct LocalElement {
    pub header: ElementHeader,
    pub ty: TypeId,
    pub slot: u32,
}

#[derive(Clone, Debug)]
pub struct EnumElement {
    pub header: ElementHeader,
    pub declaration: Rc<EnumDecl>,
    pub values: IndexMap<String, ElementId>,
}

#[derive(Clone, Debug)]
pub struct EnumValueElement {
    pub header: ElementHeader,
    pub parent_enum: ElementId,
    pub value: Option<i64>,
}

/// Either source of a function-shaped declaration: a top-level function or a
/// class/interface method (§6.1).
#[derive(Clone, Debug)]
pub enum FunctionDeclRef {
    Function(Rc<FunctionDecl>),
    Method(Rc<MethodDecl>),
}

impl FunctionDeclRef {
    pub fn span(&self) -> Span {
        match self {
            FunctionDeclRef::Function(f) => f.span,
            FunctionDeclRef::Method(m) => m.span,
        }
    }

    pub fn signature(&self) -> &glyph_ast::Signature {
        match self {
            FunctionDeclRef::Function(f) => &f.signature,
            FunctionDeclRef::Method(m) => &m.signature,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FunctionPrototypeElement {
    pub header: ElementHeader,
    pub declaration: FunctionDeclRef,
    pub owning_class: Option<ElementId>,
    pub operator_kind: Option<OperatorKind>,
    /// Keyed by the canonicalized function-type-argument string (I3).
    pub instances: FxHashMap<String, ElementId>,
    /// Set when this prototype is the partial-resolution result of binding a
    /// class's type arguments while the method's own remain free (§4.2.7).
    pub class_type_arguments: Option<Vec<TypeId>>,
    /// The source the declaration lives in, used to form `localName` during
    /// type resolution (§4.2.1 step 2).
    pub source_path: String,
}

#[derive(Clone, Debug)]
pub struct FunctionElement {
    pub header: ElementHeader,
    pub prototype: ElementId,
    pub signature: glyph_types::Signature,
    pub owning_element: Option<ElementId>,
    pub locals: Vec<ElementId>,
    pub flow: FlowNodeId,
}

#[derive(Clone, Debug)]
pub struct FunctionTargetElement {
    pub header: ElementHeader,
    pub function_type: TypeId,
}

#[derive(Clone, Debug)]
pub struct ClassPrototypeElement {
    pub header: ElementHeader,
    pub declaration: Rc<ClassDecl>,
    pub is_interface: bool,
    pub instance_member_prototypes: IndexMap<String, ElementId>,
    pub static_members: IndexMap<String, ElementId>,
    pub base_prototype: Option<ElementId>,
    pub constructor_prototype: Option<ElementId>,
    pub operator_overload_prototypes: FxHashMap<OperatorKind, ElementId>,
    /// Keyed by the canonicalized class-type-argument string (I3).
    pub instances: FxHashMap<String, ElementId>,
    /// The source the declaration lives in, used to form `localName` during
    /// type resolution (§4.2.1 step 2).
    pub source_path: String,
}

#[derive(Clone, Debug)]
pub struct ClassElement {
    pub header: ElementHeader,
    pub prototype: ElementId,
    pub is_interface: bool,
    pub type_arguments: Vec<TypeId>,
    pub ty: TypeId,
    pub base_class: Option<ElementId>,
    pub contextual_type_arguments: FxHashMap<String, TypeId>,
    pub constructor_instance: Option<ElementId>,
    pub operator_overloads: FxHashMap<OperatorKind, ElementId>,
    pub members: IndexMap<String, ElementId>,
    pub current_memory_offset: u32,
}

#[derive(Clone, Debug)]
pub struct FieldPrototypeElement {
    pub header: ElementHeader,
    pub declaration: Rc<FieldDecl>,
    pub parent: ElementId,
}

#[derive(Clone, Debug)]
pub struct FieldElement {
    pub header: ElementHeader,
    pub prototype: ElementId,
    pub ty: TypeId,
    pub memory_offset: u32,
}

#[derive(Clone, Debug, Default)]
pub struct PropertyElement {
    pub header: Option<ElementHeader>,
    pub parent: Option<ElementId>,
    pub getter_prototype: Option<ElementId>,
    pub setter_prototype: Option<ElementId>,
}

#[derive(Clone, Debug)]
pub struct NamespaceElement {
    pub header: ElementHeader,
    pub members: IndexMap<String, ElementId>,
}

/// The tagged union itself: one variant per row of §3.2's table.
#[derive(Clone, Debug)]
pub enum Element {
    Global(GlobalElement),
    Local(LocalElement),
    Enum(EnumElement),
    EnumValue(EnumValueElement),
    FunctionPrototype(FunctionPrototypeElement),
    Function(FunctionElement),
    FunctionTarget(FunctionTargetElement),
    ClassPrototype(ClassPrototypeElement),
    Class(ClassElement),
    InterfacePrototype(ClassPrototypeElement),
    Interface(ClassElement),
    FieldPrototype(FieldPrototypeElement),
    Field(FieldElement),
    Property(PropertyElement),
    Namespace(NamespaceElement),
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Global(_) => ElementKind::Global,
            Element::Local(_) => ElementKind::Local,
            Element::Enum(_) => ElementKind::Enum,
            Element::EnumValue(_) => ElementKind::EnumValue,
            Element::FunctionPrototype(_) => ElementKind::FunctionPrototype,
            Element::Function(_) => ElementKind::Function,
            Element::FunctionTarget(_) => ElementKind::FunctionTarget,
            Element::ClassPrototype(_) => ElementKind::ClassPrototype,
            Element::Class(_) => ElementKind::Class,
            Element::InterfacePrototype(_) => ElementKind::InterfacePrototype,
            Element::Interface(_) => ElementKind::Interface,
            Element::FieldPrototype(_) => ElementKind::FieldPrototype,
            Element::Field(_) => ElementKind::Field,
            Element::Property(_) => ElementKind::Property,
            Element::Namespace(_) => ElementKind::Namespace,
        }
    }

    pub fn header(&self) -> Option<&ElementHeader> {
        match self {
            Element::Global(e) => Some(&e.header),
            Element::Local(e) => Some(&e.header),
            Element::Enum(e) => Some(&e.header),
            Element::EnumValue(e) => Some(&e.header),
            Element::FunctionPrototype(e) => Some(&e.header),
            Element::Function(e) => Some(&e.header),
            Element::FunctionTarget(e) => Some(&e.header),
            Element::ClassPrototype(e) => Some(&e.header),
            Element::Class(e) => Some(&e.header),
            Element::InterfacePrototype(e) => Some(&e.header),
            Element::Interface(e) => Some(&e.header),
            Element::FieldPrototype(e) => Some(&e.header),
            Element::Field(e) => Some(&e.header),
            Element::Property(e) => e.header.as_ref(),
            Element::Namespace(e) => Some(&e.header),
        }
    }

    pub fn header_mut(&mut self) -> Option<&mut ElementHeader> {
        match self {
            Element::Global(e) => Some(&mut e.header),
            Element::Local(e) => Some(&mut e.header),
            Element::Enum(e) => Some(&mut e.header),
            Element::EnumValue(e) => Some(&mut e.header),
            Element::FunctionPrototype(e) => Some(&mut e.header),
            Element::Function(e) => Some(&mut e.header),
            Element::FunctionTarget(e) => Some(&mut e.header),
            Element::ClassPrototype(e) => Some(&mut e.header),
            Element::Class(e) => Some(&mut e.header),
            Element::InterfacePrototype(e) => Some(&mut e.header),
            Element::Interface(e) => Some(&mut e.header),
            Element::FieldPrototype(e) => Some(&mut e.header),
            Element::Field(e) => Some(&mut e.header),
            Element::Property(e) => e.header.as_mut(),
            Element::Namespace(e) => Some(&mut e.header),
        }
    }

    pub fn internal_name(&self) -> Option<&str> {
        self.header().map(|h| h.internal_name.as_str())
    }

    pub fn is_class_like(&self) -> bool {
        matches!(
            self,
            Element::ClassPrototype(_) | Element::Class(_) | Element::InterfacePrototype(_) | Element::Interface(_)
        )
    }

    /// The class/interface prototype view, for code that treats Class and
    /// Interface identically (§3.2 "same shape... with a distinguishing kind").
    pub fn as_class_prototype(&self) -> Option<&ClassPrototypeElement> {
        match self {
            Element::ClassPrototype(c) | Element::InterfacePrototype(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_class_prototype_mut(&mut self) -> Option<&mut ClassPrototypeElement> {
        match self {
            Element::ClassPrototype(c) | Element::InterfacePrototype(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassElement> {
        match self {
            Element::Class(c) | Element::Interface(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ClassElement> {
        match self {
            Element::Class(c) | Element::Interface(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_function_prototype(&self) -> Option<&FunctionPrototypeElement> {
        match self {
            Element::FunctionPrototype(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_function_prototype_mut(&mut self) -> Option<&mut FunctionPrototypeElement> {
        match self {
            Element::FunctionPrototype(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionElement> {
        match self {
            Element::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&FieldElement> {
        match self {
            Element::Field(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_field_prototype(&self) -> Option<&FieldPrototypeElement> {
        match self {
            Element::FieldPrototype(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyElement> {
        match self {
            Element::Property(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&NamespaceElement> {
        match self {
            Element::Namespace(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_namespace_mut(&mut self) -> Option<&mut NamespaceElement> {
        match self {
            Element::Namespace(n) => Some(n),
            _ => None,
        }
    }
}
