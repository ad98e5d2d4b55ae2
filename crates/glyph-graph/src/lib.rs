//! The element graph (§2 item 2, §3.2, §3.4): the population of declared and
//! resolved entities, their lookup tables, and internal-name formation.

pub mod arena;
pub mod element;
pub mod graph;
pub mod names;
pub mod operator;

pub use arena::ElementArena;
pub use element::{
    ClassElement, ClassPrototypeElement, Element, ElementHeader, ElementKind, EnumElement, EnumValueElement,
    FieldElement, FieldPrototypeElement, FunctionDeclRef, FunctionElement, FunctionPrototypeElement,
    FunctionTargetElement, GlobalElement, LocalElement, NamespaceElement, PropertyElement,
};
pub use graph::{ElementGraph, TypeAliasInfo, WellKnownPrototypes};
pub use operator::OperatorKind;
