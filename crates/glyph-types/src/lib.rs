//! The canonical type table (§3.3, §4.4): primitives plus cached function- and
//! class-type handles, with equality and stringification.

use glyph_common::{Atom, ElementId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;

mod signature;
pub use signature::Signature;

/// A stable handle into [`TypeTable`]. Two calls that resolve to the same
/// concrete type return the same `TypeId` (P8): value equality for primitives,
/// reference (cache) equality for function and class types.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
    Void,
}

impl PrimitiveKind {
    /// Byte size used for field alignment (I5); `Void` has no storage.
    pub const fn byte_size(self) -> Option<u32> {
        use PrimitiveKind::*;
        match self {
            I8 | U8 | Bool => Some(1),
            I16 | U16 => Some(2),
            I32 | U32 | F32 => Some(4),
            I64 | U64 | F64 => Some(8),
            Void => None,
        }
    }

    pub const fn name(self) -> &'static str {
        use PrimitiveKind::*;
        match self {
            I8 => "i8",
            I16 => "i16",
            I32 => "i32",
            I64 => "i64",
            U8 => "u8",
            U16 => "u16",
            U32 => "u32",
            U64 => "u64",
            F32 => "f32",
            F64 => "f64",
            Bool => "bool",
            Void => "void",
        }
    }
}

/// Which native width `isize`/`usize` resolve to (§3.3, configurable per-Program).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl PointerWidth {
    pub const fn byte_size(self) -> u32 {
        match self {
            PointerWidth::Bits32 => 4,
            PointerWidth::Bits64 => 8,
        }
    }

    const fn signed_primitive(self) -> PrimitiveKind {
        match self {
            PointerWidth::Bits32 => PrimitiveKind::I32,
            PointerWidth::Bits64 => PrimitiveKind::I64,
        }
    }

    const fn unsigned_primitive(self) -> PrimitiveKind {
        match self {
            PointerWidth::Bits32 => PrimitiveKind::U32,
            PointerWidth::Bits64 => PrimitiveKind::U64,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum TypeData {
    Primitive(PrimitiveKind),
    /// Function types are stored as pointers (§4.2.1 step 1): `usize`-sized.
    Function(Signature),
    Class(ElementId),
}

#[derive(Clone, Debug)]
pub struct Type {
    data: TypeData,
    pointer_width: PointerWidth,
}

impl Type {
    pub fn is_class(&self) -> bool {
        matches!(self.data, TypeData::Class(_))
    }

    pub fn class_reference(&self) -> Option<ElementId> {
        match self.data {
            TypeData::Class(id) => Some(id),
            _ => None,
        }
    }

    pub fn signature(&self) -> Option<&Signature> {
        match &self.data {
            TypeData::Function(sig) => Some(sig),
            _ => None,
        }
    }

    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match self.data {
            TypeData::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Byte size used by field-layout alignment (I4, I5). Function and class
    /// types are reference-shaped: stored as a pointer, `pointer_width` wide.
    pub fn byte_size(&self) -> Option<u32> {
        match &self.data {
            TypeData::Primitive(p) => p.byte_size(),
            TypeData::Function(_) | TypeData::Class(_) => Some(self.pointer_width.byte_size()),
        }
    }

    pub fn display_name(&self, table: &TypeTable) -> String {
        match &self.data {
            TypeData::Primitive(p) => p.name().to_string(),
            TypeData::Function(sig) => sig.display_name(table),
            TypeData::Class(id) => table.class_name(*id).unwrap_or_else(|| format!("<class {}>", id.0)),
        }
    }
}

/// Maps type-expression names (bare and path-qualified) to concrete, interned
/// [`Type`]s, and provides the handles the resolver treats as pointer-equal.
pub struct TypeTable {
    types: Vec<Type>,
    by_name: FxHashMap<String, TypeId>,
    class_cache: FxHashMap<ElementId, TypeId>,
    signature_cache: FxHashMap<Signature, TypeId>,
    class_names: FxHashMap<ElementId, String>,
    pointer_width_isize: PointerWidth,
    pointer_width_usize: PointerWidth,

    pub i8: TypeId,
    pub i16: TypeId,
    pub i32: TypeId,
    pub i64: TypeId,
    pub u8: TypeId,
    pub u16: TypeId,
    pub u32: TypeId,
    pub u64: TypeId,
    pub f32: TypeId,
    pub f64: TypeId,
    pub bool_: TypeId,
    pub void: TypeId,
    pub isize_: TypeId,
    pub usize_: TypeId,
    pub number: TypeId,
    pub boolean: TypeId,
    /// Populated after `~lib/string`'s `String` class resolves (§4.1 drain phase).
    pub string: Option<TypeId>,
}

impl TypeTable {
    /// Initialization injects the base primitive set (§4.4).
    pub fn new(isize_width: PointerWidth, usize_width: PointerWidth) -> Self {
        let mut table = Self {
            types: Vec::new(),
            by_name: FxHashMap::default(),
            class_cache: FxHashMap::default(),
            signature_cache: FxHashMap::default(),
            class_names: FxHashMap::default(),
            pointer_width_isize: isize_width,
            pointer_width_usize: usize_width,
            i8: TypeId(0),
            i16: TypeId(0),
            i32: TypeId(0),
            i64: TypeId(0),
            u8: TypeId(0),
            u16: TypeId(0),
            u32: TypeId(0),
            u64: TypeId(0),
            f32: TypeId(0),
            f64: TypeId(0),
            bool_: TypeId(0),
            void: TypeId(0),
            isize_: TypeId(0),
            usize_: TypeId(0),
            number: TypeId(0),
            boolean: TypeId(0),
            string: None,
        };

        table.i8 = table.intern_primitive(PrimitiveKind::I8, isize_width);
        table.i16 = table.intern_primitive(PrimitiveKind::I16, isize_width);
        table.i32 = table.intern_primitive(PrimitiveKind::I32, isize_width);
        table.i64 = table.intern_primitive(PrimitiveKind::I64, isize_width);
        table.u8 = table.intern_primitive(PrimitiveKind::U8, isize_width);
        table.u16 = table.intern_primitive(PrimitiveKind::U16, isize_width);
        table.u32 = table.intern_primitive(PrimitiveKind::U32, isize_width);
        table.u64 = table.intern_primitive(PrimitiveKind::U64, isize_width);
        table.f32 = table.intern_primitive(PrimitiveKind::F32, isize_width);
        table.f64 = table.intern_primitive(PrimitiveKind::F64, isize_width);
        table.bool_ = table.intern_primitive(PrimitiveKind::Bool, isize_width);
        table.void = table.intern_primitive(PrimitiveKind::Void, isize_width);

        table.isize_ = match isize_width {
            PointerWidth::Bits32 => table.i32,
            PointerWidth::Bits64 => table.i64,
        };
        table.usize_ = match usize_width {
            PointerWidth::Bits32 => table.u32,
            PointerWidth::Bits64 => table.u64,
        };
        table.by_name.insert("isize".to_string(), table.isize_);
        table.by_name.insert("usize".to_string(), table.usize_);

        // `number`/`boolean` aliases (§4.4).
        table.number = table.f64;
        table.boolean = table.bool_;
        table.by_name.insert("number".to_string(), table.number);
        table.by_name.insert("boolean".to_string(), table.boolean);

        table
    }

    fn intern_primitive(&mut self, kind: PrimitiveKind, pointer_width: PointerWidth) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(Type { data: TypeData::Primitive(kind), pointer_width });
        self.by_name.insert(kind.name().to_string(), id);
        id
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.0 as usize]
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Registers `string` after the `String` class resolves, per the drain
    /// phase's well-known-prototype step. Collision with an existing `string`
    /// binding is the caller's responsibility to detect as duplicate-identifier.
    pub fn register_string_class(&mut self, element: ElementId, display_name: String) {
        let id = self.class_type(element, display_name);
        self.string = Some(id);
        self.by_name.insert("string".to_string(), id);
    }

    /// Interns (or returns the cached) class type for `element` (I3/P8: stable
    /// per `ElementId`, so two lookups of the same class return the same
    /// `TypeId`).
    pub fn class_type(&mut self, element: ElementId, display_name: String) -> TypeId {
        if let Some(existing) = self.class_cache.get(&element) {
            return *existing;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(Type { data: TypeData::Class(element), pointer_width: self.pointer_width_usize });
        self.class_cache.insert(element, id);
        self.class_names.insert(element, display_name);
        id
    }

    fn class_name(&self, element: ElementId) -> Option<String> {
        self.class_names.get(&element).cloned()
    }

    /// Interns (or returns the cached) function-pointer type for `signature`.
    pub fn function_type(&mut self, signature: Signature) -> TypeId {
        if let Some(existing) = self.signature_cache.get(&signature) {
            return *existing;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(Type { data: TypeData::Function(signature.clone()), pointer_width: self.pointer_width_usize });
        self.signature_cache.insert(signature, id);
        id
    }

    /// Qualify a class or alias under both a local (file-scoped) and global
    /// name, mirroring `resolveType`'s `localName`/`globalName` probe (§4.2.1).
    pub fn register_alias(&mut self, name: impl Into<String>, id: TypeId) {
        self.by_name.insert(name.into(), id);
    }

    pub fn isize_width(&self) -> PointerWidth {
        self.pointer_width_isize
    }

    pub fn usize_width(&self) -> PointerWidth {
        self.pointer_width_usize
    }
}

/// Canonicalizes a list of type-argument `TypeId`s into the `<…>` instance key
/// used by `prototype.instances` (I3, §3.1).
pub fn canonicalize_type_arguments(table: &TypeTable, args: &[TypeId]) -> String {
    if args.is_empty() {
        return String::new();
    }
    let parts: SmallVec<[String; 4]> = args.iter().map(|id| table.get(*id).display_name(table)).collect();
    parts.join(",")
}

/// A bare name for a simple type argument placeholder lookup in contextual
/// type arguments (§4.2.1 step 5).
pub fn simple_name_of(name: &Atom, table_interner: &glyph_common::Interner) -> String {
    table_interner.resolve(*name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_value_equal_by_id() {
        let table = TypeTable::new(PointerWidth::Bits32, PointerWidth::Bits32);
        assert_eq!(table.lookup_by_name("i32"), Some(table.i32));
        assert_eq!(table.get(table.i32).byte_size(), Some(4));
        assert_eq!(table.get(table.isize_).byte_size(), Some(4));
    }

    #[test]
    fn class_types_are_cached_per_element() {
        let mut table = TypeTable::new(PointerWidth::Bits32, PointerWidth::Bits32);
        let element = ElementId(7);
        let a = table.class_type(element, "a/Foo".to_string());
        let b = table.class_type(element, "a/Foo".to_string());
        assert_eq!(a, b, "P8: resolving the same class twice must be pointer-equal");
    }

    #[test]
    fn isize_usize_resolve_per_configuration() {
        let table64 = TypeTable::new(PointerWidth::Bits64, PointerWidth::Bits64);
        assert_eq!(table64.get(table64.isize_).byte_size(), Some(8));
        let table32 = TypeTable::new(PointerWidth::Bits32, PointerWidth::Bits32);
        assert_eq!(table32.get(table32.isize_).byte_size(), Some(4));
    }
}
