//! Temp-local free-lists (§4.3): one per native type, per function.

/// The four native types a local can occupy a slot of (§4.3, §9). Distinct
/// from `glyph_types::PrimitiveKind`: this is the narrower machine-level set
/// that backs register/slot allocation, not the source type system.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NativeType {
    I32,
    I64,
    F32,
    F64,
}

#[derive(Default)]
pub struct TempLocalPools {
    i32_pool: Vec<glyph_common::ElementId>,
    i64_pool: Vec<glyph_common::ElementId>,
    f32_pool: Vec<glyph_common::ElementId>,
    f64_pool: Vec<glyph_common::ElementId>,
}

impl TempLocalPools {
    fn pool_mut(&mut self, native_type: NativeType) -> &mut Vec<glyph_common::ElementId> {
        match native_type {
            NativeType::I32 => &mut self.i32_pool,
            NativeType::I64 => &mut self.i64_pool,
            NativeType::F32 => &mut self.f32_pool,
            NativeType::F64 => &mut self.f64_pool,
        }
    }

    pub fn pop(&mut self, native_type: NativeType) -> Option<glyph_common::ElementId> {
        self.pool_mut(native_type).pop()
    }

    pub fn push(&mut self, native_type: NativeType, element: glyph_common::ElementId) {
        self.pool_mut(native_type).push(element);
    }
}
