//! Modifier bitsets shared by AST declarations and graph elements.
//!
//! `CommonFlags` mixes flags that are written by the programmer (import, export,
//! static, ...) with flags that are derived during initialization (instance,
//! constructor, moduleExport, ...); both live on the same bitset because nothing
//! in the core ever needs to distinguish "declared" from "derived" bits once an
//! element exists, only while it's being built.

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CommonFlags: u32 {
        // Declared modifiers (as written in source).
        const IMPORT    = 1 << 0;
        const EXPORT    = 1 << 1;
        const DECLARE   = 1 << 2;
        const CONST     = 1 << 3;
        const LET       = 1 << 4;
        const STATIC    = 1 << 5;
        const READONLY  = 1 << 6;
        const ABSTRACT  = 1 << 7;
        const PUBLIC    = 1 << 8;
        const PRIVATE   = 1 << 9;
        const PROTECTED = 1 << 10;
        const GET       = 1 << 11;
        const SET       = 1 << 12;

        // Derived during initialization/resolution.
        const AMBIENT         = 1 << 13;
        const GENERIC         = 1 << 14;
        const GENERIC_CONTEXT = 1 << 15;
        const INSTANCE        = 1 << 16;
        const CONSTRUCTOR     = 1 << 17;
        const ARROW           = 1 << 18;
        const MODULE_EXPORT   = 1 << 19;
        const MODULE_IMPORT   = 1 << 20;
        const BUILTIN         = 1 << 21;
        const COMPILED        = 1 << 22;
        const INLINED         = 1 << 23;
        const SCOPED          = 1 << 24;
        const TRAMPOLINE      = 1 << 25;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DecoratorFlags: u8 {
        const GLOBAL    = 1 << 0;
        const UNMANAGED = 1 << 1;
        const SEALED    = 1 << 2;
        const INLINE    = 1 << 3;
    }
}

/// The set of decorators a declaration kind is allowed to carry (§4.1 step 2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecoratorTarget {
    Class,
    Interface,
    Function,
    Method,
}

impl DecoratorTarget {
    pub const fn allowed(self) -> DecoratorFlags {
        match self {
            DecoratorTarget::Class => {
                DecoratorFlags::GLOBAL.union(DecoratorFlags::SEALED).union(DecoratorFlags::UNMANAGED)
            }
            DecoratorTarget::Interface => DecoratorFlags::GLOBAL,
            DecoratorTarget::Function => DecoratorFlags::GLOBAL.union(DecoratorFlags::INLINE),
            DecoratorTarget::Method => DecoratorFlags::INLINE,
        }
    }
}
