//! `FlowFlags` (§4.3): termination facts accumulated per branch/scope.

bitflags::bitflags! {
    /// Mirrors the unconditional/conditional flag pairing described in §4.3:
    /// a branch that unconditionally returns on every path sets `RETURNS`;
    /// one that returns on only some paths sets `RETURNS_CONDITIONAL` once
    /// folded into its parent by `leaveBranchOrScope()`.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    pub struct FlowFlags: u32 {
        const RETURNS = 1 << 0;
        const THROWS = 1 << 1;
        const BREAKS = 1 << 2;
        const CONTINUES = 1 << 3;
        const ALLOCATES = 1 << 4;

        const RETURNS_CONDITIONAL = 1 << 5;
        const THROWS_CONDITIONAL = 1 << 6;
        const BREAKS_CONDITIONAL = 1 << 7;
        const CONTINUES_CONDITIONAL = 1 << 8;
        const ALLOCATES_CONDITIONAL = 1 << 9;

        /// Set on flows entered while inlining a call; temp locals allocated
        /// under this flag are never recycled (§4.3 "Inlined locals are not
        /// recycled").
        const INLINE_CONTEXT = 1 << 10;
    }
}

impl FlowFlags {
    /// Maps each unconditional bit present in `self` to its conditional
    /// counterpart, dropping everything else. Used by `leaveBranchOrScope()`
    /// to fold a child's definite termination facts into the parent as
    /// merely possible ones.
    pub fn to_conditional(self) -> FlowFlags {
        let mut out = FlowFlags::empty();
        if self.contains(FlowFlags::RETURNS) {
            out |= FlowFlags::RETURNS_CONDITIONAL;
        }
        if self.contains(FlowFlags::THROWS) {
            out |= FlowFlags::THROWS_CONDITIONAL;
        }
        if self.contains(FlowFlags::BREAKS) {
            out |= FlowFlags::BREAKS_CONDITIONAL;
        }
        if self.contains(FlowFlags::CONTINUES) {
            out |= FlowFlags::CONTINUES_CONDITIONAL;
        }
        if self.contains(FlowFlags::ALLOCATES) {
            out |= FlowFlags::ALLOCATES_CONDITIONAL;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_conditional_maps_only_unconditional_bits() {
        let flags = FlowFlags::RETURNS | FlowFlags::BREAKS_CONDITIONAL;
        let conditional = flags.to_conditional();
        assert!(conditional.contains(FlowFlags::RETURNS_CONDITIONAL));
        assert!(!conditional.contains(FlowFlags::BREAKS_CONDITIONAL));
    }
}
