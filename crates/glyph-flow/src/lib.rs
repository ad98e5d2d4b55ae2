//! Per-function control-flow facts (§4.3): scoped locals, break/continue/
//! return labels, and branch-termination flags.

mod flags;
mod temp;

pub use flags::FlowFlags;
pub use temp::NativeType;

use glyph_common::{ElementId, FlowNodeId, InternalError};
use glyph_types::TypeId;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use temp::TempLocalPools;

/// A node in the per-function control-flow tree (§4.3).
pub struct FlowNode {
    pub parent: Option<FlowNodeId>,
    pub flags: FlowFlags,
    pub function: ElementId,
    pub continue_label: Option<u32>,
    pub break_label: Option<u32>,
    pub return_label: Option<u32>,
    pub return_type: Option<TypeId>,
    pub contextual_type_arguments: FxHashMap<String, TypeId>,
    /// Locals bound in this scope only, each tagged with the native type its
    /// temp slot was allocated from.
    scoped_locals: IndexMap<String, (ElementId, NativeType)>,
}

impl FlowNode {
    fn child_of(parent_id: FlowNodeId, parent: &FlowNode) -> Self {
        Self {
            parent: Some(parent_id),
            flags: parent.flags,
            function: parent.function,
            continue_label: parent.continue_label,
            break_label: parent.break_label,
            return_label: parent.return_label,
            return_type: parent.return_type,
            contextual_type_arguments: parent.contextual_type_arguments.clone(),
            scoped_locals: IndexMap::new(),
        }
    }
}

struct FunctionFlowState {
    root: FlowNodeId,
    temp_pools: TempLocalPools,
    /// Break/continue contexts are a stack of integer IDs on the function;
    /// labels are decimal strings of the IDs (§9).
    next_label_id: u32,
}

/// Owns every function's flow tree and temp-local free-lists.
#[derive(Default)]
pub struct FlowTracker {
    nodes: Vec<FlowNode>,
    functions: FxHashMap<ElementId, FunctionFlowState>,
}

impl FlowTracker {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), functions: FxHashMap::default() }
    }

    /// Creates a function's root flow node (§4.2.7 step 7).
    pub fn create_function_flow(&mut self, function: ElementId, return_type: Option<TypeId>) -> FlowNodeId {
        let id = FlowNodeId(self.nodes.len() as u32);
        self.nodes.push(FlowNode {
            parent: None,
            flags: FlowFlags::empty(),
            function,
            continue_label: None,
            break_label: None,
            return_label: None,
            return_type,
            contextual_type_arguments: FxHashMap::default(),
            scoped_locals: IndexMap::new(),
        });
        self.functions.insert(function, FunctionFlowState { root: id, temp_pools: TempLocalPools::default(), next_label_id: 0 });
        id
    }

    pub fn get(&self, id: FlowNodeId) -> &FlowNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: FlowNodeId) -> &mut FlowNode {
        &mut self.nodes[id.index()]
    }

    pub fn root_flow(&self, function: ElementId) -> Option<FlowNodeId> {
        self.functions.get(&function).map(|s| s.root)
    }

    /// `enterBranchOrScope()`: creates a child with the parent's flags copied;
    /// child modifications do not affect the parent directly.
    pub fn enter_branch_or_scope(&mut self, parent_id: FlowNodeId) -> FlowNodeId {
        let child = FlowNode::child_of(parent_id, &self.nodes[parent_id.index()]);
        let id = FlowNodeId(self.nodes.len() as u32);
        self.nodes.push(child);
        id
    }

    /// Allocates a fresh break/continue label id for `function` (§9).
    pub fn next_label(&mut self, function: ElementId) -> u32 {
        let state = self.functions.get_mut(&function).expect("function flow not created");
        let label = state.next_label_id;
        state.next_label_id += 1;
        label
    }

    /// `addScopedLocal(type, name)`: allocates a temp local of the given
    /// native type and binds `name` in `flow`'s scope. Duplicate name in the
    /// same scope is the caller's responsibility to reject as *duplicate
    /// identifier* (graph-level diagnostics are not this crate's concern);
    /// this returns `false` to signal that case without emitting anything.
    pub fn add_scoped_local(&mut self, flow: FlowNodeId, name: String, element: ElementId, native_type: NativeType) -> bool {
        let node = &mut self.nodes[flow.index()];
        if node.scoped_locals.contains_key(&name) {
            return false;
        }
        node.scoped_locals.insert(name, (element, native_type));
        true
    }

    /// `getScopedLocal(name)`: walks the parent chain only (the function's
    /// main locals map lives in the element graph; callers fall back to it).
    pub fn get_scoped_local(&self, flow: FlowNodeId, name: &str) -> Option<(ElementId, NativeType)> {
        let mut current = Some(flow);
        while let Some(id) = current {
            let node = &self.nodes[id.index()];
            if let Some(found) = node.scoped_locals.get(name) {
                return Some(*found);
            }
            current = node.parent;
        }
        None
    }

    /// `getTempLocal(type)`: pops a recycled element of the right native type,
    /// or returns `None` meaning the caller must create a new `Local` element
    /// (and later register it with [`FlowTracker::free_temp_local`]).
    pub fn get_temp_local(&mut self, function: ElementId, native_type: NativeType) -> Option<ElementId> {
        self.functions.get_mut(&function)?.temp_pools.pop(native_type)
    }

    /// `freeTempLocal(local)`: pushes `element` back onto `function`'s
    /// free-list for `native_type`. Inlined locals are never passed here
    /// (§4.3 "Inlined locals are not recycled").
    pub fn free_temp_local(&mut self, function: ElementId, native_type: NativeType, element: ElementId) {
        if let Some(state) = self.functions.get_mut(&function) {
            state.temp_pools.push(native_type, element);
        }
    }

    /// `leaveBranchOrScope()`: frees every scoped local in `child` back to the
    /// owning function's free-lists, then folds flags upward into `parent`
    /// per §4.3's rule: unconditional X in the child becomes conditional X in
    /// the parent; BREAKS/CONTINUES fold only when the child's break/continue
    /// label matches the parent's label (otherwise the jump escapes this
    /// frame and must propagate unconditionally instead).
    pub fn leave_branch_or_scope(&mut self, child: FlowNodeId) -> Result<FlowNodeId, InternalError> {
        let parent_id = self.nodes[child.index()].parent.ok_or(InternalError::UnbalancedFlowScope)?;
        let function = self.nodes[child.index()].function;

        let scoped: Vec<(ElementId, NativeType)> = self.nodes[child.index()].scoped_locals.values().copied().collect();
        for (element, native_type) in scoped {
            self.free_temp_local(function, native_type, element);
        }

        let child_flags = self.nodes[child.index()].flags;
        let child_break = self.nodes[child.index()].break_label;
        let child_continue = self.nodes[child.index()].continue_label;
        let parent_break = self.nodes[parent_id.index()].break_label;
        let parent_continue = self.nodes[parent_id.index()].continue_label;

        let parent = &mut self.nodes[parent_id.index()];
        parent.flags |= child_flags.to_conditional();
        if child_break == parent_break {
            parent.flags |= (child_flags & FlowFlags::BREAKS).to_conditional() | (child_flags & FlowFlags::BREAKS);
        }
        if child_continue == parent_continue {
            parent.flags |= (child_flags & FlowFlags::CONTINUES).to_conditional() | (child_flags & FlowFlags::CONTINUES);
        }

        Ok(parent_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_exit_returns_temps_and_folds_flags_conditionally() {
        let mut tracker = FlowTracker::new();
        let function = ElementId(0);
        let root = tracker.create_function_flow(function, None);

        let child = tracker.enter_branch_or_scope(root);
        let local = ElementId(1);
        assert!(tracker.add_scoped_local(child, "x".to_string(), local, NativeType::I32));
        tracker.get_mut(child).flags |= FlowFlags::RETURNS;

        let parent = tracker.leave_branch_or_scope(child).unwrap();
        assert_eq!(parent, root);
        assert!(tracker.get(root).flags.contains(FlowFlags::RETURNS_CONDITIONAL));
        assert!(!tracker.get(root).flags.contains(FlowFlags::RETURNS));

        // P9: the temp freed on scope exit is immediately available again.
        assert_eq!(tracker.get_temp_local(function, NativeType::I32), Some(local));
    }

    #[test]
    fn breaks_only_fold_when_labels_match() {
        let mut tracker = FlowTracker::new();
        let function = ElementId(0);
        let root = tracker.create_function_flow(function, None);
        tracker.get_mut(root).break_label = Some(1);

        let child = tracker.enter_branch_or_scope(root);
        tracker.get_mut(child).break_label = Some(2); // escapes to an outer loop
        tracker.get_mut(child).flags |= FlowFlags::BREAKS;

        tracker.leave_branch_or_scope(child).unwrap();
        assert!(!tracker.get(root).flags.contains(FlowFlags::BREAKS));
        assert!(!tracker.get(root).flags.contains(FlowFlags::BREAKS_CONDITIONAL));
    }
}
