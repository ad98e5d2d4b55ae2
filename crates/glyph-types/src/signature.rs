//! Resolved function signatures (§3.3, §4.2.1 `resolveSignature`).

use crate::{TypeId, TypeTable};
use glyph_common::Atom;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub parameter_types: Vec<TypeId>,
    pub parameter_names: Vec<Atom>,
    /// Index of the last non-default parameter + 1 (§4.2.1).
    pub required_count: usize,
    /// Set only on the terminal parameter; enforced by the resolver, not by
    /// this type (§9 rest-parameter Open Question).
    pub has_rest: bool,
    pub return_type: TypeId,
    pub this_type: Option<TypeId>,
}

impl Signature {
    pub fn display_name(&self, table: &TypeTable) -> String {
        let params: Vec<String> =
            self.parameter_types.iter().map(|id| table.get(*id).display_name(table)).collect();
        let ret = table.get(self.return_type).display_name(table);
        format!("({}) => {}", params.join(", "), ret)
    }
}
