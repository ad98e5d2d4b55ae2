//! `resolveIdentifier` (§4.2.2).

use crate::{ResolveContext, Resolver};
use glyph_common::{diagnostic::codes, ElementId, Span};
use glyph_graph::Element;

impl<'a> Resolver<'a> {
    /// Returns the element `name` refers to, or `None` with a diagnostic
    /// already reported. `span` anchors the *Cannot find name* diagnostic at
    /// the identifier's own source location.
    pub fn resolve_identifier(&mut self, name: &str, span: Span, ctx: &ResolveContext) -> Option<ElementId> {
        if let Some(enum_id) = ctx.contextual_enum {
            if let Element::Enum(e) = self.graph.get(enum_id) {
                if let Some(value_id) = e.values.get(name) {
                    return Some(*value_id);
                }
            }
        }

        if let (Some(function_id), Some(flow)) = (ctx.contextual_function, ctx.flow) {
            if let Some((local_id, _)) = self.flow.get_scoped_local(flow, name) {
                return Some(local_id);
            }
            if let Element::Function(f) = self.graph.get(function_id) {
                if let Some(local_id) =
                    f.locals.iter().find(|id| self.graph.get(**id).header().is_some_and(|h| h.simple_name == name))
                {
                    return Some(*local_id);
                }
            }

            let mut namespace = self.graph.get(function_id).header().and_then(|h| h.namespace);
            while let Some(namespace_id) = namespace {
                let Some(ns_header) = self.graph.get(namespace_id).header() else { break };
                let qualified = format!("{}.{name}", ns_header.internal_name);
                if let Some(id) = self.graph.lookup(&qualified) {
                    return Some(id);
                }
                namespace = ns_header.namespace;
            }
        }

        let file_scoped = format!("{}/{name}", ctx.source_path);
        if let Some(id) = self.graph.lookup(&file_scoped) {
            return Some(id);
        }

        if let Some(id) = self.graph.lookup(name) {
            return Some(id);
        }

        self.report(span, codes::CANNOT_FIND_NAME, format!("Cannot find name '{name}'."));
        None
    }
}
