//! The element arena (§9 "Ownership of the graph"): elements live here once,
//! addressed everywhere else by `ElementId`. The arena itself never removes
//! entries — declaration errors skip *inserting* the offending declaration
//! (§7), they never retract one already in the arena.

use crate::element::Element;
use glyph_common::ElementId;

#[derive(Default)]
pub struct ElementArena {
    elements: Vec<Element>,
}

impl ElementArena {
    pub fn new() -> Self {
        Self { elements: Vec::new() }
    }

    pub fn insert(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(element);
        id
    }

    pub fn get(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }

    pub fn get_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.index()]
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements.iter().enumerate().map(|(i, e)| (ElementId(i as u32), e))
    }
}
