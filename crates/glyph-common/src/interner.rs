//! String interning for internal names and simple identifiers.

use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};

/// An interned string. Cheap to copy and compare; compares by index, not by content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(u32);

/// A string interner shared by every component that needs to compare names cheaply.
///
/// Internal names are built and compared constantly during initialization and
/// resolution (lookup-table keys, instance-cache keys); interning means those
/// comparisons are integer comparisons rather than string comparisons.
pub struct Interner {
    inner: RwLock<InternerInner>,
}

struct InternerInner {
    strings: Vec<Arc<str>>,
    lookup: FxHashMap<Arc<str>, Atom>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(InternerInner {
                strings: Vec::new(),
                lookup: FxHashMap::default(),
            }),
        }
    }

    pub fn intern(&self, s: &str) -> Atom {
        if let Some(atom) = self.inner.read().unwrap().lookup.get(s) {
            return *atom;
        }
        let mut inner = self.inner.write().unwrap();
        if let Some(atom) = inner.lookup.get(s) {
            return *atom;
        }
        let arc: Arc<str> = Arc::from(s);
        let id = Atom(inner.strings.len() as u32);
        inner.strings.push(arc.clone());
        inner.lookup.insert(arc, id);
        id
    }

    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.inner.read().unwrap().strings[atom.0 as usize].clone()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let interner = Interner::new();
        let a = interner.intern("a/Foo#bar");
        let b = interner.intern("a/Foo#bar");
        assert_eq!(a, b);
        assert_ne!(a, interner.intern("a/Foo#baz"));
        assert_eq!(&*interner.resolve(a), "a/Foo#bar");
    }
}
