//! Drawer target resolution.

use std::collections::{BTreeSet, HashSet};

/// Answers whether a drawer note exists for the page being rendered.
pub trait DrawerLookup {
    /// Whether `target` names an existing drawer note.
    fn has_drawer(&self, target: &str) -> bool;
}

/// A lookup with no drawer notes; every drawer control is reported missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDrawers;

impl DrawerLookup for NoDrawers {
    fn has_drawer(&self, _target: &str) -> bool {
        false
    }
}

impl DrawerLookup for HashSet<String> {
    fn has_drawer(&self, target: &str) -> bool {
        self.contains(target)
    }
}

impl DrawerLookup for BTreeSet<String> {
    fn has_drawer(&self, target: &str) -> bool {
        self.contains(target)
    }
}

impl DrawerLookup for [&str] {
    fn has_drawer(&self, target: &str) -> bool {
        self.contains(&target)
    }
}
