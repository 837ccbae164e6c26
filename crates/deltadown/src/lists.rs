//! Per-call list nesting state.
//!
//! Both renderers track one counter per (list flavor, indent depth)
//! while walking consecutive list nodes. The markdown renderer reads the
//! counters for ordinal numbering; the HTML renderer only cares which
//! levels are currently open.

use std::collections::BTreeMap;

use deltadown_core::ListKind;

#[derive(Debug, Default)]
pub(crate) struct ListLevels {
    bullet: BTreeMap<usize, u32>,
    ordered: BTreeMap<usize, u32>,
}

impl ListLevels {
    fn counters(&self, kind: ListKind) -> &BTreeMap<usize, u32> {
        match kind {
            ListKind::Bullet => &self.bullet,
            ListKind::Ordered => &self.ordered,
        }
    }

    fn counters_mut(&mut self, kind: ListKind) -> &mut BTreeMap<usize, u32> {
        match kind {
            ListKind::Bullet => &mut self.bullet,
            ListKind::Ordered => &mut self.ordered,
        }
    }

    /// Forget everything. Called when a non-list node interrupts a run of
    /// list items.
    pub fn reset(&mut self) {
        self.bullet.clear();
        self.ordered.clear();
    }

    pub fn contains(&self, kind: ListKind, indent: usize) -> bool {
        self.counters(kind).contains_key(&indent)
    }

    /// Open a level with a zeroed counter.
    pub fn open(&mut self, kind: ListKind, indent: usize) {
        self.counters_mut(kind).insert(indent, 0);
    }

    /// Advance the counter at a level, opening it when absent, and return
    /// the new ordinal.
    pub fn bump(&mut self, kind: ListKind, indent: usize) -> u32 {
        let counter = self.counters_mut(kind).entry(indent).or_insert(0);
        *counter += 1;
        *counter
    }

    pub fn remove(&mut self, kind: ListKind, indent: usize) {
        self.counters_mut(kind).remove(&indent);
    }

    /// Drop contiguous levels deeper than `indent`, so a sublist restarts
    /// its numbering the next time it appears.
    pub fn clear_deeper(&mut self, kind: ListKind, indent: usize) {
        let mut level = indent + 1;
        while self.counters_mut(kind).remove(&level).is_some() {
            level += 1;
        }
    }

    /// Drop the other flavor's levels from `indent` down to the root;
    /// switching flavors at a depth abandons the other flavor's chain of
    /// ancestors.
    pub fn clear_other_up_to(&mut self, kind: ListKind, indent: usize) {
        let other = self.counters_mut(kind.other());
        for level in 0..=indent {
            other.remove(&level);
        }
    }

    /// Number of currently open levels of a flavor.
    pub fn depth(&self, kind: ListKind) -> usize {
        self.counters(kind).len()
    }

    pub fn clear(&mut self, kind: ListKind) {
        self.counters_mut(kind).clear();
    }
}
