use std::collections::VecDeque;

use log::trace;

use crate::{
    components::PlacedComponent,
    types::{ComponentId, ComponentKind, Rotation},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub x: i32,
    pub y: i32,
    pub rotation: Rotation,
}

/// Frozen copy of every component on the workspace. Values are not part of
/// a snapshot; a restored workspace has to be simulated again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    entries: Box<[SnapshotEntry]>,
}

impl Snapshot {
    pub fn capture(components: &[PlacedComponent]) -> Snapshot {
        Snapshot {
            entries: components
                .iter()
                .map(|c| SnapshotEntry {
                    id: c.id.clone(),
                    kind: c.kind,
                    x: c.x,
                    y: c.y,
                    rotation: c.rotation,
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn restore(&self) -> Vec<PlacedComponent> {
        self.entries
            .iter()
            .map(|e| PlacedComponent::new(e.id.clone(), e.kind, e.x, e.y, e.rotation))
            .collect()
    }
}

/// Undo/redo stacks of whole-workspace snapshots. The undo stack holds the
/// state from before each committed mutation and drops its oldest entry once
/// `capacity` is exceeded.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    capacity: usize,
}

impl CommandHistory {
    pub fn new(capacity: usize) -> CommandHistory {
        CommandHistory {
            undo: VecDeque::with_capacity(capacity + 1),
            redo: Vec::new(),
            capacity,
        }
    }

    pub fn record(&mut self, before: Snapshot) {
        self.undo.push_back(before);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
            trace!("history full, evicted oldest snapshot");
        }
        self.redo.clear();
    }

    /// Swaps `current` for the most recent undo snapshot. Returns `None` (and
    /// keeps `current` out of the redo stack) when there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let prev = self.undo.pop_back()?;
        self.redo.push(current);
        Some(prev)
    }

    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(n: usize) -> Snapshot {
        let comps: Vec<PlacedComponent> = (0..n)
            .map(|i| {
                PlacedComponent::new(
                    ComponentId::generate(ComponentKind::Wire, i as u64),
                    ComponentKind::Wire,
                    40 * i as i32,
                    0,
                    Rotation::R0,
                )
            })
            .collect();
        Snapshot::capture(&comps)
    }

    #[test]
    fn empty_history_is_a_no_op() {
        let mut h = CommandHistory::new(5);
        assert!(h.undo(snap(1)).is_none());
        assert!(h.redo(snap(1)).is_none());
        assert_eq!(h.redo_depth(), 0);
    }

    #[test]
    fn undo_then_redo_swaps_states() {
        let mut h = CommandHistory::new(5);
        h.record(snap(0));
        let back = h.undo(snap(1)).unwrap();
        assert!(back.is_empty());
        assert!(h.can_redo());
        let fwd = h.redo(back).unwrap();
        assert_eq!(fwd, snap(1));
        assert!(h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn new_record_clears_redo() {
        let mut h = CommandHistory::new(5);
        h.record(snap(0));
        h.undo(snap(1));
        assert!(h.can_redo());
        h.record(snap(0));
        assert!(!h.can_redo());
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut h = CommandHistory::new(3);
        for n in 0..4 {
            h.record(snap(n));
        }
        assert_eq!(h.undo_depth(), 3);
        assert_eq!(h.undo(snap(4)).unwrap().len(), 3);
        assert_eq!(h.undo(snap(3)).unwrap().len(), 2);
        assert_eq!(h.undo(snap(2)).unwrap().len(), 1);
        // the snapshot of the empty workspace was evicted
        assert!(h.undo(snap(1)).is_none());
    }

    #[test]
    fn restore_keeps_ids() {
        let s = snap(2);
        let comps = s.restore();
        assert_eq!(comps[1].id.as_str(), "wire_1");
        assert_eq!(comps[1].x, 40);
        assert!(comps.iter().all(|c| c.value.is_none()));
    }
}
