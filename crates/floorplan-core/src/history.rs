//! Undo/redo history of floor-plan snapshots.
//!
//! Each entry is a full copy of the document rather than a delta, so any
//! entry can be restored on its own.

use crate::plan::FloorPlan;

/// Snapshot stack with a cursor pointing at the current document.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<FloorPlan>,
    cursor: usize,
}

impl History {
    /// Start a history whose only entry is `initial`.
    pub fn new(initial: FloorPlan) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// Drop everything and start over from `initial`.
    pub fn reset(&mut self, initial: FloorPlan) {
        self.entries.clear();
        self.entries.push(initial);
        self.cursor = 0;
    }

    /// Record a new snapshot, discarding anything that could have been redone.
    pub fn commit(&mut self, plan: FloorPlan) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(plan);
        self.cursor = self.entries.len() - 1;
        log::debug!("History commit: {} entries, cursor {}", self.entries.len(), self.cursor);
    }

    /// Step back one snapshot.
    pub fn undo(&mut self) -> Option<&FloorPlan> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward one snapshot.
    pub fn redo(&mut self) -> Option<&FloorPlan> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    /// Snapshot under the cursor.
    pub fn current(&self) -> &FloorPlan {
        &self.entries[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of stored snapshots, including the initial one.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> FloorPlan {
        FloorPlan {
            name: name.to_string(),
            ..FloorPlan::default()
        }
    }

    #[test]
    fn test_undo_redo() {
        let mut history = History::new(named("s0"));
        history.commit(named("s1"));
        history.commit(named("s2"));

        assert_eq!(history.undo().map(|p| p.name.as_str()), Some("s1"));
        assert_eq!(history.undo().map(|p| p.name.as_str()), Some("s0"));
        assert!(history.undo().is_none());
        assert_eq!(history.current().name, "s0");

        assert_eq!(history.redo().map(|p| p.name.as_str()), Some("s1"));
        assert_eq!(history.redo().map(|p| p.name.as_str()), Some("s2"));
        assert!(history.redo().is_none());
        assert_eq!(history.current().name, "s2");
    }

    #[test]
    fn test_commit_truncates_redo_tail() {
        let mut history = History::new(named("s0"));
        history.commit(named("s1"));
        history.commit(named("s2"));
        history.undo();
        history.undo();

        history.commit(named("branch"));
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.current().name, "branch");
        assert_eq!(history.undo().map(|p| p.name.as_str()), Some("s0"));
    }

    #[test]
    fn test_can_undo_can_redo() {
        let mut history = History::new(named("s0"));
        assert!(!history.can_undo());
        assert!(!history.can_redo());

        history.commit(named("s1"));
        assert!(history.can_undo());
        history.undo();
        assert!(history.can_redo());
    }

    #[test]
    fn test_reset() {
        let mut history = History::new(named("s0"));
        history.commit(named("s1"));
        history.reset(named("fresh"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.current().name, "fresh");
    }
}
