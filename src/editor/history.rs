//! Snapshot-based linear undo/redo.
//!
//! The model is deliberately simple: the state loaded at session start, the
//! snapshots committed after it, and a redo stack of snapshots popped off by
//! undo. Committing a fresh edit clears the redo stack entirely — undone
//! branches do not survive a new edit. This is a linear history, not a tree.
//!
//! Invariants:
//! - The initial state is always reachable; undo can never go below it.
//! - [`History::current`] is the last committed snapshot, or the initial
//!   state when nothing is committed.
//! - `redo` is only non-empty between an undo and the next commit.
//!
//! The history itself is session-local and never persisted; only the current
//! composition crosses the storage boundary.

use crate::editor::Composition;

/// Undo/redo history over [`Composition`] snapshots.
#[derive(Debug, Clone)]
pub struct History {
    /// The undo floor: the state the session was opened on.
    initial: Composition,
    /// Snapshots committed after the initial state, oldest first.
    committed: Vec<Composition>,
    /// Snapshots popped off by undo, most recently undone last.
    redo: Vec<Composition>,
}

impl History {
    /// A history whose floor is `initial`. Undo can never go below it.
    pub fn new(initial: Composition) -> Self {
        Self {
            initial,
            committed: Vec::new(),
            redo: Vec::new(),
        }
    }

    /// The currently displayed composition.
    pub fn current(&self) -> &Composition {
        self.committed.last().unwrap_or(&self.initial)
    }

    /// Record a new edit. The only way forward progress enters the history;
    /// every edit operation calls this exactly once. Clears the redo stack.
    pub fn commit(&mut self, next: Composition) {
        self.committed.push(next);
        self.redo.clear();
    }

    /// Step back one snapshot, moving the abandoned state onto the redo
    /// stack. A safe no-op at the floor.
    pub fn undo(&mut self) -> &Composition {
        if let Some(top) = self.committed.pop() {
            self.redo.push(top);
        }
        self.current()
    }

    /// Step forward into the most recently undone snapshot. A safe no-op when
    /// nothing has been undone since the last commit.
    pub fn redo(&mut self) -> &Composition {
        if let Some(next) = self.redo.pop() {
            self.committed.push(next);
        }
        self.current()
    }

    pub fn can_undo(&self) -> bool {
        !self.committed.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of snapshots on the main branch, initial state included.
    pub fn depth(&self) -> usize {
        self.committed.len() + 1
    }

    /// Number of snapshots available to redo.
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Layer;

    fn comp(urls: &[&str]) -> Composition {
        Composition::new(urls.iter().map(|u| Layer::new(*u)).collect())
    }

    #[test]
    fn starts_with_only_the_initial_state() {
        let history = History::new(comp(&["a.png"]));
        assert_eq!(history.depth(), 1);
        assert_eq!(history.redo_depth(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.current(), &comp(&["a.png"]));
    }

    #[test]
    fn commit_appends_and_becomes_current() {
        let mut history = History::new(comp(&[]));
        history.commit(comp(&["a.png"]));
        assert_eq!(history.depth(), 2);
        assert_eq!(history.current(), &comp(&["a.png"]));
    }

    #[test]
    fn undo_steps_back_and_feeds_redo() {
        let mut history = History::new(comp(&[]));
        history.commit(comp(&["a.png"]));
        let current = history.undo().clone();
        assert_eq!(current, comp(&[]));
        assert_eq!(history.depth(), 1);
        assert_eq!(history.redo_depth(), 1);
    }

    #[test]
    fn redo_restores_the_undone_state() {
        let mut history = History::new(comp(&[]));
        history.commit(comp(&["a.png"]));
        history.undo();
        let current = history.redo().clone();
        assert_eq!(current, comp(&["a.png"]));
        assert_eq!(history.depth(), 2);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn undo_at_floor_is_a_no_op() {
        let mut history = History::new(comp(&["a.png"]));
        let current = history.undo().clone();
        assert_eq!(current, comp(&["a.png"]));
        assert_eq!(history.depth(), 1);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn redo_with_empty_stack_is_a_no_op() {
        let mut history = History::new(comp(&["a.png"]));
        history.commit(comp(&["a.png", "b.png"]));
        let current = history.redo().clone();
        assert_eq!(current, comp(&["a.png", "b.png"]));
        assert_eq!(history.depth(), 2);
    }

    #[test]
    fn commit_clears_the_redo_stack() {
        let mut history = History::new(comp(&[]));
        history.commit(comp(&["a.png"]));
        history.commit(comp(&["a.png", "b.png"]));
        history.undo();
        assert!(history.can_redo());
        history.commit(comp(&["a.png", "c.png"]));
        assert!(!history.can_redo());
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn n_undos_return_to_initial_and_n_redos_come_back() {
        let initial = comp(&[]);
        let states = [
            comp(&["a.png"]),
            comp(&["a.png", "b.png"]),
            comp(&["a.png", "b.png", "c.png"]),
        ];
        let mut history = History::new(initial.clone());
        for state in &states {
            history.commit(state.clone());
        }

        for _ in 0..states.len() {
            history.undo();
        }
        assert_eq!(history.current(), &initial);

        for _ in 0..states.len() {
            history.redo();
        }
        assert_eq!(history.current(), &states[states.len() - 1]);
    }

    #[test]
    fn redo_stack_preserves_undo_order() {
        let mut history = History::new(comp(&[]));
        history.commit(comp(&["a.png"]));
        history.commit(comp(&["a.png", "b.png"]));
        history.undo();
        history.undo();
        // Redo replays in the original forward order.
        assert_eq!(history.redo().clone(), comp(&["a.png"]));
        assert_eq!(history.redo().clone(), comp(&["a.png", "b.png"]));
    }
}
