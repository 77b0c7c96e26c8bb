//! Undo/Redo history
//!
//! Bounded snapshot history over full canvas states. Undo and redo leave a
//! `RestoreMarker::JustRestored` behind so that the editor's follow-up push
//! (reflecting the restored state back into the store) is swallowed once
//! instead of being recorded as a new entry.

use tracing::debug;

use crate::layers::CanvasState;

/// Maximum number of past states kept.
pub const MAX_HISTORY_LENGTH: usize = 50;

/// Whether the last transition came from undo/redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestoreMarker {
    #[default]
    Idle,
    JustRestored,
}

/// Past / present / future stacks of canvas snapshots.
///
/// `past` is ordered oldest first; `future` holds the next redo target at
/// index 0.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    past: Vec<CanvasState>,
    present: Option<CanvasState>,
    future: Vec<CanvasState>,
    max_length: usize,
    marker: RestoreMarker,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(MAX_HISTORY_LENGTH)
    }
}

impl HistoryManager {
    /// Create an empty history keeping at most `max_length` past states.
    pub fn new(max_length: usize) -> Self {
        Self {
            past: Vec::new(),
            present: None,
            future: Vec::new(),
            max_length: max_length.max(1),
            marker: RestoreMarker::Idle,
        }
    }

    /// Record a new state.
    ///
    /// Swallowed exactly once right after an undo/redo. Otherwise the current
    /// present moves to `past` (oldest entries evicted beyond the limit) and
    /// `future` is cleared.
    pub fn push_state(&mut self, state: CanvasState) {
        if self.marker == RestoreMarker::JustRestored {
            debug!("Skipping history push right after undo/redo");
            self.marker = RestoreMarker::Idle;
            return;
        }

        if let Some(present) = self.present.take() {
            self.past.push(present);
            if self.past.len() > self.max_length {
                let overflow = self.past.len() - self.max_length;
                self.past.drain(..overflow);
            }
        }
        self.present = Some(state);
        self.future.clear();
    }

    /// Step back one state. Returns the new present, or `None` when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Option<&CanvasState> {
        let previous = self.past.pop()?;
        if let Some(present) = self.present.replace(previous) {
            self.future.insert(0, present);
        }
        self.marker = RestoreMarker::JustRestored;
        debug!(
            "Undo: {} past, {} future",
            self.past.len(),
            self.future.len()
        );
        self.present.as_ref()
    }

    /// Step forward one state. Returns the new present, or `None` when there
    /// is nothing to redo.
    pub fn redo(&mut self) -> Option<&CanvasState> {
        if self.future.is_empty() {
            return None;
        }
        let next = self.future.remove(0);
        if let Some(present) = self.present.replace(next) {
            self.past.push(present);
        }
        self.marker = RestoreMarker::JustRestored;
        debug!(
            "Redo: {} past, {} future",
            self.past.len(),
            self.future.len()
        );
        self.present.as_ref()
    }

    /// Forget everything.
    pub fn clear_history(&mut self) {
        self.past.clear();
        self.present = None;
        self.future.clear();
        self.marker = RestoreMarker::Idle;
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn present(&self) -> Option<&CanvasState> {
        self.present.as_ref()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn marker(&self) -> RestoreMarker {
        self.marker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(tag: u32) -> CanvasState {
        CanvasState::new(100 + tag, 100, "#ffffff")
    }

    #[test]
    fn test_new_history() {
        let history = HistoryManager::new(10);
        assert_eq!(history.max_length(), 10);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.present().is_none());
    }

    #[test]
    fn test_push_sets_present() {
        let mut history = HistoryManager::default();
        history.push_state(state(0));
        assert!(!history.can_undo());
        history.push_state(state(1));
        assert!(history.can_undo());
        assert_eq!(history.present(), Some(&state(1)));
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = HistoryManager::default();
        history.push_state(state(0));
        history.push_state(state(1));

        assert_eq!(history.undo(), Some(&state(0)));
        assert!(history.can_redo());
        assert_eq!(history.redo(), Some(&state(1)));
        assert!(!history.can_redo());
        assert_eq!(history.present(), Some(&state(1)));
    }

    #[test]
    fn test_empty_stacks_return_none() {
        let mut history = HistoryManager::default();
        history.push_state(state(0));
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_eq!(history.present(), Some(&state(0)));
        assert_eq!(history.marker(), RestoreMarker::Idle);
    }

    #[test]
    fn test_trim_oldest() {
        let mut history = HistoryManager::new(3);
        for i in 0..6 {
            history.push_state(state(i));
        }
        assert_eq!(history.past_len(), 3);
        // 0 and 1 evicted; oldest remaining is 2
        for _ in 0..3 {
            history.undo();
            history.push_state(state(99)); // swallowed
        }
        assert_eq!(history.present(), Some(&state(2)));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_push_after_undo_swallowed_once() {
        let mut history = HistoryManager::default();
        history.push_state(state(0));
        history.push_state(state(1));
        history.undo();

        history.push_state(state(0));
        assert_eq!(history.marker(), RestoreMarker::Idle);
        assert_eq!(history.past_len(), 0);
        assert_eq!(history.future_len(), 1);

        history.push_state(state(2));
        assert_eq!(history.past_len(), 1);
        assert!(!history.can_redo());
        assert_eq!(history.present(), Some(&state(2)));
    }

    #[test]
    fn test_clear_history() {
        let mut history = HistoryManager::default();
        history.push_state(state(0));
        history.push_state(state(1));
        history.undo();
        history.clear_history();
        assert!(history.present().is_none());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.marker(), RestoreMarker::Idle);
    }
}
