//! Navigation history
//!
//! Page states are pushed or replaced as reducers request it, and restored
//! on back/forward navigation. Behaves like a browser session history: a
//! push discards every entry after the current one.

use chrono::{DateTime, Utc};
use heddwch_common::state::ActivePage;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub page: ActivePage,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    fn now(page: ActivePage) -> Self {
        Self {
            page,
            recorded_at: Utc::now(),
        }
    }
}

pub trait NavigationHistory: Send {
    /// New entry after the current one
    fn push(&mut self, page: ActivePage);

    /// Overwrite the current entry (pushes if there is none)
    fn replace(&mut self, page: ActivePage);

    /// Step back; `None` at the oldest entry
    fn back(&mut self) -> Option<ActivePage>;

    /// Step forward; `None` at the newest entry
    fn forward(&mut self) -> Option<ActivePage>;
}

/// Entries kept by [`HistoryStack::new`]
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// In-process history
///
/// Holds at most `max_entries`; pushing past that drops the oldest entry.
#[derive(Debug)]
pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
    /// Index of the current entry; meaningless while `entries` is empty
    cursor: usize,
    max_entries: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounded history; a bound of zero is treated as one
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            max_entries: max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }
}

impl NavigationHistory for HistoryStack {
    fn push(&mut self, page: ActivePage) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(HistoryEntry::now(page));
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;
    }

    fn replace(&mut self, page: ActivePage) {
        match self.entries.get_mut(self.cursor) {
            Some(entry) => *entry = HistoryEntry::now(page),
            None => self.push(page),
        }
    }

    fn back(&mut self) -> Option<ActivePage> {
        if self.entries.is_empty() || self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.current().map(|entry| entry.page.clone())
    }

    fn forward(&mut self) -> Option<ActivePage> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.current().map(|entry| entry.page.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heddwch_common::state::{FactOrFictionState, IndexState};

    fn fof(state: FactOrFictionState) -> ActivePage {
        ActivePage::FactOrFiction(state)
    }

    #[test]
    fn test_back_and_forward_walk_entries() {
        let mut history = HistoryStack::new();
        history.push(ActivePage::Index(IndexState::LoadedPage));
        history.push(fof(FactOrFictionState::LoadedPage));

        assert_eq!(history.back(), Some(ActivePage::Index(IndexState::LoadedPage)));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), Some(fof(FactOrFictionState::LoadedPage)));
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn test_push_discards_forward_entries() {
        let mut history = HistoryStack::new();
        history.push(fof(FactOrFictionState::LoadedPage));
        history.push(fof(FactOrFictionState::ChoosingATopic));
        history.back();

        history.push(ActivePage::Index(IndexState::LoadedPage));

        assert_eq!(history.len(), 2);
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn test_replace_overwrites_current_entry() {
        let mut history = HistoryStack::new();
        history.replace(fof(FactOrFictionState::LoadedPage));
        assert_eq!(history.len(), 1);

        history.replace(fof(FactOrFictionState::ChoosingATopic));
        assert_eq!(history.len(), 1);
        assert_eq!(
            history.current().map(|e| e.page.clone()),
            Some(fof(FactOrFictionState::ChoosingATopic))
        );
    }

    #[test]
    fn test_push_past_bound_drops_oldest_entry() {
        let mut history = HistoryStack::with_max_entries(2);
        history.push(ActivePage::Index(IndexState::LoadedPage));
        history.push(fof(FactOrFictionState::LoadedPage));
        history.push(fof(FactOrFictionState::ChoosingATopic));

        assert_eq!(history.len(), 2);
        assert_eq!(
            history.current().map(|e| e.page.clone()),
            Some(fof(FactOrFictionState::ChoosingATopic))
        );
        assert_eq!(history.back(), Some(fof(FactOrFictionState::LoadedPage)));
        assert_eq!(history.back(), None);
    }

    #[test]
    fn test_long_session_stays_bounded() {
        let mut history = HistoryStack::new();
        for _ in 0..(DEFAULT_MAX_ENTRIES * 3) {
            history.push(fof(FactOrFictionState::LoadedPage));
        }
        assert_eq!(history.len(), DEFAULT_MAX_ENTRIES);
    }

    #[test]
    fn test_empty_history_has_nowhere_to_go() {
        let mut history = HistoryStack::new();
        assert!(history.is_empty());
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), None);
    }
}
