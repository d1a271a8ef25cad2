//! The history capability the router navigates against.
//!
//! [`History`] abstracts a browser-style session history: a list of entries
//! with a cursor. [`MemoryHistory`] keeps the list in process and is what the
//! router uses when no other implementation is supplied.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use routekit_core::{RouterError, RouterResult};

/// State stored alongside each history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
    /// A unique key for the entry.
    pub key: String,
    /// Application data.
    pub data: Value,
}

impl HistoryState {
    /// Creates state with a fresh key and no data.
    pub fn new() -> Self {
        Self::with_data(Value::Null)
    }

    /// Creates state with a fresh key and the given data.
    pub fn with_data(data: Value) -> Self {
        Self {
            key: Uuid::new_v4().to_string(),
            data,
        }
    }
}

impl Default for HistoryState {
    fn default() -> Self {
        Self::new()
    }
}

/// A session history.
pub trait History: Send {
    /// Returns the URL of the entry under the cursor.
    fn current_url(&self) -> String;

    /// Returns the state of the entry under the cursor.
    fn state(&self) -> Option<&HistoryState>;

    /// Adds an entry after the cursor, discarding any forward entries.
    fn push(&mut self, state: HistoryState, url: &str) -> RouterResult<()>;

    /// Overwrites the entry under the cursor.
    fn replace(&mut self, state: HistoryState, url: &str) -> RouterResult<()>;

    /// Moves the cursor by `delta` entries.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::History`] if the move would leave the list.
    fn go(&mut self, delta: isize) -> RouterResult<()>;

    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if there are no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One entry of a [`MemoryHistory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The entry's URL.
    pub url: String,
    /// The entry's state.
    pub state: HistoryState,
}

/// An in-process [`History`].
///
/// # Examples
///
/// ```
/// use routekit_router::history::{History, HistoryState, MemoryHistory};
///
/// let mut history = MemoryHistory::new("/");
/// history.push(HistoryState::new(), "/page1").unwrap();
/// history.push(HistoryState::new(), "/page2").unwrap();
/// history.back().unwrap();
/// assert_eq!(history.current_url(), "/page1");
/// assert_eq!(history.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl MemoryHistory {
    /// Creates a history holding a single entry for `initial_url`.
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry {
                url: initial_url.into(),
                state: HistoryState::new(),
            }],
            index: 0,
        }
    }

    /// Moves back one entry.
    pub fn back(&mut self) -> RouterResult<()> {
        self.go(-1)
    }

    /// Moves forward one entry.
    pub fn forward(&mut self) -> RouterResult<()> {
        self.go(1)
    }

    /// Returns every entry, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Returns the cursor position.
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn current_url(&self) -> String {
        self.entries
            .get(self.index)
            .map(|entry| entry.url.clone())
            .unwrap_or_default()
    }

    fn state(&self) -> Option<&HistoryState> {
        self.entries.get(self.index).map(|entry| &entry.state)
    }

    fn push(&mut self, state: HistoryState, url: &str) -> RouterResult<()> {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            url: url.to_string(),
            state,
        });
        self.index = self.entries.len() - 1;
        Ok(())
    }

    fn replace(&mut self, state: HistoryState, url: &str) -> RouterResult<()> {
        let entry = self
            .entries
            .get_mut(self.index)
            .ok_or_else(|| RouterError::History("No entry to replace".to_string()))?;
        entry.url = url.to_string();
        entry.state = state;
        Ok(())
    }

    fn go(&mut self, delta: isize) -> RouterResult<()> {
        let target = self
            .index
            .checked_add_signed(delta)
            .filter(|target| *target < self.entries.len())
            .ok_or_else(|| {
                RouterError::History(format!(
                    "Cannot move {delta} from entry {} of {}",
                    self.index,
                    self.entries.len()
                ))
            })?;
        self.index = target;
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
