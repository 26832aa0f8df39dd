//! # Conversation Store
//!
//! The ordered message list for one session plus the auxiliary indices that
//! hang off it: starred messages, the edit cursor, and the selection cursor.
//!
//! ```text
//! ConversationStore
//! ├── messages: Vec<Message>      // [0] is always the system sentinel
//! ├── starred: BTreeSet<usize>    // flagged positions, stable across edits
//! ├── edit: Option<EditCursor>    // index + scratch buffer
//! └── selection: Option<usize>    // pinned for the focused view
//! ```
//!
//! Positions never shift: messages are only appended, edited in place, or
//! wiped all at once by `reset()`.

use std::collections::BTreeSet;
use std::fmt;

use crate::inference::{Message, Role};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// Position of the system sentinel.
pub const SENTINEL_INDEX: usize = 0;

/// Sidebar preview length, in characters.
pub const PREVIEW_CHARS: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Out of range, or the sentinel.
    InvalidIndex(usize),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidIndex(i) => write!(f, "invalid message index {i}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// A message open for editing. `buffer` is not written back until commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCursor {
    pub index: usize,
    pub buffer: String,
}

#[derive(Debug, Clone)]
pub struct ConversationStore {
    messages: Vec<Message>,
    system_prompt: String,
    starred: BTreeSet<usize>,
    edit: Option<EditCursor>,
    selection: Option<usize>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

impl ConversationStore {
    /// Creates a store seeded with the system sentinel.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        Self {
            messages: vec![Message::system(system_prompt.clone())],
            system_prompt,
            starred: BTreeSet::new(),
            edit: None,
            selection: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    /// Total length, sentinel included. Never zero.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True when only the sentinel is present.
    pub fn has_no_turns(&self) -> bool {
        self.messages.len() == 1
    }

    fn check_editable(&self, index: usize) -> Result<(), StoreError> {
        if index == SENTINEL_INDEX || index >= self.messages.len() {
            return Err(StoreError::InvalidIndex(index));
        }
        Ok(())
    }

    /// Appends a message and returns its index.
    pub fn append(&mut self, role: Role, text: impl Into<String>) -> usize {
        self.messages.push(Message::new(role, text));
        self.messages.len() - 1
    }

    /// Replaces the text at `index`. Role and position are untouched.
    pub fn edit(&mut self, index: usize, text: impl Into<String>) -> Result<(), StoreError> {
        self.check_editable(index)?;
        self.messages[index].text = text.into();
        Ok(())
    }

    /// Flips the star on `index`; returns whether it is starred afterwards.
    pub fn toggle_star(&mut self, index: usize) -> Result<bool, StoreError> {
        self.check_editable(index)?;
        if self.starred.remove(&index) {
            Ok(false)
        } else {
            self.starred.insert(index);
            Ok(true)
        }
    }

    pub fn is_starred(&self, index: usize) -> bool {
        self.starred.contains(&index)
    }

    pub fn starred(&self) -> &BTreeSet<usize> {
        &self.starred
    }

    /// Back to the sentinel-only state. Stars and both cursors are dropped.
    pub fn reset(&mut self) {
        self.messages.clear();
        let sentinel = Message::system(self.system_prompt.clone());
        self.messages.push(sentinel);
        self.starred.clear();
        self.edit = None;
        self.selection = None;
    }

    /// Non-sentinel messages whose text contains `term`, ignoring case.
    pub fn filter(&self, term: &str) -> Filtered<'_> {
        Filtered {
            messages: &self.messages,
            needle: term.to_lowercase(),
        }
    }

    // ── Edit cursor ─────────────────────────────────────────────────────

    /// Opens `index` for editing and seeds the scratch buffer with its text.
    /// Clears the selection.
    pub fn begin_edit(&mut self, index: usize) -> Result<(), StoreError> {
        self.check_editable(index)?;
        self.edit = Some(EditCursor {
            index,
            buffer: self.messages[index].text.clone(),
        });
        self.selection = None;
        Ok(())
    }

    pub fn edit_cursor(&self) -> Option<&EditCursor> {
        self.edit.as_ref()
    }

    /// Replaces the scratch buffer. No-op when nothing is being edited.
    pub fn set_edit_buffer(&mut self, text: impl Into<String>) {
        if let Some(cursor) = self.edit.as_mut() {
            cursor.buffer = text.into();
        }
    }

    /// Writes the scratch buffer back and closes the cursor.
    /// Returns the committed index, or `None` if nothing was open.
    pub fn commit_edit(&mut self) -> Result<Option<usize>, StoreError> {
        match self.edit.take() {
            Some(EditCursor { index, buffer }) => {
                self.edit(index, buffer)?;
                Ok(Some(index))
            }
            None => Ok(None),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    // ── Selection cursor ────────────────────────────────────────────────

    pub fn select(&mut self, index: usize) -> Result<(), StoreError> {
        self.check_editable(index)?;
        self.selection = Some(index);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }
}

/// Lazy, restartable view over the store produced by [`ConversationStore::filter`].
///
/// Iterate with [`Filtered::iter`] (or `&filtered` in a `for` loop) as many
/// times as needed; each pass yields `(index, message)` in ascending order.
#[derive(Debug, Clone)]
pub struct Filtered<'a> {
    messages: &'a [Message],
    needle: String,
}

impl<'a> Filtered<'a> {
    pub fn iter(&self) -> FilterIter<'_, 'a> {
        FilterIter {
            inner: self.messages.iter().enumerate(),
            needle: &self.needle,
        }
    }

    pub fn indices(&self) -> Vec<usize> {
        self.iter().map(|(i, _)| i).collect()
    }
}

impl<'f, 'a> IntoIterator for &'f Filtered<'a> {
    type Item = (usize, &'a Message);
    type IntoIter = FilterIter<'f, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct FilterIter<'f, 'a> {
    inner: std::iter::Enumerate<std::slice::Iter<'a, Message>>,
    needle: &'f str,
}

impl<'a> Iterator for FilterIter<'_, 'a> {
    type Item = (usize, &'a Message);

    fn next(&mut self) -> Option<Self::Item> {
        let needle = self.needle;
        self.inner.by_ref().find(|(_, m)| {
            m.role != Role::System && (needle.is_empty() || m.text.to_lowercase().contains(needle))
        })
    }
}

/// First `max_chars` characters of `text`, with `...` when truncated.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(turns: &[(Role, &str)]) -> ConversationStore {
        let mut store = ConversationStore::default();
        for (role, text) in turns {
            store.append(*role, *text);
        }
        store
    }

    fn sample() -> ConversationStore {
        store_with(&[
            (Role::User, "Hello there"),
            (Role::Assistant, "Hi! How can I HELP?"),
            (Role::User, "Tell me about Rust"),
            (Role::Assistant, "Rust is a systems language."),
        ])
    }

    #[test]
    fn test_new_store_holds_only_sentinel() {
        let store = ConversationStore::default();
        assert_eq!(store.len(), 1);
        assert_eq!(store.messages()[0].role, Role::System);
        assert_eq!(store.messages()[0].text, DEFAULT_SYSTEM_PROMPT);
        assert!(store.has_no_turns());
    }

    #[test]
    fn test_append_grows_by_one_and_returns_last_index() {
        let mut store = ConversationStore::default();
        for n in 1..=5 {
            let before = store.len();
            let idx = store.append(Role::User, format!("msg {n}"));
            assert_eq!(store.len(), before + 1);
            assert_eq!(idx, store.len() - 1);
        }
    }

    #[test]
    fn test_edit_changes_only_target() {
        let mut store = sample();
        let before: Vec<Message> = store.messages().to_vec();

        store.edit(2, "edited").unwrap();

        for (i, (old, new)) in before.iter().zip(store.messages()).enumerate() {
            if i == 2 {
                assert_eq!(new.text, "edited");
                assert_eq!(new.role, old.role);
            } else {
                assert_eq!(old, new);
            }
        }
        assert_eq!(store.len(), before.len());
    }

    #[test]
    fn test_edit_rejects_sentinel_and_out_of_range() {
        let mut store = sample();
        assert_eq!(store.edit(0, "x"), Err(StoreError::InvalidIndex(0)));
        assert_eq!(store.edit(99, "x"), Err(StoreError::InvalidIndex(99)));
        assert_eq!(store.messages()[0].text, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_toggle_star_is_its_own_inverse() {
        let mut store = sample();
        store.toggle_star(3).unwrap();
        let original = store.starred().clone();

        assert_eq!(store.toggle_star(1), Ok(true));
        assert!(store.is_starred(1));
        assert_eq!(store.toggle_star(1), Ok(false));
        assert_eq!(store.starred(), &original);
    }

    #[test]
    fn test_toggle_star_guards_sentinel() {
        let mut store = sample();
        assert!(store.toggle_star(0).is_err());
        assert!(store.toggle_star(42).is_err());
        assert!(store.starred().is_empty());
    }

    #[test]
    fn test_star_survives_edit() {
        let mut store = sample();
        store.toggle_star(2).unwrap();
        store.edit(2, "changed").unwrap();
        assert!(store.is_starred(2));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut store = sample();
        store.toggle_star(1).unwrap();
        store.select(2).unwrap();
        store.begin_edit(3).unwrap();

        store.reset();

        assert_eq!(store.len(), 1);
        assert_eq!(store.messages()[0].role, Role::System);
        assert!(store.starred().is_empty());
        assert!(store.edit_cursor().is_none());
        assert!(store.selection().is_none());
    }

    #[test]
    fn test_reset_reseeds_custom_prompt() {
        let mut store = ConversationStore::new("Answer in French.");
        store.append(Role::User, "hi");
        store.reset();
        assert_eq!(store.messages()[0].text, "Answer in French.");
    }

    #[test]
    fn test_filter_empty_term_yields_all_but_sentinel() {
        let store = sample();
        let filtered = store.filter("");
        let got: Vec<(usize, &Message)> = filtered.iter().collect();
        let expected: Vec<(usize, &Message)> = store
            .messages()
            .iter()
            .enumerate()
            .skip(1)
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_filter_is_case_insensitive_subset() {
        let store = sample();
        let filtered = store.filter("HeLp");
        assert_eq!(filtered.indices(), vec![2]);

        let filtered = store.filter("rust");
        assert_eq!(filtered.indices(), vec![3, 4]);
        for (_, m) in &filtered {
            assert!(m.text.to_lowercase().contains("rust"));
        }
    }

    #[test]
    fn test_filter_never_matches_sentinel() {
        let store = sample();
        assert!(store.filter("helpful").indices().is_empty());
    }

    #[test]
    fn test_filter_is_restartable() {
        let store = sample();
        let filtered = store.filter("e");
        let first = filtered.indices();
        let second = filtered.indices();
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_begin_edit_seeds_buffer_and_clears_selection() {
        let mut store = sample();
        store.select(2).unwrap();
        store.begin_edit(2).unwrap();

        let cursor = store.edit_cursor().unwrap();
        assert_eq!(cursor.index, 2);
        assert_eq!(cursor.buffer, "Hi! How can I HELP?");
        assert!(store.selection().is_none());
    }

    #[test]
    fn test_scratch_buffer_is_decoupled_until_commit() {
        let mut store = sample();
        store.begin_edit(1).unwrap();
        store.set_edit_buffer("Goodbye");
        assert_eq!(store.messages()[1].text, "Hello there");

        assert_eq!(store.commit_edit(), Ok(Some(1)));
        assert_eq!(store.messages()[1].text, "Goodbye");
        assert!(store.edit_cursor().is_none());
    }

    #[test]
    fn test_cancel_edit_discards_buffer() {
        let mut store = sample();
        store.begin_edit(1).unwrap();
        store.set_edit_buffer("Goodbye");
        store.cancel_edit();
        assert_eq!(store.messages()[1].text, "Hello there");
        assert_eq!(store.commit_edit(), Ok(None));
    }

    #[test]
    fn test_select_rejects_sentinel() {
        let mut store = sample();
        assert!(store.select(0).is_err());
        assert!(store.selection().is_none());
    }

    #[test]
    fn test_preview_truncates_long_text() {
        assert_eq!(preview("short", PREVIEW_CHARS), "short");
        let long = "abcdefghijklmnopqrstuvwxyz0123";
        assert_eq!(preview(long, PREVIEW_CHARS), "abcdefghijklmnopqrstuvwxy...");
        assert_eq!(preview("héllo wörld", 5), "héllo...");
    }
}
