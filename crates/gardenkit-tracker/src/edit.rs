#![forbid(unsafe_code)]

//! Inline rename state for plants and beds.

use gardenkit_core::event::{KeyCode, KeyInput};
use gardenkit_core::id::{BedId, PlantId};

/// What an inline edit renames.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EditKey {
    Plant(PlantId),
    Bed(BedId),
}

/// Result of feeding input to an [`InlineEdit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome<K> {
    /// Apply `value` (already trimmed) to `key`.
    Commit { key: K, value: String },
    /// The text was blank; the old name stays.
    Rejected { key: K },
    /// Escape; the old name stays.
    Discarded { key: K },
    /// Still editing, or nothing being edited.
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveEdit<K> {
    key: K,
    original: String,
    text: String,
}

/// Transient edit text for one item at a time.
///
/// Committed on Enter or blur, discarded on Escape. Every ending clears the
/// edit state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineEdit<K> {
    active: Option<ActiveEdit<K>>,
}

impl<K> Default for InlineEdit<K> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<K: Clone + PartialEq> InlineEdit<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing `key`, seeded with its current name. Any edit already
    /// in progress is dropped without committing.
    pub fn begin(&mut self, key: K, current: impl Into<String>) {
        let current = current.into();
        self.active = Some(ActiveEdit {
            key,
            original: current.clone(),
            text: current,
        });
    }

    #[must_use]
    pub fn is_editing(&self, key: &K) -> bool {
        self.active.as_ref().is_some_and(|a| &a.key == key)
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.text.as_str())
    }

    /// Name before editing started.
    #[must_use]
    pub fn original(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.original.as_str())
    }

    pub fn input(&mut self, text: impl Into<String>) {
        if let Some(active) = &mut self.active {
            active.text = text.into();
        }
    }

    pub fn key(&mut self, key: &KeyInput) -> EditOutcome<K> {
        match key.code {
            KeyCode::Enter => self.finish(),
            KeyCode::Escape => match self.active.take() {
                Some(active) => EditOutcome::Discarded { key: active.key },
                None => EditOutcome::Pending,
            },
            _ => EditOutcome::Pending,
        }
    }

    pub fn blur(&mut self) -> EditOutcome<K> {
        self.finish()
    }

    fn finish(&mut self) -> EditOutcome<K> {
        let Some(active) = self.active.take() else {
            return EditOutcome::Pending;
        };
        let value = active.text.trim();
        if value.is_empty() {
            EditOutcome::Rejected { key: active.key }
        } else {
            EditOutcome::Commit {
                value: value.to_string(),
                key: active.key,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bed() -> EditKey {
        EditKey::Bed(BedId::new("bed-1"))
    }

    #[test]
    fn enter_commits_trimmed_text() {
        let mut edit = InlineEdit::new();
        edit.begin(bed(), "North");
        edit.input("  North Bed ");
        assert_eq!(edit.text(), Some("  North Bed "));
        assert_eq!(
            edit.key(&KeyInput::new(KeyCode::Enter)),
            EditOutcome::Commit {
                key: bed(),
                value: "North Bed".into()
            }
        );
        assert_eq!(edit.text(), None);
    }

    #[test]
    fn blank_text_is_rejected_and_cleared() {
        let mut edit = InlineEdit::new();
        edit.begin(bed(), "North");
        edit.input("   ");
        assert_eq!(edit.blur(), EditOutcome::Rejected { key: bed() });
        assert!(!edit.is_editing(&bed()));
    }

    #[test]
    fn escape_discards() {
        let mut edit = InlineEdit::new();
        edit.begin(bed(), "North");
        edit.input("South");
        assert_eq!(edit.original(), Some("North"));
        assert_eq!(edit.key(&KeyInput::new(KeyCode::Char('x'))), EditOutcome::Pending);
        assert_eq!(
            edit.key(&KeyInput::new(KeyCode::Escape)),
            EditOutcome::Discarded { key: bed() }
        );
        assert_eq!(edit.blur(), EditOutcome::Pending);
    }
}
