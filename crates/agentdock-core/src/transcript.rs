//! Chat transcript model.
//!
//! The transcript is append-only. The only removal is a `Thinking`
//! placeholder, addressed by id, and each placeholder can be removed once.

use chrono::{DateTime, Utc};

use crate::rich_text::RichText;

/// Unique identifier for a transcript entry.
///
/// Ids are issued by the owning [`Transcript`] in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Agent,
}

/// Displayable content of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Plain text typed by the user (already trimmed).
    User(String),
    /// Agent reply or notice.
    Agent(RichText),
    /// Transient "thinking" placeholder while a request is outstanding.
    Thinking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub created_at: DateTime<Utc>,
    pub kind: EntryKind,
}

impl Entry {
    pub fn author(&self) -> Author {
        match self.kind {
            EntryKind::User(_) => Author::User,
            EntryKind::Agent(_) | EntryKind::Thinking => Author::Agent,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, EntryKind::Thinking)
    }
}

/// Ordered list of displayed chat entries.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Number of placeholders currently shown.
    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_placeholder()).count()
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> &Entry {
        self.push(EntryKind::User(text.into()))
    }

    pub fn push_agent(&mut self, content: RichText) -> &Entry {
        self.push(EntryKind::Agent(content))
    }

    pub fn push_placeholder(&mut self) -> &Entry {
        self.push(EntryKind::Thinking)
    }

    /// Removes the placeholder with the given id.
    ///
    /// Returns `false` if no such placeholder exists (already removed, or the
    /// id belongs to a non-placeholder entry, which is never removed).
    pub fn remove_placeholder(&mut self, id: EntryId) -> bool {
        let Some(pos) = self
            .entries
            .iter()
            .position(|entry| entry.id == id && entry.is_placeholder())
        else {
            return false;
        };
        self.entries.remove(pos);
        true
    }

    fn push(&mut self, kind: EntryKind) -> &Entry {
        let id = EntryId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry {
            id,
            created_at: Utc::now(),
            kind,
        });
        &self.entries[self.entries.len() - 1]
    }
}
