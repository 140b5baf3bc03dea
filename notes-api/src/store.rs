use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};

use crate::notes::{Note, NoteId, Title};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not_found")]
    NotFound(String),
    #[error("store lock poisoned")]
    Poisoned,
}

impl Error {
    pub fn not_found_message(self, message: impl Into<String>) -> Self {
        if matches!(self, Self::NotFound(_)) {
            return Self::NotFound(message.into());
        }
        self
    }
}

pub type Clock = fn() -> DateTime<Utc>;

/// In-memory note collection and the id sequence.
///
/// Ids start at 1 and are handed out once: deleting a note never frees its id.
#[derive(Debug)]
pub struct Notes {
    notes: BTreeMap<NoteId, Note>,
    next_id: NoteId,
    clock: Clock,
}

impl Default for Notes {
    fn default() -> Self {
        Self::with_clock(Utc::now)
    }
}

impl Notes {
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            notes: BTreeMap::new(),
            next_id: 1,
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn create(&mut self, title: Title, content: String) -> Note {
        let id = self.next_id;
        self.next_id += 1;

        let now = (self.clock)();
        let note = Note {
            id,
            title: title.into(),
            content,
            created_at: now,
            updated_at: now,
        };
        self.notes.insert(id, note.clone());

        tracing::debug!(note_id = id, "note created");
        note
    }

    /// Most recently updated first, ties by id descending.
    pub fn list(&self) -> Vec<Note> {
        let mut notes = self.notes.values().cloned().collect::<Vec<_>>();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| b.id.cmp(&a.id)));
        notes
    }

    pub fn get(&self, id: NoteId) -> Result<Note> {
        self.notes.get(&id).cloned().ok_or_else(|| not_found(id))
    }

    pub fn replace(&mut self, id: NoteId, title: Title, content: String) -> Result<Note> {
        let now = (self.clock)();
        let note = self.notes.get_mut(&id).ok_or_else(|| not_found(id))?;

        note.title = title.into();
        note.content = content;
        touch(note, now);

        tracing::debug!(note_id = id, "note replaced");
        Ok(note.clone())
    }

    pub fn update(&mut self, id: NoteId, title: Option<Title>, content: Option<String>) -> Result<Note> {
        let now = (self.clock)();
        let note = self.notes.get_mut(&id).ok_or_else(|| not_found(id))?;

        if let Some(title) = title {
            note.title = title.into();
        }
        if let Some(content) = content {
            note.content = content;
        }
        touch(note, now);

        tracing::debug!(note_id = id, "note updated");
        Ok(note.clone())
    }

    pub fn delete(&mut self, id: NoteId) -> Result<()> {
        self.notes.remove(&id).ok_or_else(|| not_found(id))?;

        tracing::debug!(note_id = id, "note deleted");
        Ok(())
    }
}

// a clock running backwards must not put updated_at before created_at
fn touch(note: &mut Note, now: DateTime<Utc>) {
    note.updated_at = now.max(note.created_at);
}

fn not_found(id: NoteId) -> Error {
    Error::NotFound(format!("No note with id {id}"))
}

/// Shared handle to [`Notes`]. Every [`Store::call`] holds the lock for the whole closure.
#[derive(Clone, Debug, Default)]
pub struct Store(Arc<Mutex<Notes>>);

impl Store {
    pub fn new(notes: Notes) -> Self {
        Self(Arc::new(Mutex::new(notes)))
    }

    pub fn call<F, T>(&self, function: F) -> Result<T>
    where
        F: FnOnce(&mut Notes) -> Result<T>,
    {
        let mut notes = self.0.lock().map_err(|_| Error::Poisoned)?;
        function(&mut notes)
    }
}

pub fn init_store() -> Store {
    let store = Store::default();
    tracing::info!("notes store initialized");
    store
}
