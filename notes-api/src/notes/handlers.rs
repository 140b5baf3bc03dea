use crate::{ctx::BaseParams, store, Error, Result};

use super::{CreateNote, Note, NoteId, UpdateNote};

const NOT_FOUND: &str = "Note not found";

pub async fn find_notes(BaseParams { store }: BaseParams) -> Result<Vec<Note>> {
    store.call(|notes| Ok(notes.list())).map_err(Error::from)
}

pub async fn create_note(CreateNote { title, content }: CreateNote, BaseParams { store }: BaseParams) -> Result<Note> {
    store
        .call(move |notes| Ok(notes.create(title, content)))
        .map_err(Error::from)
}

pub async fn get_note(note_id: NoteId, BaseParams { store }: BaseParams) -> Result<Note> {
    store
        .call(|notes| notes.get(note_id))
        .map_err(|e| store::Error::not_found_message(e, NOT_FOUND))
        .map_err(Error::from)
}

pub async fn replace_note(
    note_id: NoteId,
    CreateNote { title, content }: CreateNote,
    BaseParams { store }: BaseParams,
) -> Result<Note> {
    store
        .call(move |notes| notes.replace(note_id, title, content))
        .map_err(|e| store::Error::not_found_message(e, NOT_FOUND))
        .map_err(Error::from)
}

pub async fn update_note(
    note_id: NoteId,
    UpdateNote { title, content }: UpdateNote,
    BaseParams { store }: BaseParams,
) -> Result<Note> {
    store
        .call(move |notes| notes.update(note_id, title, content))
        .map_err(|e| store::Error::not_found_message(e, NOT_FOUND))
        .map_err(Error::from)
}

pub async fn delete_note(note_id: NoteId, BaseParams { store }: BaseParams) -> Result<()> {
    store
        .call(|notes| notes.delete(note_id))
        .map_err(|e| store::Error::not_found_message(e, NOT_FOUND))
        .map_err(Error::from)
}
