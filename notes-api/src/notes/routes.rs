use crate::{
    ctx::BaseParams,
    errors::ErrorResponseDocs,
    openapi::{
        aide::{
            axum::{routing::get_with, ApiRouter, IntoApiResponse},
            NoApi,
        },
        Json, Path,
    },
    state::AppState,
};
use axum::http::StatusCode;

use schemars::JsonSchema;

use serde::Deserialize;

use super::{CreateNote, Note, NoteId, UpdateNote};

use super::handlers;

const TAG: &str = "Notes";

#[derive(Debug, Deserialize, JsonSchema)]
struct NoteIdPath {
    /// The id of the note
    note_id: NoteId,
}

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/notes",
            get_with(find_notes, |t| {
                t.summary("List notes")
                    .description("Retrieve all notes, most recently updated first.")
                    .tag(TAG)
            })
            .post_with(create_note, |t| {
                t.summary("Create a note")
                    .description("Create a new note with title and content.")
                    .tag(TAG)
                    .response::<201, Json<Note>>()
            }),
        )
        .api_route(
            "/notes/{note_id}",
            get_with(get_note, |t| {
                t.summary("Get a note")
                    .description("Retrieve a single note by its id.")
                    .tag(TAG)
                    .response_with::<404, Json<ErrorResponseDocs>, _>(|r| r.description("Note not found"))
            })
            .put_with(replace_note, |t| {
                t.summary("Replace a note")
                    .description("Replace a note's title and content entirely.")
                    .tag(TAG)
                    .response_with::<404, Json<ErrorResponseDocs>, _>(|r| r.description("Note not found"))
            })
            .patch_with(update_note, |t| {
                t.summary("Update a note")
                    .description("Partially update a note's title and/or content.")
                    .tag(TAG)
                    .response_with::<404, Json<ErrorResponseDocs>, _>(|r| r.description("Note not found"))
            })
            .delete_with(delete_note, |t| {
                t.summary("Delete a note")
                    .description("Delete a note by id.")
                    .tag(TAG)
                    .response::<204, ()>()
                    .response_with::<404, Json<ErrorResponseDocs>, _>(|r| r.description("Note not found"))
            }),
        )
        .with_state(state)
}

async fn find_notes(NoApi(base): NoApi<BaseParams>) -> impl IntoApiResponse {
    handlers::find_notes(base).await.map(Json)
}

async fn create_note(NoApi(base): NoApi<BaseParams>, Json(args): Json<CreateNote>) -> impl IntoApiResponse {
    handlers::create_note(args, base)
        .await
        .map(|r| (StatusCode::CREATED, Json(r)))
}

async fn get_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::get_note(note_id, base).await.map(Json)
}

async fn replace_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
    Json(args): Json<CreateNote>,
) -> impl IntoApiResponse {
    handlers::replace_note(note_id, args, base).await.map(Json)
}

async fn update_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
    Json(args): Json<UpdateNote>,
) -> impl IntoApiResponse {
    handlers::update_note(note_id, args, base).await.map(Json)
}

async fn delete_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::delete_note(note_id, base)
        .await
        .map(|_| (StatusCode::NO_CONTENT, ()))
}
