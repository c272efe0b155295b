//! Note management handlers.
//!
//! Every route here sits behind the auth middleware. The owner of each
//! operation comes from [`AuthUser`], never from the request body.

use crate::{
    AppState,
    auth::middleware::AuthUser,
    types::{Note, NoteId, NoteRequest, Result},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};

/// List all notes of the authenticated user, newest first.
#[utoipa::path(
    get,
    path = "/api/notes",
    responses(
        (status = 200, description = "List of notes", body = Vec<Note>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notes",
    security(("bearer" = []))
)]
pub async fn list_notes(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Vec<Note>>> {
    let notes = state.notes.list(&caller).await?;
    Ok(Json(notes))
}

/// Get a single note.
#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note", body = Note),
        (status = 404, description = "Note not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notes",
    security(("bearer" = []))
)]
pub async fn get_note(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Note>> {
    let note = state.notes.get(&caller, NoteId(id)).await?;
    Ok(Json(note))
}

/// Create a note owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = NoteRequest,
    responses(
        (status = 201, description = "Note created", body = Note),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notes",
    security(("bearer" = []))
)]
pub async fn create_note(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    body: std::result::Result<Json<NoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = body?;
    let note = state.notes.create(&caller, payload).await?;
    let location = format!("/api/notes/{}", note.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(note),
    ))
}

/// Replace a note's title and content.
#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = NoteRequest,
    responses(
        (status = 204, description = "Note updated"),
        (status = 404, description = "Note not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notes",
    security(("bearer" = []))
)]
pub async fn update_note(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
    body: std::result::Result<Json<NoteRequest>, JsonRejection>,
) -> Result<StatusCode> {
    let Json(payload) = body?;
    state.notes.update(&caller, NoteId(id), payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a note.
#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 404, description = "Note not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notes",
    security(("bearer" = []))
)]
pub async fn delete_note(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.notes.delete(&caller, NoteId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
