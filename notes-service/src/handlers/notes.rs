//! HTTP handlers for the `/api/notes` resource.
//!
//! Each handler is a single pass through the repository; malformed bodies are
//! rejected before the store is touched.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::NotePayload,
    models::Note,
    services::{record_operation, repository::not_found},
    startup::AppState,
};

/// List every stored note.
pub async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, AppError> {
    let notes = state.repository.find_all().await.inspect_err(|_| {
        record_operation("list", "error");
    })?;

    tracing::debug!(count = notes.len(), "Listed notes");
    record_operation("list", "ok");

    Ok(Json(notes))
}

/// Create a note; the store assigns its id.
pub async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<NotePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let Json(payload) = payload.inspect_err(|_| {
        record_operation("create", "rejected");
    })?;

    let note = state
        .repository
        .save(Note::from(payload))
        .await
        .inspect_err(|_| {
            record_operation("create", "error");
        })?;

    tracing::info!(note_id = ?note.id, "Note created");
    record_operation("create", "ok");

    Ok((StatusCode::CREATED, Json(note)))
}

/// Fetch a single note.
pub async fn get_note(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Note>, AppError> {
    let id = note_id(path, "get")?;
    let note = find_existing(&state, "get", id).await?;
    record_operation("get", "ok");

    Ok(Json(note))
}

/// Replace a note's title and content.
pub async fn update_note(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NotePayload>, JsonRejection>,
) -> Result<Json<Note>, AppError> {
    let id = note_id(path, "update")?;
    let Json(payload) = payload.inspect_err(|_| {
        record_operation("update", "rejected");
    })?;

    let mut note = find_existing(&state, "update", id).await?;
    note.replace_text(payload.title, payload.content);

    let note = state.repository.save(note).await.inspect_err(|e| {
        let outcome = match e {
            AppError::NotFound(_) => "not_found",
            _ => "error",
        };
        record_operation("update", outcome);
    })?;

    tracing::info!(note_id = id, "Note updated");
    record_operation("update", "ok");

    Ok(Json(note))
}

/// Delete a note.
pub async fn delete_note(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = note_id(path, "delete")?;
    let note = find_existing(&state, "delete", id).await?;

    state.repository.delete(&note).await.inspect_err(|e| {
        let outcome = match e {
            AppError::NotFound(_) => "not_found",
            _ => "error",
        };
        record_operation("delete", outcome);
    })?;

    tracing::info!(note_id = id, "Note deleted");
    record_operation("delete", "ok");

    Ok(StatusCode::NO_CONTENT)
}

fn note_id(path: Result<Path<i64>, PathRejection>, operation: &str) -> Result<i64, AppError> {
    let Path(id) = path.inspect_err(|_| {
        record_operation(operation, "rejected");
    })?;
    Ok(id)
}

async fn find_existing(state: &AppState, operation: &str, id: i64) -> Result<Note, AppError> {
    let note = state.repository.find_by_id(id).await.inspect_err(|_| {
        record_operation(operation, "error");
    })?;

    note.ok_or_else(|| {
        tracing::debug!(note_id = id, operation, "Note not found");
        record_operation(operation, "not_found");
        not_found()
    })
}
