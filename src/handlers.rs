use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    AppState,
    error::ApiError,
    lessons::{collect_participants, find_lesson, today_in_japan, upcoming_lessons},
    models::{Lesson, LessonDetail},
    validation::{missing_lesson_id, validate_lesson_id},
};

#[utoipa::path(get, path = "/", tag = "lessons")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Lesson Schedule API",
        "endpoints": {
            "/api/lessons": "List upcoming lessons",
            "/api/lessons/{id}": "Get a lesson with its participants"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "lessons")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "lessons")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/api/lessons",
    responses(
        (status = 200, description = "Upcoming lessons in sheet order", body = [Lesson]),
        (status = 500, description = "Spreadsheet could not be read")
    ),
    tag = "lessons"
)]
pub async fn list_lessons(State(state): State<AppState>) -> Result<Json<Vec<Lesson>>, ApiError> {
    let rows = state
        .reader
        .read_range(&state.settings.lessons_range)
        .await?;
    let lessons = upcoming_lessons(&rows, today_in_japan());
    debug!(rows = rows.len(), upcoming = lessons.len(), "listed lessons");
    Ok(Json(lessons))
}

#[utoipa::path(
    get,
    path = "/api/lessons/{id}",
    params(
        ("id" = String, Path, description = "Lesson identifier, e.g. L001")
    ),
    responses(
        (status = 200, description = "Lesson with participants", body = LessonDetail),
        (status = 400, description = "Lesson ID is missing"),
        (status = 404, description = "Lesson not found"),
        (status = 500, description = "Spreadsheet could not be read")
    ),
    tag = "lessons"
)]
pub async fn get_lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<String>,
) -> Result<Json<LessonDetail>, ApiError> {
    let lesson_id = validate_lesson_id(&lesson_id)?;

    let lesson_rows = state
        .reader
        .read_range(&state.settings.lessons_range)
        .await?;
    let lesson = find_lesson(&lesson_rows, lesson_id)
        .ok_or_else(|| ApiError::NotFound("Lesson Not Found".into()))?;

    let reservation_rows = state
        .reader
        .read_range(&state.settings.reservations_range)
        .await?;
    let participants = collect_participants(&reservation_rows, lesson_id);
    debug!(lesson_id, participants = participants.len(), "loaded lesson");

    Ok(Json(LessonDetail {
        lesson,
        participants,
    }))
}

/// `/api/lessons/` with an empty identifier segment.
pub async fn get_lesson_without_id() -> ApiError {
    missing_lesson_id()
}
