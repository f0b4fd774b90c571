use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{NewReminder, ReminderRecord},
};

use super::AppState;

/// List a user's reminders
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<ReminderRecord>>> {
    let reminders = state.reminders.list_for_user(&user_id).await?;
    Ok(Json(reminders))
}

/// Create a reminder, or replace the existing one for the same title.
///
/// Replacing resets the record wholesale, so re-adding a reminder after a
/// notification re-arms it.
pub async fn upsert(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(reminder): Json<NewReminder>,
) -> AppResult<(StatusCode, Json<ReminderRecord>)> {
    let stored = state.reminders.upsert(&user_id, reminder).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Fetch a single reminder
pub async fn get_reminder(
    State(state): State<AppState>,
    Path((user_id, content_id)): Path<(String, i64)>,
) -> AppResult<Json<ReminderRecord>> {
    let reminder = state
        .reminders
        .get(&user_id, content_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No reminder for content {}", content_id)))?;
    Ok(Json(reminder))
}

/// Delete a reminder
pub async fn remove(
    State(state): State<AppState>,
    Path((user_id, content_id)): Path<(String, i64)>,
) -> AppResult<StatusCode> {
    let deleted = state.reminders.delete(&user_id, content_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "No reminder for content {}",
            content_id
        )))
    }
}
