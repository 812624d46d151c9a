//! Notification handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::AuthContext;
use crate::response::ApiResponse;
use crate::AppState;
use acadflow_common::{
    db::{models::Notification, Repository},
    errors::Result,
};

/// Query parameters for the notification listing
#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    pub unread: Option<bool>,
}

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}

#[derive(Serialize)]
pub struct MarkAllReadResponse {
    pub count: u64,
}

/// Notifications for the acting user, newest first
pub async fn my_notifications(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<ApiResponse<Vec<Notification>>>> {
    let repo = Repository::new(state.db.clone());
    let notifications = repo
        .find_notifications_by_user(auth.user_id, query.unread.unwrap_or(false))
        .await?;

    Ok(ApiResponse::ok(notifications, "Notifications retrieved successfully"))
}

/// Count of unread notifications for the acting user
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<UnreadCountResponse>>> {
    let repo = Repository::new(state.db.clone());
    let count = repo.unread_notification_count(auth.user_id).await?;

    Ok(ApiResponse::ok(
        UnreadCountResponse { count },
        "Unread count retrieved successfully",
    ))
}

/// Mark one notification read; only the owner may flip the flag
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Notification>>> {
    let repo = Repository::new(state.db.clone());
    let notification = repo
        .mark_notification_read(notification_id, auth.user_id)
        .await?;

    Ok(ApiResponse::ok(notification, "Notification marked as read"))
}

/// Mark every unread notification for the acting user as read
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<MarkAllReadResponse>>> {
    let repo = Repository::new(state.db.clone());
    let count = repo.mark_all_notifications_read(auth.user_id).await?;

    Ok(ApiResponse::ok(
        MarkAllReadResponse { count },
        "All notifications marked as read",
    ))
}
