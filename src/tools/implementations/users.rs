// ABOUTME: User management operation supporting list, update, and delete actions
// ABOUTME: Validates the action and user id before issuing backend calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::backend::{BackendClient, Row, SelectQuery};
use crate::constants::limits::USER_LIST_LIMIT;
use crate::constants::tables::{CREATED_AT, USERS, USER_LIST_COLUMNS};
use crate::errors::{AppError, AppResult};
use crate::models::{UserAction, UserPatch, UserRecord};

/// Typed `manage_user` arguments
///
/// `action` stays a string here; it is parsed by [`manage_user`] so an
/// unsupported value is reported as `UnknownAction`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageUserRequest {
    /// `list`, `update` or `delete`
    pub action: String,
    /// Target user for update and delete
    #[serde(default)]
    pub user_id: Option<String>,
    /// Fields to change on update
    #[serde(default)]
    pub data: Option<UserPatch>,
}

/// `manage_user` payload, one shape per action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ManageUserResponse {
    /// `{ users: [...] }`
    Users {
        /// Most recently created users first
        users: Vec<UserRecord>,
    },
    /// `{ user: {...} }`
    User {
        /// The row after the patch
        user: UserRecord,
    },
    /// `{ deleted: true }`
    Deleted {
        /// Always true when the backend call succeeded
        deleted: bool,
    },
}

fn decode_user(row: Row) -> AppResult<UserRecord> {
    serde_json::from_value(Value::Object(row))
        .map_err(|e| AppError::operation_failed(format!("Malformed user row: {e}")))
}

fn require_user_id(user_id: Option<&str>, action: UserAction) -> AppResult<&str> {
    user_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::missing_user_id(action.as_str()))
}

/// List, update, or delete users
///
/// Argument checks happen before any backend call.
///
/// # Errors
/// - `UnknownAction` for an action outside list/update/delete
/// - `MissingUserId` for update/delete without a non-empty `userId`
/// - `OperationFailed` when the backend call fails or an updated row is missing
pub async fn manage_user(
    backend: &dyn BackendClient,
    request: &ManageUserRequest,
) -> AppResult<ManageUserResponse> {
    let action: UserAction = request.action.parse()?;

    match action {
        UserAction::List => {
            let query = SelectQuery::new(USERS)
                .columns(USER_LIST_COLUMNS)
                .order_by(CREATED_AT, false)
                .limit(USER_LIST_LIMIT);
            let users = backend
                .select(&query)
                .await?
                .into_iter()
                .map(decode_user)
                .collect::<AppResult<Vec<_>>>()?;
            Ok(ManageUserResponse::Users { users })
        }
        UserAction::Update => {
            let user_id = require_user_id(request.user_id.as_deref(), action)?;
            let patch = request.data.clone().unwrap_or_default().to_row();
            let row = backend.update(USERS, user_id, &patch).await?;
            info!(user_id, fields = patch.len(), "Updated user");
            Ok(ManageUserResponse::User {
                user: decode_user(row)?,
            })
        }
        UserAction::Delete => {
            let user_id = require_user_id(request.user_id.as_deref(), action)?;
            backend.delete(USERS, user_id).await?;
            info!(user_id, "Deleted user");
            Ok(ManageUserResponse::Deleted { deleted: true })
        }
    }
}
