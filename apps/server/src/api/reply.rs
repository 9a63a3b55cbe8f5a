//! Reply API endpoints.

use std::sync::Arc;

use api_protocol::{CreateReplyRequest, Envelope, LikeResponse, UpdateReplyRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use class_store::ClassStore;
use entities::{Reply, Role};
use uuid::Uuid;

use crate::api::comment::validate_content;
use crate::error::{ServerError, ServerResult};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Converts an entity Reply to the wire Reply.
pub(crate) fn entity_to_api_reply(reply: &Reply) -> api_protocol::Reply {
    api_protocol::Reply {
        id: reply.id.to_string(),
        content: reply.content.clone(),
        comment_id: reply.comment_id.to_string(),
        creator_id: reply.creator_id.to_string(),
        checked: reply.checked,
        likes: reply.likes.iter().map(|id| id.to_string()).collect(),
        created_at: reply.created_at,
    }
}

/// Creates a reply, linking it into its parent comment.
pub async fn create_reply<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateReplyRequest>,
) -> ServerResult<(StatusCode, Json<Envelope<api_protocol::Reply>>)> {
    validate_content(&request.content)?;

    let comment_id: Uuid = request
        .comment_id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid comment id".to_string()))?;

    let mut comment = state
        .store
        .get_comment(comment_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Comment not found".to_string()))?;

    let reply = state
        .store
        .create_reply(Reply::new(request.content, comment_id, current.id))
        .await?;

    comment.replies.push(reply.id);
    comment.updated_at = chrono::Utc::now();
    state.store.update_comment(comment).await?;

    tracing::info!(reply_id = %reply.id, comment_id = %comment_id, "Reply created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(entity_to_api_reply(&reply), "Reply created")),
    ))
}

/// Updates a reply. Content edits are restricted to the creator; the checked
/// flag is restricted to teachers.
pub async fn update_reply<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<UpdateReplyRequest>,
) -> ServerResult<Json<Envelope<api_protocol::Reply>>> {
    let reply_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid reply id".to_string()))?;

    let mut reply = state
        .store
        .get_reply(reply_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Reply not found".to_string()))?;

    if let Some(content) = request.content {
        if reply.creator_id != current.id {
            return Err(ServerError::PermissionDenied(
                "Only the author can edit a reply".to_string(),
            ));
        }
        validate_content(&content)?;
        reply.content = content;
    }
    if let Some(checked) = request.checked {
        if current.role != Role::Teacher {
            return Err(ServerError::PermissionDenied(
                "Only teachers can check replies off".to_string(),
            ));
        }
        reply.checked = checked;
    }
    reply.updated_at = chrono::Utc::now();

    let reply = state.store.update_reply(reply).await?;

    Ok(Json(Envelope::ok(entity_to_api_reply(&reply), "Reply updated")))
}

/// Toggles the requester's like on a reply.
pub async fn like_reply<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(current): Extension<CurrentUser>,
) -> ServerResult<Json<Envelope<LikeResponse>>> {
    let reply_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid reply id".to_string()))?;

    let mut reply = state
        .store
        .get_reply(reply_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Reply not found".to_string()))?;

    let liked = reply.toggle_like(current.id);
    reply.updated_at = chrono::Utc::now();
    let reply = state.store.update_reply(reply).await?;

    // Mirror the like on the user's own record. Last write wins.
    if let Some(mut user) = state.store.get_user(current.id).await? {
        if liked {
            if !user.liked_replies.contains(&reply_id) {
                user.liked_replies.push(reply_id);
            }
        } else {
            user.liked_replies.retain(|r| *r != reply_id);
        }
        state.store.update_user(user).await?;
    }

    Ok(Json(Envelope::ok(
        LikeResponse {
            liked,
            like_count: reply.likes.len(),
        },
        if liked { "Reply liked" } else { "Reply unliked" },
    )))
}

/// Deletes a reply.
// TODO: decide whether reply deletion should require the creator-or-teacher
// check that comment deletion enforces.
pub async fn delete_reply<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(_current): Extension<CurrentUser>,
) -> ServerResult<Json<Envelope<()>>> {
    let reply_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid reply id".to_string()))?;

    state.store.delete_reply(reply_id).await?;

    tracing::info!(reply_id = %reply_id, "Reply deleted");

    Ok(Json(Envelope::ok((), "Reply deleted")))
}
