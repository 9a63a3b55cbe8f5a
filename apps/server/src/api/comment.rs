//! Comment API endpoints.

use std::sync::Arc;

use api_protocol::{
    CreateCommentRequest, Envelope, LikeResponse, ListCommentsResponse, UpdateCommentRequest,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use class_store::ClassStore;
use entities::{Comment, CommentKind, Role, MAX_CONTENT_LEN};
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::middleware::CurrentUser;
use crate::state::AppState;

pub(crate) fn to_entity_kind(kind: api_protocol::CommentKind) -> CommentKind {
    match kind {
        api_protocol::CommentKind::Question => CommentKind::Question,
        api_protocol::CommentKind::Public => CommentKind::Public,
        api_protocol::CommentKind::Private => CommentKind::Private,
    }
}

pub(crate) fn to_api_kind(kind: CommentKind) -> api_protocol::CommentKind {
    match kind {
        CommentKind::Question => api_protocol::CommentKind::Question,
        CommentKind::Public => api_protocol::CommentKind::Public,
        CommentKind::Private => api_protocol::CommentKind::Private,
    }
}

/// Converts an entity Comment to the wire Comment.
pub(crate) fn entity_to_api_comment(comment: &Comment) -> api_protocol::Comment {
    api_protocol::Comment {
        id: comment.id.to_string(),
        content: comment.content.clone(),
        project_id: comment.project_id.to_string(),
        creator_id: comment.creator_id.to_string(),
        kind: to_api_kind(comment.kind),
        checked: comment.checked,
        video_timestamp: comment.video_timestamp.clone(),
        likes: comment.likes.iter().map(|id| id.to_string()).collect(),
        replies: comment.replies.iter().map(|id| id.to_string()).collect(),
        created_at: comment.created_at,
    }
}

/// Rejects empty content and content over the length cap.
pub(crate) fn validate_content(content: &str) -> ServerResult<()> {
    if content.trim().is_empty() {
        return Err(ServerError::InvalidRequest(
            "Content is required".to_string(),
        ));
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(ServerError::InvalidRequest(format!(
            "Content must be at most {MAX_CONTENT_LEN} characters"
        )));
    }
    Ok(())
}

/// Creates a comment pinned to a video timecode, linking it into its project.
pub async fn create_comment<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateCommentRequest>,
) -> ServerResult<(StatusCode, Json<Envelope<api_protocol::Comment>>)> {
    validate_content(&request.content)?;

    let project_id: Uuid = request
        .project_id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid project id".to_string()))?;

    let mut project = state
        .store
        .get_project(project_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Project not found".to_string()))?;

    let comment = state
        .store
        .create_comment(Comment::new(
            request.content,
            project_id,
            current.id,
            to_entity_kind(request.kind),
            request.video_timestamp,
        ))
        .await?;

    project.comments.push(comment.id);
    project.updated_at = chrono::Utc::now();
    state.store.update_project(project).await?;

    tracing::info!(comment_id = %comment.id, project_id = %project_id, "Comment created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(
            entity_to_api_comment(&comment),
            "Comment created",
        )),
    ))
}

/// Lists the comments on a project, oldest first.
pub async fn list_comments<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(project_id): Path<String>,
) -> ServerResult<Json<Envelope<ListCommentsResponse>>> {
    let project_id: Uuid = project_id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid project id".to_string()))?;

    let comments = state.store.list_comments(project_id).await?;

    Ok(Json(Envelope::ok(
        ListCommentsResponse {
            comments: comments.iter().map(entity_to_api_comment).collect(),
        },
        "Comments found",
    )))
}

/// Updates a comment. Content edits are restricted to the creator; the
/// checked flag is restricted to teachers.
pub async fn update_comment<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<UpdateCommentRequest>,
) -> ServerResult<Json<Envelope<api_protocol::Comment>>> {
    let comment_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid comment id".to_string()))?;

    let mut comment = state
        .store
        .get_comment(comment_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Comment not found".to_string()))?;

    if let Some(content) = request.content {
        if comment.creator_id != current.id {
            return Err(ServerError::PermissionDenied(
                "Only the author can edit a comment".to_string(),
            ));
        }
        validate_content(&content)?;
        comment.content = content;
    }
    if let Some(checked) = request.checked {
        if current.role != Role::Teacher {
            return Err(ServerError::PermissionDenied(
                "Only teachers can check comments off".to_string(),
            ));
        }
        comment.checked = checked;
    }
    comment.updated_at = chrono::Utc::now();

    let comment = state.store.update_comment(comment).await?;

    Ok(Json(Envelope::ok(
        entity_to_api_comment(&comment),
        "Comment updated",
    )))
}

/// Toggles the requester's like on a comment.
pub async fn like_comment<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(current): Extension<CurrentUser>,
) -> ServerResult<Json<Envelope<LikeResponse>>> {
    let comment_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid comment id".to_string()))?;

    let mut comment = state
        .store
        .get_comment(comment_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Comment not found".to_string()))?;

    let liked = comment.toggle_like(current.id);
    comment.updated_at = chrono::Utc::now();
    let comment = state.store.update_comment(comment).await?;

    // Mirror the like on the user's own record. Last write wins.
    if let Some(mut user) = state.store.get_user(current.id).await? {
        if liked {
            if !user.liked_comments.contains(&comment_id) {
                user.liked_comments.push(comment_id);
            }
        } else {
            user.liked_comments.retain(|c| *c != comment_id);
        }
        state.store.update_user(user).await?;
    }

    Ok(Json(Envelope::ok(
        LikeResponse {
            liked,
            like_count: comment.likes.len(),
        },
        if liked { "Comment liked" } else { "Comment unliked" },
    )))
}

/// Deletes a comment and its replies. Only the creator or a teacher may
/// delete.
pub async fn delete_comment<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(current): Extension<CurrentUser>,
) -> ServerResult<Json<Envelope<()>>> {
    let comment_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid comment id".to_string()))?;

    let comment = state
        .store
        .get_comment(comment_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Comment not found".to_string()))?;

    if comment.creator_id != current.id && current.role != Role::Teacher {
        return Err(ServerError::PermissionDenied(
            "Only the author or a teacher can delete a comment".to_string(),
        ));
    }

    state.store.delete_comment(comment_id).await?;

    tracing::info!(comment_id = %comment_id, "Comment deleted");

    Ok(Json(Envelope::ok((), "Comment deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::state::{create_shared_state, SharedState};
    use class_store::MemoryClassStore;
    use entities::{Project, User};

    async fn state_with_project() -> (SharedState<MemoryClassStore>, User, Project) {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            public_url: "http://localhost:5173".to_string(),
            log_level: "info".to_string(),
        };
        let state = create_shared_state(config, MemoryClassStore::new());
        let author = state
            .store
            .create_user(User::new(
                "author",
                "author@example.com",
                "hash",
                Role::Student,
                "tok-author",
            ))
            .await
            .unwrap();
        let project = state
            .store
            .create_project(Project::new("Short film", Uuid::new_v4()))
            .await
            .unwrap();
        (state, author, project)
    }

    #[tokio::test]
    async fn test_create_comment_links_into_project() {
        let (state, author, project) = state_with_project().await;

        let (status, Json(envelope)) = create_comment(
            State(state.clone()),
            Extension(CurrentUser::from(&author)),
            Json(CreateCommentRequest {
                content: "Check the color grade here".to_string(),
                project_id: project.id.to_string(),
                kind: api_protocol::CommentKind::Public,
                video_timestamp: "02:41".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        let comment = envelope.response.unwrap();
        let project = state.store.get_project(project.id).await.unwrap().unwrap();
        assert_eq!(project.comments, vec![comment.id.parse::<Uuid>().unwrap()]);
    }

    #[tokio::test]
    async fn test_content_over_cap_is_rejected() {
        let (state, author, project) = state_with_project().await;

        let err = create_comment(
            State(state),
            Extension(CurrentUser::from(&author)),
            Json(CreateCommentRequest {
                content: "x".repeat(MAX_CONTENT_LEN + 1),
                project_id: project.id.to_string(),
                kind: api_protocol::CommentKind::Public,
                video_timestamp: "00:00".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServerError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_only_author_or_teacher_deletes() {
        let (state, author, project) = state_with_project().await;
        let comment = state
            .store
            .create_comment(Comment::new(
                "Trim this shot",
                project.id,
                author.id,
                CommentKind::Public,
                "01:02",
            ))
            .await
            .unwrap();

        let stranger = state
            .store
            .create_user(User::new(
                "stranger",
                "stranger@example.com",
                "hash",
                Role::Student,
                "tok-stranger",
            ))
            .await
            .unwrap();
        let err = delete_comment(
            State(state.clone()),
            Path(comment.id.to_string()),
            Extension(CurrentUser::from(&stranger)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServerError::PermissionDenied(_)));

        let teacher = state
            .store
            .create_user(User::new(
                "teacher",
                "teacher@example.com",
                "hash",
                Role::Teacher,
                "tok-teacher",
            ))
            .await
            .unwrap();
        delete_comment(
            State(state.clone()),
            Path(comment.id.to_string()),
            Extension(CurrentUser::from(&teacher)),
        )
        .await
        .unwrap();

        assert!(state.store.get_comment(comment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_like_toggle_mirrors_user_record() {
        let (state, author, project) = state_with_project().await;
        let comment = state
            .store
            .create_comment(Comment::new(
                "Love this transition",
                project.id,
                author.id,
                CommentKind::Public,
                "00:30",
            ))
            .await
            .unwrap();

        let Json(envelope) = like_comment(
            State(state.clone()),
            Path(comment.id.to_string()),
            Extension(CurrentUser::from(&author)),
        )
        .await
        .unwrap();
        let payload = envelope.response.unwrap();
        assert!(payload.liked);
        assert_eq!(payload.like_count, 1);

        let user = state.store.get_user(author.id).await.unwrap().unwrap();
        assert_eq!(user.liked_comments, vec![comment.id]);

        let Json(envelope) = like_comment(
            State(state.clone()),
            Path(comment.id.to_string()),
            Extension(CurrentUser::from(&author)),
        )
        .await
        .unwrap();
        assert!(!envelope.response.unwrap().liked);

        let user = state.store.get_user(author.id).await.unwrap().unwrap();
        assert!(user.liked_comments.is_empty());
    }
}
