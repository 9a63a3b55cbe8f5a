//! Response payload types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Returned by signup and login: the bearer token plus the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

/// Returned by invitation creation: the shareable link plus its expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitationResponse {
    pub signup_link: String,
    pub expires_at: DateTime<Utc>,
}

/// Returned by invitation validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateInvitationResponse {
    pub valid: bool,
    pub workspace: Workspace,
    pub expires_at: DateTime<Utc>,
}

/// Returned by the invitation history listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInvitationsResponse {
    pub invitations: Vec<Invitation>,
}

/// Returned by like toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    /// Whether the entity is liked by the requester after the call.
    pub liked: bool,
    /// Total number of likes after the call.
    pub like_count: usize,
}

/// Returned by class listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClassesResponse {
    pub classes: Vec<Class>,
}

/// Returned by project comment listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommentsResponse {
    pub comments: Vec<Comment>,
}

/// Returned by workspace team listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTeamsResponse {
    pub teams: Vec<Team>,
}
