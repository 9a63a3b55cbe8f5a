//! Workspace invitation entity definitions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Role;

/// How long an invitation stays redeemable after creation.
pub const INVITATION_TTL_DAYS: i64 = 7;

/// A single-use, time-limited token granting workspace membership at a
/// fixed role.
///
/// An invitation is `Active` while unused and unexpired. Redemption is
/// terminal; an expired invitation stays queryable for history but can never
/// be redeemed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceInvitation {
    /// Unique identifier.
    pub id: Uuid,
    /// Workspace the invitation grants membership to.
    pub workspace_id: Uuid,
    /// User who created the invitation.
    pub creator_id: Uuid,
    /// Unique random token, hex-encoded.
    pub token: String,
    /// When the invitation stops being redeemable.
    pub expires_at: DateTime<Utc>,
    /// Whether the invitation has been redeemed.
    pub is_used: bool,
    /// User who redeemed the invitation, if any.
    pub used_by: Option<Uuid>,
    /// When the invitation was redeemed, if ever.
    pub used_at: Option<DateTime<Utc>>,
    /// Role the redeeming account must hold.
    pub allowed_role: Role,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
}

impl WorkspaceInvitation {
    /// Creates a new invitation expiring [`INVITATION_TTL_DAYS`] from now.
    pub fn new(
        workspace_id: Uuid,
        creator_id: Uuid,
        token: impl Into<String>,
        allowed_role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            workspace_id,
            creator_id,
            token: token.into(),
            expires_at: now + Duration::days(INVITATION_TTL_DAYS),
            is_used: false,
            used_by: None,
            used_at: None,
            allowed_role,
            created_at: now,
        }
    }

    /// Returns true if the invitation has passed its expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Returns true if the invitation can still be redeemed.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.is_used && !self.is_expired(now)
    }

    /// Marks the invitation as redeemed by the given user.
    pub fn mark_used(&mut self, user_id: Uuid, now: DateTime<Utc>) {
        self.is_used = true;
        self.used_by = Some(user_id);
        self.used_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_invitation_is_active() {
        let invitation =
            WorkspaceInvitation::new(Uuid::new_v4(), Uuid::new_v4(), "abc123", Role::Student);

        assert!(invitation.is_active(Utc::now()));
        assert!(!invitation.is_used);
        assert_eq!(invitation.allowed_role, Role::Student);
    }

    #[test]
    fn test_expiry_window() {
        let invitation =
            WorkspaceInvitation::new(Uuid::new_v4(), Uuid::new_v4(), "abc123", Role::Student);

        let just_before = invitation.expires_at - Duration::seconds(1);
        let at_expiry = invitation.expires_at;

        assert!(invitation.is_active(just_before));
        assert!(invitation.is_expired(at_expiry));
        assert!(!invitation.is_active(at_expiry));
    }

    #[test]
    fn test_redeemed_is_terminal() {
        let mut invitation =
            WorkspaceInvitation::new(Uuid::new_v4(), Uuid::new_v4(), "abc123", Role::Student);
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        invitation.mark_used(user_id, now);

        assert!(!invitation.is_active(now));
        assert_eq!(invitation.used_by, Some(user_id));
        assert_eq!(invitation.used_at, Some(now));
    }
}
