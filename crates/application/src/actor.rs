use staffdesk_core::OrganizationId;
use staffdesk_domain::{RoleTag, User, UserId};

/// Signed-in member performing an admin action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    user_id: UserId,
    organization_id: OrganizationId,
    roles: Vec<RoleTag>,
}

impl Actor {
    /// Creates an actor from identity and role data.
    #[must_use]
    pub fn new(user_id: UserId, organization_id: OrganizationId, roles: Vec<RoleTag>) -> Self {
        Self {
            user_id,
            organization_id,
            roles,
        }
    }

    /// Creates an actor from a directory entry. Unknown role names are dropped.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self::new(user.id, user.organization_id, user.role_tags())
    }

    /// Returns the acting user.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the actor's home organization.
    #[must_use]
    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    /// Returns the actor's known roles.
    #[must_use]
    pub fn roles(&self) -> &[RoleTag] {
        self.roles.as_slice()
    }

    /// Returns whether `organization_id` is the actor's own organization.
    #[must_use]
    pub fn is_member_of(&self, organization_id: OrganizationId) -> bool {
        self.organization_id == organization_id
    }
}
