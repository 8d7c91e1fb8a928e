use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use staffdesk_core::{AppError, AppResult, OrganizationId};

use crate::organization::Organization;
use crate::role::RoleTag;
use crate::user::EmailAddress;

/// Invitation lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Sent and awaiting acceptance.
    Pending,
    /// Accepted by the invitee.
    Accepted,
    /// Withdrawn by an admin.
    Revoked,
    /// Lapsed without acceptance.
    Expired,
}

impl InvitationStatus {
    /// Returns the storage string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
        }
    }
}

impl FromStr for InvitationStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "revoked" => Ok(Self::Revoked),
            "expired" => Ok(Self::Expired),
            _ => Err(AppError::Validation(format!(
                "unknown invitation status '{value}'"
            ))),
        }
    }
}

/// Organization invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    /// Stable invitation identifier.
    pub id: String,
    /// Invitee email.
    pub email: String,
    /// Organization the invitee joins.
    pub organization_id: OrganizationId,
    /// Role granted on acceptance, exactly as stored by the API.
    pub role: String,
    /// Lifecycle status.
    pub status: InvitationStatus,
    /// Acceptance deadline.
    pub expires_at: DateTime<Utc>,
    /// Display name of the inviting member.
    pub invited_by: Option<String>,
}

impl Invitation {
    /// Returns whether the invitation can still be accepted at `as_of`.
    #[must_use]
    pub fn is_open(&self, as_of: DateTime<Utc>) -> bool {
        self.status == InvitationStatus::Pending && self.expires_at > as_of
    }

    /// Returns the granted role when it is a known role.
    #[must_use]
    pub fn role_tag(&self) -> Option<RoleTag> {
        RoleTag::parse(&self.role)
    }
}

/// Validated input for sending an invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvitation {
    email: EmailAddress,
    organization_id: OrganizationId,
    role: RoleTag,
}

impl NewInvitation {
    /// Validates the invitee email and checks the role fits the organization kind.
    pub fn new(email: &str, organization: &Organization, role: RoleTag) -> AppResult<Self> {
        let email = EmailAddress::new(email)?;

        if !organization.kind.accepts_role(role) {
            return Err(AppError::Validation(format!(
                "role '{role}' cannot be granted in {} organization '{}'",
                organization.kind.as_str(),
                organization.name
            )));
        }

        Ok(Self {
            email,
            organization_id: organization.id,
            role,
        })
    }

    /// Returns the invitee email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the target organization.
    #[must_use]
    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    /// Returns the role granted on acceptance.
    #[must_use]
    pub fn role(&self) -> RoleTag {
        self.role
    }
}
