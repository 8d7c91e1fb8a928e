use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use staffdesk_core::OrganizationId;
use staffdesk_domain::{NewInvitation, RoleTag, UserId, UserStatus};

/// Error body returned by the admin API on non-success responses.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ApiErrorBody {
    #[serde(default)]
    pub(super) message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RoleResponse {
    pub(super) name: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ChangeRolesRequest<'a> {
    pub(super) roles: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct UpdateStatusRequest {
    pub(super) status: UserStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateInvitationRequest<'a> {
    pub(super) email: &'a str,
    pub(super) organization_id: OrganizationId,
    pub(super) role: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateSalaryRecordRequest<'a> {
    pub(super) user_id: UserId,
    pub(super) amount: f64,
    pub(super) currency: &'a str,
    pub(super) effective_date: DateTime<Utc>,
    pub(super) reason: &'a str,
}

impl<'a> ChangeRolesRequest<'a> {
    pub(super) fn new(roles: &'a [RoleTag]) -> Self {
        Self {
            roles: roles.iter().map(|role| role.as_str()).collect(),
        }
    }
}

impl<'a> From<&'a NewInvitation> for CreateInvitationRequest<'a> {
    fn from(input: &'a NewInvitation) -> Self {
        Self {
            email: input.email().as_str(),
            organization_id: input.organization_id(),
            role: input.role().as_str(),
        }
    }
}

/// Parses role names returned by `/v1/roles`, skipping names this client does not know.
pub(super) fn known_roles(roles: Vec<RoleResponse>) -> Vec<RoleTag> {
    roles
        .into_iter()
        .filter_map(|role| {
            let parsed = RoleTag::parse(role.name.as_str());
            if parsed.is_none() {
                debug!(role = %role.name, "skipping unknown role");
            }
            parsed
        })
        .collect()
}
