use async_trait::async_trait;
use chrono::{DateTime, Utc};

use staffdesk_core::{AppResult, OrganizationId};
use staffdesk_domain::{
    Invitation, NewInvitation, NewSalaryRecord, Organization, Page, RoleTag, SalaryRecord, User,
    UserId, UserStatus,
};

/// Server-side page request for `/v1/users`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserListQuery {
    /// Organization whose members are listed.
    pub organization_id: OrganizationId,
    /// One-based page number.
    pub page: usize,
    /// Page size.
    pub limit: usize,
}

/// Port for member directory reads and member mutations.
#[async_trait]
pub trait MemberDirectoryApi: Send + Sync {
    /// Lists one page of organization members.
    async fn list_users(&self, query: UserListQuery) -> AppResult<Page<User>>;

    /// Fetches one member.
    async fn get_user(&self, user_id: UserId) -> AppResult<User>;

    /// Fetches one organization.
    async fn get_organization(&self, organization_id: OrganizationId) -> AppResult<Organization>;

    /// Lists roles that can be assigned.
    async fn list_roles(&self) -> AppResult<Vec<RoleTag>>;

    /// Replaces a member's role assignments and returns the updated member.
    async fn change_user_roles(&self, user_id: UserId, roles: &[RoleTag]) -> AppResult<User>;

    /// Updates a member's lifecycle status and returns the updated member.
    async fn update_user_status(&self, user_id: UserId, status: UserStatus) -> AppResult<User>;

    /// Removes a member from an organization.
    async fn remove_user_from_organization(
        &self,
        organization_id: OrganizationId,
        user_id: UserId,
    ) -> AppResult<()>;

    /// Sends a password reset email to a member.
    async fn send_password_reset(&self, user_id: UserId) -> AppResult<()>;
}

/// Port for salary history records.
#[async_trait]
pub trait SalaryHistoryApi: Send + Sync {
    /// Lists every salary record for a member, in no particular order.
    async fn list_salary_history(&self, user_id: UserId) -> AppResult<Vec<SalaryRecord>>;

    /// Records a salary change and returns the stored record.
    async fn create_salary_record(&self, input: &NewSalaryRecord) -> AppResult<SalaryRecord>;
}

/// Port for organization invitations.
#[async_trait]
pub trait InvitationApi: Send + Sync {
    /// Lists invitations for an organization.
    async fn list_invitations(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<Invitation>>;

    /// Sends an invitation.
    async fn create_invitation(&self, input: &NewInvitation) -> AppResult<Invitation>;

    /// Revokes an invitation and returns it.
    async fn revoke_invitation(&self, invitation_id: &str) -> AppResult<Invitation>;
}

/// Source of the current instant used for effective-date classification.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}
