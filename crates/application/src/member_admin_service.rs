use std::sync::Arc;

use tracing::info;

use staffdesk_core::{AppError, AppResult, OrganizationId};
use staffdesk_domain::{
    Capability, CapabilitySet, ConfirmationPhrase, DirectoryQuery, MAX_PAGE_SIZE, Page, RoleTag,
    User, UserId, UserStatus,
};

use crate::{Actor, MemberDirectoryApi, PermissionService, UserListQuery};

/// Application service for member directory and member lifecycle actions.
#[derive(Clone)]
pub struct MemberAdminService {
    permission_service: PermissionService,
    directory: Arc<dyn MemberDirectoryApi>,
}

impl MemberAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(permission_service: PermissionService, directory: Arc<dyn MemberDirectoryApi>) -> Self {
        Self {
            permission_service,
            directory,
        }
    }

    /// Returns the capabilities the actor holds in `organization_id`.
    #[must_use]
    pub fn member_capabilities(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
    ) -> CapabilitySet {
        self.permission_service
            .capabilities_for(actor, organization_id)
    }

    /// Loads every member of the organization and applies the directory query.
    pub async fn list_members(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
        query: &DirectoryQuery,
    ) -> AppResult<Page<User>> {
        self.permission_service
            .require(actor, organization_id, Capability::ViewUsers)?;

        let members = self.load_all_members(organization_id).await?;
        Ok(query.apply(&members))
    }

    /// Returns one member's details.
    pub async fn member_details(&self, actor: &Actor, user_id: UserId) -> AppResult<User> {
        self.load_target(actor, user_id, Capability::ViewUserDetails)
            .await
    }

    /// Lists roles the directory can assign.
    pub async fn assignable_roles(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<RoleTag>> {
        self.permission_service
            .require(actor, organization_id, Capability::ChangeRoles)?;

        let organization = self.directory.get_organization(organization_id).await?;
        Ok(self
            .directory
            .list_roles()
            .await?
            .into_iter()
            .filter(|role| organization.kind.accepts_role(*role))
            .collect())
    }

    /// Replaces a member's roles.
    pub async fn change_roles(
        &self,
        actor: &Actor,
        user_id: UserId,
        roles: &[RoleTag],
    ) -> AppResult<User> {
        let target = self
            .load_target(actor, user_id, Capability::ChangeRoles)
            .await?;

        let mut roles = roles.to_vec();
        roles.sort_unstable();
        roles.dedup();
        if roles.is_empty() {
            return Err(AppError::Validation(
                "a member must keep at least one role".to_owned(),
            ));
        }

        let grants_platform_role = roles
            .iter()
            .any(|role| matches!(role, RoleTag::SuperAdmin | RoleTag::SystemAdmin));
        let actor_is_platform_admin = actor
            .roles()
            .iter()
            .any(|role| matches!(role, RoleTag::SuperAdmin | RoleTag::SystemAdmin));
        if grants_platform_role && !actor_is_platform_admin {
            return Err(AppError::Forbidden(
                "only platform administrators can grant platform roles".to_owned(),
            ));
        }

        let organization = self
            .directory
            .get_organization(target.organization_id)
            .await?;
        if let Some(role) = roles
            .iter()
            .find(|role| !organization.kind.accepts_role(**role))
        {
            return Err(AppError::Validation(format!(
                "role '{role}' cannot be assigned in {} organization '{}'",
                organization.kind.as_str(),
                organization.name
            )));
        }

        let updated = self.directory.change_user_roles(user_id, &roles).await?;
        info!(
            actor_id = %actor.user_id(),
            user_id = %user_id,
            roles = ?roles,
            "changed member roles"
        );
        Ok(updated)
    }

    /// Removes a member after the actor types the member's email address.
    pub async fn remove_member(
        &self,
        actor: &Actor,
        user_id: UserId,
        confirmation: &str,
    ) -> AppResult<()> {
        let target = self
            .load_target(actor, user_id, Capability::RemoveUsers)
            .await?;
        reject_self_action(actor, &target, "remove")?;
        ConfirmationPhrase::verify(&target.email, confirmation)?;

        self.directory
            .remove_user_from_organization(target.organization_id, user_id)
            .await?;
        info!(
            actor_id = %actor.user_id(),
            user_id = %user_id,
            organization_id = %target.organization_id,
            "removed member from organization"
        );
        Ok(())
    }

    /// Suspends an active member.
    pub async fn suspend_member(&self, actor: &Actor, user_id: UserId) -> AppResult<User> {
        let target = self
            .load_target(actor, user_id, Capability::SuspendUser)
            .await?;
        reject_self_action(actor, &target, "suspend")?;
        if target.status != UserStatus::Active {
            return Err(AppError::Conflict(format!(
                "member '{user_id}' is {} and cannot be suspended",
                target.status.as_str()
            )));
        }

        self.set_status(actor, user_id, UserStatus::Suspended).await
    }

    /// Reactivates a suspended or NLWF member.
    pub async fn reactivate_member(&self, actor: &Actor, user_id: UserId) -> AppResult<User> {
        let target = self.directory.get_user(user_id).await?;
        let capability = match target.status {
            UserStatus::Suspended => Capability::SuspendUser,
            UserStatus::Nlwf => Capability::MarkNlwf,
            UserStatus::Active | UserStatus::Invited | UserStatus::Unrecognized => {
                return Err(AppError::Conflict(format!(
                    "member '{user_id}' is {} and cannot be reactivated",
                    target.status.as_str()
                )));
            }
        };
        self.permission_service
            .require(actor, target.organization_id, capability)?;

        self.set_status(actor, user_id, UserStatus::Active).await
    }

    /// Marks a member as no longer with the firm after the actor types the member's email.
    pub async fn mark_nlwf(
        &self,
        actor: &Actor,
        user_id: UserId,
        confirmation: &str,
    ) -> AppResult<User> {
        let target = self
            .load_target(actor, user_id, Capability::MarkNlwf)
            .await?;
        reject_self_action(actor, &target, "mark as no longer with the firm")?;
        if target.status == UserStatus::Nlwf {
            return Err(AppError::Conflict(format!(
                "member '{user_id}' is already marked nlwf"
            )));
        }
        ConfirmationPhrase::verify(&target.email, confirmation)?;

        self.set_status(actor, user_id, UserStatus::Nlwf).await
    }

    /// Sends a password reset email to an active member.
    pub async fn send_password_reset(&self, actor: &Actor, user_id: UserId) -> AppResult<()> {
        let target = self
            .load_target(actor, user_id, Capability::SendPasswordReset)
            .await?;
        if target.status != UserStatus::Active {
            return Err(AppError::Validation(format!(
                "password reset is unavailable for {} member '{user_id}'",
                target.status.as_str()
            )));
        }

        self.directory.send_password_reset(user_id).await?;
        info!(
            actor_id = %actor.user_id(),
            user_id = %user_id,
            "sent password reset"
        );
        Ok(())
    }

    async fn set_status(
        &self,
        actor: &Actor,
        user_id: UserId,
        status: UserStatus,
    ) -> AppResult<User> {
        let updated = self.directory.update_user_status(user_id, status).await?;
        info!(
            actor_id = %actor.user_id(),
            user_id = %user_id,
            status = status.as_str(),
            "updated member status"
        );
        Ok(updated)
    }

    async fn load_target(
        &self,
        actor: &Actor,
        user_id: UserId,
        capability: Capability,
    ) -> AppResult<User> {
        let target = self.directory.get_user(user_id).await?;
        self.permission_service
            .require(actor, target.organization_id, capability)?;
        Ok(target)
    }

    async fn load_all_members(&self, organization_id: OrganizationId) -> AppResult<Vec<User>> {
        let mut members = Vec::new();
        let mut page = 1;

        loop {
            let response = self
                .directory
                .list_users(UserListQuery {
                    organization_id,
                    page,
                    limit: MAX_PAGE_SIZE,
                })
                .await?;
            let fetched = response.items.len();
            members.extend(response.items);

            if fetched == 0 || page >= response.pagination.total_pages {
                break;
            }
            page += 1;
        }

        Ok(members)
    }
}

fn reject_self_action(actor: &Actor, target: &User, action: &str) -> AppResult<()> {
    if actor.user_id() == target.id {
        return Err(AppError::Validation(format!("you cannot {action} yourself")));
    }

    Ok(())
}
