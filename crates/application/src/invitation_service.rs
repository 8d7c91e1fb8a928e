use std::sync::Arc;

use tracing::info;

use staffdesk_core::{AppError, AppResult, OrganizationId};
use staffdesk_domain::{Capability, Invitation, NewInvitation, RoleTag};

use crate::{Actor, Clock, InvitationApi, MemberDirectoryApi, PermissionService};

/// Application service for organization invitations.
#[derive(Clone)]
pub struct InvitationService {
    permission_service: PermissionService,
    directory: Arc<dyn MemberDirectoryApi>,
    invitations: Arc<dyn InvitationApi>,
    clock: Arc<dyn Clock>,
}

impl InvitationService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        permission_service: PermissionService,
        directory: Arc<dyn MemberDirectoryApi>,
        invitations: Arc<dyn InvitationApi>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            permission_service,
            directory,
            invitations,
            clock,
        }
    }

    /// Lists the organization's invitations.
    pub async fn list(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<Invitation>> {
        self.permission_service
            .require(actor, organization_id, Capability::ViewInvitations)?;

        self.invitations.list_invitations(organization_id).await
    }

    /// Invites `email` to the organization with `role`.
    pub async fn invite(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
        email: &str,
        role: RoleTag,
    ) -> AppResult<Invitation> {
        self.permission_service
            .require(actor, organization_id, Capability::InviteUsers)?;

        let organization = self.directory.get_organization(organization_id).await?;
        let input = NewInvitation::new(email, &organization, role)?;

        let as_of = self.clock.now();
        let already_open = self
            .invitations
            .list_invitations(organization_id)
            .await?
            .iter()
            .any(|invitation| {
                invitation.is_open(as_of)
                    && invitation.email.eq_ignore_ascii_case(input.email().as_str())
            });
        if already_open {
            return Err(AppError::Conflict(format!(
                "an open invitation for '{}' already exists",
                input.email().as_str()
            )));
        }

        let invitation = self.invitations.create_invitation(&input).await?;
        info!(
            actor_id = %actor.user_id(),
            organization_id = %organization_id,
            invitation_id = %invitation.id,
            role = %role,
            "sent invitation"
        );
        Ok(invitation)
    }

    /// Revokes an open invitation.
    pub async fn revoke(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
        invitation_id: &str,
    ) -> AppResult<Invitation> {
        self.permission_service
            .require(actor, organization_id, Capability::RevokeInvitations)?;

        let invitation = self
            .invitations
            .list_invitations(organization_id)
            .await?
            .into_iter()
            .find(|invitation| invitation.id == invitation_id)
            .ok_or_else(|| AppError::NotFound(format!("invitation '{invitation_id}'")))?;
        if !invitation.is_open(self.clock.now()) {
            return Err(AppError::Conflict(format!(
                "invitation '{invitation_id}' is {} and cannot be revoked",
                invitation.status.as_str()
            )));
        }

        let revoked = self.invitations.revoke_invitation(invitation_id).await?;
        info!(
            actor_id = %actor.user_id(),
            organization_id = %organization_id,
            invitation_id,
            "revoked invitation"
        );
        Ok(revoked)
    }
}
