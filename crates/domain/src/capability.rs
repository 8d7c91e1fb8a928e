use serde::{Deserialize, Serialize};

use crate::role::{ClientRole, InternalRole, RoleTag, parse_role_tags};

/// Capability flags surfaced to admin screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Allows listing organization members.
    ViewUsers,
    /// Allows opening a member's detail page.
    ViewUserDetails,
    /// Allows sending organization invitations.
    InviteUsers,
    /// Allows removing members from the organization.
    RemoveUsers,
    /// Allows changing member role assignments.
    ChangeRoles,
    /// Allows marking a member as no longer with firm.
    MarkNlwf,
    /// Allows triggering password reset emails.
    SendPasswordReset,
    /// Allows suspending a member.
    SuspendUser,
    /// Allows editing member profile fields.
    EditUserProfile,
    /// Allows reading salary history.
    ViewSalaryHistory,
    /// Allows recording salary changes.
    ManageSalary,
    /// Allows listing pending invitations.
    ViewInvitations,
    /// Allows revoking pending invitations.
    RevokeInvitations,
    /// Allows editing organization settings.
    ManageOrganization,
    /// Marks the viewer as internal staff.
    IsInternalUser,
    /// Marks the viewer as a client member.
    IsClientUser,
}

impl Capability {
    /// Returns the stable key used in serialized capability sets.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewUsers => "canViewUsers",
            Self::ViewUserDetails => "canViewUserDetails",
            Self::InviteUsers => "canInviteUsers",
            Self::RemoveUsers => "canRemoveUsers",
            Self::ChangeRoles => "canChangeRoles",
            Self::MarkNlwf => "canMarkNLWF",
            Self::SendPasswordReset => "canSendPasswordReset",
            Self::SuspendUser => "canSuspendUser",
            Self::EditUserProfile => "canEditUserProfile",
            Self::ViewSalaryHistory => "canViewSalaryHistory",
            Self::ManageSalary => "canManageSalary",
            Self::ViewInvitations => "canViewInvitations",
            Self::RevokeInvitations => "canRevokeInvitations",
            Self::ManageOrganization => "canManageOrganization",
            Self::IsInternalUser => "isInternalUser",
            Self::IsClientUser => "isClientUser",
        }
    }

    /// Returns all known capabilities.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Capability] = &[
            Capability::ViewUsers,
            Capability::ViewUserDetails,
            Capability::InviteUsers,
            Capability::RemoveUsers,
            Capability::ChangeRoles,
            Capability::MarkNlwf,
            Capability::SendPasswordReset,
            Capability::SuspendUser,
            Capability::EditUserProfile,
            Capability::ViewSalaryHistory,
            Capability::ManageSalary,
            Capability::ViewInvitations,
            Capability::RevokeInvitations,
            Capability::ManageOrganization,
            Capability::IsInternalUser,
            Capability::IsClientUser,
        ];

        ALL
    }
}

/// Resolved capability flags for one viewer and one organization.
///
/// Every flag is always present; a set is never partially defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitySet {
    /// Member list access.
    pub can_view_users: bool,
    /// Member detail page access.
    pub can_view_user_details: bool,
    /// Invitation sending.
    pub can_invite_users: bool,
    /// Member removal.
    pub can_remove_users: bool,
    /// Role assignment changes.
    pub can_change_roles: bool,
    /// No-longer-with-firm marking.
    #[serde(rename = "canMarkNLWF")]
    pub can_mark_nlwf: bool,
    /// Password reset emails.
    pub can_send_password_reset: bool,
    /// Member suspension.
    pub can_suspend_user: bool,
    /// Profile edits.
    pub can_edit_user_profile: bool,
    /// Salary history reads.
    pub can_view_salary_history: bool,
    /// Salary change recording.
    pub can_manage_salary: bool,
    /// Pending invitation listing.
    pub can_view_invitations: bool,
    /// Invitation revocation.
    pub can_revoke_invitations: bool,
    /// Organization settings.
    pub can_manage_organization: bool,
    /// Viewer is internal staff.
    pub is_internal_user: bool,
    /// Viewer is a client member.
    pub is_client_user: bool,
}

impl CapabilitySet {
    /// Returns a set with every flag false.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns whether the capability is granted.
    #[must_use]
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::ViewUsers => self.can_view_users,
            Capability::ViewUserDetails => self.can_view_user_details,
            Capability::InviteUsers => self.can_invite_users,
            Capability::RemoveUsers => self.can_remove_users,
            Capability::ChangeRoles => self.can_change_roles,
            Capability::MarkNlwf => self.can_mark_nlwf,
            Capability::SendPasswordReset => self.can_send_password_reset,
            Capability::SuspendUser => self.can_suspend_user,
            Capability::EditUserProfile => self.can_edit_user_profile,
            Capability::ViewSalaryHistory => self.can_view_salary_history,
            Capability::ManageSalary => self.can_manage_salary,
            Capability::ViewInvitations => self.can_view_invitations,
            Capability::RevokeInvitations => self.can_revoke_invitations,
            Capability::ManageOrganization => self.can_manage_organization,
            Capability::IsInternalUser => self.is_internal_user,
            Capability::IsClientUser => self.is_client_user,
        }
    }

    /// Lists granted capabilities in [`Capability::all`] order.
    #[must_use]
    pub fn granted(&self) -> Vec<Capability> {
        Capability::all()
            .iter()
            .copied()
            .filter(|capability| self.allows(*capability))
            .collect()
    }

    fn platform_admin() -> Self {
        Self {
            can_view_users: true,
            can_view_user_details: true,
            can_invite_users: true,
            can_remove_users: true,
            can_change_roles: true,
            can_mark_nlwf: true,
            can_send_password_reset: true,
            can_suspend_user: true,
            can_edit_user_profile: true,
            can_view_salary_history: true,
            can_manage_salary: true,
            can_view_invitations: true,
            can_revoke_invitations: true,
            can_manage_organization: true,
            is_internal_user: true,
            is_client_user: false,
        }
    }

    fn internal_staff(is_hr: bool) -> Self {
        Self {
            can_view_users: true,
            can_view_user_details: true,
            can_invite_users: true,
            can_remove_users: is_hr,
            can_change_roles: is_hr,
            can_mark_nlwf: is_hr,
            can_send_password_reset: is_hr,
            can_suspend_user: is_hr,
            can_edit_user_profile: true,
            can_view_salary_history: true,
            can_manage_salary: true,
            can_view_invitations: true,
            can_revoke_invitations: true,
            can_manage_organization: true,
            is_internal_user: true,
            is_client_user: false,
        }
    }

    fn client_member(is_admin: bool, is_admin_or_hr: bool) -> Self {
        Self {
            can_view_users: true,
            can_view_user_details: true,
            can_invite_users: is_admin_or_hr,
            can_remove_users: is_admin,
            can_change_roles: is_admin,
            can_mark_nlwf: is_admin_or_hr,
            can_send_password_reset: is_admin_or_hr,
            can_suspend_user: is_admin,
            can_edit_user_profile: is_admin_or_hr,
            can_view_salary_history: is_admin_or_hr,
            can_manage_salary: is_admin_or_hr,
            can_view_invitations: is_admin_or_hr,
            can_revoke_invitations: is_admin,
            can_manage_organization: is_admin,
            is_internal_user: false,
            is_client_user: true,
        }
    }
}

/// Resolves capability flags for a viewer's roles against one organization.
///
/// Precedence is evaluated top to bottom and the first match wins:
/// platform admins, then internal staff, then client members of their own
/// organization. Anything else, such as a client viewing a foreign
/// organization, resolves to an empty set.
#[must_use]
pub fn resolve_permissions(roles: &[RoleTag], is_own_organization: bool) -> CapabilitySet {
    let holds = |tag: RoleTag| roles.contains(&tag);

    if roles
        .iter()
        .any(|role| matches!(role, RoleTag::SuperAdmin | RoleTag::SystemAdmin))
    {
        return CapabilitySet::platform_admin();
    }

    if roles.iter().any(|role| matches!(role, RoleTag::Internal(_))) {
        return CapabilitySet::internal_staff(holds(RoleTag::Internal(InternalRole::Hr)));
    }

    if is_own_organization && roles.iter().any(|role| matches!(role, RoleTag::Client(_))) {
        let is_admin = holds(RoleTag::Client(ClientRole::Admin));
        let is_admin_or_hr = is_admin || holds(RoleTag::Client(ClientRole::Hr));
        return CapabilitySet::client_member(is_admin, is_admin_or_hr);
    }

    CapabilitySet::none()
}

/// Resolves capability flags from stored role names. Unknown names are ignored.
#[must_use]
pub fn resolve_permissions_from_names<S: AsRef<str>>(
    role_names: &[S],
    is_own_organization: bool,
) -> CapabilitySet {
    resolve_permissions(&parse_role_tags(role_names), is_own_organization)
}
