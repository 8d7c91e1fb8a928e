use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use staffdesk_core::AppError;

/// Organization type a role belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleNamespace {
    /// Platform-wide administrators. Not tied to an organization type.
    SuperAdmin,
    /// Staff of the operating firm.
    Internal,
    /// Members of a client organization.
    Client,
}

/// Roles held by internal staff, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InternalRole {
    /// Regular staff member.
    Member = 0,
    /// Recruiting staff.
    Recruiter = 1,
    /// Finance staff.
    Finance = 2,
    /// HR staff. Unlocks sensitive member actions.
    Hr = 3,
    /// Internal administrator.
    Admin = 4,
}

/// Roles held inside a client organization, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientRole {
    /// Regular employee of the client.
    Employee = 0,
    /// Client recruiter.
    Recruiter = 1,
    /// Client finance contact.
    Finance = 2,
    /// Client HR contact.
    Hr = 3,
    /// Client administrator.
    Admin = 4,
}

/// A role assignment tag, namespaced by organization type.
///
/// The API stores roles as flat strings such as `client_admin`; parsing them
/// into this enum keeps the namespace explicit instead of relying on prefix
/// matches at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum RoleTag {
    /// `super_admin`.
    SuperAdmin,
    /// `system_admin`.
    SystemAdmin,
    /// `internal_*`.
    Internal(InternalRole),
    /// `client_*`.
    Client(ClientRole),
}

const INTERNAL_PREFIX: &str = "internal_";
const CLIENT_PREFIX: &str = "client_";

impl RoleTag {
    /// Parses a stored role name, ignoring ASCII case and surrounding whitespace.
    ///
    /// Returns `None` for names that are not a known role. Unknown names carry
    /// no capabilities, including unknown names under a known prefix:
    /// `internal_intern` does not grant internal staff capabilities even though
    /// it starts with `internal_`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();

        match normalized.as_str() {
            "super_admin" => return Some(Self::SuperAdmin),
            "system_admin" => return Some(Self::SystemAdmin),
            _ => {}
        }

        if let Some(suffix) = normalized.strip_prefix(INTERNAL_PREFIX) {
            let role = match suffix {
                "admin" => InternalRole::Admin,
                "hr" => InternalRole::Hr,
                "finance" => InternalRole::Finance,
                "recruiter" => InternalRole::Recruiter,
                "member" => InternalRole::Member,
                _ => return None,
            };
            return Some(Self::Internal(role));
        }

        if let Some(suffix) = normalized.strip_prefix(CLIENT_PREFIX) {
            let role = match suffix {
                "admin" => ClientRole::Admin,
                "hr" => ClientRole::Hr,
                "finance" => ClientRole::Finance,
                "recruiter" => ClientRole::Recruiter,
                "employee" => ClientRole::Employee,
                _ => return None,
            };
            return Some(Self::Client(role));
        }

        None
    }

    /// Returns the canonical storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::SystemAdmin => "system_admin",
            Self::Internal(InternalRole::Admin) => "internal_admin",
            Self::Internal(InternalRole::Hr) => "internal_hr",
            Self::Internal(InternalRole::Finance) => "internal_finance",
            Self::Internal(InternalRole::Recruiter) => "internal_recruiter",
            Self::Internal(InternalRole::Member) => "internal_member",
            Self::Client(ClientRole::Admin) => "client_admin",
            Self::Client(ClientRole::Hr) => "client_hr",
            Self::Client(ClientRole::Finance) => "client_finance",
            Self::Client(ClientRole::Recruiter) => "client_recruiter",
            Self::Client(ClientRole::Employee) => "client_employee",
        }
    }

    /// Returns the namespace the role lives in.
    #[must_use]
    pub fn namespace(&self) -> RoleNamespace {
        match self {
            Self::SuperAdmin | Self::SystemAdmin => RoleNamespace::SuperAdmin,
            Self::Internal(_) => RoleNamespace::Internal,
            Self::Client(_) => RoleNamespace::Client,
        }
    }

    /// Returns a human-readable label for role badges.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::SystemAdmin => "System Admin",
            Self::Internal(InternalRole::Admin) => "Internal Admin",
            Self::Internal(InternalRole::Hr) => "Internal HR",
            Self::Internal(InternalRole::Finance) => "Internal Finance",
            Self::Internal(InternalRole::Recruiter) => "Internal Recruiter",
            Self::Internal(InternalRole::Member) => "Internal Member",
            Self::Client(ClientRole::Admin) => "Client Admin",
            Self::Client(ClientRole::Hr) => "Client HR",
            Self::Client(ClientRole::Finance) => "Client Finance",
            Self::Client(ClientRole::Recruiter) => "Client Recruiter",
            Self::Client(ClientRole::Employee) => "Client Employee",
        }
    }

    /// Display rank among internal-facing roles. Higher is more privileged.
    fn internal_rank(&self) -> Option<u8> {
        match self {
            Self::SuperAdmin => Some(u8::MAX),
            Self::SystemAdmin => Some(u8::MAX - 1),
            Self::Internal(role) => Some(*role as u8),
            Self::Client(_) => None,
        }
    }
}

impl Display for RoleTag {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for RoleTag {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| AppError::Validation(format!("unknown role '{value}'")))
    }
}

impl From<RoleTag> for String {
    fn from(value: RoleTag) -> Self {
        value.as_str().to_owned()
    }
}

impl TryFrom<String> for RoleTag {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(value.as_str())
    }
}

/// Parses stored role names, dropping names that are not known roles.
#[must_use]
pub fn parse_role_tags<S: AsRef<str>>(names: &[S]) -> Vec<RoleTag> {
    names
        .iter()
        .filter_map(|name| RoleTag::parse(name.as_ref()))
        .collect()
}

/// Picks the client role to display for a member.
///
/// Falls back to [`ClientRole::Employee`] when no client role is held.
#[must_use]
pub fn highest_client_role(roles: &[RoleTag]) -> ClientRole {
    roles
        .iter()
        .filter_map(|role| match role {
            RoleTag::Client(client_role) => Some(*client_role),
            _ => None,
        })
        .max()
        .unwrap_or(ClientRole::Employee)
}

/// Picks the internal-facing role to display for a staff member.
///
/// `super_admin` always wins. Falls back to `internal_member` when no
/// internal-facing role is held.
#[must_use]
pub fn highest_internal_role(roles: &[RoleTag]) -> RoleTag {
    roles
        .iter()
        .filter_map(|role| role.internal_rank().map(|rank| (rank, *role)))
        .max_by_key(|(rank, _)| *rank)
        .map(|(_, role)| role)
        .unwrap_or(RoleTag::Internal(InternalRole::Member))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_case_and_whitespace() {
        assert_eq!(
            RoleTag::parse(" Client_Admin "),
            Some(RoleTag::Client(ClientRole::Admin))
        );
        assert_eq!(RoleTag::parse("SUPER_ADMIN"), Some(RoleTag::SuperAdmin));
        assert_eq!(
            RoleTag::parse("internal_HR"),
            Some(RoleTag::Internal(InternalRole::Hr))
        );
    }

    #[test]
    fn unknown_names_do_not_parse() {
        assert_eq!(RoleTag::parse("internal_intern"), None);
        assert_eq!(RoleTag::parse("clientadmin"), None);
        assert_eq!(RoleTag::parse("admin_client"), None);
        assert_eq!(RoleTag::parse(""), None);
        assert!(RoleTag::from_str("owner").is_err());
    }

    #[test]
    fn storage_value_roundtrip() {
        let tag = RoleTag::Internal(InternalRole::Recruiter);
        assert_eq!(tag.as_str(), "internal_recruiter");
        assert_eq!(RoleTag::parse(tag.as_str()), Some(tag));
    }

    #[test]
    fn serializes_as_storage_string() {
        let json = serde_json::to_string(&RoleTag::Client(ClientRole::Hr)).unwrap_or_default();
        assert_eq!(json, "\"client_hr\"");

        let parsed = serde_json::from_str::<RoleTag>("\"System_Admin\"");
        assert!(matches!(parsed, Ok(RoleTag::SystemAdmin)));
        assert!(serde_json::from_str::<RoleTag>("\"nobody\"").is_err());
    }

    #[test]
    fn namespace_follows_variant() {
        assert_eq!(RoleTag::SystemAdmin.namespace(), RoleNamespace::SuperAdmin);
        assert_eq!(
            RoleTag::Internal(InternalRole::Member).namespace(),
            RoleNamespace::Internal
        );
        assert_eq!(
            RoleTag::Client(ClientRole::Finance).namespace(),
            RoleNamespace::Client
        );
    }

    #[test]
    fn parse_role_tags_drops_unknown_names() {
        let tags = parse_role_tags(&["client_hr", "wizard", "internal_member"]);
        assert_eq!(
            tags,
            vec![
                RoleTag::Client(ClientRole::Hr),
                RoleTag::Internal(InternalRole::Member)
            ]
        );
    }

    #[test]
    fn highest_client_role_uses_priority_order() {
        let roles = parse_role_tags(&["client_employee", "client_finance", "client_hr"]);
        assert_eq!(highest_client_role(&roles), ClientRole::Hr);

        let roles = parse_role_tags(&["client_recruiter", "client_admin"]);
        assert_eq!(highest_client_role(&roles), ClientRole::Admin);
    }

    #[test]
    fn highest_client_role_defaults_to_employee() {
        let roles = parse_role_tags(&["internal_admin", "super_admin"]);
        assert_eq!(highest_client_role(&roles), ClientRole::Employee);
        assert_eq!(highest_client_role(&[]), ClientRole::Employee);
    }

    #[test]
    fn super_admin_outranks_internal_roles() {
        let roles = parse_role_tags(&["internal_admin", "super_admin", "system_admin"]);
        assert_eq!(highest_internal_role(&roles), RoleTag::SuperAdmin);

        let roles = parse_role_tags(&["internal_finance", "internal_hr", "client_admin"]);
        assert_eq!(
            highest_internal_role(&roles),
            RoleTag::Internal(InternalRole::Hr)
        );
    }

    #[test]
    fn highest_internal_role_defaults_to_member() {
        let roles = parse_role_tags(&["client_admin"]);
        assert_eq!(
            highest_internal_role(&roles),
            RoleTag::Internal(InternalRole::Member)
        );
    }

    #[test]
    fn display_names_are_human_readable() {
        assert_eq!(RoleTag::Client(ClientRole::Hr).display_name(), "Client HR");
        assert_eq!(RoleTag::SuperAdmin.to_string(), "super_admin");
    }
}
