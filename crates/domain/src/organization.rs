use std::str::FromStr;

use serde::{Deserialize, Serialize};
use staffdesk_core::{AppError, OrganizationId};

use crate::role::{RoleNamespace, RoleTag};

/// Kind of organization, which decides the role namespace of its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationKind {
    /// The operating firm itself.
    Internal,
    /// A client of the firm.
    Client,
}

impl OrganizationKind {
    /// Returns the storage string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Client => "client",
        }
    }

    /// Returns whether members of this kind of organization may hold the role.
    ///
    /// Platform admin roles belong to the internal organization.
    #[must_use]
    pub fn accepts_role(&self, role: RoleTag) -> bool {
        match (self, role.namespace()) {
            (Self::Internal, RoleNamespace::Internal | RoleNamespace::SuperAdmin) => true,
            (Self::Client, RoleNamespace::Client) => true,
            _ => false,
        }
    }
}

impl FromStr for OrganizationKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "internal" => Ok(Self::Internal),
            "client" => Ok(Self::Client),
            _ => Err(AppError::Validation(format!(
                "unknown organization kind '{value}'"
            ))),
        }
    }
}

/// Organization summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Stable organization identifier.
    pub id: OrganizationId,
    /// Display name.
    pub name: String,
    /// Internal firm or client.
    pub kind: OrganizationKind,
}
