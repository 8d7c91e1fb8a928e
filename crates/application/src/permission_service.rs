use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use staffdesk_core::{AppError, AppResult, OrganizationId};
use staffdesk_domain::{Capability, CapabilitySet, RoleTag, resolve_permissions};
use tracing::debug;

use crate::Actor;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CapabilityKey {
    roles: Vec<RoleTag>,
    is_own_organization: bool,
}

impl CapabilityKey {
    fn new(roles: &[RoleTag], is_own_organization: bool) -> Self {
        let mut roles = roles.to_vec();
        roles.sort_unstable();
        roles.dedup();
        Self {
            roles,
            is_own_organization,
        }
    }
}

/// Resolves capability sets for actors, memoized per role set and ownership.
///
/// Resolution is pure, so cached sets never go stale. The key space is bounded
/// by the number of distinct role combinations.
#[derive(Clone, Default)]
pub struct PermissionService {
    cache: Arc<RwLock<HashMap<CapabilityKey, CapabilitySet>>>,
}

impl PermissionService {
    /// Creates a service with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the capabilities the actor holds in `organization_id`.
    #[must_use]
    pub fn capabilities_for(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
    ) -> CapabilitySet {
        self.resolve(actor.roles(), actor.is_member_of(organization_id))
    }

    /// Ensures the actor holds `capability` in `organization_id`.
    pub fn require(
        &self,
        actor: &Actor,
        organization_id: OrganizationId,
        capability: Capability,
    ) -> AppResult<CapabilitySet> {
        let capabilities = self.capabilities_for(actor, organization_id);
        if capabilities.allows(capability) {
            return Ok(capabilities);
        }

        Err(AppError::Forbidden(format!(
            "user '{}' is missing capability '{}' in organization '{organization_id}'",
            actor.user_id(),
            capability.as_str()
        )))
    }

    /// Resolves a capability set for raw role tags.
    #[must_use]
    pub fn resolve(&self, roles: &[RoleTag], is_own_organization: bool) -> CapabilitySet {
        let key = CapabilityKey::new(roles, is_own_organization);

        if let Some(capabilities) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return *capabilities;
        }

        let capabilities = resolve_permissions(key.roles.as_slice(), is_own_organization);
        debug!(
            roles = ?key.roles,
            is_own_organization,
            granted = capabilities.granted().len(),
            "resolved capability set"
        );

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, capabilities);

        capabilities
    }

    #[cfg(test)]
    fn cached_entries(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use staffdesk_domain::{ClientRole, InternalRole, UserId};

    use super::*;

    fn actor(organization_id: OrganizationId, roles: Vec<RoleTag>) -> Actor {
        Actor::new(UserId::new(), organization_id, roles)
    }

    #[test]
    fn own_organization_uses_client_branch() {
        let service = PermissionService::new();
        let organization_id = OrganizationId::new();
        let admin = actor(organization_id, vec![RoleTag::Client(ClientRole::Admin)]);

        assert!(service.capabilities_for(&admin, organization_id).can_remove_users);
        assert_eq!(
            service.capabilities_for(&admin, OrganizationId::new()),
            CapabilitySet::none()
        );
    }

    #[test]
    fn require_reports_missing_capability() {
        let service = PermissionService::new();
        let organization_id = OrganizationId::new();
        let member = actor(organization_id, vec![RoleTag::Internal(InternalRole::Member)]);

        assert!(
            service
                .require(&member, organization_id, Capability::ViewUserDetails)
                .is_ok()
        );
        let denied = service.require(&member, organization_id, Capability::RemoveUsers);
        assert!(matches!(
            denied,
            Err(AppError::Forbidden(ref message)) if message.contains("canRemoveUsers")
        ));
    }

    #[test]
    fn equivalent_role_sets_share_a_cache_entry() {
        let service = PermissionService::new();
        let hr = RoleTag::Client(ClientRole::Hr);
        let employee = RoleTag::Client(ClientRole::Employee);

        let first = service.resolve(&[hr, employee], true);
        let second = service.resolve(&[employee, hr, employee], true);
        assert_eq!(first, second);
        assert_eq!(service.cached_entries(), 1);

        let _ = service.resolve(&[hr, employee], false);
        assert_eq!(service.cached_entries(), 2);
    }

    #[test]
    fn clones_share_the_cache() {
        let service = PermissionService::new();
        let clone = service.clone();
        let _ = clone.resolve(&[RoleTag::SuperAdmin], false);
        assert_eq!(service.cached_entries(), 1);
    }
}
