use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Mutex;

use staffdesk_core::{AppError, AppResult, OrganizationId};
use staffdesk_domain::{
    ClientRole, CurrencyCode, InternalRole, Invitation, InvitationStatus, NewInvitation,
    NewSalaryRecord, Organization, OrganizationKind, Page, Pagination, RoleTag, SalaryRecord, User,
    UserId, UserStatus,
};

use crate::{Clock, InvitationApi, MemberDirectoryApi, SalaryHistoryApi, UserListQuery};

#[derive(Default)]
pub(crate) struct FakeAdminApi {
    pub(crate) users: Mutex<Vec<User>>,
    pub(crate) organizations: Mutex<Vec<Organization>>,
    pub(crate) salary_records: Mutex<Vec<SalaryRecord>>,
    pub(crate) invitations: Mutex<Vec<Invitation>>,
    pub(crate) mutations: Mutex<Vec<String>>,
    pub(crate) page_requests: Mutex<Vec<UserListQuery>>,
}

impl FakeAdminApi {
    pub(crate) async fn with_organization(&self, organization: Organization) {
        self.organizations.lock().await.push(organization);
    }

    pub(crate) async fn with_user(&self, user: User) {
        self.users.lock().await.push(user);
    }

    pub(crate) async fn mutation_log(&self) -> Vec<String> {
        self.mutations.lock().await.clone()
    }

    async fn record_mutation(&self, entry: String) {
        self.mutations.lock().await.push(entry);
    }

    async fn update_user<F>(&self, user_id: UserId, update: F) -> AppResult<User>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.lock().await;
        let user = users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}'")))?;
        update(user);
        Ok(user.clone())
    }
}

#[async_trait]
impl MemberDirectoryApi for FakeAdminApi {
    async fn list_users(&self, query: UserListQuery) -> AppResult<Page<User>> {
        self.page_requests.lock().await.push(query);

        let members: Vec<User> = self
            .users
            .lock()
            .await
            .iter()
            .filter(|user| user.organization_id == query.organization_id)
            .cloned()
            .collect();
        let pagination = Pagination::new(query.page, query.limit, members.len());
        let items = members
            .into_iter()
            .skip((pagination.page - 1) * pagination.limit)
            .take(pagination.limit)
            .collect();

        Ok(Page { items, pagination })
    }

    async fn get_user(&self, user_id: UserId) -> AppResult<User> {
        self.users
            .lock()
            .await
            .iter()
            .find(|user| user.id == user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}'")))
    }

    async fn get_organization(&self, organization_id: OrganizationId) -> AppResult<Organization> {
        self.organizations
            .lock()
            .await
            .iter()
            .find(|organization| organization.id == organization_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("organization '{organization_id}'")))
    }

    async fn list_roles(&self) -> AppResult<Vec<RoleTag>> {
        Ok(vec![
            RoleTag::SuperAdmin,
            RoleTag::Internal(InternalRole::Hr),
            RoleTag::Client(ClientRole::Admin),
            RoleTag::Client(ClientRole::Employee),
        ])
    }

    async fn change_user_roles(&self, user_id: UserId, roles: &[RoleTag]) -> AppResult<User> {
        self.record_mutation(format!("change_roles:{user_id}")).await;
        self.update_user(user_id, |user| {
            user.roles = roles.iter().map(|role| role.as_str().to_owned()).collect();
        })
        .await
    }

    async fn update_user_status(&self, user_id: UserId, status: UserStatus) -> AppResult<User> {
        self.record_mutation(format!("status:{user_id}:{}", status.as_str()))
            .await;
        self.update_user(user_id, |user| user.status = status).await
    }

    async fn remove_user_from_organization(
        &self,
        organization_id: OrganizationId,
        user_id: UserId,
    ) -> AppResult<()> {
        self.record_mutation(format!("remove:{organization_id}:{user_id}"))
            .await;
        self.users.lock().await.retain(|user| user.id != user_id);
        Ok(())
    }

    async fn send_password_reset(&self, user_id: UserId) -> AppResult<()> {
        self.record_mutation(format!("password_reset:{user_id}"))
            .await;
        Ok(())
    }
}

#[async_trait]
impl SalaryHistoryApi for FakeAdminApi {
    async fn list_salary_history(&self, user_id: UserId) -> AppResult<Vec<SalaryRecord>> {
        Ok(self
            .salary_records
            .lock()
            .await
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_salary_record(&self, input: &NewSalaryRecord) -> AppResult<SalaryRecord> {
        self.record_mutation(format!("salary:{}", input.user_id()))
            .await;
        let mut records = self.salary_records.lock().await;
        let record = SalaryRecord {
            id: format!("salary-{}", records.len() + 1),
            user_id: input.user_id(),
            amount: input.amount(),
            currency: input.currency().clone(),
            effective_date: input.effective_date(),
            reason: input.reason().to_owned(),
            changed_by: Some("fake".to_owned()),
        };
        records.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl InvitationApi for FakeAdminApi {
    async fn list_invitations(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<Invitation>> {
        Ok(self
            .invitations
            .lock()
            .await
            .iter()
            .filter(|invitation| invitation.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn create_invitation(&self, input: &NewInvitation) -> AppResult<Invitation> {
        self.record_mutation(format!("invite:{}", input.email().as_str()))
            .await;
        let mut invitations = self.invitations.lock().await;
        let invitation = Invitation {
            id: format!("inv-{}", invitations.len() + 1),
            email: input.email().as_str().to_owned(),
            organization_id: input.organization_id(),
            role: input.role().as_str().to_owned(),
            status: InvitationStatus::Pending,
            expires_at: fixed_now() + chrono::Duration::days(7),
            invited_by: None,
        };
        invitations.push(invitation.clone());
        Ok(invitation)
    }

    async fn revoke_invitation(&self, invitation_id: &str) -> AppResult<Invitation> {
        self.record_mutation(format!("revoke:{invitation_id}"))
            .await;
        let mut invitations = self.invitations.lock().await;
        let invitation = invitations
            .iter_mut()
            .find(|invitation| invitation.id == invitation_id)
            .ok_or_else(|| AppError::NotFound(format!("invitation '{invitation_id}'")))?;
        invitation.status = InvitationStatus::Revoked;
        Ok(invitation.clone())
    }
}

pub(crate) struct FixedClock(pub(crate) DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid fixed clock"))
}

pub(crate) fn organization(name: &str, kind: OrganizationKind) -> Organization {
    Organization {
        id: OrganizationId::new(),
        name: name.to_owned(),
        kind,
    }
}

pub(crate) fn member(organization_id: OrganizationId, first_name: &str, roles: &[&str]) -> User {
    User {
        id: UserId::new(),
        email: format!("{}@example.com", first_name.to_lowercase()),
        first_name: first_name.to_owned(),
        last_name: "Tester".to_owned(),
        status: UserStatus::Active,
        organization_id,
        roles: roles.iter().map(|role| (*role).to_owned()).collect(),
        created_at: fixed_now(),
    }
}

pub(crate) fn usd() -> CurrencyCode {
    CurrencyCode::new("USD").unwrap_or_else(|_| panic!("test currency"))
}
