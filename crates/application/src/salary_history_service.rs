use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use staffdesk_core::AppResult;
use staffdesk_domain::{
    Capability, NewSalaryRecord, SalaryRecord, TimelineItem, User, UserId, classify_timeline,
    current_salary, days_until_effective, scheduled_changes,
};

use crate::{Actor, Clock, MemberDirectoryApi, PermissionService, SalaryHistoryApi};

/// Upcoming salary change with its countdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledSalaryChange {
    /// Future-dated record.
    pub record: SalaryRecord,
    /// Whole days until the record takes effect, rounded up.
    pub days_until_effective: i64,
}

/// Classified salary history for one member.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryTimeline {
    /// Instant the timeline was classified against.
    pub as_of: DateTime<Utc>,
    /// Currently active record, if any.
    pub current: Option<SalaryRecord>,
    /// Records ordered newest effective date first.
    pub items: Vec<TimelineItem>,
}

/// Application service for salary history views and salary changes.
#[derive(Clone)]
pub struct SalaryHistoryService {
    permission_service: PermissionService,
    directory: Arc<dyn MemberDirectoryApi>,
    salary_history: Arc<dyn SalaryHistoryApi>,
    clock: Arc<dyn Clock>,
}

impl SalaryHistoryService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        permission_service: PermissionService,
        directory: Arc<dyn MemberDirectoryApi>,
        salary_history: Arc<dyn SalaryHistoryApi>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            permission_service,
            directory,
            salary_history,
            clock,
        }
    }

    /// Returns the member's classified salary timeline.
    pub async fn timeline(&self, actor: &Actor, user_id: UserId) -> AppResult<SalaryTimeline> {
        self.authorize(actor, user_id, Capability::ViewSalaryHistory)
            .await?;

        let records = self.salary_history.list_salary_history(user_id).await?;
        let as_of = self.clock.now();

        Ok(SalaryTimeline {
            as_of,
            current: current_salary(&records, as_of).cloned(),
            items: classify_timeline(&records, as_of),
        })
    }

    /// Lists the member's future-dated changes, soonest first.
    pub async fn scheduled_changes(
        &self,
        actor: &Actor,
        user_id: UserId,
    ) -> AppResult<Vec<ScheduledSalaryChange>> {
        self.authorize(actor, user_id, Capability::ViewSalaryHistory)
            .await?;

        let records = self.salary_history.list_salary_history(user_id).await?;
        let as_of = self.clock.now();

        Ok(scheduled_changes(&records, as_of)
            .into_iter()
            .map(|record| ScheduledSalaryChange {
                record: record.clone(),
                days_until_effective: days_until_effective(record.effective_date, as_of),
            })
            .collect())
    }

    /// Records a salary change for the member.
    pub async fn record_change(
        &self,
        actor: &Actor,
        input: NewSalaryRecord,
    ) -> AppResult<SalaryRecord> {
        self.authorize(actor, input.user_id(), Capability::ManageSalary)
            .await?;

        let record = self.salary_history.create_salary_record(&input).await?;
        info!(
            actor_id = %actor.user_id(),
            user_id = %record.user_id,
            currency = record.currency.as_str(),
            effective_date = %record.effective_date,
            "recorded salary change"
        );
        Ok(record)
    }

    async fn authorize(
        &self,
        actor: &Actor,
        user_id: UserId,
        capability: Capability,
    ) -> AppResult<User> {
        let member = self.directory.get_user(user_id).await?;
        self.permission_service
            .require(actor, member.organization_id, capability)?;
        Ok(member)
    }
}
