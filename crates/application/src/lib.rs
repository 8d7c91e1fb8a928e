//! Application services and ports.

#![forbid(unsafe_code)]

mod actor;
mod admin_ports;
mod invitation_service;
mod member_admin_service;
mod permission_service;
mod salary_history_service;

#[cfg(test)]
mod test_support;

pub use actor::Actor;
pub use admin_ports::{Clock, InvitationApi, MemberDirectoryApi, SalaryHistoryApi, UserListQuery};
pub use invitation_service::InvitationService;
pub use member_admin_service::MemberAdminService;
pub use permission_service::PermissionService;
pub use salary_history_service::{SalaryHistoryService, SalaryTimeline, ScheduledSalaryChange};
