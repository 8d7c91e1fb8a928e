//! Domain entities and pure derivations for organization administration.

#![forbid(unsafe_code)]

mod capability;
mod directory;
mod invitation;
mod organization;
mod role;
mod salary;
mod user;

pub use capability::{
    Capability, CapabilitySet, resolve_permissions, resolve_permissions_from_names,
};
pub use directory::{
    DEFAULT_PAGE_SIZE, DirectoryQuery, DirectorySort, MAX_PAGE_SIZE, Page, Pagination,
    SortDirection,
};
pub use invitation::{Invitation, InvitationStatus, NewInvitation};
pub use organization::{Organization, OrganizationKind};
pub use role::{
    ClientRole, InternalRole, RoleNamespace, RoleTag, highest_client_role, highest_internal_role,
    parse_role_tags,
};
pub use salary::{
    CurrencyCode, NewSalaryRecord, SalaryRecord, TimelineItem, classify_timeline,
    current_salary, days_until_effective, scheduled_changes,
};
pub use user::{ConfirmationPhrase, EmailAddress, User, UserId, UserStatus};
