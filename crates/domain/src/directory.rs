use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::role::RoleTag;
use crate::user::{User, UserStatus};

/// Default page size for directory listings.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Largest page size a directory listing accepts.
pub const MAX_PAGE_SIZE: usize = 100;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

/// Column a directory listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectorySort {
    /// Last name, then first name.
    #[default]
    Name,
    /// Email address.
    Email,
    /// Lifecycle status.
    Status,
    /// Account creation time.
    CreatedAt,
}

/// Pagination metadata in the API's list envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// One-based page number.
    pub page: usize,
    /// Page size.
    pub limit: usize,
    /// Total matching items.
    pub total: usize,
    /// Number of pages; zero when nothing matched.
    pub total_pages: usize,
}

impl Pagination {
    /// Computes pagination metadata for `total` items.
    #[must_use]
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let limit = limit.max(1);
        Self {
            page: page.max(1),
            limit,
            total,
            total_pages: total.div_ceil(limit),
        }
    }
}

/// One page of items plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Pagination metadata.
    pub pagination: Pagination,
}

/// Client-side filter, sort and pagination over a loaded member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryQuery {
    /// Case-insensitive match on name or email.
    pub search: Option<String>,
    /// Only members with this status.
    pub status: Option<UserStatus>,
    /// Only members holding this role.
    pub role: Option<RoleTag>,
    /// Sort column.
    pub sort: DirectorySort,
    /// Sort direction.
    pub direction: SortDirection,
    /// One-based page number.
    pub page: usize,
    /// Page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub limit: usize,
}

impl Default for DirectoryQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            role: None,
            sort: DirectorySort::default(),
            direction: SortDirection::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DirectoryQuery {
    /// Filters, sorts and paginates `users`.
    #[must_use]
    pub fn apply(&self, users: &[User]) -> Page<User> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase);

        let mut matches: Vec<&User> = users
            .iter()
            .filter(|user| self.status.is_none_or(|status| user.status == status))
            .filter(|user| {
                self.role
                    .is_none_or(|role| user.role_tags().contains(&role))
            })
            .filter(|user| {
                needle
                    .as_deref()
                    .is_none_or(|needle| matches_search(user, needle))
            })
            .collect();

        matches.sort_by(|left, right| {
            let ordering = compare_by(self.sort, left, right);
            match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let pagination = Pagination::new(
            self.page,
            self.limit.clamp(1, MAX_PAGE_SIZE),
            matches.len(),
        );
        let start = (pagination.page - 1).saturating_mul(pagination.limit);
        let items = matches
            .into_iter()
            .skip(start)
            .take(pagination.limit)
            .cloned()
            .collect();

        Page { items, pagination }
    }
}

fn matches_search(user: &User, needle: &str) -> bool {
    user.full_name().to_lowercase().contains(needle) || user.email.to_lowercase().contains(needle)
}

fn compare_by(sort: DirectorySort, left: &User, right: &User) -> Ordering {
    match sort {
        DirectorySort::Name => left
            .last_name
            .to_lowercase()
            .cmp(&right.last_name.to_lowercase())
            .then_with(|| {
                left.first_name
                    .to_lowercase()
                    .cmp(&right.first_name.to_lowercase())
            }),
        DirectorySort::Email => left.email.to_lowercase().cmp(&right.email.to_lowercase()),
        DirectorySort::Status => left.status.as_str().cmp(right.status.as_str()),
        DirectorySort::CreatedAt => left.created_at.cmp(&right.created_at),
    }
}
