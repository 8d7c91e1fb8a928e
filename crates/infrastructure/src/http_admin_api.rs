use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use staffdesk_application::{InvitationApi, MemberDirectoryApi, SalaryHistoryApi, UserListQuery};
use staffdesk_core::{AppError, AppResult, OrganizationId};
use staffdesk_domain::{
    Invitation, MAX_PAGE_SIZE, NewInvitation, NewSalaryRecord, Organization, Page, Pagination,
    RoleTag, SalaryRecord, User, UserId, UserStatus,
};

use crate::AuthTokenProvider;

mod dto;

use dto::{
    ApiErrorBody, ChangeRolesRequest, CreateInvitationRequest, CreateSalaryRecordRequest,
    RoleResponse, UpdateStatusRequest, known_roles,
};

/// Admin API adapter speaking the `/v1` REST contract over HTTP.
///
/// Requests are never retried. Non-success responses become `AppError`
/// values carrying the server's `message` when one is present.
#[derive(Clone)]
pub struct HttpAdminApi {
    http_client: reqwest::Client,
    base_url: Url,
    token_provider: Arc<dyn AuthTokenProvider>,
}

impl HttpAdminApi {
    /// Creates an adapter with its own HTTP client.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        token_provider: Arc<dyn AuthTokenProvider>,
    ) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

        Self::with_client(http_client, base_url, token_provider)
    }

    /// Creates an adapter around an existing HTTP client.
    pub fn with_client(
        http_client: reqwest::Client,
        base_url: &str,
        token_provider: Arc<dyn AuthTokenProvider>,
    ) -> AppResult<Self> {
        Ok(Self {
            http_client,
            base_url: parse_base_url(base_url)?,
            token_provider,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!(
                    "admin API base URL '{}' cannot be a base",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> AppResult<Response> {
        let token = self.token_provider.bearer_token().await?;
        let operation = format!("{method} {}", url.path());

        let mut request: RequestBuilder = self
            .http_client
            .request(method, url)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|error| {
            AppError::Internal(format!("failed to call admin API {operation}: {error}"))
        })?;

        let status = response.status();
        debug!(operation = %operation, status = status.as_u16(), "admin API responded");
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_owned());
        warn!(
            operation = %operation,
            status = status.as_u16(),
            "admin API request failed"
        );
        Err(error_for_status(status, body.as_str()))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> AppResult<T> {
        let path = url.path().to_owned();
        self.execute(method, url, body)
            .await?
            .json::<T>()
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to parse admin API response body for '{path}': {error}"
                ))
            })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> AppResult<T> {
        self.fetch(Method::GET, url, None).await
    }

    /// Collects every page of a list endpoint filtered by `filter`.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        resource: &str,
        filter: (&str, &str),
    ) -> AppResult<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let mut url = self.endpoint(&[resource])?;
            url.query_pairs_mut()
                .append_pair(filter.0, filter.1)
                .append_pair("page", &page.to_string())
                .append_pair("limit", &MAX_PAGE_SIZE.to_string());

            let response: Page<T> = self.get(url).await?;
            let fetched = response.items.len();
            items.extend(response.items);

            match next_page(page, fetched, &response.pagination) {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl MemberDirectoryApi for HttpAdminApi {
    async fn list_users(&self, query: UserListQuery) -> AppResult<Page<User>> {
        let mut url = self.endpoint(&["users"])?;
        url.query_pairs_mut()
            .append_pair("organizationId", &query.organization_id.to_string())
            .append_pair("page", &query.page.to_string())
            .append_pair("limit", &query.limit.to_string());

        self.get(url).await
    }

    async fn get_user(&self, user_id: UserId) -> AppResult<User> {
        self.get(self.endpoint(&["users", &user_id.to_string()])?)
            .await
    }

    async fn get_organization(&self, organization_id: OrganizationId) -> AppResult<Organization> {
        self.get(self.endpoint(&["organizations", &organization_id.to_string()])?)
            .await
    }

    async fn list_roles(&self) -> AppResult<Vec<RoleTag>> {
        let roles: Vec<RoleResponse> = self.get(self.endpoint(&["roles"])?).await?;
        Ok(known_roles(roles))
    }

    async fn change_user_roles(&self, user_id: UserId, roles: &[RoleTag]) -> AppResult<User> {
        let url = self.endpoint(&["users", &user_id.to_string(), "roles"])?;
        self.fetch(Method::PUT, url, Some(to_json(&ChangeRolesRequest::new(roles))?))
            .await
    }

    async fn update_user_status(&self, user_id: UserId, status: UserStatus) -> AppResult<User> {
        let url = self.endpoint(&["users", &user_id.to_string(), "status"])?;
        self.fetch(Method::PATCH, url, Some(to_json(&UpdateStatusRequest { status })?))
            .await
    }

    async fn remove_user_from_organization(
        &self,
        organization_id: OrganizationId,
        user_id: UserId,
    ) -> AppResult<()> {
        let url = self.endpoint(&[
            "organizations",
            &organization_id.to_string(),
            "members",
            &user_id.to_string(),
        ])?;
        self.execute(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn send_password_reset(&self, user_id: UserId) -> AppResult<()> {
        let url = self.endpoint(&["users", &user_id.to_string(), "password-reset"])?;
        self.execute(Method::POST, url, None).await?;
        Ok(())
    }
}

#[async_trait]
impl SalaryHistoryApi for HttpAdminApi {
    async fn list_salary_history(&self, user_id: UserId) -> AppResult<Vec<SalaryRecord>> {
        self.get_all_pages("salary-history", ("userId", &user_id.to_string()))
            .await
    }

    async fn create_salary_record(&self, input: &NewSalaryRecord) -> AppResult<SalaryRecord> {
        let body = CreateSalaryRecordRequest {
            user_id: input.user_id(),
            amount: input.amount(),
            currency: input.currency().as_str(),
            effective_date: input.effective_date(),
            reason: input.reason(),
        };
        let url = self.endpoint(&["salary-history"])?;
        self.fetch(Method::POST, url, Some(to_json(&body)?)).await
    }
}

#[async_trait]
impl InvitationApi for HttpAdminApi {
    async fn list_invitations(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Vec<Invitation>> {
        self.get_all_pages(
            "invitations",
            ("organizationId", &organization_id.to_string()),
        )
        .await
    }

    async fn create_invitation(&self, input: &NewInvitation) -> AppResult<Invitation> {
        let url = self.endpoint(&["invitations"])?;
        let body = to_json(&CreateInvitationRequest::from(input))?;
        self.fetch(Method::POST, url, Some(body)).await
    }

    async fn revoke_invitation(&self, invitation_id: &str) -> AppResult<Invitation> {
        let url = self.endpoint(&["invitations", invitation_id, "revoke"])?;
        self.fetch(Method::POST, url, None).await
    }
}

fn parse_base_url(value: &str) -> AppResult<Url> {
    let url = Url::parse(value.trim()).map_err(|error| {
        AppError::Validation(format!("invalid admin API base URL '{value}': {error}"))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Validation(format!(
            "admin API base URL '{value}' must use http or https"
        )));
    }

    Ok(url)
}

/// Returns the page to request after `requested`, or `None` once the list is exhausted.
fn next_page(requested: usize, fetched: usize, pagination: &Pagination) -> Option<usize> {
    if fetched == 0 || requested >= pagination.total_pages {
        return None;
    }

    Some(requested + 1)
}

fn to_json<T: serde::Serialize>(body: &T) -> AppResult<serde_json::Value> {
    serde_json::to_value(body)
        .map_err(|error| AppError::Internal(format!("failed to encode request body: {error}")))
}

/// Maps a non-success status to an application error.
fn error_for_status(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .unwrap_or_default()
        .message
        .map(|message| message.trim().to_owned())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| fallback_message(status));

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Internal(message),
    }
}

fn fallback_message(status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED => "admin API rejected the access token".to_owned(),
        StatusCode::FORBIDDEN => "admin API denied access".to_owned(),
        StatusCode::NOT_FOUND => "admin API resource not found".to_owned(),
        _ => format!("admin API returned status {}", status.as_u16()),
    }
}

#[cfg(test)]
mod tests;
