use std::sync::Arc;

use reqwest::StatusCode;

use staffdesk_application::MemberDirectoryApi;
use staffdesk_core::{AppError, OrganizationId};
use staffdesk_domain::{
    ClientRole, Invitation, InvitationStatus, NewInvitation, Organization, OrganizationKind, Page,
    Pagination, RoleTag, SalaryRecord, User, UserId, UserStatus,
};

use super::dto::{ChangeRolesRequest, CreateInvitationRequest, RoleResponse, known_roles};
use super::{HttpAdminApi, error_for_status, next_page};
use crate::StaticAuthTokenProvider;

fn api(base_url: &str) -> HttpAdminApi {
    let provider = StaticAuthTokenProvider::new("token")
        .unwrap_or_else(|error| panic!("provider rejected token: {error}"));
    HttpAdminApi::with_client(reqwest::Client::new(), base_url, Arc::new(provider))
        .unwrap_or_else(|error| panic!("adapter rejected base URL: {error}"))
}

#[test]
fn endpoint_nests_under_base_path() {
    let api = api("https://admin.example.com/api/");
    let url = api
        .endpoint(&["users", "42", "roles"])
        .unwrap_or_else(|error| panic!("endpoint failed: {error}"));

    assert_eq!(url.as_str(), "https://admin.example.com/api/v1/users/42/roles");
}

#[test]
fn endpoint_escapes_path_segments() {
    let api = api("http://127.0.0.1:8080");
    let url = api
        .endpoint(&["invitations", "a/b c", "revoke"])
        .unwrap_or_else(|error| panic!("endpoint failed: {error}"));

    assert_eq!(url.path(), "/v1/invitations/a%2Fb%20c/revoke");
}

#[test]
fn base_url_must_be_http() {
    let provider = Arc::new(
        StaticAuthTokenProvider::new("token")
            .unwrap_or_else(|error| panic!("provider rejected token: {error}")),
    );

    let ftp = HttpAdminApi::with_client(
        reqwest::Client::new(),
        "ftp://files.example.com",
        provider.clone(),
    );
    assert!(matches!(ftp, Err(AppError::Validation(_))));

    let garbage = HttpAdminApi::with_client(reqwest::Client::new(), "not a url", provider);
    assert!(matches!(garbage, Err(AppError::Validation(_))));
}

#[test]
fn status_codes_map_to_error_categories() {
    let body = r#"{"message":"nope"}"#;
    let cases = [
        (StatusCode::BAD_REQUEST, "validation"),
        (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
        (StatusCode::UNAUTHORIZED, "unauthorized"),
        (StatusCode::FORBIDDEN, "forbidden"),
        (StatusCode::NOT_FOUND, "not_found"),
        (StatusCode::CONFLICT, "conflict"),
        (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        (StatusCode::TOO_MANY_REQUESTS, "internal"),
    ];

    for (status, expected) in cases {
        let category = match error_for_status(status, body) {
            AppError::Validation(_) => "validation",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Internal(_) => "internal",
        };
        assert_eq!(category, expected, "status {status}");
    }
}

#[test]
fn server_message_is_preserved() {
    let error = error_for_status(
        StatusCode::CONFLICT,
        r#"{"message":"  invitation already pending  ","code":"duplicate"}"#,
    );

    assert_eq!(error.message(), "invitation already pending");
}

#[test]
fn missing_or_blank_message_falls_back_to_generic_text() {
    let html = error_for_status(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
    assert_eq!(html.message(), "admin API returned status 502");

    let blank = error_for_status(StatusCode::NOT_FOUND, r#"{"message":"   "}"#);
    assert_eq!(blank.message(), "admin API resource not found");
}

#[test]
fn unknown_role_names_are_skipped() {
    let roles = vec![
        RoleResponse {
            name: "client_admin".to_owned(),
        },
        RoleResponse {
            name: "client_intern".to_owned(),
        },
        RoleResponse {
            name: "SUPER_ADMIN".to_owned(),
        },
    ];

    assert_eq!(
        known_roles(roles),
        vec![RoleTag::Client(ClientRole::Admin), RoleTag::SuperAdmin]
    );
}

#[test]
fn request_bodies_use_storage_role_names() {
    let roles = [RoleTag::Client(ClientRole::Hr), RoleTag::SystemAdmin];
    let value = serde_json::to_value(ChangeRolesRequest::new(&roles)).unwrap_or_default();
    assert_eq!(value, serde_json::json!({ "roles": ["client_hr", "system_admin"] }));

    let organization = Organization {
        id: OrganizationId::new(),
        name: "Acme".to_owned(),
        kind: OrganizationKind::Client,
    };
    let invitation = NewInvitation::new(
        "new.hire@example.com",
        &organization,
        RoleTag::Client(ClientRole::Employee),
    )
    .unwrap_or_else(|error| panic!("invalid invitation: {error}"));
    let value =
        serde_json::to_value(CreateInvitationRequest::from(&invitation)).unwrap_or_default();

    assert_eq!(value["role"], "client_employee");
    assert_eq!(value["organizationId"], organization.id.to_string());
}

#[test]
fn user_payload_decodes_from_wire_format() {
    let user_id = UserId::new();
    let organization_id = OrganizationId::new();
    let payload = serde_json::json!({
        "id": user_id.to_string(),
        "email": "ada@example.com",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "status": "nlwf",
        "organizationId": organization_id.to_string(),
        "roles": ["client_hr", "legacy_role"],
        "createdAt": "2024-03-01T09:30:00Z"
    });

    let user: User = serde_json::from_value(payload)
        .unwrap_or_else(|error| panic!("user payload rejected: {error}"));

    assert_eq!(user.id, user_id);
    assert_eq!(user.status, UserStatus::Nlwf);
    assert_eq!(user.role_tags(), vec![RoleTag::Client(ClientRole::Hr)]);
}

#[test]
fn salary_history_page_decodes_from_wire_format() {
    let user_id = UserId::new();
    let payload = serde_json::json!({
        "items": [
            {
                "id": "sal-1",
                "userId": user_id.to_string(),
                "amount": 85000.0,
                "currency": "usd",
                "effectiveDate": "2024-01-01T00:00:00Z",
                "reason": "Annual review",
                "changedBy": "Grace Hopper"
            }
        ],
        "pagination": { "page": 1, "limit": 100, "total": 1, "totalPages": 1 }
    });

    let page: Page<SalaryRecord> = serde_json::from_value(payload)
        .unwrap_or_else(|error| panic!("salary page rejected: {error}"));

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].user_id, user_id);
    assert_eq!(page.items[0].currency.as_str(), "USD");
    assert_eq!(page.pagination.total_pages, 1);
}

#[test]
fn invitation_page_decodes_with_unknown_roles() {
    let organization_id = OrganizationId::new();
    let payload = serde_json::json!({
        "items": [
            {
                "id": "inv-1",
                "email": "hire@example.com",
                "organizationId": organization_id.to_string(),
                "role": "client_employee",
                "status": "pending",
                "expiresAt": "2024-07-08T12:00:00Z",
                "invitedBy": null
            },
            {
                "id": "inv-2",
                "email": "manager@example.com",
                "organizationId": organization_id.to_string(),
                "role": "internal_account_manager",
                "status": "accepted",
                "expiresAt": "2024-07-08T12:00:00Z",
                "invitedBy": "Grace Hopper"
            }
        ],
        "pagination": { "page": 2, "limit": 2, "total": 4, "totalPages": 2 }
    });

    let page: Page<Invitation> = serde_json::from_value(payload)
        .unwrap_or_else(|error| panic!("invitation page rejected: {error}"));

    assert_eq!(page.items.len(), 2);
    assert_eq!(
        page.items[0].role_tag(),
        Some(RoleTag::Client(ClientRole::Employee))
    );
    assert_eq!(page.items[1].role_tag(), None);
    assert_eq!(page.items[1].status, InvitationStatus::Accepted);
    assert_eq!(page.pagination.page, 2);
}

#[test]
fn paging_stops_at_the_last_or_an_empty_page() {
    let three_pages = Pagination::new(1, 100, 250);
    assert_eq!(next_page(1, 100, &three_pages), Some(2));
    assert_eq!(next_page(2, 100, &three_pages), Some(3));
    assert_eq!(next_page(3, 50, &three_pages), None);
    assert_eq!(next_page(1, 0, &three_pages), None);

    let empty = Pagination::new(1, 100, 0);
    assert_eq!(next_page(1, 0, &empty), None);
}

#[tokio::test]
async fn transport_failure_is_internal() {
    let api = api("http://127.0.0.1:1");

    let result = api.get_user(UserId::new()).await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}
