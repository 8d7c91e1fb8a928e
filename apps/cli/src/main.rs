//! Staffdesk admin command-line client.

#![forbid(unsafe_code)]

mod config;

use std::process::ExitCode;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use staffdesk_application::{
    Actor, InvitationService, MemberAdminService, MemberDirectoryApi, PermissionService,
    SalaryHistoryService,
};
use staffdesk_core::{AppError, AppResult, OrganizationId};
use staffdesk_domain::{
    CapabilitySet, DEFAULT_PAGE_SIZE, DirectoryQuery, DirectorySort, RoleNamespace, RoleTag,
    SalaryRecord, SortDirection, TimelineItem, UserId, UserStatus, highest_client_role,
    highest_internal_role,
};
use staffdesk_infrastructure::{HttpAdminApi, StaticAuthTokenProvider, SystemClock};

use crate::config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "staffdesk")]
#[command(about = "Organization directory, permissions and salary history client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the capabilities a user holds in an organization
    Permissions {
        /// User whose roles are resolved
        user_id: UserId,
        /// Organization the capabilities apply to
        organization_id: OrganizationId,
    },
    /// Print a user's classified salary timeline
    SalaryTimeline {
        /// User whose salary history is shown
        user_id: UserId,
    },
    /// Print a user's upcoming salary changes
    ScheduledChanges {
        /// User whose salary history is shown
        user_id: UserId,
    },
    /// List organization members
    Members {
        /// Organization to list
        organization_id: OrganizationId,
        /// Case-insensitive name or email match
        #[arg(long)]
        search: Option<String>,
        /// Only members with this status
        #[arg(long)]
        status: Option<UserStatus>,
        /// Only members holding this role
        #[arg(long)]
        role: Option<RoleTag>,
        /// Sort column
        #[arg(long, value_enum, default_value_t = SortColumn::Name)]
        sort: SortColumn,
        /// Sort newest or last first
        #[arg(long)]
        descending: bool,
        /// One-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Page size
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: usize,
    },
    /// List organization invitations
    Invitations {
        /// Organization whose invitations are listed
        organization_id: OrganizationId,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortColumn {
    Name,
    Email,
    Status,
    CreatedAt,
}

impl From<SortColumn> for DirectorySort {
    fn from(value: SortColumn) -> Self {
        match value {
            SortColumn::Name => Self::Name,
            SortColumn::Email => Self::Email,
            SortColumn::Status => Self::Status,
            SortColumn::CreatedAt => Self::CreatedAt,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PermissionsOutput {
    user_id: UserId,
    organization_id: OrganizationId,
    roles: Vec<RoleTag>,
    highest_role: &'static str,
    capabilities: CapabilitySet,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimelineOutput {
    user_id: UserId,
    as_of: DateTime<Utc>,
    current: Option<SalaryRecord>,
    items: Vec<TimelineItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduledChangeOutput {
    record: SalaryRecord,
    days_until_effective: i64,
}

struct Services {
    directory: Arc<HttpAdminApi>,
    member_admin: MemberAdminService,
    salary_history: SalaryHistoryService,
    invitations: InvitationService,
}

const GENERIC_FAILURE: &str = "the request could not be completed";

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            error!(error = %failure, "staffdesk-cli failed");
            eprintln!("{}", failure_banner(&failure));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = CliConfig::load()?;
    let services = build_services(&config)?;

    info!(
        api_base_url = %config.api_base_url,
        timeout_secs = config.http_timeout.as_secs(),
        "staffdesk-cli started"
    );

    match cli.command {
        Command::Permissions {
            user_id,
            organization_id,
        } => {
            let user = services.directory.get_user(user_id).await?;
            let actor = Actor::from_user(&user);
            let capabilities = services
                .member_admin
                .member_capabilities(&actor, organization_id);

            print_json(&PermissionsOutput {
                user_id,
                organization_id,
                roles: actor.roles().to_vec(),
                highest_role: highest_role_label(actor.roles()),
                capabilities,
            })
        }
        Command::SalaryTimeline { user_id } => {
            let actor = load_actor(&services, &config).await?;
            let timeline = services.salary_history.timeline(&actor, user_id).await?;

            print_json(&TimelineOutput {
                user_id,
                as_of: timeline.as_of,
                current: timeline.current,
                items: timeline.items,
            })
        }
        Command::ScheduledChanges { user_id } => {
            let actor = load_actor(&services, &config).await?;
            let changes = services
                .salary_history
                .scheduled_changes(&actor, user_id)
                .await?;

            let output: Vec<ScheduledChangeOutput> = changes
                .into_iter()
                .map(|change| ScheduledChangeOutput {
                    record: change.record,
                    days_until_effective: change.days_until_effective,
                })
                .collect();
            print_json(&output)
        }
        Command::Members {
            organization_id,
            search,
            status,
            role,
            sort,
            descending,
            page,
            limit,
        } => {
            let actor = load_actor(&services, &config).await?;
            let query = DirectoryQuery {
                search,
                status,
                role,
                sort: sort.into(),
                direction: if descending {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                },
                page,
                limit,
            };
            let members = services
                .member_admin
                .list_members(&actor, organization_id, &query)
                .await?;

            print_json(&members)
        }
        Command::Invitations { organization_id } => {
            let actor = load_actor(&services, &config).await?;
            let invitations = services.invitations.list(&actor, organization_id).await?;

            print_json(&invitations)
        }
    }
}

/// Renders a failure the way the admin surfaces show it: message only, no category.
fn failure_banner(failure: &AppError) -> String {
    let message = failure.message().trim();
    if message.is_empty() {
        return format!("error: {GENERIC_FAILURE}");
    }

    format!("error: {message}")
}

fn build_services(config: &CliConfig) -> AppResult<Services> {
    let token_provider = Arc::new(StaticAuthTokenProvider::new(config.api_token.as_str())?);
    let api = Arc::new(HttpAdminApi::new(
        config.api_base_url.as_str(),
        config.http_timeout,
        token_provider,
    )?);
    let clock = Arc::new(SystemClock);
    let permission_service = PermissionService::new();

    Ok(Services {
        directory: api.clone(),
        member_admin: MemberAdminService::new(permission_service.clone(), api.clone()),
        salary_history: SalaryHistoryService::new(
            permission_service.clone(),
            api.clone(),
            api.clone(),
            clock.clone(),
        ),
        invitations: InvitationService::new(permission_service, api.clone(), api, clock),
    })
}

async fn load_actor(services: &Services, config: &CliConfig) -> AppResult<Actor> {
    let actor = services.directory.get_user(config.actor_id()?).await?;
    Ok(Actor::from_user(&actor))
}

fn highest_role_label(roles: &[RoleTag]) -> &'static str {
    let is_staff = roles
        .iter()
        .any(|role| role.namespace() != RoleNamespace::Client);
    if is_staff {
        highest_internal_role(roles).display_name()
    } else {
        RoleTag::Client(highest_client_role(roles)).display_name()
    }
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|error| AppError::Internal(format!("failed to render output: {error}")))?;
    println!("{rendered}");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
