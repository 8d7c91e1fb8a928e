use std::env;
use std::time::Duration;

use staffdesk_core::{AppError, AppResult};
use staffdesk_domain::UserId;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub(crate) struct CliConfig {
    pub(crate) api_base_url: String,
    pub(crate) api_token: String,
    pub(crate) http_timeout: Duration,
    actor_id: Option<UserId>,
}

impl CliConfig {
    pub(crate) fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("STAFFDESK_API_BASE_URL")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let api_token = required(&lookup, "STAFFDESK_API_TOKEN")?;
        let timeout_secs = parse_u64(
            &lookup,
            "STAFFDESK_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;
        let actor_id = lookup("STAFFDESK_ACTOR_ID")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .map(|value| {
                value.parse::<UserId>().map_err(|error| {
                    AppError::Validation(format!("invalid STAFFDESK_ACTOR_ID value: {error}"))
                })
            })
            .transpose()?;

        if timeout_secs == 0 {
            return Err(AppError::Validation(
                "STAFFDESK_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url,
            api_token,
            http_timeout: Duration::from_secs(timeout_secs),
            actor_id,
        })
    }

    /// Returns the acting user, which commands touching protected data need.
    pub(crate) fn actor_id(&self) -> AppResult<UserId> {
        self.actor_id.ok_or_else(|| {
            AppError::Validation("STAFFDESK_ACTOR_ID is required for this command".to_owned())
        })
    }
}

fn required<F>(lookup: &F, name: &str) -> AppResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parse_u64<F>(lookup: &F, name: &str, default: u64) -> AppResult<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
