//! Salary history records and effective-dated timeline classification.
//!
//! Classification depends on an explicit `as_of` instant rather than the
//! system clock, so a record that is scheduled today becomes current once
//! `as_of` passes its effective date, without any write to the record.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use staffdesk_core::{AppError, AppResult, NonEmptyString};

use crate::user::UserId;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Upper-case ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Creates a validated currency code. Lower-case input is normalized.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let normalized = value.trim().to_ascii_uppercase();

        if normalized.len() != 3 || !normalized.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(AppError::Validation(format!(
                "currency '{value}' must be a three-letter ISO 4217 code"
            )));
        }

        Ok(Self(normalized))
    }

    /// Returns the currency code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One salary entry as stored by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRecord {
    /// Stable record identifier.
    pub id: String,
    /// Member the salary applies to.
    pub user_id: UserId,
    /// Salary amount in major currency units.
    pub amount: f64,
    /// Currency of `amount`.
    pub currency: CurrencyCode,
    /// Instant from which the salary applies.
    pub effective_date: DateTime<Utc>,
    /// Free-text reason for the change.
    pub reason: String,
    /// Display name of the member who recorded the change.
    pub changed_by: Option<String>,
}

/// Validated input for recording a salary change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSalaryRecord {
    user_id: UserId,
    amount: f64,
    currency: CurrencyCode,
    effective_date: DateTime<Utc>,
    reason: NonEmptyString,
}

impl NewSalaryRecord {
    /// Validates a salary change before it is sent to the API.
    pub fn new(
        user_id: UserId,
        amount: f64,
        currency: &str,
        effective_date: DateTime<Utc>,
        reason: &str,
    ) -> AppResult<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::Validation(
                "salary amount must be a positive number".to_owned(),
            ));
        }

        let reason = NonEmptyString::new(reason.trim())
            .map_err(|_| AppError::Validation("salary change reason is required".to_owned()))?;

        Ok(Self {
            user_id,
            amount,
            currency: CurrencyCode::new(currency)?,
            effective_date,
            reason,
        })
    }

    /// Returns the member the change applies to.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the new amount.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Returns the currency.
    #[must_use]
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Returns the effective date.
    #[must_use]
    pub fn effective_date(&self) -> DateTime<Utc> {
        self.effective_date
    }

    /// Returns the reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        self.reason.as_str()
    }
}

/// Salary record annotated with its change against the previous record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    /// Underlying record.
    pub record: SalaryRecord,
    /// Difference to the chronologically previous record.
    pub change_amount: f64,
    /// `change_amount` relative to the previous amount, in percent.
    pub change_percentage: f64,
    /// Most recent record already in effect.
    pub is_current: bool,
    /// Effective date lies after `as_of`.
    pub is_scheduled: bool,
    /// Neither current nor scheduled.
    pub is_historical: bool,
    /// `change_amount` is positive.
    pub is_increase: bool,
    /// `change_amount` is negative.
    pub is_decrease: bool,
    /// The previous record used a different currency, so no change was computed.
    pub currency_mismatch: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct SalaryDelta {
    amount: f64,
    percentage: f64,
    currency_mismatch: bool,
}

impl SalaryDelta {
    fn between(current: &SalaryRecord, previous: &SalaryRecord) -> Self {
        if current.currency != previous.currency {
            return Self {
                currency_mismatch: true,
                ..Self::default()
            };
        }

        let amount = current.amount - previous.amount;
        let percentage = if previous.amount == 0.0 {
            0.0
        } else {
            amount * 100.0 / previous.amount
        };

        Self {
            amount,
            percentage,
            currency_mismatch: false,
        }
    }
}

fn sorted_newest_first(records: &[SalaryRecord]) -> Vec<&SalaryRecord> {
    let mut sorted: Vec<&SalaryRecord> = records.iter().collect();
    sorted.sort_by(|left, right| right.effective_date.cmp(&left.effective_date));
    sorted
}

/// Builds the salary timeline, newest first.
///
/// Each record is compared with the next older one. Amount deltas are only
/// computed when both records share a currency; otherwise the delta is zero
/// and `currency_mismatch` is set. The input slice is left untouched.
#[must_use]
pub fn classify_timeline(records: &[SalaryRecord], as_of: DateTime<Utc>) -> Vec<TimelineItem> {
    let sorted = sorted_newest_first(records);

    sorted
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let delta = sorted
                .get(index + 1)
                .map(|previous| SalaryDelta::between(record, previous))
                .unwrap_or_default();
            let newer = index.checked_sub(1).and_then(|newer| sorted.get(newer));

            let is_scheduled = record.effective_date > as_of;
            let is_current =
                !is_scheduled && newer.is_none_or(|newer| newer.effective_date > as_of);

            TimelineItem {
                record: (*record).clone(),
                change_amount: delta.amount,
                change_percentage: delta.percentage,
                is_current,
                is_scheduled,
                is_historical: !is_current && !is_scheduled,
                is_increase: delta.amount > 0.0,
                is_decrease: delta.amount < 0.0,
                currency_mismatch: delta.currency_mismatch,
            }
        })
        .collect()
}

/// Whole days from `as_of` until `effective_date`, rounded up.
///
/// Past dates yield zero or negative values; callers only show the figure
/// for scheduled records.
#[must_use]
pub fn days_until_effective(effective_date: DateTime<Utc>, as_of: DateTime<Utc>) -> i64 {
    let millis = (effective_date - as_of).num_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) > 0 {
        days + 1
    } else {
        days
    }
}

/// Returns the record in effect at `as_of`, if any.
#[must_use]
pub fn current_salary(records: &[SalaryRecord], as_of: DateTime<Utc>) -> Option<&SalaryRecord> {
    sorted_newest_first(records)
        .into_iter()
        .find(|record| record.effective_date <= as_of)
}

/// Returns records that take effect after `as_of`, soonest first.
#[must_use]
pub fn scheduled_changes(records: &[SalaryRecord], as_of: DateTime<Utc>) -> Vec<&SalaryRecord> {
    let mut scheduled: Vec<&SalaryRecord> = records
        .iter()
        .filter(|record| record.effective_date > as_of)
        .collect();
    scheduled.sort_by(|left, right| left.effective_date.cmp(&right.effective_date));
    scheduled
}
