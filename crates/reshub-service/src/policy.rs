//! Deadline computation.
//!
//! Pure functions over an instant and the configured timezone. Both entry
//! points always return an instant strictly after `now`. Offsets are looked
//! up for the day being computed, so deadlines stay correct across DST.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};
use thiserror::Error;

use reshub_core::config::ReservationConfig;
use reshub_core::result::AppResult;
use reshub_core::timezone::Timezone;

/// The deadline text is not an `HH:MM` wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time '{input}', expected HH:MM")]
pub struct InvalidTimeFormat {
    /// The rejected input.
    pub input: String,
}

/// Computes reservation expiry instants in the configured timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    timezone: Timezone,
}

impl ExpiryPolicy {
    /// Creates a policy evaluating wall-clock times in `timezone`.
    pub fn new(timezone: impl Into<Timezone>) -> Self {
        Self {
            timezone: timezone.into(),
        }
    }

    /// Creates a policy from the reservation configuration.
    pub fn from_config(config: &ReservationConfig) -> AppResult<Self> {
        Ok(Self::new(config.resolve_timezone()?))
    }

    /// The configured timezone.
    pub fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// `now` expressed in the configured timezone.
    pub fn localize(&self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        self.timezone.localize(now)
    }

    /// Interprets `hhmm` as today's wall-clock time, or tomorrow's if that
    /// instant is not after `now`.
    pub fn parse_deadline(
        &self,
        hhmm: &str,
        now: DateTime<Utc>,
    ) -> Result<DateTime<FixedOffset>, InvalidTimeFormat> {
        let invalid = || InvalidTimeFormat {
            input: hhmm.to_string(),
        };

        let time = parse_hhmm(hhmm).ok_or_else(invalid)?;
        let local_now = self.localize(now);
        let today = local_now.date_naive();
        let candidate = self
            .timezone
            .resolve(today.and_time(time))
            .ok_or_else(invalid)?;
        if candidate > local_now {
            return Ok(candidate);
        }

        today
            .succ_opt()
            .and_then(|tomorrow| self.timezone.resolve(tomorrow.and_time(time)))
            .ok_or_else(invalid)
    }

    /// Midnight at the start of the day after `now`.
    pub fn default_deadline(&self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        let local_now = self.localize(now);
        local_now
            .date_naive()
            .succ_opt()
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .and_then(|midnight| self.timezone.resolve(midnight))
            .unwrap_or_else(|| local_now + Duration::days(1))
    }
}

/// Accepts `H:MM` or `HH:MM` with hour 0-23 and minute 0-59.
fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    let (hour, minute) = raw.trim().split_once(':')?;
    let valid = |part: &str, max_len: usize| {
        !part.is_empty() && part.len() <= max_len && part.chars().all(|c| c.is_ascii_digit())
    };
    if !valid(hour, 2) || minute.len() != 2 || !valid(minute, 2) {
        return None;
    }
    NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}
