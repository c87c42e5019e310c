//! Configured timezone for wall-clock deadlines.
//!
//! Offsets are looked up per instant, so a long-running process follows
//! daylight-saving changes of `local` and named zones.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Duration, FixedOffset, Local, LocalResult, NaiveDateTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::error::AppError;

/// Where `HH:MM` deadlines and midnight are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timezone {
    /// The host's local zone, including its DST rules.
    Local,
    /// An IANA zone such as `Europe/Berlin`.
    Named(Tz),
    /// A constant UTC offset.
    Fixed(FixedOffset),
}

impl Timezone {
    /// Parses `"local"`, `"UTC"`/`"Z"`, `±HH:MM` / `±HHMM` / `±HH`, or an IANA name.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let value = raw.trim();
        if value.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        if value.eq_ignore_ascii_case("utc") || value == "Z" {
            return Ok(Self::Fixed(Utc.fix()));
        }
        if value.starts_with(['+', '-']) {
            return parse_offset(value).map(Self::Fixed).ok_or_else(|| {
                AppError::configuration(format!("Invalid timezone offset '{raw}'"))
            });
        }
        value
            .parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| AppError::configuration(format!("Unknown timezone '{raw}'")))
    }

    /// `now` as wall-clock time in this zone.
    pub fn localize(&self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Self::Local => now.with_timezone(&Local).fixed_offset(),
            Self::Named(tz) => now.with_timezone(tz).fixed_offset(),
            Self::Fixed(offset) => now.with_timezone(offset),
        }
    }

    /// The instant a wall-clock reading denotes in this zone.
    ///
    /// A repeated reading (DST fall-back) resolves to its earlier instant.
    /// A skipped reading (DST spring-forward) resolves to the instant that
    /// many minutes after the last reading before the gap.
    pub fn resolve(&self, wall: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Local => resolve_in(&Local, wall),
            Self::Named(tz) => resolve_in(tz, wall),
            Self::Fixed(offset) => resolve_in(offset, wall),
        }
    }
}

impl From<FixedOffset> for Timezone {
    fn from(offset: FixedOffset) -> Self {
        Self::Fixed(offset)
    }
}

impl From<Tz> for Timezone {
    fn from(tz: Tz) -> Self {
        Self::Named(tz)
    }
}

impl FromStr for Timezone {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Named(tz) => write!(f, "{}", tz.name()),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

fn resolve_in<Z: TimeZone>(zone: &Z, wall: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    match zone.from_local_datetime(&wall) {
        LocalResult::Single(instant) => Some(instant.fixed_offset()),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.fixed_offset()),
        LocalResult::None => {
            let before = zone
                .from_local_datetime(&(wall - Duration::hours(1)))
                .earliest()?;
            Some((before + Duration::hours(1)).fixed_offset())
        }
    }
}

fn parse_offset(value: &str) -> Option<FixedOffset> {
    let sign = if value.starts_with('-') { -1 } else { 1 };
    let digits: String = value[1..].chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) || !matches!(digits.len(), 2 | 4) {
        return None;
    }

    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = if digits.len() == 4 {
        digits[2..].parse().ok()?
    } else {
        0
    };
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn wall(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_fixed_offsets() {
        let offset = |raw: &str| match Timezone::parse(raw).unwrap() {
            Timezone::Fixed(o) => o.local_minus_utc(),
            other => panic!("expected fixed offset, got {other:?}"),
        };
        assert_eq!(offset("+09:00"), 9 * 3600);
        assert_eq!(offset("-0530"), -(5 * 3600 + 30 * 60));
        assert_eq!(offset("+02"), 2 * 3600);
        assert_eq!(offset("UTC"), 0);
        assert_eq!(offset("Z"), 0);
    }

    #[test]
    fn test_parse_local_and_named() {
        assert_eq!(Timezone::parse("local").unwrap(), Timezone::Local);
        assert_eq!(
            Timezone::parse("Asia/Tokyo").unwrap(),
            Timezone::Named(chrono_tz::Asia::Tokyo)
        );
        assert_eq!(
            Timezone::parse("Europe/Berlin").unwrap().to_string(),
            "Europe/Berlin"
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "09:00", "+9", "+25:00", "+09:75", "Mars/Olympus", "+0a:00"] {
            assert!(Timezone::parse(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn test_named_zone_follows_dst() {
        let berlin = Timezone::Named(chrono_tz::Europe::Berlin);
        let winter = Utc.with_ymd_and_hms(2026, 12, 1, 12, 0, 0).unwrap();
        let summer = Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap();

        assert_eq!(berlin.localize(winter).offset().local_minus_utc(), 3600);
        assert_eq!(berlin.localize(summer).offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_resolve_gap_and_overlap() {
        let berlin = Timezone::Named(chrono_tz::Europe::Berlin);

        // 2026-03-29 02:30 does not exist in Berlin.
        let skipped = berlin.resolve(wall(2026, 3, 29, 2, 30)).unwrap();
        assert_eq!(skipped.to_rfc3339(), "2026-03-29T03:30:00+02:00");

        // 2026-10-25 02:30 happens twice; the first one wins.
        let repeated = berlin.resolve(wall(2026, 10, 25, 2, 30)).unwrap();
        assert_eq!(repeated.to_rfc3339(), "2026-10-25T02:30:00+02:00");
    }
}
