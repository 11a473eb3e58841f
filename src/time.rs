use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Wall-clock time in the reader's own timezone.
    fn local_now(&self) -> DateTime<FixedOffset>;
}

struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

#[cfg(test)]
struct FixedClock {
    at: DateTime<Utc>,
    offset: FixedOffset,
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }

    fn local_now(&self) -> DateTime<FixedOffset> {
        self.at.with_timezone(&self.offset)
    }
}

#[cfg(test)]
pub fn fixed_clock(timestamp: i64) -> Arc<dyn Clock> {
    fixed_clock_at_offset(timestamp, 0)
}

/// A fixed instant seen from a timezone `offset_secs` east of UTC.
#[cfg(test)]
pub fn fixed_clock_at_offset(timestamp: i64, offset_secs: i32) -> Arc<dyn Clock> {
    Arc::new(FixedClock {
        at: DateTime::from_timestamp(timestamp, 0).unwrap_or_default(),
        offset: FixedOffset::east_opt(offset_secs).expect("offset within a day"),
    })
}

/// Header date in local time, e.g. "Saturday, October 18, 2026".
pub fn format_header_date(now: DateTime<FixedOffset>) -> String {
    now.format("%A, %B %-d, %Y").to_string()
}

/// Parse the publish dates the backend passes through from the search API.
/// Accepts RFC 3339, `2025-04-30T10:00:05+0000`, and bare dates.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(then).num_seconds().max(0);
    match secs {
        0..60 => "just now".to_string(),
        60..3600 => format!("{}m ago", secs / 60),
        3600..86400 => format!("{}h ago", secs / 3600),
        86400..2_592_000 => format!("{}d ago", secs / 86400),
        _ => then.format("%b %-d, %Y").to_string(),
    }
}
