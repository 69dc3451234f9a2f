use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use sesslog_core::EventTime;

/// Epoch values above this are milliseconds, below are seconds.
const MILLIS_THRESHOLD: f64 = 1e12;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Pick the timestamp a summary is filed under: the session start when it
/// parses, otherwise the current local time.
pub(crate) fn resolve_save_time(start: Option<&EventTime>) -> DateTime<FixedOffset> {
    start
        .and_then(parse_event_time)
        .unwrap_or_else(|| Local::now().fixed_offset())
}

fn parse_event_time(time: &EventTime) -> Option<DateTime<FixedOffset>> {
    match time {
        EventTime::Text(s) => parse_iso(s.trim()),
        EventTime::Epoch(n) => {
            let raw = n.as_f64()?;
            let secs = if raw > MILLIS_THRESHOLD {
                raw / 1000.0
            } else {
                raw
            };
            from_epoch_secs(secs)
        }
    }
}

/// RFC 3339 keeps its own offset; offset-less values are read as local time.
fn parse_iso(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|dt| dt.fixed_offset())
}

fn from_epoch_secs(secs: f64) -> Option<DateTime<FixedOffset>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    DateTime::<Utc>::from_timestamp(whole as i64, nanos).map(|dt| dt.fixed_offset())
}
