use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One chat session as listed by the session store.
///
/// The engine never mutates these; every search pass works on the snapshot
/// handed to [`crate::HistorySearch::replace_sessions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub session_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date_created: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_directory: Option<String>,
}

impl SessionMetadata {
    pub fn new(
        session_id: impl Into<String>,
        title: impl Into<String>,
        date_created: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            title: title.into(),
            date_created: date_created.into(),
            workspace_directory: None,
        }
    }

    /// Creation instant, or `None` when `date_created` is unparsable.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_date(&self.date_created)
    }
}

/// Parse a session timestamp.
///
/// Accepts RFC 3339, ISO-8601 without offset (read as UTC), a bare
/// `YYYY-MM-DD`, or integer milliseconds since the Unix epoch.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        debug!("empty session timestamp");
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&ndt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|ndt| Utc.from_utc_datetime(&ndt));
    }
    // The session store writes `String(Date.now())`
    if let Ok(millis) = raw.parse::<i64>() {
        if let Some(dt) = DateTime::<Utc>::from_timestamp_millis(millis) {
            return Some(dt);
        }
    }

    debug!(timestamp = raw, "unparsable session timestamp, sorting as oldest");
    None
}
