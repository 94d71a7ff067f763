//! Date-labeled grouping of recency-sorted sessions.

use chrono::{DateTime, Datelike, Local, Month, NaiveDate, TimeZone};
use serde::Serialize;

use crate::session::SessionMetadata;

/// A display bucket. Variants are listed from most to least recent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateBucket {
    Today,
    Yesterday,
    LastSevenDays,
    ThisMonth,
    /// An earlier month of the current year.
    Month(Month),
    /// Any earlier year.
    Year(i32),
    /// `date_created` could not be parsed.
    Undated,
}

impl DateBucket {
    pub fn label(&self) -> String {
        match self {
            DateBucket::Today => "Today".to_string(),
            DateBucket::Yesterday => "Yesterday".to_string(),
            DateBucket::LastSevenDays => "Last 7 Days".to_string(),
            DateBucket::ThisMonth => "Earlier This Month".to_string(),
            DateBucket::Month(month) => month.name().to_string(),
            DateBucket::Year(year) => year.to_string(),
            DateBucket::Undated => "Older".to_string(),
        }
    }

    /// Emission order: smaller sorts first.
    fn order(&self) -> (u8, i64) {
        match self {
            DateBucket::Today => (0, 0),
            DateBucket::Yesterday => (1, 0),
            DateBucket::LastSevenDays => (2, 0),
            DateBucket::ThisMonth => (3, 0),
            DateBucket::Month(month) => (4, -i64::from(month.number_from_month())),
            DateBucket::Year(year) => (5, -i64::from(*year)),
            DateBucket::Undated => (6, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateGroup {
    pub label: String,
    pub sessions: Vec<SessionMetadata>,
}

/// A bucket rule: given a session's calendar date and today's, the bucket
/// it belongs to, if this rule claims it.
type Rule = fn(date: NaiveDate, today: NaiveDate) -> Option<DateBucket>;

/// Evaluated top to bottom; the first rule that claims a date wins.
const RULES: [Rule; 6] = [
    |date, today| (date >= today).then_some(DateBucket::Today),
    |date, today| (today.pred_opt() == Some(date)).then_some(DateBucket::Yesterday),
    |date, today| ((today - date).num_days() < 7).then_some(DateBucket::LastSevenDays),
    |date, today| {
        (date.year() == today.year() && date.month() == today.month())
            .then_some(DateBucket::ThisMonth)
    },
    |date, today| {
        if date.year() != today.year() {
            return None;
        }
        u8::try_from(date.month())
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(DateBucket::Month)
    },
    |date, _| Some(DateBucket::Year(date.year())),
];

pub fn classify(date: Option<NaiveDate>, today: NaiveDate) -> DateBucket {
    let Some(date) = date else {
        return DateBucket::Undated;
    };
    RULES
        .iter()
        .find_map(|rule| rule(date, today))
        .unwrap_or(DateBucket::Undated)
}

/// Group `sessions` against the local clock.
pub fn group_sessions_by_date(sessions: Vec<SessionMetadata>) -> Vec<DateGroup> {
    group_at(sessions, &Local::now())
}

/// Group `sessions` (already sorted newest first) into buckets relative to
/// `now`, in `now`'s time zone. Empty buckets are omitted and members keep
/// their input order.
pub fn group_at<Tz: TimeZone>(sessions: Vec<SessionMetadata>, now: &DateTime<Tz>) -> Vec<DateGroup> {
    let tz = now.timezone();
    let today = now.date_naive();

    let mut buckets: Vec<(DateBucket, Vec<SessionMetadata>)> = Vec::new();
    for session in sessions {
        let date = session
            .created_at()
            .map(|created| created.with_timezone(&tz).date_naive());
        let bucket = classify(date, today);
        match buckets.iter_mut().find(|(b, _)| *b == bucket) {
            Some((_, members)) => members.push(session),
            None => buckets.push((bucket, vec![session])),
        }
    }

    buckets.sort_by_key(|(bucket, _)| bucket.order());
    buckets
        .into_iter()
        .map(|(bucket, sessions)| DateGroup {
            label: bucket.label(),
            sessions,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn labels(groups: &[DateGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.label.as_str()).collect()
    }

    #[test]
    fn classifies_through_the_rule_chain() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        assert_eq!(classify(date(2026, 10, 14), today), DateBucket::Today);
        assert_eq!(classify(date(2026, 10, 20), today), DateBucket::Today);
        assert_eq!(classify(date(2026, 10, 13), today), DateBucket::Yesterday);
        assert_eq!(classify(date(2026, 10, 8), today), DateBucket::LastSevenDays);
        assert_eq!(classify(date(2026, 10, 7), today), DateBucket::ThisMonth);
        assert_eq!(classify(date(2026, 10, 1), today), DateBucket::ThisMonth);
        assert_eq!(classify(date(2026, 9, 30), today), DateBucket::Month(Month::September));
        assert_eq!(classify(date(2026, 1, 1), today), DateBucket::Month(Month::January));
        assert_eq!(classify(date(2025, 12, 31), today), DateBucket::Year(2025));
        assert_eq!(classify(None, today), DateBucket::Undated);
    }

    #[test]
    fn last_seven_days_crosses_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 3).unwrap();
        assert_eq!(classify(date(2026, 9, 28), today), DateBucket::LastSevenDays);
        assert_eq!(classify(date(2026, 9, 26), today), DateBucket::Month(Month::September));
    }

    #[test]
    fn groups_in_bucket_order_and_omits_empty_buckets() {
        let sessions = vec![
            SessionMetadata::new("today", "a", "2026-10-14T08:00:00Z"),
            SessionMetadata::new("aug", "b", "2026-08-02T08:00:00Z"),
            SessionMetadata::new("2024", "c", "2024-05-01T08:00:00Z"),
            SessionMetadata::new("2025", "d", "2025-03-01T08:00:00Z"),
            SessionMetadata::new("sep", "e", "2026-09-02T08:00:00Z"),
            SessionMetadata::new("bad", "f", "whenever"),
        ];
        let groups = group_at(sessions, &now());
        assert_eq!(
            labels(&groups),
            vec!["Today", "September", "August", "2025", "2024", "Older"]
        );
    }

    #[test]
    fn preserves_member_order_within_a_bucket() {
        let sessions = vec![
            SessionMetadata::new("late", "a", "2026-10-14T11:00:00Z"),
            SessionMetadata::new("early", "b", "2026-10-14T01:00:00Z"),
        ];
        let groups = group_at(sessions, &now());
        assert_eq!(groups.len(), 1);
        let ids: Vec<&str> = groups[0].sessions.iter().map(|s| s.session_id.as_str()).collect();
        assert_eq!(ids, vec!["late", "early"]);
    }

    #[test]
    fn calendar_days_follow_the_clock_time_zone() {
        // 23:30 UTC on the 13th is already the 14th at UTC+2.
        let session = SessionMetadata::new("x", "t", "2026-10-13T23:30:00Z");
        let utc_now = now();
        let plus_two = utc_now.with_timezone(&FixedOffset::east_opt(2 * 3600).unwrap());

        assert_eq!(labels(&group_at(vec![session.clone()], &utc_now)), vec!["Yesterday"]);
        assert_eq!(labels(&group_at(vec![session], &plus_two)), vec!["Today"]);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_at(Vec::new(), &now()).is_empty());
    }
}
