use std::cmp::Reverse;
use std::collections::HashSet;

use crate::merge::RankedResult;
use crate::session::SessionMetadata;

/// A query with no visible characters applies no text filter.
pub fn is_empty_query(query: &str) -> bool {
    query.trim().is_empty()
}

/// Keep the records `ranked` names (or all of them for an empty query),
/// newest first. Unparsable timestamps sort last; ties keep input order.
pub fn select(
    all_records: &[SessionMetadata],
    ranked: &[RankedResult],
    query: &str,
) -> Vec<SessionMetadata> {
    let mut selected: Vec<SessionMetadata> = if is_empty_query(query) {
        all_records.to_vec()
    } else {
        let ids: HashSet<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        all_records
            .iter()
            .filter(|s| ids.contains(s.session_id.as_str()))
            .cloned()
            .collect()
    };

    sort_newest_first(&mut selected);
    selected
}

pub fn sort_newest_first(sessions: &mut [SessionMetadata]) {
    // `None < Some(_)`, so reversing puts undated sessions at the end.
    sessions.sort_by_cached_key(|s| Reverse(s.created_at()));
}
