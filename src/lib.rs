//! Search and date-grouping for chat session history.
//!
//! A [`HistorySearch`] holds a snapshot of [`SessionMetadata`] records and a
//! Tantivy index over their titles. Each query runs three lookups (exact,
//! fuzzy, prefix), keeps the best match per session, filters the snapshot
//! to the matched sessions, sorts them newest first, and groups them under
//! date labels such as "Today" or "Last 7 Days".

pub mod config;
pub mod engine;
pub mod error;
pub mod grouping;
pub mod index;
pub mod merge;
pub mod pipeline;
pub mod session;

pub use config::SearchConfig;
pub use engine::HistorySearch;
pub use error::{HistoryError, Result};
pub use grouping::{group_at, group_sessions_by_date, DateBucket, DateGroup};
pub use index::{MatchMode, TitleIndex};
pub use merge::{merge, MatchResult, RankedResult, Strategy};
pub use pipeline::select;
pub use session::{parse_date, SessionMetadata};
