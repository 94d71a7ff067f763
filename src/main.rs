//! Command-line front end for session history search
//!
//! Features:
//! - Reads the session store's `sessions.json` snapshot
//! - Exact, fuzzy and prefix title search in one pass
//! - Date-grouped output as text or JSON

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use clap::Parser;
use history_search::{DateGroup, HistorySearch, SearchConfig, SessionMetadata};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// ============================================================================
// Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "history-search", version, about = "Search chat session history")]
struct Args {
    /// Search terms; omit to list every session
    query: Vec<String>,

    /// Session snapshot [default: ~/.continue/sessions/sessions.json]
    #[arg(long, value_name = "PATH")]
    sessions: Option<PathBuf>,

    /// TOML search config [default: <config dir>/history-search/config.toml]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print groups as JSON
    #[arg(long)]
    json: bool,

    /// Print at most N sessions
    #[arg(long, value_name = "N")]
    limit: Option<usize>,
}

// ============================================================================
// Session Loading
// ============================================================================

fn default_sessions_path() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Could not find home directory")?
        .join(".continue")
        .join("sessions")
        .join("sessions.json"))
}

fn load_sessions(path: &Path) -> Result<Vec<SessionMetadata>> {
    if !path.exists() {
        warn!(path = %path.display(), "session snapshot not found, treating history as empty");
        return Ok(Vec::new());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let sessions: Vec<SessionMetadata> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(sessions)
}

// ============================================================================
// Output
// ============================================================================

/// Keep the first `limit` sessions in display order, dropping emptied groups.
fn limit_groups(groups: Vec<DateGroup>, limit: Option<usize>) -> Vec<DateGroup> {
    let Some(mut remaining) = limit else {
        return groups;
    };
    let mut limited = Vec::new();
    for mut group in groups {
        if remaining == 0 {
            break;
        }
        group.sessions.truncate(remaining);
        remaining -= group.sessions.len();
        limited.push(group);
    }
    limited
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

fn format_time_ago<Tz: TimeZone>(session: &SessionMetadata, now: &DateTime<Tz>) -> String {
    let Some(created) = session.created_at() else {
        return "unknown".to_string();
    };

    let duration = now.clone().signed_duration_since(created.with_timezone(&now.timezone()));

    // Negative durations (clock skew, future timestamps) read as "just now".
    if duration.num_minutes() < 1 {
        "just now".to_string()
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_weeks() < 4 {
        format!("{}w ago", duration.num_weeks())
    } else {
        created
            .with_timezone(&now.timezone())
            .naive_local()
            .format("%b %d")
            .to_string()
    }
}

fn render_text<Tz: TimeZone>(groups: &[DateGroup], now: &DateTime<Tz>) -> String {
    let mut out = String::new();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&group.label);
        out.push('\n');
        for session in &group.sessions {
            let title = if session.title.trim().is_empty() {
                "(untitled)"
            } else {
                session.title.as_str()
            };
            out.push_str(&format!(
                "  {:>9}  {}\n",
                format_time_ago(session, now),
                truncate(title, 80)
            ));
        }
    }
    out
}

// ============================================================================
// Main
// ============================================================================

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;
    let args = Args::parse();

    let config = SearchConfig::load_or_default(args.config.as_deref())
        .context("Failed to load search config")?;
    let sessions_path = match args.sessions {
        Some(path) => path,
        None => default_sessions_path()?,
    };
    let sessions = load_sessions(&sessions_path)?;
    info!(sessions = sessions.len(), path = %sessions_path.display(), "loaded session snapshot");

    let search = HistorySearch::try_with_sessions(config, sessions)?;
    let query = args.query.join(" ");
    let now = Local::now();
    let groups = limit_groups(search.grouped_at(&query, &now), args.limit);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    if groups.is_empty() {
        eprintln!("No sessions found.");
        return Ok(());
    }

    print!("{}", render_text(&groups, &now));
    Ok(())
}
