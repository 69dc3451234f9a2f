use chrono::{Local, NaiveDate};
use sesslog_core::SessionLogConfig;
use sesslog_search::project_counts;
use sesslog_store::{header_lines, list_entries, IndexEntry, INDEX_FILE};

/// Execute `sesslog list [--project P] [--days N] [--json]`.
pub fn execute(
    config: &SessionLogConfig,
    project: Option<&str>,
    days: u32,
    json: bool,
) -> anyhow::Result<()> {
    match project {
        Some(project) => list_project(config, project, days, json),
        None => list_all(config, json),
    }
}

fn list_project(
    config: &SessionLogConfig,
    project: &str,
    days: u32,
    json: bool,
) -> anyhow::Result<()> {
    let project_dir = config.project_dir(project);
    if !project_dir.join(INDEX_FILE).exists() {
        println!("No sessions found for project: {project}");
        return Ok(());
    }
    let entries = recent(list_entries(&project_dir)?, Local::now().date_naive(), days);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    for line in header_lines(project) {
        println!("{line}");
    }
    for entry in &entries {
        println!("{}", entry.to_row());
    }
    Ok(())
}

fn list_all(config: &SessionLogConfig, json: bool) -> anyhow::Result<()> {
    if !config.root.exists() {
        println!("No session logs found.");
        return Ok(());
    }
    let counts = project_counts(&config.root)?;
    if json {
        let value: Vec<serde_json::Value> = counts
            .iter()
            .map(|(name, count)| serde_json::json!({"project": name, "sessions": count}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    for (name, count) in counts {
        println!("  {name}: {count} sessions");
    }
    Ok(())
}

/// Entries dated within the last `days` days of `today` (today counts as day
/// one). Rows with an unreadable date are kept.
fn recent(entries: Vec<IndexEntry>, today: NaiveDate, days: u32) -> Vec<IndexEntry> {
    let lookback = days.saturating_sub(1);
    let cutoff = today
        .checked_sub_days(chrono::Days::new(u64::from(lookback)))
        .unwrap_or(NaiveDate::MIN);
    entries
        .into_iter()
        .filter(|e| match NaiveDate::parse_from_str(&e.date, "%Y-%m-%d") {
            Ok(date) => date >= cutoff,
            Err(_) => true,
        })
        .collect()
}
