use sesslog_core::SessionLogConfig;
use sesslog_search::{present, search, MAX_DISPLAY_LINES};

/// Execute `sesslog search <query> [--project P] [--limit N]`.
pub fn execute(
    config: &SessionLogConfig,
    query: &str,
    project: Option<&str>,
    limit: usize,
) -> anyhow::Result<()> {
    let hits = search(&config.root, query, project, limit)?;
    if hits.is_empty() {
        println!("No matching sessions found.");
        return Ok(());
    }
    for hit in &hits {
        print!("{}", present(hit, &config.root, MAX_DISPLAY_LINES));
    }
    Ok(())
}
