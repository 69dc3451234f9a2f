//! Keyword search over stored summaries (`<root>/<project>/**/*.md`).

use sesslog_store::{INDEX_FILE, META_CLOSE, META_OPEN, RAW_DIR};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default number of displayed lines per result.
pub const MAX_DISPLAY_LINES: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Number of distinct query words found in the content.
    pub score: usize,
    pub path: PathBuf,
    pub content: String,
}

/// Rank every stored summary under `root` (or just `root/<project>`) by how
/// many distinct query words it contains. Zero-score files are dropped; ties
/// keep newest-first file order.
pub fn search(
    root: &Path,
    query: &str,
    project: Option<&str>,
    limit: usize,
) -> anyhow::Result<Vec<SearchHit>> {
    let words = query_words(query);
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let mut hits = Vec::new();
    for dir in search_dirs(root, project)? {
        for path in summary_files(&dir) {
            let content = match fs::read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "skipping unreadable summary");
                    continue;
                }
            };
            let score = score(&content, &words);
            if score > 0 {
                hits.push(SearchHit {
                    score,
                    path,
                    content,
                });
            }
        }
    }

    // sort_by is stable
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(limit);
    Ok(hits)
}

fn query_words(query: &str) -> BTreeSet<String> {
    query.to_lowercase().split_whitespace().map(str::to_string).collect()
}

fn score(content: &str, words: &BTreeSet<String>) -> usize {
    let lower = content.to_lowercase();
    words.iter().filter(|w| lower.contains(w.as_str())).count()
}

fn search_dirs(root: &Path, project: Option<&str>) -> anyhow::Result<Vec<PathBuf>> {
    if let Some(project) = project {
        return Ok(vec![root.join(project)]);
    }
    project_dirs(root)
}

/// Project directories under `root`, sorted by name. A missing root has none.
fn project_dirs(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(root) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// Stored summaries below `dir`, newest first by path. `INDEX.md` and the
/// raw snapshot tree are not summaries.
fn summary_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_type().is_dir() && e.file_name() == RAW_DIR))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .filter(|e| e.file_name() != INDEX_FILE)
        .map(|e| e.into_path())
        .collect();
    files.sort_by(|a, b| b.cmp(a));
    files
}

/// Every project directory with its number of stored summaries.
pub fn project_counts(root: &Path) -> anyhow::Result<Vec<(String, usize)>> {
    Ok(project_dirs(root)?
        .into_iter()
        .filter_map(|dir| {
            let name = dir.file_name()?.to_string_lossy().to_string();
            let count = summary_files(&dir).len();
            Some((name, count))
        })
        .collect())
}

/// Drop the `<!--` ... `-->` metadata lines from a stored summary.
fn strip_metadata(content: &str) -> Vec<&str> {
    let mut in_meta = false;
    let mut out = Vec::new();
    for line in content.split('\n') {
        match line.trim() {
            META_OPEN => in_meta = true,
            META_CLOSE => in_meta = false,
            _ if !in_meta => out.push(line),
            _ => {}
        }
    }
    out
}

/// Render one hit for the terminal: a header with the root-relative path and
/// score between rules, then at most `max_lines` body lines.
pub fn present(hit: &SearchHit, root: &Path, max_lines: usize) -> String {
    let rel = hit.path.strip_prefix(root).unwrap_or(&hit.path);
    let rule = "=".repeat(60);
    let mut out = format!(
        "\n{rule}\n{} (relevance: {})\n{rule}\n",
        rel.display(),
        hit.score
    );
    let body = strip_metadata(&hit.content);
    for line in body.iter().take(max_lines) {
        out.push_str(line);
        out.push('\n');
    }
    if body.len() > max_lines {
        out.push_str("  [...]\n");
    }
    out
}
