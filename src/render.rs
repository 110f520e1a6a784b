use crate::models::{RepoState, RepoStatus, Repository};
use std::collections::BTreeMap;

/// Status label for the repositories report
pub fn status_label(state: &RepoState) -> &'static str {
    match state {
        RepoState::Ok(_) => "[OK]",
        RepoState::Ko => "[XXX]",
        RepoState::Exists => "[Exist]",
    }
}

/// Label for one fetching-phase outcome
pub fn fetch_label(fetched: bool, dry_run: bool) -> &'static str {
    match (dry_run, fetched) {
        (true, true) => "Dry-Run: [Fetched]",
        (true, false) => "Dry-Run: [Ignored]",
        (false, true) => "[Fetched]",
        (false, false) => "[Ignored]",
    }
}

/// Print the per-repository status summary
pub fn print_repositories(statuses: &[RepoStatus]) {
    println!("[Repositories]");
    for status in statuses {
        println!(
            "    repository: {} {}",
            status.repo.name,
            status_label(&status.state)
        );
    }
}

/// Print the `list` table: one row per configured repository, optionally
/// filtered by tags.
pub fn print_list(repos: &[Repository], tags: &[String]) {
    let rows: Vec<(&str, &str, String)> = repos
        .iter()
        .filter(|repo| tags.is_empty() || repo.has_tag(tags))
        .map(|repo| (repo.file.as_str(), repo.comment.as_str(), repo.tags.join(", ")))
        .collect();

    let headers = ("Binary", "Description", "Tags");
    let width0 = rows
        .iter()
        .map(|r| r.0.len())
        .chain([headers.0.len()])
        .max()
        .unwrap_or(0);
    let width1 = rows
        .iter()
        .map(|r| r.1.len())
        .chain([headers.1.len()])
        .max()
        .unwrap_or(0);

    println!("{:width0$}  {:width1$}  {}", headers.0, headers.1, headers.2);
    for (file, comment, tag_list) in rows {
        println!("{file:width0$}  {comment:width1$}  {tag_list}");
    }
}

/// Print the `tags` table: tag name and repository count, sorted by tag
pub fn print_tags(repos: &[Repository]) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for repo in repos {
        for tag in &repo.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let width = counts
        .keys()
        .map(|t| t.len())
        .chain(["Tag".len()])
        .max()
        .unwrap_or(0);
    println!("{:width$}  Repos", "Tag");
    for (tag, count) in counts {
        println!("{tag:width$}  {count}");
    }
}
