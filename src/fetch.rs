use crate::models::{MatchedAsset, Release, RepoState, RepoStatus, Repository};
use crate::resolver::Selection;
use crate::{archive, config, download, matcher, render, resolver};
use anyhow::{Context, Result};
use std::path::Path;

/// Options for the fetch action
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub update: bool,
    pub tags: Vec<String>,
    pub dry_run: bool,
}

/// Drive the full fetch lifecycle: preflight, status report, downloads.
pub fn run(config_path: &Path, argument: Option<&str>, opts: &FetchOptions) -> Result<()> {
    let mut config = config::load(config_path)?;

    if config.paths.targetdir.is_empty() {
        println!("Target directory not set, using current directory");
        config.paths.targetdir = ".".to_string();
    }
    let target_dir = config::expand_home(&config.paths.targetdir)?;
    config::ensure_writable_dir(&target_dir)?;

    let selection = resolver::resolve(&config, argument)?;
    let token = config.auth.token.clone();

    let statuses = preflight(
        &selection,
        &target_dir,
        opts,
        std::env::consts::ARCH,
        std::env::consts::OS,
        |repo| download::github::latest_release(&repo.name, token.as_deref()),
    );

    render::print_repositories(&statuses);
    fetch_all(&statuses, &target_dir, opts.dry_run);

    Ok(())
}

/// Determine, per repository and without side effects on the target
/// directory, whether installation is needed and which asset would be used.
/// Repositories excluded by the filename or tag filters are skipped
/// entirely; everything else is recorded as OK, KO, or Exists.
pub fn preflight<F>(
    selection: &Selection,
    target_dir: &Path,
    opts: &FetchOptions,
    arch: &str,
    os: &str,
    mut lookup: F,
) -> Vec<RepoStatus>
where
    F: FnMut(&Repository) -> Result<Release>,
{
    let arch = arch.to_lowercase();
    let os = os.to_lowercase();

    println!("[Preflight]");
    let mut statuses = Vec::new();
    for repo in &selection.repos {
        if !selection.names.is_empty() && !selection.names.contains(&repo.file) {
            continue;
        }
        if !opts.tags.is_empty() && !repo.has_tag(&opts.tags) {
            continue;
        }

        if !opts.update {
            let check_file = repo.check_file();
            if target_dir.join(check_file).exists() {
                println!("  - ignoring existing command {} ({})", repo.file, check_file);
                statuses.push(RepoStatus {
                    repo: repo.clone(),
                    state: RepoState::Exists,
                });
                continue;
            }
        }

        let state = match lookup(repo) {
            Ok(release) => match matcher::select_asset(&release.assets, &arch, &os) {
                Some(asset) => {
                    println!("  + identified Asset: {}", asset.name);
                    RepoState::Ok(MatchedAsset {
                        name: asset.name.clone(),
                        url: asset.browser_download_url.clone(),
                        format: matcher::asset_format(&asset.name),
                    })
                }
                None => RepoState::Ko,
            },
            Err(err) => {
                println!("  - {err:#}");
                RepoState::Ko
            }
        };
        statuses.push(RepoStatus {
            repo: repo.clone(),
            state,
        });
    }
    statuses
}

/// Download and install every repository marked OK, in order. The first
/// failure aborts the remaining batch; KO and Exists repositories are
/// reported as ignored and never downloaded.
pub fn fetch_all(statuses: &[RepoStatus], target_dir: &Path, dry_run: bool) {
    println!("[Fetching]");
    for status in statuses {
        let asset = match &status.state {
            RepoState::Ok(asset) => asset,
            _ => {
                println!(
                    "  {} {}",
                    status.repo.name,
                    render::fetch_label(false, dry_run)
                );
                continue;
            }
        };
        if dry_run {
            println!("  {} {}", status.repo.name, render::fetch_label(true, true));
            continue;
        }
        if let Err(err) = fetch_one(&status.repo, asset, target_dir) {
            println!("  {}: [{err:#}]", status.repo.file);
            break;
        }
        println!("  {} {}", status.repo.name, render::fetch_label(true, false));
    }
}

/// Download one asset into a scratch directory and extract the requested
/// files into the target directory. The scratch directory is removed when
/// this returns.
fn fetch_one(repo: &Repository, asset: &MatchedAsset, target_dir: &Path) -> Result<()> {
    let scratch = tempfile::Builder::new()
        .prefix("relget_work_")
        .tempdir()
        .with_context(|| "failed to create scratch directory")?;
    let asset_path = scratch.path().join(&asset.name);

    download::http::download_file(&asset.url, &asset_path)?;
    archive::extract_named(&asset_path, asset.format, &repo.file, &repo.utils, target_dir)?;
    Ok(())
}
