use crate::models::{Config, Repository};
use anyhow::{Context, Result};
use std::fs;

/// Parsed form of the free-form `fetch` argument
#[derive(Debug, Clone, PartialEq)]
pub enum FetchArg {
    /// `@path`: newline-delimited list of installed filenames
    ListFile(String),
    /// `https://host/owner/repo[/...]`
    FullUrl { owner: String, repo: String },
    /// `owner/repo` shorthand
    Shorthand { owner: String, repo: String },
    /// Bare token: filter configured repositories by installed filename
    Bare(String),
}

/// Classify the fetch argument. Rules apply in priority order: leading `@`
/// is a list file, a `/` means a repository reference, anything else is a
/// filename filter.
pub fn parse_fetch_arg(arg: &str) -> Result<FetchArg> {
    if let Some(path) = arg.strip_prefix('@') {
        return Ok(FetchArg::ListFile(path.to_string()));
    }
    if arg.contains('/') {
        let bits: Vec<&str> = arg.split('/').collect();
        if bits[0] == "https:" {
            // https://host/owner/repo => segments 3 and 4
            if bits.len() < 5 || bits[3].is_empty() || bits[4].is_empty() {
                anyhow::bail!("malformed repository URL: {arg}");
            }
            return Ok(FetchArg::FullUrl {
                owner: bits[3].to_string(),
                repo: bits[4].to_string(),
            });
        }
        if bits.len() < 2 || bits[0].is_empty() || bits[1].is_empty() {
            anyhow::bail!("malformed owner/repo argument: {arg}");
        }
        return Ok(FetchArg::Shorthand {
            owner: bits[0].to_string(),
            repo: bits[1].to_string(),
        });
    }
    Ok(FetchArg::Bare(arg.to_string()))
}

/// Repositories to consider for one invocation, with the filename filter
/// derived from the fetch argument. An empty `names` list means every
/// repository passes.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub repos: Vec<Repository>,
    pub names: Vec<String>,
}

/// Expand the fetch argument into the repositories to consider. Repository
/// references produce one transient descriptor not drawn from
/// configuration; everything else filters the configured set.
pub fn resolve(config: &Config, argument: Option<&str>) -> Result<Selection> {
    let Some(arg) = argument else {
        return Ok(Selection {
            repos: config.repositories.clone(),
            names: Vec::new(),
        });
    };

    match parse_fetch_arg(arg)? {
        FetchArg::ListFile(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("error opening file {path}"))?;
            let names = content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            Ok(Selection {
                repos: config.repositories.clone(),
                names,
            })
        }
        FetchArg::FullUrl { owner, repo } | FetchArg::Shorthand { owner, repo } => {
            let direct = Repository {
                name: format!("{owner}/{repo}"),
                file: repo.clone(),
                ..Default::default()
            };
            Ok(Selection {
                repos: vec![direct],
                names: vec![repo],
            })
        }
        FetchArg::Bare(name) => Ok(Selection {
            repos: config.repositories.clone(),
            names: vec![name],
        }),
    }
}
