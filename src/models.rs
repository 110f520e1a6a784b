use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

/// Loaded configuration: auth, paths, and the declared repository set
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub auth: Auth,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub repositories: Vec<Repository>,
}

/// API authentication section
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Auth {
    pub token: Option<String>,
}

/// Filesystem paths section
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Paths {
    #[serde(default)]
    pub targetdir: String,
}

/// One declared repository: where to fetch from and what to install
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Repository {
    /// "owner/repo" identity on the release host
    pub name: String,
    /// Primary installed filename
    pub file: String,
    /// Alternate filename used for the already-installed check
    pub command: Option<String>,
    /// Auxiliary filenames to extract alongside the primary file
    #[serde(default)]
    pub utils: Vec<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Repository {
    /// Filename checked for the already-installed test: the `command`
    /// override when declared, else the installed filename itself.
    pub fn check_file(&self) -> &str {
        self.command.as_deref().unwrap_or(&self.file)
    }

    /// True if any of the requested tags is among this repository's tags
    pub fn has_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|t| self.tags.contains(t))
    }
}

/// Release description as reported by the upstream API
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Release {
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// One downloadable file attached to a release
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

/// Container format of a release asset, derived from its filename suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFormat {
    Binary,
    Tarball,
    GzipTarball,
    Zip,
}

/// Asset chosen by the matcher for one repository
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedAsset {
    pub name: String,
    pub url: String,
    pub format: AssetFormat,
}

/// Preflight outcome for one repository
#[derive(Debug, Clone, PartialEq)]
pub enum RepoState {
    /// A matching asset was identified
    Ok(MatchedAsset),
    /// Lookup failed or no asset matched
    Ko,
    /// Already installed and update not requested
    Exists,
}

/// Per-repository status carried from preflight into the fetching phase
#[derive(Debug, Clone)]
pub struct RepoStatus {
    pub repo: Repository,
    pub state: RepoState,
}

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// List available commands
    List {
        /// Path to a configuration file or directory
        #[arg(long)]
        config: Option<String>,
        /// Filter by tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,
    },
    /// Display all tags
    Tags {
        /// Path to a configuration file or directory
        #[arg(long)]
        config: Option<String>,
    },
    /// Refresh the list of available commands
    Refresh {
        /// Path to a configuration file or directory
        #[arg(long)]
        config: Option<String>,
    },
    /// Fetch one, some, or all commands
    Fetch {
        /// Command name, owner/repo, full URL, or @listfile
        argument: Option<String>,
        /// Path to a configuration file or directory
        #[arg(long)]
        config: Option<String>,
        /// Update commands even if already installed
        #[arg(long)]
        update: bool,
        /// Filter by tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,
        /// Do not actually install commands
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let toml_str = r#"
[paths]
targetdir = "~/.local/bin"

[[repositories]]
name = "owner/tool"
file = "tool"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.paths.targetdir, "~/.local/bin");
        assert_eq!(config.repositories.len(), 1);
        let repo = &config.repositories[0];
        assert_eq!(repo.name, "owner/tool");
        assert_eq!(repo.file, "tool");
        assert!(repo.utils.is_empty());
        assert!(repo.command.is_none());
    }

    #[test]
    fn test_parse_full_repository_entry() {
        let toml_str = r#"
[auth]
token = "github_abc123"

[[repositories]]
name = "owner/kit"
file = "kit"
command = "kit-cli"
utils = ["kit-helper", "kit-doctor"]
comment = "A toolkit"
tags = ["dev", "cli"]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.auth.token.as_deref(), Some("github_abc123"));
        let repo = &config.repositories[0];
        assert_eq!(repo.check_file(), "kit-cli");
        assert_eq!(repo.utils, vec!["kit-helper", "kit-doctor"]);
        assert_eq!(repo.tags, vec!["dev", "cli"]);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.repositories.is_empty());
        assert!(config.auth.token.is_none());
        assert!(config.paths.targetdir.is_empty());
    }

    #[test]
    fn test_parse_release_assets() {
        let json = r#"{"assets": [
            {"name": "tool_linux_amd64.tar.gz",
             "browser_download_url": "https://example.com/dl/tool_linux_amd64.tar.gz"},
            {"name": "tool.sha256",
             "browser_download_url": "https://example.com/dl/tool.sha256"}
        ]}"#;
        let release: Release = serde_json::from_str(json).unwrap();
        assert_eq!(release.assets.len(), 2);
        assert_eq!(release.assets[0].name, "tool_linux_amd64.tar.gz");
    }

    #[test]
    fn test_check_file_defaults_to_file() {
        let repo = Repository {
            name: "owner/tool".into(),
            file: "tool".into(),
            ..Default::default()
        };
        assert_eq!(repo.check_file(), "tool");
    }

    #[test]
    fn test_has_tag() {
        let repo = Repository {
            tags: vec!["net".into(), "cli".into()],
            ..Default::default()
        };
        assert!(repo.has_tag(&["cli".into()]));
        assert!(repo.has_tag(&["gui".into(), "net".into()]));
        assert!(!repo.has_tag(&["gui".into()]));
        assert!(!repo.has_tag(&[]));
    }
}
