use crate::models::{Auth, Config, Paths};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "relget";
const CONFIG_FILE_NAME: &str = "config.toml";
const CONFIG_SUFFIX: &str = ".toml";

/// Resolve the configuration location: an explicit `--config` path wins;
/// otherwise the per-user config directory is used, created and seeded with
/// a default `config.toml` on first run.
pub fn config_location(flag: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(PathBuf::from(path));
    }

    let base = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("no user config directory"))?;
    let user_path = base.join(CONFIG_DIR_NAME);
    if !user_path.exists() {
        fs::create_dir_all(&user_path).with_context(|| {
            format!("failed to create config directory: {}", user_path.display())
        })?;
    }

    let config_file = user_path.join(CONFIG_FILE_NAME);
    if !config_file.exists() {
        let default_config = Config {
            auth: Auth {
                token: Some("github_<your-token>".to_string()),
            },
            paths: Paths {
                targetdir: "~/.local/bin".to_string(),
            },
            repositories: Vec::new(),
        };
        let content = toml::to_string_pretty(&default_config)
            .with_context(|| "failed to serialize default config")?;
        fs::write(&config_file, content).with_context(|| {
            format!("failed to write default config: {}", config_file.display())
        })?;
        println!(
            "Created default configuration in {} (binaries stored in ~/.local/bin)",
            user_path.display()
        );
        println!("If you wish to use a github token, set [auth] token in config.toml");
    }

    Ok(user_path)
}

/// Load configuration from a single file, or merge every `*.toml` file in a
/// directory. Repositories are sorted by installed filename for
/// deterministic iteration.
pub fn load(path: &Path) -> Result<Config> {
    let meta = fs::metadata(path)
        .with_context(|| format!("error reading config: {}", path.display()))?;

    let mut config = if meta.is_dir() {
        let mut names: Vec<PathBuf> = fs::read_dir(path)
            .with_context(|| format!("error reading config directory: {}", path.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| {
                p.is_file()
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.ends_with(CONFIG_SUFFIX))
            })
            .collect();
        names.sort();

        let mut merged = Config::default();
        for file in names {
            let one = load_one(&file)?;
            merge(&mut merged, one);
        }
        merged
    } else {
        load_one(path)?
    };

    config.repositories.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(config)
}

fn load_one(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("error reading config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("error parsing config file: {}", path.display()))
}

/// Merge one config fragment into the accumulator: list fields append,
/// scalar fields keep the first non-empty value seen.
fn merge(into: &mut Config, other: Config) {
    if into.auth.token.is_none() {
        into.auth.token = other.auth.token;
    }
    if into.paths.targetdir.is_empty() {
        into.paths.targetdir = other.paths.targetdir;
    }
    into.repositories.extend(other.repositories);
}

/// Expand a leading `~` or `~/` to the user's home directory. Other
/// `~`-prefixed forms such as `~user/bin` pass through untouched.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    if path == "~" || path.starts_with("~/") {
        let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("no home directory"))?;
        if path == "~" {
            return Ok(home);
        }
        return Ok(home.join(&path[2..]));
    }
    Ok(PathBuf::from(path))
}

/// Verify the target directory exists and is writable by creating and
/// immediately removing a probe file.
pub fn ensure_writable_dir(dir: &Path) -> Result<()> {
    let meta = fs::metadata(dir)
        .with_context(|| format!("error checking target directory: {}", dir.display()))?;
    if !meta.is_dir() {
        anyhow::bail!("target directory {} is not a directory", dir.display());
    }
    tempfile::Builder::new()
        .prefix("write_test_")
        .tempfile_in(dir)
        .with_context(|| format!("target directory {} is not writable", dir.display()))?;
    Ok(())
}
