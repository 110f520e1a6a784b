use crate::download::{github, http};
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::Path;
use tar::Archive;

// Published bundle of repository fragments, attached to this project's own
// releases.
const LIST_REPO: &str = "relget/relget";
const LIST_ASSET: &str = "config.tgz";

/// Refresh the bundled repository list: download the `config.tgz` asset
/// from the latest release and unpack its fragment files into the config
/// directory. The user's own `config.toml` is never touched.
pub fn run(config_path: &Path, token: Option<&str>) -> Result<()> {
    let release = github::latest_release(LIST_REPO, token)?;
    let asset = release
        .assets
        .iter()
        .find(|a| a.name == LIST_ASSET)
        .ok_or_else(|| anyhow::anyhow!("no {LIST_ASSET} asset in the latest release"))?;

    println!("Downloading from {}", asset.browser_download_url);
    let scratch = tempfile::Builder::new()
        .prefix("relget_work_")
        .tempdir()
        .with_context(|| "failed to create scratch directory")?;
    let archive_path = scratch.path().join(LIST_ASSET);
    http::download_file(&asset.browser_download_url, &archive_path)?;

    let config_dir = if config_path.is_file() {
        config_path.parent().unwrap_or(config_path)
    } else {
        config_path
    };
    unpack_fragments(&archive_path, config_dir)
}

/// Unpack every regular file from the bundle into the config directory,
/// flattened to base names, skipping any `config.toml`.
fn unpack_fragments(archive_path: &Path, config_dir: &Path) -> Result<()> {
    let file = fs::File::open(archive_path)
        .with_context(|| format!("failed to open bundle: {}", archive_path.display()))?;
    let mut archive = Archive::new(GzDecoder::new(file));

    for entry in archive.entries().with_context(|| "failed to read bundle entries")? {
        let mut entry = entry.with_context(|| "failed to access bundle entry")?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let base_name = {
            let path = entry.path().with_context(|| "failed to get entry path")?;
            match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            }
        };
        if base_name == "config.toml" {
            continue;
        }
        let out_path = config_dir.join(&base_name);
        println!("  - Extracting to {}", out_path.display());
        let mut content = Vec::new();
        entry
            .read_to_end(&mut content)
            .with_context(|| format!("failed to read bundle entry {base_name}"))?;
        fs::write(&out_path, content)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn build_bundle(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (path, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            builder.append_data(&mut header, path, *data).unwrap();
        }
        let tar_bytes = builder.into_inner().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar_bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_unpack_fragments_skips_user_config() {
        let scratch = tempfile::tempdir().unwrap();
        let config_dir = tempfile::tempdir().unwrap();
        let bundle = build_bundle(&[
            ("config/10-network.toml", b"[[repositories]]\nname = \"a/b\"\nfile = \"b\"\n"),
            ("config/config.toml", b"[auth]\ntoken = \"overwritten\"\n"),
        ]);
        let archive_path = scratch.path().join("config.tgz");
        fs::write(&archive_path, bundle).unwrap();

        unpack_fragments(&archive_path, config_dir.path()).unwrap();

        assert!(config_dir.path().join("10-network.toml").exists());
        assert!(!config_dir.path().join("config.toml").exists());
    }
}
