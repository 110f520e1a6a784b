use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Download a URL to a local path, writing through a temporary file in the
/// same directory and renaming into place once the body is fully on disk.
pub fn download_file(url: &str, path: &Path) -> Result<()> {
    let response = ureq::get(url)
        .call()
        .with_context(|| format!("failed to download: {url}"))?;

    if response.status() != 200 {
        return Err(anyhow::anyhow!(
            "download failed with status: {}",
            response.status()
        ));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }

    let temp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("download")
    ));

    let mut temp_file = fs::File::create(&temp_path)
        .with_context(|| format!("failed to create temporary file: {}", temp_path.display()))?;

    std::io::copy(&mut response.into_reader(), &mut temp_file).with_context(|| {
        let _ = fs::remove_file(&temp_path);
        format!("failed to write to temporary file: {}", temp_path.display())
    })?;

    temp_file.sync_all().with_context(|| {
        let _ = fs::remove_file(&temp_path);
        format!("failed to sync temporary file: {}", temp_path.display())
    })?;
    drop(temp_file);

    fs::rename(&temp_path, path).with_context(|| {
        let _ = fs::remove_file(&temp_path);
        format!(
            "failed to move temporary file into place: {} -> {}",
            temp_path.display(),
            path.display()
        )
    })?;

    Ok(())
}
