use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use zip::ZipArchive;

/// Extract entries matching the primary filename or one of the utils from a
/// zip archive, iterating the file index in directory order. Same matching
/// semantics as the tar walker.
pub fn extract_named(
    zip_path: &Path,
    primary: &str,
    utils: &[String],
    target_dir: &Path,
) -> Result<Vec<String>> {
    let file = fs::File::open(zip_path)
        .with_context(|| format!("failed to open zip file: {}", zip_path.display()))?;
    let mut archive = ZipArchive::new(file).with_context(|| "failed to read zip archive")?;

    let mut written = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("failed to access zip entry {i}"))?;
        if entry.is_dir() {
            continue;
        }
        let base_name = match Path::new(entry.name())
            .file_name()
            .and_then(|n| n.to_str())
        {
            Some(name) => name.to_string(),
            None => continue,
        };
        let Some(wanted) = super::match_target(&base_name, primary, utils) else {
            continue;
        };
        let out_path = target_dir.join(wanted);
        super::write_executable(&out_path, &mut entry)
            .with_context(|| format!("failed to extract {wanted}"))?;
        written.push(wanted.to_string());
        if utils.is_empty() {
            break;
        }
    }

    Ok(written)
}
