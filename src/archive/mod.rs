pub mod tar;
pub mod zip;

use crate::models::AssetFormat;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Extract the requested member files from a downloaded asset into the
/// target directory. Returns the names actually written. Fails when the
/// archive never contained a member matching the primary filename.
pub fn extract_named(
    archive_path: &Path,
    format: AssetFormat,
    primary: &str,
    utils: &[String],
    target_dir: &Path,
) -> Result<Vec<String>> {
    let written = match format {
        AssetFormat::Binary => {
            let mut file = fs::File::open(archive_path).with_context(|| {
                format!("failed to open downloaded file: {}", archive_path.display())
            })?;
            write_executable(&target_dir.join(primary), &mut file)?;
            vec![primary.to_string()]
        }
        AssetFormat::Tarball => {
            let file = fs::File::open(archive_path).with_context(|| {
                format!("failed to open tar file: {}", archive_path.display())
            })?;
            tar::extract_named_from_reader(file, primary, utils, target_dir)?
        }
        AssetFormat::GzipTarball => {
            let file = fs::File::open(archive_path).with_context(|| {
                format!("failed to open tar.gz file: {}", archive_path.display())
            })?;
            tar::extract_named_from_reader(GzDecoder::new(file), primary, utils, target_dir)?
        }
        AssetFormat::Zip => zip::extract_named(archive_path, primary, utils, target_dir)?,
    };

    if !written.iter().any(|name| name == primary) {
        anyhow::bail!("no archive member named '{primary}' found");
    }
    for util in utils {
        if !written.iter().any(|name| name == util) {
            println!("  - util {util} not found in archive");
        }
    }
    Ok(written)
}

/// Match an entry's base name against the requested set: the primary file
/// first, then each declared util.
pub(crate) fn match_target<'a>(
    base_name: &str,
    primary: &'a str,
    utils: &'a [String],
) -> Option<&'a str> {
    if base_name == primary {
        return Some(primary);
    }
    utils
        .iter()
        .find(|util| util.as_str() == base_name)
        .map(String::as_str)
}

/// Write a payload file with executable permissions (0755)
pub(crate) fn write_executable(path: &Path, content: &mut impl Read) -> Result<()> {
    let mut out = fs::File::create(path)
        .with_context(|| format!("failed to create file: {}", path.display()))?;
    std::io::copy(content, &mut out)
        .with_context(|| format!("failed to write file: {}", path.display()))?;
    drop(out);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}
