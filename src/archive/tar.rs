use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tar::Archive;

/// Walk a tar stream and extract entries whose base name matches the
/// primary filename or one of the utils. With no utils declared, extraction
/// stops after the first match; otherwise the whole stream is scanned so
/// every requested name can be satisfied.
pub fn extract_named_from_reader<R: Read>(
    reader: R,
    primary: &str,
    utils: &[String],
    target_dir: &Path,
) -> Result<Vec<String>> {
    let mut archive = Archive::new(reader);
    let mut written = Vec::new();

    for entry in archive.entries().with_context(|| "failed to read tar entries")? {
        let mut entry = entry.with_context(|| "failed to access tar entry")?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::read::GzDecoder;
    use flate2::write::GzEncoder;
    use std::fs;
    use std::io::Write;

    fn build_tar(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (path, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            builder.append_data(&mut header, path, *data).unwrap();
        }
        builder.into_inner().unwrap()
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_extracts_primary_from_nested_path() {
        let tar_bytes = build_tar(&[
            ("release/README.md", b"docs"),
            ("release/bin/tool", b"payload"),
        ]);
        let target = tempfile::tempdir().unwrap();

        let written =
            extract_named_from_reader(&tar_bytes[..], "tool", &[], target.path()).unwrap();
        assert_eq!(written, vec!["tool"]);
        assert_eq!(fs::read(target.path().join("tool")).unwrap(), b"payload");
        assert!(!target.path().join("README.md").exists());
    }

    #[test]
    fn test_stops_after_primary_when_no_utils() {
        let tar_bytes = build_tar(&[("a/tool", b"first"), ("b/tool", b"second")]);
        let target = tempfile::tempdir().unwrap();

        extract_named_from_reader(&tar_bytes[..], "tool", &[], target.path()).unwrap();
        assert_eq!(fs::read(target.path().join("tool")).unwrap(), b"first");
    }

    #[test]
    fn test_collects_primary_and_utils_in_any_order() {
        // The util precedes the primary file in stream order; scanning must
        // not short-circuit before both are found.
        let tar_bytes = build_tar(&[
            ("pkg/helper", b"helper-bytes"),
            ("pkg/doc.txt", b"skip me"),
            ("pkg/tool", b"tool-bytes"),
        ]);
        let target = tempfile::tempdir().unwrap();
        let utils = vec!["helper".to_string()];

        let written =
            extract_named_from_reader(&tar_bytes[..], "tool", &utils, target.path()).unwrap();
        assert_eq!(written, vec!["helper", "tool"]);
        assert_eq!(fs::read(target.path().join("tool")).unwrap(), b"tool-bytes");
        assert_eq!(
            fs::read(target.path().join("helper")).unwrap(),
            b"helper-bytes"
        );
        assert!(!target.path().join("doc.txt").exists());
    }

    #[test]
    fn test_extracted_files_are_executable() {
        let tar_bytes = build_tar(&[("tool", b"payload")]);
        let target = tempfile::tempdir().unwrap();

        extract_named_from_reader(&tar_bytes[..], "tool", &[], target.path()).unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(target.path().join("tool"))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn test_no_match_writes_nothing() {
        let tar_bytes = build_tar(&[("pkg/other", b"bytes")]);
        let target = tempfile::tempdir().unwrap();

        let written =
            extract_named_from_reader(&tar_bytes[..], "tool", &[], target.path()).unwrap();
        assert!(written.is_empty());
        assert!(fs::read_dir(target.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_gzip_round_trip() {
        let tar_bytes = build_tar(&[("dist/tool", b"compressed payload")]);
        let gz = gzip(&tar_bytes);
        let target = tempfile::tempdir().unwrap();

        let written =
            extract_named_from_reader(GzDecoder::new(&gz[..]), "tool", &[], target.path())
                .unwrap();
        assert_eq!(written, vec!["tool"]);
        assert_eq!(
            fs::read(target.path().join("tool")).unwrap(),
            b"compressed payload"
        );
    }
}
