use crate::models::{AssetFormat, ReleaseAsset};

// Token lists are ordered from least desirable to most desirable. The empty
// string is the weakest rung: a name with no explicit marker still matches
// at the lowest strength and loses to any name carrying a real token.
const AMD64_TOKENS: &[&str] = &["", "amd64", "x86_64", "musl"];
const ARM64_TOKENS: &[&str] = &["", "arm", "arm64", "aarch64"];

const OS_DARWIN: &[&str] = &["", "darwin", "macos", "osx"];
const OS_LINUX: &[&str] = &["", "linux"];
const OS_WINDOWS: &[&str] = &["", "windows", "win64", ".exe"];

// Checksum and signature files follow these naming conventions and are
// never selection candidates.
const IGNORED_INFIXES: &[&str] = &[".sha", ".sig", ".asc"];

/// Architecture family: the tokens recognized for the desired architecture,
/// plus every other family's tokens, which disqualify a candidate outright.
struct ArchFamily<'a> {
    desired: Vec<&'a str>,
    rivals: Vec<&'static str>,
}

fn arch_family(arch: &str) -> ArchFamily<'_> {
    match arch {
        "amd64" | "x86_64" => ArchFamily {
            desired: AMD64_TOKENS.to_vec(),
            rivals: ARM64_TOKENS.to_vec(),
        },
        "arm64" | "aarch64" => ArchFamily {
            desired: ARM64_TOKENS.to_vec(),
            rivals: AMD64_TOKENS.to_vec(),
        },
        // Unrecognized architecture: require a literal match, no exclusions
        other => ArchFamily {
            desired: vec![other],
            rivals: Vec::new(),
        },
    }
}

/// Operating-system family: synonyms recognized for the desired OS, plus
/// every other family's tokens, which disqualify a candidate outright. The
/// empty rung makes unmarked names match at lowest strength; the rivals
/// keep an explicitly foreign-OS name from riding on it.
struct OsFamily<'a> {
    synonyms: Vec<&'a str>,
    rivals: Vec<&'static str>,
}

fn os_family(os: &str) -> OsFamily<'_> {
    match os {
        "darwin" | "macos" => OsFamily {
            synonyms: OS_DARWIN.to_vec(),
            rivals: [OS_LINUX, OS_WINDOWS].concat(),
        },
        "linux" => OsFamily {
            synonyms: OS_LINUX.to_vec(),
            rivals: [OS_DARWIN, OS_WINDOWS].concat(),
        },
        "windows" => OsFamily {
            synonyms: OS_WINDOWS.to_vec(),
            rivals: [OS_DARWIN, OS_LINUX].concat(),
        },
        other => OsFamily {
            synonyms: vec!["", other],
            rivals: [OS_DARWIN, OS_LINUX, OS_WINDOWS].concat(),
        },
    }
}

/// Select the single release asset best matching the host architecture and
/// operating system. OS specificity dominates architecture specificity;
/// ties keep the first-seen asset. Returns `None` when nothing qualifies.
pub fn select_asset<'a>(
    assets: &'a [ReleaseAsset],
    arch: &str,
    os: &str,
) -> Option<&'a ReleaseAsset> {
    let arch = arch_family(arch);
    let os = os_family(os);

    let mut candidate: Option<(u8, &ReleaseAsset)> = None;
    for asset in assets {
        let name = asset.name.to_lowercase();
        if IGNORED_INFIXES.iter().any(|infix| name.contains(infix)) {
            continue;
        }
        // Cross-architecture and cross-OS exclusion: any rival token in the
        // name disqualifies it, even if a desired token also matches.
        if arch
            .rivals
            .iter()
            .chain(os.rivals.iter())
            .any(|rival| !rival.is_empty() && name.contains(rival))
        {
            continue;
        }
        let Some(strength) = score_name(&name, &arch.desired, &os.synonyms) else {
            continue;
        };
        match candidate {
            Some((best, _)) if strength <= best => {}
            _ => candidate = Some((strength, asset)),
        }
    }
    candidate.map(|(_, asset)| asset)
}

/// Strength of the best (os, arch) token pair contained in `name`, or
/// `None` when no pair matches at all.
fn score_name(name: &str, desired: &[&str], synonyms: &[&str]) -> Option<u8> {
    let mut best = None;
    for (arch_idx, arch_token) in desired.iter().enumerate() {
        if !name.contains(arch_token) {
            continue;
        }
        for (os_idx, os_token) in synonyms.iter().enumerate() {
            if !name.contains(os_token) {
                continue;
            }
            let strength = ((os_idx as u8) << 4) + arch_idx as u8;
            if best.is_none_or(|b| strength > b) {
                best = Some(strength);
            }
        }
    }
    best
}

/// Container format derived from the asset's filename suffix. Anything
/// without a recognized archive suffix is treated as a raw executable.
pub fn asset_format(asset_name: &str) -> AssetFormat {
    if asset_name.ends_with(".tar.gz") || asset_name.ends_with(".tgz") {
        AssetFormat::GzipTarball
    } else if asset_name.ends_with(".tar") {
        AssetFormat::Tarball
    } else if asset_name.ends_with(".zip") {
        AssetFormat::Zip
    } else {
        AssetFormat::Binary
    }
}
