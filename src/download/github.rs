use crate::models::Release;
use anyhow::{Context, Result};

const API_ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "relget";

/// Query the latest release for `owner/repo`, optionally authenticated.
/// A non-success status or an undecodable body is an error.
pub fn latest_release(repo: &str, token: Option<&str>) -> Result<Release> {
    let api_url = format!("https://api.github.com/repos/{repo}/releases/latest");

    let mut request = ureq::get(&api_url)
        .set("User-Agent", USER_AGENT)
        .set("Accept", API_ACCEPT)
        .set("X-GitHub-Api-Version", API_VERSION);
    if let Some(token) = token {
        request = request.set("Authorization", &format!("token {token}"));
    }

    let response = request
        .call()
        .with_context(|| format!("failed to fetch release info for {repo}"))?;

    if response.status() != 200 {
        return Err(anyhow::anyhow!(
            "release API request for {} failed with status: {}",
            repo,
            response.status()
        ));
    }

    response
        .into_json()
        .with_context(|| format!("failed to parse release JSON for {repo}"))
}
