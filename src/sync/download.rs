use crate::sync::types::SyncError;
use reqwest::blocking::Client;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use std::fs;
use std::path::Path;

pub const MAX_REDIRECT_HOPS: usize = 10;

/// Redirects are handled manually so the bearer token is re-attached on
/// every hop; the stock policy strips sensitive headers across hosts.
pub fn build_download_client() -> Result<Client, SyncError> {
    Ok(Client::builder().redirect(Policy::none()).build()?)
}

/// Fetches `url` to `dest`, following 3xx responses up to
/// `MAX_REDIRECT_HOPS` hops. The body is read in full before the
/// destination is written, so a failed download leaves no partial file.
pub fn download_file(
    client: &Client,
    token: &str,
    url: &str,
    dest: &Path,
) -> Result<(), SyncError> {
    let mut current = url.to_string();
    for _ in 0..MAX_REDIRECT_HOPS {
        let response = client.get(&current).bearer_auth(token).send()?;
        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or(SyncError::Download(status.as_u16()))?;
            current = resolve_location(&current, location);
            continue;
        }
        if !status.is_success() {
            return Err(SyncError::Download(status.as_u16()));
        }

        let bytes = response.bytes()?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SyncError::Io(format!("mkdir {} failed: {e}", parent.display())))?;
        }
        fs::write(dest, &bytes)
            .map_err(|e| SyncError::Io(format!("write {} failed: {e}", dest.display())))?;
        return Ok(());
    }
    Err(SyncError::TooManyRedirects(url.to_string()))
}

fn resolve_location(current: &str, location: &str) -> String {
    if location.starts_with("http://") || location.starts_with("https://") {
        return location.to_string();
    }
    match reqwest::Url::parse(current).and_then(|base| base.join(location)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => location.to_string(),
    }
}
