pub mod download;
pub mod merge;
pub mod slack;
pub mod store;
pub mod types;

use crate::sync::slack::{count_reactions, SlackClient};
use crate::sync::types::{Record, SlackFile, SyncError, SyncReport};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const CHANNEL_NAME: &str = "uk-memes";
pub const SITE_DIR: &str = "site";
const MEMES_FILE: &str = "memes.json";
const IMAGES_DIR: &str = "images";

/// One full sequential sync pass against the live API and the `site/`
/// directory.
pub fn run_sync(token: &str) -> Result<SyncReport, SyncError> {
    let mut slack = SlackClient::new(token)?;
    run_sync_with(&mut slack, Path::new(SITE_DIR))
}

/// Fetches the channel history, downloads any missing image assets,
/// merges with the persisted set under `site_dir`, writes it back, and
/// reports counts. Per-file failures are logged and skipped; channel
/// resolution and history failures abort the run.
pub fn run_sync_with(slack: &mut SlackClient, site_dir: &Path) -> Result<SyncReport, SyncError> {
    let memes_path = site_dir.join(MEMES_FILE);
    let images_dir = site_dir.join(IMAGES_DIR);

    let previous = store::load_records(&memes_path);
    let previous_ids = previous.iter().map(|r| r.id.clone()).collect::<HashSet<_>>();
    info!(
        "loaded {} existing records from {}",
        previous.len(),
        memes_path.display()
    );

    info!("looking for #{CHANNEL_NAME}...");
    let channel_id = slack.find_channel(CHANNEL_NAME)?;
    info!("found channel {channel_id}");

    let messages = slack.fetch_all_messages(&channel_id)?;
    info!("total messages upstream: {}", messages.len());

    fs::create_dir_all(&images_dir)
        .map_err(|e| SyncError::Io(format!("mkdir {} failed: {e}", images_dir.display())))?;
    let downloader = download::build_download_client()?;

    let mut fresh = Vec::new();
    let mut new_count = 0usize;
    let mut updated_count = 0usize;

    for message in &messages {
        let image_files = message.files.iter().filter(|f| is_image(f)).collect::<Vec<_>>();
        if image_files.is_empty() {
            continue;
        }

        let artist = match &message.user {
            Some(user) => slack.resolve_user(user),
            None => "unknown".to_string(),
        };
        let reactions = count_reactions(message);
        let date = message_date(&message.ts);

        for file in image_files {
            let id = format!("{}-{}", message.ts, file.id);
            let filename = format!("{}-{}{}", message.ts, file.id, file_extension(file));
            let local_path = images_dir.join(&filename);

            if !local_path.exists() {
                let Some(url) = file
                    .url_private_download
                    .as_deref()
                    .or(file.url_private.as_deref())
                else {
                    warn!("skipping {id}: file has no downloadable url");
                    continue;
                };
                if let Err(err) = download::download_file(&downloader, slack.token(), url, &local_path)
                {
                    warn!(
                        "failed to download {}: {err}",
                        file.name.as_deref().unwrap_or(&id)
                    );
                    continue;
                }
                info!("downloaded {filename}");
            }

            fresh.push(Record {
                id: id.clone(),
                image_url: format!("{IMAGES_DIR}/{filename}"),
                artist: artist.clone(),
                reactions,
                date: date.clone(),
            });

            if previous_ids.contains(&id) {
                updated_count += 1;
            } else {
                new_count += 1;
            }
        }
    }

    let (merged, preserved_count) = merge::merge_records(previous, fresh);
    store::write_records(&memes_path, &merged)?;

    let report = SyncReport {
        new_records: new_count,
        updated_records: updated_count,
        preserved_records: preserved_count,
        total_records: merged.len(),
    };
    info!("{} new records added", report.new_records);
    info!("{} existing records refreshed", report.updated_records);
    info!(
        "{} archived records preserved (no longer upstream)",
        report.preserved_records
    );
    info!(
        "{} total records in {}",
        report.total_records,
        memes_path.display()
    );
    Ok(report)
}

fn is_image(file: &SlackFile) -> bool {
    file.mimetype
        .as_deref()
        .is_some_and(|m| m.starts_with("image/"))
}

/// Local asset extension, taken from the original filename when it has
/// one and defaulting to `.jpg` otherwise.
pub(crate) fn file_extension(file: &SlackFile) -> String {
    Path::new(file.name.as_deref().unwrap_or(""))
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| ".jpg".to_string())
}

/// Converts a Slack `ts` (fractional epoch seconds) to an RFC 3339
/// timestamp. Unparseable values collapse to the epoch rather than
/// failing the message.
pub(crate) fn message_date(ts: &str) -> String {
    let seconds = ts.parse::<f64>().unwrap_or(0.0);
    let millis = (seconds * 1000.0).round() as i64;
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
