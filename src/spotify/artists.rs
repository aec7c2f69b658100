use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tracing::debug;

use crate::{
    error::{ExtractError, Stage},
    spotify::pager::Pager,
    types::{ArtistRow, SearchArtistsResponse},
    utils,
};

/// Search query used for the one-time discovery pass.
pub const SEARCH_QUERY: &str = "genre:K-pop";

/// Outcome of the discovery pass.
///
/// Discovery never fails outright: a page that cannot be fetched ends the
/// scan, and everything gathered up to that point is still returned together
/// with the failure so the caller can decide how loudly to report it.
pub struct Discovery {
    /// Artists that passed the genre allow-list, in search order.
    pub rows: Vec<ArtistRow>,
    /// Search results inspected, matching or not.
    pub scanned: u64,
    /// The error that ended the scan early, if any.
    pub failure: Option<ExtractError>,
}

/// Scans the artist search for K-pop acts and filters them by genre.
///
/// Pages through `GET /search` with the `genre:K-pop` query and keeps only
/// artists carrying at least one recognized K-pop genre tag, since the
/// search also surfaces adjacent acts that merely mention the genre. Matched
/// artists are converted to table rows in the order the search returns them.
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `base` - Base URL of the catalog API
/// * `token` - Bearer token; discovery always uses the primary credential
///
/// # Progress Feedback
///
/// A spinner reports scanned/kept counts while the walk is running and is
/// cleared before the function returns.
pub async fn discover_kpop_artists(client: &Client, base: &str, token: &str) -> Discovery {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Searching for K-pop artists...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let mut pager = Pager::<SearchArtistsResponse>::new(
        format!("{base}/search"),
        Stage::Discovery,
        "artist-search",
    )
    .with_query("q", SEARCH_QUERY)
    .with_query("type", "artist");

    let mut rows: Vec<ArtistRow> = Vec::new();
    let mut scanned = 0u64;
    let mut failure = None;

    loop {
        match pager.next_page(client, token).await {
            Ok(Some(items)) => {
                for item in items {
                    scanned += 1;
                    if utils::has_kpop_genre(&item.genres) {
                        debug!(artist = %item.name, "genre match");
                        rows.push(ArtistRow::from_item(&item));
                    }
                }
                pb.set_message(format!(
                    "Scanned {scanned}/{total} artists, kept {kept}...",
                    total = pager.total().unwrap_or(0),
                    kept = rows.len()
                ));
            }
            Ok(None) => break,
            Err(error) => {
                failure = Some(error);
                break;
            }
        }
    }

    pb.finish_and_clear();
    Discovery {
        rows,
        scanned,
        failure,
    }
}
