use reqwest::Client;

use crate::{
    error::{ExtractError, Stage},
    spotify::pager::{Pager, get_with_backoff},
    types::{AudioFeatures, Page, TrackDetail, TrackItem},
};

/// Pager over `GET /albums/{id}/tracks`.
pub fn track_pager(base: &str, album_id: &str) -> Pager<Page<TrackItem>> {
    Pager::new(
        format!("{base}/albums/{id}/tracks", id = album_id),
        Stage::Tracks,
        album_id,
    )
}

/// Fetches the audio-feature vector for one track.
///
/// The endpoint omits fields for tracks it no longer analyzes, so the parsed
/// vector may be arbitrarily sparse; [`AudioFeatures`] keeps every field
/// optional and absent values stay absent all the way into the output table.
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `base` - Base URL of the catalog API
/// * `token` - Bearer token
/// * `track_id` - Track to fetch the vector for
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(AudioFeatures)` - The vector, possibly with every field absent
/// - `Err(ExtractError::RetriesExhausted)` - Rate limiting never let up
/// - `Err(ExtractError::Status)` - Non-success status with body preserved
/// - `Err(ExtractError::Network)` - Transport-level failure
pub async fn fetch_audio_features(
    client: &Client,
    base: &str,
    token: &str,
    track_id: &str,
) -> Result<AudioFeatures, ExtractError> {
    let url = format!("{base}/audio-features/{id}", id = track_id);
    let response = get_with_backoff(client, &url, &[], token, Stage::Features, track_id).await?;
    Ok(response.json::<AudioFeatures>().await?)
}

/// Fetches the standalone detail record for one track.
///
/// Only the popularity score is read from the response; everything else the
/// endpoint returns is already in the track table from the main run.
pub async fn fetch_track_detail(
    client: &Client,
    base: &str,
    token: &str,
    track_id: &str,
) -> Result<TrackDetail, ExtractError> {
    let url = format!("{base}/tracks/{id}", id = track_id);
    let response = get_with_backoff(client, &url, &[], token, Stage::TrackDetail, track_id).await?;
    Ok(response.json::<TrackDetail>().await?)
}
