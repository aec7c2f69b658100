use std::sync::Arc;

use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    error::{ExtractError, Stage},
    management::CredentialPool,
    spotify::{albums, tracks},
    types::{AlbumItem, AlbumRow, AudioFeatures, ErrorRow, TrackRow},
};

/// Everything one worker needs, bundled so spawning a slice is one clone.
#[derive(Clone)]
pub struct WorkerContext {
    pub client: Client,
    pub api_base: String,
    pub pool: Arc<CredentialPool>,
    pub album_tx: mpsc::Sender<AlbumRow>,
    pub track_tx: mpsc::Sender<TrackRow>,
    pub done_tx: mpsc::UnboundedSender<String>,
    pub err_tx: mpsc::UnboundedSender<ErrorRow>,
}

/// Processes one slice of the artist list, strictly in order.
///
/// Each artist holds one pool token for its whole expansion and returns it
/// before the next artist starts. A failed artist becomes an error row and
/// the worker moves on; only a closed row sink stops the slice early, since
/// without writers there is nowhere left to put results.
pub async fn run_worker(ctx: WorkerContext, slice: Vec<(String, String)>) {
    for (artist_id, artist_name) in slice {
        let token = ctx.pool.acquire().await;
        let outcome = expand_artist(&ctx, &token.access_token, &artist_id, &artist_name).await;
        ctx.pool.release(token).await;

        match outcome {
            Ok(()) => {
                let _ = ctx.done_tx.send(artist_id);
            }
            Err(ExtractError::SinkClosed(sink)) => {
                warn!(artist = %artist_id, sink, "row sink closed, stopping worker");
                break;
            }
            Err(error) => {
                let _ = ctx
                    .err_tx
                    .send(ErrorRow::from_error(&artist_id, Stage::Artist, &error));
            }
        }
    }
}

/// Expands one artist: albums, then per album its tracks and features.
///
/// Albums whose primary artist is someone else are cross-listings
/// (compilations, features) and are skipped outright. Rate-limit exhaustion
/// on the album listing keeps whatever albums were already processed; any
/// other listing failure fails the artist.
async fn expand_artist(
    ctx: &WorkerContext,
    token: &str,
    artist_id: &str,
    artist_name: &str,
) -> Result<(), ExtractError> {
    let mut pager = albums::album_pager(&ctx.api_base, artist_id);

    loop {
        let albums = match pager.next_page(&ctx.client, token).await {
            Ok(Some(albums)) => albums,
            Ok(None) => break,
            Err(error) if error.is_retries_exhausted() => {
                warn!(artist = %artist_id, %error, "album listing abandoned");
                break;
            }
            Err(error) => return Err(error),
        };

        for album in albums {
            if album.primary_artist_id() != Some(artist_id) {
                debug!(album = %album.id, artist = %artist_id, "skipping cross-listed album");
                continue;
            }

            process_album(ctx, token, artist_id, artist_name, &album).await?;
        }
    }

    Ok(())
}

/// Walks one album's track listing, emitting a track row per track and the
/// album row once its tracks are done.
///
/// Failures stay local to what failed: a dead track listing or feature fetch
/// becomes an error row and the album row is still emitted, covering the
/// tracks that did make it out. Only sink loss propagates.
async fn process_album(
    ctx: &WorkerContext,
    token: &str,
    artist_id: &str,
    artist_name: &str,
    album: &AlbumItem,
) -> Result<(), ExtractError> {
    let mut pager = tracks::track_pager(&ctx.api_base, &album.id);

    'pages: loop {
        let page = match pager.next_page(&ctx.client, token).await {
            Ok(Some(page)) => page,
            Ok(None) => break,
            Err(error) if error.is_retries_exhausted() => {
                warn!(album = %album.id, %error, "track listing abandoned");
                break;
            }
            Err(error) => {
                let _ = ctx
                    .err_tx
                    .send(ErrorRow::from_error(&album.id, Stage::Tracks, &error));
                break;
            }
        };

        for track in page {
            let features = match tracks::fetch_audio_features(
                &ctx.client,
                &ctx.api_base,
                token,
                &track.id,
            )
            .await
            {
                Ok(features) => features,
                Err(error) if error.is_retries_exhausted() => {
                    warn!(track = %track.id, %error, "feature fetch abandoned");
                    AudioFeatures::absent()
                }
                Err(error @ ExtractError::Status { .. }) => {
                    let _ = ctx
                        .err_tx
                        .send(ErrorRow::from_error(&track.id, Stage::Features, &error));
                    AudioFeatures::absent()
                }
                Err(error) => {
                    let _ = ctx
                        .err_tx
                        .send(ErrorRow::from_error(&album.id, Stage::Features, &error));
                    break 'pages;
                }
            };

            // The row credits the track's own lead artist; the expanded
            // artist only steps in when the listing has no credits at all.
            let row = TrackRow::new(&track, features, artist_id, artist_name, &album.id);
            ctx.track_tx
                .send(row)
                .await
                .map_err(|_| ExtractError::SinkClosed("track table"))?;
        }
    }

    let row = AlbumRow::from_item(album, artist_id, artist_name);
    ctx.album_tx
        .send(row)
        .await
        .map_err(|_| ExtractError::SinkClosed("album table"))?;

    Ok(())
}

/// Appends a popularity column to track records read back from the main run.
///
/// One pool token covers the whole slice. Every record is forwarded whether
/// or not its popularity fetch succeeded; a failed fetch leaves the column
/// empty and, unless it was rate-limit exhaustion, records an error row.
pub async fn run_popularity_worker(
    client: Client,
    api_base: String,
    pool: Arc<CredentialPool>,
    out_tx: mpsc::Sender<Vec<String>>,
    done_tx: mpsc::UnboundedSender<String>,
    err_tx: mpsc::UnboundedSender<ErrorRow>,
    slice: Vec<Vec<String>>,
) {
    let token = pool.acquire().await;

    for mut record in slice {
        let track_id = record.first().cloned().unwrap_or_default();

        let popularity = match tracks::fetch_track_detail(
            &client,
            &api_base,
            &token.access_token,
            &track_id,
        )
        .await
        {
            Ok(detail) => detail.popularity,
            Err(error) if error.is_retries_exhausted() => {
                warn!(track = %track_id, %error, "popularity fetch abandoned");
                None
            }
            Err(error) => {
                let _ = err_tx.send(ErrorRow::from_error(&track_id, Stage::TrackDetail, &error));
                None
            }
        };

        record.push(popularity.map(|value| value.to_string()).unwrap_or_default());
        if out_tx.send(record).await.is_err() {
            warn!(track = %track_id, "popularity sink closed, stopping worker");
            break;
        }
        let _ = done_tx.send(track_id);
    }

    pool.release(token).await;
}
