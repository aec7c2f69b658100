use std::{path::PathBuf, sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    config,
    error::{ExtractError, Result},
    extract::worker::{self, WorkerContext},
    info,
    management::{ArtistStore, CredentialPool, Credentials, RunPaths, TableSink, write_error_table},
    spotify::{artists, auth},
    success,
    types::{AlbumRow, ErrorRow, Token, TrackRow},
    utils, warning,
};

/// What a finished extraction run looked like.
pub struct ExtractReport {
    pub artist_count: usize,
    pub processed: u64,
    pub album_rows: u64,
    pub track_rows: u64,
    pub error_rows: u64,
    pub error_table: Option<PathBuf>,
}

/// What a finished popularity pass looked like.
pub struct PopularityReport {
    pub track_count: usize,
    pub rows: u64,
    pub error_rows: u64,
    pub error_table: Option<PathBuf>,
    pub table: PathBuf,
}

/// Runs the full extraction: artist list, then albums, tracks, and features
/// fanned out over `workers` slices.
///
/// Today's artist table is reused when it exists, otherwise the discovery
/// search runs first and persists one. The album and track tables are
/// truncated and re-headered before any worker starts, and each is owned by
/// a single writer task for the whole run. The error table is written only
/// if at least one error row accumulated.
pub async fn run_extract(workers: usize, take: Option<usize>) -> Result<ExtractReport> {
    let client = Client::new();
    let api_base = config::spotify_apiurl();
    let token_url = config::spotify_apitoken_url();

    let credentials = Credentials::load().await?;
    let paths = RunPaths::for_today();
    let store = ArtistStore::new(paths.artist_table());

    let mut artist_list: Vec<(String, String)> = if store.exists() {
        info!(
            "Using today's artist table at {path}.",
            path = store.path().display()
        );
        store
            .load()?
            .into_iter()
            .map(|row| (row.id, row.name))
            .collect()
    } else {
        let token = auth::request_token(&client, &token_url, &credentials.primary).await?;
        let discovery = artists::discover_kpop_artists(&client, &api_base, &token.access_token).await;
        store.persist(&discovery.rows)?;
        if let Some(error) = discovery.failure {
            // A rejected search page leaves a usable partial list; anything
            // else during discovery means the run has no list to work with.
            match error {
                ExtractError::Status { .. } => {
                    warning!("Artist discovery ended early: {error}. Continuing with a partial list.");
                }
                error => return Err(error),
            }
        }
        success!(
            "Discovered {kept} K-pop artists out of {scanned} scanned.",
            kept = discovery.rows.len(),
            scanned = discovery.scanned
        );
        discovery
            .rows
            .into_iter()
            .map(|row| (row.id, row.name))
            .collect()
    };

    if let Some(limit) = take {
        artist_list.truncate(limit);
    }

    let tokens = issue_pool_tokens(&client, &token_url, &credentials).await?;
    info!("Credential pool ready with {count} token(s).", count = tokens.len());

    let album_sink = TableSink::<AlbumRow>::create(&paths.album_table(), &AlbumRow::HEADERS)?;
    let track_sink = TableSink::<TrackRow>::create(&paths.track_table(), &TrackRow::HEADERS)?;

    let pool = Arc::new(CredentialPool::new(tokens));
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<String>();
    let (err_tx, mut err_rx) = mpsc::unbounded_channel::<ErrorRow>();

    let ctx = WorkerContext {
        client,
        api_base,
        pool,
        album_tx: album_sink.sender(),
        track_tx: track_sink.sender(),
        done_tx,
        err_tx,
    };

    let slices = utils::partition_slices(artist_list.len(), workers);
    let mut handles = Vec::with_capacity(slices.len());
    for range in slices {
        let slice = artist_list[range].to_vec();
        handles.push(tokio::spawn(worker::run_worker(ctx.clone(), slice)));
    }
    // Workers hold the only live senders from here on.
    drop(ctx);

    let total = artist_list.len();
    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Processing 0/{total} artists..."));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let mut processed = 0u64;
    let mut errors: Vec<ErrorRow> = Vec::new();
    let mut done_open = true;
    let mut err_open = true;
    while done_open || err_open {
        tokio::select! {
            maybe_done = done_rx.recv(), if done_open => match maybe_done {
                Some(artist_id) => {
                    processed += 1;
                    debug!(artist = %artist_id, "artist complete");
                    pb.set_message(format!(
                        "Processing {processed}/{total} artists ({failed} failed)...",
                        failed = errors.len()
                    ));
                }
                None => done_open = false,
            },
            maybe_err = err_rx.recv(), if err_open => match maybe_err {
                Some(row) => {
                    errors.push(row);
                    pb.set_message(format!(
                        "Processing {processed}/{total} artists ({failed} failed)...",
                        failed = errors.len()
                    ));
                }
                None => err_open = false,
            },
        }
    }

    for handle in handles {
        if handle.await.is_err() {
            warning!("A worker task panicked; its slice may be incomplete.");
        }
    }
    pb.finish_and_clear();

    let album_rows = album_sink.finish().await?;
    let track_rows = track_sink.finish().await?;

    let error_rows = errors.len() as u64;
    let error_table = if errors.is_empty() {
        None
    } else {
        let path = paths.error_table();
        write_error_table(&path, &errors)?;
        Some(path)
    };

    Ok(ExtractReport {
        artist_count: total,
        processed,
        album_rows,
        track_rows,
        error_rows,
        error_table,
    })
}

/// Re-reads the track table and appends a popularity column to every record.
///
/// Same pool, partitioning, and single-writer discipline as the main run,
/// with one token held per worker for its whole slice. Records whose fetch
/// fails keep an empty popularity column so no track is dropped.
pub async fn run_popularity(workers: usize) -> Result<PopularityReport> {
    let client = Client::new();
    let api_base = config::spotify_apiurl();
    let token_url = config::spotify_apitoken_url();

    let credentials = Credentials::load().await?;
    let paths = RunPaths::for_today();

    let mut reader = csv::Reader::from_path(paths.track_table())?;
    let mut records: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_string).collect());
    }
    info!("Read {count} track record(s) for the popularity pass.", count = records.len());

    let tokens = issue_pool_tokens(&client, &token_url, &credentials).await?;
    info!("Credential pool ready with {count} token(s).", count = tokens.len());

    let header: Vec<&str> = TrackRow::HEADERS
        .iter()
        .copied()
        .chain(std::iter::once("popularity"))
        .collect();
    let table = paths.popularity_table();
    let sink = TableSink::<Vec<String>>::create(&table, &header)?;

    let pool = Arc::new(CredentialPool::new(tokens));
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<String>();
    let (err_tx, mut err_rx) = mpsc::unbounded_channel::<ErrorRow>();

    let slices = utils::partition_slices(records.len(), workers);
    let mut handles = Vec::with_capacity(slices.len());
    for range in slices {
        let slice = records[range].to_vec();
        handles.push(tokio::spawn(worker::run_popularity_worker(
            client.clone(),
            api_base.clone(),
            pool.clone(),
            sink.sender(),
            done_tx.clone(),
            err_tx.clone(),
            slice,
        )));
    }
    drop(done_tx);
    drop(err_tx);

    let total = records.len();
    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Fetching popularity 0/{total}..."));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let mut fetched = 0u64;
    let mut errors: Vec<ErrorRow> = Vec::new();
    let mut done_open = true;
    let mut err_open = true;
    while done_open || err_open {
        tokio::select! {
            maybe_done = done_rx.recv(), if done_open => match maybe_done {
                Some(track_id) => {
                    fetched += 1;
                    debug!(track = %track_id, "popularity fetched");
                    pb.set_message(format!(
                        "Fetching popularity {fetched}/{total} ({failed} failed)...",
                        failed = errors.len()
                    ));
                }
                None => done_open = false,
            },
            maybe_err = err_rx.recv(), if err_open => match maybe_err {
                Some(row) => errors.push(row),
                None => err_open = false,
            },
        }
    }

    for handle in handles {
        if handle.await.is_err() {
            warning!("A popularity worker panicked; its slice may be incomplete.");
        }
    }
    pb.finish_and_clear();

    let rows = sink.finish().await?;

    let error_rows = errors.len() as u64;
    let error_table = if errors.is_empty() {
        None
    } else {
        let path = paths.error_table();
        write_error_table(&path, &errors)?;
        Some(path)
    };

    Ok(PopularityReport {
        track_count: total,
        rows,
        error_rows,
        error_table,
        table,
    })
}

/// Exchanges every pool pair for a bearer token, skipping pairs that fail.
///
/// An empty result is an abort: with zero tokens the pool could never hand
/// one out and every worker would park forever.
async fn issue_pool_tokens(
    client: &Client,
    token_url: &str,
    credentials: &Credentials,
) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    for credential in &credentials.pool {
        match auth::request_token(client, token_url, credential).await {
            Ok(token) => tokens.push(token),
            Err(error) => {
                warning!(
                    "Skipping credential {id}: {error}",
                    id = utils::mask_client_id(&credential.client_id)
                );
            }
        }
    }

    if tokens.is_empty() {
        return Err(ExtractError::TokenRequest {
            client_id: "credential pool".to_string(),
            reason: "no pool credential could be exchanged for a token".to_string(),
        });
    }

    Ok(tokens)
}
