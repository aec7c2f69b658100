use std::{path::Path, sync::Arc};

use reqwest::Client;
use tokio::sync::mpsc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use kexcli::{
    extract::worker::{WorkerContext, run_popularity_worker, run_worker},
    management::{CredentialPool, TableSink},
    types::{AlbumRow, ErrorRow, Token, TrackRow},
};

fn test_token() -> Token {
    Token {
        access_token: "test-token".to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 3600,
    }
}

fn album_json(id: &str, name: &str, artist: (&str, &str)) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "external_urls": { "spotify": format!("https://open.spotify.com/album/{id}") },
        "images": [{ "url": format!("https://i.scdn.co/image/{id}"), "height": 640, "width": 640 }],
        "release_date": "2024-04-12",
        "total_tracks": 2,
        "artists": [{ "id": artist.0, "name": artist.1 }],
    })
}

fn track_json(id: &str, name: &str, number: u32, artist: (&str, &str)) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "external_urls": { "spotify": format!("https://open.spotify.com/track/{id}") },
        "track_number": number,
        "artists": [{ "id": artist.0, "name": artist.1 }],
    })
}

fn page(items: Vec<serde_json::Value>, total: u64) -> serde_json::Value {
    serde_json::json!({ "items": items, "total": total })
}

// Full feature body; `valence` is attached only when given so tests can
// exercise the absent-field path.
fn features_json(track_id: &str, valence: Option<f64>) -> serde_json::Value {
    let mut body = serde_json::json!({
        "acousticness": 0.1,
        "analysis_url": format!("https://api.spotify.com/v1/audio-analysis/{track_id}"),
        "danceability": 0.8,
        "duration_ms": 200_000,
        "energy": 0.9,
        "instrumentalness": 0.0,
        "liveness": 0.12,
        "loudness": -4.5,
        "mode": 1,
        "speechiness": 0.05,
        "tempo": 120.0,
        "time_signature": 4,
        "track_href": format!("https://api.spotify.com/v1/tracks/{track_id}"),
    });
    if let Some(value) = valence {
        body["valence"] = serde_json::json!(value);
    }
    body
}

struct Harness {
    ctx: WorkerContext,
    album_sink: TableSink<AlbumRow>,
    track_sink: TableSink<TrackRow>,
    done_rx: mpsc::UnboundedReceiver<String>,
    err_rx: mpsc::UnboundedReceiver<ErrorRow>,
}

fn harness(dir: &Path, api_base: &str) -> Harness {
    let album_sink =
        TableSink::<AlbumRow>::create(&dir.join("albums.csv"), &AlbumRow::HEADERS).unwrap();
    let track_sink =
        TableSink::<TrackRow>::create(&dir.join("tracks.csv"), &TrackRow::HEADERS).unwrap();
    let (done_tx, done_rx) = mpsc::unbounded_channel();
    let (err_tx, err_rx) = mpsc::unbounded_channel();

    let ctx = WorkerContext {
        client: Client::new(),
        api_base: api_base.to_string(),
        pool: Arc::new(CredentialPool::new(vec![test_token()])),
        album_tx: album_sink.sender(),
        track_tx: track_sink.sender(),
        done_tx,
        err_tx,
    };

    Harness {
        ctx,
        album_sink,
        track_sink,
        done_rx,
        err_rx,
    }
}

fn drain<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Vec<T> {
    let mut drained = Vec::new();
    while let Ok(item) = rx.try_recv() {
        drained.push(item);
    }
    drained
}

fn read_rows<R: serde::de::DeserializeOwned>(path: &Path) -> Vec<R> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader.deserialize().map(|row| row.unwrap()).collect()
}

#[tokio::test]
async fn mismatched_album_is_skipped_and_later_artist_still_lands() {
    let server = MockServer::start().await;

    // A1's only album is a cross-listing whose primary artist is A2, so A1
    // contributes nothing to either table.
    Mock::given(method("GET"))
        .and(path("/artists/A1/albums"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![album_json("alb-cross", "Shared Compilation", ("A2", "Artist Two"))],
            1,
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/artists/A2/albums"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![album_json("alb-a2", "Own Album", ("A2", "Artist Two"))],
            1,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/albums/alb-a2/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![
                track_json("t1", "Opening", 1, ("A2", "Artist Two")),
                track_json("t2", "Closing", 2, ("A2", "Artist Two")),
            ],
            2,
        )))
        .mount(&server)
        .await;
    for track in ["t1", "t2"] {
        Mock::given(method("GET"))
            .and(path(format!("/audio-features/{track}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(features_json(track, Some(0.5))),
            )
            .mount(&server)
            .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let mut h = harness(dir.path(), &server.uri());

    run_worker(
        h.ctx,
        vec![
            ("A1".to_string(), "Artist One".to_string()),
            ("A2".to_string(), "Artist Two".to_string()),
        ],
    )
    .await;

    // Both artists complete, in slice order, and the skip is not an error
    assert_eq!(drain(&mut h.done_rx), vec!["A1", "A2"]);
    assert!(drain(&mut h.err_rx).is_empty());

    assert_eq!(h.album_sink.finish().await.unwrap(), 1);
    assert_eq!(h.track_sink.finish().await.unwrap(), 2);

    let albums: Vec<AlbumRow> = read_rows(&dir.path().join("albums.csv"));
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].id, "alb-a2");
    assert_eq!(albums[0].artist_id, "A2");

    let tracks: Vec<TrackRow> = read_rows(&dir.path().join("tracks.csv"));
    assert_eq!(tracks.len(), 2);
    assert!(tracks.iter().all(|row| row.album_id == "alb-a2"));
    assert!(tracks.iter().all(|row| row.artist_id == "A2"));
}

#[tokio::test]
async fn missing_valence_stays_absent_in_the_written_row() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/artists/B1/albums"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![album_json("alb-b", "Moody", ("B1", "Artist B"))],
            1,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/albums/alb-b/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![track_json("tr-b", "No Valence", 1, ("B1", "Artist B"))],
            1,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/audio-features/tr-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(features_json("tr-b", None)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut h = harness(dir.path(), &server.uri());

    run_worker(h.ctx, vec![("B1".to_string(), "Artist B".to_string())]).await;

    assert_eq!(drain(&mut h.done_rx), vec!["B1"]);
    h.album_sink.finish().await.unwrap();
    h.track_sink.finish().await.unwrap();

    let tracks: Vec<TrackRow> = read_rows(&dir.path().join("tracks.csv"));
    assert_eq!(tracks.len(), 1);
    let row = &tracks[0];

    // The missing field stays empty; nothing backfills a zero
    assert_eq!(row.valence, None);

    // Every other feature field came through from the response
    assert_eq!(row.acousticness, Some(0.1));
    assert_eq!(row.danceability, Some(0.8));
    assert_eq!(row.duration_ms, Some(200_000));
    assert_eq!(row.energy, Some(0.9));
    assert_eq!(row.instrumentalness, Some(0.0));
    assert_eq!(row.liveness, Some(0.12));
    assert_eq!(row.loudness, Some(-4.5));
    assert_eq!(row.mode, Some(1));
    assert_eq!(row.speechiness, Some(0.05));
    assert_eq!(row.tempo, Some(120.0));
    assert_eq!(row.time_signature, Some(4));
    assert_eq!(
        row.analysis_url.as_deref(),
        Some("https://api.spotify.com/v1/audio-analysis/tr-b")
    );
}

#[tokio::test]
async fn failed_track_listing_records_error_but_keeps_album_row() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/artists/C1/albums"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![album_json("alb-c", "Unlistable", ("C1", "Artist C"))],
            1,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/albums/alb-c/tracks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("listing broke"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut h = harness(dir.path(), &server.uri());

    run_worker(h.ctx, vec![("C1".to_string(), "Artist C".to_string())]).await;

    // The artist still completes; the failure is scoped to the track listing
    assert_eq!(drain(&mut h.done_rx), vec!["C1"]);

    let errors = drain(&mut h.err_rx);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].subject_id, "alb-c");
    assert_eq!(errors[0].stage, "tracks");
    assert!(errors[0].detail.contains("500"));

    assert_eq!(h.album_sink.finish().await.unwrap(), 1);
    assert_eq!(h.track_sink.finish().await.unwrap(), 0);
}

#[tokio::test]
async fn popularity_worker_appends_column_and_keeps_failed_rows() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tracks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "t1",
            "popularity": 87,
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tracks/t2"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("popularity.csv");
    let sink = TableSink::<Vec<String>>::create(&out, &["id", "name", "popularity"]).unwrap();
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let (err_tx, mut err_rx) = mpsc::unbounded_channel();

    run_popularity_worker(
        Client::new(),
        server.uri(),
        Arc::new(CredentialPool::new(vec![test_token()])),
        sink.sender(),
        done_tx,
        err_tx,
        vec![
            vec!["t1".to_string(), "Song One".to_string()],
            vec!["t2".to_string(), "Song Two".to_string()],
        ],
    )
    .await;

    // Every record is forwarded, fetched or not
    assert_eq!(drain(&mut done_rx), vec!["t1", "t2"]);
    let errors = drain(&mut err_rx);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].subject_id, "t2");
    assert_eq!(errors[0].stage, "track-detail");

    assert_eq!(sink.finish().await.unwrap(), 2);
    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        content,
        "id,name,popularity\nt1,Song One,87\nt2,Song Two,\n"
    );
}
