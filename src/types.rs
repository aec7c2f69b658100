use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientCredential {
    pub client_id: String,
    pub client_secret: String,
}

// Offset/limit paging envelope shared by search, album, and track listings.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchArtistsResponse {
    pub artists: Page<ArtistItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalUrls {
    pub spotify: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Followers {
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistItem {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub external_urls: ExternalUrls,
    pub images: Vec<Image>,
    pub popularity: u32,
    pub followers: Followers,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumItem {
    pub id: String,
    pub name: String,
    pub external_urls: ExternalUrls,
    pub images: Vec<Image>,
    pub release_date: String,
    pub total_tracks: u32,
    pub artists: Vec<AlbumArtist>,
}

impl AlbumItem {
    // The attribution guard compares against this id.
    pub fn primary_artist_id(&self) -> Option<&str> {
        self.artists.first().map(|a| a.id.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackItem {
    pub id: String,
    pub name: String,
    pub external_urls: ExternalUrls,
    pub track_number: u32,
    #[serde(default)]
    pub artists: Vec<AlbumArtist>,
}

/// Audio-feature vector as returned by the feature endpoint.
///
/// Every field is independently optional and defaults to `None`: the
/// endpoint omits fields entirely for some tracks, so deserialization must
/// be total over any JSON object, including `{}`. Absent stays absent all
/// the way to the CSV cell; no field is ever backfilled with a zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioFeatures {
    pub acousticness: Option<f64>,
    pub analysis_url: Option<String>,
    pub danceability: Option<f64>,
    pub duration_ms: Option<u64>,
    pub energy: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub liveness: Option<f64>,
    pub loudness: Option<f64>,
    pub mode: Option<i64>,
    pub speechiness: Option<f64>,
    pub tempo: Option<f64>,
    pub time_signature: Option<i64>,
    pub track_href: Option<String>,
    pub valence: Option<f64>,
}

impl AudioFeatures {
    /// The all-absent vector, used when no feature record could be fetched.
    pub fn absent() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TrackDetail {
    pub popularity: Option<u32>,
}

fn first_image_url(images: &[Image]) -> Option<String> {
    images.first().map(|i| i.url.clone())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRow {
    pub id: String,
    pub name: String,
    pub genre: String,
    pub external_url: String,
    pub image_url: Option<String>,
    pub popularity: u32,
    pub followers: u64,
}

impl ArtistRow {
    pub const HEADERS: [&'static str; 7] = [
        "id",
        "name",
        "genre",
        "external_url",
        "image_url",
        "popularity",
        "followers",
    ];

    pub fn from_item(item: &ArtistItem) -> Self {
        ArtistRow {
            id: item.id.clone(),
            name: item.name.clone(),
            genre: item.genres.join(", "),
            external_url: item.external_urls.spotify.clone(),
            image_url: first_image_url(&item.images),
            popularity: item.popularity,
            followers: item.followers.total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRow {
    pub id: String,
    pub name: String,
    pub external_url: String,
    pub artist_id: String,
    pub artist_name: String,
    pub image_url: Option<String>,
    pub release_date: String,
    pub total_tracks: u32,
}

impl AlbumRow {
    pub const HEADERS: [&'static str; 8] = [
        "id",
        "name",
        "external_url",
        "artist_id",
        "artist_name",
        "image_url",
        "release_date",
        "total_tracks",
    ];

    /// Builds a row from a listed album, preferring the album's own primary
    /// credit for the artist columns over the caller's fallback pair.
    pub fn from_item(item: &AlbumItem, artist_id: &str, artist_name: &str) -> Self {
        let (artist_id, artist_name) = item
            .artists
            .first()
            .map(|artist| (artist.id.as_str(), artist.name.as_str()))
            .unwrap_or((artist_id, artist_name));

        AlbumRow {
            id: item.id.clone(),
            name: item.name.clone(),
            external_url: item.external_urls.spotify.clone(),
            artist_id: artist_id.to_string(),
            artist_name: artist_name.to_string(),
            image_url: first_image_url(&item.images),
            release_date: item.release_date.clone(),
            total_tracks: item.total_tracks,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRow {
    pub id: String,
    pub name: String,
    pub track_href: Option<String>,
    pub external_url: String,
    pub artist_id: String,
    pub artist_name: String,
    pub album_id: String,
    pub track_number: u32,
    pub acousticness: Option<f64>,
    pub analysis_url: Option<String>,
    pub danceability: Option<f64>,
    pub duration_ms: Option<u64>,
    pub energy: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub liveness: Option<f64>,
    pub loudness: Option<f64>,
    pub mode: Option<i64>,
    pub speechiness: Option<f64>,
    pub tempo: Option<f64>,
    pub time_signature: Option<i64>,
    pub valence: Option<f64>,
}

impl TrackRow {
    pub const HEADERS: [&'static str; 21] = [
        "id",
        "name",
        "track_href",
        "external_url",
        "artist_id",
        "artist_name",
        "album_id",
        "track_number",
        "acousticness",
        "analysis_url",
        "danceability",
        "duration_ms",
        "energy",
        "instrumentalness",
        "liveness",
        "loudness",
        "mode",
        "speechiness",
        "tempo",
        "time_signature",
        "valence",
    ];

    /// Builds a row from a listed track and its (possibly absent) features.
    ///
    /// The artist columns follow the track's own first credit; `artist_id`
    /// and `artist_name` only fill in when the listing carries no credits.
    pub fn new(
        track: &TrackItem,
        features: AudioFeatures,
        artist_id: &str,
        artist_name: &str,
        album_id: &str,
    ) -> Self {
        let (artist_id, artist_name) = track
            .artists
            .first()
            .map(|artist| (artist.id.as_str(), artist.name.as_str()))
            .unwrap_or((artist_id, artist_name));

        TrackRow {
            id: track.id.clone(),
            name: track.name.clone(),
            track_href: features.track_href,
            external_url: track.external_urls.spotify.clone(),
            artist_id: artist_id.to_string(),
            artist_name: artist_name.to_string(),
            album_id: album_id.to_string(),
            track_number: track.track_number,
            acousticness: features.acousticness,
            analysis_url: features.analysis_url,
            danceability: features.danceability,
            duration_ms: features.duration_ms,
            energy: features.energy,
            instrumentalness: features.instrumentalness,
            liveness: features.liveness,
            loudness: features.loudness,
            mode: features.mode,
            speechiness: features.speechiness,
            tempo: features.tempo,
            time_signature: features.time_signature,
            valence: features.valence,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRow {
    pub subject_id: String,
    pub stage: String,
    pub detail: String,
}

impl ErrorRow {
    pub const HEADERS: [&'static str; 3] = ["subject_id", "stage", "detail"];

    pub fn new(subject_id: &str, stage: crate::error::Stage, detail: impl Into<String>) -> Self {
        ErrorRow {
            subject_id: subject_id.to_string(),
            stage: stage.as_str().to_string(),
            detail: detail.into(),
        }
    }

    /// Builds a row from a pipeline error, preferring the subject and stage
    /// the error itself carries over the caller's fallbacks.
    pub fn from_error(
        fallback_subject: &str,
        fallback_stage: crate::error::Stage,
        err: &crate::error::ExtractError,
    ) -> Self {
        ErrorRow {
            subject_id: err.subject().unwrap_or(fallback_subject).to_string(),
            stage: err.stage().unwrap_or(fallback_stage).as_str().to_string(),
            detail: err.to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub name: String,
    pub genres: String,
    pub popularity: u32,
    pub followers: u64,
}

#[derive(Tabled)]
pub struct TableInfoRow {
    pub table: String,
    pub path: String,
    pub rows: String,
}
