//! Error types for the extraction pipeline.
//!
//! The pipeline records failures as structured values carrying the subject
//! identifier (artist, album, or track id) and the stage that failed, so an
//! error-table row can be produced without losing context. Retry outcomes
//! are part of the same model: a rate-limited fetch that exhausts its
//! attempts surfaces as [`ExtractError::RetriesExhausted`], distinct from a
//! fatal non-200 status ([`ExtractError::Status`]) and from transport
//! failures, letting callers tell "some data missing, recorded" apart from
//! "complete".

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// The pipeline stage in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Token issuance via the client-credentials flow.
    Auth,
    /// The one-time artist discovery search pass.
    Discovery,
    /// Listing an artist's albums.
    Albums,
    /// Listing an album's tracks.
    Tracks,
    /// Fetching a track's audio-feature vector.
    Features,
    /// Fetching a single track's detail record (popularity pass).
    TrackDetail,
    /// An artist's whole expansion, when no finer stage is known.
    Artist,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Auth => "auth",
            Stage::Discovery => "discovery",
            Stage::Albums => "albums",
            Stage::Tracks => "tracks",
            Stage::Features => "features",
            Stage::TrackDetail => "track-detail",
            Stage::Artist => "artist",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the extraction pipeline.
///
/// Variants that originate from an API exchange carry the stage and the
/// subject identifier the exchange was about; transport and local I/O
/// failures are wrapped as-is and pick up their context at the recording
/// site.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Token issuance failed for one client credential.
    #[error("token request for client {client_id} failed: {reason}")]
    TokenRequest {
        /// The client ID the token was requested for (never the secret).
        client_id: String,
        /// Status or transport description from the token endpoint.
        reason: String,
    },

    /// A fetch returned a non-success status and the resource was abandoned.
    #[error("{stage} fetch for {subject} returned HTTP {status}: {body}")]
    Status {
        /// Stage the fetch belonged to.
        stage: Stage,
        /// Identifier of the resource owner (artist, album, or track id).
        subject: String,
        /// The HTTP status code received.
        status: u16,
        /// Response body text, as received.
        body: String,
    },

    /// A rate-limited fetch used up its retry budget.
    #[error("{stage} fetch for {subject} abandoned after {attempts} rate-limited attempts")]
    RetriesExhausted {
        /// Stage the fetch belonged to.
        stage: Stage,
        /// Identifier of the resource owner.
        subject: String,
        /// Number of attempts made before giving up.
        attempts: u32,
    },

    /// Transport-level failure from the HTTP client.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Local I/O failure (output directories, table files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization failure outside an HTTP exchange.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A row sink's channel closed while producers were still running.
    #[error("output sink for the {0} table closed early")]
    SinkClosed(&'static str),
}

impl ExtractError {
    /// The stage carried by this error, when it has one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ExtractError::TokenRequest { .. } => Some(Stage::Auth),
            ExtractError::Status { stage, .. } => Some(*stage),
            ExtractError::RetriesExhausted { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The subject identifier carried by this error, when it has one.
    pub fn subject(&self) -> Option<&str> {
        match self {
            ExtractError::TokenRequest { client_id, .. } => Some(client_id),
            ExtractError::Status { subject, .. } => Some(subject),
            ExtractError::RetriesExhausted { subject, .. } => Some(subject),
            _ => None,
        }
    }

    /// Whether this error is an exhausted rate-limit retry budget.
    ///
    /// Such failures are logged and skipped rather than recorded as error
    /// rows, matching the retry policy's abandon semantics.
    pub fn is_retries_exhausted(&self) -> bool {
        matches!(self, ExtractError::RetriesExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_carries_stage_and_subject() {
        let err = ExtractError::Status {
            stage: Stage::Tracks,
            subject: "album123".into(),
            status: 404,
            body: "not found".into(),
        };

        assert_eq!(err.stage(), Some(Stage::Tracks));
        assert_eq!(err.subject(), Some("album123"));
        assert!(!err.is_retries_exhausted());
    }

    #[test]
    fn status_display_includes_code_and_body() {
        let err = ExtractError::Status {
            stage: Stage::Albums,
            subject: "artist9".into(),
            status: 503,
            body: "upstream down".into(),
        };

        let msg = err.to_string();
        assert!(msg.contains("albums"));
        assert!(msg.contains("artist9"));
        assert!(msg.contains("503"));
        assert!(msg.contains("upstream down"));
    }

    #[test]
    fn retries_exhausted_is_distinguishable() {
        let err = ExtractError::RetriesExhausted {
            stage: Stage::Features,
            subject: "track7".into(),
            attempts: 5,
        };

        assert!(err.is_retries_exhausted());
        assert_eq!(err.stage(), Some(Stage::Features));
        assert!(err.to_string().contains("5 rate-limited attempts"));
    }

    #[test]
    fn wrapped_errors_have_no_stage_or_subject() {
        let err = ExtractError::Io(std::io::Error::other("disk fail"));

        assert_eq!(err.stage(), None);
        assert_eq!(err.subject(), None);
    }

    #[test]
    fn stage_names_are_stable() {
        assert_eq!(Stage::Auth.as_str(), "auth");
        assert_eq!(Stage::Discovery.as_str(), "discovery");
        assert_eq!(Stage::Albums.as_str(), "albums");
        assert_eq!(Stage::Tracks.as_str(), "tracks");
        assert_eq!(Stage::Features.as_str(), "features");
        assert_eq!(Stage::TrackDetail.as_str(), "track-detail");
        assert_eq!(Stage::Artist.as_str(), "artist");
    }
}
