//! Configuration for the K-pop extraction CLI.
//!
//! Configuration values come from environment variables, optionally seeded
//! from a `.env` file in the platform's local data directory. Required values
//! (API endpoints, the primary credential) panic when missing; operational
//! knobs (output directories, credentials file) fall back to defaults.
//!
//! Resolution order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use dotenv;
use std::{env, path::PathBuf};

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory structure if needed and loads variables from the
/// platform-specific location under `kexcli/.env`:
/// - Linux: `~/.local/share/kexcli/.env`
/// - macOS: `~/Library/Application Support/kexcli/.env`
/// - Windows: `%LOCALAPPDATA%/kexcli/.env`
///
/// Variables already present in the process environment win over file
/// entries.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the `.env`
/// file exists but cannot be parsed. A missing file is an error as well; the
/// build script drops a `.env.example` next to the expected location to copy
/// from.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("kexcli/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(())
}

/// Returns the Spotify Web API base URL.
///
/// Retrieves the `SPOTIFY_API_URL` environment variable, the base for all
/// catalog endpoints (search, albums, tracks, audio features).
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_URL` environment variable is not set.
///
/// # Example
///
/// ```
/// let api_url = spotify_apiurl(); // e.g., "https://api.spotify.com/v1"
/// ```
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").expect("SPOTIFY_API_URL must be set")
}

/// Returns the token issuance URL for the client-credentials flow.
///
/// Retrieves the `SPOTIFY_API_TOKEN_URL` environment variable. Every bearer
/// token used by the extraction workers is obtained by POSTing to this URL.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_TOKEN_URL` environment variable is not set.
///
/// # Example
///
/// ```
/// let token_url = spotify_apitoken_url(); // e.g., "https://accounts.spotify.com/api/token"
/// ```
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").expect("SPOTIFY_API_TOKEN_URL must be set")
}

/// Returns the primary Spotify API client ID.
///
/// Retrieves the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable. The
/// primary credential backs the artist discovery pass and serves as the
/// worker pool fallback when no credentials file is configured.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable is not set.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID").expect("SPOTIFY_API_AUTH_CLIENT_ID must be set")
}

/// Returns the primary Spotify API client secret.
///
/// Retrieves the `SPOTIFY_API_AUTH_CLIENT_SECRET` environment variable,
/// paired with [`spotify_client_id`] for token issuance.
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_CLIENT_SECRET` environment variable is not set.
pub fn spotify_client_secret() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_SECRET").expect("SPOTIFY_API_AUTH_CLIENT_SECRET must be set")
}

/// Returns the path of the worker credentials file.
///
/// Retrieves the `KEXCLI_CREDENTIALS_FILE` environment variable, falling
/// back to `kexcli/credentials.json` in the local data directory. The file
/// holds a JSON list of `{"client_id", "client_secret"}` pairs, one pool
/// slot each.
pub fn credentials_file() -> PathBuf {
    match env::var("KEXCLI_CREDENTIALS_FILE") {
        Ok(path) => PathBuf::from(path),
        Err(_) => {
            let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push("kexcli/credentials.json");
            path
        }
    }
}

/// Returns the root directory for extracted data tables.
///
/// Retrieves the `KEXCLI_DATA_DIR` environment variable, defaulting to
/// `result` relative to the working directory. Each run writes beneath a
/// date-stamped subdirectory of this root.
pub fn data_dir() -> PathBuf {
    PathBuf::from(env::var("KEXCLI_DATA_DIR").unwrap_or_else(|_| String::from("result")))
}

/// Returns the root directory for error tables.
///
/// Retrieves the `KEXCLI_ERROR_DIR` environment variable, defaulting to
/// `errors` relative to the working directory.
pub fn error_dir() -> PathBuf {
    PathBuf::from(env::var("KEXCLI_ERROR_DIR").unwrap_or_else(|_| String::from("errors")))
}
