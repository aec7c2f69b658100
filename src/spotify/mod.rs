//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by the
//! extraction pipeline, implementing client-credentials authentication,
//! offset-based pagination, and per-resource data retrieval. It serves as the
//! integration layer between Kexcli and Spotify's services, handling all HTTP
//! communication, error classification, and rate limiting.
//!
//! ## Overview
//!
//! The Spotify module implements the small slice of the Web API that a batch
//! catalog extraction needs: searching for artists by genre, listing an
//! artist's albums, listing an album's tracks, and fetching per-track audio
//! features and popularity. It abstracts away the mechanics of HTTP requests,
//! token headers, and retry timing, so higher layers deal only in typed pages
//! and rows.
//!
//! ## Architecture
//!
//! The module follows a feature-based organization where each submodule
//! handles a specific domain of Spotify API functionality:
//!
//! ```text
//! Application Layer (CLI, Extract Pipeline)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (Client Credentials)
//!     ├── Pagination Engine (offset/limit, retry)
//!     ├── Artist Discovery (genre search, filtering)
//!     ├── Album Listing (artist discography)
//!     └── Track Operations (listing, features, popularity)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - Implements the OAuth 2.0 client-credentials grant:
//! - **Token Issuance**: Exchanges a client id/secret pair for a bearer token
//! - **Basic Authorization**: Encodes credentials per RFC 6749 section 4.4
//! - **No User Context**: Application-level tokens only, no user login flow
//! - **Pool Friendly**: Each configured pair is exchanged independently
//!
//! ### Pagination Module
//!
//! [`pager`] - The shared offset/limit pagination engine:
//! - **Typed Pages**: Deserializes any `items`/`total` envelope into pages
//! - **Immediate Yield**: Each page is handed to the caller before the next
//!   request, so side effects interleave with fetching
//! - **Total Bound**: Walks offsets until the reported `total` is covered
//! - **Rate Limiting**: Bounded retry on 429 honoring `Retry-After`
//!
//! ### Artist Discovery Module
//!
//! [`artists`] - Finds the artists worth extracting:
//! - **Genre Search**: Pages through the `genre:K-pop` search results
//! - **Allow-List Filtering**: Keeps only artists with a recognized genre tag
//! - **Partial Results**: A failed page keeps everything gathered so far
//!
//! ### Album Listing Module
//!
//! [`albums`] - Lists an artist's discography:
//! - **Full Pagination**: Walks every album page for the artist
//! - **Attribution Upstream**: Primary-artist filtering happens in the worker
//!
//! ### Track Operations Module
//!
//! [`tracks`] - Per-album and per-track retrieval:
//! - **Track Listing**: Pages through an album's track list
//! - **Audio Features**: Fetches the per-track feature vector, tolerating
//!   partially-populated responses
//! - **Popularity**: Fetches single-track detail for the popularity pass
//!
//! ## Error Handling Philosophy
//!
//! ### Rate Limiting
//! - **Automatic Retry**: Handles 429 Too Many Requests with server-directed
//!   delays read from the `Retry-After` header
//! - **Bounded Attempts**: Gives up after five attempts on the same request
//! - **Explicit Exhaustion**: Exhaustion is its own error variant so callers
//!   can log-and-continue instead of recording a failure row
//!
//! ### Fetch Failures
//! - **Status Classification**: Any other non-success status is returned with
//!   its stage, subject id, status code, and response body
//! - **Partial Results**: Pagination callers keep the items already fetched
//! - **Network Errors**: Transport failures propagate as a distinct variant
//!
//! ## API Coverage
//!
//! The module covers the following Spotify Web API endpoints:
//!
//! - `GET /search` - Artist search by genre query with pagination
//! - `GET /artists/{id}/albums` - Artist discography with pagination
//! - `GET /albums/{id}/tracks` - Album track listing with pagination
//! - `GET /audio-features/{id}` - Per-track audio-feature vector
//! - `GET /tracks/{id}` - Single-track detail (popularity)
//! - `POST /api/token` - Client-credentials token issuance
//!
//! ## Configuration Integration
//!
//! Base URLs and credentials come from the application's configuration layer
//! and are passed in explicitly; nothing in this module reads the environment
//! directly. That keeps every function testable against a local mock server.
//!
//! ## Dependencies
//!
//! The module relies on several external crates:
//! - **reqwest** - HTTP client with JSON support and async capabilities
//! - **serde** / **serde_json** - Typed deserialization of API envelopes
//! - **base64** - Basic authorization encoding for token issuance
//! - **tokio** - Async runtime, retry sleeps
//! - **indicatif** - Progress feedback during long discovery scans

pub mod albums;
pub mod artists;
pub mod auth;
pub mod pager;
pub mod tracks;
