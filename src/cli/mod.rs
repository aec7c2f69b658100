//! # CLI Module
//!
//! This module provides the command-line interface layer for Kexcli, a
//! Spotify API client that extracts the K-pop artist, album, and track
//! catalog into CSV tables. It implements all user-facing CLI commands and
//! coordinates between the API layer, the extraction pipeline, and the
//! on-disk output tables.
//!
//! ## Overview
//!
//! The CLI module is the boundary between users and the extraction
//! machinery. It provides a small set of commands for:
//!
//! - **Credential Checks**: Verifying that every configured pair can
//!   authenticate before a long run is started
//! - **Artist Management**: Discovering, persisting, and listing the K-pop
//!   artist table that seeds extraction
//! - **Catalog Extraction**: Running the full albums/tracks/features pass
//! - **Popularity Backfill**: Appending track popularity to a finished run
//! - **Information Queries**: Table locations, row counts, and configuration
//!
//! ## Command Categories
//!
//! ### Credentials
//!
//! - [`auth`] - Exchanges every configured credential for a token and
//!   reports which pairs work, with client ids masked
//!
//! ### Artist Operations
//!
//! - [`update_artists`] - Runs the genre-search discovery pass and persists
//!   today's artist table
//! - [`list_artists`] - Displays the artist table with optional search
//!   filtering
//!
//! ### Extraction Operations
//!
//! - [`extract`] - Runs the full extraction into today's dated output
//!   directory
//! - [`popularity`] - Re-reads the track table and appends a popularity
//!   column per track
//!
//! ### Information Commands
//!
//! - [`info`] - Shows each output table's path and row count plus the
//!   configured credential pool size
//!
//! ## Architecture Design
//!
//! The CLI module follows a layered architecture approach:
//!
//! ```text
//! CLI Layer (User Interface)
//!     ↓
//! Extraction Layer (Driver, Workers)
//!     ↓
//! Management Layer (Credentials, Tables)
//!     ↓
//! API Layer (Spotify Integration)
//!     ↓
//! Network Layer (HTTP Requests)
//! ```
//!
//! Each CLI command delegates to the pipeline and management modules while
//! handling user interaction, progress feedback, and error presentation.
//!
//! ## Error Handling Philosophy
//!
//! The CLI implements user-friendly error handling:
//!
//! - **Graceful Degradation**: A run with per-artist failures still
//!   completes and exits successfully; failures land in the error table
//! - **Helpful Messages**: Missing prerequisites point at the command that
//!   produces them
//! - **Hard Stops Only When Hopeless**: Only unusable configuration or zero
//!   working credentials abort with a non-zero exit
//!
//! ## Usage Patterns
//!
//! ### Initial Setup
//! ```bash
//! kexcli auth                      # Verify configured credentials
//! kexcli artists update            # Discover and persist the artist table
//! ```
//!
//! ### Extraction
//! ```bash
//! kexcli extract                   # Full catalog extraction, 20 workers
//! kexcli extract --workers 4 --take 10   # Small sanity run
//! kexcli popularity                # Append popularity to today's tracks
//! ```
//!
//! ### Queries
//! ```bash
//! kexcli artists --search dream    # Find artists in today's table
//! kexcli info                      # Table paths, row counts, credentials
//! ```

mod artists;
mod auth;
mod extract;
mod info;
mod popularity;

pub use artists::list_artists;
pub use artists::update_artists;
pub use auth::auth;
pub use extract::extract;
pub use info::info;
pub use popularity::popularity;
