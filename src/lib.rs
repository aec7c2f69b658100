//! K-pop Catalog Extraction CLI Library
//!
//! This library implements a batch extraction pipeline that scrapes K-pop
//! artist, album, and track metadata (including per-track audio features)
//! from the Spotify Web API and persists the results as CSV tables. It
//! includes modules for API communication, the concurrent extraction
//! pipeline, CLI operations, and configuration management.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Structured error types for the extraction pipeline
//! - `extract` - Worker partitioning and the extraction driver
//! - `management` - Credential pool, artist table store, output sinks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use kexcli::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> kexcli::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod management;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the CLI and management surface where many error sources meet and
/// a boxed dynamic error is all the caller needs. The pipeline internals use
/// the structured [`error::ExtractError`] instead.
///
/// # Example
///
/// ```
/// use kexcli::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Accepts the same arguments as `println!`. Used for general status output
/// on the interactive console surface; structured run logs go through
/// `tracing` instead.
///
/// # Example
///
/// ```
/// info!("Loaded {} artists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Accepts the same arguments as `println!`. Used to confirm completed
/// operations.
///
/// # Example
///
/// ```
/// success!("Extraction finished: {} artists", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Accepts the same arguments as `println!`, then terminates the process
/// with exit code 1. Only for unrecoverable situations; per-artist
/// extraction failures are recorded and never go through this macro.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Accepts the same arguments as `println!`. Used for recoverable issues
/// worth the user's attention.
///
/// # Example
///
/// ```
/// warning!("Credentials file not found, using the primary credential only");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
