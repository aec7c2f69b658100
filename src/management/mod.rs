mod artists;
mod credentials;
mod output;

pub use artists::ArtistStore;
pub use credentials::CredentialPool;
pub use credentials::Credentials;
pub use output::RunPaths;
pub use output::TableSink;
pub use output::write_error_table;
