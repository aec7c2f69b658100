use std::{
    fs::File,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    config,
    error::{ExtractError, Result},
    types::ErrorRow,
    utils,
};

const SINK_QUEUE_DEPTH: usize = 256;

pub struct RunPaths {
    data_dir: PathBuf,
    error_dir: PathBuf,
}

impl RunPaths {
    pub fn new(data_root: impl Into<PathBuf>, error_root: impl Into<PathBuf>, stamp: &str) -> Self {
        Self {
            data_dir: data_root.into().join(stamp),
            error_dir: error_root.into().join(stamp),
        }
    }

    pub fn for_today() -> Self {
        Self::new(config::data_dir(), config::error_dir(), &utils::today_stamp())
    }

    pub fn artist_table(&self) -> PathBuf {
        self.data_dir.join("kpop_artist_data.csv")
    }

    pub fn album_table(&self) -> PathBuf {
        self.data_dir.join("kpop_artist_album_data.csv")
    }

    pub fn track_table(&self) -> PathBuf {
        self.data_dir.join("kpop_artist_album_track_data.csv")
    }

    pub fn popularity_table(&self) -> PathBuf {
        self.data_dir.join("kpop_track_popularity_data.csv")
    }

    pub fn error_table(&self) -> PathBuf {
        self.error_dir.join("extract_errors.csv")
    }
}

pub struct TableSink<R> {
    tx: mpsc::Sender<R>,
    handle: JoinHandle<Result<u64>>,
}

impl<R: Serialize + Send + 'static> TableSink<R> {
    /// Truncates `path`, writes the header row, and spawns the one task that
    /// owns the file handle from here on. Rows from any number of workers
    /// funnel through the bounded channel.
    pub fn create(path: &Path, headers: &[&str]) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(headers)?;
        writer.flush()?;

        let (tx, mut rx) = mpsc::channel::<R>(SINK_QUEUE_DEPTH);
        let handle = tokio::spawn(async move {
            let mut written = 0u64;
            while let Some(row) = rx.recv().await {
                writer.serialize(row)?;
                written += 1;
            }
            writer.flush()?;
            Ok(written)
        });

        Ok(Self { tx, handle })
    }

    pub fn sender(&self) -> mpsc::Sender<R> {
        self.tx.clone()
    }

    /// Closes the channel and waits for the writer to drain. Returns the
    /// number of rows written after the header.
    pub async fn finish(self) -> Result<u64> {
        drop(self.tx);
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(_) => Err(ExtractError::SinkClosed("table writer task")),
        }
    }
}

/// Written once at the end of a run, and only when there is something to
/// report. A run with no failures leaves no error table behind.
pub fn write_error_table(path: &Path, rows: &[ErrorRow]) -> Result<u64> {
    if rows.is_empty() {
        return Ok(0);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(ErrorRow::HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(rows.len() as u64)
}
