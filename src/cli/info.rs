use std::path::Path;

use tabled::Table;

use crate::{
    info,
    management::{Credentials, RunPaths},
    types::TableInfoRow,
    utils, warning,
};

/// Displays where today's output tables live and how full they are.
///
/// Tables that do not exist yet show a `-` row count; a table that exists
/// but cannot be read shows `?`. The credential pool size is reported last
/// so a misconfigured pool is visible before a long run.
pub async fn info() {
    let paths = RunPaths::for_today();
    info!("Output tables for {}:", utils::today_stamp());

    let rows: Vec<TableInfoRow> = [
        ("artists", paths.artist_table()),
        ("albums", paths.album_table()),
        ("tracks", paths.track_table()),
        ("popularity", paths.popularity_table()),
        ("errors", paths.error_table()),
    ]
    .into_iter()
    .map(|(table, path)| TableInfoRow {
        table: table.to_string(),
        path: path.display().to_string(),
        rows: count_rows(&path),
    })
    .collect();

    let table = Table::new(rows);
    println!("{}", table);

    match Credentials::load().await {
        Ok(credentials) => info!(
            "{} pool credential(s) configured (plus the primary pair).",
            credentials.pool.len()
        ),
        Err(e) => warning!("Cannot load credentials. Err: {}", e),
    }
}

fn count_rows(path: &Path) -> String {
    if !path.is_file() {
        return "-".to_string();
    }

    match csv::Reader::from_path(path) {
        Ok(mut reader) => reader.records().count().to_string(),
        Err(_) => "?".to_string(),
    }
}
