use crate::{error, extract::driver, success, warning};

pub async fn extract(workers: usize, take: Option<usize>) {
    match driver::run_extract(workers, take).await {
        Ok(report) => {
            success!(
                "Extraction finished: {}/{} artists processed, {} album rows, {} track rows.",
                report.processed,
                report.artist_count,
                report.album_rows,
                report.track_rows
            );
            if let Some(path) = report.error_table {
                warning!(
                    "{} error row(s) recorded at {}.",
                    report.error_rows,
                    path.display()
                );
            }
        }
        Err(e) => {
            error!("Extraction failed. Err: {}", e);
        }
    }
}
