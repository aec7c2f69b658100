use crate::{error, extract::driver, management::RunPaths, success, warning};

pub async fn popularity(workers: usize) {
    let track_table = RunPaths::for_today().track_table();
    if !track_table.is_file() {
        warning!(
            "No track table at {}. Run `kexcli extract` first.",
            track_table.display()
        );
        return;
    }

    match driver::run_popularity(workers).await {
        Ok(report) => {
            success!(
                "Popularity pass finished: {}/{} track record(s) written to {}.",
                report.rows,
                report.track_count,
                report.table.display()
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
            error!("Popularity pass failed. Err: {}", e);
        }
    }
}
