use std::ops::Range;

use chrono::Utc;

// Genre tags counted as K-pop-adjacent during discovery. Spotify reports
// tags lowercased; matching lowercases the input side as well.
pub const KPOP_GENRES: [&str; 10] = [
    "k-pop",
    "k-pop girl group",
    "k-pop boy group",
    "k-rap",
    "korean r&b",
    "korean pop",
    "korean ost",
    "korean city pop",
    "classic k-pop",
    "korean singer-songwriter",
];

pub fn has_kpop_genre(genres: &[String]) -> bool {
    genres
        .iter()
        .any(|g| KPOP_GENRES.contains(&g.to_lowercase().as_str()))
}

pub fn partition_slices(len: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1); // zero workers degenerates to one slice
    let size = len / workers;

    (0..workers)
        .map(|i| {
            let start = i * size;
            // last slice absorbs the remainder
            let end = if i == workers - 1 { len } else { start + size };
            start..end
        })
        .collect()
}

pub fn mask_client_id(id: &str) -> String {
    if id.len() <= 8 {
        return "*".repeat(id.len());
    }
    format!("{}...{}", &id[..4], &id[id.len() - 4..])
}

pub fn today_stamp() -> String {
    Utc::now().format("%Y%m%d").to_string()
}
