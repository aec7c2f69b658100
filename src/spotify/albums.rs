use crate::{
    error::Stage,
    spotify::pager::Pager,
    types::{AlbumItem, Page},
};

/// Pager over `GET /artists/{id}/albums`, the artist's full discography.
///
/// The listing is unfiltered by album group on purpose: compilations and
/// appearances show up here too, and the worker drops anything whose primary
/// artist is not the artist being expanded.
pub fn album_pager(base: &str, artist_id: &str) -> Pager<Page<AlbumItem>> {
    Pager::new(
        format!("{base}/artists/{id}/albums", id = artist_id),
        Stage::Albums,
        artist_id,
    )
}
