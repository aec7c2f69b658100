use std::{marker::PhantomData, time::Duration};

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::warn;

use crate::{
    error::{ExtractError, Stage},
    types::{ArtistItem, Page, SearchArtistsResponse},
};

/// Items requested per page, the maximum the catalog endpoints accept.
pub const PAGE_LIMIT: u64 = 50;

/// Attempts spent on one request before rate limiting is declared hopeless.
pub const MAX_ATTEMPTS: u32 = 5;

/// Any response shape the pagination engine can walk.
///
/// Most catalog endpoints return a bare `items`/`total` page; the search
/// endpoint wraps the same page under an `artists` key. Implementations
/// unwrap whatever envelope the endpoint uses down to the common page.
pub trait PagedResponse: DeserializeOwned {
    type Item;

    fn into_page(self) -> Page<Self::Item>;
}

impl<T: DeserializeOwned> PagedResponse for Page<T> {
    type Item = T;

    fn into_page(self) -> Page<T> {
        self
    }
}

impl PagedResponse for SearchArtistsResponse {
    type Item = ArtistItem;

    fn into_page(self) -> Page<ArtistItem> {
        self.artists
    }
}

/// Issues a GET under the shared retry policy and returns the first
/// conclusive response.
///
/// On 429 the `Retry-After` header (integer seconds, missing or malformed
/// reads as zero) dictates exactly how long to sleep before the same request
/// is sent again, up to [`MAX_ATTEMPTS`] attempts in total. Any other
/// non-success status ends the call immediately with the status and body
/// preserved.
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `url` - Full resource URL
/// * `query` - Extra query parameters appended to the request
/// * `token` - Bearer token for the `Authorization` header
/// * `stage` - Pipeline stage recorded on any resulting error
/// * `subject` - Id of the resource being fetched, recorded on errors
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(Response)` - A success-status response, ready for body parsing
/// - `Err(ExtractError::RetriesExhausted)` - Five attempts all came back 429
/// - `Err(ExtractError::Status)` - A non-429, non-success status
/// - `Err(ExtractError::Network)` - Transport-level failure
pub async fn get_with_backoff(
    client: &Client,
    url: &str,
    query: &[(&'static str, String)],
    token: &str,
    stage: Stage,
    subject: &str,
) -> Result<Response, ExtractError> {
    let mut attempts = 0u32;

    loop {
        let response = client
            .get(url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await?;
        attempts += 1;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                let wait = retry_after_secs(&response);
                warn!(
                    stage = stage.as_str(),
                    subject, wait, attempts, "rate limited, sleeping before retry"
                );
                sleep(Duration::from_secs(wait)).await;
                if attempts >= MAX_ATTEMPTS {
                    return Err(ExtractError::RetriesExhausted {
                        stage,
                        subject: subject.to_string(),
                        attempts,
                    });
                }
            }
            status if status.is_success() => return Ok(response),
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(ExtractError::Status {
                    stage,
                    subject: subject.to_string(),
                    status: status.as_u16(),
                    body,
                });
            }
        }
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .map(|value| value.to_str().unwrap_or("0").parse::<u64>().unwrap_or(0))
        .unwrap_or(0)
}

/// Walks one paginated resource page by page.
///
/// Construction is cheap and performs no I/O; every call to
/// [`Pager::next_page`] issues exactly one request (plus rate-limit retries)
/// and yields that page's items immediately, so callers can interleave work
/// between pages. The walk ends once the running offset reaches the `total`
/// reported by the endpoint.
///
/// # Example
///
/// ```
/// let mut pager = albums::album_pager(&base, artist_id);
/// while let Some(albums) = pager.next_page(&client, &token).await? {
///     for album in albums {
///         // process before the next page is fetched
///     }
/// }
/// ```
pub struct Pager<R: PagedResponse> {
    url: String,
    query: Vec<(&'static str, String)>,
    stage: Stage,
    subject: String,
    limit: u64,
    offset: u64,
    total: Option<u64>,
    done: bool,
    _response: PhantomData<R>,
}

impl<R: PagedResponse> Pager<R> {
    pub fn new(url: String, stage: Stage, subject: &str) -> Self {
        Self {
            url,
            query: Vec::new(),
            stage,
            subject: subject.to_string(),
            limit: PAGE_LIMIT,
            offset: 0,
            total: None,
            done: false,
            _response: PhantomData,
        }
    }

    /// Adds a fixed query parameter sent with every page request.
    pub fn with_query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Total reported by the endpoint, known after the first page.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Fetches the next page, or `Ok(None)` once the walk is complete.
    ///
    /// A rate-limited page is retried at the same offset under the shared
    /// policy. Errors leave the pager unchanged, so items from earlier pages
    /// that the caller already consumed stay consumed; there is no rollback.
    pub async fn next_page(
        &mut self,
        client: &Client,
        token: &str,
    ) -> Result<Option<Vec<R::Item>>, ExtractError> {
        if self.done {
            return Ok(None);
        }

        let mut query = self.query.clone();
        query.push(("offset", self.offset.to_string()));
        query.push(("limit", self.limit.to_string()));

        let response =
            get_with_backoff(client, &self.url, &query, token, self.stage, &self.subject).await?;
        let page = response.json::<R>().await?.into_page();

        self.total = Some(page.total);
        self.offset += self.limit;
        if self.offset >= page.total {
            self.done = true;
        }

        Ok(Some(page.items))
    }
}
