use reqwest::Client;
use tabled::Table;

use crate::{
    config, error,
    error::ExtractError,
    management::{ArtistStore, Credentials, RunPaths},
    spotify, success,
    types::ArtistTableRow,
    warning,
};

pub async fn list_artists(search: Option<String>) {
    let store = ArtistStore::new(RunPaths::for_today().artist_table());
    if !store.exists() {
        warning!("No artist table for today. Run `kexcli artists update` first.");
        return;
    }

    match store.load() {
        Ok(artists) => {
            // sort artists by name
            let mut sorted_artists = artists;
            sorted_artists.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

            if let Some(artist_search) = search {
                let search_term = artist_search.to_lowercase();
                sorted_artists.retain(|a| a.name.to_lowercase().contains(&search_term));
            }

            // convert artists to table rows
            let table_rows: Vec<ArtistTableRow> = sorted_artists
                .into_iter()
                .map(|a| ArtistTableRow {
                    name: a.name,
                    genres: a
                        .genre
                        .split(", ")
                        .take(3)
                        .collect::<Vec<_>>()
                        .join(","),
                    popularity: a.popularity,
                    followers: a.followers,
                })
                .collect();

            let table = Table::new(table_rows);
            println!("{}", table);
        }
        Err(e) => warning!("Failed to load artists. Err: {}", e),
    }
}

pub async fn update_artists(force: bool) {
    let store = ArtistStore::new(RunPaths::for_today().artist_table());
    if store.exists() && !force {
        success!("Today's artist table already exists. Use --force to re-run discovery.");
        return;
    }

    let credentials = match Credentials::load().await {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("Cannot load credentials. Err: {}", e);
        }
    };

    let client = Client::new();
    let token = match spotify::auth::request_token(
        &client,
        &config::spotify_apitoken_url(),
        &credentials.primary,
    )
    .await
    {
        Ok(token) => token,
        Err(e) => {
            error!("Cannot authenticate primary credential. Err: {}", e);
        }
    };

    let discovery =
        spotify::artists::discover_kpop_artists(&client, &config::spotify_apiurl(), &token.access_token)
            .await;

    if let Err(e) = store.persist(&discovery.rows) {
        error!("Failed to write artist table. Err: {}", e);
    }

    match discovery.failure {
        None => {}
        Some(e @ ExtractError::Status { .. }) => {
            warning!("Discovery ended early: {}. Keeping the partial list.", e);
        }
        Some(e) => {
            error!("Discovery failed. Err: {}", e);
        }
    }

    success!(
        "Discovered {} K-pop artists out of {} scanned.",
        discovery.rows.len(),
        discovery.scanned
    );
}
