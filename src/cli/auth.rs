use reqwest::Client;

use crate::{config, error, info, management::Credentials, spotify, success, utils, warning};

pub async fn auth() {
    let credentials = match Credentials::load().await {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("Cannot load credentials. Err: {}", e);
        }
    };

    let client = Client::new();
    let token_url = config::spotify_apitoken_url();
    let mut failed = 0usize;

    match spotify::auth::request_token(&client, &token_url, &credentials.primary).await {
        Ok(token) => info!(
            "Primary credential {} ok (token expires in {}s).",
            utils::mask_client_id(&credentials.primary.client_id),
            token.expires_in
        ),
        Err(e) => {
            failed += 1;
            warning!(
                "Primary credential {} failed: {}",
                utils::mask_client_id(&credentials.primary.client_id),
                e
            );
        }
    }

    for credential in &credentials.pool {
        match spotify::auth::request_token(&client, &token_url, credential).await {
            Ok(_) => info!(
                "Pool credential {} ok.",
                utils::mask_client_id(&credential.client_id)
            ),
            Err(e) => {
                failed += 1;
                warning!(
                    "Pool credential {} failed: {}",
                    utils::mask_client_id(&credential.client_id),
                    e
                );
            }
        }
    }

    let total = credentials.pool.len() + 1;
    if failed == 0 {
        success!("All {} credential(s) can authenticate.", total);
    } else {
        warning!("{} of {} credential(s) failed to authenticate.", failed, total);
    }
}
