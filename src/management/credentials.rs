use std::io::ErrorKind;

use tokio::sync::{Mutex, mpsc};

use crate::{
    config,
    error::Result,
    types::{ClientCredential, Token},
};

pub struct Credentials {
    pub primary: ClientCredential,
    pub pool: Vec<ClientCredential>,
}

impl Credentials {
    pub async fn load() -> Result<Self> {
        let primary = ClientCredential {
            client_id: config::spotify_client_id(),
            client_secret: config::spotify_client_secret(),
        };

        let path = config::credentials_file();
        let pool = match async_fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str::<Vec<ClientCredential>>(&content)?,
            // No pool file means the primary pair does double duty.
            Err(error) if error.kind() == ErrorKind::NotFound => vec![primary.clone()],
            Err(error) => return Err(error.into()),
        };

        Ok(Self { primary, pool })
    }
}

pub struct CredentialPool {
    slots: Mutex<mpsc::Receiver<Token>>,
    returns: mpsc::Sender<Token>,
    capacity: usize,
}

impl CredentialPool {
    pub fn new(tokens: Vec<Token>) -> Self {
        let capacity = tokens.len();
        let (returns, slots) = mpsc::channel(capacity.max(1));
        for token in tokens {
            // The channel was sized to hold every issued token.
            returns
                .try_send(token)
                .expect("pool channel sized to fit all tokens");
        }

        Self {
            slots: Mutex::new(slots),
            returns,
            capacity,
        }
    }

    /// Waits until a token is free and takes it out of circulation. At most
    /// `capacity` callers hold a token at any moment; everyone else parks
    /// here until a `release` comes through.
    pub async fn acquire(&self) -> Token {
        let mut slots = self.slots.lock().await;
        slots
            .recv()
            .await
            .expect("pool sender half lives as long as the pool")
    }

    pub async fn release(&self, token: Token) {
        self.returns
            .send(token)
            .await
            .expect("pool receiver half lives as long as the pool");
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use tokio::time::{sleep, timeout};

    use super::*;

    fn token(tag: &str) -> Token {
        Token {
            access_token: tag.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
        }
    }

    #[tokio::test]
    async fn holders_never_exceed_capacity() {
        let pool = Arc::new(CredentialPool::new(vec![token("a"), token("b")]));
        let holding = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let pool = pool.clone();
            let holding = holding.clone();
            let peak = peak.clone();
            tasks.push(tokio::spawn(async move {
                let token = pool.acquire().await;
                let now = holding.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                sleep(Duration::from_millis(10)).await;
                holding.fetch_sub(1, Ordering::SeqCst);
                pool.release(token).await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(pool.capacity(), 2);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn acquire_parks_until_release() {
        let pool = Arc::new(CredentialPool::new(vec![token("only")]));
        let held = pool.acquire().await;

        let waiter = {
            let pool = pool.clone();
            tokio::spawn(async move { pool.acquire().await })
        };

        // The single token is held, so the waiter cannot finish yet.
        sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        pool.release(held).await;
        let reacquired = timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake after release")
            .unwrap();
        assert_eq!(reacquired.access_token, "only");
    }

    #[tokio::test]
    async fn released_token_circulates() {
        let pool = CredentialPool::new(vec![token("alpha")]);

        let first = pool.acquire().await;
        assert_eq!(first.access_token, "alpha");
        pool.release(first).await;

        let second = pool.acquire().await;
        assert_eq!(second.access_token, "alpha");
    }
}
