use std::{net::SocketAddr, time::Duration};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub coingecko_api_key: Option<String>,
    pub twitter_bearer_token: Option<String>,
    pub cryptopanic_auth_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("CD_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3001".to_string())
            .parse()
            .expect("Invalid CD_LISTEN_ADDR");
        let cors_allow = std::env::var("CD_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("CD_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            coingecko_api_key: credential("COINGECKO_API_KEY"),
            twitter_bearer_token: credential("TWITTER_BEARER_TOKEN"),
            cryptopanic_auth_token: credential("CRYPTOPANIC_AUTH_TOKEN"),
        }
    }
}

/// An empty credential counts as absent.
fn credential(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
