use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use crate::error::{AppError, Result};

/// Default Farcaster hub endpoint serving casts under the meme channel's
/// parent URL.
pub const DEFAULT_HUB_URL: &str = "https://hub.pinata.cloud/v1/castsByParent?url=chain://eip155:1/erc721:0xfd8427165df67df6d7fd689ae67c8ebf56d9ca61";

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub hub_url: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_port(env::var("PORT").ok())?;
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;

        let server_addr = SocketAddr::new(ip, port);

        // Overridable so tests and deployments can point at another hub
        let hub_url = env::var("HUB_URL").unwrap_or_else(|_| DEFAULT_HUB_URL.to_string());

        Ok(Config {
            server_addr,
            hub_url,
        })
    }
}

/// Resolves the listen port from an optional `PORT` value, defaulting to 8080.
/// An empty string counts as unset.
pub fn parse_port(raw: Option<String>) -> Result<u16> {
    match raw.as_deref() {
        None | Some("") => Ok(8080),
        Some(s) => s
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("Invalid port: {}", e))),
    }
}
