//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODEL_PATH: &str = "model.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub model_path: PathBuf,
}

impl ServerConfig {
    /// Read `PORT` and `SCRIBBLE_MODEL`.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("PORT").ok(),
            std::env::var("SCRIBBLE_MODEL").ok(),
        )
    }

    fn from_vars(port: Option<String>, model_path: Option<String>) -> Self {
        let port = match port {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Ignoring invalid PORT {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            model_path: model_path
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
        }
    }
}
