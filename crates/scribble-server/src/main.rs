//! Scribble Classification Server
//!
//! Reference implementation of the `/predict` endpoint the drawing surface
//! exports to.
//!
//! ## Protocol
//!
//! ```json
//! POST /predict  { "image": "data:image/png;base64,..." }
//! 200            { "prediction": "face" }
//! 4xx/500        { "error": "Model is not loaded" }
//! ```

mod config;
mod model;
mod preprocess;
mod routes;

use config::ServerConfig;
use model::{LinearModel, Model};
use routes::AppState;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scribble_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env();

    let model: Option<Arc<dyn Model>> = match LinearModel::load(&config.model_path) {
        Ok(model) => {
            info!("Model loaded from {}", config.model_path.display());
            Some(Arc::new(model))
        }
        Err(e) => {
            error!(
                "Error loading model from {}: {}",
                config.model_path.display(),
                e
            );
            None
        }
    };

    let app = routes::router(Arc::new(AppState::new(model)));

    info!("Scribble classification server listening on {}", config.addr);
    info!(
        "Predict endpoint: http://localhost:{}/predict",
        config.addr.port()
    );

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await
}
