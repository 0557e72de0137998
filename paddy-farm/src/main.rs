use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use paddy::predictor::Predictor;
use paddy_farm::http::DbSessionStore;
use paddy_farm::{Config, Farm, build_sources, http, store, telemetry};

const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    telemetry::init_tracing();
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
    let config = Config::from_env().context("reading configuration")?;

    let predictor = match Predictor::train_from_path(&config.training_csv) {
        Ok(predictor) => Some(predictor),
        Err(e) => {
            tracing::error!(
                error = %e,
                path = %config.training_csv.display(),
                "yield model failed to train; session creation is disabled"
            );
            None
        }
    };

    let db = store::connect(&config.database_url)
        .await
        .context("connecting to the database")?;
    let sources = build_sources(&config).context("building provider clients")?;

    let sweeper = DbSessionStore::new(db.clone());
    tokio::spawn(async move {
        if let Err(e) = sweeper.sweep_expired(SESSION_SWEEP_PERIOD).await {
            tracing::error!(error = %e, "login session sweep stopped");
        }
    });

    let app = http::router(Arc::new(Farm::new(db, sources, predictor)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "paddy-farm listening");
    axum::serve(listener, app).await?;
    Ok(())
}
