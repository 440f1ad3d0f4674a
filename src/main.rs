use std::{net::SocketAddr, sync::Arc};

mod app;
mod auth;
mod config;
mod db;
mod error;
mod recordings;
mod state;
mod storage;
#[cfg(test)]
mod test_support;

use crate::{
    auth::repo::PgUserRepo, config::AppConfig, recordings::repo::PgRecordingRepo,
    state::AppState, storage::LocalStorage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Arc::new(AppConfig::from_env()?);
    let db = db::connect(&config).await?;
    let storage = LocalStorage::open(&config.storage.upload_dir).await?;
    tracing::info!(upload_dir = %storage.root().display(), "blob storage ready");

    let state = AppState::from_parts(
        config.clone(),
        Arc::new(PgUserRepo::new(db.clone())),
        Arc::new(PgRecordingRepo::new(db.clone())),
        Arc::new(storage),
    );
    let app = app::build_app(state)?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let served = app::serve(app, addr).await;

    db.close().await;
    tracing::info!("database pool closed");
    served
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "recorder=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}
