use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use mensario::application::LedgerService;
use mensario::config::AppConfig;
use mensario::http::{self, AppState};
use mensario::mailer::Mailer;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    if std::env::var("ENV").ok().as_deref() != Some("prod") {
        dotenvy::dotenv().ok();
    }

    let config = AppConfig::parse();
    config.validate()?;

    let service = LedgerService::init(&config.database).await?;
    let mailer = Mailer::new(&config)?;
    let state = AppState {
        service: Arc::new(service),
        mailer: Arc::new(mailer),
    };

    let app = http::app().with_state(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
