mod handlers;

pub use handlers::*;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::application::LedgerService;
use crate::mailer::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LedgerService>,
    pub mailer: Arc<Mailer>,
}

pub fn app() -> Router<AppState> {
    Router::new()
        .route("/seed", post(handlers::seed))
        .route("/summary-email", post(handlers::send_summary_email))
        .route("/accounts/:account_number", get(handlers::account_history))
}
