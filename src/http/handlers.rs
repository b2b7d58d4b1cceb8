use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::application::{AccountHistory, AppError, SeedReport};
use crate::domain::MonthKey;

use super::AppState;

/// Seed the store with sample accounts and a year of random transactions.
pub async fn seed(
    State(state): State<AppState>,
) -> Result<Json<SeedReport>, (StatusCode, String)> {
    let report = state.service.seed_sample_data().await.map_err(|err| {
        tracing::error!(error = %err, "seeding sample data failed");
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    })?;

    tracing::info!(
        accounts = report.account_numbers.len(),
        transactions = report.transactions_created,
        "sample data seeded"
    );
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    #[serde(rename = "accountNumber")]
    pub account_number: Option<String>,
    /// Comma-separated "YYYY/MM" tokens.
    pub months: Option<String>,
}

/// Compose and send the account summary email for the requested months.
pub async fn send_summary_email(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> Result<String, (StatusCode, String)> {
    let account_number = params
        .account_number
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            tracing::warn!("account number missing from query parameters");
            (
                StatusCode::BAD_REQUEST,
                "Account number is required".to_string(),
            )
        })?;

    let months_param = params.months.filter(|s| !s.is_empty()).ok_or_else(|| {
        tracing::warn!("months missing from query parameters");
        (StatusCode::BAD_REQUEST, "Month is required".to_string())
    })?;

    let months = months_param
        .split(',')
        .map(|token| token.trim().parse::<MonthKey>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?;

    let summary = state
        .service
        .account_summary(&account_number, &months)
        .await
        .map_err(internal_error)?;

    state
        .mailer
        .send_account_summary(&summary)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "failed to send account summary email");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send account summary email".to_string(),
            )
        })?;

    Ok("Mail was successfully sent.".to_string())
}

/// Inspect an account with its balances and transaction log.
pub async fn account_history(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> Result<Json<AccountHistory>, (StatusCode, String)> {
    let history = state
        .service
        .account_history(&account_number)
        .await
        .map_err(|err| match err {
            AppError::AccountNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
            other => internal_error(other),
        })?;

    Ok(Json(history))
}

fn internal_error(err: AppError) -> (StatusCode, String) {
    tracing::error!(error = %err, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
