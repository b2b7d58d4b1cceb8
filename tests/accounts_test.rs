mod common;

use anyhow::Result;
use common::{open_account, test_service};
use mensario::application::AppError;

#[tokio::test]
async fn test_create_account_and_fetch_by_number() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let created = open_account(&service).await?;

    let fetched = service.get_account(&created.account_number).await?;
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, "Jane");
    assert_eq!(fetched.last_name, "Doe");
    assert_eq!(fetched.age, 30);
    assert_eq!(fetched.email, "jane.doe@example.com");
    assert_eq!(fetched.current_balance_amount, 0);

    Ok(())
}

#[tokio::test]
async fn test_unknown_account_number_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.get_account("does-not-exist").await.unwrap_err();
    assert!(matches!(err, AppError::AccountNotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_invalid_profiles_are_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    for (name, last_name, age, email) in [
        ("", "Doe", 30, "jane@example.com"),
        ("Jane", "", 30, "jane@example.com"),
        ("Jane", "Doe", 17, "jane@example.com"),
        ("Jane", "Doe", 30, "not-an-email"),
    ] {
        let err = service
            .create_account(name, last_name, age, email)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    Ok(())
}

#[tokio::test]
async fn test_account_history_serializes_for_the_api() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = open_account(&service).await?;

    let history = service.account_history(&account.account_number).await?;
    let json = serde_json::to_value(&history)?;

    assert_eq!(
        json["account"]["account_number"],
        account.account_number.as_str()
    );
    assert_eq!(json["account"]["current_balance_amount"], 0);
    assert!(json["balances"].is_array());
    assert!(json["transactions"].is_array());

    Ok(())
}

#[tokio::test]
async fn test_seed_creates_accounts_and_transactions() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let report = service.seed_sample_data().await?;
    assert_eq!(report.account_numbers.len(), 3);
    assert_eq!(report.transactions_created, 1000);

    // Every seeded transaction lands in 2024 and the per-account logs
    // together carry all 1000 of them.
    let mut total = 0;
    for number in &report.account_numbers {
        let history = service.account_history(number).await?;
        total += history.transactions.len();
        for tx in &history.transactions {
            assert_ne!(tx.amount, 0);
            assert!(tx.month.as_str().starts_with("2024/"));
        }
        // Running balance matches the log.
        let sum: i64 = history.transactions.iter().map(|t| t.amount).sum();
        assert_eq!(history.account.current_balance_amount, sum);
    }
    assert_eq!(total, 1000);

    Ok(())
}
