use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use thiserror::Error;

use crate::domain::{Account, Balance, Cents, MonthKey, Transaction, round_to_cents};

use super::MIGRATION_001_INITIAL;

/// Failure modes of the multi-statement ledger write. The three statements
/// are not wrapped in a store transaction (spec'd behavior: the store's
/// native row-level consistency is the only concurrency control), so the
/// caller must be able to tell a clean abort from a half-applied one.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A statement failed outright. Statements before it in the same
    /// ledger write (the transaction append in particular) may already
    /// have been applied, so retrying the whole operation can double-count.
    #[error("ledger write failed: {0}")]
    Persist(#[source] anyhow::Error),

    /// The balance row for (account, month) was still missing after being
    /// created. Unreachable under correct operation.
    #[error("balance row for account {account_id} month {month} missing after creation")]
    DataConsistency { account_id: i64, month: MonthKey },

    /// The monthly balance was updated but the account running total was
    /// not. The two aggregates are now inconsistent and need reconciliation.
    #[error(
        "balance for account {account_id} month {month} updated but the running balance was not: {source}"
    )]
    PartialApply {
        account_id: i64,
        month: MonthKey,
        #[source]
        source: anyhow::Error,
    },
}

/// Repository for accounts, balances and the transaction log.
/// Owns the connection pool; constructed once at startup and injected into
/// the service layer.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Account operations
    // ========================

    /// Insert a new account and return its generated id.
    pub async fn save_account(&self, account: &Account) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO account (account_number, name, last_name, age, email, current_balance_amount)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.account_number)
        .bind(&account.name)
        .bind(&account.last_name)
        .bind(account.age)
        .bind(&account.email)
        .bind(account.current_balance_amount)
        .execute(&self.pool)
        .await
        .context("Failed to save account")?;

        Ok(result.last_insert_rowid())
    }

    /// Get an account by its surrogate id.
    pub async fn get_account_by_id(&self, id: i64) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, account_number, name, last_name, age, email, current_balance_amount
            FROM account
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account")?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    /// Get an account by its customer-facing account number.
    pub async fn get_account_by_account_number(
        &self,
        account_number: &str,
    ) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT id, account_number, name, last_name, age, email, current_balance_amount
            FROM account
            WHERE account_number = ?
            "#,
        )
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account by account number")?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<Account> {
        Ok(Account {
            id: row.get("id"),
            account_number: row.get("account_number"),
            name: row.get("name"),
            last_name: row.get("last_name"),
            age: row.get("age"),
            email: row.get("email"),
            current_balance_amount: row.get("current_balance_amount"),
        })
    }

    // ========================
    // Balance operations
    // ========================

    /// Insert a balance row for an (account, month) pair.
    pub async fn create_balance(&self, balance: &Balance) -> Result<()> {
        sqlx::query("INSERT INTO balance (account_id, month, amount) VALUES (?, ?, ?)")
            .bind(balance.account_id)
            .bind(balance.month.as_str())
            .bind(balance.amount)
            .execute(&self.pool)
            .await
            .context("Failed to create balance")?;
        Ok(())
    }

    /// List all balance rows for an account, newest month first.
    pub async fn list_balances(&self, account_id: i64) -> Result<Vec<Balance>> {
        let rows = sqlx::query(
            r#"
            SELECT account_id, month, amount
            FROM balance
            WHERE account_id = ?
            ORDER BY month DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list balances")?;

        rows.iter().map(Self::row_to_balance).collect()
    }

    fn row_to_balance(row: &sqlx::sqlite::SqliteRow) -> Result<Balance> {
        let month_str: String = row.get("month");
        Ok(Balance {
            account_id: row.get("account_id"),
            month: month_str.parse().context("Invalid month key in store")?,
            amount: row.get("amount"),
        })
    }

    // ========================
    // Ledger operation
    // ========================

    /// Record a transaction and fold its amount into both aggregates:
    /// the (account, month) balance row and the account running total.
    ///
    /// The balance update is attempted first; zero rows affected means the
    /// month is new, so a zero-amount row is created and the update retried
    /// exactly once. A second miss means the store lost the row we just
    /// wrote and is reported as `LedgerError::DataConsistency`.
    ///
    /// On success the transaction's generated id is written back.
    pub async fn record_transaction(
        &self,
        transaction: &mut Transaction,
    ) -> Result<(), LedgerError> {
        let result = sqlx::query(
            r#"INSERT INTO "transaction" (account_id, month, date_time, amount) VALUES (?, ?, ?, ?)"#,
        )
        .bind(transaction.account_id)
        .bind(transaction.month.as_str())
        .bind(transaction.date_time.to_rfc3339())
        .bind(transaction.amount)
        .execute(&self.pool)
        .await
        .context("Failed to append transaction")
        .map_err(LedgerError::Persist)?;

        transaction.id = result.last_insert_rowid();

        let mut balance_created = false;
        loop {
            let affected =
                sqlx::query("UPDATE balance SET amount = amount + ? WHERE account_id = ? AND month = ?")
                    .bind(transaction.amount)
                    .bind(transaction.account_id)
                    .bind(transaction.month.as_str())
                    .execute(&self.pool)
                    .await
                    .context("Failed to update balance")
                    .map_err(LedgerError::Persist)?
                    .rows_affected();

            if affected > 0 {
                break;
            }
            if balance_created {
                return Err(LedgerError::DataConsistency {
                    account_id: transaction.account_id,
                    month: transaction.month.clone(),
                });
            }

            // First transaction of a new month: create the row at zero and
            // retry the arithmetic update once. A concurrent writer may have
            // created the row between the update and this insert; the UNIQUE
            // (account_id, month) constraint plus DO NOTHING makes that a
            // no-op, and the retry then lands on the winner's row.
            sqlx::query(
                r#"
                INSERT INTO balance (account_id, month, amount) VALUES (?, ?, 0)
                ON CONFLICT (account_id, month) DO NOTHING
                "#,
            )
            .bind(transaction.account_id)
            .bind(transaction.month.as_str())
            .execute(&self.pool)
            .await
            .context("Failed to create balance")
            .map_err(LedgerError::Persist)?;
            balance_created = true;
        }

        // From here on the monthly balance already reflects the new amount,
        // so any failure leaves the aggregates inconsistent.
        let account_update = sqlx::query(
            "UPDATE account SET current_balance_amount = current_balance_amount + ? WHERE id = ?",
        )
        .bind(transaction.amount)
        .bind(transaction.account_id)
        .execute(&self.pool)
        .await
        .context("Failed to update account running balance");

        match account_update {
            Ok(result) if result.rows_affected() > 0 => Ok(()),
            Ok(_) => Err(LedgerError::PartialApply {
                account_id: transaction.account_id,
                month: transaction.month.clone(),
                source: anyhow::anyhow!("no account row with id {}", transaction.account_id),
            }),
            Err(source) => Err(LedgerError::PartialApply {
                account_id: transaction.account_id,
                month: transaction.month.clone(),
                source,
            }),
        }
    }

    // ========================
    // Transaction queries
    // ========================

    /// List all transactions for an account, newest first.
    pub async fn list_transactions(&self, account_id: i64) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_id, month, date_time, amount
            FROM "transaction"
            WHERE account_id = ?
            ORDER BY date_time DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Count an account's transactions in one month.
    pub async fn count_transactions(&self, account_id: i64, month: &MonthKey) -> Result<i64> {
        let row = sqlx::query(
            r#"SELECT COUNT(*) as count FROM "transaction" WHERE account_id = ? AND month = ?"#,
        )
        .bind(account_id)
        .bind(month.as_str())
        .fetch_one(&self.pool)
        .await
        .context("Failed to count transactions")?;

        Ok(row.get("count"))
    }

    /// Average debit (negative) amount for one month, rounded to whole
    /// cents. A month with no debits yields 0.
    pub async fn average_debit_amount(&self, account_id: i64, month: &MonthKey) -> Result<Cents> {
        self.average_amount(account_id, month, "amount < 0").await
    }

    /// Average credit (positive) amount for one month, rounded to whole
    /// cents. A month with no credits yields 0.
    pub async fn average_credit_amount(&self, account_id: i64, month: &MonthKey) -> Result<Cents> {
        self.average_amount(account_id, month, "amount > 0").await
    }

    async fn average_amount(
        &self,
        account_id: i64,
        month: &MonthKey,
        sign_filter: &str,
    ) -> Result<Cents> {
        let query = format!(
            r#"
            SELECT COALESCE(AVG(amount), 0.0) as average
            FROM "transaction"
            WHERE account_id = ? AND month = ? AND {}
            "#,
            sign_filter
        );

        let row = sqlx::query(&query)
            .bind(account_id)
            .bind(month.as_str())
            .fetch_one(&self.pool)
            .await
            .context("Failed to compute average transaction amount")?;

        let average: f64 = row.get("average");
        Ok(round_to_cents(average))
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let month_str: String = row.get("month");
        let date_time_str: String = row.get("date_time");

        Ok(Transaction {
            id: row.get("id"),
            account_id: row.get("account_id"),
            month: month_str.parse().context("Invalid month key in store")?,
            date_time: DateTime::parse_from_rfc3339(&date_time_str)
                .context("Invalid date_time timestamp")?
                .with_timezone(&Utc),
            amount: row.get("amount"),
        })
    }
}
