use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::Rng;

use crate::domain::{Account, Balance, Cents, MonthKey, Transaction};
use crate::storage::Repository;

use super::{AccountHistory, AccountSummary, AppError, MonthActivity, SeedReport};

/// How many random transactions a seed run creates.
const SEED_TRANSACTION_COUNT: usize = 1000;

/// Application service maintaining the account ledger.
/// This is the primary interface for any client (HTTP, tests, etc.).
pub struct LedgerService {
    repo: Repository,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Account operations
    // ========================

    /// Open an account: validate the holder profile, persist the account
    /// and initialize a zero balance row for the creation month.
    pub async fn create_account(
        &self,
        name: &str,
        last_name: &str,
        age: i64,
        email: &str,
    ) -> Result<Account, AppError> {
        let mut account = Account::new(name, last_name, age, email)?;

        account.id = self.repo.save_account(&account).await?;

        let initial_balance = Balance::new(account.id, 0, None)?;
        self.repo.create_balance(&initial_balance).await?;

        Ok(account)
    }

    /// Look up an account by account number.
    pub async fn get_account(&self, account_number: &str) -> Result<Account, AppError> {
        self.repo
            .get_account_by_account_number(account_number)
            .await?
            .ok_or_else(|| AppError::AccountNotFound(account_number.to_string()))
    }

    /// An account together with its balance rows and full transaction log.
    pub async fn account_history(&self, account_number: &str) -> Result<AccountHistory, AppError> {
        let account = self.get_account(account_number).await?;
        let balances = self.repo.list_balances(account.id).await?;
        let transactions = self.repo.list_transactions(account.id).await?;

        Ok(AccountHistory {
            account,
            balances,
            transactions,
        })
    }

    // ========================
    // Ledger operations
    // ========================

    /// Record a transaction against an account. The month key is derived
    /// from the timestamp (defaulting to now), the transaction is appended,
    /// and both the monthly balance and the account running total are
    /// updated by the repository's ledger write.
    pub async fn record_transaction(
        &self,
        account_id: i64,
        amount: Cents,
        date_time: Option<DateTime<Utc>>,
    ) -> Result<Transaction, AppError> {
        let mut transaction = Transaction::new(account_id, amount, date_time)?;

        // Reject unknown accounts before anything is written.
        if self.repo.get_account_by_id(account_id).await?.is_none() {
            return Err(AppError::AccountNotFound(account_id.to_string()));
        }

        self.repo.record_transaction(&mut transaction).await?;
        Ok(transaction)
    }

    // ========================
    // Summary queries
    // ========================

    /// Per-month activity aggregates plus the current running balance,
    /// for the months the caller asked about.
    pub async fn account_summary(
        &self,
        account_number: &str,
        months: &[MonthKey],
    ) -> Result<AccountSummary, AppError> {
        let account = self.get_account(account_number).await?;

        let mut activity = Vec::with_capacity(months.len());
        for month in months {
            let transaction_count = self.repo.count_transactions(account.id, month).await?;
            let average_debit = self.repo.average_debit_amount(account.id, month).await?;
            let average_credit = self.repo.average_credit_amount(account.id, month).await?;

            activity.push(MonthActivity {
                month: month.clone(),
                transaction_count,
                average_debit,
                average_credit,
            });
        }

        Ok(AccountSummary {
            account_number: account.account_number,
            email: account.email,
            current_balance: account.current_balance_amount,
            months: activity,
        })
    }

    // ========================
    // Sample data
    // ========================

    /// Seed the store with 3 sample accounts and 1000 random transactions
    /// spread across calendar year 2024.
    pub async fn seed_sample_data(&self) -> Result<SeedReport, AppError> {
        let mut accounts = Vec::new();
        for (name, last_name, age, email) in [
            ("Max", "Verstappen", 28, "max.verstappen@example.com"),
            ("Charles", "Leclerc", 27, "charles.leclerc@example.com"),
            ("Valtteri", "Bottas", 26, "valtteri.bottas@example.com"),
        ] {
            let account = self.create_account(name, last_name, age, email).await?;
            tracing::info!(
                account_number = %account.account_number,
                "seeded sample account"
            );
            accounts.push(account);
        }

        let start = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| anyhow::anyhow!("invalid seed range start"))?;
        let end = Utc
            .with_ymd_and_hms(2024, 12, 31, 23, 59, 59)
            .single()
            .ok_or_else(|| anyhow::anyhow!("invalid seed range end"))?;

        for _ in 0..SEED_TRANSACTION_COUNT {
            let amount = random_nonzero_amount();
            let date_time = random_datetime(start, end);
            let account = {
                let mut rng = rand::thread_rng();
                &accounts[rng.gen_range(0..accounts.len())]
            };

            self.record_transaction(account.id, amount, Some(date_time))
                .await?;
        }

        Ok(SeedReport {
            account_numbers: accounts.into_iter().map(|a| a.account_number).collect(),
            transactions_created: SEED_TRANSACTION_COUNT,
        })
    }
}

/// Random nonzero amount in cents, drawn from [-100_000, 100_000), the
/// cent range of a half-open ±1000.00 draw.
fn random_nonzero_amount() -> Cents {
    let mut rng = rand::thread_rng();
    loop {
        let amount = rng.gen_range(-100_000..100_000);
        if amount != 0 {
            return amount;
        }
    }
}

/// Uniformly random instant between `min` and `max`.
fn random_datetime(min: DateTime<Utc>, max: DateTime<Utc>) -> DateTime<Utc> {
    let mut rng = rand::thread_rng();
    let offset = rng.gen_range(0..(max.timestamp() - min.timestamp()));
    min + Duration::seconds(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_amount_never_zero() {
        for _ in 0..1000 {
            let amount = random_nonzero_amount();
            assert_ne!(amount, 0);
            assert!((-100_000..100_000).contains(&amount));
        }
    }

    #[test]
    fn test_random_datetime_stays_in_range() {
        let min = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let max = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        for _ in 0..100 {
            let dt = random_datetime(min, max);
            assert!(dt >= min && dt < max);
        }
    }
}
