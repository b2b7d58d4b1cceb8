use serde::{Deserialize, Serialize};

use crate::domain::{Account, Balance, Cents, MonthKey, Transaction};

/// Activity aggregates for one requested month. Months with no recorded
/// transactions produce an all-zero entry, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthActivity {
    pub month: MonthKey,
    pub transaction_count: i64,
    /// Average debit amount in cents, rounded to the nearest cent. 0 when
    /// the month has no debits.
    pub average_debit: Cents,
    /// Average credit amount in cents, rounded to the nearest cent. 0 when
    /// the month has no credits.
    pub average_credit: Cents,
}

/// Everything the summary email needs for one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    pub account_number: String,
    pub email: String,
    /// Lifetime running balance in cents.
    pub current_balance: Cents,
    pub months: Vec<MonthActivity>,
}

/// An account hydrated with its balance rows and transaction log.
#[derive(Debug, Clone, Serialize)]
pub struct AccountHistory {
    pub account: Account,
    pub balances: Vec<Balance>,
    pub transactions: Vec<Transaction>,
}

/// What the seed endpoint reports back.
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub account_numbers: Vec<String>,
    pub transactions_created: usize,
}
