use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Cents, MonthKey, ValidationError};

/// An immutable, append-only ledger fact. Once recorded it is never
/// mutated or deleted; balances and the account running total are derived
/// from transactions, never the other way around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Surrogate id assigned by the store (0 until persisted).
    pub id: i64,
    pub account_id: i64,
    /// Month key derived from `date_time` at construction.
    pub month: MonthKey,
    pub date_time: DateTime<Utc>,
    /// Signed amount in cents. Negative is a debit, positive a credit.
    pub amount: Cents,
}

impl Transaction {
    /// Build a transaction. A missing timestamp defaults to the current
    /// time before the month key is derived.
    pub fn new(
        account_id: i64,
        amount: Cents,
        date_time: Option<DateTime<Utc>>,
    ) -> Result<Self, ValidationError> {
        if amount == 0 {
            return Err(ValidationError::FieldRequired("transaction amount"));
        }
        if account_id == 0 {
            return Err(ValidationError::FieldRequired("account id"));
        }

        let date_time = date_time.unwrap_or_else(Utc::now);
        let month = MonthKey::from_datetime(&date_time);

        Ok(Self {
            id: 0,
            account_id,
            month,
            date_time,
            amount,
        })
    }

    pub fn is_debit(&self) -> bool {
        self.amount < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_month_derived_from_timestamp() {
        let dt = Utc.with_ymd_and_hms(2024, 7, 15, 9, 0, 0).unwrap();
        let tx = Transaction::new(1, 15000, Some(dt)).unwrap();
        assert_eq!(tx.month.as_str(), "2024/07");
        assert_eq!(tx.date_time, dt);
    }

    #[test]
    fn test_missing_timestamp_defaults_to_now() {
        let tx = Transaction::new(1, -500, None).unwrap();
        assert_eq!(tx.month, MonthKey::current());
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert_eq!(
            Transaction::new(1, 0, None).unwrap_err(),
            ValidationError::FieldRequired("transaction amount")
        );
    }

    #[test]
    fn test_missing_account_rejected() {
        assert_eq!(
            Transaction::new(0, 100, None).unwrap_err(),
            ValidationError::FieldRequired("account id")
        );
    }

    #[test]
    fn test_debit_classification() {
        assert!(Transaction::new(1, -1, None).unwrap().is_debit());
        assert!(!Transaction::new(1, 1, None).unwrap().is_debit());
    }
}
