use serde::{Deserialize, Serialize};

use super::{Cents, MonthKey, ValidationError};

/// Per-account, per-calendar-month aggregate over the transaction log.
/// Invariant: `amount` equals the sum of the account's transaction amounts
/// whose month matches `month`, and at most one row exists per
/// (account_id, month) pair. Rows are created lazily and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub account_id: i64,
    pub month: MonthKey,
    pub amount: Cents,
}

impl Balance {
    /// Build a balance row. When `month` is omitted the current calendar
    /// month is used, which is what account opening wants.
    pub fn new(
        account_id: i64,
        amount: Cents,
        month: Option<MonthKey>,
    ) -> Result<Self, ValidationError> {
        if account_id == 0 {
            return Err(ValidationError::FieldRequired("account id"));
        }

        Ok(Self {
            account_id,
            month: month.unwrap_or_else(MonthKey::current),
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_defaults_to_current_month() {
        let balance = Balance::new(1, 0, None).unwrap();
        assert_eq!(balance.month, MonthKey::current());
        assert_eq!(balance.amount, 0);
    }

    #[test]
    fn test_balance_keeps_explicit_month() {
        let month: MonthKey = "2024/03".parse().unwrap();
        let balance = Balance::new(1, 500, Some(month.clone())).unwrap();
        assert_eq!(balance.month, month);
    }

    #[test]
    fn test_balance_requires_account_id() {
        assert_eq!(
            Balance::new(0, 0, None).unwrap_err(),
            ValidationError::FieldRequired("account id")
        );
    }
}
