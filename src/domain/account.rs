use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, ValidationError, is_email_format_ok};

/// A customer bank account. `current_balance_amount` is a running total
/// maintained by the ledger: it always equals the sum of all transaction
/// amounts ever applied to the account. Accounts are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Surrogate id assigned by the store (0 until persisted).
    pub id: i64,
    /// Opaque unique identifier handed out to the customer.
    pub account_number: String,
    pub name: String,
    pub last_name: String,
    pub age: i64,
    pub email: String,
    /// Lifetime running balance in cents. Mutated only by the ledger.
    pub current_balance_amount: Cents,
}

impl Account {
    /// Validate a holder profile and build an account ready for persistence.
    pub fn new(
        name: impl Into<String>,
        last_name: impl Into<String>,
        age: i64,
        email: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let last_name = last_name.into();
        let email = email.into();

        if name.is_empty() {
            return Err(ValidationError::FieldRequired("account customer name"));
        }
        if last_name.is_empty() {
            return Err(ValidationError::FieldRequired("account customer last name"));
        }
        if age < 18 {
            return Err(ValidationError::AgeTooLow(age));
        }
        if !is_email_format_ok(&email) {
            return Err(ValidationError::EmailFormat(email));
        }

        Ok(Self {
            id: 0,
            account_number: Uuid::new_v4().simple().to_string(),
            name,
            last_name,
            age,
            email,
            current_balance_amount: 0,
        })
    }
}
