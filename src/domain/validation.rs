use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Shape check only; deliverability is the mail server's problem.
pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"));

pub fn is_email_format_ok(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Errors produced while constructing domain values from untrusted input.
/// Detected before any write is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must be provided")]
    FieldRequired(&'static str),

    #[error("age must be at least 18, instead given: {0}")]
    AgeTooLow(i64),

    #[error(
        "email must be given in mail format <local>@<domain>.<top-level-domain>, instead given: {0}"
    )]
    EmailFormat(String),

    #[error("month must be given as YYYY/MM, instead given: {0}")]
    MonthFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_emails_accepted() {
        assert!(is_email_format_ok("jane.doe@example.com"));
        assert!(is_email_format_ok("a+b_c%d@sub.domain.co"));
    }

    #[test]
    fn test_malformed_emails_rejected() {
        assert!(!is_email_format_ok(""));
        assert!(!is_email_format_ok("no-at-sign.example.com"));
        assert!(!is_email_format_ok("jane@nodot"));
        assert!(!is_email_format_ok("jane@domain.c"));
    }
}
