//! Test support utilities: unique test data and minted identity tokens.
//!
//! ULID-based helpers keep concurrently running tests from colliding on the
//! same account names. The [`tokens`] module mints compact credentials shaped
//! like the ones a Cognito user pool issues.

pub mod logging;
pub mod tokens;

use ulid::Ulid;

/// Generate a unique string in the form `{prefix}-{ulid}`.
///
/// ```
/// use test_support::unique_str;
///
/// assert_ne!(unique_str("sub"), unique_str("sub"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique sign-in address in the form `{prefix}-{ulid}@example.test`.
///
/// ULIDs are upper-case; the address is lower-cased since user pools
/// normalise usernames that way.
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new()).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_str_differs_per_call() {
        let a = unique_str("sub");
        let b = unique_str("sub");
        assert_ne!(a, b);
        assert!(a.starts_with("sub-"));
    }

    #[test]
    fn test_unique_email_has_expected_shape() {
        let email = unique_email("user");
        let (local, domain) = email.split_once('@').unwrap();
        assert_eq!(domain, "example.test");
        assert!(local.starts_with("user-"));
        assert_eq!(email, email.to_lowercase());
    }
}
