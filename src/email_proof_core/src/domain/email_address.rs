use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailAddressError {
    #[error("Invalid email address")]
    Invalid,
}

/// Email address accepted by the request flows.
///
/// The proof-code store itself takes plain strings; this type is only used at
/// the edge where input has to be checked before a code is issued.
#[derive(Debug, Clone)]
pub struct EmailAddress(Secret<String>);

impl EmailAddress {
    pub fn parse(raw: impl Into<String>) -> Result<Self, EmailAddressError> {
        Self::try_from(Secret::new(raw.into()))
    }
}

impl TryFrom<Secret<String>> for EmailAddress {
    type Error = EmailAddressError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        let trimmed = value.expose_secret().trim();
        if !EMAIL_PATTERN.is_match(trimmed) {
            return Err(EmailAddressError::Invalid);
        }
        Ok(Self(Secret::new(trimmed.to_owned())))
    }
}

impl AsRef<Secret<String>> for EmailAddress {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for EmailAddress {
    fn eq(&self, other: &Self) -> bool {
        self.0
            .expose_secret()
            .eq_ignore_ascii_case(other.0.expose_secret())
    }
}

impl Eq for EmailAddress {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        let email = EmailAddress::parse(" someone@example.com ").unwrap();
        assert_eq!(email.as_ref().expose_secret(), "someone@example.com");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for raw in ["", "no-at-sign", "two@@example.com", "a@b", "spaced out@x.com"] {
            assert_eq!(
                EmailAddress::parse(raw).unwrap_err(),
                EmailAddressError::Invalid,
                "{raw}"
            );
        }
    }

    #[test]
    fn equality_ignores_ascii_case() {
        assert_eq!(
            EmailAddress::parse("User@X.com").unwrap(),
            EmailAddress::parse("user@x.com").unwrap()
        );
    }
}
