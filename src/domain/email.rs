use std::fmt;
use thiserror::Error;

use serde::{Deserialize, Serialize};

/// A validated email address, used for notification recipient lists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

#[derive(Error, Debug, PartialEq)]
pub enum EmailError {
    #[error("'{0}' is not a valid email: must contain exactly one '@'")]
    InvalidFormat(String),
    #[error("'{0}' is not a valid email: missing local part")]
    MissingLocalPart(String),
    #[error("'{0}' is not a valid email: invalid domain part")]
    InvalidDomainPart(String),
}

impl Email {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Email {
    type Error = EmailError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let (local, domain) = value
            .split_once('@')
            .ok_or_else(|| EmailError::InvalidFormat(value.to_string()))?;

        if domain.contains('@') {
            return Err(EmailError::InvalidFormat(value.to_string()));
        }
        if local.trim().is_empty() {
            return Err(EmailError::MissingLocalPart(value.to_string()));
        }
        if domain.trim().is_empty()
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
        {
            return Err(EmailError::InvalidDomainPart(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Email::try_from(value.as_str())
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_is_accepted() {
        assert!(Email::try_from("manager@example.com").is_ok());
    }

    #[test]
    fn missing_at_symbol_is_rejected() {
        assert_eq!(
            Email::try_from("managerexample.com").unwrap_err(),
            EmailError::InvalidFormat("managerexample.com".to_string())
        );
    }

    #[test]
    fn multiple_at_symbols_are_rejected() {
        assert_eq!(
            Email::try_from("manager@@example.com").unwrap_err(),
            EmailError::InvalidFormat("manager@@example.com".to_string())
        );
    }

    #[test]
    fn missing_local_part_is_rejected() {
        assert_eq!(
            Email::try_from("@example.com").unwrap_err(),
            EmailError::MissingLocalPart("@example.com".to_string())
        );
    }

    #[test]
    fn domain_part_must_contain_dot() {
        assert_eq!(
            Email::try_from("manager@example").unwrap_err(),
            EmailError::InvalidDomainPart("manager@example".to_string())
        );
    }
}
