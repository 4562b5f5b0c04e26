//! Customer email addresses collected by the order and contact forms.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Reasons an input string is not accepted as an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// Nothing left after trimming.
    #[error("email cannot be empty")]
    Empty,
    /// Longer than the SMTP path limit.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Spaces, tabs or newlines inside the address.
    #[error("email cannot contain whitespace")]
    Whitespace,
    /// No `@` separator, or more than one.
    #[error("email must contain exactly one @ symbol")]
    AtSymbol,
    /// Nothing before the `@`.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// Domain is empty or has no dot (`user@localhost`).
    #[error("email domain '{0}' is not a valid domain")]
    InvalidDomain(String),
}

/// An email address entered by a customer.
///
/// Surrounding whitespace is trimmed and the domain is lower-cased; the local
/// part is kept as typed. Deserialization goes through the same validation,
/// so a stored `Email` is always well-formed.
///
/// ```
/// use delicious_bakers_core::Email;
///
/// let email = Email::parse("  Baker@Example.COM ").unwrap();
/// assert_eq!(email.as_str(), "Baker@example.com");
///
/// assert!(Email::parse("no-at-symbol").is_err());
/// assert!(Email::parse("user@localhost").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse and normalize an `Email`.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first rule the input breaks.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let mut parts = s.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(EmailError::AtSymbol);
        };

        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        if !is_valid_domain(domain) {
            return Err(EmailError::InvalidDomain(domain.to_owned()));
        }

        Ok(Self(format!("{local}@{}", domain.to_ascii_lowercase())))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the part after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
    }
}

fn is_valid_domain(domain: &str) -> bool {
    !domain.is_empty()
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_common_addresses() {
        assert!(Email::parse("orders@bakery.in").is_ok());
        assert!(Email::parse("first.last+cakes@mail.example.co.uk").is_ok());
    }

    #[test]
    fn test_parse_normalizes() {
        let email = Email::parse(" Asha@Bakery.IN\n").unwrap();
        assert_eq!(email.as_str(), "Asha@bakery.in");
        assert_eq!(email.domain(), "bakery.in");
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
        assert_eq!(Email::parse("a b@c.d"), Err(EmailError::Whitespace));
        assert_eq!(Email::parse("plain"), Err(EmailError::AtSymbol));
        assert_eq!(Email::parse("a@b@c.d"), Err(EmailError::AtSymbol));
        assert_eq!(Email::parse("@c.d"), Err(EmailError::EmptyLocalPart));
        assert!(matches!(
            Email::parse("user@localhost"),
            Err(EmailError::InvalidDomain(_))
        ));
        assert!(matches!(
            Email::parse("user@bakery..in"),
            Err(EmailError::InvalidDomain(_))
        ));
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Email = serde_json::from_str("\"Sam@Example.com\"").unwrap();
        assert_eq!(ok.as_str(), "Sam@example.com");
        assert_eq!(serde_json::to_string(&ok).unwrap(), "\"Sam@example.com\"");

        assert!(serde_json::from_str::<Email>("\"not-an-email\"").is_err());
    }
}
