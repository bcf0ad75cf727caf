//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input contains whitespace.
    #[error("email cannot contain whitespace")]
    Whitespace,
    /// The input does not contain an @ symbol.
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    /// The local part (before @) is empty.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The domain part (after @) is not of the form `name.tld`.
    #[error("email domain must contain a dot between non-empty labels")]
    InvalidDomain,
}

/// An email address.
///
/// An address is accepted when it has no whitespace, a non-empty local part
/// and a domain with a dot that has at least one character on each side.
/// There is no length limit.
///
/// ## Examples
///
/// ```
/// use under_the_hood_core::Email;
///
/// assert!(Email::parse("pitmaster@underthehood.nz").is_ok());
/// assert!(Email::parse("a@b.c").is_ok());
///
/// assert!(Email::parse("").is_err());               // empty
/// assert!(Email::parse("no-at-symbol").is_err());   // missing @
/// assert!(Email::parse("user@localhost").is_err()); // no dot in domain
/// assert!(Email::parse("us er@x.nz").is_err());     // whitespace
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Contains whitespace
    /// - Has no @ symbol, an empty local part, or a domain without a dot
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let mut ats = s.match_indices('@').map(|(pos, _)| pos).peekable();
        if ats.peek().is_none() {
            return Err(EmailError::MissingAtSymbol);
        }

        // Any @ with a non-empty local part and a dotted domain after it will do.
        let mut saw_local = false;
        for at in ats {
            if at == 0 {
                continue;
            }
            saw_local = true;
            if s.get(at + 1..).is_some_and(has_dotted_domain) {
                return Ok(Self(s.to_owned()));
            }
        }

        if saw_local {
            Err(EmailError::InvalidDomain)
        } else {
            Err(EmailError::EmptyLocalPart)
        }
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the domain part of the email (after the last @).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.rsplit('@').next().unwrap_or("")
    }
}

fn has_dotted_domain(domain: &str) -> bool {
    domain
        .match_indices('.')
        .any(|(dot, _)| dot > 0 && dot + 1 < domain.len())
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
