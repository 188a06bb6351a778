use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const MAX_LEN: usize = 64;

/// A username. It is part of the ledger file name, so only path-safe characters are allowed:
/// ASCII letters, digits, `_`, `-` and `.`, not starting with `.`.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(s: impl Into<String>) -> Result<Self, UsernameError> {
        let s = s.into();
        validate(&s)?;
        Ok(Self(s))
    }
}

fn validate(s: &str) -> Result<(), UsernameError> {
    if s.is_empty() {
        return Err(UsernameError(String::from("A username is required")));
    }
    if s.len() > MAX_LEN {
        return Err(UsernameError(format!(
            "A username can be at most {MAX_LEN} characters long"
        )));
    }
    if s.starts_with('.') {
        return Err(UsernameError(format!(
            "A username must not start with '.', got '{s}'"
        )));
    }
    if let Some(bad) = s
        .chars()
        .find(|&c| !(c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.'))
    {
        return Err(UsernameError(format!(
            "A username may only contain letters, digits, '_', '-' and '.'. \
            '{s}' has illegal char '{bad}'"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UsernameError(String);

impl Display for UsernameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for UsernameError {}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Username {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Username::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        for s in ["alice", "Bob_99", "j.doe", "a-b"] {
            assert!(Username::new(s).is_ok(), "{s} should be valid");
        }
    }

    #[test]
    fn test_invalid_usernames() {
        for s in ["", ".hidden", "../etc", "has space", "slash/name", "émile"] {
            assert!(Username::new(s).is_err(), "{s} should be invalid");
        }
        assert!(Username::new("x".repeat(65)).is_err());
    }
}
