//! User accounts stored in `$SPENDBOOK_HOME/user_credentials.json`.
//!
//! The file is a JSON object mapping each username to the hex encoded SHA-256 digest of the
//! password. Passwords themselves are never written anywhere.

use crate::error::{Error, ErrorType, IntoResult};
use crate::model::Username;
use crate::{utils, Result};
use anyhow::{ensure, Context};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const HASH_LEN: usize = 64;
const BAD_LOGIN: &str = "Invalid username or password";

/// The SHA-256 digest of a password as 64 lowercase hex characters.
#[derive(Clone, Eq, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn of(password: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    fn parse(s: &str) -> anyhow::Result<Self> {
        ensure!(
            s.len() == HASH_LEN && s.chars().all(|c| c.is_ascii_hexdigit()),
            "A password hash must be {HASH_LEN} hex characters"
        );
        Ok(Self(s.to_ascii_lowercase()))
    }

    pub fn matches(&self, password: &str) -> bool {
        *self == Self::of(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keeps digests out of trace output.
impl Debug for PasswordHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

impl Serialize for PasswordHash {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PasswordHash {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PasswordHash::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Proof that a user logged in. Every ledger command takes one.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Session {
    username: Username,
}

impl Session {
    pub fn username(&self) -> &Username {
        &self.username
    }
}

/// The registered users and their password hashes.
#[derive(Debug, Clone)]
pub struct Credentials {
    path: PathBuf,
    users: BTreeMap<Username, PasswordHash>,
}

impl Credentials {
    /// Loads the credentials file at `path`. A missing file means there are no users yet.
    ///
    /// # Errors
    /// - `Storage` if the file cannot be read, is not valid JSON, or holds a malformed username
    ///   or hash.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let users = load_users(&path).await.pub_result(ErrorType::Storage)?;
        debug!("Loaded {} user(s) from {}", users.len(), path.display());
        Ok(Self { path, users })
    }

    pub fn contains(&self, username: &Username) -> bool {
        self.users.contains_key(username)
    }

    /// Registers a new user and saves the credentials file.
    ///
    /// # Errors
    /// - `Validation` if a field is empty, the username has illegal characters, the passwords
    ///   differ, or the username is taken.
    /// - `Storage` if the file cannot be written. The user is not registered in that case.
    pub async fn signup(
        &mut self,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> Result<Username> {
        if username.is_empty() || password.is_empty() || confirm.is_empty() {
            return Err(Error::msg(ErrorType::Validation, "Please fill in all fields"));
        }
        let username = Username::new(username).pub_result(ErrorType::Validation)?;
        if password != confirm {
            return Err(Error::msg(ErrorType::Validation, "Passwords do not match"));
        }
        if self.contains(&username) {
            return Err(Error::msg(
                ErrorType::Validation,
                format!("Username already exists: {username}"),
            ));
        }

        self.users.insert(username.clone(), PasswordHash::of(password));
        if let Err(e) = self.save().await {
            self.users.remove(&username);
            return Err(e);
        }
        info!("Signed up {username}");
        Ok(username)
    }

    /// Checks `password` against the stored hash of `username`.
    ///
    /// # Errors
    /// - `Auth` if the user is unknown or the password is wrong. Both get the same message.
    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        let found = Username::new(username)
            .ok()
            .and_then(|u| self.users.get(&u).map(|hash| (u, hash)));
        match found {
            Some((username, hash)) if hash.matches(password) => {
                debug!("{username} logged in");
                Ok(Session { username })
            }
            _ => Err(Error::msg(ErrorType::Auth, BAD_LOGIN)),
        }
    }

    /// Rewrites the credentials file. On Unix the file is only readable by its owner.
    pub async fn save(&self) -> Result<()> {
        save_users(&self.path, &self.users)
            .await
            .pub_result(ErrorType::Storage)
    }
}

async fn load_users(path: &Path) -> anyhow::Result<BTreeMap<Username, PasswordHash>> {
    let Some(content) = utils::read_optional(path).await? else {
        return Ok(BTreeMap::new());
    };
    serde_json::from_str(&content)
        .with_context(|| format!("The credentials file at {} is corrupt", path.display()))
}

async fn save_users(path: &Path, users: &BTreeMap<Username, PasswordHash>) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(users).context("Failed to serialize credentials")?;
    utils::write_atomic(path, content)
        .await
        .with_context(|| format!("Failed to write credentials to {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)
            .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
    }
    Ok(())
}
