//! Account command handlers.
//!
//! This module implements the CLI commands for:
//! - `spendbook signup` - Register a new user
//! - `spendbook login` - Check credentials and show the user's ledger

use crate::args::{LoginArgs, SignupArgs};
use crate::auth::{Credentials, Session};
use crate::commands::{Listing, Out};
use crate::model::Username;
use crate::{Config, Result};
use tracing::debug;

/// Checks the username and password in `login` against the credentials file.
///
/// # Errors
/// - `Auth` if the user is unknown or the password is wrong.
/// - `Storage` if the credentials file cannot be read.
pub async fn authenticate(config: &Config, login: &LoginArgs) -> Result<Session> {
    let credentials = Credentials::load(config.credentials_path()).await?;
    credentials.login(login.user(), login.password())
}

/// Handles `spendbook signup`.
pub async fn signup(config: Config, args: SignupArgs) -> Result<Out<Username>> {
    let mut credentials = Credentials::load(config.credentials_path()).await?;
    let username = credentials
        .signup(args.user(), args.password(), args.confirm_password())
        .await?;
    Ok(Out::new(
        format!("Signup successful! You can now log in as {username}"),
        username,
    ))
}

/// Handles `spendbook login`. On success the user's whole ledger is listed.
pub async fn login(config: Config, args: LoginArgs) -> Result<Out<Listing>> {
    let session = authenticate(&config, &args).await?;
    let ledger = config.store().load(session.username()).await?;
    debug!("{} has {} expenses", session.username(), ledger.len());

    let listing = Listing::new(ledger.entries());
    let message = if listing.is_empty() {
        format!("Welcome {}! No expenses recorded yet", session.username())
    } else {
        listing.render(
            &format!("Welcome {}! Your expenses:", session.username()),
            config.currency_symbol(),
        )
    };
    Ok(Out::new(message, listing))
}
