//! Delete command handler.

use crate::args::DeleteArgs;
use crate::auth::Session;
use crate::commands::{find_target, ExpenseView, Out};
use crate::error::{Error, ErrorType};
use crate::{Config, Result};
use tracing::debug;

/// Removes one expense from the session user's ledger. Later expenses move up one id the next
/// time the ledger is loaded.
///
/// # Errors
/// - `NotFound` if the user has no ledger file, the target does not exist, or the expense at
///   `--id` does not have the `--select` label.
/// - `Validation` if `--yes` was not given. Nothing is deleted then.
pub async fn delete(
    config: Config,
    session: &Session,
    args: DeleteArgs,
) -> Result<Out<ExpenseView>> {
    let store = config.store();
    let mut ledger = store.load_existing(session.username()).await?;

    let target = find_target(&ledger, args.target())?;
    let id = target.id();
    if !args.yes() {
        return Err(Error::msg(
            ErrorType::Validation,
            format!("Pass --yes to confirm deleting '{}'", target.label()),
        ));
    }

    let removed = ledger.delete(id)?;
    store.save(&ledger).await?;
    debug!("Deleted expense {id} of {}", session.username());

    let view = ExpenseView::from(&removed);
    let message = format!(
        "Expense deleted successfully!\n{}",
        view.line(config.currency_symbol())
    );
    Ok(Out::new(message, view))
}
