use crate::args::EditArgs;
use crate::auth::Session;
use crate::commands::{find_target, ExpenseView, Out};
use crate::error::{Error, ErrorType};
use crate::{Config, Result};
use tracing::debug;

/// Replaces the title and/or amount of one expense in the session user's ledger. The date of an
/// expense cannot be changed.
///
/// # Errors
/// - `NotFound` if the user has no ledger file, the target does not exist, or the expense at
///   `--id` does not have the `--select` label.
/// - `Validation` if `--yes` was not given or the new title is blank. Nothing is saved then.
pub async fn edit(config: Config, session: &Session, args: EditArgs) -> Result<Out<ExpenseView>> {
    let store = config.store();
    let mut ledger = store.load_existing(session.username()).await?;

    let current = find_target(&ledger, args.target())?;
    let id = current.id();
    let title = args.title().unwrap_or(current.title()).to_string();
    let amount = args.amount().unwrap_or(current.amount());
    if !args.yes() {
        return Err(Error::msg(
            ErrorType::Validation,
            format!(
                "Pass --yes to confirm changing '{}' to '{title} - {amount}'",
                current.label()
            ),
        ));
    }

    let view = ExpenseView::from(ledger.edit(id, &title, amount)?);
    store.save(&ledger).await?;
    debug!("Edited expense {id} of {}", session.username());

    let message = format!(
        "Expense updated successfully!\n{}",
        view.line(config.currency_symbol())
    );
    Ok(Out::new(message, view))
}
