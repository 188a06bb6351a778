use crate::args::AddArgs;
use crate::auth::Session;
use crate::commands::{ExpenseView, Out};
use crate::error::{Error, ErrorType};
use crate::model::{ExpenseDate, ExpenseRecord};
use crate::{Config, Result};
use tracing::debug;

/// Appends an expense to the session user's ledger. The date defaults to today.
///
/// # Errors
/// - `Validation` if the title is blank. Nothing is saved in that case.
/// - `Storage` or `Parse` if the existing ledger cannot be loaded, or it cannot be saved.
pub async fn add(config: Config, session: &Session, args: AddArgs) -> Result<Out<ExpenseView>> {
    let date = args.date().unwrap_or_else(ExpenseDate::today);
    let record = ExpenseRecord::new(date, args.title(), args.amount())?;

    let store = config.store();
    let mut ledger = store.load(session.username()).await?;
    let id = ledger.add(record);
    store.save(&ledger).await?;
    debug!("Added expense {id} for {}", session.username());

    let view = ledger.get(id).map(ExpenseView::from).ok_or_else(|| {
        Error::msg(ErrorType::NotFound, format!("Expense {id} vanished after adding it"))
    })?;
    let message = format!(
        "Expense has been added successfully!\n{}",
        view.line(config.currency_symbol())
    );
    Ok(Out::new(message, view))
}
