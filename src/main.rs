use clap::Parser;
use spendbook::args::{Args, Command};
use spendbook::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with {} error: {e}", e.error_type());
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Signup(signup_args) => {
            let config = Config::load(home).await?;
            commands::signup(config, signup_args.clone()).await?.print()
        }

        Command::Login(login_args) => {
            let config = Config::load(home).await?;
            commands::login(config, login_args.clone()).await?.print()
        }

        Command::Add(add_args) => {
            let config = Config::load(home).await?;
            let session = commands::authenticate(&config, add_args.login()).await?;
            commands::add(config, &session, add_args.clone())
                .await?
                .print()
        }

        Command::Edit(edit_args) => {
            let config = Config::load(home).await?;
            let session = commands::authenticate(&config, edit_args.login()).await?;
            commands::edit(config, &session, edit_args.clone())
                .await?
                .print()
        }

        Command::Delete(delete_args) => {
            let config = Config::load(home).await?;
            let session = commands::authenticate(&config, delete_args.login()).await?;
            commands::delete(config, &session, delete_args.clone())
                .await?
                .print()
        }

        Command::Search(search_args) => {
            let config = Config::load(home).await?;
            let session = commands::authenticate(&config, search_args.login()).await?;
            commands::search(config, &session, search_args.clone())
                .await?
                .print()
        }

        Command::Summary(summary_args) => {
            let config = Config::load(home).await?;
            let session = commands::authenticate(&config, summary_args.login()).await?;
            commands::summary(config, &session, summary_args.clone())
                .await?
                .print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
