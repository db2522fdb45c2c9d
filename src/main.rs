use clap::Parser;
use sales_summary::args::{Args, Command};
use sales_summary::commands::{self, Input};
use sales_summary::{Config, Mode, Result};
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
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let json = args.common().json();

    // This allows for running the program without a data file. When SALES_SUMMARY_IN_TEST_MODE is
    // set and non-zero in length, then the mode will be Mode::Test, otherwise it will be
    // Mode::File.
    let mode = Mode::from_env();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => {
            commands::init(args.common().config().path(), init_args.data())
                .await?
                .print(json)
        }
        Command::Rows(rows_args) => commands::rows(&input(&args, mode).await?, rows_args)
            .await?
            .print(json),
        Command::Categories => commands::categories(&input(&args, mode).await?)
            .await?
            .print(json),
        Command::Months(months_args) => commands::months(&input(&args, mode).await?, months_args)
            .await?
            .print(json),
        Command::Subcategories(sub_args) => {
            commands::subcategories(&input(&args, mode).await?, sub_args)
                .await?
                .print(json)
        }
        Command::Metrics(select_args) => {
            commands::metrics(&input(&args, mode).await?, select_args)
                .await?
                .print(json)
        }
        Command::Report(report_args) => {
            commands::report(&input(&args, mode).await?, report_args)
                .await?
                .print(json)
        }
    };
    Ok(())
}

/// Loads the config file, if there is one, and combines it with the `--data` override.
async fn input(args: &Args, mode: Mode) -> Result<Input> {
    let config = Config::load_or_default(args.common().config().path()).await?;
    Ok(Input::new(
        config,
        mode,
        args.common().data().map(|p| p.to_path_buf()),
    ))
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        // Without RUST_LOG, only this crate logs, at the requested level.
        None => EnvFilter::new(format!(
            "{}={},{}={}",
            env!("CARGO_CRATE_NAME"),
            level,
            env!("CARGO_PKG_NAME").replace('-', "_"),
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
