use clap::{CommandFactory, Parser};
use std::time::Duration;
use trioexplorer::AppError;
use trioexplorer::cli::dispatcher::Dispatcher;
use trioexplorer::cli::main_types::{Cli, Commands};
use trioexplorer::core::context::AppContext;
use trioexplorer::storage::config::{Config, load_env_files};
use trioexplorer::utils::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.debug) {
        eprintln!("Warning: logging unavailable: {}", err);
    }

    let Some(command) = cli.command else {
        // Bare invocation shows help and succeeds
        let _ = Cli::command().print_help();
        println!();
        return;
    };

    load_env_files();

    if let Err(err) = run(command, cli.api_url, cli.timeout, cli.debug).await {
        eprintln!("{}", err.user_message());
        std::process::exit(err.exit_code());
    }
}

async fn run(
    command: Commands,
    api_url: Option<String>,
    timeout: Option<Duration>,
    debug: bool,
) -> Result<(), AppError> {
    let config = Config::load(None)?;
    let context = AppContext::new(config, api_url, timeout, debug);

    Dispatcher::new(context).dispatch(command).await
}
