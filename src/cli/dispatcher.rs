use crate::cli::command_handlers::{ConfigHandler, GetHandler, StatsHandler};
use crate::cli::list_handler::ListHandler;
use crate::cli::main_types::Commands;
use crate::cli::search_handler::SearchHandler;
use crate::core::context::AppContext;
use crate::error::AppError;

/// Routes a parsed command to its handler. Clients are created inside the
/// handlers, so commands that never touch the API never need a key.
pub struct Dispatcher {
    context: AppContext,
}

impl Dispatcher {
    pub fn new(context: AppContext) -> Self {
        Self { context }
    }

    pub async fn dispatch(&self, command: Commands) -> Result<(), AppError> {
        log::debug!("Dispatching {}", command_name(&command));

        match command {
            Commands::Search(args) => SearchHandler::new().handle(args, &self.context).await,
            Commands::List { command } => ListHandler::new().handle(command, &self.context).await,
            Commands::Get { command } => GetHandler::new().handle(command, &self.context).await,
            Commands::Stats { command } => {
                StatsHandler::new().handle(command, &self.context).await
            }
            Commands::Config { command } => ConfigHandler::new().handle(command, &self.context),
        }
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Search(_) => "search",
        Commands::List { .. } => "list",
        Commands::Get { .. } => "get",
        Commands::Stats { .. } => "stats",
        Commands::Config { .. } => "config",
    }
}
