pub mod command_handlers;
pub mod dispatcher;
pub mod list_handler;
pub mod main_types;
pub mod search_handler;
