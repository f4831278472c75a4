pub mod command_handler;
pub mod commands;
pub mod error;
pub mod session;
pub mod views;

pub use command_handler::CommandHandler;
pub use commands::AppCommand;
pub use session::EditorSession;
