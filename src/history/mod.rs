pub mod command;
pub mod manager;

pub use command::Command;
pub use manager::{CommandList, HistoryConfig, RedoPolicy};
