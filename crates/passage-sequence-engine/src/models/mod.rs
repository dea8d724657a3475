pub mod breakpoint;
pub mod command;
pub mod passage;

pub use breakpoint::Breakpoint;
pub use command::{Command, CommandContent, CommandId, CommandKind, MenuOption};
pub use passage::Passage;
