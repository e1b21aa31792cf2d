// in-memory shell for terminal-style web pages
// one Session per terminal, front ends plug in through Collaborators
pub mod command;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod history;
pub mod layout;
pub mod vfs;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod test_utils;

pub use command::{
    Collaborators, Command, CommandContext, CommandHandle, CommandRegistry, CommandState, Completion, Dispatch,
    FetchCallback, InputCallback,
};
pub use config::SessionConfig;
pub use context::Session;
pub use error::{ConfigError, FsError, ShellError};
pub use layout::{default_tree, EntrySpec};
pub use vfs::{Permissions, VirtualFileSystem};
