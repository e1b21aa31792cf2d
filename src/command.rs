use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::config::SessionConfig;
use crate::error::ShellError;
use crate::vfs::VirtualFileSystem;

/// The filesystem as handlers see it. Shared with continuations that run
/// after a handler has returned, so it lives behind `Rc<RefCell<_>>`.
pub type SharedFs = Rc<RefCell<VirtualFileSystem>>;

/// One-shot sink for a command's final output.
pub type Completion = Box<dyn FnOnce(String)>;
pub type InputCallback = Box<dyn FnOnce(String)>;
pub type FetchCallback = Box<dyn FnOnce(Result<String, ShellError>)>;

pub type CommandResult = Result<String, ShellError>;

/// Services the caller provides: the network, captured keyboard input and
/// the on-screen history. Implementations may invoke callbacks
/// synchronously or later from their own event loop.
pub trait Collaborators {
    /// GET `url`. Every failure, immediate or late, arrives as `Err`.
    fn fetch(&self, url: &str, on_result: FetchCallback);

    /// Hand the next captured input block to `on_input`. `prefill` is text
    /// the input area should start with.
    fn take_input(&self, prefill: Option<String>, on_input: InputCallback);

    fn clear_history(&self);
}

/// What a handler gets besides its arguments.
#[derive(Clone)]
pub struct CommandContext {
    pub fs: SharedFs,
    pub io: Rc<dyn Collaborators>,
    pub config: Rc<SessionConfig>,
}

pub trait Command {
    /// `args[0]` is the command name. The handler must eventually call
    /// `done` exactly once, or drop it if it is cancelled from outside.
    fn execute(&self, args: &[String], ctx: &CommandContext, done: Completion);
}

/// Render a handler result: errors become their user-facing message.
pub fn finish(done: Completion, result: CommandResult) {
    match result {
        Ok(output) => done(output),
        Err(e) => done(e.to_string()),
    }
}

/// A raw line split on whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub text: String,
    pub args: Vec<String>,
}

impl ParsedLine {
    pub fn parse(line: &str) -> Self {
        Self {
            text: line.to_string(),
            args: line.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Running,
    AwaitingInput,
    Completed,
    Cancelled,
}

impl CommandState {
    pub fn is_finished(self) -> bool {
        matches!(self, CommandState::Completed | CommandState::Cancelled)
    }
}

/// Caller-side view of one in-flight command.
#[derive(Debug, Clone)]
pub struct CommandHandle {
    line: ParsedLine,
    state: Rc<Cell<CommandState>>,
}

impl CommandHandle {
    fn new(line: ParsedLine) -> Self {
        Self { line, state: Rc::new(Cell::new(CommandState::Running)) }
    }

    pub fn text(&self) -> &str {
        &self.line.text
    }

    pub fn args(&self) -> &[String] {
        &self.line.args
    }

    pub fn state(&self) -> CommandState {
        self.state.get()
    }

    pub fn is_stopped(&self) -> bool {
        self.state.get() == CommandState::Cancelled
    }

    /// Ctrl-C. Whatever the handler still delivers is dropped. Returns
    /// false if the command had already finished.
    pub fn stop(&self) -> bool {
        if self.state.get().is_finished() {
            return false;
        }
        self.state.set(CommandState::Cancelled);
        true
    }

    // completion that only fires while the command is live
    fn guard(&self, done: Completion) -> Completion {
        let state = Rc::clone(&self.state);
        let name = self.line.name().unwrap_or_default().to_string();
        Box::new(move |output| match state.get() {
            CommandState::Running | CommandState::AwaitingInput => {
                state.set(CommandState::Completed);
                done(output);
            }
            CommandState::Cancelled => {
                tracing::debug!(command = %name, "dropping output of cancelled command");
            }
            CommandState::Completed => {
                tracing::warn!(command = %name, "command completed twice");
            }
        })
    }
}

/// Collaborators wrapper that moves the command into `AwaitingInput` while
/// something external is outstanding.
struct TrackedIo {
    inner: Rc<dyn Collaborators>,
    state: Rc<Cell<CommandState>>,
}

impl TrackedIo {
    fn suspend(&self) {
        if self.state.get() == CommandState::Running {
            self.state.set(CommandState::AwaitingInput);
        }
    }

    fn resumer(&self) -> impl Fn() {
        let state = Rc::clone(&self.state);
        move || {
            if state.get() == CommandState::AwaitingInput {
                state.set(CommandState::Running);
            }
        }
    }
}

impl Collaborators for TrackedIo {
    fn fetch(&self, url: &str, on_result: FetchCallback) {
        self.suspend();
        let resume = self.resumer();
        self.inner.fetch(
            url,
            Box::new(move |result| {
                resume();
                on_result(result)
            }),
        );
    }

    fn take_input(&self, prefill: Option<String>, on_input: InputCallback) {
        self.suspend();
        let resume = self.resumer();
        self.inner.take_input(
            prefill,
            Box::new(move |text| {
                resume();
                on_input(text)
            }),
        );
    }

    fn clear_history(&self) {
        self.inner.clear_history();
    }
}

pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command + Send + Sync>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self { commands: HashMap::new() }
    }

    pub fn register_command(&mut self, name: &str, cmd: Box<dyn Command + Send + Sync>) {
        self.commands.insert(name.to_string(), cmd);
    }

    pub fn get(&self, name: &str) -> Option<&(dyn Command + Send + Sync)> {
        self.commands.get(name).map(|cmd| cmd.as_ref())
    }

    pub fn get_command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn default_commands() -> Self {
        let mut reg = Self::new();
        reg.register_command("ls", Box::new(crate::commands::ls::LsCommand));
        reg.register_command("cat", Box::new(crate::commands::cat::CatCommand));
        reg.register_command("cd", Box::new(crate::commands::cd::CdCommand));
        reg.register_command("clear", Box::new(crate::commands::clear::ClearCommand));
        reg.register_command("wget", Box::new(crate::commands::wget::WgetCommand));
        reg.register_command("echo", Box::new(crate::commands::echo::EchoCommand));
        reg.register_command("kttext", Box::new(crate::commands::kttext::KttextCommand));
        reg
    }
}

/// Result of handing a line to the dispatcher.
#[derive(Debug, Clone)]
pub enum Dispatch {
    /// Blank line, nothing ran.
    Empty,
    /// No handler with that name. The completion was not called; the
    /// message is the output to show.
    Unrecognized(String),
    /// A handler ran. It may already be `Completed`.
    Started(CommandHandle),
    /// Another command is still waiting on input or the network. The line
    /// was not run and the completion was dropped.
    Busy,
}

pub struct CommandDispatcher {
    registry: CommandRegistry,
    config: Rc<SessionConfig>,
}

impl CommandDispatcher {
    pub fn new(registry: CommandRegistry, config: Rc<SessionConfig>) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn lookup(&self, name: &str) -> Option<&(dyn Command + Send + Sync)> {
        self.registry.get(name)
    }

    pub fn dispatch(&self, line: &str, fs: &SharedFs, io: Rc<dyn Collaborators>, done: Completion) -> Dispatch {
        let parsed = ParsedLine::parse(line);
        let Some(name) = parsed.name() else {
            return Dispatch::Empty;
        };
        let Some(handler) = self.lookup(name) else {
            tracing::debug!(command = %name, "unrecognized command");
            return Dispatch::Unrecognized(ShellError::UnrecognizedCommand(name.to_string()).to_string());
        };

        tracing::debug!(command = %name, argc = parsed.args.len() - 1, "dispatching");
        let handle = CommandHandle::new(parsed);
        let ctx = CommandContext {
            fs: Rc::clone(fs),
            io: Rc::new(TrackedIo { inner: io, state: Rc::clone(&handle.state) }),
            config: Rc::clone(&self.config),
        };
        handler.execute(handle.args(), &ctx, handle.guard(done));
        Dispatch::Started(handle)
    }
}
