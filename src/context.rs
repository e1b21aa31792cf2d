use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::command::{
    Collaborators, CommandDispatcher, CommandHandle, CommandRegistry, Completion, Dispatch, SharedFs,
};
use crate::config::SessionConfig;
use crate::history::CommandHistory;
use crate::vfs::VirtualFileSystem;

/// One terminal: its filesystem, its own command registry, the front end's
/// collaborators and whatever command is currently in flight.
pub struct Session {
    fs: SharedFs,
    dispatcher: CommandDispatcher,
    config: Rc<SessionConfig>,
    io: Rc<dyn Collaborators>,
    history: Rc<RefCell<CommandHistory>>,
    current: Option<CommandHandle>,
}

impl Session {
    pub fn new(vfs: VirtualFileSystem, config: SessionConfig, io: Rc<dyn Collaborators>) -> Self {
        Self::with_registry(vfs, config, io, CommandRegistry::default_commands())
    }

    pub fn with_registry(
        vfs: VirtualFileSystem,
        config: SessionConfig,
        io: Rc<dyn Collaborators>,
        registry: CommandRegistry,
    ) -> Self {
        let config = Rc::new(config);
        Self {
            fs: Rc::new(RefCell::new(vfs)),
            dispatcher: CommandDispatcher::new(registry, Rc::clone(&config)),
            config,
            io,
            history: Rc::new(RefCell::new(CommandHistory::new())),
            current: None,
        }
    }

    /// Run one line. Handlers that finish right away have already called
    /// `done` when this returns; an unrecognized command never calls it and
    /// hands its message back in [`Dispatch::Unrecognized`] instead. While a
    /// command is in flight every line is refused with [`Dispatch::Busy`].
    ///
    /// A line enters the recall history once its command completes, or
    /// right away when it is unrecognized. Interrupted commands never do.
    pub fn submit(&mut self, line: &str, done: Completion) -> Dispatch {
        if self.is_busy() {
            tracing::debug!(line, "refused, a command is still running");
            return Dispatch::Busy;
        }
        let history = Rc::clone(&self.history);
        let text = line.to_string();
        let done: Completion = Box::new(move |output| {
            history.borrow_mut().push(&text);
            done(output)
        });
        let dispatch = self.dispatcher.dispatch(line, &self.fs, Rc::clone(&self.io), done);
        if let Dispatch::Unrecognized(_) = &dispatch {
            self.history.borrow_mut().push(line);
        }
        self.current = match &dispatch {
            Dispatch::Started(handle) if !handle.state().is_finished() => Some(handle.clone()),
            _ => None,
        };
        dispatch
    }

    /// Ctrl-C. Stops the in-flight command, if any, so its late output is
    /// discarded. Returns whether something was stopped.
    pub fn interrupt(&mut self) -> bool {
        match self.current.take() {
            Some(handle) => {
                let stopped = handle.stop();
                if stopped {
                    tracing::debug!(command = %handle.text(), "interrupted");
                }
                stopped
            }
            None => false,
        }
    }

    /// True while a command waits on input or the network.
    pub fn is_busy(&self) -> bool {
        self.current.as_ref().is_some_and(|h| !h.state().is_finished())
    }

    pub fn current_command(&self) -> Option<&CommandHandle> {
        self.current.as_ref().filter(|h| !h.state().is_finished())
    }

    /// `[guest@aaronnech.com /Projects/]$ `
    pub fn prompt(&self) -> String {
        format!("[{}@{} {}]$ ", self.config.user, self.config.host, self.fs.borrow().current_path())
    }

    pub fn current_path(&self) -> String {
        self.fs.borrow().current_path().to_string()
    }

    pub fn fs(&self) -> Ref<'_, VirtualFileSystem> {
        self.fs.borrow()
    }

    pub fn shared_fs(&self) -> &SharedFs {
        &self.fs
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn previous_command(&mut self) -> Option<String> {
        self.history.borrow_mut().previous().map(str::to_string)
    }

    pub fn next_command(&mut self) -> Option<String> {
        self.history.borrow_mut().next().map(str::to_string)
    }

    pub fn history(&self) -> Ref<'_, CommandHistory> {
        self.history.borrow()
    }

    pub fn command_names(&self) -> Vec<String> {
        self.dispatcher.registry().get_command_names()
    }
}
