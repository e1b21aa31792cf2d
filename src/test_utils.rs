//! Scripted collaborators for unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::command::{Collaborators, Command, CommandContext, Completion, FetchCallback, InputCallback};
use crate::config::SessionConfig;
use crate::error::ShellError;
use crate::vfs::VirtualFileSystem;

/// Records every request and holds pending callbacks until the test
/// delivers a result.
#[derive(Default)]
pub struct ScriptedIo {
    pending_input: RefCell<Option<InputCallback>>,
    pending_fetch: RefCell<Option<FetchCallback>>,
    prefills: RefCell<Vec<Option<String>>>,
    urls: RefCell<Vec<String>>,
    clears: Cell<usize>,
    /// When set, `fetch` fails on the spot instead of waiting.
    pub fail_fetch: Cell<bool>,
}

impl ScriptedIo {
    pub fn deliver_input(&self, text: &str) -> bool {
        // release the borrow before running the continuation
        let pending = self.pending_input.borrow_mut().take();
        match pending {
            Some(on_input) => {
                on_input(text.to_string());
                true
            }
            None => false,
        }
    }

    pub fn deliver_fetch(&self, result: Result<String, ShellError>) -> bool {
        let pending = self.pending_fetch.borrow_mut().take();
        match pending {
            Some(on_result) => {
                on_result(result);
                true
            }
            None => false,
        }
    }

    pub fn input_requests(&self) -> usize {
        self.prefills.borrow().len()
    }

    pub fn last_prefill(&self) -> Option<String> {
        self.prefills.borrow().last().cloned().flatten()
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.borrow().clone()
    }

    pub fn clears(&self) -> usize {
        self.clears.get()
    }
}

impl Collaborators for ScriptedIo {
    fn fetch(&self, url: &str, on_result: FetchCallback) {
        self.urls.borrow_mut().push(url.to_string());
        if self.fail_fetch.get() {
            on_result(Err(ShellError::Connection(format!("refused: {url}"))));
        } else {
            *self.pending_fetch.borrow_mut() = Some(on_result);
        }
    }

    fn take_input(&self, prefill: Option<String>, on_input: InputCallback) {
        self.prefills.borrow_mut().push(prefill);
        *self.pending_input.borrow_mut() = Some(on_input);
    }

    fn clear_history(&self) {
        self.clears.set(self.clears.get() + 1);
    }
}

/// A completion that stores what it was called with.
pub fn collect() -> (Completion, Rc<RefCell<Option<String>>>) {
    let slot = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&slot);
    let done: Completion = Box::new(move |output| *sink.borrow_mut() = Some(output));
    (done, slot)
}

/// Handler context over `vfs` with default config, plus the scripted side
/// of its collaborators.
pub fn context(vfs: VirtualFileSystem) -> (CommandContext, Rc<ScriptedIo>) {
    let io = Rc::new(ScriptedIo::default());
    let ctx = CommandContext {
        fs: Rc::new(RefCell::new(vfs)),
        io: io.clone(),
        config: Rc::new(SessionConfig::default()),
    };
    (ctx, io)
}

pub fn args(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Run `line` through `cmd` and return what it completed with, if anything.
pub fn run(cmd: &dyn Command, line: &str, ctx: &CommandContext) -> Option<String> {
    let (done, out) = collect();
    cmd.execute(&args(line), ctx, done);
    let result = out.borrow().clone();
    result
}
