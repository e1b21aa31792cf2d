// browser facade: one Terminal per page terminal
// the page owns the display, we own the shell
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::command::{Collaborators, Completion, Dispatch, FetchCallback, InputCallback};
use crate::config::SessionConfig;
use crate::context::Session;
use crate::error::ShellError;
use crate::layout::default_tree;
use crate::vfs::VirtualFileSystem;

/// Collaborators backed by the page. Input requests wait here until the
/// page calls `deliver_input`.
#[derive(Default)]
struct BrowserIo {
    pending: RefCell<Option<InputCallback>>,
    input_handler: RefCell<Option<js_sys::Function>>,
    clear_handler: RefCell<Option<js_sys::Function>>,
}

impl BrowserIo {
    fn take_pending(&self) -> Option<InputCallback> {
        self.pending.borrow_mut().take()
    }
}

impl Collaborators for BrowserIo {
    fn fetch(&self, url: &str, on_result: FetchCallback) {
        let url = url.to_string();
        spawn_local(async move {
            let result = fetch_text(&url).await.map_err(|e| ShellError::Connection(format!("{:?}", e)));
            on_result(result);
        });
    }

    fn take_input(&self, prefill: Option<String>, on_input: InputCallback) {
        *self.pending.borrow_mut() = Some(on_input);
        let handler = self.input_handler.borrow().clone();
        match handler {
            Some(f) => {
                let arg = prefill.map(|text| JsValue::from_str(&text)).unwrap_or(JsValue::NULL);
                call_later("input handler", f, Some(arg));
            }
            None => web_sys::console::warn_1(&"[ktshell] input requested but no input handler is set".into()),
        }
    }

    fn clear_history(&self) {
        let handler = self.clear_handler.borrow().clone();
        if let Some(f) = handler {
            call_later("clear handler", f, None);
        }
    }
}

// Page callbacks may call back into the Terminal, which wasm-bindgen
// refuses while one of its methods is still on the stack. Run them on a
// microtask instead.
fn call_later(what: &'static str, f: js_sys::Function, arg: Option<JsValue>) {
    spawn_local(async move {
        let result = match arg {
            Some(arg) => f.call1(&JsValue::NULL, &arg),
            None => f.call0(&JsValue::NULL),
        };
        if let Err(e) = result {
            web_sys::console::error_2(&format!("[ktshell] {} threw:", what).into(), &e);
        }
    });
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window object available"))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);
    let request = Request::new_with_str_and_init(url, &opts)?;

    let value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let response: Response = value.dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!("HTTP error: {}", response.status())));
    }
    let body = JsFuture::from(response.text()?).await?;
    body.as_string().ok_or_else(|| JsValue::from_str("response body is not text"))
}

/// What `execute` hands back to the page.
#[derive(Serialize)]
struct ExecuteResponse {
    /// `empty`, `unrecognized`, `busy`, `running` or `completed`
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
}

#[wasm_bindgen]
pub struct Terminal {
    session: Session,
    io: Rc<BrowserIo>,
}

#[wasm_bindgen]
impl Terminal {
    /// Both arguments are JSON documents; either may be omitted to get the
    /// built-in tree or the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(tree_json: Option<String>, config_json: Option<String>) -> Result<Terminal, JsValue> {
        let vfs = match tree_json {
            Some(json) => VirtualFileSystem::from_json(&json),
            None => VirtualFileSystem::from_entries(default_tree()),
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let config = match config_json {
            Some(json) => SessionConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => SessionConfig::default(),
        };

        let io = Rc::new(BrowserIo::default());
        let session = Session::new(vfs, config, io.clone());
        web_sys::console::log_1(&"[ktshell] terminal ready".into());
        Ok(Terminal { session, io })
    }

    /// Run one line and return `{status, output?}`. Output produced before
    /// this returns is in the response; output of a command that is still
    /// `running` goes to `callback` later.
    pub fn execute(&mut self, line: &str, callback: js_sys::Function) -> JsValue {
        let early = Rc::new(RefCell::new(None));
        let returned = Rc::new(Cell::new(false));
        let done: Completion = {
            let early = Rc::clone(&early);
            let returned = Rc::clone(&returned);
            Box::new(move |output: String| {
                if returned.get() {
                    call_later("output callback", callback, Some(JsValue::from_str(&output)));
                } else {
                    *early.borrow_mut() = Some(output);
                }
            })
        };
        let dispatch = self.session.submit(line, done);
        returned.set(true);

        let response = match dispatch {
            Dispatch::Empty => ExecuteResponse { status: "empty", output: None },
            Dispatch::Busy => ExecuteResponse { status: "busy", output: None },
            Dispatch::Unrecognized(msg) => ExecuteResponse { status: "unrecognized", output: Some(msg) },
            Dispatch::Started(handle) if handle.state().is_finished() => {
                ExecuteResponse { status: "completed", output: early.borrow_mut().take() }
            }
            Dispatch::Started(_) => ExecuteResponse { status: "running", output: None },
        };
        serde_wasm_bindgen::to_value(&response).unwrap_or_else(|e| {
            web_sys::console::error_2(&"[ktshell] could not encode response:".into(), &e.into());
            JsValue::NULL
        })
    }

    /// Hand a captured block to the command waiting for it. False when
    /// nothing was waiting.
    pub fn deliver_input(&self, text: &str) -> bool {
        match self.io.take_pending() {
            Some(on_input) => {
                on_input(text.to_string());
                true
            }
            None => false,
        }
    }

    /// Ctrl-C
    pub fn interrupt(&mut self) -> bool {
        // a stopped command never gets its block
        self.io.take_pending();
        let stopped = self.session.interrupt();
        if stopped {
            web_sys::console::log_1(&"[ktshell] command interrupted".into());
        }
        stopped
    }

    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }

    pub fn prompt(&self) -> String {
        self.session.prompt()
    }

    pub fn current_directory(&self) -> String {
        self.session.current_path()
    }

    pub fn previous_command(&mut self) -> Option<String> {
        self.session.previous_command()
    }

    pub fn next_command(&mut self) -> Option<String> {
        self.session.next_command()
    }

    pub fn command_names(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.session.command_names()).unwrap_or(JsValue::NULL)
    }

    /// The tree as it stands, in the same shape the constructor accepts.
    pub fn snapshot(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.session.fs().snapshot()).unwrap_or(JsValue::NULL)
    }

    /// `handler(prefill)` is called whenever a command wants an input
    /// block; `prefill` is a string or null.
    pub fn set_input_handler(&self, handler: js_sys::Function) {
        *self.io.input_handler.borrow_mut() = Some(handler);
    }

    pub fn set_clear_handler(&self, handler: js_sys::Function) {
        *self.io.clear_handler.borrow_mut() = Some(handler);
    }
}
