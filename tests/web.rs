#![cfg(target_arch = "wasm32")]

use ktshell::web::Terminal;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

fn noop() -> js_sys::Function {
    js_sys::Function::new_no_args("")
}

fn field(response: &JsValue, name: &str) -> Option<String> {
    js_sys::Reflect::get(response, &JsValue::from_str(name)).ok().and_then(|v| v.as_string())
}

fn status(response: &JsValue) -> String {
    field(response, "status").unwrap_or_default()
}

#[wasm_bindgen_test]
fn test_terminal_boots_with_default_tree() {
    let terminal = Terminal::new(None, None).unwrap();
    assert_eq!(terminal.prompt(), "[guest@aaronnech.com /]$ ");
    assert_eq!(terminal.current_directory(), "/");
    assert!(!terminal.is_busy());
}

#[wasm_bindgen_test]
fn test_execute_reports_status() {
    let mut terminal = Terminal::new(None, None).unwrap();
    assert_eq!(status(&terminal.execute("   ", noop())), "empty");

    let response = terminal.execute("zzz", noop());
    assert_eq!(status(&response), "unrecognized");
    assert_eq!(field(&response, "output").as_deref(), Some("Err: unrecognized command \"zzz\""));

    assert_eq!(status(&terminal.execute("cd Projects", noop())), "completed");
    assert_eq!(terminal.current_directory(), "/Projects/");
    assert_eq!(terminal.previous_command().as_deref(), Some("cd Projects"));
}

#[wasm_bindgen_test]
fn test_synchronous_output_is_returned() {
    // a callback that re-enters the terminal would throw if it ran inside execute
    let mut terminal = Terminal::new(None, None).unwrap();
    let throwing = js_sys::Function::new_no_args("throw new Error('called too early')");
    let response = terminal.execute("echo \"hi\"", throwing);
    assert_eq!(status(&response), "completed");
    assert_eq!(field(&response, "output").as_deref(), Some("hi"));
}

#[wasm_bindgen_test]
fn test_input_block_round_trip() {
    let mut terminal = Terminal::new(None, Some(r#"{"user":"kt"}"#.to_string())).unwrap();
    assert!(!terminal.deliver_input("nobody waiting"));
    assert_eq!(status(&terminal.execute("kttext notes.txt", noop())), "running");
    assert!(terminal.is_busy());
    assert_eq!(status(&terminal.execute("ls", noop())), "busy");
    assert!(terminal.deliver_input("hello"));
    assert!(!terminal.is_busy());
    assert!(terminal.prompt().starts_with("[kt@aaronnech.com"));
}

#[wasm_bindgen_test]
fn test_interrupt_drops_waiting_command() {
    let mut terminal = Terminal::new(None, None).unwrap();
    terminal.execute("echo", noop());
    assert!(terminal.interrupt());
    assert!(!terminal.deliver_input("late"));
    assert!(!terminal.interrupt());
    assert_eq!(terminal.previous_command(), None);
}

#[wasm_bindgen_test]
fn test_bad_tree_is_rejected() {
    assert!(Terminal::new(Some("not json".to_string()), None).is_err());
}
