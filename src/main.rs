use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use ktshell::{
    default_tree, Collaborators, ConfigError, Dispatch, FetchCallback, InputCallback, Session, SessionConfig,
    ShellError, VirtualFileSystem,
};

/// ktshell - the in-memory shell, on a real terminal
#[derive(Parser, Debug)]
#[command(name = "ktshell", version, about)]
struct Args {
    /// JSON tree description to boot from instead of the built-in one
    #[arg(long)]
    tree: Option<PathBuf>,

    /// JSON session configuration
    #[arg(long)]
    config: Option<PathBuf>,
}

// a line holding only this ends an input block
const END_OF_BLOCK: &str = ".";

/// Console collaborators. Input requests are parked until the loop reads
/// the block; there is no network.
#[derive(Default)]
struct ConsoleIo {
    pending: RefCell<Option<(Option<String>, InputCallback)>>,
}

impl Collaborators for ConsoleIo {
    fn fetch(&self, url: &str, on_result: FetchCallback) {
        tracing::info!(url, "no network on the console");
        on_result(Err(ShellError::Connection("no network on the console".into())));
    }

    fn take_input(&self, prefill: Option<String>, on_input: InputCallback) {
        *self.pending.borrow_mut() = Some((prefill, on_input));
    }

    fn clear_history(&self) {
        print!("\x1b[2J\x1b[H");
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ktshell: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load(args: &Args) -> Result<(VirtualFileSystem, SessionConfig), ConfigError> {
    let config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let vfs = match &args.tree {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
            VirtualFileSystem::from_json(&json)?
        }
        None => VirtualFileSystem::from_entries(default_tree())?,
    };
    Ok((vfs, config))
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let (vfs, config) = load(&args)?;
    let console = Rc::new(ConsoleIo::default());
    let mut session = Session::new(vfs, config, console.clone());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    loop {
        // a handler is waiting for a block
        let pending = console.pending.borrow_mut().take();
        if let Some((prefill, on_input)) = pending {
            if let Some(text) = prefill {
                println!("{}", text);
            }
            println!("(end input with a line holding a single '{}')", END_OF_BLOCK);
            let mut block = Vec::new();
            loop {
                match lines.next() {
                    Some(line) => {
                        let line = line?;
                        if line == END_OF_BLOCK {
                            break;
                        }
                        block.push(line);
                    }
                    None => return Ok(()),
                }
            }
            on_input(block.join("\n"));
            continue;
        }

        print!("{}", session.prompt());
        stdout.flush()?;
        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;
        if line.trim() == "exit" {
            break;
        }

        let done = Box::new(|output: String| {
            if !output.is_empty() {
                println!("{}", output);
            }
        });
        match session.submit(&line, done) {
            Dispatch::Unrecognized(msg) => println!("{}", msg),
            Dispatch::Busy => tracing::warn!(line = %line, "a command is still waiting for input"),
            Dispatch::Empty | Dispatch::Started(_) => {}
        }
    }
    Ok(())
}
