use std::rc::Rc;

use crate::command::{finish, Command, CommandContext, Completion};
use crate::error::ShellError;

/// kttext FILE
/// Whole-file editor: the input area opens with the current content of FILE
/// (if any) and whatever block comes back replaces it.
pub struct KttextCommand;

impl Command for KttextCommand {
    fn execute(&self, args: &[String], ctx: &CommandContext, done: Completion) {
        let Some(path) = args.get(1).cloned() else {
            finish(done, Err(ShellError::MissingArgument("file")));
            return;
        };
        // borrow ends here, the collaborator may answer synchronously
        let prefill = ctx.fs.borrow().read(&path).map(str::to_string);

        let fs = Rc::clone(&ctx.fs);
        ctx.io.take_input(
            prefill,
            Box::new(move |text: String| {
                let written = fs.borrow_mut().write(&path, &text);
                let result = match written {
                    Ok(()) => Ok(format!("Wrote {} characters to {}", text.chars().count(), path)),
                    Err(source) => {
                        tracing::debug!(path = %path, error = %source, "kttext write rejected");
                        Err(ShellError::WriteFailed { path, source })
                    }
                };
                finish(done, result);
            }),
        );
    }
}
