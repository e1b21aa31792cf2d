use crate::command::{finish, Command, CommandContext, Completion};

/// ls [PATH]
/// Lists entry names, `.` and `..` included. An unusable path lists as
/// empty rather than failing.
pub struct LsCommand;

impl Command for LsCommand {
    fn execute(&self, args: &[String], ctx: &CommandContext, done: Completion) {
        let names = {
            let fs = ctx.fs.borrow();
            match args.get(1) {
                Some(path) => fs.list(path),
                None => fs.list_current(),
            }
        };
        finish(done, Ok(names.join(&ctx.config.line_separator)));
    }
}
