use crate::command::{finish, Command, CommandContext, Completion};

pub struct ClearCommand;

impl Command for ClearCommand {
    fn execute(&self, _args: &[String], ctx: &CommandContext, done: Completion) {
        // the display list belongs to the front end
        ctx.io.clear_history();
        finish(done, Ok(String::new()));
    }
}
