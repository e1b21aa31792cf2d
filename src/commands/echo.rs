use crate::command::{finish, Command, CommandContext, Completion};

/// echo [TEXT]...
/// With arguments, prints them joined by single spaces with every `"`
/// removed. Without, waits for one captured input block and prints it
/// unchanged.
pub struct EchoCommand;

impl Command for EchoCommand {
    fn execute(&self, args: &[String], ctx: &CommandContext, done: Completion) {
        if args.len() > 1 {
            let text = args[1..].join(" ").replace('"', "");
            finish(done, Ok(text));
            return;
        }
        ctx.io.take_input(None, Box::new(move |input| finish(done, Ok(input))));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{collect, context, run};
    use crate::vfs::VirtualFileSystem;

    #[test]
    fn test_echo_strips_quotes() {
        let (ctx, io) = context(VirtualFileSystem::new());
        assert_eq!(run(&EchoCommand, "echo \"hello\"", &ctx).unwrap(), "hello");
        assert_eq!(io.input_requests(), 0);
    }

    #[test]
    fn test_echo_joins_words() {
        let (ctx, _io) = context(VirtualFileSystem::new());
        assert_eq!(run(&EchoCommand, "echo \"hello   there\" you", &ctx).unwrap(), "hello there you");
    }

    #[test]
    fn test_echo_waits_for_input() {
        let (ctx, io) = context(VirtualFileSystem::new());
        let (done, out) = collect();
        EchoCommand.execute(&["echo".to_string()], &ctx, done);
        assert!(out.borrow().is_none());
        assert_eq!(io.input_requests(), 1);
        assert_eq!(io.last_prefill(), None);

        assert!(io.deliver_input("  \"kept\" as is\n"));
        assert_eq!(out.borrow().as_deref(), Some("  \"kept\" as is\n"));
    }
}
