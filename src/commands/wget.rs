use crate::command::{finish, Command, CommandContext, Completion};
use crate::error::ShellError;

/// wget URL
/// GETs through the front end's network collaborator and shows the body as
/// preformatted text.
pub struct WgetCommand;

impl Command for WgetCommand {
    fn execute(&self, args: &[String], ctx: &CommandContext, done: Completion) {
        let Some(url) = args.get(1) else {
            finish(done, Err(ShellError::MissingArgument("address")));
            return;
        };
        let target = url.clone();
        ctx.io.fetch(
            url,
            Box::new(move |response: Result<String, ShellError>| {
                let result = response.map(|body| format!("<pre>{}</pre>", body)).map_err(|e| {
                    tracing::warn!(url = %target, error = ?e, "fetch failed");
                    // collaborators may report any error; the user only sees one message
                    match e {
                        ShellError::Connection(_) => e,
                        other => ShellError::Connection(other.to_string()),
                    }
                });
                finish(done, result);
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{collect, context, run};
    use crate::vfs::VirtualFileSystem;

    #[test]
    fn test_wget_without_address() {
        let (ctx, io) = context(VirtualFileSystem::new());
        assert_eq!(run(&WgetCommand, "wget", &ctx).unwrap(), "No address specified");
        assert!(io.urls().is_empty());
    }

    #[test]
    fn test_wget_wraps_body() {
        let (ctx, io) = context(VirtualFileSystem::new());
        let (done, out) = collect();
        WgetCommand.execute(&["wget".into(), "http://example.com/a".into()], &ctx, done);
        assert_eq!(io.urls(), vec!["http://example.com/a"]);
        assert!(out.borrow().is_none());

        assert!(io.deliver_fetch(Ok("<b>hi</b>".into())));
        assert_eq!(out.borrow().as_deref(), Some("<pre><b>hi</b></pre>"));
    }

    #[test]
    fn test_wget_immediate_failure() {
        let (ctx, io) = context(VirtualFileSystem::new());
        io.fail_fetch.set(true);
        assert_eq!(run(&WgetCommand, "wget http://nowhere.invalid", &ctx).unwrap(), "Error connecting");
    }

    #[test]
    fn test_wget_late_failure() {
        let (ctx, io) = context(VirtualFileSystem::new());
        let (done, out) = collect();
        WgetCommand.execute(&["wget".into(), "http://slow".into()], &ctx, done);
        io.deliver_fetch(Err(ShellError::FileNotFound("odd collaborator".into())));
        assert_eq!(out.borrow().as_deref(), Some("Error connecting"));
    }
}
