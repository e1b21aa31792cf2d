use crate::command::{finish, Command, CommandContext, CommandResult, Completion};
use crate::error::ShellError;
use crate::vfs::VirtualFileSystem;

pub struct CatCommand;

// contents back to back, no separator; stops at the first bad path
fn concatenate(fs: &VirtualFileSystem, paths: &[String]) -> CommandResult {
    let mut output = String::new();
    for path in paths {
        match fs.read(path) {
            Some(content) => output.push_str(content),
            None => return Err(ShellError::FileNotFound(path.clone())),
        }
    }
    Ok(output)
}

impl Command for CatCommand {
    fn execute(&self, args: &[String], ctx: &CommandContext, done: Completion) {
        let result = concatenate(&ctx.fs.borrow(), args.get(1..).unwrap_or_default());
        finish(done, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::EntrySpec;
    use crate::test_utils::{context, run};

    fn vfs() -> VirtualFileSystem {
        VirtualFileSystem::from_entries(vec![
            EntrySpec::file("readme.txt", "Hello"),
            EntrySpec::file("second.txt", " World"),
            EntrySpec::file("empty.txt", ""),
            EntrySpec::dir("Projects", vec![EntrySpec::file("readme.txt", "nested")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_cat_single_file() {
        let (ctx, _io) = context(vfs());
        assert_eq!(run(&CatCommand, "cat readme.txt", &ctx).unwrap(), "Hello");
    }

    #[test]
    fn test_cat_multiple_files() {
        let (ctx, _io) = context(vfs());
        assert_eq!(run(&CatCommand, "cat readme.txt empty.txt second.txt", &ctx).unwrap(), "Hello World");
    }

    #[test]
    fn test_cat_relative_and_absolute() {
        let (ctx, _io) = context(vfs());
        ctx.fs.borrow_mut().change_directory("Projects").unwrap();
        assert_eq!(run(&CatCommand, "cat readme.txt", &ctx).unwrap(), "nested");
        assert_eq!(run(&CatCommand, "cat /readme.txt ../second.txt", &ctx).unwrap(), "Hello World");
    }

    #[test]
    fn test_cat_nonexistent_file() {
        let (ctx, _io) = context(vfs());
        assert_eq!(
            run(&CatCommand, "cat missing.txt", &ctx).unwrap(),
            "File missing.txt does not exists!"
        );
    }

    #[test]
    fn test_cat_aborts_at_first_missing() {
        let (ctx, _io) = context(vfs());
        assert_eq!(
            run(&CatCommand, "cat readme.txt nope.txt also-nope.txt", &ctx).unwrap(),
            "File nope.txt does not exists!"
        );
    }

    #[test]
    fn test_cat_directory_is_not_a_file() {
        let (ctx, _io) = context(vfs());
        assert_eq!(run(&CatCommand, "cat Projects", &ctx).unwrap(), "File Projects does not exists!");
    }

    #[test]
    fn test_cat_without_operands() {
        let (ctx, _io) = context(vfs());
        assert_eq!(run(&CatCommand, "cat", &ctx).unwrap(), "");
    }
}
