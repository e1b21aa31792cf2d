use crate::command::{finish, Command, CommandContext, CommandResult, Completion};
use crate::error::ShellError;
use crate::vfs::VirtualFileSystem;

pub struct CdCommand;

fn change_directory(fs: &mut VirtualFileSystem, target: Option<&String>) -> CommandResult {
    let target = target.ok_or(ShellError::MissingArgument("directory"))?;
    if !fs.is_directory(target) {
        return Err(ShellError::DirectoryNotFound(target.clone()));
    }
    fs.change_directory(target)
        .map_err(|_| ShellError::DirectoryNotFound(target.clone()))?;
    // cd is silent on success
    Ok(String::new())
}

impl Command for CdCommand {
    fn execute(&self, args: &[String], ctx: &CommandContext, done: Completion) {
        let result = change_directory(&mut ctx.fs.borrow_mut(), args.get(1));
        finish(done, result);
    }
}
