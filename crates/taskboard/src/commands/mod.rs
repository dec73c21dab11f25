//! Command dispatch: bridges CLI args -> workspace actions -> output formatting.

pub mod auth;
pub mod boards;
pub mod config_cmd;
pub mod lists;
pub mod tasks;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Target;
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, target: &Target, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Register(args) => auth::register(args, target, global).await,
        Command::Login(args) => auth::login(args, target, global).await,
        Command::Logout => auth::logout(target, global),
        Command::Whoami => auth::whoami(target, global).await,
        Command::Boards(args) => {
            let workspace = util::open_workspace(target).await?;
            boards::handle(&workspace, args, global).await
        }
        Command::Lists(args) => {
            let workspace = util::open_workspace(target).await?;
            lists::handle(&workspace, args, global).await
        }
        Command::Tasks(args) => {
            let workspace = util::open_workspace(target).await?;
            tasks::handle(&workspace, args, global).await
        }
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
