//! List command handlers.

use taskboard_core::validation::list_title;
use taskboard_core::{Action, List, Workspace};

use crate::cli::{GlobalOpts, ListsArgs, ListsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    workspace: &Workspace,
    args: ListsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ListsCommand::Add { board, title } => {
            let board = util::resolve_board(workspace, &board)?;
            let list = List::new(list_title(&title)?);
            let id = list.id.to_string();

            let outcome = workspace.dispatch(Action::AddList(board.id, list)).await?;
            util::report(outcome, "List added", global)?;
            output::print_output(&id, global.quiet);
            Ok(())
        }

        ListsCommand::Rename { board, list, title } => {
            let board = util::resolve_board(workspace, &board)?;
            let mut list = util::resolve_list(&board, &list)?;
            list.title = list_title(&title)?;

            let outcome = workspace.dispatch(Action::UpdateList(board.id, list)).await?;
            util::report(outcome, "List renamed", global)
        }

        ListsCommand::Delete { board, list } => {
            let board = util::resolve_board(workspace, &board)?;
            let list = util::resolve_list(&board, &list)?;
            if !util::confirm(
                &format!(
                    "Delete list '{}' and its {} task(s)?",
                    list.title,
                    list.tasks.len()
                ),
                "lists delete",
                global.yes,
            )? {
                return Ok(());
            }

            let outcome = workspace
                .dispatch(Action::DeleteList(board.id, list.id))
                .await?;
            util::report(outcome, "List deleted", global)
        }
    }
}
