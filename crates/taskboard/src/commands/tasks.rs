//! Task command handlers.

use taskboard_core::validation::task_title;
use taskboard_core::{Action, Board, List, Task, Workspace};

use crate::cli::{GlobalOpts, TaskRef, TasksArgs, TasksCommand};
use crate::error::CliError;
use crate::output;

use super::util;

/// Resolve board, list and task named by `target`.
fn resolve(workspace: &Workspace, target: &TaskRef) -> Result<(Board, List, Task), CliError> {
    let board = util::resolve_board(workspace, &target.board)?;
    let list = util::resolve_list(&board, &target.list)?;
    let task = util::resolve_task(&list, &target.task)?;
    Ok((board, list, task))
}

pub async fn handle(
    workspace: &Workspace,
    args: TasksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TasksCommand::Add { board, list, title } => {
            let board = util::resolve_board(workspace, &board)?;
            let list = util::resolve_list(&board, &list)?;
            let task = Task::new(task_title(&title)?);
            let id = task.id.to_string();

            let outcome = workspace
                .dispatch(Action::AddTask(board.id, list.id, task))
                .await?;
            util::report(outcome, "Task added", global)?;
            output::print_output(&id, global.quiet);
            Ok(())
        }

        TasksCommand::Edit { target, title } => {
            let (board, list, mut task) = resolve(workspace, &target)?;
            task.title = task_title(&title)?;

            let outcome = workspace
                .dispatch(Action::UpdateTask(board.id, list.id, task))
                .await?;
            util::report(outcome, "Task updated", global)
        }

        TasksCommand::Describe {
            target,
            description,
        } => {
            let (board, list, mut task) = resolve(workspace, &target)?;
            task.description = description
                .map(|d| d.trim().to_owned())
                .filter(|d| !d.is_empty());
            let done = if task.description.is_some() {
                "Description saved"
            } else {
                "Description cleared"
            };

            let outcome = workspace
                .dispatch(Action::UpdateTask(board.id, list.id, task))
                .await?;
            util::report(outcome, done, global)
        }

        TasksCommand::Toggle { target } => {
            let (board, list, task) = resolve(workspace, &target)?;
            let done = if task.completed {
                "Task reopened"
            } else {
                "Task completed"
            };

            let outcome = workspace
                .dispatch(Action::ToggleTaskComplete(board.id, list.id, task.id))
                .await?;
            util::report(outcome, done, global)
        }

        TasksCommand::Delete { target } => {
            let (board, list, task) = resolve(workspace, &target)?;
            if !util::confirm(
                &format!("Delete task '{}'?", task.title),
                "tasks delete",
                global.yes,
            )? {
                return Ok(());
            }

            let outcome = workspace
                .dispatch(Action::DeleteTask(board.id, list.id, task.id))
                .await?;
            util::report(outcome, "Task deleted", global)
        }
    }
}
