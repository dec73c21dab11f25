//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};

use taskboard_core::{
    Background, Board, CoreError, List, PRESET_COLORS, PRESET_IMAGES, Recovery, SaveOutcome,
    Task, Workspace,
};

use crate::cli::{BackgroundArgs, GlobalOpts};
use crate::config::Target;
use crate::error::CliError;

/// Build the workspace for the active profile and load the signed-in
/// user's boards.
pub async fn open_workspace(target: &Target) -> Result<Workspace, CliError> {
    let workspace = Workspace::new(target.server.clone(), target.session.clone())?;
    workspace.load().await?;
    Ok(workspace)
}

// ── Identifier resolution ───────────────────────────────────────────

/// Find a board by id, then by case-insensitive title.
pub fn resolve_board(workspace: &Workspace, identifier: &str) -> Result<Board, CliError> {
    let boards = workspace.store().boards_snapshot();
    boards
        .iter()
        .find(|b| b.id.as_str() == identifier)
        .or_else(|| boards.iter().find(|b| b.title.eq_ignore_ascii_case(identifier)))
        .cloned()
        .ok_or_else(|| CoreError::not_found("board", identifier).into())
}

/// Find a list of `board` by id, then by case-insensitive title.
pub fn resolve_list(board: &Board, identifier: &str) -> Result<List, CliError> {
    let lists = board.lists();
    lists
        .iter()
        .find(|l| l.id.as_str() == identifier)
        .or_else(|| lists.iter().find(|l| l.title.eq_ignore_ascii_case(identifier)))
        .cloned()
        .ok_or_else(|| CoreError::not_found("list", identifier).into())
}

/// Find a task of `list` by id, then by case-insensitive title.
pub fn resolve_task(list: &List, identifier: &str) -> Result<Task, CliError> {
    list.tasks
        .iter()
        .find(|t| t.id.as_str() == identifier)
        .or_else(|| list.tasks.iter().find(|t| t.title.eq_ignore_ascii_case(identifier)))
        .cloned()
        .ok_or_else(|| CoreError::not_found("task", identifier).into())
}

/// Background chosen by `--color` / `--image`, if any.
pub fn background(args: &BackgroundArgs) -> Result<Option<Background>, CliError> {
    let out_of_range = |field: &str, max: usize| CliError::Validation {
        field: field.into(),
        reason: format!("preset must be between 0 and {}", max - 1),
    };
    match (args.color, args.image) {
        (Some(n), _) if n >= PRESET_COLORS.len() => Err(out_of_range("color", PRESET_COLORS.len())),
        (Some(n), _) => Ok(Some(Background::preset_color(n))),
        (None, Some(n)) if n >= PRESET_IMAGES.len() => {
            Err(out_of_range("image", PRESET_IMAGES.len()))
        }
        (None, Some(n)) => Ok(Some(Background::preset_image(n))),
        (None, None) => Ok(None),
    }
}

// ── Interaction ─────────────────────────────────────────────────────

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))
}

/// Report the result of one dispatched action.
pub fn report(outcome: SaveOutcome, done: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let line = status_line(outcome, done)?;
    if !global.quiet {
        eprintln!("{line}");
    }
    Ok(())
}

/// Status line for a non-failed outcome.
fn status_line(outcome: SaveOutcome, done: &str) -> Result<String, CliError> {
    match outcome {
        SaveOutcome::Saved { .. } => Ok(format!("✓ {done}")),
        // Carried by a newer save that may still fail.
        SaveOutcome::Superseded { .. } => Ok(format!("{done}, queued behind a newer save")),
        SaveOutcome::Unchanged => Ok("Nothing to change".into()),
        SaveOutcome::Failed {
            error, recovery, ..
        } => Err(CliError::SaveFailed {
            reason: error.to_string(),
            recovery: recovery_hint(&recovery),
        }),
    }
}

fn recovery_hint(recovery: &Recovery) -> String {
    match recovery {
        Recovery::KeptLocal => {
            "The change was not saved. Run the command again once the server is reachable."
                .into()
        }
        Recovery::Resynced => {
            "Boards were reloaded from the server and the change was discarded.".into()
        }
        Recovery::ResyncFailed(e) => {
            format!("Reloading from the server also failed ({e}). Sign in again.")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn board() -> Board {
        let mut list = List::with_id("L1", "Todo");
        list.tasks.push(Task::with_id("T1", "Write docs"));
        let mut board = Board::with_id("B1", "Roadmap");
        board.lists = Some(vec![list]);
        board
    }

    #[test]
    fn list_resolves_by_id_or_title() {
        let board = board();
        assert_eq!(resolve_list(&board, "L1").unwrap().title, "Todo");
        assert_eq!(resolve_list(&board, "todo").unwrap().id.as_str(), "L1");
        assert!(matches!(
            resolve_list(&board, "Done"),
            Err(CliError::NotFound { .. })
        ));
    }

    #[test]
    fn task_resolves_by_title() {
        let list = resolve_list(&board(), "L1").unwrap();
        assert_eq!(resolve_task(&list, "write DOCS").unwrap().id.as_str(), "T1");
    }

    #[test]
    fn background_presets_are_bounds_checked() {
        let args = BackgroundArgs {
            color: Some(PRESET_COLORS.len()),
            image: None,
        };
        assert!(matches!(background(&args), Err(CliError::Validation { .. })));

        let args = BackgroundArgs {
            color: None,
            image: Some(1),
        };
        assert_eq!(
            background(&args).unwrap(),
            Some(Background::preset_image(1))
        );
    }

    #[test]
    fn failed_save_carries_recovery_hint() {
        let global = crate::cli::GlobalOpts {
            profile: None,
            server: None,
            output: crate::cli::OutputFormat::Table,
            color: crate::cli::ColorMode::Never,
            verbose: 0,
            quiet: true,
            yes: false,
            insecure: false,
            timeout: None,
        };
        let outcome = SaveOutcome::Failed {
            version: 3,
            error: CoreError::Timeout { timeout_secs: 30 },
            recovery: Recovery::Resynced,
        };
        match report(outcome, "done", &global).unwrap_err() {
            CliError::SaveFailed { recovery, .. } => assert!(recovery.contains("reloaded")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(report(SaveOutcome::Unchanged, "done", &global).is_ok());
    }

    #[test]
    fn only_acknowledged_saves_get_a_check_mark() {
        let saved = status_line(SaveOutcome::Saved { version: 2 }, "Board starred").unwrap();
        assert_eq!(saved, "✓ Board starred");

        let superseded =
            status_line(SaveOutcome::Superseded { version: 2 }, "Board starred").unwrap();
        assert!(!superseded.contains('✓'));
        assert!(superseded.contains("queued behind a newer save"));
    }
}
