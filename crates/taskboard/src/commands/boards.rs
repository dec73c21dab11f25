//! Board command handlers.

use std::fmt::Write as _;

use tabled::Tabled;
use taskboard_core::validation::board_title;
use taskboard_core::{Action, Background, Board, BoardFilter, Workspace};

use crate::cli::{BoardsArgs, BoardsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct BoardRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "")]
    star: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Lists")]
    lists: usize,
    #[tabled(rename = "Done")]
    done: String,
    #[tabled(rename = "Background")]
    background: String,
}

impl BoardRow {
    fn new(board: &Board, color: bool) -> Self {
        let completed: usize = board.lists().iter().map(|l| l.completed_count()).sum();
        Self {
            id: board.id.to_string(),
            star: output::star(board.starred, color),
            title: board.title.clone(),
            lists: board.lists().len(),
            done: format!("{completed}/{}", board.task_count()),
            background: background_label(&board.background),
        }
    }
}

fn background_label(background: &Background) -> String {
    match background {
        Background::Image(url) => format!("image {}", preset_index(url, true)),
        Background::Color(css) => format!("color {}", preset_index(css, false)),
    }
}

/// Preset number of a background value, or "custom".
fn preset_index(value: &str, image: bool) -> String {
    let presets: &[&str] = if image {
        &taskboard_core::PRESET_IMAGES
    } else {
        &taskboard_core::PRESET_COLORS
    };
    presets
        .iter()
        .position(|p| *p == value)
        .map_or_else(|| "custom".into(), |i| i.to_string())
}

fn detail(board: &Board, color: bool) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}", board.title);
    if board.starred {
        let _ = write!(out, " {}", output::star(true, color));
    }
    if board.closed {
        let _ = write!(out, " (closed)");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", output::muted(&format!("id: {}", board.id), color));
    let _ = writeln!(out, "background: {}", background_label(&board.background));
    if let Some(created) = board.created_at {
        let _ = writeln!(out, "created: {}", created.format("%Y-%m-%d %H:%M"));
    }

    if board.lists().is_empty() {
        let _ = write!(out, "\nNo lists yet. Add one with: taskboard lists add {} <title>", board.id);
    }
    for list in board.lists() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} {}",
            list.title,
            output::muted(&format!("({})", list.id), color)
        );
        for task in &list.tasks {
            let _ = writeln!(
                out,
                "  {} {} {}",
                output::checkbox(task.completed, color),
                task.title,
                output::muted(&format!("({})", task.id), color)
            );
            if let Some(ref description) = task.description {
                let _ = writeln!(out, "      {}", output::muted(description, color));
            }
        }
    }
    out.trim_end().to_owned()
}

fn render_boards(boards: &[Board], global: &GlobalOpts) {
    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        boards,
        |b| BoardRow::new(b, color),
        |b| b.id.to_string(),
    );
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    workspace: &Workspace,
    args: BoardsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        BoardsCommand::List { starred } => {
            let filter = if starred {
                BoardFilter::Starred
            } else {
                BoardFilter::Active
            };
            render_boards(&workspace.store().filtered(&filter), global);
            Ok(())
        }

        BoardsCommand::Closed => {
            render_boards(&workspace.store().filtered(&BoardFilter::Closed), global);
            Ok(())
        }

        BoardsCommand::Show { board } => {
            let board = util::resolve_board(workspace, &board)?;
            workspace.apply(Action::SetCurrentBoard(Some(board.id.clone())))?;
            let current = workspace.store().current_board().unwrap_or(board);
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &current,
                |b| detail(b, color),
                |b| b.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BoardsCommand::Create { title, background } => {
            let title = board_title(&title)?;
            let background = util::background(&background)?.unwrap_or_default();
            let board = Board::new(title, background);
            let id = board.id.to_string();

            let outcome = workspace.dispatch(Action::AddBoard(board)).await?;
            util::report(outcome, "Board created", global)?;
            output::print_output(&id, global.quiet);
            Ok(())
        }

        BoardsCommand::Edit {
            board,
            title,
            background,
        } => {
            let mut board = util::resolve_board(workspace, &board)?;
            if let Some(title) = title {
                board.title = board_title(&title)?;
            }
            if let Some(background) = util::background(&background)? {
                board.background = background;
            }
            let outcome = workspace.dispatch(Action::UpdateBoard(board)).await?;
            util::report(outcome, "Board updated", global)
        }

        BoardsCommand::Star { board } => {
            let board = util::resolve_board(workspace, &board)?;
            let done = if board.starred {
                "Board unstarred"
            } else {
                "Board starred"
            };
            let outcome = workspace.dispatch(Action::ToggleStar(board.id)).await?;
            util::report(outcome, done, global)
        }

        BoardsCommand::Close { board } => {
            let board = util::resolve_board(workspace, &board)?;
            let outcome = workspace
                .dispatch(Action::SetClosed(board.id, true))
                .await?;
            util::report(outcome, "Board closed", global)
        }

        BoardsCommand::Reopen { board } => {
            let board = util::resolve_board(workspace, &board)?;
            let outcome = workspace
                .dispatch(Action::SetClosed(board.id, false))
                .await?;
            util::report(outcome, "Board reopened", global)
        }

        BoardsCommand::Delete { board } => {
            let board = util::resolve_board(workspace, &board)?;
            if !util::confirm(
                &format!(
                    "Delete board '{}' with {} list(s)? This cannot be undone.",
                    board.title,
                    board.lists().len()
                ),
                "boards delete",
                global.yes,
            )? {
                return Ok(());
            }
            let outcome = workspace.dispatch(Action::DeleteBoard(board.id)).await?;
            util::report(outcome, "Board deleted", global)
        }
    }
}

#[cfg(test)]
mod tests {
    use taskboard_core::{List, Task};

    use super::*;

    #[test]
    fn background_label_names_presets() {
        assert_eq!(background_label(&Background::preset_color(2)), "color 2");
        assert_eq!(background_label(&Background::preset_image(0)), "image 0");
        assert_eq!(
            background_label(&Background::Color("#fff".into())),
            "color custom"
        );
    }

    #[test]
    fn detail_shows_tasks_with_checkboxes() {
        let mut task = Task::with_id("T1", "Ship it");
        task.completed = true;
        task.description = Some("before friday".into());
        let mut list = List::with_id("L1", "Doing");
        list.tasks.push(task);
        let mut board = Board::with_id("B1", "Release");
        board.lists = Some(vec![list]);

        let text = detail(&board, false);
        assert!(text.starts_with("Release"));
        assert!(text.contains("Doing (L1)"));
        assert!(text.contains("[x] Ship it (T1)"));
        assert!(text.contains("before friday"));
    }

    #[test]
    fn row_counts_completed_tasks() {
        let mut list = List::with_id("L1", "Todo");
        list.tasks.push(Task::with_id("T1", "a"));
        let mut done = Task::with_id("T2", "b");
        done.completed = true;
        list.tasks.push(done);
        let mut board = Board::with_id("B1", "Home");
        board.lists = Some(vec![list]);
        board.starred = true;

        let row = BoardRow::new(&board, false);
        assert_eq!(row.done, "1/2");
        assert_eq!(row.lists, 1);
        assert_eq!(row.star, "★");
    }
}
