use std::error::Error;

use tracing::info;

use super::Ctx;
use crate::cli::commands::InitArgs;
use crate::io::board_io::{self, WorkspaceError, BOARD_DIR};
use crate::io::config_io;
use crate::io::session::{self, Session};
use crate::io::store::Store;
use crate::model::state::AppState;
use crate::ops::board_ops::demo_projects;

/// Infer a board name from a directory name: hyphens and underscores become
/// spaces, each word is capitalized.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + chars.as_str()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn cmd_init(args: InitArgs, ctx: &Ctx) -> Result<(), Box<dyn Error>> {
    let root = match &ctx.board_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let board_dir = root.join(BOARD_DIR);

    if board_dir.is_dir() && !args.force {
        return Err(WorkspaceError::AlreadyExists(board_dir).into());
    }

    let name = args.name.unwrap_or_else(|| {
        root.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Untitled".to_string())
    });

    config_io::write_config_template(&board_dir, &name)?;
    let ws = board_io::load_workspace(&root)?;

    let projects = if args.empty { Vec::new() } else { demo_projects() };
    let state = AppState::new(projects, ws.config.ui.default_layout);
    ws.store().save(&state.to_state())?;
    session::write_session(
        &ws.board_dir,
        &Session {
            current_project: state.current_project_id.clone(),
        },
    )?;

    info!(board = %ws.board_dir.display(), "board initialized");
    println!("Initialized board: {}", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_name() {
        assert_eq!(infer_name("my-cool-board"), "My Cool Board");
        assert_eq!(infer_name("tasks"), "Tasks");
        assert_eq!(infer_name("home_chores"), "Home Chores");
        assert_eq!(infer_name("--"), "");
    }
}
