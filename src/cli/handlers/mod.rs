mod init;
pub use init::cmd_init;

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use chrono::{Local, Utc};
use tracing::debug;

use crate::board::{Board, NullRenderer, Renderer};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::board_io::{self, Workspace};
use crate::io::session::{self, Session};
use crate::io::store::atomic_write;
use crate::model::config::ImportMode;
use crate::model::state::AppState;
use crate::ops::board_ops::{self, BoardError};
use crate::ops::export;
use crate::ops::ids::generator_for;
use crate::ops::import::{self, ImportOptions};
use crate::ops::progress;

/// Flags shared by every command
pub struct Ctx {
    pub json: bool,
    pub show: bool,
    /// Start board discovery here instead of the cwd (-C)
    pub board_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    let board_dir = match cli.board_dir {
        Some(ref dir) => Some(
            fs::canonicalize(dir).map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        ),
        None => None,
    };
    let ctx = Ctx {
        json: cli.json,
        show: cli.show,
        board_dir,
    };

    match cli.command {
        Commands::Init(args) => cmd_init(args, &ctx),

        // Read commands
        Commands::Show(args) => cmd_show(args, &ctx),
        Commands::Projects => cmd_projects(&ctx),
        Commands::Progress => cmd_progress(&ctx),

        // Write commands
        Commands::Project(cmd) => cmd_project(cmd, &ctx),
        Commands::Task(cmd) => cmd_task(cmd, &ctx),
        Commands::Sub(cmd) => cmd_sub(cmd, &ctx),
        Commands::Layout(args) => cmd_layout(args, &ctx),
        Commands::ClearAll(args) => cmd_clear_all(args, &ctx),

        // Snapshots
        Commands::Export(args) => cmd_export(args, &ctx),
        Commands::Import(args) => cmd_import(args, &ctx),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_workspace(ctx: &Ctx) -> Result<Workspace, Box<dyn Error>> {
    let start = match &ctx.board_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let root = board_io::discover_board(&start)?;
    Ok(board_io::load_workspace(&root)?)
}

fn renderer_for(ctx: &Ctx) -> Box<dyn Renderer> {
    match (ctx.show, ctx.json) {
        (false, _) => Box::new(NullRenderer),
        (true, false) => Box::new(TextRenderer),
        (true, true) => Box::new(JsonRenderer),
    }
}

/// Open the board found from the cwd (or -C), with the remembered selection
fn open_board(ctx: &Ctx) -> Result<(Workspace, Board), Box<dyn Error>> {
    let ws = load_workspace(ctx)?;
    let layout = ws.config.ui.default_layout;
    let mut board = Board::open(
        Box::new(ws.store()),
        renderer_for(ctx),
        generator_for(ws.config.ids.generator),
        || AppState::new(board_ops::demo_projects(), layout),
    )?;
    if let Some(id) = session::read_session(&ws.board_dir).and_then(|s| s.current_project) {
        board.restore_selection(&id);
    }
    debug!(root = %ws.root.display(), projects = board.state().projects.len(), "board opened");
    Ok((ws, board))
}

/// Remember the current selection for the next command
fn save_session(ws: &Workspace, board: &Board) -> Result<(), Box<dyn Error>> {
    let session = Session {
        current_project: board.state().current_project_id.clone(),
    };
    session::write_session(&ws.board_dir, &session)?;
    Ok(())
}

/// Refuse destructive commands that were not confirmed with --yes
fn confirm(yes: bool, what: &str) -> Result<(), Box<dyn Error>> {
    if yes {
        Ok(())
    } else {
        Err(format!("{} cannot be undone; pass --yes to confirm", what).into())
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_show(args: ShowArgs, ctx: &Ctx) -> Result<(), Box<dyn Error>> {
    let (_ws, board) = open_board(ctx)?;
    let state = board.state();

    let project = match &args.project {
        Some(id) => Some(
            state
                .find_project(id)
                .ok_or_else(|| format!("project not found: {}", id))?,
        ),
        None => None,
    };

    if ctx.json {
        match project {
            Some(p) => println!("{}", serde_json::to_string_pretty(p)?),
            None => println!("{}", serde_json::to_string_pretty(&board_to_json(state))?),
        }
    } else {
        print_lines(format_board(state, project));
    }
    Ok(())
}

fn cmd_projects(ctx: &Ctx) -> Result<(), Box<dyn Error>> {
    let (_ws, board) = open_board(ctx)?;
    let summaries = project_summaries(board.state());

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else if summaries.is_empty() {
        println!("no projects");
    } else {
        for s in &summaries {
            println!("{}", format_project_summary(s));
        }
    }
    Ok(())
}

fn cmd_progress(ctx: &Ctx) -> Result<(), Box<dyn Error>> {
    let (_ws, board) = open_board(ctx)?;
    let state = board.state();
    let report = ProgressJson {
        board: progress::board_progress(state),
        projects: project_summaries(state),
    };

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("overall: {}", format_progress(&report.board));
        for s in &report.projects {
            println!("{}", format_project_summary(s));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

fn cmd_project(cmd: ProjectCmd, ctx: &Ctx) -> Result<(), Box<dyn Error>> {
    let (ws, mut board) = open_board(ctx)?;

    match cmd.action {
        ProjectAction::Add(args) => {
            let id = board.apply(|state, ids| board_ops::add_project(state, &args.name, ids))?;
            println!("{}", id);
        }
        ProjectAction::Rename(args) => {
            let changed =
                board.apply(|state, _| board_ops::rename_project(state, &args.id, &args.name))?;
            if !changed {
                println!("{}: name unchanged", args.id);
            }
        }
        ProjectAction::Delete(args) => {
            confirm(args.yes, &format!("deleting project {}", args.id))?;
            let removed = board.apply(|state, _| board_ops::delete_project(state, &args.id))?;
            println!(
                "deleted project {} \"{}\" ({} tasks)",
                removed.id,
                removed.name,
                removed.tasks.len()
            );
        }
        ProjectAction::Clear(args) => {
            confirm(args.yes, &format!("clearing project {}", args.id))?;
            board.apply(|state, _| board_ops::clear_project(state, &args.id))?;
        }
        ProjectAction::Select(args) => {
            board.select(&args.id)?;
        }
        ProjectAction::Mv(args) => {
            board.apply(|state, _| board_ops::move_project(state, &args.id, &args.to))?;
        }
    }

    save_session(&ws, &board)
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

fn cmd_task(cmd: TaskCmd, ctx: &Ctx) -> Result<(), Box<dyn Error>> {
    let (ws, mut board) = open_board(ctx)?;

    match cmd.action {
        TaskAction::Add(args) => {
            let id = board.apply(|state, ids| match &args.project {
                Some(project_id) => board_ops::add_task(state, project_id, &args.title, ids),
                None => board_ops::add_task_to_current(state, &args.title, ids),
            })?;
            println!("{}", id);
        }
        TaskAction::Edit(args) => {
            let changed = board.apply(|state, _| board_ops::edit_task(state, &args.id, &args.name))?;
            if !changed {
                println!("{}: title unchanged", args.id);
            }
        }
        TaskAction::Delete(args) => {
            confirm(args.yes, &format!("deleting task {}", args.id))?;
            let removed = board.apply(|state, _| board_ops::delete_task(state, &args.id))?;
            println!(
                "deleted task {} \"{}\" ({} subtasks)",
                removed.id,
                removed.title,
                removed.subtasks.len()
            );
        }
        TaskAction::Clear(args) => {
            confirm(args.yes, &format!("clearing task {}", args.id))?;
            board.apply(|state, _| board_ops::clear_task(state, &args.id))?;
        }
        TaskAction::Mv(args) => {
            board.apply(|state, _| board_ops::move_task(state, &args.id, &args.to))?;
        }
    }

    save_session(&ws, &board)
}

// ---------------------------------------------------------------------------
// Subtasks
// ---------------------------------------------------------------------------

fn cmd_sub(cmd: SubCmd, ctx: &Ctx) -> Result<(), Box<dyn Error>> {
    let (ws, mut board) = open_board(ctx)?;

    match cmd.action {
        SubAction::Add(args) => {
            let id =
                board.apply(|state, ids| board_ops::add_subtask(state, &args.task, &args.title, ids))?;
            println!("{}", id);
        }
        SubAction::Edit(args) => {
            let changed =
                board.apply(|state, _| board_ops::edit_subtask(state, &args.id, &args.name))?;
            if !changed {
                println!("{}: title unchanged", args.id);
            }
        }
        SubAction::Delete(args) => {
            confirm(args.yes, &format!("deleting subtask {}", args.id))?;
            let removed = board.apply(|state, _| board_ops::delete_subtask(state, &args.id))?;
            println!("deleted subtask {} \"{}\"", removed.id, removed.title);
        }
        SubAction::Toggle(args) => {
            let done = board.apply(|state, _| board_ops::toggle_subtask(state, &args.id))?;
            println!("{} {}", args.id, if done { "done" } else { "open" });
        }
        SubAction::Mv(args) => {
            board.apply(|state, _| board_ops::move_subtask(state, &args.id, &args.to))?;
        }
    }

    save_session(&ws, &board)
}

// ---------------------------------------------------------------------------
// Board-wide
// ---------------------------------------------------------------------------

fn cmd_layout(args: LayoutArgs, ctx: &Ctx) -> Result<(), Box<dyn Error>> {
    let (_ws, mut board) = open_board(ctx)?;

    let layout = match args.mode {
        None => board.layout(),
        Some(arg) => match parse_layout_change(&arg)? {
            LayoutChange::Toggle => {
                board.apply(|state, _| Ok::<_, BoardError>(board_ops::toggle_layout(state)))?
            }
            LayoutChange::Set(layout) => {
                board.apply(|state, _| {
                    board_ops::set_layout(state, layout);
                    Ok::<_, BoardError>(layout)
                })?
            }
        },
    };

    if ctx.json {
        println!("{}", serde_json::json!({ "layout": layout }));
    } else {
        println!("{}", layout);
    }
    Ok(())
}

fn cmd_clear_all(args: ConfirmArgs, ctx: &Ctx) -> Result<(), Box<dyn Error>> {
    confirm(args.yes, "clearing the whole board")?;
    let (ws, mut board) = open_board(ctx)?;
    let count = board.apply(|state, _| {
        let count = state.projects.len();
        board_ops::clear_all(state);
        Ok::<_, BoardError>(count)
    })?;
    println!("removed {} projects", count);
    save_session(&ws, &board)
}

// ---------------------------------------------------------------------------
// Export / import
// ---------------------------------------------------------------------------

fn cmd_export(args: ExportArgs, ctx: &Ctx) -> Result<(), Box<dyn Error>> {
    let (_ws, board) = open_board(ctx)?;
    let json = export::export_json(board.state(), Utc::now())?;

    let file = args
        .file
        .unwrap_or_else(|| export::export_file_name(Local::now().date_naive()));
    if file == "-" {
        println!("{}", json);
        return Ok(());
    }

    let path = PathBuf::from(&file);
    atomic_write(&path, json.as_bytes())
        .map_err(|e| format!("could not write {}: {}", path.display(), e))?;
    println!(
        "exported {} projects to {}",
        board.state().projects.len(),
        path.display()
    );
    Ok(())
}

fn cmd_import(args: ImportArgs, ctx: &Ctx) -> Result<(), Box<dyn Error>> {
    let (ws, mut board) = open_board(ctx)?;

    let mode = match &args.mode {
        Some(m) => parse_import_mode(m)?,
        None => ws.config.import.default_mode,
    };
    if mode == ImportMode::Replace {
        confirm(args.yes, "replacing the board")?;
    }
    let options = ImportOptions {
        mode,
        strict_schema: args.strict || ws.config.import.strict_schema,
    };

    let bytes = fs::read(&args.file).map_err(|e| format!("could not read {}: {}", args.file, e))?;
    let report = board.apply(|state, ids| import::import_snapshot(state, &bytes, options, ids))?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_lines(format_import_report(&report));
    }
    save_session(&ws, &board)
}
