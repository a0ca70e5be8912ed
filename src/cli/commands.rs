use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tb", about = concat!("taskboard v", env!("CARGO_PKG_VERSION"), " - projects, tasks, subtasks"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a board in a different directory
    #[arg(short = 'C', long = "board-dir", global = true)]
    pub board_dir: Option<String>,

    /// Print the board after every change
    #[arg(long, global = true)]
    pub show: bool,

    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new board in the current directory
    Init(InitArgs),
    /// Show the board (current project, or the one given)
    Show(ShowArgs),
    /// List projects
    Projects,
    /// Show completion progress
    Progress,
    /// Project management
    Project(ProjectCmd),
    /// Task management
    Task(TaskCmd),
    /// Subtask management
    Sub(SubCmd),
    /// Show or change the layout (list, grid, toggle)
    Layout(LayoutArgs),
    /// Remove every project, task and subtask
    ClearAll(ConfirmArgs),
    /// Export the board as a JSON snapshot
    Export(ExportArgs),
    /// Import a JSON snapshot
    Import(ImportArgs),
}

// ---------------------------------------------------------------------------
// Init / read args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Board name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Start with an empty board instead of the demo project
    #[arg(long)]
    pub empty: bool,
    /// Reinitialize even if board/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Project ID (default: current project)
    pub project: Option<String>,
}

#[derive(Args)]
pub struct LayoutArgs {
    /// list, grid or toggle (omit to print the current layout)
    pub mode: Option<String>,
}

#[derive(Args)]
pub struct ConfirmArgs {
    /// Skip confirmation
    #[arg(long, short)]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectCmd {
    #[command(subcommand)]
    pub action: ProjectAction,
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project and select it
    Add(NameArg),
    /// Rename a project
    Rename(RenameArgs),
    /// Delete a project and everything in it
    Delete(IdConfirmArgs),
    /// Remove all tasks from a project
    Clear(IdConfirmArgs),
    /// Select the current project
    Select(IdArg),
    /// Move a project to another project's position
    Mv(MvArgs),
}

#[derive(Args)]
pub struct NameArg {
    /// Name or title
    pub name: String,
}

#[derive(Args)]
pub struct IdArg {
    pub id: String,
}

#[derive(Args)]
pub struct IdConfirmArgs {
    pub id: String,
    /// Skip confirmation
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args)]
pub struct RenameArgs {
    pub id: String,
    /// New name or title
    pub name: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// ID of the entity to move
    pub id: String,
    /// Destination ID
    pub to: String,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TaskCmd {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to a project (default: current project)
    Add(TaskAddArgs),
    /// Change a task's title
    Edit(RenameArgs),
    /// Delete a task and its subtasks
    Delete(IdConfirmArgs),
    /// Remove all subtasks from a task
    Clear(IdConfirmArgs),
    /// Move a task to the end of another project
    Mv(MvArgs),
}

#[derive(Args)]
pub struct TaskAddArgs {
    /// Task title
    pub title: String,
    /// Target project ID
    #[arg(long)]
    pub project: Option<String>,
}

// ---------------------------------------------------------------------------
// Subtasks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SubCmd {
    #[command(subcommand)]
    pub action: SubAction,
}

#[derive(Subcommand)]
pub enum SubAction {
    /// Add a subtask to a task
    Add(SubAddArgs),
    /// Change a subtask's title
    Edit(RenameArgs),
    /// Delete a subtask
    Delete(IdConfirmArgs),
    /// Mark a subtask done, or open again
    Toggle(IdArg),
    /// Move a subtask to the end of another task
    Mv(MvArgs),
}

#[derive(Args)]
pub struct SubAddArgs {
    /// Parent task ID
    pub task: String,
    /// Subtask title
    pub title: String,
}

// ---------------------------------------------------------------------------
// Export / import
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (default: tasks-board-<date>.json; `-` for stdout)
    pub file: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Snapshot file to import
    pub file: String,
    /// merge or replace (default from board.toml)
    #[arg(long)]
    pub mode: Option<String>,
    /// Refuse snapshots with a newer schemaVersion
    #[arg(long)]
    pub strict: bool,
    /// Required with --mode replace
    #[arg(long, short)]
    pub yes: bool,
}
