use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::board::Renderer;
use crate::model::config::ImportMode;
use crate::model::project::Project;
use crate::model::state::{AppState, LayoutMode};
use crate::model::task::{Subtask, Task};
use crate::ops::import::ImportReport;
use crate::ops::merge::MergeReport;
use crate::ops::progress::{self, Progress};

/// Task cards per row in grid layout
const GRID_COLUMNS: usize = 3;
/// Gap between grid columns
const GRID_GAP: &str = "  ";

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ProjectSummaryJson {
    pub id: String,
    pub name: String,
    pub current: bool,
    pub tasks: usize,
    pub progress: Progress,
}

#[derive(Serialize)]
pub struct BoardJson<'a> {
    pub layout: LayoutMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_project: Option<&'a str>,
    pub progress: Progress,
    pub projects: &'a [Project],
}

#[derive(Serialize)]
pub struct ProgressJson {
    pub board: Progress,
    pub projects: Vec<ProjectSummaryJson>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn project_summaries(state: &AppState) -> Vec<ProjectSummaryJson> {
    state
        .projects
        .iter()
        .map(|p| ProjectSummaryJson {
            id: p.id.clone(),
            name: p.name.clone(),
            current: state.current_project_id.as_deref() == Some(p.id.as_str()),
            tasks: p.tasks.len(),
            progress: progress::project_progress(p),
        })
        .collect()
}

pub fn board_to_json(state: &AppState) -> BoardJson<'_> {
    BoardJson {
        layout: state.layout_mode,
        current_project: state.current_project_id.as_deref(),
        progress: progress::board_progress(state),
        projects: &state.projects,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// `3/4 done (75%)`, or `no subtasks`
pub fn format_progress(p: &Progress) -> String {
    if p.is_empty() {
        "no subtasks".to_string()
    } else {
        format!("{}/{} done ({}%)", p.done, p.total, p.percent)
    }
}

/// One-line tab bar; the current project is bracketed
pub fn format_tabs(state: &AppState) -> String {
    state
        .projects
        .iter()
        .map(|p| {
            if state.current_project_id.as_deref() == Some(p.id.as_str()) {
                format!("[{}]", p.name)
            } else {
                format!(" {} ", p.name)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_subtask_line(sub: &Subtask) -> String {
    let check = if sub.done { 'x' } else { ' ' };
    format!("[{}] {} {}", check, sub.id, sub.title)
}

/// A task as a card: header line, then its subtasks indented
pub fn format_task_card(task: &Task) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}  {}",
        task.id,
        task.title,
        format_progress(&progress::task_progress(task))
    )];
    if task.subtasks.is_empty() {
        lines.push("  (no subtasks)".to_string());
    }
    for sub in &task.subtasks {
        lines.push(format!("  {}", format_subtask_line(sub)));
    }
    lines
}

/// Pad `s` with spaces to `width` terminal cells
fn pad_to_width(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

/// Lay out cards side by side, each column as wide as its widest line
fn format_grid_row(cards: &[Vec<String>]) -> Vec<String> {
    let widths: Vec<usize> = cards
        .iter()
        .map(|c| c.iter().map(|l| UnicodeWidthStr::width(l.as_str())).max().unwrap_or(0))
        .collect();
    let height = cards.iter().map(Vec::len).max().unwrap_or(0);
    (0..height)
        .map(|row| {
            let cells: Vec<String> = cards
                .iter()
                .zip(&widths)
                .map(|(card, &w)| pad_to_width(card.get(row).map_or("", String::as_str), w))
                .collect();
            cells.join(GRID_GAP).trim_end().to_string()
        })
        .collect()
}

/// A project's tasks in the given layout
pub fn format_project(project: &Project, layout: LayoutMode) -> Vec<String> {
    let mut lines = vec![format!(
        "== {} ({}) ==  {}",
        project.name,
        project.id,
        format_progress(&progress::project_progress(project))
    )];
    if project.tasks.is_empty() {
        lines.push("No tasks in this project yet.".to_string());
        return lines;
    }
    let cards: Vec<Vec<String>> = project.tasks.iter().map(format_task_card).collect();
    match layout {
        LayoutMode::List => {
            for card in cards {
                lines.push(String::new());
                lines.extend(card);
            }
        }
        LayoutMode::Grid => {
            for row in cards.chunks(GRID_COLUMNS) {
                lines.push(String::new());
                lines.extend(format_grid_row(row));
            }
        }
    }
    lines
}

/// Whole-board view: tabs, overall progress, then the shown project
pub fn format_board(state: &AppState, project: Option<&Project>) -> Vec<String> {
    if state.projects.is_empty() {
        return vec!["No projects yet. Create one with `tb project add <name>`.".to_string()];
    }
    let mut lines = vec![
        format_tabs(state),
        format!(
            "overall: {}  layout: {}",
            format_progress(&progress::board_progress(state)),
            state.layout_mode
        ),
        String::new(),
    ];
    match project.or_else(|| state.current_project()) {
        Some(p) => lines.extend(format_project(p, state.layout_mode)),
        None => lines.push("No project selected.".to_string()),
    }
    lines
}

/// Project listing for `tb projects` / `tb progress`
pub fn format_project_summary(summary: &ProjectSummaryJson) -> String {
    let marker = if summary.current { '*' } else { ' ' };
    format!(
        "{} {} {}  {} tasks, {}",
        marker,
        summary.id,
        summary.name,
        summary.tasks,
        format_progress(&summary.progress)
    )
}

pub fn format_merge_report(report: &MergeReport) -> Vec<String> {
    if report.is_noop() {
        return vec!["nothing new to merge".to_string()];
    }
    let mut lines = vec![
        format!(
            "projects: {} added, {} matched",
            report.projects_added, report.projects_matched
        ),
        format!(
            "tasks: {} added, {} matched",
            report.tasks_added, report.tasks_matched
        ),
        format!(
            "subtasks: {} added, {} matched, {} newly done",
            report.subtasks_added, report.subtasks_matched, report.subtasks_completed
        ),
    ];
    if report.projects_rekeyed > 0 || report.ids_regenerated > 0 {
        lines.push(format!(
            "ids: {} projects rekeyed, {} ids regenerated",
            report.projects_rekeyed, report.ids_regenerated
        ));
    }
    lines
}

pub fn format_import_report(report: &ImportReport) -> Vec<String> {
    match (&report.mode, &report.merge) {
        (ImportMode::Merge, Some(merge)) => {
            let mut lines = vec![format!(
                "merged {} projects from snapshot",
                report.snapshot_projects
            )];
            lines.extend(format_merge_report(merge).into_iter().map(|l| format!("  {}", l)));
            lines
        }
        _ => vec![format!(
            "replaced board with {} projects from snapshot",
            report.snapshot_projects
        )],
    }
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

/// Prints the board as text after every change
#[derive(Debug, Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&mut self, state: &AppState) {
        for line in format_board(state, None) {
            println!("{}", line);
        }
    }
}

/// Prints the board as JSON after every change
#[derive(Debug, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&mut self, state: &AppState) {
        if let Ok(s) = serde_json::to_string_pretty(&board_to_json(state)) {
            println!("{}", s);
        }
    }
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

/// Parse an import mode name
pub fn parse_import_mode(s: &str) -> Result<ImportMode, String> {
    match s {
        "merge" => Ok(ImportMode::Merge),
        "replace" => Ok(ImportMode::Replace),
        _ => Err(format!("unknown import mode '{}' (expected: merge, replace)", s)),
    }
}

/// What `tb layout <arg>` should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutChange {
    Set(LayoutMode),
    Toggle,
}

pub fn parse_layout_change(s: &str) -> Result<LayoutChange, String> {
    if s == "toggle" {
        return Ok(LayoutChange::Toggle);
    }
    LayoutMode::parse(s)
        .map(LayoutChange::Set)
        .ok_or_else(|| format!("unknown layout '{}' (expected: list, grid, toggle)", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::board_ops::demo_projects;
    use pretty_assertions::assert_eq;

    fn demo() -> AppState {
        AppState::new(demo_projects(), LayoutMode::List)
    }

    #[test]
    fn progress_text() {
        assert_eq!(format_progress(&Progress::default()), "no subtasks");
        let p = Progress {
            done: 1,
            total: 3,
            percent: 33,
        };
        assert_eq!(format_progress(&p), "1/3 done (33%)");
    }

    #[test]
    fn tabs_bracket_the_current_project() {
        let mut state = demo();
        state.projects.push(Project::new("p2", "Home"));
        assert_eq!(format_tabs(&state), "[Demo project]  Home ");
    }

    #[test]
    fn subtask_lines_show_completion() {
        let mut sub = Subtask::new("s1", "Define scope");
        assert_eq!(format_subtask_line(&sub), "[ ] s1 Define scope");
        sub.done = true;
        assert_eq!(format_subtask_line(&sub), "[x] s1 Define scope");
    }

    #[test]
    fn list_layout_stacks_cards() {
        let state = demo();
        let lines = format_project(&state.projects[0], LayoutMode::List);
        assert_eq!(lines[0], "== Demo project (p1) ==  0/4 done (0%)");
        assert_eq!(lines[2], "t1 Prepare project plan  0/2 done (0%)");
        assert_eq!(lines[3], "  [ ] s1 Define scope");
        assert_eq!(lines[6], "t2 Frontend work  0/2 done (0%)");
    }

    #[test]
    fn grid_layout_puts_cards_side_by_side() {
        let state = demo();
        let lines = format_project(&state.projects[0], LayoutMode::Grid);
        // header, blank, then three rows of two cards
        assert_eq!(lines.len(), 5);
        assert!(lines[2].starts_with("t1 Prepare project plan"));
        assert!(lines[2].ends_with("t2 Frontend work  0/2 done (0%)"));
        assert!(lines[3].contains("[ ] s1 Define scope"));
        assert!(lines[3].contains("[ ] s3 Design header"));
    }

    #[test]
    fn grid_pads_by_display_width() {
        let cards = vec![vec!["日本".to_string()], vec!["x".to_string()]];
        assert_eq!(format_grid_row(&cards), vec!["日本  x".to_string()]);
    }

    #[test]
    fn empty_board_has_a_hint() {
        let lines = format_board(&AppState::default(), None);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("tb project add"));
    }

    #[test]
    fn empty_project_message() {
        let lines = format_project(&Project::new("p1", "Empty"), LayoutMode::List);
        assert_eq!(lines[1], "No tasks in this project yet.");
    }

    #[test]
    fn summaries_mark_current() {
        let mut state = demo();
        state.projects.push(Project::new("p2", "Home"));
        let sums = project_summaries(&state);
        assert!(sums[0].current);
        assert!(!sums[1].current);
        assert_eq!(format_project_summary(&sums[1]), "  p2 Home  0 tasks, no subtasks");
    }

    #[test]
    fn parse_args() {
        assert_eq!(parse_import_mode("replace"), Ok(ImportMode::Replace));
        assert!(parse_import_mode("upsert").is_err());
        assert_eq!(parse_layout_change("toggle"), Ok(LayoutChange::Toggle));
        assert_eq!(
            parse_layout_change("grid"),
            Ok(LayoutChange::Set(LayoutMode::Grid))
        );
        assert!(parse_layout_change("kanban").is_err());
    }

    #[test]
    fn board_json_shape() {
        let state = demo();
        let v = serde_json::to_value(board_to_json(&state)).unwrap();
        assert_eq!(v["layout"], "list");
        assert_eq!(v["current_project"], "p1");
        assert_eq!(v["progress"]["total"], 4);
        assert_eq!(v["projects"][0]["tasks"][0]["subtasks"][0]["id"], "s1");
    }
}
