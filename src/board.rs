//! A live board session: the in-memory state plus its collaborators.
//!
//! Every mutation goes through [`Board::apply`], which runs the operation on a
//! copy of the state, saves the copy, and swaps it in only once both the
//! operation and the save succeeded. The renderer then sees the new board.

use std::error::Error;

use tracing::debug;

use crate::io::store::Store;
use crate::model::state::{AppState, LayoutMode};
use crate::ops::ids::IdGenerator;

/// Receives the live board after every successful mutation
pub trait Renderer {
    fn render(&mut self, state: &AppState);
}

/// Renderer that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _state: &AppState) {}
}

pub struct Board {
    state: AppState,
    store: Box<dyn Store>,
    renderer: Box<dyn Renderer>,
    ids: Box<dyn IdGenerator>,
}

impl Board {
    /// Open a board from its store. With no saved state the board starts
    /// from `seed` and the seed is saved right away. A store that holds
    /// something it cannot read is an error; it is never seeded over.
    pub fn open(
        store: Box<dyn Store>,
        renderer: Box<dyn Renderer>,
        ids: Box<dyn IdGenerator>,
        seed: impl FnOnce() -> AppState,
    ) -> Result<Board, Box<dyn Error>> {
        let (state, fresh) = match store.load()? {
            Some(saved) => (AppState::from_state(saved), false),
            None => (seed(), true),
        };
        let board = Board {
            state,
            store,
            renderer,
            ids,
        };
        if fresh {
            debug!("no saved board, starting from seed");
            board.store.save(&board.state.to_state())?;
        }
        Ok(board)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn layout(&self) -> LayoutMode {
        self.state.layout_mode
    }

    /// Select a project for display. Session-only, so nothing is saved.
    pub fn select(&mut self, project_id: &str) -> Result<(), Box<dyn Error>> {
        crate::ops::board_ops::select_project(&mut self.state, project_id)?;
        self.renderer.render(&self.state);
        Ok(())
    }

    /// Restore a selection remembered from an earlier session. Unknown IDs
    /// are ignored and the current selection stays.
    pub fn restore_selection(&mut self, project_id: &str) {
        if self.state.find_project(project_id).is_some() {
            self.state.current_project_id = Some(project_id.to_string());
        }
    }

    /// Run a mutation. If the operation or the save fails, the board is
    /// left exactly as it was.
    pub fn apply<T, E, F>(&mut self, op: F) -> Result<T, Box<dyn Error>>
    where
        F: FnOnce(&mut AppState, &mut dyn IdGenerator) -> Result<T, E>,
        E: Error + 'static,
    {
        let mut draft = self.state.clone();
        let out = op(&mut draft, self.ids.as_mut()).map_err(|e| Box::new(e) as Box<dyn Error>)?;
        self.store.save(&draft.to_state())?;
        self.state = draft;
        self.renderer.render(&self.state);
        Ok(out)
    }
}
