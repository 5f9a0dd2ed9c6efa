//! Session — the single state container a dashboard UI owns.
//!
//! Holds the current `Board` snapshot plus UI-only state: drawer
//! visibility, which category is expanded in the drawer, and the staged
//! "add widget" text per category. Board changes always replace the
//! snapshot with the one returned by the pure `Board` operations.

use std::collections::HashMap;

use tracing::debug;

use crate::board::Board;

#[derive(Debug, Clone, Default)]
pub struct Session {
    board: Board,
    drawer_open: bool,
    expanded_category: Option<String>,
    pending_input: HashMap<String, String>,
}

impl Session {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            ..Self::default()
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub fn expanded_category(&self) -> Option<&str> {
        self.expanded_category.as_deref()
    }

    pub fn is_expanded(&self, category_id: &str) -> bool {
        self.expanded_category.as_deref() == Some(category_id)
    }

    /// Staged text for a category; empty when nothing was typed.
    pub fn pending_input(&self, category_id: &str) -> &str {
        self.pending_input
            .get(category_id)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn toggle_drawer(&mut self) {
        self.drawer_open = !self.drawer_open;
    }

    /// Clicking a category header: collapse it if it is the expanded one,
    /// otherwise make it the (only) expanded one.
    pub fn toggle_category(&mut self, category_id: &str) {
        if self.is_expanded(category_id) {
            self.expanded_category = None;
        } else {
            self.expanded_category = Some(category_id.to_string());
        }
    }

    pub fn stage_input(&mut self, category_id: &str, value: impl Into<String>) {
        self.pending_input
            .insert(category_id.to_string(), value.into());
    }

    /// Add a widget named after the category's staged text. The staged text
    /// is cleared only when the widget was actually added.
    ///
    /// Returns `true` when the board changed.
    pub fn submit_widget(&mut self, category_id: &str) -> bool {
        let name = self.pending_input.get(category_id).map(String::as_str);
        match self.board.try_add_widget(category_id, name) {
            Ok(board) => {
                debug!("added widget {:?} to {}", name, category_id);
                self.board = board;
                self.stage_input(category_id, "");
                true
            }
            Err(e) => {
                debug!("add widget ignored: {}", e);
                false
            }
        }
    }

    pub fn remove_widget(&mut self, category_id: &str, index: usize) -> bool {
        match self.board.try_remove_widget(category_id, index) {
            Ok(board) => {
                debug!("removed widget #{} from {}", index, category_id);
                self.board = board;
                true
            }
            Err(e) => {
                debug!("remove widget ignored: {}", e);
                false
            }
        }
    }

    pub fn add_category(&mut self) {
        self.board = self.board.add_category();
        debug!("added category, now {}", self.board.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Category;

    fn session() -> Session {
        Session::new(Board::from_categories([
            Category::new("cloud", "Cloud"),
            Category::new("registry", "Registry"),
        ]))
    }

    #[test]
    fn test_drawer_starts_closed() {
        let mut s = session();
        assert!(!s.drawer_open());
        s.toggle_drawer();
        assert!(s.drawer_open());
        s.toggle_drawer();
        assert!(!s.drawer_open());
    }

    #[test]
    fn test_toggle_category_single_expansion() {
        let mut s = session();
        s.toggle_category("cloud");
        assert_eq!(s.expanded_category(), Some("cloud"));
        s.toggle_category("cloud");
        assert_eq!(s.expanded_category(), None);

        s.toggle_category("cloud");
        s.toggle_category("registry");
        assert_eq!(s.expanded_category(), Some("registry"));
        assert!(!s.is_expanded("cloud"));
    }

    #[test]
    fn test_submit_clears_only_that_category() {
        let mut s = session();
        s.stage_input("cloud", "Test One");
        s.stage_input("registry", "Pending");

        assert!(s.submit_widget("cloud"));
        assert_eq!(s.pending_input("cloud"), "");
        assert_eq!(s.pending_input("registry"), "Pending");
        assert_eq!(s.board().category("cloud").unwrap().widgets[0].id, "test-one");

        assert!(s.remove_widget("cloud", 0));
        assert_eq!(s.pending_input("registry"), "Pending");
    }

    #[test]
    fn test_submit_empty_is_noop() {
        let mut s = session();
        let before = s.board().clone();
        assert!(!s.submit_widget("cloud"));
        s.stage_input("cloud", "");
        assert!(!s.submit_widget("cloud"));
        assert_eq!(s.board(), &before);
    }

    #[test]
    fn test_submit_unknown_category_keeps_input() {
        let mut s = session();
        s.stage_input("ghost", "Widget");
        assert!(!s.submit_widget("ghost"));
        assert_eq!(s.pending_input("ghost"), "Widget");
    }

    #[test]
    fn test_add_category_and_remove_out_of_range() {
        let mut s = session();
        s.add_category();
        assert_eq!(s.board().len(), 3);
        assert_eq!(s.board().categories()[2].id, "category-3");
        assert!(!s.remove_widget("category-3", 0));
    }
}
