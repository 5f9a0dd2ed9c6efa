//! AppState — shared read-only data passed to all components during
//! render/event handling. Only the App event-loop writes to it.

use dash_model::config::UiConfig;
use dash_model::{ChartCatalog, Session};

use crate::widgets::status_bar::InputMode;

pub struct AppState {
    /// The single authoritative dashboard session.
    pub session: Session,
    /// Fixed charts looked up by widget id.
    pub catalog: ChartCatalog,

    pub input_mode: InputMode,
    pub show_keys_bar: bool,
    pub drawer_width_percent: u16,
    /// Last status message shown in the footer.
    pub status: Option<String>,
}

impl AppState {
    pub fn new(session: Session, catalog: ChartCatalog, ui: &UiConfig) -> Self {
        Self {
            session,
            catalog,
            input_mode: InputMode::Normal,
            show_keys_bar: ui.show_keys_bar,
            drawer_width_percent: ui.drawer_width(),
            status: None,
        }
    }

    /// Id of the category at `index`, if any.
    pub fn category_id(&self, index: usize) -> Option<&str> {
        self.session
            .board()
            .categories()
            .get(index)
            .map(|c| c.id.as_str())
    }
}
