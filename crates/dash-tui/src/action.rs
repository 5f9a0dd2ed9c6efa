//! Action enum — all user-initiated intents and internal events.

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    NavBar,
    WidgetGrid,
    Drawer,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Board ────────────────────────────────────────────────────────────────
    AddCategory,
    /// Add a widget to the category from its staged input text.
    SubmitWidget(String),
    /// Remove the widget at the index from the category.
    RemoveWidget(String, usize),

    // ── Drawer ───────────────────────────────────────────────────────────────
    ToggleDrawer,
    ToggleCategory(String),
    /// The "add widget" text for a category changed.
    StageInput(String, String),

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── UI toggles ───────────────────────────────────────────────────────────
    /// Toolbar refresh button; widget data is static so nothing reloads.
    Refresh,
    ToggleHelp,
    ToggleKeys,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
