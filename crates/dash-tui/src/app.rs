//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries terminal events in from a blocking reader task.
//! - The event loop draws each frame, then awaits the next message or UI tick.
//! - Components return `Vec<Action>`; App dispatches each Action and is the only
//!   writer of the dashboard session.

use std::io;
use std::time::{Duration, Instant};

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use dash_model::config::UiConfig;
use dash_model::{ChartCatalog, Session};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{drawer::Drawer, help_overlay::HelpOverlay, navbar::NavBar, widget_grid::WidgetGrid},
    focus::FocusRing,
    theme::C_BG,
    widgets::status_bar::{self, InputMode},
};

/// How long a footer status message stays up.
const STATUS_TTL: Duration = Duration::from_secs(4);

enum AppMessage {
    Event(Event),
}

/// Read terminal events into the channel until the receiver goes away.
///
/// Polls with a timeout instead of blocking in `event::read()`, so the thread
/// notices a closed channel and exits after quit.
fn forward_events(tx: mpsc::Sender<AppMessage>, poll_every: Duration) {
    while !tx.is_closed() {
        match event::poll(poll_every) {
            Ok(true) => {
                let Ok(ev) = event::read() else { break };
                if tx.blocking_send(AppMessage::Event(ev)).is_err() {
                    break;
                }
            }
            Ok(false) => {}
            Err(e) => {
                debug!("event reader stopped: {}", e);
                break;
            }
        }
    }
}

/// Last drawn rects, used for mouse hit-testing.
#[derive(Default, Clone, Copy)]
struct PaneAreas {
    grid: Rect,
    drawer: Rect,
}

pub struct App {
    state: AppState,
    focus: FocusRing,

    navbar: NavBar,
    grid: WidgetGrid,
    drawer: Drawer,
    help_overlay: HelpOverlay,

    areas: PaneAreas,
    tick_rate: Duration,
    mouse: bool,
    status_since: Option<Instant>,
    should_quit: bool,
}

impl App {
    pub fn new(session: Session, catalog: ChartCatalog, ui: &UiConfig) -> Self {
        let focus = FocusRing::new(FocusRing::for_drawer(session.drawer_open()));
        Self {
            state: AppState::new(session, catalog, ui),
            focus,
            navbar: NavBar::new(),
            grid: WidgetGrid::new(),
            drawer: Drawer::new(),
            help_overlay: HelpOverlay::new(),
            areas: PaneAreas::default(),
            tick_rate: Duration::from_millis(ui.tick_rate_ms.max(10)),
            mouse: ui.mouse,
            status_since: None,
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        if self.mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);

        // ── Background task: keyboard/mouse events ────────────────────────────
        let poll_every = self.tick_rate;
        tokio::task::spawn_blocking(move || forward_events(tx, poll_every));

        let mut ui_tick = tokio::time::interval(self.tick_rate);
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(msg) => needs_redraw = self.handle_message(msg),
                    None => break,
                },
                _ = ui_tick.tick() => {
                    needs_redraw = self.on_tick();
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        info!("dashboard exiting");
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        if self.mouse {
            execute!(terminal.backend_mut(), DisableMouseCapture)?;
        }
        terminal.show_cursor()?;

        Ok(())
    }

    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return false;
                    }
                    let actions = self.handle_key(key);
                    for a in actions {
                        self.dispatch(a);
                    }
                }
                Event::Mouse(mouse) => {
                    let actions = self.handle_mouse(mouse);
                    for a in actions {
                        self.dispatch(a);
                    }
                }
                Event::Resize(..) => {}
                _ => return false,
            },
        }
        self.sync_input_mode();
        true
    }

    /// Expire the footer status and give components their tick.
    fn on_tick(&mut self) -> bool {
        let mut redraw = false;
        if self.status_since.is_some_and(|t| t.elapsed() >= STATUS_TTL) {
            self.state.status = None;
            self.status_since = None;
            redraw = true;
        }
        let actions: Vec<Action> = {
            let s = &self.state;
            let mut out = self.grid.tick(s);
            out.extend(self.drawer.tick(s));
            out
        };
        for a in actions {
            self.dispatch(a);
            redraw = true;
        }
        redraw
    }

    // ── Input routing ─────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let normal = self.state.input_mode == InputMode::Normal;

        // Global keys
        match key.code {
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return vec![Action::Quit];
            }
            KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE && normal => {
                return vec![Action::Quit];
            }
            KeyCode::Char('?') if normal => return vec![Action::ToggleHelp],
            KeyCode::Char('K') if normal => return vec![Action::ToggleKeys],
            _ => {}
        }

        // Help overlay captures all keys when visible; anything else closes it.
        if self.help_overlay.visible {
            let actions = self.help_overlay.handle_key(key, &self.state);
            if !actions.is_empty() {
                return actions;
            }
            return vec![Action::ToggleHelp];
        }

        match key.code {
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            KeyCode::Char('a') if normal => return vec![Action::ToggleDrawer],
            _ => {}
        }

        match self.focus.current() {
            Some(ComponentId::Drawer) => self.drawer.handle_key(key, &self.state),
            _ => self.grid.handle_key(key, &self.state),
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let relevant = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !relevant || self.help_overlay.visible {
            return vec![];
        }
        let pos = (event.column, event.row).into();
        let areas = self.areas;
        let s = &self.state;

        // The drawer is drawn over the grid, so it wins.
        let (id, mut actions) = if s.session.drawer_open() && areas.drawer.contains(pos) {
            (ComponentId::Drawer, self.drawer.handle_mouse(event, areas.drawer, s))
        } else if areas.grid.contains(pos) {
            (ComponentId::WidgetGrid, self.grid.handle_mouse(event, areas.grid, s))
        } else {
            return vec![];
        };
        if matches!(event.kind, MouseEventKind::Down(_)) && !self.focus.is_focused(id) {
            actions.insert(0, Action::FocusPane(id));
        }
        actions
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // Components see the action first, against the pre-action state.
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.grid.on_action(&action, s));
            out.extend(self.drawer.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        // Depth-limited to one level.
        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        match &action {
            Action::StageInput(..) => {}
            _ => debug!("apply_action: {:?}", action),
        }
        match action {
            // ── Board ─────────────────────────────────────────────────────────
            Action::AddCategory => {
                self.state.session.add_category();
                let added = self
                    .state
                    .session
                    .board()
                    .categories()
                    .last()
                    .map(|cat| (cat.id.clone(), cat.name.clone()));
                if let Some((id, name)) = added {
                    info!("added category {} ({})", name, id);
                    self.set_status(format!("added {}", name));
                }
                self.grid.clamp_selection(&self.state);
            }
            Action::SubmitWidget(category_id) => {
                let name = self.state.session.pending_input(&category_id).to_string();
                if self.state.session.submit_widget(&category_id) {
                    info!("added widget {:?} to {}", name, category_id);
                    self.set_status(format!("added widget {}", name));
                }
            }
            Action::RemoveWidget(category_id, index) => {
                if self.state.session.remove_widget(&category_id, index) {
                    info!("removed widget #{} from {}", index, category_id);
                    self.set_status("widget removed".to_string());
                    self.grid.clamp_selection(&self.state);
                }
            }

            // ── Drawer ────────────────────────────────────────────────────────
            Action::ToggleDrawer => {
                self.state.session.toggle_drawer();
                let open = self.state.session.drawer_open();
                self.focus.set_items(FocusRing::for_drawer(open));
                if open {
                    self.focus.set(ComponentId::Drawer);
                }
            }
            Action::ToggleCategory(category_id) => {
                self.state.session.toggle_category(&category_id);
            }
            Action::StageInput(category_id, value) => {
                self.state.session.stage_input(&category_id, value);
            }

            // ── Navigation ────────────────────────────────────────────────────
            Action::FocusNext => {
                self.focus.next();
            }
            Action::FocusPrev => {
                self.focus.prev();
            }
            Action::FocusPane(id) => self.focus.set(id),

            // ── UI toggles ────────────────────────────────────────────────────
            Action::Refresh => {
                info!("refresh requested");
                self.set_status("dashboard is up to date".to_string());
            }
            // HelpOverlay flips its own visibility in on_action.
            Action::ToggleHelp => {}
            Action::ToggleKeys => {
                self.state.show_keys_bar = !self.state.show_keys_bar;
            }

            // ── System ────────────────────────────────────────────────────────
            Action::Quit => self.should_quit = true,
        }
    }

    fn set_status(&mut self, msg: String) {
        self.state.status = Some(msg);
        self.status_since = Some(Instant::now());
    }

    /// Insert mode while the drawer's text field holds the selection.
    fn sync_input_mode(&mut self) {
        let editing = self.state.session.drawer_open()
            && self.focus.is_focused(ComponentId::Drawer)
            && self.drawer.is_editing(&self.state);
        self.state.input_mode = if editing {
            InputMode::Insert
        } else {
            InputMode::Normal
        };
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let status_h = if self.state.show_keys_bar { 1u16 } else { 0 };
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(status_h),
            ])
            .split(area);
        let (nav_area, body_area, status_area) = (outer[0], outer[1], outer[2]);

        self.navbar.draw(frame, nav_area, false, &self.state);

        let grid_focused = self.focus.is_focused(ComponentId::WidgetGrid);
        self.grid.draw(frame, body_area, grid_focused, &self.state);
        self.areas.grid = body_area;

        // ── Drawer overlays the right side of the body ────────────────────────
        if self.state.session.drawer_open() {
            let w = (body_area.width as u32 * self.state.drawer_width_percent as u32 / 100) as u16;
            let drawer_area = Rect::new(
                body_area.x + body_area.width.saturating_sub(w),
                body_area.y,
                w,
                body_area.height,
            );
            let drawer_focused = self.focus.is_focused(ComponentId::Drawer);
            self.drawer.draw(frame, drawer_area, drawer_focused, &self.state);
            self.areas.drawer = drawer_area;
        } else {
            self.areas.drawer = Rect::default();
        }

        if self.state.show_keys_bar {
            status_bar::draw_keys_bar(
                frame,
                status_area,
                self.state.input_mode,
                self.focus.current(),
                self.state.status.as_deref(),
            );
        }

        // ── Help overlay (on top of everything) ──────────────────────────────
        self.help_overlay.draw(frame, area, false, &self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_model::{Board, Category, Widget};
    use ratatui::{
        backend::TestBackend,
        crossterm::event::{KeyModifiers, MouseButton},
    };

    fn app() -> App {
        let mut cloud = Category::new("cloud", "Cloud");
        cloud.widgets = vec![Widget::named("Cloud Accounts")];
        App::new(
            Session::new(Board::from_categories([cloud])),
            ChartCatalog::builtin(),
            &UiConfig::default(),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        app.handle_message(AppMessage::Event(Event::Key(key)));
    }

    #[test]
    fn test_add_widget_through_drawer() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert!(app.state.session.drawer_open());
        assert!(app.focus.is_focused(ComponentId::Drawer));

        // Expand "Cloud", then walk down to the text field.
        press(&mut app, KeyCode::Enter);
        assert!(app.state.session.is_expanded("cloud"));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.state.input_mode, InputMode::Insert);

        // 'q' and 'a' are text while editing.
        for c in "qa".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.state.session.pending_input("cloud"), "qa");
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Enter);
        let cloud = app.state.session.board().category("cloud").unwrap();
        assert_eq!(cloud.widgets.len(), 2);
        assert_eq!(cloud.widgets[1].name, "qa");
        assert_eq!(app.state.session.pending_input("cloud"), "");
        assert_eq!(app.state.status.as_deref(), Some("added widget qa"));
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_mouse_routing_drawer_over_grid() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        // Drawer takes the right 40% of the body: x 72..120, first list row at y 4.
        assert_eq!(app.areas.drawer, Rect::new(72, 1, 48, 38));

        // Over the drawer the drawer handles it, even though the grid lies beneath.
        assert_eq!(
            app.handle_mouse(click(80, 4)),
            vec![Action::ToggleCategory("cloud".into())]
        );

        // A click on the unfocused grid focuses it first.
        assert_eq!(
            app.handle_mouse(click(5, 10)),
            vec![Action::FocusPane(ComponentId::WidgetGrid)]
        );
        app.handle_message(AppMessage::Event(Event::Mouse(click(5, 10))));
        assert!(app.focus.is_focused(ComponentId::WidgetGrid));
        assert!(app.handle_mouse(click(5, 10)).is_empty());
    }

    #[test]
    fn test_mouse_ignored_under_help() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.handle_mouse(click(5, 10)).is_empty());
    }

    #[test]
    fn test_event_reader_exits_when_channel_closes() {
        let (tx, rx) = mpsc::channel::<AppMessage>(1);
        drop(rx);
        let reader = std::thread::spawn(move || forward_events(tx, Duration::from_millis(10)));
        reader.join().unwrap();
    }

    #[test]
    fn test_esc_closes_drawer_and_returns_focus() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Esc);
        assert!(!app.state.session.drawer_open());
        assert!(app.focus.is_focused(ComponentId::WidgetGrid));
        assert_eq!(app.state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.help_overlay.visible);
        press(&mut app, KeyCode::Char('a'));
        assert!(!app.help_overlay.visible);
        assert!(!app.state.session.drawer_open());
    }

    #[test]
    fn test_quit_keys() {
        let mut by_q = app();
        press(&mut by_q, KeyCode::Char('q'));
        assert!(by_q.should_quit);

        let mut by_ctrl_c = app();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        by_ctrl_c.handle_message(AppMessage::Event(Event::Key(ctrl_c)));
        assert!(by_ctrl_c.should_quit);
    }

    #[test]
    fn test_draw_with_drawer_open() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        let buf = terminal.backend().buffer();
        let screen: String = (0..40)
            .map(|y| (0..120).map(|x| buf[(x, y)].symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(screen.contains("Personalize your dashboard"));
        assert!(screen.contains("Add the following widgets:"));
        assert!(screen.contains("Home  >  Dashboard"));
        assert!(app.areas.drawer.width > 0);
    }
}
