//! TUI application state and event loop.
//!
//! Design: the UI thread owns the [`MonitorSession`] and runs every tick
//! itself. A [`Ticker`] exists only while monitoring and auto-refresh are both
//! on; it just signals that a tick is due.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use ratatui::widgets::TableState;

use cellbench_core::clock::now_ms;
use cellbench_core::scheduler::adjust_refresh;
use cellbench_core::{MonitorSession, TickOutcome, Ticker, default_export_path, export_json};

// ---------------------------------------------------------------------------
// Tab
// ---------------------------------------------------------------------------

/// Dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    RealTime,
    Health,
    Temperature,
    Trends,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Self::RealTime, Self::Health, Self::Temperature, Self::Trends];

    pub fn title(self) -> &'static str {
        match self {
            Self::RealTime => "Real-time",
            Self::Health => "Health",
            Self::Temperature => "Temperature",
            Self::Trends => "Trends",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::RealTime => 0,
            Self::Health => 1,
            Self::Temperature => 2,
            Self::Trends => 3,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    session: MonitorSession,
    refresh: Duration,
    ticker: Option<Ticker>,
    tab: Tab,
    running: bool,
    table_state: TableState,
    export_dir: PathBuf,
    last_export: Option<PathBuf>,
    /// One-line feedback for the last key action.
    message: Option<String>,
}

impl App {
    pub fn new(session: MonitorSession, refresh: Duration) -> Self {
        Self {
            session,
            refresh,
            ticker: None,
            tab: Tab::default(),
            running: true,
            table_state: TableState::default(),
            export_dir: PathBuf::from("."),
            last_export: None,
            message: None,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Restore the terminal before printing a panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        self.stop_ticker();
        if let Some(path) = &self.last_export {
            println!("Last snapshot: {}", path.display());
        }

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        while self.running {
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(50))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
            }

            if self.ticker.as_ref().is_some_and(Ticker::try_recv) {
                self.tick();
            }
        }

        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('i') => {
                self.session.initialize(now_ms());
                self.table_state.select(Some(0));
                self.message = Some(format!(
                    "Initialized {} cells",
                    self.session.readings().len()
                ));
            }
            KeyCode::Char('s') => {
                if !self.session.is_initialized() {
                    self.message = Some("Initialize the bench first (i)".to_string());
                } else {
                    self.session.toggle_monitoring();
                    self.message = None;
                }
            }
            KeyCode::Char('a') => {
                let enabled = !self.session.auto_refresh();
                self.session.set_auto_refresh(enabled);
            }
            KeyCode::Char('t') => self.tick(),
            KeyCode::Tab | KeyCode::Right => self.tab = self.tab.next(),
            KeyCode::BackTab | KeyCode::Left => self.tab = self.tab.prev(),
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.tab = Tab::ALL[idx];
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.refresh = adjust_refresh(self.refresh, 1);
            }
            KeyCode::Char('-') => {
                self.refresh = adjust_refresh(self.refresh, -1);
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Char('e') => self.export_snapshot(),
            _ => {}
        }
        self.sync_ticker();
    }

    fn tick(&mut self) {
        match self.session.tick(now_ms()) {
            TickOutcome::Updated { .. } => self.message = None,
            TickOutcome::Idle => {
                self.message = Some("Monitoring is stopped (s to start)".to_string());
            }
            TickOutcome::NotInitialized => {
                self.message = Some("Initialize the bench first (i)".to_string());
            }
        }
    }

    /// Run the ticker only while monitoring with auto-refresh on.
    fn sync_ticker(&mut self) {
        if !(self.session.is_monitoring() && self.session.auto_refresh()) {
            self.stop_ticker();
            return;
        }
        if let Some(ticker) = &self.ticker {
            if ticker.interval() != self.refresh {
                ticker.set_interval(self.refresh);
            }
        } else {
            self.ticker = Some(Ticker::spawn(self.refresh));
        }
    }

    fn stop_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
        }
    }

    fn move_cursor(&mut self, delta: i64) {
        let len = self.session.readings().len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, len as i64 - 1) as usize;
        self.table_state.select(Some(next));
    }

    fn export_snapshot(&mut self) {
        let now = now_ms();
        let path = self.export_dir.join(default_export_path(now));
        match export_json(&self.session, &path, now) {
            Ok(_) => {
                self.message = Some(format!("Exported {}", path.display()));
                self.last_export = Some(path);
            }
            Err(e) => {
                log::warn!("export failed: {e}");
                self.message = Some(format!("Export failed: {e}"));
            }
        }
    }

    // --- Accessors for rendering ---

    pub fn session(&self) -> &MonitorSession {
        &self.session
    }
    pub fn tab(&self) -> Tab {
        self.tab
    }
    pub fn refresh(&self) -> Duration {
        self.refresh
    }
    pub fn ticker_active(&self) -> bool {
        self.ticker.is_some()
    }
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }
    pub fn table_state(&self) -> TableState {
        self.table_state.clone()
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellbench_core::scheduler::DEFAULT_REFRESH;
    use cellbench_core::{BenchConfig, Chemistry, SeededSimulator};

    fn app() -> App {
        let config = BenchConfig::with_cells(vec![Chemistry::Lfp, Chemistry::Nmc, Chemistry::Lto]);
        let session = MonitorSession::new(config, Box::new(SeededSimulator::new(9))).unwrap();
        App::new(session, DEFAULT_REFRESH)
    }

    // -----------------------------------------------------------------------
    // Tabs
    // -----------------------------------------------------------------------

    #[test]
    fn tab_cycles_through_all_variants() {
        let tab = Tab::RealTime.next();
        assert_eq!(tab, Tab::Health);
        let tab = tab.next();
        assert_eq!(tab, Tab::Temperature);
        let tab = tab.next();
        assert_eq!(tab, Tab::Trends);
        assert_eq!(tab.next(), Tab::RealTime);
        assert_eq!(Tab::RealTime.prev(), Tab::Trends);
    }

    #[test]
    fn tab_titles() {
        let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
        assert_eq!(titles, vec!["Real-time", "Health", "Temperature", "Trends"]);
    }

    #[test]
    fn number_keys_select_tab() {
        let mut app = app();
        app.handle_key(KeyCode::Char('3'));
        assert_eq!(app.tab(), Tab::Temperature);
        app.handle_key(KeyCode::Char('1'));
        assert_eq!(app.tab(), Tab::RealTime);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.tab(), Tab::Health);
    }

    // -----------------------------------------------------------------------
    // Control keys
    // -----------------------------------------------------------------------

    #[test]
    fn start_requires_initialize() {
        let mut app = app();
        app.handle_key(KeyCode::Char('s'));
        assert!(!app.session().is_monitoring());
        assert!(app.message().is_some());
        assert!(!app.ticker_active());
    }

    #[test]
    fn ticker_follows_monitoring_and_auto_refresh() {
        let mut app = app();
        app.handle_key(KeyCode::Char('i'));
        assert_eq!(app.session().readings().len(), 3);

        app.handle_key(KeyCode::Char('s'));
        assert!(app.session().is_monitoring());
        assert!(app.ticker_active());

        app.handle_key(KeyCode::Char('a'));
        assert!(!app.session().auto_refresh());
        assert!(!app.ticker_active());

        app.handle_key(KeyCode::Char('a'));
        assert!(app.ticker_active());

        app.handle_key(KeyCode::Char('s'));
        assert!(!app.session().is_monitoring());
        assert!(!app.ticker_active());
    }

    #[test]
    fn manual_tick_records_history() {
        let mut app = app();
        app.handle_key(KeyCode::Char('t'));
        assert_eq!(app.message(), Some("Initialize the bench first (i)"));

        app.handle_key(KeyCode::Char('i'));
        app.handle_key(KeyCode::Char('t'));
        assert!(app.session().history().is_empty(), "stopped session is idle");

        app.handle_key(KeyCode::Char('s'));
        app.handle_key(KeyCode::Char('t'));
        app.handle_key(KeyCode::Char('t'));
        assert_eq!(app.session().history().len(), 2);
        assert_eq!(app.session().tick_count(), 2);
    }

    #[test]
    fn refresh_keys_adjust_interval() {
        let mut app = app();
        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.refresh(), Duration::from_secs(6));
        for _ in 0..20 {
            app.handle_key(KeyCode::Char('-'));
        }
        assert_eq!(app.refresh(), Duration::from_secs(1));
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut app = app();
        app.handle_key(KeyCode::Down);
        assert_eq!(app.selected(), None, "no rows before initialize");
        app.handle_key(KeyCode::Char('i'));
        for _ in 0..10 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.selected(), Some(2));
        app.handle_key(KeyCode::Up);
        assert_eq!(app.selected(), Some(1));
    }

    #[test]
    fn export_writes_into_export_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app();
        app.export_dir = tmp.path().to_path_buf();
        app.handle_key(KeyCode::Char('i'));
        app.handle_key(KeyCode::Char('e'));
        let path = app.last_export.clone().unwrap();
        assert!(path.starts_with(tmp.path()));
        assert!(path.exists());
    }

    #[test]
    fn quit_stops_loop() {
        let mut app = app();
        app.handle_key(KeyCode::Char('q'));
        assert!(!app.running);
    }
}
