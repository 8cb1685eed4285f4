//! Main application state and TUI event loop for the Casemix verifier.
//!
//! [`App`] owns the review [`Session`], the theme, the active view and the
//! status line. Key handling is kept apart from the terminal loop in
//! [`App::handle_key`] so it can be driven directly in tests.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};

use casemix_core::rules::{Rule, RULE_ARG_SEPARATOR};
use casemix_data::aggregator::ClaimSummary;
use casemix_data::writer::DEFAULT_EXPORT_NAME;
use casemix_runtime::session::Session;

use crate::rules_view;
use crate::summary_view::{self, DashboardData};
use crate::table_view::{self, TableCursor};
use crate::themes::Theme;

/// File name used by `s` when no rules file was given on the command line.
pub const DEFAULT_RULES_NAME: &str = "rules.json";

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which view the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Metrics and top-N frequency charts.
    Dashboard,
    /// Flagged rows with their notes.
    Verification,
    /// The rule set with hit counts.
    Rules,
}

impl ViewMode {
    /// Parse a `--view` value. Unknown names fall back to the dashboard.
    pub fn from_name(name: &str) -> Self {
        match name {
            "verification" => Self::Verification,
            "rules" => Self::Rules,
            _ => Self::Dashboard,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Verification => "verification",
            Self::Rules => "rules",
        }
    }

    /// Next view in Tab order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Dashboard => Self::Verification,
            Self::Verification => Self::Rules,
            Self::Rules => Self::Dashboard,
        }
    }

    /// Previous view in Tab order, wrapping around.
    pub fn previous(self) -> Self {
        match self {
            Self::Dashboard => Self::Rules,
            Self::Verification => Self::Dashboard,
            Self::Rules => Self::Verification,
        }
    }
}

// ── Status line ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// One-line feedback for the last user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the verifier TUI.
pub struct App {
    pub theme: Theme,
    pub view_mode: ViewMode,
    pub session: Session,
    /// Codes shown per frequency chart.
    pub top_n: usize,
    /// Target of `s`.
    pub rules_path: PathBuf,
    /// Target of `e`.
    pub export_path: PathBuf,
    /// Highlighted rule in the rules view.
    pub selected_rule: usize,
    /// Scroll position in the verification view.
    pub cursor: TableCursor,
    pub status: Option<StatusMessage>,
    /// Line being typed after `a` in the rules view. While set, keys edit
    /// it instead of running commands.
    pub rule_input: Option<String>,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    /// Raised from outside the UI thread (OS signal) to stop the loop.
    shutdown: Arc<AtomicBool>,
    /// Dashboard summary as of the last session change.
    summary: ClaimSummary,
    /// Per-rule hit counts as of the last session change.
    hits: Vec<usize>,
}

impl App {
    /// Construct the app around an already populated session.
    pub fn new(session: Session, theme_name: &str, view_mode: ViewMode, top_n: usize) -> Self {
        let mut app = Self {
            theme: Theme::from_name(theme_name),
            view_mode,
            session,
            top_n,
            rules_path: PathBuf::from(DEFAULT_RULES_NAME),
            export_path: PathBuf::from(DEFAULT_EXPORT_NAME),
            selected_rule: 0,
            cursor: TableCursor::default(),
            status: None,
            rule_input: None,
            should_quit: false,
            shutdown: Arc::new(AtomicBool::new(false)),
            summary: ClaimSummary::default(),
            hits: Vec::new(),
        };
        app.refresh_views();
        if let Some(err) = app.session.last_error() {
            app.status = Some(StatusMessage {
                text: err.to_string(),
                level: StatusLevel::Error,
            });
        }
        app
    }

    /// Share a flag that stops [`App::run`] within one tick once set.
    pub fn with_shutdown(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = flag;
        self
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the TUI until `q`, `Q` or `Ctrl+C`.
    ///
    /// Blocking: polls `crossterm` events with a 250 ms timeout on the
    /// calling thread. The terminal is restored even if drawing fails.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key)
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit || self.shutdown.load(Ordering::Relaxed) {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    /// Apply one key press to the app state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.rule_input.is_some() {
            self.handle_rule_input_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,

            KeyCode::Char('1') => self.view_mode = ViewMode::Dashboard,
            KeyCode::Char('2') => self.view_mode = ViewMode::Verification,
            KeyCode::Char('3') => self.view_mode = ViewMode::Rules,
            KeyCode::Tab => self.view_mode = self.view_mode.next(),
            KeyCode::BackTab => self.view_mode = self.view_mode.previous(),

            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Left | KeyCode::Char('h') if self.view_mode == ViewMode::Verification => {
                self.cursor.column_offset = self.cursor.column_offset.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') if self.view_mode == ViewMode::Verification => {
                let columns = self
                    .session
                    .cached_verification()
                    .map_or(0, |r| r.columns.len());
                let last = columns.saturating_sub(1);
                self.cursor.column_offset = (self.cursor.column_offset + 1).min(last);
            }

            KeyCode::Char('a') if self.view_mode == ViewMode::Rules => {
                self.rule_input = Some(String::new());
            }
            KeyCode::Char('d') if self.view_mode == ViewMode::Rules => self.delete_selected_rule(),
            KeyCode::Char('s') => self.save_rules(),
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
    }

    fn handle_rule_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                self.rule_input = None;
                self.info("Add rule cancelled".to_string());
            }
            KeyCode::Enter => {
                if let Some(line) = self.rule_input.take() {
                    self.add_rule_from_line(&line);
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = self.rule_input.as_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = self.rule_input.as_mut() {
                    buffer.push(c);
                }
            }
            _ => {}
        }
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    /// Parse `line` as `NAME|COLUMN|PATTERN|MESSAGE` and append the rule.
    /// The new rule becomes the selected one.
    pub fn add_rule_from_line(&mut self, line: &str) {
        match line.parse::<Rule>() {
            Ok(rule) => {
                let name = rule.name.clone();
                tracing::info!(rule = %name, column = %rule.column, "rule added");
                self.session.add_rule(rule);
                self.selected_rule = self.session.rules().len().saturating_sub(1);
                self.refresh_views();
                self.info(format!("Added rule '{name}'"));
            }
            Err(e) => self.error(e.to_string()),
        }
    }

    /// Remove the highlighted rule.
    pub fn delete_selected_rule(&mut self) {
        match self.session.remove_rule(self.selected_rule) {
            Ok(rule) => {
                tracing::info!(rule = %rule.name, "rule removed");
                self.info(format!("Removed rule '{}'", rule.name));
                self.refresh_views();
            }
            Err(e) => {
                self.session.clear_error();
                self.error(e.to_string());
            }
        }
    }

    /// Write the current rule set to [`App::rules_path`].
    pub fn save_rules(&mut self) {
        match self.session.rules().save_to(&self.rules_path) {
            Ok(()) => self.info(format!(
                "Saved {} rules to {}",
                self.session.rules().len(),
                self.rules_path.display()
            )),
            Err(e) => self.error(e.to_string()),
        }
    }

    /// Export the verification result to [`App::export_path`].
    pub fn export(&mut self) {
        match self.session.export(&self.export_path) {
            Ok(n) => self.info(format!(
                "Exported {n} flagged rows to {}",
                self.export_path.display()
            )),
            Err(e) => {
                self.session.clear_error();
                self.error(e.to_string());
            }
        }
    }

    /// Re-read the input file. On failure the old table stays on screen.
    pub fn reload(&mut self) {
        match self.session.reload() {
            Ok(rows) => {
                self.info(format!("Reloaded {rows} rows"));
                self.refresh_views();
            }
            Err(e) => {
                tracing::warn!("reload failed: {e}");
                self.session.clear_error();
                self.error(format!("Reload failed: {e}"));
            }
        }
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    /// Recompute the cached summary and hit counts after a session change.
    fn refresh_views(&mut self) {
        self.summary = self.session.summary(self.top_n);
        self.hits = self.session.rule_hits();

        let rules = self.session.rules().len();
        self.selected_rule = self.selected_rule.min(rules.saturating_sub(1));
        let flagged = self.session.verification().len();
        self.cursor.row = self.cursor.row.min(flagged.saturating_sub(1));
    }

    fn move_selection(&mut self, delta: isize) {
        let (current, len) = match self.view_mode {
            ViewMode::Rules => (self.selected_rule, self.session.rules().len()),
            ViewMode::Verification => (self.cursor.row, self.summary.metrics.flagged_count),
            ViewMode::Dashboard => return,
        };
        if len == 0 {
            return;
        }
        let next = current.saturating_add_signed(delta).min(len - 1);
        match self.view_mode {
            ViewMode::Rules => self.selected_rule = next,
            _ => self.cursor.row = next,
        }
    }

    fn info(&mut self, text: String) {
        self.status = Some(StatusMessage {
            text,
            level: StatusLevel::Info,
        });
    }

    fn error(&mut self, text: String) {
        self.status = Some(StatusMessage {
            text,
            level: StatusLevel::Error,
        });
    }

    fn source_name(&self) -> String {
        self.session
            .source()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "no file".to_string())
    }

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let [main, status] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .areas(frame.area());

        match self.view_mode {
            ViewMode::Dashboard => {
                if self.session.source().is_none() && self.session.table().is_empty() {
                    summary_view::render_no_data(frame, main, &self.theme);
                } else {
                    let source = self.source_name();
                    let data = DashboardData {
                        source: &source,
                        rule_count: self.session.rules().len(),
                        summary: &self.summary,
                    };
                    summary_view::render_dashboard(frame, main, &data, &self.theme);
                }
            }
            ViewMode::Verification => match self.session.cached_verification() {
                Some(result) if !result.is_empty() => table_view::render_verification_table(
                    frame,
                    main,
                    result,
                    self.cursor,
                    &self.theme,
                ),
                _ => table_view::render_no_flags(
                    frame,
                    main,
                    self.session.rules().len(),
                    &self.theme,
                ),
            },
            ViewMode::Rules => rules_view::render_rules_view(
                frame,
                main,
                self.session.rules(),
                &self.hits,
                self.selected_rule,
                &self.theme,
            ),
        }

        self.render_status(frame, status);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        if let Some(buffer) = &self.rule_input {
            let sep = RULE_ARG_SEPARATOR;
            let line = Line::from(vec![
                Span::styled(
                    format!(" Add rule NAME{sep}COLUMN{sep}PATTERN{sep}MESSAGE: "),
                    self.theme.label,
                ),
                Span::styled(format!("{buffer}_"), self.theme.value),
                Span::styled("  (Enter add, Esc cancel)", self.theme.dim),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }
        let line = match &self.status {
            Some(StatusMessage { text, level }) => {
                let style = match level {
                    StatusLevel::Info => self.theme.info,
                    StatusLevel::Error => self.theme.error,
                };
                Line::from(Span::styled(format!(" {text}"), style))
            }
            None => Line::from(vec![
                Span::styled(format!(" [{}] ", self.view_mode.name()), self.theme.value),
                Span::styled(
                    "1/2/3 or Tab switch view | r reload | e export | s save rules | q quit",
                    self.theme.dim,
                ),
            ]),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use casemix_core::rules::{Rule, RuleSet};
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    const CLAIMS: &str = "SEP\tINACBG\tDIAGLIST\tTOTAL_TARIF\tTARIF_RS\tPTD\n\
        0001\tA-1-II-0\tZ09.8;I10\t1000\t800\t1\n\
        0002\tB-2-I-1\tI10\t500\t600\t2\n\
        0003\tA-1-II-0\tZ09.0\t700\t700\t2\n";

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn rules() -> RuleSet {
        vec![
            Rule::new("z09", "DIAGLIST", "Z09", "Check Z09").unwrap(),
            Rule::new("cmg-a", "CMG", "A", "CMG A").unwrap(),
        ]
        .into_iter()
        .collect()
    }

    fn app_with_file(dir: &TempDir) -> App {
        let path = dir.path().join("klaim.txt");
        std::fs::write(&path, CLAIMS).unwrap();
        let mut session = Session::with_rules(rules());
        session.load(&path).unwrap();
        let mut app = App::new(session, "dark", ViewMode::Dashboard, 20);
        app.rules_path = dir.path().join("rules.json");
        app.export_path = dir.path().join("out.txt");
        app
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ── ViewMode ──────────────────────────────────────────────────────────────

    #[test]
    fn test_view_mode_from_name() {
        assert_eq!(ViewMode::from_name("dashboard"), ViewMode::Dashboard);
        assert_eq!(ViewMode::from_name("verification"), ViewMode::Verification);
        assert_eq!(ViewMode::from_name("rules"), ViewMode::Rules);
        assert_eq!(ViewMode::from_name("bogus"), ViewMode::Dashboard);
    }

    #[test]
    fn test_view_mode_cycle() {
        let mut mode = ViewMode::Dashboard;
        for _ in 0..3 {
            assert_eq!(mode.next().previous(), mode);
            mode = mode.next();
        }
        assert_eq!(mode, ViewMode::Dashboard);
    }

    // ── App::new ──────────────────────────────────────────────────────────────

    #[test]
    fn test_app_creation_defaults() {
        let app = App::new(Session::new(), "dark", ViewMode::Rules, 20);
        assert_eq!(app.view_mode, ViewMode::Rules);
        assert_eq!(app.rules_path, PathBuf::from(DEFAULT_RULES_NAME));
        assert_eq!(app.export_path, PathBuf::from(DEFAULT_EXPORT_NAME));
        assert!(!app.should_quit);
        assert!(app.status.is_none());
    }

    #[test]
    fn test_app_summary_reflects_session() {
        let tmp = TempDir::new().unwrap();
        let app = app_with_file(&tmp);
        assert_eq!(app.summary.metrics.row_count, 3);
        // Rows 1 and 3 match both rules; the derived CMG rule is last.
        assert_eq!(app.summary.metrics.flagged_count, 2);
        assert_eq!(app.hits, vec![2, 2]);
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(Session::new(), "dark", ViewMode::Dashboard, 20);
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = App::new(Session::new(), "dark", ViewMode::Dashboard, 20);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_view_switch_keys() {
        let mut app = App::new(Session::new(), "dark", ViewMode::Dashboard, 20);
        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.view_mode, ViewMode::Rules);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.view_mode, ViewMode::Dashboard);
        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.view_mode, ViewMode::Verification);
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.view_mode, ViewMode::Dashboard);
    }

    #[test]
    fn test_rule_selection_is_bounded() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_file(&tmp);
        app.handle_key(key(KeyCode::Char('3')));
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected_rule, 0);
        for _ in 0..5 {
            app.handle_key(key(KeyCode::Down));
        }
        assert_eq!(app.selected_rule, 1);
    }

    #[test]
    fn test_delete_rule_updates_hits() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_file(&tmp);
        app.handle_key(key(KeyCode::Char('3')));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('d')));

        assert_eq!(app.session.rules().len(), 1);
        assert_eq!(app.hits, vec![2]);
        assert_eq!(app.selected_rule, 0);
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.level, StatusLevel::Info);
        assert!(status.text.contains("cmg-a"));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_add_rule_updates_hits_and_flagged() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_file(&tmp);
        app.handle_key(key(KeyCode::Char('3')));
        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "ht|DIAGLIST|I10|Check I10");
        app.handle_key(key(KeyCode::Enter));

        assert!(app.rule_input.is_none());
        assert_eq!(app.session.rules().len(), 3);
        assert_eq!(app.hits, vec![2, 2, 2]);
        // Row 0002 is only flagged by the new rule.
        assert_eq!(app.summary.metrics.flagged_count, 3);
        assert_eq!(app.selected_rule, 2);
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.level, StatusLevel::Info);
        assert!(status.text.contains("'ht'"));
    }

    #[test]
    fn test_add_rule_malformed_line_reports_error() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_file(&tmp);
        app.handle_key(key(KeyCode::Char('3')));
        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "ht|DIAGLIST");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.session.rules().len(), 2);
        assert_eq!(app.hits, vec![2, 2]);
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.text.starts_with("Invalid rule"));
    }

    #[test]
    fn test_rule_input_captures_command_keys() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_file(&tmp);
        app.handle_key(key(KeyCode::Char('3')));
        app.handle_key(key(KeyCode::Char('a')));
        type_text(&mut app, "qd");
        assert!(!app.should_quit);
        assert_eq!(app.session.rules().len(), 2);
        assert_eq!(app.rule_input.as_deref(), Some("qd"));

        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.rule_input.as_deref(), Some("q"));
        assert!(screen(&app).contains("Add rule"));

        app.handle_key(key(KeyCode::Esc));
        assert!(app.rule_input.is_none());
        assert_eq!(app.session.rules().len(), 2);
    }

    #[test]
    fn test_add_key_ignored_outside_rules_view() {
        let mut app = App::new(Session::new(), "dark", ViewMode::Dashboard, 20);
        app.handle_key(key(KeyCode::Char('a')));
        assert!(app.rule_input.is_none());
    }

    #[test]
    fn test_delete_on_empty_rule_set_reports_error() {
        let mut app = App::new(Session::new(), "dark", ViewMode::Rules, 20);
        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.status.as_ref().unwrap().level, StatusLevel::Error);
        assert!(app.session.last_error().is_none());
    }

    #[test]
    fn test_delete_ignored_outside_rules_view() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_file(&tmp);
        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.session.rules().len(), 2);
    }

    #[test]
    fn test_save_rules_writes_file() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_file(&tmp);
        app.handle_key(key(KeyCode::Char('s')));
        let saved = RuleSet::load_from(&app.rules_path).unwrap();
        assert_eq!(saved, rules());
    }

    #[test]
    fn test_export_writes_file() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_file(&tmp);
        app.handle_key(key(KeyCode::Char('e')));
        let text = std::fs::read_to_string(&app.export_path).unwrap();
        assert!(text.starts_with("note\tSEP\t"));
        assert_eq!(text.lines().count(), 3);
        assert!(app.status.as_ref().unwrap().text.contains("2 flagged rows"));
    }

    #[test]
    fn test_reload_failure_keeps_table() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_file(&tmp);
        std::fs::write(tmp.path().join("klaim.txt"), "a,b,c\n1,2,3\n").unwrap();

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.session.table().len(), 3);
        assert_eq!(app.summary.metrics.row_count, 3);
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.text.starts_with("Reload failed"));
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_file(&tmp);
        std::fs::write(
            tmp.path().join("klaim.txt"),
            "SEP\tDIAGLIST\n0009\tZ09.1\n",
        )
        .unwrap();

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.summary.metrics.row_count, 1);
        assert_eq!(app.hits, vec![1, 0]);
    }

    #[test]
    fn test_column_scroll_in_verification_view() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_file(&tmp);
        app.handle_key(key(KeyCode::Char('2')));
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.cursor.column_offset, 0);
        for _ in 0..20 {
            app.handle_key(key(KeyCode::Right));
        }
        // Six raw columns plus five derived ones.
        assert_eq!(app.cursor.column_offset, 10);
    }

    // ── Render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_each_view() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_file(&tmp);

        let dashboard = screen(&app);
        assert!(dashboard.contains("klaim.txt"));
        assert!(dashboard.contains("[dashboard]"));

        app.handle_key(key(KeyCode::Char('2')));
        let table = screen(&app);
        assert!(table.contains("CMG A"));

        app.handle_key(key(KeyCode::Char('3')));
        let rules = screen(&app);
        assert!(rules.contains("Rules (2)"));
    }

    #[test]
    fn test_render_without_file_shows_placeholder() {
        let app = App::new(Session::new(), "dark", ViewMode::Dashboard, 20);
        assert!(screen(&app).contains("No claim file loaded"));
    }

    #[test]
    fn test_status_line_shows_error() {
        let mut app = App::new(Session::new(), "dark", ViewMode::Dashboard, 20);
        app.handle_key(key(KeyCode::Char('r')));
        assert!(screen(&app).contains("Reload failed"));
    }
}
