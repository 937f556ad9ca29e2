use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Instant;

use anyhow::Result;
use rust_i18n::t;

use crate::catalog::{Catalog, Domain};
use crate::config::{Config, LeaderboardBackend, SUPPORTED_LOCALES};
use crate::engine::Difficulty;
use crate::event::{AppEvent, LeaderboardReply};
use crate::session::{SessionController, SessionEvent, SessionResult, SubmitOutcome, Timing};
use crate::store::leaderboard::MAX_NAME_CHARS;
use crate::store::{
    LeaderboardEntry, LeaderboardStore, normalize_player_name, open_store, rank_entries,
};
use crate::ui::components::menu::{Menu, MenuAction};
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    NameEntry,
    DifficultySelect,
    Quiz,
    SessionResult,
    Leaderboard,
    Settings,
}

/// Whether the last result has been written to the leaderboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveState {
    NotSaved,
    Saving,
    Saved,
    Failed(String),
}

impl SaveState {
    pub fn can_save(&self) -> bool {
        matches!(self, SaveState::NotSaved | SaveState::Failed(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Standings {
    Loading,
    Loaded(Vec<LeaderboardEntry>),
    Failed(String),
}

pub const SETTINGS_COUNT: usize = 6;

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub domain: Domain,
    pub difficulty: Difficulty,
    pub session: Option<SessionController>,
    pub option_selected: usize,
    pub chosen_option: Option<usize>,
    pub last_result: Option<SessionResult>,
    pub save_state: SaveState,
    pub leaderboard_domain: Domain,
    pub standings: Standings,
    pub name_input: LineInput,
    pub name_error: Option<String>,
    pub store_error: Option<String>,
    pub settings_selected: usize,
    pub should_quit: bool,
    catalogs: HashMap<Domain, Arc<Catalog>>,
    after_name_entry: AppScreen,
    persist_config: bool,
    store: Option<Arc<dyn LeaderboardStore>>,
    events: Option<Sender<AppEvent>>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let store = match open_store(&config) {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::warn!(error = %e, "leaderboard unavailable");
                None
            }
        };
        let mut app = Self::with_store(config, store)?;
        app.persist_config = true;
        Ok(app)
    }

    /// Build the app around an already opened store (or none). Config
    /// changes made by this instance stay in memory.
    pub fn with_store(config: Config, store: Option<Arc<dyn LeaderboardStore>>) -> Result<Self> {
        rust_i18n::set_locale(&config.locale);

        let mut catalogs = HashMap::new();
        for domain in Domain::ALL {
            catalogs.insert(domain, Arc::new(Catalog::bundled(domain)?));
        }

        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let store_error = store
            .is_none()
            .then(|| t!("leaderboard.unavailable").to_string());
        let domain = Domain::Classification;

        Ok(Self {
            screen: AppScreen::Menu,
            menu: Menu::new(theme),
            theme,
            difficulty: Difficulty::clamped(domain, config.default_difficulty),
            name_input: LineInput::new(&config.player_name, MAX_NAME_CHARS),
            config,
            domain,
            session: None,
            option_selected: 0,
            chosen_option: None,
            last_result: None,
            save_state: SaveState::NotSaved,
            leaderboard_domain: domain,
            standings: Standings::Loading,
            name_error: None,
            store_error,
            settings_selected: 0,
            should_quit: false,
            catalogs,
            after_name_entry: AppScreen::Menu,
            persist_config: false,
            store,
            events: None,
        })
    }

    /// Route leaderboard work through worker threads reporting on `tx`.
    /// Without a sender the work runs inline.
    pub fn set_event_sender(&mut self, tx: Sender<AppEvent>) {
        self.events = Some(tx);
    }

    pub fn catalog(&self, domain: Domain) -> Option<&Arc<Catalog>> {
        self.catalogs.get(&domain)
    }

    pub fn handle_menu_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::Play(domain) => self.select_domain(domain),
            MenuAction::Leaderboard => self.go_to_leaderboard(self.domain),
            MenuAction::ChangeName => self.go_to_name_entry(AppScreen::Menu),
            MenuAction::Settings => self.go_to_settings(),
            MenuAction::Quit => self.should_quit = true,
        }
    }

    pub fn select_domain(&mut self, domain: Domain) {
        self.domain = domain;
        self.difficulty = Difficulty::clamped(domain, self.config.default_difficulty);
        if self.config.player_name.trim().is_empty() {
            self.go_to_name_entry(AppScreen::DifficultySelect);
        } else {
            self.screen = AppScreen::DifficultySelect;
        }
    }

    pub fn go_to_name_entry(&mut self, next: AppScreen) {
        self.name_input.set_value(&self.config.player_name);
        self.name_error = None;
        self.after_name_entry = next;
        self.screen = AppScreen::NameEntry;
    }

    pub fn handle_name_key(&mut self, key: crossterm::event::KeyEvent) {
        match self.name_input.handle(key) {
            InputResult::Continue => {}
            InputResult::Cancel => self.go_to_menu(),
            InputResult::Submit => self.submit_name(),
        }
    }

    pub fn submit_name(&mut self) {
        match normalize_player_name(self.name_input.value()) {
            Ok(name) => {
                tracing::debug!("player name updated");
                self.config.player_name = name;
                self.save_config();
                self.name_error = None;
                self.screen = self.after_name_entry;
            }
            Err(_) => {
                self.name_error = Some(t!("name.empty").to_string());
            }
        }
    }

    pub fn difficulty_up(&mut self) {
        self.difficulty = self.difficulty.next(self.domain);
    }

    pub fn difficulty_down(&mut self) {
        self.difficulty = self.difficulty.prev(self.domain);
    }

    /// Start a fresh session for the selected domain and difficulty. An
    /// existing controller for the same domain is restarted so that its
    /// pending timers are invalidated.
    pub fn start_session(&mut self, now: Instant) {
        let Some(catalog) = self.catalogs.get(&self.domain).cloned() else {
            return;
        };
        let timing = Timing::from_config(&self.config);
        match self.session.as_mut() {
            Some(session) if session.catalog().domain() == self.domain => {
                session.set_timing(timing);
            }
            _ => {
                self.session = Some(SessionController::new(catalog, self.difficulty, timing));
            }
        }

        self.option_selected = 0;
        self.chosen_option = None;
        self.last_result = None;
        self.save_state = SaveState::NotSaved;
        self.screen = AppScreen::Quiz;

        let events = match self.session.as_mut() {
            Some(session) => session.start(self.difficulty, now),
            None => Vec::new(),
        };
        self.apply_session_events(events);
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.option_selected = (self.option_selected + 1) % count;
        }
    }

    pub fn select_prev_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.option_selected = (self.option_selected + count - 1) % count;
        }
    }

    fn option_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.options().len())
    }

    pub fn answer_selected(&mut self, now: Instant) {
        self.answer(self.option_selected, now);
    }

    pub fn answer(&mut self, index: usize, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(choice) = session.options().get(index).cloned() else {
            return;
        };
        if let SubmitOutcome::Answered(_) = session.submit(&choice, now) {
            self.chosen_option = Some(index);
            self.option_selected = index;
        }
    }

    pub fn tick(&mut self, now: Instant) {
        let events = match self.session.as_mut() {
            Some(session) => session.tick(now),
            None => return,
        };
        self.apply_session_events(events);
    }

    fn apply_session_events(&mut self, events: Vec<SessionEvent>) {
        for event in events {
            match event {
                SessionEvent::CountdownTick { .. } | SessionEvent::Started => {}
                SessionEvent::Advanced(_) => {
                    self.option_selected = 0;
                    self.chosen_option = None;
                }
                SessionEvent::Completed(result) => {
                    self.last_result = Some(result);
                    self.save_state = SaveState::NotSaved;
                    self.screen = AppScreen::SessionResult;
                }
            }
        }
    }

    /// Leave the running session. A session in play yields a partial result.
    pub fn abandon_session(&mut self, now: Instant) {
        let result = self.session.as_mut().and_then(|s| s.abandon(now));
        match result {
            Some(result) => {
                self.last_result = Some(result);
                self.save_state = SaveState::NotSaved;
                self.screen = AppScreen::SessionResult;
            }
            None => self.go_to_menu(),
        }
    }

    pub fn save_result(&mut self) {
        if !self.save_state.can_save() {
            return;
        }
        let Some(result) = self.last_result.as_ref() else {
            return;
        };
        let name = match normalize_player_name(&self.config.player_name) {
            Ok(name) => name,
            Err(e) => {
                self.save_state = SaveState::Failed(e.to_string());
                return;
            }
        };
        let Some(store) = self.store.clone() else {
            self.save_state = SaveState::Failed(t!("leaderboard.unavailable").to_string());
            return;
        };

        let entry = LeaderboardEntry::from_result(name, result);
        self.save_state = SaveState::Saving;
        self.run_leaderboard_task(move || LeaderboardReply::Saved(store.append(&entry)));
    }

    pub fn go_to_leaderboard(&mut self, domain: Domain) {
        self.leaderboard_domain = domain;
        self.screen = AppScreen::Leaderboard;
        self.refresh_standings();
    }

    pub fn cycle_leaderboard_domain(&mut self, forward: bool) {
        let idx = Domain::ALL
            .iter()
            .position(|d| *d == self.leaderboard_domain)
            .unwrap_or(0);
        let len = Domain::ALL.len();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        self.go_to_leaderboard(Domain::ALL[next]);
    }

    pub fn refresh_standings(&mut self) {
        let domain = self.leaderboard_domain;
        let Some(store) = self.store.clone() else {
            self.standings = Standings::Failed(t!("leaderboard.unavailable").to_string());
            return;
        };
        self.standings = Standings::Loading;
        self.run_leaderboard_task(move || LeaderboardReply::Loaded {
            domain,
            result: store.query(domain),
        });
    }

    fn run_leaderboard_task<F>(&mut self, task: F)
    where
        F: FnOnce() -> LeaderboardReply + Send + 'static,
    {
        match self.events.clone() {
            Some(tx) => {
                thread::spawn(move || {
                    let _ = tx.send(AppEvent::Leaderboard(task()));
                });
            }
            None => self.handle_leaderboard_reply(task()),
        }
    }

    pub fn handle_leaderboard_reply(&mut self, reply: LeaderboardReply) {
        match reply {
            LeaderboardReply::Saved(Ok(())) => {
                self.save_state = SaveState::Saved;
                if self.screen == AppScreen::Leaderboard {
                    self.refresh_standings();
                }
            }
            LeaderboardReply::Saved(Err(e)) => {
                tracing::warn!(error = %e, "saving leaderboard entry failed");
                self.save_state = SaveState::Failed(e.to_string());
            }
            LeaderboardReply::Loaded { domain, result } => {
                if domain != self.leaderboard_domain {
                    return;
                }
                self.standings = match result {
                    Ok(mut entries) => {
                        rank_entries(&mut entries);
                        Standings::Loaded(entries)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, domain = %domain, "loading leaderboard failed");
                        Standings::Failed(e.to_string())
                    }
                };
            }
        }
    }

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn leave_settings(&mut self) {
        self.config.validate();
        self.save_config();
        self.go_to_menu();
    }

    fn save_config(&self) {
        if !self.persist_config {
            return;
        }
        if let Err(e) = self.config.save() {
            tracing::warn!(error = %e, "saving config failed");
        }
    }

    pub fn settings_cycle_forward(&mut self) {
        self.settings_cycle(true);
    }

    pub fn settings_cycle_backward(&mut self) {
        self.settings_cycle(false);
    }

    fn settings_cycle(&mut self, forward: bool) {
        match self.settings_selected {
            0 => {
                if let Some(locale) =
                    cycle_value(&SUPPORTED_LOCALES, &self.config.locale.as_str(), forward)
                {
                    self.config.locale = locale.to_string();
                }
                rust_i18n::set_locale(&self.config.locale);
                self.menu.refresh_labels();
            }
            1 => {
                let themes = Theme::available_themes();
                if let Some(next) = cycle_value(&themes, &self.config.theme, forward) {
                    self.config.theme = next.clone();
                }
                if let Some(new_theme) = Theme::load(&self.config.theme) {
                    let theme: &'static Theme = Box::leak(Box::new(new_theme));
                    self.theme = theme;
                    self.menu.theme = theme;
                }
            }
            2 => {
                let max = Domain::Classification.max_difficulty();
                let level = self.config.default_difficulty;
                self.config.default_difficulty = if forward {
                    (level % max) + 1
                } else if level <= 1 {
                    max
                } else {
                    level - 1
                };
            }
            3 => {
                self.config.countdown_secs = if forward {
                    (self.config.countdown_secs + 1).min(10)
                } else {
                    self.config.countdown_secs.saturating_sub(1)
                };
            }
            4 => {
                self.config.leaderboard_backend = match self.config.leaderboard_backend {
                    LeaderboardBackend::Local => LeaderboardBackend::Remote,
                    LeaderboardBackend::Remote => LeaderboardBackend::Local,
                };
                self.reopen_store();
            }
            5 => {
                self.go_to_name_entry(AppScreen::Settings);
            }
            _ => {}
        }
    }

    fn reopen_store(&mut self) {
        match open_store(&self.config) {
            Ok(store) => {
                self.store = Some(store);
                self.store_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "leaderboard unavailable");
                self.store = None;
                self.store_error = Some(e.to_string());
            }
        }
    }
}

/// Next (or previous) value after `current`, wrapping. Unknown values map
/// to the first entry.
fn cycle_value<'a, T: PartialEq>(values: &'a [T], current: &T, forward: bool) -> Option<&'a T> {
    if values.is_empty() {
        return None;
    }
    let len = values.len();
    let next = match values.iter().position(|v| v == current) {
        Some(idx) if forward => (idx + 1) % len,
        Some(idx) => (idx + len - 1) % len,
        None => 0,
    };
    values.get(next)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    use super::*;
    use crate::session::Phase;
    use crate::store::JsonStore;

    fn make_app(name: &str) -> (TempDir, App) {
        let dir = TempDir::new().unwrap();
        let store: Arc<dyn LeaderboardStore> =
            Arc::new(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap());
        let config = Config {
            player_name: name.to_string(),
            countdown_secs: 0,
            locale: "en".to_string(),
            ..Config::default()
        };
        (dir, App::with_store(config, Some(store)).unwrap())
    }

    fn answer_correctly(app: &mut App, now: Instant) {
        let session = app.session.as_ref().unwrap();
        let item = session.current_item().unwrap().clone();
        let index = session
            .options()
            .iter()
            .position(|c| c.answers(&item) == Some(true))
            .unwrap();
        app.answer(index, now);
    }

    #[test]
    fn test_select_domain_without_name_asks_for_it() {
        let (_dir, mut app) = make_app("");
        app.select_domain(Domain::Concepts);
        assert_eq!(app.screen, AppScreen::NameEntry);

        for ch in "  Ana ".chars() {
            app.handle_name_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
        app.handle_name_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.config.player_name, "Ana");
        assert_eq!(app.screen, AppScreen::DifficultySelect);
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let (_dir, mut app) = make_app("");
        app.select_domain(Domain::Concepts);
        app.submit_name();
        assert_eq!(app.screen, AppScreen::NameEntry);
        assert!(app.name_error.is_some());
    }

    #[test]
    fn test_difficulty_clamped_per_domain() {
        let (_dir, mut app) = make_app("Ana");
        app.select_domain(Domain::Identification);
        for _ in 0..5 {
            app.difficulty_up();
        }
        assert_eq!(app.difficulty.level(), 3);
        app.select_domain(Domain::Classification);
        app.difficulty = Difficulty::clamped(Domain::Classification, 3);
        app.difficulty_up();
        assert_eq!(app.difficulty.level(), 4);
    }

    #[test]
    fn test_full_session_then_save_and_view() {
        let (_dir, mut app) = make_app("Ana");
        app.select_domain(Domain::Classification);
        app.difficulty = Difficulty::clamped(Domain::Classification, 3);
        let mut now = Instant::now();
        app.start_session(now);
        assert_eq!(app.screen, AppScreen::Quiz);
        assert_eq!(app.session.as_ref().unwrap().phase(), Phase::Active);

        let total = app.session.as_ref().unwrap().catalog().len();
        for _ in 0..total * 3 {
            answer_correctly(&mut app, now);
            now += Duration::from_secs(1);
            app.tick(now);
        }
        assert_eq!(app.screen, AppScreen::SessionResult);
        let result = app.last_result.clone().unwrap();
        assert!(result.completed);

        app.save_result();
        assert_eq!(app.save_state, SaveState::Saved);
        // A saved result cannot be saved twice.
        app.save_result();
        assert_eq!(app.save_state, SaveState::Saved);

        app.go_to_leaderboard(Domain::Classification);
        let Standings::Loaded(entries) = &app.standings else {
            panic!("standings should load inline");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].player_name, "Ana");
        assert!(entries[0].completed);
    }

    #[test]
    fn test_abandon_shows_partial_result() {
        let (_dir, mut app) = make_app("Ana");
        app.select_domain(Domain::Concepts);
        let now = Instant::now();
        app.start_session(now);
        answer_correctly(&mut app, now);
        app.abandon_session(now + Duration::from_secs(5));

        assert_eq!(app.screen, AppScreen::SessionResult);
        let result = app.last_result.as_ref().unwrap();
        assert!(!result.completed);
        assert_eq!(result.attempts, 1);
    }

    #[test]
    fn test_double_answer_keeps_first_choice() {
        let (_dir, mut app) = make_app("Ana");
        app.select_domain(Domain::Identification);
        let now = Instant::now();
        app.start_session(now);
        app.answer(0, now);
        app.answer(1, now);
        assert_eq!(app.chosen_option, Some(0));
        assert_eq!(app.session.as_ref().unwrap().state().attempts, 1);
    }

    #[test]
    fn test_save_failure_is_retryable() {
        let config = Config {
            player_name: "Ana".to_string(),
            countdown_secs: 0,
            ..Config::default()
        };
        let mut app = App::with_store(config, None).unwrap();
        app.select_domain(Domain::Concepts);
        let now = Instant::now();
        app.start_session(now);
        app.abandon_session(now);

        app.save_result();
        assert!(matches!(app.save_state, SaveState::Failed(_)));
        assert!(app.save_state.can_save());
    }

    #[test]
    fn test_cycle_value_wraps() {
        let values = ["a", "b", "c"];
        assert_eq!(cycle_value(&values, &"c", true), Some(&"a"));
        assert_eq!(cycle_value(&values, &"a", false), Some(&"c"));
        assert_eq!(cycle_value(&values, &"z", true), Some(&"a"));
    }
}
