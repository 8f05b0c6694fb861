use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::Config;
use crate::cube::{CubePattern, apply_move, facelets_to_pattern};
use crate::notation::token::MoveToken;
use crate::session::algorithm::Algorithm;
use crate::session::scheduler::DrillQueue;
use crate::session::session::{SessionOutcome, TrainingSession};
use crate::session::timer::TimerState;
use crate::store::json_store::JsonStore;
use crate::store::schema::{LibraryData, TimingData};
use crate::transport::CubeEvent;
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Library,
    Drill,
    Stats,
    Settings,
}

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub store: Option<JsonStore>,
    pub library: LibraryData,
    pub timing: TimingData,
    pub selected_keys: HashSet<String>,
    pub queue: DrillQueue,
    pub session: Option<TrainingSession>,
    pub live_state: CubePattern,
    pub cube_connected: bool,
    pub battery: Option<u8>,
    pub hardware: Option<String>,
    pub library_cursor: usize,
    pub settings_cursor: usize,
    pub stats_cursor: usize,
    pub entry_buffer: Option<String>,
    pub status_line: Option<String>,
    pub should_quit: bool,
    rng: SmallRng,
}

impl App {
    pub fn new(theme_override: Option<&str>, store: Option<JsonStore>) -> Self {
        let mut config = Config::load().unwrap_or_default();
        if let Some(name) = theme_override {
            config.theme = name.to_string();
        }
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let menu = Menu::new(theme, false);

        let (library, timing) = match &store {
            Some(s) => (s.load_library(), s.load_timing()),
            None => (LibraryData::starter(), TimingData::default()),
        };

        Self {
            screen: AppScreen::Menu,
            menu,
            theme,
            config,
            store,
            library,
            timing,
            selected_keys: HashSet::new(),
            queue: DrillQueue::new(),
            session: None,
            live_state: CubePattern::solved(),
            cube_connected: false,
            battery: None,
            hardware: None,
            library_cursor: 0,
            settings_cursor: 0,
            stats_cursor: 0,
            entry_buffer: None,
            status_line: None,
            should_quit: false,
            rng: SmallRng::from_entropy(),
        }
    }

    // ---- cube events ------------------------------------------------

    pub fn handle_cube_event(&mut self, event: CubeEvent) {
        match event {
            CubeEvent::Facelets(snapshot) => match facelets_to_pattern(&snapshot) {
                Ok(pattern) => {
                    self.live_state = pattern;
                    self.cube_connected = true;
                    self.menu.cube_connected = true;
                    // A fresh physical state invalidates in-flight matching.
                    if let Some(session) = &mut self.session {
                        session.restart(self.live_state.clone());
                    }
                }
                Err(err) => {
                    self.status_line = Some(format!("bad cube snapshot: {err}"));
                }
            },
            CubeEvent::Move {
                token,
                timestamp_ms,
            } => {
                self.live_state = apply_move(&self.live_state, token);
                self.cube_connected = true;
                self.menu.cube_connected = true;
                if self.screen == AppScreen::Drill {
                    self.track_move(token, Some(timestamp_ms));
                }
            }
            // Orientation frames stream constantly on real hardware and
            // carry nothing the matcher needs.
            CubeEvent::Gyro => {}
            CubeEvent::Hardware(name) => {
                self.hardware = Some(name);
            }
            CubeEvent::Battery(level) => {
                self.battery = Some(level);
            }
            CubeEvent::Disconnect => {
                self.cube_connected = false;
                self.menu.cube_connected = false;
                self.battery = None;
                self.hardware = None;
            }
        }
    }

    fn track_move(&mut self, token: MoveToken, timestamp_ms: Option<f64>) {
        let Some(session) = &mut self.session else {
            return;
        };
        match session.handle_move(token, timestamp_ms) {
            SessionOutcome::InProgress => {}
            SessionOutcome::Mistake => {
                let key = session.algorithm().stats_key();
                self.timing.record_mut(&key).record_failure();
                self.queue.record_failure(self.config.queue_options());
            }
            SessionOutcome::Completed { elapsed_ms } => {
                self.finish_drill(elapsed_ms);
            }
        }
    }

    /// Keyboard fallback: with no cube connected, space arms, starts and
    /// stops the timer manually, and a stop counts as a completion.
    pub fn manual_space(&mut self) {
        if self.cube_connected {
            return;
        }
        let Some(session) = &mut self.session else {
            return;
        };
        match session.timer().state() {
            TimerState::Running => {
                let elapsed_ms = session.stop_timer();
                self.finish_drill(elapsed_ms);
            }
            _ => session.start_timer(),
        }
    }

    fn finish_drill(&mut self, elapsed_ms: u64) {
        let Some(session) = &self.session else {
            return;
        };
        let key = session.algorithm().stats_key();
        self.timing.record_mut(&key).record_time(elapsed_ms);
        // Seed the next drill from where the cube physically ended up.
        if self.cube_connected {
            // live_state already tracks every move.
        } else if let Some(final_state) = session.final_state() {
            self.live_state = final_state;
        }
        self.queue.complete(
            self.config.queue_options(),
            &self.timing.best_times(),
            &mut self.rng,
        );
        self.save_data();
        self.start_drill();
    }

    // ---- drill lifecycle --------------------------------------------

    pub fn rebuild_queue(&mut self) {
        self.queue = DrillQueue::new();
        let opts = self.config.queue_options();
        let best = self.timing.best_times();
        for alg in &self.library.algorithms {
            if self.selected_keys.contains(&alg.stats_key()) {
                self.queue.select(alg.clone(), opts, &best);
            }
        }
    }

    /// Enter the drill screen on the queue head. Does nothing when no
    /// algorithm is selected.
    pub fn start_drill(&mut self) {
        if self.queue.is_empty() {
            self.rebuild_queue();
        }
        let Some(head) = self.queue.head().cloned() else {
            self.status_line = Some("select algorithms in the library first".to_string());
            self.screen = AppScreen::Library;
            return;
        };
        self.session = Some(TrainingSession::new(
            head,
            self.live_state.clone(),
            self.config.random_auf,
            &mut self.rng,
        ));
        self.screen = AppScreen::Drill;
    }

    pub fn restart_drill(&mut self) {
        if let Some(session) = &mut self.session {
            session.restart(self.live_state.clone());
        }
    }

    pub fn leave_drill(&mut self) {
        self.session = None;
        self.screen = AppScreen::Menu;
    }

    // ---- library ----------------------------------------------------

    pub fn library_up(&mut self) {
        if self.library_cursor > 0 {
            self.library_cursor -= 1;
        }
    }

    pub fn library_down(&mut self) {
        if self.library_cursor + 1 < self.library.algorithms.len() {
            self.library_cursor += 1;
        }
    }

    pub fn library_toggle_current(&mut self) {
        let Some(alg) = self.library.algorithms.get(self.library_cursor) else {
            return;
        };
        let key = alg.stats_key();
        let opts = self.config.queue_options();
        if self.selected_keys.remove(&key) {
            self.queue.deselect(&key);
        } else {
            self.selected_keys.insert(key);
            self.queue
                .select(alg.clone(), opts, &self.timing.best_times());
        }
    }

    pub fn library_delete_current(&mut self) {
        if self.library_cursor >= self.library.algorithms.len() {
            return;
        }
        let removed = self.library.algorithms.remove(self.library_cursor);
        let key = removed.stats_key();
        self.selected_keys.remove(&key);
        self.queue.deselect(&key);
        if self.library_cursor >= self.library.algorithms.len() {
            self.library_cursor = self.library.algorithms.len().saturating_sub(1);
        }
        self.save_data();
    }

    // ---- free-text entry --------------------------------------------

    pub fn entry_open(&mut self) {
        self.entry_buffer = Some(String::new());
    }

    pub fn entry_char(&mut self, ch: char) {
        if let Some(buffer) = &mut self.entry_buffer {
            buffer.push(ch);
        }
    }

    pub fn entry_backspace(&mut self) {
        if let Some(buffer) = &mut self.entry_buffer {
            buffer.pop();
        }
    }

    pub fn entry_cancel(&mut self) {
        self.entry_buffer = None;
    }

    /// Commit a new library entry. Input is `name: moves` or bare moves
    /// (then the normalized text doubles as the name). Illegal characters
    /// are stripped rather than rejected; a line that normalizes to
    /// nothing is discarded.
    pub fn entry_commit(&mut self) {
        let Some(buffer) = self.entry_buffer.take() else {
            return;
        };
        let (name, moves_text) = match buffer.split_once(':') {
            Some((name, rest)) => (name.trim().to_string(), rest.to_string()),
            None => (String::new(), buffer),
        };
        match Algorithm::from_input(&name, "Custom", &moves_text) {
            Ok(Some(mut alg)) => {
                if alg.name.is_empty() {
                    alg.name = alg.display.clone();
                }
                self.library.algorithms.push(alg);
                self.library_cursor = self.library.algorithms.len() - 1;
                self.save_data();
            }
            Ok(None) => {
                self.status_line = Some("no algorithm entered".to_string());
            }
            Err(err) => {
                self.status_line = Some(format!("could not parse: {err}"));
            }
        }
    }

    // ---- settings ---------------------------------------------------

    pub fn settings_up(&mut self) {
        if self.settings_cursor > 0 {
            self.settings_cursor -= 1;
        }
    }

    pub fn settings_down(&mut self) {
        if self.settings_cursor < 3 {
            self.settings_cursor += 1;
        }
    }

    pub fn settings_toggle_current(&mut self) {
        match self.settings_cursor {
            0 => self.config.toggle_randomize_order(),
            1 => self.config.toggle_prioritize_failed(),
            2 => self.config.toggle_prioritize_slow(),
            _ => self.config.toggle_random_auf(),
        }
        let _ = self.config.save();
    }

    pub fn cycle_theme(&mut self) {
        let themes = Theme::available_themes();
        let idx = themes
            .iter()
            .position(|t| *t == self.config.theme)
            .unwrap_or(0);
        self.config.theme = themes[(idx + 1) % themes.len()].clone();
        if let Some(new_theme) = Theme::load(&self.config.theme) {
            let theme: &'static Theme = Box::leak(Box::new(new_theme));
            self.theme = theme;
            self.menu.theme = theme;
        }
        let _ = self.config.save();
    }

    // ---- persistence ------------------------------------------------

    pub fn save_data(&self) {
        if let Some(store) = &self.store {
            let _ = store.save_library(&self.library);
            let _ = store.save_timing(&self.timing);
        }
    }
}
