mod app;
mod config;
mod cube;
mod engine;
mod event;
mod notation;
mod session;
mod store;
mod transport;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use store::json_store::JsonStore;
use store::schema::ExportData;
use transport::ReplayTransport;
use ui::components::alg_display::AlgDisplay;
use ui::components::library_list::LibraryList;
use ui::components::settings::SettingsPanel;
use ui::components::stats_dashboard::StatsDashboard;
use ui::components::times_panel::TimesPanel;
use ui::layout::AppLayout;

#[derive(Parser)]
#[command(name = "cubedex", version, about = "Terminal trainer for smart-cube algorithms")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, value_name = "FILE", help = "Replay a recorded cube trace")]
    replay: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Load an algorithm library JSON before starting")]
    library: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Export library and times to a JSON file and exit")]
    export: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Import a previously exported JSON file and exit")]
    import: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.export {
        let store = JsonStore::new().context("could not open the data directory")?;
        let config = config::Config::load().unwrap_or_default();
        let data = store.export_all(&config);
        fs::write(path, serde_json::to_string_pretty(&data)?)
            .with_context(|| format!("writing export to {}", path.display()))?;
        println!("exported to {}", path.display());
        return Ok(());
    }
    if let Some(path) = &cli.import {
        let store = JsonStore::new().context("could not open the data directory")?;
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading import from {}", path.display()))?;
        let data: ExportData = serde_json::from_str(&content)
            .with_context(|| format!("parsing import from {}", path.display()))?;
        store.import_all(&data)?;
        println!("imported from {}", path.display());
        return Ok(());
    }

    let store = JsonStore::new().ok();
    if let Some(store) = &store {
        if store.check_interrupted_import() {
            eprintln!("warning: cleaned up leftovers from an interrupted import");
        }
    }

    let mut app = App::new(cli.theme.as_deref(), store);

    if let Some(path) = &cli.library {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading library from {}", path.display()))?;
        let mut library: store::schema::LibraryData = serde_json::from_str(&content)
            .with_context(|| format!("parsing library from {}", path.display()))?;
        library.rehydrate();
        app.library = library;
        app.save_data();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(app.config.tick_rate_ms));

    if let Some(path) = &cli.replay {
        match ReplayTransport::from_path(path) {
            Ok(transport) => transport.spawn(events.cube_sender()),
            Err(err) => app.status_line = Some(format!("replay failed: {err}")),
        }
    }

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Cube(cube_event) => app.handle_cube_event(cube_event),
            AppEvent::Tick => {}
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            app.save_data();
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    app.status_line = None;

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Library => handle_library_key(app, key),
        AppScreen::Drill => handle_drill_key(app, key),
        AppScreen::Stats => handle_stats_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.start_drill(),
        KeyCode::Char('2') => app.screen = AppScreen::Library,
        KeyCode::Char('s') => app.screen = AppScreen::Stats,
        KeyCode::Char('c') => app.screen = AppScreen::Settings,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => match app.menu.selected {
            0 => app.start_drill(),
            1 => app.screen = AppScreen::Library,
            2 => app.screen = AppScreen::Stats,
            _ => app.screen = AppScreen::Settings,
        },
        _ => {}
    }
}

fn handle_library_key(app: &mut App, key: KeyEvent) {
    // Free-text entry captures everything until commit or cancel.
    if app.entry_buffer.is_some() {
        match key.code {
            KeyCode::Enter => app.entry_commit(),
            KeyCode::Esc => app.entry_cancel(),
            KeyCode::Backspace => app.entry_backspace(),
            KeyCode::Char(ch) => app.entry_char(ch),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.screen = AppScreen::Menu,
        KeyCode::Up | KeyCode::Char('k') => app.library_up(),
        KeyCode::Down | KeyCode::Char('j') => app.library_down(),
        KeyCode::Char(' ') => app.library_toggle_current(),
        KeyCode::Enter => app.start_drill(),
        KeyCode::Char('a') => app.entry_open(),
        KeyCode::Char('d') | KeyCode::Delete => app.library_delete_current(),
        _ => {}
    }
}

fn handle_drill_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.leave_drill(),
        KeyCode::Char(' ') => app.manual_space(),
        KeyCode::Char('r') => app.restart_drill(),
        _ => {}
    }
}

fn handle_stats_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.screen = AppScreen::Menu,
        KeyCode::Up | KeyCode::Char('k') => {
            app.stats_cursor = app.stats_cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.stats_cursor + 1 < app.library.algorithms.len() {
                app.stats_cursor += 1;
            }
        }
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.screen = AppScreen::Menu,
        KeyCode::Up | KeyCode::Char('k') => app.settings_up(),
        KeyCode::Down | KeyCode::Char('j') => app.settings_down(),
        KeyCode::Char(' ') | KeyCode::Enter => app.settings_toggle_current(),
        KeyCode::Char('t') => app.cycle_theme(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Library => render_library(frame, app),
        AppScreen::Drill => render_drill(frame, app),
        AppScreen::Stats => render_stats(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, title: &str) {
    let colors = &app.theme.colors;
    let name = app.hardware.as_deref().unwrap_or("cube");
    let status = match (app.cube_connected, app.battery) {
        (true, Some(level)) => format!(" | {name} {level}%"),
        (true, None) => format!(" | {name} connected"),
        (false, _) => " | no cube".to_string(),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" cubedex {title} "),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            status,
            Style::default()
                .fg(colors.move_neutral())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, keys: &str) {
    let colors = &app.theme.colors;
    let line = match &app.status_line {
        Some(status) => Line::from(Span::styled(
            format!(" {status} "),
            Style::default().fg(colors.warning()),
        )),
        None => Line::from(Span::styled(
            keys.to_string(),
            Style::default().fg(colors.move_neutral()),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);

    render_header(frame, app, layout.header, "");

    let menu_area = ui::layout::centered_rect(50, 80, layout.main);
    frame.render_widget(&app.menu, menu_area);

    render_footer(frame, app, layout.footer, " [1] Drill  [2] Library  [s] Stats  [q] Quit ");
}

fn render_library(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);

    render_header(frame, app, layout.header, "library");

    let list = LibraryList {
        algorithms: &app.library.algorithms,
        selected_keys: &app.selected_keys,
        cursor: app.library_cursor,
        theme: app.theme,
    };
    frame.render_widget(&list, layout.main);

    if let Some(sidebar) = layout.sidebar {
        let record = app
            .library
            .algorithms
            .get(app.library_cursor)
            .and_then(|alg| app.timing.records.get(&alg.stats_key()));
        let panel = TimesPanel {
            record,
            theme: app.theme,
        };
        frame.render_widget(&panel, sidebar);
    }

    match &app.entry_buffer {
        Some(buffer) => {
            let colors = &app.theme.colors;
            let line = Line::from(vec![
                Span::styled(" add: ", Style::default().fg(colors.accent())),
                Span::styled(buffer.clone(), Style::default().fg(colors.fg())),
                Span::styled("_", Style::default().fg(colors.accent())),
            ]);
            frame.render_widget(Paragraph::new(line), layout.footer);
        }
        None => render_footer(
            frame,
            app,
            layout.footer,
            " [space] Select  [enter] Drill  [a] Add  [d] Delete  [esc] Back ",
        ),
    }
}

fn render_drill(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);

    render_header(frame, app, layout.header, "drill");

    if let Some(session) = &app.session {
        let snapshot = session.snapshot();
        let display = AlgDisplay {
            name: &session.algorithm().name,
            category: &session.algorithm().category,
            moves: session.drilled_moves(),
            snapshot: &snapshot,
            timer_state: session.timer().state(),
            elapsed_ms: session.timer().elapsed_ms(),
            theme: app.theme,
        };
        frame.render_widget(&display, layout.main);

        if let Some(sidebar) = layout.sidebar {
            let record = app.timing.records.get(&session.algorithm().stats_key());
            let panel = TimesPanel {
                record,
                theme: app.theme,
            };
            frame.render_widget(&panel, sidebar);
        }
    }

    let keys = if app.cube_connected {
        " [r] Restart  [esc] Back "
    } else {
        " [space] Start/stop timer  [r] Restart  [esc] Back "
    };
    render_footer(frame, app, layout.footer, keys);
}

fn render_stats(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);

    render_header(frame, app, layout.header, "statistics");

    let dashboard = StatsDashboard {
        algorithms: &app.library.algorithms,
        timing: &app.timing,
        selected: app.stats_cursor,
        theme: app.theme,
    };
    frame.render_widget(&dashboard, layout.main);

    if let Some(sidebar) = layout.sidebar {
        let record = app
            .library
            .algorithms
            .get(app.stats_cursor)
            .and_then(|alg| app.timing.records.get(&alg.stats_key()));
        let panel = TimesPanel {
            record,
            theme: app.theme,
        };
        frame.render_widget(&panel, sidebar);
    }

    render_footer(frame, app, layout.footer, " [↑/↓] Select case  [esc] Back ");
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area);

    render_header(frame, app, layout.header, "settings");

    let centered = ui::layout::centered_rect(60, 80, layout.main);
    let panel = SettingsPanel {
        config: &app.config,
        cursor: app.settings_cursor,
        theme: app.theme,
    };
    frame.render_widget(&panel, centered);

    render_footer(frame, app, layout.footer, " [space] Toggle  [t] Theme  [esc] Back ");
}
