use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use genequiz::app::{App, AppScreen, SETTINGS_COUNT};
use genequiz::catalog::Domain;
use genequiz::config::{Config, LeaderboardBackend};
use genequiz::engine::Difficulty;
use genequiz::event::{AppEvent, EventHandler};
use genequiz::logging;
use genequiz::store::{LeaderboardStore, normalize_player_name, open_store};
use genequiz::ui;
use genequiz::ui::components::dashboard::Dashboard;
use genequiz::ui::components::leaderboard_table::LeaderboardTable;
use genequiz::ui::components::progress_bar::ProgressBar;
use genequiz::ui::components::quiz_card::QuizCard;
use genequiz::ui::components::session_sidebar::{SessionSidebar, streak_pips};
use genequiz::ui::layout::{AppLayout, pack_hint_lines};

rust_i18n::i18n!("locales", fallback = "en");

#[derive(Parser)]
#[command(name = "genequiz", version, about = "Terminal flashcards for medical genetics")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Interface language (en, pt-BR)")]
    locale: Option<String>,

    #[arg(short, long, help = "Player name used on the leaderboard")]
    name: Option<String>,

    #[arg(
        short,
        long,
        value_parser = parse_domain,
        help = "Open a domain directly (classification, identification, concepts)"
    )]
    domain: Option<Domain>,

    #[arg(long, help = "Difficulty level (1-4 for classification, 1-3 otherwise)")]
    difficulty: Option<u8>,

    #[arg(
        long,
        value_name = "DOMAIN",
        value_parser = parse_domain,
        help = "Print the leaderboard for a domain and exit"
    )]
    leaderboard: Option<Domain>,

    #[arg(long, help = "Log level (error, warn, info, debug, trace)")]
    log_level: Option<String>,
}

fn parse_domain(s: &str) -> Result<Domain, String> {
    Domain::parse(s).ok_or_else(|| {
        format!("unknown domain '{s}' (expected classification, identification or concepts)")
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("warning: ignoring unreadable config: {e:#}");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if let Some(name) = cli.name {
        config.player_name = normalize_player_name(&name)?;
    }
    if let Some(level) = cli.difficulty {
        config.default_difficulty = level;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.validate();

    if let Err(e) = logging::init_logging(&config.log_level) {
        eprintln!("warning: file logging disabled: {e:#}");
    }
    rust_i18n::set_locale(&config.locale);

    if let Some(domain) = cli.leaderboard {
        return print_standings(&config, domain);
    }

    let mut app = App::new(config)?;
    if let Some(domain) = cli.domain {
        app.select_domain(domain);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));
    app.set_event_sender(events.sender());

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "event loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn print_standings(config: &Config, domain: Domain) -> Result<()> {
    let store = open_store(config)?;
    let entries = store.standings(domain)?;
    let backend = match config.leaderboard_backend {
        LeaderboardBackend::Local => "local",
        LeaderboardBackend::Remote => "remote",
    };

    println!("{} · {} ({backend})", t!("leaderboard.title"), domain.label());
    if entries.is_empty() {
        println!("{}", t!("leaderboard.empty"));
        return Ok(());
    }
    for (i, entry) in entries.iter().enumerate() {
        let status = if entry.completed {
            String::new()
        } else {
            format!(" ({})", t!("leaderboard.dnf"))
        };
        println!(
            "{:>3}. {:<20} {:>8}{status}  {} {}  {}",
            i + 1,
            entry.player_name,
            ui::format_duration(entry.elapsed_seconds),
            t!("leaderboard.level"),
            entry.difficulty,
            entry.date.format("%Y-%m-%d"),
        );
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
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
            AppEvent::Leaderboard(reply) => app.handle_leaderboard_reply(reply),
        }

        if app.should_quit {
            if let Some(session) = app.session.as_mut() {
                session.abandon(Instant::now());
            }
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

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::NameEntry => app.handle_name_key(key),
        AppScreen::DifficultySelect => handle_difficulty_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::SessionResult => handle_result_key(app, key),
        AppScreen::Leaderboard => handle_leaderboard_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            if let Some(action) = app.menu.selected_action() {
                app.handle_menu_action(action);
            }
        }
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                app.handle_menu_action(action);
            }
        }
        _ => {}
    }
}

fn handle_difficulty_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Right | KeyCode::Char('k') | KeyCode::Char('l') => {
            app.difficulty_up()
        }
        KeyCode::Down | KeyCode::Left | KeyCode::Char('j') | KeyCode::Char('h') => {
            app.difficulty_down()
        }
        KeyCode::Char(ch) if ch.is_ascii_digit() => {
            let level = ch as u8 - b'0';
            if let Some(difficulty) = Difficulty::new(app.domain, level) {
                app.difficulty = difficulty;
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.start_session(Instant::now()),
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    match key.code {
        KeyCode::Esc => app.abandon_session(now),
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.start_session(now)
        }
        KeyCode::Char(ch @ '1'..='9') => app.answer((ch as u8 - b'1') as usize, now),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev_option(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.answer_selected(now),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('s') => app.save_result(),
        KeyCode::Char('r') | KeyCode::Enter => app.start_session(Instant::now()),
        KeyCode::Char('l') => {
            let domain = app.last_result.as_ref().map_or(app.domain, |r| r.domain);
            app.go_to_leaderboard(domain);
        }
        KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        _ => {}
    }
}

fn handle_leaderboard_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => app.cycle_leaderboard_domain(true),
        KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => {
            app.cycle_leaderboard_domain(false)
        }
        KeyCode::Char('r') => app.refresh_standings(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.leave_settings(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected + 1 < SETTINGS_COUNT {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            app.settings_cycle_forward();
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.settings_cycle_backward();
        }
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
        AppScreen::NameEntry => render_name_entry(frame, app),
        AppScreen::DifficultySelect => render_difficulty(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::SessionResult => render_result(frame, app),
        AppScreen::Leaderboard => render_leaderboard(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn header_line<'a>(app: &App, info: String) -> Paragraph<'a> {
    let colors = &app.theme.colors;
    Paragraph::new(Line::from(vec![
        Span::styled(
            " genequiz ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default().fg(colors.text_muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()))
}

fn footer_hints<'a>(app: &App, hints: &[&str], width: u16) -> Paragraph<'a> {
    let colors = &app.theme.colors;
    let lines: Vec<Line> = pack_hint_lines(hints, width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_muted()))))
        .collect();
    Paragraph::new(lines)
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let info = if app.config.player_name.is_empty() {
        String::new()
    } else {
        format!("| {}", app.config.player_name)
    };
    frame.render_widget(header_line(app, info), layout[0]);

    let menu_area = ui::layout::centered_rect(50, 80, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    let hints = t!("hints.menu").to_string();
    frame.render_widget(footer_hints(app, &[hints.as_str()], area.width), layout[2]);
}

fn render_name_entry(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let popup = ui::layout::centered_rect(40, 30, area);
    let block = Block::bordered()
        .title(format!(" {} ", t!("name.title")))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(popup);
    block.render(popup, frame.buffer_mut());

    let (before, cursor, after) = app.name_input.render_parts();
    let cursor_text = cursor.map_or_else(|| " ".to_string(), |c| c.to_string());
    let mut lines = vec![
        Line::from(Span::styled(
            t!("name.prompt").to_string(),
            Style::default().fg(colors.fg()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  > ", Style::default().fg(colors.accent())),
            Span::styled(before.to_string(), Style::default().fg(colors.fg())),
            Span::styled(
                cursor_text,
                Style::default().fg(colors.bg()).bg(colors.accent()),
            ),
            Span::styled(after.to_string(), Style::default().fg(colors.fg())),
        ]),
        Line::from(""),
    ];
    if let Some(error) = &app.name_error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(colors.error()),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        t!("hints.name").to_string(),
        Style::default().fg(colors.text_muted()),
    )));

    Paragraph::new(lines).render(inner, frame.buffer_mut());
}

fn difficulty_description(domain: Domain, level: u8) -> String {
    let pool = match level {
        1 => t!("difficulty.chunk3").to_string(),
        2 => t!("difficulty.chunk6").to_string(),
        _ => t!("difficulty.all").to_string(),
    };
    if domain == Domain::Classification && level % 2 == 0 {
        format!("{pool}, {}", t!("difficulty.shuffled_labels"))
    } else {
        pool
    }
}

fn render_difficulty(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let popup = ui::layout::centered_rect(50, 50, area);
    let block = Block::bordered()
        .title(format!(" {} · {} ", app.domain.label(), t!("difficulty.title")))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(popup);
    block.render(popup, frame.buffer_mut());

    let item_count = app.catalog(app.domain).map_or(0, |c| c.len());
    let mut lines = vec![
        Line::from(Span::styled(
            t!("difficulty.items", count = item_count).to_string(),
            Style::default().fg(colors.text_muted()),
        )),
        Line::from(""),
    ];
    for level in Difficulty::MIN..=app.domain.max_difficulty() {
        let is_selected = level == app.difficulty.level();
        let indicator = if is_selected { ">" } else { " " };
        let style = if is_selected {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {indicator} [{level}] "), style),
            Span::styled(
                difficulty_description(app.domain, level),
                Style::default().fg(if is_selected {
                    colors.fg()
                } else {
                    colors.text_muted()
                }),
            ),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        t!("hints.difficulty").to_string(),
        Style::default().fg(colors.text_muted()),
    )));

    Paragraph::new(lines).render(inner, frame.buffer_mut());
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let Some(session) = app.session.as_ref() else {
        return;
    };
    let now = Instant::now();

    if let Some(remaining) = session.countdown_remaining() {
        let popup = ui::layout::centered_rect(30, 30, area);
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                t!("quiz.get_ready").to_string(),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                remaining.to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().border_style(Style::default().fg(colors.border())))
            .render(popup, frame.buffer_mut());
        return;
    }

    let app_layout = AppLayout::new(area);
    let tier = app_layout.tier;
    let state = session.state();

    let header_info = if tier.show_sidebar() {
        format!("| {} · {} {}", state.domain.label(), t!("result.difficulty"), state.difficulty)
    } else {
        let (mastered, total) = session.progress();
        format!(
            "| {} {} | {} | {mastered}/{total}",
            t!("result.difficulty"),
            state.difficulty,
            ui::format_duration(session.elapsed_secs(now) as u64),
        )
    };
    frame.render_widget(header_line(app, header_info), app_layout.header);

    let show_progress = tier.show_progress_bar(area.height);
    let mut constraints = vec![Constraint::Min(8)];
    if show_progress {
        constraints.push(Constraint::Length(3));
    }
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(app_layout.main);

    if let Some(item) = session.current_item() {
        let card = QuizCard::new(
            item,
            session.options(),
            session.catalog(),
            app.option_selected,
            app.theme,
        )
        .with_feedback(session.feedback(), app.chosen_option);
        frame.render_widget(card, main_layout[0]);
    }

    if show_progress {
        let (mastered, total) = session.progress();
        let label = format!("{} {}", t!("quiz.mastered"), streak_pips(session.streak()));
        let progress = ProgressBar::new(&label, mastered, total, app.theme);
        frame.render_widget(progress, main_layout[1]);
    }

    if let Some(sidebar_area) = app_layout.sidebar {
        frame.render_widget(SessionSidebar::new(session, now, app.theme), sidebar_area);
    }

    let hints = t!("hints.quiz").to_string();
    frame.render_widget(
        footer_hints(app, &hints.split('|').map(str::trim).collect::<Vec<_>>(), area.width),
        app_layout.footer,
    );
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    if let Some(ref result) = app.last_result {
        let centered = ui::layout::centered_rect(60, 60, area);
        let dashboard = Dashboard::new(result, &app.config.player_name, &app.save_state, app.theme);
        frame.render_widget(dashboard, centered);
    }
}

fn render_leaderboard(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let info = app
        .store_error
        .as_ref()
        .map(|e| format!("| {e}"))
        .unwrap_or_default();
    frame.render_widget(header_line(app, info), layout[0]);

    let centered = ui::layout::centered_rect(70, 90, layout[1]);
    let table = LeaderboardTable::new(app.leaderboard_domain, &app.standings, app.theme);
    frame.render_widget(table, centered);

    let hints = t!("hints.leaderboard").to_string();
    frame.render_widget(footer_hints(app, &[hints.as_str()], area.width), layout[2]);
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 80, area);

    let block = Block::bordered()
        .title(format!(" {} ", t!("settings.title")))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let backend = match app.config.leaderboard_backend {
        LeaderboardBackend::Local => t!("settings.backend_local").to_string(),
        LeaderboardBackend::Remote => t!("settings.backend_remote").to_string(),
    };
    let player = if app.config.player_name.is_empty() {
        "-".to_string()
    } else {
        app.config.player_name.clone()
    };

    let fields: [(String, String); SETTINGS_COUNT] = [
        (t!("settings.locale").to_string(), app.config.locale.clone()),
        (t!("settings.theme").to_string(), app.config.theme.clone()),
        (
            t!("settings.default_difficulty").to_string(),
            app.config.default_difficulty.to_string(),
        ),
        (
            t!("settings.countdown").to_string(),
            format!("{}s", app.config.countdown_secs),
        ),
        (t!("settings.leaderboard").to_string(), backend),
        (t!("settings.player").to_string(), player),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        t!("settings.help").to_string(),
        Style::default().fg(colors.text_muted()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_text = format!("{indicator}{label}:");
        let value_text = format!("  < {value} >");

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected { Modifier::BOLD } else { Modifier::empty() });

        let value_style = Style::default().fg(if is_selected {
            colors.streak()
        } else {
            colors.text_muted()
        });

        let lines = vec![
            Line::from(Span::styled(label_text, label_style)),
            Line::from(Span::styled(value_text, value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    if let Some(error) = &app.store_error {
        Paragraph::new(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(colors.error()),
        )))
        .render(layout[2], frame.buffer_mut());
    }

    let footer = Paragraph::new(Line::from(Span::styled(
        t!("settings.footer").to_string(),
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[3], frame.buffer_mut());
}
