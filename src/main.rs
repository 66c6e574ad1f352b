use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use verbdeck::app::{App, AppScreen, DeckState};
use verbdeck::catalog::source::{CatalogSource, DirCatalog, EmbeddedCatalog};
use verbdeck::config::Config;
use verbdeck::engine::filter::StatusFilter;
use verbdeck::event::{AppEvent, EventHandler};
use verbdeck::store::kv::{FileStore, KeyValueStore, MemoryStore};
use verbdeck::store::progress::ProgressStore;
use verbdeck::store::schema::{LanguagePair, Mark, SELECTED_PAIR_KEY};
use verbdeck::ui;
use verbdeck::ui::components::filter_bar::FilterBar;
use verbdeck::ui::components::pair_menu::PairMenu;
use verbdeck::ui::components::progress_bar::ProgressBar;
use verbdeck::ui::components::verb_card::VerbCard;
use verbdeck::ui::layout::AppLayout;
use verbdeck::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "verbdeck", version, about = "Terminal vocabulary flashcards")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short = 'n', long, help = "Cards per page")]
    page_size: Option<usize>,

    #[arg(short, long, help = "Language pair code to open (e.g. tr-en)")]
    pair: Option<String>,

    #[arg(long, help = "Directory for progress data")]
    data_dir: Option<PathBuf>,

    #[arg(long, help = "Directory of verb catalogs to use instead of the bundled ones")]
    catalog_dir: Option<PathBuf>,

    #[arg(long, help = "Keep progress in memory only")]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print progress counts without starting the interface
    Stats {
        #[arg(help = "Only this language pair")]
        code: Option<String>,
    },
    /// List the available language pairs
    Pairs,
    /// Show the effective configuration
    Config {
        #[arg(long, help = "Write it to the config file")]
        write: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Ignoring unreadable config {}: {e}", Config::config_path().display());
        Config::default()
    });
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.to_string_lossy().to_string();
    }
    if let Some(dir) = &cli.catalog_dir {
        config.catalog_dir = Some(dir.to_string_lossy().to_string());
    }
    config.validate(&Theme::available_themes());

    if let Err(e) = verbdeck::logging::init(&config, cli.ephemeral) {
        eprintln!("Logging disabled: {e}");
    }

    let kv: Arc<dyn KeyValueStore> = if cli.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(
            FileStore::with_base_dir(config.data_dir())
                .with_context(|| format!("cannot use data dir {}", config.data_dir))?,
        )
    };
    let source: Arc<dyn CatalogSource> = match config.catalog_dir() {
        Some(dir) => Arc::new(
            DirCatalog::new(&dir)
                .with_context(|| format!("cannot read catalogs from {}", dir.display()))?,
        ),
        None => Arc::new(EmbeddedCatalog::new()),
    };

    match cli.command {
        Some(Command::Stats { code }) => print_stats(kv, source.as_ref(), code.as_deref()),
        Some(Command::Pairs) => print_pairs(kv.as_ref(), source.as_ref()),
        Some(Command::Config { write }) => print_config(&config, write),
        None => run_tui(config, kv, source, cli.pair.as_deref()),
    }
}

fn print_stats(kv: Arc<dyn KeyValueStore>, source: &dyn CatalogSource, only: Option<&str>) -> Result<()> {
    let mut progress = ProgressStore::new(kv);
    progress.initialize();

    let pairs: Vec<LanguagePair> = source
        .pairs()
        .into_iter()
        .filter(|p| only.is_none_or(|code| p.code == code))
        .collect();
    if pairs.is_empty() {
        anyhow::bail!("No language pair matches {:?}", only.unwrap_or(""));
    }

    println!(
        "{:<8} {:<24} {:>7} {:>9} {:>9} {:>6}",
        "code", "pair", "learned", "practice", "pending", "total"
    );
    for pair in pairs {
        let total = match source.fetch(&pair.code) {
            Ok(verbs) => verbs.len(),
            Err(e) => {
                log::warn!("{e}");
                0
            }
        };
        let stats = progress.get_stats(&pair.code, total);
        println!(
            "{:<8} {:<24} {:>7} {:>9} {:>9} {:>6}",
            pair.code,
            pair.label(),
            stats.learned,
            stats.not_learned,
            stats.pending,
            total
        );
    }
    Ok(())
}

fn print_pairs(kv: &dyn KeyValueStore, source: &dyn CatalogSource) -> Result<()> {
    let active = kv
        .get(SELECTED_PAIR_KEY)
        .ok()
        .flatten()
        .and_then(|json| serde_json::from_str::<LanguagePair>(&json).ok())
        .unwrap_or_default();
    for pair in source.pairs() {
        let marker = if pair.code == active.code { "*" } else { " " };
        println!("{marker} {:<8} {}", pair.code, pair.label());
    }
    Ok(())
}

fn print_config(config: &Config, write: bool) -> Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    if write {
        config.save()?;
        eprintln!("Wrote {}", Config::config_path().display());
    }
    Ok(())
}

fn run_tui(
    config: Config,
    kv: Arc<dyn KeyValueStore>,
    source: Arc<dyn CatalogSource>,
    pair: Option<&str>,
) -> Result<()> {
    let theme = Theme::load(&config.theme).unwrap_or_default();
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let events = EventHandler::new(Duration::from_millis(250));
    let mut app = App::new(config, theme, kv, source, events.sender());

    if let Some(code) = pair {
        if !app.select_pair_by_code(code) {
            eprintln!("Unknown language pair {code:?}, keeping {}", app.code());
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("{err:?}");
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
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
            other => app.handle_event(other),
        }

        if app.should_quit {
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
        AppScreen::Deck => handle_deck_key(app, key),
        AppScreen::PairMenu => handle_pair_menu_key(app, key),
    }
}

fn handle_deck_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('p') => app.open_pair_menu(),
        KeyCode::Char('r') => app.reload_catalog(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => app.next_page(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => app.prev_page(),
        KeyCode::Home => app.first_page(),
        KeyCode::End => app.last_page(),
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_translation(),
        KeyCode::Char('y') => app.mark_selected(Mark::Learned),
        KeyCode::Char('n') => app.mark_selected(Mark::NotLearned),
        KeyCode::Tab => app.set_filter(app.filter.next()),
        KeyCode::BackTab => app.set_filter(app.filter.prev()),
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            app.set_filter(StatusFilter::ALL[idx]);
        }
        _ => {}
    }
}

fn handle_pair_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_pair_menu(),
        KeyCode::Down | KeyCode::Char('j') => app.pair_menu_next(),
        KeyCode::Up | KeyCode::Char('k') => app.pair_menu_prev(),
        KeyCode::Enter => app.confirm_pair_menu(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    render_deck(frame, app);

    if app.screen == AppScreen::PairMenu {
        let popup = ui::layout::centered_rect(50, 60, area);
        let menu = PairMenu::new(&app.pairs, app.pair_menu_selected, app.code(), app.theme);
        frame.render_widget(menu, popup);
    }
}

const DECK_HINTS: [&str; 8] = [
    "[j/k] Card",
    "[h/l] Page",
    "[space] Translation",
    "[y] Learned",
    "[n] Need practice",
    "[tab/1-4] Filter",
    "[p] Pair",
    "[q] Quit",
];

fn render_deck(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let hint_lines = ui::layout::pack_hint_lines(&DECK_HINTS, area.width as usize);
    let layout = AppLayout::new(area, hint_lines.len());

    let pair_label = app
        .selector
        .active_pair()
        .map(|p| p.label())
        .unwrap_or_else(|| "Select Language Pair".to_string());
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " verbdeck ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {pair_label} | {} verbs", app.catalog().len()),
            Style::default()
                .fg(colors.text_muted())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let state = app.deck_state();
    if matches!(state, DeckState::Cards | DeckState::NoMatches) {
        let stats = app.stats();
        frame.render_widget(
            ProgressBar::new(stats, app.theme).compact(layout.tier.compact_stats()),
            layout.stats,
        );
        frame.render_widget(
            FilterBar::new(app.filter, stats, app.catalog().len(), app.theme),
            layout.filters,
        );
    }

    match state {
        DeckState::Loading => render_notice(
            frame,
            app,
            layout.main,
            "Loading your vocabulary progress...",
            "",
        ),
        DeckState::NoVerbs => render_notice(
            frame,
            app,
            layout.main,
            "No verbs available",
            "Please select a different language pair.",
        ),
        DeckState::NoMatches => render_notice(
            frame,
            app,
            layout.main,
            "No verbs found",
            "Try changing your filter to see more verbs.",
        ),
        DeckState::Cards => render_cards(frame, app, &layout),
    }

    let total_pages = app.total_pages();
    if state == DeckState::Cards && total_pages > 1 {
        frame.render_widget(pagination_line(app, total_pages), layout.pagination);
    }

    let footer_lines: Vec<Line> = hint_lines
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.text_muted()))))
        .collect();
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);
}

fn render_cards(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let verbs = app.page_verbs();
    let cells = ui::layout::card_grid(layout.main, verbs.len(), layout.tier.card_columns());
    for (i, (verb, cell)) in verbs.iter().zip(cells).enumerate() {
        let card = VerbCard::new(verb, app.status_of(verb), app.theme)
            .selected(i == app.selected)
            .expanded(app.is_expanded(verb));
        frame.render_widget(card, cell);
    }
}

fn pagination_line(app: &App, total_pages: usize) -> Paragraph<'static> {
    let colors = &app.theme.colors;
    let current = app.pager.page;

    let muted = Style::default().fg(colors.text_muted());
    let mut spans = vec![Span::styled(
        if current > 1 { "‹ Previous " } else { "          " },
        muted,
    )];
    for page in 1..=total_pages {
        let style = if page == current {
            Style::default()
                .fg(colors.bg())
                .bg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        spans.push(Span::styled(format!(" {page} "), style));
    }
    spans.push(Span::styled(
        if current < total_pages { " Next ›" } else { "" },
        muted,
    ));

    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

fn render_notice(frame: &mut ratatui::Frame, app: &App, area: Rect, title: &str, detail: &str) {
    let colors = &app.theme.colors;
    let top = area.y + area.height / 3;
    let lines = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(colors.fg())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            detail.to_string(),
            Style::default().fg(colors.text_muted()),
        )),
    ];
    let notice_area = Rect::new(area.x, top, area.width, area.height.saturating_sub(top - area.y));
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        notice_area,
    );
}
