mod app;
mod cli;
mod clock;
mod components;
mod config;
mod controller;
mod countdown;
mod effects;
mod event;
mod i18n;
mod journal;
mod logging;
mod theme;
mod tui;

use std::sync::Arc;
use std::time::{Duration, Instant};

use app::{App, InputMode, Tab};
use chrono::Local;
use clap::Parser;
use cli::Cli;
use clock::{Clock, SystemTime, Tick, TICK_PERIOD};
use color_eyre::Result;
use config::Config;
use controller::{sort_by_urgency, EventList};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Input, InputEvents};
use i18n::Language;
use journal::{Event, EventStore, HttpStore, ListQuery, LocalStorage};
use ratatui::layout::{Constraint, Layout};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, trace, warn};

/// Redraw rate while particles are on screen.
const FRAME_PERIOD: Duration = Duration::from_millis(50);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = Config::load(&cli)?;
    let log_path = logging::init(&config)?;
    info!(
        api = %config.api_base_url,
        data_dir = %config.data_dir.display(),
        log = %log_path.display(),
        "starting"
    );

    let store = HttpStore::new(&config.api_base_url, config.request_timeout)?;

    if let Some(id) = &cli.show {
        let event = store.get(id).await?;
        print_events(std::slice::from_ref(&event), config.language);
        if !event.comments.is_empty() {
            println!("\n{}", event.comments);
        }
        return Ok(());
    }
    if cli.upcoming {
        let events = store.upcoming().await?;
        print_events(&events, config.language);
        return Ok(());
    }
    if let Some((start, end)) = cli.date_range() {
        let events = store.range(start, end, None, None).await?;
        print_events(&events, config.language);
        return Ok(());
    }

    let storage = LocalStorage::open(&config.data_dir).unwrap_or_else(|e| {
        warn!(error = %e, "local storage unavailable, nothing will be cached");
        LocalStorage::in_memory()
    });
    let list = EventList::new(store, storage, ListQuery::first_page(config.page_size));

    let clock = Clock::new(Arc::new(SystemTime));
    let mut ticks = clock.subscribe();
    let mut app = App::new(list, &config, clock.current().now);
    let _clock = clock.spawn(TICK_PERIOD);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app, &mut ticks).await;
    tui::restore()?;
    info!("exiting");
    result
}

async fn run<S: EventStore>(
    terminal: &mut tui::Tui,
    app: &mut App<S>,
    ticks: &mut watch::Receiver<Tick>,
) -> Result<()> {
    let mut input = InputEvents::new();
    let mut frames = time::interval(FRAME_PERIOD);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Show the loading state while the first fetch is in flight.
    terminal.draw(|frame| draw(frame, app))?;
    app.reload().await;

    while app.running {
        terminal.draw(|frame| draw(frame, app))?;

        tokio::select! {
            Ok(()) = ticks.changed() => {
                let tick = *ticks.borrow_and_update();
                trace!(seq = tick.seq, "tick");
                app.on_tick(tick.now);
            }
            _ = frames.tick(), if app.effects.is_active() => {}
            next = input.next() => match next {
                Some(Ok(Input::Key(key))) => handle_key(app, key).await,
                Some(Ok(Input::Resize)) => {}
                Some(Err(e)) => return Err(e),
                None => break,
            },
        }

        app.poll_timers(Instant::now());
    }

    Ok(())
}

async fn handle_key<S: EventStore>(app: &mut App<S>, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_input(app, key.code).await,
        InputMode::Form => handle_form_input(app, key.code).await,
        InputMode::Reactions => handle_reaction_input(app, key.code).await,
        InputMode::Comments => handle_comment_input(app, key.code).await,
        InputMode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.toggle_help();
            }
        }
    }
}

async fn handle_normal_input<S: EventStore>(app: &mut App<S>, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Esc | KeyCode::Char('x') => app.dismiss_notice(),
        KeyCode::Tab => app.switch_tab(app.tab.next()),
        KeyCode::Char('1') => app.switch_tab(Tab::Countdown),
        KeyCode::Char('2') => app.switch_tab(Tab::Journal),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Char('n') => app.open_event_form(),
        KeyCode::Enter | KeyCode::Char('e') => app.open_edit_form(),
        KeyCode::Char('d') => app.delete_selected_event().await,
        KeyCode::Char('r') => app.open_reactions(),
        KeyCode::Char('c') => app.open_comments().await,
        KeyCode::Char('R') => app.reload().await,
        KeyCode::Char('m') => app.toggle_theme(),
        KeyCode::Char('L') => app.toggle_language(),
        KeyCode::Char('h') => app.toggle_hero(),
        KeyCode::Char('?') => app.toggle_help(),
        _ => {}
    }
}

async fn handle_form_input<S: EventStore>(app: &mut App<S>, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_event_form(),
        KeyCode::Enter => app.form_enter().await,
        KeyCode::Tab | KeyCode::Down => app.form_tab(),
        KeyCode::BackTab | KeyCode::Up => app.form_backtab(),
        KeyCode::Left => app.form_chip_left(),
        KeyCode::Right => app.form_chip_right(),
        KeyCode::Backspace | KeyCode::Delete => app.form_backspace(),
        KeyCode::Char(c) => app.form_input_char(c),
        _ => {}
    }
}

async fn handle_reaction_input<S: EventStore>(app: &mut App<S>, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_reactions(),
        KeyCode::Left | KeyCode::Char('h') => app.reaction_prev(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.reaction_next(),
        KeyCode::Enter | KeyCode::Char(' ') => app.pick_reaction().await,
        _ => {}
    }
}

async fn handle_comment_input<S: EventStore>(app: &mut App<S>, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_comments(),
        KeyCode::Enter => app.submit_comment().await,
        KeyCode::Backspace => app.comment_backspace(),
        KeyCode::Char(c) => app.comment_input_char(c),
        _ => {}
    }
}

fn draw<S: EventStore>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();
    let theme = &app.theme;
    let strings = app.strings();
    frame.render_widget(Block::default().style(theme.base), area);

    let layout = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(if app.hero_visible { 2 } else { 0 }),
        Constraint::Length(if app.load_failed { 1 } else { 0 }),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(area);

    components::Header::render(frame, layout[0], &app.now, app.tab, app.language, theme);

    if app.hero_visible {
        let hero = Paragraph::new(vec![
            Line::from(Span::styled(strings.hero_title, theme.header)),
            Line::from(Span::styled(strings.hero_subtitle, theme.dim)),
        ]);
        frame.render_widget(hero, layout[1]);
    }

    if app.load_failed {
        let banner = Paragraph::new(format!(" {}  {} ", strings.load_failed, strings.retry_hint))
            .style(theme.error);
        frame.render_widget(banner, layout[2]);
    }

    components::CardList::render(
        frame,
        layout[3],
        &app.cards,
        app.selected,
        app.loading,
        app.language,
        theme,
    );

    match app.input_mode {
        InputMode::Form => {
            if let Some(form) = &app.form_state {
                components::EventForm::render(frame, area, form, strings, theme);
            }
        }
        InputMode::Reactions => {
            components::ReactionPicker::render(frame, area, app.reaction_index, strings.reactions, theme);
        }
        InputMode::Comments => {
            if let Some(panel) = &app.comments {
                components::CommentsPopup::render(frame, area, panel, strings, theme);
            }
        }
        InputMode::Help => components::HelpPopup::render(frame, area, theme),
        InputMode::Normal => {}
    }

    if let Some(effect) = app.effects.active() {
        components::EffectsOverlay::render(frame, area, effect, Instant::now());
    }

    components::StatusBar::render(frame, layout[4], app.input_mode, app.notice.as_ref(), theme);
}

/// Plain-text listing for the print modes.
fn print_events(events: &[Event], language: Language) {
    let strings = language.strings();
    for card in sort_by_urgency(events, &Local::now()) {
        let date = card
            .countdown
            .event_date
            .map(|d| language.event_date(d))
            .unwrap_or_else(|| strings.invalid_date.to_string());
        let clock = if card.countdown.is_valid() {
            card.countdown.clock_display()
        } else {
            String::new()
        };
        println!(
            "{date:<16} {:<16} {clock:>14}  {}",
            components::card_list::days_text(&card.countdown, strings),
            card.event.title
        );
    }
}
