use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use cepcheck_core::{AppConfig, LookupController, ServicePolicy, ViaCepClient};
use cepcheck_tui::{
    app::{App, Focus},
    event::{AppEvent, EventHandler},
    form::{ChannelView, FormUpdate},
    input::{handle_key_event, Action},
    keymap::Keymap,
    page::Page,
    scroll::{AnchorJump, ScrollConfigExt},
    widgets::{CepFormWidget, NavBarWidget, PageViewWidget, ResultWidget, StatusBarWidget},
};

type Controller = Arc<LookupController<ViaCepClient>>;

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Create keymap from config
    let keymap = Keymap::from_config(&config.keymap);
    let page = load_page(&config)?;

    let client = ViaCepClient::new(&config)?;
    let controller: Controller = Arc::new(LookupController::new(
        client,
        ServicePolicy::from_config(&config.service),
    ));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste, SetTitle("cepcheck"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.clone(), page);
    let result = event_loop(&mut terminal, &mut app, &keymap, &controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    keymap: &Keymap,
    controller: &Controller,
) -> Result<()> {
    // Faster polling while the page view animates
    let event_handler = EventHandler::with_animation_tick(
        app.config.ui.tick_rate_ms,
        app.config.ui.scroll.animation_tick_duration(),
    );

    // Lookups run on their own tasks and report back through this channel
    let (form_tx, mut form_rx) = mpsc::unbounded_channel::<FormUpdate>();

    // Checked at the end of each iteration to pick the next poll interval
    let mut needs_fast_update = false;

    loop {
        while let Ok(update) = form_rx.try_recv() {
            app.apply_form_update(update);
        }

        app.update_scroll_animation();

        terminal.draw(|frame| draw(frame, &mut *app))?;

        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app, keymap);
                    handle_action(app, action, controller, &form_tx);
                }
                AppEvent::Paste(text) => app.paste(&text),
                AppEvent::Resize(_, _) => {
                    // Scroll bounds are recomputed on the next draw
                }
                AppEvent::Tick => {
                    app.tick_spinner();
                }
            }
        }

        needs_fast_update = app.needs_scroll_update();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let result_height = ResultWidget::height(app, size.width);

    // Nav bar, page, form, result (when shown), status bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(result_height),
            Constraint::Length(1),
        ])
        .split(size);

    NavBarWidget::render(frame, layout[0], app);
    PageViewWidget::render(frame, layout[1], app);
    CepFormWidget::render(frame, layout[2], app);
    if result_height > 0 {
        ResultWidget::render(frame, layout[3], app);
    }
    StatusBarWidget::render(frame, layout[4], app);
}

fn load_page(config: &AppConfig) -> Result<Page> {
    match config.page_path() {
        Some(path) => {
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read page {}", path.display()))?;
            tracing::info!("Loaded page from {}", path.display());
            Ok(Page::parse(&source))
        }
        None => Ok(Page::builtin()),
    }
}

fn handle_action(
    app: &mut App,
    action: Action,
    controller: &Controller,
    form_tx: &mpsc::UnboundedSender<FormUpdate>,
) {
    if action != Action::PendingG {
        app.clear_pending_key();
    }

    match action {
        Action::Quit => app.should_quit = true,
        Action::FocusNext => app.focus_next(),
        Action::FocusPrev => app.focus_prev(),
        Action::NextLink | Action::PrevLink => {
            if action == Action::NextLink {
                app.next_link();
            } else {
                app.prev_link();
            }
            if let Some(link) = app.selected_link.and_then(|i| app.page.links().get(i)) {
                let message = format!("{} -> {}", link.label, link.href);
                app.set_status(message);
            }
        }
        Action::FollowLink => follow_link(app),
        Action::ScrollDown => app.scroll_down(),
        Action::ScrollUp => app.scroll_up(),
        Action::ScrollHalfPageDown => app.scroll_half_page_down(),
        Action::ScrollHalfPageUp => app.scroll_half_page_up(),
        Action::JumpToTop => app.jump_to_top(),
        Action::JumpToBottom => app.jump_to_bottom(),
        Action::PendingG => app.pending_key = Some('g'),
        Action::Submit => submit(app, controller, form_tx),
        Action::InputChar(c) => app.form.input.insert(c),
        Action::Backspace => app.form.input.backspace(),
        Action::ClearInput => app.form.input.clear(),
        Action::LeaveInput => app.focus = Focus::Page,
        Action::None => {}
    }
}

fn follow_link(app: &mut App) {
    match app.follow_selected_link() {
        AnchorJump::Scrolled { section, row } => {
            tracing::debug!("Scrolling to #{} at row {}", section, row);
            app.clear_status();
        }
        AnchorJump::External { href } => match open::that(&href) {
            Ok(()) => app.set_status(format!("Opened {}", href)),
            Err(e) => {
                tracing::warn!("Failed to open {}: {}", href, e);
                app.set_status(format!("Failed to open {}", href));
            }
        },
        // Unknown anchors are ignored
        AnchorJump::Missing { .. } | AnchorJump::NoLink => {}
    }
}

/// Spawn one lookup for the current input value
fn submit(app: &mut App, controller: &Controller, form_tx: &mpsc::UnboundedSender<FormUpdate>) {
    let Some(raw) = app.take_submission() else {
        return;
    };

    let controller = Arc::clone(controller);
    let mut view = ChannelView::new(form_tx.clone());

    tokio::spawn(async move {
        controller.submit(&raw, &mut view).await;
    });
}
