use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::info;

use swipefeed_core::{AppConfig, Clock, SystemClock};
use swipefeed_tui::{
    event::{AppEvent, EventHandler},
    input::{handle_key_event, translate_mouse},
    widgets::{ActionButtonWidget, FeedListWidget, StatusBarWidget},
    App, FeedKind, FeedView, TerminalSurface, Theme,
};

use crate::demo::DemoSource;

pub async fn run(config: Arc<AppConfig>, first: FeedKind) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange, SetTitle("swipefeed"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &config, first).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableFocusChange)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    config: &AppConfig,
    first: FeedKind,
) -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    // Mouse capture follows the mounted views' subscriptions
    let surface = TerminalSurface::new(io::stdout());

    let kinds = match first {
        FeedKind::Social => [FeedKind::Social, FeedKind::Shop],
        FeedKind::Shop => [FeedKind::Shop, FeedKind::Social],
    };
    let mut views = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let (tx, rx) = mpsc::unbounded_channel();
        let source = Arc::new(DemoSource::new(kind, config.feed.clone(), tx));
        views.push(FeedView::mount(
            kind,
            config,
            source,
            rx,
            surface.clone(),
            Arc::clone(&clock),
        )?);
    }

    let mut app = App::new(views);
    let theme = Theme::default();
    let event_handler = EventHandler::new(config.ui.tick_rate_ms);
    info!(feed = first.title(), "Terminal host started");

    // Main loop
    loop {
        app.resize(terminal.size()?.height);
        app.on_frame();

        // Draw UI
        terminal.draw(|frame| {
            let size = frame.area();

            // Main layout: feed + status bar
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(size);

            if let Some(view) = app.active_view() {
                FeedListWidget::render(frame, main_layout[0], view, true, &theme);
                ActionButtonWidget::render(frame, main_layout[0], view, &theme);
            }
            StatusBarWidget::render(frame, main_layout[1], &app, &theme);
        })?;

        if let Some(event) = event_handler.next()? {
            match event {
                AppEvent::Key(key) => {
                    app.clear_status();
                    app.handle_action(handle_key_event(key));
                }
                AppEvent::Mouse(mouse) => {
                    if let Some(input) = translate_mouse(mouse) {
                        app.handle_pointer(input);
                    }
                }
                AppEvent::Resize(_, height) => app.resize(height),
                AppEvent::FocusLost => app.focus_lost(),
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Detach listeners (and release the mouse) before the screen goes back
    app.dispose();
    info!("Terminal host stopped");
    Ok(())
}
