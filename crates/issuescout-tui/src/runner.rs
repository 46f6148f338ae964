// TUI event loop and terminal management
use crate::{App, AppEvent, Command};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use issuescout_core::{
    detail::fetch_issue_detail, pipeline::fetch_page_for, repo_ref::Route, IssueSource,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, Stdout},
    sync::Arc,
    time::Duration,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

// How long to wait for input before checking on background requests
const TICK: Duration = Duration::from_millis(50);

pub async fn run_tui(mut app: App, source: Arc<dyn IssueSource>, route: Route) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    for command in app.open_route(route) {
        dispatch(command, &source, &tx);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if app.mouse_enabled {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    } else {
        execute!(stdout, EnterAlternateScreen)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, &source, &tx, &mut rx);

    // Restore terminal, whatever the loop returned
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    source: &Arc<dyn IssueSource>,
    tx: &UnboundedSender<AppEvent>,
    rx: &mut UnboundedReceiver<AppEvent>,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| crate::ui::render(f, app))?;

        if event::poll(TICK)? {
            let commands = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                // Wheel scrolling behaves like the arrow keys
                Event::Mouse(mouse) if app.mouse_enabled => match mouse.kind {
                    MouseEventKind::ScrollDown => {
                        app.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE))
                    }
                    MouseEventKind::ScrollUp => {
                        app.handle_key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE))
                    }
                    _ => Vec::new(),
                },
                _ => Vec::new(),
            };

            for command in commands {
                dispatch(command, source, tx);
            }
        }

        while let Ok(event) = rx.try_recv() {
            app.handle_event(event);
        }

        if app.should_quit {
            info!("Leaving the TUI");
            return Ok(());
        }
    }
}

/// Run a command on the runtime and post the outcome back to the loop
fn dispatch(command: Command, source: &Arc<dyn IssueSource>, tx: &UnboundedSender<AppEvent>) {
    debug!("Dispatching {:?}", command);
    let source = Arc::clone(source);
    let tx = tx.clone();

    tokio::spawn(async move {
        let event = match command {
            Command::FetchPage(ticket) => {
                let request = ticket.request().clone();
                let result = fetch_page_for(
                    source.as_ref(),
                    &request.repo,
                    request.page,
                    request.per_page,
                )
                .await;
                AppEvent::PageLoaded(ticket, result)
            }
            Command::FetchRepository(repo) => {
                let result = source.get_repository(&repo).await;
                AppEvent::RepositoryLoaded(repo, result)
            }
            Command::FetchDetail(ticket) => {
                let result = fetch_issue_detail(source.as_ref(), &ticket.repo, ticket.number).await;
                AppEvent::DetailLoaded(ticket, result)
            }
        };

        // Receiver is gone once the user quit
        let _ = tx.send(event);
    });
}
