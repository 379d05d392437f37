//! Interactive terminal mode.
//!
//! One `tokio::select!` loop drives everything: keyboard events from the
//! crossterm `EventStream` and `BatchEvent`s from coordinator worker units
//! both land here, and only here does the tree or view state change. Worker
//! units may block on git for arbitrary time; this loop never does.

pub mod app;
pub mod view;

use std::io;
use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tracing::debug;

use crate::batch::Coordinator;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::git::Git;
use crate::models::{BatchEvent, OpKind};
use crate::scanner::Scanner;
use crate::tree::Tree;
use crate::ui::app::{App, Mode};

/// Run the interactive tree view until the user quits.
pub async fn run(config: &Config) -> Result<()> {
    let scanner = Scanner::new(&config.codebases_path);
    let entries = scanner.scan()?;
    let tree = Tree::build(entries);
    if tree.is_empty() {
        return Err(AppError::NotFound(format!(
            "no repositories found in {}",
            config.codebases_path
        )));
    }
    let mut app = App::new(tree);

    let git = Arc::new(Git::new(&config.codebases_path));
    let coordinator = Coordinator::new(git);
    let (tx, mut rx) = mpsc::unbounded_channel::<BatchEvent>();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut events = EventStream::new();

    let result = event_loop(
        &mut terminal,
        &mut events,
        &mut app,
        &coordinator,
        &tx,
        &mut rx,
    )
    .await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    events: &mut EventStream,
    app: &mut App,
    coordinator: &Coordinator<Git>,
    tx: &mpsc::UnboundedSender<BatchEvent>,
    rx: &mut mpsc::UnboundedReceiver<BatchEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| view::render(frame, app))?;

        tokio::select! {
            Some(event) = rx.recv() => {
                app.apply_event(event);
            }
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if handle_key(key, app, coordinator, tx) {
                            return Ok(());
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()),
                }
            }
        }
    }
}

/// Apply one key press. Returns true when the application should exit.
fn handle_key(
    key: KeyEvent,
    app: &mut App,
    coordinator: &Coordinator<Git>,
    tx: &mpsc::UnboundedSender<BatchEvent>,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match app.mode {
        Mode::ConfirmRemove => handle_confirm_key(key, app, coordinator, tx),
        Mode::Browse => handle_browse_key(key, app, coordinator, tx),
    }
}

fn handle_browse_key(
    key: KeyEvent,
    app: &mut App,
    coordinator: &Coordinator<Git>,
    tx: &mpsc::UnboundedSender<BatchEvent>,
) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Left | KeyCode::Char('h') => app.set_expanded(false),
        KeyCode::Right | KeyCode::Char('l') => app.set_expanded(true),
        KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Char('a') => app.select_all(),
        KeyCode::Char('n') => app.select_none(),
        KeyCode::Char('u') => {
            // Targets already Pending must not be re-batched; the running
            // batch blocks new ones here, not in the coordinator.
            if !app.batch_running() {
                start_batch(app, coordinator, tx, OpKind::Update);
            }
        }
        KeyCode::Char('r') => {
            if !app.batch_running() {
                let targets = app.batch_targets();
                if !targets.is_empty() {
                    app.pending_removal = targets;
                    app.mode = Mode::ConfirmRemove;
                }
            }
        }
        _ => {}
    }
    false
}

fn handle_confirm_key(
    key: KeyEvent,
    app: &mut App,
    coordinator: &Coordinator<Git>,
    tx: &mpsc::UnboundedSender<BatchEvent>,
) -> bool {
    app.mode = Mode::Browse;
    if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
        let targets = std::mem::take(&mut app.pending_removal);
        launch(app, coordinator, tx, OpKind::Remove, targets);
    } else {
        app.pending_removal.clear();
    }
    false
}

fn start_batch(
    app: &mut App,
    coordinator: &Coordinator<Git>,
    tx: &mpsc::UnboundedSender<BatchEvent>,
    kind: OpKind,
) {
    let targets = app.batch_targets();
    if targets.is_empty() {
        return;
    }
    launch(app, coordinator, tx, kind, targets);
}

fn launch(
    app: &mut App,
    coordinator: &Coordinator<Git>,
    tx: &mpsc::UnboundedSender<BatchEvent>,
    kind: OpKind,
    targets: Vec<String>,
) {
    debug!(kind = %kind, count = targets.len(), "starting batch from ui");
    let total = targets.len();
    match coordinator.start(kind, targets, tx.clone()) {
        Ok(()) => app.begin_batch(kind, total),
        Err(e) => app.status_line = Some(format!("Error: {}", e)),
    }
}
