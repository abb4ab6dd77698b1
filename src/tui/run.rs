//! TUI effects boundary: event loop, terminal lifecycle, key mapping.
//!
//! This is the only TUI module with side effects. It wires the pure
//! layers (state, update, view) to the real terminal via crossterm and
//! ratatui, and to the partitioning tool via the executor.
//!
//! Architecture: producer threads feed a single mpsc channel.
//! - Key reader thread: forwards crossterm key presses
//! - Worker thread (one per run, at most one alive): runs the script
//!   and sends its outcome
//! The event loop consumes from the channel, dispatching to pure handlers.

use std::io;
use std::sync::mpsc;
use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};

use crate::executor::{run_script, ExecutorConfig};
use crate::script::CommandScript;

use super::state::{Action, App, AppEvent, RunOutcome};
use super::update::{handle_action, handle_background_event};
use super::view::render;

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// Printable characters always map to `Char`; each screen decides
/// whether a character is text or a shortcut.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Up => Some(Action::Up),
        KeyCode::Down => Some(Action::Down),
        KeyCode::Tab => Some(Action::NextField),
        KeyCode::BackTab => Some(Action::PrevField),
        KeyCode::Enter => Some(Action::Enter),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) => Some(Action::Char(c)),
        _ => None,
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        error!(panic = %panic_info, "panic");
        original_hook(panic_info);
    }));
}

// ============================================================================
// BACKGROUND THREADS
// ============================================================================

/// Spawn a thread that reads crossterm events and forwards key presses to the channel.
fn spawn_key_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            match event::read() {
                // Windows reports releases too; only presses are input.
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break; // receiver dropped, TUI is shutting down
                    }
                }
                Ok(_) => {} // ignore releases, mouse, resize, etc.
                Err(_) => break,
            }
        }
    });
}

/// Spawn a thread that runs one script and reports its outcome.
fn spawn_worker(config: ExecutorConfig, script: CommandScript, tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let outcome = match run_script(&config, &script) {
            Ok(result) => RunOutcome::Completed(result),
            Err(e) => {
                error!(error = %e, "script run failed");
                RunOutcome::Failed(e.to_string())
            }
        };
        // Receiver gone means the TUI already quit
        let _ = tx.send(AppEvent::RunFinished(outcome));
    });
}

/// Route one action to the app; start a worker if it begins a run.
///
/// Rejected input never reaches `spawn_worker`, so nothing is written
/// to the script file.
fn dispatch(app: &mut App, action: &Action, config: &ExecutorConfig, tx: &mpsc::Sender<AppEvent>) {
    if let Some(script) = handle_action(app, action) {
        spawn_worker(config.clone(), script, tx.clone());
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the TUI event loop until the user exits.
///
/// Script runs happen on a worker thread so the interface keeps
/// redrawing; `handle_action` guarantees only one is ever in flight.
pub fn run(config: ExecutorConfig) -> io::Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let mut app = App::new(config.tool.display().to_string());

    let (tx, rx) = mpsc::channel::<AppEvent>();

    spawn_key_reader(tx.clone());

    loop {
        terminal.draw(|frame| render(&app, frame))?;

        if app.should_quit {
            break;
        }

        // Block on next event from any producer
        let event = match rx.recv() {
            Ok(e) => e,
            Err(_) => break, // all senders dropped
        };

        match event {
            AppEvent::Key(key) => {
                if let Some(action) = map_key(key) {
                    dispatch(&mut app, &action, &config, &tx);
                }
            }
            background_event => {
                handle_background_event(&mut app, background_event);
            }
        }
    }

    info!("session ended");
    restore_terminal()?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
