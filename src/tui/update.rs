//! Pure state transitions: (active Screen, Action) → Transition.
//!
//! This is the core logic of the TUI. Fully testable without a terminal.
//! Each screen defines which actions it accepts. Unhandled actions
//! leave the screen unchanged (`Transition::Stay`).
//!
//! `handle_action` and `handle_background_event` are the two entry
//! points used by the event loop; both only touch `App`.

use tracing::{debug, info, warn};

use crate::script::{CommandScript, DiskIndex, PartitionSize, DISK_FIELD, SIZE_FIELD};

use super::state::{
    Action, App, AppEvent, Button, Destination, Effect, Form, PendingRun, RunOutcome, Screen,
    ScreenKind, Transition,
};

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Route an action to the active screen and apply the result.
///
/// Returns the script to execute when a new run begins. While a run is
/// pending, every action except Quit is ignored, so a second run can
/// never start.
pub fn handle_action(app: &mut App, action: &Action) -> Option<CommandScript> {
    if app.pending.is_some() {
        if *action == Action::Quit {
            app.should_quit = true;
        }
        return None;
    }

    let transition = update(app.stack.active_mut(), action);
    apply(app, transition)
}

/// Apply a transition to the app. Returns a script if a run should start.
pub fn apply(app: &mut App, transition: Transition) -> Option<CommandScript> {
    match transition {
        Transition::Stay => None,
        Transition::Push(screen) => {
            debug!(kind = ?screen.kind(), "push screen");
            app.stack.push(screen);
            None
        }
        Transition::Pop => {
            if let Some(screen) = app.stack.pop() {
                debug!(kind = ?screen.kind(), "pop screen");
            }
            None
        }
        Transition::PopTo(kind) => {
            debug!(?kind, from_depth = app.stack.depth(), "unwind stack");
            app.stack.pop_to(kind);
            None
        }
        Transition::Effect(effect) => begin_run(app, effect),
        Transition::Quit => {
            app.should_quit = true;
            None
        }
    }
}

/// Record a run as pending unless one already is.
fn begin_run(app: &mut App, effect: Effect) -> Option<CommandScript> {
    let Effect::Run {
        script,
        destination,
    } = effect;

    if app.pending.is_some() {
        warn!("run requested while another is pending; ignored");
        return None;
    }

    info!(lines = ?script.lines(), "starting script run");
    app.pending = Some(PendingRun {
        script: script.clone(),
        destination,
    });
    Some(script)
}

/// Handle events not produced by the keyboard.
pub fn handle_background_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::RunFinished(outcome) => {
            let Some(pending) = app.pending.take() else {
                warn!("run finished with nothing pending");
                return;
            };
            let screen = match pending.destination {
                Destination::DiskList => Screen::list_disks(outcome),
                Destination::Result { title } => Screen::result(title, outcome),
            };
            app.stack.push(screen);
        }
        // Key events are routed through map_key → handle_action
        AppEvent::Key(_) => {}
    }
}

/// Pure state transition on the active screen.
///
/// Screens that hold editable state (cursor, form text) are updated in
/// place; everything else is described by the returned Transition.
pub fn update(screen: &mut Screen, action: &Action) -> Transition {
    let buttons = screen.buttons();
    match screen {
        Screen::MainMenu { cursor } => update_main_menu(cursor, buttons, action),
        Screen::CleanDisk { form } | Screen::CreatePartition { form } => {
            update_form(form, buttons, action)
        }
        Screen::ListDisks { scroll, .. } | Screen::Result { scroll, .. } => {
            update_output(scroll, buttons, action)
        }
    }
}

// ============================================================================
// PER-SCREEN HANDLERS
// ============================================================================

/// Main menu: cursor movement, number shortcuts, Enter presses.
fn update_main_menu(cursor: &mut usize, buttons: &[Button], action: &Action) -> Transition {
    match action {
        Action::Up | Action::PrevField | Action::Char('k') => {
            *cursor = cursor.saturating_sub(1);
            Transition::Stay
        }
        Action::Down | Action::NextField | Action::Char('j') => {
            *cursor = (*cursor + 1).min(buttons.len().saturating_sub(1));
            Transition::Stay
        }
        Action::Enter => match buttons.get(*cursor) {
            Some(&button) => press(button, None),
            None => Transition::Stay,
        },
        Action::Char(c @ '1'..='9') => {
            let index = (*c as u8 - b'1') as usize;
            match buttons.get(index) {
                Some(&button) => {
                    *cursor = index;
                    press(button, None)
                }
                None => Transition::Stay,
            }
        }
        Action::Char('q') | Action::Quit => Transition::Quit,
        _ => Transition::Stay,
    }
}

/// Output screens (disk list, result): scroll, then leave via the single button.
fn update_output(scroll: &mut u16, buttons: &[Button], action: &Action) -> Transition {
    match action {
        Action::Up | Action::Char('k') => {
            *scroll = scroll.saturating_sub(1);
            Transition::Stay
        }
        Action::Down | Action::Char('j') => {
            *scroll = scroll.saturating_add(1);
            Transition::Stay
        }
        Action::Enter | Action::Back => match buttons.first() {
            Some(&button) => press(button, None),
            None => Transition::Pop,
        },
        Action::Quit => Transition::Quit,
        _ => Transition::Stay,
    }
}

/// Forms: text entry, focus movement, submit, back.
fn update_form(form: &mut Form, buttons: &[Button], action: &Action) -> Transition {
    match action {
        Action::Char(c) => {
            if let Some(field) = form.focused_field_mut() {
                field.value.push(*c);
                form.error = None;
            }
            Transition::Stay
        }
        Action::Backspace => {
            if let Some(field) = form.focused_field_mut() {
                field.value.pop();
                form.error = None;
            }
            Transition::Stay
        }
        Action::Down | Action::NextField => {
            form.focus_next(buttons.len());
            Transition::Stay
        }
        Action::Up | Action::PrevField => {
            form.focus_prev(buttons.len());
            Transition::Stay
        }
        Action::Enter => match form.focused_button(buttons) {
            Some(button) => press(button, Some(form)),
            // Enter on the last field submits; on earlier fields it advances.
            None if form.focus + 1 >= form.fields.len() => match buttons.first() {
                Some(&submit) => press(submit, Some(form)),
                None => Transition::Stay,
            },
            None => {
                form.focus_next(buttons.len());
                Transition::Stay
            }
        },
        Action::Back => Transition::Pop,
        Action::Quit => Transition::Quit,
        _ => Transition::Stay,
    }
}

/// What pressing a button does. Form buttons need the form to submit.
fn press(button: Button, form: Option<&mut Form>) -> Transition {
    match button {
        Button::ListDisks => Transition::Effect(Effect::Run {
            script: CommandScript::list_disks(),
            destination: Destination::DiskList,
        }),
        Button::CleanDisk => Transition::Push(Screen::clean_disk()),
        Button::CreatePartition => Transition::Push(Screen::create_partition()),
        Button::Exit => Transition::Quit,
        Button::Back => Transition::Pop,
        Button::BackToMenu => Transition::PopTo(ScreenKind::MainMenu),
        Button::Clean => match form {
            Some(form) => submit_clean(form),
            None => Transition::Stay,
        },
        Button::Create => match form {
            Some(form) => submit_create(form),
            None => Transition::Stay,
        },
    }
}

// ============================================================================
// SUBMISSION
// ============================================================================

fn submit_clean(form: &mut Form) -> Transition {
    let disk = match DiskIndex::parse_field(form.value(0), DISK_FIELD) {
        Ok(disk) => disk,
        Err(e) => return reject(form, e),
    };

    Transition::Effect(Effect::Run {
        script: CommandScript::clean(disk),
        destination: Destination::Result {
            title: format!("Disk {} Cleaned", disk),
        },
    })
}

fn submit_create(form: &mut Form) -> Transition {
    let parsed = DiskIndex::parse_field(form.value(0), DISK_FIELD).and_then(|disk| {
        PartitionSize::parse_field(form.value(1), SIZE_FIELD).map(|size| (disk, size))
    });

    match parsed {
        Ok((disk, size)) => Transition::Effect(Effect::Run {
            script: CommandScript::create_partition(disk, size),
            destination: Destination::Result {
                title: "Partition Created".to_string(),
            },
        }),
        Err(e) => reject(form, e),
    }
}

/// Keep the user on the form with the error shown and the bad field focused.
fn reject(form: &mut Form, error: crate::error::ValidationError) -> Transition {
    info!(%error, "input rejected");
    if let Some(index) = form.field_index(error.field()) {
        form.focus = index;
    }
    form.error = Some(error);
    Transition::Stay
}

// ============================================================================
// TESTS
// ============================================================================
