//! TUI state algebra: pure types, zero effects.
//!
//! These types define the entire TUI state space. The transition
//! function and the rendering layer both program against them.
//!
//! Navigation is an explicit stack owned by `App`. The root screen is
//! stored apart from the screens above it, so an empty stack cannot be
//! represented. Only the top of the stack (the active screen) ever sees
//! an `Action`; everything below it is inert until popped back to.

use crossterm::event::KeyEvent;

use crate::error::ValidationError;
use crate::executor::ExecutionResult;
use crate::script::{CommandScript, DISK_FIELD, SIZE_FIELD};

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the event loop can receive from its channel.
///
/// Two producers feed a single mpsc channel:
/// - A key reader thread sends `Key` variants
/// - A worker thread sends `RunFinished` when the tool exits
#[derive(Debug)]
pub enum AppEvent {
    /// A terminal key event from the crossterm reader thread.
    Key(KeyEvent),
    /// The pending script run completed (or failed to start).
    RunFinished(RunOutcome),
}

/// What a script run produced, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The tool ran; its output may still describe a failure.
    Completed(ExecutionResult),
    /// The script could not be written or the tool could not start.
    Failed(String),
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Top-level TUI model.
#[derive(Debug)]
pub struct App {
    /// Screen history; the top is the active screen.
    pub stack: ScreenStack,

    /// A script run that has been started but not yet finished.
    /// At most one exists at any time.
    pub pending: Option<PendingRun>,

    /// Display name of the external tool, for status text.
    pub tool_name: String,

    /// Set to true when the app should exit on the next tick.
    pub should_quit: bool,
}

/// A run in flight, and where its output should be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRun {
    pub script: CommandScript,
    pub destination: Destination,
}

/// Screen to push once a run completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The disk listing reached from the main menu.
    DiskList,
    /// A generic result screen with a heading.
    Result { title: String },
}

// ============================================================================
// SCREEN STACK
// ============================================================================

/// Ordered history of entered-and-not-yet-exited screens.
///
/// Invariant: never empty. `root` is permanent; `above` holds everything
/// pushed on top of it, last element active.
#[derive(Debug, PartialEq)]
pub struct ScreenStack {
    root: Screen,
    above: Vec<Screen>,
}

impl ScreenStack {
    pub fn new(root: Screen) -> Self {
        ScreenStack {
            root,
            above: Vec::new(),
        }
    }

    /// The screen receiving input.
    pub fn active(&self) -> &Screen {
        self.above.last().unwrap_or(&self.root)
    }

    pub fn active_mut(&mut self) -> &mut Screen {
        self.above.last_mut().unwrap_or(&mut self.root)
    }

    /// Suspend the active screen and make `screen` active.
    pub fn push(&mut self, screen: Screen) {
        self.above.push(screen);
    }

    /// Remove the active screen. No-op (None) when only the root remains.
    pub fn pop(&mut self) -> Option<Screen> {
        self.above.pop()
    }

    /// Unwind until a screen of `kind` is active.
    ///
    /// Returns false if no such screen was found, in which case the
    /// stack has been unwound to the root.
    pub fn pop_to(&mut self, kind: ScreenKind) -> bool {
        while self.active().kind() != kind {
            if self.pop().is_none() {
                return false;
            }
        }
        true
    }

    /// Number of screens, root included. Always at least 1.
    pub fn depth(&self) -> usize {
        self.above.len() + 1
    }

    /// Kinds from root to top.
    pub fn kinds(&self) -> Vec<ScreenKind> {
        std::iter::once(&self.root)
            .chain(self.above.iter())
            .map(Screen::kind)
            .collect()
    }
}

// ============================================================================
// SCREENS
// ============================================================================

/// Screen identity without its per-screen state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    MainMenu,
    ListDisks,
    CleanDisk,
    CreatePartition,
    Result,
}

/// One modal unit of the interface.
///
/// Variants carry only per-screen state: cursors, form contents,
/// and the output captured before the screen was entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Root menu.
    MainMenu { cursor: usize },

    /// Output of `list disk`, populated before the screen is pushed.
    ListDisks { outcome: RunOutcome, scroll: u16 },

    /// Disk number entry for `clean`.
    CleanDisk { form: Form },

    /// Disk number and size entry for `create partition`.
    CreatePartition { form: Form },

    /// Output of a clean / create run.
    Result {
        title: String,
        outcome: RunOutcome,
        scroll: u16,
    },
}

impl Screen {
    pub fn main_menu() -> Self {
        Screen::MainMenu { cursor: 0 }
    }

    pub fn list_disks(outcome: RunOutcome) -> Self {
        Screen::ListDisks { outcome, scroll: 0 }
    }

    pub fn clean_disk() -> Self {
        Screen::CleanDisk {
            form: Form::new(vec![Field::new(DISK_FIELD, "e.g., 1")]),
        }
    }

    pub fn create_partition() -> Self {
        Screen::CreatePartition {
            form: Form::new(vec![
                Field::new(DISK_FIELD, "e.g., 1"),
                Field::new(SIZE_FIELD, "e.g., 10240"),
            ]),
        }
    }

    pub fn result(title: impl Into<String>, outcome: RunOutcome) -> Self {
        Screen::Result {
            title: title.into(),
            outcome,
            scroll: 0,
        }
    }

    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::MainMenu { .. } => ScreenKind::MainMenu,
            Screen::ListDisks { .. } => ScreenKind::ListDisks,
            Screen::CleanDisk { .. } => ScreenKind::CleanDisk,
            Screen::CreatePartition { .. } => ScreenKind::CreatePartition,
            Screen::Result { .. } => ScreenKind::Result,
        }
    }

    /// Actions this screen offers, in display order.
    pub fn buttons(&self) -> &'static [Button] {
        match self {
            Screen::MainMenu { .. } => &[
                Button::ListDisks,
                Button::CleanDisk,
                Button::CreatePartition,
                Button::Exit,
            ],
            Screen::ListDisks { .. } => &[Button::Back],
            Screen::CleanDisk { .. } => &[Button::Clean, Button::Back],
            Screen::CreatePartition { .. } => &[Button::Create, Button::Back],
            Screen::Result { .. } => &[Button::BackToMenu],
        }
    }
}

/// A pressable action on a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    ListDisks,
    CleanDisk,
    CreatePartition,
    Exit,
    Back,
    Clean,
    Create,
    BackToMenu,
}

impl Button {
    pub fn label(self) -> &'static str {
        match self {
            Button::ListDisks => "List Disks",
            Button::CleanDisk | Button::Clean => "Clean Disk",
            Button::CreatePartition | Button::Create => "Create Partition",
            Button::Exit => "Exit",
            Button::Back => "Back",
            Button::BackToMenu => "Back to Menu",
        }
    }
}

// ============================================================================
// FORMS
// ============================================================================

/// Free-text input fields followed by the screen's buttons.
///
/// `focus` ranges over fields first, then buttons: with 2 fields and
/// 2 buttons, focus 0..=1 is a field and 2..=3 a button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub fields: Vec<Field>,
    pub focus: usize,
    /// Last rejection, shown under the fields until the next edit.
    pub error: Option<ValidationError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: String,
}

impl Field {
    pub fn new(label: &'static str, placeholder: &'static str) -> Self {
        Field {
            label,
            placeholder,
            value: String::new(),
        }
    }
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        Form {
            fields,
            focus: 0,
            error: None,
        }
    }

    /// Value of field `index`, or "" if out of range.
    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    /// The field under focus, if focus is not on a button.
    pub fn focused_field_mut(&mut self) -> Option<&mut Field> {
        self.fields.get_mut(self.focus)
    }

    /// The button under focus, if any.
    pub fn focused_button(&self, buttons: &[Button]) -> Option<Button> {
        self.focus
            .checked_sub(self.fields.len())
            .and_then(|i| buttons.get(i).copied())
    }

    /// Index of the field with the given label.
    pub fn field_index(&self, label: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.label == label)
    }

    pub fn focus_next(&mut self, button_count: usize) {
        let stops = self.fields.len() + button_count;
        if stops > 0 {
            self.focus = (self.focus + 1) % stops;
        }
    }

    pub fn focus_prev(&mut self, button_count: usize) {
        let stops = self.fields.len() + button_count;
        if stops > 0 {
            self.focus = (self.focus + stops - 1) % stops;
        }
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw key events.
///
/// The effects layer maps key presses to Actions.
/// The transition function decides what each Action means per Screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    /// Tab: move focus forward.
    NextField,
    /// Shift+Tab: move focus back.
    PrevField,
    /// Press the focused button / submit.
    Enter,
    /// Leave the current screen.
    Back,
    Backspace,
    /// A printable character. Forms insert it; menus may treat it as a shortcut.
    Char(char),
    /// Quit the application.
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure state transition on the active screen.
///
/// The update function returns this. Stack operations are applied by
/// `update::apply`; effects are handed to the effects boundary.
#[derive(Debug, PartialEq)]
pub enum Transition {
    /// Stay on the active screen (it may have been edited in place).
    Stay,
    /// Enter a new screen on top of the active one.
    Push(Screen),
    /// Return to the previous screen.
    Pop,
    /// Unwind to the nearest screen of this kind.
    PopTo(ScreenKind),
    /// Execute a side effect.
    Effect(Effect),
    /// Quit the application.
    Quit,
}

/// Side effect requested by a pure transition.
#[derive(Debug, PartialEq)]
pub enum Effect {
    /// Run a script, then push the screen named by `destination`.
    Run {
        script: CommandScript,
        destination: Destination,
    },
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl App {
    /// Create an App sitting on the main menu.
    pub fn new(tool_name: impl Into<String>) -> Self {
        App {
            stack: ScreenStack::new(Screen::main_menu()),
            pending: None,
            tool_name: tool_name.into(),
            should_quit: false,
        }
    }

    pub fn active(&self) -> &Screen {
        self.stack.active()
    }
}

// ============================================================================
// TESTS
// ============================================================================
