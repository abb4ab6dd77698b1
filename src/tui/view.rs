//! Pure rendering: map App state to ratatui widget trees.
//!
//! Only the active screen is drawn. Every frame has the same frame:
//! a title bar at top, the screen body, and a key-hint footer.
//! While a run is pending the body is replaced by a status notice.

use humansize::{format_size, BINARY};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};
use ratatui::Frame;

use crate::script::{PartitionSize, SIZE_FIELD};

use super::state::{App, Button, Form, PendingRun, RunOutcome, Screen};
use super::theme;

/// Application name shown in the title bar.
pub const APP_TITLE: &str = "Microsoft Disk Partition Utility";

/// Credit line under the menu heading.
const AUTHOR_LINE: &str = "  Created by Hardik Kawale";

// ============================================================================
// DISPATCH
// ============================================================================

/// Render the active screen to the terminal frame.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // title
        Constraint::Min(0),    // body
        Constraint::Length(1), // help
    ])
    .split(area);

    let screen = app.active();

    frame.render_widget(render_title(screen), chunks[0]);
    frame.render_widget(render_help(screen, app.pending.is_some()), chunks[2]);

    let body = chunks[1];

    if let Some(pending) = &app.pending {
        render_pending(&app.tool_name, pending, frame, body);
        return;
    }

    let buttons = screen.buttons();

    match screen {
        Screen::MainMenu { cursor } => render_main_menu(*cursor, buttons, frame, body),
        Screen::ListDisks { outcome, scroll } => {
            render_output("Disk List Output", outcome, *scroll, buttons, frame, body);
        }
        Screen::CleanDisk { form } => {
            render_form("Enter Disk Number to Clean", form, buttons, None, frame, body);
        }
        Screen::CreatePartition { form } => {
            let preview = size_preview(form);
            render_form("Create a Primary Partition", form, buttons, preview, frame, body);
        }
        Screen::Result {
            title,
            outcome,
            scroll,
        } => render_output(title, outcome, *scroll, buttons, frame, body),
    }
}

// ============================================================================
// SHARED LAYOUT
// ============================================================================

/// Title bar showing the app name and the active screen.
fn render_title(screen: &Screen) -> Paragraph<'static> {
    let context = match screen {
        Screen::MainMenu { .. } => "Main Menu",
        Screen::ListDisks { .. } => "List Disks",
        Screen::CleanDisk { .. } => "Clean Disk",
        Screen::CreatePartition { .. } => "Create Partition",
        Screen::Result { .. } => "Result",
    };

    Paragraph::new(Line::from(vec![
        Span::styled(format!(" {} ", APP_TITLE), theme::STYLE_TITLE),
        Span::styled(format!("· {} ", context), theme::STYLE_TITLE),
    ]))
    .style(theme::STYLE_TITLE)
}

/// Help line showing available keybindings for the active screen.
fn render_help(screen: &Screen, pending: bool) -> Paragraph<'static> {
    let help_text = if pending {
        "running... [^C] quit"
    } else {
        match screen {
            Screen::MainMenu { .. } => "[j/k] move  [Enter] select  [1-4] shortcut  [q] quit",
            Screen::ListDisks { .. } => "[j/k] scroll  [Enter/Esc] back  [^C] quit",
            Screen::CleanDisk { .. } | Screen::CreatePartition { .. } => {
                "[Tab] next  [Shift+Tab] prev  [Enter] submit  [Esc] back  [^C] quit"
            }
            Screen::Result { .. } => "[j/k] scroll  [Enter/Esc] back to menu  [^C] quit",
        }
    };

    Paragraph::new(Span::styled(help_text, theme::STYLE_HELP))
}

/// A row of `> Label` buttons, the focused one highlighted.
fn button_line(buttons: &[Button], focused: Option<usize>) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (i, button) in buttons.iter().enumerate() {
        let style = if focused == Some(i) {
            theme::STYLE_FOCUSED
        } else {
            theme::STYLE_INTERACTIVE
        };
        spans.push(Span::styled(format!(" > {} ", button.label()), style));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

fn bordered(title: &str) -> Block<'_> {
    Block::bordered()
        .border_type(BorderType::Rounded)
        .title(Span::styled(format!(" {} ", title), theme::STYLE_HEADING))
}

// ============================================================================
// SCREEN: MAIN MENU
// ============================================================================

fn render_main_menu(cursor: usize, buttons: &[Button], frame: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", APP_TITLE), theme::STYLE_HEADING)),
        Line::from(Span::styled(AUTHOR_LINE, theme::STYLE_AUTHOR)),
        Line::from(""),
    ];

    for (i, button) in buttons.iter().enumerate() {
        let label = format!(" > {} ", button.label());
        let mut spans = vec![Span::styled(format!("  [{}] ", i + 1), theme::STYLE_DIM)];
        if i == cursor {
            spans.push(Span::styled(label, theme::STYLE_FOCUSED));
        } else if *button == Button::CleanDisk {
            spans.push(Span::styled(label, theme::STYLE_DANGER));
        } else {
            spans.push(Span::raw(label));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).block(bordered("Menu"));
    frame.render_widget(paragraph, area);
}

// ============================================================================
// SCREEN: OUTPUT (disk list, result)
// ============================================================================

fn render_output(
    heading: &str,
    outcome: &RunOutcome,
    scroll: u16,
    buttons: &[Button],
    frame: &mut Frame,
    area: Rect,
) {
    let chunks = Layout::vertical([
        Constraint::Min(0),    // output
        Constraint::Length(1), // button
    ])
    .split(area);

    let paragraph = Paragraph::new(outcome_lines(outcome))
        .block(bordered(heading).border_style(theme::STYLE_OUTPUT))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, chunks[0]);

    frame.render_widget(Paragraph::new(button_line(buttons, Some(0))), chunks[1]);
}

/// Captured output as display lines.
///
/// Text is shown verbatim; a red banner precedes it when the tool
/// failed to start or exited non-zero, and stderr follows in yellow.
pub fn outcome_lines(outcome: &RunOutcome) -> Vec<Line<'_>> {
    let result = match outcome {
        RunOutcome::Failed(message) => {
            return vec![Line::from(Span::styled(
                format!("Error: {}", message),
                theme::STYLE_DANGER,
            ))];
        }
        RunOutcome::Completed(result) => result,
    };

    let mut lines = Vec::new();

    if !result.success() {
        let banner = match result.exit_code {
            Some(code) => format!("Tool exited with code {}", code),
            None => "Tool was terminated by a signal".to_string(),
        };
        lines.push(Line::from(Span::styled(banner, theme::STYLE_DANGER)));
        lines.push(Line::from(""));
    }

    if result.stdout.is_empty() {
        lines.push(Line::from(Span::styled("(no output)", theme::STYLE_DIM)));
    } else {
        lines.extend(
            result
                .stdout
                .lines()
                .map(|line| Line::from(Span::styled(line, theme::STYLE_OUTPUT))),
        );
    }

    if !result.stderr.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("stderr:", theme::STYLE_WARNING)));
        lines.extend(
            result
                .stderr
                .lines()
                .map(|line| Line::from(Span::styled(line, theme::STYLE_WARNING))),
        );
    }

    lines
}

// ============================================================================
// SCREEN: FORMS
// ============================================================================

fn render_form(
    prompt: &str,
    form: &Form,
    buttons: &[Button],
    preview: Option<Line<'static>>,
    frame: &mut Frame,
    area: Rect,
) {
    let mut constraints = vec![Constraint::Length(2)]; // prompt
    constraints.extend(form.fields.iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Length(2)); // error / preview
    constraints.push(Constraint::Length(1)); // buttons
    constraints.push(Constraint::Min(0));

    let chunks = Layout::vertical(constraints).split(area);

    frame.render_widget(
        Paragraph::new(Span::styled(format!("  {}", prompt), theme::STYLE_HEADING)),
        chunks[0],
    );

    for (i, field) in form.fields.iter().enumerate() {
        let focused = form.focus == i;
        let content = if field.value.is_empty() {
            Span::styled(field.placeholder, theme::STYLE_DIM)
        } else {
            Span::raw(field.value.as_str())
        };
        let mut spans = vec![content];
        if focused {
            spans.push(Span::styled("▏", theme::STYLE_INTERACTIVE));
        }

        let mut block = bordered(field.label);
        if focused {
            block = block.border_style(theme::STYLE_FOCUSED_BORDER);
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i + 1]);
    }

    let status = match &form.error {
        Some(error) => Line::from(Span::styled(format!("  {}", error), theme::STYLE_DANGER)),
        None => preview.unwrap_or_default(),
    };
    let n = form.fields.len();
    frame.render_widget(Paragraph::new(status), chunks[n + 1]);

    let focused_button = form.focus.checked_sub(n);
    frame.render_widget(
        Paragraph::new(button_line(buttons, focused_button)),
        chunks[n + 2],
    );
}

/// Human-readable echo of a valid partition size.
fn size_preview(form: &Form) -> Option<Line<'static>> {
    let index = form.field_index(SIZE_FIELD)?;
    let size = PartitionSize::parse_field(form.value(index), SIZE_FIELD).ok()?;
    Some(Line::from(Span::styled(
        format!("  {} MB = {}", size.megabytes(), format_size(size.bytes(), BINARY)),
        theme::STYLE_DIM,
    )))
}

// ============================================================================
// PENDING RUN
// ============================================================================

fn render_pending(tool: &str, pending: &PendingRun, frame: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  Running {}...", tool),
            theme::STYLE_INTERACTIVE,
        )),
        Line::from(""),
    ];
    lines.extend(
        pending
            .script
            .lines()
            .iter()
            .map(|line| Line::from(Span::styled(format!("    {}", line), theme::STYLE_DIM))),
    );

    let paragraph = Paragraph::new(lines)
        .block(bordered("Working"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::executor::ExecutionResult;
    use crate::script::{CommandScript, DISK_FIELD};
    use crate::tui::state::{Destination, Field};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn make_terminal() -> Terminal<TestBackend> {
        let backend = TestBackend::new(80, 24);
        Terminal::new(backend).unwrap()
    }

    fn draw(app: &App) -> String {
        let mut terminal = make_terminal();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect()
    }

    fn completed(stdout: &str, stderr: &str, exit_code: Option<i32>) -> RunOutcome {
        RunOutcome::Completed(ExecutionResult {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        })
    }

    fn text_of(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn main_menu_lists_every_action() {
        let content = draw(&App::new("diskpart"));
        assert!(content.contains(APP_TITLE));
        assert!(content.contains("Created by Hardik Kawale"));
        for label in ["List Disks", "Clean Disk", "Create Partition", "Exit"] {
            assert!(content.contains(label), "missing {label}");
        }
    }

    #[test]
    fn list_disks_shows_output_and_back() {
        let mut app = App::new("diskpart");
        app.stack
            .push(Screen::list_disks(completed("Disk 0    Online    476 GB", "", Some(0))));
        let content = draw(&app);
        assert!(content.contains("Disk List Output"));
        assert!(content.contains("Disk 0    Online    476 GB"));
        assert!(content.contains("> Back"));
    }

    #[test]
    fn outcome_keeps_internal_blank_lines() {
        let outcome = completed("first\n\nthird", "", Some(0));
        assert_eq!(text_of(&outcome_lines(&outcome)), ["first", "", "third"]);
    }

    #[test]
    fn nonzero_exit_shows_banner_and_stderr() {
        let outcome = completed("partial", "access denied", Some(5));
        let text = text_of(&outcome_lines(&outcome));
        assert_eq!(text[0], "Tool exited with code 5");
        assert!(text.contains(&"partial".to_string()));
        assert_eq!(text.last().map(String::as_str), Some("access denied"));
    }

    #[test]
    fn spawn_failure_shows_error() {
        let outcome = RunOutcome::Failed("could not start `diskpart`: not found".into());
        let text = text_of(&outcome_lines(&outcome));
        assert_eq!(text, ["Error: could not start `diskpart`: not found"]);
    }

    #[test]
    fn empty_output_is_marked() {
        let text = text_of(&outcome_lines(&completed("", "", Some(0))));
        assert_eq!(text, ["(no output)"]);
    }

    #[test]
    fn form_shows_placeholder_and_error() {
        let mut app = App::new("diskpart");
        let mut screen = Screen::clean_disk();
        if let Screen::CleanDisk { form } = &mut screen {
            form.error = Some(ValidationError::Empty { field: DISK_FIELD });
        }
        app.stack.push(screen);

        let content = draw(&app);
        assert!(content.contains("e.g., 1"));
        assert!(content.contains("Disk number is required"));
        assert!(content.contains("> Clean Disk"));
    }

    #[test]
    fn create_form_previews_size() {
        let form = Form {
            fields: vec![
                Field {
                    label: DISK_FIELD,
                    placeholder: "",
                    value: "1".into(),
                },
                Field {
                    label: SIZE_FIELD,
                    placeholder: "",
                    value: "10240".into(),
                },
            ],
            focus: 1,
            error: None,
        };
        let preview = size_preview(&form).expect("valid size");
        assert_eq!(text_of(&[preview]), ["  10240 MB = 10 GiB"]);
    }

    #[test]
    fn invalid_size_has_no_preview() {
        let form = match Screen::create_partition() {
            Screen::CreatePartition { form } => form,
            _ => unreachable!(),
        };
        assert!(size_preview(&form).is_none());
    }

    #[test]
    fn pending_run_shows_script() {
        let mut app = App::new("diskpart");
        app.pending = Some(PendingRun {
            script: CommandScript::list_disks(),
            destination: Destination::DiskList,
        });
        let content = draw(&app);
        assert!(content.contains("Running diskpart..."));
        assert!(content.contains("list disk"));
    }

    #[test]
    fn all_screens_render_without_panic() {
        let screens = vec![
            Screen::main_menu(),
            Screen::list_disks(completed("a\n\nb", "", Some(0))),
            Screen::clean_disk(),
            Screen::create_partition(),
            Screen::result("Disk 1 Cleaned", completed("", "boom", None)),
        ];
        for screen in screens {
            let mut app = App::new("diskpart");
            app.stack.push(screen);
            draw(&app);
        }
    }

    #[test]
    fn help_renders_for_each_screen_variant() {
        let screens = vec![
            Screen::main_menu(),
            Screen::list_disks(completed("", "", Some(0))),
            Screen::clean_disk(),
            Screen::create_partition(),
            Screen::result("t", completed("", "", Some(0))),
        ];
        for screen in &screens {
            let _ = render_title(screen);
            let _ = render_help(screen, false);
            let _ = render_help(screen, true);
        }
    }
}
