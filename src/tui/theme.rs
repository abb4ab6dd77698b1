//! TUI color semantics and style constants.
//!
//! Color semantics:
//! - Green: tool output, success
//! - Yellow: stderr, warnings
//! - Red: errors, destructive actions (clean)
//! - Cyan: interactive elements (focus, keybinding hints)
//! - Dim: de-emphasized (placeholders, footer)

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// SEMANTIC STYLES
// ============================================================================

/// Tool output / success — green.
pub const STYLE_OUTPUT: Style = Style::new().fg(Color::Green);

/// Warning / stderr — yellow.
pub const STYLE_WARNING: Style = Style::new().fg(Color::Yellow);

/// Errors and destructive actions — red.
pub const STYLE_DANGER: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);

/// Interactive element / keybinding hint — cyan.
pub const STYLE_INTERACTIVE: Style = Style::new().fg(Color::Cyan);

/// De-emphasized text — dark gray.
pub const STYLE_DIM: Style = Style::new().fg(Color::DarkGray);

// ============================================================================
// UI ELEMENT STYLES
// ============================================================================

/// Title bar.
pub const STYLE_TITLE: Style = Style::new()
    .fg(Color::White)
    .bg(Color::Rgb(0x22, 0x22, 0x22))
    .add_modifier(Modifier::BOLD);

/// Heading inside the body.
pub const STYLE_HEADING: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

/// Author credit on the main menu.
pub const STYLE_AUTHOR: Style = Style::new().fg(Color::Gray).add_modifier(Modifier::ITALIC);

/// Button under the cursor.
pub const STYLE_FOCUSED: Style = Style::new().fg(Color::White).bg(Color::Rgb(0x00, 0x33, 0x66));

/// Border of the focused input field.
pub const STYLE_FOCUSED_BORDER: Style = Style::new().fg(Color::Cyan);

/// Footer / help line.
pub const STYLE_HELP: Style = Style::new().fg(Color::DarkGray);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_styles_have_expected_colors() {
        assert_eq!(STYLE_OUTPUT.fg, Some(Color::Green));
        assert_eq!(STYLE_WARNING.fg, Some(Color::Yellow));
        assert_eq!(STYLE_DANGER.fg, Some(Color::Red));
        assert_eq!(STYLE_INTERACTIVE.fg, Some(Color::Cyan));
        assert_eq!(STYLE_DIM.fg, Some(Color::DarkGray));
    }

    #[test]
    fn focused_button_has_background() {
        assert!(STYLE_FOCUSED.bg.is_some());
    }
}
