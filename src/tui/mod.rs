//! TUI module for the interactive terminal interface.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: Pure data types (Screen, ScreenStack, Action, Transition)
//! - `update`: Pure transitions over the active screen
//! - `view`: Pure rendering
//! - `run`: Effects (terminal, key reader, script worker)

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;

pub use run::run;
