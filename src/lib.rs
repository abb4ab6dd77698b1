//! diskpart-tui: interactive terminal front-end for diskpart.

pub mod error;
pub mod executor;
pub mod logging;
pub mod script;
pub mod tui;
