//! Terminal output for bosun
//!
//! - Status markers
//! - Color theme honoring the `ansi-colors` setting
//! - Progress reporting for hook runs

pub mod icons;
pub mod reporter;
pub mod theme;

pub use icons::{Icons, StatusIcon};
pub use reporter::TerminalReporter;
pub use theme::Theme;
