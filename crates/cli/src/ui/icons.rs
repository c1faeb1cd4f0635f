//! Status markers for terminal output

/// Marker constants
pub struct Icons;

impl Icons {
    pub const STATUS_SUCCESS: &'static str = "[OK]";
    pub const STATUS_WARNING: &'static str = "[!]";
    pub const STATUS_ERROR: &'static str = "[X]";
    pub const STATUS_SKIPPED: &'static str = "[-]";
    pub const STATUS_HOOK: &'static str = "[*]";
}

/// Status icon type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    Success,
    Warning,
    Error,
    Skipped,
    Hook,
}

impl StatusIcon {
    /// Text marker for this status
    pub fn get(self) -> &'static str {
        match self {
            Self::Success => Icons::STATUS_SUCCESS,
            Self::Warning => Icons::STATUS_WARNING,
            Self::Error => Icons::STATUS_ERROR,
            Self::Skipped => Icons::STATUS_SKIPPED,
            Self::Hook => Icons::STATUS_HOOK,
        }
    }
}
