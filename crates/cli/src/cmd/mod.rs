//! CLI command implementations

pub mod enabled;
pub mod export;
pub mod info;
pub mod run;
