//! CLI subcommand implementations.

pub mod check;
pub mod insights;
pub mod log;
pub mod mood;
pub mod patterns;
pub mod predict;
pub mod scan_menu;
pub mod sensitivity;
pub mod status;
pub mod summary;
pub mod util;
