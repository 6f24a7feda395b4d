//! Command implementations

pub mod assess;
pub mod completions;
pub mod config;
pub mod init;
pub mod project;
pub mod report;
pub mod score;
pub mod section;
pub mod span;
