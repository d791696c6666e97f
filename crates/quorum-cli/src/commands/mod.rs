//! CLI command handlers

pub mod common;
pub mod labels;
pub mod permissions;
