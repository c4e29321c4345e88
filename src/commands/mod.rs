//! Command implementations for the rulekit CLI

pub mod completions;
pub mod install;
pub mod platforms;
pub mod version;
