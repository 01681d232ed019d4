mod args;
pub mod commands;

pub use args::{Cli, ComplianceHostCommand, ResourceCommand};
