//! TV-001: Resolved settings for one invocation.
//!
//! Built once after the version has been negotiated, then only borrowed.

use super::types::Overrides;
use super::version::TfVersion;
use std::path::PathBuf;

/// Everything the selected handler may read.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Diagnostics are routed to stderr only when set
    pub verbose: bool,

    /// Negotiated plan format
    pub tf_version: TfVersion,

    /// Selected subcommand and its flags
    pub command: Command,
}

/// Per-subcommand settings groups.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Convert(ConvertSettings),
    Validate(ValidateSettings),
    ListSupportedResources,
    Version,
}

impl Command {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Convert(_) => "convert",
            Command::Validate(_) => "validate",
            Command::ListSupportedResources => "list-supported-resources",
            Command::Version => "version",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertSettings {
    pub plan: PathBuf,
    pub overrides: Overrides,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidateSettings {
    pub plan: PathBuf,
    pub overrides: Overrides,
    pub policy_path: PathBuf,
    pub output_json: bool,
}

/// Treat an empty flag value the same as an absent one.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
