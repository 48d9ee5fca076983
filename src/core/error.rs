//! TV-004: Error kinds surfaced to the execution entrypoint.
//!
//! Every variant is fatal for the invocation and maps to exit code 1.

use crate::convert::ConvertError;
use crate::policy::PolicyError;
use thiserror::Error;

/// Failure returned from the command pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// `--tf-version` carried a value outside the supported set.
    #[error("possible values for --tf-version flag are [{}], got: {got}", .supported.join(", "))]
    Configuration {
        got: String,
        supported: Vec<&'static str>,
    },

    /// A flag marked required was not supplied.
    #[error("required flag(s) {} not set", .flags.join(", "))]
    MissingRequiredFlag { flags: Vec<String> },

    /// Any other argument-parsing failure (unknown subcommand, bad flag).
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Failure surfaced from the converter or the policy engine, carried unchanged.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("convert: {0}")]
    Convert(#[from] ConvertError),

    #[error("validate: {0}")]
    Policy(#[from] PolicyError),
}

impl From<ConvertError> for Error {
    fn from(e: ConvertError) -> Self {
        Error::Collaborator(CollaboratorError::Convert(e))
    }
}

impl From<PolicyError> for Error {
    fn from(e: PolicyError) -> Self {
        Error::Collaborator(CollaboratorError::Policy(e))
    }
}
