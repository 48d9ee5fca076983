//! TV-002: Plan-format version negotiation.
//!
//! Resolves the raw `--tf-version` flag into a closed [`TfVersion`]:
//! - a supported token is accepted unchanged
//! - an absent or empty value falls back to [`TfVersion::DEFAULT`] with a warning
//! - anything else is a configuration error

use super::error::Error;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Terraform plan format the converter should expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TfVersion {
    #[serde(rename = "0.11")]
    V0_11,
    #[serde(rename = "0.12")]
    V0_12,
}

impl TfVersion {
    /// Every version this build understands, in flag-help order.
    pub const SUPPORTED: [TfVersion; 2] = [TfVersion::V0_11, TfVersion::V0_12];

    /// Used when `--tf-version` is not given.
    pub const DEFAULT: TfVersion = TfVersion::V0_11;

    pub fn as_str(self) -> &'static str {
        match self {
            TfVersion::V0_11 => "0.11",
            TfVersion::V0_12 => "0.12",
        }
    }

    pub fn supported_tokens() -> Vec<&'static str> {
        Self::SUPPORTED.iter().map(|v| v.as_str()).collect()
    }
}

impl fmt::Display for TfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TfVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TfVersion::SUPPORTED
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| Error::Configuration {
                got: s.to_string(),
                supported: TfVersion::supported_tokens(),
            })
    }
}

/// Outcome of a successful negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Negotiated {
    /// The flag named a supported version.
    Accepted(TfVersion),
    /// The flag was absent or empty and the default was substituted.
    Defaulted(TfVersion),
}

impl Negotiated {
    pub fn version(self) -> TfVersion {
        match self {
            Negotiated::Accepted(v) | Negotiated::Defaulted(v) => v,
        }
    }
}

/// Negotiate the raw flag value. Must run before any subcommand handler.
pub fn negotiate(raw: Option<&str>) -> Result<Negotiated, Error> {
    match raw {
        None | Some("") => {
            let version = TfVersion::DEFAULT;
            tracing::warn!(
                "--tf-version flag not defined, using default value: {}",
                version
            );
            Ok(Negotiated::Defaulted(version))
        }
        Some(token) => token.parse().map(Negotiated::Accepted),
    }
}
