//! TV-003: Collaborator seams consumed by the subcommand handlers.

use crate::convert::ConvertError;
use crate::core::types::{Asset, Overrides, Violation};
use crate::core::version::TfVersion;
use crate::policy::PolicyError;
use std::path::Path;

/// Turns a plan file into canonical assets.
#[cfg_attr(test, mockall::automock)]
pub trait Converter {
    fn convert(
        &self,
        plan: &Path,
        version: TfVersion,
        overrides: &Overrides,
    ) -> Result<Vec<Asset>, ConvertError>;
}

/// Evaluates assets against the policies found under a directory.
#[cfg_attr(test, mockall::automock)]
pub trait PolicyEngine {
    fn validate(&self, assets: &[Asset], policy_path: &Path) -> Result<Vec<Violation>, PolicyError>;
}

/// Lists the Terraform resource types the converter understands.
#[cfg_attr(test, mockall::automock)]
pub trait ResourceCatalog {
    fn supported_resources(&self) -> Vec<String>;
}

/// The collaborators a single invocation may call.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub converter: &'a dyn Converter,
    pub engine: &'a dyn PolicyEngine,
    pub catalog: &'a dyn ResourceCatalog,
}
