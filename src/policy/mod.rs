//! TV-010: Directory-backed policy engine.
//!
//! Loads every `*.yaml` / `*.yml` constraint below the policy path (sorted by
//! path) and reports one violation per (constraint, asset) hit.

pub mod constraint;

use crate::collab::PolicyEngine;
use crate::core::types::{Asset, Violation};
use constraint::{CompiledConstraint, Constraint};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Policy loading failure.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("policy path {} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid constraint {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("invalid constraint {}: {detail}", .path.display())]
    InvalidConstraint { path: PathBuf, detail: String },

    #[error("no constraints found in {}", .path.display())]
    NoConstraints { path: PathBuf },
}

/// Stateless engine; constraints are reloaded on each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintLibrary;

impl ConstraintLibrary {
    pub fn new() -> Self {
        Self
    }

    /// Load and compile all constraints under `policy_path`.
    pub fn load(&self, policy_path: &Path) -> Result<Vec<CompiledConstraint>, PolicyError> {
        if !policy_path.is_dir() {
            return Err(PolicyError::NotADirectory {
                path: policy_path.to_path_buf(),
            });
        }

        let files = constraint_files(policy_path)?;
        let mut constraints = Vec::with_capacity(files.len());
        for file in files {
            let content = std::fs::read_to_string(&file).map_err(|source| PolicyError::Read {
                path: file.clone(),
                source,
            })?;
            let parsed: Constraint =
                serde_yaml_ng::from_str(&content).map_err(|source| PolicyError::Parse {
                    path: file.clone(),
                    source,
                })?;
            if parsed.name.is_empty() {
                return Err(PolicyError::InvalidConstraint {
                    path: file,
                    detail: "name must not be empty".to_string(),
                });
            }
            let compiled = CompiledConstraint::compile(parsed).map_err(|e| {
                PolicyError::InvalidConstraint {
                    path: file.clone(),
                    detail: format!("bad ancestry pattern: {}", e),
                }
            })?;
            tracing::debug!("loaded constraint {} from {}", compiled.constraint.name, file.display());
            constraints.push(compiled);
        }

        if constraints.is_empty() {
            return Err(PolicyError::NoConstraints {
                path: policy_path.to_path_buf(),
            });
        }
        Ok(constraints)
    }
}

/// Recursively find constraint files, sorted for deterministic output.
fn constraint_files(dir: &Path) -> Result<Vec<PathBuf>, PolicyError> {
    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let mut files = Vec::new();
    for ext in ["yaml", "yml"] {
        let pattern = format!("{}/**/*.{}", base, ext);
        let entries = glob::glob(&pattern).map_err(|e| PolicyError::InvalidConstraint {
            path: dir.to_path_buf(),
            detail: e.to_string(),
        })?;
        for entry in entries {
            let path = entry.map_err(|e| PolicyError::Read {
                path: e.path().to_path_buf(),
                source: e.into_error(),
            })?;
            if path.is_file() {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

impl PolicyEngine for ConstraintLibrary {
    fn validate(&self, assets: &[Asset], policy_path: &Path) -> Result<Vec<Violation>, PolicyError> {
        let constraints = self.load(policy_path)?;
        let violations: Vec<Violation> = constraints
            .iter()
            .flat_map(|c| assets.iter().filter_map(move |a| c.evaluate(a)))
            .collect();
        tracing::debug!(
            "{} constraint(s) x {} asset(s): {} violation(s)",
            constraints.len(),
            assets.len(),
            violations.len()
        );
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AssetResource;
    use serde_json::json;

    fn asset(asset_type: &str, name: &str, location: &str) -> Asset {
        let mut data = indexmap::IndexMap::new();
        data.insert("location".to_string(), json!(location));
        Asset {
            name: name.to_string(),
            asset_type: asset_type.to_string(),
            ancestry: "projects/p".to_string(),
            resource: AssetResource {
                address: "x.y".to_string(),
                data,
            },
        }
    }

    fn write_policy(dir: &Path, rel: &str, yaml: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, yaml).unwrap();
    }

    #[test]
    fn test_tv010_validate_reports_violations() {
        let dir = tempfile::tempdir().unwrap();
        write_policy(
            dir.path(),
            "a_buckets.yaml",
            "name: no-us\nmatch:\n  asset_types: [storage.googleapis.com/Bucket]\ndeny:\n  field: location\n  values: [US]\n",
        );
        write_policy(
            dir.path(),
            "nested/b_instances.yml",
            "name: no-instances\nmatch:\n  asset_types: [compute.googleapis.com/Instance]\n",
        );
        let assets = vec![
            asset("storage.googleapis.com/Bucket", "//storage.googleapis.com/us", "US"),
            asset("storage.googleapis.com/Bucket", "//storage.googleapis.com/eu", "EU"),
            asset("compute.googleapis.com/Instance", "//compute/vm", "us-east1-b"),
        ];
        let violations = ConstraintLibrary::new().validate(&assets, dir.path()).unwrap();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].constraint, "no-us");
        assert_eq!(violations[0].resource, "//storage.googleapis.com/us");
        assert_eq!(violations[1].constraint, "no-instances");
    }

    #[test]
    fn test_tv010_no_violations() {
        let dir = tempfile::tempdir().unwrap();
        write_policy(dir.path(), "c.yaml", "name: no-instances\nmatch:\n  asset_types: [compute.googleapis.com/Instance]\n");
        let assets = vec![asset("storage.googleapis.com/Bucket", "b", "US")];
        assert!(ConstraintLibrary::new().validate(&assets, dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_tv010_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README.md"), "not a policy").unwrap();
        let err = ConstraintLibrary::new().validate(&[], dir.path()).unwrap_err();
        assert!(matches!(err, PolicyError::NoConstraints { .. }));
    }

    #[test]
    fn test_tv010_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConstraintLibrary::new()
            .validate(&[], &dir.path().join("absent"))
            .unwrap_err();
        assert!(matches!(err, PolicyError::NotADirectory { .. }));
    }

    #[test]
    fn test_tv010_unparsable_constraint() {
        let dir = tempfile::tempdir().unwrap();
        write_policy(dir.path(), "bad.yaml", "name: [unterminated\n");
        let err = ConstraintLibrary::new().load(dir.path()).unwrap_err();
        assert!(matches!(err, PolicyError::Parse { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_tv010_empty_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_policy(dir.path(), "anon.yaml", "name: \"\"\n");
        let err = ConstraintLibrary::new().load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("name must not be empty"));
    }

    #[test]
    fn test_tv010_load_order_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_policy(dir.path(), "z.yaml", "name: zeta\n");
        write_policy(dir.path(), "a.yml", "name: alpha\n");
        write_policy(dir.path(), "m/m.yaml", "name: mid\n");
        let names: Vec<_> = ConstraintLibrary::new()
            .load(dir.path())
            .unwrap()
            .into_iter()
            .map(|c| c.constraint.name)
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }
}
