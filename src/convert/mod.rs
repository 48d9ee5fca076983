//! TV-008: Plan-to-asset conversion.
//!
//! [`PlanConverter`] is the built-in [`Converter`]: it reads a JSON plan,
//! keeps the resource types listed in [`resources::MAPPINGS`], and skips the
//! rest with a warning.

pub mod plan;
pub mod resources;

use crate::collab::{Converter, ResourceCatalog};
use crate::core::types::{Asset, AssetResource, Overrides};
use crate::core::version::TfVersion;
use plan::PlannedResource;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Conversion failure.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("cannot read plan {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid plan JSON {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected plan layout: {detail}")]
    UnexpectedLayout { detail: String },

    #[error("resource '{address}' has no '{attribute}' attribute (needed for the asset name)")]
    MissingAttribute { address: String, attribute: String },
}

/// Converter backed by the static resource table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanConverter;

impl PlanConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert an already-parsed plan document.
    pub fn convert_document(
        &self,
        doc: &Value,
        version: TfVersion,
        overrides: &Overrides,
    ) -> Result<Vec<Asset>, ConvertError> {
        let planned = plan::planned_resources(doc, version)?;
        let total = planned.len();
        let mut assets = Vec::with_capacity(total);
        for resource in planned {
            if let Some(asset) = to_asset(resource, overrides)? {
                assets.push(asset);
            }
        }
        tracing::debug!(
            "converted {} of {} planned resources (format {})",
            assets.len(),
            total,
            version
        );
        Ok(assets)
    }
}

impl Converter for PlanConverter {
    fn convert(
        &self,
        plan: &Path,
        version: TfVersion,
        overrides: &Overrides,
    ) -> Result<Vec<Asset>, ConvertError> {
        let content = std::fs::read_to_string(plan).map_err(|source| ConvertError::Read {
            path: plan.to_path_buf(),
            source,
        })?;
        let doc: Value = serde_json::from_str(&content).map_err(|source| ConvertError::Parse {
            path: plan.to_path_buf(),
            source,
        })?;
        self.convert_document(&doc, version, overrides)
    }
}

impl ResourceCatalog for PlanConverter {
    fn supported_resources(&self) -> Vec<String> {
        resources::supported_types()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Render a scalar plan value for use in a name template.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn to_asset(
    resource: PlannedResource,
    overrides: &Overrides,
) -> Result<Option<Asset>, ConvertError> {
    let Some(mapping) = resources::lookup(&resource.resource_type) else {
        tracing::warn!(
            "unsupported resource {} ({}), skipping",
            resource.address,
            resource.resource_type
        );
        return Ok(None);
    };

    let project = resource
        .values
        .get(mapping.project_attribute)
        .and_then(scalar_text)
        .or_else(|| overrides.project.clone().filter(|p| !p.is_empty()));

    let name = resources::expand_template(mapping.name_template, |key| {
        if key == "project" {
            return project.clone();
        }
        resource.values.get(key).and_then(scalar_text)
    })
    .map_err(|attribute| ConvertError::MissingAttribute {
        address: resource.address.clone(),
        attribute,
    })?;

    Ok(Some(Asset {
        name,
        asset_type: mapping.asset_type.to_string(),
        ancestry: ancestry_for(project.as_deref(), overrides.ancestry.as_deref()),
        resource: AssetResource {
            address: resource.address,
            data: resource.values,
        },
    }))
}

fn ancestry_for(project: Option<&str>, ancestry: Option<&str>) -> String {
    let ancestry = ancestry
        .map(|a| a.trim_end_matches('/'))
        .filter(|a| !a.is_empty());
    match (ancestry, project) {
        (Some(a), Some(p)) => format!("{}/projects/{}", a, p),
        (Some(a), None) => a.to_string(),
        (None, Some(p)) => format!("projects/{}", p),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan_012(resources: Value) -> Value {
        json!({"planned_values": {"root_module": {"resources": resources}}})
    }

    fn overrides(project: Option<&str>, ancestry: Option<&str>) -> Overrides {
        Overrides {
            project: project.map(str::to_string),
            ancestry: ancestry.map(str::to_string),
        }
    }

    #[test]
    fn test_tv008_converts_supported_resource() {
        let doc = plan_012(json!([{
            "address": "google_compute_instance.vm", "mode": "managed",
            "type": "google_compute_instance", "name": "vm",
            "values": {"name": "web-1", "zone": "us-central1-a", "project": "acme-prod"}
        }]));
        let assets = PlanConverter::new()
            .convert_document(&doc, TfVersion::V0_12, &Overrides::default())
            .unwrap();
        assert_eq!(assets.len(), 1);
        let a = &assets[0];
        assert_eq!(
            a.name,
            "//compute.googleapis.com/projects/acme-prod/zones/us-central1-a/instances/web-1"
        );
        assert_eq!(a.asset_type, "compute.googleapis.com/Instance");
        assert_eq!(a.ancestry, "projects/acme-prod");
        assert_eq!(a.resource.address, "google_compute_instance.vm");
    }

    #[test]
    fn test_tv008_project_override_fills_missing_project() {
        let doc = plan_012(json!([{
            "type": "google_pubsub_topic", "name": "events", "mode": "managed",
            "values": {"name": "events"}
        }]));
        let assets = PlanConverter::new()
            .convert_document(
                &doc,
                TfVersion::V0_12,
                &overrides(Some("fallback"), Some("organizations/1/folders/2/")),
            )
            .unwrap();
        assert_eq!(assets[0].name, "//pubsub.googleapis.com/projects/fallback/topics/events");
        assert_eq!(assets[0].ancestry, "organizations/1/folders/2/projects/fallback");
        assert_eq!(assets[0].resource.address, "google_pubsub_topic.events");
    }

    #[test]
    fn test_tv008_resource_project_wins_over_override() {
        let doc = plan_012(json!([{
            "type": "google_pubsub_topic", "name": "t", "mode": "managed",
            "values": {"name": "t", "project": "own"}
        }]));
        let assets = PlanConverter::new()
            .convert_document(&doc, TfVersion::V0_12, &overrides(Some("other"), None))
            .unwrap();
        assert_eq!(assets[0].ancestry, "projects/own");
    }

    #[test]
    fn test_tv008_google_project_uses_project_id() {
        let doc = plan_012(json!([{
            "type": "google_project", "name": "p", "mode": "managed",
            "values": {"project_id": "new-proj", "name": "New"}
        }]));
        let assets = PlanConverter::new()
            .convert_document(&doc, TfVersion::V0_12, &overrides(None, Some("organizations/9")))
            .unwrap();
        assert_eq!(assets[0].name, "//cloudresourcemanager.googleapis.com/projects/new-proj");
        assert_eq!(assets[0].ancestry, "organizations/9/projects/new-proj");
    }

    #[test]
    fn test_tv008_unsupported_resources_skipped() {
        let doc = plan_012(json!([
            {"type": "aws_s3_bucket", "name": "x", "mode": "managed", "values": {}},
            {"type": "google_storage_bucket", "name": "b", "mode": "managed",
             "values": {"name": "b1"}}
        ]));
        let assets = PlanConverter::new()
            .convert_document(&doc, TfVersion::V0_12, &Overrides::default())
            .unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].name, "//storage.googleapis.com/b1");
        assert_eq!(assets[0].ancestry, "");
    }

    #[test]
    fn test_tv008_missing_attribute_is_error() {
        let doc = plan_012(json!([{
            "address": "google_compute_disk.d", "type": "google_compute_disk",
            "name": "d", "mode": "managed", "values": {"name": "d1", "project": "p"}
        }]));
        let err = PlanConverter::new()
            .convert_document(&doc, TfVersion::V0_12, &Overrides::default())
            .unwrap_err();
        match err {
            ConvertError::MissingAttribute { address, attribute } => {
                assert_eq!(address, "google_compute_disk.d");
                assert_eq!(attribute, "zone");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tv008_missing_project_without_override() {
        let doc = plan_012(json!([{
            "type": "google_compute_network", "name": "n", "mode": "managed",
            "values": {"name": "n"}
        }]));
        let err = PlanConverter::new()
            .convert_document(&doc, TfVersion::V0_12, &Overrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("'project'"));
    }

    #[test]
    fn test_tv008_legacy_plan_conversion() {
        let doc = json!({"modules": [{"path": ["root"], "resources": {
            "google_compute_firewall.ssh": {
                "type": "google_compute_firewall",
                "primary": {"attributes": {"name": "allow-ssh", "project": "legacy"}}
            }
        }}]});
        let assets = PlanConverter::new()
            .convert_document(&doc, TfVersion::V0_11, &Overrides::default())
            .unwrap();
        assert_eq!(
            assets[0].name,
            "//compute.googleapis.com/projects/legacy/global/firewalls/allow-ssh"
        );
    }

    #[test]
    fn test_tv008_convert_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(
            &path,
            r#"{"planned_values": {"root_module": {"resources": [
                {"type": "google_storage_bucket", "name": "b", "mode": "managed",
                 "values": {"name": "from-file"}}
            ]}}}"#,
        )
        .unwrap();
        let assets = PlanConverter::new()
            .convert(&path, TfVersion::V0_12, &Overrides::default())
            .unwrap();
        assert_eq!(assets[0].name, "//storage.googleapis.com/from-file");
    }

    #[test]
    fn test_tv008_convert_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlanConverter::new()
            .convert(&dir.path().join("nope.json"), TfVersion::V0_12, &Overrides::default())
            .unwrap_err();
        assert!(matches!(err, ConvertError::Read { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_tv008_convert_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(&path, "not json").unwrap();
        let err = PlanConverter::new()
            .convert(&path, TfVersion::V0_12, &Overrides::default())
            .unwrap_err();
        assert!(matches!(err, ConvertError::Parse { .. }));
    }

    #[test]
    fn test_tv008_catalog_lists_mappings() {
        let listed = PlanConverter::new().supported_resources();
        assert_eq!(listed.len(), resources::MAPPINGS.len());
        assert!(listed.contains(&"google_storage_bucket".to_string()));
    }
}
