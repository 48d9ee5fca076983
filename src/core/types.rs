//! TV-001: Shared types exchanged with the collaborators.
//!
//! Assets are the canonical, provider-agnostic form of a planned resource;
//! violations are what the policy engine reports back about them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// Conversion input
// ============================================================================

/// User-supplied overrides applied while converting a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Provider default project; a resource's own `project` attribute wins.
    pub project: Option<String>,

    /// Ancestry path prefix (e.g. `organizations/123/folders/456`).
    pub ancestry: Option<String>,
}

// ============================================================================
// Assets
// ============================================================================

/// A planned resource in canonical asset form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Full resource name, e.g. `//compute.googleapis.com/projects/p/zones/z/instances/vm`
    pub name: String,

    /// Asset type, e.g. `compute.googleapis.com/Instance`
    pub asset_type: String,

    /// Ancestry path ending in the owning project
    #[serde(default)]
    pub ancestry: String,

    /// Resource body as planned
    pub resource: AssetResource,
}

/// The planned resource body attached to an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetResource {
    /// Terraform address the asset came from (e.g. `module.net.google_compute_network.main`)
    pub address: String,

    /// Planned attribute values, in plan order
    #[serde(default)]
    pub data: IndexMap<String, serde_json::Value>,
}

impl Asset {
    /// Look up a dotted path (`a.b.c`) inside the resource data.
    pub fn field(&self, path: &str) -> Option<&serde_json::Value> {
        let mut parts = path.split('.');
        let mut current = self.resource.data.get(parts.next()?)?;
        for part in parts {
            current = match current {
                serde_json::Value::Object(map) => map.get(part)?,
                serde_json::Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

// ============================================================================
// Violations
// ============================================================================

/// A single policy violation reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Name of the constraint that fired
    pub constraint: String,

    /// Asset name the violation applies to
    pub resource: String,

    /// Human-readable explanation
    pub message: String,

    /// Constraint severity (free-form: `high`, `medium`, ...)
    #[serde(default)]
    pub severity: String,
}
