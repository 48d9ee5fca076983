//! TV-009: Constraint schema and per-asset evaluation.
//!
//! ```yaml
//! name: no-us-buckets
//! severity: high
//! match:
//!   asset_types: [storage.googleapis.com/Bucket]
//!   ancestries: ["organizations/123/**"]
//! deny:
//!   field: location
//!   values: [US]
//! message: US multi-region buckets are not allowed
//! ```

use crate::core::types::{Asset, Violation};
use serde::Deserialize;
use serde_json::Value;

/// A constraint as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct Constraint {
    pub name: String,

    #[serde(default)]
    pub severity: String,

    /// Which assets the constraint applies to (empty = all)
    #[serde(rename = "match", default)]
    pub target: Target,

    /// What makes a matching asset a violation
    #[serde(default)]
    pub deny: Deny,

    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub asset_types: Vec<String>,

    /// Glob patterns over the asset ancestry
    #[serde(default)]
    pub ancestries: Vec<String>,
}

/// Without a `field`, every matching asset is denied. With a `field`, the
/// asset is denied when the field is present and either `values` is empty or
/// the field's value is one of `values`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Deny {
    #[serde(default)]
    pub field: Option<String>,

    #[serde(default)]
    pub values: Vec<Value>,
}

/// A constraint with its ancestry patterns compiled.
#[derive(Debug, Clone)]
pub struct CompiledConstraint {
    pub constraint: Constraint,
    ancestries: Vec<glob::Pattern>,
}

impl CompiledConstraint {
    pub fn compile(constraint: Constraint) -> Result<Self, glob::PatternError> {
        let ancestries = constraint
            .target
            .ancestries
            .iter()
            .map(String::as_str)
            .map(glob::Pattern::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            constraint,
            ancestries,
        })
    }

    pub fn applies_to(&self, asset: &Asset) -> bool {
        let target = &self.constraint.target;
        let type_ok = target.asset_types.is_empty()
            || target.asset_types.iter().any(|t| t == &asset.asset_type);
        let ancestry_ok =
            self.ancestries.is_empty() || self.ancestries.iter().any(|p| p.matches(&asset.ancestry));
        type_ok && ancestry_ok
    }

    /// Evaluate one asset. `None` means no violation.
    pub fn evaluate(&self, asset: &Asset) -> Option<Violation> {
        if !self.applies_to(asset) {
            return None;
        }

        let deny = &self.constraint.deny;
        let detail = match &deny.field {
            None => format!("{} is not allowed", asset.asset_type),
            Some(field) => {
                let actual = scalar_text(asset.field(field)?)?;
                let denied = deny.values.is_empty()
                    || deny.values.iter().filter_map(scalar_text).any(|v| v == actual);
                if !denied {
                    return None;
                }
                format!("{} = {} is not allowed", field, actual)
            }
        };

        Some(Violation {
            constraint: self.constraint.name.clone(),
            resource: asset.name.clone(),
            message: self.constraint.message.clone().unwrap_or(detail),
            severity: self.constraint.severity.clone(),
        })
    }
}

/// Plan values from 0.11 plans are strings, so compare textual forms.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
