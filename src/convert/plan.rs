//! TV-007: Reading planned resources out of a plan document.
//!
//! Two layouts are understood:
//! - 0.12: `terraform show -json` output, `planned_values.root_module` with
//!   nested `child_modules`
//! - 0.11: legacy `modules[]` list with a `resources` map keyed by
//!   `type.name`, values under `primary.attributes`

use super::ConvertError;
use crate::core::version::TfVersion;
use indexmap::IndexMap;
use serde_json::Value;

/// One managed resource as it appears in the plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedResource {
    pub address: String,
    pub resource_type: String,
    pub name: String,
    pub values: IndexMap<String, Value>,
}

/// Extract managed resources from a parsed plan.
pub fn planned_resources(
    doc: &Value,
    version: TfVersion,
) -> Result<Vec<PlannedResource>, ConvertError> {
    match version {
        TfVersion::V0_11 => legacy_resources(doc),
        TfVersion::V0_12 => json_plan_resources(doc),
    }
}

fn layout(detail: impl Into<String>) -> ConvertError {
    ConvertError::UnexpectedLayout {
        detail: detail.into(),
    }
}

fn object(value: Option<&Value>) -> IndexMap<String, Value> {
    match value {
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        _ => IndexMap::new(),
    }
}

fn json_plan_resources(doc: &Value) -> Result<Vec<PlannedResource>, ConvertError> {
    let root = doc
        .get("planned_values")
        .and_then(|v| v.get("root_module"))
        .ok_or_else(|| layout("0.12 plan has no planned_values.root_module"))?;
    let mut out = Vec::new();
    collect_module(root, &mut out)?;
    Ok(out)
}

fn collect_module(module: &Value, out: &mut Vec<PlannedResource>) -> Result<(), ConvertError> {
    if let Some(resources) = module.get("resources") {
        let list = resources
            .as_array()
            .ok_or_else(|| layout("module resources must be a list"))?;
        for r in list {
            let mode = r.get("mode").and_then(Value::as_str).unwrap_or("managed");
            if mode != "managed" {
                continue;
            }
            let resource_type = r
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| layout("resource without a type"))?;
            let name = r.get("name").and_then(Value::as_str).unwrap_or_default();
            let address = r
                .get("address")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}.{}", resource_type, name));
            out.push(PlannedResource {
                address,
                resource_type: resource_type.to_string(),
                name: name.to_string(),
                values: object(r.get("values")),
            });
        }
    }

    if let Some(children) = module.get("child_modules").and_then(Value::as_array) {
        for child in children {
            collect_module(child, out)?;
        }
    }
    Ok(())
}

fn legacy_resources(doc: &Value) -> Result<Vec<PlannedResource>, ConvertError> {
    let modules = doc
        .get("modules")
        .and_then(Value::as_array)
        .ok_or_else(|| layout("0.11 plan has no modules list"))?;

    let mut out = Vec::new();
    for module in modules {
        // path[0] is always "root"
        let prefix: String = module
            .get("path")
            .and_then(Value::as_array)
            .map(|path| {
                path.iter()
                    .skip(1)
                    .filter_map(Value::as_str)
                    .map(|m| format!("module.{}.", m))
                    .collect()
            })
            .unwrap_or_default();

        let Some(resources) = module.get("resources").and_then(Value::as_object) else {
            continue;
        };
        for (key, r) in resources {
            if key.starts_with("data.") {
                continue;
            }
            let mut parts = key.splitn(2, '.');
            let key_type = parts.next().unwrap_or_default();
            let name = parts.next().unwrap_or(key_type);
            let resource_type = r
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or(key_type);
            let attributes = r.get("primary").and_then(|p| p.get("attributes"));
            out.push(PlannedResource {
                address: format!("{}{}", prefix, key),
                resource_type: resource_type.to_string(),
                name: name.to_string(),
                values: object(attributes),
            });
        }
    }
    Ok(out)
}
