//! TV-006: Supported resource table and asset-name templates.
//!
//! Each Terraform resource type maps to one asset type plus a name template.
//! Templates use `{attr}` placeholders filled from the planned values;
//! `{project}` resolves through the project override chain.

/// How one Terraform resource type becomes an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceMapping {
    pub terraform_type: &'static str,
    pub asset_type: &'static str,
    pub name_template: &'static str,
    /// Attribute holding the owning project for this resource type
    pub project_attribute: &'static str,
}

const fn mapping(
    terraform_type: &'static str,
    asset_type: &'static str,
    name_template: &'static str,
) -> ResourceMapping {
    ResourceMapping {
        terraform_type,
        asset_type,
        name_template,
        project_attribute: "project",
    }
}

/// Sorted by Terraform type.
pub const MAPPINGS: &[ResourceMapping] = &[
    mapping(
        "google_bigquery_dataset",
        "bigquery.googleapis.com/Dataset",
        "//bigquery.googleapis.com/projects/{project}/datasets/{dataset_id}",
    ),
    mapping(
        "google_compute_disk",
        "compute.googleapis.com/Disk",
        "//compute.googleapis.com/projects/{project}/zones/{zone}/disks/{name}",
    ),
    mapping(
        "google_compute_firewall",
        "compute.googleapis.com/Firewall",
        "//compute.googleapis.com/projects/{project}/global/firewalls/{name}",
    ),
    mapping(
        "google_compute_instance",
        "compute.googleapis.com/Instance",
        "//compute.googleapis.com/projects/{project}/zones/{zone}/instances/{name}",
    ),
    mapping(
        "google_compute_network",
        "compute.googleapis.com/Network",
        "//compute.googleapis.com/projects/{project}/global/networks/{name}",
    ),
    mapping(
        "google_compute_subnetwork",
        "compute.googleapis.com/Subnetwork",
        "//compute.googleapis.com/projects/{project}/regions/{region}/subnetworks/{name}",
    ),
    mapping(
        "google_container_cluster",
        "container.googleapis.com/Cluster",
        "//container.googleapis.com/projects/{project}/locations/{location}/clusters/{name}",
    ),
    ResourceMapping {
        terraform_type: "google_project",
        asset_type: "cloudresourcemanager.googleapis.com/Project",
        name_template: "//cloudresourcemanager.googleapis.com/projects/{project}",
        project_attribute: "project_id",
    },
    mapping(
        "google_pubsub_subscription",
        "pubsub.googleapis.com/Subscription",
        "//pubsub.googleapis.com/projects/{project}/subscriptions/{name}",
    ),
    mapping(
        "google_pubsub_topic",
        "pubsub.googleapis.com/Topic",
        "//pubsub.googleapis.com/projects/{project}/topics/{name}",
    ),
    mapping(
        "google_sql_database_instance",
        "sqladmin.googleapis.com/Instance",
        "//cloudsql.googleapis.com/projects/{project}/instances/{name}",
    ),
    mapping(
        "google_storage_bucket",
        "storage.googleapis.com/Bucket",
        "//storage.googleapis.com/{name}",
    ),
];

/// Find the mapping for a Terraform resource type.
pub fn lookup(terraform_type: &str) -> Option<&'static ResourceMapping> {
    MAPPINGS
        .binary_search_by(|m| m.terraform_type.cmp(terraform_type))
        .ok()
        .map(|i| &MAPPINGS[i])
}

/// All supported Terraform resource types, sorted.
pub fn supported_types() -> Vec<&'static str> {
    MAPPINGS.iter().map(|m| m.terraform_type).collect()
}

/// Fill `{attr}` placeholders. Returns the first unresolved attribute on failure.
pub fn expand_template<F>(template: &str, resolve: F) -> Result<String, String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            // Unterminated placeholder: keep the remainder literally
            out.push_str(&rest[start..]);
            return Ok(out);
        };
        let key = &after[..end];
        let value = resolve(key).ok_or_else(|| key.to_string())?;
        out.push_str(&value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
