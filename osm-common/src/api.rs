//! Server capabilities (`<api>`) and usage policy (`<policy>`).

use serde::{Deserialize, Serialize};

/// Limits and status reported by `capabilities`, or the version list of `versions`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename = "api")]
pub struct Api {
    /// Either `<version minimum maximum/>` or one `<version>0.6</version>` per supported version.
    #[serde(rename = "version", default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<ApiVersion>,
    /// Largest `map` request area in square degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Maximum<f64>>,
    /// Largest notes request area in square degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_area: Option<Maximum<f64>>,
    /// Trackpoints returned per page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracepoints: Option<Tracepoints>,
    /// Most nodes in one way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waynodes: Option<Maximum<u64>>,
    /// Most members in one relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationmembers: Option<Maximum<u64>>,
    /// Changeset limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changesets: Option<ChangesetLimits>,
    /// Notes query limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<QueryLimits>,
    /// Request timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Timeout>,
    /// Service status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceStatus>,
}

impl Api {
    /// Version strings listed by the `versions` endpoint.
    pub fn version_names(&self) -> Vec<String> {
        self.versions
            .iter()
            .filter_map(|v| v.name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// One `<version>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiVersion {
    /// Oldest supported version (capabilities form).
    #[serde(rename = "@minimum", default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<String>,
    /// Newest supported version (capabilities form).
    #[serde(rename = "@maximum", default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<String>,
    /// Version name (versions form).
    #[serde(rename = "$text", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An element carrying a `maximum` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Maximum<T> {
    /// The limit.
    #[serde(rename = "@maximum")]
    pub maximum: T,
}

/// `<tracepoints per_page=".."/>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tracepoints {
    /// Points per page.
    #[serde(rename = "@per_page")]
    pub per_page: u64,
}

/// `<changesets maximum_elements default_query_limit maximum_query_limit/>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChangesetLimits {
    /// Most elements in one changeset.
    #[serde(rename = "@maximum_elements", default, skip_serializing_if = "Option::is_none")]
    pub maximum_elements: Option<u64>,
    /// Results of a query without `limit`.
    #[serde(rename = "@default_query_limit", default, skip_serializing_if = "Option::is_none")]
    pub default_query_limit: Option<u64>,
    /// Largest accepted `limit`.
    #[serde(rename = "@maximum_query_limit", default, skip_serializing_if = "Option::is_none")]
    pub maximum_query_limit: Option<u64>,
}

/// `<notes default_query_limit maximum_query_limit/>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryLimits {
    /// Results of a query without `limit`.
    #[serde(rename = "@default_query_limit", default, skip_serializing_if = "Option::is_none")]
    pub default_query_limit: Option<u64>,
    /// Largest accepted `limit`.
    #[serde(rename = "@maximum_query_limit", default, skip_serializing_if = "Option::is_none")]
    pub maximum_query_limit: Option<u64>,
}

/// `<timeout seconds=".."/>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Timeout {
    /// Seconds.
    #[serde(rename = "@seconds")]
    pub seconds: u64,
}

/// `<status database api gpx/>`; each is `online`, `readonly` or `offline`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// Database.
    #[serde(rename = "@database", default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// API.
    #[serde(rename = "@api", default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
    /// Trace storage.
    #[serde(rename = "@gpx", default, skip_serializing_if = "Option::is_none")]
    pub gpx: Option<String>,
}

/// Usage policy sent along with the capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename = "policy")]
pub struct Policy {
    /// Imagery policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imagery: Option<Imagery>,
}

/// Imagery sources that must not be used for tracing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Imagery {
    /// Blacklisted URL patterns.
    #[serde(rename = "blacklist", default)]
    pub blacklist: Vec<Blacklist>,
}

/// `<blacklist regex=".."/>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blacklist {
    /// URL regular expression.
    #[serde(rename = "@regex")]
    pub regex: String,
}
