use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::aggregate::SummaryMetric;
use crate::buckets::BucketSpec;
use crate::error::ViewError;
use crate::sort::{SortKind, SortSpec};

/// A page preset: the declarative filter, sort and summary configuration
/// for one dashboard page (sales channels, CRM customers, deals, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagePreset {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Fields the search box matches against.
    pub search_fields: Vec<String>,
    /// Dropdown filters. Control key → record field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<PresetFacet>,
    /// List field used by the tag picker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_field: Option<String>,
    pub sort_keys: Vec<PresetSortKey>,
    #[serde(default)]
    pub default_sort: SortSpec,
    #[serde(default)]
    pub metrics: Vec<SummaryMetric>,
    /// Tab strip. Absent when the page has no tabs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buckets: Option<BucketSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresetFacet {
    pub key: String,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresetSortKey {
    pub key: String,
    pub field: String,
    pub kind: SortKind,
}

/// JSON Schema for custom preset files.
pub fn preset_schema() -> Result<serde_json::Value, ViewError> {
    let schema = schemars::schema_for!(PagePreset);
    Ok(serde_json::to_value(schema)?)
}

/// What `opsdeck list` shows for a preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetSummary {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<&PagePreset> for PresetSummary {
    fn from(preset: &PagePreset) -> Self {
        PresetSummary {
            id: preset.id.clone(),
            name: preset.name.clone(),
            description: preset.description.clone(),
        }
    }
}
