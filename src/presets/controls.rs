//! UI control state → view configuration.
//!
//! This is the only place the `"all"` sentinel is understood. Dropdowns and
//! tabs set to `"all"` never turn into criteria.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::schema::PagePreset;
use crate::buckets::ISSUES_BUCKET;
use crate::filter::{Criterion, FilterSet, ALL_SENTINEL};
use crate::pipeline::{ViewConfig, ViewPipeline};
use crate::sort::ComparatorRegistry;

/// Current state of a page's search box, dropdowns, tag picker, tabs and
/// column headers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewControls {
    #[serde(default)]
    pub search: String,
    /// Facet key → selected value (`"all"` for none).
    #[serde(default)]
    pub facets: BTreeMap<String, String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab: Option<String>,
    /// Overrides the preset's default sort when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<crate::sort::SortSpec>,
}

impl ViewControls {
    pub fn with_search(mut self, query: &str) -> Self {
        self.search = query.to_string();
        self
    }

    pub fn with_facet(mut self, key: &str, value: &str) -> Self {
        self.facets.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_tab(mut self, tab: &str) -> Self {
        self.tab = Some(tab.to_string());
        self
    }
}

impl PagePreset {
    pub fn registry(&self) -> ComparatorRegistry {
        let mut registry = ComparatorRegistry::new();
        for key in &self.sort_keys {
            registry.register(&key.key, &key.field, key.kind);
        }
        registry
    }

    pub fn pipeline(&self) -> ViewPipeline {
        ViewPipeline::new(self.registry())
    }

    /// Build the view configuration for the given control state.
    pub fn build_config(&self, controls: &ViewControls) -> ViewConfig {
        let mut filters = FilterSet::new();
        filters.push(Criterion::search(self.search_fields.as_slice(), &controls.search));

        for (key, value) in &controls.facets {
            match self.facets.iter().find(|f| &f.key == key) {
                Some(facet) => {
                    filters.push(Criterion::equals_or_all(&facet.field, value));
                }
                None => log::warn!("Page '{}' has no facet '{}', ignoring", self.id, key),
            }
        }

        if !controls.tags.is_empty() {
            match self.tag_field.as_deref() {
                Some(field) => {
                    filters.push(Criterion::any_tag(field, controls.tags.as_slice()));
                }
                None => log::warn!("Page '{}' has no tag field, ignoring tag filter", self.id),
            }
        }

        if let Some(tab) = controls.tab.as_deref() {
            filters.push(self.tab_criterion(tab));
        }

        ViewConfig {
            filters,
            sort: controls
                .sort
                .clone()
                .unwrap_or_else(|| self.default_sort.clone()),
            metrics: self.metrics.clone(),
            buckets: self.buckets.clone(),
        }
    }

    fn tab_criterion(&self, tab: &str) -> Option<Criterion> {
        let tab = tab.trim();
        if tab.is_empty() || tab.eq_ignore_ascii_case(ALL_SENTINEL) {
            return None;
        }
        let Some(spec) = self.buckets.as_ref() else {
            log::warn!("Page '{}' has no tabs, ignoring tab '{}'", self.id, tab);
            return None;
        };
        if tab.eq_ignore_ascii_case(ISSUES_BUCKET) {
            return match spec.issues.as_ref() {
                Some(issues) => Some(Criterion::AnyOf {
                    criteria: issues.clone(),
                }),
                None => {
                    log::warn!("Page '{}' has no issues tab, ignoring it", self.id);
                    None
                }
            };
        }
        Criterion::equals_or_all(&spec.field, tab)
    }
}
