use std::collections::HashSet;

use super::embedded;
use super::schema::{PagePreset, PresetSummary};
use crate::error::ViewError;

/// Load an embedded preset by page ID.
pub fn load_preset(page: &str) -> Result<PagePreset, ViewError> {
    if let Some(json) = embedded::get_embedded(page) {
        return serde_json::from_str(json).map_err(|e| {
            ViewError::Preset(format!("Failed to parse embedded preset '{}': {}", page, e))
        });
    }
    Err(ViewError::Preset(format!("Unknown preset page: {}", page)))
}

/// Load a custom preset from a file path.
pub fn load_custom_preset(path: &std::path::Path) -> Result<PagePreset, ViewError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ViewError::Preset(format!("Failed to read preset file: {}", e)))?;
    let preset: PagePreset = serde_json::from_str(&content)
        .map_err(|e| ViewError::Preset(format!("Failed to parse preset: {}", e)))?;
    validate_preset(&preset)?;
    Ok(preset)
}

/// Validate a preset has required fields and consistent keys.
pub fn validate_preset(preset: &PagePreset) -> Result<(), ViewError> {
    if preset.id.is_empty() {
        return Err(ViewError::Preset("Preset id is required".into()));
    }
    if preset.name.is_empty() {
        return Err(ViewError::Preset("Preset name is required".into()));
    }

    let mut sort_keys = HashSet::new();
    for key in &preset.sort_keys {
        if key.key.is_empty() || key.field.is_empty() {
            return Err(ViewError::Preset(format!(
                "Sort key in '{}' needs a key and a field",
                preset.id
            )));
        }
        if !sort_keys.insert(key.key.as_str()) {
            return Err(ViewError::Preset(format!("Duplicate sort key: {}", key.key)));
        }
    }
    if !preset.default_sort.is_none() && !sort_keys.contains(preset.default_sort.key.as_str()) {
        return Err(ViewError::Preset(format!(
            "Default sort key is not registered: {}",
            preset.default_sort.key
        )));
    }

    let mut facet_keys = HashSet::new();
    for facet in &preset.facets {
        if !facet_keys.insert(facet.key.as_str()) {
            return Err(ViewError::Preset(format!("Duplicate facet key: {}", facet.key)));
        }
    }

    let mut metric_names = HashSet::new();
    for metric in &preset.metrics {
        if !metric_names.insert(metric.name.as_str()) {
            return Err(ViewError::Preset(format!("Duplicate metric: {}", metric.name)));
        }
    }

    if let Some(buckets) = preset.buckets.as_ref() {
        if buckets.field.is_empty() {
            return Err(ViewError::Preset("Bucket field is required".into()));
        }
    }
    Ok(())
}

/// Every embedded preset that parses, in display order.
pub fn get_available_presets() -> Vec<PresetSummary> {
    embedded::embedded_ids()
        .filter_map(|id| match load_preset(id) {
            Ok(preset) => Some(PresetSummary::from(&preset)),
            Err(e) => {
                log::warn!("Skipping embedded preset '{}': {}", id, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortSpec;

    #[test]
    fn test_load_preset_channels() {
        let preset = load_preset("sales-channels").expect("should load channels preset");
        assert_eq!(preset.id, "sales-channels");
        assert_eq!(preset.name, "Sales Channels");
    }

    #[test]
    fn test_load_preset_unknown() {
        let result = load_preset("nonexistent");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown preset page"));
    }

    #[test]
    fn test_validate_preset_empty_id() {
        let mut preset = load_preset("sales-channels").unwrap();
        preset.id = String::new();
        assert!(validate_preset(&preset).is_err());
    }

    #[test]
    fn test_validate_preset_unregistered_default_sort() {
        let mut preset = load_preset("sales-deals").unwrap();
        preset.default_sort = "bogus:desc".parse::<SortSpec>().unwrap();
        assert!(validate_preset(&preset).is_err());
        preset.default_sort = SortSpec::none();
        assert!(validate_preset(&preset).is_ok());
    }

    #[test]
    fn test_validate_preset_duplicate_facet() {
        let mut preset = load_preset("crm-customers").unwrap();
        let dup = preset.facets[0].clone();
        preset.facets.push(dup);
        assert!(validate_preset(&preset).is_err());
    }

    #[test]
    fn test_load_custom_preset_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("custom.json");
        let mut preset = load_preset("segments").unwrap();
        preset.id = "vip-segments".to_string();
        std::fs::write(&path, serde_json::to_string(&preset).unwrap()).unwrap();

        let loaded = load_custom_preset(&path).expect("custom preset should load");
        assert_eq!(loaded.id, "vip-segments");
    }

    #[test]
    fn test_load_custom_preset_rejects_garbage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_custom_preset(&path), Err(ViewError::Preset(_))));
        assert!(load_custom_preset(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_get_available_presets() {
        let presets = get_available_presets();
        assert_eq!(presets.len(), 5, "should have 5 embedded presets");
        assert_eq!(presets[0].id, "sales-channels");
        assert_eq!(presets[0].name, "Sales Channels");
        assert!(!presets[0].description.is_empty());
        assert_eq!(embedded::embedded_ids().count(), presets.len());
    }

    #[test]
    fn test_all_presets_load_and_validate() {
        for PresetSummary { id, .. } in get_available_presets() {
            let preset = load_preset(&id).unwrap_or_else(|e| panic!("Failed to load '{}': {}", id, e));
            validate_preset(&preset)
                .unwrap_or_else(|e| panic!("Validation failed for '{}': {}", id, e));
            assert_eq!(preset.id, id);
            assert!(!preset.search_fields.is_empty(), "preset '{}' should be searchable", id);
        }
    }
}
