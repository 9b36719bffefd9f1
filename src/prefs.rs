//! Per-page view preferences persisted at `~/.opsdeck/preferences.json`.
//!
//! The file is an opaque blob keyed by page id. Only `defaultSort` and
//! `visibleMetrics` are interpreted; every other key is carried through
//! untouched so other hosts can store their own layout state alongside.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ViewError;
use crate::presets::PagePreset;
use crate::sort::SortSpec;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<SortSpec>,
    /// Metric names to show, in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_metrics: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ViewPreferences {
    /// Preset with these preferences applied. Stale sort keys and unknown
    /// metric names are ignored.
    pub fn apply(&self, preset: &PagePreset) -> PagePreset {
        let mut out = preset.clone();

        if let Some(sort) = self.default_sort.as_ref() {
            if sort.is_none() || preset.sort_keys.iter().any(|k| k.key == sort.key) {
                out.default_sort = sort.clone();
            } else {
                log::warn!(
                    "Saved sort key '{}' no longer exists on '{}', using preset default",
                    sort.key,
                    preset.id
                );
            }
        }

        if let Some(names) = self.visible_metrics.as_ref() {
            out.metrics = names
                .iter()
                .filter_map(|name| preset.metrics.iter().find(|m| &m.name == name).cloned())
                .collect();
        }

        out
    }
}

/// Get the canonical preferences path (~/.opsdeck/preferences.json)
pub fn preferences_path() -> Result<PathBuf, ViewError> {
    let home = dirs::home_dir()
        .ok_or_else(|| ViewError::Preferences("Could not find home directory".into()))?;
    Ok(home.join(".opsdeck").join("preferences.json"))
}

pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        PreferenceStore { path: path.into() }
    }

    pub fn open_default() -> Result<Self, ViewError> {
        Ok(Self::at(preferences_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All pages' preferences. A missing file is an empty store.
    pub fn load_all(&self) -> Result<BTreeMap<String, ViewPreferences>, ViewError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            ViewError::Preferences(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    pub fn load(&self, page: &str) -> Result<ViewPreferences, ViewError> {
        Ok(self.load_all()?.remove(page).unwrap_or_default())
    }

    /// Replace one page's preferences, keeping every other page.
    pub fn save(&self, page: &str, prefs: &ViewPreferences) -> Result<(), ViewError> {
        let mut all = self.load_all()?;
        all.insert(page.to_string(), prefs.clone());

        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let payload = serde_json::to_string_pretty(&all)?;
        write_atomic(&self.path, &payload)
    }
}

fn write_atomic(path: &Path, payload: &str) -> Result<(), ViewError> {
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, payload)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
