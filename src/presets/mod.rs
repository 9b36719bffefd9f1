//! Page presets: declarative view configurations for each dashboard page.

pub mod controls;
pub mod embedded;
pub mod loader;
pub mod schema;

pub use controls::ViewControls;
pub use loader::{get_available_presets, load_custom_preset, load_preset, validate_preset};
pub use schema::{preset_schema, PagePreset, PresetFacet, PresetSortKey, PresetSummary};
