//! Faceted filter, sort and summary engine behind the operations dashboard
//! pages: sales channels, CRM customers, the sales pipeline, customer
//! feedback and segments.
//!
//! A page hands the engine its raw records plus a [`pipeline::ViewConfig`]
//! (usually built from a [`presets::PagePreset`] and the page's
//! [`presets::ViewControls`]) and gets back the visible records, summary
//! metrics and tab buckets to render.

pub mod aggregate;
pub mod buckets;
pub mod error;
pub mod filter;
pub mod helpers;
pub mod pipeline;
pub mod prefs;
pub mod presets;
pub mod record;
pub mod sort;
pub mod types;

pub use error::ViewError;
pub use pipeline::{View, ViewConfig, ViewPipeline};
pub use record::{FieldValue, Record};
