//! View pipeline: raw records → filtered → ordered → summary + buckets.
//!
//! `run` is a pure function of `(raw, config)`. Records are borrowed, never
//! cloned or mutated, and every derived value is recomputed on each call;
//! memoizing across calls is the host's business.

use serde::{Deserialize, Serialize};

use crate::aggregate::{summarize, Summary, SummaryMetric};
use crate::buckets::{build_buckets, Bucket, BucketSpec};
use crate::error::ViewError;
use crate::filter::FilterSet;
use crate::helpers::json_kind;
use crate::record::Record;
use crate::sort::{ComparatorRegistry, SortSpec};

/// Everything the presentation layer controls for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    #[serde(default)]
    pub filters: FilterSet,
    #[serde(default)]
    pub sort: SortSpec,
    #[serde(default)]
    pub metrics: Vec<SummaryMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buckets: Option<BucketSpec>,
}

/// Derived view over a borrowed record collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View<'a, R> {
    pub visible: Vec<&'a R>,
    pub summary: Summary,
    pub buckets: Vec<Bucket>,
}

impl<R> View<'_, R> {
    /// The presentation layer shows its "no results" state when true.
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewPipeline {
    registry: ComparatorRegistry,
}

impl ViewPipeline {
    pub fn new(registry: ComparatorRegistry) -> Self {
        ViewPipeline { registry }
    }

    pub fn registry(&self) -> &ComparatorRegistry {
        &self.registry
    }

    pub fn run<'a, R: Record>(&self, raw: &'a [R], config: &ViewConfig) -> View<'a, R> {
        let mut visible = config.filters.apply(raw);
        log::debug!(
            "view filter: {} of {} records pass {} criteria",
            visible.len(),
            raw.len(),
            config.filters.len()
        );

        self.registry.sort(&mut visible, &config.sort);

        let summary = summarize(&visible, &config.metrics);
        let buckets = build_buckets(raw, &visible, config.buckets.as_ref());
        log::debug!(
            "view summary: {} metrics, {} buckets",
            summary.len(),
            buckets.len()
        );

        View {
            visible,
            summary,
            buckets,
        }
    }

    /// Host boundary for untyped data. Anything but a JSON array is a
    /// programming error in the caller.
    pub fn run_json<'a>(
        &self,
        raw: &'a serde_json::Value,
        config: &ViewConfig,
    ) -> Result<View<'a, serde_json::Value>, ViewError> {
        let records = raw
            .as_array()
            .ok_or_else(|| ViewError::InvalidInput(json_kind(raw).to_string()))?;
        Ok(self.run(records.as_slice(), config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{percent_of_goal, record_goal_percent, MetricFormat, Reducer};
    use crate::filter::Criterion;
    use crate::sort::{SortDirection, SortKind};
    use serde_json::{json, Value};

    fn pipeline() -> ViewPipeline {
        ViewPipeline::new(
            ComparatorRegistry::new()
                .with("name", "name", SortKind::Text)
                .with("revenue", "monthlyRevenue", SortKind::Number)
                .with("lastSync", "lastSync", SortKind::Date),
        )
    }

    fn channels() -> Vec<Value> {
        vec![
            json!({"id": "b", "name": "Etsy", "platform": "etsy", "status": "active", "monthlyRevenue": 3000, "revenueGoal": 6000, "healthScore": 45}),
            json!({"id": "a", "name": "Shopify", "platform": "shopify", "status": "active", "monthlyRevenue": 8000, "revenueGoal": 10000, "healthScore": 88}),
            json!({"id": "a2", "name": "Shopify Outlet", "platform": "shopify", "status": "inactive", "monthlyRevenue": 12000, "revenueGoal": 10000, "healthScore": 70}),
        ]
    }

    fn metrics() -> Vec<SummaryMetric> {
        vec![
            SummaryMetric::new("totalRevenue", Reducer::Sum { field: "monthlyRevenue".to_string() })
                .with_format(MetricFormat::Currency),
            SummaryMetric::new("avgHealth", Reducer::Mean { field: "healthScore".to_string() }),
        ]
    }

    fn ids<R: Record>(view: &View<'_, R>) -> Vec<String> {
        view.visible
            .iter()
            .filter_map(|r| r.field("id").as_text().map(|t| t.into_owned()))
            .collect()
    }

    #[test]
    fn sales_channel_scenario() {
        let raw = channels();
        let config = ViewConfig {
            filters: FilterSet::new().with(Criterion::equals_or_all("status", "active")),
            sort: SortSpec::new("revenue", SortDirection::Desc),
            metrics: metrics(),
            buckets: Some(BucketSpec::new("platform")),
        };
        let view = pipeline().run(&raw, &config);

        assert_eq!(ids(&view), vec!["a", "b"]);
        assert_eq!(view.summary.get("totalRevenue"), Some(11000.0));
        assert_eq!(
            record_goal_percent(view.visible[0], "monthlyRevenue", "revenueGoal"),
            80.0
        );
        assert_eq!(
            view.buckets,
            vec![
                Bucket { name: "all".to_string(), count: 2 },
                Bucket { name: "etsy".to_string(), count: 1 },
                Bucket { name: "shopify".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn empty_collection_scenario() {
        let raw: Vec<Value> = Vec::new();
        let config = ViewConfig {
            sort: SortSpec::new("", SortDirection::Asc),
            metrics: vec![SummaryMetric::new("avg", Reducer::Mean { field: "x".to_string() })],
            ..ViewConfig::default()
        };
        let view = pipeline().run(&raw, &config);
        assert!(view.is_empty());
        assert_eq!(view.summary.get("avg"), Some(0.0));
        assert_eq!(
            view.buckets,
            vec![Bucket { name: "all".to_string(), count: 0 }]
        );
    }

    #[test]
    fn run_is_idempotent() {
        let raw = channels();
        let config = ViewConfig {
            filters: FilterSet::new().with(Criterion::search(&["name"], "shop")),
            sort: SortSpec::new("name", SortDirection::Desc),
            metrics: metrics(),
            buckets: Some(BucketSpec::new("platform")),
        };
        let p = pipeline();
        assert_eq!(p.run(&raw, &config), p.run(&raw, &config));
    }

    #[test]
    fn summary_reflects_visible_records_only() {
        let raw = channels();
        let config = ViewConfig {
            filters: FilterSet::new().with(Criterion::search(&["platform"], "shopify")),
            sort: SortSpec::new("revenue", SortDirection::Asc),
            metrics: metrics(),
            buckets: None,
        };
        let view = pipeline().run(&raw, &config);
        assert_eq!(view.summary, summarize(&view.visible, &config.metrics));
        assert_eq!(view.summary.get("totalRevenue"), Some(20000.0));
    }

    #[test]
    fn no_sort_key_preserves_filtered_order() {
        let raw = channels();
        let view = pipeline().run(&raw, &ViewConfig::default());
        assert_eq!(ids(&view), vec!["b", "a", "a2"]);
    }

    #[test]
    fn flipping_direction_reverses_distinct_keys() {
        let raw = channels();
        let mut config = ViewConfig {
            sort: SortSpec::new("revenue", SortDirection::Asc),
            ..ViewConfig::default()
        };
        let asc = ids(&pipeline().run(&raw, &config));
        config.sort.direction = config.sort.direction.toggle();
        let mut desc = ids(&pipeline().run(&raw, &config));
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn malformed_records_degrade_instead_of_failing() {
        let raw = vec![
            json!({"id": "x"}),
            json!({"id": "y", "monthlyRevenue": "lots", "lastSync": 42}),
            json!({"id": "z", "monthlyRevenue": 10, "lastSync": "2026-01-01"}),
        ];
        let config = ViewConfig {
            sort: SortSpec::new("revenue", SortDirection::Desc),
            metrics: metrics(),
            ..ViewConfig::default()
        };
        let view = pipeline().run(&raw, &config);
        assert_eq!(ids(&view), vec!["z", "x", "y"]);
        assert_eq!(view.summary.get("totalRevenue"), Some(10.0));
        assert_eq!(view.summary.get("avgHealth"), Some(0.0));
    }

    #[test]
    fn run_json_rejects_non_arrays() {
        let err = pipeline()
            .run_json(&json!({"records": []}), &ViewConfig::default())
            .unwrap_err();
        assert!(matches!(err, ViewError::InvalidInput(ref kind) if kind == "object"));
    }

    #[test]
    fn run_json_accepts_arrays() {
        let raw = Value::Array(channels());
        let view = pipeline().run_json(&raw, &ViewConfig::default()).unwrap();
        assert_eq!(view.visible.len(), 3);
    }

    #[test]
    fn view_serializes_for_the_presentation_layer() {
        let raw = channels();
        let config = ViewConfig {
            metrics: metrics(),
            ..ViewConfig::default()
        };
        let view = pipeline().run(&raw, &config);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["visible"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["summary"]["totalRevenue"], 23000.0);
        assert_eq!(json["buckets"][0]["name"], "all");
    }

    #[test]
    fn goal_percent_helper_matches_reducer_on_single_record() {
        let raw = channels();
        let one = &raw[1..2];
        let reducer = Reducer::GoalPercent {
            current: "monthlyRevenue".to_string(),
            goal: "revenueGoal".to_string(),
        };
        assert_eq!(reducer.reduce(one), percent_of_goal(8000.0, 10000.0));
    }
}
