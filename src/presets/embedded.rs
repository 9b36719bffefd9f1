/// Embedded page presets, keyed by page id, in display order.
const EMBEDDED: &[(&str, &str)] = &[
    ("sales-channels", include_str!("../../presets/sales-channels.json")),
    ("crm-customers", include_str!("../../presets/crm-customers.json")),
    ("sales-deals", include_str!("../../presets/sales-deals.json")),
    ("feedback", include_str!("../../presets/feedback.json")),
    ("segments", include_str!("../../presets/segments.json")),
];

/// Raw JSON of the embedded preset for `page`.
pub fn get_embedded(page: &str) -> Option<&'static str> {
    EMBEDDED
        .iter()
        .find_map(|(id, json)| (*id == page).then_some(*json))
}

/// Page ids of every embedded preset.
pub fn embedded_ids() -> impl Iterator<Item = &'static str> {
    EMBEDDED.iter().map(|(id, _)| *id)
}
