//! Metric registry lookup tests.

use fleetsim_core::registry::{
    binding_field_map, binding_metrics_for_view, entry, metrics_for_view, ChartView, SimField,
    METRIC_REGISTRY,
};

#[test]
fn known_keys_resolve_and_unknown_keys_do_not() {
    let trips = entry("paid_trips_per_week").expect("curated key");
    assert_eq!(trips.sim_field, Some(SimField::PaidTripsPerWeek));
    assert!(trips.binding);

    assert!(entry("no_such_metric").is_none());
}

#[test]
fn binding_metrics_are_a_subset_of_view_metrics() {
    for view in [
        ChartView::Fleet,
        ChartView::Miles,
        ChartView::Trips,
        ChartView::CashFlow,
        ChartView::Rd,
    ] {
        let all = metrics_for_view(view);
        for key in binding_metrics_for_view(view) {
            assert!(
                all.contains(&key),
                "binding metric {key} missing from view {view:?}"
            );
        }
    }
}

#[test]
fn annotation_only_metrics_never_appear_in_binding_lookups() {
    assert!(metrics_for_view(ChartView::Fleet).contains(&"service_area_sq_mi"));
    assert!(!binding_metrics_for_view(ChartView::Fleet).contains(&"service_area_sq_mi"));
    assert!(!binding_field_map().contains_key("service_area_sq_mi"));

    // Mapped onto a field but explicitly non-binding.
    assert!(!binding_field_map().contains_key("fleet_size_estimate"));
}

#[test]
fn binding_field_map_covers_every_binding_entry_exactly_once() {
    let map = binding_field_map();
    let binding_count = METRIC_REGISTRY
        .iter()
        .filter(|e| e.binding && e.sim_field.is_some())
        .count();
    assert_eq!(map.len(), binding_count);

    for e in METRIC_REGISTRY.iter().filter(|e| e.binding) {
        assert_eq!(map.get(e.metric_key).copied(), e.sim_field);
    }
}

#[test]
fn metric_keys_are_unique() {
    let mut keys: Vec<&str> = METRIC_REGISTRY.iter().map(|e| e.metric_key).collect();
    let total = keys.len();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), total, "duplicate metric keys in the registry");
}
