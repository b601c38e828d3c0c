//! Cohort simulation engine tests.

use fleetsim_core::config::{ScenarioConfig, SimulationParameters, UtilizationProfile};
use fleetsim_core::engine::simulate;
use fleetsim_core::error::SimError;

fn test_config() -> ScenarioConfig {
    ScenarioConfig::default_test()
}

#[test]
fn series_covers_exactly_the_requested_horizon() {
    let config = test_config();
    let outcome = simulate(&config).unwrap();

    assert_eq!(outcome.series.len(), 5, "expected one record per year");
    for (i, record) in outcome.series.iter().enumerate() {
        assert_eq!(
            record.year,
            2020 + i as i32,
            "years must increase strictly by 1 from start_year"
        );
    }
}

#[test]
fn zero_year_horizon_produces_empty_series() {
    let mut config = test_config();
    config.parameters.years_to_simulate = 0;

    let outcome = simulate(&config).unwrap();
    assert!(outcome.series.is_empty());
    assert_eq!(outcome.break_even_year, None);
}

#[test]
fn cumulative_net_cash_is_the_running_sum_of_net_cash_flow() {
    let outcome = simulate(&test_config()).unwrap();

    let mut running = 0.0;
    for record in &outcome.series {
        running += record.net_cash_flow;
        assert_eq!(
            record.cumulative_net_cash, running,
            "cumulative net cash diverged from the running sum at year {}",
            record.year
        );
    }
    assert_eq!(
        outcome.series[0].cumulative_net_cash,
        outcome.series[0].net_cash_flow
    );
}

#[test]
fn cities_grow_linearly_and_cap_at_the_horizon_total() {
    let config = test_config();
    let outcome = simulate(&config).unwrap();

    for (i, record) in outcome.series.iter().enumerate() {
        assert_eq!(record.cities_total, 2 * (i as i64 + 1));
    }
    let last = outcome.series.last().unwrap();
    assert_eq!(
        last.cities_total, 10,
        "final year must not overshoot cities_per_year * years"
    );
}

#[test]
fn cohorts_route_from_validation_into_production_at_ramp_age() {
    // ramp_time_per_city = 2: a cohort spends its first year in
    // validation at half strength, then counts as production.
    let outcome = simulate(&test_config()).unwrap();

    let y0 = &outcome.series[0];
    assert_eq!(y0.vehicles_production, 0);
    assert_eq!(y0.vehicles_validation, 100, "first cohort at ramp 0.5");
    assert_eq!(y0.production_miles, 0.0);
    assert_eq!(y0.validation_miles, 100.0 * 20.0 * 365.0);

    let y1 = &outcome.series[1];
    assert_eq!(y1.vehicles_production, 200, "first cohort fully ramped");
    assert_eq!(y1.vehicles_validation, 100, "second cohort at ramp 0.5");
    assert_eq!(y1.vehicles_total, 300);
}

#[test]
fn trips_derive_from_production_miles() {
    let outcome = simulate(&test_config()).unwrap();
    let y1 = &outcome.series[1];

    assert_eq!(y1.production_miles, 3_650_000.0);
    assert_eq!(y1.production_trips, 608_333, "round(3,650,000 / 6)");
    assert_eq!(y1.paid_trips_per_week, 11_699, "round(608,333 / 52)");
}

#[test]
fn break_even_is_the_first_year_with_non_negative_cumulative_cash() {
    let mut config = test_config();
    // Profit large enough to cross zero inside the horizon.
    config.parameters.profit_per_mile = 500.0;

    let outcome = simulate(&config).unwrap();
    let break_even = outcome
        .break_even_year
        .expect("this scenario must break even");

    for record in &outcome.series {
        if record.year < break_even {
            assert!(
                record.cumulative_net_cash < 0.0,
                "no year before {break_even} may qualify"
            );
        }
    }
    let at = outcome
        .series
        .iter()
        .find(|r| r.year == break_even)
        .unwrap();
    assert!(at.cumulative_net_cash >= 0.0);
}

#[test]
fn roi_is_zero_while_no_rd_has_been_spent() {
    let mut config = test_config();
    config.parameters.annual_rd_spend_billions = 0.0;

    let outcome = simulate(&config).unwrap();
    for record in &outcome.series {
        assert_eq!(
            record.roi, 0.0,
            "roi must be 0 when cumulative R&D spend is 0, year {}",
            record.year
        );
    }
}

#[test]
fn roi_matches_its_formula() {
    let outcome = simulate(&test_config()).unwrap();
    for record in &outcome.series {
        let expected = record.cumulative_net_cash / (record.cumulative_rd_spend * 1e9) * 100.0;
        assert!(
            (record.roi - expected).abs() < 1e-9,
            "roi mismatch at year {}: {} vs {}",
            record.year,
            record.roi,
            expected
        );
    }
}

#[test]
fn rd_taper_reads_the_previous_year_and_is_not_sticky() {
    // With zero profit the cumulative cash is 0 before the first year
    // (taper applies), then permanently negative (taper releases).
    // A sticky break-even flag would keep tapering forever.
    let mut config = test_config();
    config.parameters.profit_per_mile = 0.0;

    let outcome = simulate(&config).unwrap();
    assert_eq!(
        outcome.series[0].annual_rd_spend, 0.5,
        "prior cumulative cash of 0 qualifies, first year tapers"
    );
    for record in &outcome.series[1..] {
        assert_eq!(
            record.annual_rd_spend, 1.0,
            "year {} must re-evaluate from the prior year's negative cash",
            record.year
        );
    }
}

#[test]
fn rd_taper_stays_engaged_while_cash_remains_positive() {
    let mut config = test_config();
    config.parameters.profit_per_mile = 1000.0;

    let outcome = simulate(&config).unwrap();
    assert_eq!(outcome.break_even_year, Some(2021));
    // 2020 tapers on the zero prior; 2021 runs at full spend off
    // 2020's negative cash; from 2022 on the prior year is positive.
    assert_eq!(outcome.series[0].annual_rd_spend, 0.5);
    assert_eq!(outcome.series[1].annual_rd_spend, 1.0);
    for record in &outcome.series[2..] {
        assert_eq!(record.annual_rd_spend, 0.5, "year {}", record.year);
    }
}

#[test]
fn non_positive_ramp_time_is_rejected_before_simulating() {
    let mut config = test_config();
    config.parameters.ramp_time_per_city = 0.0;
    assert!(matches!(
        simulate(&config),
        Err(SimError::InvalidParameter { field: "ramp_time_per_city", .. })
    ));

    config.parameters.ramp_time_per_city = -1.0;
    assert!(simulate(&config).is_err());
}

#[test]
fn taper_outside_unit_interval_is_rejected() {
    let mut config = test_config();
    config.profile.rd_taper_after_breakeven = 1.5;
    assert!(matches!(
        simulate(&config),
        Err(SimError::InvalidParameter { field: "rd_taper_after_breakeven", .. })
    ));
}

#[test]
fn named_profiles_resolve_and_unknown_names_do_not() {
    assert!(UtilizationProfile::named("conservative").is_some());
    assert!(UtilizationProfile::named("base").is_some());
    assert!(UtilizationProfile::named("aggressive").is_some());
    assert!(UtilizationProfile::named("reckless").is_none());
}

#[test]
fn scenario_config_round_trips_through_json() {
    let config = ScenarioConfig {
        parameters: SimulationParameters {
            start_year: 2025,
            years_to_simulate: 30,
            cities_per_year: 3,
            vehicles_per_city: 250,
            profit_per_mile: 0.8,
            annual_rd_spend_billions: 1.5,
            ramp_time_per_city: 2.5,
        },
        profile: UtilizationProfile::aggressive(),
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: ScenarioConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
