//! End-to-end scenarios for the metrics engine
//!
//! Each test drives the public API with a small hand-built observation set:
//! - summary of a two-point series
//! - forecast extension band
//! - period comparison with a volatile current period
//! - insight threshold on short series
//! - pivot no-data cells

use chrono::NaiveDate;
use metric_lens::domain::metrics::{
    forecast::{self, ForecastHorizon},
    insight::{detect_deviations, insights_for},
    ComparisonRecord, InsightConfig, Insight, MetricName, Observation, ObservationSet,
    PivotCell, PivotTable, SummaryRecord, TrendDirection,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

fn metric(name: &str) -> MetricName {
    MetricName::try_new(name.to_string()).unwrap()
}

fn obs(metric_name: &str, day: &str, value: f64) -> Observation {
    Observation::try_from_raw("ai_diagnosis", metric_name, day, value, "个").unwrap()
}

#[test]
fn test_two_point_summary() {
    let set = ObservationSet::new(vec![
        obs("X", "2024-01-01", 100.0),
        obs("X", "2024-01-02", 110.0),
    ]);
    let summary = SummaryRecord::for_metric(&set, &metric("X"));

    assert_eq!(summary.latest_value(), 110.0);
    assert_eq!(summary.average, 105.0);
    assert_eq!(summary.max, 110.0);
    assert_eq!(summary.min, 100.0);
}

#[test]
fn test_forecast_extension_band() {
    let seed = obs("X", "2024-01-10", 200.0);
    let mut rng = StdRng::seed_from_u64(2024);
    let points = forecast::extend(Some(&seed), ForecastHorizon::try_new(5).unwrap(), &mut rng);

    let dates: Vec<NaiveDate> = points.iter().map(Observation::date).collect();
    assert_eq!(
        dates,
        vec![
            date("2024-01-11"),
            date("2024-01-12"),
            date("2024-01-13"),
            date("2024-01-14"),
            date("2024-01-15"),
        ]
    );
    for point in &points {
        assert!(point.is_forecast());
        assert!((197.0..=207.0).contains(&point.value()));
    }
}

#[test]
fn test_comparison_with_volatile_current_period() {
    let record = ComparisonRecord::from_values(metric("X"), &[90.0, 110.0], &[100.0, 100.0]);

    assert_eq!(record.current_avg, 100.0);
    assert_eq!(record.previous_avg, 100.0);
    assert_eq!(record.delta, 0.0);
    assert_eq!(record.delta_pct, 0.0);
    assert!((record.stability_pct - 90.0).abs() < 1e-9);
}

#[test]
fn test_four_observations_never_trigger_insight() {
    let set = ObservationSet::new(vec![
        obs("X", "2024-01-01", 1.0),
        obs("X", "2024-01-02", 1.0),
        obs("X", "2024-01-03", 1.0),
        obs("X", "2024-01-04", 1_000_000.0),
    ]);

    assert!(detect_deviations(&set, &InsightConfig::default()).is_empty());
    let insights = insights_for(&set, &InsightConfig::default());
    assert!(insights.iter().all(|i| matches!(i, Insight::Stable(_))));
}

#[test]
fn test_pivot_marks_missing_dates_as_no_data() {
    let set = ObservationSet::new(vec![
        obs("X", "2024-01-01", 10.0),
        obs("X", "2024-01-02", 11.0),
        obs("X", "2024-01-03", 12.0),
        obs("Y", "2024-01-01", 20.0),
        obs("Y", "2024-01-03", 30.0),
    ]);
    let pivot = PivotTable::build(&set);
    let y = pivot.row(&metric("Y")).unwrap();

    assert_eq!(pivot.dates.len(), 3);
    assert_eq!(y.cell(date("2024-01-02")), PivotCell::NoData);
    assert_ne!(y.cell(date("2024-01-02")).value(), Some(0.0));
    assert_eq!(
        y.cell(date("2024-01-01")),
        PivotCell::Value {
            value: 20.0,
            day_over_day_pct: 0.0
        }
    );
    assert_eq!(
        y.cell(date("2024-01-03")),
        PivotCell::Value {
            value: 30.0,
            day_over_day_pct: 50.0
        }
    );
}

#[test]
fn test_pivot_trend_for_step_series() {
    let values = [100.0, 100.0, 100.0, 150.0, 150.0, 150.0];
    let set: ObservationSet = values
        .iter()
        .enumerate()
        .map(|(i, v)| obs("X", &format!("2024-01-{:02}", i + 1), *v))
        .collect();

    assert_eq!(PivotTable::build(&set).rows[0].trend, TrendDirection::Up);
}
