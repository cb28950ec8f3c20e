//! Region-scoped statistics over the comparison and forecast collections.
//!
//! Nothing here is forecasting: every value is either copied from a record
//! or a plain arithmetic mean over upstream-computed error columns.

use crate::api::{ComparisonRecord, ForecastRecord};

/// Aggregated display values for one selected region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionStats {
    /// Year of the most recent actual observation.
    pub latest_year: i32,
    /// Tree-cover actual for that year, in hectares.
    pub latest_actual: f64,
    /// Pre-computed forecast for the configured target year, when present.
    pub target_forecast: Option<f64>,
    /// Mean absolute error expressed as a percentage of the latest actual.
    pub mean_ae_pct: Option<f64>,
    /// Mean absolute percentage error (already a percentage upstream).
    pub mean_ape_pct: Option<f64>,
}

/// Arithmetic mean, or `None` for an empty sequence.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

/// The comparison row with the maximum year for `region`.
///
/// Ties on year resolve to the first record encountered, so the result is
/// deterministic for any input order.
pub fn latest_record<'a>(
    comparison: &'a [ComparisonRecord],
    region: &str,
) -> Option<&'a ComparisonRecord> {
    let mut latest: Option<&ComparisonRecord> = None;
    for record in comparison.iter().filter(|r| r.region == region) {
        match latest {
            Some(current) if record.year <= current.year => {}
            _ => latest = Some(record),
        }
    }
    latest
}

/// Compute the statistics panel values for `region`.
///
/// Returns `None` when the region has no comparison rows at all; callers
/// render the unavailable markers in that case.
pub fn region_stats(
    comparison: &[ComparisonRecord],
    forecasts: &[ForecastRecord],
    region: &str,
    target_year: i32,
) -> Option<RegionStats> {
    let latest = latest_record(comparison, region)?;

    let filtered: Vec<&ComparisonRecord> =
        comparison.iter().filter(|r| r.region == region).collect();
    let mean_ae = mean(filtered.iter().filter_map(|r| r.ae));
    let mean_ape_pct = mean(filtered.iter().filter_map(|r| r.ape));

    // A zero actual would blow up the percentage; treat it as 1 hectare.
    let baseline = if latest.actual == 0.0 {
        1.0
    } else {
        latest.actual
    };
    let mean_ae_pct = mean_ae.map(|ae| ae / baseline * 100.0);

    let target_forecast = forecasts
        .iter()
        .find(|f| f.region == region && f.year == target_year)
        .map(|f| f.forecast);

    Some(RegionStats {
        latest_year: latest.year,
        latest_actual: latest.actual,
        target_forecast,
        mean_ae_pct,
        mean_ape_pct,
    })
}

/// Whole-dataset summary for the overview section.
#[derive(Debug, Clone, PartialEq)]
pub struct OverallSummary {
    /// Mean absolute error across every scored row, in hectares.
    pub mean_ae: Option<f64>,
    /// Mean absolute percentage error across every scored row.
    pub mean_ape: Option<f64>,
    /// First and last comparison years present.
    pub first_year: i32,
    pub last_year: i32,
}

/// Summarize the full comparison collection; `None` when it is empty.
pub fn overall_summary(comparison: &[ComparisonRecord]) -> Option<OverallSummary> {
    let first = comparison.first()?;
    let mut first_year = first.year;
    let mut last_year = first.year;
    for record in comparison {
        first_year = first_year.min(record.year);
        last_year = last_year.max(record.year);
    }
    Some(OverallSummary {
        mean_ae: mean(comparison.iter().filter_map(|r| r.ae)),
        mean_ape: mean(comparison.iter().filter_map(|r| r.ape)),
        first_year,
        last_year,
    })
}
