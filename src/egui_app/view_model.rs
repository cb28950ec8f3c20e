//! Helpers converting dashboard records into egui-facing view structs.

use crate::api::{ComparisonRecord, DriverRecord, ForecastRecord};
use crate::chart::{ChartSpec, Series, SeriesStyle};
use crate::drivers;
use crate::egui_app::state::{
    AccuracyRowView, AccuracySummaryView, AccuracyTableView, CoefficientCardView,
    CoefficientRowView, DriverHistoryState, HistoryCellView, OverviewSummaryView,
    RegionCoefficientsView, StatsPanelState,
};
use crate::egui_app::ui::style;
use crate::format;
use crate::stats::{self, OverallSummary, RegionStats};

/// Fill the statistic cards from computed region stats.
pub fn stats_panel(stats: Option<&RegionStats>, target_year: i32) -> StatsPanelState {
    let Some(stats) = stats else {
        return StatsPanelState::unavailable(Some(target_year));
    };
    StatsPanelState {
        current_caption: format!("Actual tree cover, {}", stats.latest_year),
        current_value: format::hectares(stats.latest_actual),
        forecast_caption: format!("SARIMAX forecast, {target_year}"),
        forecast_value: stats
            .target_forecast
            .map(format::hectares)
            .unwrap_or_else(|| format::UNAVAILABLE.into()),
        mean_ae_pct: stats
            .mean_ae_pct
            .map(format::percent)
            .unwrap_or_else(|| format::UNAVAILABLE.into()),
        mean_ape_pct: stats
            .mean_ape_pct
            .map(format::percent)
            .unwrap_or_else(|| format::UNAVAILABLE.into()),
    }
}

/// Build the accuracy table for an optional region filter.
///
/// A row's AE cell is flagged when AE exceeds `threshold_pct` percent of the
/// row's actual; the APE cell when APE exceeds `threshold_pct` directly.
pub fn accuracy_table(
    records: &[ComparisonRecord],
    region: Option<&str>,
    threshold_pct: f64,
) -> AccuracyTableView {
    let filtered: Vec<&ComparisonRecord> = records
        .iter()
        .filter(|r| region.is_none_or(|name| r.region == name))
        .collect();
    if filtered.is_empty() {
        return AccuracyTableView::default();
    }

    let rows = filtered
        .iter()
        .map(|record| {
            let ae_flagged = record
                .ae
                .is_some_and(|ae| ae > record.actual * threshold_pct / 100.0);
            let ape_flagged = record.ape.is_some_and(|ape| ape > threshold_pct);
            AccuracyRowView {
                region: record.region.clone(),
                year: record.year.to_string(),
                actual: format::grouped(record.actual),
                forecast: format::grouped(record.forecast),
                ae: record
                    .ae
                    .map(format::grouped)
                    .unwrap_or_else(|| format::UNAVAILABLE.into()),
                ape: record
                    .ape
                    .map(format::percent)
                    .unwrap_or_else(|| format::UNAVAILABLE.into()),
                ae_flagged,
                ape_flagged,
            }
        })
        .collect();

    let mean_ae = stats::mean(filtered.iter().filter_map(|r| r.ae));
    let mean_ape = stats::mean(filtered.iter().filter_map(|r| r.ape));
    AccuracyTableView {
        rows,
        summary: Some(AccuracySummaryView {
            mean_ae: mean_ae
                .map(format::hectares)
                .unwrap_or_else(|| format::UNAVAILABLE.into()),
            mean_ape: mean_ape
                .map(format::percent)
                .unwrap_or_else(|| format::UNAVAILABLE.into()),
        }),
        placeholder: None,
    }
}

/// Coefficient cards for the fixed driver categories of one region.
pub fn coefficient_cards(records: &[DriverRecord], region: &str) -> Vec<CoefficientCardView> {
    drivers::DRIVER_CATEGORIES
        .iter()
        .map(|category| match drivers::find_coefficient(records, region, category) {
            Some(record) => CoefficientCardView {
                driver: (*category).into(),
                coefficient: format::coefficient(record.coefficient),
                p_value: format::scientific(record.p_value),
                positive: Some(record.coefficient >= 0.0),
            },
            None => placeholder_card(category),
        })
        .collect()
}

/// Cards with every value unavailable, shown before a region is chosen.
pub fn placeholder_cards() -> Vec<CoefficientCardView> {
    drivers::DRIVER_CATEGORIES
        .iter()
        .map(|category| placeholder_card(category))
        .collect()
}

fn placeholder_card(category: &str) -> CoefficientCardView {
    CoefficientCardView {
        driver: category.into(),
        coefficient: format::UNAVAILABLE.into(),
        p_value: format::UNAVAILABLE.into(),
        positive: None,
    }
}

/// Full per-region coefficient listing, intercept rows excluded.
pub fn driver_listing(records: &[DriverRecord]) -> Vec<RegionCoefficientsView> {
    drivers::grouped_by_region(records)
        .into_iter()
        .map(|(region, rows)| RegionCoefficientsView {
            region,
            rows: rows
                .into_iter()
                .map(|record| CoefficientRowView {
                    driver: record.driver.clone(),
                    coefficient: format::coefficient(record.coefficient),
                    p_value: format::scientific(record.p_value),
                })
                .collect(),
        })
        .collect()
}

/// Formatted overview summary for the whole comparison collection.
pub fn overview_summary(
    summary: Option<&OverallSummary>,
    region_count: usize,
) -> Option<OverviewSummaryView> {
    let summary = summary?;
    Some(OverviewSummaryView {
        mean_ae: summary
            .mean_ae
            .map(format::hectares)
            .unwrap_or_else(|| format::UNAVAILABLE.into()),
        mean_ape: summary
            .mean_ape
            .map(format::percent)
            .unwrap_or_else(|| format::UNAVAILABLE.into()),
        region_count: region_count.to_string(),
        comparison_span: format!("{}-{}", summary.first_year, summary.last_year),
    })
}

/// Driver history viewer state for the built-in dataset.
pub fn history_state(selected: usize) -> DriverHistoryState {
    let categories = drivers::history_categories();
    let selected = selected.min(categories.len().saturating_sub(1));
    let rows = categories
        .get(selected)
        .and_then(|category| drivers::history_for(category))
        .map(|points| {
            points
                .iter()
                .map(|point| HistoryCellView {
                    year: point.year.to_string(),
                    share: format!("{:.0}%", point.share_pct),
                })
                .collect()
        })
        .unwrap_or_default();
    DriverHistoryState {
        categories: categories.into_iter().map(String::from).collect(),
        selected,
        rows,
    }
}

/// Chart of the pre-computed forecast series for one region.
pub fn forecast_chart_spec(forecasts: &[ForecastRecord], region: &str) -> ChartSpec {
    let mut records: Vec<&ForecastRecord> =
        forecasts.iter().filter(|f| f.region == region).collect();
    records.sort_by_key(|f| f.year);
    ChartSpec {
        years: records.iter().map(|f| f.year).collect(),
        series: vec![Series {
            name: "SARIMAX Forecast".into(),
            values: records.iter().map(|f| f.forecast).collect(),
            style: SeriesStyle {
                color: style::chart_forecast_color(),
                fill: true,
                dashed: false,
            },
        }],
    }
}

/// Actual-vs-forecast overlay chart for one region.
pub fn comparison_chart_spec(comparison: &[ComparisonRecord], region: &str) -> ChartSpec {
    let mut records: Vec<&ComparisonRecord> =
        comparison.iter().filter(|c| c.region == region).collect();
    records.sort_by_key(|c| c.year);
    ChartSpec {
        years: records.iter().map(|c| c.year).collect(),
        series: vec![
            Series {
                name: "Actual".into(),
                values: records.iter().map(|c| c.actual).collect(),
                style: SeriesStyle {
                    color: style::chart_actual_color(),
                    fill: true,
                    dashed: false,
                },
            },
            Series {
                name: "Forecast".into(),
                values: records.iter().map(|c| c.forecast).collect(),
                style: SeriesStyle {
                    color: style::chart_projection_color(),
                    fill: true,
                    dashed: true,
                },
            },
        ],
    }
}
