//! Shared state types for the egui UI.

use std::time::Instant;

use egui::Color32;

use crate::egui_app::ui::style;
use crate::format;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: StatusBarState,
    /// Active dashboard section.
    pub section: Section,
    /// Sorted distinct region names feeding every selector.
    pub regions: Vec<String>,
    /// Transient error notices, pruned once expired.
    pub notices: Vec<TransientNotice>,
    pub overview: OverviewState,
    pub forecast: ForecastSectionState,
    pub drivers: DriversSectionState,
    pub accuracy: AccuracySectionState,
    /// Year shown in the footer.
    pub footer_year: i32,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            section: Section::Overview,
            regions: Vec::new(),
            notices: Vec::new(),
            overview: OverviewState::default(),
            forecast: ForecastSectionState::default(),
            drivers: DriversSectionState::default(),
            accuracy: AccuracySectionState::default(),
            footer_year: 0,
        }
    }
}

/// Status badge + text shown in the footer bar.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub badge_label: String,
    pub badge_color: Color32,
}

impl StatusBarState {
    pub fn idle() -> Self {
        Self {
            text: "Waiting for dashboard data".into(),
            badge_label: style::StatusTone::Idle.label().into(),
            badge_color: style::status_badge_color(style::StatusTone::Idle),
        }
    }
}

/// Dashboard sections, mirroring the page navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Overview,
    Forecasts,
    Drivers,
    Accuracy,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Overview,
        Section::Forecasts,
        Section::Drivers,
        Section::Accuracy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::Forecasts => "Forecasts",
            Section::Drivers => "Drivers",
            Section::Accuracy => "Accuracy",
        }
    }
}

/// An auto-dismissing notice shown as an overlay.
#[derive(Clone, Debug)]
pub struct TransientNotice {
    pub message: String,
    pub expires_at: Instant,
}

/// Overview section: whole-dataset summary plus the driver history viewer.
#[derive(Clone, Debug, Default)]
pub struct OverviewState {
    pub summary: Option<OverviewSummaryView>,
    pub history: DriverHistoryState,
}

/// Formatted whole-dataset summary values.
#[derive(Clone, Debug, PartialEq)]
pub struct OverviewSummaryView {
    pub mean_ae: String,
    pub mean_ape: String,
    pub region_count: String,
    pub comparison_span: String,
}

/// Driver history viewer backed by the built-in dataset.
#[derive(Clone, Debug, Default)]
pub struct DriverHistoryState {
    pub categories: Vec<String>,
    pub selected: usize,
    pub rows: Vec<HistoryCellView>,
}

/// One year/value cell in the history grid.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryCellView {
    pub year: String,
    pub share: String,
}

/// Which collection the forecast chart draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
    Forecast,
    Comparison,
}

impl ChartKind {
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Forecast => "Forecast",
            ChartKind::Comparison => "Actual vs forecast",
        }
    }
}

/// Forecast section: region selector, statistic cards, chart.
#[derive(Clone, Debug)]
pub struct ForecastSectionState {
    pub selected_region: Option<String>,
    pub kind: ChartKind,
    pub stats: StatsPanelState,
    /// Placeholder text shown instead of a chart; `None` while one is live.
    pub chart_placeholder: Option<String>,
}

impl Default for ForecastSectionState {
    fn default() -> Self {
        Self {
            selected_region: None,
            kind: ChartKind::Forecast,
            stats: StatsPanelState::unavailable(None),
            chart_placeholder: Some("Select a region to chart its forecast.".into()),
        }
    }
}

/// Formatted statistic card values for the selected region.
#[derive(Clone, Debug, PartialEq)]
pub struct StatsPanelState {
    pub current_caption: String,
    pub current_value: String,
    pub forecast_caption: String,
    pub forecast_value: String,
    pub mean_ae_pct: String,
    pub mean_ape_pct: String,
}

impl StatsPanelState {
    /// Every field reset to the unavailable marker.
    pub fn unavailable(target_year: Option<i32>) -> Self {
        let forecast_caption = match target_year {
            Some(year) => format!("SARIMAX forecast, {year}"),
            None => "SARIMAX forecast".into(),
        };
        Self {
            current_caption: "Latest actual tree cover".into(),
            current_value: format::UNAVAILABLE.into(),
            forecast_caption,
            forecast_value: format::UNAVAILABLE.into(),
            mean_ae_pct: format::UNAVAILABLE.into(),
            mean_ape_pct: format::UNAVAILABLE.into(),
        }
    }
}

/// Drivers section: coefficient cards for one region plus the full listing.
#[derive(Clone, Debug, Default)]
pub struct DriversSectionState {
    pub selected_region: Option<String>,
    pub cards: Vec<CoefficientCardView>,
    pub listing: Vec<RegionCoefficientsView>,
}

/// One coefficient card for a fixed driver category.
#[derive(Clone, Debug, PartialEq)]
pub struct CoefficientCardView {
    pub driver: String,
    pub coefficient: String,
    pub p_value: String,
    /// `Some(true)` positive, `Some(false)` negative, `None` when absent.
    pub positive: Option<bool>,
}

/// All coefficient rows of one region.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionCoefficientsView {
    pub region: String,
    pub rows: Vec<CoefficientRowView>,
}

/// One driver row inside a region listing block.
#[derive(Clone, Debug, PartialEq)]
pub struct CoefficientRowView {
    pub driver: String,
    pub coefficient: String,
    pub p_value: String,
}

/// Accuracy section: optional region filter plus the rendered table.
#[derive(Clone, Debug, Default)]
pub struct AccuracySectionState {
    /// `None` means "All regions".
    pub selected_region: Option<String>,
    pub table: AccuracyTableView,
}

/// Rendered accuracy table, or a placeholder when there is nothing to show.
#[derive(Clone, Debug, PartialEq)]
pub struct AccuracyTableView {
    pub rows: Vec<AccuracyRowView>,
    pub summary: Option<AccuracySummaryView>,
    pub placeholder: Option<String>,
}

impl Default for AccuracyTableView {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            summary: None,
            placeholder: Some("No data available".into()),
        }
    }
}

/// One formatted table row with error-threshold flags.
#[derive(Clone, Debug, PartialEq)]
pub struct AccuracyRowView {
    pub region: String,
    pub year: String,
    pub actual: String,
    pub forecast: String,
    pub ae: String,
    pub ape: String,
    pub ae_flagged: bool,
    pub ape_flagged: bool,
}

/// Footer means over the filtered rows.
#[derive(Clone, Debug, PartialEq)]
pub struct AccuracySummaryView {
    pub mean_ae: String,
    pub mean_ape: String,
}
