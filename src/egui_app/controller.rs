//! Controller maintaining dashboard state for the egui UI.
//!
//! All mutation happens on the UI thread; background fetch threads only
//! report results over the jobs channel.

mod jobs;

use std::time::{Duration, Instant};

use crate::api::{ApiClient, ApiError, DashboardData};
use crate::chart::ChartHost;
use crate::config::DashboardConfig;
use crate::egui_app::state::{
    ChartKind, Section, StatsPanelState, TransientNotice, UiState,
};
use crate::egui_app::ui::style::{self, StatusTone};
use crate::egui_app::view_model;
use crate::stats;

use jobs::{ControllerJobs, PendingLoad};

/// How long a transient error notice stays on screen.
const NOTICE_TTL: Duration = Duration::from_secs(4);

const SELECT_REGION_HINT: &str = "Select a region to chart its forecast.";
const NO_DATA_PLACEHOLDER: &str = "No data available";

/// Maintains app state and bridges dashboard data to the egui UI.
pub struct DashboardController {
    pub ui: UiState,
    config: DashboardConfig,
    data: DashboardData,
    loaded: bool,
    pending: Option<PendingLoad>,
    jobs: ControllerJobs,
    chart: ChartHost,
}

impl DashboardController {
    pub fn new(config: DashboardConfig) -> Self {
        let mut ui = UiState::default();
        ui.footer_year = current_year();
        ui.overview.history = view_model::history_state(0);
        ui.forecast.stats = StatsPanelState::unavailable(Some(config.forecast_target_year));
        Self {
            ui,
            config,
            data: DashboardData::default(),
            loaded: false,
            pending: None,
            jobs: ControllerJobs::new(),
            chart: ChartHost::new(),
        }
    }

    /// True once an initial load (successful or not) has been applied.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The single live chart for the forecast section.
    pub fn chart(&self) -> &ChartHost {
        &self.chart
    }

    /// Kick off the three collection fetches; a no-op while one is running.
    pub fn start_load(&mut self) {
        if self.jobs.fetch_in_progress() {
            return;
        }
        let client = match ApiClient::new(&self.config.api_base_url) {
            Ok(client) => client,
            Err(err) => {
                tracing::error!("Cannot build API client: {err}");
                self.push_notice(err.to_string());
                self.set_status("Invalid API base URL", StatusTone::Error);
                return;
            }
        };
        self.pending = Some(PendingLoad::default());
        self.jobs.spawn_fetch_all(client);
        self.set_status("Fetching dashboard data", StatusTone::Loading);
    }

    /// Re-fetch everything; current data stays visible until replaced.
    pub fn reload(&mut self) {
        self.start_load();
    }

    /// Drain settled fetches; apply the load once all three have reported.
    pub fn poll_jobs(&mut self) {
        while let Ok(message) = self.jobs.try_recv_message() {
            match self.pending.as_mut() {
                Some(pending) => pending.accept(message),
                None => continue,
            }
            if self.pending.as_ref().is_some_and(PendingLoad::settled) {
                if let Some(pending) = self.pending.take() {
                    self.jobs.clear_fetch();
                    self.apply_loaded(pending);
                }
            }
        }
    }

    fn apply_loaded(&mut self, pending: PendingLoad) {
        let mut failures = Vec::new();
        let drivers = unwrap_fetch(pending.drivers, &mut failures);
        let forecasts = unwrap_fetch(pending.forecasts, &mut failures);
        let comparison = unwrap_fetch(pending.comparison, &mut failures);
        let failure_count = failures.len();
        for message in failures {
            self.push_notice(message);
        }

        self.data = DashboardData::from_collections(forecasts, comparison, drivers);
        self.loaded = true;
        self.ui.regions = self.data.regions.clone();

        self.retain_known_selections();
        self.refresh_overview();
        self.refresh_forecast_views();
        self.refresh_driver_views();
        self.refresh_accuracy_table();

        match failure_count {
            0 => {
                tracing::info!(regions = self.ui.regions.len(), "Dashboard data loaded");
                self.set_status(
                    format!("Data loaded for {} regions", self.ui.regions.len()),
                    StatusTone::Info,
                );
            }
            3 => self.set_status(
                "Failed to load data. Make sure the backend is running.",
                StatusTone::Error,
            ),
            _ => self.set_status(
                format!("Loaded with {failure_count} failed requests"),
                StatusTone::Warning,
            ),
        }
    }

    /// Drop selections that no longer exist after a reload.
    fn retain_known_selections(&mut self) {
        let known = |selection: &Option<String>, regions: &[String]| {
            selection
                .as_ref()
                .filter(|name| regions.iter().any(|r| r == *name))
                .cloned()
        };
        self.ui.forecast.selected_region = known(&self.ui.forecast.selected_region, &self.ui.regions);
        self.ui.drivers.selected_region = known(&self.ui.drivers.selected_region, &self.ui.regions);
        self.ui.accuracy.selected_region = known(&self.ui.accuracy.selected_region, &self.ui.regions);
    }

    /// Switch the visible dashboard section.
    pub fn select_section(&mut self, section: Section) {
        self.ui.section = section;
    }

    /// Change the forecast-chart region; `None` clears the selection.
    pub fn select_forecast_region(&mut self, region: Option<String>) {
        self.ui.forecast.selected_region = region;
        self.refresh_forecast_views();
    }

    /// Switch the forecast chart between forecast-only and actual-vs-forecast.
    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        if self.ui.forecast.kind == kind {
            return;
        }
        self.ui.forecast.kind = kind;
        self.refresh_forecast_views();
    }

    fn refresh_forecast_views(&mut self) {
        let target_year = self.config.forecast_target_year;
        let Some(region) = self.ui.forecast.selected_region.clone() else {
            self.ui.forecast.stats = StatsPanelState::unavailable(Some(target_year));
            self.chart.clear();
            self.ui.forecast.chart_placeholder = Some(SELECT_REGION_HINT.into());
            return;
        };

        let stats = stats::region_stats(
            self.data.comparison_rows(),
            self.data.forecast_rows(),
            &region,
            target_year,
        );
        self.ui.forecast.stats = view_model::stats_panel(stats.as_ref(), target_year);

        let (spec, missing_notice) = match self.ui.forecast.kind {
            ChartKind::Forecast => (
                view_model::forecast_chart_spec(self.data.forecast_rows(), &region),
                "No forecast data available.",
            ),
            ChartKind::Comparison => (
                view_model::comparison_chart_spec(self.data.comparison_rows(), &region),
                "No comparison data available.",
            ),
        };
        if spec.is_empty() {
            self.chart.clear();
            self.ui.forecast.chart_placeholder = Some(NO_DATA_PLACEHOLDER.into());
            self.push_notice(missing_notice);
        } else {
            self.chart.render(spec);
            self.ui.forecast.chart_placeholder = None;
        }
    }

    /// Change the coefficient-cards region; `None` clears the selection.
    pub fn select_driver_region(&mut self, region: Option<String>) {
        self.ui.drivers.selected_region = region;
        self.refresh_driver_views();
    }

    fn refresh_driver_views(&mut self) {
        self.ui.drivers.cards = match self.ui.drivers.selected_region.as_deref() {
            Some(region) => view_model::coefficient_cards(self.data.driver_rows(), region),
            None => view_model::placeholder_cards(),
        };
        self.ui.drivers.listing = view_model::driver_listing(self.data.driver_rows());
    }

    /// Change the accuracy-table filter; `None` means all regions.
    pub fn select_accuracy_region(&mut self, region: Option<String>) {
        self.ui.accuracy.selected_region = region;
        self.refresh_accuracy_table();
    }

    fn refresh_accuracy_table(&mut self) {
        self.ui.accuracy.table = view_model::accuracy_table(
            self.data.comparison_rows(),
            self.ui.accuracy.selected_region.as_deref(),
            self.config.flag_threshold_pct,
        );
    }

    /// Switch the driver history viewer to another category.
    pub fn select_history_category(&mut self, index: usize) {
        self.ui.overview.history = view_model::history_state(index);
    }

    fn refresh_overview(&mut self) {
        let summary = stats::overall_summary(self.data.comparison_rows());
        self.ui.overview.summary =
            view_model::overview_summary(summary.as_ref(), self.ui.regions.len());
    }

    /// Drop notices whose display window has passed.
    pub fn prune_notices(&mut self, now: Instant) {
        self.ui.notices.retain(|notice| notice.expires_at > now);
    }

    fn push_notice(&mut self, message: impl Into<String>) {
        self.ui.notices.push(TransientNotice {
            message: message.into(),
            expires_at: Instant::now() + NOTICE_TTL,
        });
    }

    fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status.text = text.into();
        self.ui.status.badge_label = tone.label().into();
        self.ui.status.badge_color = style::status_badge_color(tone);
    }
}

fn unwrap_fetch<T>(
    result: Option<Result<Vec<T>, ApiError>>,
    failures: &mut Vec<String>,
) -> Option<Vec<T>> {
    match result {
        Some(Ok(values)) => Some(values),
        Some(Err(err)) => {
            tracing::warn!("Fetch failed: {err}");
            failures.push(err.to_string());
            None
        }
        None => None,
    }
}

fn current_year() -> i32 {
    time::OffsetDateTime::now_utc().year()
}
