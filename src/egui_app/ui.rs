//! egui renderer for the dashboard UI.

pub mod style;

use std::time::{Duration, Instant};

use eframe::egui::{
    self, Align2, Area, Color32, FontId, Frame, Margin, Order, RichText, Shape, Stroke,
    StrokeKind, Ui,
};

use crate::chart::ChartInstance;
use crate::config::DashboardConfig;
use crate::egui_app::controller::DashboardController;
use crate::egui_app::state::{ChartKind, Section};
use crate::format;

/// Smallest usable window size.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::Vec2 { x: 960.0, y: 640.0 };

const CHART_HEIGHT: f32 = 280.0;

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: DashboardController,
    visuals_set: bool,
}

impl EguiApp {
    /// Create the app and kick off the initial data load.
    pub fn new(config: DashboardConfig) -> Self {
        let mut controller = DashboardController::new(config);
        controller.start_load();
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .inner_margin(Margin::symmetric(10, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("ForestCast PH")
                            .color(palette.accent_leaf)
                            .strong()
                            .size(18.0),
                    );
                    ui.add_space(16.0);
                    let active = self.controller.ui.section;
                    for section in Section::ALL {
                        if ui
                            .selectable_label(section == active, section.label())
                            .clicked()
                        {
                            self.controller.select_section(section);
                        }
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Reload").clicked() {
                            self.controller.reload();
                        }
                    });
                });
            });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = self.controller.ui.status.clone();
                let footer_year = self.controller.ui.footer_year;
                ui.horizontal(|ui| {
                    ui.add_space(6.0);
                    let (badge_rect, _) =
                        ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                    ui.painter().rect_filled(badge_rect, 3, status.badge_color);
                    ui.painter().rect_stroke(
                        badge_rect,
                        3,
                        style::section_stroke(),
                        StrokeKind::Inside,
                    );
                    ui.add_space(8.0);
                    ui.label(RichText::new(&status.badge_label).color(palette.text_primary));
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(palette.text_primary));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(format!("© {footer_year} ForestCast PH"))
                                .color(palette.text_muted),
                        );
                    });
                });
            });
    }

    fn render_notices(&mut self, ctx: &egui::Context) {
        let notices = self.controller.ui.notices.clone();
        if notices.is_empty() {
            return;
        }
        Area::new(egui::Id::new("error_notices"))
            .order(Order::Foreground)
            .anchor(Align2::CENTER_TOP, egui::vec2(0.0, 72.0))
            .show(ctx, |ui| {
                for notice in &notices {
                    Frame::new()
                        .fill(Color32::from_rgb(192, 57, 43))
                        .corner_radius(8)
                        .inner_margin(Margin::symmetric(16, 10))
                        .show(ui, |ui| {
                            ui.label(RichText::new(&notice.message).color(Color32::WHITE));
                        });
                    ui.add_space(6.0);
                }
            });
    }

    fn render_overview(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        ui.heading("Forest cover at a glance");
        ui.add_space(8.0);
        match self.controller.ui.overview.summary.clone() {
            Some(summary) => {
                ui.columns(4, |columns| {
                    stat_card(&mut columns[0], "Overall MAE", &summary.mean_ae);
                    stat_card(&mut columns[1], "Overall MAPE", &summary.mean_ape);
                    stat_card(&mut columns[2], "Regions tracked", &summary.region_count);
                    stat_card(&mut columns[3], "Comparison window", &summary.comparison_span);
                });
            }
            None => {
                ui.label(RichText::new("No data available").color(palette.text_muted));
            }
        }
        ui.add_space(16.0);
        ui.separator();
        ui.add_space(8.0);
        ui.label(RichText::new("Deforestation pressure by driver").strong());
        ui.add_space(6.0);

        let history = self.controller.ui.overview.history.clone();
        let selected_label = history
            .categories
            .get(history.selected)
            .cloned()
            .unwrap_or_default();
        egui::ComboBox::from_id_salt("history_category_combo")
            .width(200.0)
            .selected_text(selected_label)
            .show_ui(ui, |ui| {
                for (index, category) in history.categories.iter().enumerate() {
                    if ui
                        .selectable_label(index == history.selected, category)
                        .clicked()
                    {
                        self.controller.select_history_category(index);
                    }
                }
            });
        ui.add_space(8.0);
        egui::Grid::new("history_grid")
            .num_columns(5)
            .spacing([18.0, 10.0])
            .show(ui, |ui| {
                for (index, cell) in history.rows.iter().enumerate() {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&cell.year).color(palette.text_muted));
                        ui.label(RichText::new(&cell.share).strong());
                    });
                    if (index + 1) % 5 == 0 {
                        ui.end_row();
                    }
                }
            });
    }

    fn render_forecasts(&mut self, ui: &mut Ui) {
        ui.heading("Regional forecasts");
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let regions = self.controller.ui.regions.clone();
            let selected = self.controller.ui.forecast.selected_region.clone();
            if let Some(change) = region_combo(
                ui,
                "forecast_region_combo",
                "Select a region...",
                &regions,
                selected.as_deref(),
            ) {
                self.controller.select_forecast_region(change);
            }
            ui.add_space(12.0);
            let kind = self.controller.ui.forecast.kind;
            for option in [ChartKind::Forecast, ChartKind::Comparison] {
                if ui.selectable_label(kind == option, option.label()).clicked() {
                    self.controller.set_chart_kind(option);
                }
            }
        });
        ui.add_space(10.0);

        let stats = self.controller.ui.forecast.stats.clone();
        ui.columns(4, |columns| {
            stat_card(&mut columns[0], &stats.current_caption, &stats.current_value);
            stat_card(
                &mut columns[1],
                &stats.forecast_caption,
                &stats.forecast_value,
            );
            stat_card(&mut columns[2], "Avg MAE", &stats.mean_ae_pct);
            stat_card(&mut columns[3], "Avg MAPE", &stats.mean_ape_pct);
        });
        ui.add_space(12.0);
        self.render_chart(ui);
    }

    fn render_chart(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        if let Some(instance) = self.controller.chart().instance() {
            ui.horizontal(|ui| {
                for series in &instance.spec().series {
                    ui.colored_label(series.style.color, "●");
                    ui.label(RichText::new(&series.name).color(palette.text_muted));
                    ui.add_space(10.0);
                }
            });
            ui.add_space(4.0);
        }

        let desired = egui::vec2(ui.available_width(), CHART_HEIGHT);
        let (rect, _response) = ui.allocate_exact_size(desired, egui::Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 6, palette.bg_primary);
        painter.rect_stroke(rect, 6, style::section_stroke(), StrokeKind::Inside);

        if let Some(instance) = self.controller.chart().instance() {
            paint_chart(&painter, rect.shrink(18.0), instance);
        } else if let Some(text) = self.controller.ui.forecast.chart_placeholder.clone() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                text,
                FontId::proportional(14.0),
                palette.text_muted,
            );
        }
    }

    fn render_drivers(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        ui.heading("Deforestation drivers");
        ui.add_space(8.0);
        let regions = self.controller.ui.regions.clone();
        let selected = self.controller.ui.drivers.selected_region.clone();
        if let Some(change) = region_combo(
            ui,
            "driver_region_combo",
            "Select a region...",
            &regions,
            selected.as_deref(),
        ) {
            self.controller.select_driver_region(change);
        }
        ui.add_space(10.0);

        let cards = self.controller.ui.drivers.cards.clone();
        ui.columns(cards.len().max(1), |columns| {
            for (column, card) in columns.iter_mut().zip(&cards) {
                let indicator = match card.positive {
                    Some(true) => palette.success,
                    Some(false) => palette.warning,
                    None => palette.text_muted,
                };
                Frame::new()
                    .fill(palette.bg_tertiary)
                    .stroke(style::section_stroke())
                    .corner_radius(6)
                    .inner_margin(Margin::symmetric(10, 8))
                    .show(column, |ui| {
                        ui.horizontal(|ui| {
                            ui.colored_label(indicator, "●");
                            ui.label(RichText::new(&card.driver).strong());
                        });
                        ui.label(RichText::new(&card.coefficient).size(18.0));
                        ui.label(
                            RichText::new(format!("P-value: {}", card.p_value))
                                .color(palette.text_muted),
                        );
                    });
            }
        });
        ui.add_space(14.0);
        ui.separator();
        ui.add_space(6.0);
        ui.label(RichText::new("All regions").strong());
        ui.add_space(6.0);

        let listing = self.controller.ui.drivers.listing.clone();
        egui::ScrollArea::vertical()
            .id_salt("driver_listing_scroll")
            .show(ui, |ui| {
                if listing.is_empty() {
                    ui.label(RichText::new("No data available").color(palette.text_muted));
                    return;
                }
                for block in &listing {
                    ui.label(RichText::new(&block.region).color(palette.accent_leaf));
                    for row in &block.rows {
                        ui.horizontal(|ui| {
                            ui.add_space(10.0);
                            ui.label(&row.driver);
                            ui.label(
                                RichText::new(format!("Coef: {}", row.coefficient))
                                    .color(palette.text_muted),
                            );
                            ui.label(
                                RichText::new(format!("P-value: {}", row.p_value))
                                    .color(palette.text_muted),
                            );
                        });
                    }
                    ui.add_space(8.0);
                }
            });
    }

    fn render_accuracy(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        ui.heading("Forecast accuracy");
        ui.add_space(8.0);
        let regions = self.controller.ui.regions.clone();
        let selected = self.controller.ui.accuracy.selected_region.clone();
        if let Some(change) = region_combo(
            ui,
            "accuracy_region_combo",
            "All Regions",
            &regions,
            selected.as_deref(),
        ) {
            self.controller.select_accuracy_region(change);
        }
        ui.add_space(10.0);

        let table = self.controller.ui.accuracy.table.clone();
        if let Some(placeholder) = &table.placeholder {
            ui.label(RichText::new(placeholder).color(palette.text_muted));
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("accuracy_scroll")
            .max_height((ui.available_height() - 36.0).max(120.0))
            .show(ui, |ui| {
                egui::Grid::new("accuracy_grid")
                    .num_columns(6)
                    .striped(true)
                    .spacing([18.0, 6.0])
                    .show(ui, |ui| {
                        for title in ["Region", "Year", "Actual", "Forecast", "MAE", "MAPE"] {
                            ui.label(RichText::new(title).strong());
                        }
                        ui.end_row();
                        for row in &table.rows {
                            ui.label(&row.region);
                            ui.label(&row.year);
                            ui.label(&row.actual);
                            ui.label(&row.forecast);
                            ui.label(error_cell(&row.ae, row.ae_flagged, &palette));
                            ui.label(error_cell(&row.ape, row.ape_flagged, &palette));
                            ui.end_row();
                        }
                    });
            });
        if let Some(summary) = &table.summary {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!("Mean AE: {}", summary.mean_ae))
                        .color(palette.text_muted),
                );
                ui.separator();
                ui.label(
                    RichText::new(format!("Mean APE: {}", summary.mean_ape))
                        .color(palette.text_muted),
                );
            });
        }
    }
}

/// Render one labeled statistic card.
fn stat_card(ui: &mut Ui, caption: &str, value: &str) {
    let palette = style::palette();
    Frame::new()
        .fill(palette.bg_tertiary)
        .stroke(style::section_stroke())
        .corner_radius(6)
        .inner_margin(Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.label(RichText::new(caption).color(palette.text_muted).size(11.0));
            ui.label(RichText::new(value).strong().size(17.0));
        });
}

/// Shared region dropdown; returns the new selection when it changed.
fn region_combo(
    ui: &mut Ui,
    id: &str,
    empty_label: &str,
    regions: &[String],
    selected: Option<&str>,
) -> Option<Option<String>> {
    let mut change = None;
    let current = selected.unwrap_or(empty_label).to_string();
    egui::ComboBox::from_id_salt(id)
        .width(230.0)
        .selected_text(current)
        .show_ui(ui, |ui| {
            if ui.selectable_label(selected.is_none(), empty_label).clicked() {
                change = Some(None);
            }
            for region in regions {
                if ui
                    .selectable_label(selected == Some(region.as_str()), region)
                    .clicked()
                {
                    change = Some(Some(region.clone()));
                }
            }
        });
    change
}

fn error_cell(text: &str, flagged: bool, palette: &style::Palette) -> RichText {
    if flagged {
        RichText::new(text).color(style::flagged_color()).strong()
    } else {
        RichText::new(text).color(palette.text_primary)
    }
}

/// Paint gridlines, axis labels, and every series of a prepared chart.
fn paint_chart(painter: &egui::Painter, inner: egui::Rect, instance: &ChartInstance) {
    let palette = style::palette();
    let (min, max) = instance.value_range();

    for tick in 0..=3 {
        let frac = tick as f32 / 3.0;
        let y = inner.bottom() - frac * inner.height();
        painter.line_segment(
            [egui::pos2(inner.left(), y), egui::pos2(inner.right(), y)],
            Stroke::new(1.0, palette.grid_soft),
        );
        let value = min + (max - min) * frac as f64;
        painter.text(
            egui::pos2(inner.left() + 2.0, y - 2.0),
            Align2::LEFT_BOTTOM,
            format::grouped(value),
            FontId::proportional(10.0),
            palette.text_muted,
        );
    }

    let years = &instance.spec().years;
    if let (Some(first), Some(last)) = (years.first(), years.last()) {
        painter.text(
            egui::pos2(inner.left(), inner.bottom() + 4.0),
            Align2::LEFT_TOP,
            first.to_string(),
            FontId::proportional(10.0),
            palette.text_muted,
        );
        if last != first {
            painter.text(
                egui::pos2(inner.right(), inner.bottom() + 4.0),
                Align2::RIGHT_TOP,
                last.to_string(),
                FontId::proportional(10.0),
                palette.text_muted,
            );
        }
    }

    for (index, series) in instance.spec().series.iter().enumerate() {
        let points = instance.polyline(index, inner);
        if points.len() < 2 {
            if let Some(point) = points.first() {
                painter.circle_filled(*point, 3.0, series.style.color);
            }
            continue;
        }
        if series.style.fill {
            let fill = series.style.color.gamma_multiply(0.12);
            for pair in points.windows(2) {
                let quad = vec![
                    pair[0],
                    pair[1],
                    egui::pos2(pair[1].x, inner.bottom()),
                    egui::pos2(pair[0].x, inner.bottom()),
                ];
                painter.add(Shape::convex_polygon(quad, fill, Stroke::NONE));
            }
        }
        let stroke = Stroke::new(2.5, series.style.color);
        if series.style.dashed {
            painter.extend(Shape::dashed_line(&points, stroke, 8.0, 5.0));
        } else {
            painter.add(Shape::line(points, stroke));
        }
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_jobs();
        self.controller.prune_notices(Instant::now());

        self.render_top_bar(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            Frame::new()
                .inner_margin(Margin::symmetric(14, 10))
                .show(ui, |ui| match self.controller.ui.section {
                    Section::Overview => self.render_overview(ui),
                    Section::Forecasts => self.render_forecasts(ui),
                    Section::Drivers => self.render_drivers(ui),
                    Section::Accuracy => self.render_accuracy(ui),
                });
        });
        self.render_notices(ctx);

        // Keep polling for background fetch results without a busy loop.
        ctx.request_repaint_after(Duration::from_millis(150));
    }
}
