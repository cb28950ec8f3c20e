//! Palette and shared visual helpers for the dashboard UI.

use eframe::egui::{Color32, Stroke, Visuals};

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,
    pub panel_outline: Color32,
    pub grid_soft: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent_leaf: Color32,
    pub accent_moss: Color32,
    pub accent_amber: Color32,
    pub warning: Color32,
    pub success: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(12, 16, 13),
        bg_secondary: Color32::from_rgb(22, 28, 24),
        bg_tertiary: Color32::from_rgb(34, 42, 36),
        panel_outline: Color32::from_rgb(44, 54, 46),
        grid_soft: Color32::from_rgb(32, 38, 34),
        text_primary: Color32::from_rgb(196, 205, 197),
        text_muted: Color32::from_rgb(140, 150, 142),
        accent_leaf: Color32::from_rgb(47, 164, 79),
        accent_moss: Color32::from_rgb(89, 133, 92),
        accent_amber: Color32::from_rgb(240, 168, 75),
        warning: Color32::from_rgb(200, 110, 90),
        success: Color32::from_rgb(102, 176, 136),
    }
}

/// Tones for the status badge in the footer bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Loading,
    Info,
    Warning,
    Error,
}

impl StatusTone {
    pub fn label(self) -> &'static str {
        match self {
            StatusTone::Idle => "Idle",
            StatusTone::Loading => "Loading",
            StatusTone::Info => "Info",
            StatusTone::Warning => "Warning",
            StatusTone::Error => "Error",
        }
    }
}

pub fn status_badge_color(tone: StatusTone) -> Color32 {
    let palette = palette();
    match tone {
        StatusTone::Idle => palette.bg_tertiary,
        StatusTone::Loading => Color32::from_rgb(31, 120, 200),
        StatusTone::Info => palette.success,
        StatusTone::Warning => Color32::from_rgb(192, 138, 43),
        StatusTone::Error => Color32::from_rgb(192, 57, 43),
    }
}

/// Line color of the forecast-only chart series.
pub fn chart_forecast_color() -> Color32 {
    palette().accent_moss
}

/// Line color of the actual series in the comparison chart.
pub fn chart_actual_color() -> Color32 {
    palette().accent_leaf
}

/// Line color of the forecast series in the comparison chart.
pub fn chart_projection_color() -> Color32 {
    palette().accent_amber
}

/// Cell tint for error values above the flag threshold.
pub fn flagged_color() -> Color32 {
    palette().warning
}

pub fn section_stroke() -> Stroke {
    Stroke::new(1.0, palette().panel_outline)
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_secondary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.bg_tertiary;
    visuals.error_fg_color = palette.warning;
    visuals.warn_fg_color = palette.warning;
    visuals.selection.bg_fill = palette.grid_soft;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent_leaf);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    visuals.widgets.inactive.bg_fill = palette.bg_tertiary;
    visuals.widgets.hovered.bg_fill = palette.bg_tertiary;
    visuals.widgets.active.bg_fill = palette.grid_soft;
}
