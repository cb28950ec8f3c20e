//! Line-chart model for the dashboard.
//!
//! The host owns at most one prepared chart at a time: rendering a new spec
//! replaces (and thereby drops) the previous instance, so repeated
//! re-renders from rapid selector changes cannot accumulate chart state.

use egui::{Color32, Pos2, Rect};

/// Visual treatment of one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: Color32,
    /// Shade the area beneath the line.
    pub fill: bool,
    /// Draw the line dashed instead of solid.
    pub dashed: bool,
}

/// A named series of y-values aligned with the spec's year labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    pub style: SeriesStyle,
}

/// Labels plus one or more series, ready to prepare for drawing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSpec {
    pub years: Vec<i32>,
    pub series: Vec<Series>,
}

impl ChartSpec {
    /// True when there is nothing drawable.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() || self.series.iter().all(|s| s.values.is_empty())
    }
}

/// A prepared chart: spec plus cached value bounds.
#[derive(Debug, Clone)]
pub struct ChartInstance {
    spec: ChartSpec,
    generation: u64,
    value_min: f64,
    value_max: f64,
}

impl ChartInstance {
    fn new(spec: ChartSpec, generation: u64) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for series in &spec.series {
            for &value in &series.values {
                if value.is_finite() {
                    min = min.min(value);
                    max = max.max(value);
                }
            }
        }
        if !min.is_finite() || !max.is_finite() {
            min = 0.0;
            max = 1.0;
        }
        let padding = ((max - min) * 0.05).max(max.abs().max(1.0) * 0.01);
        Self {
            spec,
            generation,
            value_min: min - padding,
            value_max: max + padding,
        }
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    /// Monotonic id of the render call that produced this instance.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Padded y-axis bounds covering every finite value.
    pub fn value_range(&self) -> (f64, f64) {
        (self.value_min, self.value_max)
    }

    /// Screen position of one data point inside `rect`.
    pub fn point(&self, series_index: usize, value_index: usize, rect: Rect) -> Option<Pos2> {
        let series = self.spec.series.get(series_index)?;
        let value = *series.values.get(value_index)?;
        if !value.is_finite() {
            return None;
        }
        let count = series.values.len();
        let x_frac = if count <= 1 {
            0.5
        } else {
            value_index as f32 / (count - 1) as f32
        };
        let span = (self.value_max - self.value_min).max(f64::EPSILON);
        let y_frac = ((value - self.value_min) / span) as f32;
        Some(Pos2::new(
            rect.left() + x_frac * rect.width(),
            rect.bottom() - y_frac * rect.height(),
        ))
    }

    /// All drawable points of a series inside `rect`, in x order.
    pub fn polyline(&self, series_index: usize, rect: Rect) -> Vec<Pos2> {
        let Some(series) = self.spec.series.get(series_index) else {
            return Vec::new();
        };
        (0..series.values.len())
            .filter_map(|idx| self.point(series_index, idx, rect))
            .collect()
    }
}

/// Owns the single live chart for one mount point.
#[derive(Debug, Default)]
pub struct ChartHost {
    instance: Option<ChartInstance>,
    renders: u64,
}

impl ChartHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the previous chart with one prepared from `spec`.
    ///
    /// An empty spec creates nothing and leaves any previous chart in
    /// place; the caller surfaces a "no data" notice instead. Returns
    /// whether a chart was created.
    pub fn render(&mut self, spec: ChartSpec) -> bool {
        if spec.is_empty() {
            return false;
        }
        self.renders += 1;
        self.instance = Some(ChartInstance::new(spec, self.renders));
        true
    }

    /// Drop the live chart, leaving the placeholder to render.
    pub fn clear(&mut self) {
        self.instance = None;
    }

    pub fn instance(&self) -> Option<&ChartInstance> {
        self.instance.as_ref()
    }

    /// Number of charts created over the host's lifetime.
    pub fn renders(&self) -> u64 {
        self.renders
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> SeriesStyle {
        SeriesStyle {
            color: Color32::WHITE,
            fill: false,
            dashed: false,
        }
    }

    fn spec(values: &[f64]) -> ChartSpec {
        ChartSpec {
            years: (0..values.len() as i32).collect(),
            series: vec![Series {
                name: "series".into(),
                values: values.to_vec(),
                style: style(),
            }],
        }
    }

    #[test]
    fn empty_spec_creates_no_chart() {
        let mut host = ChartHost::new();
        assert!(!host.render(ChartSpec::default()));
        assert!(host.instance().is_none());
        assert_eq!(host.renders(), 0);
    }

    #[test]
    fn spec_with_only_empty_series_is_empty() {
        let chart = ChartSpec {
            years: vec![2021, 2022],
            series: vec![Series {
                name: "empty".into(),
                values: Vec::new(),
                style: style(),
            }],
        };
        assert!(chart.is_empty());
    }

    #[test]
    fn rerender_replaces_the_single_instance() {
        let mut host = ChartHost::new();
        assert!(host.render(spec(&[1.0, 2.0])));
        let first = host.instance().unwrap().generation();
        assert!(host.render(spec(&[1.0, 2.0])));
        let second = host.instance().unwrap().generation();
        // One live instance, produced by the second render call.
        assert_eq!(first + 1, second);
        assert_eq!(host.renders(), 2);
    }

    #[test]
    fn empty_rerender_keeps_previous_chart() {
        let mut host = ChartHost::new();
        assert!(host.render(spec(&[1.0])));
        assert!(!host.render(ChartSpec::default()));
        assert!(host.instance().is_some());
        assert_eq!(host.renders(), 1);
    }

    #[test]
    fn clear_disposes_the_chart() {
        let mut host = ChartHost::new();
        host.render(spec(&[1.0]));
        host.clear();
        assert!(host.instance().is_none());
    }

    #[test]
    fn value_range_covers_and_pads_extremes() {
        let mut host = ChartHost::new();
        host.render(spec(&[10.0, 30.0]));
        let (min, max) = host.instance().unwrap().value_range();
        assert!(min < 10.0);
        assert!(max > 30.0);
    }

    #[test]
    fn flat_series_still_has_positive_span() {
        let mut host = ChartHost::new();
        host.render(spec(&[5.0, 5.0]));
        let (min, max) = host.instance().unwrap().value_range();
        assert!(max > min);
    }

    #[test]
    fn polyline_maps_low_to_bottom_and_high_to_top() {
        let mut host = ChartHost::new();
        host.render(spec(&[0.0, 100.0]));
        let rect = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(100.0, 50.0));
        let points = host.instance().unwrap().polyline(0, rect);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].x, 0.0);
        assert_eq!(points[1].x, 100.0);
        assert!(points[0].y > points[1].y);
    }

    #[test]
    fn non_finite_values_are_skipped() {
        let mut host = ChartHost::new();
        host.render(spec(&[1.0, f64::NAN, 3.0]));
        let rect = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(100.0, 50.0));
        let points = host.instance().unwrap().polyline(0, rect);
        assert_eq!(points.len(), 2);
    }
}
