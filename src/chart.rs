use std::fmt;

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::api::{CurrentPrice, PricePoint};
use crate::template::{RenderContext, SvgTemplate};
use crate::RenderError;

/// Colour scheme the template switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps the wall-clock time onto the x axis of the chart.
///
/// The defaults are calibrated for the bundled 300x300 template showing 24 hourly
/// prices in Central European time; they don't depend on the series being drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NowMarker {
    /// Offset from UTC the wall clock is read in
    pub utc_offset_seconds: i64,
    /// X position of hour 1
    pub origin: f64,
    pub pixels_per_hour: f64,
}

impl Default for NowMarker {
    fn default() -> Self {
        Self {
            utc_offset_seconds: 3600,
            origin: 135.0,
            pixels_per_hour: 12.5,
        }
    }
}

impl NowMarker {
    pub fn position(&self, now: DateTime<Utc>) -> f64 {
        let local = (now.naive_utc() + Duration::seconds(self.utc_offset_seconds)).time();
        let hours = local.hour() as f64 - 1.0 + local.minute() as f64 / 60.0;

        hours * self.pixels_per_hour + self.origin
    }
}

/// Y axis labels in cents.
///
/// The labels always use a fixed factor of 100, independent of [`Chart::scale`].
/// Returns no labels for an empty series.
pub fn price_labels(series: &[PricePoint]) -> Vec<String> {
    if series.is_empty() {
        return Vec::new();
    }

    let max_y = series
        .iter()
        .map(|p| p.total * 100.0)
        .fold(f64::NEG_INFINITY, f64::max);
    let step = (max_y / 4.0).ceil() as i64;

    (1..=4).map(|i| (i * step).to_string()).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub width: f64,
    pub height: f64,
    /// Factor prices are multiplied with before plotting
    pub scale: f64,
    pub theme: Theme,
    pub show_now: bool,
    pub now_marker: NowMarker,
}

impl Default for Chart {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 300.0,
            scale: 1.0,
            theme: Theme::default(),
            show_now: true,
            now_marker: NowMarker::default(),
        }
    }
}

impl Chart {
    /// Coordinates of the price line as space separated `x,y` pairs.
    ///
    /// The origin is the top-left corner, so higher prices get smaller y values.
    /// The highest price touches the top edge. A single price is drawn in the
    /// horizontal center and a series whose maximum is zero lies on the bottom edge.
    pub fn polyline_points(&self, series: &[PricePoint]) -> String {
        let n = series.len();
        if n == 0 {
            return String::new();
        }

        let max_y = series
            .iter()
            .map(|p| p.total * self.scale)
            .fold(f64::NEG_INFINITY, f64::max);

        series
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let x = if n == 1 {
                    self.width / 2.0
                } else {
                    (i as f64 * self.width) / (n - 1) as f64
                };
                let y = if max_y == 0.0 {
                    self.height
                } else {
                    self.height - ((p.total * self.scale) / max_y) * self.height
                };
                format!("{x},{y}")
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn context(
        &self,
        series: &[PricePoint],
        current: &CurrentPrice,
        now: DateTime<Utc>,
    ) -> RenderContext {
        RenderContext {
            theme: self.theme.as_str(),
            points: self.polyline_points(series),
            price_labels: price_labels(series),
            current_x: self.now_marker.position(now),
            price_level: current.level.clone(),
            current_price: current.cents(),
            show_now: self.show_now,
        }
    }

    /// Render `series` into `template`, returning the raw svg.
    pub fn render(
        &self,
        template: &SvgTemplate,
        series: &[PricePoint],
        current: &CurrentPrice,
        now: DateTime<Utc>,
    ) -> Result<String, RenderError> {
        template.render(&self.context(series, current, now))
    }
}
