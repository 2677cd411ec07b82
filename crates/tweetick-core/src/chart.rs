//! Dual-axis comparison chart: one bar per day for a tweet metric, with the
//! hourly price series drawn as a line on a secondary axis.
//!
//! Rendering is plain SVG so charts can be written to disk and opened in any
//! browser.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;
use time::Month;

use crate::aligner::Alignment;
use crate::domain::DayBuckets;
use crate::{CoreError, ValidationError};

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 90.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 70.0;
const TICKS: usize = 5;

/// Which per-day aggregate is drawn as bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMetric {
    Count,
    Sentiment,
    Reach,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartOptions {
    /// Drop the first day in key order from both series.
    pub skip_first_day: bool,
    /// Token symbol used in titles, e.g. `COMP`.
    pub token: String,
    /// Account or query the tweets came from.
    pub subject: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            skip_first_day: true,
            token: String::from("COMP"),
            subject: String::from("$COMP"),
        }
    }
}

/// Chart model ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub price_label: String,
    pub bar_legend: String,
    pub price_legend: String,
    pub days: Vec<u8>,
    pub values: Vec<f64>,
    pub prices: Vec<f64>,
}

impl ComparisonChart {
    /// Builds the chart model from buckets and their alignment.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::SentimentNotComputed`] for the sentiment metric
    ///   when the alignment was computed without sentiment.
    /// - [`ValidationError::NotEnoughDays`] when no day is left to plot.
    pub fn build(
        buckets: &DayBuckets,
        alignment: &Alignment,
        metric: ChartMetric,
        options: &ChartOptions,
    ) -> Result<Self, ValidationError> {
        if metric == ChartMetric::Sentiment && !alignment.sentiment_included() {
            return Err(ValidationError::SentimentNotComputed);
        }

        let skip = usize::from(options.skip_first_day);
        let kept = buckets.iter().skip(skip).collect::<Vec<_>>();
        if kept.is_empty() {
            return Err(ValidationError::NotEnoughDays { days: 0 });
        }

        let days = kept.iter().map(|(day, _)| **day).collect::<Vec<_>>();
        let values = days
            .iter()
            .map(|day| {
                alignment.day(*day).map_or(0.0, |aggregate| match metric {
                    ChartMetric::Count => aggregate.tweet_count as f64,
                    ChartMetric::Sentiment => aggregate.sentiment_or_zero(),
                    ChartMetric::Reach => aggregate.total_reach as f64,
                })
            })
            .collect();
        let prices = kept
            .iter()
            .flat_map(|(_, bucket)| bucket.prices().iter().copied())
            .collect();

        let month = kept
            .first()
            .and_then(|(_, bucket)| Month::try_from(bucket.month().number()).ok())
            .map_or_else(String::new, |month| month.to_string());
        let token = options.token.as_str();
        let subject = options.subject.as_str();

        let (title, y_label) = match metric {
            ChartMetric::Count => (
                format!("{subject} Tweet Amount Effect on {token} Price"),
                "Number of Tweets",
            ),
            ChartMetric::Sentiment => (
                format!("{subject} Tweets Sentiment Effect on {token} Price"),
                "Mean Tweet Sentiment",
            ),
            ChartMetric::Reach => (
                format!("Reach (Followers) of {token} Tweets Effect on {token} Price"),
                "Reach of Tweets",
            ),
        };

        Ok(Self {
            title,
            x_label: format!("Days of {month}").trim_end().to_owned(),
            y_label: y_label.to_owned(),
            price_label: format!("Price of {token} (USD)"),
            bar_legend: String::from("Tweets"),
            price_legend: format!("{token} Price"),
            days,
            values,
            prices,
        })
    }

    /// Renders the chart as a standalone SVG document.
    pub fn render_svg(&self) -> Result<String, std::fmt::Error> {
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let left = MARGIN_LEFT;
        let right = WIDTH - MARGIN_RIGHT;
        let top = MARGIN_TOP;
        let bottom = HEIGHT - MARGIN_BOTTOM;

        let slots = self.days.len().max(1) as f64;
        let slot_width = plot_width / slots;
        let slot_x = |position: f64| left + (position + 0.5) * slot_width;

        let (bar_min, bar_max) = padded_range(self.values.iter().copied().chain([0.0]));
        let (price_min, price_max) = padded_range(self.prices.iter().copied());
        let bar_y = |value: f64| bottom - (value - bar_min) / (bar_max - bar_min) * plot_height;
        let price_y = |value: f64| bottom - (value - price_min) / (price_max - price_min) * plot_height;

        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
        )?;
        writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            svg,
            r#"<text x="{}" y="{}" font-size="20" text-anchor="middle">{}</text>"#,
            WIDTH / 2.0,
            top / 2.0 + 6.0,
            escape(&self.title)
        )?;

        for (position, value) in self.values.iter().enumerate() {
            let x = slot_x(position as f64) - slot_width / 2.0;
            let zero = bar_y(0.0);
            let end = bar_y(*value);
            writeln!(
                svg,
                r#"<rect class="bar" x="{x:.2}" y="{:.2}" width="{slot_width:.2}" height="{:.2}" fill="blue" stroke="black"/>"#,
                zero.min(end),
                (zero - end).abs()
            )?;
        }

        for (position, day) in self.days.iter().enumerate() {
            writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" font-size="14" text-anchor="middle">{day}</text>"#,
                slot_x(position as f64),
                bottom + 20.0
            )?;
        }

        if !self.prices.is_empty() {
            // Spread the series evenly from the left edge of the first bar
            // to the right edge of the last one.
            let steps = (self.prices.len() - 1).max(1) as f64;
            let points = self
                .prices
                .iter()
                .enumerate()
                .map(|(index, price)| {
                    let x = left + plot_width * index as f64 / steps;
                    format!("{x:.2},{:.2}", price_y(*price))
                })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(
                svg,
                r#"<polyline class="price" points="{points}" fill="none" stroke="red" stroke-width="4"/>"#
            )?;
        }

        writeln!(
            svg,
            r#"<line x1="{left}" y1="{bottom}" x2="{right}" y2="{bottom}" stroke="black"/>"#
        )?;
        writeln!(
            svg,
            r#"<line x1="{left}" y1="{top}" x2="{left}" y2="{bottom}" stroke="black"/>"#
        )?;
        writeln!(
            svg,
            r#"<line x1="{right}" y1="{top}" x2="{right}" y2="{bottom}" stroke="red"/>"#
        )?;

        for step in 0..=TICKS {
            let fraction = step as f64 / TICKS as f64;
            let y = bottom - fraction * plot_height;
            let bar_value = bar_min + fraction * (bar_max - bar_min);
            let price_value = price_min + fraction * (price_max - price_min);
            writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" font-size="12" text-anchor="end">{}</text>"#,
                left - 6.0,
                y + 4.0,
                format_tick(bar_value)
            )?;
            writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" font-size="12" fill="red">{}</text>"#,
                right + 6.0,
                y + 4.0,
                format_tick(price_value)
            )?;
        }

        writeln!(
            svg,
            r#"<text x="{}" y="{}" font-size="16" text-anchor="middle">{}</text>"#,
            left + plot_width / 2.0,
            HEIGHT - 15.0,
            escape(&self.x_label)
        )?;
        writeln!(
            svg,
            r#"<text transform="translate(20 {}) rotate(-90)" font-size="16" text-anchor="middle">{}</text>"#,
            top + plot_height / 2.0,
            escape(&self.y_label)
        )?;
        writeln!(
            svg,
            r#"<text transform="translate({} {}) rotate(90)" font-size="16" text-anchor="middle" fill="red">{}</text>"#,
            WIDTH - 20.0,
            top + plot_height / 2.0,
            escape(&self.price_label)
        )?;

        writeln!(
            svg,
            r#"<rect x="{}" y="{}" width="14" height="14" fill="blue" stroke="black"/><text x="{}" y="{}" font-size="13">{}</text>"#,
            left + 10.0,
            top + 10.0,
            left + 30.0,
            top + 22.0,
            escape(&self.bar_legend)
        )?;
        writeln!(
            svg,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="red" stroke-width="4"/><text x="{}" y="{}" font-size="13">{}</text>"#,
            left + 10.0,
            top + 37.0,
            left + 24.0,
            top + 37.0,
            left + 30.0,
            top + 42.0,
            escape(&self.price_legend)
        )?;

        svg.push_str("</svg>\n");
        Ok(svg)
    }

    /// Writes [`render_svg`](Self::render_svg) output to `path`, creating
    /// parent directories.
    pub fn write_svg(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let svg = self.render_svg().map_err(std::io::Error::other)?;
        std::fs::write(path, svg)?;
        Ok(())
    }
}

/// Min and max of `values`, widened when they coincide.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
        (min.min(value), max.max(value))
    });

    if !min.is_finite() || !max.is_finite() {
        (0.0, 1.0)
    } else if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 100.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
