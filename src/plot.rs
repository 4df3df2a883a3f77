use std::fmt::Write;

use crate::models::{AnnotatedRecord, RiskLevel};

pub const PLOT_FILE_NAME: &str = "risk_plot.svg";
pub const PLOT_TITLE: &str = "Employee Risk Clustering";
pub const X_LABEL: &str = "Stress Level";
pub const Y_LABEL: &str = "Heart Rate";

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const POINT_RADIUS: f64 = 6.0;
const LABEL_OFFSET: f64 = 0.1;
const TARGET_TICKS: f64 = 6.0;
const MAX_TICKS: usize = 50;

pub fn tier_color(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "green",
        RiskLevel::Moderate => "orange",
        RiskLevel::High => "red",
    }
}

/// Data range of one axis, padded so points never sit on the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return AxisRange { min: 0.0, max: 1.0 };
        }

        let mut min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let mut max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            min -= 1.0;
            max += 1.0;
        }

        let pad = (max - min) * 0.05;
        AxisRange {
            min: min - pad,
            max: max + pad,
        }
    }

    /// Fraction of the way from `min` to `max`.
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    pub fn ticks(&self) -> Vec<f64> {
        let step = nice_step((self.max - self.min) / TARGET_TICKS);
        let first = (self.min / step).ceil() * step;
        let mut ticks: Vec<f64> = Vec::new();
        if !step.is_finite() || step <= 0.0 || !first.is_finite() {
            return ticks;
        }

        // Steps below the ulp of large values collapse onto the same tick.
        for i in 0..MAX_TICKS {
            let tick = first + i as f64 * step;
            if tick > self.max + step * 1e-9 {
                break;
            }
            let tick = if tick.abs() < step * 1e-9 { 0.0 } else { tick };
            if ticks.last() != Some(&tick) {
                ticks.push(tick);
            }
        }

        ticks
    }
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

struct Frame {
    x: AxisRange,
    y: AxisRange,
}

impl Frame {
    fn for_rows(rows: &[AnnotatedRecord]) -> Self {
        let stress: Vec<f64> = rows.iter().map(|row| row.record.stress).collect();
        let heart_rate: Vec<f64> = rows.iter().map(|row| row.record.heart_rate).collect();
        Frame {
            x: AxisRange::from_values(&stress),
            y: AxisRange::from_values(&heart_rate),
        }
    }

    fn plot_width() -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height() -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn px(&self, stress: f64) -> f64 {
        MARGIN_LEFT + self.x.normalize(stress) * Self::plot_width()
    }

    fn py(&self, heart_rate: f64) -> f64 {
        MARGIN_TOP + Self::plot_height() - self.y.normalize(heart_rate) * Self::plot_height()
    }
}

/// Renders stress (x) against heart rate (y), one labeled point per record.
pub fn scatter_svg(rows: &[AnnotatedRecord]) -> String {
    let frame = Frame::for_rows(rows);

    let left = MARGIN_LEFT;
    let top = MARGIN_TOP;
    let right = WIDTH - MARGIN_RIGHT;
    let bottom = HEIGHT - MARGIN_BOTTOM;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" font-family=\"sans-serif\">"
    );
    let _ = writeln!(
        svg,
        "<rect x=\"0\" y=\"0\" width=\"{WIDTH}\" height=\"{HEIGHT}\" fill=\"white\" />"
    );
    let _ = writeln!(
        svg,
        "<text x=\"{:.1}\" y=\"30\" text-anchor=\"middle\" font-size=\"16\">{PLOT_TITLE}</text>",
        WIDTH / 2.0
    );

    let _ = writeln!(svg, "<g class=\"grid\" stroke=\"#dddddd\" stroke-width=\"1\">");
    for tick in frame.x.ticks() {
        let x = frame.px(tick);
        let _ = writeln!(
            svg,
            "<line x1=\"{x:.2}\" y1=\"{top:.2}\" x2=\"{x:.2}\" y2=\"{bottom:.2}\" />"
        );
    }
    for tick in frame.y.ticks() {
        let y = frame.py(tick);
        let _ = writeln!(
            svg,
            "<line x1=\"{left:.2}\" y1=\"{y:.2}\" x2=\"{right:.2}\" y2=\"{y:.2}\" />"
        );
    }
    let _ = writeln!(svg, "</g>");

    let _ = writeln!(
        svg,
        "<rect x=\"{left:.2}\" y=\"{top:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"black\" />",
        right - left,
        bottom - top
    );

    let _ = writeln!(svg, "<g class=\"ticks\" font-size=\"11\">");
    for tick in frame.x.ticks() {
        let _ = writeln!(
            svg,
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>",
            frame.px(tick),
            bottom + 16.0,
            format_tick(tick)
        );
    }
    for tick in frame.y.ticks() {
        let _ = writeln!(
            svg,
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\">{}</text>",
            left - 6.0,
            frame.py(tick) + 4.0,
            format_tick(tick)
        );
    }
    let _ = writeln!(svg, "</g>");

    let _ = writeln!(
        svg,
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"13\">{X_LABEL}</text>",
        (left + right) / 2.0,
        HEIGHT - 15.0
    );
    let _ = writeln!(
        svg,
        "<text x=\"20\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"13\" transform=\"rotate(-90 20 {:.2})\">{Y_LABEL}</text>",
        (top + bottom) / 2.0,
        (top + bottom) / 2.0
    );

    let _ = writeln!(svg, "<g class=\"points\">");
    for row in rows {
        let record = &row.record;
        let level = row.assessment.risk_level;
        let id = escape_xml(&record.id);
        let _ = writeln!(
            svg,
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{POINT_RADIUS}\" fill=\"{}\" data-risk=\"{level}\"><title>{id}: {level}</title></circle>",
            frame.px(record.stress),
            frame.py(record.heart_rate),
            tier_color(level)
        );
    }
    let _ = writeln!(svg, "</g>");

    let _ = writeln!(svg, "<g class=\"labels\" font-size=\"11\">");
    for row in rows {
        let record = &row.record;
        let _ = writeln!(
            svg,
            "<text x=\"{:.2}\" y=\"{:.2}\">{}</text>",
            frame.px(record.stress + LABEL_OFFSET),
            frame.py(record.heart_rate + LABEL_OFFSET),
            escape_xml(&record.id)
        );
    }
    let _ = writeln!(svg, "</g>");
    let _ = writeln!(svg, "</svg>");

    svg
}
