//! Chart geometry shared by the canvas painter.
//!
//! Pure functions of sizes and values; nothing here touches the DOM.

use std::f64::consts::{FRAC_PI_2, TAU};

/// Drawing rectangle inside a canvas, leaving room for title, axes and legend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

pub const TITLE_H: f64 = 26.0;
pub const LEGEND_H: f64 = 22.0;
pub const AXIS_W: f64 = 44.0;
pub const LABEL_H: f64 = 20.0;

impl PlotArea {
    /// Area for axis charts (line, bar).
    pub fn axes(width: f64, height: f64) -> Self {
        Self {
            x: AXIS_W,
            y: TITLE_H + LEGEND_H,
            w: (width - AXIS_W - 10.0).max(1.0),
            h: (height - TITLE_H - LEGEND_H - LABEL_H).max(1.0),
        }
    }

    /// Square-ish area for round charts (doughnut, radar).
    pub fn round(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: TITLE_H + LEGEND_H,
            w: width.max(1.0),
            h: (height - TITLE_H - LEGEND_H).max(1.0),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn radius(&self) -> f64 {
        (self.w.min(self.h) / 2.0 - 8.0).max(1.0)
    }

    /// Canvas y for `value` on a `0..=max` axis.
    pub fn y_for(&self, value: f64, max: f64) -> f64 {
        let norm = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
        self.bottom() - norm * self.h
    }

    /// Canvas x of point `i` out of `n` spread across the full width.
    pub fn x_for(&self, i: usize, n: usize) -> f64 {
        if n <= 1 {
            self.x + self.w / 2.0
        } else {
            self.x + self.w * (i as f64) / ((n - 1) as f64)
        }
    }
}

/// Round `v` up to 1, 2 or 5 times a power of ten. Non-positive values give 1.
pub fn nice_ceiling(v: f64) -> f64 {
    if !(v.is_finite() && v > 0.0) {
        return 1.0;
    }
    let magnitude = 10f64.powf(v.log10().floor());
    let scaled = v / magnitude;
    let step = if scaled <= 1.0 {
        1.0
    } else if scaled <= 2.0 {
        2.0
    } else if scaled <= 5.0 {
        5.0
    } else {
        10.0
    };
    step * magnitude
}

/// Evenly spaced tick values from 0 to `max` inclusive.
pub fn ticks(max: f64, count: usize) -> Vec<f64> {
    let count = count.max(1);
    (0..=count)
        .map(|i| max * (i as f64) / (count as f64))
        .collect()
}

/// Start/end angles of each slice, clockwise from twelve o'clock.
/// All-zero or empty input has nothing to draw.
pub fn slice_angles(values: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = values.iter().filter(|v| v.is_finite() && **v > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut start = -FRAC_PI_2;
    values
        .iter()
        .map(|v| {
            let share = if v.is_finite() && *v > 0.0 { v / total } else { 0.0 };
            let end = start + share * TAU;
            let slice = (start, end);
            start = end;
            slice
        })
        .collect()
}

/// Point on spoke `i` of `n`, at `fraction` of `radius` from the center.
pub fn radar_point(center: (f64, f64), radius: f64, i: usize, n: usize, fraction: f64) -> (f64, f64) {
    let angle = -FRAC_PI_2 + TAU * (i as f64) / (n.max(1) as f64);
    let r = radius * fraction.clamp(0.0, 1.0);
    (center.0 + r * angle.cos(), center.1 + r * angle.sin())
}

/// Width of each category group and of one bar inside it.
pub fn bar_slots(categories: usize, series: usize, width: f64) -> (f64, f64) {
    let group = width / (categories.max(1) as f64);
    let bar = group * 0.7 / (series.max(1) as f64);
    (group, bar)
}

/// Show every `n`th x label so they do not overlap.
pub fn label_stride(labels: usize, width: f64, min_gap: f64) -> usize {
    if labels == 0 || min_gap <= 0.0 {
        return 1;
    }
    let fit = (width / min_gap).floor().max(1.0) as usize;
    labels.div_ceil(fit).max(1)
}
