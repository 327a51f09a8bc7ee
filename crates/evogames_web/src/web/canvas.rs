//! Canvas painting for dashboard charts.

use evogames::present::charts::{ChartKind, ChartSpec};
use evogames::present::Frame;
use evogames::session::Renderer;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::layout::{self, PlotArea};
use crate::ui_model::CHART_CANVAS_IDS;

const BG: &str = "#ffffff";
const GRID: &str = "rgba(0, 0, 0, 0.08)";
const TEXT: &str = "#333333";
const MUTED: &str = "#777777";
const FONT: &str = "12px system-ui, sans-serif";
const TITLE_FONT: &str = "bold 14px system-ui, sans-serif";

/// Hands frames to the page. The dashboard view redraws its canvases
/// whenever the published frame changes.
pub(super) struct CanvasRenderer {
    frame: WriteSignal<Option<Frame>>,
}

impl CanvasRenderer {
    pub(super) fn new(frame: WriteSignal<Option<Frame>>) -> Self {
        Self { frame }
    }
}

impl Renderer for CanvasRenderer {
    fn render(&mut self, frame: &Frame) {
        self.frame.set(Some(frame.clone()));
    }

    fn clear(&mut self) {
        self.frame.set(None);
        for id in CHART_CANVAS_IDS {
            if let Some(canvas) = canvas_by_id(id) {
                let _ = clear_canvas(&canvas);
            }
        }
    }
}

/// Draw every chart of `frame` onto its canvas. Missing canvases are skipped.
pub(super) fn paint_frame(frame: &Frame) {
    for (id, chart) in CHART_CANVAS_IDS.iter().zip(frame.charts()) {
        let Some(canvas) = canvas_by_id(id) else {
            continue;
        };
        if let Err(e) = draw_chart(&canvas, chart) {
            web_sys::console::warn_1(&JsValue::from_str(&format!("{id}: {e}")));
        }
    }
}

fn canvas_by_id(id: &str) -> Option<HtmlCanvasElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()
}

fn context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, String> {
    canvas
        .get_context("2d")
        .map_err(|_| "canvas: get_context threw".to_string())?
        .ok_or("canvas: missing 2d context".to_string())?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| "canvas: context is not 2d".to_string())
}

fn clear_canvas(canvas: &HtmlCanvasElement) -> Result<(), String> {
    let ctx = context(canvas)?;
    ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
    Ok(())
}

pub(super) fn draw_chart(canvas: &HtmlCanvasElement, chart: &ChartSpec) -> Result<(), String> {
    let ctx = context(canvas)?;
    let w = canvas.width() as f64;
    let h = canvas.height() as f64;

    ctx.set_fill_style_str(BG);
    ctx.fill_rect(0.0, 0.0, w, h);

    ctx.set_font(TITLE_FONT);
    ctx.set_fill_style_str(TEXT);
    ctx.set_text_align("center");
    let _ = ctx.fill_text(&chart.title, w / 2.0, 18.0);

    if chart.is_empty() {
        ctx.set_font(FONT);
        ctx.set_fill_style_str(MUTED);
        let _ = ctx.fill_text("No data yet", w / 2.0, h / 2.0);
        return Ok(());
    }

    match chart.kind {
        ChartKind::Line => {
            draw_series_legend(&ctx, chart, w);
            draw_line(&ctx, chart, PlotArea::axes(w, h))
        }
        ChartKind::Bar => {
            draw_series_legend(&ctx, chart, w);
            draw_bars(&ctx, chart, PlotArea::axes(w, h))
        }
        ChartKind::Doughnut => {
            draw_slice_legend(&ctx, chart, w);
            draw_doughnut(&ctx, chart, PlotArea::round(w, h))
        }
        ChartKind::Radar => {
            draw_series_legend(&ctx, chart, w);
            draw_radar(&ctx, chart, PlotArea::round(w, h))
        }
    }
}

fn draw_legend(ctx: &CanvasRenderingContext2d, entries: &[(&str, &str)], w: f64) {
    ctx.set_font(FONT);
    ctx.set_text_align("left");
    let y = layout::TITLE_H + 6.0;
    let mut x = 8.0;
    for (label, color) in entries {
        let width = ctx.measure_text(label).map(|m| m.width()).unwrap_or(60.0);
        if x + 16.0 + width > w {
            break;
        }
        ctx.set_fill_style_str(color);
        ctx.fill_rect(x, y, 10.0, 10.0);
        ctx.set_fill_style_str(TEXT);
        let _ = ctx.fill_text(label, x + 14.0, y + 9.0);
        x += 24.0 + width;
    }
}

fn draw_series_legend(ctx: &CanvasRenderingContext2d, chart: &ChartSpec, w: f64) {
    // A single unlabelled series needs no legend.
    if chart.datasets.len() == 1 && chart.datasets[0].label.is_empty() {
        return;
    }
    let entries: Vec<(&str, &str)> = chart
        .datasets
        .iter()
        .map(|d| (d.label.as_str(), d.color(0)))
        .collect();
    draw_legend(ctx, &entries, w);
}

fn draw_slice_legend(ctx: &CanvasRenderingContext2d, chart: &ChartSpec, w: f64) {
    let Some(data) = chart.datasets.first() else {
        return;
    };
    let entries: Vec<(&str, &str)> = chart
        .labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), data.color(i)))
        .collect();
    draw_legend(ctx, &entries, w);
}

/// Horizontal grid lines with value labels; returns the axis maximum.
fn draw_value_axis(ctx: &CanvasRenderingContext2d, chart: &ChartSpec, area: PlotArea) -> f64 {
    let max = layout::nice_ceiling(chart.max_value());

    ctx.set_font(FONT);
    ctx.set_stroke_style_str(GRID);
    ctx.set_line_width(1.0);
    ctx.set_fill_style_str(MUTED);
    ctx.set_text_align("right");
    for tick in layout::ticks(max, 4) {
        let y = area.y_for(tick, max);
        ctx.begin_path();
        ctx.move_to(area.x, y);
        ctx.line_to(area.x + area.w, y);
        ctx.stroke();
        let _ = ctx.fill_text(&format_tick(tick), area.x - 6.0, y + 4.0);
    }
    if let Some(title) = &chart.y_title {
        ctx.set_text_align("left");
        let _ = ctx.fill_text(title, 4.0, area.y - 6.0);
    }
    max
}

fn format_tick(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn draw_x_labels(ctx: &CanvasRenderingContext2d, labels: &[String], xs: &[f64], area: PlotArea) {
    let stride = layout::label_stride(labels.len(), area.w, 36.0);
    ctx.set_font(FONT);
    ctx.set_fill_style_str(MUTED);
    ctx.set_text_align("center");
    for (i, (label, x)) in labels.iter().zip(xs).enumerate() {
        if i % stride == 0 {
            let _ = ctx.fill_text(label, *x, area.bottom() + 14.0);
        }
    }
}

fn set_dash(ctx: &CanvasRenderingContext2d, dashed: bool) {
    let pattern = js_sys::Array::new();
    if dashed {
        pattern.push(&JsValue::from_f64(5.0));
        pattern.push(&JsValue::from_f64(5.0));
    }
    let _ = ctx.set_line_dash(&pattern);
}

fn draw_line(ctx: &CanvasRenderingContext2d, chart: &ChartSpec, area: PlotArea) -> Result<(), String> {
    let max = draw_value_axis(ctx, chart, area);
    let n = chart
        .datasets
        .iter()
        .map(|d| d.data.len())
        .max()
        .unwrap_or(0)
        .max(chart.labels.len());

    let xs: Vec<f64> = (0..n).map(|i| area.x_for(i, n)).collect();
    draw_x_labels(ctx, &chart.labels, &xs, area);

    for data in &chart.datasets {
        if data.data.is_empty() {
            continue;
        }
        let points: Vec<(f64, f64)> = data
            .data
            .iter()
            .enumerate()
            .map(|(i, v)| (xs[i], area.y_for(*v, max)))
            .collect();

        ctx.set_stroke_style_str(data.color(0));
        ctx.set_line_width(2.0);
        set_dash(ctx, data.dashed);
        ctx.begin_path();
        for (i, (x, y)) in points.iter().enumerate() {
            if i == 0 {
                ctx.move_to(*x, *y);
            } else {
                ctx.line_to(*x, *y);
            }
        }
        ctx.stroke();
        set_dash(ctx, false);

        if points.len() == 1 {
            let (x, y) = points[0];
            ctx.set_fill_style_str(data.color(0));
            ctx.begin_path();
            ctx.arc(x, y, 3.0, 0.0, std::f64::consts::TAU)
                .map_err(|_| "canvas: arc failed".to_string())?;
            ctx.fill();
        }

        if data.fill {
            if let (Some(first), Some(last)) = (points.first(), points.last()) {
                ctx.set_global_alpha(0.15);
                ctx.set_fill_style_str(data.color(0));
                ctx.begin_path();
                ctx.move_to(first.0, area.bottom());
                for (x, y) in &points {
                    ctx.line_to(*x, *y);
                }
                ctx.line_to(last.0, area.bottom());
                ctx.close_path();
                ctx.fill();
                ctx.set_global_alpha(1.0);
            }
        }
    }
    Ok(())
}

fn draw_bars(ctx: &CanvasRenderingContext2d, chart: &ChartSpec, area: PlotArea) -> Result<(), String> {
    let max = draw_value_axis(ctx, chart, area);
    let categories = chart.labels.len();
    let series = chart.datasets.len();
    let (group, bar) = layout::bar_slots(categories, series, area.w);

    let centers: Vec<f64> = (0..categories)
        .map(|i| area.x + group * (i as f64) + group / 2.0)
        .collect();
    draw_x_labels(ctx, &chart.labels, &centers, area);

    for (s, data) in chart.datasets.iter().enumerate() {
        for (i, v) in data.data.iter().enumerate().take(categories) {
            let x = area.x + group * (i as f64) + group * 0.15 + bar * (s as f64);
            let top = area.y_for(*v, max);
            ctx.set_fill_style_str(data.color(i));
            ctx.fill_rect(x, top, bar, area.bottom() - top);
        }
    }
    Ok(())
}

fn draw_doughnut(ctx: &CanvasRenderingContext2d, chart: &ChartSpec, area: PlotArea) -> Result<(), String> {
    let Some(data) = chart.datasets.first() else {
        return Ok(());
    };
    let (cx, cy) = area.center();
    let r = area.radius();
    let slices = layout::slice_angles(&data.data);

    if slices.is_empty() {
        ctx.set_stroke_style_str(GRID);
        ctx.set_line_width(r * 0.45);
        ctx.begin_path();
        ctx.arc(cx, cy, r * 0.775, 0.0, std::f64::consts::TAU)
            .map_err(|_| "canvas: arc failed".to_string())?;
        ctx.stroke();
        return Ok(());
    }

    for (i, (start, end)) in slices.into_iter().enumerate() {
        if end <= start {
            continue;
        }
        ctx.set_fill_style_str(data.color(i));
        ctx.begin_path();
        ctx.move_to(cx, cy);
        ctx.arc(cx, cy, r, start, end)
            .map_err(|_| "canvas: arc failed".to_string())?;
        ctx.close_path();
        ctx.fill();
    }

    ctx.set_fill_style_str(BG);
    ctx.begin_path();
    ctx.arc(cx, cy, r * 0.55, 0.0, std::f64::consts::TAU)
        .map_err(|_| "canvas: arc failed".to_string())?;
    ctx.fill();
    Ok(())
}

fn draw_radar(ctx: &CanvasRenderingContext2d, chart: &ChartSpec, area: PlotArea) -> Result<(), String> {
    let n = chart.labels.len();
    if n < 3 {
        // Fewer than three spokes do not enclose an area; show bars instead.
        return draw_bars(ctx, chart, PlotArea::axes(area.w, area.bottom()));
    }
    let center = area.center();
    let r = area.radius() - 12.0;
    let max = layout::nice_ceiling(chart.max_value());

    ctx.set_stroke_style_str(GRID);
    ctx.set_line_width(1.0);
    for ring in [0.25, 0.5, 0.75, 1.0] {
        ctx.begin_path();
        for i in 0..=n {
            let (x, y) = layout::radar_point(center, r, i % n, n, ring);
            if i == 0 {
                ctx.move_to(x, y);
            } else {
                ctx.line_to(x, y);
            }
        }
        ctx.stroke();
    }

    ctx.set_font(FONT);
    ctx.set_fill_style_str(MUTED);
    ctx.set_text_align("center");
    for (i, label) in chart.labels.iter().enumerate() {
        let (x, y) = layout::radar_point(center, r, i, n, 1.0);
        ctx.begin_path();
        ctx.move_to(center.0, center.1);
        ctx.line_to(x, y);
        ctx.stroke();
        let (lx, ly) = layout::radar_point(center, r + 12.0, i, n, 1.0);
        let _ = ctx.fill_text(label, lx, ly + 4.0);
    }

    for data in &chart.datasets {
        ctx.begin_path();
        for i in 0..=n {
            let v = data.data.get(i % n).copied().unwrap_or(0.0);
            let (x, y) = layout::radar_point(center, r, i % n, n, v / max);
            if i == 0 {
                ctx.move_to(x, y);
            } else {
                ctx.line_to(x, y);
            }
        }
        ctx.set_global_alpha(0.2);
        ctx.set_fill_style_str(data.color(0));
        ctx.fill();
        ctx.set_global_alpha(1.0);
        ctx.set_stroke_style_str(data.color(0));
        ctx.set_line_width(2.0);
        ctx.stroke();
    }
    Ok(())
}
