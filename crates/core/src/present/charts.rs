//! Chart descriptions for the standard dashboard.
//!
//! A [`ChartSpec`] is what a renderer needs to draw one chart; it carries no
//! drawing state. The browser crate paints these onto canvases and the
//! terminal client prints a condensed form.

use serde::Serialize;

use crate::fmt::strategy_display_name;
use crate::model::agent_strategy;
use crate::prefix::ResultsView;

const PALETTE: [&str; 20] = [
    "#4dc9f6", "#f67019", "#f53794", "#537bc4", "#acc236", "#166a8f", "#00a950", "#58595b",
    "#8549ba", "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0",
    "#f032e6", "#bcf60c", "#fabebe", "#008080",
];

pub const COOPERATE_COLOR: &str = "rgba(75, 192, 192, 0.7)";
pub const DEFECT_COLOR: &str = "rgba(255, 99, 132, 0.7)";

/// `count` distinct colours. The first 20 come from a fixed palette; the rest
/// walk the hue circle by the golden angle so repeated renders agree.
pub fn palette(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match PALETTE.get(i) {
            Some(c) => c.to_string(),
            None => {
                let hue = ((i as f64) * 137.507_764) % 360.0;
                format!("hsla({}, 70%, 55%, 0.7)", hue.round() as u32)
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
    Radar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    /// One colour for the whole series, or one per point for bars/slices.
    pub colors: Vec<String>,
    pub fill: bool,
    pub dashed: bool,
}

impl Dataset {
    pub fn line(label: impl Into<String>, data: Vec<f64>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data,
            colors: vec![color.into()],
            fill: false,
            dashed: false,
        }
    }

    pub fn color(&self, idx: usize) -> &str {
        self.colors
            .get(idx)
            .or_else(|| self.colors.first())
            .map(String::as_str)
            .unwrap_or("#888888")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub y_title: Option<String>,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            y_title: None,
            labels: Vec::new(),
            datasets: Vec::new(),
        }
    }

    pub fn with_y_title(mut self, title: impl Into<String>) -> Self {
        self.y_title = Some(title.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.iter().all(|d| d.data.is_empty())
    }

    /// Largest value across datasets, for axis scaling.
    pub fn max_value(&self) -> f64 {
        self.datasets
            .iter()
            .flat_map(|d| d.data.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }
}

/// `1..=n` as strings.
pub fn round_numbers(n: usize) -> Vec<String> {
    (1..=n).map(|i| i.to_string()).collect()
}

/// `Round 1`, `Round 2`, … for the kind-specific line charts.
pub fn round_labels(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("Round {i}")).collect()
}

/// Cumulative score per agent over the revealed rounds.
pub fn score_chart(view: &ResultsView<'_>) -> ChartSpec {
    let colors = palette(view.scores.len());
    let mut chart = ChartSpec::new(ChartKind::Line, "Agent Scores Over Rounds")
        .with_y_title("Cumulative Score");
    chart.labels = round_numbers(view.revealed);
    chart.datasets = view
        .scores
        .iter()
        .zip(colors)
        .map(|((agent_id, series), color)| {
            Dataset::line(
                strategy_display_name(agent_strategy(agent_id)),
                series.to_vec(),
                color,
            )
        })
        .collect();
    chart
}

/// Average score per strategy (always the full-run aggregate).
pub fn strategy_score_chart(view: &ResultsView<'_>) -> ChartSpec {
    let perf = view.strategy_performance;
    let mut chart =
        ChartSpec::new(ChartKind::Bar, "Average Score by Strategy").with_y_title("Average Score");
    chart.labels = perf.keys().map(|s| strategy_display_name(s)).collect();
    chart.datasets = vec![Dataset {
        label: "Average Score".to_string(),
        data: perf.values().map(|p| p.avg_score.unwrap_or(0.0)).collect(),
        colors: palette(perf.len()),
        fill: true,
        dashed: false,
    }];
    chart
}

/// Overall cooperation vs defection for the revealed rounds.
pub fn cooperation_chart(view: &ResultsView<'_>) -> ChartSpec {
    let mut chart = ChartSpec::new(ChartKind::Doughnut, "Overall Cooperation vs Defection");
    chart.labels = vec!["Cooperation".to_string(), "Defection".to_string()];
    chart.datasets = vec![Dataset {
        label: "Moves".to_string(),
        data: vec![
            view.overall_cooperation as f64,
            view.overall_defection as f64,
        ],
        colors: vec![COOPERATE_COLOR.to_string(), DEFECT_COLOR.to_string()],
        fill: true,
        dashed: false,
    }];
    chart
}

/// Per-strategy cooperation rate in percent.
pub fn cooperation_rate_chart(view: &ResultsView<'_>) -> ChartSpec {
    let perf = view.strategy_performance;
    let mut chart = ChartSpec::new(ChartKind::Radar, "Strategy Cooperation Rates");
    chart.labels = perf.keys().map(|s| strategy_display_name(s)).collect();
    chart.datasets = vec![Dataset {
        label: "Cooperation Rate (%)".to_string(),
        data: perf
            .values()
            .map(|p| p.cooperation_rate.unwrap_or(0.0) * 100.0)
            .collect(),
        colors: vec!["rgb(75, 192, 192)".to_string()],
        fill: true,
        dashed: false,
    }];
    chart
}
