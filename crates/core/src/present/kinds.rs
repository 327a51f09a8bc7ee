//! Per-dilemma presentation profiles.
//!
//! Every dilemma kind maps to one [`KindProfile`] row: two chart builders,
//! their titles, the insight rules, and a real-world connection.

use crate::fmt::strategy_axis_label;
use crate::model::{DilemmaKind, StrategyPerformance};
use crate::prefix::ResultsView;

use super::charts::{palette, round_labels, ChartKind, ChartSpec, Dataset};
use super::insights::{
    commons_insights, free_rider_insights, public_goods_insights, Insight,
};

pub struct KindProfile {
    pub kind: DilemmaKind,
    pub chart1_title: &'static str,
    pub chart2_title: &'static str,
    pub chart1: fn(&ResultsView<'_>) -> ChartSpec,
    pub chart2: fn(&ResultsView<'_>) -> ChartSpec,
    pub insights: fn(&ResultsView<'_>) -> Vec<Insight>,
    pub real_world: &'static str,
}

static PROFILES: [KindProfile; 3] = [
    KindProfile {
        kind: DilemmaKind::TragedyCommons,
        chart1_title: "Resource Level Over Rounds",
        chart2_title: "Harvests by Strategy Type",
        chart1: resource_level_chart,
        chart2: harvest_chart,
        insights: commons_insights,
        real_world: "Real-world examples include climate change, overfishing, and deforestation, where individual actors have incentives to overuse shared resources.",
    },
    KindProfile {
        kind: DilemmaKind::FreeRider,
        chart1_title: "Project Funding Progress",
        chart2_title: "Individual Gains by Strategy",
        chart1: funding_chart,
        chart2: gain_chart,
        insights: free_rider_insights,
        real_world: "Similar dynamics occur in public transportation fare evasion, tax compliance, and voluntary contributions to public services.",
    },
    KindProfile {
        kind: DilemmaKind::PublicGoods,
        chart1_title: "Public Goods Contributions",
        chart2_title: "Individual Payoffs by Strategy",
        chart1: contribution_chart,
        chart2: payoff_chart,
        insights: public_goods_insights,
        real_world: "This mirrors scenarios like open-source software development, Wikipedia contributions, and community improvement projects.",
    },
];

pub fn profile(kind: DilemmaKind) -> &'static KindProfile {
    // The table holds exactly one row per kind, in declaration order.
    match kind {
        DilemmaKind::TragedyCommons => &PROFILES[0],
        DilemmaKind::FreeRider => &PROFILES[1],
        DilemmaKind::PublicGoods => &PROFILES[2],
    }
}

fn filled_line(label: &str, data: &[f64], border: &str) -> Dataset {
    Dataset {
        label: label.to_string(),
        data: data.to_vec(),
        colors: vec![border.to_string()],
        fill: true,
        dashed: false,
    }
}

fn strategy_bars(
    view: &ResultsView<'_>,
    title: &str,
    label: &str,
    value: fn(&StrategyPerformance) -> f64,
) -> ChartSpec {
    let perf = view.strategy_performance;
    let mut chart = ChartSpec::new(ChartKind::Bar, title).with_y_title(label);
    chart.labels = perf.keys().map(|s| strategy_axis_label(s)).collect();
    chart.datasets = vec![Dataset {
        label: label.to_string(),
        data: perf.values().map(value).collect(),
        colors: palette(perf.len()),
        fill: true,
        dashed: false,
    }];
    chart
}

pub fn resource_level_chart(view: &ResultsView<'_>) -> ChartSpec {
    let mut chart = ChartSpec::new(ChartKind::Line, profile(DilemmaKind::TragedyCommons).chart1_title)
        .with_y_title("Resource Units");
    chart.labels = round_labels(view.revealed);
    if let Some(levels) = view.resource_levels {
        chart
            .datasets
            .push(filled_line("Resource Level", levels, "rgba(75, 192, 192, 1)"));
    }
    chart
}

pub fn harvest_chart(view: &ResultsView<'_>) -> ChartSpec {
    strategy_bars(
        view,
        profile(DilemmaKind::TragedyCommons).chart2_title,
        "Average Harvest Per Agent",
        StrategyPerformance::average_harvest,
    )
}

pub fn funding_chart(view: &ResultsView<'_>) -> ChartSpec {
    let mut chart = ChartSpec::new(ChartKind::Line, profile(DilemmaKind::FreeRider).chart1_title)
        .with_y_title("Funding (%)");
    chart.labels = round_labels(view.revealed);
    if let Some(progress) = view.funding_progress {
        chart
            .datasets
            .push(filled_line("Funding Progress", progress, "rgba(54, 162, 235, 1)"));
    }
    if let Some(threshold) = view.threshold {
        chart.datasets.push(Dataset {
            label: "Threshold".to_string(),
            data: vec![threshold; view.revealed],
            colors: vec!["rgba(255, 99, 132, 1)".to_string()],
            fill: false,
            dashed: true,
        });
    }
    chart
}

pub fn gain_chart(view: &ResultsView<'_>) -> ChartSpec {
    strategy_bars(
        view,
        profile(DilemmaKind::FreeRider).chart2_title,
        "Average Gain",
        |p| p.average_gain.unwrap_or(0.0),
    )
}

pub fn contribution_chart(view: &ResultsView<'_>) -> ChartSpec {
    let mut chart = ChartSpec::new(ChartKind::Line, profile(DilemmaKind::PublicGoods).chart1_title)
        .with_y_title("Average Contribution");
    chart.labels = round_labels(view.revealed);
    let colors = palette(view.strategy_performance.len());
    // One line per strategy, in strategy_performance order.
    for (strategy, color) in view.strategy_performance.keys().zip(colors) {
        let series = view
            .contribution_history
            .iter()
            .find(|(name, _)| *name == strategy.as_str())
            .map(|(_, s)| s.to_vec())
            .unwrap_or_default();
        chart
            .datasets
            .push(Dataset::line(strategy_axis_label(strategy), series, color));
    }
    chart
}

pub fn payoff_chart(view: &ResultsView<'_>) -> ChartSpec {
    strategy_bars(
        view,
        profile(DilemmaKind::PublicGoods).chart2_title,
        "Average Payoff",
        |p| p.average_payoff.unwrap_or(0.0),
    )
}
