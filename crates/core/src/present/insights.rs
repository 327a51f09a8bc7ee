//! Qualitative insights derived from fixed threshold rules.

use serde::Serialize;
use tracing::debug;

use crate::model::StrategyPerformance;
use crate::prefix::ResultsView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Danger,
    Warning,
    Info,
    Primary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub title: &'static str,
    pub content: &'static str,
    pub icon: &'static str,
    pub tone: Tone,
}

const fn insight(
    title: &'static str,
    content: &'static str,
    icon: &'static str,
    tone: Tone,
) -> Insight {
    Insight {
        title,
        content,
        icon,
        tone,
    }
}

pub const EMERGENT_BEHAVIOR: Insight = insight(
    "Emergent Social Behavior",
    "This simulation demonstrates how complex social dynamics can emerge from simple interaction rules and how individual decisions collectively shape outcomes that affect everyone.",
    "fa-brain",
    Tone::Primary,
);

/// Final resource level below this fraction of the initial level is a collapse.
pub const COLLAPSE_FRACTION: f64 = 0.1;
/// Last-round average contribution below this fraction of the first is a decline.
pub const DECLINE_FRACTION: f64 = 0.7;

fn first_last(series: Option<&[f64]>) -> Option<(f64, f64)> {
    let series = series?;
    Some((*series.first()?, *series.last()?))
}

fn metric(
    view: &ResultsView<'_>,
    strategy: &str,
    pick: fn(&StrategyPerformance) -> Option<f64>,
) -> Option<f64> {
    view.strategy_performance.get(strategy).map(|p| pick(p).unwrap_or(0.0))
}

pub fn commons_insights(view: &ResultsView<'_>) -> Vec<Insight> {
    let mut out = Vec::new();
    let Some((initial, last)) = first_last(view.resource_levels) else {
        debug!("no resource levels; skipping commons insights");
        return out;
    };
    let depleted = last < initial * COLLAPSE_FRACTION;
    out.push(if depleted {
        insight(
            "Resource Collapse",
            "The shared resource was depleted to critical levels, demonstrating how individual short-term interests can lead to collective long-term harm.",
            "fa-exclamation-triangle",
            Tone::Danger,
        )
    } else {
        insight(
            "Sustainable Management",
            "The resource was maintained at sustainable levels, showing that with the right balance of strategies, common resources can be preserved.",
            "fa-check-circle",
            Tone::Success,
        )
    });

    if let (Some(greedy), Some(sustainable)) = (
        metric(view, "greedy", |p| p.avg_score),
        metric(view, "sustainable", |p| p.avg_score),
    ) {
        if greedy > sustainable && !depleted {
            out.push(insight(
                "Short-term Advantage",
                "Greedy harvesting strategies outperformed sustainable ones while still maintaining resource viability, highlighting the tension between individual gain and collective responsibility.",
                "fa-balance-scale",
                Tone::Warning,
            ));
        } else if sustainable > greedy {
            out.push(insight(
                "Sustainability Wins",
                "Sustainable harvesting strategies achieved better outcomes than greedy ones, demonstrating that long-term thinking can be both individually and collectively beneficial.",
                "fa-seedling",
                Tone::Success,
            ));
        }
    }
    out
}

pub fn free_rider_insights(view: &ResultsView<'_>) -> Vec<Insight> {
    let mut out = Vec::new();
    let (Some((_, last)), Some(threshold)) = (first_last(view.funding_progress), view.threshold)
    else {
        debug!("no funding progress or threshold; skipping free-rider insights");
        return out;
    };
    let succeeded = last >= threshold;
    out.push(if succeeded {
        insight(
            "Project Success Despite Free Riders",
            "The project was successfully funded despite the presence of free riders, showing that a critical mass of contributors can overcome the free rider problem.",
            "fa-check-circle",
            Tone::Success,
        )
    } else {
        insight(
            "Project Failure Due to Free Riding",
            "The project failed to reach its funding threshold, demonstrating how free riding behavior can lead to the underprovision of public goods.",
            "fa-times-circle",
            Tone::Danger,
        )
    });

    if let (Some(contributor), Some(free_rider)) = (
        metric(view, "contributor", |p| p.average_gain),
        metric(view, "free_rider", |p| p.average_gain),
    ) {
        if free_rider > contributor && succeeded {
            out.push(insight(
                "Free Rider Advantage",
                "Free riders achieved higher individual gains than contributors, illustrating why free riding behavior persists in many social contexts.",
                "fa-user-ninja",
                Tone::Warning,
            ));
        } else if contributor > free_rider || !succeeded {
            out.push(insight(
                "Contribution Rewarded",
                "Contributors achieved better outcomes than free riders, suggesting that mechanisms to reward contribution may help overcome the free rider problem.",
                "fa-hand-holding-heart",
                Tone::Success,
            ));
        }
    }
    out
}

pub fn public_goods_insights(view: &ResultsView<'_>) -> Vec<Insight> {
    let mut out = Vec::new();
    let Some((first, last)) = first_last(view.average_contribution) else {
        debug!("no average contribution series; skipping public-goods insights");
        return out;
    };
    out.push(if last < first * DECLINE_FRACTION {
        insight(
            "Declining Contributions",
            "Contributions to the public good declined over time, a common pattern seen in repeated public goods games as participants adjust their strategy based on others' behavior.",
            "fa-chart-line-down",
            Tone::Danger,
        )
    } else {
        insight(
            "Sustained Contributions",
            "Contributions to the public good remained stable or increased over time, contrary to the typical pattern seen in many public goods experiments.",
            "fa-chart-line",
            Tone::Success,
        )
    });

    if let (Some(zero), Some(full)) = (
        metric(view, "zero", |p| p.average_payoff),
        metric(view, "full", |p| p.average_payoff),
    ) {
        if zero > full {
            out.push(insight(
                "Non-contribution Advantage",
                "Non-contributors achieved higher individual payoffs than full contributors, highlighting the inherent tension in public goods provision.",
                "fa-user-slash",
                Tone::Warning,
            ));
        } else if full > zero {
            out.push(insight(
                "Contribution Pays Off",
                "Full contributors achieved better outcomes than non-contributors, suggesting that the multiplier effect was strong enough to make contribution individually rational.",
                "fa-hands-helping",
                Tone::Success,
            ));
        }
    }
    out
}

pub fn real_world_connection(text: &'static str) -> Insight {
    insight("Real-World Connection", text, "fa-globe", Tone::Info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Results;
    use indexmap::IndexMap;

    fn titles(insights: &[Insight]) -> Vec<&'static str> {
        insights.iter().map(|i| i.title).collect()
    }

    fn perf(avg_score: f64, average_gain: f64, average_payoff: f64) -> StrategyPerformance {
        StrategyPerformance {
            avg_score: Some(avg_score),
            average_gain: Some(average_gain),
            average_payoff: Some(average_payoff),
            ..Default::default()
        }
    }

    #[test]
    fn commons_collapse_below_ten_percent() {
        let results = Results {
            resource_levels: Some(vec![1000.0, 500.0, 99.0]),
            strategy_performance: IndexMap::from([
                ("greedy".to_string(), perf(9.0, 0.0, 0.0)),
                ("sustainable".to_string(), perf(4.0, 0.0, 0.0)),
            ]),
            ..Results::default()
        };
        // Greedy won but the resource collapsed: no short-term advantage insight.
        assert_eq!(titles(&commons_insights(&results.full_view())), ["Resource Collapse"]);

        let healthy = Results {
            resource_levels: Some(vec![1000.0, 100.0]),
            ..results
        };
        assert_eq!(
            titles(&commons_insights(&healthy.full_view())),
            ["Sustainable Management", "Short-term Advantage"]
        );
    }

    #[test]
    fn funding_at_threshold_succeeds() {
        let results = Results {
            funding_progress: Some(vec![10.0, 60.0]),
            threshold: Some(60.0),
            strategy_performance: IndexMap::from([
                ("contributor".to_string(), perf(0.0, 2.0, 0.0)),
                ("free_rider".to_string(), perf(0.0, 3.0, 0.0)),
            ]),
            ..Results::default()
        };
        assert_eq!(
            titles(&free_rider_insights(&results.full_view())),
            ["Project Success Despite Free Riders", "Free Rider Advantage"]
        );

        let failed = Results {
            funding_progress: Some(vec![10.0, 59.0]),
            ..results
        };
        assert_eq!(
            titles(&free_rider_insights(&failed.full_view())),
            ["Project Failure Due to Free Riding", "Contribution Rewarded"]
        );
    }

    #[test]
    fn contributions_decline_below_seventy_percent() {
        let results = Results {
            average_contribution: Some(vec![10.0, 8.0, 6.9]),
            strategy_performance: IndexMap::from([
                ("full".to_string(), perf(0.0, 0.0, 12.0)),
                ("zero".to_string(), perf(0.0, 0.0, 12.0)),
            ]),
            ..Results::default()
        };
        // Equal payoffs produce no comparison insight.
        assert_eq!(
            titles(&public_goods_insights(&results.full_view())),
            ["Declining Contributions"]
        );
    }

    #[test]
    fn missing_series_yield_nothing() {
        let results = Results::default();
        let view = results.full_view();
        assert!(commons_insights(&view).is_empty());
        assert!(free_rider_insights(&view).is_empty());
        assert!(public_goods_insights(&view).is_empty());
    }
}
