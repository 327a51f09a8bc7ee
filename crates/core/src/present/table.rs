//! Tabular views: strategy detail table, round interactions, round progress.

use serde::Serialize;

use crate::fmt::{agent_display_name, fmt_fixed, fmt_percent, strategy_display_name};
use crate::model::{RoundSnapshot, StrategyPerformance};
use crate::prefix::ResultsView;

/// Magnitude past which impact/welfare indicators leave the neutral band.
pub const INDICATOR_BAND: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Positive,
    Neutral,
    Negative,
}

impl Indicator {
    /// Absent or zero values have no indicator.
    pub fn classify(value: Option<f64>) -> Option<Indicator> {
        match value {
            Some(v) if v != 0.0 && v.is_finite() => Some(if v > INDICATOR_BAND {
                Indicator::Positive
            } else if v < -INDICATOR_BAND {
                Indicator::Negative
            } else {
                Indicator::Neutral
            }),
            _ => None,
        }
    }

    pub fn impact_label(self) -> &'static str {
        match self {
            Indicator::Positive => "Positive",
            Indicator::Neutral => "Neutral",
            Indicator::Negative => "Negative",
        }
    }

    pub fn welfare_label(self) -> &'static str {
        match self {
            Indicator::Positive => "High",
            Indicator::Neutral => "Medium",
            Indicator::Negative => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub strategy: String,
    pub name: String,
    pub avg_score: String,
    pub cooperation_rate: String,
    pub total_moves: u64,
    pub sustainability: Option<Indicator>,
    pub welfare: Option<Indicator>,
    pub top: bool,
    pub bottom: bool,
}

fn sort_key(perf: &StrategyPerformance) -> f64 {
    match perf.avg_score {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Strategies by descending average score. The sort is stable, so ties keep
/// their key order; the first row is flagged top and the last bottom.
pub fn detail_table(view: &ResultsView<'_>) -> Vec<DetailRow> {
    let mut entries: Vec<(&String, &StrategyPerformance)> =
        view.strategy_performance.iter().collect();
    entries.sort_by(|a, b| sort_key(b.1).total_cmp(&sort_key(a.1)));

    let last = entries.len().saturating_sub(1);
    entries
        .into_iter()
        .enumerate()
        .map(|(idx, (strategy, perf))| {
            let total_moves = perf.total_moves();
            DetailRow {
                strategy: strategy.clone(),
                name: strategy_display_name(strategy),
                avg_score: perf
                    .avg_score
                    .map(|v| fmt_fixed(v, 2))
                    .unwrap_or_else(|| "N/A".to_string()),
                cooperation_rate: if total_moves > 0 {
                    fmt_percent(perf.total_cooperation as f64 / total_moves as f64, 1)
                } else {
                    "N/A".to_string()
                },
                total_moves,
                sustainability: Indicator::classify(perf.sustainability_impact),
                welfare: Indicator::classify(perf.social_welfare),
                top: idx == 0,
                bottom: idx == last,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionRow {
    pub agent1: String,
    pub move1: &'static str,
    pub agent2: String,
    pub move2: &'static str,
    pub scores: String,
}

pub fn interaction_rows(round: Option<&RoundSnapshot>) -> Vec<InteractionRow> {
    let Some(round) = round else {
        return Vec::new();
    };
    round
        .interactions
        .iter()
        .map(|i| InteractionRow {
            agent1: agent_display_name(&i.agent1),
            move1: i.move1.symbol(),
            agent2: agent_display_name(&i.agent2),
            move2: i.move2.symbol(),
            scores: format!("{} / {}", fmt_score(i.score1), fmt_score(i.score2)),
        })
        .collect()
}

fn fmt_score(v: f64) -> String {
    if v.fract() == 0.0 {
        fmt_fixed(v, 0)
    } else {
        fmt_fixed(v, 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    /// Rounded percentage of revealed rounds.
    pub percent: u32,
}

impl Progress {
    pub fn of(view: &ResultsView<'_>) -> Self {
        let percent = if view.total == 0 {
            100
        } else {
            ((view.revealed as f64 / view.total as f64) * 100.0).round() as u32
        };
        Self {
            current: view.revealed,
            total: view.total,
            percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Interaction, Move, Results};
    use indexmap::IndexMap;

    fn scored(score: Option<f64>) -> StrategyPerformance {
        StrategyPerformance {
            avg_score: score,
            ..Default::default()
        }
    }

    #[test]
    fn table_sorts_descending_and_keeps_key_order_on_ties() {
        let results = Results {
            strategy_performance: IndexMap::from([
                ("a".to_string(), scored(Some(2.0))),
                ("b".to_string(), scored(Some(5.0))),
                ("c".to_string(), scored(Some(2.0))),
                ("d".to_string(), scored(Some(5.0))),
            ]),
            ..Results::default()
        };
        let rows = detail_table(&results.full_view());
        let order: Vec<&str> = rows.iter().map(|r| r.strategy.as_str()).collect();
        assert_eq!(order, ["b", "d", "a", "c"]);
        assert!(rows[0].top && !rows[0].bottom);
        assert!(rows[3].bottom && !rows[3].top);
        assert_eq!(rows.iter().filter(|r| r.top).count(), 1);
        assert_eq!(rows.iter().filter(|r| r.bottom).count(), 1);
    }

    #[test]
    fn missing_scores_sort_as_zero_and_show_na() {
        let results = Results {
            strategy_performance: IndexMap::from([
                ("none".to_string(), scored(None)),
                ("neg".to_string(), scored(Some(-1.0))),
            ]),
            ..Results::default()
        };
        let rows = detail_table(&results.full_view());
        assert_eq!(rows[0].strategy, "none");
        assert_eq!(rows[0].avg_score, "N/A");
        assert_eq!(rows[0].cooperation_rate, "N/A");
        assert_eq!(rows[1].avg_score, "-1.00");
    }

    #[test]
    fn single_row_is_both_top_and_bottom() {
        let results = Results {
            strategy_performance: IndexMap::from([("only".to_string(), scored(Some(1.0)))]),
            ..Results::default()
        };
        let rows = detail_table(&results.full_view());
        assert!(rows[0].top && rows[0].bottom);
    }

    #[test]
    fn indicators_use_the_neutral_band() {
        assert_eq!(Indicator::classify(Some(0.31)), Some(Indicator::Positive));
        assert_eq!(Indicator::classify(Some(-0.5)), Some(Indicator::Negative));
        assert_eq!(Indicator::classify(Some(0.3)), Some(Indicator::Neutral));
        assert_eq!(Indicator::classify(Some(0.0)), None);
        assert_eq!(Indicator::classify(None), None);
        assert_eq!(Indicator::Negative.welfare_label(), "Low");
    }

    #[test]
    fn cooperation_rate_is_a_percentage_of_moves() {
        let results = Results {
            strategy_performance: IndexMap::from([(
                "tft".to_string(),
                StrategyPerformance {
                    avg_score: Some(3.0),
                    total_cooperation: 2,
                    total_defection: 1,
                    ..Default::default()
                },
            )]),
            ..Results::default()
        };
        let rows = detail_table(&results.full_view());
        assert_eq!(rows[0].cooperation_rate, "66.7%");
        assert_eq!(rows[0].total_moves, 3);
    }

    #[test]
    fn interaction_rows_humanise_agents() {
        let round = RoundSnapshot {
            interactions: vec![Interaction {
                agent1: "tit_for_tat_1".into(),
                agent2: "all_defect_2".into(),
                move1: Move::Cooperate,
                move2: Move::Defect,
                score1: 0.0,
                score2: 5.0,
            }],
            ..RoundSnapshot::default()
        };
        let rows = interaction_rows(Some(&round));
        assert_eq!(rows[0].agent1, "Tit For Tat 1");
        assert_eq!(rows[0].move2, "D");
        assert_eq!(rows[0].scores, "0 / 5");
        assert!(interaction_rows(None).is_empty());
    }

    #[test]
    fn progress_rounds_percent() {
        let results = Results {
            rounds: vec![RoundSnapshot::default(); 3],
            ..Results::default()
        };
        assert_eq!(Progress::of(&results.prefix(1)).percent, 33);
        assert_eq!(Progress::of(&results.prefix(2)).percent, 67);
        assert_eq!(Progress::of(&results.full_view()).percent, 100);
    }
}
