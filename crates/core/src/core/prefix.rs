//! Read-only views over the first `k` rounds of a [`Results`].
//!
//! Cooperation/defection totals of a partial view are recounted from the
//! revealed interactions. Strategy aggregates and the funding threshold are
//! always the full-run values.

use indexmap::IndexMap;

use crate::model::{Results, RoundSnapshot, StrategyPerformance};

#[derive(Debug, Clone)]
pub struct ResultsView<'a> {
    pub rounds: &'a [RoundSnapshot],
    pub scores: Vec<(&'a str, &'a [f64])>,
    pub strategy_performance: &'a IndexMap<String, StrategyPerformance>,
    pub overall_cooperation: u64,
    pub overall_defection: u64,
    pub resource_levels: Option<&'a [f64]>,
    pub funding_progress: Option<&'a [f64]>,
    pub threshold: Option<f64>,
    pub contribution_history: Vec<(&'a str, &'a [f64])>,
    pub average_contribution: Option<&'a [f64]>,
    /// Number of rounds revealed in this view.
    pub revealed: usize,
    /// Number of rounds in the underlying results.
    pub total: usize,
}

fn head(series: &[f64], k: usize) -> &[f64] {
    &series[..k.min(series.len())]
}

/// Count cooperations and defections across `rounds`, two moves per interaction.
pub fn count_moves(rounds: &[RoundSnapshot]) -> (u64, u64) {
    let mut cooperation = 0u64;
    let mut defection = 0u64;
    for round in rounds {
        for interaction in &round.interactions {
            for mv in [interaction.move1, interaction.move2] {
                if mv.is_cooperate() {
                    cooperation += 1;
                } else {
                    defection += 1;
                }
            }
        }
    }
    (cooperation, defection)
}

impl Results {
    /// View of the first `k` rounds (`k` is clamped to the round count).
    pub fn prefix(&self, k: usize) -> ResultsView<'_> {
        let total = self.rounds.len();
        let k = k.min(total);
        let rounds = &self.rounds[..k];
        let (overall_cooperation, overall_defection) = count_moves(rounds);

        ResultsView {
            rounds,
            scores: self
                .scores
                .iter()
                .map(|(id, series)| (id.as_str(), head(series, k)))
                .collect(),
            strategy_performance: &self.strategy_performance,
            overall_cooperation,
            overall_defection,
            resource_levels: self.resource_levels.as_deref().map(|s| head(s, k)),
            funding_progress: self.funding_progress.as_deref().map(|s| head(s, k)),
            threshold: self.threshold,
            contribution_history: self
                .contribution_history
                .iter()
                .flatten()
                .map(|(name, series)| (name.as_str(), head(series, k)))
                .collect(),
            average_contribution: self.average_contribution.as_deref().map(|s| head(s, k)),
            revealed: k,
            total,
        }
    }

    /// View of every round, carrying the backend's own totals.
    pub fn full_view(&self) -> ResultsView<'_> {
        ResultsView {
            rounds: &self.rounds,
            scores: self
                .scores
                .iter()
                .map(|(id, series)| (id.as_str(), series.as_slice()))
                .collect(),
            strategy_performance: &self.strategy_performance,
            overall_cooperation: self.overall_cooperation,
            overall_defection: self.overall_defection,
            resource_levels: self.resource_levels.as_deref(),
            funding_progress: self.funding_progress.as_deref(),
            threshold: self.threshold,
            contribution_history: self
                .contribution_history
                .iter()
                .flatten()
                .map(|(name, series)| (name.as_str(), series.as_slice()))
                .collect(),
            average_contribution: self.average_contribution.as_deref(),
            revealed: self.rounds.len(),
            total: self.rounds.len(),
        }
    }
}

impl<'a> ResultsView<'a> {
    pub fn is_complete(&self) -> bool {
        self.revealed >= self.total
    }

    /// The most recently revealed round, if any.
    pub fn latest_round(&self) -> Option<&'a RoundSnapshot> {
        self.rounds.last()
    }

    pub fn total_moves(&self) -> u64 {
        self.overall_cooperation + self.overall_defection
    }
}
