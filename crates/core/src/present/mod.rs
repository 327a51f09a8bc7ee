//! Presentation adapters.
//!
//! Everything here is a pure function of a [`ResultsView`] and the
//! [`SimulationConfig`] that produced it. Renderers receive a [`Frame`] and
//! never look at raw results.

pub mod charts;
pub mod insights;
pub mod kinds;
pub mod table;

use serde::Serialize;

use crate::model::{DilemmaKind, SimulationConfig};
use crate::prefix::ResultsView;

use charts::ChartSpec;
use insights::Insight;
use table::{DetailRow, InteractionRow, Progress};

/// Everything a renderer draws for one cursor position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub kind: DilemmaKind,
    pub name: String,
    pub progress: Progress,
    pub score_chart: ChartSpec,
    pub strategy_chart: ChartSpec,
    pub cooperation_chart: ChartSpec,
    pub cooperation_rate_chart: ChartSpec,
    pub kind_chart1: ChartSpec,
    pub kind_chart2: ChartSpec,
    pub interactions: Vec<InteractionRow>,
    pub table: Vec<DetailRow>,
    pub insights: Vec<Insight>,
}

impl Frame {
    pub fn is_complete(&self) -> bool {
        self.progress.current >= self.progress.total
    }

    /// All charts in dashboard order.
    pub fn charts(&self) -> [&ChartSpec; 6] {
        [
            &self.score_chart,
            &self.strategy_chart,
            &self.cooperation_chart,
            &self.cooperation_rate_chart,
            &self.kind_chart1,
            &self.kind_chart2,
        ]
    }
}

pub fn frame(view: &ResultsView<'_>, config: &SimulationConfig) -> Frame {
    let kind = config.kind();
    let profile = kinds::profile(kind);

    let mut all_insights = (profile.insights)(view);
    all_insights.push(insights::EMERGENT_BEHAVIOR);
    all_insights.push(insights::real_world_connection(profile.real_world));

    Frame {
        kind,
        name: config.name.clone(),
        progress: Progress::of(view),
        score_chart: charts::score_chart(view),
        strategy_chart: charts::strategy_score_chart(view),
        cooperation_chart: charts::cooperation_chart(view),
        cooperation_rate_chart: charts::cooperation_rate_chart(view),
        kind_chart1: (profile.chart1)(view),
        kind_chart2: (profile.chart2)(view),
        interactions: table::interaction_rows(view.latest_round()),
        table: table::detail_table(view),
        insights: all_insights,
    }
}
