//! Plain-text renderer for the terminal client.

use std::io::Write;

use evogames::fmt::{fmt_fixed, fmt_percent};
use evogames::present::charts::ChartSpec;
use evogames::present::table::DetailRow;
use evogames::present::Frame;
use evogames::session::Renderer;
use tracing::warn;

pub struct TerminalRenderer<W: Write> {
    out: W,
    frames: usize,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    fn write_frame(&mut self, frame: &Frame) -> std::io::Result<()> {
        let p = frame.progress;
        writeln!(
            self.out,
            "== {} ({}) round {}/{} [{}%] ==",
            frame.name,
            frame.kind.display_name(),
            p.current,
            p.total,
            p.percent
        )?;

        let moves = &frame.cooperation_chart;
        if let Some(data) = moves.datasets.first().map(|d| &d.data) {
            let cooperation = data.first().copied().unwrap_or(0.0);
            let defection = data.get(1).copied().unwrap_or(0.0);
            let total = cooperation + defection;
            let rate = if total > 0.0 {
                fmt_percent(cooperation / total, 1)
            } else {
                "N/A".to_string()
            };
            writeln!(
                self.out,
                "moves: {} cooperate / {} defect ({} cooperation)",
                fmt_fixed(cooperation, 0),
                fmt_fixed(defection, 0),
                rate
            )?;
        }

        for row in &frame.interactions {
            writeln!(
                self.out,
                "  {} [{}] vs {} [{}]  {}",
                row.agent1, row.move1, row.agent2, row.move2, row.scores
            )?;
        }

        if !frame.is_complete() {
            return Ok(());
        }

        for chart in [&frame.kind_chart1, &frame.kind_chart2] {
            self.write_chart_summary(chart)?;
        }
        writeln!(self.out, "strategies:")?;
        for row in &frame.table {
            self.write_row(row)?;
        }
        writeln!(self.out, "insights:")?;
        for insight in &frame.insights {
            writeln!(self.out, "  * {}: {}", insight.title, insight.content)?;
        }
        Ok(())
    }

    fn write_chart_summary(&mut self, chart: &ChartSpec) -> std::io::Result<()> {
        write!(self.out, "{}:", chart.title)?;
        if chart.is_empty() {
            writeln!(self.out, " no data")?;
            return Ok(());
        }
        for dataset in &chart.datasets {
            match chart.kind {
                evogames::present::charts::ChartKind::Line => {
                    let last = dataset.data.last().copied().unwrap_or(0.0);
                    write!(self.out, " {} {}", dataset.label, fmt_fixed(last, 1))?;
                }
                _ => {
                    for (label, value) in chart.labels.iter().zip(&dataset.data) {
                        write!(self.out, " {}={}", label, fmt_fixed(*value, 2))?;
                    }
                }
            }
        }
        writeln!(self.out)
    }

    fn write_row(&mut self, row: &DetailRow) -> std::io::Result<()> {
        let marker = match (row.top, row.bottom) {
            (true, true) => "=",
            (true, false) => "^",
            (false, true) => "v",
            (false, false) => " ",
        };
        writeln!(
            self.out,
            "  {} {:<20} avg {:>8}  coop {:>6}  moves {:>6}  impact {:<8}  welfare {}",
            marker,
            row.name,
            row.avg_score,
            row.cooperation_rate,
            row.total_moves,
            row.sustainability.map_or("N/A", |i| i.impact_label()),
            row.welfare.map_or("N/A", |w| w.welfare_label()),
        )
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, frame: &Frame) {
        self.frames += 1;
        if let Err(e) = self.write_frame(frame).and_then(|_| self.out.flush()) {
            warn!("failed to write frame: {}", e);
        }
    }

    fn clear(&mut self) {
        if let Err(e) = writeln!(self.out, "-- session closed --") {
            warn!("failed to write: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evogames::model::{DilemmaKind, Results, SimulationConfig};
    use evogames::present::frame;

    fn results() -> Results {
        Results::from_json(
            r#"{
                "rounds": [
                    {"interactions": [{"agent1": "greedy_1", "agent2": "sustainable_2", "move1": "C", "move2": "D", "score1": 0, "score2": 5}]},
                    {"interactions": [{"agent1": "greedy_1", "agent2": "sustainable_2", "move1": "D", "move2": "D", "score1": 1, "score2": 1}]}
                ],
                "strategy_performance": {
                    "greedy": {"avg_score": 1.0, "total_cooperation": 1, "total_defection": 1},
                    "sustainable": {"avg_score": 6.0, "total_cooperation": 0, "total_defection": 2}
                },
                "overall_cooperation": 1,
                "overall_defection": 3,
                "resource_levels": [1000, 950]
            }"#,
        )
        .unwrap()
    }

    fn rendered(view_rounds: Option<usize>) -> String {
        let results = results();
        let config = SimulationConfig::with_defaults(DilemmaKind::TragedyCommons, "Pasture");
        let view = match view_rounds {
            Some(k) => results.prefix(k),
            None => results.full_view(),
        };
        let mut out = Vec::new();
        let mut r = TerminalRenderer::new(&mut out);
        r.render(&frame(&view, &config));
        assert_eq!(r.frames(), 1);
        drop(r);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn partial_frames_show_progress_and_latest_round() {
        let text = rendered(Some(1));
        assert!(text.starts_with("== Pasture (Tragedy of the Commons) round 1/2 [50%] =="));
        assert!(text.contains("moves: 1 cooperate / 1 defect (50.0% cooperation)"));
        assert!(text.contains("Greedy 1 [C] vs Sustainable 2 [D]  0 / 5"));
        assert!(!text.contains("insights:"));
    }

    #[test]
    fn complete_frames_include_table_and_insights() {
        let text = rendered(None);
        assert!(text.contains("Resource Level Over Rounds: Resource Level 950.0"));
        assert!(text.contains("^ Sustainable"));
        assert!(text.contains("v Greedy"));
        assert!(text.contains("* Sustainability Wins"));
        assert!(text.contains("* Real-World Connection"));
    }
}
