//! End-to-end playback over a decoded backend payload.

use evogames::prelude::*;
use evogames::present::table::detail_table;

const PAYLOAD: &str = r#"{
    "rounds": [
        {"round": 1, "interactions": [{"agent1": "greedy_1", "agent2": "sustainable_1", "move1": "C", "move2": "D", "score1": 0, "score2": 5}]},
        {"round": 2, "interactions": [{"agent1": "greedy_1", "agent2": "sustainable_1", "move1": "C", "move2": "C", "score1": 3, "score2": 3}]},
        {"round": 3, "interactions": [{"agent1": "greedy_1", "agent2": "sustainable_1", "move1": "D", "move2": "D", "score1": 1, "score2": 1}]}
    ],
    "scores": {
        "greedy_1": [0, 3, 4],
        "sustainable_1": [5, 8, 9]
    },
    "strategy_performance": {
        "greedy": {"avg_score": 4.0, "total_cooperation": 2, "total_defection": 1, "sustainability_impact": -0.6},
        "sustainable": {"avg_score": 9.0, "total_cooperation": 1, "total_defection": 2, "social_welfare": 0.8}
    },
    "overall_cooperation": 3,
    "overall_defection": 3,
    "resource_levels": [1000, 700, 50]
}"#;

fn results() -> Results {
    Results::from_json(PAYLOAD).unwrap()
}

fn config() -> SimulationConfig {
    SimulationConfig::with_defaults(DilemmaKind::TragedyCommons, "Test")
}

#[test]
fn partial_counts_after_two_rounds() {
    let results = results();
    let view = results.prefix(2);
    assert_eq!(view.overall_cooperation, 3);
    assert_eq!(view.overall_defection, 1);
}

#[test]
fn every_prefix_is_consistent() {
    let results = results();
    for k in 0..=results.total_rounds() {
        let view = results.prefix(k);
        assert!(view.scores.iter().all(|(_, s)| s.len() == k));
        let interactions: usize = results.rounds[..k].iter().map(|r| r.interactions.len()).sum();
        assert_eq!(
            view.overall_cooperation + view.overall_defection,
            2 * interactions as u64
        );
    }
}

#[test]
fn session_replays_round_by_round() {
    let mut session = Session::new(ManualScheduler::new(), RecordingRenderer::default());
    session.load(results(), config());
    assert_eq!(session.state(), PlaybackState::Ready);

    assert!(!session.step());
    assert!(session.play());
    assert_eq!(session.playback().cursor(), 0);

    session.tick();
    session.tick();
    let frame = session.renderer().last().unwrap();
    assert_eq!(frame.progress.current, 2);
    assert_eq!(frame.cooperation_chart.datasets[0].data, vec![3.0, 1.0]);
    assert_eq!(frame.interactions[0].move1, "C");
    assert_eq!(frame.interactions[0].move2, "C");
    assert_eq!(frame.kind_chart1.datasets[0].data, vec![1000.0, 700.0]);

    session.tick();
    assert_eq!(session.state(), PlaybackState::Ready);
    let frame = session.renderer().last().unwrap();
    assert!(frame.is_complete());
    assert_eq!(frame.insights[0].title, "Resource Collapse");
    assert_eq!(session.playback().scheduler().live_timers(), 0);
}

#[test]
fn stop_twice_reveals_everything() {
    let mut session = Session::new(ManualScheduler::new(), RecordingRenderer::default());
    session.load(results(), config());
    session.play();
    session.tick();
    session.stop();
    session.stop();
    assert_eq!(session.playback().cursor(), 3);
    assert!(!session.playback().has_timer());
}

#[test]
fn play_after_pause_then_stop_restarts_from_zero() {
    let mut session = Session::new(ManualScheduler::new(), RecordingRenderer::default());
    session.load(results(), config());
    session.play();
    session.tick();
    session.tick();
    session.pause();
    session.stop();
    assert!(session.play());
    assert_eq!(session.playback().cursor(), 0);
}

#[test]
fn detail_table_ranks_strategies() {
    let results = results();
    let rows = detail_table(&results.full_view());
    assert_eq!(rows[0].strategy, "sustainable");
    assert!(rows[0].top);
    assert_eq!(rows[0].welfare.map(|w| w.welfare_label()), Some("High"));
    assert_eq!(rows[1].strategy, "greedy");
    assert!(rows[1].bottom);
    assert_eq!(rows[1].sustainability.map(|s| s.impact_label()), Some("Negative"));
}

#[test]
fn form_acceptance_rules() {
    let mut form = FormState::new();
    assert_eq!(form.validate(), Err(FormError::MissingName));

    form.name = "Test".into();
    form.kind = DilemmaKind::TragedyCommons;
    form.set_strategy_count(DilemmaKind::TragedyCommons, "greedy", "1");
    assert_eq!(form.validate(), Err(FormError::TooFewAgents { total: 1 }));

    form.set_strategy_count(DilemmaKind::TragedyCommons, "adaptive", "1");
    assert!(form.validate().is_ok());
}
