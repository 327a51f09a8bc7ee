//! Round-by-round playback over precomputed results.
//!
//! The controller never sleeps. It arms a repeating timer through a
//! [`Scheduler`] and the host calls [`PlaybackController::tick`] whenever that
//! timer fires. At most one timer is live at any time.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::model::{Results, SimulationConfig};
use crate::prefix::ResultsView;

pub const DEFAULT_INTERVAL_MS: u32 = 500;
pub const MIN_INTERVAL_MS: u32 = 10;
pub const MAX_INTERVAL_MS: u32 = 60_000;

/// Source of repeating timers. `Handle` cancels the timer it came from.
pub trait Scheduler {
    type Handle;

    /// Arm a repeating timer. `None` means the timer could not be started.
    fn schedule_repeating(&mut self, every: Duration) -> Option<Self::Handle>;

    fn cancel(&mut self, handle: Self::Handle);
}

/// Scheduler that only records armed timers; ticks are driven by hand.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    live: Vec<(u64, Duration)>,
    /// When set, every `schedule_repeating` call fails.
    pub refuse: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_timers(&self) -> usize {
        self.live.len()
    }

    pub fn current_interval(&self) -> Option<Duration> {
        self.live.last().map(|(_, every)| *every)
    }
}

impl Scheduler for ManualScheduler {
    type Handle = u64;

    fn schedule_repeating(&mut self, every: Duration) -> Option<u64> {
        if self.refuse {
            return None;
        }
        self.next_id += 1;
        self.live.push((self.next_id, every));
        Some(self.next_id)
    }

    fn cancel(&mut self, handle: u64) {
        self.live.retain(|(id, _)| *id != handle);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No results loaded.
    Idle,
    /// Results loaded and fully revealed.
    Ready,
    /// Cursor advancing on the timer.
    Playing,
    /// Timer suspended, cursor retained.
    Paused,
}

impl PlaybackState {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Ready => "ready",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
        }
    }
}

struct Loaded {
    results: Arc<Results>,
    config: SimulationConfig,
}

pub struct PlaybackController<S: Scheduler> {
    scheduler: S,
    timer: Option<S::Handle>,
    loaded: Option<Loaded>,
    state: PlaybackState,
    cursor: usize,
    interval_ms: u32,
}

impl<S: Scheduler> PlaybackController<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            timer: None,
            loaded: None,
            state: PlaybackState::Idle,
            cursor: 0,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.loaded.as_ref().map_or(0, |l| l.results.total_rounds())
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn has_timer(&self) -> bool {
        self.timer.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn results(&self) -> Option<&Arc<Results>> {
        self.loaded.as_ref().map(|l| &l.results)
    }

    pub fn config(&self) -> Option<&SimulationConfig> {
        self.loaded.as_ref().map(|l| &l.config)
    }

    /// View for the current cursor; the full view once every round is revealed.
    pub fn view(&self) -> Option<ResultsView<'_>> {
        let loaded = self.loaded.as_ref()?;
        if self.cursor >= loaded.results.total_rounds() {
            Some(loaded.results.full_view())
        } else {
            Some(loaded.results.prefix(self.cursor))
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn arm_timer(&mut self) -> bool {
        let every = Duration::from_millis(self.interval_ms as u64);
        match self.scheduler.schedule_repeating(every) {
            Some(handle) => {
                self.timer = Some(handle);
                true
            }
            None => {
                tracing::warn!("failed to start playback timer");
                false
            }
        }
    }

    /// Replace the loaded results. The cursor starts fully revealed.
    pub fn load(&mut self, results: Arc<Results>, config: SimulationConfig) -> bool {
        self.cancel_timer();
        self.cursor = results.total_rounds();
        self.loaded = Some(Loaded { results, config });
        self.state = PlaybackState::Ready;
        debug!(total = self.cursor, "playback loaded");
        true
    }

    /// Drop the loaded results and return to `Idle`.
    pub fn unload(&mut self) -> bool {
        self.cancel_timer();
        let changed = self.loaded.take().is_some();
        self.cursor = 0;
        self.state = PlaybackState::Idle;
        changed
    }

    /// Start from round zero when ready, resume when paused.
    pub fn play(&mut self) -> bool {
        let resume_from = match self.state {
            PlaybackState::Ready => 0,
            PlaybackState::Paused => self.cursor,
            other => {
                debug!(state = other.label(), "play ignored");
                return false;
            }
        };
        if resume_from >= self.total() {
            return false;
        }
        if !self.arm_timer() {
            return false;
        }
        self.cursor = resume_from;
        self.state = PlaybackState::Playing;
        true
    }

    /// Advance one round on a timer fire.
    pub fn tick(&mut self) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }
        let total = self.total();
        if self.cursor < total {
            self.cursor += 1;
        }
        if self.cursor >= total {
            self.cancel_timer();
            self.state = PlaybackState::Ready;
        }
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state != PlaybackState::Playing {
            debug!(state = self.state.label(), "pause ignored");
            return false;
        }
        self.cancel_timer();
        self.state = PlaybackState::Paused;
        true
    }

    /// Pause when playing; otherwise behave like [`Self::play`].
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            PlaybackState::Playing => self.pause(),
            _ => self.play(),
        }
    }

    pub fn step(&mut self) -> bool {
        if !matches!(self.state, PlaybackState::Ready | PlaybackState::Paused) {
            debug!(state = self.state.label(), "step ignored");
            return false;
        }
        let total = self.total();
        if self.cursor >= total {
            return false;
        }
        self.cursor += 1;
        if self.cursor >= total {
            self.state = PlaybackState::Ready;
        }
        true
    }

    /// Cancel playback and reveal every round.
    pub fn stop(&mut self) -> bool {
        if self.state == PlaybackState::Idle {
            return false;
        }
        self.cancel_timer();
        self.cursor = self.total();
        self.state = PlaybackState::Ready;
        true
    }

    /// Change the tick cadence; a running timer is re-armed at the new rate.
    pub fn set_interval(&mut self, ms: u32) {
        self.interval_ms = ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        if self.state == PlaybackState::Playing {
            self.cancel_timer();
            if !self.arm_timer() {
                self.state = PlaybackState::Paused;
            }
        }
    }
}

impl<S: Scheduler> Drop for PlaybackController<S> {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DilemmaKind, Interaction, Move, RoundSnapshot};

    fn results(rounds: usize) -> Arc<Results> {
        let round = RoundSnapshot {
            interactions: vec![Interaction {
                agent1: "a_1".into(),
                agent2: "b_1".into(),
                move1: Move::Cooperate,
                move2: Move::Defect,
                score1: 0.0,
                score2: 5.0,
            }],
            ..RoundSnapshot::default()
        };
        Arc::new(Results {
            rounds: vec![round; rounds],
            ..Results::default()
        })
    }

    fn loaded(rounds: usize) -> PlaybackController<ManualScheduler> {
        let mut c = PlaybackController::new(ManualScheduler::new());
        c.load(
            results(rounds),
            SimulationConfig::with_defaults(DilemmaKind::TragedyCommons, "t"),
        );
        c
    }

    #[test]
    fn load_reveals_everything() {
        let c = loaded(4);
        assert_eq!(c.state(), PlaybackState::Ready);
        assert_eq!(c.cursor(), 4);
        assert!(c.view().unwrap().is_complete());
    }

    #[test]
    fn play_from_ready_restarts_at_zero_and_ticks_to_the_end() {
        let mut c = loaded(3);
        assert!(c.play());
        assert_eq!(c.cursor(), 0);
        assert_eq!(c.scheduler().live_timers(), 1);
        assert_eq!(
            c.scheduler().current_interval(),
            Some(Duration::from_millis(500))
        );

        assert!(c.tick());
        assert!(c.tick());
        assert_eq!(c.state(), PlaybackState::Playing);
        assert!(c.tick());
        assert_eq!(c.cursor(), 3);
        assert_eq!(c.state(), PlaybackState::Ready);
        assert_eq!(c.scheduler().live_timers(), 0);

        // A late tick from the cancelled timer does nothing.
        assert!(!c.tick());
        assert_eq!(c.cursor(), 3);
    }

    #[test]
    fn play_is_idempotent_while_playing() {
        let mut c = loaded(3);
        c.play();
        c.tick();
        assert!(!c.play());
        assert_eq!(c.cursor(), 1);
        assert_eq!(c.scheduler().live_timers(), 1);
    }

    #[test]
    fn pause_and_resume_keep_the_cursor() {
        let mut c = loaded(5);
        c.play();
        c.tick();
        c.tick();
        assert!(c.pause());
        assert_eq!(c.state(), PlaybackState::Paused);
        assert_eq!(c.scheduler().live_timers(), 0);
        assert!(c.play());
        assert_eq!(c.cursor(), 2);
        assert_eq!(c.scheduler().live_timers(), 1);
    }

    #[test]
    fn toggle_pause_mirrors_the_single_button() {
        let mut c = loaded(5);
        assert!(c.toggle_pause());
        assert_eq!(c.state(), PlaybackState::Playing);
        c.tick();
        assert!(c.toggle_pause());
        assert_eq!(c.state(), PlaybackState::Paused);
        assert!(c.toggle_pause());
        assert_eq!(c.state(), PlaybackState::Playing);
        assert_eq!(c.cursor(), 1);
    }

    #[test]
    fn step_is_a_noop_when_fully_revealed() {
        let mut c = loaded(2);
        assert!(!c.step());
        assert_eq!(c.cursor(), 2);
    }

    #[test]
    fn step_from_pause_reaches_ready() {
        let mut c = loaded(2);
        c.play();
        c.pause();
        assert!(c.step());
        assert_eq!(c.cursor(), 1);
        assert_eq!(c.state(), PlaybackState::Paused);
        assert!(c.step());
        assert_eq!(c.state(), PlaybackState::Ready);
        assert!(!c.step());
    }

    #[test]
    fn stop_is_idempotent() {
        let mut c = loaded(4);
        c.play();
        c.tick();
        assert!(c.stop());
        assert!(c.stop());
        assert_eq!(c.cursor(), 4);
        assert!(!c.has_timer());
        assert_eq!(c.scheduler().live_timers(), 0);
        assert_eq!(c.state(), PlaybackState::Ready);
    }

    #[test]
    fn idle_operations_are_noops() {
        let mut c = PlaybackController::new(ManualScheduler::new());
        assert!(!c.play());
        assert!(!c.pause());
        assert!(!c.step());
        assert!(!c.stop());
        assert!(!c.tick());
        assert!(c.view().is_none());
        assert_eq!(c.state(), PlaybackState::Idle);
    }

    #[test]
    fn refused_timer_leaves_state_unchanged() {
        let mut refusing = ManualScheduler::new();
        refusing.refuse = true;
        let mut c2 = PlaybackController::new(refusing);
        c2.load(results(3), SimulationConfig::with_defaults(DilemmaKind::FreeRider, "f"));
        assert!(!c2.play());
        assert_eq!(c2.state(), PlaybackState::Ready);
        assert_eq!(c2.cursor(), 3);
    }

    #[test]
    fn empty_results_never_start_a_timer() {
        let mut c = loaded(0);
        assert!(!c.play());
        assert_eq!(c.state(), PlaybackState::Ready);
        assert_eq!(c.scheduler().live_timers(), 0);
    }

    #[test]
    fn interval_changes_rearm_a_running_timer() {
        let mut c = loaded(3);
        c.set_interval(1);
        assert_eq!(c.interval_ms(), MIN_INTERVAL_MS);
        c.play();
        c.set_interval(250);
        assert_eq!(c.scheduler().live_timers(), 1);
        assert_eq!(
            c.scheduler().current_interval(),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn reload_cancels_the_previous_timer() {
        let mut c = loaded(3);
        c.play();
        c.load(results(6), SimulationConfig::with_defaults(DilemmaKind::PublicGoods, "p"));
        assert_eq!(c.scheduler().live_timers(), 0);
        assert_eq!(c.cursor(), 6);
        assert!(c.unload());
        assert_eq!(c.state(), PlaybackState::Idle);
    }
}
