//! One results-viewing session: a playback controller wired to a renderer.
//!
//! A session owns the loaded results, their config, the timer source and the
//! renderer. Every operation that changes what is visible produces a fresh
//! [`Frame`] and hands it to the renderer; nothing else keeps UI state.

use std::sync::Arc;

use tracing::info;

use crate::model::{Results, SimulationConfig};
use crate::playback::{PlaybackController, PlaybackState, Scheduler};
use crate::present::{self, Frame};

/// Draws frames. Implementations own whatever chart objects they create and
/// replace them on each render.
pub trait Renderer {
    fn render(&mut self, frame: &Frame);

    /// Remove everything drawn so far.
    fn clear(&mut self);
}

/// Renderer that keeps the frames it was given.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<Frame>,
    pub cleared: usize,
}

impl RecordingRenderer {
    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }

    fn clear(&mut self) {
        self.cleared += 1;
    }
}

pub struct Session<S: Scheduler, R: Renderer> {
    playback: PlaybackController<S>,
    renderer: R,
}

impl<S: Scheduler, R: Renderer> Session<S, R> {
    pub fn new(scheduler: S, renderer: R) -> Self {
        Self {
            playback: PlaybackController::new(scheduler),
            renderer,
        }
    }

    pub fn playback(&self) -> &PlaybackController<S> {
        &self.playback
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn state(&self) -> PlaybackState {
        self.playback.state()
    }

    /// Frame for the current cursor, if results are loaded.
    pub fn frame(&self) -> Option<Frame> {
        let view = self.playback.view()?;
        let config = self.playback.config()?;
        Some(present::frame(&view, config))
    }

    fn redraw(&mut self, changed: bool) -> bool {
        if changed {
            if let Some(frame) = self.frame() {
                self.renderer.render(&frame);
            }
        }
        changed
    }

    /// Show a new run in full.
    pub fn load(&mut self, results: impl Into<Arc<Results>>, config: SimulationConfig) {
        let results = results.into();
        info!(
            name = %config.name,
            kind = config.kind().label(),
            rounds = results.total_rounds(),
            "loading results"
        );
        let changed = self.playback.load(results, config);
        self.redraw(changed);
    }

    pub fn play(&mut self) -> bool {
        let changed = self.playback.play();
        self.redraw(changed)
    }

    pub fn tick(&mut self) -> bool {
        let changed = self.playback.tick();
        self.redraw(changed)
    }

    pub fn pause(&mut self) -> bool {
        let changed = self.playback.pause();
        self.redraw(changed)
    }

    pub fn toggle_pause(&mut self) -> bool {
        let changed = self.playback.toggle_pause();
        self.redraw(changed)
    }

    pub fn step(&mut self) -> bool {
        let changed = self.playback.step();
        self.redraw(changed)
    }

    pub fn stop(&mut self) -> bool {
        let changed = self.playback.stop();
        self.redraw(changed)
    }

    pub fn set_interval(&mut self, ms: u32) {
        self.playback.set_interval(ms);
    }

    /// Cancel any timer, drop the results and clear the renderer.
    pub fn dispose(&mut self) {
        self.playback.unload();
        self.renderer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DilemmaKind;
    use crate::playback::ManualScheduler;

    fn session() -> Session<ManualScheduler, RecordingRenderer> {
        let mut s = Session::new(ManualScheduler::new(), RecordingRenderer::default());
        let results = Results {
            rounds: vec![Default::default(); 3],
            ..Results::default()
        };
        s.load(
            results,
            SimulationConfig::with_defaults(DilemmaKind::FreeRider, "s"),
        );
        s
    }

    #[test]
    fn load_renders_the_full_run() {
        let s = session();
        assert_eq!(s.renderer().frames.len(), 1);
        assert!(s.renderer().last().unwrap().is_complete());
    }

    #[test]
    fn only_changes_trigger_renders() {
        let mut s = session();
        assert!(s.play());
        assert_eq!(s.renderer().last().unwrap().progress.current, 0);
        assert!(!s.play());
        assert!(s.tick());
        assert_eq!(s.renderer().frames.len(), 3);
        assert_eq!(s.renderer().last().unwrap().progress.current, 1);
    }

    #[test]
    fn dispose_cancels_timers_and_clears() {
        let mut s = session();
        s.play();
        s.dispose();
        assert_eq!(s.playback().scheduler().live_timers(), 0);
        assert_eq!(s.state(), PlaybackState::Idle);
        assert_eq!(s.renderer().cleared, 1);
        assert!(s.frame().is_none());
        assert!(!s.tick());
    }
}
