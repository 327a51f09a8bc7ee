//! Playback timers on the tokio runtime.
//!
//! Each armed timer is one spawned task that sends its id down an mpsc
//! channel on every period. Cancelling aborts the task. The receiving loop
//! checks [`TokioScheduler::is_live`] so a tick already queued by a cancelled
//! timer is dropped.

use std::time::Duration;

use evogames::playback::Scheduler;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::warn;

pub type TickReceiver = mpsc::UnboundedReceiver<u64>;

#[derive(Debug)]
pub struct TimerHandle {
    id: u64,
    task: JoinHandle<()>,
}

#[derive(Debug)]
pub struct TokioScheduler {
    ticks: mpsc::UnboundedSender<u64>,
    next_id: u64,
    live: Option<u64>,
}

impl TokioScheduler {
    pub fn new() -> (Self, TickReceiver) {
        let (ticks, rx) = mpsc::unbounded_channel();
        (
            Self {
                ticks,
                next_id: 0,
                live: None,
            },
            rx,
        )
    }

    pub fn is_live(&self, id: u64) -> bool {
        self.live == Some(id)
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TimerHandle;

    fn schedule_repeating(&mut self, every: Duration) -> Option<TimerHandle> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!("no tokio runtime for playback timer: {}", e);
                return None;
            }
        };
        if self.ticks.is_closed() {
            return None;
        }

        self.next_id += 1;
        let id = self.next_id;
        let tx = self.ticks.clone();
        let task = runtime.spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; playback waits a full period.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(id).is_err() {
                    break;
                }
            }
        });
        self.live = Some(id);
        Some(TimerHandle { id, task })
    }

    fn cancel(&mut self, handle: TimerHandle) {
        handle.task.abort();
        if self.live == Some(handle.id) {
            self.live = None;
        }
    }
}
