//! `setInterval`-backed [`Scheduler`].

use std::time::Duration;

use evogames::playback::Scheduler;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Every timer this scheduler arms calls the same callback. The callback
/// lives as long as the scheduler, so clearing an interval never frees a
/// closure that might be running.
pub(super) struct IntervalScheduler {
    callback: Closure<dyn FnMut()>,
}

impl IntervalScheduler {
    pub(super) fn new(on_tick: impl FnMut() + 'static) -> Self {
        Self {
            callback: Closure::wrap(Box::new(on_tick) as Box<dyn FnMut()>),
        }
    }
}

impl Scheduler for IntervalScheduler {
    type Handle = i32;

    fn schedule_repeating(&mut self, every: Duration) -> Option<i32> {
        let window = web_sys::window()?;
        let ms = i32::try_from(every.as_millis()).unwrap_or(i32::MAX);
        window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                self.callback.as_ref().unchecked_ref(),
                ms,
            )
            .ok()
    }

    fn cancel(&mut self, handle: i32) {
        if let Some(w) = web_sys::window() {
            w.clear_interval_with_handle(handle);
        }
    }
}
