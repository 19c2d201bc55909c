use std::sync::Arc;
use std::time::Duration;

use engine_logging::engine_debug;
use tokio::runtime::Handle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink, SessionId};

struct ActiveTimer {
    session_id: SessionId,
    token: CancellationToken,
}

/// The single recurring poll timer. At most one session ticks at a time.
#[derive(Default)]
pub struct PollTimer {
    active: Option<ActiveTimer>,
}

impl PollTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_session(&self) -> Option<SessionId> {
        self.active.as_ref().map(|active| active.session_id)
    }

    /// Cancels any running timer, then emits `PollTick { session_id }` every
    /// `interval`, starting one interval from now.
    pub fn start(
        &mut self,
        runtime: &Handle,
        session_id: SessionId,
        interval: Duration,
        sink: Arc<dyn EventSink>,
    ) {
        self.stop_all();

        let token = CancellationToken::new();
        let child = token.clone();
        let period = interval.max(Duration::from_millis(1));
        runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => sink.emit(EngineEvent::PollTick { session_id }),
                }
            }
            engine_debug!("Poll timer for session {} stopped", session_id);
        });

        self.active = Some(ActiveTimer { session_id, token });
    }

    /// Stops the timer if it belongs to `session_id`. Returns whether a timer was stopped.
    pub fn stop(&mut self, session_id: SessionId) -> bool {
        match &self.active {
            Some(active) if active.session_id == session_id => {
                self.stop_all();
                true
            }
            _ => false,
        }
    }

    pub fn stop_all(&mut self) {
        if let Some(active) = self.active.take() {
            active.token.cancel();
        }
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.stop_all();
    }
}
