//! Test helpers for poller and orchestrator tests
//!
//! [`ScriptedProber`] replays a fixed sequence of outcomes and counts calls, so
//! polling behaviour can be checked without a network.

use async_trait::async_trait;
use pixelsmith_core::PollOutcome;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use crate::probe::Prober;

#[derive(Debug)]
pub struct ScriptedProber {
    script: Mutex<VecDeque<PollOutcome>>,
    fallback: PollOutcome,
    calls: AtomicU32,
    targets: Mutex<Vec<String>>,
}

impl ScriptedProber {
    /// Replays `script`, then answers `fallback` forever.
    pub fn new(script: Vec<PollOutcome>, fallback: PollOutcome) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicU32::new(0),
            targets: Mutex::new(Vec::new()),
        }
    }

    /// `Pending` for the first `n - 1` calls, `Ready` from the `n`th on.
    pub fn ready_on(n: u32) -> Self {
        let script = (1..n).map(|_| PollOutcome::Pending).collect();
        Self::new(script, PollOutcome::Ready)
    }

    pub fn always(outcome: PollOutcome) -> Self {
        Self::new(Vec::new(), outcome)
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every target probed so far, in order.
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, target: &str) -> PollOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.targets.lock().unwrap().push(target.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}
