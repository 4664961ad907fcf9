use crate::alerts::alert::Alert;
use crate::alerts::state::{AlertState, MonitorPolicy};
use crate::sensors::Sensor;
use anyhow::Result;
use chrono::Utc;
use std::collections::HashMap;

/// Notification collaborator. Invoked synchronously with one state snapshot,
/// at most once per escalation episode. Transport selection (desktop, SMS,
/// email) is entirely the implementor's concern; the handler neither retries
/// nor queues.
pub trait Notifier {
    fn notify(&self, state: &AlertState) -> Result<()>;
}

/// Per-sensor registry of alert states. Routes readings into per-kind states,
/// ages them, and fires the notifier for states whose debounce gate is open.
///
/// The registry starts empty and is owned by this instance. `handle` takes
/// `&mut self`, so calls are serialized per handler; independent sensors can
/// be served by independent handlers.
pub struct AlertHandler<N> {
    policy: MonitorPolicy,
    notifier: N,
    states: HashMap<String, Vec<AlertState>>,
}

impl<N: Notifier> AlertHandler<N> {
    pub fn new(policy: MonitorPolicy, notifier: N) -> Self {
        Self {
            policy,
            notifier,
            states: HashMap::new(),
        }
    }

    /// Evaluate one batch of readings for a sensor.
    ///
    /// Every feature name must resolve to one of the sensor's monitored
    /// values; an unknown feature is an error, not a skip. In-band readings
    /// are a no-op: existing states are cleared only by expiry, never by the
    /// absence of new violations.
    pub fn handle(&mut self, sensor: &Sensor, readings: &HashMap<String, f64>) -> Result<()> {
        for (feature, value) in readings {
            let monitored = sensor.monitored(feature)?;
            let candidates: Vec<Alert> = monitored.triggers(*value).collect();
            let Some(first) = candidates.first() else {
                continue;
            };
            let kind = first.kind();

            let states = self.states.entry(sensor.name().to_string()).or_default();
            match states.iter_mut().find(|s| s.kind() == kind) {
                Some(state) => state.update(candidates),
                None => states.push(AlertState::new(sensor.name(), self.policy.expiry, candidates)?),
            }
        }
        self.sweep(sensor.name())
    }

    /// Age, notify, and discard states for one sensor.
    ///
    /// Each state is pruned once; pending states get their gate stamped shut
    /// and the notifier invoked (optimistically: a failed transport leaves the
    /// gate closed). Inactive states are removed only after the notification
    /// scan, so a state that expired this call can still fire. A notifier
    /// error is returned after the bookkeeping completes.
    pub fn sweep(&mut self, sensor: &str) -> Result<()> {
        let Some(states) = self.states.get_mut(sensor) else {
            return Ok(());
        };
        let now = Utc::now();
        let mut failure = None;
        let mut later_failures = 0;

        for state in states.iter_mut() {
            state.prune(now);
            if state.pending(&self.policy) {
                state.mark_notified(now);
                if let Err(e) = self.notifier.notify(state) {
                    let e = e.context(format!(
                        "notification for sensor '{}' ({}) failed",
                        sensor,
                        state.kind()
                    ));
                    if failure.is_none() {
                        failure = Some(e);
                    } else {
                        later_failures += 1;
                    }
                }
            }
        }

        states.retain(|s| s.active());
        let empty = states.is_empty();
        if empty {
            self.states.remove(sensor);
        }

        match failure {
            Some(e) if later_failures > 0 => Err(e.context(format!(
                "{} further notification(s) for sensor '{}' also failed",
                later_failures, sensor
            ))),
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Current states for a sensor, empty when none are tracked.
    pub fn states(&self, sensor: &str) -> &[AlertState] {
        self.states.get(sensor).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn policy(&self) -> &MonitorPolicy {
        &self.policy
    }
}
