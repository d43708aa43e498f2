//! Snapshot history of a single simulation run.
//!
//! The history is the simulator's stopping oracle: after every recorded
//! snapshot it answers whether the circuit has settled or is repeating
//! itself.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One recorded state together with when it was captured.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// Position in the history, starting at 0
    pub step: usize,
    /// Outputs of every machine after the step
    pub state: State,
    /// When the snapshot was recorded
    pub recorded_at: DateTime<Utc>,
}

/// Why the stopping oracle fired.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum StopReason {
    /// The two most recent snapshots are identical.
    Stable,
    /// The most recent window of snapshots repeats the window before it.
    Cyclic,
}

/// Ordered, append-only log of snapshots.
///
/// # Example
///
/// ```rust
/// use logic_sim::core::{State, StateHistory, StopReason};
///
/// let mut history = StateHistory::new();
/// assert!(history.last_state().is_none());
///
/// history.record(State::new());
/// assert_eq!(history.stop_reason(), None);
///
/// history.record(State::new());
/// assert_eq!(history.stop_reason(), Some(StopReason::Stable));
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateHistory {
    snapshots: Vec<Snapshot>,
}

impl StateHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }

    /// Append `state` as the newest snapshot.
    pub fn record(&mut self, state: State) {
        let step = self.snapshots.len();
        self.snapshots.push(Snapshot {
            step,
            state,
            recorded_at: Utc::now(),
        });
    }

    /// The newest recorded state, `None` for an empty history.
    pub fn last_state(&self) -> Option<&State> {
        self.snapshots.last().map(|snapshot| &snapshot.state)
    }

    /// Every snapshot, oldest first.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Recorded states, oldest first.
    pub fn states(&self) -> impl DoubleEndedIterator<Item = &State> + ExactSizeIterator {
        self.snapshots.iter().map(|snapshot| &snapshot.state)
    }

    /// Number of recorded snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// True when the two most recent snapshots are equal.
    pub fn is_stable(&self) -> bool {
        match self.snapshots.as_slice() {
            [.., previous, last] => previous.state == last.state,
            _ => false,
        }
    }

    /// True when, for some window size `k` in `2..=len/2`, the newest `k`
    /// snapshots equal the `k` snapshots immediately before them.
    ///
    /// The repetition does not have to start at the beginning of the
    /// history; a cycle acquired after a settling phase is found as soon as
    /// one full period has repeated.
    pub fn is_in_cycle(&self) -> bool {
        let len = self.snapshots.len();
        (2..=len / 2).any(|window| {
            let recent = &self.snapshots[len - window..];
            let previous = &self.snapshots[len - 2 * window..len - window];
            recent
                .iter()
                .rev()
                .zip(previous.iter().rev())
                .all(|(a, b)| a.state == b.state)
        })
    }

    /// The stop condition checked after every recorded snapshot.
    pub fn stop_reason(&self) -> Option<StopReason> {
        if self.is_stable() {
            Some(StopReason::Stable)
        } else if self.is_in_cycle() {
            Some(StopReason::Cyclic)
        } else {
            None
        }
    }

    /// Time elapsed between the first and the last snapshot.
    ///
    /// Returns `None` for an empty history.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.snapshots.first(), self.snapshots.last()) {
            let duration = last.recorded_at.signed_duration_since(first.recorded_at);
            duration.to_std().ok()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MachineId, MachineName, Value};
    use Value::{High, Low, Undefined};

    fn state(outputs: &[Value]) -> State {
        let mut state = State::new();
        for (index, value) in outputs.iter().enumerate() {
            let name = MachineName::new(format!("m{index}")).unwrap();
            state.set_outputs(MachineId(index), name, vec![*value]);
        }
        state
    }

    fn history(states: &[&[Value]]) -> StateHistory {
        let mut history = StateHistory::new();
        for outputs in states {
            history.record(state(outputs));
        }
        history
    }

    #[test]
    fn new_history_is_empty() {
        let history = StateHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
        assert!(history.last_state().is_none());
        assert!(history.duration().is_none());
        assert!(!history.is_stable());
        assert!(!history.is_in_cycle());
    }

    #[test]
    fn record_numbers_steps() {
        let history = history(&[&[Low], &[High]]);
        let steps: Vec<_> = history.snapshots().iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![0, 1]);
        assert_eq!(history.last_state(), Some(&state(&[High])));
    }

    #[test]
    fn single_snapshot_is_not_stable() {
        assert!(!history(&[&[High]]).is_stable());
    }

    #[test]
    fn two_different_snapshots_are_not_stable() {
        assert!(!history(&[&[Undefined], &[High]]).is_stable());
    }

    #[test]
    fn two_equal_snapshots_are_stable() {
        assert!(history(&[&[High], &[High]]).is_stable());
    }

    #[test]
    fn only_the_last_two_snapshots_decide_stability() {
        let settled = history(&[&[Low, Low], &[High, Low], &[High, High], &[High, High]]);
        assert!(settled.is_stable());

        let moving = history(&[&[High, High], &[High, High], &[High, Low]]);
        assert!(!moving.is_stable());
    }

    #[test]
    fn history_without_cycle() {
        let history = history(&[&[Low, Low], &[Low, High], &[High, Low], &[High, High]]);
        assert!(!history.is_in_cycle());
        assert_eq!(history.stop_reason(), None);
    }

    #[test]
    fn cycle_from_the_beginning() {
        let a: &[Value] = &[Low, High];
        let b: &[Value] = &[High, Low];
        assert!(!history(&[a, b, a]).is_in_cycle());

        let cyclic = history(&[a, b, a, b]);
        assert!(cyclic.is_in_cycle());
        assert_eq!(cyclic.stop_reason(), Some(StopReason::Cyclic));
    }

    #[test]
    fn acquired_cycle() {
        let warmup: &[Value] = &[Undefined, Undefined];
        let a: &[Value] = &[Low, High];
        let b: &[Value] = &[High, Low];
        let c: &[Value] = &[High, High];

        assert!(!history(&[warmup, a, b]).is_in_cycle());
        assert!(!history(&[warmup, a, b, c, a, b]).is_in_cycle());
        assert!(history(&[warmup, a, b, c, a, b, c]).is_in_cycle());
    }

    #[test]
    fn stability_takes_precedence() {
        let history = history(&[&[Low], &[High], &[Low], &[High], &[High]]);
        assert_eq!(history.stop_reason(), Some(StopReason::Stable));
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let mut history = StateHistory::new();
        history.record(State::new());
        std::thread::sleep(Duration::from_millis(10));
        history.record(State::new());

        let duration = history.duration();
        assert!(duration.is_some());
        assert!(duration.unwrap() >= Duration::from_millis(10));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = history(&[&[Low], &[High]]);
        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory = serde_json::from_str(&json).unwrap();

        assert_eq!(history.len(), deserialized.len());
        assert_eq!(history.last_state(), deserialized.last_state());
    }
}
