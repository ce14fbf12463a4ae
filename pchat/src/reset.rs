//! Idle-gap history reset and the clock it reads.
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use pchat::{ConversationState, HistoryResetPolicy, ManualClock};
//! use pprovider::Message;
//!
//! let clock = Arc::new(ManualClock::new());
//! let policy = HistoryResetPolicy::new(Duration::from_secs(300), clock.clone());
//! let mut state = ConversationState::new("be brief");
//!
//! assert!(!policy.apply(&mut state));
//! state.push(Message::user("hello"));
//!
//! clock.advance(Duration::from_secs(301));
//! assert!(policy.apply(&mut state));
//! assert_eq!(state.len(), 1);
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::ConversationState;

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        self.origin + *offset
    }
}

#[derive(Clone)]
pub struct HistoryResetPolicy {
    idle_threshold: Duration,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for HistoryResetPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryResetPolicy")
            .field("idle_threshold", &self.idle_threshold)
            .finish_non_exhaustive()
    }
}

impl HistoryResetPolicy {
    pub fn new(idle_threshold: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            idle_threshold,
            clock,
        }
    }

    pub fn with_system_clock(idle_threshold: Duration) -> Self {
        Self::new(idle_threshold, Arc::new(SystemClock))
    }

    pub fn idle_threshold(&self) -> Duration {
        self.idle_threshold
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// True when the gap strictly exceeds the threshold. No previous
    /// activity never resets.
    pub fn should_reset(&self, last_activity: Option<Instant>, now: Instant) -> bool {
        last_activity
            .is_some_and(|last| now.saturating_duration_since(last) > self.idle_threshold)
    }

    /// Resets `state` when idle too long, then stamps it with the current
    /// time. Returns whether a reset happened.
    pub fn apply(&self, state: &mut ConversationState) -> bool {
        let now = self.clock.now();
        let reset = self.should_reset(state.last_activity(), now);
        if reset {
            state.reset();
        }

        state.touch(now);
        reset
    }
}

#[cfg(test)]
mod tests {
    use pprovider::Message;

    use super::*;

    fn policy(clock: &Arc<ManualClock>) -> HistoryResetPolicy {
        HistoryResetPolicy::new(Duration::from_secs(300), clock.clone())
    }

    #[test]
    fn first_turn_never_resets() {
        let clock = Arc::new(ManualClock::new());
        let mut state = ConversationState::new("seed");
        state.push(Message::user("carried over"));

        assert!(!policy(&clock).apply(&mut state));
        assert_eq!(state.len(), 2);
        assert_eq!(state.last_activity(), Some(clock.now()));
    }

    #[test]
    fn gap_equal_to_threshold_does_not_reset() {
        let clock = Arc::new(ManualClock::new());
        let policy = policy(&clock);
        let mut state = ConversationState::new("seed");
        policy.apply(&mut state);
        state.push(Message::user("hello"));

        clock.advance(Duration::from_secs(300));

        assert!(!policy.apply(&mut state));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn gap_beyond_threshold_resets_and_restamps() {
        let clock = Arc::new(ManualClock::new());
        let policy = policy(&clock);
        let mut state = ConversationState::new("seed");
        policy.apply(&mut state);
        state.push(Message::user("hello"));

        clock.advance(Duration::from_secs(301));

        assert!(policy.apply(&mut state));
        assert_eq!(state.messages(), &[Message::system("seed")]);
        assert_eq!(state.last_activity(), Some(clock.now()));
    }

    #[test]
    fn timestamp_moves_even_without_reset() {
        let clock = Arc::new(ManualClock::new());
        let policy = policy(&clock);
        let mut state = ConversationState::new("seed");
        policy.apply(&mut state);

        clock.advance(Duration::from_secs(200));
        policy.apply(&mut state);
        clock.advance(Duration::from_secs(200));

        assert!(!policy.apply(&mut state));
    }
}
