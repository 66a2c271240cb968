//! Single-slot cancellable timer
//!
//! The engine never blocks or spawns threads. A transition that must wait
//! is parked here with its deadline, and the host polls the engine, which
//! asks the timer whether the deadline has passed. At most one transition
//! is pending at any time; cancelling simply empties the slot, so a
//! cancelled transition can never fire later.

use std::time::Duration;
use tracing::{debug, warn};

/// Transition waiting for its deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingTransition {
    /// Transmission -> Corruption
    FinishTransmission,
    /// Correction -> Complete
    FinishCorrection,
    /// Repeat `next_step` in auto-advance mode
    AutoAdvance,
}

impl PendingTransition {
    /// Pacing transitions belong to the step that scheduled them
    pub fn is_pacing(&self) -> bool {
        !matches!(self, PendingTransition::AutoAdvance)
    }
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    transition: PendingTransition,
    due: Duration,
}

/// Holds at most one scheduled transition
#[derive(Debug, Default)]
pub struct Timer {
    slot: Option<Scheduled>,
}

impl Timer {
    /// Create an idle timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `transition` until `due`, replacing anything already pending
    pub fn schedule(&mut self, transition: PendingTransition, due: Duration) {
        if let Some(previous) = self.slot {
            warn!(previous = ?previous.transition, "replacing pending transition");
        }
        debug!(?transition, ?due, "transition scheduled");
        self.slot = Some(Scheduled { transition, due });
    }

    /// Drop whatever is pending
    pub fn cancel(&mut self) -> Option<PendingTransition> {
        let cancelled = self.slot.take().map(|s| s.transition);
        if let Some(transition) = cancelled {
            debug!(?transition, "transition cancelled");
        }
        cancelled
    }

    /// Drop the pending transition only if it is an auto-advance
    pub fn cancel_auto_advance(&mut self) -> bool {
        if self.pending() == Some(PendingTransition::AutoAdvance) {
            self.cancel();
            return true;
        }
        false
    }

    /// Pending transition, if any
    pub fn pending(&self) -> Option<PendingTransition> {
        self.slot.map(|s| s.transition)
    }

    /// Deadline of the pending transition
    pub fn deadline(&self) -> Option<Duration> {
        self.slot.map(|s| s.due)
    }

    /// Check if nothing is pending
    pub fn is_idle(&self) -> bool {
        self.slot.is_none()
    }

    /// Remove and return the pending transition if its deadline has passed
    pub fn take_due(&mut self, now: Duration) -> Option<PendingTransition> {
        match self.slot {
            Some(scheduled) if scheduled.due <= now => {
                self.slot = None;
                Some(scheduled.transition)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_timer_fires_at_deadline() {
        let mut timer = Timer::new();
        timer.schedule(PendingTransition::FinishTransmission, 100 * MS);

        assert_eq!(timer.take_due(99 * MS), None);
        assert_eq!(timer.deadline(), Some(100 * MS));
        assert_eq!(
            timer.take_due(100 * MS),
            Some(PendingTransition::FinishTransmission)
        );
        assert!(timer.is_idle());
        assert_eq!(timer.take_due(500 * MS), None);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut timer = Timer::new();
        timer.schedule(PendingTransition::FinishCorrection, 10 * MS);
        assert_eq!(timer.cancel(), Some(PendingTransition::FinishCorrection));
        assert_eq!(timer.take_due(1000 * MS), None);
        assert_eq!(timer.cancel(), None);
    }

    #[test]
    fn test_cancel_auto_advance_keeps_pacing() {
        let mut timer = Timer::new();
        timer.schedule(PendingTransition::FinishTransmission, 10 * MS);
        assert!(!timer.cancel_auto_advance());
        assert_eq!(timer.pending(), Some(PendingTransition::FinishTransmission));

        timer.schedule(PendingTransition::AutoAdvance, 20 * MS);
        assert!(timer.cancel_auto_advance());
        assert!(timer.is_idle());
    }

    #[test]
    fn test_pacing_classification() {
        assert!(PendingTransition::FinishTransmission.is_pacing());
        assert!(PendingTransition::FinishCorrection.is_pacing());
        assert!(!PendingTransition::AutoAdvance.is_pacing());
    }
}
