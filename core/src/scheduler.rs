use core::time::Duration;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use web_time::Instant;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealEvent {
    /// Move the reveal cursor to this position of the sequence.
    Highlight(usize),
    /// Hide the last tile and start accepting input.
    Complete,
}

/// Reveal event tagged with the epoch of the level that scheduled it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub epoch: Epoch,
    pub due: Instant,
    pub event: RevealEvent,
}

/// Offsets of a reveal of `len` tiles, one tile every `delay`.
///
/// `Highlight(i)` happens at `delay * i` and `Complete` at `delay * len + REVEAL_TAIL`, so
/// `Complete` is always strictly last.
pub fn reveal_timeline(
    len: usize,
    delay: Duration,
) -> impl Iterator<Item = (Duration, RevealEvent)> {
    let steps = move |n: usize| delay.saturating_mul(u32::try_from(n).unwrap_or(u32::MAX));
    let complete = steps(len).saturating_add(REVEAL_TAIL);
    (0..len)
        .map(move |i| (steps(i), RevealEvent::Highlight(i)))
        .chain(core::iter::once((complete, RevealEvent::Complete)))
}

/// Pending reveal events ordered by due time.
///
/// Only one timeline is ever pending, scheduling a new one drops the previous one.
#[derive(Clone, Debug, Default)]
pub struct RevealScheduler {
    pending: VecDeque<ScheduledEvent>,
}

impl RevealScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the pending timeline, returns how many events were cancelled.
    pub fn schedule(&mut self, epoch: Epoch, start: Instant, len: usize, delay: Duration) -> usize {
        let cancelled = self.cancel();
        self.pending
            .extend(
                reveal_timeline(len, delay).map(|(offset, event)| ScheduledEvent {
                    epoch,
                    due: start + offset,
                    event,
                }),
            );
        cancelled
    }

    /// Drops every pending event, returns how many there were.
    pub fn cancel(&mut self) -> usize {
        let cancelled = self.pending.len();
        if cancelled > 0 {
            log::debug!("cancelled {} pending reveal events", cancelled);
        }
        self.pending.clear();
        cancelled
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.front().map(|scheduled| scheduled.due)
    }

    /// Takes the earliest event if it is due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<ScheduledEvent> {
        if self.pending.front()?.due <= now {
            self.pending.pop_front()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn timeline_offsets_follow_delay() {
        let timeline: Vec<_> = reveal_timeline(3, ms(1000)).collect();
        assert_eq!(
            timeline,
            vec![
                (ms(0), RevealEvent::Highlight(0)),
                (ms(1000), RevealEvent::Highlight(1)),
                (ms(2000), RevealEvent::Highlight(2)),
                (ms(3200), RevealEvent::Complete),
            ]
        );
    }

    #[test]
    fn empty_timeline_still_completes() {
        let timeline: Vec<_> = reveal_timeline(0, ms(1500)).collect();
        assert_eq!(timeline, vec![(ms(200), RevealEvent::Complete)]);
    }

    #[test]
    fn complete_is_last_even_without_delay() {
        let timeline: Vec<_> = reveal_timeline(4, Duration::ZERO).collect();
        let (complete_at, last) = *timeline.last().unwrap();
        assert_eq!(last, RevealEvent::Complete);
        assert!(timeline[..4].iter().all(|&(at, _)| at < complete_at));
    }

    #[test]
    fn pop_due_respects_time() {
        let start = Instant::now();
        let mut scheduler = RevealScheduler::new();
        scheduler.schedule(1, start, 2, ms(250));

        assert_eq!(scheduler.next_deadline(), Some(start));
        assert_eq!(
            scheduler.pop_due(start).map(|e| e.event),
            Some(RevealEvent::Highlight(0))
        );
        assert_eq!(scheduler.pop_due(start + ms(249)), None);
        assert_eq!(
            scheduler.pop_due(start + ms(250)).map(|e| e.event),
            Some(RevealEvent::Highlight(1))
        );
        assert_eq!(scheduler.pop_due(start + ms(699)), None);
        let complete = scheduler.pop_due(start + ms(700)).unwrap();
        assert_eq!(complete.event, RevealEvent::Complete);
        assert_eq!(complete.epoch, 1);
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[test]
    fn rescheduling_cancels_previous_timeline() {
        let start = Instant::now();
        let mut scheduler = RevealScheduler::new();
        scheduler.schedule(1, start, 3, ms(1000));
        scheduler.pop_due(start);

        let cancelled = scheduler.schedule(2, start + ms(500), 1, ms(1000));

        assert_eq!(cancelled, 3);
        let mut drained = Vec::new();
        while let Some(event) = scheduler.pop_due(start + ms(10_000)) {
            drained.push(event);
        }
        assert_eq!(drained.len(), 2);
        assert!(drained.iter().all(|e| e.epoch == 2));
        assert_eq!(scheduler.cancel(), 0);
    }
}
