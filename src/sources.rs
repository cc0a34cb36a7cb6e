// src/sources.rs

//! Injectable event sources.
//!
//! The clock and the visibility signal are external. A source is handed the
//! session's event sender on `subscribe` and returns a `Subscription`; cancelling
//! (or dropping) the subscription guarantees the source stops feeding the queue.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};

use crate::models::event::SessionEvent;

pub type EventSender = UnboundedSender<SessionEvent>;

/// Handle to a live source. Cancelled on drop.
pub struct Subscription {
    name: &'static str,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(name: &'static str, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            name,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Aborts the task on cancel.
    pub fn from_task(name: &'static str, handle: JoinHandle<()>) -> Self {
        Self::new(name, move || handle.abort())
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Idempotent.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
            tracing::debug!("Unsubscribed from {}", self.name);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("name", &self.name)
            .field("active", &self.is_active())
            .finish()
    }
}

/// The two subscriptions a running session holds.
#[derive(Debug, Default)]
pub struct Subscriptions {
    clock: Option<Subscription>,
    visibility: Option<Subscription>,
}

impl Subscriptions {
    pub fn attach(&mut self, clock: Subscription, visibility: Subscription) {
        self.cancel_all();
        self.clock = Some(clock);
        self.visibility = Some(visibility);
    }

    pub fn is_live(&self) -> bool {
        self.clock.as_ref().is_some_and(Subscription::is_active)
            || self.visibility.as_ref().is_some_and(Subscription::is_active)
    }

    pub fn cancel_all(&mut self) {
        if let Some(mut clock) = self.clock.take() {
            clock.cancel();
        }
        if let Some(mut visibility) = self.visibility.take() {
            visibility.cancel();
        }
    }
}

/// Supplies `Tick` events, one per elapsed second of exam time.
pub trait ClockSource {
    fn subscribe(&self, events: EventSender) -> Subscription;
}

/// Supplies `FocusLost` / `FocusRegained` events.
pub trait VisibilitySource {
    fn subscribe(&self, events: EventSender) -> Subscription;
}

/// Wall clock backed by `tokio::time::interval`. Must be subscribed from
/// within a tokio runtime.
#[derive(Debug, Clone, Copy)]
pub struct IntervalClock {
    period: Duration,
}

impl IntervalClock {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

impl Default for IntervalClock {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl ClockSource for IntervalClock {
    fn subscribe(&self, events: EventSender) -> Subscription {
        let period = self.period;
        let handle = tokio::spawn(async move {
            // interval() fires immediately; the first tick must wait one period
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                if events.send(SessionEvent::Tick).is_err() {
                    break;
                }
            }
        });
        Subscription::from_task("interval clock", handle)
    }
}

/// Shared slot holding the sender of whoever subscribed last.
#[derive(Debug, Clone, Default)]
struct ManualSlot {
    inner: Arc<Mutex<SlotInner>>,
}

#[derive(Debug, Default)]
struct SlotInner {
    generation: u64,
    sender: Option<EventSender>,
}

impl ManualSlot {
    fn subscribe(&self, name: &'static str, events: EventSender) -> Subscription {
        let generation = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.generation += 1;
            inner.sender = Some(events);
            inner.generation
        };
        let slot = Arc::clone(&self.inner);
        Subscription::new(name, move || {
            let mut inner = slot.lock().unwrap_or_else(PoisonError::into_inner);
            // a stale handle must not cut off a newer subscriber
            if inner.generation == generation {
                inner.sender = None;
            }
        })
    }

    fn is_subscribed(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sender
            .is_some()
    }

    /// Returns whether the event reached a subscriber.
    fn emit(&self, event: SessionEvent) -> bool {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match inner.sender.as_ref() {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        }
    }
}

/// Clock driven by explicit `tick` calls.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    slot: ManualSlot,
}

impl ManualClock {
    pub fn tick(&self) -> bool {
        self.slot.emit(SessionEvent::Tick)
    }

    /// Returns how many ticks were delivered.
    pub fn advance(&self, seconds: u32) -> u32 {
        let mut delivered = 0;
        for _ in 0..seconds {
            if !self.tick() {
                break;
            }
            delivered += 1;
        }
        delivered
    }

    pub fn is_subscribed(&self) -> bool {
        self.slot.is_subscribed()
    }
}

impl ClockSource for ManualClock {
    fn subscribe(&self, events: EventSender) -> Subscription {
        self.slot.subscribe("manual clock", events)
    }
}

/// Visibility signal driven by explicit calls (terminal commands, tests).
#[derive(Debug, Clone, Default)]
pub struct ManualVisibility {
    slot: ManualSlot,
}

impl ManualVisibility {
    pub fn lose_focus(&self) -> bool {
        self.slot.emit(SessionEvent::FocusLost)
    }

    pub fn regain_focus(&self) -> bool {
        self.slot.emit(SessionEvent::FocusRegained)
    }

    pub fn is_subscribed(&self) -> bool {
        self.slot.is_subscribed()
    }
}

impl VisibilitySource for ManualVisibility {
    fn subscribe(&self, events: EventSender) -> Subscription {
        self.slot.subscribe("manual visibility", events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_manual_clock_stops_after_cancel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let clock = ManualClock::default();
        assert!(!clock.tick());

        let mut sub = clock.subscribe(tx);
        assert!(clock.is_subscribed());
        assert_eq!(clock.advance(3), 3);

        sub.cancel();
        assert!(!sub.is_active());
        assert!(!clock.is_subscribed());
        assert!(!clock.tick());

        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, 3);
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let visibility = ManualVisibility::default();
        {
            let _sub = visibility.subscribe(tx);
            assert!(visibility.lose_focus());
        }
        assert!(!visibility.is_subscribed());
        assert!(!visibility.lose_focus());
    }

    #[test]
    fn test_cancel_all_clears_both() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let clock = ManualClock::default();
        let visibility = ManualVisibility::default();

        let mut subs = Subscriptions::default();
        subs.attach(clock.subscribe(tx.clone()), visibility.subscribe(tx));
        assert!(subs.is_live());

        subs.cancel_all();
        assert!(!subs.is_live());
        assert!(!clock.is_subscribed());
        assert!(!visibility.is_subscribed());
    }

    #[test]
    fn test_stale_subscription_does_not_cut_off_newer_one() {
        let (first_tx, _first_rx) = mpsc::unbounded_channel();
        let (second_tx, mut second_rx) = mpsc::unbounded_channel();
        let clock = ManualClock::default();

        let stale = clock.subscribe(first_tx);
        let _current = clock.subscribe(second_tx);
        drop(stale);

        assert!(clock.tick());
        assert!(second_rx.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_clock_waits_one_period_before_first_tick() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sub = IntervalClock::new(Duration::from_secs(1)).subscribe(tx);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2600)).await;
        let mut ticks = 0;
        while rx.try_recv().is_ok() {
            ticks += 1;
        }
        assert_eq!(ticks, 3);

        sub.cancel();
    }
}
