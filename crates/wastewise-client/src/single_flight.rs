//! Single-Flight Primitives
//!
//! `SingleFlight` lets concurrent callers share one in-progress future
//! instead of each starting their own. `Latch` is a one-shot flag used to
//! emit the forced-logout signal only once per session.

use std::cell::{Cell, RefCell};
use std::future::Future;

use futures::future::{FutureExt, LocalBoxFuture, Shared};

type Flight<T> = Shared<LocalBoxFuture<'static, T>>;

/// Shares one in-flight future between every caller that arrives while it
/// is running. Once it resolves the slot is idle again and the next caller
/// starts a fresh flight.
pub struct SingleFlight<T: Clone + 'static> {
    slot: RefCell<Option<Flight<T>>>,
    generation: Cell<u64>,
    started: Cell<u64>,
}

impl<T: Clone + 'static> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            slot: RefCell::new(None),
            generation: Cell::new(0),
            started: Cell::new(0),
        }
    }
}

impl<T: Clone + 'static> SingleFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the current flight, or start one with `start`
    ///
    /// `start` is only invoked when no flight is in progress.
    pub async fn run<F, Fut>(&self, start: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + 'static,
    {
        let (flight, generation) = {
            let mut slot = self.slot.borrow_mut();
            match slot.as_ref() {
                Some(flight) if flight.peek().is_none() => (flight.clone(), self.generation.get()),
                _ => {
                    let generation = self.generation.get() + 1;
                    self.generation.set(generation);
                    self.started.set(self.started.get() + 1);
                    let flight = start().boxed_local().shared();
                    *slot = Some(flight.clone());
                    (flight, generation)
                }
            }
        };

        let outcome = flight.await;

        // First waiter to wake frees the slot, unless a newer flight took it.
        if self.generation.get() == generation {
            self.slot.borrow_mut().take();
        }
        outcome
    }

    pub fn is_in_flight(&self) -> bool {
        self.slot
            .borrow()
            .as_ref()
            .is_some_and(|flight| flight.peek().is_none())
    }

    /// Number of flights started so far
    pub fn flights_started(&self) -> u64 {
        self.started.get()
    }
}

/// One-shot flag: only the first `trip` after a `reset` returns true
#[derive(Debug, Default)]
pub struct Latch {
    tripped: Cell<bool>,
}

impl Latch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trip(&self) -> bool {
        !self.tripped.replace(true)
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.get()
    }

    pub fn reset(&self) {
        self.tripped.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use std::rc::Rc;

    #[tokio::test]
    async fn test_concurrent_callers_share_one_flight() {
        let flight = Rc::new(SingleFlight::<u32>::new());
        let calls = Rc::new(Cell::new(0));
        // the flight stays pending until the gate opens
        let (open, gate) = oneshot::channel::<u32>();
        let gate = Rc::new(RefCell::new(Some(gate)));

        let callers = (0..5).map(|_| {
            let flight = flight.clone();
            let calls = calls.clone();
            let gate = gate.clone();
            async move {
                flight
                    .run(|| {
                        calls.set(calls.get() + 1);
                        let rx = gate.borrow_mut().take();
                        async move {
                            match rx {
                                Some(rx) => rx.await.unwrap_or(0),
                                None => 0,
                            }
                        }
                    })
                    .await
            }
        });
        let observer = flight.clone();
        let release = async move {
            // every caller has been polled once by now
            assert!(observer.is_in_flight());
            assert_eq!(observer.flights_started(), 1);
            let _ = open.send(42);
        };

        let (results, ()) = futures::future::join(futures::future::join_all(callers), release).await;

        assert_eq!(results, vec![42; 5]);
        assert_eq!(calls.get(), 1);
        assert_eq!(flight.flights_started(), 1);
        assert!(!flight.is_in_flight());
    }

    #[tokio::test]
    async fn test_sequential_callers_start_new_flights() {
        let flight = SingleFlight::<u32>::new();
        assert_eq!(flight.run(|| async { 1 }).await, 1);
        assert_eq!(flight.run(|| async { 2 }).await, 2);
        assert_eq!(flight.flights_started(), 2);
    }

    #[test]
    fn test_latch_trips_once_until_reset() {
        let latch = Latch::new();
        assert!(latch.trip());
        assert!(!latch.trip());
        assert!(latch.is_tripped());
        latch.reset();
        assert!(latch.trip());
    }
}
