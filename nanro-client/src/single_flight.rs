//! Single-flight coordination for token refresh.
//!
//! However many callers hit a 401 at once, only one of them (the leader)
//! runs the refresh. Callers that arrive while it is running park on a
//! oneshot channel and get the leader's outcome; they are woken in the
//! order they arrived. A generation counter, bumped whenever a run
//! completes, lets a caller whose credential was already replaced (or
//! wiped) skip the refresh entirely.

use std::future::Future;

use parking_lot::Mutex;
use tokio::sync::oneshot;

/// How a caller's request to run was resolved
#[derive(Debug, Clone, PartialEq)]
pub enum Joined<T, E> {
    /// This caller ran the work
    Led(Result<T, E>),
    /// Another caller's run finished while this one waited
    Waited(Result<T, E>),
    /// A run already completed after `seen_generation`; nothing was started
    Superseded,
    /// The leader was dropped before it finished
    Abandoned,
}

#[derive(Debug)]
struct FlightState<T, E> {
    in_flight: bool,
    generation: u64,
    waiters: Vec<oneshot::Sender<Result<T, E>>>,
}

#[derive(Debug)]
pub struct SingleFlight<T, E> {
    state: Mutex<FlightState<T, E>>,
}

enum Role<T, E> {
    Lead,
    Wait(oneshot::Receiver<Result<T, E>>),
    Superseded,
}

impl<T: Clone, E: Clone> Default for SingleFlight<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, E: Clone> SingleFlight<T, E> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FlightState {
                in_flight: false,
                generation: 0,
                waiters: Vec::new(),
            }),
        }
    }

    /// Number of completed runs so far. Capture this before using the
    /// value a run would replace.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.lock().in_flight
    }

    /// Callers currently parked behind the leader.
    pub fn waiting(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Run `work` unless a run is already in flight (then wait for it) or a
    /// run has completed since `seen_generation` (then return `Superseded`).
    pub async fn run<F, Fut>(&self, seen_generation: u64, work: F) -> Joined<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let role = {
            let mut state = self.state.lock();
            if state.in_flight {
                let (tx, rx) = oneshot::channel();
                state.waiters.push(tx);
                Role::Wait(rx)
            } else if state.generation != seen_generation {
                Role::Superseded
            } else {
                state.in_flight = true;
                Role::Lead
            }
        };

        match role {
            Role::Superseded => Joined::Superseded,
            Role::Wait(rx) => match rx.await {
                Ok(result) => Joined::Waited(result),
                Err(_) => Joined::Abandoned,
            },
            Role::Lead => {
                let guard = LeadGuard {
                    flight: self,
                    armed: true,
                };
                let result = work().await;
                guard.complete(&result);
                Joined::Led(result)
            }
        }
    }
}

/// Clears the in-flight flag if the leader's future is dropped mid-run,
/// so parked callers see `Abandoned` instead of hanging.
struct LeadGuard<'a, T, E> {
    flight: &'a SingleFlight<T, E>,
    armed: bool,
}

impl<T: Clone, E: Clone> LeadGuard<'_, T, E> {
    fn complete(mut self, result: &Result<T, E>) {
        self.armed = false;
        let waiters = {
            let mut state = self.flight.state.lock();
            state.in_flight = false;
            state.generation += 1;
            std::mem::take(&mut state.waiters)
        };
        for waiter in waiters {
            // A waiter that gave up has dropped its receiver; nothing to do.
            let _ = waiter.send(result.clone());
        }
    }
}

impl<T, E> Drop for LeadGuard<'_, T, E> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.flight.state.lock();
            state.in_flight = false;
            state.waiters.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    type Flight = SingleFlight<String, String>;

    async fn wait_for_waiters(flight: &Flight, n: usize) {
        for _ in 0..200 {
            if flight.waiting() == n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("expected {n} waiters, have {}", flight.waiting());
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_run() {
        let flight = Arc::new(Flight::new());
        let runs = Arc::new(AtomicUsize::new(0));
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let release_rx = Arc::new(tokio::sync::Mutex::new(Some(release_rx)));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let flight = Arc::clone(&flight);
            let runs = Arc::clone(&runs);
            let release_rx = Arc::clone(&release_rx);
            handles.push(tokio::spawn(async move {
                flight
                    .run(0, || async move {
                        runs.fetch_add(1, Ordering::SeqCst);
                        let rx = release_rx.lock().await.take().expect("leader runs once");
                        let _ = rx.await;
                        Ok::<_, String>("new-token".to_string())
                    })
                    .await
            }));
        }

        wait_for_waiters(&flight, 4).await;
        assert!(flight.is_in_flight());
        release_tx.send(()).unwrap();

        let mut led = 0;
        let mut waited = 0;
        for h in handles {
            match h.await.unwrap() {
                Joined::Led(Ok(t)) => {
                    assert_eq!(t, "new-token");
                    led += 1;
                }
                Joined::Waited(Ok(t)) => {
                    assert_eq!(t, "new-token");
                    waited += 1;
                }
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!((led, waited), (1, 4));
        assert_eq!(flight.generation(), 1);
        assert!(!flight.is_in_flight());
    }

    #[tokio::test]
    async fn test_stale_generation_is_superseded() {
        let flight = Flight::new();
        let first = flight.run(0, || async { Ok("a".to_string()) }).await;
        assert_eq!(first, Joined::Led(Ok("a".to_string())));

        let runs = AtomicUsize::new(0);
        let second = flight
            .run(0, || async {
                runs.fetch_add(1, Ordering::SeqCst);
                Ok("b".to_string())
            })
            .await;
        assert_eq!(second, Joined::Superseded);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_reaches_waiters_and_supersedes_late_callers() {
        let flight = Arc::new(Flight::new());
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let leader = {
            let flight = Arc::clone(&flight);
            tokio::spawn(async move {
                flight
                    .run(0, || async move {
                        let _ = release_rx.await;
                        Err::<String, _>("refresh rejected".to_string())
                    })
                    .await
            })
        };
        while !flight.is_in_flight() {
            tokio::task::yield_now().await;
        }
        let follower = {
            let flight = Arc::clone(&flight);
            tokio::spawn(async move { flight.run(0, || async { Ok("never".to_string()) }).await })
        };
        wait_for_waiters(&flight, 1).await;
        release_tx.send(()).unwrap();

        assert_eq!(leader.await.unwrap(), Joined::Led(Err("refresh rejected".to_string())));
        assert_eq!(follower.await.unwrap(), Joined::Waited(Err("refresh rejected".to_string())));
        assert_eq!(flight.generation(), 1);

        // A caller that saw the old generation must not retry the failed run
        let late = flight.run(0, || async { Ok("late".to_string()) }).await;
        assert_eq!(late, Joined::Superseded);

        // One that starts afresh leads a new attempt
        let retry = flight.run(1, || async { Ok("fresh".to_string()) }).await;
        assert_eq!(retry, Joined::Led(Ok("fresh".to_string())));
    }

    #[tokio::test]
    async fn test_waiters_wake_in_arrival_order() {
        let flight = Arc::new(Flight::new());
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let leader = {
            let flight = Arc::clone(&flight);
            tokio::spawn(async move {
                flight
                    .run(0, || async move {
                        let _ = release_rx.await;
                        Ok::<_, String>("t".to_string())
                    })
                    .await
            })
        };
        while !flight.is_in_flight() {
            tokio::task::yield_now().await;
        }

        // Parked one at a time so arrival order is known
        let woken = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut waiters = Vec::new();
        for i in 0..4 {
            let waiter_flight = Arc::clone(&flight);
            let woken = Arc::clone(&woken);
            waiters.push(tokio::spawn(async move {
                let outcome = waiter_flight.run(0, || async { Ok("never".to_string()) }).await;
                woken.lock().push(i);
                outcome
            }));
            wait_for_waiters(&flight, i + 1).await;
        }

        release_tx.send(()).unwrap();
        leader.await.unwrap();
        for w in waiters {
            assert_eq!(w.await.unwrap(), Joined::Waited(Ok("t".to_string())));
        }
        assert_eq!(*woken.lock(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_dropped_leader_releases_waiters() {
        let flight = Arc::new(Flight::new());

        let leader = {
            let flight = Arc::clone(&flight);
            tokio::spawn(async move {
                flight
                    .run(0, || async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        Ok("late".to_string())
                    })
                    .await
            })
        };
        while !flight.is_in_flight() {
            tokio::task::yield_now().await;
        }
        let follower = {
            let flight = Arc::clone(&flight);
            tokio::spawn(async move { flight.run(0, || async { Ok("x".to_string()) }).await })
        };
        wait_for_waiters(&flight, 1).await;

        leader.abort();
        assert_eq!(follower.await.unwrap(), Joined::Abandoned);
        assert!(!flight.is_in_flight());
        assert_eq!(flight.waiting(), 0);
    }
}
