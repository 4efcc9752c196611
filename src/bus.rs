//! The observer bus: periodic poll scheduling and snapshot fan-out.
//!
//! The bus owns the fetch capability and an ordered observer list. Its
//! poll cycle is a self-rescheduling one-shot deadline, not a fixed-rate
//! interval: the next poll is armed `interval` after the previous cycle
//! *completes*, so a slow response delays the next poll instead of
//! overlapping it. The event loop drives the bus by calling
//! [`ObserverBus::run_if_due`] with the current instant.

use crate::error::Result;
use crate::fetch::StatusFetcher;
use crate::snapshot::{parse_status_response, ProjectSnapshot, StatusResponse};
use std::time::{Duration, Instant};

/// Consumer of poll results. Notified strictly in registration order; each
/// observer runs to completion before the next is invoked.
pub trait StatusObserver {
    /// A snapshot array arrived. Entries may be `None` (holes); skip them.
    fn notify(&mut self, snapshots: &[Option<ProjectSnapshot>]);

    /// The server reported its build service unreachable.
    fn on_service_error(&mut self, _message: &str) {}

    /// A good poll arrived after a service error.
    fn on_service_restored(&mut self) {}
}

/// Registration token. Tokens are never reused within one bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Outcome of one call to [`ObserverBus::run_if_due`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollCycle {
    /// The deadline has not passed (or a cycle is already in flight).
    NotDue,
    /// Snapshots were delivered to every observer; carries the entry count.
    Delivered(usize),
    /// The server flagged its build service as unreachable.
    ServiceDown(String),
    /// The fetch itself failed; nothing was delivered this cycle.
    FetchFailed(String),
}

pub struct ObserverBus {
    fetcher: Box<dyn StatusFetcher>,
    interval: Duration,
    observers: Vec<(ObserverId, Box<dyn StatusObserver>)>,
    next_id: u64,
    next_poll_at: Option<Instant>,
    poll_in_flight: bool,
    service_down: bool,
}

impl ObserverBus {
    pub fn new(fetcher: Box<dyn StatusFetcher>, interval: Duration) -> Self {
        Self {
            fetcher,
            interval,
            observers: Vec::new(),
            next_id: 0,
            next_poll_at: None,
            poll_in_flight: false,
            service_down: false,
        }
    }

    /// Append an observer. Notification order is registration order.
    pub fn register(&mut self, observer: Box<dyn StatusObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer. Safe no-op for an unknown (or already removed) id.
    pub fn unregister(&mut self, id: ObserverId) {
        self.observers.retain(|(observer_id, _)| *observer_id != id);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Arm the poll loop so the first cycle fires at `now`. Idempotent:
    /// the bus owns a single deadline, so starting twice re-arms the same
    /// loop rather than creating a second one.
    pub fn start(&mut self, now: Instant) {
        self.next_poll_at = Some(now);
    }

    pub fn is_started(&self) -> bool {
        self.next_poll_at.is_some()
    }

    /// Make the next `run_if_due` call fire regardless of the deadline.
    pub fn poll_now(&mut self, now: Instant) {
        if self.next_poll_at.is_some() {
            self.next_poll_at = Some(now);
        }
    }

    /// Whether a cycle would run at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        !self.poll_in_flight && self.next_poll_at.is_some_and(|at| now >= at)
    }

    /// Run one poll cycle if the deadline has passed.
    ///
    /// Never propagates a fetch failure: the cycle is skipped and the next
    /// deadline is still armed, so the loop survives transient failures
    /// indefinitely (no backoff by design).
    pub fn run_if_due(&mut self, now: Instant) -> PollCycle {
        if !self.is_due(now) {
            return PollCycle::NotDue;
        }

        self.poll_in_flight = true;
        let fetched = self.fetcher.fetch();
        let outcome = match fetched {
            Ok(body) => self.deliver(parse_status_response(&body)),
            Err(err) => PollCycle::FetchFailed(err.to_string()),
        };
        self.poll_in_flight = false;

        // Re-arm measured from completion, not from the original deadline.
        self.next_poll_at = Some(Instant::now() + self.interval);
        outcome
    }

    /// One synchronous fetch outside the schedule, delivered to the same
    /// observers. Used by the one-shot status report.
    pub fn poll_once(&mut self) -> Result<PollCycle> {
        let body = self.fetcher.fetch()?;
        Ok(self.deliver(parse_status_response(&body)))
    }

    fn deliver(&mut self, response: StatusResponse) -> PollCycle {
        match response {
            StatusResponse::Snapshots(snapshots) => {
                if self.service_down {
                    self.service_down = false;
                    for (_, observer) in &mut self.observers {
                        observer.on_service_restored();
                    }
                }
                for (_, observer) in &mut self.observers {
                    observer.notify(&snapshots);
                }
                PollCycle::Delivered(snapshots.len())
            }
            StatusResponse::ServiceError(message) => {
                self.service_down = true;
                for (_, observer) in &mut self.observers {
                    observer.on_service_error(&message);
                }
                PollCycle::ServiceDown(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{snapshot_body, ScriptedFetcher};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every event it sees into a shared log.
    struct LoggingObserver {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl StatusObserver for LoggingObserver {
        fn notify(&mut self, snapshots: &[Option<crate::snapshot::ProjectSnapshot>]) {
            self.log
                .borrow_mut()
                .push(format!("{}:notify:{}", self.name, snapshots.len()));
        }

        fn on_service_error(&mut self, message: &str) {
            self.log
                .borrow_mut()
                .push(format!("{}:error:{}", self.name, message));
        }

        fn on_service_restored(&mut self) {
            self.log.borrow_mut().push(format!("{}:restored", self.name));
        }
    }

    fn bus_with_log(
        responses: Vec<crate::error::Result<String>>,
        names: &[&'static str],
    ) -> (ObserverBus, Vec<ObserverId>, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = ObserverBus::new(
            Box::new(ScriptedFetcher::new(responses)),
            Duration::from_secs(5),
        );
        let ids = names
            .iter()
            .map(|name| {
                bus.register(Box::new(LoggingObserver {
                    name,
                    log: Rc::clone(&log),
                }))
            })
            .collect();
        (bus, ids, log)
    }

    #[test]
    fn test_observers_notified_in_registration_order() {
        let (mut bus, _, log) = bus_with_log(
            vec![Ok(snapshot_body(&[("api", "Building", "Passed")]))],
            &["a", "b", "c"],
        );
        let now = Instant::now();
        bus.start(now);
        let outcome = bus.run_if_due(now);
        assert_eq!(outcome, PollCycle::Delivered(1));
        assert_eq!(
            *log.borrow(),
            vec!["a:notify:1", "b:notify:1", "c:notify:1"]
        );
    }

    #[test]
    fn test_unregister_removes_only_that_observer() {
        let (mut bus, ids, log) = bus_with_log(
            vec![
                Ok(snapshot_body(&[])),
                Ok(snapshot_body(&[])),
            ],
            &["a", "b", "c"],
        );
        let now = Instant::now();
        bus.start(now);
        bus.run_if_due(now);
        log.borrow_mut().clear();

        bus.unregister(ids[1]);
        bus.unregister(ids[1]); // second removal is a no-op
        assert_eq!(bus.observer_count(), 2);

        bus.poll_now(Instant::now());
        bus.run_if_due(Instant::now());
        assert_eq!(*log.borrow(), vec!["a:notify:0", "c:notify:0"]);
    }

    #[test]
    fn test_not_due_before_start_or_deadline() {
        let (mut bus, _, log) = bus_with_log(vec![Ok(snapshot_body(&[]))], &["a"]);
        let now = Instant::now();
        assert_eq!(bus.run_if_due(now), PollCycle::NotDue);

        bus.start(now + Duration::from_secs(5));
        assert_eq!(bus.run_if_due(now), PollCycle::NotDue);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_rearms_after_completion() {
        let (mut bus, _, _) = bus_with_log(
            vec![Ok(snapshot_body(&[])), Ok(snapshot_body(&[]))],
            &["a"],
        );
        let now = Instant::now();
        bus.start(now);
        assert_eq!(bus.run_if_due(now), PollCycle::Delivered(0));

        // Immediately after a cycle the next one is not due yet.
        assert_eq!(bus.run_if_due(Instant::now()), PollCycle::NotDue);
        // ...but it is once the interval has passed.
        assert!(bus.is_due(Instant::now() + Duration::from_secs(6)));
    }

    #[test]
    fn test_fetch_failure_does_not_stop_the_loop() {
        let (mut bus, _, log) = bus_with_log(
            vec![
                Err(crate::error::BuildwatchError::HttpStatus(502)),
                Ok(snapshot_body(&[("api", "Waiting", "Passed")])),
            ],
            &["a"],
        );
        let now = Instant::now();
        bus.start(now);
        match bus.run_if_due(now) {
            PollCycle::FetchFailed(_) => {}
            other => panic!("expected FetchFailed, got {other:?}"),
        }
        assert!(log.borrow().is_empty());

        // Next cycle still fires and delivers.
        let later = Instant::now() + Duration::from_secs(6);
        assert_eq!(bus.run_if_due(later), PollCycle::Delivered(1));
        assert_eq!(*log.borrow(), vec!["a:notify:1"]);
    }

    #[test]
    fn test_service_error_and_restore_fan_out() {
        let (mut bus, _, log) = bus_with_log(
            vec![
                Ok(r#"{"error": "down"}"#.to_string()),
                Ok(snapshot_body(&[])),
            ],
            &["a", "b"],
        );
        let now = Instant::now();
        bus.start(now);
        assert_eq!(
            bus.run_if_due(now),
            PollCycle::ServiceDown("down".to_string())
        );

        let later = Instant::now() + Duration::from_secs(6);
        bus.run_if_due(later);
        assert_eq!(
            *log.borrow(),
            vec![
                "a:error:down",
                "b:error:down",
                "a:restored",
                "b:restored",
                "a:notify:0",
                "b:notify:0"
            ]
        );
    }

    #[test]
    fn test_empty_body_delivers_empty_array() {
        let (mut bus, _, log) = bus_with_log(vec![Ok(String::new())], &["a"]);
        let now = Instant::now();
        bus.start(now);
        assert_eq!(bus.run_if_due(now), PollCycle::Delivered(0));
        assert_eq!(*log.borrow(), vec!["a:notify:0"]);
    }

    #[test]
    fn test_start_is_idempotent() {
        let (mut bus, _, log) = bus_with_log(vec![Ok(snapshot_body(&[]))], &["a"]);
        let now = Instant::now();
        bus.start(now);
        bus.start(now);
        bus.run_if_due(now);
        // A second start must not create a second loop: one delivery only.
        assert_eq!(log.borrow().len(), 1);
    }
}
