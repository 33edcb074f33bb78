use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

use crate::storage::local_state::{KeyValueStore, WORKING_ID_KEY, WORKING_START_KEY};
use crate::todo::seconds_to_human;

/// Time tracking for at most one todo at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkingSession {
    pub id: Option<i64>,
    pub start: Option<DateTime<Utc>>,
}

impl WorkingSession {
    pub fn started(id: i64, start: DateTime<Utc>) -> Self {
        Self {
            id: Some(id),
            start: Some(start),
        }
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some() && self.start.is_some()
    }

    pub fn is_working_on(&self, id: Option<i64>) -> bool {
        self.is_active() && id.is_some() && self.id == id
    }

    /// Whole seconds since the session started, zero when idle.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        match self.start {
            Some(start) => (now - start).num_seconds().max(0) as u64,
            None => 0,
        }
    }

    /// Restore the session; both keys have to be present and parseable.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let id = store
            .get(WORKING_ID_KEY)
            .and_then(|id| id.trim().parse::<i64>().ok());
        let start = store
            .get(WORKING_START_KEY)
            .and_then(|start| DateTime::parse_from_rfc3339(start.trim()).ok())
            .map(|start| start.with_timezone(&Utc));

        match (id, start) {
            (Some(id), Some(start)) => Self::started(id, start),
            _ => Self::default(),
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<()> {
        let id = self.id.map(|id| id.to_string()).unwrap_or_default();
        let start = self.start.map(|start| start.to_rfc3339()).unwrap_or_default();
        store.set(WORKING_ID_KEY, &id)?;
        store.set(WORKING_START_KEY, &start)?;
        Ok(())
    }
}

/// Background ticker publishing the live working time of a session as human
/// readable text once per interval. Stops when dropped or when the receiver
/// goes away.
pub struct WorkingTicker {
    stop: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl WorkingTicker {
    pub fn spawn(session: WorkingSession, interval: Duration) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let elapsed = session.elapsed_seconds(Utc::now());
                        if tx.send(seconds_to_human(elapsed)).is_err() {
                            break;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            debug!("working ticker stopped");
        });

        (
            Self {
                stop: Some(stop_tx),
                handle: Some(handle),
            },
            rx,
        )
    }

    pub fn every_second(session: WorkingSession) -> (Self, mpsc::Receiver<String>) {
        Self::spawn(session, Duration::from_secs(1))
    }

    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("working ticker thread panicked");
        }
    }
}

impl Drop for WorkingTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::local_state::MemoryStore;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_elapsed_seconds() {
        let session = WorkingSession::started(1, start());
        let now = start() + chrono::Duration::seconds(3661);
        assert_eq!(session.elapsed_seconds(now), 3661);
        assert_eq!(WorkingSession::default().elapsed_seconds(now), 0);
        // clock going backwards never yields negative time
        assert_eq!(session.elapsed_seconds(start() - chrono::Duration::seconds(5)), 0);
    }

    #[test]
    fn test_is_working_on() {
        let session = WorkingSession::started(7, start());
        assert!(session.is_working_on(Some(7)));
        assert!(!session.is_working_on(Some(8)));
        assert!(!session.is_working_on(None));
        assert!(!WorkingSession::default().is_working_on(None));
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let session = WorkingSession::started(42, start());
        session.save(&mut store).unwrap();

        assert_eq!(store.get(WORKING_ID_KEY), Some("42".to_string()));
        assert_eq!(WorkingSession::load(&store), session);
    }

    #[test]
    fn test_idle_session_is_stored_as_empty_strings() {
        let mut store = MemoryStore::new();
        WorkingSession::default().save(&mut store).unwrap();
        assert_eq!(store.get(WORKING_ID_KEY), Some(String::new()));
        assert_eq!(store.get(WORKING_START_KEY), Some(String::new()));
        assert_eq!(WorkingSession::load(&store), WorkingSession::default());
    }

    #[test]
    fn test_load_requires_both_keys() {
        let mut store = MemoryStore::new();
        store.set(WORKING_ID_KEY, "3").unwrap();
        assert!(!WorkingSession::load(&store).is_active());
    }

    #[test]
    fn test_ticker_publishes_and_stops() {
        let session = WorkingSession::started(1, Utc::now() - chrono::Duration::seconds(120));
        let (mut ticker, rx) = WorkingTicker::spawn(session, Duration::from_millis(10));

        let text = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(text.starts_with("2m"), "unexpected tick {text:?}");

        ticker.stop();
        // after stopping the sender side is gone once buffered ticks are drained
        while rx.recv_timeout(Duration::from_millis(100)).is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_ticker_ends_when_receiver_dropped() {
        let (ticker, rx) =
            WorkingTicker::spawn(WorkingSession::default(), Duration::from_millis(5));
        drop(rx);
        // dropping joins the thread, which must have noticed the closed channel
        drop(ticker);
    }
}
