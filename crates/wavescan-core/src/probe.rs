// ── Scan producers ──
//
// A `Probe` yields one complete scan cycle at a time. `ScanWorker` drives a
// probe on a dedicated thread and installs every cycle into the shared
// store; `ReplayProbe` plays back recorded cycles from a JSON fixture.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender, bounded};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::ScanBatch;
use crate::store::ScanStore;

/// Source of scan cycles.
pub trait Probe {
    /// Run one scan cycle. Blocking is fine; this runs off the render thread.
    fn scan(&mut self) -> Result<ScanBatch, CoreError>;
}

impl<P: Probe + ?Sized> Probe for Box<P> {
    fn scan(&mut self) -> Result<ScanBatch, CoreError> {
        (**self).scan()
    }
}

// ── Worker thread ────────────────────────────────────────────────────

/// Background producer feeding a [`ScanStore`].
///
/// Dropping the worker stops and joins the thread.
pub struct ScanWorker {
    running: Arc<AtomicBool>,
    cycles: Arc<AtomicU64>,
    wake: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ScanWorker {
    /// Start scanning immediately, then once per `interval`.
    pub fn spawn<P>(
        mut probe: P,
        store: Arc<ScanStore>,
        interval: Duration,
    ) -> Result<Self, CoreError>
    where
        P: Probe + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let cycles = Arc::new(AtomicU64::new(0));
        let (wake_tx, wake_rx) = bounded::<()>(1);

        let thread_running = Arc::clone(&running);
        let thread_cycles = Arc::clone(&cycles);

        let handle = thread::Builder::new()
            .name("scan-worker".into())
            .spawn(move || {
                debug!(?interval, "scan worker started");
                while thread_running.load(Ordering::SeqCst) {
                    match probe.scan() {
                        Ok(batch) => store.populate(batch),
                        Err(e) => {
                            warn!(error = %e, "scan cycle failed");
                            store.fail(e.to_string());
                        }
                    }
                    thread_cycles.fetch_add(1, Ordering::SeqCst);

                    match wake_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("scan worker stopped");
            })
            .map_err(CoreError::Spawn)?;

        info!(?interval, "scan worker spawned");
        Ok(Self {
            running,
            cycles,
            wake: Some(wake_tx),
            handle: Some(handle),
        })
    }

    /// Completed probe cycles, successful or not.
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the thread and wait for it. Idempotent.
    ///
    /// A cycle already in progress finishes first; only the wait between
    /// cycles is interrupted.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(wake) = self.wake.take() {
            let _ = wake.try_send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("scan worker panicked");
            }
        }
    }
}

impl Drop for ScanWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ── Replay ───────────────────────────────────────────────────────────

/// Plays back recorded scan cycles in order, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ReplayProbe {
    snapshots: Vec<ScanBatch>,
    next: usize,
}

/// A fixture holds either one snapshot or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum Fixture {
    Many(Vec<ScanBatch>),
    One(ScanBatch),
}

impl ReplayProbe {
    /// Replay in-memory snapshots. `None` when there is nothing to replay.
    pub fn from_batches(snapshots: Vec<ScanBatch>) -> Option<Self> {
        if snapshots.is_empty() {
            None
        } else {
            Some(Self { snapshots, next: 0 })
        }
    }

    /// Load a JSON fixture file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = fs::read_to_string(path).map_err(|source| CoreError::FixtureIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw, path)
    }

    /// Parse fixture text; `origin` names the source in errors.
    pub fn from_json(raw: &str, origin: &Path) -> Result<Self, CoreError> {
        let fixture: Fixture =
            serde_json::from_str(raw).map_err(|source| CoreError::FixtureParse {
                path: origin.to_path_buf(),
                source,
            })?;
        let snapshots = match fixture {
            Fixture::Many(many) => many,
            Fixture::One(one) => vec![one],
        };
        debug!(origin = %origin.display(), snapshots = snapshots.len(), "scan fixture loaded");
        Self::from_batches(snapshots).ok_or_else(|| CoreError::EmptyFixture {
            path: origin.to_path_buf(),
        })
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl Probe for ReplayProbe {
    fn scan(&mut self) -> Result<ScanBatch, CoreError> {
        let batch = self.snapshots[self.next].clone();
        self.next = (self.next + 1) % self.snapshots.len();
        Ok(batch)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write as _;
    use std::time::Instant;

    use super::*;
    use crate::model::{Essid, MacAddress, RadioRange, ScanEntry};

    fn snapshot(names: &[&str]) -> ScanBatch {
        ScanBatch {
            range: RadioRange::default(),
            entries: names
                .iter()
                .map(|n| {
                    ScanEntry::new(MacAddress::default(), Essid::try_from(*n).unwrap(), 2.412e9, 1)
                })
                .collect(),
        }
    }

    fn wait_for(mut done: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done() {
            assert!(Instant::now() < deadline, "timed out waiting for scan worker");
            thread::sleep(Duration::from_millis(5));
        }
    }

    struct Failing;

    impl Probe for Failing {
        fn scan(&mut self) -> Result<ScanBatch, CoreError> {
            Err(CoreError::ScanFailed {
                message: "interface down".into(),
            })
        }
    }

    #[test]
    fn replay_cycles_through_snapshots() {
        let mut probe =
            ReplayProbe::from_batches(vec![snapshot(&["a"]), snapshot(&["b", "c"])]).unwrap();
        assert_eq!(probe.scan().unwrap().entries.len(), 1);
        assert_eq!(probe.scan().unwrap().entries.len(), 2);
        assert_eq!(probe.scan().unwrap().entries.len(), 1);
    }

    #[test]
    fn replay_requires_a_snapshot() {
        assert!(ReplayProbe::from_batches(Vec::new()).is_none());
        let err = ReplayProbe::from_json("[]", Path::new("empty.json")).unwrap_err();
        assert!(matches!(err, CoreError::EmptyFixture { .. }));
    }

    #[test]
    fn fixture_file_single_and_many() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"range": {{"max_qual": 70}}, "entries": [
                {{"ap_addr": "00:11:22:33:44:55", "essid": "lab", "freq": 2437000000.0, "chan": 6,
                  "quality": 40, "level_dbm": -61.0, "has_key": true, "flags": ["WPA2", "PSK"]}}
            ]}}"#
        )
        .unwrap();
        let mut probe = ReplayProbe::load(file.path()).unwrap();
        assert_eq!(probe.len(), 1);
        let batch = probe.scan().unwrap();
        assert_eq!(batch.range.max_qual, 70);
        assert_eq!(batch.entries[0].chan, 6);

        let many =
            ReplayProbe::from_json(r#"[{"entries": []}, {"entries": []}]"#, Path::new("x.json"))
                .unwrap();
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn fixture_errors_name_the_file() {
        let err = ReplayProbe::load(Path::new("/nonexistent/scan.json")).unwrap_err();
        assert!(matches!(err, CoreError::FixtureIo { .. }));
        assert!(err.to_string().contains("/nonexistent/scan.json"));

        let err = ReplayProbe::from_json("{not json", Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, CoreError::FixtureParse { .. }));
    }

    #[test]
    fn worker_populates_store_and_stops() {
        let store = Arc::new(ScanStore::new());
        let probe = ReplayProbe::from_batches(vec![snapshot(&["a", "b"])]).unwrap();
        let mut worker =
            ScanWorker::spawn(probe, Arc::clone(&store), Duration::from_secs(60)).unwrap();

        wait_for(|| worker.cycles() >= 1);
        assert_eq!(store.acquire().entries().len(), 2);

        let started = Instant::now();
        worker.shutdown();
        assert!(started.elapsed() < Duration::from_secs(30));
        assert!(!worker.is_running());
        worker.shutdown();
    }

    #[test]
    fn failed_cycle_clears_store_with_message() {
        let store = Arc::new(ScanStore::new());
        store.populate(snapshot(&["stale"]));
        let worker =
            ScanWorker::spawn(Failing, Arc::clone(&store), Duration::from_millis(10)).unwrap();

        wait_for(|| worker.cycles() >= 2);
        drop(worker);

        let scan = store.acquire();
        assert!(scan.is_empty());
        assert_eq!(scan.message(), "Scan failed: interface down");
    }
}
