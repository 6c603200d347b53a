// ── Scan store ──
//
// One coarse lock around the whole scan state. The probe thread blocks on
// it while installing a new cycle; the render loop only ever tries it and
// skips the tick when a scan is in progress. There is no timeout: "not
// now" is expressed entirely by `StoreBusy`.

mod scan_result;

use std::ops::{Deref, DerefMut};

use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use crate::model::ScanBatch;

pub use scan_result::{ScanResult, WAITING_MESSAGE};

/// Returned by [`ScanStore::try_acquire`] while the probe holds the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreBusy;

/// Lock-guarded holder of the current scan state.
#[derive(Debug, Default)]
pub struct ScanStore {
    inner: Mutex<ScanResult>,
}

/// Exclusive access to the scan state. Released on drop, on every path.
pub struct ScanGuard<'a> {
    inner: MutexGuard<'a, ScanResult>,
}

impl ScanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blocking acquisition for the render loop.
    pub fn try_acquire(&self) -> Result<ScanGuard<'_>, StoreBusy> {
        self.inner
            .try_lock()
            .map(|inner| ScanGuard { inner })
            .ok_or(StoreBusy)
    }

    /// Blocking acquisition for the producer.
    pub fn acquire(&self) -> ScanGuard<'_> {
        ScanGuard {
            inner: self.inner.lock(),
        }
    }

    /// Install a complete probe cycle under the lock.
    pub fn populate(&self, batch: ScanBatch) {
        let count = batch.entries.len();
        self.acquire().install(batch);
        debug!(entries = count, "scan results installed");
    }

    /// Clear the list and leave an explanatory status message.
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "scan results cleared");
        self.acquire().clear_with(message);
    }
}

impl Deref for ScanGuard<'_> {
    type Target = ScanResult;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ScanGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Essid, MacAddress, RadioRange, ScanEntry};

    fn one_entry() -> ScanBatch {
        ScanBatch {
            range: RadioRange::default(),
            entries: vec![ScanEntry::new(
                MacAddress::default(),
                Essid::try_from("lab").unwrap(),
                2.412e9,
                1,
            )],
        }
    }

    #[test]
    fn try_acquire_reports_busy_while_held() {
        let store = ScanStore::new();
        let held = store.acquire();
        assert_eq!(store.try_acquire().err(), Some(StoreBusy));
        drop(held);
        assert!(store.try_acquire().is_ok());
    }

    #[test]
    fn guard_release_on_early_return() {
        fn peek(store: &ScanStore) -> Option<usize> {
            let scan = store.try_acquire().ok()?;
            if scan.is_empty() {
                return None;
            }
            Some(scan.entries().len())
        }

        let store = ScanStore::new();
        assert_eq!(peek(&store), None);
        store.populate(one_entry());
        assert_eq!(peek(&store), Some(1));
        assert!(store.try_acquire().is_ok());
    }

    #[test]
    fn populate_then_fail() {
        let store = ScanStore::new();
        store.populate(one_entry());
        assert_eq!(store.acquire().summary().entries, 1);

        store.fail("device busy");
        let scan = store.acquire();
        assert!(scan.is_empty());
        assert_eq!(scan.message(), "device busy");
    }
}
