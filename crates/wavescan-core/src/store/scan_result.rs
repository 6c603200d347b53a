// ── Guarded scan state ──
//
// Everything the probe writes and the renderer reads lives here, behind
// the single store lock. The probe replaces the entry list wholesale; the
// renderer reorders it in place and refreshes the summary block.

use chrono::{DateTime, Utc};

use crate::aggregate::{ScanSummary, aggregate};
use crate::format::essid_width;
use crate::model::{RadioRange, ScanBatch, ScanEntry};
use crate::sort::{SortConfig, sort_entries};

/// Status shown until the first probe cycle completes.
pub const WAITING_MESSAGE: &str = "Waiting for scan data ...";

/// Shared state of one monitoring session.
#[derive(Debug, Clone)]
pub struct ScanResult {
    entries: Vec<ScanEntry>,
    message: String,
    range: RadioRange,
    summary: ScanSummary,
    max_essid_len: usize,
    updated_at: Option<DateTime<Utc>>,
}

impl Default for ScanResult {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            message: WAITING_MESSAGE.into(),
            range: RadioRange::default(),
            summary: ScanSummary::default(),
            max_essid_len: 0,
            updated_at: None,
        }
    }
}

impl ScanResult {
    // ── Producer side ────────────────────────────────────────────────

    /// Replace the whole list with a fresh probe cycle.
    ///
    /// An empty batch is stored as such, with a status message, so the
    /// renderer never sees an empty list without an explanation.
    pub fn install(&mut self, batch: ScanBatch) {
        self.range = batch.range;
        self.entries = batch.entries;
        self.summary = ScanSummary::counts(&self.entries);
        self.max_essid_len = essid_width(&self.entries);
        self.message = if self.entries.is_empty() {
            "No scan results".into()
        } else {
            String::new()
        };
        self.updated_at = Some(Utc::now());
    }

    /// Drop every entry and explain why.
    pub fn clear_with(&mut self, message: impl Into<String>) {
        self.entries.clear();
        self.summary = ScanSummary::default();
        self.max_essid_len = 0;
        self.message = message.into();
        self.updated_at = Some(Utc::now());
    }

    // ── Renderer side ────────────────────────────────────────────────

    pub fn sort(&mut self, config: SortConfig) {
        sort_entries(&mut self.entries, config);
    }

    /// Recompute the summary block from the current (sorted) list.
    pub fn aggregate(&mut self, capacity: usize, sort: SortConfig) -> &ScanSummary {
        self.summary = aggregate(&self.entries, capacity, sort);
        &self.summary
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn entries(&self) -> &[ScanEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Status message; only meaningful while the list is empty.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> RadioRange {
        self.range
    }

    pub fn summary(&self) -> &ScanSummary {
        &self.summary
    }

    pub fn max_essid_len(&self) -> usize {
        self.max_essid_len
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::format::HIDDEN_ESSID;
    use crate::model::{Essid, MacAddress};

    fn batch(names: &[&str]) -> ScanBatch {
        ScanBatch {
            range: RadioRange { max_qual: 70 },
            entries: names
                .iter()
                .map(|n| {
                    ScanEntry::new(
                        MacAddress::default(),
                        Essid::try_from(*n).unwrap(),
                        5.2e9,
                        40,
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn starts_waiting_for_data() {
        let scan = ScanResult::default();
        assert!(scan.is_empty());
        assert_eq!(scan.message(), WAITING_MESSAGE);
        assert!(scan.updated_at().is_none());
    }

    #[test]
    fn install_refreshes_counts_range_and_width() {
        let mut scan = ScanResult::default();
        scan.install(batch(&["a", "", "longer-name"]));

        assert_eq!(scan.entries().len(), 3);
        assert_eq!(scan.range().max_qual, 70);
        assert_eq!(scan.summary().entries, 3);
        assert_eq!(scan.summary().five_gig, 3);
        assert_eq!(scan.max_essid_len(), HIDDEN_ESSID.len());
        assert!(scan.message().is_empty());
        assert!(scan.updated_at().is_some());
    }

    #[test]
    fn empty_install_carries_a_message() {
        let mut scan = ScanResult::default();
        scan.install(batch(&[]));
        assert!(scan.is_empty());
        assert_eq!(scan.message(), "No scan results");
    }

    #[test]
    fn clear_with_resets_everything() {
        let mut scan = ScanResult::default();
        scan.install(batch(&["x"]));
        scan.clear_with("Scan failed: interface down");

        assert!(scan.is_empty());
        assert_eq!(scan.summary().entries, 0);
        assert_eq!(scan.max_essid_len(), 0);
        assert_eq!(scan.message(), "Scan failed: interface down");
    }
}
