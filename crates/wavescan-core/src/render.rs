//! Render pipeline: one tick of the scan list onto a text surface.
//!
//! The core never draws; it describes what goes where through [`Surface`]
//! and leaves cells, colors and terminals to the caller.

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::aggregate::{MAX_CH_STATS, ScanSummary};
use crate::format::{EssidLabel, ScanClass, fmt_essid, fmt_scan_entry, summary_segments};
use crate::sort::SortConfig;
use crate::store::ScanStore;

/// Row where the first entry is drawn.
pub const FIRST_LINE: u16 = 2;

/// Column every row starts at, inside the window border.
const FIRST_COL: u16 = 1;

// ── Display primitives ───────────────────────────────────────────────

/// Highlight of one written run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attr {
    pub class: Option<ScanClass>,
    pub bold: bool,
    pub reverse: bool,
}

impl Attr {
    pub const PLAIN: Self = Self {
        class: None,
        bold: false,
        reverse: false,
    };
    pub const REVERSE: Self = Self {
        class: None,
        bold: false,
        reverse: true,
    };
    pub const BOLD: Self = Self {
        class: None,
        bold: true,
        reverse: false,
    };

    pub const fn class(class: ScanClass) -> Self {
        Self {
            class: Some(class),
            bold: false,
            reverse: false,
        }
    }

    #[must_use]
    pub const fn bolded(self, bold: bool) -> Self {
        Self { bold, ..self }
    }
}

/// Write-only text target addressed by (row, column).
pub trait Surface {
    /// Blank rows `from..=to`.
    fn clear_rows(&mut self, from: u16, to: u16);

    /// Put `text` at `(row, col)`. Text past the right edge is clipped.
    fn write(&mut self, row: u16, col: u16, text: &str, attr: Attr);

    fn flush(&mut self);
}

/// Geometry of the scan window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLayout {
    pub first_line: u16,
    /// Summary row; entries stop one row above it.
    pub last_line: u16,
    pub height: u16,
    pub width: u16,
}

impl ListLayout {
    /// Layout for a bordered window of the given outer size.
    pub fn for_window(height: u16, width: u16) -> Self {
        Self {
            first_line: FIRST_LINE,
            last_line: height.saturating_sub(2),
            height,
            width,
        }
    }

    /// Entry rows available before the summary row.
    pub fn capacity(&self) -> usize {
        usize::from(self.last_line.saturating_sub(self.first_line))
    }
}

/// Per-tick render settings, owned by the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub sort: SortConfig,
    /// Histogram capacity; also the entry count at which the summary appears.
    pub channel_stats: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sort: SortConfig::default(),
            channel_stats: MAX_CH_STATS,
        }
    }
}

/// What a render tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The probe held the store; nothing was written.
    Skipped,
    Rendered(RenderStats),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStats {
    pub shown: usize,
    pub not_shown: usize,
    /// Summary as aggregated this tick.
    pub summary: ScanSummary,
    /// When the probe last installed or cleared the list.
    pub updated_at: Option<DateTime<Utc>>,
}

impl RenderOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    pub fn stats(&self) -> Option<&RenderStats> {
        match self {
            Self::Skipped => None,
            Self::Rendered(stats) => Some(stats),
        }
    }
}

// ── Render tick ──────────────────────────────────────────────────────

/// Sort, aggregate and paint the current scan list.
///
/// Never blocks: if the probe is mid-install the tick is skipped and the
/// surface keeps its previous frame.
pub fn render_scan_list(
    store: &ScanStore,
    config: RenderConfig,
    layout: ListLayout,
    surface: &mut dyn Surface,
) -> RenderOutcome {
    let Ok(mut scan) = store.try_acquire() else {
        trace!("scan in progress, skipping render tick");
        return RenderOutcome::Skipped;
    };

    if !scan.is_empty() || !scan.message().is_empty() {
        surface.clear_rows(1, layout.last_line);
    }
    if scan.is_empty() {
        let message = scan.message();
        let row = (layout.height / 2).saturating_sub(1);
        let len = u16::try_from(message.chars().count()).unwrap_or(u16::MAX);
        let col = layout.width.saturating_sub(len) / 2;
        surface.write(row, col, message, Attr::PLAIN);
    }

    scan.sort(config.sort);
    let summary = scan.aggregate(config.channel_stats, config.sort).clone();

    let range = scan.range();
    let width = scan.max_essid_len();
    let updated_at = scan.updated_at();
    let mut shown = 0;
    let mut line = layout.first_line;
    for entry in scan.entries().iter().take(layout.capacity()) {
        let label = EssidLabel::of(entry);
        let highlight = Attr::class(ScanClass::of(entry));

        let name = fmt_essid(label, width);
        let addr = entry.ap_addr.to_string();
        let rest = format!(" {}", fmt_scan_entry(entry, range));

        let mut col = FIRST_COL;
        surface.write(line, col, &name, highlight.bolded(label.is_plain()));
        col = advance(col, &name);
        surface.write(line, col, &addr, highlight);
        col = advance(col, &addr);
        surface.write(line, col, &rest, Attr::PLAIN);

        shown += 1;
        line += 1;
    }

    let not_shown = summary.entries - shown;
    if summary.entries >= config.channel_stats {
        let mut col = FIRST_COL;
        for seg in summary_segments(&summary, config.sort, not_shown) {
            surface.write(layout.last_line, col, &seg.text, seg.attr);
            col = advance(col, &seg.text);
        }
    }

    drop(scan);
    surface.flush();

    RenderOutcome::Rendered(RenderStats {
        shown,
        not_shown,
        summary,
        updated_at,
    })
}

fn advance(col: u16, text: &str) -> u16 {
    let len = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    col.saturating_add(len)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Essid, MacAddress, RadioRange, ScanBatch, ScanEntry};
    use crate::sort::{SortKey, SortOrder};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        cleared: Vec<(u16, u16)>,
        writes: Vec<(u16, u16, String, Attr)>,
        flushes: usize,
    }

    impl Surface for Recorder {
        fn clear_rows(&mut self, from: u16, to: u16) {
            self.cleared.push((from, to));
        }

        fn write(&mut self, row: u16, col: u16, text: &str, attr: Attr) {
            self.writes.push((row, col, text.to_owned(), attr));
        }

        fn flush(&mut self) {
            self.flushes += 1;
        }
    }

    impl Recorder {
        fn row_text(&self, row: u16) -> String {
            self.writes
                .iter()
                .filter(|w| w.0 == row)
                .map(|w| w.2.as_str())
                .collect()
        }
    }

    fn entry(name: &str, chan: i32, quality: u8) -> ScanEntry {
        let mut e = ScanEntry::new(
            MacAddress::new([0, 0, 0, 0, 0, chan as u8]),
            Essid::try_from(name).unwrap(),
            2.407e9 + 5e6 * f64::from(chan),
            chan,
        );
        e.quality = Some(quality);
        e.level_dbm = Some(-50.0);
        e.has_key = true;
        e
    }

    fn store_with(entries: Vec<ScanEntry>) -> ScanStore {
        let store = ScanStore::new();
        store.populate(ScanBatch {
            range: RadioRange::default(),
            entries,
        });
        store
    }

    const BY_SIGNAL: RenderConfig = RenderConfig {
        sort: SortConfig::new(SortKey::Signal, SortOrder::Descending),
        channel_stats: MAX_CH_STATS,
    };

    #[test]
    fn layout_for_window() {
        let layout = ListLayout::for_window(20, 80);
        assert_eq!(layout.first_line, 2);
        assert_eq!(layout.last_line, 18);
        assert_eq!(layout.capacity(), 16);
        assert_eq!(ListLayout::for_window(3, 10).capacity(), 0);
    }

    #[test]
    fn busy_store_skips_without_writing() {
        let store = store_with(vec![entry("a", 1, 10)]);
        let held = store.acquire();
        let mut surface = Recorder::default();

        let layout = ListLayout::for_window(20, 80);
        let outcome = render_scan_list(&store, BY_SIGNAL, layout, &mut surface);

        assert!(outcome.is_skipped());
        assert!(surface.writes.is_empty());
        assert!(surface.cleared.is_empty());
        assert_eq!(surface.flushes, 0);
        drop(held);
    }

    #[test]
    fn empty_store_centers_message() {
        let store = ScanStore::new();
        let mut surface = Recorder::default();
        let layout = ListLayout::for_window(20, 80);
        let outcome = render_scan_list(&store, BY_SIGNAL, layout, &mut surface);

        assert_eq!(surface.cleared, [(1, 18)]);
        let msg = "Waiting for scan data ...";
        assert_eq!(
            surface.writes,
            [(9, (80 - msg.len() as u16) / 2, msg.to_owned(), Attr::PLAIN)]
        );
        assert_eq!(outcome.stats().unwrap().shown, 0);
        assert_eq!(surface.flushes, 1);
    }

    #[test]
    fn rows_are_sorted_and_highlighted() {
        let store = store_with(vec![entry("low", 1, 20), entry("high", 6, 90)]);
        let mut surface = Recorder::default();
        render_scan_list(&store, BY_SIGNAL, ListLayout::for_window(20, 80), &mut surface);

        assert_eq!(
            surface.row_text(2),
            "high 00:00:00:00:00:06 90%, -50 dBm, ch   6, 2437 MHz"
        );
        assert!(surface.row_text(3).starts_with("low  00:00:00:00:00:01"));

        let name = &surface.writes[0];
        assert_eq!((name.0, name.1), (2, 1));
        assert_eq!(name.3, Attr::class(ScanClass::EncryptedAp).bolded(true));
        let addr = &surface.writes[1];
        assert_eq!(addr.1, 6);
        assert_eq!(addr.3, Attr::class(ScanClass::EncryptedAp));
    }

    #[test]
    fn placeholder_names_are_not_bold() {
        let mut hidden = entry("", 1, 10);
        hidden.has_key = false;
        let store = store_with(vec![hidden]);
        let mut surface = Recorder::default();
        render_scan_list(&store, BY_SIGNAL, ListLayout::for_window(20, 80), &mut surface);

        assert_eq!(surface.writes[0].2, "<hidden ESSID> ");
        assert_eq!(surface.writes[0].3, Attr::class(ScanClass::OpenAp));
    }

    #[test]
    fn truncation_is_counted_and_summarized() {
        let entries = (1..=8).map(|c| entry("n", c, 10 * c as u8)).collect();
        let store = store_with(entries);
        let layout = ListLayout::for_window(8, 120);
        let mut surface = Recorder::default();

        let outcome = render_scan_list(&store, BY_SIGNAL, layout, &mut surface);
        let stats = outcome.stats().unwrap();

        assert_eq!(layout.capacity(), 4);
        assert_eq!((stats.shown, stats.not_shown), (4, 4));
        assert!(surface.writes.iter().all(|w| w.0 <= layout.last_line));
        assert!(surface.row_text(6).starts_with("total: 8 Sig desc, 4 not shown"));
    }

    #[test]
    fn summary_waits_for_histogram_capacity() {
        let store = store_with(vec![entry("a", 1, 10), entry("b", 6, 20)]);
        let mut surface = Recorder::default();
        render_scan_list(&store, BY_SIGNAL, ListLayout::for_window(20, 80), &mut surface);
        assert_eq!(surface.row_text(18), "");

        let config = RenderConfig {
            channel_stats: 2,
            ..BY_SIGNAL
        };
        let mut surface = Recorder::default();
        render_scan_list(&store, config, ListLayout::for_window(20, 80), &mut surface);
        assert_eq!(
            surface.row_text(18),
            "total: 2 Sig desc top-2: ch#1 (1), ch#6 (1)"
        );
    }

    #[test]
    fn render_refreshes_store_summary() {
        let store = store_with(vec![entry("a", 11, 10), entry("b", 11, 20), entry("c", 1, 5)]);
        let mut surface = Recorder::default();
        render_scan_list(&store, BY_SIGNAL, ListLayout::for_window(20, 80), &mut surface);

        let scan = store.acquire();
        assert_eq!(scan.summary().channels.stats()[0].channel, 11);
        assert_eq!(scan.entries()[0].essid.as_bytes(), b"b");
    }

    #[test]
    fn stats_carry_install_time() {
        let layout = ListLayout::for_window(20, 80);
        let empty = ScanStore::new();
        let outcome = render_scan_list(&empty, BY_SIGNAL, layout, &mut Recorder::default());
        assert_eq!(outcome.stats().unwrap().updated_at, None);

        let store = store_with(vec![entry("a", 1, 10)]);
        let installed = store.acquire().updated_at();
        assert!(installed.is_some());
        let outcome = render_scan_list(&store, BY_SIGNAL, layout, &mut Recorder::default());
        assert_eq!(outcome.stats().unwrap().updated_at, installed);
    }
}
