//! Live view core of the wavescan wireless scan monitor.
//!
//! A background probe fills a lock-guarded [`ScanStore`]; the render loop
//! periodically tries the lock and, when it gets it, runs the pipeline:
//!
//! - **[`sort`]** orders the entry list in place by the active
//!   [`SortConfig`] (six keys, ascending or descending, unknown channels
//!   always last when sorting by channel).
//! - **[`aggregate`]** counts open networks and the 2.4/5 GHz split, and
//!   keeps a bounded top-K (or bottom-K) channel histogram.
//! - **[`format`]** turns entries and the summary into bounded text with
//!   fallbacks for missing radio data.
//! - **[`render`]** lays it all out on a [`Surface`], truncating to the
//!   window and reporting what did not fit.
//!
//! [`ScanWorker`] drives any [`Probe`] on its own thread; [`ReplayProbe`]
//! plays back recorded scans from JSON.

pub mod aggregate;
pub mod error;
pub mod format;
pub mod model;
pub mod probe;
pub mod render;
pub mod sort;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::{ChannelHistogram, ChannelStat, HistogramMode, MAX_CH_STATS, ScanSummary};
pub use error::CoreError;
pub use format::{EssidLabel, ScanClass, Segment};
pub use model::{
    EncCapab, EncFlag, Essid, MacAddress, OpMode, RadioRange, ScanBatch, ScanEntry,
};
pub use probe::{Probe, ReplayProbe, ScanWorker};
pub use render::{
    Attr, FIRST_LINE, ListLayout, RenderConfig, RenderOutcome, RenderStats, Surface,
    render_scan_list,
};
pub use sort::{SortConfig, SortKey, SortOrder, sort_entries};
pub use store::{ScanGuard, ScanResult, ScanStore, StoreBusy, WAITING_MESSAGE};
