//! UI actions. Every state change in the app goes through one of these.

use wavescan_core::SortConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Resize(u16, u16),
    /// Re-render the scan list from the store.
    Tick,
    /// Redraw the frame.
    Render,
    /// Switch to a new ordering; takes effect on the next tick.
    SetSort(SortConfig),
}
