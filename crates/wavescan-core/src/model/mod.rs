// ── Domain model ──
//
// Plain data handed from the probe to the store. Nothing here knows about
// locking, ordering or presentation.

pub mod entry;
pub mod mac;

pub use entry::{
    EncCapab, EncFlag, Essid, FIVE_GHZ, OpMode, RAW_CHANNEL_LIMIT, RadioRange, ScanBatch,
    ScanEntry,
};
pub use mac::MacAddress;
