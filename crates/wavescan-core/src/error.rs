// ── Core error types ──
//
// Failures surfaced by wavescan-core. None of them are fatal to the view:
// the probe worker turns every `CoreError` into a status message on the
// store, and the render path never returns an error at all.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Probe errors ─────────────────────────────────────────────────
    #[error("Scan failed: {message}")]
    ScanFailed { message: String },

    #[error("No scan data in {path}")]
    EmptyFixture { path: PathBuf },

    // ── Fixture I/O ──────────────────────────────────────────────────
    #[error("Cannot read scan fixture {path}: {source}")]
    FixtureIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed scan fixture {path}: {source}")]
    FixtureParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Invalid hardware address '{raw}'")]
    InvalidMac { raw: String },

    #[error("ESSID is {len} bytes long (at most {max} allowed)")]
    EssidTooLong { len: usize, max: usize },

    // ── Worker errors ────────────────────────────────────────────────
    #[error("Failed to spawn scan thread: {0}")]
    Spawn(#[source] std::io::Error),
}
