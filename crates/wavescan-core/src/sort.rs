//! Multi-key ordering of scan entries.
//!
//! Each [`SortKey`] maps to one comparator in a small dispatch table. The
//! sort itself is `slice::sort_by`, which is stable, so entries that compare
//! equal keep the order they had after the previous render and a list that
//! is already close to sorted does not jitter between frames.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::format::HIDDEN_ESSID;
use crate::model::ScanEntry;

/// The six user-selectable orderings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    #[strum(serialize = "Chan")]
    Channel,
    #[strum(serialize = "Sig")]
    Signal,
    #[strum(serialize = "Essid")]
    Essid,
    #[strum(serialize = "Open")]
    Open,
    #[strum(serialize = "Ch/Sg")]
    ChannelSignal,
    #[strum(serialize = "Op/Sg")]
    OpenSignal,
}

type Comparator = fn(&ScanEntry, &ScanEntry) -> Ordering;

impl SortKey {
    /// Comparator for the ascending reading of this key.
    fn comparator(self) -> Comparator {
        match self {
            Self::Channel => cmp_channel,
            Self::Signal => cmp_signal,
            Self::Essid => cmp_essid,
            Self::Open => cmp_open,
            Self::ChannelSignal => cmp_channel_signal,
            Self::OpenSignal => cmp_open_signal,
        }
    }

    /// Keys led by the channel number park unknown channels at the end.
    const fn unknown_channel_last(self) -> bool {
        matches!(self, Self::Channel | Self::ChannelSignal)
    }
}

/// Sort direction. Inverts the whole ordering, never individual fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    #[strum(serialize = "asc")]
    Ascending,
    #[strum(serialize = "desc")]
    Descending,
}

impl SortOrder {
    pub const fn from_ascending(ascending: bool) -> Self {
        if ascending {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    pub const fn is_ascending(self) -> bool {
        matches!(self, Self::Ascending)
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Ascending => ord,
            Self::Descending => ord.reverse(),
        }
    }
}

/// Active ordering: which key, which way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortConfig {
    pub const fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// The one combination that flips the channel histogram to bottom-K.
    pub const fn is_channel_descending(self) -> bool {
        matches!(self.key, SortKey::Channel) && !self.order.is_ascending()
    }

    /// Full comparison used by [`sort_entries`].
    pub fn compare(self, a: &ScanEntry, b: &ScanEntry) -> Ordering {
        let head = if self.key.unknown_channel_last() {
            unknown_channel_last(a, b)
        } else {
            Ordering::Equal
        };
        head.then_with(|| self.order.apply((self.key.comparator())(a, b)))
    }
}

/// Order `entries` in place. Stable; no-op for fewer than two entries.
pub fn sort_entries(entries: &mut [ScanEntry], config: SortConfig) {
    if entries.len() < 2 {
        return;
    }
    entries.sort_by(|a, b| config.compare(a, b));
}

// ── Comparators (ascending reading) ──────────────────────────────────

fn unknown_channel_last(a: &ScanEntry, b: &ScanEntry) -> Ordering {
    // Known (Some) before unknown (None), whatever the direction.
    b.channel().is_some().cmp(&a.channel().is_some())
}

fn cmp_channel(a: &ScanEntry, b: &ScanEntry) -> Ordering {
    a.chan.cmp(&b.chan)
}

/// Quality when present, then level; an entry with neither is lowest.
fn cmp_signal(a: &ScanEntry, b: &ScanEntry) -> Ordering {
    a.quality
        .cmp(&b.quality)
        .then_with(|| match (a.level_dbm, b.level_dbm) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        })
}

fn cmp_essid(a: &ScanEntry, b: &ScanEntry) -> Ordering {
    essid_sort_bytes(a).cmp(essid_sort_bytes(b))
}

fn essid_sort_bytes(entry: &ScanEntry) -> &[u8] {
    if entry.essid.is_hidden() {
        HIDDEN_ESSID.as_bytes()
    } else {
        entry.essid.as_bytes()
    }
}

fn cmp_open(a: &ScanEntry, b: &ScanEntry) -> Ordering {
    a.is_open().cmp(&b.is_open())
}

fn cmp_channel_signal(a: &ScanEntry, b: &ScanEntry) -> Ordering {
    cmp_channel(a, b).then_with(|| cmp_signal(a, b))
}

fn cmp_open_signal(a: &ScanEntry, b: &ScanEntry) -> Ordering {
    cmp_open(a, b).then_with(|| cmp_signal(a, b))
}
