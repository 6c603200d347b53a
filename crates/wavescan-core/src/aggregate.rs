//! Per-tick summary of the scan list: counts plus a bounded channel histogram.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::ScanEntry;
use crate::sort::SortConfig;

/// Default number of histogram slots, also the summary-line threshold.
pub const MAX_CH_STATS: usize = 3;

/// Occurrences of one channel number in the current list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStat {
    pub channel: i32,
    pub count: usize,
}

/// Which end of the channel distribution the histogram keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistogramMode {
    /// Most frequent channels; ties go to the lower channel number.
    #[default]
    TopK,
    /// Lowest channel numbers, used while sorting by channel descending.
    BottomK,
}

impl HistogramMode {
    pub fn for_sort(config: SortConfig) -> Self {
        if config.is_channel_descending() {
            Self::BottomK
        } else {
            Self::TopK
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TopK => "top",
            Self::BottomK => "bottom",
        }
    }

    /// Strict ranking; channels are distinct so this is a total order.
    fn rank(self, a: &ChannelStat, b: &ChannelStat) -> Ordering {
        match self {
            Self::TopK => b.count.cmp(&a.count).then(a.channel.cmp(&b.channel)),
            Self::BottomK => a.channel.cmp(&b.channel),
        }
    }
}

/// Fixed-capacity, always-sorted selection of channel counts.
///
/// Offers beyond capacity that rank lower than every kept slot are dropped
/// silently; that is the overflow policy, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHistogram {
    mode: HistogramMode,
    capacity: usize,
    stats: Vec<ChannelStat>,
}

impl ChannelHistogram {
    pub fn new(capacity: usize, mode: HistogramMode) -> Self {
        Self {
            mode,
            capacity,
            stats: Vec::with_capacity(capacity),
        }
    }

    /// Insert in rank order, evicting the lowest-ranked slot when full.
    pub fn offer(&mut self, stat: ChannelStat) {
        if self.capacity == 0 {
            return;
        }
        let mode = self.mode;
        let pos = self
            .stats
            .partition_point(|kept| mode.rank(kept, &stat) == Ordering::Less);
        if pos >= self.capacity {
            return;
        }
        if self.stats.len() == self.capacity {
            self.stats.pop();
        }
        self.stats.insert(pos, stat);
    }

    pub fn stats(&self) -> &[ChannelStat] {
        &self.stats
    }

    pub fn mode(&self) -> HistogramMode {
        self.mode
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

impl Default for ChannelHistogram {
    fn default() -> Self {
        Self::new(MAX_CH_STATS, HistogramMode::TopK)
    }
}

/// Counts shown in the summary line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub entries: usize,
    pub open: usize,
    pub two_gig: usize,
    pub five_gig: usize,
    pub channels: ChannelHistogram,
}

impl ScanSummary {
    /// Raw counts only, as refreshed by the producer. The histogram is
    /// left empty until the next render tick aggregates.
    pub fn counts(entries: &[ScanEntry]) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            summary.count(entry);
        }
        summary
    }

    fn count(&mut self, entry: &ScanEntry) {
        self.entries += 1;
        if entry.is_open() {
            self.open += 1;
        }
        if entry.is_five_gig() {
            self.five_gig += 1;
        } else {
            self.two_gig += 1;
        }
    }
}

/// One pass over the (already sorted) list: counts and channel histogram.
pub fn aggregate(entries: &[ScanEntry], capacity: usize, sort: SortConfig) -> ScanSummary {
    let mut summary = ScanSummary {
        channels: ChannelHistogram::new(capacity, HistogramMode::for_sort(sort)),
        ..ScanSummary::default()
    };
    let mut per_channel: HashMap<i32, usize> = HashMap::new();

    for entry in entries {
        summary.count(entry);
        if let Some(channel) = entry.channel() {
            *per_channel.entry(channel).or_default() += 1;
        }
    }

    for (channel, count) in per_channel {
        summary.channels.offer(ChannelStat { channel, count });
    }
    summary
}
