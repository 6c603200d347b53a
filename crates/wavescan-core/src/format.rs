//! Text for one scan row and for the summary line.
//!
//! Every function here is pure and total: an entry with no usable radio
//! data still yields a well-formed, bounded line, it just says `?`.

use std::fmt::Write as _;

use crate::aggregate::ScanSummary;
use crate::model::{FIVE_GHZ, RAW_CHANNEL_LIMIT, RadioRange, ScanEntry};
use crate::render::Attr;
use crate::sort::SortConfig;

pub const HIDDEN_ESSID: &str = "<hidden ESSID>";
pub const CRYPTIC_ESSID: &str = "<cryptic ESSID>";

// ── Entry line ───────────────────────────────────────────────────────

/// Signal block: percentage and dBm, or whichever half is valid.
///
/// Quality is meaningless without a non-zero `max_qual`, so an unknown
/// scale is treated the same as an invalid quality.
pub fn fmt_quality(entry: &ScanEntry, range: RadioRange) -> String {
    let quality = entry.quality.filter(|_| range.max_qual > 0);
    match (quality, entry.level_dbm) {
        (Some(q), Some(dbm)) => {
            let pct = (100.0 * f64::from(q) / f64::from(range.max_qual)).clamp(0.0, 100.0);
            format!("{pct:.0}%, {dbm:.0} dBm")
        }
        (Some(q), None) => format!("{q}/{}", range.max_qual),
        (None, Some(dbm)) => format!("{dbm:.0} dBm"),
        (None, None) => "? dBm".into(),
    }
}

/// Channel/frequency block.
pub fn fmt_channel(entry: &ScanEntry) -> String {
    if (0.0..RAW_CHANNEL_LIMIT).contains(&entry.freq) {
        format!("Chan {:2.0}", entry.freq)
    } else if let Some(chan) = entry.channel() {
        let tag = if entry.freq < FIVE_GHZ { "ch" } else { "CH" };
        format!("{tag} {chan:3}, {} MHz", fmt_general(entry.freq / 1e6))
    } else {
        format!("{} GHz", fmt_general(entry.freq / 1e9))
    }
}

/// Six significant digits, trailing zeros dropped, exponent form outside
/// `1e-4..1e6`. Output stays short for any input.
fn fmt_general(value: f64) -> String {
    const DIGITS: i32 = 6;

    if !value.is_finite() {
        return value.to_string();
    }
    // Exponent after rounding, so 999_999.7 moves up a decade.
    let sci = format!("{value:.5e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if (-4..DIGITS).contains(&exp) {
        let decimals = usize::try_from(DIGITS - 1 - exp).unwrap_or(0);
        trim_fraction(&format!("{value:.decimals$}")).to_owned()
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.unsigned_abs())
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// Everything right of the hardware address.
pub fn fmt_scan_entry(entry: &ScanEntry, range: RadioRange) -> String {
    let mut line = fmt_quality(entry, range);
    line.push_str(", ");
    line.push_str(&fmt_channel(entry));

    // Access points are already told apart by their highlight.
    if !entry.is_access_point() {
        let _ = write!(line, " {}", entry.mode);
    }
    if !entry.flags.is_empty() {
        let _ = write!(line, ", {}", entry.flags.join("/"));
    }
    line
}

// ── ESSID column ─────────────────────────────────────────────────────

/// What the name column shows for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EssidLabel<'a> {
    Hidden,
    Cryptic,
    Plain(&'a str),
}

impl<'a> EssidLabel<'a> {
    pub fn of(entry: &'a ScanEntry) -> Self {
        if entry.essid.is_hidden() {
            Self::Hidden
        } else {
            entry
                .essid
                .as_printable()
                .map_or(Self::Cryptic, Self::Plain)
        }
    }

    pub fn as_str(self) -> &'a str {
        match self {
            Self::Hidden => HIDDEN_ESSID,
            Self::Cryptic => CRYPTIC_ESSID,
            Self::Plain(name) => name,
        }
    }

    /// Real names are emphasized; placeholders are not.
    pub fn is_plain(self) -> bool {
        matches!(self, Self::Plain(_))
    }
}

/// Widest label in the list; the column every name is padded to.
pub fn essid_width(entries: &[ScanEntry]) -> usize {
    entries
        .iter()
        .map(|e| EssidLabel::of(e).as_str().len())
        .max()
        .unwrap_or(0)
}

/// Left-aligned label padded to `width`, plus one separating space.
pub fn fmt_essid(label: EssidLabel<'_>, width: usize) -> String {
    format!("{:<width$} ", label.as_str())
}

// ── Row highlight ────────────────────────────────────────────────────

/// Color class shared by the name and address of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanClass {
    EncryptedAp,
    OpenAp,
    NonAp,
}

impl ScanClass {
    pub fn of(entry: &ScanEntry) -> Self {
        if !entry.is_access_point() {
            Self::NonAp
        } else if entry.has_key {
            Self::EncryptedAp
        } else {
            Self::OpenAp
        }
    }
}

// ── Summary line ─────────────────────────────────────────────────────

/// A run of text with one display attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub attr: Attr,
}

impl Segment {
    pub fn new(text: impl Into<String>, attr: Attr) -> Self {
        Self {
            text: text.into(),
            attr,
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Attr::PLAIN)
    }
}

/// The summary line: totals, active sort, overflow, band split, histogram.
pub fn summary_segments(summary: &ScanSummary, sort: SortConfig, not_shown: usize) -> Vec<Segment> {
    let mut segs = vec![
        Segment::new("total:", Attr::REVERSE),
        Segment::plain(format!(" {} ", summary.entries)),
        Segment::new(format!("{} {}", sort.key, sort.order), Attr::REVERSE),
    ];

    if not_shown > 0 {
        segs.push(Segment::plain(format!(", {not_shown} not shown")));
    }
    if summary.open > 0 {
        segs.push(Segment::plain(format!(", {} open", summary.open)));
    }
    if summary.two_gig > 0 && summary.five_gig > 0 {
        segs.push(Segment::plain(" "));
        segs.push(Segment::new("5/2GHz:", Attr::REVERSE));
        segs.push(Segment::plain(format!(
            " {}/{}",
            summary.five_gig, summary.two_gig
        )));
    }

    let hist = &summary.channels;
    if !hist.is_empty() {
        segs.push(Segment::plain(" "));
        segs.push(Segment::new(
            format!("{}-{}:", hist.mode().label(), hist.len()),
            Attr::REVERSE,
        ));
        for (i, stat) in hist.stats().iter().enumerate() {
            segs.push(Segment::plain(if i == 0 { " " } else { ", " }));
            segs.push(Segment::new(format!("ch#{}", stat.channel), Attr::BOLD));
            segs.push(Segment::plain(format!(" ({})", stat.count)));
        }
    }
    segs
}

/// Concatenated text of a segment run, attributes dropped.
pub fn segments_text(segs: &[Segment]) -> String {
    segs.iter().map(|s| s.text.as_str()).collect()
}
