// ── Scan entry domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use super::mac::MacAddress;
use crate::error::CoreError;

/// Frequencies at or above this value (Hz) belong to the 5 GHz band.
pub const FIVE_GHZ: f64 = 5e9;

/// Frequencies below this value are a raw channel number, not Hz.
pub const RAW_CHANNEL_LIMIT: f64 = 1e3;

// ── Essid ───────────────────────────────────────────────────────────

/// Network name as broadcast: up to 32 arbitrary bytes, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "EssidRepr", into = "EssidRepr")]
pub struct Essid(Vec<u8>);

impl Essid {
    pub const MAX_LEN: usize = 32;

    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, CoreError> {
        let bytes = bytes.into();
        if bytes.len() > Self::MAX_LEN {
            return Err(CoreError::EssidTooLong {
                len: bytes.len(),
                max: Self::MAX_LEN,
            });
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hidden networks broadcast an empty name.
    pub fn is_hidden(&self) -> bool {
        self.0.is_empty()
    }

    /// Printable ASCII only: no control bytes, nothing at or above 0x80.
    pub fn is_printable(&self) -> bool {
        self.0.iter().all(|b| (0x20..0x7f).contains(b))
    }

    /// The name as text, if it is printable.
    pub fn as_printable(&self) -> Option<&str> {
        if self.is_printable() {
            std::str::from_utf8(&self.0).ok()
        } else {
            None
        }
    }
}

impl TryFrom<&str> for Essid {
    type Error = CoreError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s.as_bytes())
    }
}

/// Fixture representation: text when possible, raw bytes otherwise.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum EssidRepr {
    Text(String),
    Bytes(Vec<u8>),
}

impl TryFrom<EssidRepr> for Essid {
    type Error = CoreError;

    fn try_from(repr: EssidRepr) -> Result<Self, Self::Error> {
        match repr {
            EssidRepr::Text(s) => Self::new(s.into_bytes()),
            EssidRepr::Bytes(b) => Self::new(b),
        }
    }
}

impl From<Essid> for EssidRepr {
    fn from(essid: Essid) -> Self {
        match String::from_utf8(essid.0) {
            Ok(s) => Self::Text(s),
            Err(e) => Self::Bytes(e.into_bytes()),
        }
    }
}

// ── Operating mode ──────────────────────────────────────────────────

/// Operating mode reported for the responding station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpMode {
    Auto,
    #[strum(serialize = "Ad-Hoc")]
    AdHoc,
    Managed,
    #[default]
    Master,
    Repeater,
    Secondary,
    Monitor,
    Mesh,
}

// ── Encryption capabilities ─────────────────────────────────────────

/// A single advertised encryption capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum EncFlag {
    #[strum(serialize = "WEP")]
    #[serde(rename = "WEP")]
    Wep,
    #[strum(serialize = "WPA")]
    #[serde(rename = "WPA")]
    Wpa,
    #[strum(serialize = "WPA2")]
    #[serde(rename = "WPA2")]
    Wpa2,
    #[strum(serialize = "WPA3")]
    #[serde(rename = "WPA3")]
    Wpa3,
    #[strum(serialize = "PSK")]
    #[serde(rename = "PSK")]
    Psk,
    #[strum(serialize = "802.1X")]
    #[serde(rename = "802.1X")]
    Ieee8021x,
    #[strum(serialize = "TKIP")]
    #[serde(rename = "TKIP")]
    Tkip,
    #[strum(serialize = "CCMP")]
    #[serde(rename = "CCMP")]
    Ccmp,
}

impl EncFlag {
    #[allow(clippy::as_conversions)]
    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Bitset of [`EncFlag`]s, iterated in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<EncFlag>", into = "Vec<EncFlag>")]
pub struct EncCapab(u16);

impl EncCapab {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, flag: EncFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn insert(&mut self, flag: EncFlag) {
        self.0 |= flag.bit();
    }

    pub fn iter(self) -> impl Iterator<Item = EncFlag> {
        EncFlag::iter().filter(move |f| self.contains(*f))
    }

    /// Flag names joined by `sep`, e.g. `WPA2/PSK/CCMP`.
    pub fn join(self, sep: &str) -> String {
        self.iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl FromIterator<EncFlag> for EncCapab {
    fn from_iter<I: IntoIterator<Item = EncFlag>>(iter: I) -> Self {
        let mut capab = Self::empty();
        for flag in iter {
            capab.insert(flag);
        }
        capab
    }
}

impl From<Vec<EncFlag>> for EncCapab {
    fn from(flags: Vec<EncFlag>) -> Self {
        flags.into_iter().collect()
    }
}

impl From<EncCapab> for Vec<EncFlag> {
    fn from(capab: EncCapab) -> Self {
        capab.iter().collect()
    }
}

// ── ScanEntry ───────────────────────────────────────────────────────

/// One network observed during a scan cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanEntry {
    pub ap_addr: MacAddress,
    #[serde(default)]
    pub essid: Essid,

    /// Frequency in Hz. Values below 1000 carry a raw channel number.
    pub freq: f64,
    /// Channel number; negative when the frequency has no mapping.
    #[serde(default = "unknown_channel")]
    pub chan: i32,
    #[serde(default)]
    pub mode: OpMode,
    #[serde(default)]
    pub flags: EncCapab,
    #[serde(default)]
    pub has_key: bool,

    /// Link quality on the radio's own scale (see [`RadioRange::max_qual`]).
    #[serde(default)]
    pub quality: Option<u8>,
    /// Signal level in dBm.
    #[serde(default)]
    pub level_dbm: Option<f64>,
}

fn unknown_channel() -> i32 {
    -1
}

impl ScanEntry {
    /// Minimal entry: a master-mode, open network with no signal data.
    pub fn new(ap_addr: MacAddress, essid: Essid, freq: f64, chan: i32) -> Self {
        Self {
            ap_addr,
            essid,
            freq,
            chan,
            mode: OpMode::Master,
            flags: EncCapab::empty(),
            has_key: false,
            quality: None,
            level_dbm: None,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.has_key
    }

    pub fn is_access_point(&self) -> bool {
        self.mode == OpMode::Master
    }

    pub fn is_five_gig(&self) -> bool {
        self.freq >= FIVE_GHZ
    }

    pub fn channel(&self) -> Option<i32> {
        (self.chan >= 0).then_some(self.chan)
    }
}

// ── Radio range & scan batches ──────────────────────────────────────

/// Capabilities of the scanning radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioRange {
    /// Largest quality value the radio reports; 0 means "unknown scale".
    pub max_qual: u8,
}

impl Default for RadioRange {
    fn default() -> Self {
        Self { max_qual: 100 }
    }
}

/// One complete probe cycle, installed into the store in a single step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanBatch {
    #[serde(default)]
    pub range: RadioRange,
    #[serde(default)]
    pub entries: Vec<ScanEntry>,
}
