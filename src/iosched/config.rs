/*!
 * Scheduler Tunables
 *
 * Typed configuration with clamping setters. Expire values cross the
 * boundary in milliseconds and are held internally in ticks. Nothing here
 * ever rejects a value: out-of-range input is clamped and malformed text is
 * read as far as its leading digits go.
 */

use crate::core::errors::IoSchedError;
use crate::core::limits::*;
use crate::core::time::{msecs_to_ticks, ticks_to_msecs};
use crate::core::types::{RequestClass, Tick};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six tunable keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TunableKey {
    SyncReadExpire,
    SyncWriteExpire,
    AsyncReadExpire,
    AsyncWriteExpire,
    FifoBatch,
    SleepLatencyMultiple,
}

impl TunableKey {
    pub const ALL: [Self; 6] = [
        Self::SyncReadExpire,
        Self::SyncWriteExpire,
        Self::AsyncReadExpire,
        Self::AsyncWriteExpire,
        Self::FifoBatch,
        Self::SleepLatencyMultiple,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SyncReadExpire => "sync_read_expire",
            Self::SyncWriteExpire => "sync_write_expire",
            Self::AsyncReadExpire => "async_read_expire",
            Self::AsyncWriteExpire => "async_write_expire",
            Self::FifoBatch => "fifo_batch",
            Self::SleepLatencyMultiple => "sleep_latency_multiple",
        }
    }

    /// Request class an expire key applies to
    pub const fn class(&self) -> Option<RequestClass> {
        match self {
            Self::SyncReadExpire => Some(RequestClass::SYNC_READ),
            Self::SyncWriteExpire => Some(RequestClass::SYNC_WRITE),
            Self::AsyncReadExpire => Some(RequestClass::ASYNC_READ),
            Self::AsyncWriteExpire => Some(RequestClass::ASYNC_WRITE),
            Self::FifoBatch | Self::SleepLatencyMultiple => None,
        }
    }

    /// Smallest value a store may leave behind
    pub const fn min(&self) -> i64 {
        match self.class() {
            Some(_) => MIN_EXPIRE_MS,
            None => MIN_COUNT,
        }
    }
}

impl FromStr for TunableKey {
    type Err = IoSchedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| IoSchedError::UnknownTunable(key.to_string()))
    }
}

impl fmt::Display for TunableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tunables {
    /// Per-class expiry in ticks, indexed by [`RequestClass::index`]
    expire: [Tick; 4],
    fifo_batch: u32,
    sleep_latency_multiple: u32,
}

impl Tunables {
    /// Defaults; the batch size depends on the display state at creation
    pub fn new(interactive: bool) -> Self {
        let mut expire = [0; 4];
        expire[RequestClass::SYNC_READ.index()] = msecs_to_ticks(DEFAULT_SYNC_READ_EXPIRE_MS);
        expire[RequestClass::SYNC_WRITE.index()] = msecs_to_ticks(DEFAULT_SYNC_WRITE_EXPIRE_MS);
        expire[RequestClass::ASYNC_READ.index()] = msecs_to_ticks(DEFAULT_ASYNC_READ_EXPIRE_MS);
        expire[RequestClass::ASYNC_WRITE.index()] = msecs_to_ticks(DEFAULT_ASYNC_WRITE_EXPIRE_MS);

        Self {
            expire,
            fifo_batch: if interactive {
                DEFAULT_FIFO_BATCH
            } else {
                DEFAULT_FIFO_BATCH_SCREEN_OFF
            },
            sleep_latency_multiple: DEFAULT_SLEEP_LATENCY_MULTIPLE,
        }
    }

    /// Expiry budget of `class` in ticks (0 = untracked)
    #[inline(always)]
    pub fn expire(&self, class: RequestClass) -> Tick {
        self.expire[class.index()]
    }

    pub fn expire_ms(&self, class: RequestClass) -> u64 {
        ticks_to_msecs(self.expire(class))
    }

    pub fn set_expire_ms(&mut self, class: RequestClass, ms: i64) {
        let ms = ms.clamp(MIN_EXPIRE_MS, MAX_TUNABLE) as u64;
        self.expire[class.index()] = msecs_to_ticks(ms);
    }

    #[inline(always)]
    pub fn fifo_batch(&self) -> u32 {
        self.fifo_batch
    }

    pub fn set_fifo_batch(&mut self, count: i64) {
        self.fifo_batch = count.clamp(MIN_COUNT, MAX_TUNABLE) as u32;
    }

    #[inline(always)]
    pub fn sleep_latency_multiple(&self) -> u32 {
        self.sleep_latency_multiple
    }

    pub fn set_sleep_latency_multiple(&mut self, factor: i64) {
        self.sleep_latency_multiple = factor.clamp(MIN_COUNT, MAX_TUNABLE) as u32;
    }

    /// Boundary value of `key` (milliseconds for expire keys)
    pub fn get(&self, key: TunableKey) -> i64 {
        match key.class() {
            Some(class) => self.expire_ms(class) as i64,
            None if key == TunableKey::FifoBatch => self.fifo_batch as i64,
            None => self.sleep_latency_multiple as i64,
        }
    }

    /// Store a boundary value, clamped to the key's range
    pub fn set(&mut self, key: TunableKey, value: i64) {
        match key.class() {
            Some(class) => self.set_expire_ms(class, value),
            None if key == TunableKey::FifoBatch => self.set_fifo_batch(value),
            None => self.set_sleep_latency_multiple(value),
        }
    }

    /// Textual read, one decimal value and a newline
    pub fn show(&self, key: TunableKey) -> String {
        format!("{}\n", self.get(key))
    }

    /// Textual write; returns the number of bytes consumed (always all of them)
    pub fn store(&mut self, key: TunableKey, text: &str) -> usize {
        self.set(key, parse_leading_int(text));
        text.len()
    }

    /// Apply every override present in `config`
    pub fn apply(&mut self, config: &TunablesConfig) {
        for key in TunableKey::ALL {
            if let Some(value) = config.value(key) {
                self.set(key, value);
            }
        }
    }

    /// Full boundary view of the current values
    pub fn to_config(&self) -> TunablesConfig {
        let mut config = TunablesConfig::default();
        for key in TunableKey::ALL {
            *config.slot_mut(key) = Some(self.get(key));
        }
        config
    }
}

impl Default for Tunables {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Optional overrides in boundary units, as loaded from a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TunablesConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_read_expire: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_write_expire: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub async_read_expire: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub async_write_expire: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifo_batch: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_latency_multiple: Option<i64>,
}

impl TunablesConfig {
    pub fn value(&self, key: TunableKey) -> Option<i64> {
        match key {
            TunableKey::SyncReadExpire => self.sync_read_expire,
            TunableKey::SyncWriteExpire => self.sync_write_expire,
            TunableKey::AsyncReadExpire => self.async_read_expire,
            TunableKey::AsyncWriteExpire => self.async_write_expire,
            TunableKey::FifoBatch => self.fifo_batch,
            TunableKey::SleepLatencyMultiple => self.sleep_latency_multiple,
        }
    }

    fn slot_mut(&mut self, key: TunableKey) -> &mut Option<i64> {
        match key {
            TunableKey::SyncReadExpire => &mut self.sync_read_expire,
            TunableKey::SyncWriteExpire => &mut self.sync_write_expire,
            TunableKey::AsyncReadExpire => &mut self.async_read_expire,
            TunableKey::AsyncWriteExpire => &mut self.async_write_expire,
            TunableKey::FifoBatch => &mut self.fifo_batch,
            TunableKey::SleepLatencyMultiple => &mut self.sleep_latency_multiple,
        }
    }
}

/// Permissive base-10 parse: optional leading whitespace and sign, then as
/// many digits as are present. No digits reads as 0; overflow saturates.
pub fn parse_leading_int(text: &str) -> i64 {
    let bytes = text.trim_start().as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };

    let magnitude = digits
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add((b - b'0') as i64)
        });

    if negative {
        -magnitude
    } else {
        magnitude
    }
}
