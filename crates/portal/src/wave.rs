use crate::{PortalError, Result, contract::IWavePortal};
use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A message stored on the portal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wave {
    pub address: Address,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl Wave {
    /// Creates a wave from the contract's integer seconds timestamp.
    pub fn new(address: Address, timestamp: U256, message: impl Into<String>) -> Result<Self> {
        let timestamp = i64::try_from(timestamp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or(PortalError::InvalidTimestamp(timestamp))?;
        Ok(Self { address, timestamp, message: message.into() })
    }
}

impl TryFrom<IWavePortal::Wave> for Wave {
    type Error = PortalError;

    fn try_from(record: IWavePortal::Wave) -> Result<Self> {
        Self::new(record.waver, record.timestamp, record.message)
    }
}

impl TryFrom<IWavePortal::NewWave> for Wave {
    type Error = PortalError;

    fn try_from(event: IWavePortal::NewWave) -> Result<Self> {
        Self::new(event.from, event.timestamp, event.message)
    }
}

impl fmt::Display for Wave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.timestamp.to_rfc2822(), self.address, self.message)
    }
}

/// Waves in contract order.
///
/// A fetch replaces the whole list while live events append to it. Appending a wave that is
/// already present is a no-op, since a wave mined between subscribing and fetching is delivered
/// by both.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaveList(Vec<Wave>);

impl WaveList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `wave`, returning `false` if an identical wave is already listed.
    ///
    /// The whole list is searched, so two distinct waves with the same sender, second and
    /// message collapse into one. The deployed contract's per-sender cooldown rules that out.
    pub fn push(&mut self, wave: Wave) -> bool {
        if self.0.contains(&wave) {
            return false;
        }
        self.0.push(wave);
        true
    }

    pub fn replace(&mut self, other: Self) {
        *self = other;
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Wave> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Wave] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Wave> {
        self.0
    }
}

impl FromIterator<Wave> for WaveList {
    fn from_iter<I: IntoIterator<Item = Wave>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a WaveList {
    type Item = &'a Wave;
    type IntoIter = std::slice::Iter<'a, Wave>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for WaveList {
    type Item = Wave;
    type IntoIter = std::vec::IntoIter<Wave>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    fn wave(secs: u64, message: &str) -> Wave {
        Wave::new(ALICE, U256::from(secs), message).unwrap()
    }

    #[test]
    fn converts_contract_seconds() {
        let w = wave(1_640_995_200, "happy new year");
        assert_eq!(w.timestamp.to_rfc3339(), "2022-01-01T00:00:00+00:00");
    }

    #[test]
    fn rejects_out_of_range_timestamp() {
        let err = Wave::new(ALICE, U256::MAX, "x").unwrap_err();
        assert!(matches!(err, PortalError::InvalidTimestamp(ts) if ts == U256::MAX));
    }

    #[test]
    fn push_skips_duplicates() {
        let mut list: WaveList = [wave(1, "a"), wave(2, "b")].into_iter().collect();
        assert!(!list.push(wave(2, "b")));
        assert!(list.push(wave(2, "c")));
        let messages: Vec<_> = list.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages, ["a", "b", "c"]);
    }

    #[test]
    fn push_checks_whole_list() {
        let mut list: WaveList = [wave(1, "a"), wave(2, "b"), wave(3, "c")].into_iter().collect();
        assert!(!list.push(wave(1, "a")));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn replace_keeps_source_order() {
        let mut list = WaveList::new();
        list.push(wave(10, "old"));
        list.replace([wave(3, "z"), wave(1, "y")].into_iter().collect());
        let messages: Vec<_> = list.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages, ["z", "y"]);
    }
}
