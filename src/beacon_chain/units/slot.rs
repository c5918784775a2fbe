use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt::Display, num::ParseIntError, ops::Add, str::FromStr};

use chrono::{DateTime, Duration, Utc};

use crate::{
    beacon_chain::GENESIS_TIMESTAMP,
    json_codecs::{from_u64_string, to_u64_string},
};

use super::Epoch;

/// Beacon chain slots are 12 second periods counted from genesis.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialOrd, PartialEq)]
pub struct Slot(pub u64);

impl Slot {
    pub const GENESIS: Self = Self(0);
    pub const SECONDS_PER_SLOT: i64 = 12;

    /// Start of the slot. `None` once the slot lies past what a `DateTime` can hold.
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        let seconds = i64::try_from(self.0)
            .ok()?
            .checked_mul(Self::SECONDS_PER_SLOT)?;
        GENESIS_TIMESTAMP.checked_add_signed(Duration::try_seconds(seconds)?)
    }

    pub fn epoch(&self) -> Epoch {
        Epoch(self.0 / Epoch::SLOTS_PER_EPOCH)
    }

    pub fn is_first_of_epoch(&self) -> bool {
        self.0 % Epoch::SLOTS_PER_EPOCH == 0
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Add<u64> for Slot {
    type Output = Self;

    fn add(self, rhs: u64) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl From<u64> for Slot {
    fn from(slot: u64) -> Self {
        Self(slot)
    }
}

impl From<Slot> for u64 {
    fn from(slot: Slot) -> Self {
        slot.0
    }
}

impl FromStr for Slot {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        from_u64_string(deserializer).map(Slot)
    }
}

impl Serialize for Slot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        to_u64_string(&self.0, serializer)
    }
}
