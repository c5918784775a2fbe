use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt::Display, num::ParseIntError, str::FromStr};

use crate::json_codecs::{from_u64_string, to_u64_string};

use super::Slot;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialOrd, PartialEq)]
pub struct Epoch(pub u64);

impl Epoch {
    pub const SLOTS_PER_EPOCH: u64 = 32;

    pub fn start_slot(&self) -> Slot {
        Slot(self.0.saturating_mul(Self::SLOTS_PER_EPOCH))
    }

    pub fn end_slot(&self) -> Slot {
        Slot(self.start_slot().0.saturating_add(Self::SLOTS_PER_EPOCH - 1))
    }

    pub fn contains(&self, slot: Slot) -> bool {
        slot.epoch() == *self
    }
}

impl Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<u64> for Epoch {
    fn from(epoch: u64) -> Self {
        Self(epoch)
    }
}

impl FromStr for Epoch {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl<'de> Deserialize<'de> for Epoch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        from_u64_string(deserializer).map(Epoch)
    }
}

impl Serialize for Epoch {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        to_u64_string(&self.0, serializer)
    }
}
