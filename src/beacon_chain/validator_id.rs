//! Ways to identify a validator when asking a beacon node about its duties.

use std::{fmt, str::FromStr};

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::json_codecs::{bytes_from_hex_str, to_prefixed_hex};

pub type ValidatorIndex = u64;

const PUBLIC_KEY_LEN: usize = 48;

/// A compressed BLS12-381 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_LEN]);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("failed to parse public key: {0}")]
pub struct ParsePublicKeyError(String);

impl PublicKey {
    pub const LEN: usize = PUBLIC_KEY_LEN;

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParsePublicKeyError> {
        <[u8; PUBLIC_KEY_LEN]>::try_from(bytes)
            .map(Self)
            .map_err(|_| {
                ParsePublicKeyError(format!(
                    "expected {} bytes, got {}",
                    Self::LEN,
                    bytes.len()
                ))
            })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for PublicKey {
    type Err = ParsePublicKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        bytes_from_hex_str::<PUBLIC_KEY_LEN>(s)
            .map(Self)
            .map_err(ParsePublicKeyError)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", to_prefixed_hex(&self.0))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Anything that can tell us which validator it stands for. Lookups may hit a remote signer or a
/// wallet, so both are fallible and async.
#[automock]
#[async_trait]
pub trait ValidatorIdProvider: Send + Sync {
    async fn index(&self) -> Result<ValidatorIndex>;
    async fn pubkey(&self) -> Result<PublicKey>;
}

/// A validator whose index and public key are known up front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticValidatorId {
    index: ValidatorIndex,
    pubkey: PublicKey,
}

impl StaticValidatorId {
    pub fn new(index: ValidatorIndex, pubkey: PublicKey) -> Self {
        Self { index, pubkey }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseStaticValidatorIdError {
    #[error("expected INDEX:PUBKEY, got {0}")]
    MissingSeparator(String),
    #[error("invalid validator index {0}")]
    InvalidIndex(String),
    #[error(transparent)]
    InvalidPublicKey(#[from] ParsePublicKeyError),
}

/// Parses `16056:0x9553...`.
impl FromStr for StaticValidatorId {
    type Err = ParseStaticValidatorIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, pubkey) = s
            .split_once(':')
            .ok_or_else(|| ParseStaticValidatorIdError::MissingSeparator(s.to_string()))?;
        let index = index
            .trim()
            .parse::<ValidatorIndex>()
            .map_err(|_| ParseStaticValidatorIdError::InvalidIndex(index.to_string()))?;
        let pubkey = pubkey.trim().parse::<PublicKey>()?;
        Ok(Self::new(index, pubkey))
    }
}

#[async_trait]
impl ValidatorIdProvider for StaticValidatorId {
    async fn index(&self) -> Result<ValidatorIndex> {
        Ok(self.index)
    }

    async fn pubkey(&self) -> Result<PublicKey> {
        Ok(self.pubkey)
    }
}
