use serde::{de, Deserialize, Deserializer, Serializer};

/// The beacon API quotes its integers, some nodes and fixtures don't.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Number(u64),
    String(String),
}

pub fn from_u64_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Number(num) => Ok(num),
        StringOrNumber::String(s) => s.parse::<u64>().map_err(|error| {
            de::Error::invalid_value(
                de::Unexpected::Str(&format!("unexpected value: {}, error: {}", s, error)),
                &"a number as string e.g. \"11750378872376585\", which fits within u64",
            )
        }),
    }
}

pub fn to_u64_string<S>(num_u64: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&num_u64.to_string())
}

/// Decodes a `0x`-prefixed hex string of exactly `N` bytes.
pub fn bytes_from_hex_str<const N: usize>(text: &str) -> Result<[u8; N], String> {
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| format!("expected 0x prefix in {text}"))?;
    let mut bytes = [0u8; N];
    hex::decode_to_slice(digits, &mut bytes)
        .map_err(|error| format!("expected {N} hex encoded bytes, got {text}, error: {error}"))?;
    Ok(bytes)
}

pub fn to_prefixed_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
