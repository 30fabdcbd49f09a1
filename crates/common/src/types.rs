use std::str::FromStr;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

/// Number of bytes in an [`ObjectId`].
const ID_LEN: usize = 12;

/// Random bytes shared by every id generated in this process.
static PROCESS_UNIQUE: LazyLock<[u8; 5]> = LazyLock::new(|| {
    let random = Uuid::new_v4();
    let mut bytes = [0u8; 5];
    bytes.copy_from_slice(&random.as_bytes()[..5]);
    bytes
});

/// Counter for ids generated within the same second. Starts at a random value.
static COUNTER: LazyLock<AtomicU32> = LazyLock::new(|| {
    let random = Uuid::new_v4();
    let b = random.as_bytes();
    AtomicU32::new(u32::from_be_bytes([0, b[0], b[1], b[2]]))
});

/// Errors produced when parsing an [`ObjectId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The input was empty.
    #[error("identifier is empty")]
    Empty,

    /// The input is not 24 bytes long.
    #[error("identifier must be 24 hex characters, got {0} bytes")]
    InvalidLength(usize),

    /// The input contains non-hexadecimal characters.
    #[error("identifier contains non-hex characters")]
    InvalidHex,
}

/// Identifier of a stored document.
///
/// Twelve bytes rendered as a 24-character lowercase hexadecimal string:
/// a 4-byte big-endian creation second, 5 per-process random bytes and a
/// 3-byte counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; ID_LEN]);

impl ObjectId {
    /// Generates a new identifier.
    pub fn new() -> Self {
        let seconds = Utc::now().timestamp() as u32;
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; ID_LEN];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Creates an identifier from its raw bytes.
    pub fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parses a 24-character hexadecimal string.
    pub fn parse_str(raw: &str) -> Result<Self, IdError> {
        if raw.is_empty() {
            return Err(IdError::Empty);
        }
        if raw.len() != ID_LEN * 2 {
            return Err(IdError::InvalidLength(raw.len()));
        }

        let mut bytes = [0u8; ID_LEN];
        hex::decode_to_slice(raw, &mut bytes).map_err(|_| IdError::InvalidHex)?;
        Ok(Self(bytes))
    }

    /// Returns the raw bytes.
    pub fn bytes(&self) -> [u8; ID_LEN] {
        self.0
    }

    /// Returns the lowercase hexadecimal form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the second at which the identifier was generated.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let seconds = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        DateTime::from_timestamp(i64::from(seconds), 0).unwrap_or_default()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl From<[u8; ID_LEN]> for ObjectId {
    fn from(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_str(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_new_creates_unique_ids() {
        let id1 = ObjectId::new();
        let id2 = ObjectId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn object_id_hex_is_24_lowercase_chars() {
        let hex = ObjectId::new().to_hex();
        assert_eq!(hex.len(), 24);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn parse_str_accepts_canonical_form() {
        let id = ObjectId::parse_str("65a1b2c3d4e5f60718293a4b").unwrap();
        assert_eq!(id.to_string(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn parse_str_accepts_uppercase() {
        let id = ObjectId::parse_str("65A1B2C3D4E5F60718293A4B").unwrap();
        assert_eq!(id.to_hex(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn parse_str_rejects_empty() {
        assert_eq!(ObjectId::parse_str(""), Err(IdError::Empty));
    }

    #[test]
    fn parse_str_rejects_wrong_length() {
        assert_eq!(ObjectId::parse_str("abc123"), Err(IdError::InvalidLength(6)));
        assert!(matches!(
            ObjectId::parse_str("65a1b2c3d4e5f60718293a4b00"),
            Err(IdError::InvalidLength(26))
        ));
    }

    #[test]
    fn parse_str_reports_byte_length_of_non_ascii_input() {
        // 23 ASCII hex digits plus a two-byte 'é'
        let raw = "65a1b2c3d4e5f60718293a4é";
        assert_eq!(raw.chars().count(), 24);
        assert_eq!(ObjectId::parse_str(raw), Err(IdError::InvalidLength(25)));
    }

    #[test]
    fn parse_str_rejects_non_hex() {
        assert_eq!(
            ObjectId::parse_str("zza1b2c3d4e5f60718293a4b"),
            Err(IdError::InvalidHex)
        );
    }

    #[test]
    fn timestamp_matches_generation_time() {
        let before = Utc::now().timestamp();
        let id = ObjectId::new();
        let after = Utc::now().timestamp();
        let ts = id.timestamp().timestamp();
        assert!(ts >= before && ts <= after);
    }

    #[test]
    fn object_id_serialization_roundtrip() {
        let id = ObjectId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let deserialized: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn deserialize_rejects_malformed_id() {
        let result: Result<ObjectId, _> = serde_json::from_str("\"not-an-id\"");
        assert!(result.is_err());
    }
}
