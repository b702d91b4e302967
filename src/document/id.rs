//! Generated document identifiers.
//!
//! Layout (12 bytes, rendered as 24 lowercase hex chars):
//!
//! | bytes | content |
//! |-------|---------|
//! | 0..4  | Unix seconds, big-endian |
//! | 4..9  | random, fixed per process |
//! | 9..12 | counter, big-endian, random start |

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

const COUNTER_MASK: u32 = 0x00ff_ffff;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId([u8; 12]);

fn process_unique() -> &'static [u8; 5] {
    static UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    UNIQUE.get_or_init(|| rand::thread_rng().r#gen())
}

fn counter() -> &'static AtomicU32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER.get_or_init(|| AtomicU32::new(rand::thread_rng().r#gen::<u32>() & COUNTER_MASK))
}

impl DocumentId {
    /// Generate a fresh identifier stamped with the current time.
    pub fn generate() -> Self {
        Self::from_parts(Utc::now(), counter().fetch_add(1, Ordering::Relaxed))
    }

    fn from_parts(at: DateTime<Utc>, count: u32) -> Self {
        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&(at.timestamp() as u32).to_be_bytes());
        bytes[4..9].copy_from_slice(process_unique());
        bytes[9..12].copy_from_slice(&(count & COUNTER_MASK).to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Parse a 24-character hex string.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidId(format!("'{s}' is not a valid id, it must be a 12-byte input or a 24-character hex string"));
        if s.len() != 24 {
            return Err(invalid());
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| invalid())?;
        Ok(Self(bytes))
    }

    /// When the identifier was generated (second precision).
    pub fn generated_at(&self) -> DateTime<Utc> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        Utc.timestamp_opt(i64::from(secs), 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for DocumentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parse_agree() {
        let id = DocumentId::generate();
        let hex = id.to_string();
        assert_eq!(hex.len(), 24);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(DocumentId::parse(&hex).unwrap(), id);
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = DocumentId::generate();
        let b = DocumentId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_timestamp_is_embedded() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let id = DocumentId::from_parts(at, 7);
        assert_eq!(id.generated_at(), at);
        assert_eq!(&id.bytes()[9..], &[0, 0, 7]);
    }

    #[test]
    fn test_counter_wraps_to_three_bytes() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let id = DocumentId::from_parts(at, 0x0100_0002);
        assert_eq!(&id.bytes()[9..], &[0, 0, 2]);
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "abc", "zzzzzzzzzzzzzzzzzzzzzzzz", "+07f1f77bcf86cd799439011", "507f1f77bcf86cd7994390é", "507f1f77bcf86cd79943901", "507f1f77bcf86cd7994390111"] {
            assert!(matches!(DocumentId::parse(bad), Err(Error::InvalidId(_))), "{bad}");
        }
        assert!(DocumentId::parse("507f1f77bcf86cd799439011").is_ok());
        assert!(DocumentId::parse("507F1F77BCF86CD799439011").is_ok());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let id = DocumentId::parse("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!("507f1f77bcf86cd799439011"));
        let back: DocumentId = serde_json::from_value(serde_json::json!("507f1f77bcf86cd799439011")).unwrap();
        assert_eq!(back, id);
    }
}
