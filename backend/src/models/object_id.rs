use std::fmt;
use std::str::FromStr;

use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A 24-character hexadecimal identifier.
///
/// Every id this service touches (path params, body fields, the token
/// subject) must parse into one of these before any query runs; parse
/// failures surface as 400 at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

#[derive(thiserror::Error, Debug)]
#[error("not a valid 24-character hex identifier")]
pub struct InvalidObjectId;

impl ObjectId {
    /// Generate a fresh id: 4 big-endian unix-timestamp bytes followed by
    /// 8 random bytes, hex-encoded.
    pub fn new() -> Self {
        let mut bytes = [0u8; 12];
        let ts = OffsetDateTime::now_utc().unix_timestamp() as u32;
        bytes[..4].copy_from_slice(&ts.to_be_bytes());
        OsRng.fill_bytes(&mut bytes[4..]);
        ObjectId(hex::encode(bytes))
    }

    pub fn parse(s: &str) -> Result<Self, InvalidObjectId> {
        if s.len() == 24 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(ObjectId(s.to_owned()))
        } else {
            Err(InvalidObjectId)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = InvalidObjectId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ObjectId::parse(&s)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_24_hex_chars() {
        assert!(ObjectId::parse("5b8d0d55f10d2b04a0f1b8e3").is_ok());
        assert!(ObjectId::parse("ABCDEF0123456789abcdef01").is_ok());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(ObjectId::parse("").is_err());
        assert!(ObjectId::parse("5b8d0d55f10d2b04a0f1b8e").is_err());
        assert!(ObjectId::parse("5b8d0d55f10d2b04a0f1b8e3a").is_err());
    }

    #[test]
    fn rejects_non_hex() {
        assert!(ObjectId::parse("5b8d0d55f10d2b04a0f1b8ez").is_err());
        assert!(ObjectId::parse("not-a-valid-identifier!!").is_err());
    }

    #[test]
    fn generated_ids_are_valid_and_distinct() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert!(ObjectId::parse(a.as_str()).is_ok());
        assert_ne!(a, b);
    }

    #[test]
    fn deserialization_enforces_validity() {
        assert!(serde_json::from_str::<ObjectId>("\"5b8d0d55f10d2b04a0f1b8e3\"").is_ok());
        assert!(serde_json::from_str::<ObjectId>("\"nope\"").is_err());
    }
}
