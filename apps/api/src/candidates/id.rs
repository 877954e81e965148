//! Candidate identifiers: 12 bytes rendered as 24 lowercase hex digits.
//!
//! Layout of a generated id: 4-byte big-endian Unix seconds, 5 process-scoped random
//! bytes, 3-byte big-endian counter. Ids sort roughly by creation time.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;

pub const ID_LEN: usize = 24;

const COUNTER_MASK: u32 = 0x00ff_ffff;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    /// Parses a caller-supplied id. Never touches a store.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if is_well_formed(raw) {
            Ok(CandidateId(raw.to_ascii_lowercase()))
        } else {
            Err(AppError::MalformedId(raw.to_string()))
        }
    }

    pub fn generate() -> Self {
        let mut bytes = [0u8; 12];
        let seconds = Utc::now().timestamp() as u32;
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(process_unique());
        let count = counter().fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);

        CandidateId(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True when `raw` has the record store's identifier shape: exactly 24 hex digits.
pub fn is_well_formed(raw: &str) -> bool {
    raw.len() == ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit())
}

fn process_unique() -> &'static [u8; 5] {
    static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    PROCESS_UNIQUE.get_or_init(|| {
        let mut out = [0u8; 5];
        out.copy_from_slice(&Uuid::new_v4().as_bytes()[..5]);
        out
    })
}

fn counter() -> &'static AtomicU32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER.get_or_init(|| AtomicU32::new(counter_seed()))
}

#[cfg(not(test))]
fn counter_seed() -> u32 {
    let seed = Uuid::new_v4();
    let b = seed.as_bytes();
    u32::from_be_bytes([0, b[0], b[1], b[2]])
}

// Tests rely on ids minted within one second sorting in mint order.
#[cfg(test)]
fn counter_seed() -> u32 {
    0
}
