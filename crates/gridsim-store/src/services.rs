//! Collaborators injected into the storefront services.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

const SALT_LEN: usize = 16;

/// Source of record identifiers
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4;

impl IdGenerator for UuidV4 {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Predictable ids `00000000-0000-0000-0000-000000000001`, `...02`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> Uuid {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        Uuid::from_u128(n as u128)
    }
}

/// Source of timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Password hashing and verification
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> String;
    fn verify(&self, password: &str, stored: &str) -> bool;
}

/// Salted BLAKE3 digests stored as `hex(salt)$hex(digest)`.
///
/// Not a slow KDF; fine for the in-memory demo only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl Blake3Hasher {
    fn digest(salt: &[u8], password: &str) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hasher.finalize()
    }
}

impl PasswordHasher for Blake3Hasher {
    fn hash(&self, password: &str) -> String {
        let salt: [u8; SALT_LEN] = rand::thread_rng().gen();
        let digest = Self::digest(&salt, password);
        format!("{}${}", hex::encode(salt), digest.to_hex())
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
            return false;
        };
        let Ok(salt) = hex::decode(salt_hex) else {
            return false;
        };
        let Ok(expected) = blake3::Hash::from_hex(digest_hex) else {
            return false;
        };

        // Hash equality is constant-time
        Self::digest(&salt, password) == expected
    }
}

/// The collaborators shared by every storefront service
#[derive(Clone)]
pub struct StoreDeps {
    pub ids: Arc<dyn IdGenerator>,
    pub clock: Arc<dyn Clock>,
    pub hasher: Arc<dyn PasswordHasher>,
}

impl Default for StoreDeps {
    fn default() -> Self {
        Self {
            ids: Arc::new(UuidV4),
            clock: Arc::new(SystemClock),
            hasher: Arc::new(Blake3Hasher),
        }
    }
}

impl StoreDeps {
    /// Sequential ids and a fixed clock, for reproducible runs
    pub fn deterministic(now: DateTime<Utc>) -> Self {
        Self {
            ids: Arc::new(SequentialIds::new()),
            clock: Arc::new(FixedClock(now)),
            hasher: Arc::new(Blake3Hasher),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new();
        assert_eq!(ids.next_id(), Uuid::from_u128(1));
        assert_eq!(ids.next_id(), Uuid::from_u128(2));
    }

    #[test]
    fn test_uuid_v4_ids_differ() {
        let ids = UuidV4;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn test_fixed_clock() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(FixedClock(at).now(), at);
    }

    #[test]
    fn test_password_round_trip() {
        let hasher = Blake3Hasher;
        let stored = hasher.hash("password123");

        assert!(hasher.verify("password123", &stored));
        assert!(!hasher.verify("password124", &stored));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = Blake3Hasher;
        assert_ne!(hasher.hash("secret"), hasher.hash("secret"));
    }

    #[test]
    fn test_malformed_stored_hash_fails() {
        let hasher = Blake3Hasher;
        assert!(!hasher.verify("secret", "no-separator"));
        assert!(!hasher.verify("secret", "zz$abcd"));
        assert!(!hasher.verify("secret", "00ff$not-hex"));
    }
}
