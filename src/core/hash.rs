//! World State Hashing
//!
//! Deterministic SHA-256 digests of a world snapshot, used to:
//! - Detect transpositions while searching
//! - Compare two branches for equality cheaply
//! - Checkpoint replay transcripts

use sha2::{Sha256, Digest};

use super::hex::Coord;

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Domain separator for world snapshots.
pub const WORLD_DOMAIN: &[u8] = b"BROADSIDE_WORLD_V1";

/// Domain separator for per-turn order sets.
pub const ORDERS_DOMAIN: &[u8] = b"BROADSIDE_ORDERS_V1";

/// Deterministic hasher for world state.
///
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for a world snapshot.
    pub fn for_world() -> Self {
        Self::new(WORLD_DOMAIN)
    }

    /// Create hasher for a set of orders.
    pub fn for_orders() -> Self {
        Self::new(ORDERS_DOMAIN)
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an i32 value (little-endian).
    #[inline]
    pub fn update_i32(&mut self, value: i32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a length prefix.
    #[inline]
    pub fn update_len(&mut self, len: usize) {
        self.update_u32(len as u32);
    }

    /// Update with a grid coordinate.
    #[inline]
    pub fn update_coord(&mut self, coord: Coord) {
        self.update_i32(coord.x);
        self.update_i32(coord.y);
    }

    /// Update with an optional coordinate (presence byte first).
    #[inline]
    pub fn update_opt_coord(&mut self, coord: Option<Coord>) {
        match coord {
            Some(c) => {
                self.update_u8(1);
                self.update_coord(c);
            }
            None => self.update_u8(0),
        }
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute a simple hash of arbitrary data.
pub fn hash_bytes(data: &[u8]) -> StateHash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute hash with domain separator.
pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> StateHash {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the hash of a world snapshot.
///
/// This function is called by `World::state_hash()`. The turn counter is
/// always hashed first; the closure adds the entity data.
pub fn compute_state_hash<F>(turn: u32, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_world();
    hasher.update_u32(turn);
    add_state(&mut hasher);
    hasher.finalize()
}

/// Short hex prefix of a hash, for log lines.
pub fn short_hex(hash: &StateHash) -> String {
    hex::encode(&hash[..8])
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_hasher_determinism() {
        let make_hash = || {
            let mut hasher = StateHasher::for_world();
            hasher.update_u32(100);
            hasher.update_coord(Coord::new(5, 7));
            hasher.update_opt_coord(None);
            hasher.update_bool(true);
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_hash_order_matters() {
        let hash1 = {
            let mut h = StateHasher::new(b"test");
            h.update_coord(Coord::new(1, 2));
            h.finalize()
        };

        let hash2 = {
            let mut h = StateHasher::new(b"test");
            h.update_coord(Coord::new(2, 1));
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_optional_coord_is_unambiguous() {
        let none = {
            let mut h = StateHasher::new(b"test");
            h.update_opt_coord(None);
            h.update_u8(1);
            h.finalize()
        };
        let some = {
            let mut h = StateHasher::new(b"test");
            h.update_opt_coord(Some(Coord::new(0, 0)));
            h.finalize()
        };
        assert_ne!(none, some);
    }

    #[test]
    fn test_domain_separation() {
        let data = [1u8, 2, 3, 4];

        let hash1 = hash_with_domain(WORLD_DOMAIN, &data);
        let hash2 = hash_with_domain(ORDERS_DOMAIN, &data);

        assert_ne!(hash1, hash2);
        assert_ne!(hash1, hash_bytes(&data));
    }

    #[test]
    fn test_compute_state_hash() {
        let hash = compute_state_hash(10, |hasher| {
            hasher.update_coord(Coord::new(3, 3));
        });
        let hash2 = compute_state_hash(10, |hasher| {
            hasher.update_coord(Coord::new(3, 3));
        });
        assert_eq!(hash, hash2);

        let hash3 = compute_state_hash(11, |hasher| {
            hasher.update_coord(Coord::new(3, 3));
        });
        assert_ne!(hash, hash3);
        assert_eq!(short_hex(&hash).len(), 16);
    }
}
