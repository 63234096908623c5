//! Toy hash oracles with configurable output widths
//!
//! Intentionally weak hash functions (1-64 bit outputs) so that birthday
//! collisions are reachable on a laptop. NOT for production use.

use anyhow::{anyhow, bail, Result};
use md5::Md5;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

/// Capability contract consumed by the collision finder and the simulator.
///
/// Any deterministic `bytes -> fixed-width integer` map qualifies; the search
/// code never depends on which digest backs it.
pub trait HashOracle: Send + Sync {
    /// Digest of `data`, guaranteed to lie in `[0, 2^bit_size)`.
    fn hash(&self, data: &[u8]) -> u64;

    /// Output width in bits, always in `1..=64`.
    fn bit_size(&self) -> u32;

    /// Human-readable identifier, e.g. `TruncSha256-16`.
    fn display_name(&self) -> String;

    /// Number of possible digests (`2^bit_size`). u128 because 2^64
    /// overflows u64.
    fn output_space(&self) -> u128 {
        1u128 << self.bit_size()
    }

    /// Convenience: hash a UTF-8 string.
    fn hash_str(&self, text: &str) -> u64 {
        self.hash(text.as_bytes())
    }

    /// Convenience: hash a big-endian encoded integer.
    fn hash_u64(&self, value: u64) -> u64 {
        self.hash(&value.to_be_bytes())
    }
}

fn validate_bit_size(bit_size: u32) -> Result<()> {
    if !(1..=64).contains(&bit_size) {
        bail!("Bit size must be between 1 and 64, got {}", bit_size);
    }
    Ok(())
}

fn mask_for(bit_size: u32) -> u64 {
    if bit_size >= 64 {
        u64::MAX
    } else {
        (1u64 << bit_size) - 1
    }
}

fn top_u64_be(digest: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(word)
}

/// SHA-256 truncated to `bit_size` bits (first 8 digest bytes, big-endian,
/// masked). The standard toy oracle.
pub struct TruncatedSha256 {
    bit_size: u32,
    mask: u64,
}

impl TruncatedSha256 {
    pub fn new(bit_size: u32) -> Result<Self> {
        validate_bit_size(bit_size)?;
        Ok(Self {
            bit_size,
            mask: mask_for(bit_size),
        })
    }
}

impl HashOracle for TruncatedSha256 {
    fn hash(&self, data: &[u8]) -> u64 {
        top_u64_be(&Sha256::digest(data)) & self.mask
    }

    fn bit_size(&self) -> u32 {
        self.bit_size
    }

    fn display_name(&self) -> String {
        format!("TruncSha256-{}", self.bit_size)
    }
}

/// Even weaker variant: MD5 truncation folded with the wrapping byte sum of
/// the input. Exists to show the attack is oracle-agnostic.
pub struct ByteSumMd5 {
    bit_size: u32,
    mask: u64,
}

impl ByteSumMd5 {
    pub fn new(bit_size: u32) -> Result<Self> {
        validate_bit_size(bit_size)?;
        Ok(Self {
            bit_size,
            mask: mask_for(bit_size),
        })
    }
}

impl HashOracle for ByteSumMd5 {
    fn hash(&self, data: &[u8]) -> u64 {
        let byte_sum = data.iter().fold(0u64, |s, &b| s.wrapping_add(b as u64));
        top_u64_be(&Md5::digest(data)).wrapping_add(byte_sum) & self.mask
    }

    fn bit_size(&self) -> u32 {
        self.bit_size
    }

    fn display_name(&self) -> String {
        format!("ByteSumMd5-{}", self.bit_size)
    }
}

/// Build a fresh, uncached oracle for `bit_size`.
pub fn make_oracle(bit_size: u32) -> Result<Arc<dyn HashOracle>> {
    Ok(Arc::new(TruncatedSha256::new(bit_size)?))
}

static ORACLES: OnceLock<Mutex<HashMap<u32, Arc<dyn HashOracle>>>> = OnceLock::new();

/// Fetch the shared oracle for `bit_size`, constructing and caching it on
/// first use. Explicit memoization keyed by bit size; oracles are immutable
/// so sharing is safe.
pub fn get_oracle(bit_size: u32) -> Result<Arc<dyn HashOracle>> {
    let cache = ORACLES.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache
        .lock()
        .map_err(|_| anyhow!("Oracle cache lock poisoned"))?;
    if let Some(oracle) = cache.get(&bit_size) {
        return Ok(oracle.clone());
    }
    let oracle = make_oracle(bit_size)?;
    cache.insert(bit_size, oracle.clone());
    Ok(oracle)
}
