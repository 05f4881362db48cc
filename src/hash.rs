use xxhash_rust::xxh3::xxh3_64_with_seed;

/// External hash collaborator: turns a key into up to three pseudo-random
/// 32-bit values, deterministically for a fixed seed state.
///
/// The graph builder only consumes the outputs; it never looks inside the
/// algorithm. `reseed` re-randomizes the state between construction attempts.
pub trait EdgeHasher {
    /// Replace the seed state (called once per construction attempt).
    fn reseed(&mut self, salt: u64);

    /// Pseudo-random values for `key`; lanes `0..outputs()` are meaningful.
    fn hash(&self, key: &[u8]) -> [u32; 3];

    /// How many lanes of [`hash`](Self::hash) carry independent values.
    /// The builder refuses arities larger than this.
    fn outputs(&self) -> usize {
        3
    }
}

pub(crate) const LANE0_XOR: u64 = 0x9E37_79B9_7F4A_7C15;
pub(crate) const LANE1_ADD: u64 = 0xA24B_1F6F;
pub(crate) const LANE2_XOR: u64 = 0x853C_49E6_0A6C_9D39;

/// Default hasher: 1× wyhash + splitmix64 lane mixing.
/// Faster than hashing the key once per lane and plenty for CHM.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug)]
pub struct WyEdgeHasher {
    salt: u64,
}

impl WyEdgeHasher {
    pub fn new(salt: u64) -> Self {
        Self { salt }
    }

    pub fn salt(&self) -> u64 {
        self.salt
    }
}

impl EdgeHasher for WyEdgeHasher {
    fn reseed(&mut self, salt: u64) {
        self.salt = salt;
    }

    #[inline]
    fn hash(&self, key: &[u8]) -> [u32; 3] {
        let base = wyhash::wyhash(key, self.salt);
        [
            splitmix64(base ^ LANE0_XOR) as u32,
            splitmix64(base.wrapping_add(LANE1_ADD)) as u32,
            splitmix64(base ^ LANE2_XOR) as u32,
        ]
    }
}

/// xxh3 hasher with three derived seeds; one full pass over the key per lane.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug)]
pub struct Xxh3EdgeHasher {
    salt: u64,
}

impl Xxh3EdgeHasher {
    pub fn new(salt: u64) -> Self {
        Self { salt }
    }

    pub fn salt(&self) -> u64 {
        self.salt
    }
}

impl EdgeHasher for Xxh3EdgeHasher {
    fn reseed(&mut self, salt: u64) {
        self.salt = salt;
    }

    #[inline]
    fn hash(&self, key: &[u8]) -> [u32; 3] {
        let s0 = self.salt ^ LANE0_XOR;
        let s1 = self.salt.wrapping_mul(LANE1_ADD);
        let s2 = self.salt ^ LANE2_XOR;
        [
            xxh3_64_with_seed(key, s0) as u32,
            xxh3_64_with_seed(key, s1) as u32,
            xxh3_64_with_seed(key, s2) as u32,
        ]
    }
}

#[inline]
pub(crate) fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Test-only hasher: the key's first byte indexes a fixed tuple table, so
/// tests can force exact edges (including within-edge collisions).
#[cfg(test)]
#[derive(Clone, Debug)]
pub(crate) struct TableHasher {
    pub tuples: Vec<[u32; 3]>,
    pub lanes: usize,
}

#[cfg(test)]
impl TableHasher {
    pub(crate) fn new(tuples: Vec<[u32; 3]>) -> Self {
        Self { tuples, lanes: 3 }
    }
}

#[cfg(test)]
impl EdgeHasher for TableHasher {
    fn reseed(&mut self, _salt: u64) {}

    fn hash(&self, key: &[u8]) -> [u32; 3] {
        self.tuples[key[0] as usize]
    }

    fn outputs(&self) -> usize {
        self.lanes
    }
}
