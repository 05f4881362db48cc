use crate::assign::{GTable, assign};
use crate::error::ChmError;
use crate::graph::{Graph, replay_fudge};
use crate::hash::{EdgeHasher, WyEdgeHasher};
use crate::peel::peel;
use std::borrow::Borrow;

/// Build parameters.
/// The classic CHM expansion factor is ~2.09 for arity 2 and ~1.24 for
/// arity 3; the defaults leave a little headroom to cut down on retries.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Edge arity r: 2 (ordinary graph) or 3 (3-uniform hypergraph).
    pub arity: usize,
    /// Expansion factor c = vertex_count / key_count. Must be >= 2.0 for
    /// arity 2 and >= 1.24 for arity 3.
    pub c: f64,
    /// Resolve within-edge collisions by deterministic bit-flipping instead
    /// of failing the attempt. Costs a rounding of the vertex space up to a
    /// multiple of 2 (arity 2) / 4 (arity 3).
    pub fudging: bool,
    /// Base salt. Effective per-attempt salts are derived deterministically.
    pub salt: u64,
    /// Maximum rehash attempts after retryable failures.
    pub rehash_limit: u32,
    /// Vertex-space floor for very small key sets (tuning, not a semantic
    /// invariant).
    pub min_vertices: u32,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            arity: 3,
            c: 1.27,
            fudging: true,
            salt: 0xC0FF_EE00_D15E_A5E,
            rehash_limit: 16,
            min_vertices: 8,
        }
    }
}

impl BuildConfig {
    /// Replaces the base salt with a fresh random one.
    pub fn random_salt(mut self) -> Self {
        self.salt = rand::random();
        self
    }
}

/// Final MPH: key -> unique index in `[0..n)`.
///
/// Query: reduce the hasher's r values mod `m`, replay the recorded fudge
/// rules, then `(Σ g[v_i]) % n`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Mphf<H = WyEdgeHasher> {
    n: u32,
    m: u32,
    arity: usize,
    fudge: u8,
    g: GTable,
    hasher: H,
}

impl<H: EdgeHasher> Mphf<H> {
    /// O(1) lookup. Bijective over the original key set; arbitrary for any
    /// other key.
    #[inline]
    pub fn index(&self, key: &[u8]) -> u32 {
        let raw = self.hasher.hash(key);
        let mut v = [0u32; 3];
        for lane in 0..self.arity {
            v[lane] = raw[lane] % self.m;
        }
        replay_fudge(&mut v, self.arity, self.fudge);
        let mut sum = 0u64;
        for lane in 0..self.arity {
            sum += u64::from(self.g.get(v[lane] as usize));
        }
        (sum % u64::from(self.n)) as u32
    }

    #[inline]
    pub fn index_str(&self, s: &str) -> u32 {
        self.index(s.as_bytes())
    }

    /// Number of keys the function was built over.
    pub fn len(&self) -> u32 {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Vertex-space size m (the g-table length).
    pub fn vertex_count(&self) -> u32 {
        self.m
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Bitmask of fudge rules the lookup formula replays.
    pub fn fudge_flags(&self) -> u8 {
        self.fudge
    }

    /// The read-only output table.
    pub fn g_table(&self) -> &GTable {
        &self.g
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Explicit permutation artifact: `map[i] == index(key_i) == i` for every
    /// original key, i.e. the identity on `[0, n)` in input order.
    pub fn identity_map(&self) -> Vec<u32> {
        (0..self.n).collect()
    }
}

#[cfg(feature = "serde")]
impl<H> Mphf<H>
where
    H: EdgeHasher + serde::Serialize + serde::de::DeserializeOwned,
{
    pub fn to_bytes(&self) -> Result<Vec<u8>, ChmError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ChmError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

pub struct Builder<H: EdgeHasher = WyEdgeHasher> {
    cfg: BuildConfig,
    hasher: H,
}

impl Builder<WyEdgeHasher> {
    pub fn new() -> Self {
        let cfg = BuildConfig::default();
        let hasher = WyEdgeHasher::new(cfg.salt);
        Self { cfg, hasher }
    }
}

impl Default for Builder<WyEdgeHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: EdgeHasher + Clone> Builder<H> {
    pub fn with_config(mut self, cfg: BuildConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Swaps in a different hash collaborator (it is reseeded per attempt).
    pub fn with_hasher<H2: EdgeHasher + Clone>(self, hasher: H2) -> Builder<H2> {
        Builder {
            cfg: self.cfg,
            hasher,
        }
    }

    /// Builds the MPH from **unique** keys. Retries retryable failures with
    /// fresh salts up to `rehash_limit`; duplicate keys and bad parameters
    /// are permanent.
    pub fn build<K, I>(self, keys: I) -> Result<Mphf<H>, ChmError>
    where
        K: Borrow<[u8]>,
        I: IntoIterator<Item = K>,
    {
        let keys: Vec<Vec<u8>> = keys.into_iter().map(|k| k.borrow().to_vec()).collect();
        validate(&self.cfg, keys.len(), self.hasher.outputs())?;
        let m = vertex_space(keys.len(), &self.cfg);

        // The sort-based duplicate check runs in whichever attempt first gets
        // far enough to have edge tuples, then never again for this job.
        let mut duplicates_checked = false;

        for round in 0..=self.cfg.rehash_limit {
            let salt = mix_salt(self.cfg.salt, round);
            let mut hasher = self.hasher.clone();
            hasher.reseed(salt);
            match try_build_chm(&keys, m, &self.cfg, &hasher, &mut duplicates_checked) {
                Ok(mph) => {
                    log::debug!(
                        "chm build succeeded on attempt {} (n={}, m={}, fudge={:#05b})",
                        round + 1,
                        mph.n,
                        mph.m,
                        mph.fudge
                    );
                    return Ok(mph);
                }
                Err(e) if e.is_retryable() => {
                    log::debug!("chm attempt {} failed: {e}", round + 1);
                }
                Err(e) => return Err(e),
            }
        }
        Err(ChmError::Unresolvable {
            attempts: self.cfg.rehash_limit + 1,
        })
    }
}

fn validate(cfg: &BuildConfig, n: usize, hash_lanes: usize) -> Result<(), ChmError> {
    if n == 0 {
        return Err(ChmError::InvalidParameter("empty key set"));
    }
    match cfg.arity {
        2 if cfg.c < 2.0 => {
            return Err(ChmError::InvalidParameter(
                "expansion factor must be >= 2.0 for arity 2",
            ));
        }
        3 if cfg.c < 1.24 => {
            return Err(ChmError::InvalidParameter(
                "expansion factor must be >= 1.24 for arity 3",
            ));
        }
        2 | 3 => {}
        _ => return Err(ChmError::InvalidParameter("arity must be 2 or 3")),
    }
    if hash_lanes < cfg.arity {
        return Err(ChmError::InvalidParameter(
            "hash function yields fewer values than the arity",
        ));
    }
    // Headroom for the fudging alignment round-up.
    if (cfg.c * n as f64).ceil() >= (u32::MAX - 4) as f64 {
        return Err(ChmError::InvalidParameter(
            "vertex space does not fit in 32 bits",
        ));
    }
    Ok(())
}

/// m = ceil(c * n), floored for tiny key sets and rounded up so fudging's bit
/// flips stay inside the id range.
fn vertex_space(n: usize, cfg: &BuildConfig) -> u32 {
    let mut m = (cfg.c * n as f64).ceil() as u64;
    m = m.max(u64::from(cfg.min_vertices));
    if cfg.fudging {
        let align = if cfg.arity == 2 { 2 } else { 4 };
        m = m.div_ceil(align) * align;
    }
    m as u32
}

/// One CHM construction attempt: hash -> (duplicate check) -> peel -> assign.
fn try_build_chm<H: EdgeHasher + Clone>(
    keys: &[Vec<u8>],
    m: u32,
    cfg: &BuildConfig,
    hasher: &H,
    duplicates_checked: &mut bool,
) -> Result<Mphf<H>, ChmError> {
    let n = keys.len() as u32;
    let mut graph = Graph::setup(m, n, cfg.arity)?;
    graph.populate(keys, hasher, cfg.fudging)?;

    if !*duplicates_checked {
        *duplicates_checked = true;
        if graph.has_duplicate_keys(keys) {
            return Err(ChmError::DuplicateKeys);
        }
    }

    let order = peel(&mut graph)?;
    let g = assign(&graph, &order);
    Ok(Mphf {
        n,
        m,
        arity: cfg.arity,
        fudge: graph.fudge_flags(),
        g: GTable::pack(&g, m),
        hasher: hasher.clone(),
    })
}

/// Deterministically tweak the base salt by round (FNV-like).
#[inline]
fn mix_salt(base: u64, round: u32) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut h = FNV_OFFSET ^ base;
    h ^= u64::from(round);
    h = h.wrapping_mul(FNV_PRIME);
    h ^ (h >> 33)
}
