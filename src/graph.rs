use crate::error::ChmError;
use crate::hash::EdgeHasher;

/// Fudge rule fired for the (0,1) vertex pair.
pub(crate) const FUDGE_01: u8 = 0b001;
/// Fudge rule fired for the (0,2) vertex pair (arity 3 only).
pub(crate) const FUDGE_02: u8 = 0b010;
/// Fudge rule fired for the (1,2) vertex pair (arity 3 only).
pub(crate) const FUDGE_12: u8 = 0b100;

/// Per-vertex incidence state.
///
/// `acc` is the XOR of the ids of all currently incident, unpeeled edges.
/// Invariant: when `degree == 1`, `acc` *is* the sole incident edge's id,
/// which lets peeling find that edge without any adjacency list.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Vertex {
    pub degree: u32,
    pub acc: u32,
}

/// One construction attempt's hypergraph: `edge_count` edges of `arity`
/// vertices each, over ids `[0, vertex_count)`.
pub(crate) struct Graph {
    pub arity: usize,
    pub vertex_count: u32,
    pub vertices: Vec<Vertex>,
    pub edges: Vec<[u32; 3]>,
    fudge: u8,
}

impl Graph {
    /// Allocates zeroed vertex/edge tables. Allocation exhaustion is the only
    /// failure mode and is fatal for the job.
    pub(crate) fn setup(
        vertex_count: u32,
        edge_count: u32,
        arity: usize,
    ) -> Result<Self, ChmError> {
        debug_assert!(vertex_count > 0 && edge_count > 0);
        let mut vertices = Vec::new();
        vertices.try_reserve_exact(vertex_count as usize)?;
        vertices.resize(vertex_count as usize, Vertex::default());
        let mut edges = Vec::new();
        edges.try_reserve_exact(edge_count as usize)?;
        Ok(Self {
            arity,
            vertex_count,
            vertices,
            edges,
            fudge: 0,
        })
    }

    /// Hashes every key into an edge, resolving within-edge collisions.
    ///
    /// With fudging disallowed any coincidence aborts the attempt
    /// (retryable). With fudging allowed the caller must have rounded
    /// `vertex_count` up to a multiple of 2 (arity 2) / 4 (arity 3) so the
    /// bit flips cannot leave the id range.
    pub(crate) fn populate<H: EdgeHasher>(
        &mut self,
        keys: &[Vec<u8>],
        hasher: &H,
        allow_fudging: bool,
    ) -> Result<(), ChmError> {
        debug_assert!(
            !allow_fudging || self.vertex_count % (if self.arity == 2 { 2 } else { 4 }) == 0
        );
        for (i, key) in keys.iter().enumerate() {
            let raw = hasher.hash(key);
            let mut v = [0u32; 3];
            for lane in 0..self.arity {
                v[lane] = raw[lane] % self.vertex_count;
            }
            if has_coincidence(&v, self.arity) {
                if !allow_fudging {
                    return Err(ChmError::VertexConflict);
                }
                self.fudge |= fudge_edge(&mut v, self.arity);
            }
            let e = i as u32;
            self.edges.push(v);
            for lane in 0..self.arity {
                let vert = &mut self.vertices[v[lane] as usize];
                vert.degree += 1;
                vert.acc ^= e;
            }
        }
        Ok(())
    }

    /// Bitmask of fudge rules that fired anywhere during [`populate`](Self::populate).
    /// The lookup formula must replay exactly these rules.
    pub(crate) fn fudge_flags(&self) -> u8 {
        self.fudge
    }

    /// Sort-based duplicate detection: order key indices by (vertex tuple,
    /// key length, raw bytes); duplicates hash to identical tuples, so
    /// byte-identical keys end up adjacent.
    pub(crate) fn has_duplicate_keys(&self, keys: &[Vec<u8>]) -> bool {
        let mut idx: Vec<u32> = (0..keys.len() as u32).collect();
        idx.sort_unstable_by(|&a, &b| {
            let (a, b) = (a as usize, b as usize);
            self.edges[a][..self.arity]
                .cmp(&self.edges[b][..self.arity])
                .then_with(|| keys[a].len().cmp(&keys[b].len()))
                .then_with(|| keys[a].cmp(&keys[b]))
        });
        idx.windows(2)
            .any(|w| keys[w[0] as usize] == keys[w[1] as usize])
    }
}

#[inline]
fn has_coincidence(v: &[u32; 3], arity: usize) -> bool {
    v[0] == v[1] || (arity == 3 && (v[0] == v[2] || v[1] == v[2]))
}

/// Perturbs colliding ids in fixed priority order — (0,1), then for arity 3
/// (0,2) and (1,2) — and returns the mask of rules that fired.
///
/// The later-indexed id of each colliding pair is XORed with a low bit; for
/// the two arity-3 rules the bit is chosen so the result also avoids the
/// remaining id. Rule (1,2) can only fire when (0,2) did not, so the three
/// ids always come out pairwise distinct.
pub(crate) fn fudge_edge(v: &mut [u32; 3], arity: usize) -> u8 {
    let mut fired = 0u8;
    if v[0] == v[1] {
        v[1] ^= 1;
        fired |= FUDGE_01;
    }
    if arity == 3 {
        if v[0] == v[2] {
            v[2] ^= if v[2] ^ 1 == v[1] { 2 } else { 1 };
            fired |= FUDGE_02;
        }
        if v[1] == v[2] {
            v[2] ^= if v[2] ^ 1 == v[0] { 2 } else { 1 };
            fired |= FUDGE_12;
        }
    }
    fired
}

/// Lookup-side replay: applies only the rules recorded in `flags`, guarded by
/// the same equality conditions. The raw ids are recomputed from the same
/// seed, so a key fudged at construction is fudged identically here and a
/// clean key passes through untouched.
pub(crate) fn replay_fudge(v: &mut [u32; 3], arity: usize, flags: u8) {
    if flags & FUDGE_01 != 0 && v[0] == v[1] {
        v[1] ^= 1;
    }
    if arity == 3 {
        if flags & FUDGE_02 != 0 && v[0] == v[2] {
            v[2] ^= if v[2] ^ 1 == v[1] { 2 } else { 1 };
        }
        if flags & FUDGE_12 != 0 && v[1] == v[2] {
            v[2] ^= if v[2] ^ 1 == v[0] { 2 } else { 1 };
        }
    }
}
